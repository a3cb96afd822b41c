//! Declarative widget descriptions

use serde::{Deserialize, Serialize};

/// What pressing an element does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Capture the screen and ask the assistant which element to press
    AskAssistant,
    /// Show a modal alert
    ShowAlert { title: String, message: String },
}

impl Intent {
    pub fn alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ShowAlert {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// A style dimension: either points or a percentage string like `"100%"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Points(u32),
    Percent(String),
}

/// Layout and text style, serialized with camelCase keys and unset fields omitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// `flex: 1` with both axes centered
    pub fn centered_fill() -> Self {
        Self::new()
            .with_flex(1)
            .with_justify_content("center")
            .with_align_items("center")
    }

    pub fn with_flex(mut self, flex: u32) -> Self {
        self.flex = Some(flex);
        self
    }

    pub fn with_justify_content(mut self, value: impl Into<String>) -> Self {
        self.justify_content = Some(value.into());
        self
    }

    pub fn with_align_items(mut self, value: impl Into<String>) -> Self {
        self.align_items = Some(value.into());
        self
    }

    pub fn with_padding_bottom(mut self, value: u32) -> Self {
        self.padding_bottom = Some(value);
        self
    }

    pub fn with_width(mut self, width: Dimension) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_margin_top(mut self, value: u32) -> Self {
        self.margin_top = Some(value);
        self
    }

    pub fn with_font_size(mut self, value: u32) -> Self {
        self.font_size = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A node of the declarative UI description
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    View {
        style: Style,
        test_id: Option<String>,
        children: Vec<Widget>,
    },
    Text {
        style: Style,
        content: String,
    },
    Button {
        title: String,
        test_id: Option<String>,
        on_press: Intent,
    },
}

impl Widget {
    pub fn view(style: Style, children: Vec<Widget>) -> Self {
        Self::View {
            style,
            test_id: None,
            children,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            style: Style::default(),
            content: content.into(),
        }
    }

    pub fn styled_text(style: Style, content: impl Into<String>) -> Self {
        Self::Text {
            style,
            content: content.into(),
        }
    }

    pub fn button(title: impl Into<String>, on_press: Intent) -> Self {
        Self::Button {
            title: title.into(),
            test_id: None,
            on_press,
        }
    }

    /// Attach an identifier; text carries none and is returned as-is
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        match &mut self {
            Self::View { test_id, .. } | Self::Button { test_id, .. } => {
                *test_id = Some(id.into());
            }
            Self::Text { .. } => {}
        }
        self
    }
}
