//! The light switch screen

use crate::view::widget::{Dimension, Intent, Style, Widget};

/// Identifier of the light switch button
pub const LIGHT_SWITCH_ID: &str = "light_switch";

/// Identifier of the button that asks the assistant
pub const ASK_BUTTON_ID: &str = "ask_assistant";

pub const ASK_BUTTON_TITLE: &str = "Ask ChatGPT to press on light switch!";
pub const LIGHT_SWITCH_TITLE: &str = "Light switch";
pub const PROMPT_LABEL: &str = "When there is dark all you need to do is ...";
pub const RESPONSE_PREFIX: &str = "ChatGPT Response: ";

/// The part of the screen the assistant sees and acts on
pub fn app_content() -> Widget {
    Widget::view(
        Style::centered_fill(),
        vec![
            Widget::text(PROMPT_LABEL),
            Widget::button(
                LIGHT_SWITCH_TITLE,
                Intent::alert(LIGHT_SWITCH_TITLE, "The lights are on!"),
            )
            .with_test_id(LIGHT_SWITCH_ID),
        ],
    )
}

/// The full screen shown on the host display
///
/// `response` is the last assistant reply; the result line is only shown once
/// there is one.
pub fn app_screen(response: Option<&str>) -> Widget {
    let mut footer = vec![Widget::button(ASK_BUTTON_TITLE, Intent::AskAssistant)
        .with_test_id(ASK_BUTTON_ID)];

    if let Some(text) = response {
        footer.push(Widget::styled_text(
            Style::new().with_margin_top(20).with_font_size(16),
            format!("{}{}", RESPONSE_PREFIX, text),
        ));
    }

    Widget::view(
        Style::centered_fill(),
        vec![
            app_content(),
            Widget::view(
                Style::new()
                    .with_padding_bottom(50)
                    .with_width(Dimension::Percent("100%".to_string()))
                    .with_align_items("center"),
                footer,
            ),
        ],
    )
}
