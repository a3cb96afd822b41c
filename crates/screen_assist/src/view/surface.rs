//! UI capability interface and the in-memory renderer behind it

use std::fmt;
use std::sync::Mutex;

use tracing::debug;

use crate::error::{AssistError, Result};
use crate::view::node::Snapshot;
use crate::view::render::render;
use crate::view::widget::{Intent, Widget};

/// Kind of synthesized interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Press,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Press => write!(f, "press"),
        }
    }
}

/// Handle to an element located by `UiSurface::find`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Child indices from the root to the element
    pub path: Vec<usize>,
    /// Type tag of the rendered node
    pub kind: String,
    /// Identifier attribute the element was found by
    pub test_id: String,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.test_id)
    }
}

/// What the UI layer exposes for automation.
///
/// Implementations decide how the tree is produced; callers only see
/// snapshots, element handles and dispatch.
pub trait UiSurface: Send + Sync {
    /// Render and capture the current tree
    fn snapshot(&self) -> Result<Snapshot>;

    /// Locate the element whose identifier equals `identifier` exactly
    fn find(&self, identifier: &str) -> Result<Option<Element>>;

    /// Fire `event` on `element` and return the handler's intent
    fn dispatch(&self, element: &Element, event: EventKind) -> Result<Intent>;
}

type WidgetFactory = dyn Fn() -> Widget + Send + Sync;

/// Renders a widget tree in memory on every call.
///
/// Each `snapshot`, `find` and `dispatch` builds a fresh tree from the factory,
/// so nothing is reused between calls. Fired intents are recorded in order.
pub struct TestRenderer {
    factory: Box<WidgetFactory>,
    fired: Mutex<Vec<Intent>>,
}

impl TestRenderer {
    pub fn new(factory: impl Fn() -> Widget + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            fired: Mutex::new(Vec::new()),
        }
    }

    /// Intents fired so far, oldest first
    pub fn fired_intents(&self) -> Vec<Intent> {
        self.fired
            .lock()
            .map(|fired| fired.clone())
            .unwrap_or_default()
    }

    fn record(&self, intent: &Intent) {
        if let Ok(mut fired) = self.fired.lock() {
            fired.push(intent.clone());
        }
    }
}

impl fmt::Debug for TestRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestRenderer")
            .field("fired", &self.fired_intents().len())
            .finish()
    }
}

impl UiSurface for TestRenderer {
    fn snapshot(&self) -> Result<Snapshot> {
        Ok(render(&(self.factory)()).snapshot())
    }

    fn find(&self, identifier: &str) -> Result<Option<Element>> {
        let tree = render(&(self.factory)());
        let Some(path) = tree.find_test_id(identifier)? else {
            debug!("No element with identifier {:?}", identifier);
            return Ok(None);
        };

        let kind = tree
            .root()
            .at_path(&path)
            .map(|node| node.kind.clone())
            .unwrap_or_default();

        Ok(Some(Element {
            path,
            kind,
            test_id: identifier.to_string(),
        }))
    }

    fn dispatch(&self, element: &Element, event: EventKind) -> Result<Intent> {
        let tree = render(&(self.factory)());

        let node = tree
            .root()
            .at_path(&element.path)
            .filter(|node| node.test_id() == Some(element.test_id.as_str()))
            .ok_or_else(|| AssistError::StaleElement(element.to_string()))?;

        let intent = match event {
            EventKind::Press => tree
                .handler(&element.path)
                .cloned()
                .ok_or_else(|| AssistError::NotInteractive(element.to_string()))?,
        };

        debug!("Dispatched {} on {} ({})", event, element, node.kind);
        self.record(&intent);
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::screen::{app_content, LIGHT_SWITCH_ID, LIGHT_SWITCH_TITLE};
    use crate::view::widget::Style;

    #[test]
    fn test_find_and_press_light_switch() {
        let renderer = TestRenderer::new(app_content);
        let element = renderer.find(LIGHT_SWITCH_ID).unwrap().unwrap();
        assert_eq!(element.kind, "Button");
        assert_eq!(element.path, vec![1]);

        let intent = renderer.dispatch(&element, EventKind::Press).unwrap();
        assert_eq!(
            intent,
            Intent::alert(LIGHT_SWITCH_TITLE, "The lights are on!")
        );
        assert_eq!(renderer.fired_intents(), vec![intent]);
    }

    #[test]
    fn test_find_is_exact_and_case_sensitive() {
        let renderer = TestRenderer::new(app_content);
        assert!(renderer.find("Light_Switch").unwrap().is_none());
        assert!(renderer.find("light_switch ").unwrap().is_none());
        assert!(renderer.find("light").unwrap().is_none());
    }

    #[test]
    fn test_dispatch_to_stale_element_fails() {
        let renderer = TestRenderer::new(app_content);
        let stale = Element {
            path: vec![0],
            kind: "Button".to_string(),
            test_id: LIGHT_SWITCH_ID.to_string(),
        };
        let err = renderer.dispatch(&stale, EventKind::Press).unwrap_err();
        assert!(matches!(err, AssistError::StaleElement(_)));
        assert!(renderer.fired_intents().is_empty());
    }

    #[test]
    fn test_dispatch_to_non_interactive_element_fails() {
        let renderer = TestRenderer::new(|| {
            Widget::view(
                Style::default(),
                vec![Widget::view(Style::default(), vec![Widget::text("plain")]).with_test_id("panel")],
            )
        });
        let element = renderer.find("panel").unwrap().unwrap();
        assert_eq!(element.kind, "View");
        let err = renderer.dispatch(&element, EventKind::Press).unwrap_err();
        assert!(matches!(err, AssistError::NotInteractive(ref e) if e == "View#panel"));
        assert!(renderer.fired_intents().is_empty());
    }

    #[test]
    fn test_snapshots_are_fresh_and_identical() {
        let renderer = TestRenderer::new(app_content);
        let first = renderer.snapshot().unwrap().to_pretty_json().unwrap();
        let second = renderer.snapshot().unwrap().to_pretty_json().unwrap();
        assert_eq!(first, second);
    }
}
