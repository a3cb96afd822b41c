//! Renders widget descriptions into view node trees

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::error::{AssistError, Result};
use crate::view::node::{Snapshot, ViewChild, ViewNode, TEST_ID_PROP};
use crate::view::widget::{Intent, Style, Widget};

/// A rendered tree plus the press handlers attached to its nodes
#[derive(Debug, Clone)]
pub struct RenderedTree {
    root: ViewNode,
    handlers: HashMap<Vec<usize>, Intent>,
}

impl RenderedTree {
    pub fn root(&self) -> &ViewNode {
        &self.root
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.root.clone())
    }

    /// Handler registered for the node at `path`
    pub fn handler(&self, path: &[usize]) -> Option<&Intent> {
        self.handlers.get(path)
    }

    /// Path of the single node whose identifier equals `identifier`.
    ///
    /// Returns `Ok(None)` when nothing matches and an error when several nodes
    /// share the identifier.
    pub fn find_test_id(&self, identifier: &str) -> Result<Option<Vec<usize>>> {
        let mut paths = self.root.paths_with_test_id(identifier);
        match paths.len() {
            0 => Ok(None),
            1 => Ok(paths.pop()),
            _ => Err(AssistError::AmbiguousIdentifier(identifier.to_string())),
        }
    }
}

/// Render a widget description into a fresh tree
pub fn render(widget: &Widget) -> RenderedTree {
    let mut handlers = HashMap::new();
    let mut path = Vec::new();
    let root = render_node(widget, &mut path, &mut handlers);
    RenderedTree { root, handlers }
}

fn render_node(
    widget: &Widget,
    path: &mut Vec<usize>,
    handlers: &mut HashMap<Vec<usize>, Intent>,
) -> ViewNode {
    match widget {
        Widget::View {
            style,
            test_id,
            children,
        } => {
            let mut node = ViewNode::new("View");
            insert_style(&mut node, style);
            if let Some(id) = test_id {
                node.props.insert(TEST_ID_PROP.to_string(), json!(id));
            }
            for (index, child) in children.iter().enumerate() {
                path.push(index);
                let rendered = render_node(child, path, handlers);
                path.pop();
                node.children.push(ViewChild::Node(rendered));
            }
            node
        }
        Widget::Text { style, content } => {
            let mut node = ViewNode::new("Text");
            insert_style(&mut node, style);
            node.children.push(ViewChild::Text(content.clone()));
            node
        }
        Widget::Button {
            title,
            test_id,
            on_press,
        } => {
            let mut node = ViewNode::new("Button");
            node.props
                .insert("accessibilityRole".to_string(), json!("button"));
            if let Some(id) = test_id {
                node.props.insert(TEST_ID_PROP.to_string(), json!(id));
            }
            node.children.push(ViewChild::Text(title.clone()));
            handlers.insert(path.clone(), on_press.clone());
            node
        }
    }
}

fn insert_style(node: &mut ViewNode, style: &Style) {
    if style.is_empty() {
        return;
    }
    // Style only holds strings and numbers, so this cannot fail
    let value = serde_json::to_value(style).unwrap_or(Value::Null);
    node.props.insert("style".to_string(), value);
}
