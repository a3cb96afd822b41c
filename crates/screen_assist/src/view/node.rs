//! Rendered view nodes and their JSON snapshot form

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Prop holding an element's automation identifier
pub const TEST_ID_PROP: &str = "testID";

/// A rendered UI element.
///
/// Serializes as `{"type": ..., "props": {...}, "children": [...] | null}`.
/// Props are kept in key order so the same tree always produces the same JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewNode {
    #[serde(rename = "type")]
    pub kind: String,
    pub props: Map<String, Value>,
    #[serde(default, with = "children_or_null")]
    pub children: Vec<ViewChild>,
}

/// A child of a rendered node: either another node or raw text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ViewChild {
    Text(String),
    Node(ViewNode),
}

impl ViewNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            props: Map::new(),
            children: Vec::new(),
        }
    }

    /// The node's identifier attribute, if it has one
    pub fn test_id(&self) -> Option<&str> {
        self.props.get(TEST_ID_PROP).and_then(|v| v.as_str())
    }

    /// Child node at `index`; text children count toward the index
    pub fn child(&self, index: usize) -> Option<&ViewNode> {
        match self.children.get(index) {
            Some(ViewChild::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// Follow a path of child indices from this node
    pub fn at_path(&self, path: &[usize]) -> Option<&ViewNode> {
        path.iter().try_fold(self, |node, &index| node.child(index))
    }

    /// Concatenated text of all descendant text children
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                ViewChild::Text(text) => out.push_str(text),
                ViewChild::Node(node) => out.push_str(&node.text_content()),
            }
        }
        out
    }

    /// Paths of every node whose identifier equals `identifier` exactly
    pub fn paths_with_test_id(&self, identifier: &str) -> Vec<Vec<usize>> {
        let mut found = Vec::new();
        let mut path = Vec::new();
        collect_test_id(self, identifier, &mut path, &mut found);
        found
    }
}

fn collect_test_id(
    node: &ViewNode,
    identifier: &str,
    path: &mut Vec<usize>,
    found: &mut Vec<Vec<usize>>,
) {
    if node.test_id() == Some(identifier) {
        found.push(path.clone());
    }
    for (index, child) in node.children.iter().enumerate() {
        if let ViewChild::Node(child) = child {
            path.push(index);
            collect_test_id(child, identifier, path, found);
            path.pop();
        }
    }
}

mod children_or_null {
    use super::ViewChild;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(children: &[ViewChild], s: S) -> Result<S::Ok, S::Error> {
        if children.is_empty() {
            s.serialize_none()
        } else {
            children.serialize(s)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<ViewChild>, D::Error> {
        Ok(Option::<Vec<ViewChild>>::deserialize(d)?.unwrap_or_default())
    }
}

/// A rendered tree captured at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    root: ViewNode,
}

impl Snapshot {
    pub fn new(root: ViewNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &ViewNode {
        &self.root
    }

    /// Pretty-printed JSON with two-space indentation
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
