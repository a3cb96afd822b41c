//! Plain-text rendering of a view tree for terminal hosts

use crate::view::node::{ViewChild, ViewNode};

/// Render `root` as an indented outline, one element per line.
///
/// Buttons show as `[ title ]` followed by their identifier, text as its
/// content. Plain containers only indent their children.
pub fn render_text(root: &ViewNode) -> String {
    let mut out = String::new();
    write_node(root, 0, &mut out);
    out
}

fn write_node(node: &ViewNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match node.kind.as_str() {
        "Button" => {
            out.push_str(&format!("{}[ {} ]", indent, node.text_content()));
            if let Some(id) = node.test_id() {
                out.push_str(&format!("  ({})", id));
            }
            out.push('\n');
        }
        "Text" => {
            out.push_str(&format!("{}{}\n", indent, node.text_content()));
        }
        _ => {
            for child in &node.children {
                match child {
                    ViewChild::Node(child) => write_node(child, depth + 1, out),
                    ViewChild::Text(text) => out.push_str(&format!("{}  {}\n", indent, text)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::render::render;
    use crate::view::screen::app_screen;

    #[test]
    fn test_render_text_idle_screen() {
        let text = render_text(render(&app_screen(None)).root());
        assert_eq!(
            text,
            "    When there is dark all you need to do is ...\n    \
             [ Light switch ]  (light_switch)\n    \
             [ Ask ChatGPT to press on light switch! ]  (ask_assistant)\n"
        );
    }

    #[test]
    fn test_render_text_shows_response() {
        let text = render_text(render(&app_screen(Some("light_switch"))).root());
        assert!(text.ends_with("    ChatGPT Response: light_switch\n"));
    }
}
