//! View layer: declarative widgets, rendering and the automation surface
//!
//! This module provides:
//! - `widget`: Declarative widget descriptions and press intents
//! - `node`: Rendered nodes and JSON snapshots
//! - `render`: Widget-to-node rendering with handler registration
//! - `screen`: The light switch screen
//! - `surface`: `UiSurface` capability trait and the in-memory renderer
//! - `display`: Plain-text rendering for terminal hosts

mod display;
mod node;
mod render;
mod screen;
mod surface;
mod widget;

pub use display::render_text;
pub use node::{Snapshot, ViewChild, ViewNode, TEST_ID_PROP};
pub use render::{render, RenderedTree};
pub use screen::{
    app_content, app_screen, ASK_BUTTON_ID, ASK_BUTTON_TITLE, LIGHT_SWITCH_ID,
    LIGHT_SWITCH_TITLE, PROMPT_LABEL, RESPONSE_PREFIX,
};
pub use surface::{Element, EventKind, TestRenderer, UiSurface};
pub use widget::{Dimension, Intent, Style, Widget};
