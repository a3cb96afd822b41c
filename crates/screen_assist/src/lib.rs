//! screen_assist: asks a chat completion model which UI element to press
//!
//! This library provides:
//! - A declarative view tree and an in-memory renderer with JSON snapshots
//! - `UiSurface`, the capability interface used to find and press elements
//! - An OpenAI-compatible client that asks about a snapshot
//! - A dispatcher that presses the element named by the reply
//! - A screen controller with an explicit Idle/Responded state machine
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use screen_assist::{app_content, AssistantClient, ModelConfig, ScreenController, TestRenderer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ModelConfig::default().with_api_key("sk-...");
//!     let backend = Arc::new(AssistantClient::new(config));
//!     let surface = Arc::new(TestRenderer::new(app_content));
//!
//!     let mut controller = ScreenController::new(backend, surface);
//!     let outcome = controller.ask_and_apply().await;
//!     println!("Outcome: {:?}", outcome);
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Core functionality
pub mod actions;
pub mod controller;
pub mod model;
pub mod snapshot_saver;
pub mod view;

// Re-export commonly used types and functions
pub use error::{AssistError, Result};

// Config re-exports
pub use config::{build_user_prompt, ApiKey, DEFAULT_QUESTION, SYSTEM_PROMPT};

// View re-exports
pub use view::{
    app_content, app_screen, render, render_text, Element, EventKind, Intent, RenderedTree,
    Snapshot, TestRenderer, UiSurface, ViewNode, Widget, ASK_BUTTON_ID, LIGHT_SWITCH_ID,
};

// Model re-exports
pub use model::{AssistantClient, CompletionBackend, ModelConfig};

// Actions re-exports
pub use actions::{ActionDispatcher, DispatchOutcome};

// Controller re-exports
pub use controller::{AskOutcome, Completion, ScreenController, ScreenEvent, ScreenPress, ScreenState};

pub use snapshot_saver::SnapshotSaver;
