//! Configuration module for screen_assist
//!
//! This module contains:
//! - `api_key`: Credential wrapper injected into the model client
//! - `prompts`: System prompt and default question for the assistant

mod api_key;
mod prompts;

pub use api_key::ApiKey;
pub use prompts::{build_user_prompt, DEFAULT_QUESTION, SYSTEM_PROMPT};
