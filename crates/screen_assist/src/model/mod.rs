//! Model client module for the completion endpoint
//!
//! This module provides:
//! - `client`: OpenAI-compatible chat completion client

mod client;

pub use client::{
    trimmed_reply, AssistantClient, CompletionBackend, MessageBuilder, ModelConfig,
    DEFAULT_BASE_URL, DEFAULT_MODEL,
};
