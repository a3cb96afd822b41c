//! Action handling module for assistant replies
//!
//! This module provides:
//! - `dispatcher`: Resolves a reply to an element and presses it

mod dispatcher;

pub use dispatcher::{ActionDispatcher, DispatchOutcome};
