//! Prompts sent to the completion endpoint

/// System instruction describing the assistant's task
pub const SYSTEM_PROMPT: &str = "You are a useful assistant that accepts a JSON snapshot of a rendered UI component tree and tries to understand the snapshot and answer questions";

/// Question asked when the user presses the ask button
pub const DEFAULT_QUESTION: &str = "What is the testID of the component that turns on the lights? It is usually written like this: \"testID\": \"test_id_value\". Please respond with exactly the testID, and nothing else. When you respond, omit the quotes.";

/// Join the question and the pretty-printed snapshot into the user message
pub fn build_user_prompt(question: &str, snapshot_json: &str) -> String {
    format!("{}\n\nComponent Snapshot: {}", question, snapshot_json)
}
