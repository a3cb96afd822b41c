//! Screen controller: owns the screen state and runs the ask flow
//!
//! Pressing the ask button captures a snapshot, spawns the completion request
//! and returns immediately. Finished requests come back as [`Completion`]s on
//! a channel owned by the controller and are applied in arrival order, so when
//! several requests overlap the last one to resolve decides the state.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::actions::{ActionDispatcher, DispatchOutcome};
use crate::config::DEFAULT_QUESTION;
use crate::error::{AssistError, Result};
use crate::model::{trimmed_reply, CompletionBackend};
use crate::snapshot_saver::SnapshotSaver;
use crate::view::{app_screen, render, Intent, Snapshot, UiSurface, Widget};

/// What the screen shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScreenState {
    /// No response text shown
    #[default]
    Idle,
    /// The last assistant reply is shown
    Responded(String),
}

/// Inputs to the screen state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    Replied(String),
    Failed,
}

impl ScreenState {
    /// Next state after `event`. A failure leaves the current state untouched.
    pub fn reduce(self, event: ScreenEvent) -> ScreenState {
        match event {
            ScreenEvent::Replied(text) => ScreenState::Responded(text),
            ScreenEvent::Failed => self,
        }
    }

    pub fn response(&self) -> Option<&str> {
        match self {
            ScreenState::Idle => None,
            ScreenState::Responded(text) => Some(text),
        }
    }
}

/// A finished completion request
#[derive(Debug, Clone)]
pub struct Completion {
    pub request_id: u64,
    /// The snapshot sent with the request
    pub snapshot: Snapshot,
    pub reply: Option<String>,
}

/// Result of applying a completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    /// The request failed; nothing was pressed
    NoResponse { request_id: u64 },
    /// The reply named an element and it was pressed
    Pressed {
        request_id: u64,
        reply: String,
        outcome: DispatchOutcome,
    },
}

/// Result of a press on the host screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenPress {
    pub intent: Intent,
    /// Set when the press started a completion request
    pub request_id: Option<u64>,
}

/// Drives the light switch screen
pub struct ScreenController {
    backend: Arc<dyn CompletionBackend>,
    dispatcher: ActionDispatcher<dyn UiSurface>,
    question: String,
    state: ScreenState,
    next_request_id: u64,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    snapshot_saver: Option<SnapshotSaver>,
}

impl ScreenController {
    /// Create a controller asking `backend` about trees rendered by `surface`
    pub fn new(backend: Arc<dyn CompletionBackend>, surface: Arc<dyn UiSurface>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            dispatcher: ActionDispatcher::new(surface),
            question: DEFAULT_QUESTION.to_string(),
            state: ScreenState::Idle,
            next_request_id: 0,
            completions_tx,
            completions_rx,
            snapshot_saver: None,
        }
    }

    /// Set the question sent with each snapshot
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    /// Save every captured snapshot
    pub fn with_snapshot_saver(mut self, saver: SnapshotSaver) -> Self {
        self.snapshot_saver = Some(saver);
        self
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn surface(&self) -> &Arc<dyn UiSurface> {
        self.dispatcher.surface()
    }

    /// The full host screen for the current state
    pub fn screen(&self) -> Widget {
        app_screen(self.state.response())
    }

    /// Capture a snapshot and start a completion request for it
    pub async fn ask(&mut self) -> Result<u64> {
        self.next_request_id += 1;
        let request_id = self.next_request_id;

        let snapshot = self.surface().snapshot()?;
        debug!("Component snapshot: {}", snapshot.to_pretty_json()?);

        if let Some(saver) = self.snapshot_saver.as_mut() {
            if let Err(e) = saver.save(&snapshot).await {
                warn!("Failed to save snapshot: {}", e);
            }
        }

        let backend = Arc::clone(&self.backend);
        let question = self.question.clone();
        let tx = self.completions_tx.clone();

        tokio::spawn(async move {
            let reply = backend.complete(&question, &snapshot).await;
            // The receiver lives as long as the controller; a dropped
            // controller has nobody left to show the reply to.
            let _ = tx.send(Completion {
                request_id,
                snapshot,
                reply,
            });
        });

        info!("Started completion request {}", request_id);
        Ok(request_id)
    }

    /// Wait for the next completion to resolve
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completions_rx.recv().await
    }

    /// Apply a finished completion: update the state, then press the named element.
    ///
    /// The state is updated before the press, so a reply naming no element
    /// is still shown while the lookup failure is returned.
    pub fn apply(&mut self, completion: Completion) -> Result<AskOutcome> {
        let Completion {
            request_id,
            snapshot,
            reply,
        } = completion;

        let Some(reply) = reply.and_then(|r| trimmed_reply(Some(r.as_str())).ok()) else {
            info!("Completion request {} returned no response", request_id);
            self.transition(ScreenEvent::Failed);
            return Ok(AskOutcome::NoResponse { request_id });
        };

        self.transition(ScreenEvent::Replied(reply.clone()));
        self.warn_if_tree_changed(request_id, &snapshot);

        let outcome = self.dispatcher.press(&reply)?;
        if let Intent::ShowAlert { title, message } = &outcome.intent {
            info!("Alert: {}: {}", title, message);
        }

        Ok(AskOutcome::Pressed {
            request_id,
            reply,
            outcome,
        })
    }

    /// Start a request, wait for the next completion and apply it
    pub async fn ask_and_apply(&mut self) -> Result<AskOutcome> {
        let request_id = self.ask().await?;
        match self.next_completion().await {
            Some(completion) => self.apply(completion),
            None => Ok(AskOutcome::NoResponse { request_id }),
        }
    }

    /// Press an element of the host screen by identifier
    pub async fn press_on_screen(&mut self, identifier: &str) -> Result<ScreenPress> {
        let tree = render(&self.screen());
        let path = tree
            .find_test_id(identifier)?
            .ok_or_else(|| AssistError::ElementNotFound(identifier.to_string()))?;
        let intent = tree
            .handler(&path)
            .cloned()
            .ok_or_else(|| AssistError::NotInteractive(identifier.to_string()))?;

        let request_id = match &intent {
            Intent::AskAssistant => Some(self.ask().await?),
            Intent::ShowAlert { title, message } => {
                info!("Alert: {}: {}", title, message);
                None
            }
        };

        Ok(ScreenPress { intent, request_id })
    }

    fn transition(&mut self, event: ScreenEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(event);
    }

    /// The dispatcher acts on a fresh render, not on the snapshot the model saw
    fn warn_if_tree_changed(&self, request_id: u64, sent: &Snapshot) {
        match self.surface().snapshot() {
            Ok(current) if current != *sent => warn!(
                "UI tree changed between request {} and dispatch; acting on the current tree",
                request_id
            ),
            Ok(_) => {}
            Err(e) => debug!("Could not re-capture tree for comparison: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{
        app_content, render_text, TestRenderer, ASK_BUTTON_ID, LIGHT_SWITCH_ID,
        LIGHT_SWITCH_TITLE,
    };
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::tempdir;

    /// Replies from a script, each after its own delay
    struct ScriptedBackend {
        replies: Mutex<VecDeque<(u64, Option<&'static str>)>>,
        seen: Mutex<Vec<(String, Snapshot)>>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<(u64, Option<&'static str>)>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }

        fn replying(reply: Option<&'static str>) -> Arc<Self> {
            Self::new(vec![(0, reply)])
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, prompt: &str, snapshot: &Snapshot) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((prompt.to_string(), snapshot.clone()));
            let (delay, reply) = self.replies.lock().unwrap().pop_front()?;
            tokio::time::sleep(Duration::from_millis(delay)).await;
            reply.map(str::to_string)
        }
    }

    fn controller(backend: Arc<ScriptedBackend>) -> (Arc<TestRenderer>, ScreenController) {
        let surface = Arc::new(TestRenderer::new(app_content));
        let controller = ScreenController::new(backend, surface.clone());
        (surface, controller)
    }

    #[test]
    fn test_reduce() {
        let idle = ScreenState::Idle;
        assert_eq!(idle.clone().reduce(ScreenEvent::Failed), ScreenState::Idle);
        assert_eq!(
            idle.reduce(ScreenEvent::Replied("a".to_string())),
            ScreenState::Responded("a".to_string())
        );

        let responded = ScreenState::Responded("a".to_string());
        assert_eq!(
            responded.clone().reduce(ScreenEvent::Failed),
            ScreenState::Responded("a".to_string())
        );
        assert_eq!(
            responded.reduce(ScreenEvent::Replied("b".to_string())),
            ScreenState::Responded("b".to_string())
        );
    }

    #[tokio::test]
    async fn test_reply_is_trimmed_shown_and_pressed_once() {
        let backend = ScriptedBackend::replying(Some(" light_switch \n"));
        let (surface, mut controller) = controller(backend);

        let outcome = controller.ask_and_apply().await.unwrap();

        match outcome {
            AskOutcome::Pressed { reply, outcome, .. } => {
                assert_eq!(reply, "light_switch");
                assert_eq!(outcome.element.test_id, LIGHT_SWITCH_ID);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(
            controller.state(),
            &ScreenState::Responded("light_switch".to_string())
        );
        assert_eq!(
            surface.fired_intents(),
            vec![Intent::alert(LIGHT_SWITCH_TITLE, "The lights are on!")]
        );

        let shown = render_text(render(&controller.screen()).root());
        assert!(shown.contains("ChatGPT Response: light_switch\n"));
    }

    #[tokio::test]
    async fn test_failed_completion_stays_idle_and_presses_nothing() {
        let backend = ScriptedBackend::replying(None);
        let (surface, mut controller) = controller(backend);

        let outcome = controller.ask_and_apply().await.unwrap();

        assert_eq!(outcome, AskOutcome::NoResponse { request_id: 1 });
        assert_eq!(controller.state(), &ScreenState::Idle);
        assert!(surface.fired_intents().is_empty());
    }

    #[tokio::test]
    async fn test_blank_reply_counts_as_failure() {
        let backend = ScriptedBackend::replying(Some("  \n"));
        let (surface, mut controller) = controller(backend);

        let outcome = controller.ask_and_apply().await.unwrap();

        assert!(matches!(outcome, AskOutcome::NoResponse { .. }));
        assert_eq!(controller.state(), &ScreenState::Idle);
        assert!(surface.fired_intents().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_identifier_is_surfaced() {
        let backend = ScriptedBackend::replying(Some("nonexistent_id"));
        let (surface, mut controller) = controller(backend);

        let err = controller.ask_and_apply().await.unwrap_err();

        assert!(matches!(err, AssistError::ElementNotFound(ref id) if id == "nonexistent_id"));
        assert_eq!(
            controller.state(),
            &ScreenState::Responded("nonexistent_id".to_string())
        );
        assert!(surface.fired_intents().is_empty());
    }

    #[tokio::test]
    async fn test_failure_after_reply_keeps_previous_reply() {
        let backend = ScriptedBackend::new(vec![(0, Some("light_switch")), (0, None)]);
        let (_surface, mut controller) = controller(backend);

        controller.ask_and_apply().await.unwrap();
        controller.ask_and_apply().await.unwrap();

        assert_eq!(
            controller.state(),
            &ScreenState::Responded("light_switch".to_string())
        );
    }

    #[tokio::test]
    async fn test_backend_receives_question_and_captured_snapshot() {
        let backend = ScriptedBackend::replying(Some("light_switch"));
        let (surface, controller) = controller(backend.clone());
        let mut controller = controller.with_question("Which one?");

        controller.ask_and_apply().await.unwrap();

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "Which one?");
        assert_eq!(seen[0].1, surface.snapshot().unwrap());
    }

    #[tokio::test]
    async fn test_overlapping_requests_last_to_resolve_wins() {
        // The first request resolves after the second one
        let backend = ScriptedBackend::new(vec![(80, Some("slow")), (5, Some(LIGHT_SWITCH_ID))]);
        let (surface, mut controller) = controller(backend.clone());

        let first = controller.ask().await.unwrap();
        let second = controller.ask().await.unwrap();

        let early = controller.next_completion().await.unwrap();
        assert_eq!(early.request_id, second);
        assert!(controller.apply(early).is_ok());
        assert_eq!(
            controller.state(),
            &ScreenState::Responded(LIGHT_SWITCH_ID.to_string())
        );

        let late = controller.next_completion().await.unwrap();
        assert_eq!(late.request_id, first);
        assert!(controller.apply(late).is_err());
        assert_eq!(controller.state(), &ScreenState::Responded("slow".to_string()));

        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
        assert_eq!(surface.fired_intents().len(), 1);
    }

    #[tokio::test]
    async fn test_press_on_screen() {
        let backend = ScriptedBackend::replying(Some(LIGHT_SWITCH_ID));
        let (surface, mut controller) = controller(backend);

        let press = controller.press_on_screen(LIGHT_SWITCH_ID).await.unwrap();
        assert!(matches!(press.intent, Intent::ShowAlert { .. }));
        assert_eq!(press.request_id, None);
        assert_eq!(controller.state(), &ScreenState::Idle);

        let press = controller.press_on_screen(ASK_BUTTON_ID).await.unwrap();
        assert_eq!(press.intent, Intent::AskAssistant);
        assert_eq!(press.request_id, Some(1));

        let completion = controller.next_completion().await.unwrap();
        controller.apply(completion).unwrap();
        assert_eq!(surface.fired_intents().len(), 1);

        let err = controller.press_on_screen("missing").await.unwrap_err();
        assert!(matches!(err, AssistError::ElementNotFound(_)));
    }

    #[tokio::test]
    async fn test_ask_saves_snapshot() {
        let temp_dir = tempdir().unwrap();
        let saver = SnapshotSaver::new(temp_dir.path()).await.unwrap();
        let session_dir = saver.session_dir().to_path_buf();

        let backend = ScriptedBackend::replying(None);
        let (_surface, controller) = controller(backend);
        let mut controller = controller.with_snapshot_saver(saver);

        controller.ask_and_apply().await.unwrap();

        let saved: Vec<_> = std::fs::read_dir(&session_dir).unwrap().collect();
        assert_eq!(saved.len(), 1);
    }
}
