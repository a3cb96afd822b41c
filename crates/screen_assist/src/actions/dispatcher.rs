//! Dispatcher that turns an assistant reply into a press

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{AssistError, Result};
use crate::view::{Element, EventKind, Intent, UiSurface};

/// Result of a dispatched press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub element: Element,
    pub intent: Intent,
}

/// Presses elements on a `UiSurface` by identifier
pub struct ActionDispatcher<S: ?Sized> {
    surface: Arc<S>,
}

impl<S: ?Sized> Clone for ActionDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            surface: Arc::clone(&self.surface),
        }
    }
}

impl<S: UiSurface + ?Sized> ActionDispatcher<S> {
    pub fn new(surface: Arc<S>) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    /// Press the element whose identifier equals `identifier`.
    ///
    /// The identifier is matched exactly; callers are expected to have trimmed
    /// it already. Fails with `ElementNotFound` when the freshly rendered tree
    /// has no such element.
    pub fn press(&self, identifier: &str) -> Result<DispatchOutcome> {
        let element = match self.surface.find(identifier)? {
            Some(element) => element,
            None => {
                warn!("No element matches identifier {:?}", identifier);
                return Err(AssistError::ElementNotFound(identifier.to_string()));
            }
        };

        let intent = self.surface.dispatch(&element, EventKind::Press)?;
        info!("Pressed {}", element);

        Ok(DispatchOutcome { element, intent })
    }
}
