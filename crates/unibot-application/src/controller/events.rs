use unibot_core::session::SessionToken;
use uuid::Uuid;

use crate::render::RenderedView;

/// UI state changes emitted by the controller.
///
/// Front ends subscribe through an unbounded channel; dropping the receiver
/// simply silences the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    InputEnabled(bool),
    Typing(bool),
    ViewAppended(RenderedView),
    /// A table view changed visibility after a filter.
    ViewUpdated(RenderedView),
    TranscriptCleared,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// Another exchange was still in flight.
    Busy,
    /// The reply view appended to the transcript.
    Rendered(RenderedView),
}

impl SubmitOutcome {
    pub fn view(&self) -> Option<&RenderedView> {
        match self {
            Self::Rendered(view) => Some(view),
            _ => None,
        }
    }
}

/// Result of a clear request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    /// An exchange was still in flight; nothing was cleared.
    Busy,
    /// History and transcript wiped; carries the new session token.
    Cleared(SessionToken),
}

/// Outcome of filtering the latest student table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub view_id: Uuid,
    pub visible: usize,
    pub total: usize,
}
