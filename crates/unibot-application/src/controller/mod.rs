//! Chat orchestration.
//!
//! # Module Structure
//!
//! - `chat_controller`: [`ChatController`], the widget state machine
//! - `events`: UI events and operation outcomes

mod chat_controller;
mod events;

pub use chat_controller::ChatController;
pub use events::{ClearOutcome, ControllerEvent, FilterSummary, SubmitOutcome};
