//! Application layer for unibot.
//!
//! Turns chat responses into view-models, filters rendered tables and
//! drives the chat exchange on top of the core traits.

pub mod controller;
pub mod filter;
pub mod render;

pub use controller::{ChatController, ClearOutcome, ControllerEvent, FilterSummary, SubmitOutcome};
pub use filter::FilterCommand;
pub use render::{RenderedView, ResponseRenderer};
