//! Chat history domain module.

mod message;
mod repository;

pub use message::ChatMessageRecord;
pub use repository::HistoryRepository;
