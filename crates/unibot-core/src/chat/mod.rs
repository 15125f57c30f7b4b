//! Chat exchange domain module.
//!
//! # Module Structure
//!
//! - `payload`: structured payloads carried by a reply (statistics, students, careers, report)
//! - `response`: wire DTOs for `POST /chat` and `GET /api/estudiantes/todos`
//! - `intent`: the known intent tags
//! - `reply`: the typed [`ChatReply`] sum type derived from a response
//! - `transport`: the [`ChatTransport`] trait

mod intent;
mod payload;
mod reply;
mod response;
mod transport;

pub use intent::Intent;
pub use payload::{Career, CareerCount, PaymentStatus, Report, Statistics, Student};
pub use reply::ChatReply;
pub use response::{
    CONNECTION_ERROR_TEXT, ChatRequest, ChatResponse, StudentsResponse, UNKNOWN_ERROR_TEXT,
};
pub use transport::ChatTransport;
