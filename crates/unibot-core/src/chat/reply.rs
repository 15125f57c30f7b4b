//! Typed view of a chat response.

use super::intent::Intent;
use super::payload::{Career, Report, Statistics, Student};
use super::response::{CONNECTION_ERROR_TEXT, ChatResponse, UNKNOWN_ERROR_TEXT};

/// What a chat response asks the front end to show.
///
/// Built from a [`ChatResponse`] by checking `success`, then the `intent`
/// tag, then the presence of the payload field that tag names. A tag whose
/// payload is absent, an unknown tag and a missing tag all fall back to
/// [`ChatReply::PlainText`]. Presence follows JSON truthiness: an empty
/// list or object still counts as present.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    /// Ordinary bot message.
    PlainText(String),
    /// `success == false`; carries the text to show.
    Failure(String),
    Statistics(Statistics),
    PendingStudents(Vec<Student>),
    Careers(Vec<Career>),
    Report(Report),
    AllStudents(Vec<Student>),
}

impl ChatReply {
    /// `true` for replies shown as an unformatted message.
    pub fn is_plain_text(&self) -> bool {
        matches!(self, Self::PlainText(_) | Self::Failure(_))
    }

    /// The message text for plain-text replies.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::PlainText(text) | Self::Failure(text) => Some(text),
            _ => None,
        }
    }

    /// `bot_response` is never shown for an application failure.
    fn failure_text(response: ChatResponse) -> String {
        if response.connection_failed {
            return CONNECTION_ERROR_TEXT.to_string();
        }
        let error = response.error.as_deref().unwrap_or(UNKNOWN_ERROR_TEXT);
        format!("❌ Error: {error}")
    }
}

impl From<ChatResponse> for ChatReply {
    fn from(mut response: ChatResponse) -> Self {
        if !response.success {
            return Self::Failure(Self::failure_text(response));
        }

        let structured = match response.intent.as_deref().and_then(Intent::parse) {
            Some(Intent::Statistics) => response.estadisticas.take().map(Self::Statistics),
            Some(Intent::PendingStudents) => {
                response.estudiantes.take().map(Self::PendingStudents)
            }
            Some(Intent::Careers) => response.carreras.take().map(Self::Careers),
            Some(Intent::Report) => response.reporte.take().map(Self::Report),
            Some(Intent::AllStudents) => response.estudiantes.take().map(Self::AllStudents),
            None => None,
        };

        structured.unwrap_or_else(|| Self::PlainText(response.bot_response.unwrap_or_default()))
    }
}
