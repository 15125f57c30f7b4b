//! Wire DTOs for the chatbot backend.

use super::payload::{Career, Report, Statistics, Student};
use serde::{Deserialize, Serialize};

/// Text shown when the backend cannot be reached or answers garbage.
pub const CONNECTION_ERROR_TEXT: &str = "❌ Error de conexión";
/// Text shown for an application failure without any error detail.
pub const UNKNOWN_ERROR_TEXT: &str = "Error desconocido";

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub session_id: &'a str,
}

/// Body returned by `POST /chat`.
///
/// Field presence, not a discriminant, tells which payload is populated;
/// see [`ChatReply`](super::ChatReply) for the typed view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::payload::optional_amount"
    )]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estadisticas: Option<Statistics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estudiantes: Option<Vec<Student>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carreras: Option<Vec<Career>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporte: Option<Report>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set only on responses synthesized by a transport that never got a
    /// usable answer. Not part of the wire format.
    #[serde(skip)]
    pub connection_failed: bool,
}

impl ChatResponse {
    /// Synthesized response for any transport-level failure.
    pub fn connection_failure() -> Self {
        Self {
            success: false,
            bot_response: Some(CONNECTION_ERROR_TEXT.to_string()),
            connection_failed: true,
            ..Self::default()
        }
    }

    /// A successful plain-text reply.
    pub fn text(bot_response: impl Into<String>) -> Self {
        Self {
            success: true,
            bot_response: Some(bot_response.into()),
            ..Self::default()
        }
    }

    /// A successful full-listing reply, as built from `GET /api/estudiantes/todos`.
    pub fn all_students(estudiantes: Vec<Student>) -> Self {
        Self {
            success: true,
            intent: Some(super::Intent::AllStudents.as_ref().to_string()),
            estudiantes: Some(estudiantes),
            ..Self::default()
        }
    }
}

/// Body returned by `GET /api/estudiantes/todos`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub estudiantes: Vec<Student>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StudentsResponse {
    /// Synthesized listing for any transport-level failure.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Converts the listing into a chat response so it flows through the
    /// same renderer as chat replies.
    ///
    /// A failure carrying server error text stays an application failure;
    /// one without it is treated as a connection failure.
    pub fn into_chat_response(self) -> ChatResponse {
        match (self.success, self.error) {
            (true, _) => ChatResponse::all_students(self.estudiantes),
            (false, Some(error)) => ChatResponse {
                success: false,
                error: Some(error),
                ..ChatResponse::default()
            },
            (false, None) => ChatResponse::connection_failure(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let body = serde_json::to_value(ChatRequest {
            message: "hola",
            session_id: "session-1-a",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"message": "hola", "session_id": "session-1-a"})
        );
    }

    #[test]
    fn test_sparse_response_parses() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"success": true, "bot_response": "¡Hola!", "intent": "greeting", "confidence": 0.9}"#,
        )
        .unwrap();
        assert!(response.success);
        assert_eq!(response.intent.as_deref(), Some("greeting"));
        assert!(response.carreras.is_none());
    }

    #[test]
    fn test_string_figures_still_parse() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"success": true, "intent": "carreras", "confidence": "0.8",
                "estadisticas": {"total_estudiantes": 8.0},
                "carreras": [{"codigo": "ING01", "costo_inscripcion": "1500.00"}]}"#,
        )
        .unwrap();
        assert_eq!(response.confidence, Some(0.8));
        assert_eq!(response.estadisticas.map(|s| s.total_estudiantes), Some(8));
        assert_eq!(response.carreras.unwrap()[0].costo_inscripcion, Some(1500.0));
    }

    #[test]
    fn test_missing_success_is_failure() {
        let response: ChatResponse = serde_json::from_str(r#"{"bot_response": "x"}"#).unwrap();
        assert!(!response.success);
    }

    #[test]
    fn test_students_failure_becomes_connection_failure() {
        let response = StudentsResponse::unavailable().into_chat_response();
        assert!(!response.success);
        assert_eq!(response.bot_response.as_deref(), Some(CONNECTION_ERROR_TEXT));
        assert!(response.connection_failed);
        assert!(response.error.is_none());
    }

    #[test]
    fn test_students_server_error_is_kept() {
        let listing: StudentsResponse =
            serde_json::from_str(r#"{"success": false, "error": "Error interno"}"#).unwrap();
        let response = listing.into_chat_response();
        assert!(!response.connection_failed);
        assert_eq!(response.error.as_deref(), Some("Error interno"));
    }

    #[test]
    fn test_connection_flag_is_not_on_the_wire() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"success": false, "connection_failed": true}"#).unwrap();
        assert!(!parsed.connection_failed);

        let body = serde_json::to_value(ChatResponse::connection_failure()).unwrap();
        assert!(body.get("connection_failed").is_none());
    }
}
