//! HttpChatTransport - JSON over HTTP to the chatbot backend.
//!
//! `POST {base_url}/chat` for messages and `GET {base_url}/api/estudiantes/todos`
//! for the full student listing. Every failure is folded into a synthesized
//! response so callers only ever see content.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use unibot_core::chat::{ChatRequest, ChatResponse, ChatTransport, StudentsResponse};
use unibot_core::config::ClientConfig;
use unibot_core::error::{Result, UnibotError};
use unibot_core::session::SessionToken;

const CHAT_PATH: &str = "chat";
const ALL_STUDENTS_PATH: &str = "api/estudiantes/todos";

/// Why a single request attempt failed.
#[derive(Debug, Error)]
enum TransportError {
    #[error("request failed: {message}")]
    Request { message: String, is_retryable: bool },
    #[error("backend answered {0}")]
    Status(StatusCode),
    #[error("unreadable response body: {0}")]
    Decode(String),
}

impl TransportError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Request { is_retryable: true, .. })
    }
}

/// [`ChatTransport`] backed by `reqwest`.
///
/// Requests are bounded by the configured timeout. Connect errors and
/// timeouts are retried once when `retry_transient` is on; HTTP error
/// statuses and malformed bodies are not.
#[derive(Clone)]
pub struct HttpChatTransport {
    client: Client,
    chat_url: String,
    students_url: String,
    retry_transient: bool,
}

impl HttpChatTransport {
    /// Builds a transport from the client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| UnibotError::Transport(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            chat_url: config.endpoint(CHAT_PATH),
            students_url: config.endpoint(ALL_STUDENTS_PATH),
            retry_transient: config.retry_transient,
        })
    }

    /// Overrides the retry policy after construction.
    pub fn with_retry(mut self, retry_transient: bool) -> Self {
        self.retry_transient = retry_transient;
        self
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Runs one request, retrying once on a transient failure.
    async fn execute_with_retry<T, F>(&self, build: F) -> std::result::Result<T, TransportError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        match execute_once(build()).await {
            Err(err) if self.retry_transient && err.is_retryable() => {
                tracing::warn!(error = %err, "transient failure, retrying once");
                execute_once(build()).await
            }
            outcome => outcome,
        }
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, message: &str, session_token: &SessionToken) -> ChatResponse {
        let body = ChatRequest {
            message,
            session_id: session_token.as_str(),
        };

        let started = std::time::Instant::now();
        let outcome = self
            .execute_with_retry::<ChatResponse, _>(|| self.client.post(&self.chat_url).json(&body))
            .await;

        match outcome {
            Ok(response) => {
                tracing::debug!(
                    intent = response.intent.as_deref().unwrap_or("-"),
                    success = response.success,
                    elapsed_ms = elapsed_ms(started.elapsed()),
                    "chat reply received"
                );
                response
            }
            Err(err) => {
                tracing::warn!(error = %err, url = %self.chat_url, "chat request failed");
                ChatResponse::connection_failure()
            }
        }
    }

    async fn fetch_all_students(&self) -> StudentsResponse {
        match self
            .execute_with_retry::<StudentsResponse, _>(|| self.client.get(&self.students_url))
            .await
        {
            Ok(response) => {
                tracing::debug!(count = response.estudiantes.len(), "student listing received");
                response
            }
            Err(err) => {
                tracing::warn!(error = %err, url = %self.students_url, "student listing failed");
                StudentsResponse::unavailable()
            }
        }
    }
}

async fn execute_once<T: DeserializeOwned>(
    request: RequestBuilder,
) -> std::result::Result<T, TransportError> {
    let response = request.send().await.map_err(|err| TransportError::Request {
        message: err.to_string(),
        is_retryable: err.is_connect() || err.is_timeout(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status(status));
    }

    let bytes = response.bytes().await.map_err(|err| TransportError::Request {
        message: err.to_string(),
        is_retryable: err.is_timeout(),
    })?;

    serde_json::from_slice(&bytes).map_err(|err| TransportError::Decode(err.to_string()))
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
