use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, RwLock, mpsc};
use unibot_core::chat::{ChatReply, ChatTransport};
use unibot_core::error::{Result, UnibotError};
use unibot_core::history::{ChatMessageRecord, HistoryRepository};
use unibot_core::session::{SessionToken, SessionTokenStore};

use super::events::{ClearOutcome, ControllerEvent, FilterSummary, SubmitOutcome};
use crate::filter::FilterCommand;
use crate::render::{ActionKind, RenderedView, ResponseRenderer, ViewAction, ViewBody};

/// Orchestrates one chat widget.
///
/// Owns the session token, the transcript and the UI flags. At most one
/// exchange runs at a time; a second `submit` while the first is waiting
/// on the network returns [`SubmitOutcome::Busy`], and [`clear`](Self::clear)
/// refuses to run until that exchange has finished.
pub struct ChatController {
    transport: Arc<dyn ChatTransport>,
    history: Arc<dyn HistoryRepository>,
    sessions: Arc<dyn SessionTokenStore>,
    renderer: ResponseRenderer,
    session_token: RwLock<SessionToken>,
    transcript: Mutex<Vec<RenderedView>>,
    in_flight: AtomicBool,
    input_enabled: AtomicBool,
    typing: AtomicBool,
    events: Option<mpsc::UnboundedSender<ControllerEvent>>,
}

impl ChatController {
    /// Creates a controller, loading (or creating) the session token.
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        history: Arc<dyn HistoryRepository>,
        sessions: Arc<dyn SessionTokenStore>,
        renderer: ResponseRenderer,
    ) -> Result<Self> {
        let session_token = sessions.get_or_create()?;
        tracing::info!(session = %session_token, "chat controller ready");

        Ok(Self {
            transport,
            history,
            sessions,
            renderer,
            session_token: RwLock::new(session_token),
            transcript: Mutex::new(Vec::new()),
            in_flight: AtomicBool::new(false),
            input_enabled: AtomicBool::new(true),
            typing: AtomicBool::new(false),
            events: None,
        })
    }

    /// Streams UI changes to `sender`.
    pub fn with_events(mut self, sender: mpsc::UnboundedSender<ControllerEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Sends one user message and appends the reply to the transcript.
    ///
    /// The user record is stored before the network call. Only plain-text
    /// replies (failures included) are stored as bot records.
    pub async fn submit(&self, raw_input: &str) -> SubmitOutcome {
        let text = raw_input.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }
        let Some(exchange) = Exchange::begin(self) else {
            tracing::debug!("submit rejected, exchange in flight");
            return SubmitOutcome::Busy;
        };

        let token = self.session_token().await;
        self.push_view(self.renderer.render_user_message(text)).await;
        self.persist(ChatMessageRecord::from_user(text, &token)).await;
        self.set_input_enabled(false);

        self.set_typing(true);
        let response = self.transport.send(text, &token).await;
        self.set_typing(false);

        let reply = ChatReply::from(response);
        let bot_text = reply.text().map(str::to_string);
        let view = self.renderer.render_reply(reply);
        self.push_view(view.clone()).await;

        // Slot stays held until the bot record is stored; clear waits on it.
        if let Some(bot_text) = bot_text {
            self.persist(ChatMessageRecord::from_bot(bot_text, &token)).await;
        }
        drop(exchange);
        SubmitOutcome::Rendered(view)
    }

    /// Loads the complete student listing into the transcript.
    pub async fn view_all_students(&self) -> SubmitOutcome {
        let Some(exchange) = Exchange::begin(self) else {
            return SubmitOutcome::Busy;
        };
        self.set_input_enabled(false);

        self.set_typing(true);
        let listing = self.transport.fetch_all_students().await;
        self.set_typing(false);
        tracing::debug!(
            success = listing.success,
            students = listing.estudiantes.len(),
            "student listing received"
        );

        let view = self.renderer.render(listing.into_chat_response());
        self.push_view(view.clone()).await;
        drop(exchange);

        SubmitOutcome::Rendered(view)
    }

    /// Runs a button attached to a view.
    pub async fn run_action(&self, action: &ViewAction) -> SubmitOutcome {
        tracing::debug!(label = %action.label, "running view action");
        match &action.kind {
            ActionKind::SendMessage(message) => self.submit(message).await,
            ActionKind::FetchAllStudents => self.view_all_students().await,
        }
    }

    /// Appends the current session's stored messages to the transcript.
    ///
    /// Returns the number of restored messages.
    pub async fn restore_history(&self) -> Result<usize> {
        let token = self.session_token().await;
        let history = Arc::clone(&self.history);
        let session = token.clone();
        let records = blocking(move || history.load_for_session(&session)).await?;
        let views: Vec<RenderedView> = records
            .iter()
            .map(|record| self.renderer.render_record(record))
            .collect();

        let restored = views.len();
        self.transcript.lock().await.extend(views.iter().cloned());
        for view in views {
            self.emit(ControllerEvent::ViewAppended(view));
        }

        tracing::info!(restored, session = %token, "history restored");
        Ok(restored)
    }

    /// Wipes all stored history, starts a new session and empties the
    /// transcript.
    ///
    /// Holds the exchange slot while it runs, so a reply still on its way
    /// can never land in the new session; returns [`ClearOutcome::Busy`]
    /// instead.
    pub async fn clear(&self) -> Result<ClearOutcome> {
        let Some(_exchange) = Exchange::begin(self) else {
            tracing::debug!("clear rejected, exchange in flight");
            return Ok(ClearOutcome::Busy);
        };

        let history = Arc::clone(&self.history);
        let sessions = Arc::clone(&self.sessions);
        let token = blocking(move || {
            history.clear()?;
            sessions.regenerate()
        })
        .await?;
        *self.session_token.write().await = token.clone();
        self.transcript.lock().await.clear();
        self.emit(ControllerEvent::TranscriptCleared);

        tracing::info!(session = %token, "history cleared, new session started");
        Ok(ClearOutcome::Cleared(token))
    }

    /// Filters the most recent student table in the transcript.
    ///
    /// Returns `None` when the transcript holds no student table.
    pub async fn filter_last_table(&self, command: &FilterCommand) -> Option<FilterSummary> {
        let mut transcript = self.transcript.lock().await;
        let view = transcript
            .iter_mut()
            .rev()
            .find(|view| matches!(view.body, ViewBody::Students(_)))?;
        let ViewBody::Students(table) = &mut view.body else {
            return None;
        };

        let visible = command.apply(&mut table.rows);
        let summary = FilterSummary {
            view_id: view.id,
            visible,
            total: table.rows.len(),
        };
        self.emit(ControllerEvent::ViewUpdated(view.clone()));
        Some(summary)
    }

    pub async fn transcript(&self) -> Vec<RenderedView> {
        self.transcript.lock().await.clone()
    }

    pub async fn session_token(&self) -> SessionToken {
        self.session_token.read().await.clone()
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled.load(Ordering::SeqCst)
    }

    pub fn is_typing(&self) -> bool {
        self.typing.load(Ordering::SeqCst)
    }

    async fn push_view(&self, view: RenderedView) {
        self.transcript.lock().await.push(view.clone());
        self.emit(ControllerEvent::ViewAppended(view));
    }

    /// History failures never abort an exchange.
    async fn persist(&self, record: ChatMessageRecord) {
        let history = Arc::clone(&self.history);
        if let Err(e) = blocking(move || history.append(record)).await {
            tracing::warn!(error = %e, "failed to store chat message");
        }
    }

    fn set_input_enabled(&self, enabled: bool) {
        if self.input_enabled.swap(enabled, Ordering::SeqCst) != enabled {
            self.emit(ControllerEvent::InputEnabled(enabled));
        }
    }

    fn set_typing(&self, typing: bool) {
        if self.typing.swap(typing, Ordering::SeqCst) != typing {
            self.emit(ControllerEvent::Typing(typing));
        }
    }

    fn emit(&self, event: ControllerEvent) {
        if let Some(sender) = &self.events {
            let _ = sender.send(event);
        }
    }
}

/// Runs file-backed repository work on the blocking pool; the history file
/// lock may be held by another process.
async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| UnibotError::internal(format!("storage task failed: {e}")))?
}

/// Claim on the controller's single exchange slot.
///
/// Dropping it hides the typing indicator, re-enables input and frees the
/// slot, including when the owning future is cancelled mid-request.
struct Exchange<'a> {
    controller: &'a ChatController,
}

impl<'a> Exchange<'a> {
    fn begin(controller: &'a ChatController) -> Option<Self> {
        controller
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { controller })
    }
}

impl Drop for Exchange<'_> {
    fn drop(&mut self) {
        self.controller.set_typing(false);
        self.controller.set_input_enabled(true);
        self.controller.in_flight.store(false, Ordering::Release);
    }
}
