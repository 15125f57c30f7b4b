use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use tempfile::TempDir;
use tokio::sync::{Notify, mpsc};

use unibot_application::render::{
    ActionKind, Author, Clock, MessageView, ResponseRenderer, TableKind, ViewBody,
};
use unibot_application::{
    ChatController, ClearOutcome, ControllerEvent, FilterCommand, SubmitOutcome,
};
use unibot_core::chat::{CONNECTION_ERROR_TEXT, ChatResponse, ChatTransport, Student, StudentsResponse};
use unibot_core::config::ClientConfig;
use unibot_core::error::Result;
use unibot_core::history::{ChatMessageRecord, HistoryRepository};
use unibot_core::session::{SessionToken, SessionTokenStore};
use unibot_infrastructure::{TomlHistoryRepository, TomlSessionStore, UnibotPaths};
use unibot_interaction::HttpChatTransport;

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryHistory {
    records: Mutex<Vec<ChatMessageRecord>>,
}

impl MemoryHistory {
    fn texts(&self) -> Vec<(bool, String)> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.is_from_user, r.text.clone()))
            .collect()
    }

    fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl HistoryRepository for MemoryHistory {
    fn append(&self, record: ChatMessageRecord) -> Result<()> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }

    fn load_for_session(&self, token: &SessionToken) -> Result<Vec<ChatMessageRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.belongs_to(token))
            .cloned()
            .collect())
    }

    fn clear(&self) -> Result<()> {
        self.records.lock().unwrap().clear();
        Ok(())
    }
}

struct CountingSessions {
    generated: Mutex<u32>,
}

impl CountingSessions {
    fn new() -> Self {
        Self {
            generated: Mutex::new(1),
        }
    }
}

impl SessionTokenStore for CountingSessions {
    fn get_or_create(&self) -> Result<SessionToken> {
        let n = *self.generated.lock().unwrap();
        Ok(SessionToken::from_stored(format!("session-{n}-test")))
    }

    fn regenerate(&self) -> Result<SessionToken> {
        let mut n = self.generated.lock().unwrap();
        *n += 1;
        Ok(SessionToken::from_stored(format!("session-{n}-test")))
    }
}

struct ManualClock(Mutex<DateTime<Local>>);

impl ManualClock {
    fn at(hour: u32, minute: u32) -> Arc<Self> {
        Arc::new(Self(Mutex::new(time(hour, minute))))
    }

    fn set(&self, hour: u32, minute: u32) {
        *self.0.lock().unwrap() = time(hour, minute);
    }
}

fn time(hour: u32, minute: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 9, 2, hour, minute, 0).unwrap()
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.0.lock().unwrap()
    }
}

/// Replays canned responses and records what it saw at send time.
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<ChatResponse>>,
    students: Mutex<Option<StudentsResponse>>,
    sent: Mutex<Vec<(String, String)>>,
    history_len_at_send: Mutex<Vec<usize>>,
    observed_history: Option<Arc<MemoryHistory>>,
    gate: Option<Arc<Notify>>,
    clock_on_send: Option<(Arc<ManualClock>, u32, u32)>,
}

impl ScriptedTransport {
    fn replying(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(&self, message: &str, session_token: &SessionToken) -> ChatResponse {
        self.sent
            .lock()
            .unwrap()
            .push((message.to_string(), session_token.to_string()));
        if let Some(history) = &self.observed_history {
            self.history_len_at_send.lock().unwrap().push(history.len());
        }
        if let Some((clock, hour, minute)) = &self.clock_on_send {
            clock.set(*hour, *minute);
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(ChatResponse::connection_failure)
    }

    async fn fetch_all_students(&self) -> StudentsResponse {
        self.students
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(StudentsResponse::unavailable)
    }
}

struct Harness {
    controller: Arc<ChatController>,
    transport: Arc<ScriptedTransport>,
    history: Arc<MemoryHistory>,
}

fn harness_with(transport: ScriptedTransport, history: Arc<MemoryHistory>) -> Harness {
    let transport = Arc::new(transport);
    let controller = ChatController::new(
        transport.clone(),
        history.clone(),
        Arc::new(CountingSessions::new()),
        ResponseRenderer::new(ManualClock::at(10, 0)),
    )
    .unwrap();
    Harness {
        controller: Arc::new(controller),
        transport,
        history,
    }
}

fn harness(responses: Vec<ChatResponse>) -> Harness {
    harness_with(
        ScriptedTransport::replying(responses),
        Arc::new(MemoryHistory::default()),
    )
}

fn careers_response() -> ChatResponse {
    serde_json::from_str(
        r#"{"success": true, "intent": "carreras", "bot_response": "Estas son las carreras",
            "carreras": [{"codigo": "ING01", "nombre": "Ingeniería", "duracion_semestres": 8, "costo_inscripcion": 1500}]}"#,
    )
    .unwrap()
}

fn student(matricula: &str, nombre: &str, estado: &str) -> Student {
    Student {
        matricula: matricula.to_string(),
        nombre: nombre.to_string(),
        apellido: "Test".to_string(),
        carrera: "Ingeniería".to_string(),
        estado: Some(estado.to_string()),
        ..Student::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let h = harness(vec![]);

    assert_eq!(h.controller.submit("   \n\t").await, SubmitOutcome::Ignored);

    assert!(h.controller.transcript().await.is_empty());
    assert_eq!(h.history.len(), 0);
    assert!(h.transport.sent_messages().is_empty());
    assert!(h.controller.input_enabled());
}

#[tokio::test]
async fn test_user_record_stored_before_network() {
    let history = Arc::new(MemoryHistory::default());
    let transport = ScriptedTransport {
        observed_history: Some(history.clone()),
        ..ScriptedTransport::replying(vec![ChatResponse::text("¡Hola!")])
    };
    let h = harness_with(transport, history);

    h.controller.submit("  hola  ").await;

    assert_eq!(*h.transport.history_len_at_send.lock().unwrap(), vec![1]);
    assert_eq!(h.transport.sent_messages(), vec!["hola".to_string()]);
    assert_eq!(
        h.history.texts(),
        vec![(true, "hola".to_string()), (false, "¡Hola!".to_string())]
    );
}

#[tokio::test]
async fn test_table_reply_is_not_stored() {
    let h = harness(vec![careers_response()]);

    let outcome = h.controller.submit("carreras disponibles").await;

    let view = outcome.view().unwrap();
    let ViewBody::Careers(table) = &view.body else {
        panic!("expected careers table");
    };
    assert_eq!(table.rows, vec![vec!["ING01", "Ingeniería", "8 semestres", "$1500"]]);
    assert_eq!(h.history.texts(), vec![(true, "carreras disponibles".to_string())]);
    assert_eq!(h.controller.transcript().await.len(), 2);
}

#[tokio::test]
async fn test_failure_reply_is_rendered_and_stored() {
    let failure: ChatResponse =
        serde_json::from_str(r#"{"success": false, "error": "Base de datos no disponible"}"#).unwrap();
    let h = harness(vec![failure]);

    let outcome = h.controller.submit("estadísticas").await;

    assert_eq!(
        outcome.view().unwrap().body,
        ViewBody::Message(MessageView {
            author: Author::Bot,
            text: "❌ Error: Base de datos no disponible".to_string(),
            is_error: true,
        })
    );
    assert_eq!(
        h.history.texts().last().unwrap(),
        &(false, "❌ Error: Base de datos no disponible".to_string())
    );
    assert!(h.controller.input_enabled());
    assert!(!h.controller.is_typing());
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_busy() {
    let gate = Arc::new(Notify::new());
    let transport = ScriptedTransport {
        gate: Some(gate.clone()),
        ..ScriptedTransport::replying(vec![ChatResponse::text("primera")])
    };
    let h = harness_with(transport, Arc::new(MemoryHistory::default()));

    let controller = h.controller.clone();
    let first = tokio::spawn(async move { controller.submit("uno").await });

    while !h.controller.is_typing() {
        tokio::task::yield_now().await;
    }
    assert!(!h.controller.input_enabled());
    assert_eq!(h.controller.submit("dos").await, SubmitOutcome::Busy);
    assert_eq!(h.controller.view_all_students().await, SubmitOutcome::Busy);

    gate.notify_one();
    let outcome = first.await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::Rendered(_)));
    assert_eq!(h.transport.sent_messages(), vec!["uno".to_string()]);
    assert!(h.controller.input_enabled());
    assert!(!h.controller.is_typing());
}

#[tokio::test]
async fn test_events_follow_exchange_order() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let transport = Arc::new(ScriptedTransport::replying(vec![ChatResponse::text("¡Hola!")]));
    let controller = ChatController::new(
        transport,
        Arc::new(MemoryHistory::default()),
        Arc::new(CountingSessions::new()),
        ResponseRenderer::new(ManualClock::at(10, 0)),
    )
    .unwrap()
    .with_events(tx);

    controller.submit("hola").await;
    drop(controller);

    let mut kinds = Vec::new();
    while let Some(event) = rx.recv().await {
        kinds.push(match event {
            ControllerEvent::InputEnabled(enabled) => format!("input:{enabled}"),
            ControllerEvent::Typing(typing) => format!("typing:{typing}"),
            ControllerEvent::ViewAppended(_) => "view".to_string(),
            ControllerEvent::ViewUpdated(_) => "updated".to_string(),
            ControllerEvent::TranscriptCleared => "cleared".to_string(),
        });
    }
    assert_eq!(
        kinds,
        vec![
            "view",
            "input:false",
            "typing:true",
            "typing:false",
            "view",
            "input:true"
        ]
    );
}

#[tokio::test]
async fn test_reply_stamped_at_render_time() {
    let clock = ManualClock::at(10, 0);
    let transport = ScriptedTransport {
        clock_on_send: Some((clock.clone(), 10, 7)),
        ..ScriptedTransport::replying(vec![ChatResponse::text("listo")])
    };
    let controller = ChatController::new(
        Arc::new(transport),
        Arc::new(MemoryHistory::default()),
        Arc::new(CountingSessions::new()),
        ResponseRenderer::new(clock),
    )
    .unwrap();

    controller.submit("hola").await;

    let stamps: Vec<String> = controller
        .transcript()
        .await
        .into_iter()
        .map(|view| view.timestamp)
        .collect();
    assert_eq!(stamps, vec!["10:00".to_string(), "10:07".to_string()]);
}

#[tokio::test]
async fn test_clear_starts_new_session() {
    let h = harness(vec![ChatResponse::text("¡Hola!")]);
    h.controller.submit("hola").await;
    let before = h.controller.session_token().await;

    let ClearOutcome::Cleared(after) = h.controller.clear().await.unwrap() else {
        panic!("clear should run when idle");
    };

    assert_ne!(before, after);
    assert_eq!(h.controller.session_token().await, after);
    assert!(h.controller.transcript().await.is_empty());
    assert_eq!(h.history.len(), 0);
}

#[tokio::test]
async fn test_clear_while_reply_pending_keeps_sessions_apart() {
    let gate = Arc::new(Notify::new());
    let transport = ScriptedTransport {
        gate: Some(gate.clone()),
        ..ScriptedTransport::replying(vec![ChatResponse::text("respuesta vieja")])
    };
    let h = harness_with(transport, Arc::new(MemoryHistory::default()));
    let old_token = h.controller.session_token().await;

    let controller = h.controller.clone();
    let pending = tokio::spawn(async move { controller.submit("hola").await });
    while !h.controller.is_typing() {
        tokio::task::yield_now().await;
    }

    assert_eq!(h.controller.clear().await.unwrap(), ClearOutcome::Busy);
    assert_eq!(h.controller.session_token().await, old_token);

    gate.notify_one();
    pending.await.unwrap();
    assert_eq!(
        h.history.texts(),
        vec![(true, "hola".to_string()), (false, "respuesta vieja".to_string())]
    );

    let ClearOutcome::Cleared(new_token) = h.controller.clear().await.unwrap() else {
        panic!("clear should run once the reply has landed");
    };
    assert_ne!(new_token, old_token);
    assert_eq!(h.history.len(), 0);
    assert!(h.controller.transcript().await.is_empty());
    assert!(h.controller.input_enabled());
}

#[tokio::test]
async fn test_restore_history_only_current_session() {
    let history = Arc::new(MemoryHistory::default());
    let current = SessionToken::from_stored("session-1-test");
    let other = SessionToken::from_stored("session-9-other");
    history
        .append(ChatMessageRecord::from_user("hola", &current))
        .unwrap();
    history
        .append(ChatMessageRecord::from_user("ajeno", &other))
        .unwrap();
    history
        .append(ChatMessageRecord::from_bot("¡Hola!", &current))
        .unwrap();
    let h = harness_with(ScriptedTransport::default(), history);

    assert_eq!(h.controller.restore_history().await.unwrap(), 2);

    let texts: Vec<String> = h
        .controller
        .transcript()
        .await
        .into_iter()
        .filter_map(|view| match view.body {
            ViewBody::Message(message) => Some(message.text),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["hola".to_string(), "¡Hola!".to_string()]);
}

#[tokio::test]
async fn test_report_actions_and_table_filter() {
    let report: ChatResponse = serde_json::from_str(
        r#"{"success": true, "intent": "reporte", "reporte": {"id": 3, "tipo": "general", "total_registros": 3}}"#,
    )
    .unwrap();
    let transport = ScriptedTransport::replying(vec![report]);
    *transport.students.lock().unwrap() = Some(StudentsResponse {
        success: true,
        estudiantes: vec![
            student("A001", "Ana", "Pagado"),
            student("A002", "Luis", "Pendiente"),
            student("A003", "Marta", "Inscrito"),
        ],
        error: None,
    });
    let h = harness_with(transport, Arc::new(MemoryHistory::default()));

    let outcome = h.controller.submit("generar reporte").await;
    let actions = outcome.view().unwrap().body.actions().to_vec();
    let fetch = actions
        .iter()
        .find(|a| a.kind == ActionKind::FetchAllStudents)
        .unwrap();

    let listing = h.controller.run_action(fetch).await;
    let ViewBody::Students(table) = &listing.view().unwrap().body else {
        panic!("expected student table");
    };
    assert_eq!(table.kind, TableKind::All);
    assert_eq!(table.rows.len(), 3);

    let paid = h
        .controller
        .filter_last_table(&FilterCommand::Paid)
        .await
        .unwrap();
    assert_eq!((paid.visible, paid.total), (2, 3));

    let text = h
        .controller
        .filter_last_table(&FilterCommand::Text("luis".to_string()))
        .await
        .unwrap();
    assert_eq!(text.visible, 1);

    let all = h
        .controller
        .filter_last_table(&FilterCommand::All)
        .await
        .unwrap();
    assert_eq!(all.visible, 3);
    assert_eq!(all.view_id, paid.view_id);

    // Only the chat exchange itself reached history.
    assert_eq!(h.history.texts(), vec![(true, "generar reporte".to_string())]);
}

#[tokio::test]
async fn test_send_action_submits_message() {
    let h = harness(vec![ChatResponse::text("Estadísticas")]);
    let action = unibot_application::render::ViewAction::send("Ver estadísticas", "estadísticas");

    h.controller.run_action(&action).await;

    assert_eq!(h.transport.sent_messages(), vec!["estadísticas".to_string()]);
}

#[tokio::test]
async fn test_unreachable_backend_with_local_storage() {
    let temp_dir = TempDir::new().unwrap();
    let paths = UnibotPaths::new(Some(temp_dir.path())).unwrap();

    // Nothing listens on a port we just released.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let config = ClientConfig {
        base_url: format!("http://{addr}"),
        request_timeout_secs: 2,
        ..ClientConfig::default()
    };

    let history = Arc::new(TomlHistoryRepository::new(paths.history_file()));
    let controller = ChatController::new(
        Arc::new(HttpChatTransport::new(&config).unwrap()),
        history.clone(),
        Arc::new(TomlSessionStore::new(paths.session_file())),
        ResponseRenderer::default(),
    )
    .unwrap();

    let outcome = controller.submit("hola").await;

    match &outcome.view().unwrap().body {
        ViewBody::Message(message) => {
            assert_eq!(message.text, CONNECTION_ERROR_TEXT);
            assert!(message.is_error);
        }
        other => panic!("expected message, got {other:?}"),
    }
    assert!(controller.input_enabled());

    let token = controller.session_token().await;
    let stored = history.load_for_session(&token).unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored[0].is_from_user);
    assert_eq!(stored[1].text, CONNECTION_ERROR_TEXT);
}
