use std::sync::Arc;

use chrono::{DateTime, Local};
use unibot_core::chat::{
    Career, ChatReply, ChatResponse, PaymentStatus, Report, Statistics, Student,
};
use unibot_core::history::ChatMessageRecord;
use uuid::Uuid;

use super::clock::{Clock, SystemClock, TIME_FORMAT};
use super::format;
use super::view::{
    Author, BreakdownRow, CareerTableView, MessageView, PaymentCounts, RenderedView, ReportView,
    RowHandle, StatCard, StatisticsView, StudentTableView, TableKind, ViewAction, ViewBody,
};

const PENDING_STATUS: &str = "Pendiente";

/// Maps chat responses to transcript views.
///
/// Dispatch goes through [`ChatReply`]; every view is stamped with the
/// injected clock's time when it is rendered, not when the message was sent.
#[derive(Clone)]
pub struct ResponseRenderer {
    clock: Arc<dyn Clock>,
}

impl Default for ResponseRenderer {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl ResponseRenderer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn render(&self, response: ChatResponse) -> RenderedView {
        self.render_reply(ChatReply::from(response))
    }

    pub fn render_reply(&self, reply: ChatReply) -> RenderedView {
        let body = match reply {
            ChatReply::PlainText(text) => ViewBody::Message(MessageView {
                author: Author::Bot,
                text,
                is_error: false,
            }),
            ChatReply::Failure(text) => ViewBody::Message(MessageView {
                author: Author::Bot,
                text,
                is_error: true,
            }),
            ChatReply::Statistics(stats) => ViewBody::Statistics(statistics_view(&stats)),
            ChatReply::PendingStudents(students) => {
                ViewBody::Students(pending_students_view(&students))
            }
            ChatReply::Careers(careers) => ViewBody::Careers(careers_view(&careers)),
            ChatReply::Report(report) => ViewBody::Report(report_view(&report)),
            ChatReply::AllStudents(students) => ViewBody::Students(all_students_view(&students)),
        };
        self.stamp(body)
    }

    /// The user's own message as it appears in the transcript.
    pub fn render_user_message(&self, text: &str) -> RenderedView {
        self.stamp(ViewBody::Message(MessageView {
            author: Author::User,
            text: text.to_string(),
            is_error: false,
        }))
    }

    /// A restored history record, stamped with its original time.
    pub fn render_record(&self, record: &ChatMessageRecord) -> RenderedView {
        let timestamp = DateTime::parse_from_rfc3339(&record.timestamp)
            .map(|t| t.with_timezone(&Local).format(TIME_FORMAT).to_string())
            .unwrap_or_else(|_| self.now());
        let author = if record.is_from_user {
            Author::User
        } else {
            Author::Bot
        };

        RenderedView {
            id: Uuid::new_v4(),
            timestamp,
            body: ViewBody::Message(MessageView {
                author,
                text: record.text.clone(),
                is_error: !record.is_from_user && record.text.starts_with('❌'),
            }),
        }
    }

    fn stamp(&self, body: ViewBody) -> RenderedView {
        RenderedView {
            id: Uuid::new_v4(),
            timestamp: self.now(),
            body,
        }
    }

    fn now(&self) -> String {
        self.clock.now().format(TIME_FORMAT).to_string()
    }
}

pub fn statistics_view(stats: &Statistics) -> StatisticsView {
    let mut cards = vec![
        card("Total de estudiantes", stats.total_estudiantes),
        card("Inscritos", stats.inscritos),
        card("Pendientes", stats.pendientes),
    ];
    if let Some(active) = stats.carreras_activas {
        cards.push(card("Carreras activas", active));
    }

    let breakdown = stats
        .por_carrera
        .iter()
        .map(|entry| BreakdownRow {
            carrera: entry.carrera.clone(),
            cantidad: entry.cantidad,
            percentage: format::percentage(entry.cantidad, stats.total_estudiantes),
        })
        .collect();

    StatisticsView { cards, breakdown }
}

fn card(label: &str, value: u64) -> StatCard {
    StatCard {
        label: label.to_string(),
        value: value.to_string(),
    }
}

pub fn pending_students_view(students: &[Student]) -> StudentTableView {
    let rows = students
        .iter()
        .map(|student| {
            RowHandle::new(
                vec![
                    student.matricula.clone(),
                    student.full_name(),
                    student.carrera.clone(),
                    format::optional_number(student.semestre),
                    format::optional_date(student.fecha_inscripcion.as_deref()),
                    PENDING_STATUS.to_string(),
                ],
                PENDING_STATUS,
            )
        })
        .collect();

    StudentTableView {
        kind: TableKind::Pending,
        columns: columns(&[
            "Matrícula",
            "Nombre completo",
            "Carrera",
            "Semestre",
            "Fecha de inscripción",
            "Estado",
        ]),
        rows,
        counts: None,
        filterable: false,
        actions: vec![ViewAction::send("Generar reporte", "generar reporte")],
    }
}

pub fn all_students_view(students: &[Student]) -> StudentTableView {
    let mut counts = PaymentCounts::default();
    let rows = students
        .iter()
        .map(|student| {
            match student.payment_status() {
                PaymentStatus::Paid => counts.paid += 1,
                PaymentStatus::Pending => counts.pending += 1,
                PaymentStatus::Unknown => {}
            }
            let status = student
                .estado
                .clone()
                .unwrap_or_else(|| format::EMPTY_CELL.to_string());
            RowHandle::new(
                vec![
                    student.matricula.clone(),
                    student.full_name(),
                    student.carrera.clone(),
                    format::optional_number(student.semestre),
                    status.clone(),
                ],
                status,
            )
        })
        .collect();

    StudentTableView {
        kind: TableKind::All,
        columns: columns(&["Matrícula", "Nombre completo", "Carrera", "Semestre", "Estado"]),
        rows,
        counts: Some(counts),
        filterable: true,
        actions: Vec::new(),
    }
}

pub fn careers_view(careers: &[Career]) -> CareerTableView {
    CareerTableView {
        columns: columns(&["Código", "Nombre", "Duración", "Costo de inscripción"]),
        rows: careers
            .iter()
            .map(|career| {
                vec![
                    career.codigo.clone(),
                    career.nombre.clone(),
                    format::semesters(career.duracion_semestres),
                    format::fee(career.costo_inscripcion),
                ]
            })
            .collect(),
    }
}

pub fn report_view(report: &Report) -> ReportView {
    ReportView {
        id: report.id.clone(),
        tipo: report.tipo.clone(),
        total_registros: report.total_registros,
        fecha: format::optional_date(report.fecha_generacion.as_deref()),
        actions: vec![
            ViewAction::fetch_all_students("Ver todos los estudiantes"),
            ViewAction::send("Ver estadísticas", "estadísticas"),
        ],
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
