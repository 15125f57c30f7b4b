//! View-models produced by the renderer.
//!
//! These carry already-formatted strings only; turning them into markup or
//! terminal output is left to the presenters.

use serde::Serialize;
use unibot_core::chat::PaymentStatus;
use uuid::Uuid;

/// One entry of the chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedView {
    pub id: Uuid,
    /// Wall-clock time the view was rendered, `HH:MM`.
    pub timestamp: String,
    pub body: ViewBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewBody {
    Message(MessageView),
    Statistics(StatisticsView),
    Students(StudentTableView),
    Careers(CareerTableView),
    Report(ReportView),
}

impl ViewBody {
    /// `true` for plain messages, the only bodies kept in local history.
    pub fn is_message(&self) -> bool {
        matches!(self, Self::Message(_))
    }

    /// Affordances attached to the view.
    pub fn actions(&self) -> &[ViewAction] {
        match self {
            Self::Students(table) => &table.actions,
            Self::Report(report) => &report.actions,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub author: Author,
    pub text: String,
    /// Set for failure replies.
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: String,
    pub value: String,
}

/// One row of the per-program breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownRow {
    pub carrera: String,
    pub cantidad: u64,
    /// Share of the total, one decimal, e.g. `42.5%`.
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticsView {
    pub cards: Vec<StatCard>,
    pub breakdown: Vec<BreakdownRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Students with a pending enrollment payment.
    Pending,
    /// The complete student listing.
    All,
}

/// A rendered table row together with its presentation state.
///
/// Filtering only ever flips `visible`; the cells are never touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowHandle {
    pub cells: Vec<String>,
    /// Text of the status cell, matched by the quick filters.
    pub status: String,
    pub visible: bool,
}

impl RowHandle {
    pub fn new(cells: Vec<String>, status: impl Into<String>) -> Self {
        Self {
            cells,
            status: status.into(),
            visible: true,
        }
    }

    /// The row's visible text, cells separated by a single space.
    pub fn text(&self) -> String {
        self.cells.join(" ")
    }

    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::classify(&self.status)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaymentCounts {
    pub paid: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentTableView {
    pub kind: TableKind,
    pub columns: Vec<String>,
    pub rows: Vec<RowHandle>,
    /// Paid/pending totals, shown with the full listing.
    pub counts: Option<PaymentCounts>,
    /// Whether a free-text filter control is offered.
    pub filterable: bool,
    pub actions: Vec<ViewAction>,
}

impl StudentTableView {
    pub fn visible_rows(&self) -> usize {
        self.rows.iter().filter(|row| row.visible).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CareerTableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportView {
    pub id: String,
    pub tipo: String,
    pub total_registros: u64,
    pub fecha: String,
    pub actions: Vec<ViewAction>,
}

/// A button attached to a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewAction {
    pub label: String,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum ActionKind {
    /// Submits the message as if the user had typed it.
    SendMessage(String),
    /// Loads the complete student listing.
    FetchAllStudents,
}

impl ViewAction {
    pub fn send(label: &str, message: &str) -> Self {
        Self {
            label: label.to_string(),
            kind: ActionKind::SendMessage(message.to_string()),
        }
    }

    pub fn fetch_all_students(label: &str) -> Self {
        Self {
            label: label.to_string(),
            kind: ActionKind::FetchAllStudents,
        }
    }
}
