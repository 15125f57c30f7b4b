//! Response rendering.
//!
//! # Module Structure
//!
//! - `clock`: injected wall clock used to stamp views
//! - `view`: the view-models appended to the transcript
//! - `format`: cell formatting (percentages, dates, fees)
//! - `renderer`: [`ResponseRenderer`], chat response to view-model
//! - `html`: minijinja presentation of view-models

mod clock;
pub mod format;
pub mod html;
mod renderer;
mod view;

pub use clock::{Clock, SystemClock, TIME_FORMAT};
pub use renderer::{
    ResponseRenderer, all_students_view, careers_view, pending_students_view, report_view,
    statistics_view,
};
pub use view::{
    ActionKind, Author, BreakdownRow, CareerTableView, MessageView, PaymentCounts, RenderedView,
    ReportView, RowHandle, StatCard, StatisticsView, StudentTableView, TableKind, ViewAction,
    ViewBody,
};
