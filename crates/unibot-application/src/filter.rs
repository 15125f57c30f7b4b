//! Client-side table filtering.
//!
//! Filters only flip [`RowHandle::visible`]. Each call recomputes
//! visibility from scratch, so the last filter applied always wins.

use std::str::FromStr;

use unibot_core::chat::PaymentStatus;

use crate::render::RowHandle;

/// Keeps rows whose text contains `text`, ignoring case.
///
/// An empty (or blank) filter shows every row. Returns the visible count.
pub fn apply_filter(rows: &mut [RowHandle], text: &str) -> usize {
    let needle = text.trim().to_lowercase();
    set_visibility(rows, |row| {
        needle.is_empty() || row.text().to_lowercase().contains(&needle)
    })
}

pub fn show_paid(rows: &mut [RowHandle]) -> usize {
    set_visibility(rows, |row| row.payment_status() == PaymentStatus::Paid)
}

pub fn show_pending(rows: &mut [RowHandle]) -> usize {
    set_visibility(rows, |row| row.payment_status() == PaymentStatus::Pending)
}

pub fn show_all(rows: &mut [RowHandle]) -> usize {
    set_visibility(rows, |_| true)
}

fn set_visibility(rows: &mut [RowHandle], keep: impl Fn(&RowHandle) -> bool) -> usize {
    let mut visible = 0;
    for row in rows.iter_mut() {
        row.visible = keep(row);
        if row.visible {
            visible += 1;
        }
    }
    visible
}

/// A filter request against a student table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCommand {
    Text(String),
    Paid,
    Pending,
    All,
}

impl FilterCommand {
    /// Applies the command, returning the number of visible rows.
    pub fn apply(&self, rows: &mut [RowHandle]) -> usize {
        match self {
            Self::Text(text) => apply_filter(rows, text),
            Self::Paid => show_paid(rows),
            Self::Pending => show_pending(rows),
            Self::All => show_all(rows),
        }
    }
}

impl FromStr for FilterCommand {
    type Err = std::convert::Infallible;

    /// `pagados`, `pendientes` and `todos` select the quick filters;
    /// anything else is a text filter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_lowercase().as_str() {
            "pagados" | "paid" => Self::Paid,
            "pendientes" | "pending" => Self::Pending,
            "todos" | "all" | "" => Self::All,
            _ => Self::Text(trimmed.to_string()),
        })
    }
}
