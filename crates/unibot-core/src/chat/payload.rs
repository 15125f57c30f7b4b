//! Structured payloads carried by chat replies.
//!
//! Field names follow the backend's JSON. Everything except identifiers is
//! optional or defaulted so a sparse row never turns a whole reply into a
//! parse failure. Numbers are read leniently: JSON numbers, whole floats and
//! numeric strings are accepted, and anything else falls back to `0` or
//! `None` for that field alone.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Aggregate enrollment figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    #[serde(deserialize_with = "count")]
    pub total_estudiantes: u64,
    #[serde(deserialize_with = "count")]
    pub inscritos: u64,
    #[serde(deserialize_with = "count")]
    pub pendientes: u64,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "optional_count")]
    pub carreras_activas: Option<u64>,
    /// Per-program breakdown.
    pub por_carrera: Vec<CareerCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerCount {
    pub carrera: String,
    #[serde(deserialize_with = "count")]
    pub cantidad: u64,
}

/// A student row as returned by the pending and full listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Student {
    #[serde(deserialize_with = "string_or_number")]
    pub matricula: String,
    pub nombre: String,
    pub apellido: String,
    pub carrera: String,
    #[serde(deserialize_with = "optional_count")]
    pub semestre: Option<u32>,
    /// Enrollment date as sent by the backend (ISO date or date-time).
    pub fecha_inscripcion: Option<String>,
    /// Payment status as free text (`Pagado`, `Pendiente`, ...).
    pub estado: Option<String>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido).trim().to_string()
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.estado
            .as_deref()
            .map(PaymentStatus::classify)
            .unwrap_or(PaymentStatus::Unknown)
    }
}

/// An academic program offered by the university.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Career {
    pub codigo: String,
    pub nombre: String,
    #[serde(deserialize_with = "optional_count")]
    pub duracion_semestres: Option<u32>,
    #[serde(deserialize_with = "optional_amount")]
    pub costo_inscripcion: Option<f64>,
}

/// Summary of a report generated by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub tipo: String,
    #[serde(deserialize_with = "count")]
    pub total_registros: u64,
    pub fecha_generacion: Option<String>,
}

/// Payment state derived from a student's status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Unknown,
}

impl PaymentStatus {
    /// Status texts counted as paid.
    pub const PAID_MARKERS: [&'static str; 2] = ["Pagado", "Inscrito"];
    /// Status texts counted as pending.
    pub const PENDING_MARKERS: [&'static str; 1] = ["Pendiente"];

    /// Matches a status cell against the literal markers, ignoring case and
    /// surrounding whitespace.
    pub fn classify(status: &str) -> Self {
        let status = status.trim();
        if Self::PAID_MARKERS
            .iter()
            .any(|m| m.eq_ignore_ascii_case(status))
        {
            Self::Paid
        } else if Self::PENDING_MARKERS
            .iter()
            .any(|m| m.eq_ignore_ascii_case(status))
        {
            Self::Pending
        } else {
            Self::Unknown
        }
    }
}

/// Accepts identifiers sent either as JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A count that degrades to `0` when unreadable.
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_count(&Value::deserialize(deserializer)?).unwrap_or(0))
}

fn optional_count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_count(&value).and_then(|n| T::try_from(n).ok()))
}

pub(super) fn optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_amount(&Value::deserialize(deserializer)?))
}

fn as_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    amount.is_finite().then_some(amount)
}

/// Non-negative whole numbers only; `8.0` and `"8"` count, `8.5` does not.
fn as_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let amount = as_amount(value)?;
    (amount >= 0.0 && amount.fract() == 0.0 && amount <= u64::MAX as f64).then(|| amount as u64)
}
