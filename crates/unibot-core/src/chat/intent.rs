use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Intent tags that select a structured view.
///
/// Any other tag (greetings, contact info, ...) is rendered as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, EnumIter)]
pub enum Intent {
    #[strum(serialize = "estadisticas")]
    Statistics,
    #[strum(serialize = "estudiantes_pendientes")]
    PendingStudents,
    #[strum(serialize = "carreras")]
    Careers,
    #[strum(serialize = "reporte")]
    Report,
    #[strum(serialize = "todos_estudiantes")]
    AllStudents,
}

impl Intent {
    /// Parses a server tag; unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        tag.trim().parse().ok()
    }
}
