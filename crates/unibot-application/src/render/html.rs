//! HTML presentation of rendered views.
//!
//! Templates are registered under `.html` names, so minijinja escapes
//! every interpolated value. Hidden table rows carry the `hidden` attribute.

use minijinja::{Environment, context};
use once_cell::sync::Lazy;
use unibot_core::error::{Result, UnibotError};

use super::view::RenderedView;

const VIEW_TEMPLATE: &str = r#"
{%- macro actions(items) -%}
{%- if items %}
<div class="action-buttons">
{%- for action in items %}
<button class="action-btn" data-action="{{ action.kind.type }}"{% if action.kind.message %} data-message="{{ action.kind.message }}"{% endif %}>{{ action.label }}</button>
{%- endfor %}
</div>
{%- endif %}
{%- endmacro -%}
{%- set body = view.body -%}
<div class="message {{ 'user' if body.author == 'user' else 'bot' }}-message" id="view-{{ view.id }}">
<div class="message-content">
{%- if body.view == "message" %}
<p{% if body.is_error %} class="error"{% endif %}>{{ body.text }}</p>
{%- elif body.view == "statistics" %}
<div class="stats-grid">
{%- for card in body.cards %}
<div class="stat-card"><span class="stat-value">{{ card.value }}</span><span class="stat-label">{{ card.label }}</span></div>
{%- endfor %}
</div>
{%- if body.breakdown %}
<table class="data-table">
<thead><tr><th>Carrera</th><th>Estudiantes</th><th>Porcentaje</th></tr></thead>
<tbody>
{%- for row in body.breakdown %}
<tr><td>{{ row.carrera }}</td><td>{{ row.cantidad }}</td><td>{{ row.percentage }}</td></tr>
{%- endfor %}
</tbody>
</table>
{%- endif %}
{%- elif body.view == "students" %}
{%- if body.counts %}
<p class="table-summary">Pagados: {{ body.counts.paid }} | Pendientes: {{ body.counts.pending }}</p>
{%- endif %}
{%- if body.filterable %}
<input type="text" class="table-filter" placeholder="Filtrar estudiantes...">
{%- endif %}
<table class="data-table students-{{ body.kind }}">
<thead><tr>{% for column in body.columns %}<th>{{ column }}</th>{% endfor %}</tr></thead>
<tbody>
{%- for row in body.rows %}
<tr{% if not row.visible %} hidden{% endif %}>{% for cell in row.cells %}<td>{{ cell }}</td>{% endfor %}</tr>
{%- endfor %}
</tbody>
</table>
{{- actions(body.actions) }}
{%- elif body.view == "careers" %}
<table class="data-table">
<thead><tr>{% for column in body.columns %}<th>{{ column }}</th>{% endfor %}</tr></thead>
<tbody>
{%- for row in body.rows %}
<tr>{% for cell in row %}<td>{{ cell }}</td>{% endfor %}</tr>
{%- endfor %}
</tbody>
</table>
{%- elif body.view == "report" %}
<div class="report-summary">
<p><strong>Reporte generado</strong></p>
<ul>
<li>ID: {{ body.id }}</li>
<li>Tipo: {{ body.tipo }}</li>
<li>Total de registros: {{ body.total_registros }}</li>
<li>Fecha: {{ body.fecha }}</li>
</ul>
</div>
{{- actions(body.actions) }}
{%- endif %}
</div>
<div class="message-time">{{ view.timestamp }}</div>
</div>
"#;

const TRANSCRIPT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
body { font-family: sans-serif; max-width: 820px; margin: 2rem auto; background: #f5f6fa; }
.message { margin: 0.75rem 0; padding: 0.75rem 1rem; border-radius: 8px; }
.user-message { background: #dbe9ff; margin-left: 20%; }
.bot-message { background: #ffffff; margin-right: 10%; }
.error { color: #b3261e; }
.message-time { font-size: 0.75rem; color: #777; text-align: right; }
.stats-grid { display: flex; gap: 0.5rem; flex-wrap: wrap; }
.stat-card { display: flex; flex-direction: column; padding: 0.5rem 1rem; background: #eef1f7; border-radius: 6px; }
.stat-value { font-size: 1.4rem; font-weight: bold; }
.data-table { border-collapse: collapse; width: 100%; margin-top: 0.5rem; }
.data-table th, .data-table td { border: 1px solid #ddd; padding: 0.3rem 0.5rem; text-align: left; }
</style>
</head>
<body>
<h1>{{ title }}</h1>
<div class="chat-messages">
{%- for view in views %}
{% include "view.html" %}
{%- endfor %}
</div>
</body>
</html>
"#;

static TEMPLATES: Lazy<std::result::Result<Environment<'static>, minijinja::Error>> =
    Lazy::new(|| {
        let mut env = Environment::new();
        env.add_template("view.html", VIEW_TEMPLATE)?;
        env.add_template("transcript.html", TRANSCRIPT_TEMPLATE)?;
        Ok(env)
    });

fn render_error(err: &minijinja::Error) -> UnibotError {
    UnibotError::render(err.to_string())
}

fn render_template(name: &str, ctx: minijinja::Value) -> Result<String> {
    let env = TEMPLATES.as_ref().map_err(render_error)?;
    env.get_template(name)
        .and_then(|template| template.render(ctx))
        .map_err(|e| render_error(&e))
}

/// Renders one view as an HTML fragment.
pub fn render_fragment(view: &RenderedView) -> Result<String> {
    render_template("view.html", context! { view => view })
}

/// Wraps every view into a standalone HTML page.
pub fn render_transcript(views: &[RenderedView], title: &str) -> Result<String> {
    tracing::debug!(views = views.len(), "rendering transcript page");
    render_template("transcript.html", context! { views => views, title => title })
}
