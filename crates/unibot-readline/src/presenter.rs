//! Terminal output of rendered views.

use colored::Colorize;
use unibot_application::render::{
    Author, CareerTableView, MessageView, RenderedView, ReportView, StatisticsView,
    StudentTableView, ViewAction, ViewBody,
};

pub fn print_view(view: &RenderedView) {
    match &view.body {
        ViewBody::Message(message) => print_message(message),
        ViewBody::Statistics(stats) => print_statistics(stats),
        ViewBody::Students(table) => print_students(table),
        ViewBody::Careers(table) => print_careers(table),
        ViewBody::Report(report) => print_report(report),
    }
    print_actions(view.body.actions());
    println!("{}", view.timestamp.bright_black());
    println!();
}

fn print_message(message: &MessageView) {
    for line in message.text.lines() {
        let line = match (message.author, message.is_error) {
            (Author::User, _) => format!("> {line}").green(),
            (Author::Bot, true) => line.red(),
            (Author::Bot, false) => line.bright_blue(),
        };
        println!("{line}");
    }
}

fn print_statistics(stats: &StatisticsView) {
    let cards: Vec<String> = stats
        .cards
        .iter()
        .map(|card| format!("{}: {}", card.label, card.value.bold()))
        .collect();
    println!("{}", cards.join("  |  ").bright_blue());

    if !stats.breakdown.is_empty() {
        let rows: Vec<Vec<String>> = stats
            .breakdown
            .iter()
            .map(|row| {
                vec![
                    row.carrera.clone(),
                    row.cantidad.to_string(),
                    row.percentage.clone(),
                ]
            })
            .collect();
        print_table(&["Carrera", "Estudiantes", "Porcentaje"], rows.iter());
    }
}

fn print_students(table: &StudentTableView) {
    if let Some(counts) = table.counts {
        println!(
            "{}",
            format!("Pagados: {}  |  Pendientes: {}", counts.paid, counts.pending).bright_blue()
        );
    }
    let columns: Vec<&str> = table.columns.iter().map(String::as_str).collect();
    print_table(
        &columns,
        table.rows.iter().filter(|row| row.visible).map(|row| &row.cells),
    );

    let hidden = table.rows.len() - table.visible_rows();
    if hidden > 0 {
        println!("{}", format!("({hidden} filas ocultas por el filtro)").bright_black());
    }
    if table.filterable {
        println!(
            "{}",
            "Filtra con /filter <texto>, /paid, /pending o /all".bright_black()
        );
    }
}

fn print_careers(table: &CareerTableView) {
    let columns: Vec<&str> = table.columns.iter().map(String::as_str).collect();
    print_table(&columns, table.rows.iter());
}

fn print_report(report: &ReportView) {
    println!("{}", "Reporte generado".bright_blue().bold());
    println!("  ID: {}", report.id);
    println!("  Tipo: {}", report.tipo);
    println!("  Total de registros: {}", report.total_registros);
    println!("  Fecha: {}", report.fecha);
}

fn print_actions(actions: &[ViewAction]) {
    for (i, action) in actions.iter().enumerate() {
        println!("{}", format!("  [/action {}] {}", i + 1, action.label).yellow());
    }
}

/// Prints a left-aligned table sized to its widest cells.
fn print_table<'a>(columns: &[&str], rows: impl Iterator<Item = &'a Vec<String>> + Clone) {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows.clone() {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| pad(column, *width))
        .collect();
    println!("{}", header.join("  ").bold());

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect();
        println!("{}", cells.join("  "));
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{text}{}", " ".repeat(fill))
}
