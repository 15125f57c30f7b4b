use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use unibot_application::render::html;
use unibot_application::{
    ChatController, ClearOutcome, ControllerEvent, ResponseRenderer, SubmitOutcome,
};
use unibot_core::config::ClientConfig;
use unibot_infrastructure::{ConfigService, TomlHistoryRepository, TomlSessionStore, UnibotPaths};
use unibot_interaction::HttpChatTransport;

mod command;
mod helper;
mod presenter;

use command::Command;
use helper::CliHelper;

const DEFAULT_LOG_FILTER: &str = "unibot=info";
const EXPORT_TITLE: &str = "Asistente universitario";

#[derive(Parser)]
#[command(name = "unibot")]
#[command(about = "University information chatbot client", long_about = None)]
struct Args {
    /// Chatbot backend base URL (overrides config.toml and UNIBOT_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Directory for config, session, history and logs
    #[arg(long, env = "UNIBOT_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = secs;
        }
    }
}

/// Logs go to a daily file so they never interleave with the prompt.
fn init_logging(logs_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("cannot create log directory {}", logs_dir.display()))?;

    let appender = tracing_appender::rolling::daily(logs_dir, "unibot.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ===== Local files, logging, configuration =====
    let paths = UnibotPaths::new(args.data_dir.as_deref())?;
    let _log_guard = init_logging(&paths.logs_dir())?;

    let config_service = ConfigService::new(paths.config_file());
    if !paths.config_file().exists() {
        // Seed an editable file with the defaults on first run
        config_service.save(&ClientConfig::default())?;
    }
    let mut config = config_service.load()?;
    args.apply(&mut config);
    tracing::info!(base_url = %config.base_url, root = %paths.root().display(), "starting unibot");

    // ===== Controller =====
    let transport = Arc::new(HttpChatTransport::new(&config)?);
    let history = Arc::new(
        TomlHistoryRepository::new(paths.history_file()).with_limit(config.history_limit),
    );
    let sessions = Arc::new(TomlSessionStore::new(paths.session_file()));

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ControllerEvent>();
    let controller = Arc::new(
        ChatController::new(transport, history, sessions, ResponseRenderer::default())?
            .with_events(event_tx),
    );

    // Prints every UI change coming out of the controller
    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                ControllerEvent::ViewAppended(view) | ControllerEvent::ViewUpdated(view) => {
                    presenter::print_view(&view);
                }
                ControllerEvent::Typing(true) => {
                    println!("{}", "El asistente está escribiendo...".bright_black().italic());
                }
                ControllerEvent::TranscriptCleared => {
                    println!("{}", "Historial borrado. Nueva sesión iniciada.".bright_green());
                }
                ControllerEvent::Typing(false) | ControllerEvent::InputEnabled(_) => {}
            }
        }
    });

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new(&config.suggestions)));

    println!("{}", "=== Asistente universitario ===".bright_magenta().bold());
    println!(
        "{}",
        "Escribe tu pregunta, '/suggest' para ver sugerencias, '/help' para comandos o 'quit' para salir."
            .bright_black()
    );
    println!();

    match controller.restore_history().await {
        Ok(0) => println!("{}", "¡Hola! ¿En qué puedo ayudarte?".bright_blue()),
        Ok(restored) => tracing::debug!(restored, "previous conversation shown"),
        Err(e) => eprintln!("{}", format!("No se pudo cargar el historial: {e}").red()),
    }

    // ===== Main REPL Loop =====
    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detectado. Escribe 'quit' para salir.".yellow());
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "¡Hasta luego!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());

        match Command::parse(&line) {
            Command::Quit => {
                println!("{}", "¡Hasta luego!".bright_green());
                break;
            }
            Command::Message(text) => spawn_submit(&controller, text),
            Command::Suggest(None) => print_suggestions(&config.suggestions),
            Command::Suggest(Some(n)) => match config.suggestions.get(n - 1) {
                Some(suggestion) => spawn_submit(&controller, suggestion.clone()),
                None => println!("{}", format!("No existe la sugerencia {n}.").yellow()),
            },
            Command::Filter(filter) => match controller.filter_last_table(&filter).await {
                Some(summary) => println!(
                    "{}",
                    format!("{} de {} filas visibles", summary.visible, summary.total)
                        .bright_black()
                ),
                None => println!("{}", "No hay ninguna tabla de estudiantes que filtrar.".yellow()),
            },
            Command::AllStudents => {
                let controller = Arc::clone(&controller);
                tokio::spawn(async move { report_outcome(controller.view_all_students().await) });
            }
            Command::Action(n) => run_action(&controller, n).await,
            Command::History => {
                for view in controller.transcript().await {
                    presenter::print_view(&view);
                }
            }
            Command::Clear => match controller.clear().await {
                Ok(ClearOutcome::Cleared(_)) => {}
                Ok(ClearOutcome::Busy) => println!(
                    "{}",
                    "Espera la respuesta pendiente antes de borrar el historial.".yellow()
                ),
                Err(e) => eprintln!("{}", format!("No se pudo borrar el historial: {e}").red()),
            },
            Command::Export(path) => match export_transcript(&controller, &path).await {
                Ok(()) => println!(
                    "{}",
                    format!("Conversación exportada a {}", path.display()).bright_green()
                ),
                Err(e) => eprintln!("{}", format!("Error al exportar: {e:#}").red()),
            },
            Command::Help => print_help(),
            Command::Invalid(message) => println!("{}", message.yellow()),
        }
    }

    // Drop our handle so the printer can drain and stop
    drop(controller);
    let _ = timeout(Duration::from_secs(1), printer).await;

    Ok(())
}

/// Runs the exchange in the background; the printer shows the result.
fn spawn_submit(controller: &Arc<ChatController>, text: String) {
    let controller = Arc::clone(controller);
    tokio::spawn(async move { report_outcome(controller.submit(&text).await) });
}

fn report_outcome(outcome: SubmitOutcome) {
    if outcome == SubmitOutcome::Busy {
        println!(
            "{}",
            "Espera la respuesta anterior antes de enviar otro mensaje.".yellow()
        );
    }
}

async fn run_action(controller: &Arc<ChatController>, n: usize) {
    let transcript = controller.transcript().await;
    let action = transcript
        .iter()
        .rev()
        .map(|view| view.body.actions())
        .find(|actions| !actions.is_empty())
        .and_then(|actions| actions.get(n - 1))
        .cloned();

    match action {
        Some(action) => {
            let controller = Arc::clone(controller);
            tokio::spawn(async move { report_outcome(controller.run_action(&action).await) });
        }
        None => println!("{}", format!("No hay ninguna acción {n} disponible.").yellow()),
    }
}

async fn export_transcript(controller: &ChatController, path: &Path) -> Result<()> {
    let transcript = controller.transcript().await;
    let page = html::render_transcript(&transcript, EXPORT_TITLE)?;
    std::fs::write(path, page).with_context(|| format!("cannot write {}", path.display()))?;
    tracing::info!(path = %path.display(), views = transcript.len(), "transcript exported");
    Ok(())
}

fn print_suggestions(suggestions: &[String]) {
    println!("{}", "Sugerencias:".bright_magenta());
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("  {}", format!("[/suggest {}] {}", i + 1, suggestion).yellow());
    }
}

fn print_help() {
    let lines = [
        ("/suggest [N]", "muestra o envía una pregunta sugerida"),
        ("/filter <texto>", "filtra la última tabla de estudiantes"),
        ("/paid, /pending, /all", "filtros rápidos por estado de pago"),
        ("/todos", "muestra todos los estudiantes"),
        ("/action <N>", "ejecuta una acción de la última respuesta"),
        ("/history", "vuelve a mostrar la conversación"),
        ("/clear", "borra el historial e inicia una nueva sesión"),
        ("/export <archivo>", "guarda la conversación como HTML"),
        ("quit", "salir"),
    ];
    for (command, description) in lines {
        println!("  {} {}", format!("{command:<22}").bright_cyan(), description.bright_black());
    }
}
