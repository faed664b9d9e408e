use crate::app::cli::args::Args;
use crate::app::cli::config::{resolve_settings, use_color, ConfigLayer, ScannerConfig};
use crate::app::controller::{ControllerOptions, RunReport, ScanController};
use crate::app::error::AppError;
use crate::app::spinner::should_show_spinner;
use crate::capture::{pump, LineRole, LineSource, ScannerInput};
use crate::core::error_handling::{fatal_line, log_error_with_context};
use crate::core::logging::init_logging;
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::styles::palette_to_clap;
use crate::display::{terminal_id, RenderOptions, TerminalScreen};
use crate::submit::HttpEndpoint;
use clap::{CommandFactory, FromArgMatches};
use std::io::IsTerminal;
use std::sync::Arc;
use tokio::sync::mpsc;

const INPUT_QUEUE_DEPTH: usize = 32;

/// Look for `--color`/`--no-color` before clap runs so help and usage
/// errors are styled consistently with the rest of the output.
fn early_color_choice<I: IntoIterator<Item = String>>(args: I) -> Option<bool> {
    let mut choice = None;
    for arg in args {
        match arg.as_str() {
            "--color" => choice = Some(true),
            "--no-color" => choice = Some(false),
            "--" => break,
            _ => {}
        }
    }
    choice
}

fn parse_args() -> Args {
    let color = use_color(
        early_color_choice(std::env::args()),
        std::io::stdout().is_terminal(),
    );
    let matches = Args::command()
        .styles(palette_to_clap(color))
        .get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

/// Parse arguments, resolve configuration and run the scanner. Returns the
/// process exit code.
pub async fn startup() -> i32 {
    let args = parse_args();

    let settings = match resolve_settings(&args).await {
        Ok(settings) => settings,
        Err(e) => {
            // Logging has not started; the CLI layer alone decides colour
            let layer = ConfigLayer::from_args(&args);
            let color = use_color(layer.color, std::io::stderr().is_terminal());
            let err = AppError::from(e);
            let line = fatal_line(&err, "Loading configuration");
            if color {
                eprintln!("{}", crate::core::styles::StyleRole::Error.paint(&line, true));
            } else {
                eprintln!("{}", line);
            }
            return 1;
        }
    };

    match run(settings).await {
        Ok(report) => {
            log::info!(
                "Session ended after {} submission(s): {} recorded, {} already marked, {} rejected, {} network failure(s)",
                report.submissions,
                report.tally.recorded,
                report.tally.already_marked,
                report.tally.rejected,
                report.tally.network_failures
            );
            0
        }
        Err(e) => {
            log_error_with_context(&e, "Running scanner");
            1
        }
    }
}

async fn run(settings: ScannerConfig) -> Result<RunReport, AppError> {
    let color = use_color(settings.color, std::io::stdout().is_terminal());
    init_logging(
        settings.log_level.as_deref(),
        settings.log_format.as_deref(),
        settings.log_file.as_deref(),
        use_color(settings.color, std::io::stderr().is_terminal()),
    )
    .map_err(|e| AppError::Logging {
        reason: e.to_string(),
    })?;

    let endpoint = HttpEndpoint::new(settings.endpoint.clone(), settings.request_timeout)?;
    log::info!(
        "teamscan {} starting; endpoint {}",
        crate::core::version::long_version(),
        endpoint.url()
    );

    let inputs = spawn_capture(&settings).await?;

    let options = ControllerOptions {
        render: RenderOptions {
            title: settings.title.clone(),
            terminal_id: terminal_id(),
            color,
        },
        auto_reset: settings.auto_reset,
        spinner: should_show_spinner(),
    };
    let controller = ScanController::new(Arc::new(endpoint), TerminalScreen::detect(), options);

    ShutdownCoordinator::guard(|shutdown_rx| controller.run(inputs, shutdown_rx)).await
}

/// Start the capture pumps. With `--source`, payloads come from that path and
/// stdin carries only operator commands.
async fn spawn_capture(
    settings: &ScannerConfig,
) -> Result<mpsc::Receiver<ScannerInput>, AppError> {
    let (tx, rx) = mpsc::channel(INPUT_QUEUE_DEPTH);

    match &settings.source {
        Some(path) => {
            let source = LineSource::open(path).await?;
            log::info!("Reading payloads from {}", path.display());
            tokio::spawn(pump(source, LineRole::PayloadsOnly, tx.clone()));
            tokio::spawn(pump(LineSource::stdin(), LineRole::CommandsOnly, tx));
        }
        None => {
            log::debug!("Reading payloads and commands from stdin");
            tokio::spawn(pump(LineSource::stdin(), LineRole::PayloadsAndCommands, tx));
        }
    }

    Ok(rx)
}
