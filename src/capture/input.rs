//! Turning raw lines into scanner inputs
//!
//! When stdin doubles as scanner and operator console, an exactly empty line
//! is the reset control and `:q` ends the program; every other line,
//! including `q` or blanks, is a decoded payload. A dedicated payload source
//! never carries commands, and a command-only console also accepts `q`/`quit`.

use super::error::CaptureError;
use super::source::CaptureSource;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    Reset,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScannerInput {
    Decoded(String),
    Command(OperatorCommand),
    CaptureFailed(CaptureError),
    /// The payload stream ended.
    Closed,
}

/// What a given line stream is allowed to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    PayloadsAndCommands,
    PayloadsOnly,
    CommandsOnly,
}

impl LineRole {
    fn carries_payloads(self) -> bool {
        !matches!(self, LineRole::CommandsOnly)
    }
}

/// Quit token on a stream that also carries payloads.
pub const QUIT_TOKEN: &str = ":q";

/// Commands on a stream shared with payloads: an exactly empty line or the
/// exact quit token. Everything else is a payload.
fn parse_shared_command(line: &str) -> Option<OperatorCommand> {
    match line {
        "" => Some(OperatorCommand::Reset),
        QUIT_TOKEN => Some(OperatorCommand::Quit),
        _ => None,
    }
}

fn parse_console_command(line: &str) -> Option<OperatorCommand> {
    match line.trim() {
        "" => Some(OperatorCommand::Reset),
        QUIT_TOKEN => Some(OperatorCommand::Quit),
        cmd if cmd.eq_ignore_ascii_case("q") || cmd.eq_ignore_ascii_case("quit") => {
            Some(OperatorCommand::Quit)
        }
        _ => None,
    }
}

pub fn classify_line(line: &str, role: LineRole) -> Option<ScannerInput> {
    match role {
        LineRole::PayloadsOnly => {
            (!line.is_empty()).then(|| ScannerInput::Decoded(line.to_string()))
        }
        LineRole::CommandsOnly => parse_console_command(line).map(ScannerInput::Command),
        LineRole::PayloadsAndCommands => Some(match parse_shared_command(line) {
            Some(command) => ScannerInput::Command(command),
            None => ScannerInput::Decoded(line.to_string()),
        }),
    }
}

/// Forward classified lines from `source` into `tx` until the stream ends,
/// an unrecoverable read error occurs, or the receiver goes away.
///
/// Payload-carrying streams announce their end with `ScannerInput::Closed`.
pub async fn pump<S>(mut source: S, role: LineRole, tx: mpsc::Sender<ScannerInput>)
where
    S: CaptureSource,
{
    loop {
        let input = match source.next_line().await {
            Ok(Some(line)) => match classify_line(&line, role) {
                Some(input) => input,
                None => {
                    log::trace!("Ignoring line {:?} on {:?} stream", line, role);
                    continue;
                }
            },
            Ok(None) => break,
            Err(e) => {
                let recoverable = e.is_recoverable();
                if tx.send(ScannerInput::CaptureFailed(e)).await.is_err() || !recoverable {
                    break;
                }
                continue;
            }
        };
        if tx.send(input).await.is_err() {
            return;
        }
    }

    if role.carries_payloads() {
        let _ = tx.send(ScannerInput::Closed).await;
    }
}
