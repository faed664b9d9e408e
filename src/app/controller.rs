//! Scanner event loop
//!
//! The controller owns the session and is the only place it changes. One
//! `tokio::select!` loop multiplexes capture input, the in-flight submission,
//! the optional auto-reset timer and the shutdown signal.

use crate::app::error::AppError;
use crate::app::spinner::run_spinner;
use crate::capture::{OperatorCommand, ScannerInput};
use crate::display::{render, RenderOptions, Screen};
use crate::session::{Detection, ScanSession};
use crate::submit::{submit, AttendanceEndpoint, Verdict};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub render: RenderOptions,
    pub auto_reset: Option<Duration>,
    pub spinner: bool,
}

/// Counts of applied verdicts over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub recorded: usize,
    pub already_marked: usize,
    pub rejected: usize,
    pub network_failures: usize,
}

impl Tally {
    fn count(&mut self, verdict: &Verdict) {
        match verdict {
            Verdict::Recorded => self.recorded += 1,
            Verdict::AlreadyMarked => self.already_marked += 1,
            Verdict::Rejected(_) => self.rejected += 1,
            Verdict::NetworkFailure => self.network_failures += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub submissions: usize,
    pub tally: Tally,
    pub session: ScanSession,
}

#[derive(Debug)]
struct SubmissionResult {
    detection: Detection,
    verdict: Verdict,
}

async fn join_in_flight(
    slot: &mut Option<JoinHandle<SubmissionResult>>,
) -> Result<SubmissionResult, JoinError> {
    match slot {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

pub struct ScanController<S> {
    session: ScanSession,
    endpoint: Arc<dyn AttendanceEndpoint>,
    screen: S,
    options: ControllerOptions,
    spinner_stop: Option<oneshot::Sender<()>>,
    submissions: usize,
    tally: Tally,
}

impl<S: Screen> ScanController<S> {
    pub fn new(endpoint: Arc<dyn AttendanceEndpoint>, screen: S, options: ControllerOptions) -> Self {
        Self {
            session: ScanSession::new(),
            endpoint,
            screen,
            options,
            spinner_stop: None,
            submissions: 0,
            tally: Tally::default(),
        }
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// Drive the scanner until the capture stream ends (after any in-flight
    /// submission settles), the operator quits, or shutdown is signalled.
    pub async fn run(
        mut self,
        mut inputs: mpsc::Receiver<ScannerInput>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<RunReport, AppError> {
        let mut in_flight: Option<JoinHandle<SubmissionResult>> = None;
        let mut auto_reset_at: Option<Instant> = None;
        let mut capture_open = true;

        self.redraw()?;

        loop {
            if !capture_open && in_flight.is_none() {
                log::debug!("Capture stream ended; stopping");
                break;
            }

            tokio::select! {
                _ = shutdown_rx.recv() => {
                    log::info!("Shutdown requested");
                    break;
                }

                joined = join_in_flight(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    self.stop_spinner();
                    match joined {
                        Ok(result) => {
                            if self.apply_result(result)? {
                                auto_reset_at = self.options.auto_reset.map(|d| Instant::now() + d);
                            }
                        }
                        Err(e) => log::error!("Submission task ended without a verdict: {}", e),
                    }
                }

                _ = sleep_until_deadline(auto_reset_at), if auto_reset_at.is_some() => {
                    auto_reset_at = None;
                    log::info!("Auto-reset after result");
                    self.reset()?;
                }

                input = inputs.recv(), if capture_open => match input {
                    Some(ScannerInput::Decoded(payload)) => {
                        if let Some(handle) = self.on_detect(&payload)? {
                            in_flight = Some(handle);
                        }
                    }
                    Some(ScannerInput::Command(OperatorCommand::Reset)) => {
                        if self.session.status().is_idle() {
                            log::debug!("Reset ignored while idle");
                        } else {
                            if let Some(handle) = in_flight.take() {
                                handle.abort();
                                log::info!("Reset abandoned the in-flight submission");
                            }
                            auto_reset_at = None;
                            self.reset()?;
                        }
                    }
                    Some(ScannerInput::Command(OperatorCommand::Quit)) => {
                        log::info!("Operator quit");
                        break;
                    }
                    Some(ScannerInput::CaptureFailed(e)) => {
                        log::warn!("Capture error: {}", e);
                    }
                    Some(ScannerInput::Closed) | None => {
                        capture_open = false;
                    }
                },
            }
        }

        if let Some(handle) = in_flight.take() {
            handle.abort();
        }
        self.stop_spinner();

        Ok(RunReport {
            submissions: self.submissions,
            tally: self.tally,
            session: self.session,
        })
    }

    fn redraw(&mut self) -> Result<(), AppError> {
        let frame = render(&self.session, &self.options.render);
        self.screen.present(&frame).map_err(AppError::display)
    }

    fn on_detect(
        &mut self,
        payload: &str,
    ) -> Result<Option<JoinHandle<SubmissionResult>>, AppError> {
        let Some(detection) = self.session.detect(payload) else {
            log::debug!(
                "Ignoring detection {:?} while {}",
                payload,
                self.session.status()
            );
            return Ok(None);
        };

        log::info!("Scanned team {}", detection.team_id);
        self.redraw()?;

        self.session.begin_processing(detection.generation);
        self.redraw()?;
        self.start_spinner();
        self.submissions += 1;

        let endpoint = Arc::clone(&self.endpoint);
        Ok(Some(tokio::spawn(async move {
            let verdict = submit(endpoint.as_ref(), &detection.team_id).await;
            SubmissionResult { detection, verdict }
        })))
    }

    /// Returns whether the result was applied (false for stale results).
    fn apply_result(&mut self, result: SubmissionResult) -> Result<bool, AppError> {
        let SubmissionResult { detection, verdict } = result;
        self.tally.count(&verdict);
        let outcome = verdict.into_outcome(&detection.team_id);

        if !self.session.complete(detection.generation, outcome) {
            log::debug!(
                "Discarding stale result for team {} (generation {}, now {})",
                detection.team_id,
                detection.generation,
                self.session.generation()
            );
            return Ok(false);
        }

        log::info!(
            "Team {}: {}",
            detection.team_id,
            self.session.message().unwrap_or_default()
        );
        self.redraw()?;
        Ok(true)
    }

    fn reset(&mut self) -> Result<(), AppError> {
        self.stop_spinner();
        self.session.reset();
        log::debug!("Session reset (generation {})", self.session.generation());
        self.redraw()
    }

    fn start_spinner(&mut self) {
        if !self.options.spinner {
            return;
        }
        let (stop_tx, stop_rx) = oneshot::channel();
        tokio::spawn(run_spinner(stop_rx));
        self.spinner_stop = Some(stop_tx);
    }

    fn stop_spinner(&mut self) {
        if let Some(stop_tx) = self.spinner_stop.take() {
            let _ = stop_tx.send(());
        }
    }
}
