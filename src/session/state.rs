//! The scan session finite-state machine
//!
//! ```text
//!   Idle ──detect──▶ Scanning ──begin_processing──▶ Processing ──complete──▶ Success | Error
//!    ▲                                                                           │
//!    └──────────────────────────────── reset ◀───────────────────────────────────┘
//! ```
//!
//! `reset` is valid from every state and bumps the generation, which makes
//! results issued under the previous generation stale.

use strum_macros::{Display, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ScanStatus {
    Idle,
    Scanning,
    Processing,
    Success,
    Error,
}

impl ScanStatus {
    pub fn is_idle(self) -> bool {
        self == ScanStatus::Idle
    }

    /// Success and Error wait for an operator reset.
    pub fn is_settled(self) -> bool {
        matches!(self, ScanStatus::Success | ScanStatus::Error)
    }
}

/// An accepted detection, tagged with the session generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub team_id: String,
    pub generation: u64,
}

/// Settled status plus operator message for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    status: ScanStatus,
    message: String,
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ScanStatus::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ScanStatus::Error,
            message: message.into(),
        }
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSession {
    status: ScanStatus,
    scanned_value: Option<String>,
    message: Option<String>,
    generation: u64,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            status: ScanStatus::Idle,
            scanned_value: None,
            message: None,
            generation: 0,
        }
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn scanned_value(&self) -> Option<&str> {
        self.scanned_value.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Accept a decoded payload if the session is idle.
    ///
    /// Returns `None` (and changes nothing) when the session is busy or the
    /// payload is empty. A returned `Detection` must be submitted exactly once.
    pub fn detect(&mut self, payload: &str) -> Option<Detection> {
        if !self.status.is_idle() || payload.is_empty() {
            return None;
        }
        self.status = ScanStatus::Scanning;
        self.scanned_value = Some(payload.to_string());
        Some(Detection {
            team_id: payload.to_string(),
            generation: self.generation,
        })
    }

    /// Mark the request for `generation` as issued.
    pub fn begin_processing(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.status != ScanStatus::Scanning {
            return false;
        }
        self.status = ScanStatus::Processing;
        true
    }

    /// Apply a submission outcome. Stale generations and sessions that are not
    /// waiting on a request are left untouched.
    pub fn complete(&mut self, generation: u64, outcome: Outcome) -> bool {
        if generation != self.generation
            || !matches!(self.status, ScanStatus::Scanning | ScanStatus::Processing)
        {
            return false;
        }
        self.status = outcome.status;
        self.message = Some(outcome.message);
        true
    }

    pub fn reset(&mut self) {
        self.status = ScanStatus::Idle;
        self.scanned_value = None;
        self.message = None;
        self.generation += 1;
    }
}
