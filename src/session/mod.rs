//! Scan session state
//!
//! One `ScanSession` exists per running scanner. It is owned by the
//! controller loop and changed only through its transition methods.

mod state;

pub use state::{Detection, Outcome, ScanSession, ScanStatus};
