//! Capture adapter
//!
//! Camera access and QR decoding live outside this crate. The adapter reads
//! already-decoded payloads from a line stream and feeds them, together with
//! operator commands, to the controller as `ScannerInput`s.

pub mod error;
pub mod input;
pub mod source;

pub use error::CaptureError;
pub use input::{classify_line, pump, LineRole, OperatorCommand, ScannerInput};
pub use source::{CaptureSource, LineSource};
