//! Attendance submission
//!
//! One identifier in, one POST out, one `Verdict` back. Rejections and
//! transport failures are verdicts rather than errors because they are part
//! of the operator flow.

pub mod client;
pub mod error;
pub mod verdict;

pub use client::{AttendanceEndpoint, HttpEndpoint, TEAM_ID_FIELD};
pub use error::SubmitError;
pub use verdict::{submit, Verdict, NETWORK_ERROR_MESSAGE};
