//! Interpretation of endpoint replies
//!
//! The endpoint speaks a plain-text protocol: `Success`, `Already Marked`, or
//! any other text as a rejection reason. Replies are compared exactly.

use super::client::AttendanceEndpoint;
use crate::session::Outcome;

pub const REPLY_SUCCESS: &str = "Success";
pub const REPLY_ALREADY_MARKED: &str = "Already Marked";
pub const NETWORK_ERROR_MESSAGE: &str = "Network Error.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Recorded,
    AlreadyMarked,
    Rejected(String),
    NetworkFailure,
}

impl Verdict {
    pub fn from_reply(body: &str) -> Self {
        match body {
            REPLY_SUCCESS => Verdict::Recorded,
            REPLY_ALREADY_MARKED => Verdict::AlreadyMarked,
            other => Verdict::Rejected(other.to_string()),
        }
    }

    pub fn into_outcome(self, team_id: &str) -> Outcome {
        match self {
            Verdict::Recorded => Outcome::success(format!("Team {} Marked Present!", team_id)),
            Verdict::AlreadyMarked => {
                Outcome::failure(format!("Team {} was ALREADY marked.", team_id))
            }
            Verdict::Rejected(reply) => Outcome::failure(format!("Error: {}", reply)),
            Verdict::NetworkFailure => Outcome::failure(NETWORK_ERROR_MESSAGE),
        }
    }
}

/// Submit one team identifier: a single attempt, no retry.
pub async fn submit(endpoint: &dyn AttendanceEndpoint, team_id: &str) -> Verdict {
    match endpoint.mark(team_id).await {
        Ok(reply) => {
            log::info!("Endpoint reply for team {}: {:?}", team_id, reply);
            Verdict::from_reply(&reply)
        }
        Err(e) => {
            log::error!("Submission for team {} failed: {}", team_id, e);
            Verdict::NetworkFailure
        }
    }
}
