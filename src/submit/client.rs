//! HTTP transport for attendance submissions

use super::error::SubmitError;
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

/// Form field carrying the team identifier.
pub const TEAM_ID_FIELD: &str = "teamId";

/// Anything that can record attendance for a team and answer with a text reply.
#[async_trait]
pub trait AttendanceEndpoint: Send + Sync {
    async fn mark(&self, team_id: &str) -> Result<String, SubmitError>;
}

/// Posts `teamId=<id>` as a urlencoded form and returns the body verbatim.
///
/// The HTTP status is not inspected: the body text alone decides the verdict.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: Url,
}

impl HttpEndpoint {
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self, SubmitError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("teamscan/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| SubmitError::ClientSetup {
            reason: e.to_string(),
        })?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl AttendanceEndpoint for HttpEndpoint {
    async fn mark(&self, team_id: &str) -> Result<String, SubmitError> {
        log::debug!("POST {} {}={}", self.url, TEAM_ID_FIELD, team_id);

        let response = self
            .client
            .post(self.url.clone())
            .form(&[(TEAM_ID_FIELD, team_id)])
            .send()
            .await
            .map_err(SubmitError::from_transport)?;

        log::debug!("Endpoint answered with HTTP {}", response.status());

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                SubmitError::Timeout
            } else {
                SubmitError::Body {
                    reason: e.to_string(),
                }
            }
        })
    }
}
