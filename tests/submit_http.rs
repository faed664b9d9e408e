//! HTTP submission against an in-process attendance endpoint

mod common;

use axum::http::header::{CONTENT_TYPE, USER_AGENT};
use axum::http::StatusCode;
use common::{refused_url, AttendanceServer};
use std::time::Duration;
use teamscan::session::ScanStatus;
use teamscan::submit::{submit, AttendanceEndpoint, HttpEndpoint, SubmitError, Verdict};

#[tokio::test]
async fn test_posts_team_id_as_urlencoded_form() {
    let server = AttendanceServer::fixed("Success").await;
    let endpoint = HttpEndpoint::new(server.url.clone(), None).unwrap();

    let reply = endpoint.mark("TEAM 7&co").await.unwrap();
    assert_eq!(reply, "Success");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;
    assert_eq!(
        headers.get(CONTENT_TYPE).unwrap(),
        "application/x-www-form-urlencoded"
    );
    assert!(headers
        .get(USER_AGENT)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("teamscan/"));
    assert_eq!(requests[0].form.len(), 1);
    assert_eq!(requests[0].team_id(), Some("TEAM 7&co"));
}

#[tokio::test]
async fn test_reply_body_decides_regardless_of_status() {
    let server = AttendanceServer::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Success").await;
    let endpoint = HttpEndpoint::new(server.url.clone(), None).unwrap();
    assert_eq!(submit(&endpoint, "TEAM-1").await, Verdict::Recorded);

    let server = AttendanceServer::with_status(StatusCode::OK, "Sheet is locked").await;
    let endpoint = HttpEndpoint::new(server.url.clone(), None).unwrap();
    let verdict = submit(&endpoint, "TEAM-1").await;
    assert_eq!(verdict, Verdict::Rejected("Sheet is locked".to_string()));

    let outcome = verdict.into_outcome("TEAM-1");
    assert_eq!(outcome.status(), ScanStatus::Error);
    assert_eq!(outcome.message(), "Error: Sheet is locked");
}

#[tokio::test]
async fn test_empty_reply_is_a_rejection() {
    let server = AttendanceServer::fixed("").await;
    let endpoint = HttpEndpoint::new(server.url.clone(), None).unwrap();

    let outcome = submit(&endpoint, "TEAM-1").await.into_outcome("TEAM-1");
    assert_eq!(outcome.message(), "Error: ");
}

#[tokio::test]
async fn test_connection_refused_is_a_network_failure() {
    let endpoint = HttpEndpoint::new(refused_url().await, None).unwrap();

    assert!(matches!(
        endpoint.mark("TEAM-1").await,
        Err(SubmitError::Transport { .. })
    ));

    let outcome = submit(&endpoint, "TEAM-1").await.into_outcome("TEAM-1");
    assert_eq!(outcome.status(), ScanStatus::Error);
    assert_eq!(outcome.message(), "Network Error.");
}

#[tokio::test]
async fn test_request_timeout_is_a_network_failure() {
    let server = AttendanceServer::slow("Success", Duration::from_secs(2)).await;
    let endpoint =
        HttpEndpoint::new(server.url.clone(), Some(Duration::from_millis(200))).unwrap();

    assert_eq!(endpoint.mark("TEAM-1").await, Err(SubmitError::Timeout));
    assert_eq!(submit(&endpoint, "TEAM-1").await, Verdict::NetworkFailure);
}
