//! Shared helpers for integration tests
//!
//! `AttendanceServer` is an in-process axum app standing in for the
//! attendance endpoint. It records the headers and decoded form of every
//! request it receives.

#![allow(dead_code)]

use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use reqwest::Url;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use teamscan::display::Screen;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

type Responder = Arc<dyn Fn(&str) -> (StatusCode, String) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub headers: HeaderMap,
    pub form: HashMap<String, String>,
}

impl CapturedRequest {
    pub fn team_id(&self) -> Option<&str> {
        self.form.get("teamId").map(String::as_str)
    }
}

#[derive(Clone)]
struct ServerState {
    responder: Responder,
    delay: Duration,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn mark(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    let team_id = form.get("teamId").cloned().unwrap_or_default();
    state
        .requests
        .lock()
        .unwrap()
        .push(CapturedRequest { headers, form });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (state.responder)(&team_id)
}

pub struct AttendanceServer {
    pub url: Url,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    task: JoinHandle<()>,
}

impl AttendanceServer {
    /// Always answer with `body` and HTTP 200.
    pub async fn fixed(body: &'static str) -> Self {
        Self::with_status(StatusCode::OK, body).await
    }

    /// Answer with `status` and `body`.
    pub async fn with_status(status: StatusCode, body: &'static str) -> Self {
        Self::start(Arc::new(move |_| (status, body.to_string())), Duration::ZERO).await
    }

    /// Answer after `delay`.
    pub async fn slow(body: &'static str, delay: Duration) -> Self {
        Self::start(Arc::new(move |_| (StatusCode::OK, body.to_string())), delay).await
    }

    /// Behaves like the attendance sheet: known teams are marked once, then
    /// reported as already marked; unknown teams are rejected.
    pub async fn roster(teams: &[&str]) -> Self {
        let known: HashSet<String> = teams.iter().map(|t| t.to_string()).collect();
        let marked = Mutex::new(HashSet::new());
        let responder = move |team: &str| {
            let reply = if !known.contains(team) {
                "Team not found"
            } else if marked.lock().unwrap().insert(team.to_string()) {
                "Success"
            } else {
                "Already Marked"
            };
            (StatusCode::OK, reply.to_string())
        };
        Self::start(Arc::new(responder), Duration::ZERO).await
    }

    async fn start(responder: Responder, delay: Duration) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            responder,
            delay,
            requests: Arc::clone(&requests),
        };
        let app = Router::new().route("/exec", post(mark)).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: Url::parse(&format!("http://{}/exec", addr)).unwrap(),
            requests,
            task,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for AttendanceServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// An address nothing listens on.
pub async fn refused_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}/exec", addr)).unwrap()
}

/// Keeps every frame the controller presents.
#[derive(Clone, Default)]
pub struct RecordingScreen(Arc<Mutex<Vec<String>>>);

impl RecordingScreen {
    pub fn frames(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.0.lock().unwrap().last().cloned()
    }

    /// Wait until some frame after index `from` contains `needle`.
    pub async fn wait_for(&self, from: usize, needle: &str) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if self.frames().iter().skip(from).any(|f| f.contains(needle)) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("no frame containing {:?}", needle));
    }
}

impl Screen for RecordingScreen {
    fn present(&mut self, frame: &str) -> std::io::Result<()> {
        self.0.lock().unwrap().push(frame.to_string());
        Ok(())
    }
}
