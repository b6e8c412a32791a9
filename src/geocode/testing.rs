//! Test doubles: an in-memory provider and a local HTTP stub.

use super::providers::GeocodingProvider;
use super::types::{GeoCoordinate, GeocodeError};
use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::Router;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Hit(GeoCoordinate),
    Miss,
    Error,
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Reply>,
    last: Option<Reply>,
    calls: Vec<(String, String)>,
}

/// Replays scripted replies in order (the last one repeats) and records every call.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    script: Arc<Mutex<Script>>,
}

impl ScriptedProvider {
    pub fn new(first: Reply) -> Self {
        Self::default().then(first)
    }

    pub fn then(self, reply: Reply) -> Self {
        self.script.lock().unwrap().replies.push_back(reply);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.iter().map(|(q, _)| q.clone()).collect()
    }

    pub fn country_codes(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.iter().map(|(_, cc)| cc.clone()).collect()
    }
}

impl GeocodingProvider for ScriptedProvider {
    fn search(&self, query: &str, country_code: &str) -> Result<Vec<GeoCoordinate>, GeocodeError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push((query.to_string(), country_code.to_string()));
        let reply = match script.replies.pop_front() {
            Some(r) => {
                script.last = Some(r);
                r
            }
            None => script.last.unwrap_or(Reply::Miss),
        };
        match reply {
            Reply::Hit(c) => Ok(vec![c]),
            Reply::Miss => Ok(Vec::new()),
            Reply::Error => Err(GeocodeError::Network("connection refused".into())),
        }
    }
}

// ─── Local HTTP stub ────────────────────────────────────────────

/// One request as seen by [`StubServer`].
#[derive(Debug, Clone)]
pub struct Captured {
    pub path: String,
    pub params: HashMap<String, String>,
    pub user_agent: Option<String>,
}

/// Serves a fixed status and body on every path of a loopback port.
pub struct StubServer {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Captured>>>,
}

impl StubServer {
    pub fn start(status: u16, body: &'static str) -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let status = StatusCode::from_u16(status).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let app = Router::new().fallback(
            move |uri: Uri, headers: HeaderMap, Query(params): Query<HashMap<String, String>>| {
                let log = Arc::clone(&log);
                async move {
                    log.lock().unwrap().push(Captured {
                        path: uri.path().to_string(),
                        params,
                        user_agent: headers
                            .get(header::USER_AGENT)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                    });
                    (status, body)
                }
            },
        );

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        Self { base_url, seen }
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.seen.lock().unwrap().clone()
    }
}
