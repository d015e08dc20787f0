//! Fake feed host and web archive for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - any registered path: a canned status, body and optional delay
//! - `GET /cdx/search/cdx?url=...`: the capture table registered for `url`
//!
//! Replay requests (`/web/<timestamp>/<endpoint>`) are ordinary registered
//! paths, so a test registers them with [`FakeFeedServer::replay_path`].

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::get,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

#[derive(Default)]
struct ServerState {
    paths: HashMap<String, Canned>,
    /// CDX response per `url` query value.
    captures: HashMap<String, Canned>,
    hits: Vec<String>,
}

type Shared = Arc<Mutex<ServerState>>;

/// Handle to the running fake server.
pub struct FakeFeedServer {
    addr: SocketAddr,
    state: Shared,
}

impl FakeFeedServer {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state: Shared = Arc::new(Mutex::new(ServerState::default()));

        let app = Router::new()
            .route("/cdx/search/cdx", get(capture_index))
            .fallback(canned_path)
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL, e.g. `http://127.0.0.1:PORT`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Path the archive replays `endpoint` at `timestamp` from.
    pub fn replay_path(timestamp: &str, endpoint: &str) -> String {
        format!("/web/{timestamp}/{endpoint}")
    }

    pub async fn serve(&self, path: &str, status: u16, body: &str) {
        self.insert(path, status, body, None).await;
    }

    pub async fn serve_slowly(&self, path: &str, body: &str, delay: Duration) {
        self.insert(path, 200, body, Some(delay)).await;
    }

    async fn insert(&self, path: &str, status: u16, body: &str, delay: Option<Duration>) {
        let mut state = self.state.lock().await;
        state.paths.insert(
            path.to_string(),
            Canned {
                status: StatusCode::from_u16(status).unwrap(),
                body: body.to_string(),
                delay,
            },
        );
    }

    /// Register the CDX table for `endpoint`: a header row plus one row per timestamp.
    pub async fn captures(&self, endpoint: &str, timestamps: &[&str]) {
        let mut rows = vec![serde_json::json!(["urlkey", "timestamp", "original", "statuscode"])];
        for ts in timestamps {
            rows.push(serde_json::json!(["key", ts, endpoint, "200"]));
        }
        let body = serde_json::Value::Array(rows).to_string();
        self.state.lock().await.captures.insert(
            endpoint.to_string(),
            Canned {
                status: StatusCode::OK,
                body,
                delay: None,
            },
        );
    }

    /// Make the CDX lookup for `endpoint` fail with `status`.
    pub async fn captures_fail(&self, endpoint: &str, status: u16) {
        self.state.lock().await.captures.insert(
            endpoint.to_string(),
            Canned {
                status: StatusCode::from_u16(status).unwrap(),
                body: String::new(),
                delay: None,
            },
        );
    }

    /// Paths requested so far, in arrival order.
    pub async fn hits(&self) -> Vec<String> {
        self.state.lock().await.hits.clone()
    }
}

/// RSS 2.0 document with one item per `(title, summary)`.
pub fn rss(items: &[(&str, &str)]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\"><channel>\
         <title>Fake</title><link>https://news.example</link><description>Fake feed</description>",
    );
    for (n, (title, summary)) in items.iter().enumerate() {
        xml.push_str(&format!(
            "<item><title>{title}</title><link>https://news.example/{n}</link>\
             <description>{summary}</description>\
             <pubDate>Fri, 05 Jan 2024 08:30:00 GMT</pubDate></item>"
        ));
    }
    xml.push_str("</channel></rss>");
    xml
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn respond(canned: Option<Canned>) -> (StatusCode, String) {
    match canned {
        Some(c) => {
            if let Some(delay) = c.delay {
                tokio::time::sleep(delay).await;
            }
            (c.status, c.body)
        }
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

async fn canned_path(State(state): State<Shared>, uri: Uri) -> impl IntoResponse {
    let canned = {
        let mut state = state.lock().await;
        state.hits.push(uri.path().to_string());
        state.paths.get(uri.path()).cloned()
    };
    respond(canned).await
}

async fn capture_index(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let url = params.get("url").cloned().unwrap_or_default();
    let canned = {
        let mut state = state.lock().await;
        state.hits.push(format!("/cdx/search/cdx?url={url}"));
        state.captures.get(&url).cloned()
    };
    match canned {
        Some(c) => respond(Some(c)).await,
        // The real index answers an unknown url with an empty table.
        None => (StatusCode::OK, "[]".to_string()),
    }
}
