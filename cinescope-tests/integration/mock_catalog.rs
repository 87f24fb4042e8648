//! Local HTTP catalog standing in for the remote search endpoint.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// How the catalog answers one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(StatusCode),
    /// Body sent verbatim with a JSON content type.
    Raw(&'static str),
    Delayed(Duration, Box<Reply>),
}

impl Reply {
    pub fn after(self, delay: Duration) -> Self {
        Reply::Delayed(delay, Box::new(self))
    }
}

/// What the catalog saw for one request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub query: Option<String>,
    pub raw_query: Option<String>,
    pub accept: Option<String>,
    pub user_agent: Option<String>,
}

type Responder = Arc<dyn Fn(&str) -> Reply + Send + Sync>;

#[derive(Clone)]
struct CatalogState {
    responder: Responder,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

/// Running catalog server, stopped on drop.
pub struct MockCatalog {
    pub base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    server: JoinHandle<()>,
}

impl MockCatalog {
    /// Serves `GET /search` and `GET /api/search`, answering each query with `responder`.
    pub async fn start(responder: impl Fn(&str) -> Reply + Send + Sync + 'static) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = CatalogState {
            responder: Arc::new(responder),
            seen: Arc::clone(&seen),
        };
        let router = Router::new()
            .route("/search", get(search))
            .route("/api/search", get(search))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            seen,
            server,
        }
    }

    /// Answers every request the same way.
    pub async fn fixed(reply: Reply) -> Self {
        Self::start(move |_| reply.clone()).await
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|request| request.query)
            .collect()
    }
}

impl Drop for MockCatalog {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Wrapped result list of `Name`-keyed items whose title contains `query`.
pub fn titles_matching(titles: &[&str], query: &str) -> Reply {
    let needle = query.to_lowercase();
    let items: Vec<Value> = titles
        .iter()
        .enumerate()
        .filter(|(_, title)| title.to_lowercase().contains(&needle))
        .map(|(i, title)| json!({ "imdbID": format!("tt{:07}", i + 1), "Name": title }))
        .collect();
    Reply::Json(json!({ "results": items }))
}

/// Base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn search(
    State(state): State<CatalogState>,
    RawQuery(raw_query): RawQuery,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let header_text = |name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let query = params.get("q").cloned();
    state.seen.lock().unwrap().push(SeenRequest {
        query: query.clone(),
        raw_query,
        accept: header_text(header::ACCEPT),
        user_agent: header_text(header::USER_AGENT),
    });

    let mut reply = (state.responder)(query.as_deref().unwrap_or_default());
    if let Reply::Delayed(delay, inner) = reply {
        tokio::time::sleep(delay).await;
        reply = *inner;
    }

    match reply {
        Reply::Json(body) => axum::Json(body).into_response(),
        Reply::Status(status) => (status, "catalog unavailable").into_response(),
        Reply::Raw(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Reply::Delayed(..) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
