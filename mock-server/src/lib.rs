//! Test peer for the form request client.
//!
//! Serves a handful of fixed routes: form/query echo, canned statuses, a
//! deliberately slow reply for timeout tests, and the `/search` endpoint the
//! example caller queries.

use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    extract::{Form, Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::debug;

pub type Fields = BTreeMap<String, String>;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default)]
    pub hl: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", get(echo_query).post(echo_form))
        .route("/ok", get(ok).post(ok))
        .route("/status/{code}", get(status).post(status))
        .route("/slow/{ms}", get(slow).post(slow))
        .route("/search", get(search))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo_query(Query(fields): Query<Fields>) -> Json<Fields> {
    debug!(?fields, "echo query");
    Json(fields)
}

async fn echo_form(Form(fields): Form<Fields>) -> Json<Fields> {
    debug!(?fields, "echo form");
    Json(fields)
}

async fn ok() -> &'static str {
    "ok"
}

async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, format!("status {}", status.as_u16()))
}

async fn slow(Path(ms): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    "ok"
}

async fn search(Query(query): Query<SearchQuery>) -> String {
    format!(
        "results for {} (hl={}, output={})",
        query.q,
        query.hl.as_deref().unwrap_or("-"),
        query.output.as_deref().unwrap_or("-"),
    )
}
