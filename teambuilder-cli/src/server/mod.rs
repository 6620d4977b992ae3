//! Read-only JSON endpoints over a loaded roster.

pub mod query;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use hyper::header::{
    ALLOW, CACHE_CONTROL, CONTENT_TYPE, ETAG, HeaderValue, IF_NONE_MATCH, LAST_MODIFIED,
};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use serde::Serialize;
use teambuilder_core::{
    Character, Roster, TeamSummary, apply_filters, encode_team_code, partition_ids,
};

use query::{QueryError, criteria_from_query, team_ids_from_query};

/// Shared, immutable server state.
#[derive(Debug)]
pub struct AppState {
    pub roster: Arc<Roster>,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(roster: Arc<Roster>) -> Self {
        Self {
            roster,
            loaded_at: Utc::now(),
        }
    }

    fn last_modified(&self) -> String {
        self.loaded_at
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TeamResponse<'a> {
    ids: Vec<String>,
    discarded: Vec<String>,
    characters: Vec<&'a Character>,
    summary: TeamSummary,
    /// `None` when the team is too large to share as a code.
    code: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    characters: usize,
    fingerprint: String,
    loaded_at: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Bind `addr` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let make_svc = make_service_fn(move |_conn| {
        let state = Arc::clone(&state);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { Ok::<_, Infallible>(handle(&state, &req)) }
            }))
        }
    });

    let server = Server::try_bind(&addr)
        .with_context(|| format!("failed to bind {addr}"))?
        .serve(make_svc);
    log::info!("serving roster on http://{}", server.local_addr());
    server
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await
        .context("server error")
}

/// Resolves when `signal` fires. If the listener cannot be installed this never
/// resolves, so the server keeps running instead of stopping at once.
async fn shutdown_on(signal: impl Future<Output = std::io::Result<()>>) {
    match signal.await {
        Ok(()) => log::info!("shutting down"),
        Err(err) => {
            log::error!("failed to listen for shutdown signal: {err}");
            std::future::pending::<()>().await;
        }
    }
}

/// Route one request.
pub fn handle(state: &AppState, req: &Request<Body>) -> Response<Body> {
    if req.method() != Method::GET {
        let mut response = error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
        response
            .headers_mut()
            .insert(ALLOW, HeaderValue::from_static("GET"));
        return response;
    }

    let query = req.uri().query();
    let response = match req.uri().path() {
        "/api/characters" => characters(state, req, query),
        "/api/team" => team(state, query),
        "/api/facets" => json_response(StatusCode::OK, &state.roster.facets()),
        "/api/status" => json_response(
            StatusCode::OK,
            &StatusResponse {
                characters: state.roster.len(),
                fingerprint: format!("{:016x}", state.roster.fingerprint()),
                loaded_at: state.loaded_at.to_rfc3339(),
            },
        ),
        _ => error_response(StatusCode::NOT_FOUND, "not found"),
    };
    log::debug!("GET {} -> {}", req.uri(), response.status());
    response
}

fn characters(state: &AppState, req: &Request<Body>, query: Option<&str>) -> Response<Body> {
    let etag = state.roster.etag();
    let mut response = if etag_matches(req, &etag) {
        empty_response(StatusCode::NOT_MODIFIED)
    } else {
        match criteria_from_query(query) {
            Ok(criteria) => {
                json_response(StatusCode::OK, &apply_filters(&state.roster, &criteria))
            }
            Err(err) => return query_error(&err),
        }
    };
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&etag) {
        headers.insert(ETAG, value);
    }
    if let Ok(value) = HeaderValue::from_str(&state.last_modified()) {
        headers.insert(LAST_MODIFIED, value);
    }
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

fn team(state: &AppState, query: Option<&str>) -> Response<Body> {
    let ids = match team_ids_from_query(query) {
        Ok(ids) => ids,
        Err(err) => return query_error(&err),
    };
    let outcome = partition_ids(&state.roster, ids);
    let characters: Vec<&Character> = outcome
        .applied
        .iter()
        .filter_map(|id| state.roster.get(id))
        .collect();
    let body = TeamResponse {
        summary: TeamSummary::from_characters(characters.iter().copied()),
        code: encode_team_code(&outcome.applied)
            .inspect_err(|err| log::debug!("no team code for {} ids: {err}", outcome.applied.len()))
            .ok(),
        characters,
        ids: outcome.applied,
        discarded: outcome.discarded,
    };
    json_response(StatusCode::OK, &body)
}

fn etag_matches(req: &Request<Body>, etag: &str) -> bool {
    req.headers()
        .get_all(IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|tag| tag.trim().trim_start_matches("W/"))
        .any(|tag| tag == etag || tag == "*")
}

fn query_error(err: &QueryError) -> Response<Body> {
    log::debug!("rejected query: {err}");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response<Body> {
    json_response(status, &ErrorBody { error: message })
}

fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response<Body> {
    match serde_json::to_vec(body) {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = status;
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(err) => {
            log::error!("failed to serialize response: {err}");
            empty_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn empty_response(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}
