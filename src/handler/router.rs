//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation, route matching, and dispatching.

use hyper::{header, Method, Request, StatusCode};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::borrow::Cow;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::climate;
use super::welcome::WELCOME_HTML;
use crate::config::AppState;
use crate::http::{self, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use crate::store::StoreResult;

const API_PREFIX: &str = "/api/v1.0";

/// Every path the service answers
///
/// Date parameters are percent-decoded; they borrow from the path unless decoding changed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    Welcome,
    Precipitation,
    Stations,
    Tobs,
    From { start: Cow<'a, str> },
    Range { start: Cow<'a, str>, end: Cow<'a, str> },
    Liveness,
    Readiness,
}

impl<'a> Route<'a> {
    /// Match a request path; path parameters must be single non-empty segments
    /// that decode to UTF-8 without introducing a `/`
    pub fn parse(path: &'a str) -> Option<Self> {
        match path {
            "/" => return Some(Self::Welcome),
            "/healthz" => return Some(Self::Liveness),
            "/readyz" => return Some(Self::Readiness),
            _ => {}
        }

        let rest = path.strip_prefix(API_PREFIX)?;
        match rest {
            "/precipitation" => Some(Self::Precipitation),
            "/stations" => Some(Self::Stations),
            "/tobs" => Some(Self::Tobs),
            _ => {
                if let Some(start) = rest.strip_prefix("/from/") {
                    Some(Self::From {
                        start: decode_segment(start)?,
                    })
                } else if let Some(params) = rest.strip_prefix("/range/") {
                    let (start, end) = params.split_once('/')?;
                    Some(Self::Range {
                        start: decode_segment(start)?,
                        end: decode_segment(end)?,
                    })
                } else {
                    None
                }
            }
        }
    }
}

fn decode_segment(raw: &str) -> Option<Cow<'_, str>> {
    if raw.is_empty() || raw.contains('/') {
        return None;
    }
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    (!decoded.contains('/')).then_some(decoded)
}

/// Main entry point for HTTP request handling
///
/// Never fails: store errors become a bare 500 and are only logged.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();
    let method = parts.method;
    let path = parts.uri.path();
    let http_cfg = &state.config.http;

    let response = match method {
        Method::GET | Method::HEAD => route_request(path, &state).await,
        Method::OPTIONS => http::build_options_response(http_cfg.enable_cors),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            http::build_405_response()
        }
    };

    let body_bytes = http::body_len(&response);
    let response = if method == Method::HEAD {
        http::strip_body(response)
    } else {
        response
    };
    let response = http::finalize(response, &http_cfg.server_name, http_cfg.enable_cors);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            parts
                .uri
                .path_and_query()
                .map_or_else(|| path.to_string(), ToString::to_string),
        );
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(body_bytes).unwrap_or(usize::MAX);
        entry.user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request to its endpoint
async fn route_request(path: &str, state: &AppState) -> HttpResponse {
    let Some(route) = Route::parse(path) else {
        return http::build_404_response();
    };

    match route {
        Route::Welcome => http::build_html_response(WELCOME_HTML),
        Route::Liveness => http::build_health_response(StatusCode::OK, "ok"),
        Route::Readiness => match climate::with_timeout(state, state.store.ping()).await {
            Ok(()) => http::build_health_response(StatusCode::OK, "ok"),
            Err(e) => {
                logger::log_warning(&format!("Readiness check failed: {e}"));
                http::build_health_response(StatusCode::SERVICE_UNAVAILABLE, "unavailable")
            }
        },
        Route::Precipitation => respond(
            path,
            climate::with_timeout(state, climate::precipitation(state)).await,
        ),
        Route::Stations => respond(
            path,
            climate::with_timeout(state, climate::stations(state)).await,
        ),
        Route::Tobs => respond(path, climate::with_timeout(state, climate::tobs(state)).await),
        Route::From { start } => respond(
            path,
            climate::with_timeout(state, climate::summary_from(state, &start)).await,
        ),
        Route::Range { start, end } => respond(
            path,
            climate::with_timeout(state, climate::summary_range(state, &start, &end)).await,
        ),
    }
}

/// Serialize a query result, or log the failure and answer 500
fn respond<T: Serialize>(path: &str, result: StoreResult<T>) -> HttpResponse {
    match result {
        Ok(body) => http::json_response(StatusCode::OK, &body),
        Err(e) => {
            logger::log_request_error(path, &e);
            http::build_500_response()
        }
    }
}

const fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
