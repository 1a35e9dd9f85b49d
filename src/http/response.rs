//! HTTP response building module
//!
//! Provides builders for the status codes the service answers with, decoupled from the endpoint logic.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::logger;

pub type HttpResponse = Response<Full<Bytes>>;

/// Paths listed in the 404 body
pub const AVAILABLE_ENDPOINTS: [&str; 6] = [
    "/",
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/from/<start>",
    "/api/v1.0/range/<start>/<end>",
];

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    match serde_json::to_string_pretty(body) {
        Ok(json) => build(status, "application/json", Bytes::from(json)),
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            build_500_response()
        }
    }
}

/// Build HTML response
pub fn build_html_response(html: &'static str) -> HttpResponse {
    build(
        StatusCode::OK,
        "text/html; charset=utf-8",
        Bytes::from_static(html.as_bytes()),
    )
}

/// Build health check response
pub fn build_health_response(status: StatusCode, text: &'static str) -> HttpResponse {
    build(status, "text/plain", Bytes::from_static(text.as_bytes()))
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    let body = serde_json::json!({
        "error": "Not Found",
        "available_endpoints": AVAILABLE_ENDPOINTS,
    });
    build(
        StatusCode::NOT_FOUND,
        "application/json",
        Bytes::from(body.to_string()),
    )
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> HttpResponse {
    let mut resp = build(
        StatusCode::METHOD_NOT_ALLOWED,
        "text/plain",
        Bytes::from_static(b"405 Method Not Allowed"),
    );
    resp.headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD, OPTIONS"));
    resp
}

/// Build 500 Internal Server Error response; carries no detail about the cause
pub fn build_500_response() -> HttpResponse {
    build(
        StatusCode::INTERNAL_SERVER_ERROR,
        "application/json",
        Bytes::from_static(br#"{"error":"Internal Server Error"}"#),
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::ALLOW, "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
            .header(header::ACCESS_CONTROL_ALLOW_METHODS, "GET, HEAD, OPTIONS")
            .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type")
            .header(header::ACCESS_CONTROL_MAX_AGE, "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Length of a response body in bytes
pub fn body_len(resp: &HttpResponse) -> u64 {
    resp.body().size_hint().exact().unwrap_or(0)
}

/// Drop the body of a response to a HEAD request, keeping its length header
pub fn strip_body(resp: HttpResponse) -> HttpResponse {
    let len = body_len(&resp);
    let (mut parts, _) = resp.into_parts();
    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    Response::from_parts(parts, Full::new(Bytes::new()))
}

/// Stamp the `Server` header (and CORS origin when enabled) onto a response
pub fn finalize(mut resp: HttpResponse, server_name: &str, enable_cors: bool) -> HttpResponse {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        resp.headers_mut().insert(header::SERVER, value);
    }
    if enable_cors {
        resp.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }
    resp
}

fn build(status: StatusCode, content_type: &'static str, body: Bytes) -> HttpResponse {
    let fallback = body.clone();
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(fallback))
        })
}

fn log_build_error(kind: &str, err: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {kind} response: {err}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: HttpResponse) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_json_response() {
        let resp = json_response(StatusCode::OK, &vec!["USC00519397", "USC00513117"]);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        let value: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(value, serde_json::json!(["USC00519397", "USC00513117"]));
    }

    #[tokio::test]
    async fn test_404_lists_endpoints() {
        let resp = build_404_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let value: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(value["available_endpoints"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_500_has_no_detail() {
        let resp = build_500_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, r#"{"error":"Internal Server Error"}"#);
    }

    #[test]
    fn test_options_cors_headers() {
        let plain = build_options_response(false);
        assert_eq!(plain.status(), StatusCode::NO_CONTENT);
        assert!(plain
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());

        let cors = build_options_response(true);
        assert_eq!(cors.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_strip_body_keeps_length() {
        let resp = strip_body(build_html_response("<p>hi</p>"));
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "9");
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
        assert!(body_string(resp).await.is_empty());
    }

    #[test]
    fn test_finalize_sets_server_header() {
        let resp = finalize(build_405_response(), "climate-server", false);
        assert_eq!(resp.headers()[header::SERVER], "climate-server");
        assert_eq!(resp.headers()[header::ALLOW], "GET, HEAD, OPTIONS");
    }
}
