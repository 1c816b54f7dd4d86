//! Cross-origin policy.

use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};

use super::request_id::REQUEST_ID_HEADER;

/// Build the CORS layer.
///
/// With no configured origin every origin and request header is allowed.
/// Otherwise only the given origin may call the API, sending `content-type`
/// and `x-request-id`. An origin that is not a valid header value is logged
/// and falls back to the permissive policy. `x-request-id` is always
/// readable by the caller.
#[must_use]
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .expose_headers([request_id.clone()]);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer
            .allow_origin(origin)
            .allow_headers([header::CONTENT_TYPE, request_id]),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Invalid CORS origin, allowing any origin");
            layer.allow_origin(Any).allow_headers(Any)
        }
        None => layer.allow_origin(Any).allow_headers(Any),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::put,
    };
    use tower::ServiceExt;

    use super::*;

    async fn preflight(origin: Option<&str>) -> axum::response::Response {
        let app = Router::new()
            .route("/customers", put(|| async { "ok" }))
            .layer(cors_layer(origin));
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/customers")
            .header(header::ORIGIN, "http://app.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .header(
                header::ACCESS_CONTROL_REQUEST_HEADERS,
                "content-type,x-request-id",
            )
            .body(Body::empty())
            .unwrap_or_else(|e| panic!("invalid request: {e}"));
        app.oneshot(request)
            .await
            .unwrap_or_else(|e| panic!("router failed: {e}"))
    }

    #[tokio::test]
    async fn test_restricted_origin_allows_request_id_header() {
        let response = preflight(Some("http://app.example.com")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let allowed = response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap_or_default()
            .to_ascii_lowercase();
        assert!(allowed.contains("content-type"));
        assert!(allowed.contains(REQUEST_ID_HEADER));
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://app.example.com"
        );
    }

    #[tokio::test]
    async fn test_default_allows_any_header() {
        let response = preflight(None).await;
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS], "*");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
