use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use catalog_core::RequestId;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Attach a request id and a tracing span to every request.
///
/// A well-formed UUID in `x-request-id` is reused; anything else gets a fresh id.
/// The id is echoed on the response and stored as a request extension.
pub async fn request_context(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<RequestId>().ok())
        .unwrap_or_default();
    req.extensions_mut().insert(request_id);

    let span = tracing::info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id = %request_id,
    );

    let mut res = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(status = res.status().as_u16(), "request completed");
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}
