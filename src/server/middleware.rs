use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Logs each HTTP request and its outcome at debug level.
pub async fn trace_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    tracing::debug!(method = %method, uri = %uri, "HTTP request received");

    let start_time = Instant::now();
    let response = next.run(request).await;

    tracing::debug!(
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = %start_time.elapsed().as_millis(),
        "HTTP request completed"
    );

    response
}
