//! Latency middleware
//!
//! Times every request, feeds the service latency monitor and stamps the
//! elapsed seconds on the response.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

use crate::AppState;

pub const PROCESS_TIME_HEADER: &str = "x-process-time";

pub async fn track_latency(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let start_time = Instant::now();

    let mut response = next.run(request).await;

    let elapsed = start_time.elapsed();
    state.service.latency().record(&path, elapsed);

    if let Ok(value) = HeaderValue::from_str(&format!("{:.6}", elapsed.as_secs_f64())) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }

    response
}
