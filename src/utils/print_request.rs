use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

pub async fn print_req_res(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let res = next.run(req).await;

    tracing::info!(
        %method,
        %uri,
        status = res.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "handled request"
    );

    res
}
