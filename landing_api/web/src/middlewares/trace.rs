use std::time::Duration;

use axum::{
    extract::{MatchedPath, Request},
    response::Response,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, field::display, warn, Span};

use super::request_id::RequestId;

pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    let layer = TraceLayer::new_for_http()
        .make_span_with(make_span)
        .on_request(|_: &Request, _: &Span| debug!("request started"))
        .on_response(on_response)
        .on_body_chunk(())
        .on_eos(())
        .on_failure(());
    router.layer(layer)
}

/// One span per request. `route` is the matched route template, so all form
/// posts share one value while `uri` keeps the concrete path.
fn make_span(request: &Request) -> Span {
    let extensions = request.extensions();
    let route = extensions
        .get::<MatchedPath>()
        .map(|path| display(path.as_str().to_owned()));
    let request_id = extensions.get::<RequestId>().copied().map(display);

    tracing::debug_span!(
        "http-request",
        method = %request.method(),
        uri = %request.uri(),
        route,
        request_id,
    )
}

fn on_response(response: &Response, latency: Duration, _span: &Span) {
    let status = response.status();
    if status.is_server_error() {
        warn!(?latency, %status, "request failed");
    } else {
        debug!(?latency, %status, "request finished");
    }
}
