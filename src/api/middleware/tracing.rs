//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

/// Creates the request tracing layer.
///
/// Every request gets an `INFO` span with method, URI and version. The start
/// of a request is logged at `DEBUG`, the response at `INFO` with status and
/// latency, and 5xx responses additionally at `ERROR`. Purchase failures
/// after a payment was created are already logged with their payment id by
/// the purchase service; the span ties those events to the request.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=POST uri=/buy version=HTTP/1.1}: finished processing request latency=312 ms status=200
/// ERROR request{method=POST uri=/buy version=HTTP/1.1}: response failed classification=Status code: 500 Internal Server Error latency=48 ms
/// ```
///
/// # Integration
///
/// Applied outermost in [`crate::routes::app_router`], after CORS, so that
/// rate-limited (`429`) and preflight responses are traced too.
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
