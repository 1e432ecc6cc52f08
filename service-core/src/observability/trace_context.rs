//! Outbound W3C trace context (`traceparent` / `tracestate`).
//!
//! Completion calls can take tens of seconds; stamping them with the current
//! span lets the collector show the provider round trip inside the inbound
//! request's trace.

use opentelemetry::trace::{SpanContext, TraceContextExt};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub const TRACEPARENT_HEADER: &str = "traceparent";
pub const TRACESTATE_HEADER: &str = "tracestate";

/// `00-{trace_id}-{span_id}-{flags}`
fn traceparent(span_context: &SpanContext) -> String {
    format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    )
}

/// Headers describing `span_context`, empty when it is not valid.
fn headers_for(span_context: &SpanContext) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if !span_context.is_valid() {
        return headers;
    }

    if let Ok(value) = HeaderValue::from_str(&traceparent(span_context)) {
        headers.insert(TRACEPARENT_HEADER, value);
    }

    let state = span_context.trace_state().header();
    if !state.is_empty() {
        if let Ok(value) = HeaderValue::from_str(&state) {
            headers.insert(TRACESTATE_HEADER, value);
        }
    }

    headers
}

/// Add the current span's trace context to `headers`.
///
/// Without an OTLP layer installed the span has no OpenTelemetry context and
/// nothing is added.
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let context = tracing::Span::current().context();
    headers.extend(headers_for(context.span().span_context()));
}

/// Request builder that adds trace context when sent.
pub struct TracedRequest(RequestBuilder);

impl TracedRequest {
    pub fn json<T: serde::Serialize + ?Sized>(self, body: &T) -> Self {
        Self(self.0.json(body))
    }

    pub fn bearer_auth<T: std::fmt::Display>(self, token: T) -> Self {
        Self(self.0.bearer_auth(token))
    }

    pub async fn send(self) -> Result<Response, reqwest::Error> {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);
        self.0.headers(headers).send().await
    }
}

pub trait TracedClientExt {
    fn traced_post(&self, url: &str) -> TracedRequest;
}

impl TracedClientExt for Client {
    fn traced_post(&self, url: &str) -> TracedRequest {
        TracedRequest(self.post(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{SpanId, TraceFlags, TraceId, TraceState};

    fn sampled_context(state: TraceState) -> SpanContext {
        SpanContext::new(
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap(),
            SpanId::from_hex("00f067aa0ba902b7").unwrap(),
            TraceFlags::SAMPLED,
            false,
            state,
        )
    }

    #[test]
    fn test_no_headers_without_active_trace() {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);
        assert!(headers.is_empty());
    }

    #[test]
    fn test_traceparent_format() {
        let headers = headers_for(&sampled_context(TraceState::default()));
        assert_eq!(
            headers[TRACEPARENT_HEADER],
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"
        );
        assert!(!headers.contains_key(TRACESTATE_HEADER));
    }

    #[test]
    fn test_tracestate_forwarded() {
        let state = TraceState::from_key_value([("vendor", "abc")]).unwrap();
        let headers = headers_for(&sampled_context(state));
        assert_eq!(headers[TRACESTATE_HEADER], "vendor=abc");
    }

    #[test]
    fn test_invalid_context_yields_nothing() {
        assert!(headers_for(&SpanContext::empty_context()).is_empty());
    }
}
