//! Regression coverage for domain errors.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(ErrorCode::InvalidRequest, "invalid_request")]
#[case(ErrorCode::Conflict, "conflict")]
#[case(ErrorCode::ServiceUnavailable, "service_unavailable")]
#[case(ErrorCode::InternalError, "internal_error")]
fn error_codes_serialise_in_snake_case(#[case] code: ErrorCode, #[case] expected: &str) {
    let value = serde_json::to_value(code).expect("serialise code");
    assert_eq!(value, json!(expected));
}

#[test]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::NotFound, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[test]
fn new_substitutes_fallback_for_blank_messages() {
    let err = Error::new(ErrorCode::Conflict, "");
    assert_eq!(err.message(), "conflict");
}

#[test]
fn errors_outside_a_trace_scope_have_no_trace_id() {
    let err = Error::forbidden("only the seller may ship");
    assert!(err.trace_id().is_none());
}

#[tokio::test]
async fn errors_capture_the_scoped_trace_id() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000042"
        .parse()
        .expect("valid trace id");
    let err = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
    assert_eq!(err.trace_id(), Some("00000000-0000-0000-0000-000000000042"));
}

#[test]
fn serialises_details_and_trace_id_in_camel_case() {
    let err = Error::invalid_request("bad rating")
        .with_trace_id("abc")
        .with_details(json!({ "field": "rating" }));
    let value = serde_json::to_value(&err).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "bad rating",
            "traceId": "abc",
            "details": { "field": "rating" },
        })
    );
}

#[test]
fn deserialising_rejects_blank_messages() {
    let result = serde_json::from_value::<Error>(json!({ "code": "conflict", "message": " " }));
    assert!(result.is_err());
}
