//! Tests for the domain error payload and trace correlation.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no session"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("denied"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("duplicate"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] err: Error, #[case] expected: ErrorCode) {
    assert_eq!(err.code(), expected);
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("valid UUID");
    let expected = trace_id.to_string();
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(expected.as_str()));
}

#[test]
fn new_leaves_trace_id_empty_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[test]
fn details_attach_and_serialise_camel_case() {
    let error = Error::invalid_request("bad")
        .with_trace_id("abc")
        .with_details(json!({ "field": "tmdbId" }));

    let value = serde_json::to_value(&error).expect("serialises");
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["traceId"], "abc");
    assert_eq!(value["details"]["field"], "tmdbId");
}

#[test]
fn absent_optionals_are_omitted() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("serialises");
    assert!(value.get("traceId").is_none());
    assert!(value.get("details").is_none());
}

#[test]
fn deserialises_snake_case_trace_alias() {
    let error: Error =
        serde_json::from_value(json!({ "code": "forbidden", "message": "no", "trace_id": "t1" }))
            .expect("deserialises");
    assert_eq!(error.trace_id(), Some("t1"));
}

#[test]
fn display_uses_message() {
    assert_eq!(Error::conflict("already there").to_string(), "already there");
}
