//! Integration tests for RUM events flowing from the monitor to the platform

mod common;

use chrono::Duration;
use serde_json::json;

use common::fixtures::{attrs, rum_config, TestSdk, START_MILLIS};
use common::mock_platform::MockPlatform;
use rumbridge::platform::{ErrorInfo, TrackingConsent};
use rumbridge::processors::TIMESTAMP_ATTRIBUTE;
use rumbridge::rum::{RumErrorSource, RumUserActionType};
use rumbridge::Attributes;

#[test]
fn test_start_view_carries_attributes_and_producer_time() {
    let test = TestSdk::new(rum_config());

    test.sdk
        .rum()
        .start_view("home", Some("Home"), attrs(&[("k", json!("v"))]));
    // Moving the clock after the call must not change the event time
    test.clock.advance(Duration::seconds(30));
    test.drain();

    let calls = test.platform.calls_to("rum.start_view");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args["key"], "home");
    assert_eq!(calls[0].args["name"], "Home");
    assert_eq!(
        calls[0].args["attributes"],
        json!({ "k": "v", TIMESTAMP_ATTRIBUTE: START_MILLIS })
    );
}

#[test]
fn test_view_name_defaults_to_key() {
    let test = TestSdk::new(rum_config());
    test.sdk.rum().start_view("checkout", None, Attributes::new());
    test.drain();

    assert_eq!(
        test.platform.calls_to("rum.start_view")[0].args["name"],
        "checkout"
    );
}

#[test]
fn test_events_reach_platform_in_call_order() {
    let test = TestSdk::new(rum_config());
    let rum = test.sdk.rum();

    rum.start_view("home", None, Attributes::new());
    rum.add_attribute("plan", "premium");
    rum.start_action(RumUserActionType::Scroll, "feed", Attributes::new());
    rum.stop_action(RumUserActionType::Scroll, "feed", Attributes::new());
    rum.add_action(RumUserActionType::Tap, "buy", Attributes::new());
    rum.add_error(
        ErrorInfo::new("boom").with_kind("IOError"),
        RumErrorSource::Network,
        Attributes::new(),
    );
    rum.add_feature_flag_evaluation("new-checkout", true);
    rum.remove_attribute("plan");
    rum.stop_view("home", Attributes::new());
    rum.stop_session();
    test.drain();

    assert_eq!(
        test.platform.methods(),
        vec![
            "rum.start_view",
            "rum.add_attribute",
            "rum.start_action",
            "rum.stop_action",
            "rum.add_action",
            "rum.add_error",
            "rum.add_feature_flag_evaluation",
            "rum.remove_attribute",
            "rum.stop_view",
            "rum.stop_session",
        ]
    );

    let error = &test.platform.calls_to("rum.add_error")[0];
    assert_eq!(error.args["error"]["kind"], "IOError");
    assert_eq!(error.args["source"], "network");

    let flag = &test.platform.calls_to("rum.add_feature_flag_evaluation")[0];
    assert_eq!(flag.args["value"], true);

    // Untimed calls do not get a timestamp
    let attribute = &test.platform.calls_to("rum.add_attribute")[0];
    assert_eq!(attribute.args, json!({ "key": "plan", "value": "premium" }));
}

#[test]
fn test_each_event_keeps_its_own_time() {
    let test = TestSdk::new(rum_config());
    let rum = test.sdk.rum();

    rum.add_action(RumUserActionType::Tap, "first", Attributes::new());
    test.clock.advance(Duration::milliseconds(250));
    rum.add_action(RumUserActionType::Tap, "second", Attributes::new());
    test.drain();

    let times: Vec<_> = test
        .platform
        .calls_to("rum.add_action")
        .iter()
        .map(|c| c.args["attributes"][TIMESTAMP_ATTRIBUTE].as_i64().unwrap())
        .collect();
    assert_eq!(times, vec![START_MILLIS, START_MILLIS + 250]);
}

#[test]
fn test_tracked_first_party_resource() {
    let test = TestSdk::new(rum_config());
    let tracker = test.sdk.resource_tracker();

    let resource = tracker.begin("https://api.example.com/items?page=2", "post");
    let context = resource.trace_context.expect("first party request is traced");
    assert!(context.sampled);
    assert!(resource.headers.contains_key("x-datadog-trace-id"));
    assert!(resource.headers.contains_key("traceparent"));
    assert!(!resource.headers.contains_key("b3"));
    let key = resource.key.clone();
    resource.finish(Some(201), Some("application/json; charset=utf-8"), Some(64));
    test.drain();

    let start = &test.platform.calls_to("rum.start_resource")[0];
    assert_eq!(start.args["key"], key.as_str());
    assert_eq!(start.args["method"], "POST");
    assert_eq!(start.args["url"], "https://api.example.com/items?page=2");
    assert!(start.args["attributes"]["_dd.trace_id"].is_string());
    assert_eq!(start.args["attributes"]["_dd.rule_psr"], 1.0);
    assert_eq!(start.args["attributes"][TIMESTAMP_ATTRIBUTE], START_MILLIS);

    let stop = &test.platform.calls_to("rum.stop_resource")[0];
    assert_eq!(stop.args["key"], key.as_str());
    assert_eq!(stop.args["type"], "native");
    assert_eq!(stop.args["status_code"], 201);
    assert_eq!(stop.args["size"], 64);
}

#[test]
fn test_third_party_resource_is_not_traced() {
    let test = TestSdk::new(rum_config());
    let tracker = test.sdk.resource_tracker();

    let resource = tracker.begin("https://cdn.other.net/logo.png", "GET");
    assert!(resource.headers.is_empty());
    assert!(resource.trace_context.is_none());
    resource.finish(Some(200), Some("image/png"), None);
    test.drain();

    let start = &test.platform.calls_to("rum.start_resource")[0];
    assert_eq!(
        start.args["attributes"],
        json!({ TIMESTAMP_ATTRIBUTE: START_MILLIS })
    );
    let stop = &test.platform.calls_to("rum.stop_resource")[0];
    assert_eq!(stop.args["type"], "image");
    assert!(stop.args["size"].is_null());
}

#[test]
fn test_failed_resource() {
    let test = TestSdk::new(rum_config());
    let resource = test
        .sdk
        .resource_tracker()
        .begin("https://example.com/upload", "PUT");
    resource.fail("TimeoutError", "request timed out");
    test.drain();

    let stop = &test.platform.calls_to("rum.stop_resource_with_error")[0];
    assert_eq!(stop.args["error_type"], "TimeoutError");
    assert_eq!(stop.args["message"], "request timed out");
}

#[test]
fn test_platform_failure_is_reported_as_telemetry() {
    let platform = MockPlatform::new();
    platform.fail("rum.start_view");
    let test = TestSdk::with_platform(rum_config(), platform);

    test.sdk.rum().start_view("home", None, Attributes::new());
    test.sdk.rum().stop_view("home", Attributes::new());
    test.drain();

    assert_eq!(
        test.platform.methods(),
        vec![
            "rum.start_view",
            "platform.send_error_telemetry",
            "rum.stop_view",
        ]
    );
}

#[test]
fn test_rum_disabled_drops_rum_calls() {
    let mut config = rum_config();
    config.rum.enabled = false;
    let test = TestSdk::new(config);

    test.sdk.rum().start_view("home", None, Attributes::new());
    test.sdk
        .resource_tracker()
        .begin("https://example.com/", "GET")
        .finish(Some(200), None, None);
    test.drain();

    assert!(test.platform.methods().is_empty());
    let snapshot = test.sdk.metrics().snapshot();
    assert_eq!(snapshot.feature("rum").unwrap().processed, 3);
}

#[test]
fn test_sdk_wide_calls_go_through_the_queue() {
    let test = TestSdk::new(rum_config());

    test.sdk.set_user_info(
        Some("u-1"),
        Some("Ada"),
        None,
        attrs(&[("tier", json!("gold"))]),
    );
    test.sdk
        .add_user_extra_info(attrs(&[("beta", json!(true))]));
    test.sdk.set_tracking_consent(TrackingConsent::Granted);
    test.sdk.clear_all_data();
    test.drain();

    assert_eq!(
        test.platform.methods(),
        vec![
            "platform.set_user_info",
            "platform.add_user_extra_info",
            "platform.set_tracking_consent",
            "platform.clear_all_data",
        ]
    );
    let user = &test.platform.calls_to("platform.set_user_info")[0];
    assert_eq!(user.args["id"], "u-1");
    assert!(user.args["email"].is_null());
    assert_eq!(user.args["extra_info"]["tier"], "gold");
    assert_eq!(
        test.platform.calls_to("platform.set_tracking_consent")[0].args["consent"],
        "granted"
    );
}
