//! Integration tests for error handling

use gimbal_core::error::{GimbalError, Result, ResultExt};

#[test]
fn test_error_context_chaining() {
    let base_error = GimbalError::discovery("finder unavailable");
    let with_context = base_error.with_context("Handling index change");

    let msg = format!("{}", with_context);
    assert!(msg.contains("Handling index change"));
    assert!(msg.contains("finder unavailable"));
}

#[test]
fn test_error_context_preserves_hint() {
    let base_error = GimbalError::DiscoveryTimeout { waited_ms: 3000 };
    let hint_before = base_error.user_hint();

    let with_context = base_error.with_context("While rescanning");
    let hint_after = with_context.user_hint();

    // Hint should be preserved through context
    assert_eq!(hint_before, hint_after);
    assert!(hint_after.is_some());
}

#[test]
fn test_result_ext_context() {
    let result: Result<()> = Err(GimbalError::control("receiver gone"));
    let with_context = result.context("Issuing motion command");

    assert!(with_context.is_err());
    let err = with_context.unwrap_err();
    let msg = format!("{}", err);
    assert!(msg.contains("Issuing motion command"));
}

#[test]
fn test_user_hints() {
    assert!(GimbalError::DiscoveryTimeout { waited_ms: 100 }
        .user_hint()
        .unwrap()
        .contains("scan_timeout_ms"));

    assert!(GimbalError::IndexOutOfRange { index: 5, count: 2 }
        .user_hint()
        .unwrap()
        .contains("gimbal list"));

    assert!(GimbalError::connect_failed("Cam-1", "refused")
        .user_hint()
        .unwrap()
        .contains("gimbal select"));

    assert!(GimbalError::NoActiveSession
        .user_hint()
        .unwrap()
        .contains("gimbal run"));

    assert!(GimbalError::control("anything").user_hint().is_none());
}

#[test]
fn test_user_recoverable() {
    // Soft conditions: retried on the next relevant input event
    assert!(GimbalError::DiscoveryTimeout { waited_ms: 100 }.is_user_recoverable());
    assert!(GimbalError::IndexOutOfRange { index: 9, count: 1 }.is_user_recoverable());
    assert!(GimbalError::connect_failed("Cam-1", "refused").is_user_recoverable());
    assert!(GimbalError::NoActiveSession.is_user_recoverable());
    assert!(GimbalError::config("bad toml").is_user_recoverable());

    // Hard faults
    assert!(!GimbalError::init("runtime missing").is_user_recoverable());

    // Context does not change the classification
    assert!(GimbalError::NoActiveSession
        .with_context("during teardown")
        .is_user_recoverable());
    assert!(!GimbalError::init("runtime missing")
        .with_context("at startup")
        .is_user_recoverable());
}

#[test]
fn test_error_display_format() {
    let err = GimbalError::DiscoveryTimeout { waited_ms: 3000 };
    assert_eq!(format!("{}", err), "No sources discovered within 3000 ms");

    let err = GimbalError::IndexOutOfRange { index: 5, count: 3 };
    assert_eq!(
        format!("{}", err),
        "Source index 5 out of range (3 sources discovered)"
    );

    let err = GimbalError::connect_failed("Cam-1", "connection refused");
    assert_eq!(
        format!("{}", err),
        "Failed to connect to Cam-1: connection refused"
    );

    let err = GimbalError::NoActiveSession;
    assert_eq!(format!("{}", err), "No active control session");
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "socket not found");
    let gimbal_err: GimbalError = io_err.into();

    let msg = format!("{}", gimbal_err);
    assert!(msg.contains("I/O error"));
    assert!(msg.contains("socket not found"));
}

#[test]
fn test_nested_context() {
    let err = GimbalError::control("receiver gone")
        .with_context("Issuing move")
        .with_context("Handling trigger");

    let msg = format!("{}", err);
    assert!(msg.contains("Handling trigger"));
    assert!(err.is_user_recoverable());
}
