//! Tests for error handling

use super::*;

#[test]
fn test_error_creation() {
    let error = DiagnosticsError::storage("disk full");
    assert!(matches!(error, DiagnosticsError::Storage(msg) if msg == "disk full"));

    let error = DiagnosticsError::ingestion("empty endpoint id");
    assert!(matches!(error, DiagnosticsError::Ingestion(_)));
}

#[test]
fn test_error_display() {
    let error = DiagnosticsError::InsufficientData {
        required: 10,
        available: 3,
    };
    assert_eq!(
        error.to_string(),
        "Insufficient data: need 10 data points, have 3"
    );

    let error = DiagnosticsError::config("retention must be positive");
    assert_eq!(
        error.to_string(),
        "Configuration error: retention must be positive"
    );
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: DiagnosticsError = io.into();
    assert!(matches!(error, DiagnosticsError::Io(_)));
    assert_eq!(error.category(), ErrorCategory::Storage);
    assert!(error.is_recoverable());
}

#[test]
fn test_config_errors_are_not_recoverable() {
    assert!(!DiagnosticsError::config("bad").is_recoverable());
    assert!(DiagnosticsError::analysis("rule failed").is_recoverable());
}

#[test]
fn test_isolate_passes_through_success() {
    let value = isolate("ok", || Ok(42));
    assert_eq!(value.unwrap(), 42);
}

#[test]
fn test_isolate_returns_errors() {
    let result: Result<()> = isolate("failing", || Err(DiagnosticsError::analysis("boom")));
    assert!(matches!(result, Err(DiagnosticsError::Analysis(_))));
}

#[test]
fn test_isolate_contains_panics() {
    let result: Result<u32> = isolate("panicking", || panic!("rule exploded"));
    match result {
        Err(DiagnosticsError::Analysis(msg)) => assert!(msg.contains("rule exploded")),
        other => panic!("expected analysis error, got {:?}", other),
    }
}

#[test]
fn test_isolate_or_default() {
    let value: Vec<u32> = isolate_or_default("failing", || Err(DiagnosticsError::analysis("x")));
    assert!(value.is_empty());
}
