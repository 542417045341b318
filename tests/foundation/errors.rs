//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use trattoria_foundation::{EntityId, Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_validation() {
    let err = Error::validation("hours", "must be greater than 0");
    assert!(matches!(err.kind, ErrorKind::Validation { .. }));
    assert!(err.is_validation());
    let msg = format!("{err}");
    assert!(msg.contains("hours"));
}

#[test]
fn error_association() {
    let err = Error::association("staff#1 cannot manage staff#2");
    assert!(err.is_association());
    assert!(format!("{err}").contains("cannot manage"));
}

#[test]
fn error_identity_conflict() {
    let err = Error::identity_conflict("customer", EntityId::new(3));
    assert!(matches!(err.kind, ErrorKind::IdentityConflict { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("customer"));
    assert!(msg.contains('3'));
}

#[test]
fn error_entity_not_found() {
    let err = Error::entity_not_found("order", EntityId::new(42));
    assert!(matches!(err.kind, ErrorKind::EntityNotFound { .. }));
    assert!(format!("{err}").contains("42"));
}

#[test]
fn error_not_found_and_corrupt() {
    let missing = Error::not_found("data/staff.msgpack");
    let corrupt = Error::corrupt("truncated record");

    assert!(matches!(missing.kind, ErrorKind::NotFound(_)));
    assert!(matches!(corrupt.kind, ErrorKind::CorruptData(_)));
    assert!(!missing.is_validation());
    assert!(!corrupt.is_association());
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_collects_frames() {
    let err = Error::corrupt("bad peer").with_context(
        ErrorContext::new()
            .with_operation("load")
            .with_frame("extent order")
            .with_frame("record 10"),
    );

    let context = err.context.as_ref().unwrap();
    assert_eq!(context.stack.len(), 2);
    let shown = context.to_string();
    assert!(shown.starts_with("in load"));
    assert!(shown.contains("at record 10"));
}
