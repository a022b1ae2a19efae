use super::*;
use crate::store::Collection;

#[test]
fn error_codes_are_stable() {
    assert_eq!(PackError::validation("x").error_code(), "E_VALIDATION");
    assert_eq!(PackError::item_not_found(Uuid::nil()).error_code(), "E_NOT_FOUND");
    assert_eq!(PackError::Conflict("x".into()).error_code(), "E_CONFLICT");
}

#[test]
fn only_conflicts_are_retryable() {
    assert!(PackError::Conflict("stale".into()).retryable());
    assert!(!PackError::validation("bad").retryable());
    assert!(!PackError::item_not_found(Uuid::nil()).retryable());
}

#[test]
fn store_not_found_maps_to_entity_not_found() {
    let id = Uuid::new_v4();
    let err = PackError::from(StoreError::NotFound { collection: Collection::Items, id });
    match err {
        PackError::NotFound { entity, id: got } => {
            assert_eq!(entity, "item");
            assert_eq!(got, id.to_string());
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn store_conflict_maps_to_conflict() {
    let err = PackError::from(StoreError::Conflict("duplicate share token".into()));
    assert!(matches!(err, PackError::Conflict(msg) if msg.contains("share token")));
}
