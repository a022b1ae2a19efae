use super::*;
use crate::model::ListDraft;
use crate::services::packing_list::{add_item, create_list, set_unit, update_item};
use crate::state::test_helpers::{draft, test_app_state};

async fn list_with_tent(store: &dyn Store) -> ListDetail {
    let list = create_list(store, &ListDraft { title: "Trip".into(), description: None }, None).await.unwrap();
    add_item(store, list.list.id, &draft("Tent", 800, ItemKind::Base)).await.unwrap()
}

// =============================================================================
// bytes_to_hex / generate_token
// =============================================================================

#[test]
fn bytes_to_hex_pads_each_byte() {
    assert_eq!(bytes_to_hex(&[]), "");
    assert_eq!(bytes_to_hex(&[0x0a, 0xff]), "0aff");
}

#[test]
fn generated_tokens_are_64_hex_chars_and_distinct() {
    let a = generate_token();
    let b = generate_token();
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
}

// =============================================================================
// regenerate_token / get_shared_view
// =============================================================================

#[tokio::test]
async fn new_list_is_not_shared() {
    let state = test_app_state();
    let detail = list_with_tent(state.store()).await;
    assert!(detail.list.share_token.is_none());
}

#[tokio::test]
async fn regeneration_revokes_previous_token() {
    let state = test_app_state();
    let detail = list_with_tent(state.store()).await;

    let first = regenerate_token(state.store(), detail.list.id).await.unwrap();
    let second = regenerate_token(state.store(), detail.list.id).await.unwrap();
    assert_ne!(first, second);

    assert!(matches!(get_shared_view(state.store(), &first).await, Err(PackError::NotFound { .. })));
    let view = get_shared_view(state.store(), &second).await.unwrap();
    assert_eq!(view.title, "Trip");
}

#[tokio::test]
async fn shared_view_reflects_later_edits() {
    let state = test_app_state();
    let detail = list_with_tent(state.store()).await;
    let token = regenerate_token(state.store(), detail.list.id).await.unwrap();

    update_item(state.store(), detail.list.id, detail.items[0].id, &draft("Tarp", 300, ItemKind::Base)).await.unwrap();
    set_unit(state.store(), detail.list.id, Unit::Ounce).await.unwrap();

    let view = get_shared_view(state.store(), &token).await.unwrap();
    assert_eq!(view.unit, Unit::Ounce);
    assert_eq!(view.items[0].name, "Tarp");
    assert_eq!(view.items[0].display_weight, "10.6 oz");
    assert_eq!(view.summary.base_weight_g, 300);
    assert_eq!(view.display.base_weight, "10.6 oz");
}

#[tokio::test]
async fn shared_view_hides_internal_ids() {
    let state = test_app_state();
    let detail = list_with_tent(state.store()).await;
    let token = regenerate_token(state.store(), detail.list.id).await.unwrap();

    let json = serde_json::to_value(get_shared_view(state.store(), &token).await.unwrap()).unwrap();
    assert!(json.get("id").is_none());
    assert!(json.get("share_token").is_none());
    assert!(json["items"][0].get("id").is_none());
    assert_eq!(json["items"][0]["position"], 0);
    assert_eq!(json["items"][0]["weight_grams"], 800);
}

#[tokio::test]
async fn empty_or_unknown_token_is_not_found() {
    let state = test_app_state();
    list_with_tent(state.store()).await;

    assert!(matches!(get_shared_view(state.store(), "").await, Err(PackError::NotFound { .. })));
    assert!(matches!(get_shared_view(state.store(), "   ").await, Err(PackError::NotFound { .. })));
    assert!(matches!(get_shared_view(state.store(), "deadbeef").await, Err(PackError::NotFound { .. })));
}

#[tokio::test]
async fn regenerate_for_unknown_list_is_not_found() {
    let state = test_app_state();
    let err = regenerate_token(state.store(), Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, PackError::NotFound { entity: "list", .. }));
}
