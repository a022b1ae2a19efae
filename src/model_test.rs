use super::*;

fn draft(name: &str, weight_grams: i64) -> ItemDraft {
    ItemDraft { name: name.into(), weight_grams, ..ItemDraft::default() }
}

fn assert_validation(result: Result<ItemFields, PackError>, needle: &str) {
    match result {
        Err(PackError::Validation(msg)) => assert!(msg.contains(needle), "unexpected message: {msg}"),
        other => panic!("expected validation error containing {needle:?}, got {other:?}"),
    }
}

#[test]
fn item_draft_applies_defaults() {
    let fields = draft("  Tent  ", 800).validate().unwrap();
    assert_eq!(fields.name, "Tent");
    assert_eq!(fields.category, Category::Other);
    assert_eq!(fields.kind, ItemKind::Base);
    assert_eq!(fields.quantity, 1);
    assert_eq!(fields.notes, "");
}

#[test]
fn item_draft_parses_explicit_fields() {
    let d = ItemDraft {
        name: "Water".into(),
        category: Some("water".into()),
        weight_grams: 1500,
        quantity: Some(2),
        kind: Some("consumable".into()),
        notes: Some(" start of day ".into()),
    };
    let fields = d.validate().unwrap();
    assert_eq!(fields.category, Category::Water);
    assert_eq!(fields.kind, ItemKind::Consumable);
    assert_eq!(fields.quantity, 2);
    assert_eq!(fields.notes, "start of day");
}

#[test]
fn item_draft_rejects_blank_name() {
    assert_validation(draft("   ", 10).validate(), "name is required");
}

#[test]
fn item_draft_rejects_long_name() {
    assert_validation(draft(&"x".repeat(NAME_MAX_CHARS + 1), 10).validate(), "name must be at most");
    assert!(draft(&"x".repeat(NAME_MAX_CHARS), 10).validate().is_ok());
}

#[test]
fn item_draft_counts_chars_not_bytes() {
    let name = "テ".repeat(NAME_MAX_CHARS);
    assert!(draft(&name, 10).validate().is_ok());
}

#[test]
fn item_draft_rejects_zero_weight_and_quantity() {
    assert_validation(draft("Tent", 0).validate(), "weight_grams");
    let mut d = draft("Tent", 10);
    d.quantity = Some(0);
    assert_validation(d.validate(), "quantity");
}

#[test]
fn item_draft_rejects_weight_beyond_i32() {
    assert_validation(draft("Anvil", i64::from(i32::MAX) + 1).validate(), "too large");
}

#[test]
fn item_draft_rejects_unknown_category_and_kind() {
    let mut d = draft("Tent", 10);
    d.category = Some("spaceship".into());
    assert_validation(d.validate(), "unknown category");

    let mut d = draft("Tent", 10);
    d.kind = Some("carried".into());
    assert_validation(d.validate(), "unknown kind");
}

#[test]
fn item_draft_rejects_long_notes() {
    let mut d = draft("Tent", 10);
    d.notes = Some("n".repeat(NOTES_MAX_CHARS + 1));
    assert_validation(d.validate(), "notes");
}

#[test]
fn list_draft_validates_title_and_description() {
    let ok = ListDraft { title: " JMT ".into(), description: None }.validate().unwrap();
    assert_eq!(ok, ListFields { title: "JMT".into(), description: String::new() });

    assert!(ListDraft { title: String::new(), description: None }.validate().is_err());
    assert!(ListDraft { title: "t".repeat(TITLE_MAX_CHARS + 1), description: None }.validate().is_err());
    assert!(
        ListDraft { title: "ok".into(), description: Some("d".repeat(DESCRIPTION_MAX_CHARS + 1)) }
            .validate()
            .is_err()
    );
}

#[test]
fn category_all_matches_declaration_order() {
    let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    assert_eq!(
        names,
        ["shelter", "sleeping", "backpack", "clothing", "cooking", "food", "water", "electronics", "other"]
    );
    for c in Category::ALL {
        assert_eq!(Category::parse(c.as_str()), Some(c));
    }
}

#[test]
fn unit_parse_accepts_aliases() {
    assert_eq!(Unit::parse("g"), Some(Unit::Gram));
    assert_eq!(Unit::parse("Gram"), Some(Unit::Gram));
    assert_eq!(Unit::parse("oz"), Some(Unit::Ounce));
    assert_eq!(Unit::parse("ounces"), Some(Unit::Ounce));
    assert_eq!(Unit::parse("kg"), None);
}

#[test]
fn wire_names_are_verbatim() {
    let item = GearItem::new(Owner::Catalog, draft("Tent", 800).validate().unwrap(), 0);
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["weight_grams"], 800);
    assert_eq!(json["quantity"], 1);
    assert_eq!(json["kind"], "base");
    assert_eq!(json["category"], "other");
    assert_eq!(json["sort_order"], 0);
    assert!(json["list_id"].is_null());

    let list = PackingList::new(ListFields { title: "Trip".into(), description: String::new() });
    let json = serde_json::to_value(&list).unwrap();
    assert_eq!(json["unit"], "g");
    assert!(json["share_token"].is_null());
    assert!(json["created_at"].is_string());
}

#[test]
fn line_weight_does_not_overflow() {
    let mut item = GearItem::new(Owner::Catalog, draft("Rocks", 1).validate().unwrap(), 0);
    item.weight_grams = i32::MAX;
    item.quantity = i32::MAX;
    assert_eq!(item.line_weight_g(), i64::from(i32::MAX) * i64::from(i32::MAX));
}

#[test]
fn apply_keeps_identity_position_and_packed_state() {
    let mut item = GearItem::new(Owner::List(Uuid::new_v4()), draft("Tent", 800).validate().unwrap(), 7);
    item.packed = true;
    let id = item.id;
    let owner = item.owner();

    item.apply(draft("Tarp", 310).validate().unwrap());
    assert_eq!(item.id, id);
    assert_eq!(item.owner(), owner);
    assert_eq!(item.sort_order, 7);
    assert!(item.packed);
    assert_eq!(item.name, "Tarp");
    assert_eq!(item.weight_grams, 310);
}

#[test]
fn touch_never_moves_updated_at_backwards() {
    let mut list = PackingList::new(ListFields { title: "Trip".into(), description: String::new() });
    let future = list.updated_at + time::Duration::hours(1);
    list.updated_at = future;
    list.touch_at(OffsetDateTime::now_utc());
    assert_eq!(list.updated_at, future);

    let later = future + time::Duration::seconds(1);
    list.touch_at(later);
    assert_eq!(list.updated_at, later);
}
