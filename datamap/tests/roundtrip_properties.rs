//! Round-trip properties: what a strategy writes, it reads back.

use chrono::{NaiveDate, NaiveDateTime};
use datamap::types::{ArrayType, Boolean, DateTime, Integer, MoneyType, Serial, Text};
use datamap::{Access, Currency, DataMap, Dialect, FieldStrategy, FieldValue, Money, Row};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

// ── End-to-end ───────────────────────────────────────────────────

#[test]
fn user_row_round_trip() {
    let map = DataMap::new()
        .with_type(Text::new("username"))
        .with_type(Boolean::new("active"))
        .with_type(DateTime::new("created").with_format("Y-m-d H:i:s").unwrap());

    let source = row(json!({"username": "bob", "active": "yes", "created": "2024-01-15 10:00:00"}));
    let (record, report) = map.load_record(&source, Access::READ).unwrap();

    assert!(report.is_clean());
    assert_eq!(record.get("username"), Some(&FieldValue::from("bob")));
    assert_eq!(record.get("active"), Some(&FieldValue::Bool(true)));
    let expected: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    assert_eq!(record.get("created"), Some(&FieldValue::DateTime(expected)));

    let (out, warnings) = map.get_array(&record, Access::WRITE);
    assert!(warnings.is_empty());
    assert_eq!(
        Value::Object(out),
        json!({"username": "bob", "active": "1", "created": "2024-01-15 10:00:00"})
    );
}

#[test]
fn re_registration_visible_from_both_sides() {
    let mut map = DataMap::new();
    map.add_type(Text::new("name"), None);
    let second = map.add_type(Text::new("name").with_column("full_name"), Some(Access::READ));

    assert_eq!(map.len(), 1);
    let by_property = map.get_type_by_property("name").unwrap();
    let by_column = map.get_type_by_column("full_name").unwrap();
    assert!(std::sync::Arc::ptr_eq(by_property, &second));
    assert!(std::sync::Arc::ptr_eq(by_column, &second));
}

// ── Properties ───────────────────────────────────────────────────

fn dialects() -> impl Strategy<Value = Dialect> {
    prop_oneof![Just(Dialect::Db), Just(Dialect::Form), Just(Dialect::Table)]
}

fn naive_date_time() -> impl Strategy<Value = NaiveDateTime> {
    (1000i32..9999, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
        |(y, mo, d, h, mi, s)| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, s)
                .unwrap()
        },
    )
}

fn round_trip(strategy: &dyn FieldStrategy, value: &FieldValue) -> FieldValue {
    let column = strategy.column_from_value(value).unwrap();
    strategy.property_from_raw(&column).unwrap()
}

proptest! {
    #[test]
    fn boolean_round_trips(b in any::<bool>(), dialect in dialects()) {
        let s = Boolean::new("flag").with_dialect(dialect);
        prop_assert_eq!(round_trip(&s, &FieldValue::Bool(b)), FieldValue::Bool(b));
    }

    #[test]
    fn integer_round_trips(i in any::<i64>()) {
        let s = Integer::new("n");
        prop_assert_eq!(round_trip(&s, &FieldValue::Int(i)), FieldValue::Int(i));
    }

    #[test]
    fn text_round_trips(text in ".*") {
        let s = Text::new("t");
        prop_assert_eq!(round_trip(&s, &FieldValue::Text(text.clone())), FieldValue::Text(text));
    }

    #[test]
    fn date_time_round_trips(dt in naive_date_time()) {
        let s = DateTime::new("at");
        prop_assert_eq!(round_trip(&s, &FieldValue::DateTime(dt)), FieldValue::DateTime(dt));
    }

    #[test]
    fn money_round_trips(amount in -1_000_000_000i64..1_000_000_000, dialect in dialects()) {
        let aud = Currency::parse("AUD").unwrap();
        let s = MoneyType::new("price", aud).with_dialect(dialect);
        let value = FieldValue::Money(Money::from_minor(amount, aud));
        prop_assert_eq!(round_trip(&s, &value), value);
    }

    #[test]
    fn array_round_trips(items in prop::collection::vec("[a-z0-9 ]{1,8}", 1..6)) {
        let s = ArrayType::new("tags");
        let value = FieldValue::List(items);
        prop_assert_eq!(round_trip(&s, &value), value);
    }

    #[test]
    fn serial_preserves_dates(dt in naive_date_time()) {
        let s = Serial::new("blob");
        prop_assert_eq!(round_trip(&s, &FieldValue::DateTime(dt)), FieldValue::DateTime(dt));
    }

    #[test]
    fn integer_never_panics_on_text(input in ".*") {
        let s = Integer::new("n");
        let value = match s.property_from_raw(&Value::String(input)) {
            Ok(v) => v,
            Err(w) => w.fallback_property(),
        };
        prop_assert!(matches!(value, FieldValue::Int(_) | FieldValue::Null));
    }

    #[test]
    fn boolean_output_is_canonical(raw in ".*") {
        let s = Boolean::new("flag");
        let decoded = s.property_from_raw(&Value::String(raw)).unwrap();
        let encoded = s.column_from_value(&decoded).unwrap();
        prop_assert!(encoded == json!("1") || encoded == json!("0"));
    }
}
