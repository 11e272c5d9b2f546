use datamap_types::{Currency, Error, Money};
use pretty_assertions::assert_eq;

fn aud() -> Currency {
    Currency::parse("AUD").unwrap()
}

// ── Currency ─────────────────────────────────────────────────────

#[test]
fn currency_parse_normalizes_case() {
    let c = Currency::parse(" aud ").unwrap();
    assert_eq!(c.code(), "AUD");
    assert_eq!(c.exponent(), 2);
    assert_eq!(c.scale(), 100);
}

#[test]
fn currency_exponents() {
    assert_eq!(Currency::parse("JPY").unwrap().exponent(), 0);
    assert_eq!(Currency::parse("KWD").unwrap().exponent(), 3);
    assert_eq!(Currency::parse("EUR").unwrap().exponent(), 2);
}

#[test]
fn currency_rejects_invalid_codes() {
    for bad in ["", "AU", "AUDD", "A1D", "€€€"] {
        assert!(
            matches!(Currency::parse(bad), Err(Error::InvalidCurrency(_))),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn currency_serde_as_code() {
    let json = serde_json::to_string(&aud()).unwrap();
    assert_eq!(json, "\"AUD\"");
    let back: Currency = serde_json::from_str("\"usd\"").unwrap();
    assert_eq!(back.code(), "USD");
}

// ── Money ────────────────────────────────────────────────────────

#[test]
fn from_minor_keeps_amount() {
    let m = Money::from_minor(1050, aud());
    assert_eq!(m.amount(), 1050);
    assert_eq!(m.currency(), aud());
}

#[test]
fn decimal_string_rendering() {
    assert_eq!(Money::from_minor(1050, aud()).to_decimal_string(), "10.50");
    assert_eq!(Money::from_minor(5, aud()).to_decimal_string(), "0.05");
    assert_eq!(Money::from_minor(-1050, aud()).to_decimal_string(), "-10.50");
    let jpy = Currency::parse("JPY").unwrap();
    assert_eq!(Money::from_minor(1200, jpy).to_decimal_string(), "1200");
}

#[test]
fn display_includes_currency() {
    assert_eq!(Money::from_minor(1050, aud()).to_string(), "AUD 10.50");
}

#[test]
fn parse_decimal_variants() {
    assert_eq!(Money::parse_decimal("10.50", aud()).unwrap().amount(), 1050);
    assert_eq!(Money::parse_decimal("10.5", aud()).unwrap().amount(), 1050);
    assert_eq!(Money::parse_decimal("10", aud()).unwrap().amount(), 1000);
    assert_eq!(Money::parse_decimal(".99", aud()).unwrap().amount(), 99);
    assert_eq!(Money::parse_decimal("1,200.00", aud()).unwrap().amount(), 120000);
    assert_eq!(Money::parse_decimal("-3.25", aud()).unwrap().amount(), -325);
}

#[test]
fn parse_decimal_rounds_half_away_from_zero() {
    assert_eq!(Money::parse_decimal("0.125", aud()).unwrap().amount(), 13);
    assert_eq!(Money::parse_decimal("0.124", aud()).unwrap().amount(), 12);
    assert_eq!(Money::parse_decimal("-0.125", aud()).unwrap().amount(), -13);
}

#[test]
fn parse_decimal_rejects_garbage() {
    for bad in ["", "abc", "1.2.3", "$10", "."] {
        assert!(
            matches!(Money::parse_decimal(bad, aud()), Err(Error::InvalidAmount(_))),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn parse_decimal_overflow_is_an_error() {
    assert!(Money::parse_decimal("99999999999999999999", aud()).is_err());
}

#[test]
fn money_serde_roundtrip() {
    let m = Money::from_minor(1050, aud());
    let json = serde_json::to_value(m).unwrap();
    assert_eq!(json, serde_json::json!({"amount": 1050, "currency": "AUD"}));
    let back: Money = serde_json::from_value(json).unwrap();
    assert_eq!(back, m);
}

// ── Properties ───────────────────────────────────────────────────

mod properties {
    use datamap_types::{Currency, Money};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn decimal_string_parses_back(amount in -1_000_000_000_000i64..1_000_000_000_000, code in prop_oneof!["AUD", "JPY", "KWD"]) {
            let currency = Currency::parse(&code).unwrap();
            let money = Money::from_minor(amount, currency);
            let back = Money::parse_decimal(&money.to_decimal_string(), currency).unwrap();
            prop_assert_eq!(back, money);
        }
    }
}
