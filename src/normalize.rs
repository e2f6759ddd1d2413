//! Field normalization
//!
//! Shared conversions from dialect-specific encodings to canonical values:
//! - JSON numbers to fixed-precision decimals via their exact source text
//! - Export datetime strings repaired into offset-aware instants
//! - `{qty, units}` objects decomposed into magnitude/unit pairs
//! - Durations derived from a temporal span

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde_json::Number;

use crate::dialects::RawQuantity;
use crate::error::ImportError;
use crate::types::NormalizedQuantity;

/// Convert a JSON number to a fixed-precision decimal.
///
/// The conversion goes through the number's textual representation (preserved
/// by serde_json's `arbitrary_precision` feature), never through an `f64`, so
/// a literal like `19.999999` survives exactly as written.
pub fn decimal(n: &Number) -> Result<Decimal, ImportError> {
    let text = n.to_string();
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| ImportError::InvalidNumericValue(text))
}

/// Optional variant of [`decimal`]; absent input stays absent.
pub fn optional_decimal(n: Option<&Number>) -> Result<Option<Decimal>, ImportError> {
    n.map(decimal).transpose()
}

/// Repair an export datetime string and parse it into an offset-aware instant.
///
/// Source timestamps arrive either in the non-ISO export format
/// (`2024-01-01 08:00:00 +0000`) or as standard ISO-8601 with a `Z` suffix.
/// Repairs applied, in order:
/// 1. drop the space before a trailing sign-prefixed offset
/// 2. replace the first date/time separating space with `T`
/// 3. insert the missing colon into a 4-digit offset (`+0000` → `+00:00`)
///
/// A string that still fails to parse after repair, including a naive
/// timestamp with no offset at all, is an `InvalidTemporalValue`; the
/// normalizer never guesses an offset.
pub fn instant(raw: &str) -> Result<DateTime<FixedOffset>, ImportError> {
    let mut s = raw.trim().to_string();

    // "... +0000" / "... -05:00"
    if let Some(sp) = s.rfind(' ') {
        let tail = &s[sp + 1..];
        if (tail.starts_with('+') || tail.starts_with('-'))
            && tail.len() > 1
            && tail[1..].chars().all(|c| c.is_ascii_digit() || c == ':')
        {
            s.remove(sp);
        }
    }

    // date/time separator
    s = s.replacen(' ', "T", 1);

    // "+0000" -> "+00:00"
    if s.len() >= 5 {
        let b = s.as_bytes();
        let sign = b[s.len() - 5];
        if (sign == b'+' || sign == b'-') && b[s.len() - 4..].iter().all(|c| c.is_ascii_digit()) {
            s.insert(s.len() - 2, ':');
        }
    }

    DateTime::parse_from_rfc3339(&s).map_err(|_| ImportError::InvalidTemporalValue(raw.to_string()))
}

/// Decompose a `{qty, units}` object into a normalized magnitude/unit pair.
///
/// An absent object yields `(absent, absent)`. A `null` qty with a unit
/// present yields `(absent, unit)`: unit-without-value is a legal state in
/// the source formats and is preserved, not discarded.
pub fn quantity_pair(q: Option<&RawQuantity>) -> Result<NormalizedQuantity, ImportError> {
    match q {
        None => Ok(NormalizedQuantity::absent()),
        Some(q) => Ok(NormalizedQuantity {
            magnitude: optional_decimal(q.qty.as_ref())?,
            unit: q.units.clone(),
        }),
    }
}

/// Minutes between two instants, as a decimal.
pub fn span_minutes(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Decimal {
    Decimal::from((end - start).num_seconds()) / Decimal::from(60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(text: &str) -> Number {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_decimal_exact_text() {
        // must not become a binary-float-rounded neighbor
        let d = decimal(&num("19.999999")).unwrap();
        assert_eq!(d.to_string(), "19.999999");
    }

    #[test]
    fn test_decimal_integer_literal() {
        let d = decimal(&num("140")).unwrap();
        assert_eq!(d, Decimal::from(140));
    }

    #[test]
    fn test_decimal_scientific_notation() {
        let d = decimal(&num("1.5e3")).unwrap();
        assert_eq!(d, Decimal::from(1500));
    }

    #[test]
    fn test_instant_export_format_matches_iso() {
        let repaired = instant("2024-03-10 08:15:00 +0000").unwrap();
        let iso = instant("2024-03-10T08:15:00+00:00").unwrap();
        assert_eq!(repaired, iso);
    }

    #[test]
    fn test_instant_zulu_is_noop() {
        let z = instant("2024-03-10T08:15:00Z").unwrap();
        let explicit = instant("2024-03-10T08:15:00+00:00").unwrap();
        assert_eq!(z, explicit);
        assert_eq!(z.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_instant_inserts_offset_colon() {
        let dt = instant("2024-01-01T08:00:00+0130").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 90 * 60);
    }

    #[test]
    fn test_instant_negative_offset_with_space() {
        let dt = instant("2024-01-01 08:00:00 -0500").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(dt, instant("2024-01-01T13:00:00Z").unwrap());
    }

    #[test]
    fn test_instant_rejects_naive() {
        let err = instant("2024-01-01 08:00:00").unwrap_err();
        assert!(matches!(err, ImportError::InvalidTemporalValue(_)));
    }

    #[test]
    fn test_instant_rejects_garbage() {
        assert!(instant("yesterday").is_err());
        assert!(instant("").is_err());
    }

    #[test]
    fn test_quantity_pair_absent_object() {
        let q = quantity_pair(None).unwrap();
        assert_eq!(q, NormalizedQuantity::absent());
    }

    #[test]
    fn test_quantity_pair_null_qty_keeps_unit() {
        let raw = RawQuantity {
            qty: None,
            units: Some("km".to_string()),
        };
        let q = quantity_pair(Some(&raw)).unwrap();
        assert_eq!(q.magnitude, None);
        assert_eq!(q.unit.as_deref(), Some("km"));
    }

    #[test]
    fn test_quantity_pair_full() {
        let raw = RawQuantity {
            qty: Some(num("19.999999")),
            units: Some("kcal".to_string()),
        };
        let q = quantity_pair(Some(&raw)).unwrap();
        assert_eq!(q.magnitude.unwrap().to_string(), "19.999999");
        assert_eq!(q.unit.as_deref(), Some("kcal"));
    }

    #[test]
    fn test_span_minutes() {
        let start = instant("2024-01-01T08:00:00Z").unwrap();
        let end = instant("2024-01-01T08:30:00Z").unwrap();
        assert_eq!(span_minutes(start, end), Decimal::from(30));
    }

    #[test]
    fn test_span_minutes_fractional() {
        let start = instant("2024-01-01T08:00:00Z").unwrap();
        let end = instant("2024-01-01T08:00:30Z").unwrap();
        assert_eq!(span_minutes(start, end).to_string(), "0.5");
    }
}
