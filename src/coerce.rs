//! Primitive coercions from document tree values to Rust types.
//!
//! Every coercion follows the same rules: `null` passes through as `None`,
//! native numbers narrow via the target's standard narrowing, strings parse
//! via the target's textual grammar, and any other shape is an error.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde_json::Value;

use crate::error::AccessError;

/// Default pattern for date coercion when neither the call site nor the
/// configuration provides one.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn parse_error(value: &Value, target: &'static str) -> AccessError {
    AccessError::Parse {
        value: value.to_string(),
        target,
    }
}

/// Convert a value to its text form. Never fails: non-string scalars and
/// branches render as their canonical JSON text; `null` stays `None`.
pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Coerce a value to a boolean. Accepts native booleans and the strings
/// `"true"`/`"false"`, case-insensitive.
pub fn to_bool(value: &Value) -> Result<Option<bool>, AccessError> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        Value::String(s) => s
            .to_ascii_lowercase()
            .parse::<bool>()
            .map(Some)
            .map_err(|_| parse_error(value, "bool")),
        _ => Err(parse_error(value, "bool")),
    }
}

/// Coerce a value to an `i32`.
pub fn to_i32(value: &Value) -> Result<Option<i32>, AccessError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i as i32))
            } else if let Some(f) = n.as_f64() {
                Ok(Some(f as i32))
            } else {
                Err(parse_error(value, "i32"))
            }
        }
        Value::String(s) => s
            .parse::<i32>()
            .map(Some)
            .map_err(|_| parse_error(value, "i32")),
        _ => Err(parse_error(value, "i32")),
    }
}

/// Coerce a value to an `i64`. String input may carry a trailing `L` tag,
/// stripped before parsing, used to ship 64-bit integers that are not safe
/// as JSON numbers.
pub fn to_i64(value: &Value) -> Result<Option<i64>, AccessError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Some(f as i64))
            } else {
                Err(parse_error(value, "i64"))
            }
        }
        Value::String(s) => {
            let text = s.strip_suffix('L').unwrap_or(s);
            text.parse::<i64>()
                .map(Some)
                .map_err(|_| parse_error(value, "i64"))
        }
        _ => Err(parse_error(value, "i64")),
    }
}

/// Coerce a value to an `f32`.
pub fn to_f32(value: &Value) -> Result<Option<f32>, AccessError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(|f| Some(f as f32))
            .ok_or_else(|| parse_error(value, "f32")),
        Value::String(s) => s
            .parse::<f32>()
            .map(Some)
            .map_err(|_| parse_error(value, "f32")),
        _ => Err(parse_error(value, "f32")),
    }
}

/// Coerce a value to an `f64`.
pub fn to_f64(value: &Value) -> Result<Option<f64>, AccessError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| parse_error(value, "f64")),
        Value::String(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| parse_error(value, "f64")),
        _ => Err(parse_error(value, "f64")),
    }
}

/// Parse a date string with a chrono strftime pattern and an optional fixed
/// zone identifier (`"+02:00"`, `"Z"`, `"UTC"`).
///
/// A pattern with no time-of-day fields falls back to a date-only parse at
/// midnight. `None` or an empty zone means the local offset.
pub fn parse_date(
    text: &str,
    pattern: &str,
    zone: Option<&str>,
) -> Result<DateTime<FixedOffset>, AccessError> {
    let naive = parse_naive(text, pattern)?;

    match zone {
        Some(z) if !z.is_empty() => {
            let offset = parse_zone(z)?;
            offset.from_local_datetime(&naive).earliest().ok_or_else(|| {
                AccessError::DateFormat(format!(
                    "[{}] is not representable in zone [{}]",
                    text, z
                ))
            })
        }
        _ => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.fixed_offset())
            .ok_or_else(|| {
                AccessError::DateFormat(format!(
                    "[{}] is not representable in the local zone",
                    text
                ))
            }),
    }
}

fn parse_naive(text: &str, pattern: &str) -> Result<NaiveDateTime, AccessError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, pattern) {
        return Ok(dt);
    }

    // Date-only patterns carry no time fields and fail the full parse.
    if let Ok(date) = NaiveDate::parse_from_str(text, pattern) {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }

    Err(AccessError::DateFormat(format!(
        "[{}] does not match pattern [{}]",
        text, pattern
    )))
}

/// Parse a zone identifier into a fixed offset.
pub fn parse_zone(zone: &str) -> Result<FixedOffset, AccessError> {
    if zone == "Z" || zone.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    zone.parse::<FixedOffset>()
        .map_err(|_| AccessError::DateFormat(format!("unknown time zone [{}]", zone)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_text_passthrough_and_canonical() {
        assert_eq!(to_text(&json!("text")), Some("text".to_string()));
        assert_eq!(to_text(&json!(10)), Some("10".to_string()));
        assert_eq!(to_text(&json!(true)), Some("true".to_string()));
        assert_eq!(to_text(&json!(null)), None);
        assert_eq!(to_text(&json!([1, 2])), Some("[1,2]".to_string()));
    }

    #[test]
    fn test_to_bool() {
        assert_eq!(to_bool(&json!(true)).unwrap(), Some(true));
        assert_eq!(to_bool(&json!("TRUE")).unwrap(), Some(true));
        assert_eq!(to_bool(&json!("false")).unwrap(), Some(false));
        assert_eq!(to_bool(&json!(null)).unwrap(), None);
        assert!(to_bool(&json!("yes")).is_err());
        assert!(to_bool(&json!(1)).is_err());
    }

    #[test]
    fn test_to_i32_narrowing() {
        assert_eq!(to_i32(&json!(10)).unwrap(), Some(10));
        assert_eq!(to_i32(&json!(10.7)).unwrap(), Some(10));
        assert_eq!(to_i32(&json!("42")).unwrap(), Some(42));
        assert!(to_i32(&json!("10.5")).is_err());
        assert!(to_i32(&json!([])).is_err());
    }

    #[test]
    fn test_to_i64_trailing_tag() {
        assert_eq!(to_i64(&json!(999999999999999i64)).unwrap(), Some(999999999999999));
        assert_eq!(
            to_i64(&json!("999999999999999L")).unwrap(),
            Some(999999999999999)
        );
        assert_eq!(to_i64(&json!("77")).unwrap(), Some(77));
        assert!(to_i64(&json!("L")).is_err());
        assert!(to_i64(&json!({})).is_err());
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(to_f64(&json!(5.3)).unwrap(), Some(5.3));
        assert_eq!(to_f64(&json!(5)).unwrap(), Some(5.0));
        assert_eq!(to_f64(&json!("5.3")).unwrap(), Some(5.3));
        assert!(to_f64(&json!("five")).is_err());
    }

    #[test]
    fn test_parse_date_with_zone() {
        let date = parse_date("2022-08-10 10:30:00", DEFAULT_DATE_FORMAT, Some("UTC")).unwrap();
        assert_eq!(date.to_rfc3339(), "2022-08-10T10:30:00+00:00");

        let date = parse_date("2022-08-10 10:30:00", DEFAULT_DATE_FORMAT, Some("+02:00")).unwrap();
        assert_eq!(date.to_rfc3339(), "2022-08-10T10:30:00+02:00");
    }

    #[test]
    fn test_parse_date_date_only_pattern() {
        let date = parse_date("2022-08-10", "%Y-%m-%d", Some("Z")).unwrap();
        assert_eq!(date.to_rfc3339(), "2022-08-10T00:00:00+00:00");
    }

    #[test]
    fn test_parse_date_pattern_mismatch() {
        let result = parse_date("2022-08-10 10:30:00", "%Y/%m/%d %H:%M:%S", Some("UTC"));
        assert!(matches!(result, Err(AccessError::DateFormat(_))));
    }

    #[test]
    fn test_parse_zone_unknown() {
        assert!(parse_zone("Mars/Olympus").is_err());
    }
}
