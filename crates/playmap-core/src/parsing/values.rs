use serde_json::Value;

/// Coerce any field value into a non-negative count.
///
/// Handles formats like:
/// - `3` -> 3
/// - `2.9` -> 2 (truncated)
/// - `"4"` / `" 4 swings"` -> 4 (leading integer, like `parseInt`)
/// - `"abc"`, `null`, `true`, negatives, missing -> 0
///
/// Zero and missing are indistinguishable afterwards.
pub fn parse_int_safe(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                Some(v)
            } else if n.as_i64().is_some() {
                // negative integer
                None
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f.trunc() as u64)
            }
        }
        Some(Value::String(s)) => leading_integer(s).and_then(|v| u64::try_from(v).ok()),
        _ => None,
    };

    parsed.map(|v| v.min(u32::MAX as u64) as u32).unwrap_or(0)
}

/// Parse the leading integer of a string the way `parseInt` does:
/// skip leading whitespace, accept one sign, then read digits.
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Coerce a facility field into present (`true`) or absent (`false`).
///
/// Source encodings: real booleans, "Yes"/"No" strings, "true"/"false",
/// 1/0, or the field simply missing.
pub fn parse_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "yes" | "y" | "true" | "1"
        ),
        Some(Value::Number(n)) => n.as_f64().map(|f| f > 0.0).unwrap_or(false),
        _ => false,
    }
}

/// Coerce a categorical/text field. Empty strings and "null" become `None`.
pub fn parse_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(if *b { "Yes" } else { "No" }.to_string()),
        _ => None,
    }
}

/// Parse a coordinate from a number or numeric string.
pub fn parse_coordinate(value: Option<&Value>) -> Option<f64> {
    let v = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    v.filter(|f| f.is_finite())
}

/// Check that a (lat, lng) pair lies on the globe.
pub fn is_valid_position(lat: f64, lng: f64) -> bool {
    lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_from_number() {
        assert_eq!(parse_int_safe(Some(&json!(3))), 3);
        assert_eq!(parse_int_safe(Some(&json!(2.9))), 2);
    }

    #[test]
    fn test_int_from_string_prefix() {
        assert_eq!(parse_int_safe(Some(&json!("4"))), 4);
        assert_eq!(parse_int_safe(Some(&json!("  4 swings"))), 4);
        assert_eq!(parse_int_safe(Some(&json!("3.7"))), 3);
    }

    #[test]
    fn test_int_garbage_is_zero() {
        assert_eq!(parse_int_safe(Some(&json!("abc"))), 0);
        assert_eq!(parse_int_safe(Some(&json!(null))), 0);
        assert_eq!(parse_int_safe(Some(&json!(true))), 0);
        assert_eq!(parse_int_safe(Some(&json!(""))), 0);
        assert_eq!(parse_int_safe(None), 0);
    }

    #[test]
    fn test_int_negative_is_zero() {
        assert_eq!(parse_int_safe(Some(&json!(-2))), 0);
        assert_eq!(parse_int_safe(Some(&json!("-5"))), 0);
        assert_eq!(parse_int_safe(Some(&json!(-1.5))), 0);
    }

    #[test]
    fn test_flag_encodings() {
        assert!(parse_flag(Some(&json!(true))));
        assert!(parse_flag(Some(&json!("Yes"))));
        assert!(parse_flag(Some(&json!(" yes "))));
        assert!(parse_flag(Some(&json!(1))));
        assert!(!parse_flag(Some(&json!("No"))));
        assert!(!parse_flag(Some(&json!(false))));
        assert!(!parse_flag(Some(&json!(null))));
        assert!(!parse_flag(None));
    }

    #[test]
    fn test_text_empty_is_none() {
        assert_eq!(parse_text(Some(&json!("  "))), None);
        assert_eq!(parse_text(Some(&json!("null"))), None);
        assert_eq!(
            parse_text(Some(&json!(" Newcastle "))),
            Some("Newcastle".into())
        );
    }

    #[test]
    fn test_coordinate_from_string() {
        assert_eq!(parse_coordinate(Some(&json!("-32.7"))), Some(-32.7));
        assert_eq!(parse_coordinate(Some(&json!("north"))), None);
        assert_eq!(parse_coordinate(Some(&json!(151.5))), Some(151.5));
    }

    #[test]
    fn test_position_range() {
        assert!(is_valid_position(-32.9, 151.7));
        assert!(!is_valid_position(151.7, -32.9));
    }
}
