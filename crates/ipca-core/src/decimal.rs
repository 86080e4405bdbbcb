//! Comma-decimal number parsing.
//!
//! IPCA tables publish variations with a comma as the decimal separator
//! (`"0,52"`, `"-1,07"`). [`parse_decimal_comma`] is the single place where
//! those strings become `f64`s.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Why a cell could not be read as a comma-decimal number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The value was empty (or whitespace only).
    #[error("empty numeric value")]
    Empty,

    /// The value is not `[sign]digits[,digits]`, or does not fit in an `f64`.
    #[error("malformed numeric value: {0:?}")]
    Malformed(String),
}

fn decimal_comma_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?(\d+(,\d*)?|,\d+)$").expect("regex is valid"))
}

/// Parse a comma-decimal string such as `"12,5"` into `12.5`.
///
/// Surrounding whitespace is ignored. Accepted shape: optional `+`/`-`,
/// then digits with at most one comma. Either side of the comma may be
/// empty (`",5"`, `"5,"`) but not both. Period decimals, thousands
/// separators and values too large for a finite `f64` are rejected.
pub fn parse_decimal_comma(raw: &str) -> Result<f64, ParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ParseError::Empty);
    }
    if !decimal_comma_pattern().is_match(value) {
        return Err(ParseError::Malformed(raw.to_string()));
    }

    value
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::Malformed(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_parse_simple_comma_decimal() {
        assert!(approx(parse_decimal_comma("12,5").unwrap(), 12.5));
        assert!(approx(parse_decimal_comma("0,52").unwrap(), 0.52));
    }

    #[test]
    fn test_parse_integer_without_comma() {
        assert!(approx(parse_decimal_comma("3").unwrap(), 3.0));
    }

    #[test]
    fn test_parse_negative_value() {
        assert!(approx(parse_decimal_comma("-1,07").unwrap(), -1.07));
    }

    #[test]
    fn test_parse_explicit_plus_sign() {
        assert!(approx(parse_decimal_comma("+0,10").unwrap(), 0.1));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(approx(parse_decimal_comma("  1,2 \t").unwrap(), 1.2));
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert_eq!(parse_decimal_comma(""), Err(ParseError::Empty));
        assert_eq!(parse_decimal_comma("   "), Err(ParseError::Empty));
    }

    #[test]
    fn test_parse_rejects_two_commas() {
        assert_eq!(
            parse_decimal_comma("1,2,3"),
            Err(ParseError::Malformed("1,2,3".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_period_decimal() {
        assert!(matches!(
            parse_decimal_comma("1.5"),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_rejects_thousands_separator() {
        assert!(matches!(
            parse_decimal_comma("1.234,5"),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_dangling_comma() {
        assert!(approx(parse_decimal_comma(",5").unwrap(), 0.5));
        assert!(approx(parse_decimal_comma("5,").unwrap(), 5.0));
        assert!(approx(parse_decimal_comma("-,25").unwrap(), -0.25));
    }

    #[test]
    fn test_parse_rejects_lone_comma() {
        assert!(parse_decimal_comma(",").is_err());
        assert!(parse_decimal_comma("-,").is_err());
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let huge = "9".repeat(400);
        assert_eq!(
            parse_decimal_comma(&huge),
            Err(ParseError::Malformed(huge.clone()))
        );
    }

    #[test]
    fn test_parse_rejects_text() {
        assert!(parse_decimal_comma("abc").is_err());
        assert!(parse_decimal_comma("-").is_err());
        assert!(parse_decimal_comma("1,2x").is_err());
    }
}
