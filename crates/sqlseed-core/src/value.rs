//! SQL literal values and the raw-field encoding step.
//!
//! Every raw field is turned into a typed [`SqlValue`] before any statement
//! text is joined, so NULL handling never depends on post-processing the
//! interpolated text.

use crate::schema::ColumnType;

/// Raw tokens that stand for a missing value, compared case-insensitively.
pub const NULL_SENTINELS: &[&str] = &["", "null", "none", "nan", "na", "n/a"];

/// A SQL literal ready for inline rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Decimal numeral, kept as written in the source.
    Float(String),
    /// Text value (also used for timestamps).
    Text(String),
}

impl SqlValue {
    /// Returns the SQL representation for inline use (escaped).
    ///
    /// **Warning**: values are interpolated into the statement text, not
    /// bound as parameters. Only feed data you trust.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Self::Int(n) => format!("{n}"),
            Self::Float(raw) => raw.clone(),
            Self::Text(s) => {
                // Escape single quotes by doubling them
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
        }
    }

    /// Returns true for [`SqlValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Returns true if `raw` is one of the [`NULL_SENTINELS`].
#[must_use]
pub fn is_null_sentinel(raw: &str) -> bool {
    let trimmed = raw.trim();
    NULL_SENTINELS
        .iter()
        .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
}

/// Returns true if `value` is a finite decimal numeral.
///
/// Words such as `inf` and overflowing literals such as `1e400` are rejected
/// even though `f64` parses them.
#[must_use]
pub fn is_decimal(value: &str) -> bool {
    value.bytes().any(|b| b.is_ascii_digit())
        && value.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Encodes one raw field as a literal of the given column type.
///
/// Sentinels become NULL. A field that does not parse as the column type
/// (possible when the column was inferred from a sample) falls back to text.
#[must_use]
pub fn encode(raw: &str, column_type: &ColumnType) -> SqlValue {
    if is_null_sentinel(raw) {
        return SqlValue::Null;
    }
    let trimmed = raw.trim();
    match column_type {
        ColumnType::Integer | ColumnType::BigInteger => trimmed
            .parse::<i64>()
            .map_or_else(|_| SqlValue::Text(raw.to_string()), SqlValue::Int),
        ColumnType::Float if is_decimal(trimmed) => SqlValue::Float(trimmed.to_string()),
        ColumnType::Float => SqlValue::Text(raw.to_string()),
        ColumnType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" => SqlValue::Bool(true),
            "false" => SqlValue::Bool(false),
            _ => SqlValue::Text(raw.to_string()),
        },
        ColumnType::Timestamp => SqlValue::Text(trimmed.to_string()),
        ColumnType::Varchar(_) => SqlValue::Text(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_value_inline_null() {
        assert_eq!(SqlValue::Null.to_sql_inline(), "NULL");
    }

    #[test]
    fn test_sql_value_inline_bool() {
        assert_eq!(SqlValue::Bool(true).to_sql_inline(), "TRUE");
        assert_eq!(SqlValue::Bool(false).to_sql_inline(), "FALSE");
    }

    #[test]
    fn test_sql_value_inline_numbers() {
        assert_eq!(SqlValue::Int(-100).to_sql_inline(), "-100");
        assert_eq!(SqlValue::Float("2.50".to_string()).to_sql_inline(), "2.50");
    }

    #[test]
    fn test_sql_value_inline_text_escaping() {
        assert_eq!(
            SqlValue::Text(String::from("O'Brien")).to_sql_inline(),
            "'O''Brien'"
        );
        let malicious = SqlValue::Text(String::from("'; DROP TABLE users; --"));
        assert_eq!(malicious.to_sql_inline(), "'''; DROP TABLE users; --'");
    }

    #[test]
    fn test_null_sentinels() {
        for raw in ["", "  ", "NULL", "null", "None", "NaN", "nan", "NA", "n/a"] {
            assert!(is_null_sentinel(raw), "{raw:?} should be a sentinel");
        }
        assert!(!is_null_sentinel("0"));
        assert!(!is_null_sentinel("Nancy"));
    }

    #[test]
    fn test_encode_by_column_type() {
        assert_eq!(encode("42", &ColumnType::Integer), SqlValue::Int(42));
        assert_eq!(
            encode("2.50", &ColumnType::Float),
            SqlValue::Float(String::from("2.50"))
        );
        assert_eq!(encode("3000000000", &ColumnType::BigInteger), SqlValue::Int(3_000_000_000));
        assert_eq!(encode("TRUE", &ColumnType::Boolean), SqlValue::Bool(true));
        assert_eq!(
            encode("2024-01-01", &ColumnType::Timestamp),
            SqlValue::Text(String::from("2024-01-01"))
        );
        assert_eq!(
            encode("007", &ColumnType::Varchar(50)),
            SqlValue::Text(String::from("007"))
        );
    }

    #[test]
    fn test_encode_sentinel_is_null_for_every_type() {
        assert!(encode("nan", &ColumnType::Float).is_null());
        assert!(encode("", &ColumnType::Integer).is_null());
        assert!(encode("NULL", &ColumnType::Varchar(50)).is_null());
    }

    #[test]
    fn test_float_keeps_source_numeral() {
        assert_eq!(
            encode("12345678901234567891", &ColumnType::Float).to_sql_inline(),
            "12345678901234567891"
        );
        assert_eq!(encode(" 1e-3 ", &ColumnType::Float).to_sql_inline(), "1e-3");
    }

    #[test]
    fn test_non_finite_float_is_text() {
        assert!(!is_decimal("1e400"));
        assert!(!is_decimal("inf"));
        assert_eq!(encode("1e400", &ColumnType::Float).to_sql_inline(), "'1e400'");
    }

    #[test]
    fn test_encode_unparseable_falls_back_to_text() {
        assert_eq!(
            encode("12a", &ColumnType::Integer),
            SqlValue::Text(String::from("12a"))
        );
    }
}
