//! Input validation helpers for API requests.

use crate::db::IntegerInput;

/// Trimmed text, or `None` when the value is absent or blank
pub fn required_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Coerce an optional integer field, accepting only values >= 1.
///
/// Returns `Ok(None)` when the field is absent and `Err(())` when it is
/// present but not a positive whole number.
pub fn positive_integer(value: Option<&IntegerInput>) -> Result<Option<i64>, ()> {
    match value {
        None => Ok(None),
        Some(input) => match input.to_i64() {
            Some(n) if n >= 1 => Ok(Some(n)),
            _ => Err(()),
        },
    }
}
