use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::wheel_modes::WheelMode;

static CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("code pattern is a valid regex"));

/// Whitespace is ignored so "123 456" and " 123456\n" are both accepted.
pub fn normalize_code(code: &str) -> Option<String> {
    let cleaned: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    CODE_PATTERN.is_match(&cleaned).then_some(cleaned)
}

pub fn validate_mode(mode: &str) -> Result<(), ValidationError> {
    if mode.parse::<WheelMode>().is_err() {
        return Err(ValidationError::new("unknown_mode"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code_strips_whitespace() {
        assert_eq!(normalize_code(" 123 456\n").as_deref(), Some("123456"));
        assert_eq!(normalize_code("000000").as_deref(), Some("000000"));
    }

    #[test]
    fn test_normalize_code_rejects_bad_input() {
        assert!(normalize_code("12345").is_none());
        assert!(normalize_code("1234567").is_none());
        assert!(normalize_code("12a456").is_none());
        assert!(normalize_code("").is_none());
        // Non-ASCII digits are not accepted.
        assert!(normalize_code("١٢٣٤٥٦").is_none());
    }

    #[test]
    fn test_validate_mode() {
        assert!(validate_mode("teams").is_ok());
        assert!(validate_mode("duos").is_ok());
        assert!(validate_mode("raids").is_err());
    }
}
