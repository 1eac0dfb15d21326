//! Permissive parsing for direct time entry.
//!
//! The time display accepts free-form text while paused: `"52:30"`,
//! `"1:30:00"`, `"52"`, `"52m"`. Whatever parses to a minute count is
//! validated against the active mode's bounds by the caller; anything
//! unusable parses to 0 and is discarded there.

use crate::error::ValidationError;

/// Parse free-form time text into whole minutes.
///
/// - `"MM:SS"` -> `minutes + seconds / 60` (seconds floor to whole
///   minutes; `"52:30"` is 52, not 53 - partial minutes are dropped)
/// - `"H:MM:SS"` -> `hours * 60 + minutes` (trailing seconds ignored)
/// - bare digits, or digits with unit letters (`"52m"`) -> that number
///
/// Returns 0 when nothing numeric survives; callers treat 0 as "abandon
/// the edit".
pub fn parse_minutes(input: &str) -> u32 {
    let value = input.trim();
    if value.contains(':') {
        let parts: Vec<&str> = value.split(':').collect();
        match parts.len() {
            2 => {
                let minutes = parse_digits(parts[0]);
                let seconds = parse_digits(parts[1]);
                minutes + seconds / 60
            }
            3 => {
                let hours = parse_digits(parts[0]);
                let minutes = parse_digits(parts[1]);
                hours * 60 + minutes
            }
            _ => 0,
        }
    } else {
        parse_digits(value)
    }
}

/// Parse a minute value and validate it against the given inclusive
/// bounds. The session uses this to accept or silently abandon an edit.
pub fn parse_and_validate(input: &str, min: u32, max: u32) -> Result<u32, ValidationError> {
    let minutes = parse_minutes(input);
    if minutes == 0 || minutes < min || minutes > max {
        return Err(ValidationError::UnparseableTime(input.to_string()));
    }
    Ok(minutes)
}

/// Strip non-digits and parse; 0 on empty or overflow.
fn parse_digits(part: &str) -> u32 {
    let digits: String = part.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_form_floors_partial_minutes() {
        assert_eq!(parse_minutes("52:30"), 52);
        assert_eq!(parse_minutes("52:00"), 52);
        assert_eq!(parse_minutes("52:60"), 53);
        assert_eq!(parse_minutes("0:90"), 1);
    }

    #[test]
    fn hours_form() {
        assert_eq!(parse_minutes("1:30:00"), 90);
        assert_eq!(parse_minutes("2:05:59"), 125);
    }

    #[test]
    fn bare_digits_and_unit_suffix() {
        assert_eq!(parse_minutes("52"), 52);
        assert_eq!(parse_minutes("52m"), 52);
        assert_eq!(parse_minutes(" 17 min "), 17);
    }

    #[test]
    fn garbage_parses_to_zero() {
        assert_eq!(parse_minutes("abc"), 0);
        assert_eq!(parse_minutes(""), 0);
        assert_eq!(parse_minutes("::"), 0);
    }

    #[test]
    fn validation_rejects_zero_and_out_of_range() {
        assert!(parse_and_validate("abc", 1, 120).is_err());
        assert!(parse_and_validate("0", 1, 120).is_err());
        assert_eq!(parse_and_validate("90m", 1, 120), Ok(90));
        // 90 is fine for work but past the break ceiling.
        assert!(parse_and_validate("90m", 1, 60).is_err());
    }
}
