//! Centralized validation of record values.
//!
//! Parsers run every record through these checks before handing it to the
//! indexes, which assume `start <= stop` and identities in `[0, 1]`.

/// Value-level validation failures, attached to a file and line by the parser
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("interval stop {stop} precedes start {start}")]
    InvertedInterval { start: u64, stop: u64 },

    #[error("identity {0} is outside [0, 1]")]
    OutOfRangeScore(f64),
}

/// Check that an interval is not inverted.
///
/// # Errors
///
/// Returns `ValidationError::InvertedInterval` if `stop < start`.
///
/// # Examples
///
/// ```
/// use orphan_scan::utils::validation::check_interval;
///
/// assert!(check_interval(10, 10).is_ok());
/// assert!(check_interval(11, 10).is_err());
/// ```
pub fn check_interval(start: u64, stop: u64) -> Result<(), ValidationError> {
    if stop < start {
        return Err(ValidationError::InvertedInterval { start, stop });
    }
    Ok(())
}

/// Check that an identity score lies in `[0, 1]`. NaN is rejected.
///
/// # Errors
///
/// Returns `ValidationError::OutOfRangeScore` otherwise.
pub fn check_identity(score: f64) -> Result<f64, ValidationError> {
    if (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(ValidationError::OutOfRangeScore(score))
    }
}

/// Parse a boolean column written as `0`/`1` or `true`/`false`
#[must_use]
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" => Some(true),
        "0" | "false" | "f" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_interval() {
        assert!(check_interval(0, 0).is_ok());
        assert!(check_interval(5, 100).is_ok());
        assert_eq!(
            check_interval(100, 5),
            Err(ValidationError::InvertedInterval {
                start: 100,
                stop: 5
            })
        );
    }

    #[test]
    fn test_check_identity() {
        assert_eq!(check_identity(0.0), Ok(0.0));
        assert_eq!(check_identity(1.0), Ok(1.0));
        assert!(check_identity(1.01).is_err());
        assert!(check_identity(-0.1).is_err());
        assert!(check_identity(f64::NAN).is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("FALSE"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
