//! Result type alias for Scholar Map
//!
//! This module provides a convenient Result type alias that uses
//! ScholarMapError as the error type.

use super::errors::ScholarMapError;

/// Result type alias for Scholar Map operations
///
/// This is a convenience type alias that uses [`ScholarMapError`] as the
/// error type. Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use scholarmap::domain::result::Result;
/// use scholarmap::domain::errors::ScholarMapError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ScholarMapError::Registry("missing column".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ScholarMapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ScholarMapError;

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(ScholarMapError::Io("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
