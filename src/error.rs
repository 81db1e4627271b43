//! Error types for the Moorenet engine.
//!
//! Every fallible operation reports one of two outcomes through its
//! `Result`: a rejected argument or an exhausted allocation. There is no
//! shared error state; each call carries its own error value.

use std::collections::TryReserveError;
use thiserror::Error;

/// The error type for Moorenet operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MooreError {
    /// A handle is unknown, a count is zero, a width is zero, a buffer is
    /// too short, or a bit range exceeds an automaton's declared width.
    ///
    /// Always detected before any mutation; the call has no effect.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Allocation failed, or a destination list reached its configured
    /// capacity limit.
    #[error("Out of memory: {0}")]
    OutOfMemory(String),
}

impl MooreError {
    /// Shorthand for building an `InvalidArgument` error.
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        MooreError::InvalidArgument(reason.into())
    }

    /// Returns true for `InvalidArgument`.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, MooreError::InvalidArgument(_))
    }

    /// Returns true for `OutOfMemory`.
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, MooreError::OutOfMemory(_))
    }
}

impl From<TryReserveError> for MooreError {
    fn from(err: TryReserveError) -> Self {
        MooreError::OutOfMemory(err.to_string())
    }
}

/// A specialized `Result` type for Moorenet operations.
pub type Result<T> = std::result::Result<T, MooreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MooreError::InvalidArgument("count must be non-zero".into());
        assert_eq!(err.to_string(), "Invalid argument: count must be non-zero");

        let err = MooreError::OutOfMemory("destination list full".into());
        assert_eq!(err.to_string(), "Out of memory: destination list full");
    }

    #[test]
    fn test_kind_predicates() {
        assert!(MooreError::invalid("x").is_invalid_argument());
        assert!(!MooreError::invalid("x").is_out_of_memory());
        assert!(MooreError::OutOfMemory("y".into()).is_out_of_memory());
    }

    #[test]
    fn test_try_reserve_maps_to_out_of_memory() {
        let mut v: Vec<u64> = Vec::new();
        let err = v.try_reserve(usize::MAX).unwrap_err();
        assert!(MooreError::from(err).is_out_of_memory());
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(returns_result().unwrap(), 42);
    }
}
