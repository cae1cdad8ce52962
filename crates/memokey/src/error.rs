//! Error types for memokey and memocache

use std::fmt;

/// Result type alias for key derivation and memoization
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while deriving keys or resolving method caches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Array argument lacks shape, element type or content access
    UnsupportedArgumentType(String),

    /// A trailing argument cannot take part in a call key
    UnhashableArgument(String),

    /// Bounded cache configured with zero capacity
    InvalidCapacity(usize),

    /// Method name already holds a cache with a different value type
    CacheTypeMismatch(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedArgumentType(msg) => write!(f, "Unsupported argument type: {}", msg),
            Error::UnhashableArgument(msg) => write!(f, "Unhashable argument: {}", msg),
            Error::InvalidCapacity(cap) => {
                write!(f, "Invalid cache capacity: {} (must be greater than 0)", cap)
            }
            Error::CacheTypeMismatch(method) => {
                write!(f, "Cache for method '{}' holds a different value type", method)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidCapacity(0);
        assert_eq!(
            err.to_string(),
            "Invalid cache capacity: 0 (must be greater than 0)"
        );

        let err = Error::CacheTypeMismatch("frob");
        assert!(err.to_string().contains("'frob'"));
    }
}
