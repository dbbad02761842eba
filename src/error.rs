//! Error types for the uacache library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: returned when cache construction parameters are invalid
//!   (e.g. zero capacity, zero concurrency level).
//!
//! Loader failures are not represented here: a [`ValueLoader`] carries its own
//! error type, which `get_or_load` propagates to the caller unchanged.
//!
//! [`ValueLoader`]: crate::traits::ValueLoader

use std::fmt;

/// Error returned when cache construction parameters are invalid.
///
/// Produced by the fallible `try_build*` methods on
/// [`CacheBuilder`](crate::builder::CacheBuilder). Carries a human-readable
/// description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use uacache::builder::CacheBuilder;
///
/// let err = CacheBuilder::new(0).try_build::<u64, u64>().unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}
