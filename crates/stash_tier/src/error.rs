// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for cache tier operations.

use std::fmt;

/// The category of a cache tier failure.
///
/// A read miss is not a failure — absent keys come back as `Ok(None)` or as
/// missing map entries. These kinds cover the conditions that do surface as
/// errors, and the pool decides retry policy per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A configuration value was outside its declared shape.
    InvalidConfiguration,
    /// The backing store could not be reached or set up.
    Unavailable,
    /// The backing store is a known-incompatible deployment.
    DriverCheck,
    /// A write, delete, or clear round trip failed.
    Write,
    /// A diagnostics query failed; cache correctness is unaffected.
    Stats,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InvalidConfiguration => "invalid configuration",
            Self::Unavailable => "backend unavailable",
            Self::DriverCheck => "driver check failed",
            Self::Write => "write failed",
            Self::Stats => "statistics unavailable",
        };
        f.write_str(text)
    }
}

/// An error from a cache tier operation.
///
/// Wraps the underlying cause from a tier implementation and carries an
/// [`ErrorKind`] so the pool can tell configuration mistakes apart from
/// transient backend failures. Use [`std::error::Error::source()`] to access
/// the underlying cause if needed.
///
/// # Example
///
/// ```
/// use stash_tier::{Error, ErrorKind};
///
/// let error = Error::write("connection reset");
/// assert_eq!(error.kind(), ErrorKind::Write);
/// ```
#[ohno::error]
#[display("cache tier error: {kind}")]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Creates an error for a configuration value outside its declared shape.
    pub fn invalid_configuration(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::InvalidConfiguration, cause)
    }

    /// Creates an error for an unreachable or unusable backing store.
    pub fn unavailable(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Unavailable, cause)
    }

    /// Creates an error for a known-incompatible backing deployment.
    pub fn driver_check(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::DriverCheck, cause)
    }

    /// Creates an error for a failed write, delete, or clear round trip.
    pub fn write(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Write, cause)
    }

    /// Creates an error for a failed diagnostics query.
    pub fn stats(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Stats, cause)
    }

    /// Returns the category of this failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A specialized [`Result`] type for cache tier operations.
pub type Result<T> = std::result::Result<T, Error>;
