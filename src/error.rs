//! Unified error types for the math components.
//!
//! Recoverable failures are small `Copy` enums with hand-written `Display`
//! impls that funnel into a single [`Error`].  Contract breaches upstream of
//! a component (invalid parameter validity, unknown parameter ids, a full
//! mailbox) are not represented here: those abort via `panic!`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible, non-fatal operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Parameter store access failed.
    Storage(StorageError),
    /// Configuration is invalid.
    Config(ConfigError),
    /// A raw operator code did not name a [`MathOp`](crate::math::MathOp).
    Operator(UnknownOperator),
    /// A parameter name did not match any known parameter.
    Param(UnknownParam),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Operator(e) => write!(f, "operator: {e}"),
            Self::Param(e) => write!(f, "param: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Errors from [`StoragePort`](crate::app::ports::StoragePort) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Stored record failed to decode.
    Corrupted,
    /// Generic I/O error.
    IoError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::Corrupted => write!(f, "record corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Decoding errors at the command boundary
// ---------------------------------------------------------------------------

/// Raw operator code outside the defined operator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownOperator(pub u8);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operator code {}", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl From<UnknownOperator> for Error {
    fn from(e: UnknownOperator) -> Self {
        Self::Operator(e)
    }
}

/// Parameter name that does not match any parameter of the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownParam;

impl fmt::Display for UnknownParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown parameter name")
    }
}

impl std::error::Error for UnknownParam {}

impl From<UnknownParam> for Error {
    fn from(e: UnknownParam) -> Self {
        Self::Param(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
