//! Error types for descriptor loading and validation
//!
//! Every failure is fatal to the enclosing build: nothing here is retried,
//! and each error names the offending file or field so it can be surfaced
//! verbatim to the invoking user.

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, DescriptorError>;

/// Errors raised while loading, validating, or resolving a build descriptor
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// The descriptor file could not be parsed
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// Path of the offending file
        path: String,
        /// Parser diagnostic
        message: String,
    },

    /// A descriptor field violates an invariant
    #[error("Invalid field `{field}`: {message}")]
    Validation {
        /// The offending field
        field: String,
        /// What the invariant expected
        message: String,
    },

    /// A build variant references a signing config not present in the registry
    #[error("Signing config `{name}` (referenced by variant `{variant}`) is not declared")]
    UnknownSigningConfig {
        /// The dangling signing config name
        name: String,
        /// The variant holding the reference
        variant: String,
    },

    /// The requested build variant is not declared in the descriptor
    #[error("Build variant `{variant}` is not declared in the descriptor")]
    UnknownVariant {
        /// The missing variant name
        variant: String,
    },

    /// IO error reading or writing a descriptor file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Command completed successfully
    pub const SUCCESS: i32 = 0;
    /// Generic failure
    pub const FAILURE: i32 = 1;
    /// Descriptor failed validation
    pub const VALIDATION_ERROR: i32 = 2;
    /// Descriptor file missing or unparseable
    pub const CONFIG_ERROR: i32 = 3;
}
