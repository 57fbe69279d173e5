//! Error types for typed arrays
//!
//! This module defines all error types used throughout the crate.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Errors fall into two groups:
//! - **Configuration errors**: a kind cannot be resolved, the directory
//!   rejects a registration, or a config file is malformed. Permanent.
//! - **Data errors**: a candidate value or collection was rejected. The
//!   container is left untouched and the caller may retry with corrected input.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for typed array operations
pub type Result<T> = std::result::Result<T, Error>;

/// The mutating entry point an error was raised from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Building a new container from initial contents
    Construct,
    /// Writing a single value at an index
    SetAt(usize),
    /// Appending a single value
    Append,
    /// Swapping the whole contents for a new collection
    ReplaceAll,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Construct => write!(f, "construct"),
            Operation::SetAt(index) => write!(f, "set[{}]", index),
            Operation::Append => write!(f, "append"),
            Operation::ReplaceAll => write!(f, "replace_all"),
        }
    }
}

/// Error types for typed arrays
#[derive(Debug, Error)]
pub enum Error {
    /// Kind name lacks the convention marker and no override resolves
    #[error("Invalid kind name '{kind}': kind name must begin with the conventional marker '{marker}'")]
    InvalidKindName {
        /// Qualified kind identity
        kind: String,
        /// Marker the simple name was expected to start with
        marker: String,
    },

    /// Neither the derived name nor the override names a registered type
    #[error(
        "Unresolvable target type for '{kind}': '{candidate}' is not registered{}",
        describe_override(.override_name)
    )]
    UnresolvableTargetType {
        /// Qualified kind identity
        kind: String,
        /// Type name derived from the kind name
        candidate: String,
        /// Explicit override, if the kind declares one
        override_name: Option<String>,
    },

    /// Input is not a proper ordered collection, or an index is out of range
    #[error("Invalid argument to {kind} {operation}: {reason}")]
    InvalidArgument {
        /// Qualified kind identity
        kind: String,
        /// Entry point that rejected the input
        operation: Operation,
        /// What was wrong with the input
        reason: String,
    },

    /// A candidate element does not conform to the target type
    #[error(
        "Type mismatch in {kind} {operation}: expected {expected}, got {actual}{}",
        describe_position(.position)
    )]
    TypeMismatch {
        /// Qualified kind identity
        kind: String,
        /// Target type name
        expected: String,
        /// Type of the rejected value
        actual: String,
        /// Entry point that rejected the value
        operation: Operation,
        /// Position within the input collection, for whole-collection operations
        position: Option<usize>,
    },

    /// A name is already bound to a different type or capability
    #[error("Duplicate type name: '{name}' is already registered")]
    DuplicateTypeName {
        /// The contested name
        name: String,
    },

    /// A registration refers to a type or capability the directory does not know
    #[error("Unknown type: '{name}'")]
    UnknownType {
        /// The missing name
        name: String,
    },

    /// Malformed or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (reading or writing config files)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

fn describe_override(override_name: &Option<String>) -> String {
    match override_name {
        Some(name) => format!(" and override '{}' is not registered", name),
        None => " and no override is declared".to_string(),
    }
}

fn describe_position(position: &Option<usize>) -> String {
    match position {
        Some(pos) => format!(" at position {}", pos),
        None => String::new(),
    }
}

impl Error {
    /// True for permanent setup errors, false for rejected data
    pub fn is_configuration_error(&self) -> bool {
        !self.is_data_error()
    }

    /// True when a value or collection was rejected and state is unchanged
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument { .. } | Error::TypeMismatch { .. }
        )
    }

    /// The operation that failed, for data errors
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Error::InvalidArgument { operation, .. } | Error::TypeMismatch { operation, .. } => {
                Some(*operation)
            }
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}
