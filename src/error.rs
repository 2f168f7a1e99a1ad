#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the registry crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free while still
//! exposing a thoroughly documented error surface for library consumers.

use std::path::{Path, PathBuf};

/// Unified error type returned by the registry loader, renderer, and CLI.
///
/// Each variant captures sufficient context for diagnostics while avoiding
/// accidental exposure of sensitive data. Instances are typically constructed
/// through the [`io_error`] helper or by converting from decoder error types
/// via the provided `From` implementations.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading a registry file.
    #[error("failed to read registry data from {path:?}: {source}")]
    Io {
        /// Location of the registry file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps workbook decoding failures reported by the spreadsheet reader.
    #[error("failed to decode workbook: {message}")]
    Workbook {
        /// Human readable message describing the decode failure.
        message: String
    },
    /// Wraps CSV decoding errors.
    #[error("failed to decode csv table: {source}")]
    Csv {
        /// Source decoding error from the csv reader.
        source: csv::Error
    },
    /// Returned when a registry file carries an extension no parser handles.
    #[error("unsupported registry format '{extension}'")]
    UnsupportedFormat {
        /// Extension of the rejected file, lower-cased.
        extension: String
    },
    /// Returned when a flat table is missing a column required for lookups.
    #[error("registry table is missing mandatory column '{column}'")]
    MissingColumn {
        /// Name of the absent column.
        column: String
    },
    /// Returned when inputs violate invariants.
    #[error("invalid input: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Service errors when interacting with external APIs.
    #[error("service error: {message}")]
    Service {
        /// Human readable message describing the service error.
        message: String
    },
    /// Wraps serialization errors when rendering metadata manifests.
    #[error("failed to serialize manifest: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_yaml::Error
    }
}

impl Error {
    /// Constructs a workbook error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the decode failure.
    pub fn workbook<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Workbook {
            message: message.into()
        }
    }

    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a service error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the service error.
    pub fn service<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Service {
            message: message.into()
        }
    }

    /// Constructs a missing-column error for the named flat-table column.
    pub fn missing_column<M>(column: M) -> Self
    where
        M: Into<String>
    {
        Self::MissingColumn {
            column: column.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// This method is primarily intended for CLI contexts where the variant
    /// name does not add value to end users. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<csv::Error> for Error {
    fn from(source: csv::Error) -> Self {
        Self::Csv {
            source
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<masterror::AppError> for Error {
    fn from(error: masterror::AppError) -> Self {
        Self::Service {
            message: error.to_string()
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the registry file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}
