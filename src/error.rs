//! Error types for ferro-paralogues
//!
//! This module provides error handling with:
//! - Error codes for categorization
//! - Actionable hints for errors a user can fix
//! - A split between per-pair errors (skipped) and fatal errors

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (E1xxx)
    /// Invalid configuration value
    InvalidConfiguration = 1001,
    /// Unknown clinical significance match mode
    UnknownMatchMode = 1002,
    /// Unknown output field for the variant source
    UnknownField = 1003,
    /// Required column missing from a variant source
    MissingColumn = 1004,

    // Alignment errors (E2xxx)
    /// Malformed run-length alignment encoding
    MalformedEncoding = 2001,

    // Mapping errors (E3xxx)
    /// Residue beyond the sequence or protein length
    ResidueOutOfRange = 3001,
    /// Sequence identifier not part of an alignment
    UnknownSequence = 3002,

    // Reference errors (E4xxx)
    /// No transcript model for a protein
    TranscriptNotFound = 4001,
    /// Malformed annotation or transcript record
    InvalidRecord = 4002,

    // External errors (E9xxx)
    /// External provider failure
    ProviderError = 9000,
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidConfiguration => "invalid configuration",
            ErrorCode::UnknownMatchMode => "unknown clinical significance match mode",
            ErrorCode::UnknownField => "unknown output field",
            ErrorCode::MissingColumn => "required column missing",
            ErrorCode::MalformedEncoding => "malformed alignment encoding",
            ErrorCode::ResidueOutOfRange => "residue out of range",
            ErrorCode::UnknownSequence => "sequence not in alignment",
            ErrorCode::TranscriptNotFound => "transcript not found",
            ErrorCode::InvalidRecord => "invalid record",
            ErrorCode::ProviderError => "external provider error",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The configuration problem behind a [`FerroError::Configuration`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConfigurationKind {
    /// Generic invalid value
    #[default]
    Invalid,
    /// Unknown clinical significance match mode
    MatchMode,
    /// Unknown output field
    Field,
    /// Missing required column in a variant source
    MissingColumn,
}

/// Main error type for ferro-paralogues operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FerroError {
    /// Invalid configuration, surfaced before processing starts
    #[error("Configuration error: {msg}")]
    Configuration { kind: ConfigurationKind, msg: String },

    /// Malformed run-length alignment encoding
    #[error("Invalid alignment encoding '{encoding}': {msg}")]
    Encoding { encoding: String, msg: String },

    /// Residue index beyond the sequence or translated protein length
    #[error("Residue {residue} out of range for {id} (length {length})")]
    ResidueOutOfRange { id: String, residue: u64, length: u64 },

    /// Sequence identifier is not one of the alignment's rows
    #[error("Sequence {id} is not part of the alignment")]
    UnknownSequence { id: String },

    /// No transcript model could be resolved for a protein
    #[error("Transcript not found for protein {protein_id}: {hint}")]
    TranscriptNotFound { protein_id: String, hint: String },

    /// Malformed row in an annotation or transcript file
    #[error("Invalid record at line {line}: {msg}")]
    InvalidRecord { line: usize, msg: String },

    /// Failure reported by an external provider
    #[error("Provider error: {msg}")]
    Provider { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl FerroError {
    /// Create a generic configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        FerroError::Configuration {
            kind: ConfigurationKind::Invalid,
            msg: msg.into(),
        }
    }

    /// Create a configuration error of a specific kind
    pub fn config_kind(kind: ConfigurationKind, msg: impl Into<String>) -> Self {
        FerroError::Configuration {
            kind,
            msg: msg.into(),
        }
    }

    /// Create an encoding error
    pub fn encoding(encoding: impl Into<String>, msg: impl Into<String>) -> Self {
        FerroError::Encoding {
            encoding: encoding.into(),
            msg: msg.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            FerroError::Configuration { kind, .. } => match kind {
                ConfigurationKind::Invalid => ErrorCode::InvalidConfiguration,
                ConfigurationKind::MatchMode => ErrorCode::UnknownMatchMode,
                ConfigurationKind::Field => ErrorCode::UnknownField,
                ConfigurationKind::MissingColumn => ErrorCode::MissingColumn,
            },
            FerroError::Encoding { .. } => ErrorCode::MalformedEncoding,
            FerroError::ResidueOutOfRange { .. } => ErrorCode::ResidueOutOfRange,
            FerroError::UnknownSequence { .. } => ErrorCode::UnknownSequence,
            FerroError::TranscriptNotFound { .. } => ErrorCode::TranscriptNotFound,
            FerroError::InvalidRecord { .. } => ErrorCode::InvalidRecord,
            FerroError::Provider { .. } => ErrorCode::ProviderError,
            FerroError::Io { .. } => ErrorCode::IoError,
            FerroError::Json { .. } => ErrorCode::JsonError,
        }
    }

    /// Whether this error only invalidates the current reference/paralogue pair
    ///
    /// Skippable errors drop the pair and processing continues with the next
    /// homology record. Everything else aborts the run.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            FerroError::Encoding { .. } | FerroError::ResidueOutOfRange { .. }
        )
    }

    /// Get a formatted error prefixed with its code
    pub fn detailed_message(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}

impl From<std::io::Error> for FerroError {
    fn from(err: std::io::Error) -> Self {
        FerroError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FerroError {
    fn from(err: serde_json::Error) -> Self {
        FerroError::Json {
            msg: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for FerroError {
    fn from(err: toml::de::Error) -> Self {
        FerroError::config(err.to_string())
    }
}

impl From<regex::Error> for FerroError {
    fn from(err: regex::Error) -> Self {
        FerroError::config(format!("invalid regular expression: {}", err))
    }
}
