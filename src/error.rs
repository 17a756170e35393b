//! Error types for schema-to-scaffold.

use thiserror::Error;

/// The main error type for catalogue, selection and script operations.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The schema text declared no tables.
    #[error("No tables found in schema")]
    ParseEmpty,

    /// A selection or lookup referenced a table that is not in the catalogue.
    #[error("Could not find table {id} (input: '{input}')")]
    UnknownTable { id: String, input: String },

    /// The selection expression matched none of the accepted forms.
    #[error("Not a valid selection: '{0}'. Expected: 4, (4..6), [4,6] or *")]
    InvalidSelection(String),

    /// A range selection whose start lies after its end.
    #[error("Invalid range: {start} is greater than {end}")]
    InvalidRange { start: usize, end: usize },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema file discovery error.
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Clipboard error.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Script execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScaffoldError {
    /// Create an unknown-table error, echoing the input that referenced it.
    pub fn unknown(id: impl ToString, input: impl Into<String>) -> Self {
        Self::UnknownTable {
            id: id.to_string(),
            input: input.into(),
        }
    }

    /// Create an invalid-selection error.
    pub fn invalid(input: impl Into<String>) -> Self {
        Self::InvalidSelection(input.into())
    }
}

/// Result type alias for schema-to-scaffold operations.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;
