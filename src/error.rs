//! Error types for reaction-table parsing and model compilation

use thiserror::Error;

/// The substitution namespace in which a placeholder failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Substrate,
    Product,
    Modifier,
    Parameter,
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Namespace::Substrate => write!(f, "substrate"),
            Namespace::Product => write!(f, "product"),
            Namespace::Modifier => write!(f, "modifier"),
            Namespace::Parameter => write!(f, "parameter"),
        }
    }
}

/// Errors that can occur when compiling a reaction table to model source
#[derive(Debug, Error)]
pub enum CompileError {
    // ─────────────────────────────────────────────────────────────────────────
    // Table Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Error encountered when reading CSV data
    #[error("CSV error in {table}: {message}")]
    CsvError { table: String, message: String },

    /// A table is missing its header row or has too few columns
    #[error("Malformed row {row} in {table}: {message}")]
    MalformedRow {
        table: String,
        row: usize,
        message: String,
    },

    /// Malformed modifier token in a reaction row
    #[error("Reaction {row}: malformed modifier token '{token}'")]
    MalformedModifier { row: usize, token: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Resolution Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Rate-law id referenced by a reaction does not exist in the rate-law table
    #[error("Reaction {row}: unknown rate law '{id}'")]
    UnknownRateLaw { row: usize, id: String },

    /// A placeholder references a list position the reaction does not provide
    #[error(
        "Reaction {row}: {namespace} placeholder '{token}' references position {index}, \
         but the reaction lists {available} {namespace}(s)"
    )]
    IndexOutOfRange {
        row: usize,
        namespace: Namespace,
        token: String,
        index: usize,
        available: usize,
    },

    /// A placeholder token could not be parsed (e.g. `[S]` with no index)
    #[error("Reaction {row}: malformed {namespace} placeholder '{token}'")]
    MalformedPlaceholder {
        row: usize,
        namespace: Namespace,
        token: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Emission Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// A delayed species never appeared as substrate, product, or plain modifier,
    /// so it has no state index to read history from
    #[error("Delayed species '{species}' has no state index; it never appears as a substrate, product, or plain modifier")]
    DelayedSpeciesUnknown { species: String },

    /// Every reaction was dropped, leaving nothing to emit
    #[error("No equations were assembled; all {dropped} reaction(s) failed to resolve")]
    EmptySystem { dropped: usize },
}

impl CompileError {
    /// Create a CSV error with table context
    pub fn csv(table: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::CsvError {
            table: table.into(),
            message: message.to_string(),
        }
    }

    /// Create a malformed-row error
    pub fn malformed_row(
        table: impl Into<String>,
        row: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedRow {
            table: table.into(),
            row,
            message: message.into(),
        }
    }
}
