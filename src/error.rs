use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a graph store while opening, running or closing a
/// transaction.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Lock or deadlock class failure; the same write may succeed on re-run.
    #[error("transient store error: {0}")]
    Transient(String),
    #[error("store connection error: {0}")]
    Connection(String),
    #[error("store rejected statement: {0}")]
    Statement(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unknown label {label:?}, recognized labels: {recognized}")]
    UnknownLabel { label: String, recognized: String },

    #[error("unknown relation type {rel_type:?}, recognized types: {recognized}")]
    UnknownRelType { rel_type: String, recognized: String },

    #[error("invalid vocabulary entry {0:?}: expected an uppercase identifier such as GENE or ASSOCIATED_WITH")]
    InvalidVocabulary(String),

    #[error("{source_name} is missing required column(s): {}. Was the header renamed during cleaning?", .columns.join(", "))]
    MissingColumns {
        source_name: String,
        columns: Vec<String>,
    },

    #[error("nothing to load: provide an entities source with labels, a relations source with relation types, or both")]
    NothingToLoad,

    #[error("cannot reach graph store: {0}")]
    Connectivity(#[source] StoreError),

    #[error("relation batch {batch} ({rel_type}) failed after {committed} committed batch(es): {source}")]
    RelationBatch {
        batch: usize,
        rel_type: String,
        committed: usize,
        /// Types of the failing batch that committed before the failure.
        committed_types: Vec<String>,
        #[source]
        source: StoreError,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("load interrupted")]
    Interrupted,
}

impl LoadError {
    /// True when re-running the same stage may succeed without changing
    /// the input. Writes are idempotent, so a re-run never duplicates data.
    pub fn is_retryable(&self) -> bool {
        match self {
            LoadError::RelationBatch { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}

pub type Result<T, E = LoadError> = std::result::Result<T, E>;
