/*!
 * Error types for the littre-enrich application.
 *
 * Enrichment itself never fails: every rule degrades to a conservative
 * outcome. Errors only arise at the edges, when reading or writing corpus
 * shards, loading configuration, or when the integrity check finds that a
 * tree lost or duplicated a node.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Structural problems in an entry arena
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// An Indent is stored but not reachable from the entry
    #[error("indent #{0} is not attached to the tree")]
    OrphanIndent(usize),

    /// A Variante is stored but not reachable from the entry
    #[error("variante #{0} is not attached to the tree")]
    OrphanVariante(usize),

    /// An Indent is referenced from more than one parent
    #[error("indent #{0} has more than one parent")]
    SharedIndent(usize),

    /// A Variante is referenced from more than one parent
    #[error("variante #{0} has more than one parent")]
    SharedVariante(usize),

    /// A parent refers to an Indent outside the arena
    #[error("indent id {0} is out of range")]
    DanglingIndent(usize),

    /// A parent refers to a Variante outside the arena
    #[error("variante id {0} is out of range")]
    DanglingVariante(usize),
}

/// Errors raised while loading or saving corpus shards
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Reading or writing a shard failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A shard is not valid interchange JSON
    #[error("Invalid shard {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An output could not be serialized
    #[error("Failed to write {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An enriched entry failed the integrity check
    #[error("Entry '{headword}' is malformed: {source}")]
    Integrity {
        headword: String,
        #[source]
        source: TreeError,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from corpus loading or saving
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Error from the tree integrity check
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
