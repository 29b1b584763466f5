use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrawcheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Document source error: {0}")]
    Source(#[from] SourceError),

    #[error("Register error: {0}")]
    Register(#[from] RegisterError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

/// Per-document extraction fault. Never fatal to a batch: the owning job is
/// marked as an error and processing continues with the remaining documents.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to decode document: {0}")]
    Decode(String),

    #[error("Failed to read page {page}: {reason}")]
    Page { page: usize, reason: String },
}

/// Fault in the document input source. Fatal: there is nothing to process.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open document '{path}': {reason}")]
    OpenDocument { path: PathBuf, reason: String },

    #[error("Directory scan failed for '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("No drawing documents found in '{0}'")]
    NoDocuments(PathBuf),
}

/// Fault in the register collaborator. Fatal to the whole run: the run aborts
/// before any write so no partial register state is left ambiguous.
#[derive(Error, Debug)]
pub enum RegisterError {
    #[error("Failed to read register: {0}")]
    Read(String),

    #[error("Failed to write cell (row {row}, column {column}): {reason}")]
    WriteCell {
        row: u32,
        column: u32,
        reason: String,
    },

    #[error("Failed to insert {count} rows after row {after_row}: {reason}")]
    InsertRows {
        after_row: u32,
        count: u32,
        reason: String,
    },

    #[error("Register snapshot is empty")]
    EmptySnapshot,
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Worker channel closed unexpectedly")]
    ChannelClosed,

    #[error("Job failed: {0}")]
    JobFailed(String),
}

pub type Result<T> = std::result::Result<T, DrawcheckError>;
