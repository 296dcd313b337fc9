//! Record persistence
//!
//! The HTTP layer only sees the [`RecordStore`] trait. [`FileRecordStore`]
//! keeps one JSON document per record and scans the whole storage root on
//! every read; an indexed backend can replace it without touching handlers.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{MatchRecord, RecordSummary};

mod file;

pub use file::{record_file_stem, FileRecordStore, RECORD_EXTENSION};

/// Storage faults. A missing record is not an error; see [`RecordStore::get_by_id`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create storage root {path}: {source}")]
    Init {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write record {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to enumerate storage root {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Ensure the storage location exists; idempotent
    async fn init(&self) -> Result<(), StoreError>;

    /// Persist a new record and return the name of its storage unit
    async fn create(&self, record: &MatchRecord) -> Result<String, StoreError>;

    /// Summaries of every readable record, newest `receivedAt` first
    async fn list_summaries(&self) -> Result<Vec<RecordSummary>, StoreError>;

    /// Look up a record by its id; `Ok(None)` when no record matches
    async fn get_by_id(&self, id: &str) -> Result<Option<MatchRecord>, StoreError>;
}
