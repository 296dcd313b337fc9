//! One-file-per-record store
//!
//! Files are named `{event}_{matchCode}_Team{teamNo}_{yyyyMMdd_HHmmss}.json`
//! for people browsing the directory. The name carries no identity; the `id`
//! inside the document is the only key lookups use.
//!
//! Documents are published with `hard_link`, which never replaces an existing
//! name. Storage roots without hard-link support (FAT/exFAT, some network
//! mounts) fall back to exclusive creation followed by a write; a concurrent
//! scan may then briefly see a partial file, which it skips like any other
//! malformed document.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use horus_common::time::{self, Clock, SystemClock};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::{RecordStore, StoreError};
use crate::models::{MatchRecord, RecordSummary};

/// Extension of record documents; anything else in the root is ignored
pub const RECORD_EXTENSION: &str = "json";

/// Per-field cap in UTF-8 bytes. Three fields plus the `_Team`, stamp,
/// collision suffix and extension stay under the common 255-byte name limit.
const MAX_COMPONENT_BYTES: usize = 64;

#[derive(Debug, Clone)]
pub struct FileRecordStore {
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_clock(root, Arc::new(SystemClock))
    }

    pub fn with_clock(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of candidate record files; a missing root holds no records
    async fn record_files(&self) -> Result<Vec<String>, StoreError> {
        let read_error = |source: io::Error| StoreError::Read {
            path: self.root.clone(),
            source,
        };

        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(read_error(e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(read_error)? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => debug!("Skipping non UTF-8 filename {:?}", raw),
            }
        }
        Ok(names)
    }

    /// Read one record file. Unreadable, half-written or foreign documents
    /// are logged and yield `None`.
    async fn load(&self, filename: &str) -> Option<MatchRecord> {
        let content = match fs::read(self.root.join(filename)).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Error reading file {}: {}", filename, e);
                return None;
            }
        };
        match serde_json::from_slice(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed record file {}: {}", filename, e);
                None
            }
        }
    }

    /// Link the staged document under the first free name derived from `stem`.
    /// `hard_link` refuses to replace an existing file, so a name collision
    /// never clobbers another record.
    async fn publish(
        &self,
        staging: &Path,
        document: &[u8],
        stem: &str,
    ) -> Result<String, StoreError> {
        let mut attempt: u32 = 0;
        let mut use_links = true;
        loop {
            let filename = if attempt == 0 {
                format!("{}.{}", stem, RECORD_EXTENSION)
            } else {
                format!("{}_{}.{}", stem, attempt, RECORD_EXTENSION)
            };
            let target = self.root.join(&filename);
            let result = if use_links {
                fs::hard_link(staging, &target).await
            } else {
                write_new(&target, document).await
            };
            match result {
                Ok(()) => return Ok(filename),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) if use_links && links_unsupported(&e) => {
                    warn!(
                        "Hard links unavailable in {} ({}), writing records directly",
                        self.root.display(),
                        e
                    );
                    use_links = false;
                }
                Err(source) => return Err(StoreError::Write { path: target, source }),
            }
        }
    }
}

/// Filesystems without hard links report `Unsupported` or `EPERM`
fn links_unsupported(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Unsupported | io::ErrorKind::PermissionDenied
    )
}

/// Create `target` exclusively and write `document` into it. A failed write
/// removes the partial file so the name is not left holding a broken record.
async fn write_new(target: &Path, document: &[u8]) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
        .await?;

    let written = async {
        file.write_all(document).await?;
        file.sync_all().await
    }
    .await;

    if let Err(e) = written {
        drop(file);
        if let Err(cleanup) = fs::remove_file(target).await {
            warn!("Failed to remove partial file {}: {}", target.display(), cleanup);
        }
        return Err(e);
    }
    Ok(())
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn init(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StoreError::Init {
                path: self.root.clone(),
                source,
            })
    }

    async fn create(&self, record: &MatchRecord) -> Result<String, StoreError> {
        let stem = record_file_stem(record, &self.clock.now());
        let document = serde_json::to_vec_pretty(record)?;

        // Stage under a non-.json name so scans never see a partial document
        let staging = self.root.join(format!(".{}.tmp", record.id));
        let result = match fs::write(&staging, &document).await {
            Ok(()) => self.publish(&staging, &document, &stem).await,
            Err(source) => Err(StoreError::Write {
                path: staging.clone(),
                source,
            }),
        };

        if let Err(e) = fs::remove_file(&staging).await {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove staging file {}: {}", staging.display(), e);
            }
        }
        result
    }

    async fn list_summaries(&self) -> Result<Vec<RecordSummary>, StoreError> {
        let mut summaries = Vec::new();
        for filename in self.record_files().await? {
            if let Some(record) = self.load(&filename).await {
                summaries.push(record.summary(filename));
            }
        }
        // Stable: equal timestamps keep enumeration order
        summaries.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        Ok(summaries)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<MatchRecord>, StoreError> {
        for filename in self.record_files().await? {
            if let Some(record) = self.load(&filename).await {
                if record.id == id {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }
}

/// `{event}_{matchCode}_Team{teamNo}_{yyyyMMdd_HHmmss}` with each field made
/// safe for use as part of a single path component
pub fn record_file_stem(record: &MatchRecord, at: &DateTime<Local>) -> String {
    format!(
        "{}_{}_Team{}_{}",
        sanitize_component(&record.event),
        sanitize_component(&record.match_code),
        sanitize_component(&record.team_no.to_string()),
        time::to_filename_stamp(at)
    )
}

/// Replace path-hostile characters and cut to `MAX_COMPONENT_BYTES`, only
/// ever on a char boundary
fn sanitize_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len().min(MAX_COMPONENT_BYTES));
    for c in value.chars() {
        let c = match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        };
        if out.len() + c.len_utf8() > MAX_COMPONENT_BYTES {
            break;
        }
        out.push(c);
    }
    out
}
