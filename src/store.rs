//! Persistent message store for incremental runs.
//!
//! Every run re-reads the whole `archive.json`, but most article pages are
//! already on disk and unchanged. The store remembers, per message, enough
//! to decide whether its page must be written again:
//!
//! - **`fingerprint`**: SHA-256 of the serialized record. Any change to the
//!   message itself (subject, body, deletion state, annotations) changes it.
//! - **`deletion_done`**: the deletion level that was applied when the page
//!   of a deleted message was last written. A level change propagates to
//!   the message and its replies.
//!
//! Two run-wide values sit next to the entries: the highest message number
//! processed, which decides which messages have new replies, and a
//! fingerprint of the rendering config, which invalidates every page when
//! any setting changes.
//!
//! ## Storage
//!
//! JSON at `<output_dir>/.mailarc-store.json`. A missing, unreadable or
//! outdated file loads as an empty store, which makes the next run a full
//! one. Pass `--no-store` to `build` to ignore it deliberately.

use crate::config::RenderConfig;
use crate::incremental::{self, WriteError, WriteOutcome};
use crate::types::{DeleteLevel, DeletionState, EmailRecord};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the store file within the output directory.
const STORE_FILENAME: &str = ".mailarc-store.json";

/// Version of the store format. Bump this to discard all existing stores
/// when the format or fingerprint computation changes.
const STORE_VERSION: u32 = 1;

/// What the previous run knew about one message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct MessageSummary {
    pub fingerprint: String,
    pub deleted: DeletionState,
    /// Deletion level applied to the page of a deleted message.
    #[serde(default)]
    pub deletion_done: Option<DeleteLevel>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Store {
    pub version: u32,
    #[serde(default)]
    pub config_hash: String,
    /// Highest message number processed by the previous run.
    #[serde(default)]
    pub max_msgnum: Option<u32>,
    pub entries: BTreeMap<u32, MessageSummary>,
}

impl Store {
    /// Create an empty store (used for `--no-store` or the first run).
    pub fn empty() -> Self {
        Self {
            version: STORE_VERSION,
            config_hash: String::new(),
            max_msgnum: None,
            entries: BTreeMap::new(),
        }
    }

    /// Load from the output directory. Returns an empty store if the file
    /// doesn't exist or can't be parsed (version mismatch, corruption).
    pub fn load(output_dir: &Path) -> Self {
        let path = output_dir.join(STORE_FILENAME);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let store: Self = match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("ignoring unreadable store {}: {e}", path.display());
                return Self::empty();
            }
        };
        if store.version != STORE_VERSION {
            log::info!("store version {} is outdated; starting afresh", store.version);
            return Self::empty();
        }
        store
    }

    /// Save to the output directory. An unchanged store leaves the file
    /// untouched.
    pub fn save(&self, output_dir: &Path, file_mode: u32) -> Result<WriteOutcome, WriteError> {
        let path = store_path(output_dir);
        match serde_json::to_string_pretty(self) {
            Ok(json) => incremental::write_if_changed(&path, &json, file_mode),
            Err(e) => Err(WriteError {
                path,
                source: io::Error::from(e),
            }),
        }
    }

    pub fn get(&self, msgnum: u32) -> Option<&MessageSummary> {
        self.entries.get(&msgnum)
    }

    /// Record the state a message's page was left in by this run.
    pub fn record(&mut self, email: &EmailRecord, deletion_done: Option<DeleteLevel>) {
        self.entries.insert(
            email.msgnum,
            MessageSummary {
                fingerprint: fingerprint(email),
                deleted: email.deleted,
                deletion_done,
            },
        );
    }
}

/// SHA-256 of a message record, returned as a hex string.
pub fn fingerprint(email: &EmailRecord) -> String {
    let bytes = serde_json::to_vec(email).unwrap_or_default();
    format!("{:x}", Sha256::digest(&bytes))
}

/// SHA-256 of the rendering config. Any setting change rewrites all pages.
pub fn config_fingerprint(config: &RenderConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"config\0");
    hasher.update(serde_json::to_vec(config).unwrap_or_default());
    hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Article page outcomes of one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub written: u32,
    pub skipped: u32,
    pub removed: u32,
}

impl StoreStats {
    pub fn total(&self) -> u32 {
        self.written + self.skipped + self.removed
    }
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped > 0 || self.removed > 0 {
            if self.removed > 0 {
                write!(
                    f,
                    "{} unchanged, {} removed, {} written ({} total)",
                    self.skipped,
                    self.removed,
                    self.written,
                    self.total()
                )
            } else {
                write!(f, "{} unchanged, {} written ({} total)", self.skipped, self.written, self.total())
            }
        } else {
            write!(f, "{} written", self.written)
        }
    }
}

/// Resolve the store path for an output directory.
pub fn store_path(output_dir: &Path) -> PathBuf {
    output_dir.join(STORE_FILENAME)
}
