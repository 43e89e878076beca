//! Incremental update decisions.
//!
//! Each article page is written, skipped or removed:
//!
//! | Situation | Action |
//! |-----------|--------|
//! | deleted, level `removes-files` | remove |
//! | `--force`, `overwrite`, config changed, or page missing | write |
//! | deleted and `rewrite_deleted` | write |
//! | deletion change propagated from another message | write |
//! | new replies since the previous run | write |
//! | stored fingerprint differs | write |
//! | otherwise | skip |
//!
//! Without a store entry, an existing page is kept unless it has new
//! replies. Index and overview pages always render but are only written
//! when their bytes differ, so an unchanged archive leaves the output
//! tree untouched.

use crate::archive::Archive;
use crate::config::RenderConfig;
use crate::naming;
use crate::store::{self, Store};
use crate::types::{DeleteLevel, EmailRecord};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
#[error("cannot write {}: {source}", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleAction {
    Write,
    Skip,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Per-run decision state.
#[derive(Debug)]
pub struct Plan<'a> {
    store: &'a Store,
    previous_max: Option<u32>,
    full: bool,
    rewrites: BTreeSet<u32>,
}

impl<'a> Plan<'a> {
    pub fn new(archive: &Archive, config: &RenderConfig, store: &'a Store, output_dir: &Path, force: bool) -> Self {
        let previous_max = store.max_msgnum.or_else(|| scan_max_article(output_dir));
        let config_changed = !store.config_hash.is_empty() && store.config_hash != store::config_fingerprint(config);
        if config_changed {
            log::info!("rendering settings changed; rewriting every article");
        }
        Self {
            store,
            previous_max,
            full: force || config.output.overwrite || config_changed,
            rewrites: deletion_rewrites(archive, config, store),
        }
    }

    pub fn previous_max(&self) -> Option<u32> {
        self.previous_max
    }

    pub fn action(&self, email: &EmailRecord, archive: &Archive, config: &RenderConfig, page_exists: bool) -> ArticleAction {
        let num = email.msgnum;
        if email.is_deleted() && config.deletion.level == DeleteLevel::RemovesFiles {
            return ArticleAction::Remove;
        }
        if self.full || !page_exists {
            return ArticleAction::Write;
        }
        if email.is_deleted() && config.deletion.rewrite_deleted {
            return ArticleAction::Write;
        }
        if self.rewrites.contains(&num) {
            log::debug!("rewriting {} after a deletion change", naming::message_name(num));
            return ArticleAction::Write;
        }
        if has_new_replies(archive, num, self.previous_max) {
            return ArticleAction::Write;
        }
        match self.store.get(num) {
            Some(summary) if summary.fingerprint != store::fingerprint(email) => ArticleAction::Write,
            _ => ArticleAction::Skip,
        }
    }

    /// Deletion level to record for a message after `action`.
    pub fn deletion_done(&self, email: &EmailRecord, config: &RenderConfig, action: ArticleAction) -> Option<DeleteLevel> {
        if !email.is_deleted() {
            return None;
        }
        match action {
            ArticleAction::Skip => self.store.get(email.msgnum).and_then(|s| s.deletion_done),
            ArticleAction::Write | ArticleAction::Remove => Some(config.deletion.level),
        }
    }
}

/// Whether `msgnum` gained replies since the run that processed messages
/// up to `previous_max`. The previous last message always counts, since
/// its "next message" link is new.
pub fn has_new_replies(archive: &Archive, msgnum: u32, previous_max: Option<u32>) -> bool {
    let Some(max) = previous_max else {
        return false;
    };
    msgnum == max || archive.reply_numbers(msgnum).into_iter().any(|reply| reply > max)
}

/// Messages whose pages must be rewritten because a deletion changed.
///
/// A message changed when its deletion state differs from the stored one
/// (deleted, expired, or restored) or when its deleted page was written
/// under another deletion level. It is rewritten together with every page
/// linking to it: parent, replies, thread predecessors and neighbours by
/// number. A stored message missing from the archive propagates to its
/// neighbours.
pub fn deletion_rewrites(archive: &Archive, config: &RenderConfig, store: &Store) -> BTreeSet<u32> {
    let level = config.deletion.level;
    let mut out = BTreeSet::new();
    for email in archive.messages() {
        let Some(summary) = store.get(email.msgnum) else {
            continue;
        };
        let changed = summary.deleted != email.deleted
            || (email.is_deleted() && summary.deletion_done != Some(level));
        if !changed {
            continue;
        }
        out.insert(email.msgnum);
        out.extend(archive.reply_numbers(email.msgnum));
        out.extend(archive.parent(email).map(|(parent, _)| parent.msgnum));
        out.extend(archive.thread_predecessors(email.msgnum));
        out.extend(archive.number_neighbours(email.msgnum));
    }
    for &num in store.entries.keys() {
        if archive.get(num).is_none() {
            log::debug!("{} left the archive", naming::message_name(num));
            out.extend(archive.number_neighbours(num));
        }
    }
    out
}

/// Highest `NNNN.html` anywhere under the output directory.
pub fn scan_max_article(output_dir: &Path) -> Option<u32> {
    WalkDir::new(output_dir)
        .into_iter()
        .filter_entry(|entry| !entry.file_name().to_string_lossy().starts_with("att-"))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| naming::parse_article_file_name(&entry.file_name().to_string_lossy()))
        .max()
}

/// Write `contents` unless the file already holds exactly these bytes.
/// Newly created files get `file_mode` on unix.
pub fn write_if_changed(path: &Path, contents: &str, file_mode: u32) -> Result<WriteOutcome, WriteError> {
    let err = |source: io::Error| WriteError {
        path: path.to_path_buf(),
        source,
    };
    let existed = match fs::read(path) {
        Ok(old) if old == contents.as_bytes() => return Ok(WriteOutcome::Unchanged),
        Ok(_) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(err(e)),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(err)?;
    }
    fs::write(path, contents).map_err(err)?;
    if existed {
        Ok(WriteOutcome::Updated)
    } else {
        set_mode(path, file_mode).map_err(err)?;
        Ok(WriteOutcome::Created)
    }
}

/// Remove a file if present. Returns whether something was removed.
pub fn remove_if_present(path: &Path) -> Result<bool, WriteError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(WriteError {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
