//! Whole-archive generation.
//!
//! Reads `archive.json` from the source directory, renders every page and
//! writes the output tree. Articles go through the incremental
//! [`Plan`](crate::incremental::Plan); every other page is rendered in
//! full and written only when its bytes changed.
//!
//! ## Output Structure
//!
//! Without folders every page sits at the top:
//!
//! ```text
//! dist/
//! ├── index.html                 # default index
//! ├── date.html  subject.html  author.html
//! ├── 0000.html  0001.html  ...  # articles
//! ├── att-0001/                  # stored attachments (written by the parser)
//! ├── summary.html               # with indices.summary
//! ├── 202405bydate.html ...      # period indices
//! ├── archive_overview.haof      # with output.haof
//! ├── msgindex.txt               # with output.message_index
//! └── .mailarc-store.json
//! ```
//!
//! With folders the top `index.html` lists the folders, and each folder
//! holds its own indices, overview and articles:
//!
//! ```text
//! dist/
//! ├── index.html                 # folders index
//! └── 2024/05/
//!     ├── index.html  date.html ...
//!     ├── archive_overview.haof
//!     └── 0000.html ...
//! ```

use crate::archive::{Archive, Filter};
use crate::article;
use crate::config::{RenderConfig, SummaryPeriod};
use crate::folders;
use crate::incremental::{self, ArticleAction, Plan, WriteError, WriteOutcome};
use crate::index::{self, IndexPage};
use crate::naming;
use crate::overview;
use crate::page;
use crate::store::{self, Store, StoreStats};
use crate::types::ArchiveInput;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the parser's hand-over file in the source directory.
pub const INPUT_FILE: &str = "archive.json";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Run flags from the command line.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Rewrite every article regardless of the store.
    pub force: bool,
    /// Read and save the incremental store.
    pub use_store: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            force: false,
            use_store: true,
        }
    }
}

/// One non-article file touched by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWrite {
    /// Path relative to the output directory.
    pub path: String,
    pub outcome: WriteOutcome,
}

/// What a run did, for the CLI report.
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Records in the input, deleted ones included.
    pub messages: usize,
    pub live: usize,
    pub folders: usize,
    pub previous_max: Option<u32>,
    pub max_msgnum: Option<u32>,
    pub articles: StoreStats,
    /// Article pages created by this run.
    pub new_articles: Vec<String>,
    pub pages: Vec<PageWrite>,
    /// Files removed: pages of removed messages and empty period indices.
    pub removed: Vec<String>,
    pub store_saved: bool,
}

impl GenerateReport {
    /// Messages numbered above the previous run's maximum.
    pub fn new_messages(&self) -> u32 {
        match (self.previous_max, self.max_msgnum) {
            (Some(prev), Some(max)) => max.saturating_sub(prev),
            (None, Some(_)) => self.messages as u32,
            _ => 0,
        }
    }

    pub fn pages_changed(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.outcome != WriteOutcome::Unchanged)
            .count()
    }
}

/// Read `archive.json` from the source directory.
pub fn load_archive(source: &Path) -> Result<Archive, GenerateError> {
    let path = source.join(INPUT_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(source) => return Err(GenerateError::Read { path, source }),
    };
    let input: ArchiveInput =
        serde_json::from_str(&content).map_err(|source| GenerateError::Json { path, source })?;
    Ok(Archive::new(input))
}

/// Render the archive into `output_dir`.
pub fn generate(
    archive: &Archive,
    config: &RenderConfig,
    output_dir: &Path,
    options: Options,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir).map_err(|source| WriteError {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let use_store = options.use_store && config.output.store;
    let previous = if use_store {
        Store::load(output_dir)
    } else {
        Store::empty()
    };
    let plan = Plan::new(archive, config, &previous, output_dir, options.force);

    let mut report = GenerateReport {
        messages: archive.len(),
        live: archive.live_count(&Filter::default()),
        folders: archive.folders().len(),
        previous_max: plan.previous_max(),
        max_msgnum: archive.max_msgnum(),
        ..Default::default()
    };

    let mut next = Store::empty();
    write_articles(archive, config, output_dir, &plan, &mut next, &mut report)?;

    let mut writer = PageWriter {
        output_dir,
        file_mode: config.output.file_mode,
        report: &mut report,
    };
    if archive.folders().is_empty() {
        write_indices(archive, config, "", &mut writer)?;
    } else {
        for folder in archive.folders() {
            write_indices(archive, config, &folder.name, &mut writer)?;
        }
        writer.write("index.html", &folders::render_folders_index(archive, config))?;
    }
    write_summary(archive, config, &mut writer)?;
    write_overviews(archive, config, &mut writer)?;

    if use_store {
        next.config_hash = store::config_fingerprint(config);
        next.max_msgnum = archive.max_msgnum().max(previous.max_msgnum);
        next.save(output_dir, config.output.file_mode)?;
        report.store_saved = true;
    }
    Ok(report)
}

fn write_articles(
    archive: &Archive,
    config: &RenderConfig,
    output_dir: &Path,
    plan: &Plan,
    next: &mut Store,
    report: &mut GenerateReport,
) -> Result<(), GenerateError> {
    for email in archive.messages() {
        let rel = naming::article_rel_path(email.folder(), email.msgnum);
        let path = output_dir.join(&rel);
        let action = plan.action(email, archive, config, path.exists());
        match action {
            ArticleAction::Write => {
                let html = article::render_article(email, archive, config);
                if incremental::write_if_changed(&path, &html, config.output.file_mode)? == WriteOutcome::Created {
                    report.new_articles.push(rel);
                }
                report.articles.written += 1;
            }
            ArticleAction::Skip => {
                log::debug!("{rel} is up to date");
                report.articles.skipped += 1;
            }
            ArticleAction::Remove => {
                if incremental::remove_if_present(&path)? {
                    log::info!("removed {rel}");
                    report.removed.push(rel);
                }
                report.articles.removed += 1;
            }
        }
        next.record(email, plan.deletion_done(email, config, action));
    }
    Ok(())
}

/// Writes non-article pages relative to the output directory.
struct PageWriter<'a> {
    output_dir: &'a Path,
    file_mode: u32,
    report: &'a mut GenerateReport,
}

impl PageWriter<'_> {
    fn write(&mut self, rel: &str, contents: &str) -> Result<(), GenerateError> {
        let outcome = incremental::write_if_changed(&self.output_dir.join(rel), contents, self.file_mode)?;
        self.report.pages.push(PageWrite {
            path: rel.to_string(),
            outcome,
        });
        Ok(())
    }

    fn remove(&mut self, rel: &str) -> Result<(), GenerateError> {
        if incremental::remove_if_present(&self.output_dir.join(rel))? {
            log::info!("removed empty {rel}");
            self.report.removed.push(rel.to_string());
        }
        Ok(())
    }
}

/// Every enabled index of the archive root (`location` empty) or of one
/// folder, plus the folder's HAOF file.
fn write_indices(
    archive: &Archive,
    config: &RenderConfig,
    location: &str,
    writer: &mut PageWriter,
) -> Result<(), GenerateError> {
    for kind in config.indices.enabled() {
        let page = if location.is_empty() {
            IndexPage::top(kind)
        } else {
            IndexPage::folder(kind, location)
        };
        let html = index::render_index(&page, archive, config, writer.output_dir);
        let rel = format!("{location}{}", kind.file_name(config.indices.default));
        writer.write(&rel, &html)?;
    }
    if config.output.haof && !location.is_empty() {
        let haof = overview::render_haof(archive, config, &Filter::folder(location), location);
        writer.write(&format!("{location}{}", overview::HAOF_FILE), &haof)?;
    }
    Ok(())
}

/// `summary.html` and the per-period indices.
fn write_summary(archive: &Archive, config: &RenderConfig, writer: &mut PageWriter) -> Result<(), GenerateError> {
    if config.indices.summary == SummaryPeriod::None {
        return Ok(());
    }
    let periods = folders::periods(archive, config);
    writer.write(page::SUMMARY_FILE, &folders::render_summary(archive, config, &periods))?;
    for period in &periods {
        for kind in folders::summary_kinds(config) {
            let page = period.index_page(kind);
            let rel = page.file_name(kind, config);
            if period.count == 0 {
                writer.remove(&rel)?;
            } else {
                let html = index::render_index(&page, archive, config, writer.output_dir);
                writer.write(&rel, &html)?;
            }
        }
    }
    Ok(())
}

fn write_overviews(archive: &Archive, config: &RenderConfig, writer: &mut PageWriter) -> Result<(), GenerateError> {
    if config.output.haof {
        let haof = overview::render_haof(archive, config, &Filter::default(), "");
        writer.write(overview::HAOF_FILE, &haof)?;
    }
    if config.output.message_index
        && let Some(index) = overview::render_msgindex(archive)
    {
        writer.write(overview::MSGINDEX_FILE, &index)?;
    }
    Ok(())
}
