//! # mailarc
//!
//! A static HTML renderer for mailing list archives. A mailbox parser hands
//! over the parsed messages as `archive.json`; mailarc turns them into one
//! page per message and a set of sorted indices, and keeps them up to date
//! as the archive grows.
//!
//! # Architecture
//!
//! ```text
//! archive.json ──► Archive ──► article pages   (NNNN.html)
//!                     │    ──► indices         (index.html, date.html, ...)
//!                     │    ──► folders/summary (index.html, summary.html)
//!                     │    ──► overviews       (archive_overview.haof, msgindex.txt)
//!                     ▼
//!              .mailarc-store.json (what the previous run wrote)
//! ```
//!
//! Rendering is a pure function of the [`archive::Archive`] and the
//! [`config::RenderConfig`]: the same input always yields the same bytes.
//! The incremental layer on top decides which article pages need writing
//! at all, and every other page is written only when it changed.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Input model deserialized from `archive.json` |
//! | [`archive`] | Ordered indices, lookups, thread and reply navigation, folders |
//! | [`naming`] | File names and relative links |
//! | [`dates`] | chrono-based date formatting |
//! | [`labels`] | Text shown on generated pages |
//! | [`linkify`] | Plain text to escaped HTML with URL, message-id and address links |
//! | [`body`] | Message body rendering: sections, quotes, attachments, deletion placeholders |
//! | [`page`] | Shared page shell, stylesheet, footer and menu fragments |
//! | [`article`] | Article pages |
//! | [`index`] | Date, thread, subject, author and attachment indices |
//! | [`folders`] | Folders index and monthly/yearly summaries |
//! | [`overview`] | HAOF XML overview and plain-text message index |
//! | [`store`] | Persistent per-message summaries for incremental runs |
//! | [`incremental`] | Write/skip/remove decisions and change-aware file writes |
//! | [`generate`] | Whole-archive orchestration |
//! | [`config`] | `config.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Every interpolation is escaped; the only raw fragments are
//! message bodies already escaped by [`linkify`] and HTML snippets taken
//! verbatim from the configuration.
//!
//! ## Deterministic Output
//!
//! Pages carry no generation timestamp, so re-running over an unchanged
//! archive produces byte-identical files and touches nothing on disk.

pub mod archive;
pub mod article;
pub mod body;
pub mod config;
pub mod dates;
pub mod folders;
pub mod generate;
pub mod incremental;
pub mod index;
pub mod labels;
pub mod linkify;
pub mod naming;
pub mod output;
pub mod overview;
pub mod page;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
