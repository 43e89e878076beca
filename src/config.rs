//! Renderer configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a `config.toml` in the source directory (next to
//! `archive.json`) overrides any subset of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! label = "Mailing list archive"   # Archive title used on every page
//!
//! [output]
//! overwrite = false        # Rewrite article pages even when unchanged
//! file_mode = 0o644        # Permissions for newly created files (unix)
//! store = true             # Keep the incremental store in the output dir
//! haof = false             # Write archive_overview.haof
//! message_index = false    # Write msgindex.txt
//! report_new_files = false # List every newly created file
//!
//! [indices]
//! date = true
//! thread = true
//! subject = true
//! author = true
//! attachment = false
//! default = "thread"       # Which index is written as index.html
//! fragment_prefix = "msg"  # Anchor prefix for index entries (#msg42)
//! summary = "none"         # "none", "monthly" or "yearly"
//! reverse_folders = false  # Newest folder first on the folders index
//! # subject_max_chars = 60 # Truncate subjects in index listings
//!
//! [article]
//! body_format = "pre"      # "pre" or "html"
//! show_br = false          # Force <br /> after every line ("html" format)
//! italic_quotes = true     # Wrap quoted lines in <em> ("html" format)
//! quote_hide_threshold = 100  # Collapse quotes above this percentage
//! link_message_ids = true  # Link message-ids that are in the archive
//! show_headers = []        # Extra headers listed below From/Date
//! msg_links = "both"       # Message navigation: off, top, bottom, both
//! index_links = "both"     # Index menu: off, top, bottom, both
//! show_replies = true      # List replies in the footer navigation
//! # txt_suffix = "txt"     # Link to a raw text version
//! # inreplyto_command = "https://lists.example.org/msgid/$ID"
//!
//! [mail]
//! links = "mailto"         # "off", "mailto" or "obfuscate"
//! command = "mailto:$TO?In-Reply-To=$ID&Subject=$SUBJECT"
//! antispam_at = "_at_"     # Replacement for '@' in obfuscated addresses
//! spamprotect_id = false   # Also replace '@' in message-id comments
//! # list_address = "list@example.org"
//!
//! [deletion]
//! level = "leaves-expired-text"
//! rewrite_deleted = true
//!
//! [page]
//! # css_url = "/archive.css"
//! # header_html = "<a href=\"../\">Up</a>"
//!
//! [dates]
//! format = "%a %b %d %Y - %H:%M:%S %Z"
//! day_heading = "%a %b %d %Y"
//! period = "%d %b %Y"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::dates;
use crate::naming::IndexKind;
use crate::types::DeleteLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Renderer configuration loaded from `config.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Archive title shown in page titles and index headings.
    pub label: String,
    pub output: OutputConfig,
    pub indices: IndicesConfig,
    pub article: ArticleConfig,
    pub mail: MailConfig,
    pub deletion: DeletionConfig,
    pub page: PageConfig,
    pub dates: DatesConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            label: "Mailing list archive".to_string(),
            output: OutputConfig::default(),
            indices: IndicesConfig::default(),
            article: ArticleConfig::default(),
            mail: MailConfig::default(),
            deletion: DeletionConfig::default(),
            page: PageConfig::default(),
            dates: DatesConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.file_mode > 0o7777 {
            return Err(ConfigError::Validation(
                "output.file_mode must be a permission mode (at most 0o7777)".into(),
            ));
        }
        if self.article.quote_hide_threshold > 100 {
            return Err(ConfigError::Validation(
                "article.quote_hide_threshold must be 0-100".into(),
            ));
        }
        if self.indices.fragment_prefix.is_empty()
            || self
                .indices
                .fragment_prefix
                .chars()
                .any(|c| c.is_whitespace() || c == '#' || c == '"')
        {
            return Err(ConfigError::Validation(
                "indices.fragment_prefix must be a non-empty anchor name".into(),
            ));
        }
        if !self.indices.is_enabled(self.indices.default) {
            return Err(ConfigError::Validation(format!(
                "indices.default = \"{}\" but that index is disabled",
                self.indices.default.slug()
            )));
        }
        if self.indices.default == IndexKind::Attachment {
            return Err(ConfigError::Validation(
                "indices.default cannot be the attachment index".into(),
            ));
        }
        for (key, format) in [
            ("dates.format", &self.dates.format),
            ("dates.day_heading", &self.dates.day_heading),
            ("dates.period", &self.dates.period),
        ] {
            if !dates::is_valid_format(format) {
                return Err(ConfigError::Validation(format!(
                    "{key} is not a valid strftime format: {format:?}"
                )));
            }
        }
        if let Some(suffix) = &self.article.txt_suffix
            && (suffix.is_empty() || suffix.contains('/'))
        {
            return Err(ConfigError::Validation(
                "article.txt_suffix must be a plain file extension".into(),
            ));
        }
        Ok(())
    }
}

/// Output directory behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Rewrite article pages even when nothing changed.
    pub overwrite: bool,
    /// Unix permission bits applied to newly created files.
    pub file_mode: u32,
    /// Keep the incremental store (`.mailarc-store.json`) in the output dir.
    pub store: bool,
    /// Write the XML archive overview.
    pub haof: bool,
    /// Write the plain-text message index.
    pub message_index: bool,
    /// Report each newly created file.
    pub report_new_files: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            overwrite: false,
            file_mode: 0o644,
            store: true,
            haof: false,
            message_index: false,
            report_new_files: false,
        }
    }
}

/// Which index pages exist and how they are linked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicesConfig {
    pub date: bool,
    pub thread: bool,
    pub subject: bool,
    pub author: bool,
    pub attachment: bool,
    /// Index written as `index.html`.
    pub default: IndexKind,
    /// Anchor prefix for entries, so article menus can link `#msg42`.
    pub fragment_prefix: String,
    /// Truncate subjects in index listings to this many characters.
    pub subject_max_chars: Option<usize>,
    /// Per-period summary indices.
    pub summary: SummaryPeriod,
    /// List folders newest first.
    pub reverse_folders: bool,
}

impl Default for IndicesConfig {
    fn default() -> Self {
        Self {
            date: true,
            thread: true,
            subject: true,
            author: true,
            attachment: false,
            default: IndexKind::Thread,
            fragment_prefix: "msg".to_string(),
            subject_max_chars: None,
            summary: SummaryPeriod::None,
            reverse_folders: false,
        }
    }
}

impl IndicesConfig {
    pub fn is_enabled(&self, kind: IndexKind) -> bool {
        match kind {
            IndexKind::Date => self.date,
            IndexKind::Thread => self.thread,
            IndexKind::Subject => self.subject,
            IndexKind::Author => self.author,
            IndexKind::Attachment => self.attachment,
        }
    }

    /// Enabled indexes in menu order.
    pub fn enabled(&self) -> Vec<IndexKind> {
        IndexKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    None,
    Monthly,
    Yearly,
}

/// Article page rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArticleConfig {
    pub body_format: BodyFormat,
    /// Emit `<br />` after every text line in the "html" format.
    pub show_br: bool,
    /// Quoted lines use `<em>` instead of `<span>` in the "html" format.
    pub italic_quotes: bool,
    /// Replace quoted runs by a link to the parent message when quoted
    /// lines exceed this percentage of the body. 100 disables it.
    pub quote_hide_threshold: u32,
    /// Turn message-ids of archived messages into links.
    pub link_message_ids: bool,
    /// Extra header names shown under From and Date.
    pub show_headers: Vec<String>,
    pub msg_links: LinkPlacement,
    pub index_links: LinkPlacement,
    pub show_replies: bool,
    /// Link to `NNNN.{suffix}` holding the raw message.
    pub txt_suffix: Option<String>,
    /// URL template (`$ID`) used when the parent is not in the archive.
    pub inreplyto_command: Option<String>,
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            body_format: BodyFormat::Pre,
            show_br: false,
            italic_quotes: true,
            quote_hide_threshold: 100,
            link_message_ids: true,
            show_headers: Vec::new(),
            msg_links: LinkPlacement::Both,
            index_links: LinkPlacement::Both,
            show_replies: true,
            txt_suffix: None,
            inreplyto_command: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    /// Body inside `<pre class="body">`.
    Pre,
    /// Body as flowing HTML with `<br />` line breaks.
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPlacement {
    Off,
    Top,
    Bottom,
    Both,
}

impl LinkPlacement {
    pub fn top(self) -> bool {
        matches!(self, LinkPlacement::Top | LinkPlacement::Both)
    }

    pub fn bottom(self) -> bool {
        matches!(self, LinkPlacement::Bottom | LinkPlacement::Both)
    }
}

/// Address handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MailConfig {
    pub links: MailLinks,
    /// Reply command template; `$TO`, `$ID` and `$SUBJECT` are substituted
    /// URL-encoded.
    pub command: String,
    pub antispam_at: String,
    /// Replace '@' in the `id` and `inreplyto` page comments.
    pub spamprotect_id: bool,
    /// List address for the "new message" and "reply" actions.
    pub list_address: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            links: MailLinks::Mailto,
            command: "mailto:$TO?In-Reply-To=$ID&Subject=$SUBJECT".to_string(),
            antispam_at: "_at_".to_string(),
            spamprotect_id: false,
            list_address: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailLinks {
    Off,
    Mailto,
    Obfuscate,
}

/// Deleted and edited message handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeletionConfig {
    pub level: DeleteLevel,
    /// Rewrite deleted message pages on every run.
    pub rewrite_deleted: bool,
    /// Body replacement for deleted (spam) messages.
    pub deleted_html: Option<String>,
    /// Body replacement for messages deleted for other reasons.
    pub deleted_other_html: Option<String>,
    /// Notice shown above edited messages.
    pub edited_html: Option<String>,
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            level: DeleteLevel::LeavesExpiredText,
            rewrite_deleted: true,
            deleted_html: None,
            deleted_other_html: None,
            edited_html: None,
        }
    }
}

/// Page chrome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// External stylesheet. The built-in stylesheet is inlined when unset.
    pub css_url: Option<String>,
    /// Raw HTML placed above the page heading (breadcrumbs).
    pub header_html: Option<String>,
    /// Raw HTML placed at the end of every page.
    pub footer_html: Option<String>,
    pub about_url: Option<String>,
    pub archives_url: Option<String>,
}

/// strftime formats (chrono syntax). Dates are rendered in UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatesConfig {
    /// Full dates on articles and index entries.
    pub format: String,
    /// Day headings in the date index.
    pub day_heading: String,
    /// Period bounds on the folders index.
    pub period: String,
}

impl Default for DatesConfig {
    fn default() -> Self {
        Self {
            format: "%a %b %d %Y - %H:%M:%S %Z".to_string(),
            day_heading: "%a %b %d %Y".to_string(),
            period: "%d %b %Y".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(RenderConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<RenderConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: RenderConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<RenderConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# mailarc configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Place this file next to archive.json.
# Unknown keys will cause an error.

# Archive title used in page titles and index headings.
label = "Mailing list archive"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Rewrite every article page, even when nothing changed.
overwrite = false

# Permissions for newly created files (unix only).
file_mode = 0o644

# Keep the incremental store (.mailarc-store.json) in the output directory.
# Without it, re-runs fall back to scanning existing pages.
store = true

# Write archive_overview.haof, an XML listing of the archive.
haof = false

# Write msgindex.txt, mapping message numbers to page files.
message_index = false

# List every newly created file in the build report.
report_new_files = false

# ---------------------------------------------------------------------------
# Index pages
# ---------------------------------------------------------------------------
[indices]
date = true
thread = true
subject = true
author = true
attachment = false

# Index written as index.html ("date", "thread", "subject" or "author").
default = "thread"

# Anchor prefix for index entries; article menus link to #msg42.
fragment_prefix = "msg"

# Per-period summary indices: "none", "monthly" or "yearly".
summary = "none"

# List folders newest first on the folders index.
reverse_folders = false

# Truncate subjects in index listings.
# subject_max_chars = 60

# ---------------------------------------------------------------------------
# Article pages
# ---------------------------------------------------------------------------
[article]
# "pre" keeps the body preformatted; "html" renders flowing text.
body_format = "pre"

# Force <br /> after every line ("html" format only).
show_br = false

# Wrap quoted lines in <em> ("html" format only).
italic_quotes = true

# When quoted lines make up more than this percentage of the body, each
# quoted run is replaced by a link to the parent message. 100 disables it.
quote_hide_threshold = 100

# Link message-ids that belong to archived messages.
link_message_ids = true

# Extra headers shown under From and Date, e.g. ["To", "Cc"].
show_headers = []

# Message navigation ("off", "top", "bottom" or "both").
msg_links = "both"

# Index menu placement ("off", "top", "bottom" or "both").
index_links = "both"

# List replies in the footer navigation.
show_replies = true

# Link to a raw text copy of each message (NNNN.txt).
# txt_suffix = "txt"

# Where to send readers when the parent message is not archived ($ID).
# inreplyto_command = "https://lists.example.org/msgid/$ID"

# ---------------------------------------------------------------------------
# Mail addresses
# ---------------------------------------------------------------------------
[mail]
# "off" leaves addresses alone, "mailto" links them, "obfuscate" hides '@'.
links = "mailto"

# Reply command; $TO, $ID and $SUBJECT are URL-encoded.
command = "mailto:$TO?In-Reply-To=$ID&Subject=$SUBJECT"

# Replacement for '@' in obfuscated addresses.
antispam_at = "_at_"

# Also replace '@' in message-id page comments.
spamprotect_id = false

# List address for the "new message" and "reply" actions.
# list_address = "list@example.org"

# ---------------------------------------------------------------------------
# Deleted messages
# ---------------------------------------------------------------------------
[deletion]
# "removes-files", "removes-text", "leaves-expired-text" or "leaves-text".
level = "leaves-expired-text"

# Rewrite deleted message pages on every run.
rewrite_deleted = true

# Body replacements (raw HTML).
# deleted_html = "<p>This message was removed as spam.</p>"
# deleted_other_html = "<p>This message was removed.</p>"
# edited_html = "<p>This message was edited by a moderator.</p>"

# ---------------------------------------------------------------------------
# Page chrome
# ---------------------------------------------------------------------------
[page]
# css_url = "/archive.css"
# header_html = "<a href=\"../\">All lists</a>"
# footer_html = "<p>Hosted by example.org</p>"
# about_url = "https://lists.example.org/about"
# archives_url = "https://lists.example.org/"

# ---------------------------------------------------------------------------
# Dates (strftime syntax, rendered in UTC)
# ---------------------------------------------------------------------------
[dates]
format = "%a %b %d %Y - %H:%M:%S %Z"
day_heading = "%a %b %d %Y"
period = "%d %b %Y"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = RenderConfig::default();
        assert_eq!(config.label, "Mailing list archive");
        assert_eq!(config.indices.default, IndexKind::Thread);
        assert_eq!(config.output.file_mode, 0o644);
        assert_eq!(config.deletion.level, DeleteLevel::LeavesExpiredText);
        assert_eq!(config.article.body_format, BodyFormat::Pre);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
label = "dev list"

[article]
body_format = "html"
"#;
        let config: RenderConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.label, "dev list");
        assert_eq!(config.article.body_format, BodyFormat::Html);
        // Defaults preserved
        assert!(config.article.italic_quotes);
        assert_eq!(config.mail.links, MailLinks::Mailto);
    }

    #[test]
    fn parse_octal_file_mode_and_level() {
        let toml = r#"
[output]
file_mode = 0o600

[deletion]
level = "removes-files"
"#;
        let config: RenderConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.output.file_mode, 0o600);
        assert_eq!(config.deletion.level, DeleteLevel::RemovesFiles);
    }

    #[test]
    fn enabled_indices_in_menu_order() {
        let mut indices = IndicesConfig::default();
        indices.subject = false;
        indices.attachment = true;
        assert_eq!(
            indices.enabled(),
            vec![
                IndexKind::Date,
                IndexKind::Thread,
                IndexKind::Author,
                IndexKind::Attachment
            ]
        );
    }

    #[test]
    fn link_placement_sides() {
        assert!(LinkPlacement::Both.top() && LinkPlacement::Both.bottom());
        assert!(LinkPlacement::Top.top() && !LinkPlacement::Top.bottom());
        assert!(!LinkPlacement::Off.top() && !LinkPlacement::Off.bottom());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.indices.fragment_prefix, "msg");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[mail]
links = "obfuscate"
antispam_at = " at "
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.mail.links, MailLinks::Obfuscate);
        assert_eq!(config.mail.antispam_at, " at ");
        // Unspecified values should be defaults
        assert!(config.mail.command.starts_with("mailto:$TO"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[article]
quote_hide_threshold = 150
"#,
        )
        .unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[indices]
dates = true
"#;
        let result: Result<RenderConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<RenderConfig, _> = toml::from_str("[indexes]\ndate = true\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_disabled_default_index() {
        let mut config = RenderConfig::default();
        config.indices.thread = false;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("indices.default"));
    }

    #[test]
    fn validate_rejects_attachment_default_index() {
        let mut config = RenderConfig::default();
        config.indices.attachment = true;
        config.indices.default = IndexKind::Attachment;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_date_format() {
        let mut config = RenderConfig::default();
        config.dates.format = "%Y-%Q".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("dates.format"));
    }

    #[test]
    fn validate_rejects_file_mode_out_of_range() {
        let mut config = RenderConfig::default();
        config.output.file_mode = 0o10000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_fragment_prefix() {
        let mut config = RenderConfig::default();
        config.indices.fragment_prefix = "a b".to_string();
        assert!(config.validate().is_err());
        config.indices.fragment_prefix = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_txt_suffix_with_slash() {
        let mut config = RenderConfig::default();
        config.article.txt_suffix = Some("raw/txt".to_string());
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // merge_toml / resolve_config tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[indices]\ndate = true\nthread = true\n").unwrap();
        let overlay: toml::Value = toml::from_str("[indices]\ndate = false\n").unwrap();
        let merged = merge_toml(base, overlay);
        let indices = merged.get("indices").unwrap();
        assert_eq!(indices.get("date").unwrap().as_bool(), Some(false));
        assert_eq!(indices.get("thread").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"label = "a""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"label = "b""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("label").unwrap().as_str(), Some("b"));
    }

    #[test]
    fn resolve_config_with_overlay() {
        let overlay: toml::Value = toml::from_str("[output]\noverwrite = true\n").unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert!(config.output.overwrite);
        assert!(config.output.store);
    }

    #[test]
    fn load_raw_config_returns_none_when_no_file() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(tmp.path()).unwrap().is_none());
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: RenderConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = RenderConfig::default();
        assert_eq!(config.label, defaults.label);
        assert_eq!(config.output.file_mode, defaults.output.file_mode);
        assert_eq!(config.indices.default, defaults.indices.default);
        assert_eq!(config.mail.command, defaults.mail.command);
        assert_eq!(config.dates.format, defaults.dates.format);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in [
            "[output]",
            "[indices]",
            "[article]",
            "[mail]",
            "[deletion]",
            "[page]",
            "[dates]",
        ] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.get("indices").is_some());
        assert!(val.get("deletion").is_some());
        assert!(val.get("dates").is_some());
    }
}
