//! Index pages.
//!
//! Every index walks one ordering of the archive and lists each live
//! message once, with a permalink anchored as `#{prefix}{msgnum}` so that
//! article menus can jump to the entry:
//!
//! | Index      | Ordering            | Grouped under        |
//! |------------|---------------------|----------------------|
//! | date       | date                | day heading          |
//! | subject    | subject             | subject without `Re:`|
//! | author     | author              | author name          |
//! | thread     | thread list, nested | (thread roots)       |
//! | attachment | date                | one heading per message, files below |
//!
//! All pages share one frame: a header with the archive statistics and the
//! "sort by" menu, the listing, a last-message-date line and a footer menu.
//! Archives (or periods) without live messages get a notice instead of the
//! listing.

use crate::archive::{Archive, Filter, SortOrder};
use crate::config::RenderConfig;
use crate::dates;
use crate::labels;
use crate::naming::{self, IndexKind};
use crate::page;
use crate::types::EmailRecord;
use maud::{Markup, html};
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Order of the "sort by" menu.
const MENU_ORDER: [IndexKind; 5] = [
    IndexKind::Thread,
    IndexKind::Author,
    IndexKind::Date,
    IndexKind::Subject,
    IndexKind::Attachment,
];

/// A summary period such as May 2024.
#[derive(Debug, Clone, Copy)]
pub struct Period<'a> {
    /// File name prefix: `202405` or `2024`.
    pub slug: &'a str,
    /// Heading text: `May 2024` or `2024`.
    pub label: &'a str,
}

/// Where an index page lives and what it covers.
#[derive(Debug, Clone, Copy)]
pub struct IndexPage<'a> {
    pub kind: IndexKind,
    pub filter: Filter<'a>,
    /// Folder the page is written to. Article links are relative to it.
    pub location: &'a str,
    /// Set for the per-period indices of the summary.
    pub period: Option<Period<'a>>,
}

impl<'a> IndexPage<'a> {
    /// Index of the whole archive at the top of the output.
    pub fn top(kind: IndexKind) -> Self {
        Self {
            kind,
            filter: Filter::default(),
            location: "",
            period: None,
        }
    }

    /// Index of one folder, written inside it.
    pub fn folder(kind: IndexKind, folder: &'a str) -> Self {
        Self {
            kind,
            filter: Filter::folder(folder),
            location: folder,
            period: None,
        }
    }

    /// File name of a sibling index of `kind`.
    pub fn file_name(&self, kind: IndexKind, config: &RenderConfig) -> String {
        match self.period {
            Some(period) => naming::period_index_name(period.slug, kind),
            None => kind.file_name(config.indices.default),
        }
    }

    fn in_folder(&self) -> bool {
        self.filter.folder.is_some_and(|f| !f.is_empty())
    }
}

/// Render one index page. `out_dir` is only read by the attachment index,
/// which lists the stored attachment directories.
pub fn render_index(page: &IndexPage, archive: &Archive, config: &RenderConfig, out_dir: &Path) -> String {
    let count = archive.live_count(&page.filter);
    let range = archive.date_range(&page.filter);
    let last_date = range.map(|(_, last)| last);

    let listing = if count == 0 {
        empty_notice(last_date, config)
    } else {
        match page.kind {
            IndexKind::Date => date_listing(page, archive, config),
            IndexKind::Subject => subject_listing(page, archive, config),
            IndexKind::Author => author_listing(page, archive, config),
            IndexKind::Thread => thread_listing(page, archive, config),
            IndexKind::Attachment => attachment_listing(page, archive, config, out_dir),
        }
        .map_or_else(
            || html! { h2.empty-archive { (labels::NO_ATTACHMENTS) } },
            |entries| {
                html! {
                    (entries)
                    (last_stats(last_date, config))
                }
            },
        )
    };

    let title = page_title(page, config);
    let content = html! {
        header.head {
            @if let Some(upper) = &config.page.header_html {
                nav.breadcrumb id="upper" { (maud::PreEscaped(upper)) }
            }
            h1 { (title) }
            (header_links(page, archive, config, count, range))
        }
        @if count == 0 {
            (listing)
        } @else {
            main.messages-list { (listing) }
        }
        footer.foot {
            (footer_links(page, archive, config, count))
            (page::footer_html(config))
        }
    };
    page::base_document(&title, config, "index", content).into_string()
}

fn page_title(page: &IndexPage, config: &RenderConfig) -> String {
    match page.period {
        Some(period) => format!(
            "{}: {} {}",
            config.label,
            period.label,
            labels::index_title(page.kind)
        ),
        None => format!("{}: {}", config.label, labels::index_title(page.kind)),
    }
}

// =============================================================================
// Shared frame
// =============================================================================

fn empty_notice(last_date: Option<i64>, config: &RenderConfig) -> Markup {
    html! {
        main.messages-list {
            p.archive-notice { (labels::EMPTY_ARCHIVE) }
            (last_stats(last_date, config))
        }
    }
}

pub(crate) fn last_stats(last_date: Option<i64>, config: &RenderConfig) -> Markup {
    html! {
        p.last-message-date id="end" {
            span.heading { (labels::LAST_MESSAGE_DATE) } ": "
            @if let Some(date) = last_date {
                (dates::format(date, &config.dates.format))
            }
        }
    }
}

/// Whether any other enabled index besides the date/thread/subject/author
/// index being written exists.
fn has_other_indices(page: &IndexPage, config: &RenderConfig) -> bool {
    [IndexKind::Date, IndexKind::Thread, IndexKind::Subject, IndexKind::Author]
        .into_iter()
        .any(|kind| kind != page.kind && config.indices.is_enabled(kind))
}

fn sort_by_list(page: &IndexPage, config: &RenderConfig) -> Markup {
    html! {
        ul.hmenu {
            @for kind in MENU_ORDER {
                @if config.indices.is_enabled(kind) {
                    @if kind == page.kind {
                        li { (labels::index_name(kind)) }
                    } @else {
                        li { a href=(page.file_name(kind, config)) rel="alternate" { (labels::index_name(kind)) } }
                    }
                }
            }
        }
    }
}

fn other_periods(page: &IndexPage, archive: &Archive, config: &RenderConfig) -> Markup {
    let Some(folder) = page.filter.folder.filter(|_| page.in_folder()) else {
        return html! {};
    };
    let top = naming::rel_path_to_top(folder);
    let file = page.file_name(page.kind, config);
    let view = labels::index_title(page.kind);
    html! {
        li {
            span.heading { (labels::OTHER_PERIODS) } ": "
            ul.hmenu {
                @if let Some(prev) = archive.previous_folder(folder) {
                    li { a href=(format!("{top}{}{file}", prev.name)) { (labels::PREVIOUS_PERIOD) ", " (view) } }
                }
                @if let Some(next) = archive.next_folder(folder) {
                    li { a href=(format!("{top}{}{file}", next.name)) { (labels::NEXT_PERIOD) ", " (view) } }
                }
                li { a href=(format!("{top}index.html")) { (labels::LIST_OF_FOLDERS) } }
            }
        }
    }
}

fn header_links(
    page: &IndexPage,
    archive: &Archive,
    config: &RenderConfig,
    count: usize,
    range: Option<(i64, i64)>,
) -> Markup {
    let format = &config.dates.format;
    let most_recent = !matches!(page.kind, IndexKind::Author | IndexKind::Subject);
    html! {
        nav id="navbar" {
            ul.hmenu_container {
                @if has_other_indices(page, config) {
                    li {
                        span.heading { a href="#first" { (count) " " (labels::MESSAGES) } }
                        @if let Some((first, last)) = range {
                            ": "
                            span.heading { (labels::STARTING) } " " (dates::format(first, format)) ", "
                            span.heading { (labels::ENDING) } " " (dates::format(last, format))
                        }
                    }
                    @if most_recent {
                        li {
                            span.heading { (labels::THIS_PERIOD) } ": "
                            a href="#end" { (labels::MOST_RECENT) }
                        }
                    }
                }
                li {
                    span.heading { (labels::SORT_BY) } ": "
                    (sort_by_list(page, config))
                }
                (page::new_message_action(config))
                (other_periods(page, archive, config))
                @if page.location.is_empty() {
                    (page::summary_link(config))
                }
                (page::nearby_links(config))
            }
        }
    }
}

fn footer_links(page: &IndexPage, archive: &Archive, config: &RenderConfig, count: usize) -> Markup {
    html! {
        nav id="navbarfoot" {
            ul.hmenu_container {
                li {
                    span.heading {
                        a href="#first" { (count) " " (labels::MESSAGES) } "; " (labels::SORT_BY)
                    } ": "
                    (sort_by_list(page, config))
                }
                (page::new_message_action(config))
                (other_periods(page, archive, config))
                (page::nearby_links(config))
            }
        }
    }
}

// =============================================================================
// Entries
// =============================================================================

/// Subject as listed in an index, truncated to `indices.subject_max_chars`.
pub fn index_subject(subject: &str, config: &RenderConfig) -> String {
    let subject = if subject.trim().is_empty() {
        labels::NO_SUBJECT
    } else {
        subject
    };
    match config.indices.subject_max_chars {
        Some(max) if subject.chars().count() > max => {
            let cut: String = subject.chars().take(max).collect();
            format!("{}...", cut.trim_end())
        }
        _ => subject.to_string(),
    }
}

fn display_name(email: &EmailRecord) -> &str {
    if email.name.trim().is_empty() {
        &email.email
    } else {
        &email.name
    }
}

struct EntryLinks<'a> {
    location: &'a str,
    prefix: &'a str,
}

impl EntryLinks<'_> {
    fn new<'a>(page: &'a IndexPage, config: &'a RenderConfig) -> EntryLinks<'a> {
        EntryLinks {
            location: page.location,
            prefix: &config.indices.fragment_prefix,
        }
    }

    fn anchor(&self, email: &EmailRecord) -> String {
        format!("{}{}", self.prefix, email.msgnum)
    }

    fn href(&self, email: &EmailRecord) -> String {
        naming::article_href(self.location, email.folder(), email.msgnum)
    }
}

/// Group consecutive entries sharing a key. Keys compare as given.
fn group_by_key<'a, K: PartialEq>(
    entries: Vec<&'a EmailRecord>,
    key: impl Fn(&EmailRecord) -> K,
) -> Vec<Vec<&'a EmailRecord>> {
    let mut groups: Vec<Vec<&EmailRecord>> = Vec::new();
    let mut current: Option<K> = None;
    for email in entries {
        let k = key(email);
        match groups.last_mut() {
            Some(group) if current.as_ref() == Some(&k) => group.push(email),
            _ => {
                groups.push(vec![email]);
                current = Some(k);
            }
        }
    }
    groups
}

fn first_id(i: usize) -> Option<&'static str> {
    (i == 0).then_some("first")
}

fn date_listing(page: &IndexPage, archive: &Archive, config: &RenderConfig) -> Option<Markup> {
    let links = EntryLinks::new(page, config);
    let entries = archive.sorted(SortOrder::Date, &page.filter);
    let day = |email: &EmailRecord| dates::format(email.date, &config.dates.day_heading);
    let groups = group_by_key(entries, day);
    Some(html! {
        @for (i, group) in groups.iter().enumerate() {
            h2.heading id=[first_id(i)] { (day(group[0])) }
            ul {
                @for email in group {
                    li {
                        a id=(links.anchor(email)) href=(links.href(email)) {
                            (index_subject(&email.subject, config))
                        }
                        " "
                        span.messages-list-author { (display_name(email)) }
                    }
                }
            }
        }
    })
}

fn subject_listing(page: &IndexPage, archive: &Archive, config: &RenderConfig) -> Option<Markup> {
    let links = EntryLinks::new(page, config);
    let entries = archive.sorted(SortOrder::Subject, &page.filter);
    let groups = group_by_key(entries, |e| e.unre_subject.to_lowercase());
    let format = &config.dates.format;
    Some(html! {
        @for (i, group) in groups.iter().enumerate() {
            h2.heading id=[first_id(i)] { (index_subject(&group[0].unre_subject, config)) }
            ul {
                @for email in group {
                    li {
                        a id=(links.anchor(email)) href=(links.href(email)) { (display_name(email)) }
                        " "
                        span.messages-list-date { "(" (dates::format(email.date, format)) ")" }
                    }
                }
            }
        }
    })
}

fn author_listing(page: &IndexPage, archive: &Archive, config: &RenderConfig) -> Option<Markup> {
    let links = EntryLinks::new(page, config);
    let entries = archive.sorted(SortOrder::Author, &page.filter);
    let groups = group_by_key(entries, |e| e.name.to_lowercase());
    let format = &config.dates.format;
    Some(html! {
        @for (i, group) in groups.iter().enumerate() {
            h2.heading id=[first_id(i)] { (display_name(group[0])) }
            ul {
                @for email in group {
                    li {
                        a id=(links.anchor(email)) href=(links.href(email)) {
                            (index_subject(&email.subject, config))
                        }
                        " "
                        span.messages-list-date { "(" (dates::format(email.date, format)) ")" }
                    }
                }
            }
        }
    })
}

// =============================================================================
// Thread index
// =============================================================================

struct ThreadNode<'a> {
    email: &'a EmailRecord,
    children: Vec<ThreadNode<'a>>,
}

/// Thread list restricted to `filter`, as `(depth, message)` in pre-order.
///
/// A message that does not match hands its children to its nearest
/// matching ancestor. Matching messages missing from the thread list
/// follow as roots in date order.
fn flatten_threads<'a>(archive: &'a Archive, filter: &Filter) -> Vec<(usize, &'a EmailRecord)> {
    let mut flat = Vec::new();
    let mut listed = HashSet::new();
    let mut shown_levels: Vec<u32> = Vec::new();
    for item in archive.threads() {
        while shown_levels.last().is_some_and(|level| *level >= item.level) {
            shown_levels.pop();
        }
        let Some(email) = archive.get(item.msgnum) else {
            continue;
        };
        if !filter.matches(email) || !listed.insert(email.msgnum) {
            continue;
        }
        flat.push((shown_levels.len(), email));
        shown_levels.push(item.level);
    }
    for email in archive.sorted(SortOrder::Date, filter) {
        if listed.insert(email.msgnum) {
            flat.push((0, email));
        }
    }
    flat
}

fn attach<'a>(stack: &mut Vec<ThreadNode<'a>>, roots: &mut Vec<ThreadNode<'a>>, depth: usize) {
    while stack.len() > depth {
        let Some(node) = stack.pop() else { break };
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

fn nest_threads(flat: Vec<(usize, &EmailRecord)>) -> Vec<ThreadNode<'_>> {
    let mut roots = Vec::new();
    let mut stack: Vec<ThreadNode> = Vec::new();
    for (depth, email) in flat {
        attach(&mut stack, &mut roots, depth);
        stack.push(ThreadNode {
            email,
            children: Vec::new(),
        });
    }
    attach(&mut stack, &mut roots, 0);
    roots
}

fn thread_listing(page: &IndexPage, archive: &Archive, config: &RenderConfig) -> Option<Markup> {
    let links = EntryLinks::new(page, config);
    let roots = nest_threads(flatten_threads(archive, &page.filter));
    Some(html! {
        ul id="first" {
            @for node in &roots {
                (thread_entry(node, &links, config))
            }
        }
    })
}

fn thread_entry(node: &ThreadNode, links: &EntryLinks, config: &RenderConfig) -> Markup {
    let email = node.email;
    html! {
        li {
            a id=(links.anchor(email)) href=(links.href(email)) { (index_subject(&email.subject, config)) }
            " "
            span.messages-list-author { (display_name(email)) }
            " "
            span.messages-list-date { "(" (dates::format(email.date, &config.dates.format)) ")" }
            @if !node.children.is_empty() {
                ul {
                    @for child in &node.children {
                        (thread_entry(child, links, config))
                    }
                }
            }
        }
    }
}

// =============================================================================
// Attachment index
// =============================================================================

/// A stored attachment file.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAttachment {
    /// File name inside the attachment directory.
    pub file_name: String,
    /// Name shown to readers, without the `partN-` storage prefix.
    pub display_name: String,
    pub size: u64,
}

/// Files stored for `email` under `out_dir`, sorted by name. `None` when
/// the message has no attachment directory.
pub fn stored_attachments(out_dir: &Path, email: &EmailRecord) -> Option<Vec<StoredAttachment>> {
    let dir = out_dir
        .join(email.folder())
        .join(naming::attachment_dir_name(email.msgnum));
    if !dir.is_dir() {
        return None;
    }
    let files = WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let file_name = entry.file_name().to_str()?.to_string();
            if file_name == ".meta" {
                return None;
            }
            let size = entry.metadata().map(|m| m.len()).unwrap_or_default();
            let display_name = match file_name.split_once('-') {
                Some((_, rest)) if !rest.is_empty() => rest.to_string(),
                _ => file_name.clone(),
            };
            Some(StoredAttachment {
                file_name,
                display_name,
                size,
            })
        })
        .collect();
    Some(files)
}

fn attachment_listing(
    page: &IndexPage,
    archive: &Archive,
    config: &RenderConfig,
    out_dir: &Path,
) -> Option<Markup> {
    let links = EntryLinks::new(page, config);
    let with_files: Vec<(&EmailRecord, Vec<StoredAttachment>)> = archive
        .sorted(SortOrder::Date, &page.filter)
        .into_iter()
        .filter_map(|email| stored_attachments(out_dir, email).map(|files| (email, files)))
        .collect();
    if with_files.is_empty() {
        return None;
    }
    let format = &config.dates.format;
    Some(html! {
        @for (i, (email, files)) in with_files.iter().enumerate() {
            h2.heading id=[first_id(i)] {
                a id=(links.anchor(email)) href=(links.href(email)) { (index_subject(&email.subject, config)) }
                " "
                span.messages-list-author { (display_name(email)) }
                " "
                span.messages-list-date { "(" (dates::format(email.date, format)) ")" }
            }
            @if !files.is_empty() {
                @let dir = naming::folder_href(
                    page.location,
                    email.folder(),
                    &naming::attachment_dir_name(email.msgnum),
                );
                ol.messageslist-attachments {
                    @for file in files {
                        li {
                            a href=(format!("{dir}/{}", file.file_name)) { (file.display_name) }
                            " (" (file.size) " " (labels::BYTES) ")"
                        }
                    }
                }
            }
        }
    })
}
