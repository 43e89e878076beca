//! Folder and period overviews.
//!
//! When messages are bucketed into folders (`2024/05/`), the top-level
//! `index.html` becomes a table of folders linking to each folder's own
//! indices. Independently, `indices.summary` adds a `summary.html` table of
//! months or years, each with its own set of indices written at the top
//! level as `{period}by{kind}.html`:
//!
//! ```text
//! summary.html
//! 202405bydate.html   202405bythread.html   ...
//! 202406bydate.html   ...
//! ```
//!
//! Periods without live messages get no row and no index files.

use crate::archive::{Archive, Filter};
use crate::config::{RenderConfig, SummaryPeriod};
use crate::dates;
use crate::index::{self, IndexPage, Period};
use crate::labels;
use crate::naming::IndexKind;
use crate::page;
use maud::{Markup, html};

/// One month or year of the summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodStats {
    /// File name prefix: `202405` or `2024`.
    pub slug: String,
    /// Heading text: `May 2024` or `2024`.
    pub label: String,
    pub year: i32,
    pub month: Option<u32>,
    /// Live messages in the period.
    pub count: usize,
}

impl PeriodStats {
    pub fn filter(&self) -> Filter<'static> {
        Filter {
            year: Some(self.year),
            month: self.month,
            folder: None,
        }
    }

    pub fn index_page(&self, kind: IndexKind) -> IndexPage<'_> {
        IndexPage {
            kind,
            filter: self.filter(),
            location: "",
            period: Some(Period {
                slug: &self.slug,
                label: &self.label,
            }),
        }
    }
}

/// Indices written per period. The attachment index has no period pages.
pub fn summary_kinds(config: &RenderConfig) -> Vec<IndexKind> {
    config
        .indices
        .enabled()
        .into_iter()
        .filter(|kind| *kind != IndexKind::Attachment)
        .collect()
}

/// Every period between the first and last live message, empty ones
/// included, oldest first. Empty when no summary is configured.
pub fn periods(archive: &Archive, config: &RenderConfig) -> Vec<PeriodStats> {
    let Some((first_year, last_year)) = archive.year_range() else {
        return Vec::new();
    };
    let months: Vec<Option<u32>> = match config.indices.summary {
        SummaryPeriod::None => return Vec::new(),
        SummaryPeriod::Monthly => (1..=12).map(Some).collect(),
        SummaryPeriod::Yearly => vec![None],
    };
    let mut out = Vec::new();
    for year in first_year..=last_year {
        for month in &months {
            let (slug, label) = match month {
                Some(m) => (format!("{year}{m:02}"), dates::month_label(year, *m)),
                None => (year.to_string(), year.to_string()),
            };
            let mut stats = PeriodStats {
                slug,
                label,
                year,
                month: *month,
                count: 0,
            };
            stats.count = archive.live_count(&stats.filter());
            out.push(stats);
        }
    }
    out
}

/// The `summary.html` table.
pub fn render_summary(archive: &Archive, config: &RenderConfig, periods: &[PeriodStats]) -> String {
    let kinds = summary_kinds(config);
    let title = format!("{}: {}", config.label, labels::SUMMARY_CAPTION);
    let last_date = archive.date_range(&Filter::default()).map(|(_, last)| last);
    let content = html! {
        header.head {
            h1 { (title) }
        }
        main.summary {
            table.summary {
                caption { (labels::SUMMARY_CAPTION) }
                thead {
                    tr {
                        th { (labels::PERIOD) }
                        th { (labels::MESSAGES) }
                        th colspan=(kinds.len()) { (labels::SORT_BY) }
                    }
                }
                tbody {
                    @for period in periods.iter().filter(|p| p.count > 0) {
                        tr {
                            td.cell_period { (period.label) }
                            td.cell_message { (period.count) " " (labels::MESSAGES) }
                            @for kind in &kinds {
                                td {
                                    a href=(period.index_page(*kind).file_name(*kind, config)) {
                                        (labels::index_title(*kind))
                                    }
                                }
                            }
                        }
                    }
                }
            }
            (index::last_stats(last_date, config))
        }
        footer.foot {
            (page::footer_html(config))
        }
    };
    page::base_document(&title, config, "summary", content).into_string()
}

// =============================================================================
// Folders index
// =============================================================================

fn period_name(first: Option<i64>, last: Option<i64>, config: &RenderConfig) -> String {
    let format = &config.dates.period;
    match (first, last) {
        (Some(first), Some(last)) => {
            let start = dates::format(first, format);
            let end = dates::format(last, format);
            if start == end {
                start
            } else {
                format!("{start}{}{end}", labels::PERIOD_TO)
            }
        }
        _ => String::new(),
    }
}

/// Top-level `index.html` listing every folder.
pub fn render_folders_index(archive: &Archive, config: &RenderConfig) -> String {
    let default = config.indices.default;
    let others: Vec<IndexKind> = config
        .indices
        .enabled()
        .into_iter()
        .filter(|kind| *kind != default)
        .collect();
    let mut folders: Vec<_> = archive.folders().iter().collect();
    if config.indices.reverse_folders {
        folders.reverse();
    }
    let count = archive.live_count(&Filter::default());
    let range = archive.date_range(&Filter::default());
    let title = format!("{}: {}", config.label, labels::FOLDERS_TITLE);

    let link = |folder: &str, kind: IndexKind, text: Markup, live: bool| -> Markup {
        html! {
            @if live {
                a href=(format!("{folder}{}", kind.file_name(default))) { (text) }
            } @else {
                (text)
            }
        }
    };

    let content = html! {
        header.head {
            @if let Some(upper) = &config.page.header_html {
                nav.breadcrumb id="upper" { (maud::PreEscaped(upper)) }
            }
            h1 { (title) }
            nav id="navbar" {
                ul.hmenu_container {
                    li {
                        span.heading { a href="#first" { (count) " " (labels::MESSAGES) } }
                        @if let Some((first, last)) = range {
                            ": "
                            span.heading { (labels::STARTING) } " " (dates::format(first, &config.dates.format)) ", "
                            span.heading { (labels::ENDING) } " " (dates::format(last, &config.dates.format))
                        }
                    }
                    (page::new_message_action(config))
                    (page::summary_link(config))
                    (page::nearby_links(config))
                }
            }
        }
        main.folders {
            table.folders {
                thead {
                    tr {
                        th { (labels::PERIOD) }
                        @if !others.is_empty() {
                            th colspan=(others.len()) { (labels::SORT_BY) }
                        }
                        th.count { (labels::MESSAGES) }
                    }
                }
                tbody {
                    @for (i, folder) in folders.iter().enumerate() {
                        @let live = folder.count > 0;
                        tr class=[(i == 0).then_some("first")] {
                            td.period id=[(i == 0).then_some("first")] {
                                (link(&folder.name, default, html! { (period_name(folder.first_date, folder.last_date, config)) }, live))
                            }
                            @for kind in &others {
                                td { (link(&folder.name, *kind, html! { (labels::index_title(*kind)) }, live)) }
                            }
                            td.count { (folder.count) }
                        }
                    }
                }
            }
            (index::last_stats(range.map(|(_, last)| last), config))
        }
        footer.foot {
            (page::footer_html(config))
        }
    };
    page::base_document(&title, config, "folders", content).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::DeletionState;

    // 2024-05-06, 2024-06-05 and 2025-01-01
    const MAY: i64 = 1_714_979_289;
    const JUNE: i64 = MAY + 30 * 86_400;
    const JAN25: i64 = 1_735_689_600;

    fn foldered() -> Archive {
        let mut records = vec![
            email(0, "Ann", "Plans", MAY),
            email(1, "Bob", "Re: Plans", MAY + 3600),
            email(2, "Cy", "Budget", JUNE),
        ];
        records[0].folder = Some("2024/05/".into());
        records[1].folder = Some("2024/05/".into());
        records[2].folder = Some("2024/06/".into());
        archive_of(records, vec![reply(0, 1, false)])
    }

    #[test]
    fn monthly_periods_cover_the_year_range() {
        let archive = archive_of(
            vec![email(0, "Ann", "a", MAY), email(1, "Bob", "b", JUNE), email(2, "Cy", "c", JAN25)],
            vec![],
        );
        let mut config = RenderConfig::default();
        config.indices.summary = SummaryPeriod::Monthly;
        let periods = periods(&archive, &config);
        assert_eq!(periods.len(), 24);
        let may = periods.iter().find(|p| p.slug == "202405").unwrap();
        assert_eq!((may.label.as_str(), may.count), ("May 2024", 1));
        assert_eq!(periods.iter().filter(|p| p.count > 0).count(), 3);
    }

    #[test]
    fn yearly_periods_and_no_summary() {
        let archive = archive_of(vec![email(0, "Ann", "a", MAY), email(1, "Bob", "b", JAN25)], vec![]);
        let mut config = RenderConfig::default();
        assert!(periods(&archive, &config).is_empty());
        config.indices.summary = SummaryPeriod::Yearly;
        let slugs: Vec<String> = periods(&archive, &config).into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, vec!["2024", "2025"]);
    }

    #[test]
    fn summary_lists_only_non_empty_periods() {
        let archive = archive_of(vec![email(0, "Ann", "a", MAY), email(1, "Bob", "b", JUNE)], vec![]);
        let mut config = RenderConfig::default();
        config.indices.summary = SummaryPeriod::Monthly;
        config.indices.attachment = true;
        let periods = periods(&archive, &config);
        let out = render_summary(&archive, &config, &periods);
        assert!(out.contains("<td class=\"cell_period\">May 2024</td><td class=\"cell_message\">1 messages</td>"));
        assert!(out.contains("<a href=\"202405bydate.html\">By date</a>"));
        assert!(out.contains("<a href=\"202406byauthor.html\">By author</a>"));
        assert!(!out.contains("202407"));
        assert!(!out.contains("byattachment"));
    }

    #[test]
    fn period_pages_filter_by_month() {
        let archive = archive_of(vec![email(0, "Ann", "a", MAY), email(1, "Bob", "b", JUNE)], vec![]);
        let mut config = RenderConfig::default();
        config.indices.summary = SummaryPeriod::Monthly;
        let periods = periods(&archive, &config);
        let june = periods.iter().find(|p| p.slug == "202406").unwrap();
        let tmp = tempfile::TempDir::new().unwrap();
        let out = index::render_index(&june.index_page(IndexKind::Date), &archive, &config, tmp.path());
        assert!(out.contains("id=\"msg1\""));
        assert!(!out.contains("id=\"msg0\""));
    }

    #[test]
    fn folders_index_links_each_folder() {
        let archive = foldered();
        let out = render_folders_index(&archive, &RenderConfig::default());
        assert_in_order(
            &out,
            &[
                "<tr class=\"first\"><td class=\"period\" id=\"first\"><a href=\"2024/05/index.html\">06 May 2024</a></td>",
                "<a href=\"2024/05/date.html\">By date</a>",
                "<td class=\"count\">2</td>",
                "<a href=\"2024/06/index.html\">05 Jun 2024</a>",
            ],
        );
    }

    #[test]
    fn folders_can_be_reversed() {
        let archive = foldered();
        let mut config = RenderConfig::default();
        config.indices.reverse_folders = true;
        let out = render_folders_index(&archive, &config);
        assert_in_order(&out, &["2024/06/index.html", "2024/05/index.html"]);
    }

    #[test]
    fn empty_folder_is_not_linked() {
        let mut records = vec![email(0, "Ann", "Plans", MAY), email(1, "Bob", "b", JUNE)];
        records[0].folder = Some("2024/05/".into());
        records[1].folder = Some("2024/06/".into());
        records[1].deleted = DeletionState::Deleted;
        let archive = archive_of(records, vec![]);
        let out = render_folders_index(&archive, &RenderConfig::default());
        assert!(out.contains("2024/05/index.html"));
        assert!(!out.contains("2024/06/"));
        assert!(out.contains("<td class=\"count\">0</td>"));
    }

    #[test]
    fn folders_index_without_live_messages_has_no_date_range() {
        let mut records = vec![email(0, "Ann", "Plans", MAY)];
        records[0].folder = Some("2024/05/".into());
        records[0].deleted = DeletionState::Expired;
        let archive = archive_of(records, vec![]);
        let out = render_folders_index(&archive, &RenderConfig::default());
        assert!(out.contains("0 messages</a></span></li>"));
        assert!(!out.contains(labels::STARTING));
        assert!(!out.contains("1970"));
    }

    #[test]
    fn period_spanning_days() {
        let config = RenderConfig::default();
        assert_eq!(period_name(Some(MAY), Some(MAY + 60), &config), "06 May 2024");
        assert_eq!(period_name(Some(MAY), Some(JUNE), &config), "06 May 2024 to 05 Jun 2024");
        assert_eq!(period_name(None, None, &config), "");
    }
}
