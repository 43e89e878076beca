//! Machine-readable overviews of the archive.
//!
//! Two optional files sit next to the indices:
//!
//! - `archive_overview.haof`: an XML listing of the enabled indices and of
//!   every live message in date order.
//! - `msgindex.txt`: message number to article path, one per line, after a
//!   `FIRST LAST` header line.
//!
//! ```text
//! 0000 0002
//! 0000 2024/05/0000.html
//! 0001 2024/05/0001.html
//! 0002 2024/06/0002.html
//! ```

use crate::archive::{Archive, Filter, SortOrder};
use crate::config::RenderConfig;
use crate::naming::{self, IndexKind};
use maud::{Markup, PreEscaped, html};
use std::fmt::Write;

pub const HAOF_FILE: &str = "archive_overview.haof";
pub const MSGINDEX_FILE: &str = "msgindex.txt";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const HAOF_DOCTYPE: &str = "<!DOCTYPE haof PUBLIC \"-//Bernhard Reiter//DTD HOAF 0.2//EN\" \
                            \"http://ffii.org/~breiter/probe/haof-0.2.dtd\">\n";

fn index_entry(kind: IndexKind, file: String) -> Markup {
    html! {
        @match kind {
            IndexKind::Date => { dateindex { (file) } }
            IndexKind::Thread => { threadindex { (file) } }
            IndexKind::Subject => { subjectindex { (file) } }
            IndexKind::Author => { authorindex { (file) } }
            IndexKind::Attachment => { attachmentindex { (file) } }
        }
        "\n"
    }
}

/// HAOF document for the messages matching `filter`, written in `location`
/// (`""` for the archive root or a folder such as `2024/05/`).
pub fn render_haof(archive: &Archive, config: &RenderConfig, filter: &Filter, location: &str) -> String {
    let default = config.indices.default;
    let document = html! {
        (PreEscaped(XML_DECLARATION))
        (PreEscaped(HAOF_DOCTYPE))
        haof version="0.2" {
            "\n"
            archiver name=(env!("CARGO_PKG_NAME")) version=(env!("CARGO_PKG_VERSION")) {}
            "\n"
            title { (config.label) }
            "\n"
            indices {
                "\n"
                @for kind in config.indices.enabled() {
                    (index_entry(kind, kind.file_name(default)))
                }
            }
            "\n"
            mails {
                "\n"
                @for email in archive.sorted(SortOrder::Date, filter) {
                    mail {
                        "\n"
                        subject { (email.subject) } "\n"
                        date { (email.date_str) } "\n"
                        fromname { (email.name) } "\n"
                        fromemail { (email.email) } "\n"
                        message-id { (email.msgid) } "\n"
                        file {
                            (naming::folder_href(location, email.folder(), &naming::article_file_name(email.msgnum)))
                        }
                        "\n"
                    }
                    "\n"
                }
            }
            "\n"
        }
        "\n"
    };
    document.into_string()
}

/// Message number to article path for every record, deleted ones included.
/// `None` for an empty archive.
pub fn render_msgindex(archive: &Archive) -> Option<String> {
    let first = archive.first_msgnum()?;
    let last = archive.max_msgnum()?;
    let mut out = format!("{} {}\n", naming::message_name(first), naming::message_name(last));
    for email in archive.messages() {
        let _ = writeln!(
            out,
            "{} {}",
            naming::message_name(email.msgnum),
            naming::article_rel_path(email.folder(), email.msgnum)
        );
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::DeletionState;

    fn sample() -> Archive {
        let mut records = vec![
            email(0, "Ann", "Plans & <goals>", 300),
            email(1, "Bob", "Re: Plans", 100),
            email(2, "Cy", "Gone", 200),
        ];
        records[2].deleted = DeletionState::Deleted;
        archive_of(records, vec![reply(0, 1, false)])
    }

    #[test]
    fn haof_lists_enabled_indices() {
        let out = render_haof(&sample(), &RenderConfig::default(), &Filter::default(), "");
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE haof"));
        assert_in_order(
            &out,
            &[
                "<dateindex>date.html</dateindex>",
                "<threadindex>index.html</threadindex>",
                "<subjectindex>subject.html</subjectindex>",
                "<authorindex>author.html</authorindex>",
                "</indices>",
            ],
        );
        assert!(!out.contains("attachmentindex"));
    }

    #[test]
    fn haof_mails_in_date_order_without_deleted() {
        let out = render_haof(&sample(), &RenderConfig::default(), &Filter::default(), "");
        assert_in_order(&out, &["<file>0001.html</file>", "<file>0000.html</file>"]);
        assert!(!out.contains("0002.html"));
        assert!(out.contains("<subject>Plans &amp; &lt;goals&gt;</subject>"));
        assert!(out.contains("<fromemail>ann@example.org</fromemail>"));
        assert!(out.contains("<message-id>msg1@example.org</message-id>"));
        assert_eq!(count(&out, "<mail>"), 2);
    }

    #[test]
    fn haof_paths_are_relative_to_its_location() {
        let mut records = vec![email(0, "Ann", "a", 100), email(1, "Bob", "b", 200)];
        records[0].folder = Some("2024/05/".into());
        records[1].folder = Some("2024/06/".into());
        let archive = archive_of(records, vec![]);
        let config = RenderConfig::default();

        let top = render_haof(&archive, &config, &Filter::default(), "");
        assert!(top.contains("<file>2024/05/0000.html</file>"));

        let folder = render_haof(&archive, &config, &Filter::folder("2024/06/"), "2024/06/");
        assert!(folder.contains("<file>0001.html</file>"));
        assert!(!folder.contains("0000.html"));
    }

    #[test]
    fn haof_is_one_element_per_line() {
        let out = render_haof(&sample(), &RenderConfig::default(), &Filter::default(), "");
        assert!(out.contains("<archiver name=\"mailarc\" version=\""));
        assert!(out.contains("\n<mail>\n<subject>Re: Plans</subject>\n<date>date 100</date>\n"));
        assert!(out.ends_with("</mails>\n</haof>\n"));
    }

    #[test]
    fn msgindex_covers_every_record() {
        let mut records = vec![email(3, "Ann", "a", 100), email(12, "Bob", "b", 200)];
        records[1].folder = Some("2024/05/".into());
        records[1].deleted = DeletionState::Expired;
        let out = render_msgindex(&archive_of(records, vec![])).unwrap();
        assert_eq!(out, "0003 0012\n0003 0003.html\n0012 2024/05/0012.html\n");
    }

    #[test]
    fn msgindex_of_empty_archive() {
        assert_eq!(render_msgindex(&archive_of(vec![], vec![])), None);
    }
}
