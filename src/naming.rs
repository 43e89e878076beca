//! File names and relative links.
//!
//! Every message lives at `{folder}NNNN.html`, where `NNNN` is the message
//! number zero-padded to four digits and `folder` is either empty or a
//! date bucket such as `2024/05/`. Index pages sit next to the articles of
//! their folder, so links between an index and its articles are always
//! bare file names; only links that cross folders need a `../` prefix back
//! to the archive root.
//!
//! ```text
//! dist/
//! ├── index.html              # folders index (or the default index)
//! └── 2024/05/
//!     ├── index.html          # default index for the folder
//!     ├── date.html
//!     ├── subject.html
//!     ├── 0000.html
//!     └── att-0000/           # stored attachments of message 0
//! ```

use serde::{Deserialize, Serialize};

/// The index pages an archive can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Date,
    Thread,
    Subject,
    Author,
    Attachment,
}

impl IndexKind {
    pub const ALL: [IndexKind; 5] = [
        IndexKind::Date,
        IndexKind::Thread,
        IndexKind::Subject,
        IndexKind::Author,
        IndexKind::Attachment,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            IndexKind::Date => "date",
            IndexKind::Thread => "thread",
            IndexKind::Subject => "subject",
            IndexKind::Author => "author",
            IndexKind::Attachment => "attachment",
        }
    }

    /// File name of this index inside its folder.
    pub fn file_name(self, default: IndexKind) -> String {
        if self == default {
            "index.html".to_string()
        } else {
            format!("{}.html", self.slug())
        }
    }
}

/// Zero-padded message number: `42` → `"0042"`.
pub fn message_name(msgnum: u32) -> String {
    format!("{msgnum:04}")
}

pub fn article_file_name(msgnum: u32) -> String {
    format!("{}.html", message_name(msgnum))
}

/// Directory holding the stored attachments of a message.
pub fn attachment_dir_name(msgnum: u32) -> String {
    format!("att-{}", message_name(msgnum))
}

/// Path of an article relative to the archive root.
pub fn article_rel_path(folder: &str, msgnum: u32) -> String {
    format!("{folder}{}", article_file_name(msgnum))
}

/// `../` once per component of `folder` (`"2024/05/"` → `"../../"`).
pub fn rel_path_to_top(folder: &str) -> String {
    folder
        .split('/')
        .filter(|part| !part.is_empty())
        .map(|_| "../")
        .collect()
}

/// Link from a page in `from_folder` to a file in `to_folder`.
pub fn folder_href(from_folder: &str, to_folder: &str, file: &str) -> String {
    if from_folder == to_folder {
        file.to_string()
    } else {
        format!("{}{to_folder}{file}", rel_path_to_top(from_folder))
    }
}

/// Link from a page in `from_folder` to the article of `msgnum`.
pub fn article_href(from_folder: &str, to_folder: &str, msgnum: u32) -> String {
    folder_href(from_folder, to_folder, &article_file_name(msgnum))
}

/// Extract the message number from an article file name (`0042.html`).
pub fn parse_article_file_name(name: &str) -> Option<u32> {
    let stem = name.strip_suffix(".html")?;
    if stem.len() < 4 || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Summary index name for a period: `202405bydate.html`.
pub fn period_index_name(period: &str, kind: IndexKind) -> String {
    format!("{period}by{}.html", kind.slug())
}
