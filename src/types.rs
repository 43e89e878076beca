//! Input types handed over by the mailbox parser.
//!
//! The parser (an external collaborator) decodes mailboxes, resolves
//! threads and writes `archive.json`; everything here is deserialized from
//! that file and never mutated afterwards, except for the derived fields
//! [`EmailRecord::unre_subject`] and the folder list, which are filled in
//! when an [`Archive`](crate::archive::Archive) is built.

use serde::{Deserialize, Serialize};

/// Top-level shape of `archive.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveInput {
    pub messages: Vec<EmailRecord>,
    /// Reply links: `from` is the message being replied to.
    #[serde(default)]
    pub replies: Vec<Reply>,
    /// Pre-ordered thread list. Roots have level 0.
    #[serde(default)]
    pub threads: Vec<ThreadItem>,
    /// Folder names (`2024/05/`) in chronological order. Derived from the
    /// messages when empty.
    #[serde(default)]
    pub folders: Vec<String>,
}

/// One parsed message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecord {
    pub msgnum: u32,
    pub name: String,
    pub email: String,
    pub subject: String,
    /// Subject with reply prefixes removed; used for subject grouping.
    #[serde(default)]
    pub unre_subject: String,
    /// Sender date, unix seconds.
    pub date: i64,
    /// Date the archive received the message. Falls back to `date`.
    #[serde(default)]
    pub received: Option<i64>,
    #[serde(default)]
    pub date_str: String,
    #[serde(default)]
    pub received_str: String,
    pub msgid: String,
    #[serde(default)]
    pub in_reply_to: Option<String>,
    #[serde(default = "default_charset")]
    pub charset: String,
    #[serde(default)]
    pub deleted: DeletionState,
    /// An annotation marked the message as edited by a moderator.
    #[serde(default)]
    pub edited: bool,
    /// Expiry time, unix seconds.
    #[serde(default)]
    pub expires: Option<i64>,
    /// Output folder (`2024/05/`) when the archive is split by date.
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub body: Vec<BodyLine>,
}

fn default_charset() -> String {
    "UTF-8".to_string()
}

impl EmailRecord {
    pub fn is_deleted(&self) -> bool {
        self.deleted != DeletionState::None
    }

    pub fn received(&self) -> i64 {
        self.received.unwrap_or(self.date)
    }

    pub fn received_str(&self) -> &str {
        if self.received_str.is_empty() {
            &self.date_str
        } else {
            &self.received_str
        }
    }

    /// Subject used for grouping, derived from `subject` when the parser
    /// left it empty.
    pub fn grouping_subject(&self) -> String {
        if self.unre_subject.is_empty() {
            strip_reply_prefixes(&self.subject).to_string()
        } else {
            self.unre_subject.clone()
        }
    }

    pub fn folder(&self) -> &str {
        self.folder.as_deref().unwrap_or("")
    }
}

/// Remove any number of leading `Re:`, `Re[2]:` and `Aw:` markers.
pub fn strip_reply_prefixes(subject: &str) -> &str {
    let mut rest = subject.trim_start();
    loop {
        let lower = rest.get(..3).map(|p| p.to_ascii_lowercase());
        let after = match lower.as_deref() {
            Some("re:") | Some("aw:") => &rest[3..],
            Some("re[") => match rest[3..].find("]:") {
                Some(end) if rest[3..3 + end].chars().all(|c| c.is_ascii_digit()) => {
                    &rest[3 + end + 2..]
                }
                _ => return rest,
            },
            _ => return rest,
        };
        rest = after.trim_start();
    }
}

/// Why a message is hidden from the archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionState {
    #[default]
    None,
    /// Removed by a moderator (usually spam).
    Deleted,
    /// Past its expiry date.
    Expired,
    /// Dropped by a content filter.
    Filtered,
    /// Removed for a reason other than spam.
    DeletedOther,
}

impl DeletionState {
    /// Numeric code written to the `isdeleted` page comment and the store.
    pub fn code(self) -> u8 {
        match self {
            DeletionState::None => 0,
            DeletionState::Deleted => 1,
            DeletionState::Expired => 2,
            DeletionState::Filtered => 4,
            DeletionState::DeletedOther => 64,
        }
    }
}

/// How far deletion goes. Ordered from most to least destructive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteLevel {
    /// Remove the article page entirely.
    RemovesFiles,
    /// Keep the page, replace the body with a placeholder.
    RemovesText,
    /// Like `RemovesText`, but expired messages keep their text.
    LeavesExpiredText,
    /// Deleted messages keep their text; only indexes hide them.
    LeavesText,
}

impl DeleteLevel {
    pub fn code(self) -> u8 {
        match self {
            DeleteLevel::RemovesFiles => 0,
            DeleteLevel::RemovesText => 1,
            DeleteLevel::LeavesExpiredText => 2,
            DeleteLevel::LeavesText => 3,
        }
    }

    /// Whether a message in this state loses its body at this level.
    pub fn removes_body(self, state: DeletionState) -> bool {
        match state {
            DeletionState::None => false,
            _ if self == DeleteLevel::LeavesText => false,
            DeletionState::Expired => self != DeleteLevel::LeavesExpiredText,
            _ => true,
        }
    }
}

/// A single tagged body line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyLine {
    /// A header line (`Name: value`) of the message or of a forwarded part.
    Header { text: String },
    Text { text: String },
    Quote { text: String },
    /// Pre-rendered HTML. `attachment_link` marks lines listing stored
    /// attachments.
    Html {
        text: String,
        #[serde(default)]
        attachment_link: bool,
    },
    AttachmentStart {
        #[serde(default)]
        rfc822: bool,
    },
    AttachmentEnd {
        #[serde(default)]
        rfc822: bool,
    },
    AttachmentLinksStart,
    AttachmentLinksEnd,
}

impl BodyLine {
    pub fn text(&self) -> &str {
        match self {
            BodyLine::Header { text }
            | BodyLine::Text { text }
            | BodyLine::Quote { text }
            | BodyLine::Html { text, .. } => text,
            _ => "",
        }
    }
}

/// Link between a message and one of its replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// The message being replied to.
    pub from: u32,
    /// The reply.
    pub msgnum: u32,
    /// Linked by subject rather than by an `In-Reply-To` header.
    #[serde(default)]
    pub maybe_reply: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadItem {
    pub msgnum: u32,
    pub level: u32,
}
