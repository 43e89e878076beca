//! Text shown on generated pages.

use crate::naming::IndexKind;

pub const THIS_MESSAGE: &str = "This message";
pub const MESSAGE_BODY: &str = "Message body";
pub const RELATED_MESSAGES: &str = "Related messages";
pub const NEXT_MESSAGE: &str = "Next message";
pub const PREVIOUS_MESSAGE: &str = "Previous message";
pub const IN_REPLY_TO: &str = "In reply to";
pub const MAYBE_IN_REPLY_TO: &str = "Maybe in reply to";
pub const UNKNOWN_IN_REPLY_TO: &str = "Unknown message";
pub const NEXT_IN_THREAD: &str = "Next in thread";
pub const REPLIES: &str = "Replies";
pub const REPLY: &str = "Reply";
pub const MAYBE_REPLY: &str = "Maybe reply";
pub const MAIL_ACTIONS: &str = "Mail actions";
pub const RESPOND: &str = "respond to this message";
pub const REPLY_ACTION: &str = "reply to this message";
pub const NEW_MESSAGE: &str = "mail a new topic";
pub const CONTEMPORARY_MESSAGES: &str = "Contemporary messages sorted";
pub const SORT_BY: &str = "Sort by";
pub const MESSAGES: &str = "messages";
pub const STARTING: &str = "Starting";
pub const ENDING: &str = "Ending";
pub const THIS_PERIOD: &str = "This period";
pub const MOST_RECENT: &str = "Most recent messages";
pub const OTHER_PERIODS: &str = "Other periods";
pub const PREVIOUS_PERIOD: &str = "Previous period";
pub const NEXT_PERIOD: &str = "Next period";
pub const LIST_OF_FOLDERS: &str = "List of all periods";
pub const ABOUT_LIST: &str = "About this list";
pub const NEARBY: &str = "Nearby";
pub const MORE_OPTIONS: &str = "More options";
pub const OTHER_ARCHIVES: &str = "Other mail archives";
pub const LAST_MESSAGE_DATE: &str = "Last message date";
pub const RECEIVED_ON: &str = "Received on";
pub const FROM: &str = "From";
pub const DATE: &str = "Date";
pub const SUBJECT: &str = "Subject";
pub const NO_EMAIL: &str = "no email";
pub const SENDER_DELETED: &str = "<sender deleted>";
pub const SUBJECT_DELETED: &str = "Subject deleted";
pub const MESSAGE_DELETED: &str = "This message has been deleted from the archive.";
pub const MESSAGE_EXPIRED: &str = "This message has expired.";
pub const MESSAGE_FILTERED: &str = "This message has been filtered out of the archive.";
pub const MESSAGE_DELETED_OTHER: &str = "This message has been removed from the archive.";
pub const MESSAGE_EDITED: &str = "This message has been edited by the archive moderator.";
pub const FORWARDED_MESSAGE: &str = "Forwarded message";
pub const STORED_ATTACHMENTS: &str = "List of stored attachments";
pub const QUOTED_TEXT_OMITTED: &str = "Quoted text omitted";
pub const ORIGINAL_TEXT: &str = "Original text of this message";
pub const DELETED_SHORT: &str = "[message deleted]";
pub const EMPTY_ARCHIVE: &str = "This archive contains no messages.";
pub const NO_ATTACHMENTS: &str = "There are no attachments in this archive.";
pub const BYTES: &str = "bytes";
pub const PERIOD: &str = "Period";
pub const SUMMARY: &str = "Summary";
pub const BY_MONTH: &str = "by month";
pub const BY_YEAR: &str = "by year";
pub const PERIOD_TO: &str = " to ";
pub const FOLDERS_TITLE: &str = "Periods";
pub const SUMMARY_CAPTION: &str = "Messages by period";
pub const NO_SUBJECT: &str = "(no subject)";

/// Menu label: "date", "thread", ...
pub fn index_name(kind: IndexKind) -> &'static str {
    match kind {
        IndexKind::Date => "date",
        IndexKind::Thread => "thread",
        IndexKind::Subject => "subject",
        IndexKind::Author => "author",
        IndexKind::Attachment => "attachment",
    }
}

/// Page heading suffix: "By date", "By thread", ...
pub fn index_title(kind: IndexKind) -> &'static str {
    match kind {
        IndexKind::Date => "By date",
        IndexKind::Thread => "By thread",
        IndexKind::Subject => "By subject",
        IndexKind::Author => "By author",
        IndexKind::Attachment => "By messages with attachments",
    }
}
