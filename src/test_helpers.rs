//! Shared test utilities for the mailarc test suite.
//!
//! Builders for records and archives so unit tests can describe a small
//! mailing list in a few lines:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let archive = archive_of(
//!     vec![email(0, "Ann", "Plans", 100), email(1, "Bob", "Re: Plans", 200)],
//!     vec![reply(0, 1, false)],
//! );
//! ```

use crate::archive::Archive;
use crate::types::{ArchiveInput, BodyLine, DeletionState, EmailRecord, Reply};

// =========================================================================
// Record builders
// =========================================================================

/// A live message with a one-line body. The message-id is
/// `msg{num}@example.org` and the address is derived from the name.
pub fn email(msgnum: u32, name: &str, subject: &str, date: i64) -> EmailRecord {
    EmailRecord {
        msgnum,
        name: name.to_string(),
        email: format!("{}@example.org", name.to_lowercase()),
        subject: subject.to_string(),
        unre_subject: String::new(),
        date,
        received: None,
        date_str: format!("date {date}"),
        received_str: String::new(),
        msgid: format!("msg{msgnum}@example.org"),
        in_reply_to: None,
        charset: "UTF-8".to_string(),
        deleted: DeletionState::None,
        edited: false,
        expires: None,
        folder: None,
        body: vec![text(&format!("Body of message {msgnum}."))],
    }
}

pub fn reply(from: u32, msgnum: u32, maybe_reply: bool) -> Reply {
    Reply {
        from,
        msgnum,
        maybe_reply,
    }
}

pub fn archive_of(messages: Vec<EmailRecord>, replies: Vec<Reply>) -> Archive {
    Archive::new(ArchiveInput {
        messages,
        replies,
        threads: Vec::new(),
        folders: Vec::new(),
    })
}

// =========================================================================
// Body line shorthands
// =========================================================================

pub fn header(text: &str) -> BodyLine {
    BodyLine::Header {
        text: text.to_string(),
    }
}

pub fn text(text: &str) -> BodyLine {
    BodyLine::Text {
        text: text.to_string(),
    }
}

pub fn quote(text: &str) -> BodyLine {
    BodyLine::Quote {
        text: text.to_string(),
    }
}

pub fn html_line(text: &str) -> BodyLine {
    BodyLine::Html {
        text: text.to_string(),
        attachment_link: false,
    }
}

// =========================================================================
// Assertions
// =========================================================================

/// Number of non-overlapping occurrences of `needle` in `haystack`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Assert that `needles` appear in `haystack` in the given order.
pub fn assert_in_order(haystack: &str, needles: &[&str]) {
    let mut pos = 0;
    for needle in needles {
        match haystack[pos..].find(needle) {
            Some(found) => pos += found + needle.len(),
            None => panic!("'{needle}' not found after byte {pos} in:\n{haystack}"),
        }
    }
}
