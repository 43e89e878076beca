//! Article pages.
//!
//! One page per message, laid out top to bottom as:
//!
//! ```text
//! <header>   breadcrumb, subject, metadata comments, navigation, index menu
//! <main>     From / Date / extra headers, body, "Received on"
//! <footer>   neighbours and replies by name, index menu, text link, footer HTML
//! ```
//!
//! The metadata comments (`<!-- name="value" -->`) record the message
//! fields in the page itself so that other tools can read them back
//! without the archive input.

use crate::archive::Archive;
use crate::body;
use crate::config::{LinkPlacement, MailLinks, RenderConfig};
use crate::dates;
use crate::labels;
use crate::linkify::{self, LinkContext};
use crate::naming::{self, IndexKind};
use crate::page;
use crate::types::EmailRecord;
use maud::{Markup, PreEscaped, html};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Bottom,
}

impl Side {
    fn menu_id(self) -> &'static str {
        match self {
            Side::Top => "options2",
            Side::Bottom => "options3",
        }
    }
}

/// Render the complete article page of `email`.
pub fn render_article(email: &EmailRecord, archive: &Archive, config: &RenderConfig) -> String {
    let removed = config.deletion.level.removes_body(email.deleted);
    let folder = email.folder();
    let subject = display_subject(email);
    let heading = if removed { labels::SUBJECT_DELETED } else { subject };
    let ctx = LinkContext {
        archive,
        config,
        folder,
        msgid: &email.msgid,
        subject: &email.subject,
    };
    let parent_href = archive
        .parent(email)
        .map(|(parent, _)| naming::article_href(folder, parent.folder(), parent.msgnum));

    let content = html! {
        header.head {
            @if let Some(upper) = &config.page.header_html {
                nav.breadcrumb id="upper" { (PreEscaped(upper)) }
            }
            h1 { (heading) }
            (metadata_comments(email, config, removed))
            @if config.article.msg_links.top() {
                (top_links(email, archive, config))
            }
            @if config.article.index_links.top() {
                (index_menu(email, config, Side::Top))
            }
        }
        (PreEscaped("<!-- body=\"start\" -->\n"))
        main.mail {
            (header_list(email, config, removed))
            (PreEscaped(body::render_body(email, &ctx, parent_href.as_deref())))
            p.received {
                span.heading { (labels::RECEIVED_ON) } " " (received_date(email, config))
            }
        }
        (PreEscaped("<!-- body=\"end\" -->\n"))
        footer.foot {
            nav id="navbarfoot" {
                @if config.article.msg_links.bottom() {
                    (bottom_links(email, archive, config))
                }
                @if config.article.index_links.bottom() {
                    (index_menu(email, config, Side::Bottom))
                }
            }
            @if let Some(suffix) = &config.article.txt_suffix {
                p {
                    a rel="nofollow" href=(format!("{}.{suffix}", naming::message_name(email.msgnum))) {
                        (labels::ORIGINAL_TEXT)
                    }
                }
            }
            (page::footer_html(config))
        }
    };

    let title = format!("{}: {}", config.label, heading);
    page::base_document(&title, config, "mail", content).into_string()
}

fn display_subject(email: &EmailRecord) -> &str {
    if email.subject.trim().is_empty() {
        labels::NO_SUBJECT
    } else {
        &email.subject
    }
}

fn display_name(email: &EmailRecord) -> &str {
    if email.name.trim().is_empty() {
        &email.email
    } else {
        &email.name
    }
}

fn received_date(email: &EmailRecord, config: &RenderConfig) -> String {
    let formatted = dates::format(email.received(), &config.dates.format);
    if formatted.is_empty() {
        email.received_str().to_string()
    } else {
        formatted
    }
}

fn sent_date(email: &EmailRecord, config: &RenderConfig) -> String {
    if email.date_str.is_empty() {
        dates::format(email.date, &config.dates.format)
    } else {
        email.date_str.clone()
    }
}

// =============================================================================
// Metadata comments
// =============================================================================

const COMMENT_OPEN: &str = "<!-- ";
const COMMENT_CLOSE: &str = " -->\n";

/// One `<!-- label="value" -->` line. Empty values print nothing.
///
/// The value is written as is: inside a comment only `--` needs
/// neutralising.
pub fn comment(label: &str, value: &str, config: &RenderConfig) -> Markup {
    if value.is_empty() {
        return html! {};
    }
    let mut value = if value.contains("--") {
        value.replace('-', "&#45;")
    } else {
        value.to_string()
    };
    if config.mail.spamprotect_id && (label == "id" || label == "inreplyto") {
        value = value.replacen('@', &config.mail.antispam_at, 1);
    }
    html! {
        (PreEscaped(COMMENT_OPEN)) (label) (PreEscaped("=\""))
        (PreEscaped(value))
        (PreEscaped("\"")) (PreEscaped(COMMENT_CLOSE))
    }
}

fn metadata_comments(email: &EmailRecord, config: &RenderConfig, removed: bool) -> Markup {
    let address = match config.mail.links {
        MailLinks::Obfuscate => linkify::obfuscate(&email.email, &config.mail.antispam_at),
        _ => email.email.clone(),
    };
    let mut fields: Vec<(&str, String)> = vec![
        ("received", email.received_str().to_string()),
        ("isoreceived", dates::iso(email.received())),
        ("sent", email.date_str.clone()),
        ("isosent", dates::iso(email.date)),
    ];
    if !removed {
        fields.push(("name", email.name.clone()));
        fields.push(("email", address));
        fields.push(("subject", email.subject.clone()));
    }
    fields.push(("id", email.msgid.clone()));
    fields.push(("charset", email.charset.clone()));
    fields.push(("inreplyto", email.in_reply_to.clone().unwrap_or_default()));
    if email.is_deleted() {
        fields.push(("isdeleted", email.deleted.code().to_string()));
    }
    if let Some(expires) = email.expires {
        fields.push(("expires", dates::iso(expires)));
    }
    html! {
        @for (label, value) in &fields {
            (comment(label, value, config))
        }
    }
}

// =============================================================================
// Navigation
// =============================================================================

fn reply_command(email: &EmailRecord, config: &RenderConfig) -> Option<String> {
    let list = config.mail.list_address.as_deref()?;
    if email.msgid.is_empty() && email.subject.is_empty() {
        return None;
    }
    Some(linkify::mail_command(
        &config.mail.command,
        list,
        &email.msgid,
        &email.subject,
    ))
}

fn more_options(placement: LinkPlacement) -> Markup {
    html! {
        @match placement {
            LinkPlacement::Off => {}
            LinkPlacement::Both => {
                li {
                    (labels::MORE_OPTIONS) " ("
                    a href="#options2" { "top" } ", "
                    a href="#options3" { "bottom" } ")"
                }
            }
            LinkPlacement::Top => { li { a href="#options2" { (labels::MORE_OPTIONS) } } }
            LinkPlacement::Bottom => { li { a href="#options3" { (labels::MORE_OPTIONS) } } }
        }
    }
}

/// Compact navigation bar above the message.
fn top_links(email: &EmailRecord, archive: &Archive, config: &RenderConfig) -> Markup {
    let folder = email.folder();
    let href = |target: &EmailRecord| naming::article_href(folder, target.folder(), target.msgnum);
    let parent = archive.parent(email);
    let show_replies_link = config.article.show_replies
        && config.article.msg_links.bottom()
        && !archive.replies(email.msgnum).is_empty();

    html! {
        nav id="navbar" {
            ul class="links hmenu_container" {
                li {
                    span.heading { (labels::THIS_MESSAGE) } ": "
                    ul.hmenu {
                        li { a href="#start" id="options1" { (labels::MESSAGE_BODY) } }
                        @if let Some(command) = reply_command(email, config) {
                            li { a href=(command) { (labels::RESPOND) } }
                        }
                        (more_options(config.article.index_links))
                    }
                }
                li {
                    span.heading { (labels::RELATED_MESSAGES) } ": "
                    ul.hmenu {
                        @if let Some(next) = archive.next_message(email.msgnum) {
                            li { a href=(href(next)) { (labels::NEXT_MESSAGE) } }
                        }
                        @if let Some(previous) = archive.previous_message(email.msgnum) {
                            li { a href=(href(previous)) { (labels::PREVIOUS_MESSAGE) } }
                        }
                        @if let Some((parent, maybe)) = parent {
                            li {
                                a href=(href(parent)) {
                                    (if maybe { labels::MAYBE_IN_REPLY_TO } else { labels::IN_REPLY_TO })
                                }
                            }
                        } @else if let Some(resolver) = resolver_href(email, config) {
                            li { a href=(resolver) { (labels::IN_REPLY_TO) } }
                        }
                        @if let Some(next) = archive.next_in_thread(email.msgnum, true) {
                            li { a href=(href(next)) { (labels::NEXT_IN_THREAD) } }
                        }
                        @if show_replies_link {
                            li { a href="#replies" { (labels::REPLIES) } }
                        }
                    }
                }
            }
        }
    }
}

/// Resolver link for a parent that is not in the archive.
fn resolver_href(email: &EmailRecord, config: &RenderConfig) -> Option<String> {
    let id = email.in_reply_to.as_deref().filter(|id| !id.is_empty())?;
    let template = config.article.inreplyto_command.as_deref()?;
    Some(linkify::id_command(template, id))
}

/// `Name: "subject"` link text.
fn name_and_subject(email: &EmailRecord) -> String {
    format!("{}: \"{}\"", display_name(email), display_subject(email))
}

fn related_item(heading: &str, href: &str, target: &EmailRecord) -> Markup {
    html! {
        li {
            span.heading { (heading) } ": "
            @if target.is_deleted() {
                a href=(href) class="deleted-message-link" { (labels::DELETED_SHORT) }
            } @else {
                a href=(href) { (name_and_subject(target)) }
            }
        }
    }
}

/// Verbose navigation below the message, naming every neighbour.
fn bottom_links(email: &EmailRecord, archive: &Archive, config: &RenderConfig) -> Markup {
    let folder = email.folder();
    let href = |target: &EmailRecord| naming::article_href(folder, target.folder(), target.msgnum);
    let replies = if config.article.show_replies {
        archive.replies(email.msgnum)
    } else {
        Vec::new()
    };

    html! {
        ul class="links hmenu_container" {
            li {
                span.heading { (labels::THIS_MESSAGE) } ": "
                span.message_body { a href="#start" { (labels::MESSAGE_BODY) } }
            }
            @if let Some(next) = archive.next_message(email.msgnum) {
                (related_item(labels::NEXT_MESSAGE, &href(next), next))
            }
            @if let Some(previous) = archive.previous_message(email.msgnum) {
                (related_item(labels::PREVIOUS_MESSAGE, &href(previous), previous))
            }
            @if let Some((parent, maybe)) = archive.parent(email) {
                @let heading = if maybe { labels::MAYBE_IN_REPLY_TO } else { labels::IN_REPLY_TO };
                (related_item(heading, &href(parent), parent))
            } @else if let Some(resolver) = resolver_href(email, config) {
                li {
                    span.heading { (labels::IN_REPLY_TO) } ": "
                    a href=(resolver) { (labels::UNKNOWN_IN_REPLY_TO) }
                }
            }
            @if let Some(next) = archive.next_in_thread(email.msgnum, false) {
                (related_item(labels::NEXT_IN_THREAD, &href(next), next))
            }
            @for (i, (reply, maybe)) in replies.iter().enumerate() {
                li id=[(i == 0).then_some("replies")] {
                    span.heading { (if *maybe { labels::MAYBE_REPLY } else { labels::REPLY }) } ": "
                    a href=(href(reply)) { (name_and_subject(reply)) }
                }
            }
        }
    }
}

/// Mail actions and links to this message's entry in every index.
fn index_menu(email: &EmailRecord, config: &RenderConfig, side: Side) -> Markup {
    let actions = config.mail.list_address.as_deref().map(|list| {
        (
            reply_command(email, config),
            linkify::mail_command("mailto:$TO", list, "", ""),
        )
    });
    let prefix = &config.indices.fragment_prefix;
    let default = config.indices.default;

    html! {
        ul class="links hmenu_container" {
            @if let Some((reply, new_message)) = &actions {
                li id=(side.menu_id()) {
                    span.heading { (labels::MAIL_ACTIONS) } ": "
                    ul.hmenu {
                        @if let Some(reply) = reply {
                            li { a href=(reply) { (labels::REPLY_ACTION) } }
                        }
                        li { a href=(new_message) { (labels::NEW_MESSAGE) } }
                    }
                }
            }
            li id=[actions.is_none().then_some(side.menu_id())] {
                span.heading { (labels::CONTEMPORARY_MESSAGES) } ": "
                ul.hmenu {
                    @for kind in config.indices.enabled() {
                        @let file = kind.file_name(default);
                        @let href = if kind == IndexKind::Attachment {
                            file
                        } else {
                            format!("{file}#{prefix}{}", email.msgnum)
                        };
                        li { a href=(href) { "by " (labels::index_name(kind)) } }
                    }
                }
            }
            (page::nearby_links(config))
        }
    }
}

// =============================================================================
// Headers
// =============================================================================

fn header_list(email: &EmailRecord, config: &RenderConfig, removed: bool) -> Markup {
    let extra = if removed {
        Vec::new()
    } else {
        body::wanted_headers(&email.body, &config.article.show_headers)
    };
    html! {
        ul.headers aria-label="message headers" {
            li {
                span.from {
                    span.heading { (labels::FROM) } ": "
                    @if removed {
                        (labels::SENDER_DELETED)
                    } @else {
                        (display_name(email)) " "
                        (sender_address(email, config))
                    }
                }
            }
            li {
                span.date {
                    span.heading { (labels::DATE) } ": " (sent_date(email, config))
                }
            }
            @for (name, value) in &extra {
                li {
                    span.heading { (name) } ": " (value)
                }
            }
        }
    }
}

fn sender_address(email: &EmailRecord, config: &RenderConfig) -> Markup {
    if email.email.is_empty() {
        return html! { "<" (labels::NO_EMAIL) ">" };
    }
    html! {
        "<"
        @match config.mail.links {
            MailLinks::Mailto => {
                a href=(linkify::mail_command(&config.mail.command, &email.email, &email.msgid, &email.subject)) {
                    (email.email)
                }
            }
            MailLinks::Obfuscate => { (linkify::obfuscate(&email.email, &config.mail.antispam_at)) }
            MailLinks::Off => { (email.email) }
        }
        ">"
    }
}
