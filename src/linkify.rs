//! Escaping and hyperlink detection for body lines.
//!
//! A line is scanned for three kinds of spans, in priority order:
//!
//! 1. `<message-id>` references to messages in the archive (when
//!    `article.link_message_ids` is on) become links to that article.
//! 2. URLs with a known scheme become links to themselves.
//! 3. Mail addresses become reply-command links or get their `@`
//!    replaced, according to `mail.links`. Addresses are left alone on
//!    lines that already carry a URL link, so `https://user@host/` style
//!    URLs are not split.
//!
//! Everything outside a span is HTML-escaped.

use crate::archive::Archive;
use crate::config::{MailLinks, RenderConfig};
use crate::naming;
use maud::html;
use regex::Regex;
use std::sync::OnceLock;

static URL_REGEX: OnceLock<Regex> = OnceLock::new();
static MSGID_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:https?|ftp|news|nntp|telnet|gopher)://[^\s<>"]+"#)
            .expect("Invalid URL regex")
    })
}

/// `<local@domain>` with the id captured without the brackets.
fn msgid_regex() -> &'static Regex {
    MSGID_REGEX.get_or_init(|| {
        Regex::new(r"<([^\s<>@]+@[^\s<>]+)>").expect("Invalid message-id regex")
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+=-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+")
            .expect("Invalid email regex")
    })
}

/// What a line is being rendered for.
pub struct LinkContext<'a> {
    pub archive: &'a Archive,
    pub config: &'a RenderConfig,
    /// Folder of the page being written.
    pub folder: &'a str,
    /// Message the line belongs to, substituted for `$ID`.
    pub msgid: &'a str,
    /// Subject substituted for `$SUBJECT`.
    pub subject: &'a str,
}

enum Span<'a> {
    Message { href: String, text: &'a str },
    Url(&'a str),
    Mail(&'a str),
}

/// HTML-escape plain text.
pub fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

/// Fill a reply command template. Values are URL-encoded.
pub fn mail_command(template: &str, to: &str, id: &str, subject: &str) -> String {
    template
        .replace("$TO", &urlencoding::encode(to))
        .replace("$ID", &urlencoding::encode(id))
        .replace("$SUBJECT", &urlencoding::encode(subject))
}

/// Substitute `$ID` in a URL template.
pub fn id_command(template: &str, id: &str) -> String {
    template.replace("$ID", &urlencoding::encode(id))
}

/// Address with '@' replaced by the anti-spam marker.
pub fn obfuscate(address: &str, antispam_at: &str) -> String {
    address.replace('@', antispam_at)
}

/// Trim sentence punctuation that is unlikely to belong to a URL.
fn trim_url(url: &str) -> &str {
    let mut url = url.trim_end_matches(['.', ',', ';', ':', '!', '?', '\'']);
    while url.ends_with(')') && url.matches('(').count() < url.matches(')').count() {
        url = &url[..url.len() - 1];
        url = url.trim_end_matches(['.', ',', ';', ':', '!', '?', '\'']);
    }
    url
}

/// Render one body line as escaped HTML with links.
pub fn convert_line(line: &str, ctx: &LinkContext) -> String {
    let mut spans: Vec<(usize, usize, Span)> = Vec::new();
    let overlaps = |spans: &[(usize, usize, Span)], start: usize, end: usize| {
        spans.iter().any(|(s, e, _)| start < *e && *s < end)
    };

    if ctx.config.article.link_message_ids {
        for cap in msgid_regex().captures_iter(line) {
            let Some(id) = cap.get(1) else { continue };
            if let Some(target) = ctx.archive.by_msgid(id.as_str())
                && !target.is_deleted()
            {
                let href = naming::article_href(ctx.folder, target.folder(), target.msgnum);
                spans.push((
                    id.start(),
                    id.end(),
                    Span::Message {
                        href,
                        text: id.as_str(),
                    },
                ));
            }
        }
    }

    let mut has_url = false;
    for found in url_regex().find_iter(line) {
        let url = trim_url(found.as_str());
        let end = found.start() + url.len();
        if url.contains("://") && !url.ends_with("://") && !overlaps(&spans, found.start(), end) {
            spans.push((found.start(), end, Span::Url(url)));
            has_url = true;
        }
    }

    if !has_url && ctx.config.mail.links != MailLinks::Off {
        for found in email_regex().find_iter(line) {
            if !overlaps(&spans, found.start(), found.end()) {
                spans.push((found.start(), found.end(), Span::Mail(found.as_str())));
            }
        }
    }

    spans.sort_by_key(|(start, _, _)| *start);
    let mut out = String::with_capacity(line.len() + 16);
    let mut pos = 0;
    for (start, end, span) in spans {
        out.push_str(&escape(&line[pos..start]));
        out.push_str(&render_span(&span, ctx));
        pos = end;
    }
    out.push_str(&escape(&line[pos..]));
    out
}

fn render_span(span: &Span, ctx: &LinkContext) -> String {
    match span {
        Span::Message { href, text } => html! { a href=(href) { (text) } }.into_string(),
        Span::Url(url) => html! { a href=(url) { (url) } }.into_string(),
        Span::Mail(address) => match ctx.config.mail.links {
            MailLinks::Mailto => {
                let command =
                    mail_command(&ctx.config.mail.command, address, ctx.msgid, ctx.subject);
                html! { a href=(command) { (address) } }.into_string()
            }
            MailLinks::Obfuscate => escape(&obfuscate(address, &ctx.config.mail.antispam_at)),
            MailLinks::Off => escape(address),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn convert(line: &str, config: &RenderConfig) -> String {
        let archive = archive_of(vec![email(5, "Ann", "Topic", 10)], vec![]);
        let ctx = LinkContext {
            archive: &archive,
            config,
            folder: "",
            msgid: "abc@example.org",
            subject: "Re: Topic",
        };
        convert_line(line, &ctx)
    }

    #[test]
    fn plain_text_is_escaped() {
        let config = RenderConfig::default();
        assert_eq!(convert("a < b & \"c\"", &config), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn urls_become_links_without_trailing_punctuation() {
        let config = RenderConfig::default();
        assert_eq!(
            convert("see https://example.org/a?b=1&c=2.", &config),
            "see <a href=\"https://example.org/a?b=1&amp;c=2\">https://example.org/a?b=1&amp;c=2</a>."
        );
        assert_eq!(
            convert("(http://x.org/y)", &config),
            "(<a href=\"http://x.org/y\">http://x.org/y</a>)"
        );
    }

    #[test]
    fn known_message_ids_link_to_articles() {
        let config = RenderConfig::default();
        let out = convert("As said in <msg5@example.org>:", &config);
        assert_eq!(
            out,
            "As said in &lt;<a href=\"0005.html\">msg5@example.org</a>&gt;:"
        );
    }

    #[test]
    fn unknown_message_ids_are_treated_as_addresses() {
        let config = RenderConfig::default();
        let out = convert("<who@else.org>", &config);
        assert!(out.starts_with("&lt;<a href=\"mailto:who%40else.org?In-Reply-To=abc%40example.org&amp;Subject=Re%3A%20Topic\">"));
        assert!(out.ends_with("who@else.org</a>&gt;"));
    }

    #[test]
    fn message_id_links_can_be_disabled() {
        let mut config = RenderConfig::default();
        config.article.link_message_ids = false;
        config.mail.links = MailLinks::Off;
        assert_eq!(
            convert("<msg5@example.org>", &config),
            "&lt;msg5@example.org&gt;"
        );
    }

    #[test]
    fn addresses_are_obfuscated() {
        let mut config = RenderConfig::default();
        config.mail.links = MailLinks::Obfuscate;
        config.mail.antispam_at = " at ".to_string();
        assert_eq!(convert("write to ann@example.org", &config), "write to ann at example.org");
    }

    #[test]
    fn addresses_are_untouched_on_lines_with_urls() {
        let config = RenderConfig::default();
        let out = convert("ann@example.org posted http://x.org/", &config);
        assert!(out.starts_with("ann@example.org posted <a"));
    }

    #[test]
    fn mail_command_encodes_values() {
        assert_eq!(
            mail_command("mailto:$TO?Subject=$SUBJECT", "a@b.c", "", "Re: x & y"),
            "mailto:a%40b.c?Subject=Re%3A%20x%20%26%20y"
        );
        assert_eq!(id_command("https://l.org/$ID", "a@b"), "https://l.org/a%40b");
    }
}
