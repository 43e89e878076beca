//! Message body rendering.
//!
//! The body arrives as a flat list of tagged lines. Rendering is a single
//! pass that tracks which markup regions are open and closes or opens them
//! as the line tags change:
//!
//! ```text
//! header lines      → skipped; entering a header block closes every region
//! attachment start  → <section class="message-body-part"> (+ forwarded notice)
//! attachment end    → </section>
//! links start/end   → <section class="message-body-part attachment-links"><ul> … </ul></section>
//! html line         → <div class="inlinehtml-body"> … verbatim
//! text/quote, pre   → <pre class="body"> … escaped and linked
//! text/quote, html  → <div class="showhtml-body"> … <br /> separated
//! ```
//!
//! The first region opened carries `id="start"`, the target of the "message
//! body" link in the article navigation.
//!
//! Messages whose text is removed by the deletion level render a single
//! placeholder instead.

use crate::config::BodyFormat;
use crate::labels;
use crate::linkify::{self, LinkContext};
use crate::types::{BodyLine, DeletionState, EmailRecord};
use maud::{Markup, PreEscaped, html};

const START_ATTR: &str = " id=\"start\"";

/// Split a `Name: value` header line.
pub(crate) fn parse_header(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((name, value.trim()))
}

/// Values of the `wanted` headers found in the header block that starts
/// the given lines, in order of appearance.
pub(crate) fn wanted_headers<'a>(lines: &'a [BodyLine], wanted: &[String]) -> Vec<(&'a str, &'a str)> {
    lines
        .iter()
        .map_while(|line| match line {
            BodyLine::Header { text } => Some(text.as_str()),
            _ => None,
        })
        .filter_map(parse_header)
        .filter(|(name, _)| wanted.iter().any(|w| w.eq_ignore_ascii_case(name)))
        .collect()
}

/// Share of quoted lines among the non-blank text lines, in percent.
pub fn quoted_percent(lines: &[BodyLine]) -> u32 {
    let mut quoted = 0u32;
    let mut total = 0u32;
    for line in lines {
        match line {
            BodyLine::Quote { text } if !text.trim().is_empty() => {
                quoted += 1;
                total += 1;
            }
            BodyLine::Text { text } if !text.trim().is_empty() => total += 1,
            _ => {}
        }
    }
    if total == 0 { 0 } else { quoted * 100 / total }
}

/// `quotelevN` by the number of leading `>` markers, capped at 4.
pub fn quote_class(line: &str) -> String {
    let level = line
        .chars()
        .take_while(|c| matches!(c, '>' | ' ' | '\t'))
        .filter(|c| *c == '>')
        .count()
        .clamp(1, 4);
    format!("quotelev{level}")
}

fn is_sig_start(line: &str) -> bool {
    line == "-- " || line == "--"
}

/// Drop `<html>` and `</html>` wrappers from inline HTML.
fn strip_html_wrappers(line: &str) -> String {
    let mut out = line.to_string();
    for tag in ["<html>", "</html>", "<HTML>", "</HTML>"] {
        out = out.replace(tag, "");
    }
    out
}

/// Placeholder body for a message whose text is removed.
pub fn deleted_placeholder(state: DeletionState, config: &crate::config::DeletionConfig) -> String {
    let custom = match state {
        DeletionState::Deleted => config
            .deleted_html
            .as_ref()
            .or(config.deleted_other_html.as_ref()),
        DeletionState::DeletedOther => config.deleted_other_html.as_ref(),
        _ => None,
    };
    if let Some(html) = custom {
        return format!("{html}\n");
    }
    let label = match state {
        DeletionState::Expired => labels::MESSAGE_EXPIRED,
        DeletionState::Filtered => labels::MESSAGE_FILTERED,
        DeletionState::DeletedOther => labels::MESSAGE_DELETED_OTHER,
        _ => labels::MESSAGE_DELETED,
    };
    html! {
        pre id="start" class="body" {
            "\n" span.message-deleted { (label) } "\n"
        }
        "\n"
    }
    .into_string()
}

#[derive(Default)]
struct OpenRegions {
    pre: bool,
    showhtml: bool,
    inlinehtml: bool,
}

struct BodyWriter<'a, 'c> {
    ctx: &'a LinkContext<'c>,
    parent_href: Option<&'a str>,
    out: String,
    open: OpenRegions,
    attachment_links_open: bool,
    attachment_list_open: bool,
    body_start: bool,
    forwarded_count: u32,
    stored_attachments_count: u32,
}

impl BodyWriter<'_, '_> {
    /// `Some("start")` the first time a region opens, `None` afterwards.
    fn start_id(&mut self) -> Option<&'static str> {
        std::mem::take(&mut self.body_start).then_some("start")
    }

    fn start_attr(&mut self) -> &'static str {
        self.start_id().map_or("", |_| START_ATTR)
    }

    fn close_regions(&mut self) {
        if self.open.pre {
            self.out.push_str("</pre>\n");
            self.open.pre = false;
        }
        if self.open.showhtml || self.open.inlinehtml {
            self.out.push_str("</div>\n");
            self.open.showhtml = false;
            self.open.inlinehtml = false;
        }
    }

    fn push_line(&mut self, html: &str) {
        self.out.push_str(html);
        self.out.push('\n');
    }

    fn push_markup(&mut self, markup: Markup) {
        self.push_line(&markup.into_string());
    }

    /// Close a stored-attachment section and its list, if open.
    fn close_attachment_links(&mut self) {
        if self.attachment_list_open {
            self.out.push_str("</ul>\n");
            self.attachment_list_open = false;
        }
        if self.attachment_links_open {
            self.out.push_str("</section>\n");
            self.attachment_links_open = false;
        }
    }

    fn collapsed_quote(&self) -> String {
        html! {
            span.quote-replaced {
                @if let Some(href) = self.parent_href {
                    a href=(href) { (labels::QUOTED_TEXT_OMITTED) }
                } @else {
                    (labels::QUOTED_TEXT_OMITTED)
                }
            }
        }
        .into_string()
    }

    /// Header list of a forwarded message: From, Date, Subject and the
    /// configured extra headers.
    fn forwarded_headers(&self, headers: &[BodyLine]) -> Markup {
        let config = self.ctx.config;
        let mut from = None;
        let mut date = None;
        let mut subject = None;
        for (name, value) in headers.iter().filter_map(|l| parse_header(l.text())) {
            if name.eq_ignore_ascii_case("from") && from.is_none() {
                from = Some(value);
            } else if name.eq_ignore_ascii_case("date") && date.is_none() {
                date = Some(value);
            } else if name.eq_ignore_ascii_case("subject") && subject.is_none() {
                subject = Some(value);
            }
        }
        let from = from.map(|from| match config.mail.links {
            crate::config::MailLinks::Obfuscate => linkify::obfuscate(from, &config.mail.antispam_at),
            _ => from.to_string(),
        });
        let extra: Vec<(&str, String)> = wanted_headers(headers, &config.article.show_headers)
            .into_iter()
            .filter(|(name, _)| {
                !["from", "date", "subject"]
                    .iter()
                    .any(|h| h.eq_ignore_ascii_case(name))
            })
            .map(|(name, value)| (name, linkify::convert_line(value, self.ctx)))
            .collect();

        html! {
            ul.headers aria-label="message headers" {
                @if let Some(from) = &from {
                    li { span.from { span.heading { (labels::FROM) } ": " (from) } }
                }
                @if let Some(date) = date {
                    li { span.date { span.heading { (labels::DATE) } ": " (date) } }
                }
                @if let Some(subject) = subject {
                    li { span.subject { span.heading { (labels::SUBJECT) } ": " (subject) } }
                }
                @for (name, value) in &extra {
                    li { span.heading { (name) } ": " (PreEscaped(value)) }
                }
            }
        }
    }

    fn render(mut self, email: &EmailRecord) -> String {
        let config = self.ctx.config;
        let replace_quoted = config.article.quote_hide_threshold < 100
            && quoted_percent(&email.body) > config.article.quote_hide_threshold;
        if replace_quoted {
            log::info!(
                "message {}: quoted text ({}%) replaced by links",
                email.msgnum,
                quoted_percent(&email.body)
            );
        }

        if email.edited {
            match &config.deletion.edited_html {
                Some(html) => self.push_line(html),
                None => {
                    let id = self.start_id();
                    self.push_markup(html! {
                        p id=[id] class="message-edited" { (labels::MESSAGE_EDITED) }
                    });
                }
            }
        }

        let lines = &email.body;
        let mut in_header = false;
        let mut inblank = true;
        let mut insig = false;
        let mut inquote = false;
        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            i += 1;

            if let BodyLine::Header { .. } = line {
                if !in_header {
                    in_header = true;
                    self.close_regions();
                }
                continue;
            }
            if in_header {
                in_header = false;
                inquote = false;
                inblank = true;
                insig = false;
            }

            match line {
                BodyLine::AttachmentStart { rfc822 } => {
                    self.close_regions();
                    let attr = self.start_attr();
                    if *rfc822 {
                        self.forwarded_count += 1;
                        let n = self.forwarded_count;
                        self.out.push_str(&format!(
                            "<section{attr} class=\"message-body-part\" aria-labelledby=\"fm{n}\">\n"
                        ));
                        self.push_markup(html! {
                            h2 id=(format!("fm{n}")) class="forwarded-message-notice" {
                                (labels::FORWARDED_MESSAGE)
                            }
                        });
                        self.out.push_str("<div class=\"message-forwarded\">\n");
                        let headers_end = lines[i..]
                            .iter()
                            .position(|l| !matches!(l, BodyLine::Header { .. }))
                            .map_or(lines.len(), |p| i + p);
                        if headers_end > i {
                            let list = self.forwarded_headers(&lines[i..headers_end]);
                            self.push_markup(list);
                            i = headers_end;
                            inblank = true;
                        }
                    } else {
                        self.out.push_str(&format!(
                            "<section{attr} class=\"message-body-part\">\n"
                        ));
                    }
                    continue;
                }
                BodyLine::AttachmentEnd { rfc822 } => {
                    self.close_regions();
                    if *rfc822 {
                        self.out.push_str("</div>\n");
                    }
                    self.out.push_str("</section>\n");
                    continue;
                }
                BodyLine::AttachmentLinksStart => {
                    self.close_regions();
                    self.stored_attachments_count += 1;
                    let n = self.stored_attachments_count;
                    let attr = self.start_attr();
                    self.out.push_str(&format!(
                        "<section{attr} class=\"message-body-part attachment-links\" aria-labelledby=\"lsa{n}\">\n"
                    ));
                    self.push_markup(html! { h2 id=(format!("lsa{n}")) { (labels::STORED_ATTACHMENTS) } });
                    self.out.push_str("<ul>\n");
                    self.attachment_links_open = true;
                    self.attachment_list_open = true;
                    continue;
                }
                BodyLine::AttachmentLinksEnd => {
                    self.close_attachment_links();
                    continue;
                }
                _ => {}
            }

            let is_attachment_link = matches!(
                line,
                BodyLine::Html {
                    attachment_link: true,
                    ..
                }
            );
            let text = line.text();
            if !is_attachment_link && text.is_empty() && inblank {
                continue;
            }
            inblank = false;

            if let BodyLine::Html { .. } = line {
                if is_attachment_link {
                    if !self.attachment_links_open {
                        self.close_regions();
                        let attr = self.start_attr();
                        self.out
                            .push_str(&format!("<section{attr} class=\"message-body-part\">\n"));
                        self.attachment_links_open = true;
                    }
                } else if !self.open.inlinehtml {
                    self.close_regions();
                    let attr = self.start_attr();
                    self.out
                        .push_str(&format!("<div{attr} class=\"inlinehtml-body\">\n"));
                    self.open.inlinehtml = true;
                }
                self.body_start = false;
                self.push_line(&strip_html_wrappers(text));
                continue;
            }

            let is_quote = matches!(line, BodyLine::Quote { .. });
            if self.open.inlinehtml {
                self.close_regions();
            }
            match config.article.body_format {
                BodyFormat::Html => {
                    if !self.open.showhtml {
                        let attr = self.start_attr();
                        self.out
                            .push_str(&format!("<div{attr} class=\"showhtml-body\">\n"));
                        self.open.showhtml = true;
                    }
                    if is_sig_start(text) {
                        insig = true;
                        if !self.open.pre {
                            self.out.push_str("<pre>\n");
                            self.open.pre = true;
                        }
                    }
                    if text.is_empty() {
                        self.push_line(if self.open.pre { "" } else { "<br />" });
                    } else if insig {
                        let html = linkify::convert_line(text, self.ctx);
                        self.push_line(&html);
                    } else if is_quote {
                        if replace_quoted {
                            if !inquote {
                                let mut collapsed = self.collapsed_quote();
                                collapsed.push_str("<br />");
                                self.push_line(&collapsed);
                            }
                        } else {
                            let class = format!("quote {}", quote_class(text));
                            let html = PreEscaped(linkify::convert_line(text, self.ctx));
                            let mut line = html! {
                                @if config.article.italic_quotes {
                                    em class=(class) { (html) }
                                } @else {
                                    span class=(class) { (html) }
                                }
                            }
                            .into_string();
                            line.push_str("<br />");
                            self.push_line(&line);
                        }
                    } else {
                        let trimmed = text.trim_start_matches([' ', '\t']);
                        let indent: String = text[..text.len() - trimmed.len()]
                            .chars()
                            .map(|c| if c == '\t' { "&nbsp;".repeat(8) } else { "&nbsp;".to_string() })
                            .collect();
                        let html = linkify::convert_line(trimmed, self.ctx);
                        let next_breaks = lines.get(i).is_some_and(|next| {
                            !next
                                .text()
                                .chars()
                                .next()
                                .is_some_and(char::is_alphanumeric)
                        });
                        let br = if config.article.show_br || next_breaks { "<br />" } else { "" };
                        self.push_line(&format!("{indent}{html}{br}"));
                    }
                }
                BodyFormat::Pre => {
                    if !self.open.pre {
                        let attr = self.start_attr();
                        self.out.push_str(&format!("<pre{attr} class=\"body\">\n"));
                        self.open.pre = true;
                    }
                    if is_quote && replace_quoted {
                        if !inquote {
                            let collapsed = self.collapsed_quote();
                            self.push_line(&collapsed);
                        }
                    } else {
                        let html = linkify::convert_line(text, self.ctx);
                        self.push_line(&html);
                    }
                }
            }
            inquote = is_quote;
        }

        self.close_attachment_links();
        self.close_regions();
        self.out
    }
}

/// Render the body of `email`. `parent_href` is the link target for
/// collapsed quotes.
pub fn render_body(email: &EmailRecord, ctx: &LinkContext, parent_href: Option<&str>) -> String {
    if ctx.config.deletion.level.removes_body(email.deleted) {
        return deleted_placeholder(email.deleted, &ctx.config.deletion);
    }
    BodyWriter {
        ctx,
        parent_href,
        out: String::new(),
        open: OpenRegions::default(),
        attachment_links_open: false,
        attachment_list_open: false,
        body_start: true,
        forwarded_count: 0,
        stored_attachments_count: 0,
    }
    .render(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::Archive;
    use crate::config::RenderConfig;
    use crate::test_helpers::*;
    use crate::types::DeleteLevel;

    fn render_with(config: &RenderConfig, body: Vec<BodyLine>) -> String {
        let archive: Archive = archive_of(vec![email(1, "Ann", "Topic", 10)], vec![]);
        let mut record = email(2, "Bob", "Re: Topic", 20);
        record.body = body;
        let ctx = LinkContext {
            archive: &archive,
            config,
            folder: "",
            msgid: &record.msgid,
            subject: &record.subject,
        };
        render_body(&record, &ctx, Some("0001.html"))
    }

    fn render(body: Vec<BodyLine>) -> String {
        render_with(&RenderConfig::default(), body)
    }

    #[test]
    fn pre_body_skips_headers_and_leading_blanks() {
        let out = render(vec![
            header("From: Bob <bob@example.org>"),
            header("Subject: Re: Topic"),
            text(""),
            text("Hello <world>"),
            text(""),
            text("Bye"),
        ]);
        assert_eq!(
            out,
            "<pre id=\"start\" class=\"body\">\nHello &lt;world&gt;\n\nBye\n</pre>\n"
        );
    }

    #[test]
    fn html_format_breaks_and_indents() {
        let mut config = RenderConfig::default();
        config.article.body_format = BodyFormat::Html;
        config.article.italic_quotes = false;
        let out = render_with(
            &config,
            vec![
                text("first"),
                text("  indented"),
                text(""),
                quote("> quoted"),
                text("-- "),
                text("sig"),
            ],
        );
        assert_eq!(
            out,
            "<div id=\"start\" class=\"showhtml-body\">\n\
             first<br />\n\
             &nbsp;&nbsp;indented<br />\n\
             <br />\n\
             <span class=\"quote quotelev1\">&gt; quoted</span><br />\n\
             <pre>\n-- \nsig\n</pre>\n</div>\n"
        );
    }

    #[test]
    fn attachment_sections_and_forwarded_headers() {
        let mut config = RenderConfig::default();
        config.article.show_headers = vec!["To".to_string()];
        config.mail.links = crate::config::MailLinks::Off;
        let out = render_with(
            &config,
            vec![
                text("intro"),
                BodyLine::AttachmentStart { rfc822: true },
                header("From: Carol <carol@example.org>"),
                header("To: list@example.org"),
                header("Subject: original"),
                text(""),
                text("forwarded text"),
                BodyLine::AttachmentEnd { rfc822: true },
            ],
        );
        assert_in_order(
            &out,
            &[
                "<pre id=\"start\" class=\"body\">\nintro\n</pre>\n",
                "<section class=\"message-body-part\" aria-labelledby=\"fm1\">",
                "<h2 id=\"fm1\" class=\"forwarded-message-notice\">Forwarded message</h2>",
                "<div class=\"message-forwarded\">",
                "<span class=\"heading\">From</span>: Carol &lt;carol@example.org&gt;",
                "<span class=\"heading\">Subject</span>: original",
                "<li><span class=\"heading\">To</span>: list@example.org</li>",
                "</ul>\n<pre class=\"body\">\nforwarded text\n</pre>\n</div>\n</section>\n",
            ],
        );
        assert_eq!(count(&out, "id=\"start\""), 1);
    }

    #[test]
    fn stored_attachment_list() {
        let out = render(vec![
            BodyLine::AttachmentLinksStart,
            BodyLine::Html {
                text: "<li><a href=\"att-0002/a.png\">a.png</a></li>".into(),
                attachment_link: true,
            },
            BodyLine::AttachmentLinksEnd,
        ]);
        assert_eq!(
            out,
            "<section id=\"start\" class=\"message-body-part attachment-links\" aria-labelledby=\"lsa1\">\n\
             <h2 id=\"lsa1\">List of stored attachments</h2>\n<ul>\n\
             <li><a href=\"att-0002/a.png\">a.png</a></li>\n</ul>\n</section>\n"
        );
    }

    #[test]
    fn implicit_attachment_section_has_no_list_to_close() {
        let out = render(vec![
            BodyLine::Html {
                text: "<a href=\"att-0002/a.png\">a.png</a>".into(),
                attachment_link: true,
            },
            BodyLine::AttachmentLinksEnd,
            text("after"),
        ]);
        assert_eq!(
            out,
            "<section id=\"start\" class=\"message-body-part\">\n\
             <a href=\"att-0002/a.png\">a.png</a>\n</section>\n\
             <pre class=\"body\">\nafter\n</pre>\n"
        );
        assert!(!out.contains("</ul>"));
    }

    #[test]
    fn unterminated_attachment_list_is_closed() {
        let out = render(vec![
            BodyLine::AttachmentLinksStart,
            BodyLine::Html {
                text: "<li>a.png</li>".into(),
                attachment_link: true,
            },
        ]);
        assert!(out.ends_with("<li>a.png</li>\n</ul>\n</section>\n"));
        assert_eq!(count(&out, "<ul>"), count(&out, "</ul>"));
    }

    #[test]
    fn inline_html_is_verbatim() {
        let out = render(vec![html_line("<html><b>bold</b>"), html_line("</html>"), text("after")]);
        assert_eq!(
            out,
            "<div id=\"start\" class=\"inlinehtml-body\">\n<b>bold</b>\n\n</div>\n\
             <pre class=\"body\">\nafter\n</pre>\n"
        );
    }

    #[test]
    fn quotes_collapse_above_threshold() {
        let mut config = RenderConfig::default();
        config.article.quote_hide_threshold = 50;
        let out = render_with(
            &config,
            vec![quote("> a"), quote("> b"), quote("> c"), text("reply"), quote("> d")],
        );
        assert_eq!(
            out,
            "<pre id=\"start\" class=\"body\">\n\
             <span class=\"quote-replaced\"><a href=\"0001.html\">Quoted text omitted</a></span>\n\
             reply\n\
             <span class=\"quote-replaced\"><a href=\"0001.html\">Quoted text omitted</a></span>\n\
             </pre>\n"
        );
    }

    #[test]
    fn quotes_stay_below_threshold() {
        let mut config = RenderConfig::default();
        config.article.quote_hide_threshold = 80;
        let out = render_with(&config, vec![quote("> a"), text("reply")]);
        assert!(out.contains("&gt; a\n"));
    }

    #[test]
    fn deleted_message_gets_placeholder() {
        let archive = archive_of(vec![], vec![]);
        let config = RenderConfig::default();
        let mut record = email(3, "Eve", "spam", 1);
        record.deleted = DeletionState::Deleted;
        let ctx = LinkContext {
            archive: &archive,
            config: &config,
            folder: "",
            msgid: "",
            subject: "",
        };
        let out = render_body(&record, &ctx, None);
        assert_eq!(
            out,
            "<pre id=\"start\" class=\"body\">\n<span class=\"message-deleted\">\
             This message has been deleted from the archive.</span>\n</pre>\n"
        );
        assert!(!out.contains("Body of message"));
    }

    #[test]
    fn expired_text_is_kept_at_leaves_expired_level() {
        let archive = archive_of(vec![], vec![]);
        let mut config = RenderConfig::default();
        let mut record = email(3, "Eve", "old", 1);
        record.deleted = DeletionState::Expired;
        let ctx = LinkContext {
            archive: &archive,
            config: &config,
            folder: "",
            msgid: "",
            subject: "",
        };
        assert!(render_body(&record, &ctx, None).contains("Body of message 3."));

        config.deletion.level = DeleteLevel::RemovesText;
        let ctx = LinkContext {
            archive: &archive,
            config: &config,
            folder: "",
            msgid: "",
            subject: "",
        };
        assert!(render_body(&record, &ctx, None).contains("This message has expired."));
    }

    #[test]
    fn custom_deleted_html_falls_through_to_other() {
        let mut config = crate::config::DeletionConfig::default();
        config.deleted_other_html = Some("<p>gone</p>".into());
        assert_eq!(deleted_placeholder(DeletionState::Deleted, &config), "<p>gone</p>\n");
        assert_eq!(deleted_placeholder(DeletionState::DeletedOther, &config), "<p>gone</p>\n");
        assert!(deleted_placeholder(DeletionState::Expired, &config).contains("expired"));
    }

    #[test]
    fn edited_notice_takes_start_anchor() {
        let archive = archive_of(vec![], vec![]);
        let config = RenderConfig::default();
        let mut record = email(4, "Ann", "x", 1);
        record.edited = true;
        let ctx = LinkContext {
            archive: &archive,
            config: &config,
            folder: "",
            msgid: "",
            subject: "",
        };
        let out = render_body(&record, &ctx, None);
        assert!(out.starts_with("<p id=\"start\" class=\"message-edited\">This message has been edited"));
        assert!(out.contains("<pre class=\"body\">"));
        assert_eq!(count(&out, "message-edited"), 1);
    }

    #[test]
    fn quote_classes_by_depth() {
        assert_eq!(quote_class("> a"), "quotelev1");
        assert_eq!(quote_class(">> a"), "quotelev2");
        assert_eq!(quote_class("> > > a"), "quotelev3");
        assert_eq!(quote_class(">>>>>> a"), "quotelev4");
        assert_eq!(quote_class("| a"), "quotelev1");
    }

    #[test]
    fn quoted_percent_ignores_blank_lines() {
        let lines = vec![quote("> a"), text(""), text("b"), header("X: y")];
        assert_eq!(quoted_percent(&lines), 50);
        assert_eq!(quoted_percent(&[]), 0);
    }

    #[test]
    fn wanted_headers_only_reads_leading_block() {
        let lines = vec![
            header("To: a@b.c"),
            header("Cc: d@e.f"),
            text("body"),
            header("To: later@x.y"),
        ];
        let wanted = vec!["to".to_string()];
        assert_eq!(wanted_headers(&lines, &wanted), vec![("To", "a@b.c")]);
    }
}
