//! Shared page shell.
//!
//! Every generated page is a full HTML document with the same head. The
//! built-in stylesheet is inlined unless `page.css_url` points at an
//! external one.

use crate::config::{RenderConfig, SummaryPeriod};
use crate::labels;
use crate::linkify;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../static/style.css");

/// Wrap `content` in the document shell.
pub fn base_document(title: &str, config: &RenderConfig, body_class: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if let Some(url) = &config.page.css_url {
                    link rel="stylesheet" href=(url);
                } @else {
                    style { (PreEscaped(CSS)) }
                }
            }
            body class=(body_class) {
                (content)
            }
        }
    }
}

/// Configured footer HTML, verbatim.
pub fn footer_html(config: &RenderConfig) -> Markup {
    html! {
        @if let Some(footer) = &config.page.footer_html {
            (PreEscaped(footer))
        }
    }
}

/// "Mail actions" entry offering a new message to the list address.
pub fn new_message_action(config: &RenderConfig) -> Markup {
    html! {
        @if let Some(list) = &config.mail.list_address {
            li {
                span.heading { (labels::MAIL_ACTIONS) } ": "
                ul.hmenu {
                    li { a href=(linkify::mail_command("mailto:$TO", list, "", "")) { (labels::NEW_MESSAGE) } }
                }
            }
        }
    }
}

/// "Nearby" links to the about page and other archives.
pub fn nearby_links(config: &RenderConfig) -> Markup {
    let about = config.page.about_url.as_deref().filter(|u| !u.is_empty());
    let archives = config.page.archives_url.as_deref().filter(|u| !u.is_empty());
    html! {
        @if about.is_some() || archives.is_some() {
            li {
                span.heading { (labels::NEARBY) } ": "
                ul.hmenu {
                    @if let Some(url) = about {
                        li { a href=(url) { (labels::ABOUT_LIST) } }
                    }
                    @if let Some(url) = archives {
                        li { a href=(url) { (labels::OTHER_ARCHIVES) } }
                    }
                }
            }
        }
    }
}

/// Name of the period summary page.
pub const SUMMARY_FILE: &str = "summary.html";

/// Link to the period summary, when one is written.
pub fn summary_link(config: &RenderConfig) -> Markup {
    let label = match config.indices.summary {
        SummaryPeriod::None => return html! {},
        SummaryPeriod::Monthly => labels::BY_MONTH,
        SummaryPeriod::Yearly => labels::BY_YEAR,
    };
    html! {
        li {
            span.heading { (labels::SUMMARY) } ": "
            a href=(SUMMARY_FILE) { (label) }
        }
    }
}
