//! Blog Markdown Rendering
//!
//! Thin layer over pulldown-cmark:
//! - Raw HTML in posts is shown as text, never injected
//! - Relative image paths (`/uploads/...`) resolve against the media host
//! - Images get a max-width so they fit the post column

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser, Tag, TagEnd};

fn get_options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

/// Render a post body to HTML. `media_base` is prefixed to root-relative image paths.
pub fn parse_markdown(text: &str, media_base: &str) -> String {
    let parser = Parser::new_ext(text, get_options());
    let events = transform_events(parser, media_base);
    let mut html_output = String::new();
    push_html(&mut html_output, events.into_iter());
    html_output
}

// Inside an image the bracket text is collected for `alt`; the tag is emitted at its end
enum State {
    Normal,
    InImage { depth: usize, src: String, title: String, alt: String },
}

fn image_html(src: &str, title: &str, alt: &str) -> String {
    let title = if title.is_empty() { String::new() } else { format!(r#" title="{}""#, escape_html(title)) };
    format!(
        r#"<img src="{}" alt="{}"{} loading="lazy" style="max-width: 100%; display: block; border-radius: 4px;" />"#,
        escape_html(src),
        escape_html(alt),
        title
    )
}

fn transform_events<'a>(parser: Parser<'a>, media_base: &str) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut state = State::Normal;

    for event in parser {
        match &mut state {
            State::Normal => match event {
                Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
                Event::Start(Tag::Image { dest_url, title, .. }) => {
                    state = State::InImage {
                        depth: 0,
                        src: resolve_media_url(&dest_url, media_base),
                        title: title.to_string(),
                        alt: String::new(),
                    };
                }
                other => events.push(other),
            },
            State::InImage { depth, src, title, alt } => match event {
                Event::Start(_) => *depth += 1,
                Event::End(TagEnd::Image) if *depth == 0 => {
                    events.push(Event::Html(CowStr::from(image_html(src, title, alt))));
                    state = State::Normal;
                }
                Event::End(_) => *depth = depth.saturating_sub(1),
                Event::Text(t) | Event::Code(t) | Event::InlineHtml(t) => alt.push_str(&t),
                Event::SoftBreak | Event::HardBreak => alt.push(' '),
                _ => {}
            },
        }
    }

    events
}

const PATH_ENCODE_SET: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// Absolute and protocol-relative URLs pass through; `/path` gets the media host
pub fn resolve_media_url(url: &str, media_base: &str) -> String {
    let lower = url.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || url.starts_with("//") || lower.starts_with("data:") {
        return url.to_string();
    }
    let encoded = utf8_percent_encode(url.trim_start_matches('/'), PATH_ENCODE_SET).to_string();
    format!("{}/{}", media_base.trim_end_matches('/'), encoded)
}

/// Plain-text preview for blog cards, cut on a word boundary
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut plain = String::new();
    for event in Parser::new_ext(text, get_options()) {
        match event {
            Event::Text(t) | Event::Code(t) => plain.push_str(&t),
            Event::SoftBreak | Event::HardBreak | Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Heading(_)) => {
                plain.push(' ')
            }
            _ => {}
        }
    }
    let plain = plain.split_whitespace().collect::<Vec<_>>().join(" ");
    if plain.chars().count() <= max_chars {
        return plain;
    }

    let cut: String = plain.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(' ') {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut.as_str(),
    };
    format!("{}...", trimmed.trim_end_matches([',', '.', ';', ':']))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
