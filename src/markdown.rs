//! Markdown support for post excerpts: [`excerpt`] picks the part of a post
//! body shown on the index page and [`to_html`] renders it.

use pulldown_cmark::{html, Event, Options, Parser, Tag};

/// Separates a post's excerpt from the rest of its body.
pub const FOLD_TAG: &str = "<!-- more -->";

/// Converts markdown to HTML.
///
/// Headings are demoted by two levels (capped at `h6`) so that they stay
/// subordinate to both the site title (h1) and the post title (h2) on the
/// index page.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options).map(demote));
    out
}

fn demote(ev: Event) -> Event {
    match ev {
        Event::Start(Tag::Heading(s)) => Event::Start(Tag::Heading(demoted(s))),
        Event::End(Tag::Heading(s)) => Event::End(Tag::Heading(demoted(s))),
        _ => ev,
    }
}

fn demoted(size: u32) -> u32 {
    std::cmp::min(size + 2, 6)
}

/// Returns the excerpt of a markdown post body: everything before the
/// [`FOLD_TAG`] if there is one, otherwise the first block (everything up to
/// the first blank line). Leading whitespace is skipped.
pub fn excerpt(markdown: &str) -> &str {
    let body = markdown.trim_start();
    if let Some(i) = body.find(FOLD_TAG) {
        return body[..i].trim_end();
    }

    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim().is_empty() {
            break;
        }
        offset += line.len();
    }
    body[..offset].trim_end()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_excerpt_fold() {
        let body = "\n\nFirst paragraph.\n\nSecond.\n<!-- more -->\nHidden.";
        assert_eq!("First paragraph.\n\nSecond.", excerpt(body));
    }

    #[test]
    fn test_excerpt_first_paragraph() {
        let body = "Line one\nline two\n\nNext paragraph.";
        assert_eq!("Line one\nline two", excerpt(body));
    }

    #[test]
    fn test_excerpt_whole_body() {
        assert_eq!("Only paragraph.", excerpt("Only paragraph.\n"));
        assert_eq!("", excerpt("   \n"));
    }

    #[test]
    fn test_excerpt_blank_line_with_spaces() {
        assert_eq!("One", excerpt("One\n   \nTwo"));
    }

    #[test]
    fn test_to_html_demotes_headings() {
        assert_eq!("<h3>Hello</h3>\n", to_html("# Hello"));
        assert_eq!("<h6>Deep</h6>\n", to_html("##### Deep"));
    }

    #[test]
    fn test_to_html_paragraph() {
        assert_eq!(
            "<p>Some <em>emphasis</em> and <del>strike</del>.</p>\n",
            to_html("Some *emphasis* and ~~strike~~.")
        );
    }
}
