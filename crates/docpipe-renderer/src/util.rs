//! Shared utility functions for heading extraction and rendering.

use std::sync::LazyLock;

use pulldown_cmark::{Event, HeadingLevel, Options};
use regex::Regex;

/// Runs of characters outside ASCII `\w`.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("invalid non-word regex"));

/// Derive an anchor id from heading text.
///
/// Drops `#` and `|`, collapses every run of non-word characters into a single `-`,
/// trims dashes from both ends and lowercases the result.
///
/// # Examples
///
/// ```
/// use docpipe_renderer::slugify;
///
/// assert_eq!(slugify("Foo.Bar #1"), "foo-bar-1");
/// assert_eq!(slugify("---Trailing---"), "trailing");
/// assert_eq!(slugify("Table of Contents"), "table-of-contents");
/// ```
pub fn slugify(name: &str) -> String {
    let stripped: String = name.chars().filter(|c| !matches!(c, '#' | '|')).collect();
    NON_WORD
        .replace_all(&stripped, "-")
        .trim_matches('-')
        .to_lowercase()
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Plain text of a heading, fed one inline event at a time.
///
/// Text and inline code contribute their content, line breaks become a
/// space and all other markup is ignored. The lexer and the HTML renderer
/// both flatten headings through this, so TOC ids match the anchors.
#[derive(Debug, Default)]
pub(crate) struct HeadingText(String);

impl HeadingText {
    pub(crate) fn push(&mut self, event: &Event<'_>) {
        match event {
            Event::Text(text) | Event::Code(text) => self.0.push_str(text),
            Event::SoftBreak | Event::HardBreak => self.0.push(' '),
            _ => {}
        }
    }

    pub(crate) fn finish(self) -> String {
        self.0.trim().to_owned()
    }
}

/// Markdown extensions shared by the lexer and the HTML renderer.
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
