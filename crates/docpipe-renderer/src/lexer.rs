//! Heading lexer.
//!
//! Reduces a Markdown document to the sequence of its headings, which is all
//! the table-of-contents builder needs.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use crate::util::{HeadingText, heading_level_to_num, parser_options};

/// A heading as it appears in the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadingToken {
    /// Heading depth (1-6).
    pub depth: u8,
    /// Plain heading text. Inline code contributes its literal content.
    pub text: String,
}

impl HeadingToken {
    /// Create a heading token.
    pub fn new(depth: u8, text: impl Into<String>) -> Self {
        Self {
            depth,
            text: text.into(),
        }
    }
}

/// Lex `markdown` into its heading tokens, in document order.
///
/// Both ATX (`## Title`) and setext (`Title\n---`) headings are recognized.
/// Lines starting with `#` inside fenced code blocks are not headings.
pub fn heading_tokens(markdown: &str) -> Vec<HeadingToken> {
    let mut tokens = Vec::new();
    let mut current: Option<(u8, HeadingText)> = None;

    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((heading_level_to_num(level), HeadingText::default()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((depth, text)) = current.take() {
                    tokens.push(HeadingToken::new(depth, text.finish()));
                }
            }
            ref inline => {
                if let Some((_, text)) = current.as_mut() {
                    text.push(inline);
                }
            }
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_heading_tokens_atx() {
        let markdown = "# Title\n\nText\n\n## Install\n\n### From npm ###\n";
        assert_eq!(
            heading_tokens(markdown),
            vec![
                HeadingToken::new(1, "Title"),
                HeadingToken::new(2, "Install"),
                HeadingToken::new(3, "From npm"),
            ]
        );
    }

    #[test]
    fn test_heading_tokens_setext() {
        let markdown = "BigPipe\n=======\n\nUsage\n-----\n";
        assert_eq!(
            heading_tokens(markdown),
            vec![HeadingToken::new(1, "BigPipe"), HeadingToken::new(2, "Usage")]
        );
    }

    #[test]
    fn test_heading_tokens_multiline_setext() {
        assert_eq!(
            heading_tokens("Getting\nStarted\n---\n"),
            vec![HeadingToken::new(2, "Getting Started")]
        );
    }

    #[test]
    fn test_heading_tokens_inline_markup_is_flattened() {
        let markdown = "## The `Pagelet.extend` **method**\n";
        assert_eq!(
            heading_tokens(markdown),
            vec![HeadingToken::new(2, "The Pagelet.extend method")]
        );
    }

    #[test]
    fn test_heading_tokens_ignores_code_blocks() {
        let markdown = "## Usage\n\n```sh\n# install\nnpm install bigpipe\n```\n";
        assert_eq!(heading_tokens(markdown), vec![HeadingToken::new(2, "Usage")]);
    }

    #[test]
    fn test_heading_tokens_empty_document() {
        assert!(heading_tokens("").is_empty());
        assert!(heading_tokens("just a paragraph").is_empty());
    }
}
