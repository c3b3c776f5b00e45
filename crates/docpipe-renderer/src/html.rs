//! HTML renderer built on pulldown-cmark.
//!
//! Produces GitHub-flavoured HTML for README files:
//! - headings carry the same `id` the table of contents links to
//! - relative links and images resolve into the package's GitHub repository

use pulldown_cmark::{CowStr, Event, Parser, Tag, TagEnd};

use crate::renderer::{GithubRepo, RenderError, RenderOptions, Renderer};
use crate::util::{HeadingText, parser_options, slugify};

/// Markdown to HTML renderer.
///
/// # Example
///
/// ```
/// use docpipe_renderer::{HtmlRenderer, RenderOptions, Renderer};
///
/// let html = HtmlRenderer
///     .render("## Getting Started", &RenderOptions::default())
///     .unwrap();
/// assert_eq!(html, "<h2 id=\"getting-started\">Getting Started</h2>\n");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, markdown: &str, options: &RenderOptions) -> Result<String, RenderError> {
        if let Some(limit) = options.limit
            && markdown.len() > limit
        {
            return Err(RenderError::TooLarge {
                size: markdown.len(),
                limit,
            });
        }

        let mut events: Vec<Event<'_>> = Parser::new_ext(markdown, parser_options()).collect();
        assign_heading_ids(&mut events);
        if let Some(repo) = &options.github {
            resolve_relative_urls(&mut events, repo);
        }

        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        Ok(html)
    }
}

/// Give every heading an `id` derived from its text.
fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut open: Option<(usize, HeadingText)> = None;
    let mut ids = Vec::new();

    for (index, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading { .. }) => open = Some((index, HeadingText::default())),
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, text)) = open.take() {
                    ids.push((start, slugify(&text.finish())));
                }
            }
            inline => {
                if let Some((_, text)) = open.as_mut() {
                    text.push(inline);
                }
            }
        }
    }

    for (index, slug) in ids {
        if slug.is_empty() {
            continue;
        }
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[index] {
            *id = Some(CowStr::from(slug));
        }
    }
}

/// Point relative link and image destinations at the GitHub repository.
fn resolve_relative_urls(events: &mut [Event<'_>], repo: &GithubRepo) {
    for event in events {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) if is_relative(dest_url) => {
                *dest_url = CowStr::from(repo.blob_url(dest_url));
            }
            Event::Start(Tag::Image { dest_url, .. }) if is_relative(dest_url) => {
                *dest_url = CowStr::from(repo.raw_url(dest_url));
            }
            _ => {}
        }
    }
}

/// Whether `url` is a path inside the repository.
///
/// Fragments, protocol-relative URLs and anything with a scheme
/// (`https:`, `mailto:`) are not.
fn is_relative(url: &str) -> bool {
    if url.is_empty() || url.starts_with('#') || url.starts_with("//") {
        return false;
    }

    let has_scheme = url.split_once(':').is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    });
    !has_scheme
}
