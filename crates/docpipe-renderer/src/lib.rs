//! Markdown heading extraction, table of contents and HTML rendering.
//!
//! This crate turns a README into the two things the documentation site
//! shows: an HTML body and a navigable table of contents.
//!
//! # Architecture
//!
//! - [`heading_tokens`] lexes a document down to its headings
//! - [`build_toc`] groups level-2 and level-3 headings into a [`TableOfContents`]
//! - [`Renderer`] is the seam for Markdown to HTML conversion, with
//!   [`HtmlRenderer`] as the pulldown-cmark implementation
//!
//! Heading anchors in the rendered HTML and ids in the table of contents both
//! come from [`slugify`], so they always agree.
//!
//! # Example
//!
//! ```
//! use docpipe_renderer::{TableOfContents, build_toc, heading_tokens};
//!
//! let markdown = "# pagelet\n\n## Installation\n\n## Events\n\n### render\n";
//! let toc = build_toc(&heading_tokens(markdown));
//!
//! let TableOfContents::Entries(entries) = toc else { unreachable!() };
//! assert_eq!(entries[1].id, "events");
//! assert_eq!(entries[1].sections[0].name, "render");
//! ```

mod html;
mod lexer;
mod renderer;
mod toc;
mod util;

pub use html::HtmlRenderer;
pub use lexer::{HeadingToken, heading_tokens};
pub use renderer::{GithubRepo, RenderError, RenderOptions, Renderer};
pub use toc::{TableOfContents, TocEntry, TocSection, build_toc};
pub use util::{escape_html, slugify};
