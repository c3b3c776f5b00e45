//! HTML views.
//!
//! Pages are assembled from pagelets: the sidebar listing every project and
//! one fragment per project holding its table of contents and README. All
//! manifest-derived text is escaped; README HTML is inserted as rendered.

use std::fmt::Write;

use docpipe_renderer::{TableOfContents, TocSection, escape_html};
use docpipe_site::Source;

/// Full HTML document around a sidebar and main content.
pub(crate) fn document(title: &str, sidebar: &str, main: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n\
         </head>\n\
         <body>\n\
         {sidebar}\n\
         <main>\n{main}</main>\n\
         </body>\n\
         </html>\n",
        escape_html(title)
    )
}

/// Sidebar pagelet: every project with its version and description.
pub(crate) fn sidebar(sources: &[Source]) -> String {
    let mut out = String::from("<nav class=\"sidebar\">\n<ul>\n");
    for source in sources {
        let manifest = source.manifest();
        let _ = write!(
            out,
            "<li><a href=\"/projects/{}\">{}</a>",
            escape_html(source.key()),
            escape_html(source.name())
        );
        if let Some(version) = &manifest.version {
            let _ = write!(out, " <span class=\"version\">{}</span>", escape_html(version));
        }
        if let Some(description) = &manifest.description {
            let _ = write!(out, "<p>{}</p>", escape_html(description));
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n</nav>");
    out
}

/// Project pagelet: table of contents followed by the rendered README.
pub(crate) fn project(source: &Source, html: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<section class=\"project\" id=\"project-{}\">",
        escape_html(source.key())
    );

    let toc = source.toc();
    if !toc.is_empty() {
        out.push_str(&table_of_contents(toc));
        out.push('\n');
    }

    let _ = write!(out, "<article class=\"readme\">\n{html}</article>\n</section>\n");
    out
}

/// Nested list of anchors into the README.
fn table_of_contents(toc: &TableOfContents) -> String {
    let mut out = String::from("<nav class=\"toc\">\n<ul>\n");
    match toc {
        TableOfContents::Entries(entries) => {
            for entry in entries {
                let _ = write!(out, "<li>{}", anchor(&entry.id, &entry.name));
                if !entry.sections.is_empty() {
                    out.push_str(&section_list(&entry.sections));
                }
                out.push_str("</li>\n");
            }
        }
        TableOfContents::Sections(sections) => {
            for section in sections {
                let _ = writeln!(out, "<li>{}</li>", anchor(&section.id, &section.name));
            }
        }
    }
    out.push_str("</ul>\n</nav>");
    out
}

fn section_list(sections: &[TocSection]) -> String {
    let mut out = String::from("<ul>");
    for section in sections {
        let _ = write!(out, "<li>{}</li>", anchor(&section.id, &section.name));
    }
    out.push_str("</ul>");
    out
}

fn anchor(id: &str, name: &str) -> String {
    format!("<a href=\"#{}\">{}</a>", escape_html(id), escape_html(name))
}

#[cfg(test)]
mod tests {
    use docpipe_renderer::TocEntry;
    use pretty_assertions::assert_eq;

    use super::*;

    fn section(id: &str, name: &str) -> TocSection {
        TocSection {
            id: id.to_owned(),
            name: name.to_owned(),
        }
    }

    #[test]
    fn test_table_of_contents_entries() {
        let toc = TableOfContents::Entries(vec![
            TocEntry {
                id: "events".to_owned(),
                name: "Events".to_owned(),
                sections: vec![section("render", "render")],
            },
            TocEntry {
                id: "api".to_owned(),
                name: "API".to_owned(),
                sections: Vec::new(),
            },
        ]);

        assert_eq!(
            table_of_contents(&toc),
            "<nav class=\"toc\">\n<ul>\n\
             <li><a href=\"#events\">Events</a><ul><li><a href=\"#render\">render</a></li></ul></li>\n\
             <li><a href=\"#api\">API</a></li>\n\
             </ul>\n</nav>"
        );
    }

    #[test]
    fn test_table_of_contents_sections() {
        let toc = TableOfContents::Sections(vec![section("intro", "Intro")]);
        assert_eq!(
            table_of_contents(&toc),
            "<nav class=\"toc\">\n<ul>\n<li><a href=\"#intro\">Intro</a></li>\n</ul>\n</nav>"
        );
    }

    #[test]
    fn test_anchor_escapes() {
        assert_eq!(
            anchor("a", "<script>"),
            "<a href=\"#a\">&lt;script&gt;</a>"
        );
    }

    #[test]
    fn test_document_escapes_title() {
        let html = document("a & b", "<nav></nav>", "<p>x</p>\n");
        assert!(html.contains("<title>a &amp; b</title>"));
        assert!(html.contains("<nav></nav>"));
        assert!(html.contains("<main>\n<p>x</p>\n</main>"));
    }
}
