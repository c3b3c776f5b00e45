//! Table of contents built from level-2 and level-3 headings.
//!
//! Level-2 headings become top-level entries and level-3 headings are nested
//! under the most recent level-2 heading. A README that carries its own
//! "Table of Contents" section wins: the result collapses to that section's
//! nested headings.

use crate::lexer::HeadingToken;
use crate::util::slugify;

/// Slug of the heading that marks a document-supplied table of contents.
const TABLE_OF_CONTENTS: &str = "table-of-contents";

/// A level-3 heading nested under a [`TocEntry`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TocSection {
    /// Anchor id.
    pub id: String,
    /// Heading text.
    pub name: String,
}

/// A level-2 heading with its nested level-3 headings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TocEntry {
    /// Anchor id.
    pub id: String,
    /// Heading text.
    pub name: String,
    /// Nested level-3 headings, in document order.
    pub sections: Vec<TocSection>,
}

/// Table of contents of a single document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum TableOfContents {
    /// Level-2 entries in document order, unique by id.
    Entries(Vec<TocEntry>),
    /// The nested headings of the document's own "Table of Contents" section.
    Sections(Vec<TocSection>),
}

impl TableOfContents {
    /// Number of top-level items.
    pub fn len(&self) -> usize {
        match self {
            Self::Entries(entries) => entries.len(),
            Self::Sections(sections) => sections.len(),
        }
    }

    /// Whether there is nothing to navigate to.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TableOfContents {
    fn default() -> Self {
        Self::Entries(Vec::new())
    }
}

/// Build the table of contents for a heading sequence.
///
/// Only depths 2 and 3 are considered. A level-2 id seen twice keeps the
/// position of its first occurrence but the value of its last, so sections
/// attached to the earlier heading are dropped. Level-3 headings seen before
/// any level-2 heading have no parent and are dropped.
pub fn build_toc(tokens: &[HeadingToken]) -> TableOfContents {
    let (mut entries, _parent) = tokens
        .iter()
        .filter(|token| matches!(token.depth, 2 | 3))
        .fold(
            (Vec::<TocEntry>::new(), None::<usize>),
            |(mut entries, parent), token| {
                let id = slugify(&token.text);
                let name = token.text.clone();

                if token.depth == 2 {
                    let entry = TocEntry {
                        id,
                        name,
                        sections: Vec::new(),
                    };
                    let position = match entries.iter().position(|e| e.id == entry.id) {
                        Some(position) => {
                            entries[position] = entry;
                            position
                        }
                        None => {
                            entries.push(entry);
                            entries.len() - 1
                        }
                    };
                    (entries, Some(position))
                } else {
                    if let Some(parent) = parent {
                        entries[parent].sections.push(TocSection { id, name });
                    }
                    (entries, parent)
                }
            },
        );

    match entries.iter().position(|e| e.id == TABLE_OF_CONTENTS) {
        Some(position) => TableOfContents::Sections(entries.swap_remove(position).sections),
        None => TableOfContents::Entries(entries),
    }
}
