//! README section removal for docpipe.
//!
//! Package READMEs carry sections that make no sense on the documentation
//! site (license boilerplate, installation notes, a hand-written table of
//! contents). [`remove_sections`] drops whole sections by matching heading
//! text, leaving everything else in its original order.
//!
//! A section runs from its heading line up to, but not including, the next
//! heading line of *any* depth. Link reference definitions (`[name]: url`)
//! inside a removed section are kept so that references elsewhere in the
//! document keep resolving.
//!
//! # Example
//!
//! ```
//! use docpipe_sections::remove_sections;
//!
//! let lines = ["# A", "x", "## B", "y", "# C", "z"];
//! assert_eq!(remove_sections(&lines, &["b"]), ["# A", "x", "# C", "z"]);
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Matches `[identifier]:` at the very start of a line.
static LINK_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[[A-Za-z0-9_]+\]:").expect("invalid link reference regex")
});

/// Remove every section whose heading contains one of `sections`.
///
/// Matching is case-insensitive and by substring, so `"license"` catches
/// `## License (MIT)`. Lines surviving the removal keep their relative order.
pub fn remove_sections<'a, S: AsRef<str>>(lines: &[&'a str], sections: &[S]) -> Vec<&'a str> {
    let index = heading_index(lines);
    let mut removed = vec![false; lines.len()];

    for section in sections {
        let section = section.as_ref().to_lowercase();

        for (position, (heading, start)) in index.iter().enumerate() {
            if !heading.contains(&section) {
                continue;
            }

            let end = index
                .get(position + 1)
                .map_or(lines.len(), |(_, line)| *line);

            for line in *start..end {
                if !LINK_REFERENCE.is_match(lines[line]) {
                    removed[line] = true;
                }
            }
        }
    }

    lines
        .iter()
        .zip(removed)
        .filter_map(|(line, removed)| (!removed).then_some(*line))
        .collect()
}

/// Remove sections from a whole document, splitting and re-joining on `\n`.
pub fn remove_sections_from<S: AsRef<str>>(content: &str, sections: &[S]) -> String {
    if sections.is_empty() {
        return content.to_owned();
    }

    let lines: Vec<&str> = content.split('\n').collect();
    remove_sections(&lines, sections).join("\n")
}

/// Catalog heading lines as `(lowercased trimmed text, line number)`.
///
/// Keyed by heading text in first-seen order: a repeated heading keeps the
/// position of its first occurrence and the line number of its last. Any
/// line starting with `#` after trimming counts, including lines inside
/// fenced code blocks.
fn heading_index(lines: &[&str]) -> Vec<(String, usize)> {
    let mut index: Vec<(String, usize)> = Vec::new();

    for (number, line) in lines.iter().enumerate() {
        let line = line.trim();
        if !line.starts_with('#') {
            continue;
        }

        let key = line.to_lowercase();
        match index.iter_mut().find(|(heading, _)| *heading == key) {
            Some(entry) => entry.1 = number,
            None => index.push((key, number)),
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remove_nested_section() {
        let lines = ["# A", "x", "## B", "y", "# C", "z"];
        assert_eq!(remove_sections(&lines, &["b"]), ["# A", "x", "# C", "z"]);
    }

    #[test]
    fn test_remove_keeps_link_references() {
        let lines = [
            "# Intro",
            "See [docs][docs].",
            "## License",
            "MIT, see [LICENSE][license].",
            "[license]: https://example.com/LICENSE",
            "[docs]: https://example.com/docs",
            "## Next",
            "more",
        ];

        assert_eq!(
            remove_sections(&lines, &["license"]),
            [
                "# Intro",
                "See [docs][docs].",
                "[license]: https://example.com/LICENSE",
                "[docs]: https://example.com/docs",
                "## Next",
                "more",
            ]
        );
    }

    #[test]
    fn test_link_reference_must_be_word_identifier() {
        let lines = ["## License", "[pipe-js]: https://example.com", "[pipe_js]: x"];
        assert_eq!(remove_sections(&lines, &["license"]), ["[pipe_js]: x"]);
    }

    #[test]
    fn test_indented_link_reference_is_removed() {
        let lines = ["## License", "  [mit]: https://example.com"];
        assert!(remove_sections(&lines, &["license"]).is_empty());
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let lines = ["# Title", "## LICENSE (MIT)", "text", "## Usage", "use it"];
        assert_eq!(
            remove_sections(&lines, &["License"]),
            ["# Title", "## Usage", "use it"]
        );
    }

    #[test]
    fn test_last_section_runs_to_end() {
        let lines = ["# Title", "intro", "## License", "MIT", "", "Copyright"];
        assert_eq!(remove_sections(&lines, &["license"]), ["# Title", "intro"]);
    }

    #[test]
    fn test_deeper_heading_ends_section() {
        let lines = ["## Testing", "run it", "### Coverage", "cov", "## API", "api"];
        assert_eq!(
            remove_sections(&lines, &["testing"]),
            ["### Coverage", "cov", "## API", "api"]
        );
    }

    #[test]
    fn test_multiple_targets() {
        let lines = [
            "# pagelet",
            "intro",
            "## Installation",
            "npm install",
            "## Usage",
            "use",
            "## License",
            "MIT",
        ];
        assert_eq!(
            remove_sections(&lines, &["installation", "license", "table of contents"]),
            ["# pagelet", "intro", "## Usage", "use"]
        );
    }

    #[test]
    fn test_one_target_matches_several_headings() {
        let lines = ["## Test", "a", "## Testing", "b", "## Keep", "c"];
        assert_eq!(remove_sections(&lines, &["test"]), ["## Keep", "c"]);
    }

    #[test]
    fn test_repeated_heading_takes_last_line() {
        // "## usage" is indexed first but points at its second occurrence,
        // so "## license" is the last key and runs to the end
        let lines = ["## Usage", "a", "## License", "b", "## Usage", "c"];
        assert_eq!(remove_sections(&lines, &["license"]), ["## Usage", "a"]);
    }

    #[test]
    fn test_repeated_heading_keeps_first_position() {
        // The "## example" range starts at line 4 and ends at "## other" on
        // line 2, which is empty
        let lines = ["## Example", "a", "## Other", "b", "## Example", "c"];
        assert_eq!(remove_sections(&lines, &["example"]), lines);
    }

    #[test]
    fn test_heading_index_repeated_key() {
        let lines = ["## Usage", "a", "## License", "## Usage"];
        assert_eq!(
            heading_index(&lines),
            [("## usage".to_owned(), 3), ("## license".to_owned(), 2)]
        );
    }

    #[test]
    fn test_no_match_returns_input() {
        let lines = ["# A", "x", "## B", "y"];
        assert_eq!(remove_sections(&lines, &["missing"]), lines);
    }

    #[test]
    fn test_indented_heading_is_indexed() {
        let lines = ["# A", "   ## Drop me", "gone", "# B"];
        assert_eq!(remove_sections(&lines, &["drop"]), ["# A", "# B"]);
    }

    #[test]
    fn test_survivors_keep_order() {
        let lines = ["1", "## x", "2", "[a]: b", "3", "## y", "4", "5"];
        let result = remove_sections(&lines, &["x"]);

        let positions: Vec<usize> = result
            .iter()
            .map(|kept| lines.iter().position(|line| line == kept).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(result, ["1", "[a]: b", "## y", "4", "5"]);
    }

    #[test]
    fn test_remove_sections_from_content() {
        let content = "# bigpipe\n\nIntro.\n\n## Testing\n\nnpm test\n\n## License\n\nMIT\n";
        assert_eq!(
            remove_sections_from(content, &["testing", "license"]),
            "# bigpipe\n\nIntro.\n"
        );
    }

    #[test]
    fn test_remove_sections_from_without_targets() {
        let content = "# A\r\nline\r\n";
        assert_eq!(remove_sections_from::<&str>(content, &[]), content);
    }
}
