//! Front-matter detection and synthesis.
//!
//! Jekyll only renders a file when it starts with a YAML front-matter block.
//! Each generated page gets one from the first source that applies:
//!
//! 1. **Existing block**: the source document already starts with
//!    `---\n ... \n---\n`. The block is copied verbatim, byte for byte.
//! 2. **Manual page**: the document is versioned. A minimal block is
//!    synthesized with the version and the configured layout.
//! 3. **Nothing**: the block is empty and the page is the converter output alone.
//!
//! The converter is always told to skip front matter itself
//! (`-a skip-front-matter`), so an existing block never leaks into the HTML body.

use once_cell::sync::Lazy;
use regex::Regex;

/// A line of `---`, anything (shortest match), a line of `---`, anchored at
/// the start of the document. An empty block (`---\n---\n`) also matches.
static FRONT_MATTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A---\n(?s:.*?\n)?---\n").expect("front matter regex is valid"));

/// Return the leading front-matter block of `content`, delimiters included.
pub fn extract(content: &str) -> Option<&str> {
    FRONT_MATTER.find(content).map(|m| m.as_str())
}

/// Build the minimal front-matter block for a manual page.
pub fn synthesize(version: &str, layout: &str) -> String {
    format!("---\nversion: {version}\nlayout: {layout}\n---\n")
}

/// Resolve the front matter for a document.
///
/// `version` is `Some` for manual pages. Returns an empty string when the
/// document has no block of its own and is not versioned.
pub fn resolve(content: &str, version: Option<&str>, layout: &str) -> String {
    match (extract(content), version) {
        (Some(existing), _) => existing.to_string(),
        (None, Some(version)) => synthesize(version, layout),
        (None, None) => String::new(),
    }
}
