//! Version-tag recognition for manual pages.
//!
//! Manual pages live in a directory named after the release they document:
//!
//! ```text
//! _adoc/
//! ├── v1.0/nn_socket.adoc      → manual page, version "1.0"
//! ├── v0.9-beta/nn_bind.adoc   → manual page, version "0.9-beta"
//! └── gettingstarted/bus.adoc  → generic page
//! ```
//!
//! A segment is a version tag when it is a `v` followed by at least one ASCII
//! digit; anything may follow the digits. Only the first segment of the path
//! relative to the source root is considered, and only when it names a
//! directory: a top-level `v2.adoc` is a generic page.

use std::path::{Component, Path};

/// Parse a single path segment as a version tag.
///
/// - `"v1.2.3"` → `Some("1.2.3")`
/// - `"v2"` → `Some("2")`
/// - `"v0.9-beta"` → `Some("0.9-beta")`
/// - `"v"` → `None`
/// - `"vx1"` → `None`
/// - `"guide"` → `None`
pub fn parse_version_tag(segment: &str) -> Option<&str> {
    let version = segment.strip_prefix('v')?;
    version
        .chars()
        .next()
        .filter(char::is_ascii_digit)
        .map(|_| version)
}

/// Version string of a document, from the first directory of its path
/// relative to the source root.
pub fn version_from_path(relative: &Path) -> Option<String> {
    let mut segments = relative.components().filter_map(|c| match c {
        Component::Normal(s) => Some(s),
        _ => None,
    });
    let first = segments.next()?;
    // The first segment must be a directory, not the document itself
    segments.next()?;
    parse_version_tag(first.to_str()?).map(String::from)
}
