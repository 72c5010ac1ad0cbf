//! # adoc-pages
//!
//! Renders a tree of AsciiDoc documents into HTML pages with YAML front
//! matter, ready for Jekyll. The heavy lifting is done by `asciidoctor`;
//! this crate decides what to convert, where the result goes, and what header
//! each page carries.
//!
//! # Pipeline
//!
//! ```text
//! _adoc/                          site root (output)
//! ├── index.adoc           →      index.html
//! ├── gettingstarted/
//! │   └── pipeline.adoc    →      gettingstarted/pipeline.html
//! └── v1.0/
//!     └── nn_socket.adoc   →      v1.0/nn_socket.html   (manual page)
//! ```
//!
//! For every document: look up the last commit time, resolve the front
//! matter, write it, then append the converter's HTML. Documents are
//! independent; one failure never stops the others.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Plans jobs and runs them in sequence, collecting a [`pipeline::BuildReport`] |
//! | [`discover`] | Recursive document discovery and single-target resolution |
//! | [`job`] | `DocumentJob`, output path mapping, lexical path cleaning |
//! | [`version`] | `v<digits>...` directory recognition for manual pages |
//! | [`front_matter`] | Existing-block detection and manual-page block synthesis |
//! | [`backend`] | [`backend::DocBackend`] trait and the subprocess-backed implementation |
//! | [`config`] | Optional `config.toml` in the source root |
//! | [`output`] | CLI output formatting |
//!
//! # Reproducible Output
//!
//! `asciidoctor` stamps pages with the current time unless `SOURCE_DATE_EPOCH`
//! is set. Each document gets its own last-commit time from git, so
//! rebuilding an unchanged tree produces byte-identical pages and the site
//! repository only sees real changes. A document without history is still
//! converted, just without the pin.

pub mod backend;
pub mod config;
pub mod discover;
pub mod front_matter;
pub mod job;
pub mod output;
pub mod pipeline;
pub mod version;

#[cfg(test)]
pub(crate) mod test_helpers;
