//! Document jobs and output path computation.
//!
//! Every discovered source document becomes one [`DocumentJob`]. The job
//! carries everything that can be derived from the path alone; timestamp and
//! front matter are resolved later by the [pipeline](crate::pipeline) because
//! they need the VCS and the file contents.
//!
//! ## Output Layout
//!
//! Outputs mirror the source tree under the output root, which defaults to
//! the parent of the source root:
//!
//! ```text
//! _adoc/v1.0/nn_socket.adoc          → v1.0/nn_socket.html
//! _adoc/gettingstarted/pipeline.adoc → gettingstarted/pipeline.html
//! _adoc/index.adoc                   → index.html
//! ```
//!
//! Paths are normalized lexically, the way Ruby's `Pathname#cleanpath` does:
//! `.` segments vanish and `..` cancels the preceding normal segment. No
//! filesystem access is involved, so output directories need not exist yet.

use crate::config::BuildConfig;
use crate::version;
use std::path::{Component, Path, PathBuf};

/// Extension of generated pages.
pub const OUTPUT_EXTENSION: &str = "html";

/// Source and output roots of a build.
///
/// All path computation goes through these two explicit bases; the process
/// working directory is never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
}

impl Layout {
    /// Layout with the output root resolved from the config
    /// (`output_root`, relative to `source_root`).
    pub fn new(source_root: &Path, config: &BuildConfig) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
            output_root: clean_path(&source_root.join(&config.output_root)),
        }
    }

    /// Output location of a document given relative to the source root.
    ///
    /// `v1.0/nn_socket.adoc` → `<output_root>/v1.0/nn_socket.html`
    pub fn output_path(&self, relative: &Path) -> PathBuf {
        let stem = relative.file_stem().unwrap_or(relative.as_os_str());
        let mut file_name = stem.to_os_string();
        file_name.push(".");
        file_name.push(OUTPUT_EXTENSION);

        let dir = relative.parent().unwrap_or(Path::new(""));
        clean_path(&self.output_root.join(dir).join(file_name))
    }
}

/// Lexically normalize a path.
///
/// - `a/./b` → `a/b`
/// - `a/b/../c` → `a/c`
/// - `_adoc/..` → `.`
/// - `../x` → `../x` (leading `..` is kept)
/// - `/..` → `/` (cannot go above the root)
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// One source document to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentJob {
    /// Path relative to the source root (as shown in progress output).
    pub relative_path: PathBuf,
    /// Path of the source document (`source_root/relative_path`).
    pub source_path: PathBuf,
    /// Where the generated page is written.
    pub output_path: PathBuf,
    /// Release version for manual pages, `None` for generic pages.
    pub version: Option<String>,
}

impl DocumentJob {
    pub fn new(layout: &Layout, relative: &Path) -> Self {
        Self {
            relative_path: relative.to_path_buf(),
            source_path: layout.source_root.join(relative),
            output_path: layout.output_path(relative),
            version: version::version_from_path(relative),
        }
    }

    pub fn is_versioned(&self) -> bool {
        self.version.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(root: &str) -> Layout {
        Layout::new(Path::new(root), &BuildConfig::default())
    }

    // =========================================================================
    // clean_path() tests
    // =========================================================================

    #[test]
    fn clean_removes_cur_dir() {
        assert_eq!(clean_path(Path::new("a/./b")), PathBuf::from("a/b"));
    }

    #[test]
    fn clean_collapses_parent_dir() {
        assert_eq!(clean_path(Path::new("a/b/../c")), PathBuf::from("a/c"));
    }

    #[test]
    fn clean_to_current_dir() {
        assert_eq!(clean_path(Path::new("_adoc/..")), PathBuf::from("."));
        assert_eq!(clean_path(Path::new("./.")), PathBuf::from("."));
    }

    #[test]
    fn clean_keeps_leading_parent_dir() {
        assert_eq!(clean_path(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(clean_path(Path::new("./../../x")), PathBuf::from("../../x"));
    }

    #[test]
    fn clean_stops_at_root() {
        assert_eq!(clean_path(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(clean_path(Path::new("/docs/../../x")), PathBuf::from("/x"));
    }

    // =========================================================================
    // Layout tests
    // =========================================================================

    #[test]
    fn output_root_is_parent_of_source_root() {
        assert_eq!(layout("site/_adoc").output_root, PathBuf::from("site"));
        assert_eq!(layout("_adoc").output_root, PathBuf::from("."));
        assert_eq!(layout(".").output_root, PathBuf::from(".."));
    }

    #[test]
    fn custom_output_root() {
        let config = BuildConfig {
            output_root: "../public".into(),
            ..Default::default()
        };
        let layout = Layout::new(Path::new("site/_adoc"), &config);
        assert_eq!(layout.output_root, PathBuf::from("site/public"));
    }

    #[test]
    fn output_path_mirrors_directory() {
        let layout = layout("site/_adoc");
        assert_eq!(
            layout.output_path(Path::new("v1.0/nn_socket.adoc")),
            PathBuf::from("site/v1.0/nn_socket.html")
        );
    }

    #[test]
    fn output_path_for_top_level_document() {
        let layout = layout("site/_adoc");
        assert_eq!(
            layout.output_path(Path::new("index.adoc")),
            PathBuf::from("site/index.html")
        );
    }

    #[test]
    fn output_path_strips_only_last_extension() {
        let layout = layout("_adoc");
        assert_eq!(
            layout.output_path(Path::new("guide/nn.env.adoc")),
            PathBuf::from("guide/nn.env.html")
        );
    }

    #[test]
    fn output_path_is_normalized() {
        let layout = layout("_adoc");
        assert_eq!(
            layout.output_path(Path::new("./guide/../intro.adoc")),
            PathBuf::from("intro.html")
        );
    }

    // =========================================================================
    // DocumentJob tests
    // =========================================================================

    #[test]
    fn versioned_job() {
        let job = DocumentJob::new(&layout("site/_adoc"), Path::new("v1.2.3/foo.adoc"));
        assert!(job.is_versioned());
        assert_eq!(job.version.as_deref(), Some("1.2.3"));
        assert_eq!(job.source_path, PathBuf::from("site/_adoc/v1.2.3/foo.adoc"));
        assert_eq!(job.output_path, PathBuf::from("site/v1.2.3/foo.html"));
    }

    #[test]
    fn generic_job() {
        let job = DocumentJob::new(&layout("site/_adoc"), Path::new("guide/intro.adoc"));
        assert!(!job.is_versioned());
        assert_eq!(job.version, None);
        assert_eq!(job.relative_path, PathBuf::from("guide/intro.adoc"));
        assert_eq!(job.output_path, PathBuf::from("site/guide/intro.html"));
    }
}
