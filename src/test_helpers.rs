//! Shared test utilities for the adoc-pages test suite.
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();            // <tmp>/_adoc/... from fixtures/
//! let layout = fixture_layout(&tmp);      // source <tmp>/_adoc, output <tmp>
//! // ... run the pipeline ...
//! let html = read_output(&tmp, "v1.0/nn_socket.html");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::{self, BuildConfig};
use crate::job::Layout;

/// Copy `fixtures/_adoc/` to `<tmp>/_adoc` and return the temp directory.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures. Outputs land directly in the temp directory.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/_adoc");
    let root = tmp.path().join("_adoc");
    std::fs::create_dir_all(&root).unwrap();
    copy_dir_recursive(&fixtures, &root).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Layout over the fixture copy, configured from its `config.toml`.
pub fn fixture_layout(tmp: &TempDir) -> Layout {
    let root = tmp.path().join("_adoc");
    let config = fixture_config(tmp);
    Layout::new(&root, &config)
}

/// Config loaded from the fixture copy. Panics on invalid config.
pub fn fixture_config(tmp: &TempDir) -> BuildConfig {
    config::load_config(&tmp.path().join("_adoc")).unwrap()
}

/// Read a generated page relative to the output root. Panics with the path
/// on a miss.
pub fn read_output(tmp: &TempDir, relative: &str) -> String {
    let path = tmp.path().join(relative);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("output '{}' not readable: {e}", path.display()))
}

#[test]
fn fixture_config_matches_defaults() {
    let tmp = setup_fixtures();
    assert_eq!(fixture_config(&tmp), BuildConfig::default());
}
