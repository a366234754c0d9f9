//! [`TestPlugins`] fixture: a temporary directory standing in for the host's
//! plugins folder.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary plugins directory with helpers for creating extension
/// sources and asserting on what the host wrote.
///
/// # Example
///
/// ```rust,no_run
/// use exthost_test_utils::TestPlugins;
///
/// let plugins = TestPlugins::new();
/// let source = plugins.add_source("admin.ext");
/// assert!(source.exists());
/// plugins.assert_not_exists("Admin");
/// ```
pub struct TestPlugins {
    temp_dir: TempDir,
}

impl Default for TestPlugins {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPlugins {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("TestPlugins::new: failed to create temp dir"),
        }
    }

    /// Root of the plugins directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` under the root (nothing is created).
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Create an empty extension source file at `relative`, with parents.
    pub fn add_source(&self, relative: &str) -> PathBuf {
        self.write(relative, "")
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("Could not create {}: {e}", parent.display()));
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {e}", path.display()));
        path
    }

    /// The absolute path of `relative` spelled with backslash separators,
    /// the way a Windows host hands paths over.
    pub fn windows_style(&self, relative: &str) -> String {
        self.path(relative).to_string_lossy().replace('/', "\\")
    }

    /// Assert that `relative` exists and is a directory.
    ///
    /// # Panics
    /// Panics with a descriptive message otherwise.
    pub fn assert_dir_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(path.is_dir(), "Expected directory to exist: {}", path.display());
    }

    /// Assert that `relative` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_not_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(!path.exists(), "Expected path NOT to exist: {}", path.display());
    }

    /// Assert that the file at `relative` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        let file_content = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path.display(),
            content,
            file_content
        );
    }
}
