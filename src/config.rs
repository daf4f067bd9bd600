//! Run configuration, built once at startup and passed to every stage.

use std::path::{Path, PathBuf};

/// File name of the per-project ignore list
pub const IGNORE_FILE_NAME: &str = ".jskillignore";

/// Subdirectory of the platform cache dir holding the parsed ignore list
const CACHE_DIR_NAME: &str = "jskill";

#[derive(Debug, Clone)]
pub struct Config {
    /// Project root every discovered path is relative to
    pub root: PathBuf,
    /// Ignore file location, `<root>/.jskillignore` unless overridden
    pub ignore_file: PathBuf,
    /// Where the raw ignore copy and its parsed rules are persisted
    pub cache_dir: PathBuf,
    /// When false the ignore file is re-parsed every run
    pub use_cache: bool,
    /// When false no ignore rules apply and the ignore file is not required
    pub apply_ignore: bool,
    /// Extensions (without the dot) a file must have to be a purge candidate.
    /// Empty means every collected file is a candidate.
    pub extensions: Vec<String>,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            ignore_file: root.join(IGNORE_FILE_NAME),
            root,
            cache_dir: default_cache_dir(),
            use_cache: true,
            apply_ignore: true,
            extensions: Vec::new(),
        }
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.into().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    /// Absolute path of a root-relative path
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }
}

/// `<platform cache dir>/jskill`, or `./jskill` where the platform has none
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CACHE_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_file_defaults_to_project_root() {
        let config = Config::new("/work/app");
        assert_eq!(config.ignore_file, Path::new("/work/app/.jskillignore"));
        assert!(config.use_cache);
        assert!(config.apply_ignore);
        assert!(config.extensions.is_empty());
    }

    #[test]
    fn test_extensions_are_normalized() {
        let config = Config::new(".").with_extensions([".js", "mjs", ""]);
        assert_eq!(config.extensions, vec!["js", "mjs"]);
    }

    #[test]
    fn test_default_cache_dir_ends_with_tool_name() {
        assert!(default_cache_dir().ends_with("jskill"));
    }
}
