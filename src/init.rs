//! `jskill init`: write the bundled ignore file into a project.

use crate::error::JskillError;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

// Embed the default ignore file directly in the binary at compile time
pub const DEFAULT_IGNORE: &str = include_str!("../config/.jskillignore");

/// Write [`DEFAULT_IGNORE`] to `ignore_file`. An existing file is only replaced when
/// `force` is set.
pub fn write_default_ignore(ignore_file: &Path, force: bool) -> Result<()> {
    if ignore_file.exists() && !force {
        return Err(JskillError::IgnoreFileExists(ignore_file.to_path_buf()).into());
    }

    fs::write(ignore_file, DEFAULT_IGNORE)
        .with_context(|| format!("Failed to write {}", ignore_file.display()))?;
    info!("Wrote default ignore file to {}", ignore_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{parse_ignore_list, IgnoreRule};
    use tempfile::tempdir;

    #[test]
    fn test_default_ignore_excludes_node_modules() {
        let rules = parse_ignore_list(DEFAULT_IGNORE);
        assert!(rules.contains(&IgnoreRule::directory("node_modules")));
    }

    #[test]
    fn test_init_writes_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join(".jskillignore");
        write_default_ignore(&target, false).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), DEFAULT_IGNORE);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let target = dir.path().join(".jskillignore");
        fs::write(&target, "custom/\n").unwrap();

        let err = write_default_ignore(&target, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<JskillError>(),
            Some(JskillError::IgnoreFileExists(_))
        ));
        assert_eq!(fs::read_to_string(&target).unwrap(), "custom/\n");
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempdir().unwrap();
        let target = dir.path().join(".jskillignore");
        fs::write(&target, "custom/\n").unwrap();

        write_default_ignore(&target, true).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), DEFAULT_IGNORE);
    }
}
