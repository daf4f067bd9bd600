//! Domain failures that callers may want to tell apart from plain I/O errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JskillError {
    /// The project has no ignore file and the run requires one.
    #[error("ignore file not found: {} (run `jskill init` to create one)", .0.display())]
    IgnoreFileNotFound(PathBuf),

    /// `init` refused to overwrite an existing ignore file.
    #[error("ignore file already exists: {} (use --force to overwrite)", .0.display())]
    IgnoreFileExists(PathBuf),
}
