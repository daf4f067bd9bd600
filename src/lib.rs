//! jskill - remove compiled JavaScript output from a project tree
//!
//! A run resolves the project's `.jskillignore` into rules (reusing a cached parse while
//! the file is byte-identical), walks the tree pruning ignored directories, collects the
//! files that remain, and lets the user pick which to delete. Directories left without
//! any file afterwards are offered for removal as one collapsed tree each.
//!
//! ## Pipeline
//!
//! - [`patterns`]: ignore-list parsing and rule matching
//! - [`cache`]: reuse vs. re-parse decision for the ignore list
//! - [`scanner`]: directory walk, file collection, candidate classification
//! - [`tree`]: tree view of the candidates
//! - [`purge`]: selection, confirmation and deletion, then emptied-directory cleanup

pub mod cache;
pub mod config;
pub mod error;
pub mod init;
pub mod patterns;
pub mod prompt;
pub mod purge;
pub mod scanner;
pub mod tree;

// Re-export commonly used items
pub use cache::{load_rules, CacheStatus, IgnoreCache, ResolvedRules};
pub use config::{Config, IGNORE_FILE_NAME};
pub use error::JskillError;
pub use init::write_default_ignore;
pub use patterns::{parse_ignore_list, IgnoreRule, RuleKind};
pub use prompt::{AutoApprove, TerminalPrompter};
pub use purge::{find_empty_directories, Prompter, PurgeOutcome, PurgeReport, Purger};
pub use scanner::{classify_candidates, collect_files, discover, scan_directories, Discovery};
pub use tree::{render, FileTreeNode};
