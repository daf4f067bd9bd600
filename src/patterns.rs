//! Ignore-list parsing and rule matching for `.jskillignore`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path};

/// Whether a rule names a file (or path prefix) or a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    #[serde(rename = "file")]
    File,
    #[serde(rename = "dir")]
    Directory,
}

/// A single entry from the ignore file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IgnoreRule {
    /// Literal path with any trailing separator stripped
    pub path: String,
    #[serde(rename = "type")]
    pub kind: RuleKind,
}

impl IgnoreRule {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: RuleKind::File,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: RuleKind::Directory,
        }
    }
}

/// Parse raw ignore-file text into rules.
///
/// Everything from the first `#` on a line is a comment. Lines are trimmed and blank
/// lines dropped; duplicates collapse to their first occurrence. A trailing `/` makes
/// the rule a directory rule. Any input is valid.
pub fn parse_ignore_list(raw: &str) -> Vec<IgnoreRule> {
    let mut seen_lines = HashSet::new();
    let mut seen_rules = HashSet::new();
    let mut rules = Vec::new();

    for line in raw.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() || !seen_lines.insert(line) {
            continue;
        }

        let rule = if line.ends_with('/') {
            IgnoreRule::directory(line.trim_end_matches('/'))
        } else {
            IgnoreRule::file(line)
        };

        // A lone "/" names nothing
        if rule.path.is_empty() {
            continue;
        }

        if seen_rules.insert(rule.clone()) {
            rules.push(rule);
        }
    }

    rules
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Check whether a directory is excluded by any directory rule.
///
/// A bare rule (`build`) matches a directory with that name at any depth. A rule
/// containing a separator (`src/gen`) matches only the directory at that relative path.
pub fn is_excluded_dir(relative: &Path, rules: &[IgnoreRule]) -> bool {
    let name = relative
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    rules
        .iter()
        .filter(|rule| rule.kind == RuleKind::Directory)
        .any(|rule| {
            if rule.path.contains('/') {
                path_equals(relative, &rule.path)
            } else {
                name == rule.path.as_str()
            }
        })
}

/// Check whether the scan root itself is excluded.
/// Only an explicit directory rule equal to `.` or to the root path as given does this.
pub fn is_excluded_root(root: &Path, rules: &[IgnoreRule]) -> bool {
    let root_str = root.to_string_lossy();
    let root_str = root_str.trim_end_matches('/');

    rules
        .iter()
        .filter(|rule| rule.kind == RuleKind::Directory)
        .any(|rule| rule.path == "." || rule.path == root_str)
}

/// Check whether a file is excluded by any file rule.
///
/// Matching is literal: the rule equals the file's relative path, equals its bare
/// name, or is a leading run of whole path components.
pub fn is_ignored_file(relative: &Path, rules: &[IgnoreRule]) -> bool {
    let filename = relative
        .file_name()
        .map(|f| f.to_string_lossy())
        .unwrap_or_default();

    rules
        .iter()
        .filter(|rule| rule.kind == RuleKind::File)
        .any(|rule| filename == rule.path.as_str() || starts_with_components(relative, &rule.path))
}

/// Normal components of a path as strings; `.` and root markers are skipped
fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| {
            if let Component::Normal(os_str) = c {
                Some(os_str.to_string_lossy().to_string())
            } else {
                None
            }
        })
        .collect()
}

fn rule_components(rule_path: &str) -> Vec<&str> {
    rule_path
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect()
}

fn path_equals(path: &Path, rule_path: &str) -> bool {
    let rule_parts = rule_components(rule_path);
    let path_parts = normal_components(path);
    !rule_parts.is_empty() && path_parts == rule_parts
}

fn starts_with_components(path: &Path, rule_path: &str) -> bool {
    let rule_parts = rule_components(rule_path);
    let path_parts = normal_components(path);

    if rule_parts.is_empty() || path_parts.len() < rule_parts.len() {
        return false;
    }

    path_parts
        .iter()
        .zip(rule_parts.iter())
        .all(|(component, part)| component == part)
}
