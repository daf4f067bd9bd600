//! Directory discovery, file collection and purge-candidate classification.

use crate::config::Config;
use crate::patterns::{is_excluded_dir, is_excluded_root, is_ignored_file, IgnoreRule};

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// VCS internal directories that are never traversed, whatever the rules say
pub const VCS_INTERNALS: &[&str] = &[
    ".git", ".jj", ".svn", ".hg", ".bzr", "_darcs", ".pijul", "CVS", ".fossil",
];

/// Directories found under a scan root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// False when a rule excludes the root itself
    pub root_included: bool,
    /// Root-relative paths in depth-first pre-order; the root itself is not listed
    pub directories: Vec<PathBuf>,
}

/// Output of a full discovery pass
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub directories: Vec<PathBuf>,
    /// Every file found, root-relative
    pub files: Vec<PathBuf>,
    /// Files eligible for purging, root-relative
    pub candidates: Vec<PathBuf>,
}

/// Walk `root` depth-first and list every directory not excluded by a directory rule.
///
/// An excluded directory is pruned together with its whole subtree. Siblings are
/// visited in file-name order. Any unreadable directory aborts the scan.
pub fn scan_directories(root: &Path, rules: &[IgnoreRule]) -> Result<ScanResult> {
    if is_excluded_root(root, rules) {
        info!("Scan root {} is excluded by the ignore list", root.display());
        return Ok(ScanResult {
            root_included: false,
            directories: Vec::new(),
        });
    }

    let root_meta = fs::metadata(root)
        .with_context(|| format!("Failed to read scan root {}", root.display()))?;
    if !root_meta.is_dir() {
        anyhow::bail!("Scan root {} is not a directory", root.display());
    }

    let root_buf = root.to_path_buf();
    let rules_clone = rules.to_vec();

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }

            let path = entry.path();

            // Never traverse VCS internals
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if VCS_INTERNALS.contains(&name) {
                    return false;
                }
            }

            let relative = path.strip_prefix(&root_buf).unwrap_or(path);
            if is_excluded_dir(relative, &rules_clone) {
                debug!("Skipping excluded directory: {}", relative.display());
                return false;
            }

            true
        })
        .build();

    let mut directories = Vec::new();

    for result in walker {
        let entry =
            result.with_context(|| format!("Failed to scan directory tree {}", root.display()))?;

        if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("{} escaped the scan root", entry.path().display()))?;
        directories.push(relative.to_path_buf());
    }

    debug!("Found {} directories under {}", directories.len(), root.display());

    Ok(ScanResult {
        root_included: true,
        directories,
    })
}

/// List the regular files directly inside the root (if included) and each scanned
/// directory, in directory order then file-name order. Symlinks are not collected.
pub fn collect_files(root: &Path, scan: &ScanResult) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let root_entry = scan.root_included.then(PathBuf::new);
    for dir in root_entry.iter().chain(scan.directories.iter()) {
        let absolute = root.join(dir);
        let entries = fs::read_dir(&absolute)
            .with_context(|| format!("Failed to read directory {}", absolute.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read entry in {}", absolute.display()))?;
            let file_type = entry.file_type().with_context(|| {
                format!("Failed to get file type of {}", entry.path().display())
            })?;
            if file_type.is_file() {
                names.push(entry.file_name());
            }
        }
        names.sort();

        files.extend(names.into_iter().map(|name| dir.join(name)));
    }

    Ok(files)
}

/// Filter collected files down to purge candidates: drop files matched by a file
/// rule, then keep only the given extensions (all files when `extensions` is empty).
pub fn classify_candidates(
    files: &[PathBuf],
    rules: &[IgnoreRule],
    extensions: &[String],
) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|file| {
            if is_ignored_file(file, rules) {
                debug!("Ignoring listed file: {}", file.display());
                return false;
            }
            has_wanted_extension(file, extensions)
        })
        .cloned()
        .collect()
}

fn has_wanted_extension(file: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    file.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

/// Run scanner, collector and classifier for `config.root`
pub fn discover(config: &Config, rules: &[IgnoreRule]) -> Result<Discovery> {
    let scan = scan_directories(&config.root, rules)?;
    let files = collect_files(&config.root, &scan)?;
    let mut candidates = classify_candidates(&files, rules, &config.extensions);
    // The ignore file itself is never offered
    candidates.retain(|file| config.resolve(file) != config.ignore_file);

    info!(
        "Discovered {} directories, {} files, {} candidates",
        scan.directories.len(),
        files.len(),
        candidates.len()
    );

    Ok(Discovery {
        directories: scan.directories,
        files,
        candidates,
    })
}
