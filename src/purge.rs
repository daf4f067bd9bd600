//! Select → confirm → delete files → collapse and delete emptied directories.
//!
//! Deletion is best-effort: a file that cannot be removed is reported and skipped,
//! and the run still completes successfully. Callers that need strict behavior must
//! inspect [`PurgeReport::failed`]. Nothing outside the user's selection is ever
//! removed, and a directory is only removed when its whole subtree holds no file.

use crate::scanner::Discovery;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Source of the user's decisions at each gate of a purge
pub trait Prompter {
    /// Indices into `candidates` the user approved. Everything is preselected.
    fn select_files(&mut self, candidates: &[PathBuf]) -> Result<Vec<usize>>;

    /// Final yes/no before the selected files are deleted
    fn confirm_files(&mut self, selected: &[PathBuf]) -> Result<bool>;

    /// Yes/no before emptied directories are deleted
    fn confirm_directories(&mut self, targets: &[PathBuf]) -> Result<bool>;
}

/// Where a purge run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// Discovery found no candidates
    NothingToPurge,
    /// The user deselected everything
    NothingSelected,
    /// The user declined deleting the selected files
    FilesDeclined,
    /// Files were deleted; the user declined deleting emptied directories
    DirectoriesDeclined,
    /// Nothing deleted; report shows what would have been
    DryRun,
    Completed,
}

impl PurgeOutcome {
    /// True when the run ended at a user decision rather than by finishing
    pub fn is_abort(self) -> bool {
        matches!(
            self,
            PurgeOutcome::NothingSelected
                | PurgeOutcome::FilesDeclined
                | PurgeOutcome::DirectoriesDeclined
        )
    }
}

/// A path that could not be removed, with the cause
#[derive(Debug)]
pub struct FailedRemoval {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Result of deleting a batch of paths
#[derive(Debug, Default)]
pub struct Deletion {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<FailedRemoval>,
    pub removed_bytes: u64,
}

#[derive(Debug)]
pub struct PurgeReport {
    pub outcome: PurgeOutcome,
    /// Files the user approved, root-relative
    pub selected: Vec<PathBuf>,
    pub removed_files: Vec<PathBuf>,
    pub failed: Vec<FailedRemoval>,
    pub removed_bytes: u64,
    /// Collapsed directory targets proposed after the file pass
    pub empty_directories: Vec<PathBuf>,
    pub removed_directories: Vec<PathBuf>,
}

impl PurgeReport {
    fn new(outcome: PurgeOutcome) -> Self {
        Self {
            outcome,
            selected: Vec::new(),
            removed_files: Vec::new(),
            failed: Vec::new(),
            removed_bytes: 0,
            empty_directories: Vec::new(),
            removed_directories: Vec::new(),
        }
    }
}

/// Drives a purge of discovered candidates under `root`
pub struct Purger<'a> {
    root: &'a Path,
    dry_run: bool,
}

impl<'a> Purger<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self {
            root,
            dry_run: false,
        }
    }

    /// Stop after selection and report what would be removed
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(&self, discovery: &Discovery, prompter: &mut dyn Prompter) -> Result<PurgeReport> {
        let candidates = &discovery.candidates;
        if candidates.is_empty() {
            info!("No purge candidates");
            return Ok(PurgeReport::new(PurgeOutcome::NothingToPurge));
        }

        let indices = prompter.select_files(candidates)?;
        let selected = select(candidates, indices);
        if selected.is_empty() {
            info!("Empty selection, nothing to do");
            return Ok(PurgeReport::new(PurgeOutcome::NothingSelected));
        }
        debug!("{} of {} candidates selected", selected.len(), candidates.len());

        if self.dry_run {
            let pending: HashSet<PathBuf> = selected.iter().cloned().collect();
            let mut report = PurgeReport::new(PurgeOutcome::DryRun);
            report.empty_directories =
                find_empty_directories(self.root, &discovery.directories, &pending)?;
            report.selected = selected;
            return Ok(report);
        }

        if !prompter.confirm_files(&selected)? {
            info!("File deletion declined");
            let mut report = PurgeReport::new(PurgeOutcome::FilesDeclined);
            report.selected = selected;
            return Ok(report);
        }

        let deletion = delete_files(self.root, &selected);
        info!(
            "Removed {} files, {} failures",
            deletion.removed.len(),
            deletion.failed.len()
        );

        let mut report = PurgeReport::new(PurgeOutcome::Completed);
        report.selected = selected;
        report.removed_files = deletion.removed;
        report.failed = deletion.failed;
        report.removed_bytes = deletion.removed_bytes;

        report.empty_directories =
            find_empty_directories(self.root, &discovery.directories, &HashSet::new())?;
        if report.empty_directories.is_empty() {
            return Ok(report);
        }

        if !prompter.confirm_directories(&report.empty_directories)? {
            info!("Directory deletion declined");
            report.outcome = PurgeOutcome::DirectoriesDeclined;
            return Ok(report);
        }

        let dirs = delete_directories(self.root, &report.empty_directories);
        report.removed_directories = dirs.removed;
        report.failed.extend(dirs.failed);
        Ok(report)
    }
}

/// Map selected indices back to candidates, in candidate order, ignoring
/// duplicates and out-of-range indices
fn select(candidates: &[PathBuf], indices: Vec<usize>) -> Vec<PathBuf> {
    let chosen: HashSet<usize> = indices.into_iter().collect();
    candidates
        .iter()
        .enumerate()
        .filter(|(i, _)| chosen.contains(i))
        .map(|(_, path)| path.clone())
        .collect()
}

/// Remove each root-relative file independently. Failures are recorded, never fatal.
pub fn delete_files(root: &Path, files: &[PathBuf]) -> Deletion {
    let mut deletion = Deletion::default();

    for file in files {
        let absolute = root.join(file);
        let size = fs::symlink_metadata(&absolute).map(|m| m.len()).unwrap_or(0);

        match fs::remove_file(&absolute) {
            Ok(()) => {
                debug!("Removed: {}", file.display());
                deletion.removed_bytes += size;
                deletion.removed.push(file.clone());
            }
            Err(error) => {
                warn!("Error removing {}: {}. Skipping.", file.display(), error);
                deletion.failed.push(FailedRemoval {
                    path: file.clone(),
                    error,
                });
            }
        }
    }

    deletion
}

/// Recursively remove each root-relative directory. Failures are recorded, never fatal.
pub fn delete_directories(root: &Path, directories: &[PathBuf]) -> Deletion {
    let mut deletion = Deletion::default();

    for dir in directories {
        match fs::remove_dir_all(root.join(dir)) {
            Ok(()) => {
                debug!("Removed directory: {}", dir.display());
                deletion.removed.push(dir.clone());
            }
            Err(error) => {
                warn!("Error removing directory {}: {}. Skipping.", dir.display(), error);
                deletion.failed.push(FailedRemoval {
                    path: dir.clone(),
                    error,
                });
            }
        }
    }

    deletion
}

/// Directories from `directories` that hold no files, each collapsed upward into
/// the highest ancestor that would also hold none.
///
/// Files listed in `pending` (root-relative) are treated as already gone, which lets
/// a dry run preview the result. Any non-directory entry anywhere in a subtree,
/// including files under ignored directories, keeps that directory. The root is
/// never a target, and targets nested in another target are dropped.
pub fn find_empty_directories(
    root: &Path,
    directories: &[PathBuf],
    pending: &HashSet<PathBuf>,
) -> Result<Vec<PathBuf>> {
    let mut targets: Vec<PathBuf> = Vec::new();

    for dir in directories {
        if targets.iter().any(|target| dir.starts_with(target)) {
            continue;
        }
        if !root.join(dir).is_dir() || !is_file_free(root, dir, pending)? {
            continue;
        }

        let mut target = dir.clone();
        while let Some(parent) = target.parent() {
            if parent.as_os_str().is_empty() || !is_file_free(root, parent, pending)? {
                break;
            }
            target = parent.to_path_buf();
        }

        if target != *dir {
            debug!("Collapsed {} into {}", dir.display(), target.display());
        }
        targets.retain(|existing| !existing.starts_with(&target));
        targets.push(target);
    }

    Ok(targets)
}

/// True when no non-directory entry outside `pending` lives under `dir`
fn is_file_free(root: &Path, dir: &Path, pending: &HashSet<PathBuf>) -> Result<bool> {
    let absolute = root.join(dir);

    for entry in WalkDir::new(&absolute).min_depth(1).follow_links(false) {
        let entry =
            entry.with_context(|| format!("Failed to inspect directory {}", absolute.display()))?;
        if entry.file_type().is_dir() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or_else(|_| entry.path());
        if !pending.contains(relative) {
            return Ok(false);
        }
    }

    Ok(true)
}
