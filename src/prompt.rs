//! Prompter implementations: interactive terminal prompts and unattended approval.

use crate::purge::Prompter;

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, MultiSelect};
use std::path::PathBuf;

/// Approves every candidate and every confirmation (`--yes`)
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApprove;

impl Prompter for AutoApprove {
    fn select_files(&mut self, candidates: &[PathBuf]) -> Result<Vec<usize>> {
        Ok((0..candidates.len()).collect())
    }

    fn confirm_files(&mut self, _selected: &[PathBuf]) -> Result<bool> {
        Ok(true)
    }

    fn confirm_directories(&mut self, _targets: &[PathBuf]) -> Result<bool> {
        Ok(true)
    }
}

/// Checkbox selection and yes/no confirmations on the terminal
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn select_files(&mut self, candidates: &[PathBuf]) -> Result<Vec<usize>> {
        let items: Vec<String> = candidates
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        let defaults = vec![true; items.len()];

        MultiSelect::with_theme(&self.theme)
            .with_prompt("Select files to delete (space to toggle, enter to accept)")
            .items(&items)
            .defaults(&defaults)
            .interact()
            .context("File selection prompt failed")
    }

    fn confirm_files(&mut self, selected: &[PathBuf]) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(format!("Delete {} selected file(s)?", selected.len()))
            .default(false)
            .interact()
            .context("Confirmation prompt failed")
    }

    fn confirm_directories(&mut self, targets: &[PathBuf]) -> Result<bool> {
        for target in targets {
            println!("  {}/", target.display());
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(format!(
                "Delete {} directory tree(s) left without files?",
                targets.len()
            ))
            .default(false)
            .interact()
            .context("Confirmation prompt failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_approve_selects_everything() {
        let candidates = vec![PathBuf::from("a.js"), PathBuf::from("b/c.js")];
        let mut prompter = AutoApprove;
        assert_eq!(prompter.select_files(&candidates).unwrap(), vec![0, 1]);
        assert!(prompter.confirm_files(&candidates).unwrap());
        assert!(prompter.confirm_directories(&[]).unwrap());
    }
}
