//! Persisted ignore rules, reused while the ignore file's bytes are unchanged.
//!
//! The cache directory holds two files: a raw copy of the last ignore file seen and
//! the rules parsed from it as JSON. On each run the current ignore file is compared
//! byte for byte with the raw copy; only a mismatch triggers a re-parse.

use crate::config::Config;
use crate::error::JskillError;
use crate::patterns::{parse_ignore_list, IgnoreRule};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const RAW_COPY_NAME: &str = ".jskillignore";
const PARSED_RULES_NAME: &str = ".jskillignore.json";

/// How a resolution obtained its rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// No cached copy existed; parsed and stored
    Created,
    /// Bytes matched the cached copy; stored rules returned without parsing
    Hit,
    /// Bytes differed from the cached copy; re-parsed and stored
    Refreshed,
    /// Caching disabled by the caller; parsed and stored regardless
    Bypassed,
    /// Ignore rules disabled; nothing read
    Disabled,
}

/// Rules for a run plus how they were obtained
#[derive(Debug, Clone)]
pub struct ResolvedRules {
    pub rules: Vec<IgnoreRule>,
    pub status: CacheStatus,
}

/// Handle on the cache directory
pub struct IgnoreCache {
    raw_path: PathBuf,
    rules_path: PathBuf,
}

impl IgnoreCache {
    /// Open the cache, creating its directory if needed
    pub fn open(cache_dir: &Path) -> Result<Self> {
        fs::create_dir_all(cache_dir).with_context(|| {
            format!("Failed to create cache directory {}", cache_dir.display())
        })?;

        Ok(Self {
            raw_path: cache_dir.join(RAW_COPY_NAME),
            rules_path: cache_dir.join(PARSED_RULES_NAME),
        })
    }

    pub fn raw_path(&self) -> &Path {
        &self.raw_path
    }

    pub fn rules_path(&self) -> &Path {
        &self.rules_path
    }

    /// Resolve the rules for `ignore_file`.
    ///
    /// Fails with [`JskillError::IgnoreFileNotFound`] if the file does not exist. With
    /// `use_cache == false` the file is always re-parsed, and the result still replaces
    /// the cached copy so the cache keeps tracking the last content seen.
    pub fn resolve(&self, ignore_file: &Path, use_cache: bool) -> Result<ResolvedRules> {
        if !ignore_file.is_file() {
            return Err(JskillError::IgnoreFileNotFound(ignore_file.to_path_buf()).into());
        }

        let current = fs::read(ignore_file)
            .with_context(|| format!("Failed to read ignore file {}", ignore_file.display()))?;

        if !use_cache {
            debug!("Cache bypassed, parsing {}", ignore_file.display());
            let rules = self.store(&current)?;
            return Ok(ResolvedRules {
                rules,
                status: CacheStatus::Bypassed,
            });
        }

        if !self.raw_path.exists() {
            debug!("No cached ignore copy, parsing {}", ignore_file.display());
            let rules = self.store(&current)?;
            return Ok(ResolvedRules {
                rules,
                status: CacheStatus::Created,
            });
        }

        let cached = fs::read(&self.raw_path).with_context(|| {
            format!("Failed to read cached ignore copy {}", self.raw_path.display())
        })?;

        if cached != current {
            debug!("Ignore file changed since last run, re-parsing");
            let rules = self.store(&current)?;
            return Ok(ResolvedRules {
                rules,
                status: CacheStatus::Refreshed,
            });
        }

        match self.load_rules() {
            Ok(rules) => {
                debug!("Ignore file unchanged, reusing {} cached rules", rules.len());
                Ok(ResolvedRules {
                    rules,
                    status: CacheStatus::Hit,
                })
            }
            Err(err) => {
                // Raw copy present but rules unreadable: rebuild both
                warn!("Discarding unreadable cached rules: {:#}", err);
                let rules = self.store(&current)?;
                Ok(ResolvedRules {
                    rules,
                    status: CacheStatus::Refreshed,
                })
            }
        }
    }

    fn load_rules(&self) -> Result<Vec<IgnoreRule>> {
        let json = fs::read_to_string(&self.rules_path).with_context(|| {
            format!("Failed to read cached rules {}", self.rules_path.display())
        })?;
        serde_json::from_str(&json).context("Failed to deserialize cached rules")
    }

    /// Parse `raw`, then overwrite the raw copy and the parsed rules
    fn store(&self, raw: &[u8]) -> Result<Vec<IgnoreRule>> {
        let text = String::from_utf8_lossy(raw);
        if let std::borrow::Cow::Owned(_) = text {
            warn!("Ignore file is not valid UTF-8; invalid bytes replaced before parsing");
        }
        let rules = parse_ignore_list(&text);

        let json = serde_json::to_string_pretty(&rules).context("Failed to serialize rules")?;
        fs::write(&self.rules_path, json).with_context(|| {
            format!("Failed to write cached rules {}", self.rules_path.display())
        })?;
        // Raw copy last: a crash in between leaves a mismatch and forces a re-parse
        fs::write(&self.raw_path, raw).with_context(|| {
            format!("Failed to write cached ignore copy {}", self.raw_path.display())
        })?;

        Ok(rules)
    }
}

/// Rules for a run as dictated by `config`: empty when ignore rules are disabled,
/// otherwise resolved through the cache.
pub fn load_rules(config: &Config) -> Result<ResolvedRules> {
    if !config.apply_ignore {
        info!("Ignore rules disabled, scanning everything");
        return Ok(ResolvedRules {
            rules: Vec::new(),
            status: CacheStatus::Disabled,
        });
    }

    let cache = IgnoreCache::open(&config.cache_dir)?;
    let resolved = cache.resolve(&config.ignore_file, config.use_cache)?;
    info!(
        "Loaded {} ignore rules ({:?})",
        resolved.rules.len(),
        resolved.status
    );
    Ok(resolved)
}
