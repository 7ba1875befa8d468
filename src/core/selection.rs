//! The include/exclude partition of discovered files.
//!
//! A file is hidden from the included list for one of two independent
//! reasons: a glob ignore pattern covers it, or the user excluded it by
//! exact path. The model keeps both reasons separate so that removing a
//! pattern can release files it covered, and keeps the ignore-pattern list
//! ordered and duplicate-tolerant so removal stays positional.

use std::collections::BTreeSet;
use std::path::Path;

use super::discovery::discover_files;
use super::error::CoreError;
use super::pattern::matches_any;

/// Directory and file names auto-added as ignore patterns when present
/// directly under the root. Kept sorted so auto-add order is deterministic.
pub const DEFAULT_IGNORED_NAMES: &[&str] = &[
    ".git",
    ".gitignore",
    ".hg",
    ".idea",
    ".svn",
    ".venv",
    ".vscode",
    "__pycache__",
    "build",
    "dist",
    "node_modules",
    "uv.lock",
];

#[derive(Debug, Default, Clone)]
pub struct SelectionModel {
    /// All discovered files, root-relative, slash-normalized, sorted.
    files: Vec<String>,
    /// Exact paths the user moved out of the included set.
    excluded: BTreeSet<String>,
    /// Ordered glob ignore patterns; duplicates allowed, removal positional.
    ignore_patterns: Vec<String>,
    /// Default names the user removed; suppresses auto re-addition only.
    defaults_optout: BTreeSet<String>,
}

impl SelectionModel {
    /// Restores a model from persisted lists.
    pub fn from_persisted(
        ignore_patterns: Vec<String>,
        defaults_optout: Vec<String>,
        excluded: Vec<String>,
    ) -> Self {
        Self {
            files: Vec::new(),
            excluded: excluded.into_iter().collect(),
            ignore_patterns,
            defaults_optout: defaults_optout.into_iter().collect(),
        }
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn ignore_patterns(&self) -> &[String] {
        &self.ignore_patterns
    }

    pub fn excluded(&self) -> &BTreeSet<String> {
        &self.excluded
    }

    pub fn defaults_optout(&self) -> &BTreeSet<String> {
        &self.defaults_optout
    }

    /// Full rediscovery for a newly chosen root: exact exclusions are
    /// cleared, then default ignores are auto-added for entries that exist.
    pub fn rescan(&mut self, root: &Path) -> Result<(), CoreError> {
        self.files = discover_files(root)?;
        self.excluded.clear();
        self.ensure_default_ignores(root);
        Ok(())
    }

    /// Light rediscovery after an option or pattern change: exclusions
    /// survive, the file list is regenerated wholesale.
    pub fn refresh(&mut self, root: &Path) -> Result<(), CoreError> {
        self.files = discover_files(root)?;
        self.ensure_default_ignores(root);
        Ok(())
    }

    /// The included list: discovered files minus ignored minus excluded,
    /// optionally narrowed by a case-insensitive substring filter.
    pub fn visible(&self, filter: &str) -> Vec<String> {
        let query = filter.trim().to_lowercase();
        self.files
            .iter()
            .filter(|path| !self.is_ignored(path.as_str()))
            .filter(|path| !self.excluded.contains(*path))
            .filter(|path| query.is_empty() || path.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    /// Exact exclusions shown to the user: sorted, minus any path a glob
    /// pattern already covers (one hide-reason on display at a time).
    pub fn displayed_exclusions(&self) -> Vec<String> {
        self.excluded
            .iter()
            .filter(|path| !self.is_ignored(path.as_str()))
            .cloned()
            .collect()
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        matches_any(path, &self.ignore_patterns)
    }

    pub fn exclude<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for path in paths {
            self.excluded.insert(path.into());
        }
    }

    pub fn include<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            self.excluded.remove(path.as_ref());
        }
    }

    /// Appends a pattern, duplicates included. A manual re-add of a default
    /// name also clears its opt-out, so auto-add works again later.
    /// Returns `false` for blank input.
    pub fn add_ignore(&mut self, raw: &str) -> bool {
        let pattern = raw.trim();
        if pattern.is_empty() {
            return false;
        }
        self.ignore_patterns.push(pattern.to_string());
        if DEFAULT_IGNORED_NAMES.contains(&pattern) {
            self.defaults_optout.remove(pattern);
        }
        true
    }

    /// Removes patterns by position and returns them in list order.
    ///
    /// Removed default names are opted out of future auto-adds. Exact
    /// exclusions that matched a removed pattern but match no remaining one
    /// are released back to visibility: exact exclusion and glob coverage
    /// are independent hide-reasons, and dropping the glob drops both.
    pub fn remove_ignore(&mut self, indices: &[usize]) -> Vec<String> {
        let mut order: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.ignore_patterns.len())
            .collect();
        order.sort_unstable();
        order.dedup();

        let removed: Vec<String> = order
            .iter()
            .map(|&i| self.ignore_patterns[i].clone())
            .collect();
        for &i in order.iter().rev() {
            self.ignore_patterns.remove(i);
        }

        let released: Vec<String> = self
            .excluded
            .iter()
            .filter(|path| {
                matches_any(path.as_str(), &removed)
                    && !matches_any(path.as_str(), &self.ignore_patterns)
            })
            .cloned()
            .collect();
        for path in &released {
            self.excluded.remove(path);
        }

        for pattern in &removed {
            if DEFAULT_IGNORED_NAMES.contains(&pattern.as_str()) {
                self.defaults_optout.insert(pattern.clone());
            }
        }
        removed
    }

    /// Auto-adds each default name that exists directly under `root`, is not
    /// already a pattern, and has not been opted out. Runs on every rescan;
    /// names already present are never duplicated.
    pub fn ensure_default_ignores(&mut self, root: &Path) -> Vec<String> {
        let mut added = Vec::new();
        for name in DEFAULT_IGNORED_NAMES {
            if !root.join(name).exists() {
                continue;
            }
            if self.ignore_patterns.iter().any(|p| p.as_str() == *name) {
                continue;
            }
            if self.defaults_optout.contains(*name) {
                continue;
            }
            self.ignore_patterns.push((*name).to_string());
            added.push((*name).to_string());
        }
        added
    }
}
