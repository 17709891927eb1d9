//! Recursive discovery of files to classify.

use crate::category::stem_lower;
use crate::config::ConfigError;
use glob::Pattern;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files that are never classified, whatever their name contains.
#[derive(Debug, Clone, Default)]
pub struct SkipRules {
    basenames: HashSet<String>,
    patterns: Vec<Pattern>,
}

impl SkipRules {
    /// Compiles the skip set and glob patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob pattern is invalid.
    pub fn new<S: AsRef<str>>(basenames: &[S], patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|e| ConfigError::InvalidGlobPattern {
                    pattern: p.as_ref().to_string(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            basenames: basenames
                .iter()
                .map(|b| b.as_ref().to_lowercase())
                .collect(),
            patterns,
        })
    }

    /// Check whether a file must be left alone.
    ///
    /// The extension-stripped basename and the full filename are both looked
    /// up, lowercased, in the skip set. Glob patterns match against
    /// `relative`, the path below the base directory.
    pub fn is_skipped(&self, path: &Path, relative: &Path) -> bool {
        if self.basenames.contains(&stem_lower(path)) {
            return true;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if self.basenames.contains(&file_name) {
            return true;
        }

        self.patterns.iter().any(|p| p.matches_path(relative))
    }
}

/// True if `path` equals or is nested under any of `dirs`.
///
/// Containment is checked per path component, so `Drafts and Reports 2` is
/// not inside `Drafts and Reports`.
pub fn is_within(path: &Path, dirs: &[PathBuf]) -> bool {
    dirs.iter().any(|dir| path.starts_with(dir))
}

/// Lazily lists the regular files under `root` that are up for classification.
///
/// Directories equal to or nested under `excluded_dirs` are not descended
/// into. Symlinks are not followed and unreadable entries are dropped.
/// Entries come out sorted by file name within each directory.
/// `root` and `excluded_dirs` should be in the same form (both canonical, or
/// both built from the same base) for the exclusion to apply.
pub fn candidate_files<'a>(
    root: &'a Path,
    excluded_dirs: &'a [PathBuf],
    skip: &'a SkipRules,
) -> impl Iterator<Item = PathBuf> + 'a {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            !(entry.file_type().is_dir() && is_within(entry.path(), excluded_dirs))
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(move |path| {
            let relative = path.strip_prefix(root).unwrap_or(path.as_path());
            !skip.is_skipped(path, relative)
        })
}

/// Lists every regular file below `dir`, recursively.
pub fn files_under(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
}
