//! Restore: flatten the category folders back into the base directory.
//!
//! There is no history to replay. Every file currently inside a category
//! folder, at any depth, goes straight into the base directory under a
//! collision-free name, so subfolder structure inside a category is lost.

use crate::category::Category;
use crate::config::SortConfig;
use crate::mover::{move_file, unique_destination_with};
use crate::sorter::{SortError, resolve_base};
use crate::walker::files_under;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// What happened to one file during a restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RestoreOutcome {
    Planned { destination: PathBuf },
    Restored { destination: PathBuf },
    Failed { destination: PathBuf, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RestoreEntry {
    pub source: PathBuf,
    /// Category folder the file was found in.
    pub category: Category,
    #[serde(flatten)]
    pub outcome: RestoreOutcome,
}

/// Represents the result of a restore run.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreReport {
    pub base: PathBuf,
    pub dry_run: bool,
    pub entries: Vec<RestoreEntry>,
}

impl RestoreReport {
    /// Number of files moved back into the base directory.
    pub fn restored(&self) -> usize {
        self.count(|o| matches!(o, RestoreOutcome::Restored { .. }))
    }

    /// Number of files a dry run would move.
    pub fn planned(&self) -> usize {
        self.count(|o| matches!(o, RestoreOutcome::Planned { .. }))
    }

    /// Number of files that could not be moved.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RestoreOutcome::Failed { .. }))
    }

    /// Returns true if every file found was restored (or planned).
    pub fn is_complete_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&RestoreOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Moves everything out of the category folders and back into the base.
pub struct Restorer {
    config: SortConfig,
}

impl Restorer {
    pub fn new(config: &SortConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Runs one restore pass.
    ///
    /// Category folders that do not exist are ignored. A failed move is
    /// recorded and the run carries on.
    ///
    /// # Errors
    ///
    /// Returns `SortError::BaseNotFound` if the base directory is missing, or
    /// `SortError::Config` if a category folder is the base or contains it.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use autosort::config::SortConfig;
    /// use autosort::restorer::Restorer;
    ///
    /// let report = Restorer::new(&SortConfig::default()).run().unwrap();
    /// println!("Restored {} files", report.restored());
    /// ```
    pub fn run(&self) -> Result<RestoreReport, SortError> {
        let base = resolve_base(&self.config.base_dir())?;

        let mut sources = Vec::new();
        for rule in self.config.resolve_rules(&base)? {
            if !rule.destination.is_dir() {
                continue;
            }
            sources.extend(files_under(&rule.destination).map(|f| (rule.category, f)));
        }

        Ok(self.restore_files(base, sources))
    }

    /// Moves each file into `base`. A failure on one file does not stop the
    /// others.
    fn restore_files(&self, base: PathBuf, sources: Vec<(Category, PathBuf)>) -> RestoreReport {
        let mut report = RestoreReport {
            base,
            dry_run: self.config.dry_run,
            entries: Vec::new(),
        };
        let mut reserved = HashSet::new();

        for (category, source) in sources {
            let outcome = self.restore_file(&source, &report.base, &mut reserved);
            report.entries.push(RestoreEntry {
                source,
                category,
                outcome,
            });
        }

        report
    }

    fn restore_file(
        &self,
        source: &Path,
        base: &Path,
        reserved: &mut HashSet<PathBuf>,
    ) -> RestoreOutcome {
        let Some(file_name) = source.file_name() else {
            return RestoreOutcome::Failed {
                destination: base.to_path_buf(),
                error: "file has no name component".to_string(),
            };
        };

        let destination = unique_destination_with(base, file_name, reserved);

        if self.config.dry_run {
            reserved.insert(destination.clone());
            return RestoreOutcome::Planned { destination };
        }

        match move_file(source, &destination) {
            Ok(()) => RestoreOutcome::Restored { destination },
            Err(e) => RestoreOutcome::Failed {
                destination,
                error: e.to_string(),
            },
        }
    }
}
