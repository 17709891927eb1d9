//! Sorting files into category folders.
//!
//! A run walks the base directory, classifies every candidate by name and
//! moves matches into the category's destination folder. The result is a
//! [`SortReport`]; rendering it is left to the caller.

use crate::category::{Category, Classifier};
use crate::config::{ConfigError, SortConfig};
use crate::mover::{move_file, unique_destination_with};
use crate::walker::{SkipRules, candidate_files};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop a sort or restore run before any file is touched.
#[derive(Debug, Error)]
pub enum SortError {
    /// The base directory is missing or is not a directory.
    #[error("Base directory not found: {}", .0.display())]
    BaseNotFound(PathBuf),
    /// A category destination could not be created.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The configuration could not be compiled.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SortOutcome {
    /// No keyword matched; the file was left in place.
    Skipped,
    /// Dry run: the file would be moved to `destination`.
    Planned {
        category: Category,
        destination: PathBuf,
    },
    /// The file was moved to `destination`.
    Moved {
        category: Category,
        destination: PathBuf,
    },
    /// The move failed; the file is still at its source.
    Failed {
        category: Category,
        destination: PathBuf,
        error: String,
    },
}

impl SortOutcome {
    /// The category the file matched, if any.
    pub fn category(&self) -> Option<Category> {
        match self {
            SortOutcome::Skipped => None,
            SortOutcome::Planned { category, .. }
            | SortOutcome::Moved { category, .. }
            | SortOutcome::Failed { category, .. } => Some(*category),
        }
    }
}

/// One scanned file and its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct SortEntry {
    pub source: PathBuf,
    #[serde(flatten)]
    pub outcome: SortOutcome,
}

/// Result of a sort run.
#[derive(Debug, Clone, Serialize)]
pub struct SortReport {
    /// Canonical base directory that was scanned.
    pub base: PathBuf,
    pub dry_run: bool,
    /// Every scanned file, in walk order.
    pub entries: Vec<SortEntry>,
}

impl SortReport {
    fn new(base: PathBuf, dry_run: bool) -> Self {
        Self {
            base,
            dry_run,
            entries: Vec::new(),
        }
    }

    /// Total files scanned.
    pub fn scanned(&self) -> usize {
        self.entries.len()
    }

    /// Files whose name matched a category.
    pub fn matched(&self) -> usize {
        self.count(|o| o.category().is_some())
    }

    /// Files left in place because nothing matched.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, SortOutcome::Skipped))
    }

    /// Files actually moved.
    pub fn moved(&self) -> usize {
        self.count(|o| matches!(o, SortOutcome::Moved { .. }))
    }

    /// Files that matched but could not be moved.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SortOutcome::Failed { .. }))
    }

    /// Matched files per category, in category order.
    pub fn per_category(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .into_iter()
            .map(|c| (c, self.count(|o| o.category() == Some(c))))
            .collect()
    }

    fn count(&self, pred: impl Fn(&SortOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Resolves the base directory to a canonical path.
pub(crate) fn resolve_base(base: &Path) -> Result<PathBuf, SortError> {
    match fs::canonicalize(base) {
        Ok(path) if path.is_dir() => Ok(path),
        _ => Err(SortError::BaseNotFound(base.to_path_buf())),
    }
}

/// Classifies and moves files under a base directory.
pub struct Sorter {
    config: SortConfig,
    classifier: Classifier,
    skip: SkipRules,
}

impl Sorter {
    /// Prepares a sorter from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `SortError::Config` if the skip patterns do not compile.
    pub fn new(config: &SortConfig) -> Result<Self, SortError> {
        let rules = config.category_rules(&config.base_dir());
        Ok(Self {
            config: config.clone(),
            classifier: Classifier::from_rules(&rules),
            skip: config.skip_rules()?,
        })
    }

    /// Runs one sorting pass.
    ///
    /// This function:
    /// 1. Checks that the base directory exists
    /// 2. Creates any missing destination directories (also in dry-run)
    /// 3. Walks the base, pruning the destination directories
    /// 4. Classifies each file by name, first match wins
    /// 5. Moves each match under a collision-free name, or plans it in dry-run
    ///
    /// A failed move is recorded in the report and the run carries on.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use autosort::config::SortConfig;
    /// use autosort::sorter::Sorter;
    ///
    /// let config = SortConfig::load(None).unwrap();
    /// let report = Sorter::new(&config).unwrap().run().unwrap();
    /// println!("moved {} of {} files", report.moved(), report.scanned());
    /// ```
    pub fn run(&self) -> Result<SortReport, SortError> {
        let base = resolve_base(&self.config.base_dir())?;

        let mut destinations = Vec::new();
        for rule in self.config.resolve_rules(&base)? {
            fs::create_dir_all(&rule.destination).map_err(|e| {
                SortError::DirectoryCreationFailed {
                    path: rule.destination.clone(),
                    source: e,
                }
            })?;
            let dir = fs::canonicalize(&rule.destination).unwrap_or(rule.destination);
            destinations.push((rule.category, dir));
        }

        let excluded: Vec<PathBuf> = destinations.iter().map(|(_, d)| d.clone()).collect();
        let candidates: Vec<PathBuf> = candidate_files(&base, &excluded, &self.skip).collect();

        Ok(self.sort_files(base, &destinations, candidates))
    }

    /// Classifies and relocates `candidates` one by one. A failure on one file
    /// does not stop the others.
    fn sort_files(
        &self,
        base: PathBuf,
        destinations: &[(Category, PathBuf)],
        candidates: Vec<PathBuf>,
    ) -> SortReport {
        let mut report = SortReport::new(base, self.config.dry_run);
        let mut reserved = HashSet::new();

        for source in candidates {
            let outcome = match self.classifier.classify_path(&source) {
                None => SortOutcome::Skipped,
                Some(category) => match destinations.iter().find(|(c, _)| *c == category) {
                    Some((_, dir)) => self.relocate(&source, category, dir, &mut reserved),
                    None => SortOutcome::Failed {
                        category,
                        destination: PathBuf::new(),
                        error: format!("no destination folder for '{}'", category),
                    },
                },
            };
            report.entries.push(SortEntry { source, outcome });
        }

        report
    }

    fn relocate(
        &self,
        source: &Path,
        category: Category,
        dir: &Path,
        reserved: &mut HashSet<PathBuf>,
    ) -> SortOutcome {
        let Some(file_name) = source.file_name() else {
            return SortOutcome::Failed {
                category,
                destination: dir.to_path_buf(),
                error: "file has no name component".to_string(),
            };
        };

        let destination = unique_destination_with(dir, file_name, reserved);

        if self.config.dry_run {
            reserved.insert(destination.clone());
            return SortOutcome::Planned {
                category,
                destination,
            };
        }

        match move_file(source, &destination) {
            Ok(()) => SortOutcome::Moved {
                category,
                destination,
            },
            Err(e) => SortOutcome::Failed {
                category,
                destination,
                error: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(base: &Path, dry_run: bool) -> SortConfig {
        SortConfig {
            base_dir: Some(base.to_path_buf()),
            dry_run,
            ..SortConfig::default()
        }
    }

    fn run(base: &Path, dry_run: bool) -> SortReport {
        Sorter::new(&config_for(base, dry_run))
            .expect("Failed to build sorter")
            .run()
            .expect("Sort failed")
    }

    #[test]
    fn test_missing_base_fails_fast() {
        let config = config_for(Path::new("/non/existent/path"), false);
        let result = Sorter::new(&config).unwrap().run();
        assert!(matches!(result, Err(SortError::BaseNotFound(_))));
    }

    #[test]
    fn test_base_that_is_a_file_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let result = Sorter::new(&config_for(&file, false)).unwrap().run();
        assert!(matches!(result, Err(SortError::BaseNotFound(_))));
    }

    #[test]
    fn test_creates_all_destinations() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let report = run(temp_dir.path(), false);

        assert_eq!(report.scanned(), 0);
        for category in Category::ALL {
            assert!(temp_dir.path().join(category.default_dir_name()).is_dir());
        }
    }

    #[test]
    fn test_moves_matches_and_skips_the_rest() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("Interview_Transcript_03.docx"), "q").unwrap();
        fs::write(base.join("holiday.jpg"), "h").unwrap();

        let report = run(base, false);

        assert_eq!(report.scanned(), 2);
        assert_eq!(report.matched(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.moved(), 1);
        assert!(
            base.join("Qualitative Analysis/Interview_Transcript_03.docx")
                .exists()
        );
        assert!(base.join("holiday.jpg").exists());
    }

    #[test]
    fn test_dry_run_plans_collisions() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir_all(base.join("a")).unwrap();
        fs::create_dir_all(base.join("b")).unwrap();
        fs::write(base.join("a/chart.png"), "1").unwrap();
        fs::write(base.join("b/chart.png"), "2").unwrap();

        let report = run(base, true);

        let planned: Vec<_> = report
            .entries
            .iter()
            .filter_map(|e| match &e.outcome {
                SortOutcome::Planned { destination, .. } => destination
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        assert_eq!(planned, vec!["chart.png", "chart(1).png"]);
        assert_eq!(report.moved(), 0);
        assert!(base.join("a/chart.png").exists());
        assert!(base.join("b/chart.png").exists());
    }

    #[test]
    fn test_per_category_counts() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("survey.csv"), "").unwrap();
        fs::write(base.join("chart.png"), "").unwrap();
        fs::write(base.join("poster.pdf"), "").unwrap();

        let report = run(base, true);
        let counts = report.per_category();
        assert_eq!(counts[0], (Category::Qual, 0));
        assert_eq!(counts[1], (Category::Quant, 2));
        assert_eq!(counts[4], (Category::Additional, 1));
    }

    #[test]
    fn test_failed_move_does_not_stop_the_run() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        let quant = base.join("Quantitative Analysis");
        fs::create_dir_all(&quant).unwrap();
        fs::write(base.join("survey.csv"), "s").unwrap();

        let sorter = Sorter::new(&config_for(base, false)).unwrap();
        let candidates = vec![base.join("deleted_data.csv"), base.join("survey.csv")];
        let report = sorter.sort_files(
            base.to_path_buf(),
            &[(Category::Quant, quant.clone())],
            candidates,
        );

        assert_eq!(report.scanned(), 2);
        assert!(matches!(
            &report.entries[0].outcome,
            SortOutcome::Failed {
                category: Category::Quant,
                ..
            }
        ));
        assert_eq!(
            report.entries[1].outcome,
            SortOutcome::Moved {
                category: Category::Quant,
                destination: quant.join("survey.csv"),
            }
        );
        assert_eq!(report.failed(), 1);
        assert_eq!(report.moved(), 1);
    }

    #[test]
    fn test_category_without_destination_fails_instead_of_renaming() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("survey.csv"), "s").unwrap();

        let sorter = Sorter::new(&config_for(base, false)).unwrap();
        let report = sorter.sort_files(base.to_path_buf(), &[], vec![base.join("survey.csv")]);

        assert_eq!(report.failed(), 1);
        assert!(base.join("survey.csv").exists());
        assert!(!base.join("survey(1).csv").exists());
    }

    #[test]
    fn test_base_as_destination_is_fatal() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("survey.csv"), "s").unwrap();

        let config = SortConfig::from_toml_str(
            "[[categories]]\ncategory = \"quant\"\ndir = \".\"\n",
        )
        .unwrap();
        let config = SortConfig {
            base_dir: Some(base.to_path_buf()),
            ..config
        };

        let result = Sorter::new(&config).unwrap().run();
        assert!(matches!(
            result,
            Err(SortError::Config(ConfigError::DestinationContainsBase { .. }))
        ));
        assert!(base.join("survey.csv").exists());
        assert!(!base.join("survey(1).csv").exists());
    }

    #[test]
    fn test_second_run_leaves_sorted_files_alone() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("draft_v2.docx"), "").unwrap();

        let first = run(base, false);
        assert_eq!(first.moved(), 1);

        let second = run(base, false);
        assert_eq!(second.scanned(), 0);
        assert!(base.join("Drafts and Reports/draft_v2.docx").exists());
    }
}
