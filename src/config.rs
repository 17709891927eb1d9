//! Sort configuration.
//!
//! This module loads the value object that drives a sort or restore run: the
//! base directory, the dry-run flag, the ordered category table and the skip
//! rules. Nothing here is process-wide; callers pass a `SortConfig` into the
//! sorter and restorer.
//!
//! # Configuration File Format
//!
//! Configuration is stored in TOML format. Every field is optional:
//!
//! ```toml
//! base_dir = "/home/me/research"
//! dry_run = false
//! skip_basenames = ["readme", "license", ".ds_store", "thumbs.db", "desktop.ini"]
//! exclude_patterns = ["old/**"]
//!
//! [[categories]]
//! category = "qual"
//! dir = "Qualitative Analysis"
//! keywords = ["interview", "transcript", "consent"]
//! ```
//!
//! Categories missing from the file keep their built-in folder and keywords.
//! The table is always ordered qual, quant, drafts, literature, additional,
//! whatever order the file uses.

use crate::category::{Category, CategoryRule};
use crate::walker::SkipRules;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".autosortrc.toml";

/// Basenames that are never classified.
pub const DEFAULT_SKIP_BASENAMES: &[&str] =
    &["readme", "license", ".ds_store", "thumbs.db", "desktop.ini"];

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlobPattern { pattern: String, reason: String },
    /// The same category appears more than once in the table.
    #[error("Category '{0}' is listed more than once")]
    DuplicateCategory(Category),
    /// Two categories share a destination directory.
    #[error("Categories '{first}' and '{second}' share the destination {}", .dir.display())]
    DuplicateDestination {
        first: Category,
        second: Category,
        dir: PathBuf,
    },
    /// A destination is the base directory itself or one of its parents.
    #[error("Destination of '{category}' contains the base directory: {}", .dir.display())]
    DestinationContainsBase { category: Category, dir: PathBuf },
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// One row of the category table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub category: Category,

    /// Destination folder, relative to the base directory or absolute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Ordered keyword list. Falls back to the built-in list when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

impl CategoryConfig {
    /// Row with the built-in folder and keywords for `category`.
    pub fn builtin(category: Category) -> Self {
        Self {
            category,
            dir: Some(PathBuf::from(category.default_dir_name())),
            keywords: Some(
                category
                    .default_keywords()
                    .iter()
                    .map(|k| k.to_string())
                    .collect(),
            ),
        }
    }

    fn dir_or_default(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.category.default_dir_name()))
    }
}

/// Configuration for a sort or restore run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// Directory to organize. `None` means the current directory.
    pub base_dir: Option<PathBuf>,

    /// Report planned moves without touching any file.
    pub dry_run: bool,

    /// Lowercased basenames that are never classified.
    pub skip_basenames: Vec<String>,

    /// Glob patterns, relative to the base directory, that are never classified.
    pub exclude_patterns: Vec<String>,

    /// Category table.
    pub categories: Vec<CategoryConfig>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            dry_run: false,
            skip_basenames: DEFAULT_SKIP_BASENAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude_patterns: Vec::new(),
            categories: Category::ALL
                .into_iter()
                .map(CategoryConfig::builtin)
                .collect(),
        }
    }
}

impl SortConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.autosortrc.toml` in the current directory
    /// 3. Look for `~/.config/autosort/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but cannot be read or
    /// validated, or if `config_path` points at a missing file.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("autosort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SortConfig =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.validate()
    }

    /// Checks the category table and glob patterns and returns the normalized
    /// configuration.
    ///
    /// Missing categories are filled from the built-in table, rows are put in
    /// declared category order, and skip basenames are lowercased. Folders are
    /// only checked once a base is known, see [`SortConfig::resolve_rules`].
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for row in &self.categories {
            if !seen.insert(row.category) {
                return Err(ConfigError::DuplicateCategory(row.category));
            }
        }

        for category in Category::ALL {
            if !seen.contains(&category) {
                self.categories.push(CategoryConfig::builtin(category));
            }
        }
        self.categories.sort_by_key(|row| row.category);

        for pattern in &self.exclude_patterns {
            Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlobPattern {
                pattern: pattern.clone(),
                reason: e.msg.to_string(),
            })?;
        }

        for name in &mut self.skip_basenames {
            *name = name.to_lowercase();
        }

        Ok(self)
    }

    /// The base directory, defaulting to the current directory.
    pub fn base_dir(&self) -> PathBuf {
        self.base_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolves the category table against `base`.
    ///
    /// Relative destinations are joined onto `base`; absolute ones are kept.
    pub fn category_rules(&self, base: &Path) -> Vec<CategoryRule> {
        self.categories
            .iter()
            .map(|row| CategoryRule {
                category: row.category,
                destination: base.join(row.dir_or_default()),
                keywords: row.keywords.clone().unwrap_or_else(|| {
                    row.category
                        .default_keywords()
                        .iter()
                        .map(|k| k.to_string())
                        .collect()
                }),
            })
            .collect()
    }

    /// Resolves the category table against the canonical `base` and checks
    /// the destinations.
    ///
    /// Existing destinations are canonicalized. A destination that is `base`
    /// or one of its ancestors is rejected, as are two categories sharing a
    /// folder.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DestinationContainsBase` or
    /// `ConfigError::DuplicateDestination`.
    pub fn resolve_rules(&self, base: &Path) -> Result<Vec<CategoryRule>, ConfigError> {
        let mut rules = self.category_rules(base);

        for rule in &mut rules {
            if let Ok(dir) = fs::canonicalize(&rule.destination) {
                rule.destination = dir;
            }
            if base.starts_with(&rule.destination) {
                return Err(ConfigError::DestinationContainsBase {
                    category: rule.category,
                    dir: rule.destination.clone(),
                });
            }
        }

        for (i, a) in rules.iter().enumerate() {
            if let Some(b) = rules[i + 1..].iter().find(|b| b.destination == a.destination) {
                return Err(ConfigError::DuplicateDestination {
                    first: a.category,
                    second: b.category,
                    dir: a.destination.clone(),
                });
            }
        }

        Ok(rules)
    }

    /// Compiles the skip basenames and exclude patterns.
    pub fn skip_rules(&self) -> Result<SkipRules, ConfigError> {
        SkipRules::new(&self.skip_basenames, &self.exclude_patterns)
    }
}
