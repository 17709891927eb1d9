//! autosort - sort research files into category folders by name
//!
//! This library walks a base directory, classifies each file into one of five
//! fixed categories by keyword substrings in its name, and moves matches into
//! the category folders with collision-safe renaming. A restore pass flattens
//! those folders back into the base directory. Both passes return structured
//! reports; rendering is done by the `output` module.

pub mod category;
pub mod cli;
pub mod config;
pub mod mover;
pub mod output;
pub mod restorer;
pub mod sorter;
pub mod walker;

pub use category::{Category, CategoryRule, Classifier};
pub use config::{ConfigError, SortConfig};
pub use mover::MoveError;
pub use restorer::{RestoreReport, Restorer};
pub use sorter::{SortError, SortReport, Sorter};

pub use cli::{Cli, SortCommand, run_cli_with_config};
