//! Output formatting and styling module.
//!
//! Renders sort and restore reports for the terminal, with colors, or as
//! JSON. The sorter and restorer never print; everything user-facing goes
//! through here.

use crate::restorer::{RestoreEntry, RestoreOutcome, RestoreReport};
use crate::sorter::{SortEntry, SortOutcome, SortReport};
use colored::*;
use serde::Serialize;
use std::path::Path;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Turns global coloring on or off.
    pub fn set_color(enabled: bool) {
        if enabled {
            colored::control::unset_override();
        } else {
            colored::control::set_override(false);
        }
    }

    /// Prints any report as pretty JSON.
    pub fn json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Formats one sort entry as a plain status line.
    ///
    /// ```
    /// use autosort::category::Category;
    /// use autosort::output::OutputFormatter;
    /// use autosort::sorter::{SortEntry, SortOutcome};
    /// use std::path::{Path, PathBuf};
    ///
    /// let entry = SortEntry {
    ///     source: PathBuf::from("/base/q3/survey.csv"),
    ///     outcome: SortOutcome::Planned {
    ///         category: Category::Quant,
    ///         destination: PathBuf::from("/base/Quantitative Analysis/survey.csv"),
    ///     },
    /// };
    /// assert_eq!(
    ///     OutputFormatter::sort_line(&entry, Path::new("/base")),
    ///     "[DRY] q3/survey.csv -> quant / survey.csv"
    /// );
    /// ```
    pub fn sort_line(entry: &SortEntry, base: &Path) -> String {
        let rel = relative(&entry.source, base);
        match &entry.outcome {
            SortOutcome::Skipped => format!("[SKIP] {}", rel),
            SortOutcome::Planned {
                category,
                destination,
            } => format!("[DRY] {} -> {} / {}", rel, category, file_name(destination)),
            SortOutcome::Moved {
                category,
                destination,
            } => format!("[OK ] {} -> {} / {}", rel, category, file_name(destination)),
            SortOutcome::Failed {
                category, error, ..
            } => format!("[FAIL] {} -> {}: {}", rel, category, error),
        }
    }

    /// Formats one restore entry as a plain status line.
    pub fn restore_line(entry: &RestoreEntry, base: &Path) -> String {
        let rel = relative(&entry.source, base);
        match &entry.outcome {
            RestoreOutcome::Planned { destination } => {
                format!("[DRY] {} -> {}", rel, file_name(destination))
            }
            RestoreOutcome::Restored { destination } => {
                format!("[OK ] {} -> {}", rel, file_name(destination))
            }
            RestoreOutcome::Failed { error, .. } => format!("[FAIL] {}: {}", rel, error),
        }
    }

    /// Summary lines for a sort run.
    pub fn sort_summary(report: &SortReport) -> Vec<String> {
        let mode = if report.dry_run {
            "DRY-RUN (no files moved)".to_string()
        } else {
            format!("EXECUTED (moved {} files)", report.moved())
        };

        let mut lines = vec![
            format!("- Total files scanned: {}", report.scanned()),
            format!("- Matched by name:     {}", report.matched()),
            format!("- Skipped (no match):  {}", report.skipped()),
        ];
        if report.failed() > 0 {
            lines.push(format!("- Failed to move:      {}", report.failed()));
        }
        lines.push(format!("- Mode:                {}", mode));
        lines.push(format!("- Base:                {}", report.base.display()));
        lines
    }

    /// Prints every entry of a sort report followed by the summary and a
    /// per-category table.
    pub fn print_sort_report(report: &SortReport) {
        for entry in &report.entries {
            let line = Self::sort_line(entry, &report.base);
            match entry.outcome {
                SortOutcome::Skipped => println!("{}", line.dimmed()),
                SortOutcome::Planned { .. } => println!("{}", line.yellow()),
                SortOutcome::Moved { .. } => println!("{}", line.green()),
                SortOutcome::Failed { .. } => eprintln!("{}", line.red()),
            }
        }

        Self::header("Summary");
        for line in Self::sort_summary(report) {
            println!("{}", line);
        }

        Self::category_table(&report.per_category());

        if report.failed() > 0 {
            Self::warning("Some files could not be moved. Please review errors above.");
        }
    }

    /// Prints every entry of a restore report followed by a one-line total.
    pub fn print_restore_report(report: &RestoreReport) {
        for entry in &report.entries {
            let line = Self::restore_line(entry, &report.base);
            match entry.outcome {
                RestoreOutcome::Planned { .. } => println!("{}", line.yellow()),
                RestoreOutcome::Restored { .. } => println!("{}", line.green()),
                RestoreOutcome::Failed { .. } => eprintln!("{}", line.red()),
            }
        }

        if report.dry_run {
            println!(
                "\n{}",
                format!(
                    "[DRY RUN] Would restore {} files back to base: {}",
                    report.planned(),
                    report.base.display()
                )
                .yellow()
            );
        } else {
            println!(
                "\nRestored {} files back to base: {}",
                report.restored().to_string().green().bold(),
                report.base.display()
            );
        }

        if !report.is_complete_success() {
            Self::warning(&format!("{} files could not be restored.", report.failed()));
        }
    }

    /// Prints a table of matched files per category.
    fn category_table(counts: &[(crate::category::Category, usize)]) {
        let width = counts
            .iter()
            .map(|(c, _)| c.key().len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!();
        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));
        for (category, count) in counts {
            let file_word = if *count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category.key(),
                count.to_string().green(),
                file_word,
                width = width
            );
        }
    }
}

fn relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
