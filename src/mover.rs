//! Collision-safe file moves.
//!
//! A move never overwrites an existing file. When the wanted name is taken,
//! an incrementing counter is put between the stem and the extension:
//! `chart.png`, `chart(1).png`, `chart(2).png`, and so on.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while moving a single file.
#[derive(Debug, Error)]
pub enum MoveError {
    /// The destination appeared before the move could happen.
    #[error("refusing to overwrite existing file {}", .0.display())]
    DestinationExists(PathBuf),
    /// The filesystem rejected the move.
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Returns a path in `dir` named `file_name`, or the first free `stem(n).ext`.
///
/// # Examples
///
/// ```no_run
/// use autosort::mover::unique_destination;
/// use std::ffi::OsStr;
/// use std::path::Path;
///
/// // with quant/chart.png already present
/// let dest = unique_destination(Path::new("quant"), OsStr::new("chart.png"));
/// assert_eq!(dest, Path::new("quant/chart(1).png"));
/// ```
pub fn unique_destination(dir: &Path, file_name: &OsStr) -> PathBuf {
    unique_destination_with(dir, file_name, &HashSet::new())
}

/// Like [`unique_destination`], but names in `reserved` count as taken too.
///
/// Dry runs use this so that planned moves collide with each other the same
/// way real moves would.
pub fn unique_destination_with(
    dir: &Path,
    file_name: &OsStr,
    reserved: &HashSet<PathBuf>,
) -> PathBuf {
    let taken = |p: &Path| p.exists() || reserved.contains(p);

    let candidate = dir.join(file_name);
    if !taken(&candidate) {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name.file_stem().unwrap_or(file_name);
    let extension = name.extension();

    let mut n: u32 = 1;
    loop {
        let candidate = dir.join(numbered_name(stem, extension, n));
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn numbered_name(stem: &OsStr, extension: Option<&OsStr>, n: u32) -> OsString {
    let mut name = stem.to_os_string();
    name.push(format!("({})", n));
    if let Some(ext) = extension {
        name.push(".");
        name.push(ext);
    }
    name
}

/// Moves `from` to `to`, which must not exist yet.
///
/// Uses a rename. When source and destination are on different filesystems
/// the file is copied and the source removed only after the copy succeeded.
pub fn move_file(from: &Path, to: &Path) -> Result<(), MoveError> {
    if to.exists() {
        return Err(MoveError::DestinationExists(to.to_path_buf()));
    }

    let io_err = |source| MoveError::Io {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            if let Err(e) = fs::copy(from, to) {
                let _ = fs::remove_file(to);
                return Err(io_err(e));
            }
            fs::remove_file(from).map_err(io_err)
        }
        Err(e) => Err(io_err(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unique_destination_free_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = unique_destination(temp_dir.path(), OsStr::new("chart.png"));
        assert_eq!(dest, temp_dir.path().join("chart.png"));
    }

    #[test]
    fn test_unique_destination_counts_up() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        fs::write(dir.join("chart.png"), "a").unwrap();
        fs::write(dir.join("chart(1).png"), "b").unwrap();

        let dest = unique_destination(dir, OsStr::new("chart.png"));
        assert_eq!(dest, dir.join("chart(2).png"));
    }

    #[test]
    fn test_unique_destination_without_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        fs::write(dir.join("notes"), "a").unwrap();

        let dest = unique_destination(dir, OsStr::new("notes"));
        assert_eq!(dest, dir.join("notes(1)"));
    }

    #[test]
    fn test_unique_destination_multiple_dots() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        fs::write(dir.join("data.tar.gz"), "a").unwrap();

        let dest = unique_destination(dir, OsStr::new("data.tar.gz"));
        assert_eq!(dest, dir.join("data.tar(1).gz"));
    }

    #[test]
    fn test_unique_destination_respects_reserved() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        let mut reserved = HashSet::new();
        reserved.insert(dir.join("chart.png"));

        let dest = unique_destination_with(dir, OsStr::new("chart.png"), &reserved);
        assert_eq!(dest, dir.join("chart(1).png"));
    }

    #[test]
    fn test_move_to_unique_destination_on_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        let target = base.join("quant");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("chart.png"), "first").unwrap();

        let src = base.join("chart.png");
        fs::write(&src, "second").unwrap();

        let dest = unique_destination(&target, OsStr::new("chart.png"));
        move_file(&src, &dest).expect("Failed to move file");
        assert_eq!(dest, target.join("chart(1).png"));
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(target.join("chart.png")).unwrap(), "first");
        assert_eq!(fs::read_to_string(&dest).unwrap(), "second");
    }

    #[test]
    fn test_move_file_refuses_to_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.txt"), "a").unwrap();
        fs::write(base.join("b.txt"), "b").unwrap();

        let result = move_file(&base.join("a.txt"), &base.join("b.txt"));
        assert!(matches!(result, Err(MoveError::DestinationExists(_))));
        assert_eq!(fs::read_to_string(base.join("b.txt")).unwrap(), "b");
    }

    #[test]
    fn test_move_missing_source_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let result = move_file(&base.join("ghost.txt"), &base.join("moved.txt"));
        assert!(matches!(result, Err(MoveError::Io { .. })));
    }
}
