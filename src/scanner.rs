//! Recursive directory traversal for eligible video files

use crate::classify::is_video_file;
use crate::output::OutputMode;
use colored::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walk every root depth-first and collect the absolute paths of video files.
///
/// Handles errors gracefully: an unreadable directory is logged as a warning
/// and its subtree skipped, siblings and the remaining roots still get
/// scanned. The walk is iterative internally, so traversal depth is not
/// bounded by the call stack. Symlinks are not followed.
///
/// Result order is discovery order, which follows the platform's directory
/// listing order; callers must not rely on it beyond a single run.
pub fn scan_roots(roots: &[PathBuf], mode: OutputMode) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for root in roots {
        scan_root(root, mode, &mut found);
    }
    found
}

fn scan_root(root: &Path, mode: OutputMode, found: &mut Vec<PathBuf>) {
    for entry in WalkDir::new(root).follow_links(false) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file()
                    && is_video_file(&entry.file_name().to_string_lossy())
                {
                    found.push(entry.path().to_path_buf());
                }
            }
            Err(err) => {
                // Permission denied, directory removed mid-scan, etc.
                // The subtree is skipped; the scan itself keeps going.
                if mode != OutputMode::Quiet {
                    let location = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());
                    eprintln!(
                        "{} could not read {}: {}",
                        "Warning:".yellow(),
                        location,
                        err
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_scan_picks_only_video_files() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.mp4"));
        touch(&dir.path().join("b.txt"));
        touch(&dir.path().join("c.MKV"));

        let mut found = scan_roots(&[dir.path().to_path_buf()], OutputMode::Quiet);
        found.sort();

        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mp4", "c.MKV"]);
    }

    #[test]
    fn test_scan_recurses_into_subdirectories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("season1").join("disc2");
        fs::create_dir_all(&nested).unwrap();
        touch(&dir.path().join("top.avi"));
        touch(&nested.join("deep.webm"));

        let found = scan_roots(&[dir.path().to_path_buf()], OutputMode::Quiet);
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|p| p.ends_with("deep.webm")));
    }

    #[test]
    fn test_scan_multiple_roots_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        touch(&first.path().join("one.mp4"));
        touch(&second.path().join("two.mp4"));

        let found = scan_roots(
            &[first.path().to_path_buf(), second.path().to_path_buf()],
            OutputMode::Quiet,
        );
        assert_eq!(found.len(), 2);
        // Roots are visited in the order given
        assert!(found[0].ends_with("one.mp4"));
        assert!(found[1].ends_with("two.mp4"));
    }

    #[test]
    fn test_missing_root_does_not_abort_scan() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("kept.mp4"));

        let found = scan_roots(
            &[
                PathBuf::from("/definitely/not/a/real/root"),
                dir.path().to_path_buf(),
            ],
            OutputMode::Quiet,
        );
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("kept.mp4"));
    }

    #[test]
    fn test_empty_directory_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let found = scan_roots(&[dir.path().to_path_buf()], OutputMode::Quiet);
        assert!(found.is_empty());
    }
}
