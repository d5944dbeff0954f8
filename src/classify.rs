//! Video file classification by extension allow-list

use std::path::Path;

/// Extensions recognized as video files (lower-case, with leading dot)
pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".m4v", ".webm", ".ogv",
];

/// Check whether a file name has a recognized video extension.
///
/// Case-insensitive; never fails. Files without an extension are rejected.
pub fn is_video_file(name: &str) -> bool {
    let ext = normalized_extension(name);
    !ext.is_empty() && VIDEO_EXTENSIONS.contains(&ext.as_str())
}

/// Lower-cased extension including the leading dot, or an empty string
/// if the name has no extension.
pub fn normalized_extension(name: &str) -> String {
    match Path::new(name).extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy().to_lowercase()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_known_extensions() {
        assert!(is_video_file("movie.mp4"));
        assert!(is_video_file("clip.webm"));
        assert!(is_video_file("show.m4v"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_video_file("MOVIE.MP4"));
        assert!(is_video_file("c.MKV"));
    }

    #[test]
    fn test_rejects_other_files() {
        assert!(!is_video_file("notes.txt"));
        assert!(!is_video_file("archive.tar.gz"));
        assert!(!is_video_file("mp4"));
        assert!(!is_video_file(""));
    }

    #[test]
    fn test_no_extension() {
        assert!(!is_video_file("Makefile"));
        assert_eq!(normalized_extension("Makefile"), "");
    }

    #[test]
    fn test_normalized_extension() {
        assert_eq!(normalized_extension("a.MP4"), ".mp4");
        assert_eq!(normalized_extension("b.txt"), ".txt");
        assert_eq!(normalized_extension("dir.name/file.MkV"), ".mkv");
    }
}
