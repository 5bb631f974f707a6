//! Frame file discovery.

use std::io;
use std::path::{Path, PathBuf};

/// List frame files in `dir` whose names start with `prefix` and end with
/// `suffix`.
///
/// The suffix comparison is case-insensitive since camera software writes
/// both `.fit` and `.FIT`. Results are sorted by filename so frame order is
/// stable for timelapse assembly.
pub fn find_frames<P: AsRef<Path>>(dir: P, prefix: &str, suffix: &str) -> io::Result<Vec<PathBuf>> {
    let suffix_lower = suffix.to_lowercase();
    let mut frames = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(prefix) && name.to_lowercase().ends_with(&suffix_lower) {
            frames.push(entry.path());
        }
    }

    frames.sort();
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_filters_by_prefix_and_suffix() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "allsky_0001.FIT");
        touch(dir.path(), "allsky_0002.fit");
        touch(dir.path(), "dark_0001.FIT");
        touch(dir.path(), "allsky_0003.png");

        let frames = find_frames(dir.path(), "allsky", ".FIT").unwrap();
        let names: Vec<_> = frames
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["allsky_0001.FIT", "allsky_0002.fit"]);
    }

    #[test]
    fn test_sorted_order() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "f_0003.fit");
        touch(dir.path(), "f_0001.fit");
        touch(dir.path(), "f_0002.fit");

        let frames = find_frames(dir.path(), "f_", ".fit").unwrap();
        let names: Vec<_> = frames
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["f_0001.fit", "f_0002.fit", "f_0003.fit"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        let frames = find_frames(dir.path(), "allsky", ".fit").unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn test_missing_directory_errors() {
        assert!(find_frames("no/such/dir", "a", ".fit").is_err());
    }
}
