//! Recursive discovery of candidate files under the project root.

use std::path::Path;

use walkdir::WalkDir;

use super::error::CoreError;

/// File-name suffixes that are never worth packing (images, archives).
/// Checked case-sensitively against the full file name, so `bundle.tar.gz`
/// is skipped via `.gz`.
const SKIPPED_SUFFIXES: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".webp", ".pdf", ".zip", ".7z", ".tar", ".gz", ".bz2",
];

/// Walks `root` recursively and returns every non-binary file as a
/// slash-normalized path relative to `root`, sorted lexicographically.
///
/// Unreadable entries are skipped, symlinks are not followed, and any entry
/// that cannot be made relative to the root is silently dropped. This is a
/// pure read; rescans regenerate the list wholesale.
pub fn discover_files(root: &Path) -> Result<Vec<String>, CoreError> {
    if !root.is_dir() {
        return Err(CoreError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if SKIPPED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        files.push(relative.to_string_lossy().replace('\\', "/"));
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn discovers_relative_sorted_paths() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.txt");
        write(dir.path(), "a.py");
        write(dir.path(), "src/main.rs");

        let files = discover_files(dir.path()).unwrap();
        assert_eq!(files, vec!["a.py", "b.txt", "src/main.rs"]);
    }

    #[test]
    fn skips_binary_suffixes() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.py");
        write(dir.path(), "b.png");
        write(dir.path(), "docs/photo.jpeg");
        write(dir.path(), "bundle.tar.gz");

        let files = discover_files(dir.path()).unwrap();
        assert_eq!(files, vec!["a.py"]);
    }

    #[test]
    fn walks_hidden_directories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".git/config");
        write(dir.path(), "a.py");

        let files = discover_files(dir.path()).unwrap();
        assert_eq!(files, vec![".git/config", "a.py"]);
    }

    #[test]
    fn rejects_non_directories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "file.txt");
        let err = discover_files(&dir.path().join("file.txt")).unwrap_err();
        assert!(matches!(err, CoreError::NotADirectory(_)));
        let err = discover_files(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, CoreError::NotADirectory(_)));
    }
}
