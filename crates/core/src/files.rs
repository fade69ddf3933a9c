//! Small filesystem helpers shared by the staging area and the output root.

use std::path::{Path, PathBuf};

/// Case-insensitive extension check (`ext` has no leading dot).
pub(crate) fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Final path component as a lossy string.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lists regular files directly under `dir` whose extension matches `ext`, sorted by path.
///
/// A missing directory yields `Ok(None)` so callers can tell "never created"
/// apart from "created but empty".
pub(crate) async fn list_files_with_extension(
    dir: &Path,
    ext: &str,
) -> std::io::Result<Option<Vec<PathBuf>>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && has_extension(&path, ext) {
            files.push(path);
        }
    }
    files.sort();
    Ok(Some(files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_has_extension_ignores_case() {
        assert!(has_extension(Path::new("book.PDF"), "pdf"));
        assert!(has_extension(Path::new("dir/track.mp3"), "mp3"));
        assert!(!has_extension(Path::new("book.pdf.part"), "pdf"));
        assert!(!has_extension(Path::new("pdf"), "pdf"));
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_none() {
        let temp = TempDir::new().unwrap();
        let listed = list_files_with_extension(&temp.path().join("absent"), "mp3")
            .await
            .unwrap();
        assert!(listed.is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("b.mp3"), b"b").unwrap();
        std::fs::write(temp.path().join("a.MP3"), b"a").unwrap();
        std::fs::write(temp.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(temp.path().join("nested.mp3")).unwrap();

        let listed = list_files_with_extension(temp.path(), "mp3")
            .await
            .unwrap()
            .unwrap();
        let names: Vec<_> = listed
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.MP3", "b.mp3"]);
    }
}
