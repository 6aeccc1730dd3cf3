//! File operations for sheet stores
//!
//! Reading/writing markdown sheet files and walking a store root.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Names starting with '.' are never sheets (temp files, editor swap files, VCS dirs).
fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Write a sheet (or any small document), creating parent directories as needed.
///
/// Content goes to a hidden sibling first and is renamed over the target, so
/// readers never observe a half-written file.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "sheet path has no file name"))?;
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    let result = (|| {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Read a sheet file, returning `None` if there is no file at `path`.
///
/// A directory at `path` counts as absent, matching [`sheet_exists`].
pub fn read_sheet(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(_) if path.is_dir() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Delete a sheet file
pub fn remove_sheet(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

pub fn sheet_exists(path: &Path) -> bool {
    path.is_file()
}

/// List all markdown files under `root` (recursively).
///
/// Hidden entries are skipped. `descend` receives each directory's path relative
/// to `root` and decides whether the walk enters it.
pub fn list_sheets<F>(root: &Path, descend: F) -> io::Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let mut files = Vec::new();

    if !root.exists() {
        return Ok(files);
    }
    // A root that exists but is not a readable directory is an error, not an empty store
    fs::read_dir(root)?;

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if is_hidden(entry.file_name()) {
                return false;
            }
            if entry.file_type().is_dir() {
                return entry
                    .path()
                    .strip_prefix(root)
                    .map(|rel| descend(rel))
                    .unwrap_or(false);
            }
            true
        });

    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().map(|e| e == "md").unwrap_or(false) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Get the path of `file_path` relative to `root`
pub fn relative_path<'a>(root: &Path, file_path: &'a Path) -> Option<&'a Path> {
    file_path.strip_prefix(root).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("2025/jan-1.md");

        write_atomic(&path, "# Test\n\nContent here").unwrap();
        let content = read_sheet(&path).unwrap().unwrap();
        assert_eq!(content, "# Test\n\nContent here");

        // No temp file left behind
        let leftovers: Vec<_> = fs::read_dir(dir.path().join("2025")).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_write_atomic_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.md");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(read_sheet(&path).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_read_sheet_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent.md");
        assert!(read_sheet(&path).unwrap().is_none());
        assert!(!sheet_exists(&path));
    }

    #[test]
    fn test_read_sheet_directory_is_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("2025/jan-1.md");
        fs::create_dir_all(&path).unwrap();

        assert!(read_sheet(&path).unwrap().is_none());
        assert!(!sheet_exists(&path));
    }

    #[test]
    fn test_list_sheets() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        fs::write(root.join("note1.md"), "content").unwrap();
        fs::write(root.join("readme.txt"), "not markdown").unwrap();
        fs::create_dir(root.join("ideas")).unwrap();
        fs::write(root.join("ideas/idea1.md"), "content").unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git/HEAD.md"), "hidden").unwrap();
        fs::write(root.join(".note1.md.tmp"), "partial").unwrap();

        let files = list_sheets(root, |_| true).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_list_sheets_respects_descend() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("2025")).unwrap();
        fs::create_dir_all(root.join("nav")).unwrap();
        fs::write(root.join("2025/jan-1.md"), "a").unwrap();
        fs::write(root.join("nav/topic.md"), "b").unwrap();

        let files = list_sheets(root, |rel| rel != Path::new("nav")).unwrap();
        assert_eq!(files, vec![root.join("2025/jan-1.md")]);
    }

    #[test]
    fn test_list_sheets_missing_root() {
        let dir = tempdir().unwrap();
        let files = list_sheets(&dir.path().join("absent"), |_| true).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_relative_path() {
        let root = Path::new("/data/sheets");
        let file = Path::new("/data/sheets/2025/jan-1.md");
        assert_eq!(relative_path(root, file), Some(Path::new("2025/jan-1.md")));
        assert_eq!(relative_path(root, Path::new("/elsewhere/x.md")), None);
    }
}
