//! Input discovery

use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// Regular files directly in `dir` whose extension matches, case-insensitively,
/// sorted by path
pub fn find_inputs(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ConvertError::io(dir, e))?;

    let mut inputs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ConvertError::io(dir, e))?.path();
        if path.is_file() && has_extension(&path, extension) {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_matching_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.cdb", "a.CDB", "notes.txt", "c.cdb.bak"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.cdb")).unwrap();

        let found = find_inputs(dir.path(), "cdb").unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.CDB", "b.cdb"]);
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_inputs(&dir.path().join("absent"), "cdb").unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
    }
}
