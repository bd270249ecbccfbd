//! File system utilities.

use crate::Result;
use std::fs;
use std::path::Path;

/// Check if a path exists and is a directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(crate::Error::NotADirectory(path.display().to_string()));
    }
    Ok(())
}

/// Move a file, falling back to copy + delete across filesystems.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            tracing::debug!("Cross-filesystem move detected, using copy+delete");
            fs::copy(from, to)?;
            fs::remove_file(from)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Get file extension in lowercase.
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Whether a directory entry name is hidden (dot-prefixed).
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_get_extension() {
        assert_eq!(get_extension(&PathBuf::from("a/b.MKV")), Some("mkv".to_string()));
        assert_eq!(get_extension(&PathBuf::from("a/b.tc.ass")), Some("ass".to_string()));
        assert_eq!(get_extension(&PathBuf::from("a/b")), None);
    }

    #[test]
    fn test_is_hidden_name() {
        assert!(is_hidden_name(".ignore"));
        assert!(is_hidden_name(".rename-plan.json"));
        assert!(!is_hidden_name("Season 1"));
    }

    #[test]
    fn test_move_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let from = temp_dir.path().join("a.mkv");
        let to = temp_dir.path().join("b.mkv");
        fs::write(&from, "x").unwrap();

        move_file(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "x");
    }

    #[test]
    fn test_ensure_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        assert!(ensure_directory(temp_dir.path()).is_ok());

        let file = temp_dir.path().join("f.txt");
        fs::write(&file, "").unwrap();
        assert!(matches!(
            ensure_directory(&file),
            Err(crate::Error::NotADirectory(_))
        ));
        assert!(matches!(
            ensure_directory(&temp_dir.path().join("missing")),
            Err(crate::Error::PathNotFound(_))
        ));
    }
}
