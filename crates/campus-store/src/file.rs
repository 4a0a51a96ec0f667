use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{SessionStore, StoreError};

const FILE_EXTENSION: &str = "json";

/// One file per key under a directory, created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// Characters outside `[A-Za-z0-9_-]` are replaced with `_`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] for blank keys.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let sanitized = sanitize_key(key)?;
        Ok(self.dir.join(format!("{sanitized}.{FILE_EXTENSION}")))
    }
}

fn sanitize_key(key: &str) -> Result<String, StoreError> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(trimmed
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect())
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, value)?;
        tracing::debug!(path = %path.display(), "stored session key");
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_sanitized_into_file_names() {
        let store = FileStore::new("/tmp/campus");
        assert_eq!(
            store.path_for("quizCompleted").unwrap(),
            PathBuf::from("/tmp/campus/quizCompleted.json")
        );
        assert_eq!(
            store.path_for("../etc/passwd").unwrap(),
            PathBuf::from("/tmp/campus/___etc_passwd.json")
        );
        assert!(matches!(
            store.path_for("  "),
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn directory_is_created_on_first_write() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let dir = tmp.path().join("nested").join("results");
        let mut store = FileStore::new(&dir);

        assert!(store.get("selectedDorm").unwrap().is_none());
        store.set("selectedDorm", "dorm-maple").unwrap();
        assert!(dir.join("selectedDorm.json").exists());
        assert_eq!(
            store.get("selectedDorm").unwrap().as_deref(),
            Some("dorm-maple")
        );

        store.clear("selectedDorm").unwrap();
        store.clear("selectedDorm").unwrap();
        assert!(store.get("selectedDorm").unwrap().is_none());
    }
}
