//! Persisted user record — the single-key store behind [`super::AuthStore`].
//!
//! Layout under `data_dir`:
//! ```text
//! ~/.ecobot/
//! └── user.json    { "id": "...", "name": "...", "email": "..." }
//! ```
//!
//! Reads and writes are synchronous; one writer is assumed.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::error::AppError;

use super::User;

pub const USER_FILENAME: &str = "user.json";

#[derive(Debug, Clone)]
pub struct UserStorage {
    path: PathBuf,
}

impl UserStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self { path: data_dir.join(USER_FILENAME) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored user, or `None` when nothing is stored.
    pub fn load(&self) -> Result<Option<User>, AppError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Storage(format!("cannot read {}: {e}", self.path.display())));
            }
        };
        serde_json::from_str(&data)
            .map(Some)
            .map_err(|e| AppError::Storage(format!("malformed {}: {e}", self.path.display())))
    }

    /// Replace the stored user.
    pub fn save(&self, user: &User) -> Result<(), AppError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| AppError::Storage(format!("cannot create {}: {e}", dir.display())))?;
        }
        let data = serde_json::to_string(user)
            .map_err(|e| AppError::Storage(format!("serialise user: {e}")))?;
        fs::write(&self.path, data)
            .map_err(|e| AppError::Storage(format!("cannot write {}: {e}", self.path.display())))
    }

    /// Remove the stored user. Removing an absent record is not an error.
    pub fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("cannot remove {}: {e}", self.path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user() -> User {
        User { id: "abc123xyz".into(), name: "Jane".into(), email: "jane@x.com".into() }
    }

    #[test]
    fn empty_dir_loads_none() {
        let tmp = TempDir::new().unwrap();
        assert!(UserStorage::new(tmp.path()).load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let storage = UserStorage::new(&tmp.path().join("nested"));
        storage.save(&user()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(user()));
    }

    #[test]
    fn clear_removes_record_and_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let storage = UserStorage::new(tmp.path());
        storage.save(&user()).unwrap();
        storage.clear().unwrap();
        assert!(!storage.path().exists());
        storage.clear().unwrap();
    }

    #[test]
    fn corrupt_record_errors() {
        let tmp = TempDir::new().unwrap();
        let storage = UserStorage::new(tmp.path());
        fs::write(storage.path(), "{not json").unwrap();
        let err = storage.load().unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }
}
