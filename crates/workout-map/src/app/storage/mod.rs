//! Platform storage backends for the workout log.
//!
//! - `WebLocalStorage` (compiled for `wasm32`): `window.localStorage`.
//! - `FileStorage` (native): a single JSON file holding a map of string keys
//!   to string values, read once on startup and rewritten on every mutation.
//!
//! Both implement [`StorageBackend`] from the library crate, so the
//! controller never knows which one it talks to.

use workout_map_lib::{StorageBackend, StorageError, StorageResult};

//
// Web implementation (localStorage)
//
#[cfg(target_arch = "wasm32")]
mod web_storage {
    use super::*;
    use wasm_bindgen::JsValue;
    use web_sys::Storage;

    fn local_storage() -> Result<Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Platform("no window".into()))?
            .local_storage()
            .map_err(|e| StorageError::Platform(format!("local_storage() failed: {:?}", e)))?
            .ok_or_else(|| StorageError::Platform("local_storage not available".into()))
    }

    fn platform_error(operation: &str, e: JsValue) -> StorageError {
        StorageError::Platform(format!("{} error: {:?}", operation, e))
    }

    /// Browser-backed localStorage implementation.
    pub struct WebLocalStorage;

    impl StorageBackend for WebLocalStorage {
        fn set_string(&self, key: &str, value: &str) -> StorageResult<()> {
            local_storage()?
                .set_item(key, value)
                .map_err(|e| platform_error("set_item", e))
        }

        fn get_string(&self, key: &str) -> StorageResult<Option<String>> {
            local_storage()?
                .get_item(key)
                .map_err(|e| platform_error("get_item", e))
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            local_storage()?
                .remove_item(key)
                .map_err(|e| platform_error("remove_item", e))
        }

        fn keys(&self) -> StorageResult<Vec<String>> {
            let storage = local_storage()?;
            let len = storage
                .length()
                .map_err(|e| platform_error("length", e))?;
            let mut keys = Vec::with_capacity(len as usize);
            for i in 0..len {
                if let Ok(Some(k)) = storage.key(i) {
                    keys.push(k);
                }
            }
            Ok(keys)
        }
    }

    /// The location argument only matters on native.
    pub fn default_backend(
        _path: Option<std::path::PathBuf>,
    ) -> Result<Box<dyn StorageBackend>, StorageError> {
        // Fail early when storage is disabled (e.g. private browsing policies)
        local_storage()?;
        Ok(Box::new(WebLocalStorage))
    }
}

//
// Native file-backed implementation
//
#[cfg(not(target_arch = "wasm32"))]
mod file_storage {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, MutexGuard};

    /// File-based storage: one JSON object of key -> string value.
    pub struct FileStorage {
        path: PathBuf,
        inner: Mutex<HashMap<String, String>>,
    }

    impl FileStorage {
        /// - On Windows: %APPDATA%/WorkoutMap/storage.json
        /// - Else: $HOME/.config/workout-map/storage.json
        fn default_storage_path() -> PathBuf {
            if cfg!(windows)
                && let Ok(appdata) = std::env::var("APPDATA")
            {
                return Path::new(&appdata).join("WorkoutMap").join("storage.json");
            }

            if let Ok(home) = std::env::var("HOME") {
                return Path::new(&home)
                    .join(".config")
                    .join("workout-map")
                    .join("storage.json");
            }

            Path::new(".").join("workout-map-storage.json")
        }

        pub fn new_with_path(path: Option<PathBuf>) -> Result<Self, StorageError> {
            let path = path.unwrap_or_else(Self::default_storage_path);

            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Io(format!("Failed to create storage directory: {}", e))
                })?;
            }

            let map = if path.exists() {
                let s = fs::read_to_string(&path)
                    .map_err(|e| StorageError::Io(format!("Failed to read storage file: {}", e)))?;
                if s.trim().is_empty() {
                    HashMap::new()
                } else {
                    serde_json::from_str::<HashMap<String, String>>(&s).map_err(|e| {
                        StorageError::Json(format!("Failed to parse storage JSON: {}", e))
                    })?
                }
            } else {
                HashMap::new()
            };

            tracing::debug!("Using storage file {}", path.display());
            Ok(FileStorage {
                path,
                inner: Mutex::new(map),
            })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn lock(&self) -> StorageResult<MutexGuard<'_, HashMap<String, String>>> {
            self.inner
                .lock()
                .map_err(|e| StorageError::Platform(format!("mutex poisoned: {:?}", e)))
        }

        fn flush_locked(&self, locked: &HashMap<String, String>) -> StorageResult<()> {
            let s = serde_json::to_string_pretty(locked)
                .map_err(|e| StorageError::Json(e.to_string()))?;
            fs::write(&self.path, s).map_err(|e| StorageError::Io(format!("write failed: {}", e)))
        }
    }

    impl StorageBackend for FileStorage {
        fn set_string(&self, key: &str, value: &str) -> StorageResult<()> {
            let mut guard = self.lock()?;
            guard.insert(key.to_string(), value.to_string());
            self.flush_locked(&guard)
        }

        fn get_string(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.lock()?.get(key).cloned())
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            let mut guard = self.lock()?;
            if guard.remove(key).is_some() {
                self.flush_locked(&guard)?;
            }
            Ok(())
        }

        fn keys(&self) -> StorageResult<Vec<String>> {
            Ok(self.lock()?.keys().cloned().collect())
        }
    }

    pub fn default_backend(path: Option<PathBuf>) -> Result<Box<dyn StorageBackend>, StorageError> {
        Ok(Box::new(FileStorage::new_with_path(path)?))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_values_survive_reopen() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("storage.json");

            let storage = FileStorage::new_with_path(Some(path.clone())).unwrap();
            assert_eq!(storage.path(), path.as_path());
            storage.set_string("workouts", "[]").unwrap();
            storage.set_string("other", "x").unwrap();
            storage.remove("other").unwrap();
            drop(storage);

            let reopened = FileStorage::new_with_path(Some(path)).unwrap();
            assert_eq!(
                reopened.get_string("workouts").unwrap().as_deref(),
                Some("[]")
            );
            assert_eq!(reopened.get_string("other").unwrap(), None);
            assert_eq!(reopened.keys().unwrap(), vec!["workouts".to_string()]);
        }

        #[test]
        fn test_missing_file_is_empty() {
            let dir = tempfile::tempdir().unwrap();
            let storage = FileStorage::new_with_path(Some(dir.path().join("s.json"))).unwrap();
            assert!(storage.keys().unwrap().is_empty());
            storage.remove("absent").unwrap();
        }

        #[test]
        fn test_corrupt_file_is_reported() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("storage.json");
            fs::write(&path, "not json").unwrap();
            assert!(matches!(
                FileStorage::new_with_path(Some(path)),
                Err(StorageError::Json(_))
            ));
        }
    }
}

//
// Public helpers to create the default backend for the current platform
//
#[cfg(target_arch = "wasm32")]
pub use web_storage::default_backend as default_storage_backend;

#[cfg(not(target_arch = "wasm32"))]
pub use file_storage::default_backend as default_storage_backend;
