// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! JSON file implementation of the preference store.
//!
//! Storage trouble of any sort degrades to "no preference": a missing,
//! unreadable, or corrupt file is logged and treated as empty, and write
//! failures are logged and swallowed. Selection must never abort because a
//! preference file went bad.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vista_core::backend::BackendKind;
use vista_core::prefs::PreferenceStore;

#[derive(Debug, Serialize, Deserialize)]
struct PreferenceFile {
    backend: BackendKind,
}

/// Preference store persisted as a single small JSON file.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    /// Creates a store backed by `path`. The file is created lazily on the
    /// first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Option<BackendKind> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("Could not read {}: {e}", self.path.display());
                return None;
            }
        };
        match serde_json::from_str::<PreferenceFile>(&raw) {
            Ok(file) => Some(file.backend),
            Err(e) => {
                log::warn!("Corrupt preference file {}: {e}", self.path.display());
                None
            }
        }
    }

    fn save(&mut self, kind: BackendKind) {
        let file = PreferenceFile { backend: kind };
        let json = match serde_json::to_string_pretty(&file) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Could not serialize backend preference: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            log::warn!("Could not write {}: {e}", self.path.display());
        }
    }

    fn clear(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Could not remove {}: {e}", self.path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FilePreferenceStore {
        FilePreferenceStore::new(dir.path().join("backend.json"))
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        assert_eq!(store.load(), None);
        store.save(BackendKind::Fallback);
        assert_eq!(store.load(), Some(BackendKind::Fallback));
        store.save(BackendKind::Immersive);
        assert_eq!(store.load(), Some(BackendKind::Immersive));
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.save(BackendKind::Fallback);
        store.clear();
        assert_eq!(store.load(), None);
        assert!(!store.path().exists());

        // Clearing an already-empty store is fine.
        store.clear();
    }

    #[test]
    fn corrupt_file_degrades_to_no_preference() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        std::fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), None);

        std::fs::write(store.path(), r#"{"backend":"holographic"}"#).unwrap();
        assert_eq!(store.load(), None);

        // A save repairs the file.
        store.save(BackendKind::Immersive);
        assert_eq!(store.load(), Some(BackendKind::Immersive));
    }

    #[test]
    fn file_format_is_the_stable_snake_case_tag() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.save(BackendKind::Immersive);
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains(r#""backend": "immersive""#));
    }
}
