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

//! Persisted backend preference.
//!
//! A single key mapping to one of the two backend type tags. The selector
//! reads it at initialize time, writes it on a deliberate switch, and
//! clears it when it falls back automatically so a later session
//! re-attempts the immersive backend.

use crate::backend::BackendKind;

/// Storage for the single persisted backend choice.
///
/// Implementations must be silent about storage failures: a broken store
/// degrades to "no preference", it never aborts selection.
pub trait PreferenceStore: Send {
    /// Reads the persisted choice, if any.
    fn load(&self) -> Option<BackendKind>;

    /// Persists a deliberate choice.
    fn save(&mut self, kind: BackendKind);

    /// Removes any persisted choice.
    fn clear(&mut self);
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    choice: Option<BackendKind>,
}

impl InMemoryPreferenceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a choice, for tests.
    pub fn with_choice(kind: BackendKind) -> Self {
        Self { choice: Some(kind) }
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn load(&self) -> Option<BackendKind> {
        self.choice
    }

    fn save(&mut self, kind: BackendKind) {
        self.choice = Some(kind);
    }

    fn clear(&mut self) {
        self.choice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_clear_round_trip() {
        let mut store = InMemoryPreferenceStore::new();
        assert_eq!(store.load(), None);

        store.save(BackendKind::Fallback);
        assert_eq!(store.load(), Some(BackendKind::Fallback));

        store.save(BackendKind::Immersive);
        assert_eq!(store.load(), Some(BackendKind::Immersive));

        store.clear();
        assert_eq!(store.load(), None);
    }
}
