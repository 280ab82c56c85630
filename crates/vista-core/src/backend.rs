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

//! The render-backend lifecycle contract.
//!
//! Exactly two kinds of backend exist: the GPU-accelerated immersive path
//! and the lightweight vector-graphics fallback. Both implement
//! [`RenderBackend`]; the selector in `vista-runtime` owns at most one live
//! backend at a time and drives its lifecycle through this trait.

use crate::capability::CapabilitySnapshot;
use crate::error::BackendError;
use crate::quality::QualitySettings;
use async_trait::async_trait;
use std::fmt;

/// Type tag for the two mutually exclusive rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// The GPU-accelerated 3D rendering path.
    Immersive,
    /// The lightweight vector-graphics rendering path.
    Fallback,
}

impl BackendKind {
    /// Stable lowercase name used in logs and the preference file.
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Immersive => "immersive",
            BackendKind::Fallback => "fallback",
        }
    }

    /// Parses a one-shot query override value.
    ///
    /// Accepts the canonical names plus the short aliases `3d` and `2d`.
    /// Unknown values yield `None` and are ignored by the selector.
    pub fn from_query_value(value: &str) -> Option<BackendKind> {
        match value.trim().to_ascii_lowercase().as_str() {
            "immersive" | "3d" => Some(BackendKind::Immersive),
            "fallback" | "2d" => Some(BackendKind::Fallback),
            _ => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle contract implemented by both concrete rendering backends.
///
/// Initialization and disposal are the only asynchronous operations in the
/// system; they may await capability-dependent setup such as loading a
/// heavy rendering library. Both are single-shot: the selector never
/// overlaps a disposal with an initialization.
#[async_trait]
pub trait RenderBackend: Send {
    /// The type tag of this backend.
    fn kind(&self) -> BackendKind;

    /// Performs asynchronous setup against the probed capabilities.
    ///
    /// This is the one hard failure surfaced out of the subsystem: if the
    /// underlying rendering library cannot be brought up, the error reaches
    /// the `initialize` caller, who may retry with an explicit fallback
    /// override. The subsystem itself never retries.
    async fn initialize(&mut self, snapshot: &CapabilitySnapshot) -> Result<(), BackendError>;

    /// Advances the backend by one frame.
    fn update(&mut self, dt_secs: f32);

    /// Applies a new quality preset's tuning values.
    fn apply_quality(&mut self, settings: &QualitySettings);

    /// Releases everything the backend holds.
    ///
    /// Must be defensive: disposing an already-disposed or never-initialized
    /// backend is a no-op, since repeated teardown calls are expected from
    /// cleanup paths.
    async fn dispose(&mut self);

    /// Whether the backend is currently initialized.
    fn is_initialized(&self) -> bool;
}

/// Constructs backends bound to the host's presentation surface.
///
/// The host captures its window/container when building the factory, so the
/// selector can construct either backend kind without knowing anything
/// about the surface.
pub trait BackendFactory: Send {
    /// Creates a fresh, uninitialized backend of the given kind.
    fn create(&self, kind: BackendKind) -> Box<dyn RenderBackend>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_values_map_to_kinds() {
        assert_eq!(
            BackendKind::from_query_value("immersive"),
            Some(BackendKind::Immersive)
        );
        assert_eq!(
            BackendKind::from_query_value("3D"),
            Some(BackendKind::Immersive)
        );
        assert_eq!(
            BackendKind::from_query_value(" fallback "),
            Some(BackendKind::Fallback)
        );
        assert_eq!(
            BackendKind::from_query_value("2d"),
            Some(BackendKind::Fallback)
        );
        assert_eq!(BackendKind::from_query_value("software"), None);
        assert_eq!(BackendKind::from_query_value(""), None);
    }

    #[test]
    fn kind_serializes_to_stable_names() {
        assert_eq!(
            serde_json::to_string(&BackendKind::Immersive).unwrap(),
            "\"immersive\""
        );
        assert_eq!(
            serde_json::to_string(&BackendKind::Fallback).unwrap(),
            "\"fallback\""
        );
    }
}
