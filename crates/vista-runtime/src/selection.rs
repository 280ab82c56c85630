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

//! The backend choice rules.
//!
//! [`choose_backend`] is a pure function from an immutable capability
//! snapshot plus the caller-supplied options and the persisted preference
//! to a backend kind. Keeping it free of side effects makes the whole
//! precedence table testable with synthetic snapshots.

use vista_core::backend::BackendKind;
use vista_core::capability::CapabilitySnapshot;

/// Options for one `initialize` call.
#[derive(Debug, Clone, Default)]
pub struct InitializeOptions {
    /// Explicit caller-supplied backend override. Ranks above everything.
    pub backend_override: Option<BackendKind>,
    /// One-shot query string (e.g. `"backend=fallback&demo=1"`), read once
    /// at initialize. Ranks above the persisted preference, below the
    /// explicit override.
    pub query: Option<String>,
    /// Allows the immersive backend on handheld-class devices, which
    /// otherwise fall back.
    pub allow_immersive_on_handheld: bool,
}

impl InitializeOptions {
    /// Extracts the backend override from the one-shot query channel, if
    /// present and well-formed. Unknown values are ignored.
    pub fn query_override(&self) -> Option<BackendKind> {
        let query = self.query.as_deref()?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| key.trim() == "backend")
            .and_then(|(_, value)| BackendKind::from_query_value(value))
    }
}

/// Why a backend kind was chosen. First matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    /// Rule 1: explicit caller-supplied override.
    ExplicitOverride,
    /// Rule 2: one-shot query override.
    QueryOverride,
    /// Rule 3: persisted prior choice.
    PersistedPreference,
    /// Rule 4: reduced motion requested.
    ReducedMotion,
    /// Rule 5: low-power signal.
    LowPower,
    /// Rule 6: no usable graphics API.
    MissingGraphicsApi,
    /// Rule 7: handheld-class device without the explicit allowance.
    HandheldDevice,
    /// Rule 8: nothing forced the fallback.
    Default,
}

impl SelectionReason {
    /// Whether the selector arrived at the fallback on its own, as opposed
    /// to honoring an override or a persisted choice. Automatic choices are
    /// never persisted, and a stale persisted "fallback" is cleared when
    /// one occurs so a later session re-attempts the immersive backend.
    pub fn is_automatic_fallback(self) -> bool {
        matches!(
            self,
            SelectionReason::ReducedMotion
                | SelectionReason::LowPower
                | SelectionReason::MissingGraphicsApi
                | SelectionReason::HandheldDevice
        )
    }
}

/// Chooses the backend by strict precedence; the first matching rule wins.
pub fn choose_backend(
    snapshot: &CapabilitySnapshot,
    options: &InitializeOptions,
    persisted: Option<BackendKind>,
) -> (BackendKind, SelectionReason) {
    if let Some(kind) = options.backend_override {
        return (kind, SelectionReason::ExplicitOverride);
    }
    if let Some(kind) = options.query_override() {
        return (kind, SelectionReason::QueryOverride);
    }
    if let Some(kind) = persisted {
        return (kind, SelectionReason::PersistedPreference);
    }
    if snapshot.reduced_motion {
        return (BackendKind::Fallback, SelectionReason::ReducedMotion);
    }
    if snapshot.low_power {
        return (BackendKind::Fallback, SelectionReason::LowPower);
    }
    if !snapshot.supports_immersive() {
        return (BackendKind::Fallback, SelectionReason::MissingGraphicsApi);
    }
    if snapshot.device_class == vista_core::capability::DeviceClass::Handheld
        && !options.allow_immersive_on_handheld
    {
        return (BackendKind::Fallback, SelectionReason::HandheldDevice);
    }
    (BackendKind::Immersive, SelectionReason::Default)
}
