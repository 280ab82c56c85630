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

//! Typed notifications emitted by the control subsystem.
//!
//! UI collaborators consume these events; the subsystem itself never reads
//! them back. Every variant corresponds to exactly one state transition and
//! is delivered at most once per transition.

mod bus;

pub use bus::EventBus;

use crate::backend::BackendKind;
use crate::capability::CapabilitySnapshot;
use crate::quality::{QualitySettings, QualityTier};

/// A notification emitted by the backend selector or the performance monitor.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// The initial backend finished initializing.
    BackendReady {
        /// The backend that came up.
        kind: BackendKind,
        /// The capability snapshot the choice was based on.
        snapshot: CapabilitySnapshot,
    },
    /// A runtime backend switch completed.
    BackendSwitched {
        /// The backend now active.
        kind: BackendKind,
    },
    /// The quality preset changed, either by adaptation or by an explicit
    /// `set_tier`.
    QualityChanged {
        /// The tier that was active before the change.
        old: QualityTier,
        /// The tier now active.
        new: QualityTier,
        /// The tuning values of the new tier.
        settings: QualitySettings,
    },
}
