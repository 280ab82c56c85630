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

//! # Vista Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! for the adaptive dual-backend render control system.
//!
//! This crate defines the "common language" shared by the rest of the
//! workspace: the ordered quality preset ladder, the capability snapshot and
//! its probe contract, the render-backend lifecycle trait, the content
//! collaborator contract, preference persistence, and the typed control
//! event channel. Concrete implementations of the external seams (graphics
//! probing, on-disk persistence) live in `vista-infra`.

#![warn(missing_docs)]

pub mod backend;
pub mod capability;
pub mod error;
pub mod event;
pub mod prefs;
pub mod quality;
pub mod scene;

pub use backend::{BackendFactory, BackendKind, RenderBackend};
pub use capability::{
    probe_capabilities, CapabilitySnapshot, ConnectionQuality, DeviceClass, GraphicsApi,
    HostEnvironment, PowerState,
};
pub use error::{BackendError, SelectorError};
pub use event::{ControlEvent, EventBus};
pub use prefs::{InMemoryPreferenceStore, PreferenceStore};
pub use quality::{QualitySettings, QualityTier};
