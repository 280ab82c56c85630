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

//! The content collaborator contract.
//!
//! Trees, particles, islands and the rest of the visual content are
//! external collaborators; the control subsystem depends only on this
//! shape. Backends call into these traits during their own update and
//! teardown, never the other way round.

use glam::Vec3;

/// Lifecycle shape every content collaborator exposes.
pub trait SceneElement: Send {
    /// Builds the element at a world position.
    fn init(&mut self, position: Vec3) -> anyhow::Result<()>;

    /// Advances the element by one frame.
    fn update(&mut self, dt_secs: f32);

    /// Releases everything the element holds. Must tolerate repeated calls.
    fn dispose(&mut self);
}

/// Extension for elements the user can point at.
pub trait InteractiveElement: SceneElement {
    /// Current world position.
    fn position(&self) -> Vec3;

    /// Radius of the sphere used for hit testing.
    fn hit_radius(&self) -> f32;
}
