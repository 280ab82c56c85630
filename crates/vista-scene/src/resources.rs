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

//! Registry of disposable GPU-side resource handles.
//!
//! The immersive backend accumulates many GPU allocations; switching and
//! teardown must guarantee full release, or repeated switches grow
//! unboundedly. The tracker keys handles by identity, so a handle tracked
//! twice is still released exactly once.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Category of a tracked GPU resource, for per-kind statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Vertex/index buffers and meshes.
    Geometry,
    /// Shader programs and material state.
    Material,
    /// Sampled textures.
    Texture,
    /// Offscreen render targets.
    RenderTarget,
}

impl ResourceKind {
    /// All kinds, for iteration in reports.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Geometry,
        ResourceKind::Material,
        ResourceKind::Texture,
        ResourceKind::RenderTarget,
    ];
}

/// A handle whose GPU-side allocation can be released.
///
/// `release` must tolerate being a no-op when the underlying allocation is
/// already gone; the tracker guarantees it is invoked at most once per
/// tracked handle.
pub trait GpuResource: Send + Sync {
    /// Releases the GPU-side allocation behind this handle.
    fn release(&self);
}

/// Registry of disposable GPU resource handles with bulk disposal.
#[derive(Default)]
pub struct ResourceTracker {
    pools: HashMap<ResourceKind, HashMap<usize, Arc<dyn GpuResource>>>,
}

impl ResourceTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    fn identity(handle: &Arc<dyn GpuResource>) -> usize {
        Arc::as_ptr(handle) as *const () as usize
    }

    /// Adds a handle to the kind-specific set. Tracking the same handle
    /// again (under any kind) is idempotent with respect to release.
    pub fn track(&mut self, kind: ResourceKind, handle: Arc<dyn GpuResource>) {
        let key = Self::identity(&handle);
        self.pools.entry(kind).or_default().insert(key, handle);
    }

    /// Releases every distinct tracked handle exactly once and clears the
    /// sets. Returns the number of handles released.
    pub fn dispose_all(&mut self) -> usize {
        let mut released: HashSet<usize> = HashSet::new();
        for (kind, pool) in self.pools.drain() {
            for (key, handle) in pool {
                if released.insert(key) {
                    handle.release();
                } else {
                    log::trace!("Handle already released under another kind ({kind:?})");
                }
            }
        }
        let count = released.len();
        if count > 0 {
            log::debug!("Released {count} GPU resource handles");
        }
        count
    }

    /// Number of handles tracked under one kind.
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.pools.get(&kind).map_or(0, HashMap::len)
    }

    /// Per-kind handle counts.
    pub fn stats(&self) -> HashMap<ResourceKind, usize> {
        ResourceKind::ALL
            .iter()
            .map(|&kind| (kind, self.count(kind)))
            .collect()
    }

    /// Total number of tracked handle entries across all kinds.
    pub fn total(&self) -> usize {
        self.pools.values().map(HashMap::len).sum()
    }
}
