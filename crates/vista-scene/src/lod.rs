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

//! Distance-based level-of-detail selection.
//!
//! Objects register with ascending `(distance, tier)` levels; each update
//! selects the tier as a step function of the distance from the viewpoint
//! and reports changes through the object's callback, never applying them
//! directly. Unchanged distances across repeated updates produce no further
//! callbacks.

use glam::Vec3;
use std::collections::HashMap;
use std::sync::Arc;

/// An object whose rendering detail the manager controls.
pub trait LodTarget: Send + Sync {
    /// Current world position of the object.
    fn position(&self) -> Vec3;

    /// Called when the selected detail tier differs from the last applied
    /// one. The object owns the actual geometry/material swap.
    fn apply_detail_tier(&self, tier: u8);
}

/// One rung of an object's detail ladder: `tier` applies from `distance`
/// outward, until the next rung takes over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodLevel {
    /// Distance threshold at which this tier starts applying.
    pub distance: f32,
    /// Detail tier to apply (0 = full detail by convention).
    pub tier: u8,
}

struct LodEntry {
    target: Arc<dyn LodTarget>,
    levels: Vec<LodLevel>,
    last_tier: Option<u8>,
}

impl LodEntry {
    /// Largest threshold not exceeding the distance wins; distances closer
    /// than the first threshold clamp to the first level.
    fn select_tier(&self, distance: f32) -> u8 {
        self.levels
            .iter()
            .take_while(|level| level.distance <= distance)
            .last()
            .unwrap_or(&self.levels[0])
            .tier
    }
}

/// Registry of spatial objects with per-object detail ladders.
#[derive(Default)]
pub struct LodManager {
    entries: HashMap<String, LodEntry>,
}

impl LodManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object with its detail ladder.
    ///
    /// Levels are stored sorted ascending by distance. Registering an
    /// existing id replaces the previous entry. Registrations with no
    /// levels are rejected with a warning.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        target: Arc<dyn LodTarget>,
        mut levels: Vec<LodLevel>,
    ) {
        let id = id.into();
        if levels.is_empty() {
            log::warn!("LOD registration '{id}' has no levels; ignoring");
            return;
        }
        levels.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        self.entries.insert(
            id,
            LodEntry {
                target,
                levels,
                last_tier: None,
            },
        );
    }

    /// Removes an entry. Returns whether it existed.
    pub fn unregister(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Re-selects the detail tier of every entry for the given viewpoint,
    /// invoking callbacks only where the tier actually changed.
    ///
    /// Returns the number of tier changes applied this pass.
    pub fn update(&mut self, viewpoint: Vec3) -> usize {
        let mut changed = 0;
        for (id, entry) in &mut self.entries {
            let distance = viewpoint.distance(entry.target.position());
            let tier = entry.select_tier(distance);
            if entry.last_tier != Some(tier) {
                log::trace!("LOD '{id}': distance {distance:.1} -> tier {tier}");
                entry.target.apply_detail_tier(tier);
                entry.last_tier = Some(tier);
                changed += 1;
            }
        }
        changed
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

    struct Probe {
        position: Vec3,
        applied: AtomicU8,
        calls: AtomicUsize,
    }

    impl Probe {
        fn at(position: Vec3) -> Arc<Self> {
            Arc::new(Self {
                position,
                applied: AtomicU8::new(u8::MAX),
                calls: AtomicUsize::new(0),
            })
        }

        fn applied(&self) -> u8 {
            self.applied.load(Ordering::SeqCst)
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl LodTarget for Probe {
        fn position(&self) -> Vec3 {
            self.position
        }
        fn apply_detail_tier(&self, tier: u8) {
            self.applied.store(tier, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn three_levels() -> Vec<LodLevel> {
        vec![
            LodLevel {
                distance: 0.0,
                tier: 0,
            },
            LodLevel {
                distance: 50.0,
                tier: 1,
            },
            LodLevel {
                distance: 120.0,
                tier: 2,
            },
        ]
    }

    #[test]
    fn tier_is_a_step_function_of_distance() {
        let mut manager = LodManager::new();
        let probe = Probe::at(Vec3::ZERO);
        manager.register("island", probe.clone(), three_levels());

        manager.update(Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(probe.applied(), 0);

        manager.update(Vec3::new(50.0, 0.0, 0.0));
        assert_eq!(probe.applied(), 1);

        manager.update(Vec3::new(119.9, 0.0, 0.0));
        assert_eq!(probe.applied(), 1);

        manager.update(Vec3::new(500.0, 0.0, 0.0));
        assert_eq!(probe.applied(), 2);
    }

    #[test]
    fn unchanged_viewpoint_triggers_no_second_callback() {
        let mut manager = LodManager::new();
        let probe = Probe::at(Vec3::new(0.0, 0.0, -30.0));
        manager.register("tree", probe.clone(), three_levels());

        let viewpoint = Vec3::new(0.0, 5.0, 40.0);
        assert_eq!(manager.update(viewpoint), 1);
        assert_eq!(manager.update(viewpoint), 0);
        assert_eq!(probe.calls(), 1);
    }

    #[test]
    fn levels_are_sorted_on_registration() {
        let mut manager = LodManager::new();
        let probe = Probe::at(Vec3::ZERO);
        let shuffled = vec![
            LodLevel {
                distance: 120.0,
                tier: 2,
            },
            LodLevel {
                distance: 0.0,
                tier: 0,
            },
            LodLevel {
                distance: 50.0,
                tier: 1,
            },
        ];
        manager.register("rock", probe.clone(), shuffled);
        manager.update(Vec3::new(60.0, 0.0, 0.0));
        assert_eq!(probe.applied(), 1);
    }

    #[test]
    fn closer_than_first_threshold_clamps_to_first_level() {
        let mut manager = LodManager::new();
        let probe = Probe::at(Vec3::ZERO);
        let levels = vec![
            LodLevel {
                distance: 20.0,
                tier: 0,
            },
            LodLevel {
                distance: 80.0,
                tier: 1,
            },
        ];
        manager.register("shrine", probe.clone(), levels);
        manager.update(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(probe.applied(), 0);
    }

    #[test]
    fn empty_levels_are_rejected() {
        let mut manager = LodManager::new();
        let probe = Probe::at(Vec3::ZERO);
        manager.register("ghost", probe.clone(), Vec::new());
        assert!(manager.is_empty());
        assert_eq!(manager.update(Vec3::ZERO), 0);
        assert_eq!(probe.calls(), 0);
    }

    #[test]
    fn unregister_and_clear_remove_entries() {
        let mut manager = LodManager::new();
        manager.register("a", Probe::at(Vec3::ZERO), three_levels());
        manager.register("b", Probe::at(Vec3::ONE), three_levels());
        assert_eq!(manager.len(), 2);

        assert!(manager.unregister("a"));
        assert!(!manager.unregister("a"));
        assert_eq!(manager.len(), 1);

        manager.clear();
        assert!(manager.is_empty());
    }
}
