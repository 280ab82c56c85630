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

//! The totally ordered quality preset ladder and its tuning values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named rung on the quality preset ladder.
///
/// Tiers are totally ordered from `Minimal` (cheapest) to `Ultra` (most
/// expensive); the derived `Ord` follows declaration order. The tuning
/// values for each tier come from a fixed table built once at compile time
/// (see [`QualityTier::settings`]) and are never mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    /// Bare-minimum rendering for severely constrained clients.
    Minimal,
    /// Reduced particle counts, no post-processing.
    Low,
    /// Moderate particle counts with light post-processing.
    Medium,
    /// Full effects at native render scale.
    High,
    /// Everything on, maximum particle populations.
    Ultra,
}

impl QualityTier {
    /// All tiers in ascending order of resource cost.
    pub const LADDER: [QualityTier; 5] = [
        QualityTier::Minimal,
        QualityTier::Low,
        QualityTier::Medium,
        QualityTier::High,
        QualityTier::Ultra,
    ];

    /// Returns the next cheaper tier, or `None` when already at `Minimal`.
    pub fn lower(self) -> Option<QualityTier> {
        match self {
            QualityTier::Minimal => None,
            QualityTier::Low => Some(QualityTier::Minimal),
            QualityTier::Medium => Some(QualityTier::Low),
            QualityTier::High => Some(QualityTier::Medium),
            QualityTier::Ultra => Some(QualityTier::High),
        }
    }

    /// Returns the next more expensive tier, or `None` when already at `Ultra`.
    pub fn higher(self) -> Option<QualityTier> {
        match self {
            QualityTier::Minimal => Some(QualityTier::Low),
            QualityTier::Low => Some(QualityTier::Medium),
            QualityTier::Medium => Some(QualityTier::High),
            QualityTier::High => Some(QualityTier::Ultra),
            QualityTier::Ultra => None,
        }
    }

    /// Steps one tier down, saturating at `Minimal`.
    pub fn step_down(self) -> QualityTier {
        self.lower().unwrap_or(self)
    }

    /// Steps one tier up, saturating at `Ultra`.
    pub fn step_up(self) -> QualityTier {
        self.higher().unwrap_or(self)
    }

    /// Returns the immutable tuning values for this tier.
    pub fn settings(self) -> &'static QualitySettings {
        match self {
            QualityTier::Minimal => &MINIMAL,
            QualityTier::Low => &LOW,
            QualityTier::Medium => &MEDIUM,
            QualityTier::High => &HIGH,
            QualityTier::Ultra => &ULTRA,
        }
    }

    /// A stable lowercase name, used in logs and the preference file.
    pub fn name(self) -> &'static str {
        match self {
            QualityTier::Minimal => "minimal",
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
            QualityTier::Ultra => "ultra",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The immutable bundle of tuning values attached to one quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualitySettings {
    /// Population count for the canopy/leaf particle system.
    pub leaf_particles: u32,
    /// Population count for the ambient drifting particle system.
    pub ambient_particles: u32,
    /// Whether dynamic shadows are rendered.
    pub shadows: bool,
    /// Whether the post-processing chain is enabled at all.
    pub post_processing: bool,
    /// Bloom intensity, `0.0` disables the pass.
    pub bloom_strength: f32,
    /// Whether anti-aliasing is applied.
    pub antialias: bool,
    /// Render target scale relative to the output surface (`1.0` = native).
    pub render_scale: f32,
}

const MINIMAL: QualitySettings = QualitySettings {
    leaf_particles: 0,
    ambient_particles: 0,
    shadows: false,
    post_processing: false,
    bloom_strength: 0.0,
    antialias: false,
    render_scale: 0.5,
};

const LOW: QualitySettings = QualitySettings {
    leaf_particles: 60,
    ambient_particles: 20,
    shadows: false,
    post_processing: false,
    bloom_strength: 0.0,
    antialias: false,
    render_scale: 0.7,
};

const MEDIUM: QualitySettings = QualitySettings {
    leaf_particles: 150,
    ambient_particles: 60,
    shadows: false,
    post_processing: true,
    bloom_strength: 0.35,
    antialias: false,
    render_scale: 0.85,
};

const HIGH: QualitySettings = QualitySettings {
    leaf_particles: 300,
    ambient_particles: 120,
    shadows: true,
    post_processing: true,
    bloom_strength: 0.6,
    antialias: true,
    render_scale: 1.0,
};

const ULTRA: QualitySettings = QualitySettings {
    leaf_particles: 480,
    ambient_particles: 200,
    shadows: true,
    post_processing: true,
    bloom_strength: 0.85,
    antialias: true,
    render_scale: 1.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_is_strictly_ordered() {
        for pair in QualityTier::LADDER.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn stepping_saturates_at_the_ends() {
        assert_eq!(QualityTier::Minimal.step_down(), QualityTier::Minimal);
        assert_eq!(QualityTier::Ultra.step_up(), QualityTier::Ultra);
        assert_eq!(QualityTier::Minimal.lower(), None);
        assert_eq!(QualityTier::Ultra.higher(), None);
    }

    #[test]
    fn stepping_moves_one_rung() {
        assert_eq!(QualityTier::High.step_down(), QualityTier::Medium);
        assert_eq!(QualityTier::Medium.step_up(), QualityTier::High);
    }

    #[test]
    fn settings_cost_grows_with_tier() {
        // Particle populations and render scale must never decrease when
        // walking the ladder upwards.
        for pair in QualityTier::LADDER.windows(2) {
            let (a, b) = (pair[0].settings(), pair[1].settings());
            assert!(a.leaf_particles <= b.leaf_particles);
            assert!(a.ambient_particles <= b.ambient_particles);
            assert!(a.render_scale <= b.render_scale);
        }
    }

    #[test]
    fn tier_name_round_trips_through_serde() {
        let json = serde_json::to_string(&QualityTier::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let back: QualityTier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QualityTier::Medium);
    }
}
