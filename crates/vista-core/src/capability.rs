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

//! Client capability probing.
//!
//! The probe is split in two: a [`HostEnvironment`] trait that performs the
//! side-effecting platform queries, and the pure function
//! [`probe_capabilities`] that folds those queries into an immutable
//! [`CapabilitySnapshot`]. Decision logic downstream (backend selection,
//! initial quality tier) only ever sees the snapshot, so it can be tested
//! against synthetic values without touching a real graphics stack.

/// A generation of the host graphics API that the immersive backend can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphicsApi {
    /// The baseline API generation; the immersive backend requires at least this.
    Basic,
    /// The extended API generation, enabling the full effect chain.
    Modern,
}

/// Coarse device classification.
///
/// Derived from a platform-level signal, deliberately never from viewport
/// or window dimensions: a narrow desktop window must not be misclassified
/// as a handheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    /// A desktop- or laptop-class machine.
    Desktop,
    /// A phone- or tablet-class device.
    Handheld,
}

/// Reported power state of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// The client signalled a low-power condition (battery saver, etc.).
    Low,
    /// The client is not in a low-power condition.
    Normal,
    /// No power signal is available. Treated as "not low-power".
    Unknown,
}

/// Optional connection-quality hint from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionQuality {
    /// Constrained connectivity; heavy asset streaming should be avoided.
    Slow,
    /// Ordinary connectivity.
    Adequate,
    /// Fast connectivity.
    Fast,
}

/// The side-effecting platform queries behind the capability probe.
///
/// A concrete implementation lives in `vista-infra`; tests supply synthetic
/// implementations. Queries that the platform cannot answer report the
/// neutral value (`PowerState::Unknown`, `None` connection hint) rather
/// than failing.
pub trait HostEnvironment: Send + Sync {
    /// Attempts to create and immediately release a throwaway graphics
    /// context of the given API generation.
    ///
    /// Any error return means "unsupported" to the probe; implementations
    /// must not panic on absence of the API.
    fn try_create_context(&self, api: GraphicsApi) -> anyhow::Result<()>;

    /// Whether the client requested reduced motion.
    fn reduced_motion(&self) -> bool;

    /// The client's power state, if a signal exists.
    fn power_state(&self) -> PowerState;

    /// The coarse device classification.
    fn device_class(&self) -> DeviceClass;

    /// An optional connection-quality hint.
    fn connection_quality(&self) -> Option<ConnectionQuality>;
}

/// The immutable result of one capability probe.
///
/// Computed once per selector initialization and kept until an explicit
/// re-probe; nothing in the system mutates a snapshot after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapabilitySnapshot {
    /// The baseline graphics API generation is available.
    pub basic_api: bool,
    /// The extended graphics API generation is available.
    pub modern_api: bool,
    /// The client requested reduced motion.
    pub reduced_motion: bool,
    /// Coarse device classification.
    pub device_class: DeviceClass,
    /// The client signalled a low-power condition.
    pub low_power: bool,
    /// Connection-quality hint, if the host exposes one.
    pub connection: Option<ConnectionQuality>,
}

impl CapabilitySnapshot {
    /// Whether any graphics API generation usable by the immersive backend
    /// is present.
    pub fn supports_immersive(&self) -> bool {
        self.basic_api || self.modern_api
    }
}

/// Runs the capability probe against a host environment.
///
/// Probe failures are an expected path: an error from
/// [`HostEnvironment::try_create_context`] is folded into the snapshot as
/// "unsupported" and never surfaced to the caller.
pub fn probe_capabilities(env: &dyn HostEnvironment) -> CapabilitySnapshot {
    let basic_api = match env.try_create_context(GraphicsApi::Basic) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("Basic graphics API unavailable: {e}");
            false
        }
    };
    let modern_api = match env.try_create_context(GraphicsApi::Modern) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("Modern graphics API unavailable: {e}");
            false
        }
    };

    let snapshot = CapabilitySnapshot {
        basic_api,
        modern_api,
        reduced_motion: env.reduced_motion(),
        device_class: env.device_class(),
        low_power: matches!(env.power_state(), PowerState::Low),
        connection: env.connection_quality(),
    };
    log::info!(
        "Capability probe: basic_api={}, modern_api={}, reduced_motion={}, device={:?}, low_power={}",
        snapshot.basic_api,
        snapshot.modern_api,
        snapshot.reduced_motion,
        snapshot.device_class,
        snapshot.low_power
    );
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct SyntheticEnv {
        basic: bool,
        modern: bool,
        reduced_motion: bool,
        power: PowerState,
        class: DeviceClass,
    }

    impl HostEnvironment for SyntheticEnv {
        fn try_create_context(&self, api: GraphicsApi) -> anyhow::Result<()> {
            let ok = match api {
                GraphicsApi::Basic => self.basic,
                GraphicsApi::Modern => self.modern,
            };
            if ok {
                Ok(())
            } else {
                Err(anyhow!("context creation failed"))
            }
        }
        fn reduced_motion(&self) -> bool {
            self.reduced_motion
        }
        fn power_state(&self) -> PowerState {
            self.power
        }
        fn device_class(&self) -> DeviceClass {
            self.class
        }
        fn connection_quality(&self) -> Option<ConnectionQuality> {
            None
        }
    }

    #[test]
    fn context_errors_fold_into_unsupported() {
        let env = SyntheticEnv {
            basic: false,
            modern: false,
            reduced_motion: false,
            power: PowerState::Normal,
            class: DeviceClass::Desktop,
        };
        let snap = probe_capabilities(&env);
        assert!(!snap.basic_api);
        assert!(!snap.modern_api);
        assert!(!snap.supports_immersive());
    }

    #[test]
    fn unknown_power_is_not_low_power() {
        let env = SyntheticEnv {
            basic: true,
            modern: true,
            reduced_motion: false,
            power: PowerState::Unknown,
            class: DeviceClass::Desktop,
        };
        assert!(!probe_capabilities(&env).low_power);
    }

    #[test]
    fn basic_api_alone_supports_immersive() {
        let env = SyntheticEnv {
            basic: true,
            modern: false,
            reduced_motion: false,
            power: PowerState::Normal,
            class: DeviceClass::Handheld,
        };
        let snap = probe_capabilities(&env);
        assert!(snap.supports_immersive());
        assert_eq!(snap.device_class, DeviceClass::Handheld);
    }
}
