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

// Vista Sandbox
// Drives the whole control subsystem against toy backends: capability
// probe, selection, a simulated frame loop with an FPS dip that walks the
// quality ladder down, a LOD pass, and a runtime backend switch.

use anyhow::Result;
use async_trait::async_trait;
use glam::Vec3;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use vista_core::backend::{BackendFactory, BackendKind, RenderBackend};
use vista_core::capability::CapabilitySnapshot;
use vista_core::error::BackendError;
use vista_core::event::{ControlEvent, EventBus};
use vista_core::quality::QualitySettings;
use vista_infra::{FilePreferenceStore, WgpuHostEnvironment};
use vista_runtime::{BackendSelector, InitializeOptions};
use vista_scene::lod::{LodLevel, LodManager, LodTarget};
use vista_scene::resources::{GpuResource, ResourceKind, ResourceTracker};
use vista_telemetry::{MonitorConfig, PerformanceMonitor};

struct DemoBuffer {
    label: &'static str,
}

impl GpuResource for DemoBuffer {
    fn release(&self) {
        log::info!("  released {}", self.label);
    }
}

struct DemoImmersiveBackend {
    tracker: ResourceTracker,
    initialized: bool,
}

#[async_trait]
impl RenderBackend for DemoImmersiveBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Immersive
    }

    async fn initialize(&mut self, snapshot: &CapabilitySnapshot) -> Result<(), BackendError> {
        log::info!("immersive backend up (modern API: {})", snapshot.modern_api);
        self.tracker.track(
            ResourceKind::Geometry,
            Arc::new(DemoBuffer { label: "tree mesh" }),
        );
        self.tracker.track(
            ResourceKind::Texture,
            Arc::new(DemoBuffer { label: "bark atlas" }),
        );
        self.tracker.track(
            ResourceKind::RenderTarget,
            Arc::new(DemoBuffer { label: "bloom target" }),
        );
        self.initialized = true;
        Ok(())
    }

    fn update(&mut self, _dt_secs: f32) {}

    fn apply_quality(&mut self, settings: &QualitySettings) {
        log::info!(
            "immersive preset: {} leaf particles, render scale {:.2}",
            settings.leaf_particles,
            settings.render_scale
        );
    }

    async fn dispose(&mut self) {
        if !self.initialized {
            return;
        }
        log::info!("disposing immersive backend:");
        self.tracker.dispose_all();
        self.initialized = false;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }
}

struct DemoFallbackBackend {
    initialized: bool,
}

#[async_trait]
impl RenderBackend for DemoFallbackBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Fallback
    }

    async fn initialize(&mut self, _snapshot: &CapabilitySnapshot) -> Result<(), BackendError> {
        log::info!("fallback backend up");
        self.initialized = true;
        Ok(())
    }

    fn update(&mut self, _dt_secs: f32) {}

    fn apply_quality(&mut self, settings: &QualitySettings) {
        log::info!("fallback preset: bloom {:.2}", settings.bloom_strength);
    }

    async fn dispose(&mut self) {
        self.initialized = false;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }
}

struct DemoFactory;

impl BackendFactory for DemoFactory {
    fn create(&self, kind: BackendKind) -> Box<dyn RenderBackend> {
        match kind {
            BackendKind::Immersive => Box::new(DemoImmersiveBackend {
                tracker: ResourceTracker::new(),
                initialized: false,
            }),
            BackendKind::Fallback => Box::new(DemoFallbackBackend { initialized: false }),
        }
    }
}

struct DemoTree {
    position: Vec3,
    tier: AtomicU8,
}

impl LodTarget for DemoTree {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn apply_detail_tier(&self, tier: u8) {
        self.tier.store(tier, Ordering::Relaxed);
        log::info!("tree at {:?} now at detail tier {tier}", self.position);
    }
}

fn drain_events(bus: &EventBus<ControlEvent>) {
    for event in bus.drain() {
        match event {
            ControlEvent::BackendReady { kind, .. } => log::info!("event: {kind} backend ready"),
            ControlEvent::BackendSwitched { kind } => log::info!("event: switched to {kind}"),
            ControlEvent::QualityChanged { old, new, .. } => {
                log::info!("event: quality {old} -> {new}")
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .init();

    let bus = EventBus::new();
    let env = Arc::new(WgpuHostEnvironment::new());
    let store = FilePreferenceStore::new(std::env::temp_dir().join("vista-backend.json"));
    let mut selector =
        BackendSelector::new(env, Box::new(DemoFactory), Box::new(store), bus.sender());

    let kind = selector.initialize(InitializeOptions::default()).await?;
    let snapshot = selector.snapshot().copied();
    log::info!("selected backend: {kind}");

    let config = MonitorConfig::default();
    let mut monitor = PerformanceMonitor::new(
        config,
        snapshot
            .map(|s| s.device_class)
            .unwrap_or(vista_core::capability::DeviceClass::Desktop),
        snapshot.map(|s| s.low_power).unwrap_or(false),
        bus.sender(),
    );
    selector.apply_quality(monitor.tier().settings());

    let mut lod = LodManager::new();
    lod.register(
        "tree",
        Arc::new(DemoTree {
            position: Vec3::new(0.0, 0.0, -30.0),
            tier: AtomicU8::new(0),
        }),
        vec![
            LodLevel {
                distance: 0.0,
                tier: 0,
            },
            LodLevel {
                distance: 25.0,
                tier: 1,
            },
            LodLevel {
                distance: 60.0,
                tier: 2,
            },
        ],
    );

    // Simulated frame loop: three smooth seconds, then a sustained dip that
    // forces the ladder down a step. The viewpoint drifts away from the
    // tree, crossing both LOD boundaries.
    let mut now_ms = 0.0;
    let mut viewpoint = Vec3::ZERO;
    while now_ms < 6000.0 {
        let frame_ms = if now_ms < 3000.0 { 16.7 } else { 33.4 };
        now_ms += frame_ms;

        monitor.tick(now_ms);
        selector.update(frame_ms as f32 / 1000.0);
        viewpoint.z += 0.02 * frame_ms as f32;
        lod.update(viewpoint);
        drain_events(&bus);
    }
    log::info!(
        "after the dip: tier '{}', average {:.1} FPS",
        monitor.tier(),
        monitor.stats().average_fps.unwrap_or(0.0)
    );
    selector.apply_quality(monitor.tier().settings());

    // Deliberate runtime switch, then full teardown.
    let other = match selector.active_kind() {
        Some(BackendKind::Immersive) => BackendKind::Fallback,
        _ => BackendKind::Immersive,
    };
    selector.switch_backend(other, &mut monitor, now_ms).await?;
    drain_events(&bus);

    selector.dispose().await;
    log::info!("done");
    Ok(())
}
