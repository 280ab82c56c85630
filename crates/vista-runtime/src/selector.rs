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

//! Owns the live backend and drives its lifecycle.
//!
//! Exactly one backend is live at a time. A switch fully awaits disposal of
//! the old backend before constructing the new one; the two never overlap.
//! A second switch issued while one is in flight is rejected with a
//! descriptive error rather than queued.

use crate::selection::{choose_backend, InitializeOptions};
use vista_core::backend::{BackendFactory, BackendKind, RenderBackend};
use vista_core::capability::{probe_capabilities, CapabilitySnapshot, HostEnvironment};
use vista_core::error::SelectorError;
use vista_core::event::ControlEvent;
use vista_core::prefs::PreferenceStore;
use vista_core::quality::QualitySettings;
use vista_telemetry::PerformanceMonitor;
use std::sync::Arc;

/// Probes client capability, chooses a backend, and owns it.
pub struct BackendSelector {
    env: Arc<dyn HostEnvironment>,
    factory: Box<dyn BackendFactory>,
    store: Box<dyn PreferenceStore>,
    events: flume::Sender<ControlEvent>,
    snapshot: Option<CapabilitySnapshot>,
    active: Option<Box<dyn RenderBackend>>,
    switching: bool,
}

impl BackendSelector {
    /// Creates a selector with no live backend. Call
    /// [`initialize`](Self::initialize) to bring one up.
    pub fn new(
        env: Arc<dyn HostEnvironment>,
        factory: Box<dyn BackendFactory>,
        store: Box<dyn PreferenceStore>,
        events: flume::Sender<ControlEvent>,
    ) -> Self {
        Self {
            env,
            factory,
            store,
            events,
            snapshot: None,
            active: None,
            switching: false,
        }
    }

    /// Probes capability once, chooses a backend by strict precedence, and
    /// initializes it.
    ///
    /// Backend initialization failure is the one hard error surfaced out of
    /// the subsystem; the caller may retry with an explicit fallback
    /// override in the options. No internal retry happens.
    pub async fn initialize(
        &mut self,
        options: InitializeOptions,
    ) -> Result<BackendKind, SelectorError> {
        // Re-initialization after a full dispose is part of the lifecycle;
        // tear down anything still live first.
        if let Some(mut old) = self.active.take() {
            log::debug!("Re-initializing with a live backend; disposing it first");
            old.dispose().await;
        }

        let snapshot = probe_capabilities(self.env.as_ref());
        self.snapshot = Some(snapshot);

        let persisted = self.store.load();
        let (kind, reason) = choose_backend(&snapshot, &options, persisted);
        log::info!("Backend choice: {kind} ({reason:?})");

        if reason.is_automatic_fallback() && self.store.load() == Some(BackendKind::Fallback) {
            // A stale deliberate-looking "fallback" entry would pin future
            // sessions to the fallback; the automatic rule already covers
            // this session, so let later ones re-attempt the immersive path.
            log::info!("Clearing stale persisted fallback preference");
            self.store.clear();
        }

        let mut backend = self.factory.create(kind);
        backend.initialize(&snapshot).await.map_err(|e| {
            log::error!("Backend initialization failed: {e}");
            SelectorError::from(e)
        })?;
        self.active = Some(backend);

        self.publish(ControlEvent::BackendReady { kind, snapshot });
        Ok(kind)
    }

    /// Switches to the other backend at runtime.
    ///
    /// No-op when `kind` is already active. The old backend is fully
    /// disposed before the new one is constructed; the performance monitor
    /// is reset with its grace period so the fresh backend is not judged on
    /// warm-up samples; the deliberate choice is persisted.
    pub async fn switch_backend(
        &mut self,
        kind: BackendKind,
        monitor: &mut PerformanceMonitor,
        now_ms: f64,
    ) -> Result<(), SelectorError> {
        if self.switching {
            return Err(SelectorError::SwitchInProgress);
        }
        if self.active_kind() == Some(kind) {
            log::debug!("Already on the {kind} backend; switch is a no-op");
            return Ok(());
        }
        let snapshot = self.snapshot.ok_or(SelectorError::NotInitialized)?;

        self.switching = true;
        let outcome = self.perform_switch(kind, snapshot, monitor, now_ms).await;
        self.switching = false;
        outcome
    }

    async fn perform_switch(
        &mut self,
        kind: BackendKind,
        snapshot: CapabilitySnapshot,
        monitor: &mut PerformanceMonitor,
        now_ms: f64,
    ) -> Result<(), SelectorError> {
        if let Some(mut old) = self.active.take() {
            let old_kind = old.kind();
            log::info!("Disposing the {old_kind} backend before switching to {kind}");
            old.dispose().await;
        }

        let mut backend = self.factory.create(kind);
        backend.initialize(&snapshot).await?;
        self.active = Some(backend);

        monitor.reset(now_ms);
        self.store.save(kind);
        self.publish(ControlEvent::BackendSwitched { kind });
        log::info!("Switched to the {kind} backend");
        Ok(())
    }

    /// Forwards the per-frame update to the active backend.
    pub fn update(&mut self, dt_secs: f32) {
        if let Some(backend) = self.active.as_mut() {
            backend.update(dt_secs);
        }
    }

    /// Applies new quality tuning values to the active backend.
    pub fn apply_quality(&mut self, settings: &QualitySettings) {
        if let Some(backend) = self.active.as_mut() {
            backend.apply_quality(settings);
        }
    }

    /// Tears down the live backend, if any. Safe to call repeatedly.
    pub async fn dispose(&mut self) {
        if let Some(mut backend) = self.active.take() {
            backend.dispose().await;
        }
        self.snapshot = None;
    }

    /// The kind of the live backend, if one is up.
    pub fn active_kind(&self) -> Option<BackendKind> {
        self.active.as_ref().map(|b| b.kind())
    }

    /// The snapshot from the most recent probe.
    pub fn snapshot(&self) -> Option<&CapabilitySnapshot> {
        self.snapshot.as_ref()
    }

    /// Whether a switch is currently in flight.
    pub fn is_switching(&self) -> bool {
        self.switching
    }

    fn publish(&self, event: ControlEvent) {
        if let Err(e) = self.events.send(event) {
            log::error!("Dropped selector event: {e}");
        }
    }
}
