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

//! The performance monitor and its hysteresis adaptation ladder.
//!
//! Downgrades are immediate: one check below the downgrade threshold steps
//! the quality tier down, preserving interactivity on a frame-rate cliff.
//! Upgrades require a confirmed streak of stable checks, preventing visible
//! preset flapping around the threshold.

use crate::window::FrameSampleWindow;
use vista_core::capability::DeviceClass;
use vista_core::event::ControlEvent;
use vista_core::quality::QualityTier;

/// Tuning knobs for the performance monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// The frame rate the adaptation ladder aims for.
    pub target_fps: f32,
    /// Downgrade when the rolling average drops below `target_fps * downgrade_ratio`.
    pub downgrade_ratio: f32,
    /// A check counts toward the upgrade streak only above `target_fps * upgrade_ratio`.
    pub upgrade_ratio: f32,
    /// Minimum time between adaptation checks.
    pub check_interval_ms: f64,
    /// Consecutive qualifying checks required before stepping up one tier.
    pub upgrade_streak: u32,
    /// Capacity of the FPS sample window.
    pub window_capacity: usize,
    /// Quiet period after a reset before the first check runs, so a freshly
    /// switched backend is not judged on warm-up-skewed samples.
    pub grace_period_ms: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            downgrade_ratio: 0.8,
            upgrade_ratio: 0.95,
            check_interval_ms: 1000.0,
            upgrade_streak: 5,
            window_capacity: 60,
            grace_period_ms: 2000.0,
        }
    }
}

/// A snapshot of the monitor's observable state.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorStats {
    /// Rolling average FPS over the current window, if any samples exist.
    pub average_fps: Option<f32>,
    /// Number of samples currently in the window.
    pub sample_count: usize,
    /// The active quality tier.
    pub tier: QualityTier,
    /// Whether adaptation checks are suspended.
    pub locked: bool,
    /// Total adaptation checks evaluated.
    pub checks_run: u64,
    /// Total downgrade transitions.
    pub downgrades: u64,
    /// Total upgrade transitions.
    pub upgrades: u64,
}

/// Samples frame timing and walks the quality preset ladder.
///
/// Driven once per frame by an external scheduler via [`tick`](Self::tick).
/// All state mutation happens synchronously inside that call; the monitor
/// owns its sample window exclusively and spawns no workers.
pub struct PerformanceMonitor {
    config: MonitorConfig,
    window: FrameSampleWindow,
    tier: QualityTier,
    stable_checks: u32,
    last_check_ms: Option<f64>,
    grace_until_ms: f64,
    locked: bool,
    events: flume::Sender<ControlEvent>,
    checks_run: u64,
    downgrades: u64,
    upgrades: u64,
}

impl PerformanceMonitor {
    /// Creates a monitor with the initial tier chosen from the coarse
    /// device heuristic. No samples exist at construction, so the choice is
    /// independent of measurement.
    pub fn new(
        config: MonitorConfig,
        device_class: DeviceClass,
        low_power: bool,
        events: flume::Sender<ControlEvent>,
    ) -> Self {
        let tier = Self::initial_tier_for(device_class, low_power);
        log::info!("Performance monitor starting at tier '{tier}' (device {device_class:?})");
        let window = FrameSampleWindow::new(config.window_capacity);
        Self {
            config,
            window,
            tier,
            stable_checks: 0,
            last_check_ms: None,
            grace_until_ms: 0.0,
            locked: false,
            events,
            checks_run: 0,
            downgrades: 0,
            upgrades: 0,
        }
    }

    /// The coarse construction-time tier heuristic.
    pub fn initial_tier_for(device_class: DeviceClass, low_power: bool) -> QualityTier {
        match (device_class, low_power) {
            (DeviceClass::Handheld, _) => QualityTier::Low,
            (DeviceClass::Desktop, true) => QualityTier::Medium,
            (DeviceClass::Desktop, false) => QualityTier::High,
        }
    }

    /// Records one frame timestamp and, when due, runs one adaptation check.
    pub fn tick(&mut self, now_ms: f64) {
        if let Some(fps) = self.window.observe(now_ms) {
            log::trace!("Frame sample: {fps:.1} FPS");
        }

        match self.last_check_ms {
            None => {
                // First tick after construction or reset arms the timer.
                self.last_check_ms = Some(now_ms);
            }
            Some(last) => {
                if now_ms - last >= self.config.check_interval_ms && now_ms >= self.grace_until_ms
                {
                    self.last_check_ms = Some(now_ms);
                    self.run_check();
                }
            }
        }
    }

    fn run_check(&mut self) {
        if self.locked {
            return;
        }
        let Some(average) = self.window.average() else {
            return;
        };
        self.checks_run += 1;

        let downgrade_below = self.config.target_fps * self.config.downgrade_ratio;
        let upgrade_above = self.config.target_fps * self.config.upgrade_ratio;

        if average < downgrade_below {
            self.stable_checks = 0;
            if let Some(lower) = self.tier.lower() {
                log::warn!(
                    "Average {average:.1} FPS below {downgrade_below:.1}, stepping down to '{lower}'"
                );
                self.downgrades += 1;
                self.transition_to(lower);
            }
        } else if average > upgrade_above {
            self.stable_checks += 1;
            if self.stable_checks >= self.config.upgrade_streak {
                self.stable_checks = 0;
                if let Some(higher) = self.tier.higher() {
                    log::info!(
                        "Average {average:.1} FPS stable above {upgrade_above:.1}, stepping up to '{higher}'"
                    );
                    self.upgrades += 1;
                    self.transition_to(higher);
                }
            }
        } else {
            // Middle band: the average fell back below the upgrade
            // threshold, so any accumulated streak is void.
            self.stable_checks = 0;
        }
    }

    fn transition_to(&mut self, new: QualityTier) {
        let old = self.tier;
        self.tier = new;
        let event = ControlEvent::QualityChanged {
            old,
            new,
            settings: *new.settings(),
        };
        if let Err(e) = self.events.send(event) {
            log::error!("Dropped quality-change event: {e}");
        }
    }

    /// Forces a tier, firing the same quality-changed notification as an
    /// adaptation step. The stable streak restarts from zero.
    pub fn set_tier(&mut self, tier: QualityTier) {
        self.stable_checks = 0;
        if tier != self.tier {
            log::info!("Quality tier forced to '{tier}'");
            self.transition_to(tier);
        }
    }

    /// Suspends (`true`) or resumes (`false`) adaptation checks. Sampling
    /// continues either way.
    pub fn lock(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Clears the sample window and the stable streak, and arms the grace
    /// period. Call after a backend switch and on visibility resume.
    pub fn reset(&mut self, now_ms: f64) {
        self.window.clear();
        self.stable_checks = 0;
        self.last_check_ms = None;
        self.grace_until_ms = now_ms + self.config.grace_period_ms;
        log::debug!(
            "Performance monitor reset; first check deferred until {:.0} ms",
            self.grace_until_ms
        );
    }

    /// The active quality tier.
    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    /// Whether adaptation checks are currently suspended.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The monitor configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Reports FPS, tier, lock state and transition counters.
    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            average_fps: self.window.average(),
            sample_count: self.window.len(),
            tier: self.tier,
            locked: self.locked,
            checks_run: self.checks_run,
            downgrades: self.downgrades,
            upgrades: self.upgrades,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_core::event::EventBus;

    fn test_config() -> MonitorConfig {
        MonitorConfig {
            grace_period_ms: 0.0,
            ..MonitorConfig::default()
        }
    }

    fn monitor_with_bus(config: MonitorConfig) -> (PerformanceMonitor, EventBus<ControlEvent>) {
        let bus = EventBus::new();
        let monitor =
            PerformanceMonitor::new(config, DeviceClass::Desktop, false, bus.sender());
        (monitor, bus)
    }

    /// Feeds frames at a constant FPS until just past the next check boundary.
    fn feed_frames(monitor: &mut PerformanceMonitor, start_ms: f64, fps: f64, duration_ms: f64) {
        let step = 1000.0 / fps;
        let mut now = start_ms;
        while now <= start_ms + duration_ms {
            monitor.tick(now);
            now += step;
        }
    }

    #[test]
    fn initial_tier_follows_device_heuristic() {
        assert_eq!(
            PerformanceMonitor::initial_tier_for(DeviceClass::Handheld, false),
            QualityTier::Low
        );
        assert_eq!(
            PerformanceMonitor::initial_tier_for(DeviceClass::Desktop, true),
            QualityTier::Medium
        );
        assert_eq!(
            PerformanceMonitor::initial_tier_for(DeviceClass::Desktop, false),
            QualityTier::High
        );
    }

    #[test]
    fn downgrade_is_immediate_and_resets_streak() {
        let (mut monitor, bus) = monitor_with_bus(test_config());
        assert_eq!(monitor.tier(), QualityTier::High);

        feed_frames(&mut monitor, 0.0, 40.0, 1100.0);

        assert_eq!(monitor.tier(), QualityTier::Medium);
        let stats = monitor.stats();
        assert_eq!(stats.downgrades, 1);
        let events = bus.drain();
        assert_eq!(
            events,
            vec![ControlEvent::QualityChanged {
                old: QualityTier::High,
                new: QualityTier::Medium,
                settings: *QualityTier::Medium.settings(),
            }]
        );
    }

    #[test]
    fn upgrade_requires_the_full_streak() {
        let (mut monitor, bus) = monitor_with_bus(test_config());
        monitor.set_tier(QualityTier::Medium);
        bus.drain();

        // 59 FPS > 60 * 0.95; each check interval contributes one
        // qualifying check. Four checks: no upgrade yet.
        feed_frames(&mut monitor, 0.0, 59.0, 4100.0);
        assert_eq!(monitor.tier(), QualityTier::Medium);
        assert!(bus.drain().is_empty());

        // The fifth consecutive qualifying check upgrades exactly once.
        feed_frames(&mut monitor, 4200.0, 59.0, 1000.0);
        assert_eq!(monitor.tier(), QualityTier::High);
        let events = bus.drain();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn middle_band_voids_the_streak() {
        let config = MonitorConfig {
            upgrade_streak: 2,
            ..test_config()
        };
        let (mut monitor, bus) = monitor_with_bus(config);
        monitor.set_tier(QualityTier::Medium);
        bus.drain();

        // One qualifying check...
        feed_frames(&mut monitor, 0.0, 59.0, 1100.0);
        assert_eq!(monitor.tier(), QualityTier::Medium);
        // ...then a middle-band check (52 FPS is between 48 and 57).
        feed_frames(&mut monitor, 1200.0, 52.0, 1300.0);
        // One more qualifying check follows. Had the middle band preserved
        // the streak this would be the second qualifying check and an
        // upgrade; with the restart it is only the first.
        feed_frames(&mut monitor, 2600.0, 59.0, 1500.0);
        assert_eq!(monitor.tier(), QualityTier::Medium);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn no_step_below_minimal_or_above_ultra() {
        let (mut monitor, bus) = monitor_with_bus(MonitorConfig {
            upgrade_streak: 1,
            ..test_config()
        });
        monitor.set_tier(QualityTier::Minimal);
        bus.drain();
        feed_frames(&mut monitor, 0.0, 10.0, 2500.0);
        assert_eq!(monitor.tier(), QualityTier::Minimal);
        assert!(bus.drain().is_empty());

        monitor.set_tier(QualityTier::Ultra);
        monitor.reset(3000.0);
        bus.drain();
        feed_frames(&mut monitor, 3000.0, 120.0, 2500.0);
        assert_eq!(monitor.tier(), QualityTier::Ultra);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn lock_suspends_checks() {
        let (mut monitor, bus) = monitor_with_bus(test_config());
        monitor.lock(true);
        feed_frames(&mut monitor, 0.0, 20.0, 3000.0);
        assert_eq!(monitor.tier(), QualityTier::High);
        assert_eq!(monitor.stats().checks_run, 0);
        assert!(bus.drain().is_empty());

        monitor.lock(false);
        feed_frames(&mut monitor, 3100.0, 20.0, 1100.0);
        assert_eq!(monitor.tier(), QualityTier::Medium);
    }

    #[test]
    fn reset_arms_grace_period() {
        let config = MonitorConfig {
            grace_period_ms: 2000.0,
            ..MonitorConfig::default()
        };
        let (mut monitor, bus) = monitor_with_bus(config);

        monitor.reset(0.0);
        // Terrible frame rate during warm-up must not be judged before the
        // grace deadline.
        feed_frames(&mut monitor, 0.0, 15.0, 1900.0);
        assert_eq!(monitor.tier(), QualityTier::High);
        assert!(bus.drain().is_empty());

        // Past the deadline the ladder reacts again.
        feed_frames(&mut monitor, 2000.0, 15.0, 1200.0);
        assert_eq!(monitor.tier(), QualityTier::Medium);
    }

    #[test]
    fn set_tier_fires_event_once_and_only_on_change() {
        let (mut monitor, bus) = monitor_with_bus(test_config());
        monitor.set_tier(QualityTier::Low);
        monitor.set_tier(QualityTier::Low);
        let events = bus.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            ControlEvent::QualityChanged {
                old: QualityTier::High,
                new: QualityTier::Low,
                settings: *QualityTier::Low.settings(),
            }
        );
    }

    #[test]
    fn stats_report_window_and_counters() {
        let (mut monitor, _bus) = monitor_with_bus(test_config());
        feed_frames(&mut monitor, 0.0, 60.0, 500.0);
        let stats = monitor.stats();
        assert!(stats.sample_count > 0);
        assert!(stats.average_fps.is_some());
        assert_eq!(stats.tier, QualityTier::High);
        assert!(!stats.locked);
    }
}
