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

//! # Vista Telemetry
//!
//! Frame-timing telemetry and the hysteresis state machine that walks the
//! quality preset ladder. The monitor is driven once per frame by an
//! external animation scheduler; it never spawns work of its own.

pub mod monitor;
pub mod window;

pub use monitor::{MonitorConfig, MonitorStats, PerformanceMonitor};
pub use window::FrameSampleWindow;
