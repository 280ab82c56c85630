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

//! WGPU-backed host environment.
//!
//! Capability detection requests a throwaway adapter per probed API level
//! and never keeps GPU state alive; the chosen backend creates its own
//! context afterwards. Accessibility and power signals that have no
//! portable host API here are read from environment variables so headless
//! deployments can still steer the selection.

use anyhow::{anyhow, Result};
use vista_core::capability::{
    ConnectionQuality, DeviceClass, GraphicsApi, HostEnvironment, PowerState,
};

/// Environment variable forcing the reduced-motion fallback path.
pub const REDUCED_MOTION_ENV: &str = "VISTA_REDUCED_MOTION";
/// Environment variable reporting a low-power host.
pub const LOW_POWER_ENV: &str = "VISTA_LOW_POWER";

/// Host environment that answers capability questions through WGPU.
#[derive(Debug, Default)]
pub struct WgpuHostEnvironment;

impl WgpuHostEnvironment {
    /// Creates the probe. No GPU state is held between calls.
    pub fn new() -> Self {
        Self
    }

    fn request_throwaway_adapter() -> Result<wgpu::AdapterInfo> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::new_without_display_handle());
        let adapter = pollster::block_on(
            instance.request_adapter(&wgpu::RequestAdapterOptions::default()),
        )
        .map_err(|e| anyhow!("no graphics adapter available: {e}"))?;
        Ok(adapter.get_info())
    }
}

impl HostEnvironment for WgpuHostEnvironment {
    fn try_create_context(&self, api: GraphicsApi) -> Result<()> {
        let info = Self::request_throwaway_adapter()?;
        log::debug!(
            "Probe adapter for {api:?}: \"{}\" ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );
        match api {
            GraphicsApi::Basic => Ok(()),
            GraphicsApi::Modern => {
                // A CPU rasterizer technically answers the request but cannot
                // sustain the immersive workload; treat it as unsupported.
                if info.device_type == wgpu::DeviceType::Cpu {
                    Err(anyhow!("only a software rasterizer is available"))
                } else {
                    Ok(())
                }
            }
        }
    }

    fn reduced_motion(&self) -> bool {
        env_flag(REDUCED_MOTION_ENV)
    }

    fn power_state(&self) -> PowerState {
        if env_flag(LOW_POWER_ENV) {
            PowerState::Low
        } else {
            PowerState::Unknown
        }
    }

    fn device_class(&self) -> DeviceClass {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            DeviceClass::Handheld
        } else {
            DeviceClass::Desktop
        }
    }

    fn connection_quality(&self) -> Option<ConnectionQuality> {
        // No portable bandwidth signal on native hosts.
        None
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| parse_flag(&value))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
