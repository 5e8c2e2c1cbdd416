use serde::{Deserialize, Serialize};

use crate::sensors::Oversampling;

/// Raspberry Pi 4B exposes its user I2C bus as `/dev/i2c-1`.
pub const DEFAULT_I2C_BUS: u8 = 1;

pub const DEFAULT_LIGHT_ADDRESS: u8 = 0x23;

pub const DEFAULT_PRESSURE_ADDRESS: u8 = 0x77;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightSensorConfig {
    pub bus: u8,
    pub address: u8,
}

impl Default for LightSensorConfig {
    fn default() -> Self {
        Self {
            bus: DEFAULT_I2C_BUS,
            address: DEFAULT_LIGHT_ADDRESS,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressureSensorConfig {
    pub bus: u8,
    pub address: u8,
    pub oversampling: Oversampling,
}

impl Default for PressureSensorConfig {
    fn default() -> Self {
        Self {
            bus: DEFAULT_I2C_BUS,
            address: DEFAULT_PRESSURE_ADDRESS,
            oversampling: Oversampling::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub light: LightSensorConfig,
    pub pressure: PressureSensorConfig,
    /// Seconds to sleep between polling cycles.
    pub poll_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            light: LightSensorConfig::default(),
            pressure: PressureSensorConfig::default(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl MonitorConfig {
    /// Point both sensors at the same bus.
    pub fn with_bus(mut self, bus: u8) -> Self {
        self.light.bus = bus;
        self.pressure.bus = bus;
        self
    }
}
