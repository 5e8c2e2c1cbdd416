//! Environment overrides for the monitor configuration
//!
//! | Variable                   | Meaning                              |
//! |----------------------------|--------------------------------------|
//! | `PLANT_I2C_BUS`            | Bus number for both sensors          |
//! | `PLANT_LIGHT_ADDRESS`      | BH170 address, decimal or `0x..`     |
//! | `PLANT_PRESSURE_ADDRESS`   | BMP180 address, decimal or `0x..`    |
//! | `PLANT_OVERSAMPLING`       | BMP180 oversampling, `0` to `3`      |
//! | `PLANT_POLL_INTERVAL_SECS` | Seconds between polling cycles       |
//!
//! Unset variables keep the defaults from [`MonitorConfig::default`].

use plant_core::{MonitorConfig, Oversampling};
use thiserror_no_std::Error;

pub const VAR_BUS: &str = "PLANT_I2C_BUS";
pub const VAR_LIGHT_ADDRESS: &str = "PLANT_LIGHT_ADDRESS";
pub const VAR_PRESSURE_ADDRESS: &str = "PLANT_PRESSURE_ADDRESS";
pub const VAR_OVERSAMPLING: &str = "PLANT_OVERSAMPLING";
pub const VAR_POLL_INTERVAL: &str = "PLANT_POLL_INTERVAL_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{var}: cannot parse {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Build the configuration from the process environment.
pub fn load() -> Result<MonitorConfig, SettingsError> {
    from_lookup(|var| std::env::var(var).ok())
}

/// Build the configuration from any variable lookup.
pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<MonitorConfig, SettingsError> {
    let mut config = MonitorConfig::default();

    if let Some(bus) = parse_var(&lookup, VAR_BUS, |v| v.parse::<u8>().ok())? {
        config = config.with_bus(bus);
    }
    if let Some(address) = parse_var(&lookup, VAR_LIGHT_ADDRESS, parse_address)? {
        config.light.address = address;
    }
    if let Some(address) = parse_var(&lookup, VAR_PRESSURE_ADDRESS, parse_address)? {
        config.pressure.address = address;
    }
    if let Some(oversampling) = parse_var(&lookup, VAR_OVERSAMPLING, |v| {
        v.parse::<u8>().ok().and_then(Oversampling::from_bits)
    })? {
        config.pressure.oversampling = oversampling;
    }
    if let Some(secs) = parse_var(&lookup, VAR_POLL_INTERVAL, |v| v.parse::<u64>().ok())? {
        config.poll_interval_secs = secs;
    }

    Ok(config)
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, SettingsError> {
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    parse(value.trim())
        .map(Some)
        .ok_or(SettingsError::Invalid { var, value })
}

/// 7-bit I2C address, decimal or `0x`-prefixed hex.
fn parse_address(value: &str) -> Option<u8> {
    let address = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16).ok()?,
        None => value.parse::<u8>().ok()?,
    };
    (address <= 0x7f).then_some(address)
}
