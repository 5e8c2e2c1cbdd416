//! Hardware-independent core library for the plant monitor
//!
//! This crate contains the platform-agnostic logic of the plant monitor: the
//! sensor capability trait, the BH170 light sensor and BMP180
//! temperature/pressure drivers, the aggregator that polls them and the
//! report formatting.
//!
//! Drivers are generic over [`embedded_hal::i2c::I2c`] and
//! [`embedded_hal::delay::DelayNs`], so the same code runs against a Linux
//! `/dev/i2c-*` device on a Raspberry Pi and against a scripted bus in tests.
//!
//! It is `#![no_std]` with `extern crate alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod plant;
pub mod report;
pub mod sensors;

pub use config::{LightSensorConfig, MonitorConfig, PressureSensorConfig};
pub use plant::{Plant, PlantData};
pub use report::{format_report, write_report};
pub use sensors::{
    BH170, BMP180, Calibration, ChipIdentity, Oversampling, PlantSensor, Sensor, SensorError,
    SensorReading, SensorReadings,
};
