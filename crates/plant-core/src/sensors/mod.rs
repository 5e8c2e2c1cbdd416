mod bh170;
mod bmp180;
#[cfg(test)]
pub(crate) mod mock;

use embedded_hal::i2c::ErrorKind;
use heapless::Vec;
use log::error;
use thiserror_no_std::Error;

pub use bh170::{BH170, LightReadings, convert_to_lux};
pub use bmp180::{
    BMP180, BMP180_CHIP_ID, Calibration, ChipIdentity, Oversampling, PressureReadings,
    pressure_altitude,
};

/// Maximum number of named values a single sensor reading can hold.
pub const MAX_READING_VALUES: usize = 4;

/// Errors produced while reading a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SensorError {
    /// The I2C transaction failed.
    #[error("{sensor}: bus error during {operation}: {kind}")]
    Transport {
        sensor: &'static str,
        operation: &'static str,
        kind: ErrorKind,
    },

    /// A compensation step divided by zero.
    #[error("{sensor}: division by zero during {operation}")]
    Arithmetic {
        sensor: &'static str,
        operation: &'static str,
    },
}

/// Build a `map_err` closure that logs a bus failure and turns it into a [`SensorError`].
pub(crate) fn bus_error<E: embedded_hal::i2c::Error>(
    sensor: &'static str,
    operation: &'static str,
) -> impl FnOnce(E) -> SensorError {
    move |e| {
        error!("{} {} failed: {:?}", sensor, operation, e);
        SensorError::Transport {
            sensor,
            operation,
            kind: e.kind(),
        }
    }
}

/// Named values produced by one sensor during one read, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorReading {
    values: Vec<(&'static str, f64), MAX_READING_VALUES>,
}

impl SensorReading {
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Build a reading from a fixed list of key/value pairs.
    pub fn from_values<const N: usize>(values: [(&'static str, f64); N]) -> Self {
        const { assert!(N <= MAX_READING_VALUES, "too many values for one reading") };

        let mut reading = Self::new();
        for (key, value) in values {
            let inserted = reading.insert(key, value);
            debug_assert!(inserted);
        }
        reading
    }

    /// Set `key` to `value`. An existing key keeps its position.
    ///
    /// Returns `false` if the key is new and the reading is already full.
    pub fn insert(&mut self, key: &'static str, value: f64) -> bool {
        if let Some(slot) = self.values.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
            return true;
        }
        self.values.push((key, value)).is_ok()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Typed readings that can be flattened into a named [`SensorReading`].
pub trait SensorReadings {
    fn into_reading(self) -> SensorReading;
}

/// Trait for sensors that produce typed readings.
pub trait Sensor {
    /// Identity used to key this sensor's readings in an aggregate.
    const NAME: &'static str;

    /// The type of readings this sensor produces.
    type Readings: SensorReadings;

    /// Read the sensor and return typed readings.
    fn read(&mut self) -> Result<Self::Readings, SensorError>;
}

/// Object-safe view of a [`Sensor`], so drivers of different types can be
/// polled from one list.
pub trait PlantSensor {
    fn name(&self) -> &'static str;

    fn read_reading(&mut self) -> Result<SensorReading, SensorError>;
}

impl<S: Sensor> PlantSensor for S {
    fn name(&self) -> &'static str {
        S::NAME
    }

    fn read_reading(&mut self) -> Result<SensorReading, SensorError> {
        self.read().map(SensorReadings::into_reading)
    }
}
