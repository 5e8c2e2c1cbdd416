use embedded_hal::i2c::I2c;
use log::debug;

use super::{Sensor, SensorError, SensorReading, SensorReadings, bus_error};
use crate::config::LightSensorConfig;

/// One-time high-resolution measurement. The result is read straight back.
const CMD_ONE_TIME_HIGH_RES: u8 = 0x20;

/// Counts per lux in high-resolution mode.
const COUNTS_PER_LUX: f64 = 1.2;

/// Convert the two measurement bytes (MSB first) into lux.
pub fn convert_to_lux(data: [u8; 2]) -> f64 {
    f64::from(u16::from_be_bytes(data)) / COUNTS_PER_LUX
}

pub struct LightReadings {
    pub light_intensity: f64,
}

impl SensorReadings for LightReadings {
    fn into_reading(self) -> SensorReading {
        SensorReading::from_values([("light_intensity", self.light_intensity)])
    }
}

/// BH170 ambient light sensor.
pub struct BH170<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> BH170<I> {
    pub fn new(i2c: I, config: &LightSensorConfig) -> Self {
        Self {
            i2c,
            address: config.address,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus handle back.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> Sensor for BH170<I> {
    const NAME: &'static str = "BH170";

    type Readings = LightReadings;

    fn read(&mut self) -> Result<LightReadings, SensorError> {
        let mut data = [0u8; 2];
        self.i2c
            .write_read(self.address, &[CMD_ONE_TIME_HIGH_RES], &mut data)
            .map_err(bus_error(Self::NAME, "read light measurement"))?;

        let light_intensity = convert_to_lux(data);
        debug!("BH170: raw = {:02x?}, lux = {}", data, light_intensity);

        Ok(LightReadings { light_intensity })
    }
}
