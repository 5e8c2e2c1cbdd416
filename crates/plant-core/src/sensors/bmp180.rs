//! BMP180 temperature and pressure sensor
//!
//! Each read fetches the factory calibration block, triggers a temperature and
//! then a pressure conversion, and runs the datasheet compensation sequence.
//!
//! The compensation mixes integer shifts with real divisions (`x2` in the
//! temperature step, `p` in the pressure step). That mix changes the result in
//! the last pascal and is kept as is. All `>>` are arithmetic shifts on signed
//! integers, so negative intermediates round toward negative infinity.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{Sensor, SensorError, SensorReading, SensorReadings, bus_error};
use crate::config::PressureSensorConfig;

const REG_CALIBRATION: u8 = 0xAA;
const REG_CHIP_ID: u8 = 0xD0;
const REG_CONTROL: u8 = 0xF4;
const REG_RESULT: u8 = 0xF6;

const CALIBRATION_LEN: usize = 22;

const CMD_TEMPERATURE: u8 = 0x2E;
const CMD_PRESSURE: u8 = 0x34;

const TEMPERATURE_CONVERSION_MS: u32 = 5;

/// Value of the chip id register on a BMP180.
pub const BMP180_CHIP_ID: u8 = 0x55;

/// Standard sea-level pressure in pascals.
const SEA_LEVEL_PA: f64 = 101325.0;

const SENSOR_NAME: &str = "BMP180";

/// Pressure oversampling setting. Higher settings take longer and are less noisy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Oversampling {
    UltraLowPower,
    Standard,
    HighResolution,
    #[default]
    UltraHighResolution,
}

impl Oversampling {
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::UltraLowPower),
            1 => Some(Self::Standard),
            2 => Some(Self::HighResolution),
            3 => Some(Self::UltraHighResolution),
            _ => None,
        }
    }

    pub const fn bits(self) -> u8 {
        match self {
            Self::UltraLowPower => 0,
            Self::Standard => 1,
            Self::HighResolution => 2,
            Self::UltraHighResolution => 3,
        }
    }

    /// Control byte that starts a pressure conversion at this setting.
    pub const fn control_byte(self) -> u8 {
        CMD_PRESSURE + (self.bits() << 6)
    }

    /// Time to wait before the pressure result can be read.
    pub const fn conversion_time_ms(self) -> u32 {
        match self {
            Self::UltraLowPower => 5,
            Self::Standard => 8,
            Self::HighResolution => 14,
            Self::UltraHighResolution => 40,
        }
    }
}

/// Factory calibration coefficients from the sensor EEPROM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub ac1: i16,
    pub ac2: i16,
    pub ac3: i16,
    pub ac4: u16,
    pub ac5: u16,
    pub ac6: u16,
    pub b1: i16,
    pub b2: i16,
    pub mb: i16,
    pub mc: i16,
    pub md: i16,
}

/// Temperature, pressure and altitude after compensation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureReadings {
    /// Degrees Celsius, one decimal.
    pub temperature: f64,
    /// Pascals, always a whole number.
    pub air_pressure: f64,
    /// Metres above sea level, two decimals.
    pub altitude: f64,
}

impl SensorReadings for PressureReadings {
    fn into_reading(self) -> SensorReading {
        SensorReading::from_values([
            ("temperature", self.temperature),
            ("air_pressure", self.air_pressure),
            ("altitude", self.altitude),
        ])
    }
}

impl Calibration {
    /// Decode the big-endian calibration block starting at register `0xAA`.
    pub fn from_bytes(data: &[u8; CALIBRATION_LEN]) -> Self {
        let word = |index: usize| [data[index], data[index + 1]];

        Self {
            ac1: i16::from_be_bytes(word(0)),
            ac2: i16::from_be_bytes(word(2)),
            ac3: i16::from_be_bytes(word(4)),
            ac4: u16::from_be_bytes(word(6)),
            ac5: u16::from_be_bytes(word(8)),
            ac6: u16::from_be_bytes(word(10)),
            b1: i16::from_be_bytes(word(12)),
            b2: i16::from_be_bytes(word(14)),
            mb: i16::from_be_bytes(word(16)),
            mc: i16::from_be_bytes(word(18)),
            md: i16::from_be_bytes(word(20)),
        }
    }

    /// Turn raw temperature (`ut`) and pressure (`up`) counts into physical units.
    pub fn compensate(
        &self,
        ut: u16,
        up: u32,
        oversampling: Oversampling,
    ) -> Result<PressureReadings, SensorError> {
        let oss = oversampling.bits();

        let ac1 = i64::from(self.ac1);
        let ac2 = i64::from(self.ac2);
        let ac3 = i64::from(self.ac3);
        let ac4 = i64::from(self.ac4);
        let ac5 = i64::from(self.ac5);
        let ac6 = i64::from(self.ac6);
        let b1 = i64::from(self.b1);
        let b2 = i64::from(self.b2);
        let mc = i64::from(self.mc);
        let md = i64::from(self.md);

        // Temperature
        let x1 = ((i64::from(ut) - ac6) * ac5) >> 15;
        let divisor = x1 + md;
        if divisor == 0 {
            return Err(SensorError::Arithmetic {
                sensor: SENSOR_NAME,
                operation: "temperature compensation",
            });
        }
        let x2 = (mc << 11) as f64 / divisor as f64;
        let b5 = x1 as f64 + x2;
        let temperature = (((b5 + 8.0) as i64) >> 4) as f64 / 10.0;

        // Pressure
        let b6 = b5 - 4000.0;
        let b62 = ((b6 * b6) as i64) >> 12;
        let x1 = (b2 * b62) >> 11;
        let x2 = ((ac2 as f64 * b6) as i64) >> 11;
        let x3 = x1 + x2;
        let b3 = (((ac1 * 4 + x3) << oss) + 2) >> 2;

        let x1 = ((ac3 as f64 * b6) as i64) >> 13;
        let x2 = (b1 * b62) >> 16;
        let x3 = (x1 + x2 + 2) >> 2;
        let b4 = (ac4 * (x3 + 32768)) >> 15;
        if b4 == 0 {
            return Err(SensorError::Arithmetic {
                sensor: SENSOR_NAME,
                operation: "pressure compensation",
            });
        }

        // Wider from here on: with a bad calibration block b7 * 2 and p * p overflow i64.
        let b7 = (i128::from(up) - i128::from(b3)) * i128::from(50000_i64 >> oss);
        let p = (b7 * 2) as f64 / b4 as f64;

        let p_int = p as i128;
        let x1 = (p_int >> 8) * (p_int >> 8);
        let x1 = (x1 * 3038) >> 16;
        let x2 = ((-7357.0 * p) as i128) >> 16;
        let air_pressure = libm::trunc(p + ((x1 + x2 + 3791) >> 4) as f64);

        Ok(PressureReadings {
            temperature,
            air_pressure,
            altitude: pressure_altitude(air_pressure),
        })
    }
}

/// Altitude in metres for a pressure in pascals, using the international
/// barometric formula, rounded to two decimals.
pub fn pressure_altitude(pressure: f64) -> f64 {
    let altitude = 44330.0 * (1.0 - libm::pow(pressure / SEA_LEVEL_PA, 1.0 / 5.255));
    libm::round(altitude * 100.0) / 100.0
}

/// Contents of the chip id register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipIdentity {
    pub chip_id: u8,
    pub version: u8,
}

impl ChipIdentity {
    pub fn is_bmp180(&self) -> bool {
        self.chip_id == BMP180_CHIP_ID
    }
}

/// BMP180 driver. Holds no readings between calls.
pub struct BMP180<I, D> {
    i2c: I,
    delay: D,
    address: u8,
    oversampling: Oversampling,
}

impl<I: I2c, D: DelayNs> BMP180<I, D> {
    pub fn new(i2c: I, delay: D, config: &PressureSensorConfig) -> Self {
        Self {
            i2c,
            delay,
            address: config.address,
            oversampling: config.oversampling,
        }
    }

    pub fn oversampling(&self) -> Oversampling {
        self.oversampling
    }

    /// Read the chip id and version, for diagnostics.
    pub fn read_identity(&mut self) -> Result<ChipIdentity, SensorError> {
        let mut data = [0u8; 2];
        self.read_block(REG_CHIP_ID, &mut data, "read chip id")?;

        let identity = ChipIdentity {
            chip_id: data[0],
            version: data[1],
        };
        info!(
            "BMP180: chip id = {:#04x}, version = {:#04x}",
            identity.chip_id, identity.version
        );
        Ok(identity)
    }

    pub fn read_calibration(&mut self) -> Result<Calibration, SensorError> {
        let mut data = [0u8; CALIBRATION_LEN];
        self.read_block(REG_CALIBRATION, &mut data, "read calibration")?;
        Ok(Calibration::from_bytes(&data))
    }

    fn read_raw_temperature(&mut self) -> Result<u16, SensorError> {
        self.write_control(CMD_TEMPERATURE, "start temperature conversion")?;
        self.delay.delay_ms(TEMPERATURE_CONVERSION_MS);

        let mut data = [0u8; 2];
        self.read_block(REG_RESULT, &mut data, "read raw temperature")?;
        Ok(u16::from_be_bytes(data))
    }

    fn read_raw_pressure(&mut self) -> Result<u32, SensorError> {
        let oversampling = self.oversampling;
        self.write_control(oversampling.control_byte(), "start pressure conversion")?;
        self.delay.delay_ms(oversampling.conversion_time_ms());

        let mut data = [0u8; 3];
        self.read_block(REG_RESULT, &mut data, "read raw pressure")?;
        let raw = u32::from_be_bytes([0, data[0], data[1], data[2]]);
        Ok(raw >> (8 - oversampling.bits()))
    }

    fn read_block(
        &mut self,
        register: u8,
        buffer: &mut [u8],
        operation: &'static str,
    ) -> Result<(), SensorError> {
        self.i2c
            .write_read(self.address, &[register], buffer)
            .map_err(bus_error(SENSOR_NAME, operation))
    }

    fn write_control(&mut self, value: u8, operation: &'static str) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[REG_CONTROL, value])
            .map_err(bus_error(SENSOR_NAME, operation))
    }

    /// Give the bus handle and delay back.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }
}

impl<I: I2c, D: DelayNs> Sensor for BMP180<I, D> {
    const NAME: &'static str = SENSOR_NAME;

    type Readings = PressureReadings;

    fn read(&mut self) -> Result<PressureReadings, SensorError> {
        let calibration = self.read_calibration()?;
        let ut = self.read_raw_temperature()?;
        let up = self.read_raw_pressure()?;
        debug!("BMP180: ut = {}, up = {}, {:?}", ut, up, calibration);

        let readings = calibration.compensate(ut, up, self.oversampling)?;
        debug!(
            "BMP180: {} C, {} Pa, {} m",
            readings.temperature, readings.air_pressure, readings.altitude
        );
        Ok(readings)
    }
}
