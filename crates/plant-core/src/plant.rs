//! Sensor aggregation
//!
//! A [`Plant`] owns an ordered list of sensors and polls them one after the
//! other. Readings are keyed by each sensor's [`Sensor::NAME`](crate::sensors::Sensor::NAME).

use alloc::boxed::Box;
use alloc::vec::Vec;

use log::{debug, error};

use crate::sensors::{PlantSensor, SensorError, SensorReading};

/// Readings from one polling cycle, keyed by sensor name in polling order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantData {
    entries: Vec<(&'static str, SensorReading)>,
}

impl PlantData {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Store `reading` under `name`. A repeated name overwrites the earlier
    /// reading and keeps its position.
    pub fn insert(&mut self, name: &'static str, reading: SensorReading) {
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = reading,
            None => self.entries.push((name, reading)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SensorReading> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, reading)| reading)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SensorReading)> + '_ {
        self.entries.iter().map(|(name, reading)| (*name, reading))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The monitored plant and the sensors that characterize it.
pub struct Plant<'a> {
    sensors: Vec<Box<dyn PlantSensor + 'a>>,
}

impl<'a> Plant<'a> {
    pub fn new(sensors: Vec<Box<dyn PlantSensor + 'a>>) -> Self {
        Self { sensors }
    }

    pub fn add_sensor(&mut self, sensor: impl PlantSensor + 'a) {
        self.sensors.push(Box::new(sensor));
    }

    pub fn sensor_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sensors.iter().map(|sensor| sensor.name())
    }

    /// Read every sensor in order.
    ///
    /// The first failure is returned as is and nothing collected so far is kept.
    pub fn collect(&mut self) -> Result<PlantData, SensorError> {
        let mut data = PlantData::new();

        for sensor in self.sensors.iter_mut() {
            let name = sensor.name();
            let reading = sensor.read_reading().map_err(|e| {
                error!("Failed to read {}: {}", name, e);
                e
            })?;
            debug!("{}: {} values", name, reading.len());
            data.insert(name, reading);
        }

        Ok(data)
    }
}
