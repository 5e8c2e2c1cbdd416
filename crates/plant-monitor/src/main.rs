//! Plant monitor for the Raspberry Pi.
//!
//! Polls a BH170 light sensor and a BMP180 temperature/pressure sensor over
//! `/dev/i2c-*`, prints their readings and sleeps until the next cycle. Runs
//! until interrupted.
//!
//! Log output is controlled with `RUST_LOG`; readings go to stdout.

mod settings;

use std::process;
use std::thread;
use std::time::Duration;

use linux_embedded_hal::{Delay, I2cdev};
use log::{error, info, warn};

use plant_core::{BH170, BMP180, Plant, format_report};

fn open_bus(bus: u8) -> I2cdev {
    let path = format!("/dev/i2c-{bus}");
    match I2cdev::new(&path) {
        Ok(i2c) => i2c,
        Err(e) => {
            error!("Failed to open {}: {}", path, e);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded settings from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Ignoring .env file: {}", e),
    }

    let config = match settings::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };
    info!("Starting plant monitor: {:?}", config);

    let light = BH170::new(open_bus(config.light.bus), &config.light);
    let mut pressure = BMP180::new(open_bus(config.pressure.bus), Delay, &config.pressure);

    match pressure.read_identity() {
        Ok(identity) if !identity.is_bmp180() => warn!(
            "Unexpected chip id {:#04x} at {:#04x}, readings may be wrong",
            identity.chip_id, config.pressure.address
        ),
        Ok(_) => {}
        Err(e) => warn!("Could not read BMP180 identity: {}", e),
    }

    let mut plant = Plant::new(Vec::new());
    plant.add_sensor(light);
    plant.add_sensor(pressure);

    let interval = Duration::from_secs(config.poll_interval_secs);
    loop {
        match plant.collect() {
            Ok(data) => print!("{}", format_report(&data)),
            // One bad cycle does not stop the monitor.
            Err(e) => error!("Polling cycle failed: {}", e),
        }
        thread::sleep(interval);
    }
}
