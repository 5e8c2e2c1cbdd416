//! Scripted I2C bus and delay used by the driver tests.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockI2cError;

impl embedded_hal::i2c::Error for MockI2cError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
    }
}

/// Answers register reads from a table keyed by `(address, register)` and
/// records every write.
///
/// A conversion trigger loads new data into a result register when a given
/// value is written to a control register, the way a measurement command does.
#[derive(Debug, Default)]
pub struct MockI2c {
    registers: BTreeMap<(u8, u8), Vec<u8>>,
    triggers: BTreeMap<(u8, u8, u8), (u8, Vec<u8>)>,
    failing: Vec<u8>,
    pointer: Option<u8>,
    pub writes: Vec<(u8, Vec<u8>)>,
}

impl MockI2c {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_register(mut self, address: u8, register: u8, data: &[u8]) -> Self {
        self.registers.insert((address, register), data.to_vec());
        self
    }

    pub fn with_conversion(
        mut self,
        address: u8,
        control: (u8, u8),
        result_register: u8,
        data: &[u8],
    ) -> Self {
        self.triggers
            .insert((address, control.0, control.1), (result_register, data.to_vec()));
        self
    }

    /// Fail any transaction that selects `register`.
    pub fn failing_on(mut self, register: u8) -> Self {
        self.failing.push(register);
        self
    }

    /// Writes longer than a bare register pointer, i.e. `[register, value, ..]`.
    pub fn register_writes(&self) -> Vec<(u8, u8, u8)> {
        self.writes
            .iter()
            .filter(|(_, bytes)| bytes.len() >= 2)
            .map(|(address, bytes)| (*address, bytes[0], bytes[1]))
            .collect()
    }
}

impl ErrorType for MockI2c {
    type Error = MockI2cError;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    if let Some(&register) = bytes.first() {
                        if self.failing.contains(&register) {
                            return Err(MockI2cError);
                        }
                        self.pointer = Some(register);
                        if let Some(&value) = bytes.get(1) {
                            if let Some((result, data)) =
                                self.triggers.get(&(address, register, value))
                            {
                                self.registers.insert((address, *result), data.clone());
                            }
                        }
                    }
                    self.writes.push((address, bytes.to_vec()));
                }
                Operation::Read(buffer) => {
                    let register = self.pointer.ok_or(MockI2cError)?;
                    let data = self
                        .registers
                        .get(&(address, register))
                        .ok_or(MockI2cError)?;
                    if data.len() < buffer.len() {
                        return Err(MockI2cError);
                    }
                    buffer.copy_from_slice(&data[..buffer.len()]);
                }
            }
        }
        Ok(())
    }
}

/// Records requested delays instead of sleeping.
#[derive(Debug, Default)]
pub struct MockDelay {
    pub delays_ns: Vec<u64>,
}

impl MockDelay {
    pub fn total_ms(&self) -> u64 {
        self.delays_ns.iter().sum::<u64>() / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delays_ns.push(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.delays_ns.push(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ns.push(u64::from(ms) * 1_000_000);
    }
}
