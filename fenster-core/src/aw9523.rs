//! AW9523 Konstantstrom-Treiber (16 Kanäle, I2C)
//!
//! Nur `embedded-hal` Traits, dadurch auf dem Host mit einem Mock-Bus
//! testbar. Im LED-Modus steuert ein Dimm-Register pro Pin den Strom
//! (0-255 Stufen bis zum globalen Maximalstrom).

use embedded_hal::i2c::I2c;

use crate::traits::{CurrentBus, HardwareIoError};
use crate::types::{Channel, Intensity};

/// Standard-Adresse (AD0/AD1 offen)
pub const DEFAULT_ADDRESS: u8 = 0x58;

const REG_CONFIG_PORT0: u8 = 0x04;
const REG_CONFIG_PORT1: u8 = 0x05;
const REG_CHIP_ID: u8 = 0x10;
const REG_LED_MODE_PORT0: u8 = 0x12;
const REG_LED_MODE_PORT1: u8 = 0x13;
const REG_SOFT_RESET: u8 = 0x7F;

const CHIP_ID: u8 = 0x23;

/// Maske für alle 16 Pins
pub const ALL_PINS: u16 = 0xFFFF;

pub struct Aw9523<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Aw9523<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Prüft die Chip-ID, setzt den Chip zurück und schaltet alle 16 Pins
    /// als Ausgang in den Konstantstrom-Modus
    pub fn init(&mut self) -> Result<(), HardwareIoError> {
        let id = self.read_register(REG_CHIP_ID)?;
        if id != CHIP_ID {
            error!("AW9523: unexpected chip id {=u8:#x}", id);
            return Err(HardwareIoError::Peripheral);
        }
        self.write_register(REG_SOFT_RESET, 0x00)?;
        self.set_led_modes(ALL_PINS)?;
        self.set_directions(ALL_PINS)?;
        info!("AW9523: ready at {=u8:#x}", self.address);
        Ok(())
    }

    /// Bit = 1: Pin im LED-Modus (im Chip-Register invertiert)
    pub fn set_led_modes(&mut self, mask: u16) -> Result<(), HardwareIoError> {
        let [low, high] = (!mask).to_le_bytes();
        self.write_register(REG_LED_MODE_PORT0, low)?;
        self.write_register(REG_LED_MODE_PORT1, high)
    }

    /// Bit = 1: Pin ist Ausgang (im Chip-Register invertiert)
    pub fn set_directions(&mut self, mask: u16) -> Result<(), HardwareIoError> {
        let [low, high] = (!mask).to_le_bytes();
        self.write_register(REG_CONFIG_PORT0, low)?;
        self.write_register(REG_CONFIG_PORT1, high)
    }

    /// Gibt den I2C-Bus wieder frei
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), HardwareIoError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|_| HardwareIoError::Bus)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, HardwareIoError> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buffer)
            .map_err(|_| HardwareIoError::Bus)?;
        Ok(buffer[0])
    }
}

/// Dimm-Register eines Kanals
///
/// Die Register liegen nicht in Pin-Reihenfolge: Port 1 Pins 0-3 kommen
/// vor Port 0.
pub fn dim_register(channel: Channel) -> u8 {
    match channel.id() {
        id @ 0..=7 => 0x24 + id,
        id @ 8..=11 => 0x20 + (id - 8),
        id => 0x2C + (id - 12),
    }
}

impl<I2C: I2c> CurrentBus for Aw9523<I2C> {
    fn set_intensity(&mut self, channel: Channel, value: Intensity) -> Result<(), HardwareIoError> {
        self.write_register(dim_register(channel), value)
    }
}
