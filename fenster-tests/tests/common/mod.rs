//! Gemeinsame Mocks für die Integrationstests

#![allow(dead_code)] // Nicht jede Test-Datei nutzt jeden Mock

use std::collections::VecDeque;
use std::net::Ipv4Addr;

use embedded_hal::digital;
use embedded_hal::i2c::{self, Operation};
use fenster_core::wifi::{FirmwareVersion, Ssid};
use fenster_core::{
    Channel, Credentials, CurrentBus, HardwareIoError, Intensity, LinkPeripheral, MacAddress,
    NetworkInfo, PingTarget, RandomSource, StatusMessage, StatusSink, WifiStatus,
};

pub const TEST_SSID: &str = "46C992";
pub const TEST_CREDENTIALS: Credentials<'static> = Credentials {
    ssid: TEST_SSID,
    passphrase: "geheim",
};

pub fn ch(id: u8) -> Channel {
    Channel::new(id).unwrap()
}

// ============================================================================
// Mock Current Bus
// ============================================================================

/// Zeichnet jeden Schreibzugriff auf
#[derive(Default)]
pub struct RecordingBus {
    pub writes: Vec<(Channel, Intensity)>,
    pub fail_next_write: bool,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values_for(&self, channel: Channel) -> Vec<Intensity> {
        self.writes
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, v)| *v)
            .collect()
    }
}

impl CurrentBus for RecordingBus {
    fn set_intensity(&mut self, channel: Channel, value: Intensity) -> Result<(), HardwareIoError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(HardwareIoError::Bus);
        }
        self.writes.push((channel, value));
        Ok(())
    }
}

// ============================================================================
// Mock Random Source
// ============================================================================

/// Liefert vorgegebene Werte, danach immer den letzten
pub struct ScriptedRng {
    values: VecDeque<u32>,
    last: u32,
}

impl ScriptedRng {
    pub fn new(values: &[u32]) -> Self {
        Self {
            values: values.iter().copied().collect(),
            last: 0,
        }
    }
}

impl RandomSource for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        if let Some(value) = self.values.pop_front() {
            self.last = value;
        }
        self.last
    }
}

// ============================================================================
// Mock Link Peripheral
// ============================================================================

/// Skriptbarer WiFi-Coprozessor
///
/// Antwortet erst nach einem erfolgreichen Reset (wie ein hängender
/// Coprozessor nach dem Einschalten).
pub struct MockPeripheral {
    pub responsive: bool,
    pub connected: bool,
    /// Anzahl der nächsten Resets, die fehlschlagen
    pub reset_failures: u32,
    /// Anzahl der nächsten Connect-Aufrufe, die fehlschlagen
    pub connect_failures: u32,
    /// Disconnect wird bestätigt, aber die Verbindung bleibt bestehen
    pub disconnect_ignored: bool,
    /// Statuscode unabhängig vom Verbindungs-Flag erzwingen
    pub status_override: Option<WifiStatus>,
    pub status_fails: bool,
    pub diagnostics_failures: u32,
    pub calls: Vec<&'static str>,
}

impl MockPeripheral {
    pub fn new() -> Self {
        Self {
            responsive: true,
            connected: false,
            reset_failures: 0,
            connect_failures: 0,
            disconnect_ignored: false,
            status_override: None,
            status_fails: false,
            diagnostics_failures: 0,
            calls: Vec::new(),
        }
    }

    /// Bereits mit dem Access Point verbunden
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::new()
        }
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    fn check_responsive(&self) -> Result<(), HardwareIoError> {
        if self.responsive {
            Ok(())
        } else {
            Err(HardwareIoError::Timeout)
        }
    }
}

impl LinkPeripheral for MockPeripheral {
    async fn reset(&mut self) -> Result<(), HardwareIoError> {
        self.calls.push("reset");
        self.connected = false;
        if self.reset_failures > 0 {
            self.reset_failures -= 1;
            self.responsive = false;
            return Err(HardwareIoError::Timeout);
        }
        self.responsive = true;
        Ok(())
    }

    async fn firmware_version(&mut self) -> Result<FirmwareVersion, HardwareIoError> {
        self.calls.push("firmware_version");
        self.check_responsive()?;
        let mut version = FirmwareVersion::new();
        let _ = version.push_str("1.7.4");
        Ok(version)
    }

    async fn mac_address(&mut self) -> Result<MacAddress, HardwareIoError> {
        self.calls.push("mac_address");
        self.check_responsive()?;
        Ok(MacAddress([0x24, 0x0a, 0xc4, 0x00, 0x11, 0x22]))
    }

    async fn status(&mut self) -> Result<WifiStatus, HardwareIoError> {
        self.calls.push("status");
        self.check_responsive()?;
        if self.status_fails {
            return Err(HardwareIoError::Peripheral);
        }
        Ok(self.status_override.unwrap_or(if self.connected {
            WifiStatus::Connected
        } else {
            WifiStatus::Idle
        }))
    }

    async fn is_connected(&mut self) -> Result<bool, HardwareIoError> {
        self.calls.push("is_connected");
        self.check_responsive()?;
        Ok(self.connected)
    }

    async fn connect(&mut self, credentials: &Credentials<'_>) -> Result<(), HardwareIoError> {
        self.calls.push("connect");
        self.check_responsive()?;
        assert_eq!(credentials.ssid, TEST_SSID);
        if self.connect_failures > 0 {
            self.connect_failures -= 1;
            return Err(HardwareIoError::Peripheral);
        }
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), HardwareIoError> {
        self.calls.push("disconnect");
        self.check_responsive()?;
        if !self.disconnect_ignored {
            self.connected = false;
        }
        Ok(())
    }

    async fn rssi(&mut self) -> Result<i8, HardwareIoError> {
        self.calls.push("rssi");
        self.check_responsive()?;
        if self.diagnostics_failures > 0 {
            self.diagnostics_failures -= 1;
            return Err(HardwareIoError::Timeout);
        }
        Ok(-52)
    }

    async fn ssid(&mut self) -> Result<Ssid, HardwareIoError> {
        self.calls.push("ssid");
        self.check_responsive()?;
        let mut ssid = Ssid::new();
        let _ = ssid.push_str(TEST_SSID);
        Ok(ssid)
    }

    async fn bssid(&mut self) -> Result<MacAddress, HardwareIoError> {
        self.calls.push("bssid");
        self.check_responsive()?;
        Ok(MacAddress([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]))
    }

    async fn network_info(&mut self) -> Result<NetworkInfo, HardwareIoError> {
        self.calls.push("network_info");
        self.check_responsive()?;
        Ok(NetworkInfo {
            address: Ipv4Addr::new(192, 168, 1, 42),
            netmask: Ipv4Addr::new(255, 255, 255, 0),
            gateway: Ipv4Addr::new(192, 168, 1, 1),
        })
    }

    async fn ping(&mut self, target: PingTarget<'_>) -> Result<u32, HardwareIoError> {
        self.calls.push("ping");
        self.check_responsive()?;
        match target {
            PingTarget::Address(_) => Ok(3),
            PingTarget::Host(_) => Ok(28),
        }
    }
}

// ============================================================================
// Mock Button
// ============================================================================

/// Liefert vorgegebene Pegel, danach immer den letzten
pub struct ScriptedPin {
    levels: VecDeque<bool>,
    last: bool,
    pub fail: bool,
}

impl ScriptedPin {
    pub fn new(levels: &[bool]) -> Self {
        Self {
            levels: levels.iter().copied().collect(),
            last: true,
            fail: false,
        }
    }
}

#[derive(Debug)]
pub struct PinError;

impl digital::Error for PinError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

impl digital::ErrorType for ScriptedPin {
    type Error = PinError;
}

impl digital::InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        if self.fail {
            return Err(PinError);
        }
        if let Some(level) = self.levels.pop_front() {
            self.last = level;
        }
        Ok(self.last)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

// ============================================================================
// Mock Status Sink
// ============================================================================

#[derive(Default)]
pub struct RecordingSink {
    pub messages: Vec<StatusMessage>,
}

impl RecordingSink {
    pub fn last_text(&self) -> Option<&str> {
        self.messages.last().map(StatusMessage::text)
    }
}

impl StatusSink for RecordingSink {
    fn publish(&mut self, message: StatusMessage) {
        self.messages.push(message);
    }
}

// ============================================================================
// Mock I2C
// ============================================================================

/// I2C-Bus mit einem einzigen Registersatz
pub struct MockI2c {
    pub chip_id: u8,
    pub writes: Vec<(u8, Vec<u8>)>,
    pub fail: bool,
}

impl MockI2c {
    pub fn new() -> Self {
        Self {
            chip_id: 0x23,
            writes: Vec::new(),
            fail: false,
        }
    }

    /// Nur die geschriebenen (Register, Wert) Paare
    pub fn register_writes(&self) -> Vec<(u8, u8)> {
        self.writes
            .iter()
            .filter(|(_, bytes)| bytes.len() == 2)
            .map(|(_, bytes)| (bytes[0], bytes[1]))
            .collect()
    }
}

impl i2c::ErrorType for MockI2c {
    type Error = i2c::ErrorKind;
}

impl i2c::I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail {
            return Err(i2c::ErrorKind::Bus);
        }
        let mut last_register = None;
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    last_register = bytes.first().copied();
                    self.writes.push((address, bytes.to_vec()));
                }
                Operation::Read(buffer) => {
                    if last_register == Some(0x10) {
                        buffer.fill(self.chip_id);
                    } else {
                        buffer.fill(0);
                    }
                }
            }
        }
        Ok(())
    }
}
