//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use crate::types::{Channel, Intensity, StatusMessage};
use crate::wifi::{
    Credentials, FirmwareVersion, MacAddress, NetworkInfo, PingTarget, Ssid, WifiStatus,
};

/// Fehler-Typ für Hardware-Transaktionen
///
/// Immer vorübergehend: ein Reset oder ein neuer Versuch behebt ihn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareIoError {
    /// I2C/SPI Transaktion fehlgeschlagen
    Bus,
    /// Coprozessor hat einen Fehler gemeldet
    Peripheral,
    /// Keine Antwort innerhalb der Frist
    Timeout,
}

/// Trait für den Konstantstrom-Treiber
///
/// Kein interner Zustand außer dem Geräte-Handle, kein automatischer Retry.
///
/// # Implementierungen
/// - **Production:** [`Aw9523`](crate::Aw9523) über I2C
/// - **Testing:** RecordingBus (in-memory Mock)
pub trait CurrentBus {
    /// Setzt den Strom eines Kanals
    ///
    /// # Fehlerbehandlung
    /// Gibt `HardwareIoError::Bus` zurück wenn die Transaktion fehlschlägt
    fn set_intensity(&mut self, channel: Channel, value: Intensity) -> Result<(), HardwareIoError>;
}

impl<T: CurrentBus + ?Sized> CurrentBus for &mut T {
    fn set_intensity(&mut self, channel: Channel, value: Intensity) -> Result<(), HardwareIoError> {
        (**self).set_intensity(channel, value)
    }
}

/// Trait für den WiFi-Coprozessor
///
/// Jeder Aufruf kann mit einem vorübergehenden Fehler enden. Die
/// Retry/Reset-Strategie liegt im [`LinkController`](crate::LinkController),
/// nicht in der Implementierung. Ausnahme: `connect` versucht es intern
/// selbst mehrfach (10 Versuche im Abstand von 1 s).
#[allow(async_fn_in_trait)]
pub trait LinkPeripheral {
    /// Hardware-Reset inklusive Wartezeit bis der Coprozessor bereit ist
    async fn reset(&mut self) -> Result<(), HardwareIoError>;

    async fn firmware_version(&mut self) -> Result<FirmwareVersion, HardwareIoError>;

    async fn mac_address(&mut self) -> Result<MacAddress, HardwareIoError>;

    async fn status(&mut self) -> Result<WifiStatus, HardwareIoError>;

    async fn is_connected(&mut self) -> Result<bool, HardwareIoError>;

    async fn connect(&mut self, credentials: &Credentials<'_>) -> Result<(), HardwareIoError>;

    async fn disconnect(&mut self) -> Result<(), HardwareIoError>;

    /// Signalstärke in dBm
    async fn rssi(&mut self) -> Result<i8, HardwareIoError>;

    async fn ssid(&mut self) -> Result<Ssid, HardwareIoError>;

    async fn bssid(&mut self) -> Result<MacAddress, HardwareIoError>;

    async fn network_info(&mut self) -> Result<NetworkInfo, HardwareIoError>;

    /// Round-Trip-Zeit in Millisekunden
    async fn ping(&mut self, target: PingTarget<'_>) -> Result<u32, HardwareIoError>;
}

/// Abnehmer für Statusmeldungen (Display)
pub trait StatusSink {
    fn publish(&mut self, message: StatusMessage);
}

impl<T: StatusSink + ?Sized> StatusSink for &mut T {
    fn publish(&mut self, message: StatusMessage) {
        (**self).publish(message)
    }
}

/// Zufallsquelle für die Flacker-Animation
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Gleichverteilt in `[low, high]` (inklusive)
    fn between(&mut self, low: u8, high: u8) -> u8 {
        if high <= low {
            return low;
        }
        let span = u32::from(high - low) + 1;
        low + (self.next_u32() % span) as u8
    }

    /// Gleichverteilt in `[0, bound)`; 0 wenn `bound` 0 ist
    fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        u64::from(self.next_u32()) % bound
    }
}
