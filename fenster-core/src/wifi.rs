//! WiFi Datentypen
//!
//! Werte, die der Funk-Coprozessor liefert oder erwartet.

use core::fmt;
use core::net::Ipv4Addr;

use heapless::String;

/// SSID (max. 32 Bytes laut 802.11)
pub type Ssid = String<32>;

/// Firmware-Version des Funk-Coprozessors
pub type FirmwareVersion = String<24>;

/// Statuscode des Funk-Coprozessors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WifiStatus {
    Idle,
    NoSsidAvailable,
    ScanCompleted,
    Connected,
    ConnectFailed,
    ConnectionLost,
    Disconnected,
    ApListening,
    ApConnected,
    ApFailed,
    NoShield,
    Undefined(u8),
}

impl WifiStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => WifiStatus::Idle,
            1 => WifiStatus::NoSsidAvailable,
            2 => WifiStatus::ScanCompleted,
            3 => WifiStatus::Connected,
            4 => WifiStatus::ConnectFailed,
            5 => WifiStatus::ConnectionLost,
            6 => WifiStatus::Disconnected,
            7 => WifiStatus::ApListening,
            8 => WifiStatus::ApConnected,
            9 => WifiStatus::ApFailed,
            10 => WifiStatus::NoShield,
            other => WifiStatus::Undefined(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            WifiStatus::Idle => 0,
            WifiStatus::NoSsidAvailable => 1,
            WifiStatus::ScanCompleted => 2,
            WifiStatus::Connected => 3,
            WifiStatus::ConnectFailed => 4,
            WifiStatus::ConnectionLost => 5,
            WifiStatus::Disconnected => 6,
            WifiStatus::ApListening => 7,
            WifiStatus::ApConnected => 8,
            WifiStatus::ApFailed => 9,
            WifiStatus::NoShield => 10,
            WifiStatus::Undefined(code) => code,
        }
    }

    /// Symbolischer Name, wie ihn die Coprozessor-Firmware dokumentiert
    pub fn as_str(self) -> &'static str {
        match self {
            WifiStatus::Idle => "WL_IDLE_STATUS",
            WifiStatus::NoSsidAvailable => "WL_NO_SSID_AVAIL",
            WifiStatus::ScanCompleted => "WL_SCAN_COMPLETED",
            WifiStatus::Connected => "WL_CONNECTED",
            WifiStatus::ConnectFailed => "WL_CONNECT_FAILED",
            WifiStatus::ConnectionLost => "WL_CONNECTION_LOST",
            WifiStatus::Disconnected => "WL_DISCONNECTED",
            WifiStatus::ApListening => "WL_AP_LISTENING",
            WifiStatus::ApConnected => "WL_AP_CONNECTED",
            WifiStatus::ApFailed => "WL_AP_FAILED",
            WifiStatus::NoShield => "WL_NO_SHIELD",
            WifiStatus::Undefined(_) => "WL_UNDEFINED",
        }
    }
}

/// MAC- oder BSSID-Adresse, ausgegeben als `aa:bb:cc:dd:ee:ff`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacAddress(pub [u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}", a, b, c, d, e, g)
    }
}

/// Netzwerk-Konfiguration nach DHCP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkInfo {
    pub address: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub gateway: Ipv4Addr,
}

/// Zugangsdaten für den Access Point
#[derive(Clone, Copy)]
pub struct Credentials<'a> {
    pub ssid: &'a str,
    pub passphrase: &'a str,
}

/// Ziel eines Erreichbarkeits-Tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingTarget<'a> {
    Address(Ipv4Addr),
    Host(&'a str),
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for MacAddress {
    fn format(&self, fmt: defmt::Formatter) {
        let [a, b, c, d, e, g] = self.0;
        defmt::write!(
            fmt,
            "{=u8:02x}:{=u8:02x}:{=u8:02x}:{=u8:02x}:{=u8:02x}:{=u8:02x}",
            a,
            b,
            c,
            d,
            e,
            g
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for NetworkInfo {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "{}/{} via {}",
            defmt::Display2Format(&self.address),
            defmt::Display2Format(&self.netmask),
            defmt::Display2Format(&self.gateway)
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PingTarget<'_> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PingTarget::Address(ip) => defmt::write!(fmt, "{}", defmt::Display2Format(ip)),
            PingTarget::Host(host) => defmt::write!(fmt, "{=str}", host),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_round_trip_names() {
        assert_eq!(WifiStatus::from_code(3), WifiStatus::Connected);
        assert_eq!(WifiStatus::from_code(3).as_str(), "WL_CONNECTED");
        assert_eq!(WifiStatus::from_code(10).as_str(), "WL_NO_SHIELD");
    }

    #[test]
    fn test_unknown_status_code() {
        let status = WifiStatus::from_code(255);
        assert_eq!(status, WifiStatus::Undefined(255));
        assert_eq!(status.as_str(), "WL_UNDEFINED");
        assert_eq!(status.code(), 255);
    }
}
