//! Core Types für die Lichtsteuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt::Write;

use embassy_time::Duration;
use heapless::String;

/// Stromwert eines Kanals (0-255, Konstantstrom-Stufe des Treibers)
pub type Intensity = u8;

/// Ein Ausgang des Konstantstrom-Treibers (0-15)
///
/// Kann nur über [`Channel::new`] erzeugt werden, damit ungültige
/// Kanalnummern gar nicht erst im System auftauchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel(u8);

impl Channel {
    /// Höchste Kanalnummer des Treibers
    pub const MAX_ID: u8 = 15;

    /// Anzahl der Kanäle
    pub const COUNT: usize = 16;

    pub const fn new(id: u8) -> Result<Self, ConfigError> {
        if id > Self::MAX_ID {
            return Err(ConfigError::InvalidChannel(id));
        }
        Ok(Self(id))
    }

    pub const fn id(self) -> u8 {
        self.0
    }
}

/// Konfigurationsfehler beim Aufbau von Animationen und Task-Sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Kanalnummer außerhalb 0-15
    InvalidChannel(u8),
    /// Untergrenze liegt über der Obergrenze
    InvertedBand { min: Intensity, max: Intensity },
    /// Animation ohne Kanäle
    NoChannels,
    /// Mehr Kanäle als der Treiber hat
    TooManyChannels,
    /// Zwei Animationen beanspruchen denselben Kanal
    ChannelConflict(Channel),
    /// Scheduler ist voll
    TooManyTasks,
}

/// Wie lange ein Task pausieren möchte
///
/// Jede Pause dauert mindestens [`SuspendRequest::FLOOR`], damit eine leere
/// Rampe oder ein Intervall von 0 keine Endlosschleife ohne Pause erzeugt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SuspendRequest {
    duration: Duration,
}

impl SuspendRequest {
    pub const FLOOR: Duration = Duration::from_millis(1);

    pub fn after(duration: Duration) -> Self {
        Self {
            duration: if duration < Self::FLOOR {
                Self::FLOOR
            } else {
                duration
            },
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Flanke am Taster, berechnet aus vorherigem und aktuellem Pegel
///
/// Der Taster hat einen Pull-Up: gedrückt = Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEdge {
    None,
    /// High → Low
    Pressed,
    /// Low → High
    Released,
}

impl ButtonEdge {
    pub fn from_levels(previous_high: bool, current_high: bool) -> Self {
        match (previous_high, current_high) {
            (true, false) => ButtonEdge::Pressed,
            (false, true) => ButtonEdge::Released,
            _ => ButtonEdge::None,
        }
    }
}

/// Maximale Länge einer Statuszeile
///
/// "Connected to " + 32 Zeichen SSID passt hinein.
pub const STATUS_TEXT_CAPACITY: usize = 48;

/// Statusmeldung für das Display
///
/// Text plus X-Position, damit das Display die Zeile zentrieren kann.
/// Es gibt immer nur eine aktuelle Meldung, jede neue ersetzt die alte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    text: String<STATUS_TEXT_CAPACITY>,
    x: u8,
}

impl StatusMessage {
    /// Erstellt eine Meldung; zu lange Texte werden abgeschnitten
    pub fn new(text: &str, x: u8) -> Self {
        let mut message = Self {
            text: String::new(),
            x,
        };
        for c in text.chars() {
            if message.text.push(c).is_err() {
                break;
            }
        }
        message
    }

    /// Startmeldung mit aktuellem Verbindungsstatus
    pub fn greeting(connected: bool) -> Self {
        let mut message = Self::new("LED Controller\nWifi Connected:\n     ", 23);
        let _ = write!(message.text, "{}", connected);
        message
    }

    pub fn disconnected() -> Self {
        Self::new("Disconnected Wifi", 16)
    }

    pub fn disconnect_failed() -> Self {
        Self::new("Unable to disconnect WiFi", 0)
    }

    pub fn connected_to(ssid: &str) -> Self {
        let mut message = Self::new("Connected to ", 8);
        for c in ssid.chars() {
            if message.text.push(c).is_err() {
                break;
            }
        }
        message
    }

    pub fn connect_failed() -> Self {
        Self::new("Unable to connect WiFi", 8)
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn x(&self) -> u8 {
        self.x
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for StatusMessage {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "StatusMessage {{ x: {}, text: {} }}",
            self.x,
            self.text.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_range() {
        assert_eq!(Channel::new(15).map(Channel::id), Ok(15));
        assert_eq!(Channel::new(16), Err(ConfigError::InvalidChannel(16)));
    }

    #[test]
    fn test_suspend_floor() {
        let request = SuspendRequest::after(Duration::from_ticks(0));
        assert_eq!(request.duration(), SuspendRequest::FLOOR);

        let request = SuspendRequest::after(Duration::from_millis(70));
        assert_eq!(request.duration(), Duration::from_millis(70));
    }

    #[test]
    fn test_button_edges() {
        assert_eq!(ButtonEdge::from_levels(true, false), ButtonEdge::Pressed);
        assert_eq!(ButtonEdge::from_levels(false, true), ButtonEdge::Released);
        assert_eq!(ButtonEdge::from_levels(false, false), ButtonEdge::None);
        assert_eq!(ButtonEdge::from_levels(true, true), ButtonEdge::None);
    }

    #[test]
    fn test_status_messages() {
        let greeting = StatusMessage::greeting(true);
        assert_eq!(greeting.text(), "LED Controller\nWifi Connected:\n     true");
        assert_eq!(greeting.x(), 23);

        let connected = StatusMessage::connected_to("46C992");
        assert_eq!(connected.text(), "Connected to 46C992");
        assert_eq!(connected.x(), 8);
    }

    #[test]
    fn test_status_message_truncates() {
        let long = "ein-sehr-langer-netzwerkname-der-nicht-mehr-in-die-zeile-passt";
        let message = StatusMessage::connected_to(long);
        assert_eq!(message.text().len(), STATUS_TEXT_CAPACITY);
    }
}
