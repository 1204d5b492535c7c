// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

// ============================================================================
// AW9523 Konstantstrom-Treiber
// ============================================================================

/// I2C-Adresse des AW9523 (AD0/AD1 offen)
pub const AW9523_ADDRESS: u8 = 0x58;

/// I2C Taktfrequenz in kHz
pub const I2C_FREQUENCY_KHZ: u32 = 400;

// SDA = GPIO6, SCL = GPIO7 (Verdrahtung, siehe main.rs)

/// Dauerlicht-Kanäle: (Kanal, Strom)
/// Werden einmal beim Start gesetzt und danach nie wieder angefasst
pub const STEADY_LEVELS: &[(u8, u8)] = &[(0, 100), (1, 15), (2, 1)];

// ============================================================================
// Animationen
// ============================================================================

/// Beschreibung einer Animation, wird beim (Neu-)Aufbau des Task-Sets
/// in eine `AnimationRoutine` übersetzt
#[derive(Debug, Clone, Copy)]
pub enum RoutineConfig {
    /// Kerzenflackern auf einem Kanal
    Flicker {
        channel: u8,
        min: u8,
        max: u8,
        interval_ms: u64,
    },
    /// Lauflicht: ein Kanal nach dem anderen hoch und wieder runter
    FadeChase {
        channels: &'static [u8],
        interval_ms: u64,
        max: u8,
    },
    /// Alle Kanäle nacheinander hoch, dann alle nacheinander runter
    FadeAllTogether {
        channels: &'static [u8],
        interval_ms: u64,
        max: u8,
    },
}

/// Maximale Anzahl Animationen im Scheduler
pub const MAX_ROUTINES: usize = 8;

/// Animationen in Registrierungsreihenfolge
/// Kanäle dürfen sich nicht überschneiden (wird beim Aufbau geprüft)
pub const ROUTINES: &[RoutineConfig] = &[
    RoutineConfig::Flicker {
        channel: 3,
        min: 1,
        max: 12,
        interval_ms: 700,
    },
    RoutineConfig::Flicker {
        channel: 4,
        min: 1,
        max: 7,
        interval_ms: 700,
    },
    RoutineConfig::Flicker {
        channel: 5,
        min: 1,
        max: 12,
        interval_ms: 700,
    },
    RoutineConfig::Flicker {
        channel: 6,
        min: 1,
        max: 10,
        interval_ms: 700,
    },
    RoutineConfig::Flicker {
        channel: 7,
        min: 1,
        max: 7,
        interval_ms: 700,
    },
    RoutineConfig::FadeChase {
        channels: &[12, 13, 14, 15],
        interval_ms: 30,
        max: 30,
    },
    RoutineConfig::FadeAllTogether {
        channels: &[11, 10, 9, 8],
        interval_ms: 30,
        max: 30,
    },
];

/// Wartezeit bevor ein fehlerhaft konfiguriertes Task-Set erneut aufgebaut wird
pub const CONFIG_RETRY_DELAY_SECS: u64 = 1;

// ============================================================================
// Taster
// ============================================================================

/// Abfrage-Intervall des Tasters (GPIO9, Boot-Taster, Pull-Up)
pub const BUTTON_POLL_MS: u64 = 100;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Ziel des WAN-Pings in der Startdiagnose
/// Optional über PING_HOST in .env überschreibbar
pub const PING_HOST: &str = match option_env!("PING_HOST") {
    Some(host) => host,
    None => "adafruit.com",
};

/// Wartezeit nach dem Neustart des Funkmoduls
pub const RADIO_RESET_SETTLE_SECS: u64 = 1;

/// Verbindungsversuche pro Connect-Aufruf
pub const CONNECT_ATTEMPTS: u32 = 10;

/// Pause zwischen zwei Verbindungsversuchen
pub const CONNECT_RETRY_DELAY_SECS: u64 = 1;

/// Maximale Wartezeit auf eine DHCP-Adresse nach dem Verbinden
pub const DHCP_TIMEOUT_SECS: u64 = 10;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

/// Port für die Erreichbarkeits-Prüfung ("Ping" über TCP)
pub const PING_PORT: u16 = 80;

/// Timeout für eine Erreichbarkeits-Prüfung
pub const PING_TIMEOUT_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// Gesamt-Heap: ~100 KB für WiFi-Stack

/// Anzahl Sockets im embassy-net Stack (DHCP, DNS, Ping)
pub const NET_SOCKETS: usize = 4;
