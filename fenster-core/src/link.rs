//! WiFi-Zustandsmaschine
//!
//! Der [`LinkController`] besitzt den Coprozessor-Handle und fängt jeden
//! Hardwarefehler selbst ab. Nach außen gibt es nur Zustände
//! ([`LinkState`]), nie Fehler, mit zwei Ausnahmen: [`LinkController::identify`]
//! und [`LinkController::diagnostics`] geben den Fehler zurück, damit die
//! Startphase entscheiden kann, ob ein Reset nötig ist.
//!
//! Zustandsübergänge:
//!
//! ```text
//! beliebig      --reset_peripheral--> Unknown
//! Unknown/Disc. --query_status------> Disconnected | ConnectFailed | Connected
//! Disconnected  --connect-----------> Connecting --> Connected | ConnectFailed
//! Connected     --disconnect--------> Disconnected (oder bleibt Connected)
//! ```

use crate::traits::{HardwareIoError, LinkPeripheral};
use crate::wifi::{
    Credentials, FirmwareVersion, MacAddress, NetworkInfo, PingTarget, Ssid, WifiStatus,
};

/// Zustand der WiFi-Verbindung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Unknown,
    Disconnected,
    Connecting,
    Connected,
    /// Verbindungsversuch ausgeschöpft
    ConnectFailed,
    /// Coprozessor antwortet nach Reset nicht
    Faulted,
}

/// Statuscode und Verbindungs-Flag, immer gemeinsam abgefragt
///
/// Beide Werte sollten sich nie widersprechen. Tun sie es doch, wird das
/// geloggt und als "nicht verbunden" behandelt; der nächste
/// Verbindungsversuch stellt den echten Zustand wieder her.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkSample {
    /// `None` wenn die Abfrage fehlgeschlagen ist
    pub status: Option<WifiStatus>,
    pub connected: bool,
}

impl LinkSample {
    pub const UNKNOWN: Self = Self {
        status: None,
        connected: false,
    };

    /// Status WL_CONNECTED und Flag gesetzt
    pub fn is_established(&self) -> bool {
        self.status == Some(WifiStatus::Connected) && self.connected
    }

    pub fn is_consistent(&self) -> bool {
        match self.status {
            Some(WifiStatus::Connected) => self.connected,
            Some(_) => !self.connected,
            None => true,
        }
    }

    /// Zahlencode für Logs (255 wenn unbekannt)
    pub fn status_code(&self) -> u8 {
        self.status.map(WifiStatus::code).unwrap_or(u8::MAX)
    }

    pub fn status_name(&self) -> &'static str {
        self.status.map(WifiStatus::as_str).unwrap_or("WL_UNDEFINED")
    }

    fn classify(&self) -> LinkState {
        if self.is_established() {
            return LinkState::Connected;
        }
        if !self.is_consistent() {
            return LinkState::Disconnected;
        }
        match self.status {
            Some(WifiStatus::ConnectFailed) => LinkState::ConnectFailed,
            Some(_) => LinkState::Disconnected,
            None => LinkState::Unknown,
        }
    }
}

/// Kennung des Coprozessors, beim Start gelesen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeripheralIdentity {
    pub firmware: FirmwareVersion,
    pub mac: MacAddress,
}

/// Ergebnis der Diagnose-Runde nach dem ersten Verbindungsaufbau
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDiagnostics {
    pub rssi: i8,
    pub ssid: Ssid,
    pub bssid: MacAddress,
    pub network: NetworkInfo,
    pub lan_ping_ms: u32,
    pub wan_ping_ms: u32,
}

pub struct LinkController<'c, P> {
    peripheral: P,
    credentials: Credentials<'c>,
    state: LinkState,
    last_sample: LinkSample,
    retry_count: u32,
}

impl<'c, P: LinkPeripheral> LinkController<'c, P> {
    pub fn new(peripheral: P, credentials: Credentials<'c>) -> Self {
        Self {
            peripheral,
            credentials,
            state: LinkState::Unknown,
            last_sample: LinkSample::UNKNOWN,
            retry_count: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn last_sample(&self) -> LinkSample {
        self.last_sample
    }

    /// Verbindungsversuche seit der letzten erfolgreichen Verbindung
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn credentials(&self) -> &Credentials<'c> {
        &self.credentials
    }

    pub fn peripheral(&self) -> &P {
        &self.peripheral
    }

    pub fn peripheral_mut(&mut self) -> &mut P {
        &mut self.peripheral
    }

    /// Setzt den Coprozessor zurück; immer erlaubt, Ergebnis ist `Unknown`
    ///
    /// Ein fehlschlagender Reset wird nur geloggt, die nächste Abfrage
    /// entscheidet ob der Coprozessor antwortet.
    pub async fn reset_peripheral(&mut self) {
        info!("Link: peripheral reset");
        if let Err(e) = self.peripheral.reset().await {
            warn!("Link: peripheral reset error: {}", e);
        }
        self.state = LinkState::Unknown;
        self.last_sample = LinkSample::UNKNOWN;
    }

    /// Liest Firmware-Version und MAC-Adresse
    ///
    /// Bei einem Fehler wechselt der Zustand auf `Faulted`.
    pub async fn identify(&mut self) -> Result<PeripheralIdentity, HardwareIoError> {
        match read_identity(&mut self.peripheral).await {
            Ok(identity) => {
                info!("Link: firmware {}", identity.firmware.as_str());
                info!("Link: MAC address {}", identity.mac);
                Ok(identity)
            }
            Err(e) => {
                error!("Link: peripheral access error: {}", e);
                self.state = LinkState::Faulted;
                Err(e)
            }
        }
    }

    /// Fragt Statuscode und Verbindungs-Flag gemeinsam ab
    ///
    /// Fehler werden geloggt und als "unbekannt" bzw. "nicht verbunden"
    /// gewertet.
    pub async fn sample(&mut self) -> LinkSample {
        let status = match self.peripheral.status().await {
            Ok(status) => Some(status),
            Err(e) => {
                warn!("Link: status query error: {}", e);
                None
            }
        };
        let connected = match self.peripheral.is_connected().await {
            Ok(connected) => connected,
            Err(e) => {
                warn!("Link: connectivity query error: {}", e);
                false
            }
        };

        let sample = LinkSample { status, connected };
        if !sample.is_consistent() {
            warn!(
                "Link: status {} ({}) disagrees with connected={}",
                sample.status_code(),
                sample.status_name(),
                connected
            );
        }
        self.last_sample = sample;
        sample
    }

    pub async fn query_status(&mut self) -> LinkState {
        let sample = self.sample().await;
        self.state = sample.classify();
        info!(
            "Link: status {} ({}), connected={} -> {}",
            sample.status_code(),
            sample.status_name(),
            sample.connected,
            self.state
        );
        self.state
    }

    /// Verbindet mit dem Access Point
    ///
    /// Die Wiederholungen (10 Versuche, 1 s Abstand) stecken im
    /// Connect-Aufruf des Coprozessors. Ergebnis ist `Connected` oder
    /// `ConnectFailed`.
    pub async fn connect(&mut self) -> LinkState {
        let before = self.sample().await;
        if before.is_established() {
            self.state = LinkState::Connected;
            return self.state;
        }

        self.state = LinkState::Connecting;
        self.retry_count += 1;
        info!(
            "Link: connecting to '{}' (attempt {}, status {} ({}), connected={})",
            self.credentials.ssid,
            self.retry_count,
            before.status_code(),
            before.status_name(),
            before.connected
        );

        if let Err(e) = self.peripheral.connect(&self.credentials).await {
            warn!("Link: connection error: {}", e);
            self.state = LinkState::ConnectFailed;
            return self.state;
        }

        let after = self.sample().await;
        info!(
            "Link: status {} ({}), connected={}",
            after.status_code(),
            after.status_name(),
            after.connected
        );
        self.state = if after.is_established() {
            self.retry_count = 0;
            LinkState::Connected
        } else {
            LinkState::ConnectFailed
        };
        self.state
    }

    /// Trennt die Verbindung und prüft danach das Verbindungs-Flag
    ///
    /// Meldet der Coprozessor weiterhin eine Verbindung, bleibt der Zustand
    /// `Connected`.
    pub async fn disconnect(&mut self) -> LinkState {
        info!("Link: disconnecting...");
        if let Err(e) = self.peripheral.disconnect().await {
            warn!("Link: unable to disconnect: {}", e);
        }

        let connected = match self.peripheral.is_connected().await {
            Ok(connected) => connected,
            Err(e) => {
                warn!("Link: connectivity query error: {}", e);
                false
            }
        };
        self.last_sample.connected = connected;

        self.state = if connected {
            warn!("Link: still connected after disconnect");
            LinkState::Connected
        } else {
            info!("Link: disconnected");
            LinkState::Disconnected
        };
        self.state
    }

    pub async fn ssid(&mut self) -> Option<Ssid> {
        match self.peripheral.ssid().await {
            Ok(ssid) => Some(ssid),
            Err(e) => {
                warn!("Link: SSID query error: {}", e);
                None
            }
        }
    }

    /// Eine Diagnose-Runde: Signal, Adressen, Erreichbarkeit
    pub async fn diagnostics(
        &mut self,
        wan_host: &str,
    ) -> Result<LinkDiagnostics, HardwareIoError> {
        let rssi = self.peripheral.rssi().await?;
        let ssid = self.peripheral.ssid().await?;
        let bssid = self.peripheral.bssid().await?;
        let network = self.peripheral.network_info().await?;
        let lan_ping_ms = self
            .peripheral
            .ping(PingTarget::Address(network.gateway))
            .await?;
        let wan_ping_ms = self.peripheral.ping(PingTarget::Host(wan_host)).await?;

        info!("Link: RSSI     {} dBm", rssi);
        info!("Link: SSID     {}", ssid.as_str());
        info!("Link: BSSID    {}", bssid);
        info!("Link: IP       {}", display!(network.address));
        info!("Link: Netmask  {}", display!(network.netmask));
        info!("Link: Gateway  {}", display!(network.gateway));
        info!("Link: LAN ping {}ms", lan_ping_ms);
        info!("Link: WAN ping {}ms", wan_ping_ms);

        Ok(LinkDiagnostics {
            rssi,
            ssid,
            bssid,
            network,
            lan_ping_ms,
            wan_ping_ms,
        })
    }

    /// Startphase: blockiert bis eine geprüfte Verbindung steht
    ///
    /// 1. Reset, dann Kennung lesen bis der Coprozessor antwortet
    /// 2. Verbinden, Status prüfen, Diagnose-Runde
    ///
    /// Jeder Fehler führt zu Reset und neuem Versuch, ohne Obergrenze. Das
    /// ist nur hier erlaubt, bevor der Scheduler läuft.
    pub async fn establish_initial_link(&mut self, wan_host: &str) -> LinkDiagnostics {
        self.reset_peripheral().await;

        info!("Link: checking peripheral...");
        loop {
            if self.identify().await.is_ok() {
                self.query_status().await;
                break;
            }
            self.reset_peripheral().await;
        }

        loop {
            if self.connect().await == LinkState::Connected {
                match self.diagnostics(wan_host).await {
                    Ok(diagnostics) => return diagnostics,
                    Err(e) => error!("Link: WiFi error: {}", e),
                }
            } else {
                warn!("Link: connect failed, resetting peripheral");
            }
            self.reset_peripheral().await;
        }
    }
}

async fn read_identity<P: LinkPeripheral>(
    peripheral: &mut P,
) -> Result<PeripheralIdentity, HardwareIoError> {
    let firmware = peripheral.firmware_version().await?;
    let mac = peripheral.mac_address().await?;
    Ok(PeripheralIdentity { firmware, mac })
}
