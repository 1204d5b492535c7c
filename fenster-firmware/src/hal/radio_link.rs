// Funkmodul-Adapter: esp-radio + embassy-net hinter dem LinkPeripheral Trait
//
// Der ESP32-C6 hat keinen externen WiFi-Coprozessor; die Statuscodes und
// Diagnosewerte werden aus WifiController und Netzwerk-Stack abgeleitet.

use core::net::Ipv4Addr;

use defmt::{Debug2Format, info, warn};
use embassy_net::{HardwareAddress, IpAddress, Stack, dns::DnsQueryType, tcp::TcpSocket};
use embassy_time::{Duration, Instant, Timer, with_timeout};
use esp_radio::wifi::{ClientConfig, ModeConfig, ScanConfig, WifiController};

use fenster_core::wifi::{FirmwareVersion, Ssid};
use fenster_core::{
    Credentials, HardwareIoError, LinkPeripheral, MacAddress, NetworkInfo, PingTarget,
    WifiStatus,
};

use crate::config::{
    CONNECT_ATTEMPTS, CONNECT_RETRY_DELAY_SECS, DHCP_TIMEOUT_SECS, DNS_TIMEOUT_SECS, PING_PORT,
    PING_TIMEOUT_SECS, RADIO_RESET_SETTLE_SECS,
};

/// Kennung, die `firmware_version()` meldet
const RADIO_FIRMWARE: &str = "esp-radio 0.17";

/// WiFi über das eingebaute Funkmodul
///
/// Reset = Funkmodul stoppen und kurz warten. Gestartet wird erst beim
/// nächsten `connect()`, weil erst dann die Zugangsdaten bekannt sind.
pub struct RadioLink {
    controller: WifiController<'static>,
    stack: Stack<'static>,
    /// SSID der letzten erfolgreichen Verbindung
    ssid: Ssid,
    connect_failed: bool,
    was_connected: bool,
}

impl RadioLink {
    pub fn new(controller: WifiController<'static>, stack: Stack<'static>) -> Self {
        Self {
            controller,
            stack,
            ssid: Ssid::new(),
            connect_failed: false,
            was_connected: false,
        }
    }

    fn is_started(&self) -> Result<bool, HardwareIoError> {
        self.controller.is_started().map_err(|e| {
            warn!("Link: radio state error: {}", Debug2Format(&e));
            HardwareIoError::Peripheral
        })
    }

    fn has_lease(&self) -> bool {
        self.stack
            .config_v4()
            .is_some_and(|config| !config.address.address().is_unspecified())
    }

    async fn start_with(&mut self, credentials: &Credentials<'_>) -> Result<(), HardwareIoError> {
        let client_config = ModeConfig::Client(
            ClientConfig::default()
                .with_ssid(credentials.ssid.into())
                .with_password(credentials.passphrase.into()),
        );
        if let Err(e) = self.controller.set_config(&client_config) {
            warn!("Link: failed to set configuration: {}", Debug2Format(&e));
            return Err(HardwareIoError::Peripheral);
        }
        if let Err(e) = self.controller.start_async().await {
            warn!("Link: failed to start radio: {}", Debug2Format(&e));
            return Err(HardwareIoError::Peripheral);
        }
        info!("Link: radio started");
        Ok(())
    }

    /// Sucht den eigenen Access Point im Scan: (RSSI, BSSID)
    async fn scan_own_access_point(&mut self) -> Result<(i8, [u8; 6]), HardwareIoError> {
        let access_points = self
            .controller
            .scan_with_config_async(ScanConfig::default())
            .await
            .map_err(|e| {
                warn!("Link: scan failed: {}", Debug2Format(&e));
                HardwareIoError::Peripheral
            })?;

        access_points
            .iter()
            .find(|ap| ap.ssid.as_str() == self.ssid.as_str())
            .map(|ap| (ap.signal_strength, ap.bssid))
            .ok_or(HardwareIoError::Peripheral)
    }
}

impl LinkPeripheral for RadioLink {
    async fn reset(&mut self) -> Result<(), HardwareIoError> {
        if self.is_started()? {
            self.controller.stop_async().await.map_err(|e| {
                warn!("Link: failed to stop radio: {}", Debug2Format(&e));
                HardwareIoError::Peripheral
            })?;
        }
        self.connect_failed = false;
        self.was_connected = false;
        Timer::after(Duration::from_secs(RADIO_RESET_SETTLE_SECS)).await;
        Ok(())
    }

    async fn firmware_version(&mut self) -> Result<FirmwareVersion, HardwareIoError> {
        // Lebenszeichen: der Treiber muss seinen Zustand melden können
        self.is_started()?;
        let mut version = FirmwareVersion::new();
        version
            .push_str(RADIO_FIRMWARE)
            .map_err(|_| HardwareIoError::Peripheral)?;
        Ok(version)
    }

    async fn mac_address(&mut self) -> Result<MacAddress, HardwareIoError> {
        #[allow(unreachable_patterns)]
        match self.stack.hardware_address() {
            HardwareAddress::Ethernet(address) => Ok(MacAddress(address.0)),
            _ => Err(HardwareIoError::Peripheral),
        }
    }

    async fn status(&mut self) -> Result<WifiStatus, HardwareIoError> {
        if !self.is_started()? {
            return Ok(if self.connect_failed {
                WifiStatus::ConnectFailed
            } else {
                WifiStatus::Idle
            });
        }

        let associated = self.controller.is_connected().map_err(|e| {
            warn!("Link: connection state error: {}", Debug2Format(&e));
            HardwareIoError::Peripheral
        })?;

        Ok(match (associated, self.has_lease()) {
            (true, true) => WifiStatus::Connected,
            // Assoziiert, DHCP läuft noch
            (true, false) => WifiStatus::Idle,
            (false, _) if self.connect_failed => WifiStatus::ConnectFailed,
            (false, _) if self.was_connected => WifiStatus::ConnectionLost,
            (false, _) => WifiStatus::Disconnected,
        })
    }

    async fn is_connected(&mut self) -> Result<bool, HardwareIoError> {
        if !self.is_started()? {
            return Ok(false);
        }
        let associated = self
            .controller
            .is_connected()
            .map_err(|_| HardwareIoError::Peripheral)?;
        Ok(associated && self.has_lease())
    }

    async fn connect(&mut self, credentials: &Credentials<'_>) -> Result<(), HardwareIoError> {
        if !self.is_started()? {
            self.start_with(credentials).await?;
        }

        for attempt in 1..=CONNECT_ATTEMPTS {
            match self.controller.connect_async().await {
                Ok(()) => {
                    let lease = with_timeout(
                        Duration::from_secs(DHCP_TIMEOUT_SECS),
                        self.stack.wait_config_up(),
                    )
                    .await;
                    if lease.is_ok() {
                        self.ssid.clear();
                        if self.ssid.push_str(credentials.ssid).is_err() {
                            warn!("Link: SSID '{}' exceeds 32 bytes", credentials.ssid);
                        }
                        self.connect_failed = false;
                        self.was_connected = true;
                        return Ok(());
                    }
                    warn!("Link: no DHCP lease (attempt {})", attempt);
                    if let Err(e) = self.controller.disconnect_async().await {
                        warn!("Link: disconnect error: {}", Debug2Format(&e));
                    }
                }
                Err(e) => warn!(
                    "Link: connect attempt {} failed: {}",
                    attempt,
                    Debug2Format(&e)
                ),
            }
            Timer::after(Duration::from_secs(CONNECT_RETRY_DELAY_SECS)).await;
        }

        self.connect_failed = true;
        Err(HardwareIoError::Timeout)
    }

    async fn disconnect(&mut self) -> Result<(), HardwareIoError> {
        self.controller.disconnect_async().await.map_err(|e| {
            warn!("Link: disconnect error: {}", Debug2Format(&e));
            HardwareIoError::Peripheral
        })?;
        self.was_connected = false;
        Ok(())
    }

    async fn rssi(&mut self) -> Result<i8, HardwareIoError> {
        self.scan_own_access_point().await.map(|(rssi, _)| rssi)
    }

    async fn ssid(&mut self) -> Result<Ssid, HardwareIoError> {
        if self.ssid.is_empty() || !self.is_connected().await? {
            return Err(HardwareIoError::Peripheral);
        }
        Ok(self.ssid.clone())
    }

    async fn bssid(&mut self) -> Result<MacAddress, HardwareIoError> {
        self.scan_own_access_point()
            .await
            .map(|(_, bssid)| MacAddress(bssid))
    }

    async fn network_info(&mut self) -> Result<NetworkInfo, HardwareIoError> {
        let config = self.stack.config_v4().ok_or(HardwareIoError::Timeout)?;
        Ok(NetworkInfo {
            address: config.address.address(),
            netmask: config.address.netmask(),
            gateway: config.gateway.unwrap_or(Ipv4Addr::UNSPECIFIED),
        })
    }

    /// Erreichbarkeit über einen TCP-Verbindungsaufbau (Port 80)
    ///
    /// Gemessen wird die Zeit bis zum abgeschlossenen Handshake.
    async fn ping(&mut self, target: PingTarget<'_>) -> Result<u32, HardwareIoError> {
        let address = match target {
            PingTarget::Address(ip) => ip,
            PingTarget::Host(host) => resolve_hostname(self.stack, host).await?,
        };

        let mut rx_buffer = [0u8; 64];
        let mut tx_buffer = [0u8; 64];
        let mut socket = TcpSocket::new(self.stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(PING_TIMEOUT_SECS)));

        let started = Instant::now();
        let result = socket.connect((address, PING_PORT)).await;
        let elapsed_ms = started.elapsed().as_millis() as u32;
        socket.abort();

        result.map(|_| elapsed_ms).map_err(|e| {
            warn!("Link: {} unreachable: {}", Debug2Format(&address), Debug2Format(&e));
            HardwareIoError::Timeout
        })
    }
}

/// Löst Hostname zu IPv4-Adresse auf
async fn resolve_hostname(
    stack: Stack<'static>,
    hostname: &str,
) -> Result<Ipv4Addr, HardwareIoError> {
    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => addrs
            .iter()
            .find_map(|addr| match addr {
                IpAddress::Ipv4(ipv4) => Some(*ipv4),
                #[allow(unreachable_patterns)]
                _ => None,
            })
            .ok_or(HardwareIoError::Peripheral),
        Ok(Err(e)) => {
            warn!("Link: DNS lookup for '{}' failed: {}", hostname, Debug2Format(&e));
            Err(HardwareIoError::Peripheral)
        }
        Err(_) => Err(HardwareIoError::Timeout),
    }
}
