// Netzwerk-Task - Treibt den embassy-net Stack
//
// Verbindungsaufbau und Überwachung übernimmt der LinkController im
// Hauptprogramm; hier läuft nur die Paketverarbeitung.
use embassy_net::Runner;
use esp_radio::wifi::WifiDevice;

/// Network Task
///
/// Prozessiert Netzwerk-Pakete (DHCP, DNS, TCP) solange die Firmware läuft
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}
