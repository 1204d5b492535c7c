// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::rng::Rng;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use fenster_core::{Channel, Credentials, LinkController, light_steady};
use fenster_lichter::config::{
    AW9523_ADDRESS, EXTRA_HEAP_SIZE, I2C_FREQUENCY_KHZ, NET_SOCKETS, PING_HOST, STEADY_LEVELS,
    WIFI_HEAP_SIZE, WIFI_PASSWORD, WIFI_SSID,
};
use fenster_lichter::hal::{LightBus, RadioLink};
use fenster_lichter::tasks::{net_task, status_display_task, supervise};
use fenster_lichter::{Aw9523, StatusPublisher, StatusSignal};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, setzt das Dauerlicht, baut die WiFi-Verbindung
/// auf und übergibt dann an den Supervisor, der nie zurückkehrt.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // ========================================================================
    // Konstantstrom-Treiber + Dauerlicht
    // ========================================================================

    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(I2C_FREQUENCY_KHZ)),
    )
    .expect("Failed to initialize I2C")
    .with_sda(peripherals.GPIO6)
    .with_scl(peripherals.GPIO7);

    let mut bus: LightBus = Aw9523::new(i2c, AW9523_ADDRESS);
    bus.init().expect("AW9523 not responding");

    let mut steady = heapless::Vec::<_, { Channel::COUNT }>::new();
    for &(id, value) in STEADY_LEVELS {
        let channel = Channel::new(id).expect("Invalid steady channel");
        steady.push((channel, value)).expect("Too many steady channels");
    }
    if let Err(e) = light_steady(&mut bus, &steady) {
        // Dauerlicht ist nicht kritisch, die Animationen laufen trotzdem
        error!("Anim: failed to set steady levels: {}", e);
    }
    info!("Anim: steady levels set on {} channels", steady.len());

    // ========================================================================
    // WiFi + Netzwerk-Stack
    // ========================================================================

    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Static resources für embassy-net (DHCP, DNS, Ping-Socket)
    static RESOURCES: static_cell::StaticCell<StackResources<NET_SOCKETS>> =
        static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (nutzt STA interface für Client-Modus)
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );
    spawner.spawn(net_task(runner)).unwrap();

    // ========================================================================
    // Status-Ausgabe
    // ========================================================================

    static STATUS_SIGNAL: static_cell::StaticCell<StatusSignal> = static_cell::StaticCell::new();
    let status_signal = &*STATUS_SIGNAL.init(StatusSignal::new());
    spawner.spawn(status_display_task(status_signal)).unwrap();

    // ========================================================================
    // Startphase: blockiert bis eine geprüfte Verbindung steht
    // ========================================================================

    let credentials = Credentials {
        ssid: WIFI_SSID,
        passphrase: WIFI_PASSWORD,
    };
    let mut link = LinkController::new(RadioLink::new(wifi_controller, stack), credentials);
    link.establish_initial_link(PING_HOST).await;
    info!("Link: bring-up complete");

    // Boot-Taster: Ruhepegel High, gedrückt Low
    let mut button = Input::new(
        peripherals.GPIO9,
        InputConfig::default().with_pull(Pull::Up),
    );

    // Ab hier übernimmt der Supervisor
    supervise(
        &mut bus,
        &mut link,
        &mut button,
        StatusPublisher::new(status_signal),
        rng,
    )
    .await
}
