// Hardware Abstraction Layer (HAL) Module
//
// Konkrete ESP32-C6 Implementierungen der fenster-core Traits.
// Der AW9523-Treiber selbst liegt in fenster-core (nur embedded-hal).

pub mod radio_link;

pub use radio_link::RadioLink;

use esp_hal::Blocking;
use esp_hal::gpio::Input;
use esp_hal::i2c::master::I2c;

/// Konstantstrom-Treiber am I2C0-Bus
pub type LightBus = fenster_core::Aw9523<I2c<'static, Blocking>>;

/// WiFi-Zustandsmaschine über dem eingebauten Funkmodul
pub type RadioLinkController = fenster_core::LinkController<'static, RadioLink>;

/// Boot-Taster (GPIO9, Pull-Up)
pub type Button = Input<'static>;
