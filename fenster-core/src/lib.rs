//! Fenster Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE ESP-spezifischen Dependencies.
//! Sie definiert Traits, Animationen, den kooperativen Scheduler und die
//! WiFi-Zustandsmaschine. Hardware wird nur über Traits angesprochen.

#![no_std]

// Muss vor allen anderen Modulen stehen (Makros)
#[macro_use]
mod log;

pub mod animation;
pub mod aw9523;
pub mod input;
pub mod link;
pub mod random;
pub mod scheduler;
pub mod traits;
pub mod types;
pub mod wifi;

// Re-exports für einfachen Zugriff
pub use animation::{AnimationRoutine, FadeAllTogether, FadeChase, Flicker, light_steady};
pub use aw9523::Aw9523;
pub use input::{EdgeDetector, InputWatcher};
pub use link::{LinkController, LinkDiagnostics, LinkSample, LinkState, PeripheralIdentity};
pub use random::Xorshift32;
pub use scheduler::{CooperativeScheduler, TaskFault, TaskId, Watcher};
pub use traits::{CurrentBus, HardwareIoError, LinkPeripheral, RandomSource, StatusSink};
pub use types::{ButtonEdge, Channel, ConfigError, Intensity, StatusMessage, SuspendRequest};
pub use wifi::{Credentials, MacAddress, NetworkInfo, PingTarget, WifiStatus};
