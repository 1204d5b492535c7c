// Library-Root: ESP32-C6 Anbindung für fenster-core
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von fenster-core
pub use fenster_core::{Aw9523, StatusMessage, StatusSink};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

// ============================================================================
// Status-Anzeige
// ============================================================================
//
// Der Taster-Task läuft innerhalb des Schedulers und darf nicht blockieren.
// Meldungen gehen deshalb über ein Signal an den Status-Task: bei zwei
// schnellen Meldungen gewinnt die letzte, wie auf einem echten Display.

/// Signal für die jeweils neueste Statusmeldung
pub type StatusSignal = Signal<CriticalSectionRawMutex, StatusMessage>;

/// `StatusSink` für den Taster-Task, schreibt in das [`StatusSignal`]
#[derive(Clone, Copy)]
pub struct StatusPublisher {
    signal: &'static StatusSignal,
}

impl StatusPublisher {
    pub fn new(signal: &'static StatusSignal) -> Self {
        Self { signal }
    }
}

impl StatusSink for StatusPublisher {
    fn publish(&mut self, message: StatusMessage) {
        self.signal.signal(message);
    }
}
