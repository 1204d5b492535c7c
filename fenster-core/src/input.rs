//! Taster-Abfrage
//!
//! Der Taster hängt mit Pull-Up an einem GPIO: Ruhepegel High, gedrückt
//! Low. Reagiert wird nur auf die Flanke, nie auf den Dauerpegel; langes
//! Drücken löst die Aktion also nur einmal aus.

use embassy_time::Duration;
use embedded_hal::digital::InputPin;

use crate::link::{LinkController, LinkState};
use crate::scheduler::Watcher;
use crate::traits::{HardwareIoError, LinkPeripheral, StatusSink};
use crate::types::{ButtonEdge, StatusMessage, SuspendRequest};

/// Abfrage-Intervall, begrenzt die Reaktionszeit auf einen Tastendruck
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Merkt sich den letzten Pegel und liefert die Flanke zum neuen
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    previous_high: Option<bool>,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Die erste Messung legt nur den Ausgangspegel fest
    pub fn update(&mut self, current_high: bool) -> ButtonEdge {
        let edge = match self.previous_high {
            Some(previous_high) => ButtonEdge::from_levels(previous_high, current_high),
            None => ButtonEdge::None,
        };
        self.previous_high = Some(current_high);
        edge
    }
}

/// Taster-Task: schaltet WiFi bei jedem Drücken ein bzw. aus
///
/// Die Meldungen gehen an den [`StatusSink`] (Display).
pub struct InputWatcher<'l, 'c, P, I, S> {
    link: &'l mut LinkController<'c, P>,
    input: I,
    sink: S,
    edges: EdgeDetector,
    interval: Duration,
    greeted: bool,
}

impl<'l, 'c, P, I, S> InputWatcher<'l, 'c, P, I, S>
where
    P: LinkPeripheral,
    I: InputPin,
    S: StatusSink,
{
    pub fn new(link: &'l mut LinkController<'c, P>, input: I, sink: S) -> Self {
        Self {
            link,
            input,
            sink,
            edges: EdgeDetector::new(),
            interval: POLL_INTERVAL,
            greeted: false,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn link(&self) -> &LinkController<'c, P> {
        &*self.link
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Eine Abfrage: Pegel lesen, Flanke bestimmen, bei Druck umschalten
    pub async fn poll_once(&mut self) -> Result<ButtonEdge, HardwareIoError> {
        if !self.greeted {
            let connected = self.link.state() == LinkState::Connected;
            self.sink.publish(StatusMessage::greeting(connected));
            self.greeted = true;
        }

        let high = self.input.is_high().map_err(|_| HardwareIoError::Bus)?;
        let edge = self.edges.update(high);
        if edge == ButtonEdge::Pressed {
            info!("Button: pressed");
            self.toggle_link().await;
        }
        Ok(edge)
    }

    async fn toggle_link(&mut self) {
        let message = if self.link.state() == LinkState::Connected {
            match self.link.disconnect().await {
                LinkState::Disconnected => StatusMessage::disconnected(),
                _ => StatusMessage::disconnect_failed(),
            }
        } else {
            match self.link.connect().await {
                LinkState::Connected => match self.link.ssid().await {
                    Some(ssid) => StatusMessage::connected_to(&ssid),
                    None => StatusMessage::connected_to(self.link.credentials().ssid),
                },
                _ => StatusMessage::connect_failed(),
            }
        };

        info!("Status: {}", message.text());
        self.sink.publish(message);
    }
}

impl<P, I, S> Watcher for InputWatcher<'_, '_, P, I, S>
where
    P: LinkPeripheral,
    I: InputPin,
    S: StatusSink,
{
    async fn resume(&mut self) -> Result<SuspendRequest, HardwareIoError> {
        self.poll_once().await?;
        Ok(SuspendRequest::after(self.interval))
    }
}
