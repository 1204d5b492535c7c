//! Animationen für die Konstantstrom-Kanäle
//!
//! Jede Animation ist ein endloser Schritt-Automat: `resume()` setzt
//! höchstens einen Kanal und sagt, wie lange danach pausiert werden soll.
//! Der Fortschritt (Phase, Kanal-Index, Teilschritt) steckt in der Animation
//! selbst, es gibt keinen gemeinsamen Zustand zwischen Animationen.

use embassy_time::Duration;
use heapless::Vec;

use crate::traits::{CurrentBus, HardwareIoError, RandomSource};
use crate::types::{Channel, ConfigError, Intensity, SuspendRequest};

/// Pause zwischen zwei Stufen einer Flacker-Rampe
pub const FLICKER_STEP: Duration = Duration::from_millis(70);

type ChannelList = Vec<Channel, { Channel::COUNT }>;

/// Setzt Kanäle einmalig auf einen festen Strom (Dauerlicht)
pub fn light_steady<B: CurrentBus>(
    bus: &mut B,
    levels: &[(Channel, Intensity)],
) -> Result<(), HardwareIoError> {
    for &(channel, value) in levels {
        bus.set_intensity(channel, value)?;
    }
    Ok(())
}

// ============================================================================
// Flicker
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlickerPhase {
    /// Neuer Zyklus: Obergrenze wird ausgewürfelt
    Begin,
    Ramp { next: Intensity, ceiling: Intensity },
}

/// Kerzenflackern auf einem Kanal
///
/// Pro Zyklus wird eine zufällige Obergrenze in `[min, max]` gewählt, dann
/// läuft der Strom ab `min` in Einerschritten (alle 70 ms) bis knapp unter
/// diese Grenze. Danach folgt eine zufällige Pause in `[0, interval)`.
#[derive(Debug, Clone)]
pub struct Flicker {
    channel: Channel,
    min: Intensity,
    max: Intensity,
    interval: Duration,
    phase: FlickerPhase,
}

impl Flicker {
    pub fn new(
        channel: Channel,
        min: Intensity,
        max: Intensity,
        interval: Duration,
    ) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvertedBand { min, max });
        }
        Ok(Self {
            channel,
            min,
            max,
            interval,
            phase: FlickerPhase::Begin,
        })
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn resume<B: CurrentBus, R: RandomSource>(
        &mut self,
        bus: &mut B,
        rng: &mut R,
    ) -> Result<SuspendRequest, HardwareIoError> {
        let (next, ceiling) = match self.phase {
            FlickerPhase::Begin => (self.min, rng.between(self.min, self.max)),
            FlickerPhase::Ramp { next, ceiling } => (next, ceiling),
        };

        if next < ceiling {
            bus.set_intensity(self.channel, next)?;
            self.phase = FlickerPhase::Ramp {
                next: next + 1,
                ceiling,
            };
            return Ok(SuspendRequest::after(FLICKER_STEP));
        }

        // Rampe fertig (oder leer): zufällige Pause, danach neu würfeln
        self.phase = FlickerPhase::Begin;
        let pause = rng.below(self.interval.as_micros());
        Ok(SuspendRequest::after(Duration::from_micros(pause)))
    }
}

// ============================================================================
// Fades über mehrere Kanäle
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Rising,
    Falling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepOrder {
    /// Kanal hoch, gleicher Kanal runter, dann nächster Kanal
    PerChannel,
    /// Alle Kanäle nacheinander hoch, danach alle nacheinander runter
    AllTogether,
}

/// Gemeinsamer Cursor für FadeChase und FadeAllTogether
///
/// Hoch: 1..=max, runter: max-1..=0. Beide Rampen haben `max` Schritte.
#[derive(Debug, Clone)]
struct Sweep {
    channels: ChannelList,
    interval: Duration,
    max: Intensity,
    order: SweepOrder,
    index: usize,
    direction: Direction,
    step: Intensity,
}

impl Sweep {
    fn new(
        channels: &[Channel],
        interval: Duration,
        max: Intensity,
        order: SweepOrder,
    ) -> Result<Self, ConfigError> {
        if channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        let channels = Vec::from_slice(channels).map_err(|_| ConfigError::TooManyChannels)?;
        Ok(Self {
            channels,
            interval,
            max,
            order,
            index: 0,
            direction: Direction::Rising,
            step: 0,
        })
    }

    fn resume<B: CurrentBus>(&mut self, bus: &mut B) -> Result<SuspendRequest, HardwareIoError> {
        let pause = SuspendRequest::after(self.interval);
        if self.max == 0 {
            // Leere Rampe: nichts zu setzen, trotzdem pausieren
            return Ok(pause);
        }

        let channel = self.channels[self.index];
        let value = match self.direction {
            Direction::Rising => self.step + 1,
            Direction::Falling => self.max - 1 - self.step,
        };
        bus.set_intensity(channel, value)?;
        self.advance();
        Ok(pause)
    }

    fn advance(&mut self) {
        self.step += 1;
        if self.step < self.max {
            return;
        }
        self.step = 0;

        match (self.order, self.direction) {
            (SweepOrder::PerChannel, Direction::Rising) => self.direction = Direction::Falling,
            (SweepOrder::PerChannel, Direction::Falling) => {
                self.direction = Direction::Rising;
                self.index = (self.index + 1) % self.channels.len();
            }
            (SweepOrder::AllTogether, direction) => {
                self.index += 1;
                if self.index == self.channels.len() {
                    self.index = 0;
                    self.direction = match direction {
                        Direction::Rising => Direction::Falling,
                        Direction::Falling => Direction::Rising,
                    };
                }
            }
        }
    }
}

/// Lauflicht: immer nur ein Kanal blendet auf und wieder ab
#[derive(Debug, Clone)]
pub struct FadeChase {
    sweep: Sweep,
}

impl FadeChase {
    pub fn new(
        channels: &[Channel],
        interval: Duration,
        max: Intensity,
    ) -> Result<Self, ConfigError> {
        Sweep::new(channels, interval, max, SweepOrder::PerChannel).map(|sweep| Self { sweep })
    }

    pub fn channels(&self) -> &[Channel] {
        &self.sweep.channels
    }

    pub fn resume<B: CurrentBus>(
        &mut self,
        bus: &mut B,
    ) -> Result<SuspendRequest, HardwareIoError> {
        self.sweep.resume(bus)
    }
}

/// Alle Kanäle nacheinander an, erst danach alle nacheinander aus
#[derive(Debug, Clone)]
pub struct FadeAllTogether {
    sweep: Sweep,
}

impl FadeAllTogether {
    pub fn new(
        channels: &[Channel],
        interval: Duration,
        max: Intensity,
    ) -> Result<Self, ConfigError> {
        Sweep::new(channels, interval, max, SweepOrder::AllTogether).map(|sweep| Self { sweep })
    }

    pub fn channels(&self) -> &[Channel] {
        &self.sweep.channels
    }

    pub fn resume<B: CurrentBus>(
        &mut self,
        bus: &mut B,
    ) -> Result<SuspendRequest, HardwareIoError> {
        self.sweep.resume(bus)
    }
}

// ============================================================================
// Gemeinsame Schnittstelle für den Scheduler
// ============================================================================

#[derive(Debug, Clone)]
pub enum AnimationRoutine {
    Flicker(Flicker),
    FadeChase(FadeChase),
    FadeAllTogether(FadeAllTogether),
}

impl AnimationRoutine {
    pub fn resume<B: CurrentBus, R: RandomSource>(
        &mut self,
        bus: &mut B,
        rng: &mut R,
    ) -> Result<SuspendRequest, HardwareIoError> {
        match self {
            AnimationRoutine::Flicker(flicker) => flicker.resume(bus, rng),
            AnimationRoutine::FadeChase(chase) => chase.resume(bus),
            AnimationRoutine::FadeAllTogether(fade) => fade.resume(bus),
        }
    }

    /// Kanäle, die diese Animation exklusiv besitzt
    pub fn channels(&self) -> &[Channel] {
        match self {
            AnimationRoutine::Flicker(flicker) => core::slice::from_ref(&flicker.channel),
            AnimationRoutine::FadeChase(chase) => chase.channels(),
            AnimationRoutine::FadeAllTogether(fade) => fade.channels(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnimationRoutine::Flicker(_) => "Flicker",
            AnimationRoutine::FadeChase(_) => "FadeChase",
            AnimationRoutine::FadeAllTogether(_) => "FadeAllTogether",
        }
    }
}

impl From<Flicker> for AnimationRoutine {
    fn from(flicker: Flicker) -> Self {
        AnimationRoutine::Flicker(flicker)
    }
}

impl From<FadeChase> for AnimationRoutine {
    fn from(chase: FadeChase) -> Self {
        AnimationRoutine::FadeChase(chase)
    }
}

impl From<FadeAllTogether> for AnimationRoutine {
    fn from(fade: FadeAllTogether) -> Self {
        AnimationRoutine::FadeAllTogether(fade)
    }
}
