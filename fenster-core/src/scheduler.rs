//! Kooperativer Scheduler
//!
//! Ein einziger Thread, keine Locks: jeder Task läuft bis zu seinem nächsten
//! Pausenpunkt und meldet dann, wie lange er schlafen will. Der Scheduler
//! merkt sich pro Task den Weckzeitpunkt und weckt fällige Tasks der Reihe
//! nach (erst die Animationen in Registrierungsreihenfolge, dann den
//! Taster-Task).
//!
//! Fällt ein Task mit einem Hardwarefehler aus, endet der ganze Lauf. Ein
//! stillschweigend verlorener Task würde einen Kanal auf zufälliger
//! Helligkeit einfrieren; der Supervisor baut stattdessen alles neu auf.

use embassy_time::{Instant, Timer};
use heapless::Vec;

use crate::animation::AnimationRoutine;
use crate::traits::{CurrentBus, HardwareIoError, RandomSource};
use crate::types::{ConfigError, SuspendRequest};

/// Task, der nicht auf den Konstantstrom-Bus schreibt (Taster-Abfrage)
#[allow(async_fn_in_trait)]
pub trait Watcher {
    async fn resume(&mut self) -> Result<SuspendRequest, HardwareIoError>;
}

/// Welcher Task ausgefallen ist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskId {
    /// Index in Registrierungsreihenfolge
    Routine(usize),
    Watcher,
}

/// Fataler Fehler eines Tasks, beendet das ganze Task-Set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskFault {
    pub task: TaskId,
    pub error: HardwareIoError,
}

struct Slot<T> {
    task: T,
    wake_at: Instant,
}

impl<T> Slot<T> {
    fn new(task: T) -> Self {
        // Erster Aufruf sofort
        Self {
            task,
            wake_at: Instant::from_ticks(0),
        }
    }
}

/// Treibt bis zu `N` Animationen und einen [`Watcher`]
///
/// Besitzt den Bus-Handle für die Dauer eines Laufs; die Kanäle der
/// Animationen sind disjunkt (wird in [`add_routine`](Self::add_routine)
/// geprüft), deshalb braucht der Bus keine Synchronisation.
pub struct CooperativeScheduler<B, R, W, const N: usize> {
    bus: B,
    rng: R,
    routines: Vec<Slot<AnimationRoutine>, N>,
    watcher: Slot<W>,
}

impl<B, R, W, const N: usize> CooperativeScheduler<B, R, W, N>
where
    B: CurrentBus,
    R: RandomSource,
    W: Watcher,
{
    pub fn new(bus: B, rng: R, watcher: W) -> Self {
        Self {
            bus,
            rng,
            routines: Vec::new(),
            watcher: Slot::new(watcher),
        }
    }

    /// Registriert eine Animation
    ///
    /// Schlägt fehl wenn der Scheduler voll ist oder ein Kanal schon einer
    /// anderen Animation gehört.
    pub fn add_routine(&mut self, routine: impl Into<AnimationRoutine>) -> Result<(), ConfigError> {
        let routine = routine.into();
        for slot in &self.routines {
            if let Some(&taken) = routine
                .channels()
                .iter()
                .find(|&&channel| slot.task.channels().contains(&channel))
            {
                return Err(ConfigError::ChannelConflict(taken));
            }
        }
        self.routines
            .push(Slot::new(routine))
            .map_err(|_| ConfigError::TooManyTasks)
    }

    pub fn routine_count(&self) -> usize {
        self.routines.len()
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn watcher(&self) -> &W {
        &self.watcher.task
    }

    /// Weckt alle Tasks, deren Weckzeit `now` erreicht hat, genau einmal
    ///
    /// Gibt den frühesten nächsten Weckzeitpunkt zurück.
    pub async fn poll(&mut self, now: Instant) -> Result<Instant, TaskFault> {
        for (index, slot) in self.routines.iter_mut().enumerate() {
            if slot.wake_at <= now {
                let request = slot
                    .task
                    .resume(&mut self.bus, &mut self.rng)
                    .map_err(|error| TaskFault {
                        task: TaskId::Routine(index),
                        error,
                    })?;
                slot.wake_at = now + request.duration();
            }
        }

        if self.watcher.wake_at <= now {
            let request = self.watcher.task.resume().await.map_err(|error| TaskFault {
                task: TaskId::Watcher,
                error,
            })?;
            self.watcher.wake_at = now + request.duration();
        }

        Ok(self
            .routines
            .iter()
            .map(|slot| slot.wake_at)
            .fold(self.watcher.wake_at, Instant::min))
    }

    /// Läuft bis ein Task ausfällt
    pub async fn run(&mut self) -> TaskFault {
        info!("Anim: task set running ({} routines)", self.routines.len());
        loop {
            match self.poll(Instant::now()).await {
                Ok(next) => Timer::at(next).await,
                Err(fault) => {
                    if let TaskId::Routine(index) = fault.task {
                        error!(
                            "Anim: routine {} ({}) failed: {}",
                            index,
                            self.routines[index].task.name(),
                            fault.error
                        );
                    } else {
                        error!("Anim: watcher failed: {}", fault.error);
                    }
                    return fault;
                }
            }
        }
    }
}
