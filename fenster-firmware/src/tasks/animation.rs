// Animations-Task und Supervisor
//
// Das Task-Set (alle Animationen + Taster) läuft in einem einzigen
// kooperativen Scheduler. Fällt ein Task aus, wird das ganze Set neu
// aufgebaut: frische Animationen, frischer Zufalls-Seed, frischer Taster.

use defmt::{error, info, warn};
use embassy_time::{Duration, Timer};
use esp_hal::rng::Rng;
use heapless::Vec;

use fenster_core::{
    AnimationRoutine, Channel, ConfigError, CooperativeScheduler, CurrentBus, FadeAllTogether,
    FadeChase, Flicker, InputWatcher, Watcher, Xorshift32,
};

use crate::StatusPublisher;
use crate::config::{
    BUTTON_POLL_MS, CONFIG_RETRY_DELAY_SECS, MAX_ROUTINES, ROUTINES, RoutineConfig,
};
use crate::hal::{Button, LightBus, RadioLinkController};

/// Übersetzt einen Konfigurations-Eintrag in eine Animation
pub fn build_routine(config: &RoutineConfig) -> Result<AnimationRoutine, ConfigError> {
    let routine = match *config {
        RoutineConfig::Flicker {
            channel,
            min,
            max,
            interval_ms,
        } => Flicker::new(
            Channel::new(channel)?,
            min,
            max,
            Duration::from_millis(interval_ms),
        )?
        .into(),
        RoutineConfig::FadeChase {
            channels,
            interval_ms,
            max,
        } => FadeChase::new(
            &channel_list(channels)?,
            Duration::from_millis(interval_ms),
            max,
        )?
        .into(),
        RoutineConfig::FadeAllTogether {
            channels,
            interval_ms,
            max,
        } => FadeAllTogether::new(
            &channel_list(channels)?,
            Duration::from_millis(interval_ms),
            max,
        )?
        .into(),
    };
    Ok(routine)
}

fn channel_list(ids: &[u8]) -> Result<Vec<Channel, { Channel::COUNT }>, ConfigError> {
    let mut channels = Vec::new();
    for &id in ids {
        channels
            .push(Channel::new(id)?)
            .map_err(|_| ConfigError::TooManyChannels)?;
    }
    Ok(channels)
}

/// Baut das komplette Task-Set aus [`ROUTINES`]
pub fn build_task_set<B, W>(
    bus: B,
    seed: u32,
    watcher: W,
) -> Result<CooperativeScheduler<B, Xorshift32, W, MAX_ROUTINES>, ConfigError>
where
    B: CurrentBus,
    W: Watcher,
{
    let mut scheduler = CooperativeScheduler::new(bus, Xorshift32::new(seed), watcher);
    for config in ROUTINES {
        scheduler.add_routine(build_routine(config)?)?;
    }
    Ok(scheduler)
}

/// Supervisor: startet das Task-Set nach jedem Ausfall sofort neu
///
/// Kehrt nie zurück. Kein Backoff, keine Obergrenze; nur ein
/// Konfigurationsfehler wartet kurz, damit die Schleife nicht durchdreht.
pub async fn supervise(
    bus: &mut LightBus,
    link: &mut RadioLinkController,
    button: &mut Button,
    status: StatusPublisher,
    rng: Rng,
) -> ! {
    let mut generation: u32 = 0;
    loop {
        generation = generation.wrapping_add(1);
        let watcher = InputWatcher::new(&mut *link, &mut *button, status)
            .with_interval(Duration::from_millis(BUTTON_POLL_MS));

        match build_task_set(&mut *bus, rng.random(), watcher) {
            Ok(mut scheduler) => {
                info!(
                    "Anim: starting task set #{} ({} routines)",
                    generation,
                    scheduler.routine_count()
                );
                let fault = scheduler.run().await;
                warn!("Anim: task set #{} ended: {}, restarting", generation, fault);
            }
            Err(e) => {
                error!("Anim: invalid configuration: {}", e);
                Timer::after(Duration::from_secs(CONFIG_RETRY_DELAY_SECS)).await;
            }
        }
    }
}
