use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use tinig_sky::{Clock, Mode};
use tinig_types::events::SkyEvent;

use crate::dispatcher::Dispatcher;

#[derive(Debug, Clone)]
pub struct AmbientConfig {
    /// How often the day/night mode is re-evaluated.
    pub tick: Duration,
    /// Seconds between shooting stars at night.
    pub shooting_star_secs: RangeInclusive<u64>,
    /// Seconds between birds during the day.
    pub bird_secs: RangeInclusive<u64>,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(60),
            shooting_star_secs: 6..=14,
            bird_secs: 10..=25,
        }
    }
}

/// The timed background of the sky: the clock tick, shooting stars and
/// birds. Each runs as its own task; all of them stop on `shutdown`.
pub struct Ambient {
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Ambient {
    pub fn start(dispatcher: Dispatcher, clock: Arc<dyn Clock>, config: AmbientConfig) -> Self {
        let cancel = CancellationToken::new();

        let tasks = vec![
            tokio::spawn(clock_tick(
                dispatcher.clone(),
                clock.clone(),
                config.tick,
                cancel.child_token(),
            )),
            tokio::spawn(effect_loop(
                dispatcher.clone(),
                clock.clone(),
                Mode::Night,
                config.shooting_star_secs,
                cancel.child_token(),
                shooting_star,
            )),
            tokio::spawn(effect_loop(
                dispatcher,
                clock,
                Mode::Day,
                config.bird_secs,
                cancel.child_token(),
                bird,
            )),
        ];

        info!("Ambient sky started ({} tasks)", tasks.len());
        Self { cancel, tasks }
    }

    /// Cancel every ambient task and wait for them to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for task in std::mem::take(&mut self.tasks) {
            let _ = task.await;
        }
        info!("Ambient sky stopped");
    }
}

impl Drop for Ambient {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Broadcast `ModeChange` whenever the clock crosses 06:00 or 18:00.
async fn clock_tick(
    dispatcher: Dispatcher,
    clock: Arc<dyn Clock>,
    every: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(every);
    let mut current: Option<Mode> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let mode = Mode::at(&clock.local_time());
                if current.is_some_and(|prev| prev != mode) {
                    info!("Sky turned to {:?}", mode);
                    dispatcher.broadcast(SkyEvent::ModeChange { night: mode.is_night() });
                }
                current = Some(mode);
            }
        }
    }
}

/// Fire `make` at random intervals, but only while the sky is in `only_in`.
async fn effect_loop(
    dispatcher: Dispatcher,
    clock: Arc<dyn Clock>,
    only_in: Mode,
    secs: RangeInclusive<u64>,
    cancel: CancellationToken,
    make: fn(&mut StdRng) -> SkyEvent,
) {
    let mut rng = StdRng::from_os_rng();

    loop {
        let delay = Duration::from_secs(rng.random_range(secs.clone()));
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {
                if Mode::at(&clock.local_time()) == only_in && dispatcher.listeners() > 0 {
                    let event = make(&mut rng);
                    debug!("Ambient: {:?}", event);
                    dispatcher.broadcast(event);
                }
            }
        }
    }
}

fn shooting_star(rng: &mut StdRng) -> SkyEvent {
    SkyEvent::ShootingStar {
        from_x: rng.random_range(20..=95),
        from_y: rng.random_range(0..=40),
        angle: rng.random_range(20..=45),
    }
}

fn bird(rng: &mut StdRng) -> SkyEvent {
    SkyEvent::BirdFlight {
        altitude: rng.random_range(8..=40),
        leftward: rng.random_bool(0.5),
    }
}
