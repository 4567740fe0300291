//! Fixed-rate motion tick
//!
//! Advances every free horse by its velocity and bounces it off the
//! container walls.

use glam::Vec2;

use super::geom::Bounds;
use super::state::Herd;
use crate::consts::MAX_CATCHUP_TICKS;

/// Advance the herd by one tick
pub fn tick(herd: &mut Herd) {
    herd.time_ticks += 1;

    let bounds = herd.bounds;
    // Read the hold inside the tick so a grab that landed since the last
    // tick already excludes that horse.
    let held = herd.held_id();

    for actor in herd.actors.iter_mut() {
        if actor.contained || Some(actor.id) == held {
            continue;
        }

        let candidate = actor.pos + actor.vel;
        if candidate.x <= 0.0 || candidate.x >= bounds.max.x {
            actor.vel.x = -actor.vel.x;
        }
        if candidate.y <= 0.0 || candidate.y >= bounds.max.y {
            actor.vel.y = -actor.vel.y;
        }
        actor.pos = bounds.clamp(candidate);
    }
}

/// Container changed size: recompute bounds and pull free horses back in
///
/// Corralled horses keep their snapped position.
pub fn resize(herd: &mut Herd, container_size: Vec2) {
    let bounds = Bounds::for_container(container_size, herd.footprint());
    if bounds == herd.bounds {
        return;
    }
    herd.bounds = bounds;

    for actor in herd.actors.iter_mut().filter(|a| !a.contained) {
        actor.pos = bounds.clamp(actor.pos);
    }
    log::debug!("Corral resized, bounds now {:?}", bounds.max);
}

/// First real measurement for a herd spawned against a guessed size
///
/// Free horses keep their relative place in the corral instead of piling up
/// against the new walls. Corralled horses are left alone.
pub fn rescale(herd: &mut Herd, container_size: Vec2) {
    let old = herd.bounds.max;
    let bounds = Bounds::for_container(container_size, herd.footprint());
    herd.bounds = bounds;

    for actor in herd.actors.iter_mut().filter(|a| !a.contained) {
        let scaled = Vec2::new(
            scale_axis(actor.pos.x, old.x, bounds.max.x),
            scale_axis(actor.pos.y, old.y, bounds.max.y),
        );
        actor.pos = bounds.clamp(scaled);
    }
    log::debug!("Herd rescaled to {:?}", bounds.max);
}

fn scale_axis(value: f32, old_max: f32, new_max: f32) -> f32 {
    if old_max > 0.0 { value / old_max * new_max } else { 0.0 }
}

/// Converts wall-clock time into whole motion ticks
///
/// Timers in throttled tabs fire late; the ticker replays the missed steps up
/// to `MAX_CATCHUP_TICKS` and drops the rest.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval_ms: f64,
    accumulator: f64,
    last_time: Option<f64>,
}

impl Ticker {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: f64::from(interval_ms.max(1)),
            accumulator: 0.0,
            last_time: None,
        }
    }

    /// How many ticks to run for a timer callback at `now_ms`
    ///
    /// The first callback always runs exactly one tick.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_time.replace(now_ms) else {
            return 1;
        };

        self.accumulator += (now_ms - last).max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.interval_ms && steps < MAX_CATCHUP_TICKS {
            self.accumulator -= self.interval_ms;
            steps += 1;
        }
        if steps == MAX_CATCHUP_TICKS {
            self.accumulator = 0.0;
        }
        steps
    }

    pub fn clear(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }
}
