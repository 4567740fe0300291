//! Herd state and core simulation types
//!
//! One `Herd` is one play session: a fixed set of actors, the active drag
//! (if any) and the RNG that drives spawning and barn snapping.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::containment::all_contained;
use super::geom::Bounds;
use crate::settings::Settings;

/// A horse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: u32,
    /// Top-left corner in container-local pixels
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    /// Corralled in the barn. Terminal until reset.
    pub contained: bool,
}

impl Actor {
    /// Mark as corralled at `pos`. Velocity is zeroed.
    pub fn corral(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.contained = true;
    }
}

/// What a renderer needs per horse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub contained: bool,
}

impl From<&Actor> for ActorView {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id,
            x: actor.pos.x,
            y: actor.pos.y,
            contained: actor.contained,
        }
    }
}

/// The active hold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drag {
    pub actor_id: u32,
    /// Pointer that grabbed the actor; other pointers are ignored
    pub pointer_id: i32,
    /// Pointer (container-local) minus actor origin at grab time
    pub offset: Vec2,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Herd {
    pub settings: Settings,
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub(crate) rng: Pcg32,
    /// Current valid range for actor top-left positions
    pub(crate) bounds: Bounds,
    /// Actors sorted by id
    pub(crate) actors: Vec<Actor>,
    pub(crate) drag: Option<Drag>,
    /// Motion ticks since the session (re)started
    pub time_ticks: u64,
    next_id: u32,
}

impl Herd {
    /// Start a session for a container of the given interior size
    pub fn new(settings: Settings, seed: u64, container_size: Vec2) -> Self {
        let rng_state = RngState::new(seed);
        let bounds = Bounds::for_container(container_size, settings.horse_size);
        let mut herd = Self {
            settings,
            seed,
            rng: rng_state.to_rng(),
            rng_state,
            bounds,
            actors: Vec::new(),
            drag: None,
            time_ticks: 0,
            next_id: 1,
        };
        herd.spawn_all();
        herd
    }

    /// Start a session sized by `settings.fallback_container`
    pub fn with_fallback_container(settings: Settings, seed: u64) -> Self {
        let size = settings.fallback_container;
        Self::new(settings, seed, size)
    }

    /// Allocate a new actor ID
    fn next_actor_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace the whole collection from the spawn rule
    fn spawn_all(&mut self) {
        let count = self.settings.horse_count;
        let (min_speed, max_speed) = (self.settings.min_speed, self.settings.max_speed);
        let max = self.bounds.max;

        let mut actors = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.next_actor_id();
            let pos = Vec2::new(
                self.rng.random_range(0.0..=max.x),
                self.rng.random_range(0.0..=max.y),
            );
            let vel = Vec2::new(
                random_signed_speed(&mut self.rng, min_speed, max_speed),
                random_signed_speed(&mut self.rng, min_speed, max_speed),
            );
            actors.push(Actor {
                id,
                pos,
                vel,
                contained: false,
            });
        }
        self.actors = actors;
    }

    /// Discard everything and respawn from the session seed
    pub fn reset(&mut self) {
        self.rng = self.rng_state.to_rng();
        self.drag = None;
        self.time_ticks = 0;
        self.spawn_all();
        log::info!("Herd reset ({} horses, seed {})", self.actors.len(), self.seed);
    }

    /// Discard everything and respawn from a new seed
    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.rng_state = RngState::new(seed);
        self.reset();
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: u32) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub(crate) fn actor_mut(&mut self, id: u32) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    /// Render projection of every actor, in id order
    pub fn views(&self) -> Vec<ActorView> {
        self.actors.iter().map(ActorView::from).collect()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn footprint(&self) -> Vec2 {
        self.settings.horse_size
    }

    pub fn drag(&self) -> Option<&Drag> {
        self.drag.as_ref()
    }

    /// Id of the actor under the pointer, if any
    pub fn held_id(&self) -> Option<u32> {
        self.drag.map(|d| d.actor_id)
    }

    pub fn contained_count(&self) -> usize {
        self.actors.iter().filter(|a| a.contained).count()
    }

    /// Derived from the actors on every call
    pub fn won(&self) -> bool {
        all_contained(&self.actors)
    }
}

fn random_signed_speed(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    let speed = rng.random_range(min..=max);
    if rng.random_bool(0.5) { speed } else { -speed }
}
