//! Time-driven spawning of hostiles and power-ups
//!
//! Hostiles appear on a ring well outside the arena at one of a discrete set
//! of angles. The set grows every few seconds, as does the number of
//! hostiles per spawn. Ordinary hostiles stop once the boss shows up.

use glam::Vec2;
use rand::Rng;

use super::entity::{Entity, EntityKind, Hostile, HostileVariant, PowerUpKind};
use super::geometry::Aabb;
use super::state::{BossPhase, GameState};
use crate::consts::*;

/// Spawner counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spawner {
    /// Ticks the spawner has run
    pub tick: u64,
    /// Number of discrete spawn angles
    pub spawn_directions: u32,
    /// Chasers emitted per chaser spawn
    pub hostiles_per_spawn: u32,
    /// Tick of the last difficulty ramp
    pub last_ramp_tick: u64,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            tick: 0,
            spawn_directions: INITIAL_SPAWN_DIRECTIONS,
            hostiles_per_spawn: INITIAL_HOSTILES_PER_SPAWN,
            last_ramp_tick: 0,
        }
    }
}

impl Spawner {
    /// Raise difficulty if another step interval has passed
    fn ramp(&mut self) -> bool {
        if self.tick - self.last_ramp_tick < DIFFICULTY_STEP_TICKS {
            return false;
        }
        self.spawn_directions += SPAWN_DIRECTION_STEP;
        self.hostiles_per_spawn = (self.hostiles_per_spawn + 1).min(MAX_HOSTILES_PER_SPAWN);
        self.last_ramp_tick = self.tick;
        true
    }
}

/// Run one spawner step
pub fn spawn_step(state: &mut GameState) {
    let hostiles_enabled = state.boss.phase == BossPhase::Dormant;
    let tick = state.spawner.tick;

    if hostiles_enabled && state.spawner.ramp() {
        log::info!(
            "Difficulty up: {} spawn directions, {} hostiles per spawn",
            state.spawner.spawn_directions,
            state.spawner.hostiles_per_spawn
        );
    }

    if hostiles_enabled {
        if tick % CHASER_SPAWN_INTERVAL == 0 {
            for _ in 0..state.spawner.hostiles_per_spawn {
                spawn_hostile(state, HostileVariant::Chaser);
            }
        }
        if tick % ZIGZAG_SPAWN_INTERVAL == 0 {
            spawn_hostile(state, HostileVariant::ZigZag);
        }
    }

    if tick != 0 {
        if tick % STAT_ITEM_INTERVAL == 0 {
            spawn_power_up(state, PowerUpKind::Stat);
        }
        if tick % GRAVITY_ITEM_INTERVAL == 0 {
            spawn_power_up(state, PowerUpKind::GravityCharge);
        }
    }

    state.spawner.tick += 1;
}

/// Point on the spawn ring for the given angle index
pub fn ring_position(index: u32, directions: u32) -> Vec2 {
    let degrees = index as f32 * (360.0 / directions.max(1) as f32);
    let rad = degrees.to_radians();
    ARENA_CENTER + Vec2::new(rad.cos(), rad.sin()) * SPAWN_RADIUS
}

/// Push a ring position out to just past the nearest arena corner
fn corner_position(ring: Vec2) -> Vec2 {
    let x = if ring.x < ARENA_CENTER.x {
        -ZIGZAG_CORNER_OFFSET
    } else {
        ARENA_WIDTH + ZIGZAG_CORNER_OFFSET
    };
    let y = if ring.y < ARENA_CENTER.y {
        -ZIGZAG_CORNER_OFFSET
    } else {
        ARENA_HEIGHT + ZIGZAG_CORNER_OFFSET
    };
    Vec2::new(x, y)
}

/// Spawn one hostile of the given variant at a random ring angle
pub fn spawn_hostile(state: &mut GameState, variant: HostileVariant) {
    let directions = state.spawner.spawn_directions;
    let index = state.rng.random_range(0..directions);
    let ring = ring_position(index, directions);

    let (pos, half, hostile) = match variant {
        HostileVariant::Chaser => (
            ring,
            CHASER_HALF_EXTENTS,
            Hostile::new(variant, CHASER_SPEED, HOSTILE_POINTS),
        ),
        HostileVariant::ZigZag => (
            corner_position(ring),
            ZIGZAG_HALF_EXTENTS,
            Hostile::new(variant, ZIGZAG_SPEED, HOSTILE_POINTS),
        ),
    };
    state.spawn(|id| Entity::new(id, Aabb::new(pos, half), EntityKind::Hostile(hostile)));
}

/// Spawn a power-up at a random in-arena position
pub fn spawn_power_up(state: &mut GameState, kind: PowerUpKind) {
    let x = state.rng.random_range(ITEM_MARGIN..=ARENA_WIDTH - ITEM_MARGIN);
    let y = state.rng.random_range(ITEM_MARGIN..=ARENA_HEIGHT - ITEM_MARGIN);
    let half = match kind {
        PowerUpKind::Stat => STAT_ITEM_HALF_EXTENTS,
        PowerUpKind::GravityCharge => GRAVITY_ITEM_HALF_EXTENTS,
    };
    state.spawn(|id| {
        Entity::new(id, Aabb::new(Vec2::new(x, y), half), EntityKind::PowerUp(kind))
    });
}
