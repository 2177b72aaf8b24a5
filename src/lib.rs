//! Beam Survivor - entity simulation for a 2D survival arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, boss)
//! - `session`: Session controller driving the simulation per frame
//! - `settings`: Driver configuration loaded from JSON

pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
///
/// Screen coordinates: origin top-left, +x right, +y down. Distances are
/// pixels, speeds are pixels per tick.
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation rate
    pub const TICK_RATE: u32 = 50;
    /// Maximum ticks advanced per `Session::advance` call
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 1100.0;
    pub const ARENA_HEIGHT: f32 = 650.0;
    pub const ARENA_CENTER: Vec2 = Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0);

    /// Player defaults
    pub const PLAYER_START: Vec2 = Vec2::new(900.0, 400.0);
    pub const PLAYER_HALF_EXTENTS: Vec2 = Vec2::new(34.0, 30.0);
    pub const PLAYER_BASE_SPEED: f32 = 10.0;
    pub const PLAYER_SPEED_CAP: f32 = 20.0;
    pub const PLAYER_SPEED_GROWTH: f32 = 1.1;
    /// Ticks the happy sprite stays up after a beam kill
    pub const HAPPY_TICKS: u32 = 25;

    /// Player beams
    pub const BEAM_SPEED: f32 = 10.0;
    pub const BEAM_HALF_EXTENTS: Vec2 = Vec2::new(12.0, 12.0);
    pub const BEAM_BASE_POWER: f32 = 1.0;
    pub const BEAM_POWER_STEP: f32 = 0.2;
    pub const AUTOFIRE_BASE_INTERVAL: u32 = 30;
    pub const AUTOFIRE_MIN_INTERVAL: u32 = 1;
    /// Point beams head for while the boss makes its entrance
    pub const BEAM_RALLY_POINT: Vec2 = Vec2::new(ARENA_WIDTH / 2.0, 250.0);

    /// Fan fire
    pub const FAN_SPREAD_DEG: f32 = 100.0;
    pub const MANUAL_FAN_COUNT: usize = 5;
    pub const BOSS_FAN_COUNT: usize = 3;

    /// Hostiles
    pub const CHASER_SPEED: f32 = 3.0;
    pub const CHASER_HALF_EXTENTS: Vec2 = Vec2::new(28.0, 24.0);
    pub const ZIGZAG_SPEED: f32 = 2.0;
    pub const ZIGZAG_HALF_EXTENTS: Vec2 = Vec2::new(26.0, 26.0);
    pub const ZIGZAG_PHASE_STEP: f32 = 0.1;
    pub const ZIGZAG_AMPLITUDE: f32 = 2.0;
    /// Zig-zag chasers spawn this far past the nearest arena corner
    pub const ZIGZAG_CORNER_OFFSET: f32 = 50.0;
    pub const HOSTILE_POINTS: u64 = 10;

    /// Spawn ring radius (exceeds the arena diagonal)
    pub const SPAWN_RADIUS: f32 = 1300.0;

    /// Spawner cadence (ticks)
    pub const CHASER_SPAWN_INTERVAL: u64 = 20;
    pub const ZIGZAG_SPAWN_INTERVAL: u64 = 100;
    pub const STAT_ITEM_INTERVAL: u64 = 100;
    pub const GRAVITY_ITEM_INTERVAL: u64 = 1000;
    /// Difficulty ramps every 5 seconds
    pub const DIFFICULTY_STEP_TICKS: u64 = 5 * TICK_RATE as u64;
    pub const INITIAL_SPAWN_DIRECTIONS: u32 = 4;
    pub const SPAWN_DIRECTION_STEP: u32 = 2;
    pub const INITIAL_HOSTILES_PER_SPAWN: u32 = 1;
    pub const MAX_HOSTILES_PER_SPAWN: u32 = 4;
    /// Items never spawn closer than this to the arena edge
    pub const ITEM_MARGIN: f32 = 50.0;

    /// Power-up items
    pub const STAT_ITEM_HALF_EXTENTS: Vec2 = Vec2::new(20.0, 20.0);
    pub const GRAVITY_ITEM_HALF_EXTENTS: Vec2 = Vec2::new(24.0, 24.0);

    /// Scoring
    pub const SCORE_COMPANION_KILL: u64 = 5;
    pub const SCORE_GRAVITY_KILL: u64 = 10;
    pub const SCORE_POWER_UP: u64 = 10;
    pub const SKILL_SCORE_STEP: u64 = 150;

    /// Gravity field
    pub const GRAVITY_LIFETIME: i32 = 80;
    pub const GRAVITY_PICKUP_BOSS_DAMAGE: u32 = 20;
    pub const GRAVITY_BOSS_CHIP: u32 = 1;

    /// Companions
    pub const REFLECTOR_SPEED: f32 = 3.0;
    pub const REFLECTOR_HALF_EXTENTS: Vec2 = Vec2::new(30.0, 30.0);
    pub const PATROLLER_SPEED: f32 = 10.0;
    pub const PATROLLER_HALF_EXTENTS: Vec2 = Vec2::new(20.0, 20.0);

    /// Boss encounter
    pub const BOSS_SCORE_THRESHOLD: u64 = 1000;
    pub const BOSS_MAX_HEALTH: u32 = 300;
    pub const BOSS_HALF_EXTENTS: Vec2 = Vec2::new(140.0, 110.0);
    pub const BOSS_REST_TOP: f32 = 150.0;
    pub const BOSS_GLIDE_SPEED: f32 = 2.0;
    pub const BOSS_WARNING_TICKS: u32 = 4 * TICK_RATE;
    /// Warning banner blink: visible for the first 10 of every 80 ticks
    pub const BANNER_BLINK_PERIOD: u32 = 80;
    pub const BANNER_BLINK_ON: u32 = 10;
    pub const BOSS_FAN_INTERVAL: u32 = 100;
    pub const BOSS_BEAM_SPEED: f32 = 3.0;
    pub const BOSS_BEAM_HALF_EXTENTS: Vec2 = Vec2::new(16.0, 16.0);
    pub const BOSS_CHIP_DAMAGE: u32 = 1;
    pub const VICTORY_DELAY_TICKS: u32 = 5 * TICK_RATE;

    /// Explosion effect
    pub const EXPLOSION_LIFETIME: i32 = 100;
    pub const EXPLOSION_HALF_EXTENTS: Vec2 = Vec2::new(40.0, 40.0);
}

/// Unit vector for a heading in degrees (counter-clockwise from +x, as seen on screen)
#[inline]
pub fn heading_to_vec(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), -rad.sin())
}

/// Screen heading in degrees for a direction vector, in (-180, 180]
#[inline]
pub fn vec_to_heading(dir: Vec2) -> f32 {
    (-dir.y).atan2(dir.x).to_degrees()
}
