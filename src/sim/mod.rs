//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod boss;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod movement;
pub mod skills;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use boss::{Boss, BossEncounter};
pub use collision::{CollisionRule, RESOLUTION_ORDER, resolve_collisions};
pub use entity::{
    Beam, BeamSteering, Category, Companion, CompanionKind, Entity, EntityId, EntityKind, Hostile,
    HostileVariant, PowerUpKind,
};
pub use geometry::{Aabb, direction_to, in_bounds};
pub use movement::fan_headings;
pub use snapshot::{Banner, RenderItem, RenderableState, Visual, build_snapshot};
pub use spawn::Spawner;
pub use state::{
    BossPhase, DefeatCause, Facing, GameState, KillSource, Mood, Player, SessionOutcome, SimEvent,
    SkillChoice,
};
pub use tick::{TickInput, tick};
