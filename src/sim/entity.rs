//! Entity table types
//!
//! Every movable/collidable object except the player and the boss lives in
//! one id-ordered table. Kind-specific data rides in `EntityKind`; the
//! collision resolver dispatches on `Category` through its rule table.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;

/// Stable entity handle. Handles are never reused within a session, so a
/// stale handle simply resolves to nothing.
pub type EntityId = u32;

/// Hostile movement variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostileVariant {
    /// Straight pursuit of the player
    Chaser,
    /// Pursuit with a sinusoidal sideways weave
    ZigZag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hostile {
    pub variant: HostileVariant,
    pub speed: f32,
    pub points: u64,
    /// Weave phase (zig-zag only)
    pub phase: f32,
    /// Set once the hostile's center has been inside the arena
    pub entered: bool,
}

impl Hostile {
    pub fn new(variant: HostileVariant, speed: f32, points: u64) -> Self {
        Self {
            variant,
            speed,
            points,
            phase: 0.0,
            entered: false,
        }
    }
}

/// How a player beam picks its heading each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BeamSteering {
    /// Flies along its launch heading
    Straight,
    /// Locked on one hostile; keeps its last heading once the target is gone
    Homing { target: Option<EntityId> },
    /// Fired during the boss encounter: rally point first, then the boss
    BossBound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    /// Power multiplier at launch (scales the beam's size)
    pub power: f32,
    pub steering: BeamSteering,
    /// Unit heading
    pub heading: Vec2,
}

/// Player-attached skill objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanionKind {
    /// Slow wall-bouncer; damages once per continuous contact
    Reflector,
    /// Fast wall-bouncer heading out toward the player's spawn point;
    /// caroms off whatever it hits
    Patroller,
}

impl CompanionKind {
    /// Whether one continuous overlap counts as a single hit
    pub fn guards_reentry(self) -> bool {
        matches!(self, CompanionKind::Reflector)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Companion {
    pub kind: CompanionKind,
    /// Ids this companion overlapped during the previous resolution pass
    pub contacts: Vec<EntityId>,
}

impl Companion {
    pub fn new(kind: CompanionKind) -> Self {
        Self {
            kind,
            contacts: Vec::new(),
        }
    }

    /// Record an overlap with `id`. Returns true when the overlap should
    /// count as a hit: always for unguarded kinds, only on first contact for
    /// guarded ones.
    pub fn touch(&mut self, id: EntityId) -> bool {
        if self.contacts.contains(&id) {
            return !self.kind.guards_reentry();
        }
        self.contacts.push(id);
        true
    }

    /// Forget a contact that is no longer overlapping
    pub fn release(&mut self, id: EntityId) {
        self.contacts.retain(|&c| c != id);
    }
}

/// Collectible items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Beam power, player speed and fire rate boost
    Stat,
    /// Spawns a gravity field on pickup
    GravityCharge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Hostile(Hostile),
    Beam(Beam),
    BossBeam,
    GravityField,
    Companion(Companion),
    PowerUp(PowerUpKind),
    Explosion,
}

/// Data-free tag for `EntityKind`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Hostile,
    Beam,
    BossBeam,
    GravityField,
    Companion,
    PowerUp,
    Explosion,
}

/// What the resolver and the bounds sweep may do with a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Takes part in collision rules
    pub collidable: bool,
    /// Can be destroyed by a collision rule
    pub damageable: bool,
    /// Removed once it has left the arena
    pub bounds_culled: bool,
}

impl Category {
    pub fn capabilities(self) -> Capabilities {
        match self {
            Category::Hostile => Capabilities {
                collidable: true,
                damageable: true,
                // Only after entering the arena, see `Entity::should_cull`
                bounds_culled: true,
            },
            Category::Beam | Category::BossBeam => Capabilities {
                collidable: true,
                damageable: true,
                bounds_culled: true,
            },
            Category::GravityField | Category::Companion => Capabilities {
                collidable: true,
                damageable: false,
                bounds_culled: false,
            },
            Category::PowerUp => Capabilities {
                collidable: true,
                damageable: true,
                bounds_culled: false,
            },
            Category::Explosion => Capabilities {
                collidable: false,
                damageable: false,
                bounds_culled: false,
            },
        }
    }
}

/// One row of the entity table
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub body: Aabb,
    /// Displacement per tick
    pub vel: Vec2,
    /// Remaining ticks for transient entities; removed once negative
    pub life: Option<i32>,
    pub alive: bool,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(id: EntityId, body: Aabb, kind: EntityKind) -> Self {
        Self {
            id,
            body,
            vel: Vec2::ZERO,
            life: None,
            alive: true,
            kind,
        }
    }

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_life(mut self, life: i32) -> Self {
        self.life = Some(life);
        self
    }

    pub fn category(&self) -> Category {
        match self.kind {
            EntityKind::Hostile(_) => Category::Hostile,
            EntityKind::Beam(_) => Category::Beam,
            EntityKind::BossBeam => Category::BossBeam,
            EntityKind::GravityField => Category::GravityField,
            EntityKind::Companion(_) => Category::Companion,
            EntityKind::PowerUp(_) => Category::PowerUp,
            EntityKind::Explosion => Category::Explosion,
        }
    }

    /// Live member of the given category
    #[inline]
    pub fn is_live(&self, category: Category) -> bool {
        self.alive && self.category() == category
    }

    /// Count down the lifetime; marks the entity dead once it goes negative
    pub fn age(&mut self) {
        if let Some(life) = self.life.as_mut() {
            *life -= 1;
            if *life < 0 {
                self.alive = false;
            }
        }
    }

    /// Bounds-sweep test for this entity
    pub fn should_cull(&self) -> bool {
        if !self.category().capabilities().bounds_culled {
            return false;
        }
        if let EntityKind::Hostile(hostile) = &self.kind {
            if !hostile.entered {
                return false;
            }
        }
        self.body.fully_outside_arena()
    }
}
