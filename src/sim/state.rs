//! Game state and core simulation types
//!
//! Everything one session mutates lives in `GameState`; the session
//! controller owns it and hands it to `tick`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::BossEncounter;
use super::entity::{CompanionKind, Entity, EntityId, EntityKind, HostileVariant, PowerUpKind};
use super::geometry::Aabb;
use super::spawn::Spawner;
use crate::consts::*;

/// One of the 8 compass directions, in screen space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Facing {
    pub const ALL: [Facing; 8] = [
        Facing::East,
        Facing::NorthEast,
        Facing::North,
        Facing::NorthWest,
        Facing::West,
        Facing::SouthWest,
        Facing::South,
        Facing::SouthEast,
    ];

    /// Facing for a summed key step; `None` for no net movement
    pub fn from_step(dx: i32, dy: i32) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (1, 0) => Some(Facing::East),
            (1, -1) => Some(Facing::NorthEast),
            (0, -1) => Some(Facing::North),
            (-1, -1) => Some(Facing::NorthWest),
            (-1, 0) => Some(Facing::West),
            (-1, 1) => Some(Facing::SouthWest),
            (0, 1) => Some(Facing::South),
            (1, 1) => Some(Facing::SouthEast),
            _ => None,
        }
    }

    /// Integer key step for this facing (diagonals are (±1, ±1))
    pub fn step(self) -> (i32, i32) {
        match self {
            Facing::East => (1, 0),
            Facing::NorthEast => (1, -1),
            Facing::North => (0, -1),
            Facing::NorthWest => (-1, -1),
            Facing::West => (-1, 0),
            Facing::SouthWest => (-1, 1),
            Facing::South => (0, 1),
            Facing::SouthEast => (1, 1),
        }
    }

    /// Normalized direction vector
    pub fn unit(self) -> Vec2 {
        let (dx, dy) = self.step();
        Vec2::new(dx as f32, dy as f32).normalize()
    }

    /// Heading in degrees (counter-clockwise from east)
    pub fn heading(self) -> f32 {
        match self {
            Facing::East => 0.0,
            Facing::NorthEast => 45.0,
            Facing::North => 90.0,
            Facing::NorthWest => 135.0,
            Facing::West => 180.0,
            Facing::SouthWest => -135.0,
            Facing::South => -90.0,
            Facing::SouthEast => -45.0,
        }
    }
}

/// Player sprite mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Normal,
    /// Brief swap after a beam kill
    Happy { ticks: u32 },
    /// Shown once the player is defeated
    Sad,
}

/// Skill offered at each score threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SkillChoice {
    #[default]
    Reflector,
    Patroller,
}

impl SkillChoice {
    pub fn companion(self) -> CompanionKind {
        match self {
            SkillChoice::Reflector => CompanionKind::Reflector,
            SkillChoice::Patroller => CompanionKind::Patroller,
        }
    }
}

/// The player avatar
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: EntityId,
    pub body: Aabb,
    pub facing: Facing,
    pub speed: f32,
    pub alive: bool,
    /// Hard pause: the tick does nothing until a skill is picked
    pub awaiting_skill_choice: bool,
    /// Highest `score / SKILL_SCORE_STEP` level already offered
    pub skill_level: u64,
    pub beam_power: f32,
    pub autofire_interval: u32,
    pub autofire_timer: u32,
    /// Stat power-ups collected so far
    pub stat_pickups: u32,
    pub mood: Mood,
}

impl Player {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            body: Aabb::new(PLAYER_START, PLAYER_HALF_EXTENTS),
            facing: Facing::East,
            speed: PLAYER_BASE_SPEED,
            alive: true,
            awaiting_skill_choice: false,
            skill_level: 0,
            beam_power: BEAM_BASE_POWER,
            autofire_interval: AUTOFIRE_BASE_INTERVAL,
            autofire_timer: 0,
            stat_pickups: 0,
            mood: Mood::Normal,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.body.center
    }

    /// Count down the happy sprite
    pub fn update_mood(&mut self) {
        if let Mood::Happy { ticks } = self.mood {
            self.mood = if ticks <= 1 {
                Mood::Normal
            } else {
                Mood::Happy { ticks: ticks - 1 }
            };
        }
    }
}

/// How the session stands after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Continuing,
    Defeated,
    Victorious,
    Quit,
}

/// What ended the player's run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefeatCause {
    HostileContact,
    BossBeam,
}

/// How a hostile was destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillSource {
    Beam,
    Companion(CompanionKind),
    GravityField,
}

/// Boss encounter phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    Dormant,
    Appearing,
    Warning,
    Active,
    Defeated,
    Cleared,
}

/// Things that happened during a tick (for audio, HUD and logs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    HostileKilled {
        variant: HostileVariant,
        source: KillSource,
        pos: Vec2,
    },
    PowerUpCollected {
        kind: PowerUpKind,
    },
    SkillOffered {
        level: u64,
    },
    SkillChosen {
        choice: SkillChoice,
    },
    BossPhaseChanged {
        phase: BossPhase,
    },
    BossDamaged {
        amount: u32,
        health: u32,
    },
    PlayerDefeated {
        cause: DefeatCause,
    },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulated ticks (pauses excluded)
    pub time_ticks: u64,
    /// Score (never decreases)
    pub score: u64,
    pub player: Player,
    /// Live entities (sorted by id for determinism)
    pub entities: Vec<Entity>,
    pub spawner: Spawner,
    pub boss: BossEncounter,
    pub outcome: SessionOutcome,
    /// Events produced since the last drain
    pub events: Vec<SimEvent>,
    /// Next entity ID
    next_id: EntityId,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            score: 0,
            // Id 1 is reserved for the player
            player: Player::new(1),
            entities: Vec::new(),
            spawner: Spawner::default(),
            boss: BossEncounter::default(),
            outcome: SessionOutcome::Continuing,
            events: Vec::new(),
            next_id: 2,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert a new entity built from a fresh id; returns that id
    pub fn spawn(&mut self, build: impl FnOnce(EntityId) -> Entity) -> EntityId {
        let id = self.next_entity_id();
        self.entities.push(build(id));
        id
    }

    /// Look up a live entity by handle
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id && e.alive)
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn push_event(&mut self, event: SimEvent) {
        log::debug!("t={} {:?}", self.time_ticks, event);
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn the explosion effect at `pos`
    pub fn spawn_explosion(&mut self, pos: Vec2) -> EntityId {
        self.spawn(|id| {
            Entity::new(id, Aabb::new(pos, EXPLOSION_HALF_EXTENTS), EntityKind::Explosion)
                .with_life(EXPLOSION_LIFETIME)
        })
    }

    /// Count live entities matching a predicate
    pub fn count(&self, pred: impl Fn(&Entity) -> bool) -> usize {
        self.entities.iter().filter(|e| e.alive && pred(e)).count()
    }

    /// Drop dead entities
    pub fn sweep_dead(&mut self) {
        self.entities.retain(|e| e.alive);
    }

    /// End the run in defeat
    pub fn defeat(&mut self, cause: DefeatCause) {
        if self.outcome != SessionOutcome::Continuing {
            return;
        }
        self.player.alive = false;
        self.player.mood = Mood::Sad;
        self.outcome = SessionOutcome::Defeated;
        log::info!(
            "Player defeated by {:?} at tick {} with score {}",
            cause,
            self.time_ticks,
            self.score
        );
        self.push_event(SimEvent::PlayerDefeated { cause });
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }
}
