//! Boss encounter state machine
//!
//! `Dormant -> Appearing -> Warning -> Active -> Defeated -> Cleared`
//!
//! The boss spawns above the arena once the score threshold is crossed and
//! glides down to its resting spot while the warning banner blinks. It only
//! becomes targetable (and starts firing) once the banner time is over.
//! Health only drops while `Active`.

use glam::Vec2;
use rand::Rng;

use super::entity::{Category, Entity, EntityId, EntityKind};
use super::geometry::Aabb;
use super::movement::fan_headings;
use super::state::{BossPhase, GameState, SessionOutcome, SimEvent};
use crate::consts::*;
use crate::heading_to_vec;

/// The boss entity
#[derive(Debug, Clone, PartialEq)]
pub struct Boss {
    pub id: EntityId,
    pub body: Aabb,
    pub health: u32,
    /// Ticks since the boss appeared (drives the warning banner)
    pub banner_ticks: u32,
    /// Ticks since the last attack fan
    pub fire_ticks: u32,
    /// Ticks since defeat
    pub defeat_ticks: u32,
}

impl Boss {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            body: Aabb::new(
                Vec2::new(ARENA_WIDTH / 2.0, -BOSS_HALF_EXTENTS.y),
                BOSS_HALF_EXTENTS,
            ),
            health: BOSS_MAX_HEALTH,
            banner_ticks: 0,
            fire_ticks: 0,
            defeat_ticks: 0,
        }
    }

    /// Center y once the boss has finished its entrance
    pub fn rest_y() -> f32 {
        BOSS_REST_TOP + BOSS_HALF_EXTENTS.y
    }

    /// Glide toward the resting position; true once there
    fn glide(&mut self) -> bool {
        let rest = Self::rest_y();
        self.body.center.y = (self.body.center.y + BOSS_GLIDE_SPEED).min(rest);
        self.body.center.y >= rest
    }
}

/// Singleton boss slot plus its phase
#[derive(Debug, Clone, PartialEq)]
pub struct BossEncounter {
    pub phase: BossPhase,
    pub boss: Option<Boss>,
}

impl Default for BossEncounter {
    fn default() -> Self {
        Self {
            phase: BossPhase::Dormant,
            boss: None,
        }
    }
}

impl BossEncounter {
    /// Whether the boss is targetable and takes damage
    pub fn is_active(&self) -> bool {
        self.phase == BossPhase::Active
    }

    /// Whether the boss has appeared (any phase past `Dormant`)
    pub fn has_appeared(&self) -> bool {
        self.phase != BossPhase::Dormant
    }

    /// Active boss body, if any
    pub fn active_body(&self) -> Option<Aabb> {
        if self.is_active() {
            self.boss.as_ref().map(|b| b.body)
        } else {
            None
        }
    }

    pub fn health(&self) -> Option<u32> {
        self.boss.as_ref().map(|b| b.health)
    }

    /// Warning banner blink state
    pub fn warning_banner_visible(&self) -> bool {
        match (&self.phase, &self.boss) {
            (BossPhase::Appearing | BossPhase::Warning, Some(boss)) => {
                boss.banner_ticks % BANNER_BLINK_PERIOD < BANNER_BLINK_ON
            }
            _ => false,
        }
    }

    pub fn victory_banner_visible(&self) -> bool {
        matches!(self.phase, BossPhase::Defeated | BossPhase::Cleared)
    }
}

fn set_phase(state: &mut GameState, phase: BossPhase) {
    log::info!(
        "Boss phase {:?} -> {:?} at tick {}",
        state.boss.phase,
        phase,
        state.time_ticks
    );
    state.boss.phase = phase;
    state.push_event(SimEvent::BossPhaseChanged { phase });
}

/// `Dormant -> Appearing` once the score crosses the threshold.
/// Purges every ordinary hostile.
pub fn check_threshold(state: &mut GameState) {
    if state.boss.phase != BossPhase::Dormant || state.score < BOSS_SCORE_THRESHOLD {
        return;
    }
    let id = state.next_entity_id();
    state.boss.boss = Some(Boss::new(id));

    let mut purged = 0;
    for e in state.entities.iter_mut() {
        if e.is_live(Category::Hostile) {
            e.alive = false;
            purged += 1;
        }
    }
    log::info!("Boss incoming (score {}), purged {} hostiles", state.score, purged);
    set_phase(state, BossPhase::Appearing);
}

/// Advance the encounter one tick: entrance, banner, attack fans and the
/// post-defeat countdown.
pub fn update(state: &mut GameState) {
    let phase = state.boss.phase;
    let Some(boss) = state.boss.boss.as_mut() else {
        return;
    };

    match phase {
        BossPhase::Dormant | BossPhase::Cleared => {}
        BossPhase::Appearing => {
            boss.banner_ticks += 1;
            if boss.glide() {
                set_phase(state, BossPhase::Warning);
            }
        }
        BossPhase::Warning => {
            boss.banner_ticks += 1;
            if boss.banner_ticks >= BOSS_WARNING_TICKS {
                set_phase(state, BossPhase::Active);
            }
        }
        BossPhase::Active => {
            boss.fire_ticks += 1;
            if boss.fire_ticks >= BOSS_FAN_INTERVAL {
                boss.fire_ticks = 0;
                let origin = boss.body.center;
                fire_fan(state, origin);
            }
        }
        BossPhase::Defeated => {
            boss.defeat_ticks += 1;
            if boss.defeat_ticks >= VICTORY_DELAY_TICKS {
                set_phase(state, BossPhase::Cleared);
                state.boss.boss = None;
                state.outcome = SessionOutcome::Victorious;
                log::info!("Session cleared with score {}", state.score);
            }
        }
    }
}

/// Emit a boss fan at a random base heading
fn fire_fan(state: &mut GameState, origin: Vec2) {
    let base = state.rng.random_range(-180..=180) as f32;
    for heading in fan_headings(base, BOSS_FAN_COUNT) {
        let vel = heading_to_vec(heading) * BOSS_BEAM_SPEED;
        state.spawn(|id| {
            Entity::new(id, Aabb::new(origin, BOSS_BEAM_HALF_EXTENTS), EntityKind::BossBeam)
                .with_vel(vel)
        });
    }
}

/// Apply chip damage. Ignored unless the boss is `Active`; health saturates
/// at zero and the transition to `Defeated` happens exactly once.
pub fn damage(state: &mut GameState, amount: u32) {
    if !state.boss.is_active() || amount == 0 {
        return;
    }
    let Some(boss) = state.boss.boss.as_mut() else {
        return;
    };
    boss.health = boss.health.saturating_sub(amount);
    let health = boss.health;
    let pos = boss.body.center;
    state.push_event(SimEvent::BossDamaged { amount, health });

    if health == 0 {
        state.spawn_explosion(pos);
        set_phase(state, BossPhase::Defeated);
    }
}
