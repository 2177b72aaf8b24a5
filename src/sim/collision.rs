//! Collision resolution
//!
//! One pass per tick, after movement. Rules run in the fixed order of
//! `RESOLUTION_ORDER`; each consumes the members it matched, so later rules
//! never see an entity an earlier rule destroyed. All tests use the
//! positions from this tick's movement pass (no continuous detection, fast
//! movers may tunnel through thin colliders).

use super::boss;
use super::entity::{
    Category, Companion, CompanionKind, EntityId, EntityKind, HostileVariant, PowerUpKind,
};
use super::geometry::Aabb;
use super::movement::bounce_off_box;
use super::skills::{apply_power_up, check_skill_threshold};
use super::state::{DefeatCause, GameState, KillSource, Mood, SessionOutcome, SimEvent};
use crate::consts::*;

/// Pairwise group tests, in resolution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionRule {
    /// Player touches any hostile: defeat
    PlayerHostile,
    /// Hostile hit by player beams: both destroyed, +10, skill check
    HostileBeam,
    /// Hostile hit by a companion: hostile destroyed, +5
    HostileCompanion,
    /// Gravity field sweeps hostiles and boss beams, chips the boss
    GravityField,
    /// Player collects a stat power-up
    StatPowerUp,
    /// Player collects a gravity charge
    GravityCharge,
    /// Player touches a boss beam: defeat
    PlayerBossBeam,
    /// Beams and companions against the active boss
    BossHits,
}

pub const RESOLUTION_ORDER: [CollisionRule; 8] = [
    CollisionRule::PlayerHostile,
    CollisionRule::HostileBeam,
    CollisionRule::HostileCompanion,
    CollisionRule::GravityField,
    CollisionRule::StatPowerUp,
    CollisionRule::GravityCharge,
    CollisionRule::PlayerBossBeam,
    CollisionRule::BossHits,
];

/// Run every rule in order; stops as soon as the session ends
pub fn resolve_collisions(state: &mut GameState) {
    for rule in RESOLUTION_ORDER {
        if state.outcome != SessionOutcome::Continuing {
            return;
        }
        apply_rule(state, rule);
    }
}

pub fn apply_rule(state: &mut GameState, rule: CollisionRule) {
    match rule {
        CollisionRule::PlayerHostile => player_vs(state, Category::Hostile, DefeatCause::HostileContact),
        CollisionRule::HostileBeam => hostiles_vs_beams(state),
        CollisionRule::HostileCompanion => hostiles_vs_companions(state),
        CollisionRule::GravityField => gravity_fields(state),
        CollisionRule::StatPowerUp => collect_power_ups(state, PowerUpKind::Stat),
        CollisionRule::GravityCharge => collect_power_ups(state, PowerUpKind::GravityCharge),
        CollisionRule::PlayerBossBeam => player_vs(state, Category::BossBeam, DefeatCause::BossBeam),
        CollisionRule::BossHits => boss_hits(state),
    }
}

/// Indices of live entities in a category that take part in collisions
fn live_indices(state: &GameState, category: Category) -> Vec<usize> {
    if !category.capabilities().collidable {
        return Vec::new();
    }
    state
        .entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_live(category))
        .map(|(i, _)| i)
        .collect()
}

fn hostile_variant(state: &GameState, idx: usize) -> HostileVariant {
    match &state.entities[idx].kind {
        EntityKind::Hostile(h) => h.variant,
        _ => HostileVariant::Chaser,
    }
}

/// Destroy hostile `idx`, leave an explosion and report the kill
fn kill_hostile(state: &mut GameState, idx: usize, source: KillSource) {
    debug_assert!(state.entities[idx].category().capabilities().damageable);
    let variant = hostile_variant(state, idx);
    let pos = state.entities[idx].body.center;
    state.entities[idx].alive = false;
    state.spawn_explosion(pos);
    state.push_event(SimEvent::HostileKilled {
        variant,
        source,
        pos,
    });
}

/// Fatal contact between the player and any live member of `category`
fn player_vs(state: &mut GameState, category: Category, cause: DefeatCause) {
    let player = state.player.body;
    let hit = state
        .entities
        .iter_mut()
        .find(|e| e.is_live(category) && e.body.overlaps(&player));
    if let Some(e) = hit {
        if category == Category::BossBeam {
            e.alive = false;
        }
        state.defeat(cause);
    }
}

fn hostiles_vs_beams(state: &mut GameState) {
    for hi in live_indices(state, Category::Hostile) {
        let body = state.entities[hi].body;
        let mut hit = false;
        for e in state.entities.iter_mut() {
            if e.is_live(Category::Beam) && e.body.overlaps(&body) {
                e.alive = false;
                hit = true;
            }
        }
        if !hit {
            continue;
        }
        let points = match &state.entities[hi].kind {
            EntityKind::Hostile(h) => h.points,
            _ => HOSTILE_POINTS,
        };
        kill_hostile(state, hi, KillSource::Beam);
        state.add_score(points);
        state.player.mood = Mood::Happy { ticks: HAPPY_TICKS };
        check_skill_threshold(state);
    }
}

fn hostiles_vs_companions(state: &mut GameState) {
    for ci in live_indices(state, Category::Companion) {
        for hi in live_indices(state, Category::Hostile) {
            let hostile_body = state.entities[hi].body;
            let hostile_id = state.entities[hi].id;
            let (entity_body, companion) = split_companion(state, ci);
            let Some(companion) = companion else {
                continue;
            };
            if !entity_body.overlaps(&hostile_body) {
                companion.release(hostile_id);
                continue;
            }
            if !companion.touch(hostile_id) {
                continue;
            }
            let kind = companion.kind;
            if kind == CompanionKind::Patroller {
                let e = &mut state.entities[ci];
                bounce_off_box(&e.body, &mut e.vel, &hostile_body);
            }
            kill_hostile(state, hi, KillSource::Companion(kind));
            state.add_score(SCORE_COMPANION_KILL);
        }
    }
}

/// Body and companion data for the companion at `idx`
fn split_companion(state: &mut GameState, idx: usize) -> (Aabb, Option<&mut Companion>) {
    let e = &mut state.entities[idx];
    let body = e.body;
    match &mut e.kind {
        EntityKind::Companion(c) => (body, Some(c)),
        _ => (body, None),
    }
}

fn gravity_fields(state: &mut GameState) {
    for fi in live_indices(state, Category::GravityField) {
        let field = state.entities[fi].body;

        for hi in live_indices(state, Category::Hostile) {
            if state.entities[hi].body.overlaps(&field) {
                kill_hostile(state, hi, KillSource::GravityField);
                state.add_score(SCORE_GRAVITY_KILL);
            }
        }

        for e in state.entities.iter_mut() {
            if e.is_live(Category::BossBeam) && e.body.overlaps(&field) {
                e.alive = false;
            }
        }

        if let Some(boss_body) = state.boss.active_body() {
            if boss_body.overlaps(&field) {
                boss::damage(state, GRAVITY_BOSS_CHIP);
            }
        }
    }
}

fn collect_power_ups(state: &mut GameState, kind: PowerUpKind) {
    let player = state.player.body;
    for i in live_indices(state, Category::PowerUp) {
        let e = &mut state.entities[i];
        if e.kind != EntityKind::PowerUp(kind) || !e.body.overlaps(&player) {
            continue;
        }
        e.alive = false;
        apply_power_up(state, kind);
    }
}

fn boss_hits(state: &mut GameState) {
    let Some(boss_body) = state.boss.active_body() else {
        return;
    };
    let boss_id: EntityId = state.boss.boss.as_ref().map(|b| b.id).unwrap_or_default();

    let mut damage = 0;
    for e in state.entities.iter_mut().filter(|e| e.alive) {
        let overlapping = e.body.overlaps(&boss_body);
        match &mut e.kind {
            EntityKind::Beam(_) if overlapping => {
                e.alive = false;
                damage += BOSS_CHIP_DAMAGE;
            }
            EntityKind::Companion(companion) => {
                if !overlapping {
                    companion.release(boss_id);
                    continue;
                }
                if companion.touch(boss_id) {
                    damage += BOSS_CHIP_DAMAGE;
                }
                if companion.kind == CompanionKind::Patroller {
                    bounce_off_box(&e.body, &mut e.vel, &boss_body);
                }
            }
            _ => {}
        }
    }

    // Apply hit by hit so defeat triggers on the exact hit that empties health
    for _ in 0..damage {
        if !state.boss.is_active() {
            break;
        }
        boss::damage(state, 1);
    }
}

/// Drop companion contacts with entities that no longer exist
pub fn prune_contacts(state: &mut GameState) {
    let live: Vec<EntityId> = state
        .entities
        .iter()
        .filter(|e| e.alive)
        .map(|e| e.id)
        .chain(state.boss.boss.as_ref().map(|b| b.id))
        .collect();
    for e in state.entities.iter_mut() {
        if let EntityKind::Companion(c) = &mut e.kind {
            c.contacts.retain(|id| live.contains(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use crate::sim::entity::{Beam, BeamSteering, Entity, Hostile};
    use crate::sim::state::BossPhase;

    fn add_hostile(state: &mut GameState, pos: Vec2) -> EntityId {
        state.spawn(|id| {
            Entity::new(
                id,
                Aabb::new(pos, CHASER_HALF_EXTENTS),
                EntityKind::Hostile(Hostile::new(HostileVariant::Chaser, CHASER_SPEED, HOSTILE_POINTS)),
            )
        })
    }

    fn add_beam(state: &mut GameState, pos: Vec2) -> EntityId {
        state.spawn(|id| {
            Entity::new(
                id,
                Aabb::new(pos, BEAM_HALF_EXTENTS),
                EntityKind::Beam(Beam {
                    power: 1.0,
                    steering: BeamSteering::Straight,
                    heading: Vec2::X,
                }),
            )
        })
    }

    fn add_companion(state: &mut GameState, kind: CompanionKind, pos: Vec2) -> EntityId {
        state.spawn(|id| {
            Entity::new(
                id,
                Aabb::new(pos, REFLECTOR_HALF_EXTENTS),
                EntityKind::Companion(Companion::new(kind)),
            )
            .with_vel(Vec2::new(3.0, 3.0))
        })
    }

    fn active_boss(state: &mut GameState) -> Aabb {
        state.score = BOSS_SCORE_THRESHOLD;
        boss::check_threshold(state);
        while state.boss.phase != BossPhase::Active {
            boss::update(state);
        }
        state.boss.active_body().unwrap()
    }

    #[test]
    fn test_player_contact_with_hostile_defeats() {
        let mut state = GameState::new(1);
        let pos = state.player.center();
        add_hostile(&mut state, pos);
        resolve_collisions(&mut state);
        assert_eq!(state.outcome, SessionOutcome::Defeated);
        assert_eq!(state.player.mood, Mood::Sad);
    }

    #[test]
    fn test_beam_kill_scores_ten_and_consumes_both() {
        let mut state = GameState::new(1);
        let pos = Vec2::new(200.0, 200.0);
        add_hostile(&mut state, pos);
        add_beam(&mut state, pos);
        resolve_collisions(&mut state);
        assert_eq!(state.score, 10);
        assert_eq!(state.count(|e| e.category() == Category::Hostile), 0);
        assert_eq!(state.count(|e| e.category() == Category::Beam), 0);
        assert_eq!(state.count(|e| e.category() == Category::Explosion), 1);
        assert!(matches!(state.player.mood, Mood::Happy { .. }));
    }

    #[test]
    fn test_one_beam_kills_only_one_hostile() {
        let mut state = GameState::new(1);
        let pos = Vec2::new(200.0, 200.0);
        add_hostile(&mut state, pos);
        add_hostile(&mut state, pos + Vec2::new(5.0, 0.0));
        add_beam(&mut state, pos);
        resolve_collisions(&mut state);
        assert_eq!(state.score, 10);
        assert_eq!(state.count(|e| e.category() == Category::Hostile), 1);
    }

    #[test]
    fn test_crossing_150_offers_one_skill() {
        let mut state = GameState::new(1);
        state.score = 140;
        let pos = Vec2::new(200.0, 200.0);
        add_hostile(&mut state, pos);
        add_beam(&mut state, pos);
        resolve_collisions(&mut state);
        assert_eq!(state.score, 150);
        assert!(state.player.awaiting_skill_choice);
        let offers = state
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::SkillOffered { .. }))
            .count();
        assert_eq!(offers, 1);
    }

    #[test]
    fn test_companion_kill_scores_five_and_survives() {
        let mut state = GameState::new(1);
        let pos = Vec2::new(200.0, 200.0);
        add_hostile(&mut state, pos);
        let companion = add_companion(&mut state, CompanionKind::Reflector, pos);
        resolve_collisions(&mut state);
        assert_eq!(state.score, 5);
        assert!(state.entity(companion).is_some());
        assert_eq!(state.count(|e| e.category() == Category::Hostile), 0);
    }

    #[test]
    fn test_gravity_field_clears_hostiles_and_persists() {
        let mut state = GameState::new(1);
        add_hostile(&mut state, Vec2::new(100.0, 100.0));
        add_hostile(&mut state, Vec2::new(300.0, 500.0));
        apply_power_up(&mut state, PowerUpKind::GravityCharge);
        resolve_collisions(&mut state);
        assert_eq!(state.score, 20);
        assert_eq!(state.count(|e| e.category() == Category::GravityField), 1);
    }

    #[test]
    fn test_gravity_field_erases_boss_beams_without_score() {
        let mut state = GameState::new(1);
        let beam = state.spawn(|id| {
            Entity::new(
                id,
                Aabb::new(Vec2::new(150.0, 120.0), BOSS_BEAM_HALF_EXTENTS),
                EntityKind::BossBeam,
            )
        });
        apply_power_up(&mut state, PowerUpKind::GravityCharge);
        resolve_collisions(&mut state);
        state.sweep_dead();

        assert!(state.entity(beam).is_none());
        assert_eq!(state.count(|e| e.category() == Category::BossBeam), 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.outcome, SessionOutcome::Continuing);
    }

    #[test]
    fn test_stat_pickup_consumed_on_contact() {
        let mut state = GameState::new(1);
        let pos = state.player.center();
        state.spawn(|id| {
            Entity::new(id, Aabb::new(pos, STAT_ITEM_HALF_EXTENTS), EntityKind::PowerUp(PowerUpKind::Stat))
        });
        resolve_collisions(&mut state);
        assert_eq!(state.score, SCORE_POWER_UP);
        assert_eq!(state.count(|e| e.category() == Category::PowerUp), 0);
    }

    #[test]
    fn test_boss_beam_contact_defeats() {
        let mut state = GameState::new(1);
        let pos = state.player.center();
        state.spawn(|id| Entity::new(id, Aabb::new(pos, BOSS_BEAM_HALF_EXTENTS), EntityKind::BossBeam));
        resolve_collisions(&mut state);
        assert_eq!(state.outcome, SessionOutcome::Defeated);
    }

    #[test]
    fn test_beams_chip_active_boss() {
        let mut state = GameState::new(1);
        let boss_body = active_boss(&mut state);
        add_beam(&mut state, boss_body.center);
        add_beam(&mut state, boss_body.center + Vec2::new(10.0, 0.0));
        resolve_collisions(&mut state);
        assert_eq!(state.boss.health(), Some(BOSS_MAX_HEALTH - 2 * BOSS_CHIP_DAMAGE));
        assert_eq!(state.count(|e| e.category() == Category::Beam), 0);
    }

    #[test]
    fn test_reflector_hits_boss_once_per_contact() {
        let mut state = GameState::new(1);
        let boss_body = active_boss(&mut state);
        let companion = add_companion(&mut state, CompanionKind::Reflector, boss_body.center);
        for _ in 0..5 {
            resolve_collisions(&mut state);
            prune_contacts(&mut state);
        }
        assert_eq!(state.boss.health(), Some(BOSS_MAX_HEALTH - BOSS_CHIP_DAMAGE));

        // Leave and come back: a second hit
        let e = state.entities.iter_mut().find(|e| e.id == companion).unwrap();
        e.body.center = Vec2::new(50.0, 600.0);
        resolve_collisions(&mut state);
        let e = state.entities.iter_mut().find(|e| e.id == companion).unwrap();
        e.body.center = boss_body.center;
        resolve_collisions(&mut state);
        assert_eq!(state.boss.health(), Some(BOSS_MAX_HEALTH - 2 * BOSS_CHIP_DAMAGE));
    }

    #[test]
    fn test_patroller_hits_boss_every_tick_and_bounces() {
        let mut state = GameState::new(1);
        let boss_body = active_boss(&mut state);
        let start = boss_body.center + Vec2::new(0.0, boss_body.half_extents.y - 5.0);
        let companion = add_companion(&mut state, CompanionKind::Patroller, start);
        state.entities.iter_mut().find(|e| e.id == companion).unwrap().vel = Vec2::new(0.0, -10.0);
        resolve_collisions(&mut state);
        resolve_collisions(&mut state);
        assert_eq!(state.boss.health(), Some(BOSS_MAX_HEALTH - 2 * BOSS_CHIP_DAMAGE));
        let vel = state.entity(companion).unwrap().vel;
        assert!(vel.y > 0.0, "bounced away from the boss");
    }

    #[test]
    fn test_boss_ignores_hits_before_active() {
        let mut state = GameState::new(1);
        state.score = BOSS_SCORE_THRESHOLD;
        boss::check_threshold(&mut state);
        let center = state.boss.boss.as_ref().unwrap().body.center;
        add_beam(&mut state, center);
        resolve_collisions(&mut state);
        assert_eq!(state.boss.health(), Some(BOSS_MAX_HEALTH));
        // The beam is not consumed either
        assert_eq!(state.count(|e| e.category() == Category::Beam), 1);
    }

    #[test]
    fn test_resolution_stops_after_defeat() {
        let mut state = GameState::new(1);
        let pos = state.player.center();
        add_hostile(&mut state, pos);
        state.spawn(|id| {
            Entity::new(id, Aabb::new(pos, STAT_ITEM_HALF_EXTENTS), EntityKind::PowerUp(PowerUpKind::Stat))
        });
        resolve_collisions(&mut state);
        assert_eq!(state.outcome, SessionOutcome::Defeated);
        assert_eq!(state.score, 0);
    }
}
