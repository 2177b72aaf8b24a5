//! Per-category movement and targeting
//!
//! Runs after spawning and before collision resolution. All moves are a
//! single discrete step per tick (no sub-stepping).

use glam::Vec2;

use super::entity::{
    Beam, BeamSteering, Category, CompanionKind, Entity, EntityId, EntityKind, HostileVariant,
};
use super::geometry::{Aabb, arena_contains, direction_or, direction_to, in_bounds};
use super::state::{BossPhase, Facing, GameState, Player};
use crate::consts::*;
use crate::heading_to_vec;

/// Headings for a fan of `count` beams spread evenly over `FAN_SPREAD_DEG`,
/// centred on `base` (degrees). Both arc endpoints are included; a single
/// beam gets `base` itself.
pub fn fan_headings(base: f32, count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![base],
        n => {
            let step = FAN_SPREAD_DEG / (n - 1) as f32;
            (0..n)
                .map(|i| base - FAN_SPREAD_DEG / 2.0 + i as f32 * step)
                .collect()
        }
    }
}

/// Summed key step from held movement keys
pub fn key_step(up: bool, down: bool, left: bool, right: bool) -> (i32, i32) {
    let mut dx = 0;
    let mut dy = 0;
    if up {
        dy -= 1;
    }
    if down {
        dy += 1;
    }
    if left {
        dx -= 1;
    }
    if right {
        dx += 1;
    }
    (dx, dy)
}

/// Move the player by `speed * step`. A move that would leave the arena on
/// either axis is reverted entirely. Facing only changes on net movement.
pub fn move_player(player: &mut Player, step: (i32, i32)) {
    let delta = Vec2::new(step.0 as f32, step.1 as f32) * player.speed;
    let moved = player.body.translated(delta);
    if in_bounds(&moved) == (true, true) {
        player.body = moved;
    }
    if let Some(facing) = Facing::from_step(step.0, step.1) {
        player.facing = facing;
    }
}

/// Pursuit for every live hostile
pub fn steer_hostiles(entities: &mut [Entity], player_pos: Vec2) {
    for e in entities.iter_mut().filter(|e| e.alive) {
        let EntityKind::Hostile(hostile) = &mut e.kind else {
            continue;
        };
        let last = e.vel.try_normalize().unwrap_or(Vec2::ZERO);
        let dir = direction_or(e.body.center, player_pos, last);
        e.vel = dir * hostile.speed;

        let step = match hostile.variant {
            HostileVariant::Chaser => e.vel,
            HostileVariant::ZigZag => {
                hostile.phase += ZIGZAG_PHASE_STEP;
                let perpendicular = Vec2::new(-e.vel.y, e.vel.x);
                e.vel + perpendicular * hostile.phase.sin() * ZIGZAG_AMPLITUDE
            }
        };
        e.body.center += step;

        if !hostile.entered && arena_contains(e.body.center) {
            hostile.entered = true;
        }
    }
}

/// Nearest live hostile to `from`, over both variants
pub fn nearest_hostile(entities: &[Entity], from: Vec2) -> Option<EntityId> {
    entities
        .iter()
        .filter(|e| e.is_live(Category::Hostile))
        .min_by(|a, b| {
            let da = a.body.center.distance_squared(from);
            let db = b.body.center.distance_squared(from);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.id)
}

/// Build a player beam entity
fn beam_entity(id: EntityId, origin: Vec2, heading: Vec2, power: f32, steering: BeamSteering) -> Entity {
    Entity::new(
        id,
        Aabb::new(origin, BEAM_HALF_EXTENTS * power),
        EntityKind::Beam(Beam {
            power,
            steering,
            heading,
        }),
    )
    .with_vel(heading * BEAM_SPEED)
}

/// Fire the auto-aimed beam: boss-bound during the encounter, otherwise
/// locked on the nearest hostile, otherwise straight along the facing.
pub fn fire_auto_beam(state: &mut GameState) -> EntityId {
    let origin = state.player.center();
    let power = state.player.beam_power;
    let facing = state.player.facing.unit();

    let (heading, steering) = if state.boss.has_appeared() {
        let heading = direction_or(origin, boss_aim_point(state).unwrap_or(BEAM_RALLY_POINT), facing);
        (heading, BeamSteering::BossBound)
    } else {
        match nearest_hostile(&state.entities, origin) {
            Some(target) => {
                let target_pos = state
                    .entity(target)
                    .map(|e| e.body.center)
                    .unwrap_or(origin);
                (
                    direction_or(origin, target_pos, facing),
                    BeamSteering::Homing {
                        target: Some(target),
                    },
                )
            }
            None => (facing, BeamSteering::Homing { target: None }),
        }
    };
    state.spawn(|id| beam_entity(id, origin, heading, power, steering))
}

/// Manual fire: one straight beam, or a fan centred on the facing
pub fn fire_manual(state: &mut GameState, count: usize) {
    let origin = state.player.center();
    let power = state.player.beam_power;
    for heading in fan_headings(state.player.facing.heading(), count) {
        let dir = heading_to_vec(heading);
        state.spawn(|id| beam_entity(id, origin, dir, power, BeamSteering::Straight));
    }
}

/// Where boss-bound beams head: the rally point during the entrance, the
/// boss itself once active, nothing afterwards.
fn boss_aim_point(state: &GameState) -> Option<Vec2> {
    match state.boss.phase {
        BossPhase::Appearing | BossPhase::Warning => Some(BEAM_RALLY_POINT),
        BossPhase::Active => state.boss.boss.as_ref().map(|b| b.body.center),
        _ => None,
    }
}

/// Steer and advance all player beams
pub fn steer_beams(state: &mut GameState) {
    let aim = boss_aim_point(state);
    // Positions of live hostiles, resolved by handle
    let targets: Vec<(EntityId, Vec2)> = state
        .entities
        .iter()
        .filter(|e| e.is_live(Category::Hostile))
        .map(|e| (e.id, e.body.center))
        .collect();

    for e in state.entities.iter_mut().filter(|e| e.alive) {
        let EntityKind::Beam(beam) = &mut e.kind else {
            continue;
        };
        match &mut beam.steering {
            BeamSteering::Straight => {}
            BeamSteering::Homing { target } => {
                let resolved = target.and_then(|id| {
                    targets
                        .iter()
                        .find(|(tid, _)| *tid == id)
                        .map(|&(_, pos)| pos)
                });
                match resolved {
                    Some(pos) => beam.heading = direction_or(e.body.center, pos, beam.heading),
                    // Target gone: keep the last heading, never re-acquire
                    None => *target = None,
                }
            }
            BeamSteering::BossBound => {
                if let Some(point) = aim {
                    if let Some(dir) = direction_to(e.body.center, point) {
                        beam.heading = dir;
                    }
                }
            }
        }
        e.vel = beam.heading * BEAM_SPEED;
        e.body.center += e.vel;
    }
}

/// Straight-line movers: boss beams
pub fn advance_boss_beams(entities: &mut [Entity]) {
    for e in entities
        .iter_mut()
        .filter(|e| e.is_live(Category::BossBeam))
    {
        e.body.center += e.vel;
    }
}

/// Initial velocity for a new companion launched from `origin`
pub fn companion_launch_velocity(kind: CompanionKind, origin: Vec2) -> Vec2 {
    match kind {
        CompanionKind::Reflector => Vec2::ONE * REFLECTOR_SPEED,
        CompanionKind::Patroller => {
            direction_or(origin, PLAYER_START, Vec2::ONE.normalize()) * PATROLLER_SPEED
        }
    }
}

/// Point the velocity back inside on any axis where the box pokes out
pub fn bounce_off_walls(body: &Aabb, vel: &mut Vec2) {
    if body.left() < 0.0 {
        vel.x = vel.x.abs();
    } else if body.right() > ARENA_WIDTH {
        vel.x = -vel.x.abs();
    }
    if body.top() < 0.0 {
        vel.y = vel.y.abs();
    } else if body.bottom() > ARENA_HEIGHT {
        vel.y = -vel.y.abs();
    }
}

/// Point the velocity away from `obstacle` along the dominant separation axis
pub fn bounce_off_box(body: &Aabb, vel: &mut Vec2, obstacle: &Aabb) {
    let delta = body.center - obstacle.center;
    if delta.x.abs() > delta.y.abs() {
        vel.x = vel.x.abs() * delta.x.signum();
    } else {
        let sign = if delta.y == 0.0 { -1.0 } else { delta.y.signum() };
        vel.y = vel.y.abs() * sign;
    }
}

/// Move companions and bounce them off the arena walls
pub fn advance_companions(entities: &mut [Entity]) {
    for e in entities
        .iter_mut()
        .filter(|e| e.is_live(Category::Companion))
    {
        e.body.center += e.vel;
        bounce_off_walls(&e.body, &mut e.vel);
    }
}

/// Count down lifetimes (gravity fields, explosions)
pub fn age_entities(entities: &mut [Entity]) {
    for e in entities.iter_mut().filter(|e| e.alive) {
        e.age();
    }
}

/// Drop projectiles and entered hostiles that have left the arena.
/// A homing beam whose locked target is still alive keeps chasing it
/// outside the arena.
pub fn cull_out_of_bounds(entities: &mut [Entity]) {
    let live_hostiles: Vec<EntityId> = entities
        .iter()
        .filter(|e| e.is_live(Category::Hostile))
        .map(|e| e.id)
        .collect();
    for e in entities.iter_mut().filter(|e| e.alive) {
        let chasing = matches!(
            e.kind,
            EntityKind::Beam(Beam {
                steering: BeamSteering::Homing { target: Some(id) },
                ..
            }) if live_hostiles.contains(&id)
        );
        if !chasing && e.should_cull() {
            e.alive = false;
        }
    }
}
