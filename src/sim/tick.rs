//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::boss;
use super::collision::{prune_contacts, resolve_collisions};
use super::entity::Category;
use super::geometry::in_bounds;
use super::movement::{
    advance_boss_beams, advance_companions, age_entities, cull_out_of_bounds, fire_auto_beam,
    fire_manual, key_step, move_player, steer_beams, steer_hostiles,
};
use super::skills::choose_skill;
use super::spawn::spawn_step;
use super::state::{GameState, SessionOutcome, SkillChoice};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Key-down: one straight beam along the facing
    pub fire: bool,
    /// Key-down: a fan of beams centred on the facing
    pub fire_fan: bool,
    /// Key-down: one of the two skill-menu options
    pub skill_choice: Option<SkillChoice>,
    /// End the session immediately
    pub quit: bool,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

impl TickInput {
    /// Copy with the discrete key-down events cleared (held keys kept)
    pub fn held_only(&self) -> Self {
        Self {
            fire: false,
            fire_fan: false,
            skill_choice: None,
            quit: false,
            ..self.clone()
        }
    }
}

/// Distance under which the autopilot flees a threat
const AUTOPILOT_THREAT_RADIUS: f32 = 260.0;
/// Dead zone for autopilot steering toward a target
const AUTOPILOT_DEAD_ZONE: f32 = 6.0;

fn axis(delta: f32) -> i32 {
    if delta > AUTOPILOT_DEAD_ZONE {
        1
    } else if delta < -AUTOPILOT_DEAD_ZONE {
        -1
    } else {
        0
    }
}

/// Autopilot: flee the nearest hostile or boss beam when it is close,
/// otherwise walk toward the nearest power-up. Picks the default skill
/// when the menu is up and no choice was given.
fn autopilot(state: &GameState, input: &mut TickInput) {
    if state.player.awaiting_skill_choice {
        if input.skill_choice.is_none() {
            input.skill_choice = Some(SkillChoice::default());
        }
        return;
    }

    let pos = state.player.center();
    let nearest = |category: Category| {
        state
            .entities
            .iter()
            .filter(|e| e.is_live(category))
            .map(|e| e.body.center)
            .min_by(|a, b| {
                a.distance_squared(pos)
                    .partial_cmp(&b.distance_squared(pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    };

    let threat = [nearest(Category::Hostile), nearest(Category::BossBeam)]
        .into_iter()
        .flatten()
        .filter(|p| p.distance(pos) < AUTOPILOT_THREAT_RADIUS)
        .min_by(|a, b| {
            a.distance_squared(pos)
                .partial_cmp(&b.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let (dx, dy) = if let Some(threat) = threat {
        let away = pos - threat;
        // Head back toward the middle when cornered against a wall
        let away = if away == Vec2::ZERO { ARENA_CENTER - pos } else { away };
        let mut step = (axis(away.x), axis(away.y));
        let probe = state
            .player
            .body
            .translated(Vec2::new(step.0 as f32, step.1 as f32) * state.player.speed);
        if in_bounds(&probe) != (true, true) {
            let to_center = ARENA_CENTER - pos;
            step = (axis(to_center.x), axis(to_center.y));
        }
        step
    } else if let Some(item) = nearest(Category::PowerUp) {
        let to = item - pos;
        (axis(to.x), axis(to.y))
    } else {
        (0, 0)
    };

    input.up = dy < 0;
    input.down = dy > 0;
    input.left = dx < 0;
    input.right = dx > 0;
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.outcome != SessionOutcome::Continuing {
        return;
    }

    if input.quit {
        log::info!(
            "Session quit at tick {} with score {}",
            state.time_ticks,
            state.score
        );
        state.outcome = SessionOutcome::Quit;
        state.entities.clear();
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }
    let input = &input;

    // Skill menu is a hard pause
    if state.player.awaiting_skill_choice {
        match input.skill_choice {
            Some(choice) => {
                choose_skill(state, choice);
            }
            None => return,
        }
    }

    state.time_ticks += 1;
    state.player.update_mood();

    spawn_step(state);

    // Auto-fire on its interval, then any manual shots
    state.player.autofire_timer += 1;
    if state.player.autofire_timer >= state.player.autofire_interval {
        state.player.autofire_timer = 0;
        fire_auto_beam(state);
    }
    if input.fire_fan {
        fire_manual(state, MANUAL_FAN_COUNT);
    } else if input.fire {
        fire_manual(state, 1);
    }

    let step = key_step(input.up, input.down, input.left, input.right);
    move_player(&mut state.player, step);
    let player_pos = state.player.center();
    steer_hostiles(&mut state.entities, player_pos);
    steer_beams(state);
    advance_boss_beams(&mut state.entities);
    advance_companions(&mut state.entities);
    age_entities(&mut state.entities);
    boss::update(state);
    cull_out_of_bounds(&mut state.entities);
    state.sweep_dead();

    resolve_collisions(state);
    prune_contacts(state);
    state.sweep_dead();

    boss::check_threshold(state);

    state.normalize_order();
}
