//! Power-up effects and the skill-selection gate
//!
//! Crossing each `SKILL_SCORE_STEP` multiple through a beam kill raises a
//! hard pause. While it is pending nothing else in the tick runs; picking
//! one of the two skills adds a companion and lifts the pause.

use super::entity::{Companion, CompanionKind, Entity, EntityId, EntityKind, PowerUpKind};
use super::geometry::Aabb;
use super::movement::companion_launch_velocity;
use super::state::{GameState, SimEvent, SkillChoice};
use crate::consts::*;

/// Raise the skill pause if the score reached a new threshold level
pub fn check_skill_threshold(state: &mut GameState) {
    let level = state.score / SKILL_SCORE_STEP;
    if level > state.player.skill_level {
        state.player.skill_level = level;
        state.player.awaiting_skill_choice = true;
        log::info!("Skill selection offered at score {}", state.score);
        state.push_event(SimEvent::SkillOffered { level });
    }
}

/// Resolve a pending skill pause. Returns the new companion's id, or `None`
/// when no pause was pending.
pub fn choose_skill(state: &mut GameState, choice: SkillChoice) -> Option<EntityId> {
    if !state.player.awaiting_skill_choice {
        return None;
    }
    let kind = choice.companion();
    let origin = state.player.center();
    let vel = companion_launch_velocity(kind, origin);
    let half = match kind {
        CompanionKind::Reflector => REFLECTOR_HALF_EXTENTS,
        CompanionKind::Patroller => PATROLLER_HALF_EXTENTS,
    };
    let id = state.spawn(|id| {
        Entity::new(
            id,
            Aabb::new(origin, half),
            EntityKind::Companion(Companion::new(kind)),
        )
        .with_vel(vel)
    });
    state.player.awaiting_skill_choice = false;
    log::info!("Skill chosen: {:?}", choice);
    state.push_event(SimEvent::SkillChosen { choice });
    Some(id)
}

/// Apply a collected power-up to the player
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Stat => {
            state.add_score(SCORE_POWER_UP);
            let player = &mut state.player;
            player.beam_power += BEAM_POWER_STEP;
            if player.speed < PLAYER_SPEED_CAP {
                player.speed = (player.speed * PLAYER_SPEED_GROWTH).min(PLAYER_SPEED_CAP);
            }
            player.stat_pickups += 1;
            if player.stat_pickups % 2 == 0 {
                player.autofire_interval = player
                    .autofire_interval
                    .saturating_sub(1)
                    .max(AUTOFIRE_MIN_INTERVAL);
            }
        }
        PowerUpKind::GravityCharge => {
            let arena = Aabb::new(ARENA_CENTER, ARENA_CENTER);
            state.spawn(|id| {
                Entity::new(id, arena, EntityKind::GravityField).with_life(GRAVITY_LIFETIME)
            });
            super::boss::damage(state, GRAVITY_PICKUP_BOSS_DAMAGE);
        }
    }
    state.push_event(SimEvent::PowerUpCollected { kind });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Category;

    #[test]
    fn test_threshold_offers_once_per_multiple() {
        let mut state = GameState::new(1);
        state.score = 140;
        check_skill_threshold(&mut state);
        assert!(!state.player.awaiting_skill_choice);

        state.score = 150;
        check_skill_threshold(&mut state);
        assert!(state.player.awaiting_skill_choice);
        choose_skill(&mut state, SkillChoice::Reflector);

        state.score = 160;
        check_skill_threshold(&mut state);
        assert!(!state.player.awaiting_skill_choice);

        state.score = 300;
        check_skill_threshold(&mut state);
        assert!(state.player.awaiting_skill_choice);
    }

    #[test]
    fn test_choice_without_pause_does_nothing() {
        let mut state = GameState::new(1);
        assert_eq!(choose_skill(&mut state, SkillChoice::Patroller), None);
        assert_eq!(state.count(|e| e.category() == Category::Companion), 0);
    }

    #[test]
    fn test_choices_accumulate() {
        let mut state = GameState::new(1);
        for choice in [SkillChoice::Reflector, SkillChoice::Patroller, SkillChoice::Reflector] {
            state.player.awaiting_skill_choice = true;
            assert!(choose_skill(&mut state, choice).is_some());
        }
        assert_eq!(state.count(|e| e.category() == Category::Companion), 3);
        assert!(!state.player.awaiting_skill_choice);
    }

    #[test]
    fn test_two_stat_pickups() {
        let mut state = GameState::new(1);
        apply_power_up(&mut state, PowerUpKind::Stat);
        assert!((state.player.beam_power - (BEAM_BASE_POWER + BEAM_POWER_STEP)).abs() < 1e-6);
        assert_eq!(state.player.autofire_interval, AUTOFIRE_BASE_INTERVAL);

        apply_power_up(&mut state, PowerUpKind::Stat);
        assert!((state.player.beam_power - (BEAM_BASE_POWER + 2.0 * BEAM_POWER_STEP)).abs() < 1e-6);
        assert_eq!(state.player.autofire_interval, AUTOFIRE_BASE_INTERVAL - 1);
        assert_eq!(state.score, 2 * SCORE_POWER_UP);
    }

    #[test]
    fn test_speed_and_fire_rate_are_capped() {
        let mut state = GameState::new(1);
        for _ in 0..200 {
            apply_power_up(&mut state, PowerUpKind::Stat);
        }
        assert_eq!(state.player.speed, PLAYER_SPEED_CAP);
        assert_eq!(state.player.autofire_interval, AUTOFIRE_MIN_INTERVAL);
    }

    #[test]
    fn test_gravity_charge_spawns_field() {
        let mut state = GameState::new(1);
        apply_power_up(&mut state, PowerUpKind::GravityCharge);
        let field = state
            .entities
            .iter()
            .find(|e| e.category() == Category::GravityField)
            .unwrap();
        assert_eq!(field.life, Some(GRAVITY_LIFETIME));
        assert_eq!(state.score, 0);
    }
}
