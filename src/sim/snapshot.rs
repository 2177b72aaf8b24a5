//! Read-only view of the simulation for the renderer
//!
//! The renderer only ever sees visual identifiers and positions; mapping a
//! `Visual` to an image is the asset loader's job.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{BeamSteering, CompanionKind, Entity, EntityId, EntityKind, HostileVariant, PowerUpKind};
use super::state::{BossPhase, Facing, GameState, Mood, SessionOutcome};
use crate::vec_to_heading;

/// Opaque visual identifier for the asset collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    /// Oriented player sprite, one per compass direction
    Player(Facing),
    PlayerHappy,
    PlayerSad,
    Chaser,
    ZigZag,
    Beam,
    HomingBeam,
    BossBeam,
    GravityField,
    Reflector,
    Patroller,
    StatPowerUp,
    GravityCharge,
    /// Two alternating explosion frames
    Explosion { frame: u8 },
    Boss,
}

/// One drawable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub id: EntityId,
    pub visual: Visual,
    pub pos: Vec2,
    pub half_extents: Vec2,
    /// Orientation in degrees (counter-clockwise from east)
    pub rotation: f32,
    pub scale: f32,
}

/// Full-screen text overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Banner {
    /// Blinking boss warning
    Warning,
    /// Shown after the boss falls
    Victory,
    /// Two-option skill menu
    SkillMenu,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableState {
    pub tick: u64,
    pub score: u64,
    pub boss_health: Option<u32>,
    pub boss_phase: BossPhase,
    pub banner: Option<Banner>,
    pub outcome: SessionOutcome,
    pub items: Vec<RenderItem>,
}

impl RenderableState {
    /// Items with the given visual
    pub fn count(&self, visual: Visual) -> usize {
        self.items.iter().filter(|i| i.visual == visual).count()
    }
}

fn entity_item(e: &Entity) -> RenderItem {
    let (visual, rotation, scale) = match &e.kind {
        EntityKind::Hostile(h) => match h.variant {
            HostileVariant::Chaser => (Visual::Chaser, 0.0, 1.0),
            HostileVariant::ZigZag => (Visual::ZigZag, 0.0, 1.0),
        },
        EntityKind::Beam(beam) => {
            let visual = match beam.steering {
                BeamSteering::Straight | BeamSteering::Homing { target: None } => Visual::Beam,
                BeamSteering::Homing { target: Some(_) } | BeamSteering::BossBound => {
                    Visual::HomingBeam
                }
            };
            (visual, vec_to_heading(beam.heading), beam.power)
        }
        EntityKind::BossBeam => (Visual::BossBeam, vec_to_heading(e.vel), 1.0),
        EntityKind::GravityField => (Visual::GravityField, 0.0, 1.0),
        EntityKind::Companion(c) => match c.kind {
            CompanionKind::Reflector => (Visual::Reflector, 0.0, 1.0),
            CompanionKind::Patroller => (Visual::Patroller, 0.0, 1.0),
        },
        EntityKind::PowerUp(PowerUpKind::Stat) => (Visual::StatPowerUp, 0.0, 1.0),
        EntityKind::PowerUp(PowerUpKind::GravityCharge) => (Visual::GravityCharge, 0.0, 1.0),
        EntityKind::Explosion => {
            let life = e.life.unwrap_or(0).max(0);
            (Visual::Explosion { frame: ((life / 10) % 2) as u8 }, 0.0, 1.0)
        }
    };
    RenderItem {
        id: e.id,
        visual,
        pos: e.body.center,
        half_extents: e.body.half_extents,
        rotation,
        scale,
    }
}

/// Build the frame view of `state`
pub fn build_snapshot(state: &GameState) -> RenderableState {
    let mut items = Vec::with_capacity(state.entities.len() + 2);

    let player = &state.player;
    let player_visual = match player.mood {
        Mood::Sad => Visual::PlayerSad,
        Mood::Happy { .. } => Visual::PlayerHappy,
        Mood::Normal => Visual::Player(player.facing),
    };
    items.push(RenderItem {
        id: player.id,
        visual: player_visual,
        pos: player.body.center,
        half_extents: player.body.half_extents,
        rotation: 0.0,
        scale: 1.0,
    });

    // The boss is drawn only once its warning is over and until it falls
    if let (BossPhase::Active, Some(boss)) = (state.boss.phase, &state.boss.boss) {
        items.push(RenderItem {
            id: boss.id,
            visual: Visual::Boss,
            pos: boss.body.center,
            half_extents: boss.body.half_extents,
            rotation: 0.0,
            scale: 1.0,
        });
    }

    items.extend(state.entities.iter().filter(|e| e.alive).map(entity_item));

    let banner = if player.awaiting_skill_choice {
        Some(Banner::SkillMenu)
    } else if state.boss.victory_banner_visible() {
        Some(Banner::Victory)
    } else if state.boss.warning_banner_visible() {
        Some(Banner::Warning)
    } else {
        None
    };

    RenderableState {
        tick: state.time_ticks,
        score: state.score,
        boss_health: state.boss.health(),
        boss_phase: state.boss.phase,
        banner,
        outcome: state.outcome,
        items,
    }
}
