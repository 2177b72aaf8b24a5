//! Beam Survivor headless driver
//!
//! Runs one session at the fixed tick rate without a window and prints the
//! final frame view as JSON. Usage: `beam-survivor [settings.json]`

use std::time::{SystemTime, UNIX_EPOCH};

use beam_survivor::sim::{SessionOutcome, TickInput};
use beam_survivor::{Session, Settings};

fn main() {
    env_logger::init();
    log::info!("Beam Survivor (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    let mut session = Session::new(seed).with_max_substeps(settings.max_substeps);
    let mut input = TickInput {
        autopilot: settings.autopilot,
        ..Default::default()
    };

    let mut snapshot = session.snapshot();
    while session.outcome() == SessionOutcome::Continuing && snapshot.tick < settings.max_ticks {
        // Headless: one tick per frame, the menu answered with the preferred skill
        input.skill_choice = session
            .state()
            .player
            .awaiting_skill_choice
            .then_some(settings.preferred_skill);
        snapshot = session.advance(&input, 1);

        for event in session.drain_events() {
            log::debug!("{:?}", event);
        }
        if settings.snapshot_every > 0 && snapshot.tick % settings.snapshot_every == 0 {
            log::info!(
                "t={} score={} items={} boss={:?}",
                snapshot.tick,
                snapshot.score,
                snapshot.items.len(),
                snapshot.boss_health
            );
        }
    }

    if session.outcome() == SessionOutcome::Continuing {
        log::info!("Tick limit {} reached", settings.max_ticks);
        snapshot = session.advance(
            &TickInput {
                quit: true,
                ..Default::default()
            },
            1,
        );
    }

    log::info!(
        "Session ended: {:?} after {} ticks, score {}",
        snapshot.outcome,
        snapshot.tick,
        snapshot.score
    );

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize final snapshot: {e}"),
    }
}
