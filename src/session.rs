//! Session controller
//!
//! Owns the `GameState` for one run and turns frame-clock ticks plus an
//! input snapshot into simulation steps.

use crate::consts::MAX_SUBSTEPS;
use crate::sim::{GameState, RenderableState, SessionOutcome, SimEvent, TickInput, build_snapshot, tick};

pub struct Session {
    state: GameState,
    max_substeps: u32,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        log::info!("Session started with seed: {}", seed);
        Self {
            state: GameState::new(seed),
            max_substeps: MAX_SUBSTEPS,
        }
    }

    /// Cap on ticks simulated per `advance` call (at least 1)
    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps.max(1);
        self
    }

    /// Wrap an existing state (scenario setups)
    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    /// Run up to `elapsed_ticks` simulation steps and return the frame view.
    ///
    /// Held keys apply to every step; key-down events (fire, skill choice,
    /// quit) are consumed by the first step only. Elapsed time beyond
    /// `max_substeps` is dropped.
    pub fn advance(&mut self, input: &TickInput, elapsed_ticks: u32) -> RenderableState {
        let steps = elapsed_ticks.min(self.max_substeps);
        if elapsed_ticks > steps {
            log::debug!("Dropping {} ticks of backlog", elapsed_ticks - steps);
        }

        let held = input.held_only();
        for i in 0..steps {
            if self.state.outcome != SessionOutcome::Continuing {
                break;
            }
            tick(&mut self.state, if i == 0 { input } else { &held });
        }

        build_snapshot(&self.state)
    }

    pub fn outcome(&self) -> SessionOutcome {
        self.state.outcome
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn snapshot(&self) -> RenderableState {
        build_snapshot(&self.state)
    }

    /// Events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.state.drain_events()
    }
}
