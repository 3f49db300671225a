//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically.

use super::collision::detect;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap requested since the last tick (click/tap/key)
    pub flap: bool,
    /// Demo mode - the game flaps for the player
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
///
/// Order: impulse, integrate, advance, spawn, prune (score), collide.
/// Does nothing unless the session is playing.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    let flap = input.flap || (input.autopilot && autopilot_wants_flap(state));
    if flap {
        state.character.apply_impulse(state.layout.lift);
        state.push_event(GameEvent::Flapped);
    }

    let layout = state.layout;
    state.character.integrate(layout.gravity);

    state.obstacles.advance(layout.scroll_speed);
    if let Some(spawned) = state.obstacles.spawn_if_needed(&layout, &mut state.rng) {
        log::trace!("Spawned obstacle with gap at {:.1}", spawned.gap_start);
    }

    let awarded = state.obstacles.prune(state.character.x, layout.obstacle_width);
    state.award(awarded);

    if let Some(collision) = detect(&state.character, state.obstacles.as_slice(), &layout) {
        log::debug!("Collision: {:?}", collision);
        state.end_run();
    }
}

/// Flap when the character sinks into the bottom tenth of the next gap
fn autopilot_wants_flap(state: &GameState) -> bool {
    let layout = &state.layout;
    let c = &state.character;

    let target = state
        .obstacles
        .iter()
        .find(|o| o.x + layout.obstacle_width >= c.x)
        .map(|o| o.gap_start + o.gap_height * 0.9)
        .unwrap_or(layout.height * 0.5);

    // Only flap while falling so flaps don't stack into a ceiling hit
    c.velocity >= 0.0 && c.y + c.size > target
}
