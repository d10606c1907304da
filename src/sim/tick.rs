//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. Given the
//! same seed and the same sequence of inputs and commands, two runs produce
//! identical states.

use glam::Vec2;
use serde::Serialize;

use super::combat::resolve_pending;
use super::feedback::LEVEL_COLOR;
use super::generate::generate_level;
use super::monster::update_monsters;
use super::movement::move_player;
use super::projectile::update_projectiles;
use super::state::SimState;

/// Lifetime of the level banner text
const LEVEL_BANNER_TICKS: u32 = 120;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Movement direction, each axis in [-1, 1]
    pub movement: Vec2,
    /// Visible area; the camera follows the player when set
    pub viewport: Option<Vec2>,
}

/// Player stats reported to the HUD at a fixed cadence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSample {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    /// 1-based level number
    pub level: usize,
    pub tick: u64,
}

/// Advance the game state by one fixed timestep
///
/// Returns a HUD sample every `hud_interval_ticks` ticks.
pub fn tick(state: &mut SimState, input: &TickInput) -> Option<HudSample> {
    state.tick += 1;
    state.last_input = input.movement;

    // Melee swings queued earlier land before anything moves
    resolve_pending(state);

    move_player(state, input.movement);
    update_monsters(state);
    update_projectiles(state);
    state.texts.decay();

    check_portal(state);

    // After the portal check so a transition frames the new start position
    if let Some(viewport) = input.viewport {
        state.update_camera(viewport);
    }

    (state.tick % state.tuning.hud_interval_ticks.max(1) == 0).then(|| HudSample {
        name: state.player.name.clone().unwrap_or_default(),
        health: state.player.health,
        max_health: state.player.max_health,
        level: state.level.index + 1,
        tick: state.tick,
    })
}

/// Take the portal when the player stands on it. Returns true on a transition.
pub fn check_portal(state: &mut SimState) -> bool {
    let Some(portal) = state.level.portal() else {
        return false;
    };
    if portal.pos.distance(state.player.pos) >= state.tuning.portal_radius {
        return false;
    }
    advance_level(state);
    true
}

/// Replace the current level with the next one
pub fn advance_level(state: &mut SimState) {
    let next = state.data.clamp_level(state.level.index + 1);
    state.texts.push_with_life(
        format!("LEVEL {}", next + 1),
        state.player.pos,
        LEVEL_COLOR,
        LEVEL_BANNER_TICKS,
    );

    state.level = generate_level(next, &state.data, &mut state.rng, &mut state.ids);
    state.projectiles.clear();
    state.pending.clear();
    state.player.pos = crate::player_start();

    log::info!(
        "Entered level {} '{}' at tick {}",
        state.level.index + 1,
        state.level.name,
        state.tick
    );
}
