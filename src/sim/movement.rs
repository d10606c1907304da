//! Player movement against terrain and obstacles
//!
//! Axes are resolved independently (X first, then Y) so the player slides
//! along walls instead of sticking to them.

use glam::Vec2;

use super::collision::{Aabb, collides, hitbox};
use super::state::{Entity, Level, SimState};
use super::tiles::TileKind;
use crate::world_size;

/// Whether `player` may stand at `pos`
fn can_stand(player: &Entity, pos: Vec2, level: &Level, within: impl Fn(&Aabb) -> bool) -> bool {
    let body = hitbox(pos, player.size, player.kind);
    if !within(&body) {
        return false;
    }
    if collides(pos, player.size, &level.entities) {
        return false;
    }
    let feet = pos + Vec2::new(player.size / 2.0, player.size);
    level.tiles.tile_at_world(feet).is_some_and(TileKind::is_walkable)
}

/// Move the player one tick along `input` (each axis clamped to [-1, 1])
pub fn move_player(state: &mut SimState, input: Vec2) {
    let input = input.clamp(Vec2::NEG_ONE, Vec2::ONE);
    let speed = state.tuning.player_speed;
    let bounds = world_size();
    let player = &mut state.player;
    let level = &state.level;

    if input.x != 0.0 {
        player.facing = input.x.signum();
    }
    player.attack_timer = player.attack_timer.saturating_sub(1);

    if input.x != 0.0 {
        let next = player.pos + Vec2::new(input.x * speed, 0.0);
        if can_stand(player, next, level, |b| b.within_x(bounds)) {
            player.pos = next;
        }
    }
    if input.y != 0.0 {
        let next = player.pos + Vec2::new(0.0, input.y * speed);
        if can_stand(player, next, level, |b| b.within_y(bounds)) {
            player.pos = next;
        }
    }
}
