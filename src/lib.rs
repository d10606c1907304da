//! Emberfall - simulation core of a top-down action RPG
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, movement, combat, AI)
//! - `data`: Level and monster configuration tables
//! - `tuning`: Data-driven game balance

pub mod data;
pub mod sim;
pub mod tuning;

pub use data::{GameData, LayoutKind, LevelDef, MonsterDef};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Size of one tile in world units
    pub const TILE_SIZE: f32 = 32.0;
    /// Grid dimensions (tiles)
    pub const MAP_WIDTH: usize = 50;
    pub const MAP_HEIGHT: usize = 50;

    /// Start and end cells of every level
    pub const START_CELL: (usize, usize) = (4, MAP_HEIGHT / 2);
    pub const END_CELL: (usize, usize) = (MAP_WIDTH - 5, MAP_HEIGHT / 2);

    /// Ticks a dying entity stays on screen before being purged
    pub const DEATH_DECAY_TICKS: u32 = 60;
    /// Hit-reaction flash duration
    pub const HIT_REACTION_TICKS: u32 = 10;
    /// Initial shake amplitude when struck
    pub const HIT_SHAKE: f32 = 5.0;
    /// Multiplicative shake decay per tick
    pub const SHAKE_DECAY: f32 = 0.8;
    /// Degrees a dying tree topples per tick
    pub const TREE_TOPPLE_PER_TICK: f32 = 2.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 24.0;
    pub const PLAYER_HEALTH: u32 = 450;
    pub const PLAYER_MAX_HEALTH: u32 = 600;
    pub const PLAYER_DAMAGE: u32 = 35;

    /// Entity sizes
    pub const MONSTER_SIZE: f32 = 32.0;
    pub const BOSS_SIZE: f32 = 64.0;
    pub const OBSTACLE_SIZE: f32 = 32.0;
    pub const OBSTACLE_HEALTH: u32 = 50;
    pub const PORTAL_SIZE: f32 = 40.0;
    pub const CHEST_SIZE: f32 = 32.0;
    pub const PROJECTILE_SIZE: f32 = 10.0;

    /// Default floating text lifetime
    pub const TEXT_LIFE: u32 = 60;
    /// Upward drift of floating text per tick
    pub const TEXT_DRIFT: f32 = 0.5;
}

/// World width and height in world units
#[inline]
pub fn world_size() -> Vec2 {
    Vec2::new(
        consts::MAP_WIDTH as f32 * consts::TILE_SIZE,
        consts::MAP_HEIGHT as f32 * consts::TILE_SIZE,
    )
}

/// Top-left world position of a grid cell
#[inline]
pub fn cell_to_world(x: usize, y: usize) -> Vec2 {
    Vec2::new(x as f32 * consts::TILE_SIZE, y as f32 * consts::TILE_SIZE)
}

/// Grid cell containing a world position (None when off the grid)
#[inline]
pub fn world_to_cell(pos: Vec2) -> Option<(usize, usize)> {
    let cx = (pos.x / consts::TILE_SIZE).floor();
    let cy = (pos.y / consts::TILE_SIZE).floor();
    if cx < 0.0 || cy < 0.0 {
        return None;
    }
    let (cx, cy) = (cx as usize, cy as usize);
    (cx < consts::MAP_WIDTH && cy < consts::MAP_HEIGHT).then_some((cx, cy))
}

/// Where the player stands at the start of every level
#[inline]
pub fn player_start() -> Vec2 {
    cell_to_world(consts::START_CELL.0, consts::START_CELL.1)
}
