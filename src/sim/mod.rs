//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod feedback;
pub mod generate;
pub mod monster;
pub mod movement;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod tiles;

pub use collision::{Aabb, collides, hitbox};
pub use combat::{HitOutcome, PendingStrike, apply_damage, attack, fireball, heal};
pub use feedback::{FloatingText, FloatingTexts};
pub use generate::{Palette, generate_level};
pub use state::{
    Animation, Entity, EntityIds, EntityKind, Inventory, Item, ItemKind, Level, LevelInfo,
    SimState, Snapshot,
};
pub use tick::{HudSample, TickInput, advance_level, tick};
pub use tiles::{TileGrid, TileKind};
