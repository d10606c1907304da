//! Simulation state and core entity types
//!
//! `SimState` is the single owner of everything the simulation mutates. It is
//! passed by `&mut` into every system and every command.

use std::collections::HashSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combat::PendingStrike;
use super::feedback::{FloatingText, FloatingTexts};
use super::generate::generate_level;
use super::tiles::TileGrid;
use crate::consts::*;
use crate::data::{Biome, GameData, MonsterDef, MonsterRole};
use crate::tuning::Tuning;

/// Entity variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Monster,
    Tree,
    Rock,
    Projectile,
    Portal,
    Chest,
}

impl EntityKind {
    /// Static obstacles that block movement
    pub fn is_obstacle(self) -> bool {
        matches!(self, EntityKind::Tree | EntityKind::Rock | EntityKind::Chest)
    }

    /// Entities that walk around and collide with their feet
    pub fn is_mover(self) -> bool {
        matches!(self, EntityKind::Player | EntityKind::Monster)
    }

    /// Valid targets for the melee swing
    pub fn is_melee_target(self) -> bool {
        matches!(self, EntityKind::Monster | EntityKind::Tree)
    }
}

/// Transient visual state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Ticks left on the hit flash
    pub hit_timer: u32,
    /// Ticks since death
    pub death_timer: u32,
    /// Set once on lethal damage, never cleared
    pub dying: bool,
    /// Horizontal shake amplitude
    pub shake: f32,
    /// Toppling angle in degrees (trees)
    pub rotation: f32,
}

/// Any simulated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Top-left corner of the sprite box, world units
    pub pos: Vec2,
    pub size: f32,
    pub health: u32,
    pub max_health: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub damage: u32,
    #[serde(default)]
    pub speed: f32,
    /// +1 facing right, -1 facing left
    #[serde(default)]
    pub facing: f32,
    /// Attack animation / cooldown ticks
    #[serde(default)]
    pub attack_timer: u32,
    #[serde(default)]
    pub role: Option<MonsterRole>,
    #[serde(default)]
    pub color: Option<String>,
    /// Per-tick displacement (projectiles)
    #[serde(default)]
    pub vel: Vec2,
    #[serde(default)]
    pub created_tick: u64,
    #[serde(default)]
    pub xp_reward: u32,
    #[serde(default)]
    pub anim: Animation,
}

impl Entity {
    fn base(id: u32, kind: EntityKind, pos: Vec2, size: f32, health: u32) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            health,
            max_health: health,
            name: None,
            damage: 0,
            speed: 0.0,
            facing: 1.0,
            attack_timer: 0,
            role: None,
            color: None,
            vel: Vec2::ZERO,
            created_tick: 0,
            xp_reward: 0,
            anim: Animation::default(),
        }
    }

    /// The player character at the level start
    pub fn player(id: u32) -> Self {
        Self {
            health: PLAYER_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            name: Some("Hero".to_string()),
            damage: PLAYER_DAMAGE,
            ..Self::base(id, EntityKind::Player, crate::player_start(), PLAYER_SIZE, 0)
        }
    }

    /// A monster from its definition, health and damage scaled by `variance`
    pub fn monster(id: u32, def: &MonsterDef, pos: Vec2, variance: f32) -> Self {
        let health = ((def.hp as f32 * variance).floor() as u32).max(1);
        let size = if def.role == MonsterRole::Boss {
            BOSS_SIZE
        } else {
            MONSTER_SIZE
        };
        Self {
            name: Some(def.name.clone()),
            damage: (def.damage as f32 * variance).floor() as u32,
            speed: def.speed,
            role: Some(def.role),
            color: Some(def.color.clone()),
            xp_reward: def.xp,
            ..Self::base(id, EntityKind::Monster, pos, size, health)
        }
    }

    /// A tree or rock
    pub fn obstacle(id: u32, kind: EntityKind, pos: Vec2) -> Self {
        Self::base(id, kind, pos, OBSTACLE_SIZE, OBSTACLE_HEALTH)
    }

    /// Exit to the next level
    pub fn portal(id: u32, pos: Vec2, next_level: usize) -> Self {
        Self {
            name: Some(format!("To Level {}", next_level + 1)),
            ..Self::base(id, EntityKind::Portal, pos, PORTAL_SIZE, 9999)
        }
    }

    /// Treasure at the end of the final level
    pub fn chest(id: u32, pos: Vec2) -> Self {
        Self {
            name: Some("Treasure".to_string()),
            ..Self::base(id, EntityKind::Chest, pos, CHEST_SIZE, 100)
        }
    }

    /// A fireball travelling `vel` world units per tick
    pub fn projectile(id: u32, pos: Vec2, vel: Vec2, damage: u32, tick: u64) -> Self {
        Self {
            damage,
            vel,
            created_tick: tick,
            ..Self::base(id, EntityKind::Projectile, pos, PROJECTILE_SIZE, 1)
        }
    }

    #[inline]
    pub fn is_dying(&self) -> bool {
        self.anim.dying
    }

    /// Start the death transition. Returns false if it already happened.
    pub fn mark_dying(&mut self) -> bool {
        if self.anim.dying {
            return false;
        }
        self.anim.dying = true;
        self.anim.death_timer = 0;
        self.anim.rotation = 0.0;
        true
    }

    /// Restore health up to the maximum; the dying never recover
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.anim.dying {
            return 0;
        }
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health.saturating_sub(before)
    }
}

/// Item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon,
    Potion,
    Material,
}

/// One inventory stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub kind: ItemKind,
    pub quantity: u32,
}

impl Item {
    pub fn new(id: &str, name: &str, icon: &str, kind: ItemKind, quantity: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            kind,
            quantity,
        }
    }
}

/// Insertion-ordered stacks, at most one per item id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    /// Starting kit
    pub fn starter() -> Self {
        let mut inventory = Self::default();
        inventory.add(Item::new("pot_hp", "Small Potion", "🧪", ItemKind::Potion, 3));
        inventory.add(Item::new("sword_1", "Wooden Sword", "🗡️", ItemKind::Weapon, 1));
        inventory
    }

    /// Add a stack, merging into an existing record with the same id
    pub fn add(&mut self, item: Item) -> &Item {
        let index = match self.items.iter().position(|i| i.id == item.id) {
            Some(index) => {
                self.items[index].quantity += item.quantity;
                index
            }
            None => {
                self.items.push(item);
                self.items.len() - 1
            }
        };
        &self.items[index]
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn quantity(&self, id: &str) -> u32 {
        self.get(id).map(|i| i.quantity).unwrap_or(0)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One generated level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Index into the level table (already clamped)
    pub index: usize,
    pub name: String,
    pub biome: Biome,
    pub difficulty: u32,
    pub tiles: TileGrid,
    /// Live entities in spawn order
    pub entities: Vec<Entity>,
    pub start: (usize, usize),
    pub end: (usize, usize),
    /// Cells carved by the guaranteed start-to-end corridor
    pub critical_path: HashSet<(usize, usize)>,
}

impl Level {
    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn portal(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.kind == EntityKind::Portal)
    }

    /// Monsters that can still fight
    pub fn living_monsters(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|e| e.kind == EntityKind::Monster && !e.is_dying())
    }
}

/// Monotonic entity id source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Level metadata shown by the renderer
#[derive(Debug, Clone, Serialize)]
pub struct LevelInfo<'a> {
    pub index: usize,
    pub name: &'a str,
    pub biome: Biome,
    pub difficulty: u32,
}

/// Read-only view handed to the renderer each frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub tick: u64,
    pub tiles: &'a TileGrid,
    pub entities: &'a [Entity],
    pub player: &'a Entity,
    pub projectiles: &'a [Entity],
    pub floating_texts: &'a [FloatingText],
    pub camera: Vec2,
    pub level: LevelInfo<'a>,
}

/// Complete simulation state (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Source of every random roll
    pub rng: Pcg32,
    /// Simulation tick counter
    pub tick: u64,
    pub player: Entity,
    pub inventory: Inventory,
    /// Top-left of the visible area, world units
    pub camera: Vec2,
    pub level: Level,
    pub projectiles: Vec<Entity>,
    pub texts: FloatingTexts,
    /// Melee hits waiting to land
    pub pending: Vec<PendingStrike>,
    /// Movement input of the latest tick (aims the fireball)
    pub last_input: Vec2,
    pub ids: EntityIds,
    pub tuning: Tuning,
    pub data: GameData,
}

impl SimState {
    /// Create a new run at level 0 with the built-in tables
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, GameData::default(), Tuning::default())
    }

    /// Create a new run with custom tables
    pub fn with_config(seed: u64, data: GameData, tuning: Tuning) -> Self {
        let data = if data.levels.is_empty() {
            log::warn!("Configuration has no levels, using built-in tables");
            GameData::default()
        } else {
            data
        };

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = EntityIds::default();
        let player = Entity::player(ids.next_id());
        let level = generate_level(0, &data, &mut rng, &mut ids);

        Self {
            seed,
            rng,
            tick: 0,
            player,
            inventory: Inventory::starter(),
            camera: Vec2::ZERO,
            level,
            projectiles: Vec::new(),
            texts: FloatingTexts::default(),
            pending: Vec::new(),
            last_input: Vec2::ZERO,
            ids,
            tuning: tuning.sanitized(),
            data,
        }
    }

    /// Whether the current level is the final one
    pub fn on_last_level(&self) -> bool {
        self.level.index + 1 >= self.data.level_count()
    }

    /// Borrowed view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            tick: self.tick,
            tiles: &self.level.tiles,
            entities: &self.level.entities,
            player: &self.player,
            projectiles: &self.projectiles,
            floating_texts: self.texts.entries(),
            camera: self.camera,
            level: LevelInfo {
                index: self.level.index,
                name: &self.level.name,
                biome: self.level.biome,
                difficulty: self.level.difficulty,
            },
        }
    }

    /// Center the camera on the player, clamped to the world
    pub fn update_camera(&mut self, viewport: Vec2) {
        let world = crate::world_size();
        let target = self.player.pos - viewport / 2.0 + Vec2::splat(TILE_SIZE / 2.0);
        let max = (world - viewport).max(Vec2::ZERO);
        self.camera = target.clamp(Vec2::ZERO, max);
    }
}
