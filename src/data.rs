//! Level and monster configuration tables
//!
//! Read-only input to the level generator. The built-in tables describe the
//! ten-level campaign; alternative tables can be loaded from JSON.

use serde::{Deserialize, Serialize};

/// Monster id used when a level references an unknown monster
pub const DEFAULT_MONSTER: &str = "slime_green";

/// Terrain/palette theme of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Forest,
    Snow,
    Desert,
    Swamp,
    Volcano,
    Dungeon,
}

/// Level layout style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Noise-driven overworld with lakes and mountains
    Open,
    /// Wall-filled, carved by many diggers
    Maze,
    /// Wall-filled, carved by fewer diggers
    Rooms,
}

impl LayoutKind {
    /// Whether the grid starts wall-filled and gets dug out
    pub fn is_carved(self) -> bool {
        matches!(self, LayoutKind::Maze | LayoutKind::Rooms)
    }
}

/// Combat role of a monster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterRole {
    Melee,
    Ranged,
    Boss,
}

/// Base stats for one monster type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterDef {
    pub id: String,
    pub name: String,
    pub role: MonsterRole,
    pub hp: u32,
    pub damage: u32,
    pub speed: f32,
    pub color: String,
    #[serde(default)]
    pub xp: u32,
}

/// One entry of the campaign
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    pub biome: Biome,
    /// Candidate monster ids for regular spawns
    pub monsters: Vec<String>,
    #[serde(default)]
    pub boss: Option<String>,
    /// Target number of regular monsters
    pub density: u32,
    pub layout: LayoutKind,
}

/// Complete configuration: ordered levels plus the monster table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    pub levels: Vec<LevelDef>,
    pub monsters: Vec<MonsterDef>,
}

impl GameData {
    /// Parse a configuration table from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let data: GameData = serde_json::from_str(json)?;
        Ok(data)
    }

    /// Parse from JSON, falling back to the built-in tables on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(data) if !data.levels.is_empty() => data,
            Ok(_) => {
                log::warn!("Configuration has no levels, using built-in tables");
                Self::default()
            }
            Err(e) => {
                log::warn!("Invalid configuration ({e}), using built-in tables");
                Self::default()
            }
        }
    }

    /// Number of levels in the campaign
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Clamp an index into the valid level range
    pub fn clamp_level(&self, index: usize) -> usize {
        index.min(self.levels.len().saturating_sub(1))
    }

    /// Level descriptor for an index (clamped)
    pub fn level(&self, index: usize) -> Option<&LevelDef> {
        self.levels.get(self.clamp_level(index))
    }

    /// Monster definition, falling back to the default monster
    pub fn monster(&self, id: &str) -> Option<&MonsterDef> {
        self.monsters
            .iter()
            .find(|m| m.id == id)
            .or_else(|| {
                log::debug!("Unknown monster '{id}', using {DEFAULT_MONSTER}");
                self.monsters.iter().find(|m| m.id == DEFAULT_MONSTER)
            })
            .or_else(|| self.monsters.first())
    }
}

#[allow(clippy::too_many_arguments)]
fn monster(
    id: &str,
    name: &str,
    role: MonsterRole,
    hp: u32,
    damage: u32,
    speed: f32,
    color: &str,
    xp: u32,
) -> MonsterDef {
    MonsterDef {
        id: id.to_string(),
        name: name.to_string(),
        role,
        hp,
        damage,
        speed,
        color: color.to_string(),
        xp,
    }
}

fn level(
    name: &str,
    biome: Biome,
    monsters: &[&str],
    boss: Option<&str>,
    density: u32,
    layout: LayoutKind,
) -> LevelDef {
    LevelDef {
        name: name.to_string(),
        biome,
        monsters: monsters.iter().map(|m| m.to_string()).collect(),
        boss: boss.map(str::to_string),
        density,
        layout,
    }
}

impl Default for GameData {
    fn default() -> Self {
        use MonsterRole::{Boss, Melee, Ranged};

        let monsters = vec![
            // Forest
            monster("slime_green", "Slime", Melee, 40, 8, 1.0, "#7CBA58", 10),
            monster("rat", "Forest Rat", Melee, 30, 12, 2.5, "#795548", 15),
            // Swamp
            monster("slime_mud", "Mud Slime", Melee, 60, 10, 0.8, "#5D4037", 20),
            monster("goblin_scout", "Goblin Scout", Melee, 50, 15, 1.8, "#33691E", 25),
            // Ruins
            monster("skeleton", "Skeleton", Melee, 80, 20, 1.2, "#E0E0E0", 35),
            monster("bat_vampire", "Vampire Bat", Melee, 40, 18, 3.0, "#212121", 30),
            // Desert
            monster("scorpion", "Sand Scorpion", Melee, 100, 25, 1.5, "#EF6C00", 50),
            monster("sand_worm_boss", "Death Worm (BOSS)", Boss, 1200, 45, 0.8, "#FFB74D", 500),
            // Snow
            monster("yeti", "Yeti", Melee, 200, 30, 0.8, "#E3F2FD", 80),
            monster("ice_spirit", "Ice Spirit", Ranged, 60, 25, 2.0, "#00BCD4", 60),
            // Volcano
            monster("fire_elemental", "Fire Fiend", Ranged, 150, 40, 1.5, "#FF5722", 100),
            monster("magma_golem", "Magma Golem", Melee, 300, 60, 0.5, "#BF360C", 150),
            // Dungeon
            monster("shadow_knight", "Shadow Knight", Melee, 400, 50, 1.8, "#212121", 200),
            monster("demon_lord_boss", "Demon Lord (BOSS)", Boss, 3000, 80, 1.2, "#D50000", 1000),
        ];

        let levels = vec![
            level("Forest Gate", Biome::Forest, &["slime_green", "rat"], None, 8, LayoutKind::Open),
            level("Misty Marsh", Biome::Swamp, &["slime_mud", "rat"], None, 12, LayoutKind::Open),
            level(
                "Ancient Ruins",
                Biome::Forest,
                &["skeleton", "bat_vampire", "goblin_scout"],
                None,
                15,
                LayoutKind::Maze,
            ),
            level("Parched Desert", Biome::Desert, &["scorpion", "skeleton"], None, 18, LayoutKind::Open),
            level(
                "Sand Worm Lair",
                Biome::Desert,
                &["scorpion"],
                Some("sand_worm_boss"),
                5,
                LayoutKind::Rooms,
            ),
            level("Snowy Peak", Biome::Snow, &["yeti", "ice_spirit"], None, 15, LayoutKind::Open),
            level(
                "Ice Cavern",
                Biome::Snow,
                &["yeti", "bat_vampire", "skeleton"],
                None,
                20,
                LayoutKind::Maze,
            ),
            level(
                "Volcano Core",
                Biome::Volcano,
                &["fire_elemental", "magma_golem"],
                None,
                18,
                LayoutKind::Rooms,
            ),
            level(
                "Shadow Dungeon",
                Biome::Dungeon,
                &["shadow_knight", "skeleton", "bat_vampire"],
                None,
                25,
                LayoutKind::Maze,
            ),
            level(
                "Demon Lord's Throne",
                Biome::Dungeon,
                &["shadow_knight", "magma_golem"],
                Some("demon_lord_boss"),
                8,
                LayoutKind::Rooms,
            ),
        ];

        Self { levels, monsters }
    }
}
