//! Procedural level generation
//!
//! Builds a complete level from a level index: terrain, a guaranteed
//! start-to-end corridor, obstacles, monsters and the exit marker. All
//! randomness comes from the caller's RNG so a seed reproduces a level.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{Entity, EntityIds, EntityKind, Level};
use super::tiles::{TileGrid, TileKind};
use crate::cell_to_world;
use crate::consts::{END_CELL, MAP_HEIGHT, MAP_WIDTH, START_CELL};
use crate::data::{Biome, GameData, LayoutKind, LevelDef};

/// Steps each digger takes in carved layouts
const DIGGER_STEPS: u32 = 700;
/// Chance per step that the critical path wanders sideways
const DETOUR_CHANCE: f64 = 0.1;
/// Obstacles keep this many cells (Chebyshev) away from start and end
const OBSTACLE_CLEARANCE: usize = 5;
/// Monsters keep this many columns away from the start column
const MONSTER_CLEARANCE: usize = 8;
/// Resamples before a monster settles for its last cell
const SPAWN_ATTEMPTS: u32 = 20;
/// Regular monsters accompanying a boss
const BOSS_ESCORTS: u32 = 5;

/// Tile and obstacle choices for a biome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub floor: TileKind,
    pub wall: TileKind,
    pub liquid: TileKind,
    pub obstacle: EntityKind,
}

impl Palette {
    pub fn for_biome(biome: Biome) -> Self {
        let (floor, liquid, obstacle) = match biome {
            Biome::Forest => (TileKind::Grass, TileKind::Water, EntityKind::Tree),
            Biome::Swamp => (TileKind::Swamp, TileKind::Swamp, EntityKind::Tree),
            Biome::Desert => (TileKind::Sand, TileKind::Water, EntityKind::Rock),
            Biome::Snow => (TileKind::Snow, TileKind::Ice, EntityKind::Tree),
            Biome::Volcano => (TileKind::Dirt, TileKind::Lava, EntityKind::Rock),
            Biome::Dungeon => (TileKind::DungeonFloor, TileKind::Lava, EntityKind::Rock),
        };
        Self {
            floor,
            wall: TileKind::Wall,
            liquid,
            obstacle,
        }
    }
}

/// Generate the level at `index` (clamped into the table)
pub fn generate_level<R: Rng + ?Sized>(
    index: usize,
    data: &GameData,
    rng: &mut R,
    ids: &mut EntityIds,
) -> Level {
    let Some(def) = data.level(index) else {
        log::warn!("No levels configured, using built-in tables");
        return generate_level(index, &GameData::default(), rng, ids);
    };
    let index = data.clamp_level(index);
    let palette = Palette::for_biome(def.biome);

    let mut tiles = fill_terrain(def.layout, &palette);
    if def.layout.is_carved() {
        let diggers = if def.layout == LayoutKind::Rooms { 4 } else { 6 };
        dig(&mut tiles, rng, diggers, palette.floor);
    }

    let critical_path = carve_critical_path(&mut tiles, rng, START_CELL, END_CELL, palette.floor);
    if !tiles.connected(START_CELL, END_CELL) {
        log::warn!("Level {index}: critical path left start and end disconnected");
    }

    let mut entities = Vec::new();
    scatter_obstacles(&mut entities, &tiles, &critical_path, def, &palette, rng, ids);
    spawn_monsters(&mut entities, &tiles, def, data, rng, ids);

    let (end_x, end_y) = END_CELL;
    let exit = if index + 1 < data.level_count() {
        Entity::portal(ids.next_id(), cell_to_world(end_x, end_y), index + 1)
    } else {
        Entity::chest(ids.next_id(), cell_to_world(end_x, end_y))
    };
    entities.push(exit);

    log::info!(
        "Level {}: '{}' ({:?}, {:?}) with {} entities, path of {} cells",
        index,
        def.name,
        def.biome,
        def.layout,
        entities.len(),
        critical_path.len()
    );

    Level {
        index,
        name: def.name.clone(),
        biome: def.biome,
        difficulty: index as u32 + 1,
        tiles,
        entities,
        start: START_CELL,
        end: END_CELL,
        critical_path,
    }
}

/// Two interfering sine fields; roughly in [-1.5, 1.5]
#[inline]
fn terrain_noise(x: usize, y: usize) -> f32 {
    let (x, y) = (x as f32, y as f32);
    let n1 = (x * 0.1).sin() * (y * 0.1).cos();
    let n2 = (x * 0.3 + y * 0.2).sin() * 0.5;
    n1 + n2
}

/// Base terrain: wall-filled for carved layouts, noise for open ones
fn fill_terrain(layout: LayoutKind, palette: &Palette) -> TileGrid {
    let mut tiles = TileGrid::filled(MAP_WIDTH, MAP_HEIGHT, palette.wall);
    if layout.is_carved() {
        return tiles;
    }
    for y in 1..MAP_HEIGHT - 1 {
        for x in 1..MAP_WIDTH - 1 {
            let n = terrain_noise(x, y);
            let kind = if n > 0.6 {
                palette.wall
            } else if n < -0.6 {
                palette.liquid
            } else {
                palette.floor
            };
            tiles.set(x, y, kind);
        }
    }
    tiles
}

/// Random cardinal step
#[inline]
fn random_step<R: Rng + ?Sized>(rng: &mut R) -> (i32, i32) {
    match rng.random_range(0..4) {
        0 => (0, -1),
        1 => (0, 1),
        2 => (-1, 0),
        _ => (1, 0),
    }
}

/// Drunk-walk diggers from the grid center carving 2-wide floor trails
fn dig<R: Rng + ?Sized>(tiles: &mut TileGrid, rng: &mut R, diggers: u32, floor: TileKind) {
    let (w, h) = (tiles.width() as i32, tiles.height() as i32);
    for _ in 0..diggers {
        let (mut cx, mut cy) = (w / 2, h / 2);
        for _ in 0..DIGGER_STEPS {
            if cx > 1 && cx < w - 2 && cy > 1 && cy < h - 2 {
                let (x, y) = (cx as usize, cy as usize);
                tiles.set(x, y, floor);
                tiles.set(x + 1, y, floor);
                tiles.set(x, y + 1, floor);
            }
            let (dx, dy) = random_step(rng);
            cx += dx;
            cy += dy;
        }
    }
}

/// Carve the guaranteed corridor from `start` to `end`
///
/// A biased random walk always steps along the axis with the larger remaining
/// offset, occasionally detouring sideways. Every visited cell opens a swath
/// of itself plus its right and lower neighbours: liquid becomes a bridge,
/// anything else becomes floor. Returns the set of carved cells.
pub fn carve_critical_path<R: Rng + ?Sized>(
    tiles: &mut TileGrid,
    rng: &mut R,
    start: (usize, usize),
    end: (usize, usize),
    floor: TileKind,
) -> HashSet<(usize, usize)> {
    let (w, h) = (tiles.width() as i32, tiles.height() as i32);
    let (min, max_x, max_y) = (1, w - 2, h - 2);
    let clamp = |x: i32, y: i32| (x.clamp(min, max_x), y.clamp(min, max_y));

    let (mut x, mut y) = clamp(start.0 as i32, start.1 as i32);
    let (end_x, end_y) = clamp(end.0 as i32, end.1 as i32);
    let mut path = HashSet::new();

    // Past this many steps the walk heads straight for the end
    let detour_budget = (w * h * 4) as u32;
    let mut steps = 0u32;

    open_swath(tiles, &mut path, x, y, floor);
    while (x, y) != (end_x, end_y) {
        let (dx, dy) = (end_x - x, end_y - y);
        if dx.abs() > dy.abs() {
            x += dx.signum();
        } else {
            y += dy.signum();
        }
        open_swath(tiles, &mut path, x, y, floor);

        steps += 1;
        if steps < detour_budget && rng.random_bool(DETOUR_CHANCE) {
            let (sx, sy) = random_step(rng);
            (x, y) = clamp(x + sx, y + sy);
            open_swath(tiles, &mut path, x, y, floor);
        }
    }
    path
}

/// Open a cell and its right/lower neighbours (interior cells only)
fn open_swath(
    tiles: &mut TileGrid,
    path: &mut HashSet<(usize, usize)>,
    x: i32,
    y: i32,
    floor: TileKind,
) {
    for (cx, cy) in [(x, y), (x + 1, y), (x, y + 1)] {
        if cx < 1 || cy < 1 {
            continue;
        }
        let (cx, cy) = (cx as usize, cy as usize);
        if cx + 1 >= tiles.width() || cy + 1 >= tiles.height() {
            continue;
        }
        let Some(current) = tiles.get(cx, cy) else {
            continue;
        };
        if current.is_liquid() {
            tiles.set(cx, cy, TileKind::Bridge);
        } else if current != TileKind::Bridge {
            tiles.set(cx, cy, floor);
        }
        path.insert((cx, cy));
    }
}

/// Chebyshev distance between two cells
#[inline]
fn cell_distance(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0).max(a.1.abs_diff(b.1))
}

#[inline]
fn random_cell<R: Rng + ?Sized>(rng: &mut R) -> (usize, usize) {
    (rng.random_range(0..MAP_WIDTH), rng.random_range(0..MAP_HEIGHT))
}

/// Trees or rocks on open floor, away from the corridor and the endpoints
fn scatter_obstacles<R: Rng + ?Sized>(
    entities: &mut Vec<Entity>,
    tiles: &TileGrid,
    critical_path: &HashSet<(usize, usize)>,
    def: &LevelDef,
    palette: &Palette,
    rng: &mut R,
    ids: &mut EntityIds,
) {
    let count = if def.layout == LayoutKind::Open { 50 } else { 15 };
    for _ in 0..count {
        let cell = random_cell(rng);
        if tiles.get(cell.0, cell.1) != Some(palette.floor) || critical_path.contains(&cell) {
            continue;
        }
        if cell_distance(cell, START_CELL) <= OBSTACLE_CLEARANCE
            || cell_distance(cell, END_CELL) <= OBSTACLE_CLEARANCE
        {
            continue;
        }
        entities.push(Entity::obstacle(
            ids.next_id(),
            palette.obstacle,
            cell_to_world(cell.0, cell.1),
        ));
    }
}

/// Create one monster with a random 0.9-1.1x stat variance
///
/// Unknown ids fall back to the default monster; returns None only when the
/// monster table is empty.
pub fn spawn_monster<R: Rng + ?Sized>(
    id: &str,
    cell: (usize, usize),
    data: &GameData,
    rng: &mut R,
    ids: &mut EntityIds,
) -> Option<Entity> {
    let def = data.monster(id)?;
    let variance = rng.random_range(0.9..1.1);
    Some(Entity::monster(
        ids.next_id(),
        def,
        cell_to_world(cell.0, cell.1),
        variance,
    ))
}

/// Boss at the end cell plus regular monsters on walkable ground
fn spawn_monsters<R: Rng + ?Sized>(
    entities: &mut Vec<Entity>,
    tiles: &TileGrid,
    def: &LevelDef,
    data: &GameData,
    rng: &mut R,
    ids: &mut EntityIds,
) {
    let mut count = def.density;
    if let Some(boss) = &def.boss {
        count = count.min(BOSS_ESCORTS);
        if let Some(boss) = spawn_monster(boss, END_CELL, data, rng, ids) {
            log::debug!("Boss '{}' guards the exit", boss.name.as_deref().unwrap_or("?"));
            entities.push(boss);
        }
    }

    for _ in 0..count {
        let mut cell = random_cell(rng);
        let mut attempts = 0;
        while !tiles
            .get(cell.0, cell.1)
            .is_some_and(TileKind::is_walkable)
            && attempts < SPAWN_ATTEMPTS
        {
            cell = random_cell(rng);
            attempts += 1;
        }

        // Out of attempts: keep the last sample unless it is solid rock
        if tiles.get(cell.0, cell.1) == Some(TileKind::Wall) {
            continue;
        }
        if cell.0.abs_diff(START_CELL.0) <= MONSTER_CLEARANCE {
            continue;
        }

        let Some(monster_id) = def.monsters.choose(rng) else {
            continue;
        };
        if let Some(monster) = spawn_monster(monster_id, cell, data, rng, ids) {
            entities.push(monster);
        }
    }
}
