//! Terrain tiles and the level grid

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;

/// Terrain type of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Grass,
    Dirt,
    Wall,
    Water,
    Snow,
    Ice,
    Sand,
    Lava,
    DungeonFloor,
    Swamp,
    /// Floor laid over liquid where the critical path crosses it
    Bridge,
}

impl TileKind {
    /// Liquid variants get bridged by the critical path
    pub fn is_liquid(self) -> bool {
        matches!(
            self,
            TileKind::Water | TileKind::Ice | TileKind::Lava | TileKind::Swamp
        )
    }

    /// Walls and deep liquid block movement; ice and swamp are shallow
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Wall | TileKind::Water | TileKind::Lava)
    }
}

/// Fixed-size rectangular tile matrix (row-major)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Grid with every cell set to `kind`
    pub fn filled(width: usize, height: usize, kind: TileKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![kind; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Tile at a cell, None when out of bounds
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<TileKind> {
        self.index(x, y).and_then(|i| self.tiles.get(i).copied())
    }

    /// Overwrite a cell (ignored when out of bounds)
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, kind: TileKind) {
        if let Some(tile) = self.index(x, y).and_then(|i| self.tiles.get_mut(i)) {
            *tile = kind;
        }
    }

    /// Whether a cell lies on the outer ring
    #[inline]
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// Tile under a world-space point
    pub fn tile_at_world(&self, pos: Vec2) -> Option<TileKind> {
        if pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let x = (pos.x / TILE_SIZE).floor() as usize;
        let y = (pos.y / TILE_SIZE).floor() as usize;
        self.get(x, y)
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[TileKind]> {
        self.tiles.chunks(self.width.max(1))
    }

    /// Breadth-first search over walkable tiles (4-connected)
    pub fn connected(&self, from: (usize, usize), to: (usize, usize)) -> bool {
        let walkable = |x: usize, y: usize| self.get(x, y).is_some_and(TileKind::is_walkable);
        if !walkable(from.0, from.1) || !walkable(to.0, to.1) {
            return false;
        }

        let mut seen = vec![false; self.tiles.len()];
        let mut queue = VecDeque::from([from]);
        if let Some(i) = self.index(from.0, from.1) {
            seen[i] = true;
        }

        while let Some((x, y)) = queue.pop_front() {
            if (x, y) == to {
                return true;
            }
            let neighbours = [
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbours {
                let Some(i) = self.index(nx, ny) else {
                    continue;
                };
                if !seen[i] && walkable(nx, ny) {
                    seen[i] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walkability() {
        assert!(TileKind::Bridge.is_walkable());
        assert!(TileKind::Grass.is_walkable());
        assert!(TileKind::Ice.is_walkable());
        assert!(!TileKind::Wall.is_walkable());
        assert!(!TileKind::Water.is_walkable());
        assert!(!TileKind::Lava.is_walkable());
        assert!(!TileKind::Bridge.is_liquid());
    }

    #[test]
    fn test_get_set_bounds() {
        let mut grid = TileGrid::filled(4, 3, TileKind::Wall);
        grid.set(1, 1, TileKind::Sand);
        assert_eq!(grid.get(1, 1), Some(TileKind::Sand));
        assert_eq!(grid.get(4, 0), None);
        grid.set(10, 10, TileKind::Sand); // ignored
        assert_eq!(grid.rows().count(), 3);
        assert!(grid.is_border(3, 1));
        assert!(!grid.is_border(1, 1));
    }

    #[test]
    fn test_tile_at_world() {
        let mut grid = TileGrid::filled(4, 4, TileKind::Grass);
        grid.set(2, 1, TileKind::Lava);
        assert_eq!(grid.tile_at_world(Vec2::new(70.0, 40.0)), Some(TileKind::Lava));
        assert_eq!(grid.tile_at_world(Vec2::new(-3.0, 40.0)), None);
    }

    #[test]
    fn test_connected() {
        let mut grid = TileGrid::filled(5, 5, TileKind::Wall);
        for x in 1..4 {
            grid.set(x, 2, TileKind::Grass);
        }
        assert!(grid.connected((1, 2), (3, 2)));

        grid.set(2, 2, TileKind::Water);
        assert!(!grid.connected((1, 2), (3, 2)));

        grid.set(2, 2, TileKind::Bridge);
        assert!(grid.connected((1, 2), (3, 2)));
    }
}
