//! Collision detection between movers and static obstacles
//!
//! Hitboxes are inset from the sprite box. Movers only collide with their
//! lower body so they can walk "behind" the top of a tree or rock.

use glam::Vec2;

use super::state::{Entity, EntityKind};

/// Horizontal inset of a mover's hitbox, per side, as a fraction of size
const MOVER_INSET_X: f32 = 0.3;
/// Top inset of a mover's hitbox as a fraction of size
const MOVER_INSET_TOP: f32 = 0.5;
/// Uniform inset for everything else
const OBSTACLE_INSET: f32 = 2.0;

/// Axis-aligned box (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Standard AABB overlap (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Whether the box lies within `[0, bounds]` on the X axis
    #[inline]
    pub fn within_x(&self, bounds: Vec2) -> bool {
        self.x >= 0.0 && self.right() <= bounds.x
    }

    /// Whether the box lies within `[0, bounds]` on the Y axis
    #[inline]
    pub fn within_y(&self, bounds: Vec2) -> bool {
        self.y >= 0.0 && self.bottom() <= bounds.y
    }
}

/// Collision box for an entity of `kind` placed at `pos`
pub fn hitbox(pos: Vec2, size: f32, kind: EntityKind) -> Aabb {
    if kind.is_mover() {
        let pad_x = size * MOVER_INSET_X;
        let pad_y = size * MOVER_INSET_TOP;
        Aabb {
            x: pos.x + pad_x,
            y: pos.y + pad_y,
            w: size - pad_x * 2.0,
            h: size - pad_y,
        }
    } else {
        Aabb {
            x: pos.x + OBSTACLE_INSET,
            y: pos.y + OBSTACLE_INSET,
            w: size - OBSTACLE_INSET * 2.0,
            h: size - OBSTACLE_INSET * 2.0,
        }
    }
}

/// Whether an entity currently blocks movement
#[inline]
pub fn is_blocking(entity: &Entity) -> bool {
    entity.kind.is_obstacle() && !entity.is_dying()
}

/// Check whether a mover of `size` at `pos` overlaps any blocking entity
pub fn collides(pos: Vec2, size: f32, entities: &[Entity]) -> bool {
    let mover = hitbox(pos, size, EntityKind::Player);
    entities
        .iter()
        .filter(|e| is_blocking(e))
        .any(|e| mover.overlaps(&hitbox(e.pos, e.size, e.kind)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mover_hitbox_is_feet() {
        let b = hitbox(Vec2::new(100.0, 200.0), 24.0, EntityKind::Player);
        assert!((b.x - 107.2).abs() < 1e-4);
        assert!((b.w - 9.6).abs() < 1e-4);
        assert_eq!(b.y, 212.0);
        assert_eq!(b.h, 12.0);
        assert_eq!(b.bottom(), 224.0);
    }

    #[test]
    fn test_obstacle_hitbox_inset() {
        let b = hitbox(Vec2::new(64.0, 64.0), 32.0, EntityKind::Rock);
        assert_eq!(b, Aabb { x: 66.0, y: 66.0, w: 28.0, h: 28.0 });
    }

    #[test]
    fn test_overlap_excludes_touching() {
        let a = Aabb { x: 0.0, y: 0.0, w: 10.0, h: 10.0 };
        let b = Aabb { x: 10.0, y: 0.0, w: 10.0, h: 10.0 };
        let c = Aabb { x: 9.0, y: 9.0, w: 10.0, h: 10.0 };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_collides_ignores_dying_and_non_obstacles() {
        let rock = Entity::obstacle(1, EntityKind::Rock, Vec2::new(100.0, 100.0));
        let mut tree = Entity::obstacle(2, EntityKind::Tree, Vec2::new(200.0, 100.0));
        tree.mark_dying();
        let portal = Entity::portal(3, Vec2::new(300.0, 100.0), 1);
        let entities = vec![rock, tree, portal];

        // Feet overlap the rock
        assert!(collides(Vec2::new(100.0, 90.0), 24.0, &entities));
        // Standing right above the rock
        assert!(!collides(Vec2::new(100.0, 78.0), 24.0, &entities));
        // Dying tree no longer blocks
        assert!(!collides(Vec2::new(200.0, 90.0), 24.0, &entities));
        // Portal never blocks
        assert!(!collides(Vec2::new(300.0, 90.0), 24.0, &entities));
    }
}
