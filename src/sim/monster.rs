//! Monster AI and death animation
//!
//! Every level entity is updated first; the dead are purged afterwards in a
//! single `retain` pass once their death animation has run out.

use glam::Vec2;
use rand::Rng;

use super::feedback::PLAYER_HURT_COLOR;
use super::state::{EntityKind, SimState};
use crate::consts::{DEATH_DECAY_TICKS, SHAKE_DECAY, TREE_TOPPLE_PER_TICK};

/// Advance every level entity by one tick
pub fn update_monsters(state: &mut SimState) {
    let SimState {
        level,
        player,
        texts,
        rng,
        tuning,
        ..
    } = state;

    for entity in &mut level.entities {
        if entity.is_dying() {
            entity.anim.death_timer += 1;
            if entity.kind == EntityKind::Tree {
                entity.anim.rotation += TREE_TOPPLE_PER_TICK;
            }
            continue;
        }

        entity.anim.hit_timer = entity.anim.hit_timer.saturating_sub(1);
        entity.anim.shake *= SHAKE_DECAY;
        if entity.anim.shake < 0.01 {
            entity.anim.shake = 0.0;
        }

        if entity.kind != EntityKind::Monster {
            continue;
        }

        let dist = entity.pos.distance(player.pos);
        if dist < tuning.pursuit_radius && dist > tuning.stop_distance {
            let dir = (player.pos - entity.pos).normalize_or_zero();
            entity.pos += dir * entity.speed;
            if dir.x != 0.0 {
                entity.facing = dir.x.signum();
            }
        }

        if dist < tuning.monster_attack_radius && rng.random_bool(tuning.monster_attack_chance) {
            player.health = player.health.saturating_sub(entity.damage);
            log::debug!(
                "{} hits the player for {} ({} left)",
                entity.name.as_deref().unwrap_or("Monster"),
                entity.damage,
                player.health
            );
            texts.push(
                format!("-{}", entity.damage),
                player.pos - Vec2::new(0.0, 20.0),
                PLAYER_HURT_COLOR,
            );
        }
    }

    level
        .entities
        .retain(|e| !e.is_dying() || e.anim.death_timer < DEATH_DECAY_TICKS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Entity;

    fn arena() -> SimState {
        let mut state = SimState::new(21);
        state.level.entities.clear();
        state
    }

    fn add_monster(state: &mut SimState, pos: Vec2) -> u32 {
        let Some(def) = state.data.monster("slime_green").cloned() else {
            panic!("slime missing from built-in tables");
        };
        let id = state.ids.next_id();
        state.level.entities.push(Entity::monster(id, &def, pos, 1.0));
        id
    }

    #[test]
    fn test_death_decay_then_purge() {
        let mut state = arena();
        let id = add_monster(&mut state, Vec2::new(1000.0, 1000.0));
        if let Some(e) = state.level.entity_mut(id) {
            e.health = 0;
            e.mark_dying();
        }

        for tick in 0..59 {
            update_monsters(&mut state);
            assert!(state.level.entity(id).is_some(), "purged early at {tick}");
        }
        update_monsters(&mut state);
        assert!(state.level.entity(id).is_none());
    }

    #[test]
    fn test_dying_tree_topples() {
        let mut state = arena();
        let id = state.ids.next_id();
        let mut tree = Entity::obstacle(id, EntityKind::Tree, Vec2::new(500.0, 500.0));
        tree.mark_dying();
        state.level.entities.push(tree);

        for _ in 0..10 {
            update_monsters(&mut state);
        }
        let tree = state.level.entity(id);
        assert_eq!(tree.map(|t| t.anim.rotation), Some(20.0));
        assert_eq!(tree.map(|t| t.anim.death_timer), Some(10));
    }

    #[test]
    fn test_pursuit_range() {
        let mut state = arena();
        let origin = state.player.pos;
        let chaser = add_monster(&mut state, origin + Vec2::new(200.0, 0.0));
        let idle = add_monster(&mut state, origin + Vec2::new(400.0, 0.0));
        let close = add_monster(&mut state, origin + Vec2::new(5.0, 0.0));
        state.tuning.monster_attack_chance = 0.0;

        update_monsters(&mut state);

        let x = |id| state.level.entity(id).map(|e| e.pos.x - origin.x);
        assert_eq!(x(chaser), Some(199.0));
        assert_eq!(x(idle), Some(400.0));
        assert_eq!(x(close), Some(5.0));
        assert_eq!(state.level.entity(chaser).map(|e| e.facing), Some(-1.0));
    }

    #[test]
    fn test_monster_strikes_in_range() {
        let mut state = arena();
        state.tuning.monster_attack_chance = 1.0;
        let origin = state.player.pos;
        add_monster(&mut state, origin + Vec2::new(5.0, 0.0));
        let before = state.player.health;

        update_monsters(&mut state);
        assert_eq!(state.player.health, before - 8);
        assert!(state.texts.contains("-8"));
    }

    #[test]
    fn test_hit_reaction_decays() {
        let mut state = arena();
        let id = add_monster(&mut state, Vec2::new(1000.0, 1000.0));
        if let Some(e) = state.level.entity_mut(id) {
            e.anim.hit_timer = 2;
            e.anim.shake = 5.0;
        }
        update_monsters(&mut state);
        let e = state.level.entity(id);
        assert_eq!(e.map(|e| e.anim.hit_timer), Some(1));
        assert_eq!(e.map(|e| e.anim.shake), Some(4.0));

        for _ in 0..60 {
            update_monsters(&mut state);
        }
        let e = state.level.entity(id);
        assert_eq!(e.map(|e| e.anim.hit_timer), Some(0));
        assert_eq!(e.map(|e| e.anim.shake), Some(0.0));
    }
}
