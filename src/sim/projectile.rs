//! Fireball flight and impact

use super::combat::apply_damage;
use super::state::SimState;

/// Advance all projectiles one tick and resolve hits
pub fn update_projectiles(state: &mut SimState) {
    if state.projectiles.is_empty() {
        return;
    }

    let mut projectiles = std::mem::take(&mut state.projectiles);
    let lifetime = state.tuning.projectile_lifetime_ticks;
    let radius = state.tuning.projectile_hit_radius;
    let tick = state.tick;

    projectiles.retain_mut(|p| {
        p.pos += p.vel;
        if tick.saturating_sub(p.created_tick) > lifetime {
            return false;
        }

        let target = state
            .level
            .living_monsters()
            .find(|m| m.pos.distance(p.pos) < radius)
            .map(|m| m.id);
        match target {
            Some(id) => {
                let _ = apply_damage(state, id, p.damage, p.pos);
                false
            }
            None => true,
        }
    });

    state.projectiles = projectiles;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Entity;
    use glam::Vec2;

    fn arena() -> SimState {
        let mut state = SimState::new(33);
        state.level.entities.clear();
        state
    }

    #[test]
    fn test_fireball_kills_and_is_consumed() {
        let mut state = arena();
        let Some(def) = state.data.monster("slime_green").cloned() else {
            panic!("slime missing from built-in tables");
        };
        let monster_id = state.ids.next_id();
        let mut slime = Entity::monster(monster_id, &def, Vec2::new(508.0, 300.0), 1.0);
        slime.health = 40;
        state.level.entities.push(slime);

        let id = state.ids.next_id();
        state.projectiles.push(Entity::projectile(
            id,
            Vec2::new(492.0, 300.0),
            Vec2::new(8.0, 0.0),
            60,
            state.tick,
        ));

        update_projectiles(&mut state);

        assert!(state.projectiles.is_empty());
        let slime = state.level.entity(monster_id);
        assert_eq!(slime.map(|m| m.health), Some(0));
        assert_eq!(slime.map(|m| m.is_dying()), Some(true));
    }

    #[test]
    fn test_projectile_expires() {
        let mut state = arena();
        let id = state.ids.next_id();
        state.projectiles.push(Entity::projectile(
            id,
            Vec2::new(100.0, 100.0),
            Vec2::new(1.0, 0.0),
            60,
            0,
        ));

        state.tick = 120;
        update_projectiles(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos, Vec2::new(101.0, 100.0));

        state.tick = 121;
        update_projectiles(&mut state);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_dying_monsters_do_not_absorb_fireballs() {
        let mut state = arena();
        let Some(def) = state.data.monster("rat").cloned() else {
            panic!("rat missing from built-in tables");
        };
        let monster_id = state.ids.next_id();
        let mut rat = Entity::monster(monster_id, &def, Vec2::new(200.0, 200.0), 1.0);
        rat.mark_dying();
        state.level.entities.push(rat);

        let id = state.ids.next_id();
        state.projectiles.push(Entity::projectile(
            id,
            Vec2::new(195.0, 200.0),
            Vec2::new(1.0, 0.0),
            60,
            state.tick,
        ));
        update_projectiles(&mut state);
        assert_eq!(state.projectiles.len(), 1);
    }
}
