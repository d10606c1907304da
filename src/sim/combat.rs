//! Damage, death and the player's combat commands
//!
//! Commands take `&mut SimState`, so they can only run between ticks.
//! Melee hits do not land immediately: they are queued as [`PendingStrike`]s
//! and resolved at the start of the tick on which they fall due.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::feedback::{DAMAGE_COLOR, EXP_COLOR, FIREBALL_COLOR, HEAL_COLOR, PICKUP_COLOR};
use super::state::{Entity, EntityKind, Item, ItemKind, SimState};
use crate::consts::{HIT_REACTION_TICKS, HIT_SHAKE};

/// A melee hit waiting to land
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingStrike {
    pub target: u32,
    pub amount: u32,
    /// Knockback origin
    pub source: Vec2,
    pub due_tick: u64,
}

/// Result of a damage application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    /// This hit started the death transition
    pub killed: bool,
}

/// Damage the level entity `target_id`
///
/// Returns None when the entity no longer exists. Further hits on a dying
/// entity still show damage but never repeat the death transition.
pub fn apply_damage(
    state: &mut SimState,
    target_id: u32,
    amount: u32,
    source: Vec2,
) -> Option<HitOutcome> {
    let SimState {
        level,
        player,
        inventory,
        texts,
        rng,
        tuning,
        ..
    } = state;
    let target = level.entity_mut(target_id)?;

    target.health = target.health.saturating_sub(amount);
    target.anim.hit_timer = HIT_REACTION_TICKS;
    target.anim.shake = HIT_SHAKE;

    let away = (target.pos - source).normalize_or(Vec2::X);
    target.pos += away * tuning.knockback;

    texts.push(format!("-{amount}"), target.pos - Vec2::new(0.0, 10.0), DAMAGE_COLOR);

    let killed = target.health == 0 && target.mark_dying();
    if !killed {
        return Some(HitOutcome { killed });
    }

    log::debug!("{:?} #{} destroyed", target.kind, target.id);
    texts.push("+EXP", target.pos, EXP_COLOR);

    if target.kind == EntityKind::Monster && rng.random_bool(tuning.coin_drop_chance) {
        let gold = rng.random_range(tuning.coin_min..=tuning.coin_max);
        let total = inventory
            .add(Item::new("coin", "Gold", "💰", ItemKind::Material, gold))
            .quantity;
        log::debug!("Dropped {gold} gold ({total} total)");
        texts.push(format!("+{gold} Gold"), player.pos - Vec2::new(0.0, 40.0), PICKUP_COLOR);
    }

    Some(HitOutcome { killed })
}

/// Swing at everything in melee range
///
/// Damage lands `melee_delay_ticks` later, after the swing animation starts.
pub fn attack(state: &mut SimState) {
    state.player.attack_timer = state.tuning.melee_anim_ticks;

    let origin = state.player.pos;
    let due_tick = state.tick + state.tuning.melee_delay_ticks;
    let amount = state.player.damage;
    let radius = state.tuning.melee_radius;

    let strikes: Vec<PendingStrike> = state
        .level
        .entities
        .iter()
        .filter(|e| e.kind.is_melee_target() && !e.is_dying())
        .filter(|e| e.pos.distance(origin) < radius)
        .map(|e| PendingStrike {
            target: e.id,
            amount,
            source: origin,
            due_tick,
        })
        .collect();

    if !strikes.is_empty() {
        log::debug!("Swing queued {} strikes for tick {due_tick}", strikes.len());
    }
    state.pending.extend(strikes);
}

/// Restore player health
pub fn heal(state: &mut SimState) {
    let restored = state.player.heal(state.tuning.heal_amount);
    log::debug!("Healed {restored}");
    state
        .texts
        .push("HEAL", state.player.pos - Vec2::new(0.0, 30.0), HEAL_COLOR);
}

/// Launch a fireball along the last movement input
pub fn fireball(state: &mut SimState) {
    let dir = if state.last_input == Vec2::ZERO {
        Vec2::new(state.player.facing, 0.0)
    } else {
        state.last_input.normalize_or(Vec2::X)
    };

    let id = state.ids.next_id();
    let spawn = state.player.pos + Vec2::splat(16.0);
    let projectile = Entity::projectile(
        id,
        spawn,
        dir * state.tuning.fireball_speed,
        state.tuning.fireball_damage,
        state.tick,
    );
    state.projectiles.push(projectile);

    state.texts.push("FIREBALL", state.player.pos, FIREBALL_COLOR);
    state.player.attack_timer = state.tuning.fireball_anim_ticks;
}

/// Land every queued strike that is due
pub fn resolve_pending(state: &mut SimState) {
    if state.pending.is_empty() {
        return;
    }
    let tick = state.tick;
    let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut state.pending)
        .into_iter()
        .partition(|s| s.due_tick <= tick);
    state.pending = waiting;

    for strike in due {
        // Target may have been purged since the swing
        let _ = apply_damage(state, strike.target, strike.amount, strike.source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    /// State with no generated monsters nearby to interfere
    fn arena() -> SimState {
        let mut state = SimState::new(7);
        state.level.entities.clear();
        state.pending.clear();
        state
    }

    fn add_monster(state: &mut SimState, pos: Vec2, health: u32) -> u32 {
        let Some(def) = state.data.monster("rat").cloned() else {
            panic!("rat missing from built-in tables");
        };
        let id = state.ids.next_id();
        let mut monster = Entity::monster(id, &def, pos, 1.0);
        monster.health = health;
        state.level.entities.push(monster);
        id
    }

    #[test]
    fn test_death_happens_once() {
        let mut state = arena();
        let id = add_monster(&mut state, Vec2::new(300.0, 300.0), 30);

        let first = apply_damage(&mut state, id, 50, Vec2::new(280.0, 300.0));
        assert_eq!(first, Some(HitOutcome { killed: true }));

        if let Some(e) = state.level.entity_mut(id) {
            e.anim.death_timer = 20;
        }
        let second = apply_damage(&mut state, id, 50, Vec2::new(280.0, 300.0));
        assert_eq!(second, Some(HitOutcome { killed: false }));

        let monster = state.level.entity(id);
        assert_eq!(monster.map(|m| m.health), Some(0));
        assert_eq!(monster.map(|m| m.anim.death_timer), Some(20));
        assert_eq!(state.texts.entries().iter().filter(|t| t.text == "+EXP").count(), 1);
    }

    #[test]
    fn test_missing_target() {
        let mut state = arena();
        assert_eq!(apply_damage(&mut state, 9999, 10, Vec2::ZERO), None);
    }

    #[test]
    fn test_melee_radius() {
        let mut state = arena();
        let origin = state.player.pos;
        let near = add_monster(&mut state, origin + Vec2::new(50.0, 0.0), 100);
        let far = add_monster(&mut state, origin + Vec2::new(90.0, 0.0), 100);
        let tree_id = state.ids.next_id();
        state.level.entities.push(Entity::obstacle(
            tree_id,
            EntityKind::Tree,
            origin + Vec2::new(0.0, 40.0),
        ));
        let rock_id = state.ids.next_id();
        state.level.entities.push(Entity::obstacle(
            rock_id,
            EntityKind::Rock,
            origin + Vec2::new(0.0, -40.0),
        ));

        attack(&mut state);
        assert_eq!(state.player.attack_timer, 15);

        let targets: Vec<u32> = state.pending.iter().map(|s| s.target).collect();
        assert!(targets.contains(&near));
        assert!(targets.contains(&tree_id));
        assert!(!targets.contains(&far));
        assert!(!targets.contains(&rock_id));
        assert!(state.pending.iter().all(|s| s.due_tick == state.tick + 6));
    }

    #[test]
    fn test_strikes_land_when_due() {
        let mut state = arena();
        let origin = state.player.pos;
        let id = add_monster(&mut state, origin + Vec2::new(40.0, 0.0), 100);
        attack(&mut state);

        state.tick += 5;
        resolve_pending(&mut state);
        assert_eq!(state.level.entity(id).map(|m| m.health), Some(100));
        assert_eq!(state.pending.len(), 1);

        state.tick += 1;
        resolve_pending(&mut state);
        assert_eq!(state.level.entity(id).map(|m| m.health), Some(65));
        assert!(state.pending.is_empty());
    }

    #[test]
    fn test_knockback_direction() {
        let mut state = arena();
        let id = add_monster(&mut state, Vec2::new(300.0, 300.0), 100);

        apply_damage(&mut state, id, 1, Vec2::new(300.0, 250.0));
        assert_eq!(state.level.entity(id).map(|m| m.pos), Some(Vec2::new(300.0, 320.0)));

        // Coincident source pushes along +X
        apply_damage(&mut state, id, 1, Vec2::new(300.0, 320.0));
        assert_eq!(state.level.entity(id).map(|m| m.pos), Some(Vec2::new(320.0, 320.0)));

        let hit = state.level.entity(id);
        assert_eq!(hit.map(|m| m.anim.hit_timer), Some(HIT_REACTION_TICKS));
        assert_eq!(hit.map(|m| m.anim.shake), Some(HIT_SHAKE));
        assert!(state.texts.contains("-1"));
    }

    #[test]
    fn test_guaranteed_drop_merges_into_inventory() {
        let mut state = arena();
        state.tuning = Tuning {
            coin_drop_chance: 1.0,
            coin_min: 3,
            coin_max: 3,
            ..Tuning::default()
        };
        let a = add_monster(&mut state, Vec2::new(300.0, 300.0), 10);
        let b = add_monster(&mut state, Vec2::new(400.0, 300.0), 10);
        let stacks = state.inventory.len();

        apply_damage(&mut state, a, 10, Vec2::ZERO);
        apply_damage(&mut state, b, 10, Vec2::ZERO);

        assert_eq!(state.inventory.quantity("coin"), 6);
        assert_eq!(state.inventory.len(), stacks + 1);
        assert!(state.texts.contains("+3 Gold"));
    }

    #[test]
    fn test_inverted_coin_range_still_drops() {
        let tuning = Tuning {
            coin_drop_chance: 1.0,
            coin_min: 9,
            coin_max: 2,
            ..Tuning::default()
        };
        let mut state = SimState::with_config(1, crate::GameData::default(), tuning);
        state.level.entities.clear();
        let id = add_monster(&mut state, Vec2::new(300.0, 300.0), 10);

        let outcome = apply_damage(&mut state, id, 50, Vec2::ZERO);
        assert_eq!(outcome, Some(HitOutcome { killed: true }));
        assert_eq!(state.inventory.quantity("coin"), 9);
    }

    #[test]
    fn test_trees_never_drop_gold() {
        let mut state = arena();
        state.tuning.coin_drop_chance = 1.0;
        let id = state.ids.next_id();
        state
            .level
            .entities
            .push(Entity::obstacle(id, EntityKind::Tree, Vec2::new(200.0, 200.0)));

        let outcome = apply_damage(&mut state, id, 50, Vec2::ZERO);
        assert_eq!(outcome, Some(HitOutcome { killed: true }));
        assert_eq!(state.inventory.quantity("coin"), 0);
    }

    #[test]
    fn test_heal_and_fireball() {
        let mut state = arena();
        heal(&mut state);
        assert_eq!(state.player.health, 500);
        assert!(state.texts.contains("HEAL"));

        state.player.facing = -1.0;
        fireball(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].vel, Vec2::new(-8.0, 0.0));
        assert_eq!(state.projectiles[0].pos, state.player.pos + Vec2::splat(16.0));
        assert_eq!(state.projectiles[0].damage, 60);
        assert_eq!(state.player.attack_timer, 10);

        state.last_input = Vec2::new(0.0, 1.0);
        fireball(&mut state);
        assert_eq!(state.projectiles[1].vel, Vec2::new(0.0, 8.0));
    }
}
