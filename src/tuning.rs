//! Gameplay balance values
//!
//! Everything a designer may want to tweak without touching simulation code.
//! Distances are in world units, durations in ticks.

use serde::{Deserialize, Serialize};

/// Data-driven gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Player movement per tick at full input
    pub player_speed: f32,
    /// Melee reach around the player
    pub melee_radius: f32,
    /// Delay between the swing animation and damage landing
    pub melee_delay_ticks: u64,
    /// Swing animation length
    pub melee_anim_ticks: u32,
    /// Health restored by the heal skill
    pub heal_amount: u32,

    // === Fireball ===
    pub fireball_speed: f32,
    pub fireball_damage: u32,
    pub fireball_anim_ticks: u32,
    /// Projectiles older than this are discarded
    pub projectile_lifetime_ticks: u64,
    /// Center distance at which a projectile hits a monster
    pub projectile_hit_radius: f32,

    // === Combat ===
    /// Distance a struck entity is pushed away from the source
    pub knockback: f32,
    /// Chance that a slain monster drops gold
    pub coin_drop_chance: f64,
    /// Gold dropped (inclusive range)
    pub coin_min: u32,
    pub coin_max: u32,

    // === Monsters ===
    /// Monsters notice the player within this radius
    pub pursuit_radius: f32,
    /// Monsters stop closing in at this distance
    pub stop_distance: f32,
    /// Monsters may strike within this radius
    pub monster_attack_radius: f32,
    /// Per-tick chance of a strike while in range
    pub monster_attack_chance: f64,

    // === Level flow ===
    /// Distance to the portal that triggers the next level
    pub portal_radius: f32,
    /// HUD samples are emitted every N ticks
    pub hud_interval_ticks: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 5.0,
            melee_radius: 70.0,
            melee_delay_ticks: 6, // ~100ms at 60 Hz
            melee_anim_ticks: 15,
            heal_amount: 50,

            fireball_speed: 8.0,
            fireball_damage: 60,
            fireball_anim_ticks: 10,
            projectile_lifetime_ticks: 120,
            projectile_hit_radius: 20.0,

            knockback: 20.0,
            coin_drop_chance: 0.5,
            coin_min: 1,
            coin_max: 10,

            pursuit_radius: 300.0,
            stop_distance: 10.0,
            monster_attack_radius: 20.0,
            monster_attack_chance: 0.05,

            portal_radius: 40.0,
            hud_interval_ticks: 10,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Parse from JSON, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            log::warn!("Invalid tuning ({e}), using defaults");
            Self::default()
        })
    }

    /// Clamp values that would break the simulation
    pub(crate) fn sanitized(mut self) -> Self {
        self.coin_drop_chance = self.coin_drop_chance.clamp(0.0, 1.0);
        self.monster_attack_chance = self.monster_attack_chance.clamp(0.0, 1.0);
        self.coin_max = self.coin_max.max(self.coin_min);
        self.hud_interval_ticks = self.hud_interval_ticks.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"melee_radius": 90.0}"#).unwrap_or_default();
        assert_eq!(tuning.melee_radius, 90.0);
        assert_eq!(tuning.portal_radius, 40.0);
    }

    #[test]
    fn test_sanitize_out_of_range() {
        let tuning = Tuning::from_json(
            r#"{"coin_drop_chance": 4.0, "coin_min": 9, "coin_max": 2, "hud_interval_ticks": 0}"#,
        )
        .unwrap_or_default();
        assert_eq!(tuning.coin_drop_chance, 1.0);
        assert_eq!(tuning.coin_max, 9);
        assert_eq!(tuning.hud_interval_ticks, 1);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        assert_eq!(Tuning::from_json_or_default("[1, 2"), Tuning::default());
    }
}
