//! Floating combat text
//!
//! Purely cosmetic: entries drift upward and expire. Nothing in the
//! simulation reads them back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{TEXT_DRIFT, TEXT_LIFE};

pub const DAMAGE_COLOR: &str = "#FFEB3B";
pub const PLAYER_HURT_COLOR: &str = "#FF0000";
pub const EXP_COLOR: &str = "#69F0AE";
pub const PICKUP_COLOR: &str = "#FFFFFF";
pub const HEAL_COLOR: &str = "#42A5F5";
pub const FIREBALL_COLOR: &str = "#FF5722";
pub const LEVEL_COLOR: &str = "#FFFFFF";

/// A floating text entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingText {
    pub id: u64,
    pub text: String,
    pub pos: Vec2,
    pub color: String,
    /// Remaining lifetime in ticks
    pub life: u32,
}

/// Ledger of live floating texts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloatingTexts {
    entries: Vec<FloatingText>,
    next_id: u64,
}

impl FloatingTexts {
    /// Add an entry with the default lifetime
    pub fn push(&mut self, text: impl Into<String>, pos: Vec2, color: &str) {
        self.push_with_life(text, pos, color, TEXT_LIFE);
    }

    pub fn push_with_life(&mut self, text: impl Into<String>, pos: Vec2, color: &str, life: u32) {
        self.next_id += 1;
        self.entries.push(FloatingText {
            id: self.next_id,
            text: text.into(),
            pos,
            color: color.to_string(),
            life,
        });
    }

    /// Drift and age every entry, dropping the expired ones
    pub fn decay(&mut self) {
        for entry in &mut self.entries {
            entry.pos.y -= TEXT_DRIFT;
            entry.life = entry.life.saturating_sub(1);
        }
        self.entries.retain(|t| t.life > 0);
    }

    pub fn entries(&self) -> &[FloatingText] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any live entry shows exactly `text`
    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|t| t.text == text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_and_expiry() {
        let mut texts = FloatingTexts::default();
        texts.push_with_life("-5", Vec2::new(10.0, 10.0), DAMAGE_COLOR, 2);
        texts.push("+EXP", Vec2::ZERO, EXP_COLOR);

        texts.decay();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts.entries()[0].pos.y, 9.5);

        texts.decay();
        assert_eq!(texts.len(), 1);
        assert!(texts.contains("+EXP"));
        assert!(!texts.contains("-5"));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut texts = FloatingTexts::default();
        texts.push("a", Vec2::ZERO, PICKUP_COLOR);
        texts.push("b", Vec2::ZERO, PICKUP_COLOR);
        assert_ne!(texts.entries()[0].id, texts.entries()[1].id);
    }
}
