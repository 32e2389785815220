//! Player model and progression.

use serde::{Deserialize, Serialize};

use crate::core::constants::*;

/// Character classes. Each maps to a starting stat template and one of the
/// three training kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Warrior,
    Mage,
    Archer,
}

impl ClassKind {
    pub const ALL: [ClassKind; 3] = [ClassKind::Warrior, ClassKind::Mage, ClassKind::Archer];

    pub fn name(&self) -> &'static str {
        match self {
            ClassKind::Warrior => "Warrior",
            ClassKind::Mage => "Mage",
            ClassKind::Archer => "Archer",
        }
    }

    /// Starting template: (hp, mp, strength, defense, speed).
    pub fn base_stats(&self) -> (i32, i32, i32, i32, i32) {
        match self {
            ClassKind::Warrior => (120, 16, 16, 12, 8),
            ClassKind::Mage => (85, 36, 18, 7, 10),
            ClassKind::Archer => (95, 20, 14, 9, 14),
        }
    }
}

/// One player character. Lives for a single run, from character creation to
/// death or quit.
///
/// Invariants: `0 <= hp <= max_hp` except transiently during combat (damage
/// may push hp below zero, which signals death), `0 <= mp <= max_mp`,
/// `level >= 1`, and `xp < level * 100` after `gain_xp` returns.
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub class: ClassKind,
    pub max_hp: i32,
    pub hp: i32,
    pub max_mp: i32,
    pub mp: i32,
    pub strength: i32,
    pub defense: i32,
    pub speed: i32,
    pub gold: u32,
    pub xp: u32,
    pub level: u32,
    pub potions: u32,
}

impl Player {
    pub fn new(name: String, class: ClassKind) -> Self {
        let (hp, mp, strength, defense, speed) = class.base_stats();
        Self {
            name,
            class,
            max_hp: hp,
            hp,
            max_mp: mp,
            mp,
            strength,
            defense,
            speed,
            gold: STARTING_GOLD,
            xp: 0,
            level: 1,
            potions: STARTING_POTIONS,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// XP needed to go from the current level to the next one.
    pub fn xp_to_next_level(&self) -> u32 {
        self.level * XP_PER_LEVEL_STEP
    }

    /// Heals up to `amount`, clamped at `max_hp`. Returns the HP actually
    /// restored; callers report that delta, not the requested amount.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp);
        self.hp - before
    }

    /// Restores up to `amount` MP, clamped at `max_mp`. Returns the actual
    /// delta.
    pub fn restore_mp(&mut self, amount: i32) -> i32 {
        let before = self.mp;
        self.mp = (self.mp + amount).min(self.max_mp);
        self.mp - before
    }

    /// Spends MP. A non-positive cost always succeeds without mutation;
    /// insufficient MP fails without mutation.
    pub fn spend_mp(&mut self, cost: i32) -> bool {
        if cost <= 0 {
            return true;
        }
        if self.mp < cost {
            return false;
        }
        self.mp -= cost;
        true
    }

    /// Accumulates XP, applying the level-up growth package once per level
    /// crossed. A single large award can grant several levels. Returns true
    /// if at least one level was gained.
    pub fn gain_xp(&mut self, amount: u32) -> bool {
        self.xp += amount;
        let mut leveled = false;
        while self.xp >= self.xp_to_next_level() {
            self.xp -= self.xp_to_next_level();
            self.level += 1;
            self.max_hp += LEVEL_UP_HP_GAIN;
            self.hp = self.max_hp;
            self.max_mp += LEVEL_UP_MP_GAIN;
            self.mp = self.max_mp;
            self.strength += LEVEL_UP_STRENGTH_GAIN;
            self.defense += LEVEL_UP_DEFENSE_GAIN;
            self.speed += LEVEL_UP_SPEED_GAIN;
            leveled = true;
        }
        leveled
    }

    /// Stat block lines for the status screen.
    pub fn stats_block(&self) -> Vec<String> {
        vec![
            format!("Name: {}", self.name),
            format!("Class: {}", self.class.name()),
            format!("Level: {}", self.level),
            format!("HP: {}/{}", self.hp, self.max_hp),
            format!("MP: {}/{}", self.mp, self.max_mp),
            format!("Strength: {}", self.strength),
            format!("Defense: {}", self.defense),
            format!("Speed: {}", self.speed),
            format!("Gold: {}", self.gold),
            format!("XP: {}/{}", self.xp, self.xp_to_next_level()),
            format!("Potions: {}", self.potions),
        ]
    }
}
