//! Archer precision training data structures.
//!
//! The archer holds a fixed column and shoots right at targets streaming in
//! from the right edge. Charged shots, fake targets, and a combo-driven
//! slowdown ("eagle eye") layer on top of the base loop.

use crate::training::{EndReason, TrainingOutcome, TrainingReward};

/// Fixed session length in seconds; the only kernel with a time bound.
pub const SESSION_SECONDS: f64 = 48.0;
pub const FOCUS_START: i32 = 20;

/// No key-up event reaches the core. A held key surfaces as repeat events,
/// so release is inferred once no repeat arrives within this window.
pub const RELEASE_WINDOW: f64 = 0.11;
/// Charge accumulated per second of holding the fire key.
pub const CHARGE_RATE: f64 = 1.4;
/// Charge at or above this fires a charged (focus-costing) shot.
pub const CHARGED_THRESHOLD: f64 = 0.55;

/// Combo streak that triggers eagle eye, and how long it lasts.
pub const EAGLE_EYE_COMBO: u32 = 5;
pub const EAGLE_EYE_SECONDS: f64 = 2.5;

/// Rectangular hit tolerances around a target.
pub const HIT_TOLERANCE_X: f64 = 0.70;
pub const HIT_TOLERANCE_X_SMALL: f64 = 0.40;
pub const HIT_TOLERANCE_Y: f64 = 0.65;

/// The archer's fixed shooting column.
pub const ARCHER_COLUMN: i32 = 2;

/// Lateral motion of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPattern {
    Straight,
    Zigzag,
    Drift,
}

/// One arrow in flight.
#[derive(Debug, Clone, Copy)]
pub struct Arrow {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub charged: bool,
}

/// One target crossing the arena right to left.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub base_y: f64,
    pub pattern: TargetPattern,
    pub phase: f64,
    pub amplitude: f64,
    pub fake: bool,
    pub small: bool,
}

/// Archer kernel state. Entities never leave this struct; only the
/// `ArcherOutcome` crosses back to the caller.
#[derive(Debug, Clone)]
pub struct ArcherKernel {
    pub arena_w: i32,
    pub arena_h: i32,
    pub archer_y: i32,

    pub elapsed: f64,
    pub focus: i32,
    pub score: u32,
    pub hits: u32,
    pub misses: u32,
    pub combo: u32,
    pub best_combo: u32,

    pub wind: f64,
    pub spawn_timer: f64,
    pub shot_cooldown: f64,

    pub eagle_eye_until: f64,
    pub flash_hit_until: f64,
    pub flash_miss_until: f64,

    pub charging: bool,
    pub charge_power: f64,
    pub last_fire_event: f64,
    pub quit_requested: bool,

    pub arrows: Vec<Arrow>,
    pub targets: Vec<Target>,
}

impl ArcherKernel {
    pub fn new(arena_w: i32, arena_h: i32) -> Self {
        Self {
            arena_w,
            arena_h,
            archer_y: arena_h / 2,
            elapsed: 0.0,
            focus: FOCUS_START,
            score: 0,
            hits: 0,
            misses: 0,
            combo: 0,
            best_combo: 0,
            wind: 0.0,
            spawn_timer: 0.0,
            shot_cooldown: 0.0,
            eagle_eye_until: 0.0,
            flash_hit_until: 0.0,
            flash_miss_until: 0.0,
            charging: false,
            charge_power: 0.0,
            last_fire_event: 0.0,
            quit_requested: false,
            arrows: Vec::new(),
            targets: Vec::new(),
        }
    }

    pub fn eagle_eye_active(&self, now: f64) -> bool {
        now < self.eagle_eye_until
    }
}

/// Session result handed back to the caller.
#[derive(Debug, Clone)]
pub struct ArcherOutcome {
    pub score: u32,
    pub hits: u32,
    pub misses: u32,
    pub best_combo: u32,
    pub accuracy: f64,
    pub focus_remaining: i32,
    pub success: bool,
    pub ended_by: EndReason,
    pub xp_gain: u32,
    pub hp_cost: i32,
    pub speed_gain: i32,
    pub summary: String,
}

impl TrainingOutcome for ArcherOutcome {
    fn reward(&self) -> TrainingReward {
        TrainingReward {
            xp_gain: self.xp_gain,
            hp_cost: self.hp_cost,
            strength_gain: 0,
            defense_gain: 0,
            speed_gain: self.speed_gain,
            summary: self.summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_kernel_defaults() {
        let kernel = ArcherKernel::new(60, 16);
        assert_eq!(kernel.archer_y, 8);
        assert_eq!(kernel.focus, FOCUS_START);
        assert_eq!(kernel.combo, 0);
        assert!(!kernel.charging);
        assert!(!kernel.quit_requested);
        assert!(kernel.arrows.is_empty());
        assert!(kernel.targets.is_empty());
    }

    #[test]
    fn test_outcome_reward_maps_speed_only() {
        let outcome = ArcherOutcome {
            score: 120,
            hits: 9,
            misses: 3,
            best_combo: 7,
            accuracy: 0.75,
            focus_remaining: 4,
            success: false,
            ended_by: EndReason::ResourceEmpty,
            xp_gain: 60,
            hp_cost: 3,
            speed_gain: 1,
            summary: "Archer Training".to_string(),
        };
        let reward = outcome.reward();
        assert_eq!(reward.speed_gain, 1);
        assert_eq!(reward.strength_gain, 0);
        assert_eq!(reward.defense_gain, 0);
        assert_eq!(reward.xp_gain, 60);
    }
}
