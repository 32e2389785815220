//! Warrior reflex training data structures.
//!
//! A stationary defender parries attacks converging on the arena center
//! from the four cardinal edges. Blocks are directional intents that
//! persist for a short buffer window to absorb input lag.

use crate::training::{EndReason, TrainingOutcome, TrainingReward};

pub const STAMINA_START: i32 = 24;
/// Stamina cost of a clean parry.
pub const PARRY_COST: i32 = 1;
/// Stamina lost when a real attack reaches the center unblocked.
pub const CENTER_HIT_COST: i32 = 4;
/// Stamina lost for blocking a feint as if it were real.
pub const FAKE_BLOCK_COST: i32 = 2;

/// How long a directional block intent stays armed.
pub const INPUT_BUFFER_SECONDS: f64 = 0.18;
/// An attack inside this Manhattan distance of center can be parried.
pub const CATCH_WINDOW: f64 = 1.25;
/// An attack inside this distance has reached the defender.
pub const CENTER_WINDOW: f64 = 0.35;

/// Which edge an attack comes from; also the block direction that parries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackSource {
    North,
    South,
    East,
    West,
}

impl AttackSource {
    pub const ALL: [AttackSource; 4] = [
        AttackSource::North,
        AttackSource::South,
        AttackSource::East,
        AttackSource::West,
    ];

    /// Glyph for the renderer: the arrow points at the defender.
    pub fn glyph(&self) -> char {
        match self {
            AttackSource::North => 'v',
            AttackSource::South => '^',
            AttackSource::East => '<',
            AttackSource::West => '>',
        }
    }
}

/// One strike traveling straight at the center.
#[derive(Debug, Clone, Copy)]
pub struct IncomingAttack {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub source: AttackSource,
    pub fake: bool,
}

/// Warrior kernel state.
#[derive(Debug, Clone)]
pub struct WarriorKernel {
    pub arena_w: i32,
    pub arena_h: i32,
    pub center_x: i32,
    pub center_y: i32,

    pub stamina: i32,
    pub elapsed: f64,
    pub spawn_timer: f64,

    pub parries: u32,
    pub failures: u32,
    pub quit_requested: bool,

    pub attacks: Vec<IncomingAttack>,
    pub buffered_block: Option<AttackSource>,
    pub buffered_at: f64,

    pub flash_until: f64,
    pub parry_flash_until: f64,
}

impl WarriorKernel {
    pub fn new(arena_w: i32, arena_h: i32) -> Self {
        Self {
            arena_w,
            arena_h,
            center_x: arena_w / 2,
            center_y: arena_h / 2,
            stamina: STAMINA_START,
            elapsed: 0.0,
            spawn_timer: 0.0,
            parries: 0,
            failures: 0,
            quit_requested: false,
            attacks: Vec::new(),
            buffered_block: None,
            buffered_at: 0.0,
            flash_until: 0.0,
            parry_flash_until: 0.0,
        }
    }
}

/// Session result handed back to the caller.
#[derive(Debug, Clone)]
pub struct WarriorOutcome {
    pub survival_time: f64,
    pub stamina_remaining: i32,
    pub ended_by: EndReason,
    pub parries: u32,
    pub failures: u32,
    pub xp_gain: u32,
    pub hp_cost: i32,
    pub strength_gain: i32,
    pub defense_gain: i32,
    pub summary: String,
}

impl TrainingOutcome for WarriorOutcome {
    fn reward(&self) -> TrainingReward {
        TrainingReward {
            xp_gain: self.xp_gain,
            hp_cost: self.hp_cost,
            strength_gain: self.strength_gain,
            defense_gain: self.defense_gain,
            speed_gain: 0,
            summary: self.summary.clone(),
        }
    }
}
