//! Meditation training data structures.
//!
//! The player's orb dodges seeking threats while decorative particles
//! drift past. Movement is impulse-based: a direction key nudges the orb
//! for a short persistence window instead of continuous hold-to-move.

use crate::training::{EndReason, TrainingOutcome, TrainingReward};

pub const FOCUS_START: i32 = 12;
/// Orb speed in cells per second while an impulse is live.
pub const ORB_SPEED: f64 = 12.0;
/// How long one directional impulse keeps the orb moving.
pub const INTENT_HOLD_SECONDS: f64 = 0.12;

/// What an entity is. Particles are scenery: they never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Seeks the orb's position at spawn time; damage 2.
    Enemy,
    /// Seeks with added aim noise; damage 1.
    Chaos,
    /// Decorative drift, expires by TTL.
    Particle,
}

/// A short-lived simulation entity. Never escapes the kernel.
#[derive(Debug, Clone, Copy)]
pub struct MeditationEntity {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub kind: EntityKind,
    pub damage: i32,
    pub ttl: f64,
}

/// Meditation kernel state.
#[derive(Debug, Clone)]
pub struct MeditationKernel {
    pub arena_w: i32,
    pub arena_h: i32,

    pub orb_x: f64,
    pub orb_y: f64,
    pub focus: i32,
    pub elapsed: f64,

    pub enemy_timer: f64,
    pub chaos_timer: f64,
    pub particle_timer: f64,
    /// Seconds of hit flash remaining.
    pub hit_flash: f64,
    pub quit_requested: bool,

    pub intent_dx: i32,
    pub intent_dy: i32,
    pub intent_ttl: f64,

    pub entities: Vec<MeditationEntity>,
}

impl MeditationKernel {
    pub fn new(arena_w: i32, arena_h: i32) -> Self {
        Self {
            arena_w,
            arena_h,
            orb_x: arena_w as f64 / 2.0,
            orb_y: arena_h as f64 / 2.0,
            focus: FOCUS_START,
            elapsed: 0.0,
            enemy_timer: 0.0,
            chaos_timer: 0.0,
            particle_timer: 0.0,
            hit_flash: 0.0,
            quit_requested: false,
            intent_dx: 0,
            intent_dy: 0,
            intent_ttl: 0.0,
            entities: Vec::new(),
        }
    }

    /// The orb's collision cell (exact-cell matching, not radius-based).
    pub fn orb_cell(&self) -> (i32, i32) {
        (self.orb_x.round() as i32, self.orb_y.round() as i32)
    }
}

/// Session result handed back to the caller.
#[derive(Debug, Clone)]
pub struct MeditationOutcome {
    pub survival_time: f64,
    pub focus_remaining: i32,
    pub ended_by: EndReason,
    pub xp_gain: u32,
    pub hp_cost: i32,
    pub speed_gain: i32,
    pub summary: String,
}

impl TrainingOutcome for MeditationOutcome {
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
