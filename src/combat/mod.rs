//! Turn-based combat: encounter state machine, action resolution, and the
//! damage formulas.

pub mod logic;
pub mod types;

pub use logic::{roll_monster_damage, roll_player_damage};
pub use types::{AttackNote, CombatAction, CombatEvent, CombatOutcome, CombatPhase, Encounter};
