pub mod logic;
pub mod types;

pub use types::{AttackSource, IncomingAttack, WarriorKernel, WarriorOutcome};
