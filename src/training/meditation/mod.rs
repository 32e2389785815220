pub mod logic;
pub mod types;

pub use types::{EntityKind, MeditationEntity, MeditationKernel, MeditationOutcome};
