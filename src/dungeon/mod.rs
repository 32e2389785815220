//! Dungeon exploration: procedural map generation, the per-depth session,
//! and movement resolution.

pub mod generation;
pub mod logic;
pub mod types;

pub use generation::{generate, GeneratorParams};
pub use types::{DoorKind, DungeonSession, Loot, Tile, TileGrid};
