//! The per-run session context.
//!
//! One `Session` owns everything a run mutates: the player, the seeded
//! random source, and the dungeon depth counter. Subsystems receive it (or
//! pieces of it) by reference; there are no ambient globals.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::Catalogs;
use crate::player::Player;

/// The single random source for a session. Every stochastic decision in
/// the core draws from this generator, which makes a whole run
/// reproducible from one seed.
pub type SessionRng = ChaCha8Rng;

/// One game run, character creation to death or quit.
pub struct Session {
    pub player: Player,
    pub catalogs: Catalogs,
    pub rng: SessionRng,
    /// Current dungeon depth; increments when an exit is reached.
    pub depth: u32,
}

impl Session {
    /// Seeded explicitly (reproducible runs) or from entropy.
    pub fn new(player: Player, catalogs: Catalogs, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SessionRng::seed_from_u64(seed),
            None => SessionRng::from_entropy(),
        };
        Self {
            player,
            catalogs,
            rng,
            depth: 1,
        }
    }
}
