//! Dungeon data structures.

use std::collections::HashMap;

use rand::Rng;

use crate::core::constants::FLOOR_SAMPLE_ATTEMPTS;

/// Door flavor. Purely aesthetic: every door is walkable, and the generated
/// variants are normalized to plain floor before gameplay. `Exit` marks the
/// stairway out of the current depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorKind {
    Open,
    Closed,
    Secret,
    Exit,
}

/// One grid cell. Walkability is decided by the variant alone; what a door
/// looks like lives in its `DoorKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// Unexcavated rock. Features may only be carved into rock.
    Rock,
    /// Carved perimeter wall around a placed feature. Exits are punched
    /// through these.
    Wall,
    Floor,
    Door(DoorKind),
}

impl Tile {
    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Floor | Tile::Door(_))
    }
}

/// Rectangular tile matrix, row-major. Owned by exactly one dungeon session
/// and rebuilt fresh on every depth entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Tile {
        self.tiles[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, tile: Tile) {
        self.tiles[y * self.width + x] = tile;
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.get(x as usize, y as usize).is_walkable()
    }

    /// Uniform random interior floor cell by rejection sampling. The sample
    /// loop is bounded; if the budget runs out (degenerate maps), it falls
    /// back to a deterministic scan, so this always terminates once the
    /// grid holds at least one floor cell.
    pub fn random_floor_tile<R: Rng>(&self, rng: &mut R) -> (usize, usize) {
        for _ in 0..FLOOR_SAMPLE_ATTEMPTS {
            let x = rng.gen_range(1..self.width - 1);
            let y = rng.gen_range(1..self.height - 1);
            if self.get(x, y) == Tile::Floor {
                return (x, y);
            }
        }
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) == Tile::Floor {
                    return (x, y);
                }
            }
        }
        unreachable!("generated grids always contain floor");
    }

    /// Count of floor cells; used by tests and degenerate-map checks.
    pub fn floor_count(&self) -> usize {
        self.tiles.iter().filter(|t| **t == Tile::Floor).count()
    }
}

/// Loot found in dungeon treasure caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loot {
    IronSword,
    HunterBow,
    ArcaneTome,
    GuardianCharm,
    PotionCache,
    GoldSatchel,
}

impl Loot {
    pub const ALL: [Loot; 6] = [
        Loot::IronSword,
        Loot::HunterBow,
        Loot::ArcaneTome,
        Loot::GuardianCharm,
        Loot::PotionCache,
        Loot::GoldSatchel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Loot::IronSword => "Iron Sword",
            Loot::HunterBow => "Hunter Bow",
            Loot::ArcaneTome => "Arcane Tome",
            Loot::GuardianCharm => "Guardian Charm",
            Loot::PotionCache => "Potion Cache",
            Loot::GoldSatchel => "Gold Satchel",
        }
    }
}

/// State of one dungeon-depth visit. Discarded when the exit is reached or
/// the player retreats.
#[derive(Debug, Clone)]
pub struct DungeonSession {
    pub grid: TileGrid,
    pub depth: u32,
    pub player_pos: (usize, usize),
    pub exit_pos: (usize, usize),
    pub boss_pos: Option<(usize, usize)>,
    pub boss_defeated: bool,
    pub treasures: HashMap<(usize, usize), Loot>,
    pub message: String,
}
