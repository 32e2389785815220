//! Dungeon session flow: per-depth setup, movement, events, and loot.

use rand::Rng;

use crate::catalog::Catalogs;
use crate::core::constants::*;
use crate::error::MapError;
use crate::monster::{self, Monster};
use crate::player::{ClassKind, Player};
use crate::render::{Emphasis, FrameDescription};

use super::generation::{generate, GeneratorParams};
use super::types::{DungeonSession, Loot, Tile};

/// What a single movement step resolved to. Encounters hand a live monster
/// back to the caller, which owns the combat mode switch.
#[derive(Debug)]
pub enum StepOutcome {
    /// Blocked or uneventful; the session message says what happened.
    Stayed,
    /// Moved without a mode change (may have collected loot or an event).
    Moved,
    /// Moved onto a roaming encounter.
    Encounter(Monster),
    /// Moved onto the undefeated depth boss.
    BossEncounter(Monster),
    /// Reached the exit; the bonus gold is already applied.
    ExitReached { bonus_gold: u32 },
}

/// Builds a fresh session for one depth visit: new grid, player and exit on
/// distinct floor tiles, a boss every fifth depth, and scattered treasure.
/// Monsters are stamped lazily, on movement events.
pub fn enter_dungeon<R: Rng>(
    depth: u32,
    params: &GeneratorParams,
    rng: &mut R,
) -> Result<DungeonSession, MapError> {
    let grid = generate(params, rng)?;

    let player_pos = grid.random_floor_tile(rng);
    let mut exit_pos = grid.random_floor_tile(rng);
    while exit_pos == player_pos {
        exit_pos = grid.random_floor_tile(rng);
    }

    let mut occupied = vec![player_pos, exit_pos];
    let boss_pos = if depth % BOSS_DEPTH_INTERVAL == 0 {
        let pos = place_free_tile(&grid, &occupied, BOSS_PLACEMENT_ATTEMPTS, rng);
        if let Some(pos) = pos {
            occupied.push(pos);
        }
        pos
    } else {
        None
    };

    let treasure_count = rng.gen_range(TREASURE_COUNT_MIN..=TREASURE_COUNT_MAX);
    let mut treasures = std::collections::HashMap::new();
    let mut attempts = 0;
    while treasures.len() < treasure_count && attempts < TREASURE_PLACEMENT_ATTEMPTS {
        attempts += 1;
        let pos = grid.random_floor_tile(rng);
        if occupied.contains(&pos) || treasures.contains_key(&pos) {
            continue;
        }
        treasures.insert(pos, Loot::ALL[rng.gen_range(0..Loot::ALL.len())]);
    }

    let mut message = format!("Dungeon Level {} | Treasures: {}", depth, treasures.len());
    if boss_pos.is_some() {
        message.push_str(" | Boss: hunt B before the door.");
    }

    Ok(DungeonSession {
        grid,
        depth,
        player_pos,
        exit_pos,
        boss_pos,
        boss_defeated: boss_pos.is_none(),
        treasures,
        message,
    })
}

fn place_free_tile<R: Rng>(
    grid: &super::types::TileGrid,
    occupied: &[(usize, usize)],
    budget: u32,
    rng: &mut R,
) -> Option<(usize, usize)> {
    for _ in 0..budget {
        let pos = grid.random_floor_tile(rng);
        if !occupied.contains(&pos) {
            return Some(pos);
        }
    }
    None
}

/// Resolves one movement step. Local failures (walls, the sealed door) stay
/// in the session message; encounters and the exit bubble up.
pub fn step<R: Rng>(
    session: &mut DungeonSession,
    player: &mut Player,
    catalogs: &Catalogs,
    dx: i32,
    dy: i32,
    rng: &mut R,
) -> StepOutcome {
    let nx = session.player_pos.0 as i32 + dx;
    let ny = session.player_pos.1 as i32 + dy;
    if !session.grid.is_walkable(nx, ny) {
        session.message = "A wall blocks your way.".to_string();
        return StepOutcome::Stayed;
    }

    let next = (nx as usize, ny as usize);
    if next == session.exit_pos && !session.boss_defeated {
        session.message = "A dark seal blocks the door. Defeat the boss first.".to_string();
        return StepOutcome::Stayed;
    }

    session.player_pos = next;

    if Some(next) == session.boss_pos && !session.boss_defeated {
        return StepOutcome::BossEncounter(monster::spawn_boss(&catalogs.monsters, session.depth));
    }

    if next == session.exit_pos {
        let bonus = rng.gen_range(EXIT_GOLD_MIN..=EXIT_GOLD_MAX);
        player.gold += bonus;
        return StepOutcome::ExitReached { bonus_gold: bonus };
    }

    if session.treasures.contains_key(&next) {
        session.message = collect_treasure(session, player, next, rng);
        return StepOutcome::Moved;
    }

    movement_event(session, player, catalogs, rng)
}

/// Boss victory bookkeeping: flag, bounty, message.
pub fn on_boss_defeated<R: Rng>(
    session: &mut DungeonSession,
    player: &mut Player,
    boss_name: &str,
    rng: &mut R,
) {
    session.boss_defeated = true;
    let bounty = rng.gen_range(BOSS_BOUNTY_MIN..=BOSS_BOUNTY_MAX);
    player.gold += bounty;
    session.message = format!("Boss defeated: {}. +{} gold.", boss_name, bounty);
}

fn movement_event<R: Rng>(
    session: &mut DungeonSession,
    player: &mut Player,
    catalogs: &Catalogs,
    rng: &mut R,
) -> StepOutcome {
    let roll: f64 = rng.gen();
    if roll < EVENT_MONSTER_CHANCE {
        let template = monster::pick_template(&catalogs.monsters, rng);
        return StepOutcome::Encounter(monster::spawn_encounter(template, session.depth));
    }

    if roll < EVENT_GOLD_CHANCE {
        let found = rng.gen_range(FLOOR_GOLD_MIN..=FLOOR_GOLD_MAX);
        player.gold += found;
        session.message = format!("You found {} gold.", found);
        return StepOutcome::Moved;
    }

    if roll < EVENT_POTION_CHANCE && player.potions < POTION_CAP {
        player.potions += 1;
        session.message = "You found a potion.".to_string();
        return StepOutcome::Moved;
    }

    session.message = "The corridor is quiet...".to_string();
    StepOutcome::Moved
}

fn collect_treasure<R: Rng>(
    session: &mut DungeonSession,
    player: &mut Player,
    pos: (usize, usize),
    rng: &mut R,
) -> String {
    let Some(loot) = session.treasures.remove(&pos) else {
        return "An empty cache.".to_string();
    };
    match loot {
        Loot::IronSword => {
            let gain = if player.class == ClassKind::Warrior { 3 } else { 2 };
            player.strength += gain;
            format!("Treasure found: Iron Sword. +{} STR.", gain)
        }
        Loot::HunterBow => {
            player.speed += 2;
            if player.class == ClassKind::Archer {
                player.strength += 1;
                "Treasure found: Hunter Bow. +2 SPD, +1 STR.".to_string()
            } else {
                "Treasure found: Hunter Bow. +2 SPD.".to_string()
            }
        }
        Loot::ArcaneTome => {
            player.max_mp += 4;
            let restored = player.restore_mp(8);
            format!("Treasure found: Arcane Tome. +4 MAX MP, +{} MP.", restored)
        }
        Loot::GuardianCharm => {
            player.defense += 2;
            "Treasure found: Guardian Charm. +2 DEF.".to_string()
        }
        Loot::PotionCache => {
            let add = rng.gen_range(1..=2);
            player.potions += add;
            let healed = player.heal(12);
            format!(
                "Treasure found: Potion Cache. +{} potion(s), +{} HP.",
                add, healed
            )
        }
        Loot::GoldSatchel => {
            let gold = rng.gen_range(12..=28);
            player.gold += gold;
            format!("Treasure found: Gold Satchel. +{} gold.", gold)
        }
    }
}

/// Frame description for the exploration screen: the tile grid with the
/// player, exit, boss, and remaining caches overlaid.
pub fn dungeon_frame(session: &DungeonSession, player: &Player) -> FrameDescription {
    let grid = &session.grid;
    let mut frame = FrameDescription::new("DUNGEON", grid.width(), grid.height());

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let (glyph, emphasis) = match grid.get(x, y) {
                Tile::Floor | Tile::Door(_) => ('.', Emphasis::Dim),
                Tile::Wall | Tile::Rock => ('#', Emphasis::Normal),
            };
            frame.put(x, y, glyph, emphasis);
        }
    }

    for &(tx, ty) in session.treasures.keys() {
        frame.put(tx, ty, '$', Emphasis::Good);
    }
    if let Some((bx, by)) = session.boss_pos {
        if !session.boss_defeated {
            frame.put(bx, by, 'B', Emphasis::Alert);
        }
    }
    frame.put(session.exit_pos.0, session.exit_pos.1, '>', Emphasis::Accent);
    frame.put(session.player_pos.0, session.player_pos.1, '@', Emphasis::Bold);

    frame.status.push(session.message.clone());
    frame.status.push(format!(
        "{} HP {}/{} | Gold {} | Depth {}",
        player.name, player.hp, player.max_hp, player.gold, session.depth
    ));
    frame.footer = "Move: W/A/S/D or arrows | Q to retreat".to_string();
    frame
}
