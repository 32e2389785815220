//! Procedural map generation.
//!
//! Iterative room/corridor placement: grow features off random exits punched
//! through existing walls, link overlapping growth with occasional portals,
//! then guarantee a single connected floor region with an explicit repair
//! pass. The stochastic phase alone does not guarantee connectivity - no
//! caller may skip the repair.

use rand::Rng;

use crate::core::constants::{EXIT_PROBE_ATTEMPTS, SEED_ROOM_ATTEMPTS};
use crate::error::MapError;

use super::types::{DoorKind, Tile, TileGrid};

/// Generation tuning. Defaults match the standard dungeon footprint.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorParams {
    pub width: usize,
    pub height: usize,
    /// Consecutive-ish placement failures tolerated before giving up.
    pub fail_limit: u32,
    /// Percent chance a grown feature is a corridor rather than a room.
    pub corridor_percent: u32,
    pub max_rooms: usize,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            width: 46,
            height: 22,
            fail_limit: 110,
            corridor_percent: 50,
            max_rooms: 60,
        }
    }
}

/// Largest feature side (rooms are 3-10 per side); grids must leave room
/// for the perimeter ring around one.
const MAX_ROOM_SIDE: i32 = 10;

/// A placed room or corridor: height, width, top-left origin. Rooms and
/// corridors are indistinguishable here; the list is immutable once
/// generation finishes.
#[derive(Debug, Clone, Copy)]
struct Feature {
    l: i32,
    w: i32,
    x: i32,
    y: i32,
}

/// Corridor bookkeeping for the join passes: feature index, growth origin,
/// and heading (0 north, 1 east, 2 south, 3 west).
#[derive(Debug, Clone, Copy)]
struct CorridorRef {
    index: usize,
    x: i32,
    y: i32,
    heading: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Out of bounds or origin hugging the border.
    Invalid,
    /// All target cells were rock; feature carved.
    Clean,
    /// Target rectangle touches existing carving; nothing mutated.
    Overlap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeatureKind {
    Room,
    Corridor(u8),
}

struct MapGenerator {
    width: i32,
    height: i32,
    grid: TileGrid,
    features: Vec<Feature>,
    corridors: Vec<CorridorRef>,
}

/// Builds a dungeon grid. Fails fast on degenerate dimensions and on seed
/// placement exhaustion instead of spinning.
pub fn generate<R: Rng>(params: &GeneratorParams, rng: &mut R) -> Result<TileGrid, MapError> {
    if (params.width as i32) < MAX_ROOM_SIDE + 2 || (params.height as i32) < MAX_ROOM_SIDE + 2 {
        return Err(MapError::GridTooSmall {
            width: params.width,
            height: params.height,
        });
    }

    let mut gen = MapGenerator {
        width: params.width as i32,
        height: params.height as i32,
        grid: TileGrid::filled(params.width, params.height, Tile::Rock),
        features: Vec::new(),
        corridors: Vec::new(),
    };
    gen.run(params, rng)?;
    Ok(gen.grid)
}

impl MapGenerator {
    fn run<R: Rng>(&mut self, params: &GeneratorParams, rng: &mut R) -> Result<(), MapError> {
        self.place_seed_room(rng)?;

        let mut failed = 0;
        while failed < params.fail_limit {
            let index = rng.gen_range(0..self.features.len());
            let Some((ex, ey, ex2, ey2, wall)) = self.make_exit(index, rng) else {
                failed += 1;
                continue;
            };

            let (w, l, kind) = if rng.gen_range(0..100u32) < params.corridor_percent {
                make_corridor(rng)
            } else {
                let (w, l) = make_room(rng);
                (w, l, FeatureKind::Room)
            };

            match self.place_feature(l, w, ex2, ey2, kind, wall, rng) {
                Placement::Invalid => failed += 1,
                Placement::Overlap => {
                    // The growth rectangle hit existing floor; occasionally
                    // punch a portal through anyway, forming a loop.
                    if self.tile(ex2, ey2) == Some(Tile::Floor) && rng.gen_range(0..100) < 7 {
                        self.make_portal(ex, ey, rng);
                    }
                    failed += 1;
                }
                Placement::Clean => {
                    self.make_portal(ex, ey, rng);
                    failed = 0;
                    if let FeatureKind::Corridor(heading) = kind {
                        let corridor = CorridorRef {
                            index: self.features.len() - 1,
                            x: ex2,
                            y: ey2,
                            heading,
                        };
                        self.corridors.push(corridor);
                        self.join_corridor(corridor, 50, rng);
                    }
                }
            }

            if self.features.len() >= params.max_rooms {
                break;
            }
        }

        self.final_joins(rng);
        self.normalize_doors();
        self.ensure_connectivity();
        Ok(())
    }

    /// Places the first room. Bounded: pathological parameter combinations
    /// fail with an error rather than retrying forever.
    fn place_seed_room<R: Rng>(&mut self, rng: &mut R) -> Result<(), MapError> {
        let (w, l) = make_room(rng);
        let mut attempts = 0;
        while self.features.is_empty() {
            attempts += 1;
            if attempts > SEED_ROOM_ATTEMPTS {
                return Err(MapError::SeedPlacement { attempts });
            }
            let y = rng.gen_range(0..self.height - 1 - l) + 1;
            let x = rng.gen_range(0..self.width - 1 - w) + 1;
            self.place_feature(l, w, x, y, FeatureKind::Room, 0, rng);
        }
        Ok(())
    }

    fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        if self.grid.in_bounds(x, y) {
            Some(self.grid.get(x as usize, y as usize))
        } else {
            None
        }
    }

    fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        self.grid.set(x as usize, y as usize, tile);
    }

    /// Attempts to carve a feature whose near corner sits at (x, y). Rooms
    /// are recentered by a random offset along the exit wall so the doorway
    /// is not pinned to the room corner.
    fn place_feature<R: Rng>(
        &mut self,
        length: i32,
        width: i32,
        x: i32,
        y: i32,
        kind: FeatureKind,
        exit_wall: u8,
        rng: &mut R,
    ) -> Placement {
        let (mut x, mut y, mut length, mut width) = (x, y, length, width);
        // Negative dims encode corridor heading; shift the origin so dims
        // are positive with (x, y) the top-left corner.
        if length < 0 {
            y += length + 1;
            length = -length;
        }
        if width < 0 {
            x += width + 1;
            width = -width;
        }
        if kind == FeatureKind::Room {
            if exit_wall == 0 || exit_wall == 2 {
                x -= rng.gen_range(0..width);
            } else {
                y -= rng.gen_range(0..length);
            }
        }

        if width + x + 1 > self.width - 1 || length + y + 1 > self.height || x < 1 || y < 1 {
            return Placement::Invalid;
        }

        let mut clean = true;
        for j in 0..length {
            for k in 0..width {
                if self.tile(x + k, y + j) != Some(Tile::Rock) {
                    clean = false;
                }
            }
        }
        if !clean {
            return Placement::Overlap;
        }

        self.features.push(Feature {
            l: length,
            w: width,
            x,
            y,
        });
        for j in 0..length + 2 {
            for k in 0..width + 2 {
                self.set_tile(x - 1 + k, y - 1 + j, Tile::Wall);
            }
        }
        for j in 0..length {
            for k in 0..width {
                self.set_tile(x + k, y + j, Tile::Floor);
            }
        }
        Placement::Clean
    }

    /// Picks a random wall cell of a feature as a doorway candidate.
    /// Returns (exit_x, exit_y, growth_x, growth_y, wall). The probe loop
    /// is bounded; features whose perimeter has been fully consumed by
    /// later carving simply yield no exit.
    fn make_exit<R: Rng>(&self, index: usize, rng: &mut R) -> Option<(i32, i32, i32, i32, u8)> {
        let f = self.features[index];
        for _ in 0..EXIT_PROBE_ATTEMPTS {
            let (rx, ry, rx2, ry2, wall) = match rng.gen_range(0..4u8) {
                0 => {
                    // North wall
                    let rx = rng.gen_range(0..f.w) + f.x;
                    let ry = f.y - 1;
                    (rx, ry, rx, ry - 1, 0)
                }
                1 => {
                    // East wall
                    let ry = rng.gen_range(0..f.l) + f.y;
                    let rx = f.x + f.w;
                    (rx, ry, rx + 1, ry, 1)
                }
                2 => {
                    // South wall
                    let rx = rng.gen_range(0..f.w) + f.x;
                    let ry = f.y + f.l;
                    (rx, ry, rx, ry + 1, 2)
                }
                _ => {
                    // West wall
                    let ry = rng.gen_range(0..f.l) + f.y;
                    let rx = f.x - 1;
                    (rx, ry, rx - 1, ry, 3)
                }
            };
            if self.tile(rx, ry) == Some(Tile::Wall) {
                return Some((rx, ry, rx2, ry2, wall));
            }
        }
        None
    }

    /// Punches a doorway at (x, y). Flavor distribution: 9% secret, 15%
    /// closed, 35% open, 41% plain gap.
    fn make_portal<R: Rng>(&mut self, x: i32, y: i32, rng: &mut R) {
        let tile = match rng.gen_range(0..100) {
            91.. => Tile::Door(DoorKind::Secret),
            76.. => Tile::Door(DoorKind::Closed),
            41.. => Tile::Door(DoorKind::Open),
            _ => Tile::Floor,
        };
        self.set_tile(x, y, tile);
    }

    /// Probes up to three cells around a corridor's far endpoint and, if a
    /// probe lands on existing floor, sometimes carves a linking portal.
    /// This is what produces loops and alternate paths rather than a tree.
    fn join_corridor<R: Rng>(&mut self, corridor: CorridorRef, chance: u32, rng: &mut R) {
        let f = self.features[corridor.index];
        // The stored origin is the near end; recover the far endpoint.
        let (end_x, end_y) = if corridor.x != f.x || corridor.y != f.y {
            (corridor.x - (f.w - 1), corridor.y - (f.l - 1))
        } else {
            (corridor.x + (f.w - 1), corridor.y + (f.l - 1))
        };

        let mut probes: Vec<(i32, i32, i32, i32)> = Vec::with_capacity(3);
        let left = (end_x - 2, end_y, end_x - 1, end_y);
        let up = (end_x, end_y - 2, end_x, end_y - 1);
        let right = (end_x + 2, end_y, end_x + 1, end_y);
        let down = (end_x, end_y + 2, end_x, end_y + 1);
        let can_left = end_x > 1;
        let can_up = end_y > 1;
        let can_right = end_x < self.width - 2;
        let can_down = end_y < self.height - 2;
        match corridor.heading {
            0 => {
                if can_left {
                    probes.push(left);
                }
                if can_up {
                    probes.push(up);
                }
                if can_right {
                    probes.push(right);
                }
            }
            1 => {
                if can_up {
                    probes.push(up);
                }
                if can_right {
                    probes.push(right);
                }
                if can_down {
                    probes.push(down);
                }
            }
            2 => {
                if can_right {
                    probes.push(right);
                }
                if can_down {
                    probes.push(down);
                }
                if can_left {
                    probes.push(left);
                }
            }
            _ => {
                if can_left {
                    probes.push(left);
                }
                if can_up {
                    probes.push(up);
                }
                if can_down {
                    probes.push(down);
                }
            }
        }

        for (check_x, check_y, portal_x, portal_y) in probes {
            if self.tile(check_x, check_y) == Some(Tile::Floor) && rng.gen_range(0..100u32) < chance
            {
                self.make_portal(portal_x, portal_y, rng);
            }
        }
    }

    /// Second joining sweep over every corridor, at long odds.
    fn final_joins<R: Rng>(&mut self, rng: &mut R) {
        for corridor in self.corridors.clone() {
            self.join_corridor(corridor, 10, rng);
        }
    }

    /// Door variants are flavor only; gameplay sees plain floor.
    fn normalize_doors(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                if matches!(self.tile(x, y), Some(Tile::Door(_))) {
                    self.set_tile(x, y, Tile::Floor);
                }
            }
        }
    }

    /// Hard connectivity guarantee: flood-fill floor components and stitch
    /// stragglers to the main region with L-shaped corridors until exactly
    /// one component remains.
    fn ensure_connectivity(&mut self) {
        let mut components = self.floor_components();
        if components.len() <= 1 {
            return;
        }

        let main_index = components
            .iter()
            .enumerate()
            .max_by_key(|(_, c)| c.len())
            .map(|(i, _)| i)
            .unwrap_or(0);
        let mut main = components.swap_remove(main_index);

        for component in components {
            let (a, b) = nearest_cells(&main, &component);
            self.carve_l_corridor(a, b);
            main.extend(component);
        }
    }

    /// Floor-connected components in deterministic scan order.
    fn floor_components(&self) -> Vec<Vec<(i32, i32)>> {
        let mut visited = vec![false; (self.width * self.height) as usize];
        let mut components = Vec::new();
        let at = |x: i32, y: i32| (y * self.width + x) as usize;

        for y in 0..self.height {
            for x in 0..self.width {
                if self.tile(x, y) != Some(Tile::Floor) || visited[at(x, y)] {
                    continue;
                }
                let mut stack = vec![(x, y)];
                let mut component = Vec::new();
                visited[at(x, y)] = true;
                while let Some((cx, cy)) = stack.pop() {
                    component.push((cx, cy));
                    for (nx, ny) in [(cx + 1, cy), (cx - 1, cy), (cx, cy + 1), (cx, cy - 1)] {
                        if !self.grid.in_bounds(nx, ny)
                            || self.tile(nx, ny) != Some(Tile::Floor)
                            || visited[at(nx, ny)]
                        {
                            continue;
                        }
                        visited[at(nx, ny)] = true;
                        stack.push((nx, ny));
                    }
                }
                components.push(component);
            }
        }
        components
    }

    /// Horizontal run, then vertical run, all floor.
    fn carve_l_corridor(&mut self, start: (i32, i32), end: (i32, i32)) {
        let (sx, sy) = start;
        let (ex, ey) = end;

        let mut x = sx;
        while x != ex {
            self.set_tile(x, sy, Tile::Floor);
            x += if ex > x { 1 } else { -1 };
        }
        self.set_tile(ex, sy, Tile::Floor);

        let mut y = sy;
        while y != ey {
            self.set_tile(ex, y, Tile::Floor);
            y += if ey > y { 1 } else { -1 };
        }
        self.set_tile(ex, ey, Tile::Floor);
    }
}

/// Closest pair between two components by Manhattan distance, brute force.
/// Component sizes are bounded by the grid area, which keeps this cheap at
/// dungeon scale.
fn nearest_cells(a: &[(i32, i32)], b: &[(i32, i32)]) -> ((i32, i32), (i32, i32)) {
    let mut best = (a[0], b[0]);
    let mut best_dist = i32::MAX;
    for &(ax, ay) in a {
        for &(bx, by) in b {
            let dist = (ax - bx).abs() + (ay - by).abs();
            if dist < best_dist {
                best_dist = dist;
                best = ((ax, ay), (bx, by));
            }
        }
    }
    best
}

/// Random room footprint, 3-10 cells per side.
fn make_room<R: Rng>(rng: &mut R) -> (i32, i32) {
    (rng.gen_range(0..8) + 3, rng.gen_range(0..8) + 3)
}

/// Random corridor: length 3-20 in one of four headings, encoded as signed
/// (width, length) the same way rooms are.
fn make_corridor<R: Rng>(rng: &mut R) -> (i32, i32, FeatureKind) {
    let length = rng.gen_range(0..18) + 3;
    let heading = rng.gen_range(0..4u8);
    match heading {
        0 => (1, -length, FeatureKind::Corridor(0)),
        1 => (length, 1, FeatureKind::Corridor(1)),
        2 => (1, length, FeatureKind::Corridor(2)),
        _ => (-length, 1, FeatureKind::Corridor(3)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn flood_count(grid: &TileGrid) -> usize {
        let mut components = 0;
        let mut visited = vec![false; grid.width() * grid.height()];
        for start_y in 0..grid.height() {
            for start_x in 0..grid.width() {
                if grid.get(start_x, start_y) != Tile::Floor || visited[start_y * grid.width() + start_x]
                {
                    continue;
                }
                components += 1;
                let mut stack = vec![(start_x as i32, start_y as i32)];
                visited[start_y * grid.width() + start_x] = true;
                while let Some((x, y)) = stack.pop() {
                    for (nx, ny) in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
                        if grid.in_bounds(nx, ny)
                            && grid.get(nx as usize, ny as usize) == Tile::Floor
                            && !visited[ny as usize * grid.width() + nx as usize]
                        {
                            visited[ny as usize * grid.width() + nx as usize] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }
        }
        components
    }

    #[test]
    fn test_generate_single_component_across_seeds() {
        for seed in 0..40 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = generate(&GeneratorParams::default(), &mut rng).unwrap();
            assert!(grid.floor_count() > 0, "seed {} produced no floor", seed);
            assert_eq!(flood_count(&grid), 1, "seed {} disconnected", seed);
        }
    }

    #[test]
    fn test_generate_is_deterministic_for_a_seed() {
        let params = GeneratorParams {
            width: 24,
            height: 12,
            fail_limit: 110,
            corridor_percent: 50,
            max_rooms: 60,
        };
        let grid_a = generate(&params, &mut ChaCha8Rng::seed_from_u64(1234)).unwrap();
        let grid_b = generate(&params, &mut ChaCha8Rng::seed_from_u64(1234)).unwrap();
        assert_eq!(grid_a, grid_b);

        let grid_c = generate(&params, &mut ChaCha8Rng::seed_from_u64(1235)).unwrap();
        assert_ne!(grid_a, grid_c, "different seeds should diverge");
    }

    #[test]
    fn test_generate_rejects_tiny_grids() {
        let params = GeneratorParams {
            width: 8,
            height: 8,
            ..GeneratorParams::default()
        };
        let err = generate(&params, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, MapError::GridTooSmall { .. }));
    }

    #[test]
    fn test_generated_grid_has_no_door_tiles() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let grid = generate(&GeneratorParams::default(), &mut rng).unwrap();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                assert!(!matches!(grid.get(x, y), Tile::Door(_)));
            }
        }
    }

    #[test]
    fn test_border_stays_unwalkable() {
        // The placement bounds keep carving off the outer border except for
        // the connectivity stitch, which only runs between interior floor.
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grid = generate(&GeneratorParams::default(), &mut rng).unwrap();
        for x in 0..grid.width() {
            assert_ne!(grid.get(x, 0), Tile::Floor);
            assert_ne!(grid.get(x, grid.height() - 1), Tile::Floor);
        }
        for y in 0..grid.height() {
            assert_ne!(grid.get(0, y), Tile::Floor);
        }
    }

    #[test]
    fn test_random_floor_tile_always_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let grid = generate(&GeneratorParams::default(), &mut rng).unwrap();
        for _ in 0..1000 {
            let (x, y) = grid.random_floor_tile(&mut rng);
            assert_eq!(grid.get(x, y), Tile::Floor);
        }
    }
}
