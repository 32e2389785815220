// Real-time frame timing
pub const FRAME_SECONDS: f64 = 1.0 / 60.0;
/// Wall-clock deltas above this are clamped to avoid catch-up spirals
/// after a stalled frame.
pub const MAX_FRAME_DELTA: f64 = 0.05;

// XP and leveling
pub const XP_PER_LEVEL_STEP: u32 = 100;
pub const LEVEL_UP_HP_GAIN: i32 = 8;
pub const LEVEL_UP_MP_GAIN: i32 = 2;
pub const LEVEL_UP_STRENGTH_GAIN: i32 = 2;
pub const LEVEL_UP_DEFENSE_GAIN: i32 = 1;
pub const LEVEL_UP_SPEED_GAIN: i32 = 1;

// Starting kit
pub const STARTING_GOLD: u32 = 20;
pub const STARTING_POTIONS: u32 = 1;
pub const POTION_HEAL_AMOUNT: i32 = 25;
pub const POTION_CAP: u32 = 9;

// Combat tuning
pub const PLAYER_CRIT_CHANCE: f64 = 0.15;
pub const PLAYER_CRIT_BONUS: i32 = 4;
pub const RUN_ESCAPE_CHANCE: f64 = 0.35;

// Dungeon pacing
pub const DUNGEON_WIDTH: usize = 46;
pub const DUNGEON_HEIGHT: usize = 22;
pub const DUNGEON_FAIL_LIMIT: u32 = 110;
pub const DUNGEON_CORRIDOR_PERCENT: u32 = 50;
pub const DUNGEON_MAX_ROOMS: usize = 60;
pub const DEPTHS_PER_TIER: u32 = 5;
pub const BOSS_DEPTH_INTERVAL: u32 = 5;

// Movement event thresholds (cumulative roll bands)
pub const EVENT_MONSTER_CHANCE: f64 = 0.10;
pub const EVENT_GOLD_CHANCE: f64 = 0.35;
pub const EVENT_POTION_CHANCE: f64 = 0.50;

// Encounter scaling per difficulty tier
pub const ENCOUNTER_HP_SCALE: f64 = 0.75;
pub const ENCOUNTER_HP_TIER_STEP: f64 = 0.15;
pub const ENCOUNTER_STR_TIER_STEP: f64 = 0.10;
pub const BOSS_HP_SCALE: f64 = 1.8;
pub const BOSS_HP_TIER_STEP: f64 = 0.18;
pub const BOSS_STR_TIER_STEP: f64 = 0.20;
pub const BOSS_DEF_TIER_STEP: f64 = 0.15;
pub const BOSS_SPD_TIER_STEP: f64 = 0.08;
pub const BOSS_REWARD_SCALE: f64 = 2.0;

// Dungeon loot
pub const TREASURE_COUNT_MIN: usize = 2;
pub const TREASURE_COUNT_MAX: usize = 4;
pub const TREASURE_PLACEMENT_ATTEMPTS: u32 = 220;
pub const BOSS_PLACEMENT_ATTEMPTS: u32 = 200;
pub const EXIT_GOLD_MIN: u32 = 10;
pub const EXIT_GOLD_MAX: u32 = 22;
pub const BOSS_BOUNTY_MIN: u32 = 25;
pub const BOSS_BOUNTY_MAX: u32 = 45;
pub const FLOOR_GOLD_MIN: u32 = 4;
pub const FLOOR_GOLD_MAX: u32 = 12;

// Generator retry budgets. The upstream algorithm gives no termination
// guarantee for these loops; exhausting a budget is a MapError (seed room)
// or falls back to a deterministic scan (floor sampling, exit probing).
pub const SEED_ROOM_ATTEMPTS: u32 = 500;
pub const EXIT_PROBE_ATTEMPTS: u32 = 100;
pub const FLOOR_SAMPLE_ATTEMPTS: u32 = 10_000;
