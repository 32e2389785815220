//! Monster instances and depth-based scaling.
//!
//! Monsters are stamped from read-only catalog templates, scaled by the
//! difficulty tier derived from the current dungeon depth, and dropped at
//! the end of the encounter.

use rand::Rng;

use crate::catalog::MonsterTemplate;
use crate::core::constants::*;

/// A live combatant instantiated from a template. Destroyed when the
/// encounter ends.
#[derive(Debug, Clone)]
pub struct Monster {
    pub name: String,
    pub hp: i32,
    pub strength: i32,
    pub defense: i32,
    pub speed: i32,
    pub xp_reward: u32,
    pub gold_reward: u32,
}

impl Monster {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Difficulty tier for a dungeon depth: one step every five levels.
pub fn difficulty_tier(depth: u32) -> u32 {
    depth.saturating_sub(1) / DEPTHS_PER_TIER
}

fn scaled(base: i32, factor: f64) -> i32 {
    ((base as f64 * factor).round() as i32).max(1)
}

/// Picks an encounter template. Slimes are deliberately under-weighted so
/// the starter monster thins out as the catalog grows.
pub fn pick_template<'a, R: Rng>(templates: &'a [MonsterTemplate], rng: &mut R) -> &'a MonsterTemplate {
    let total: u32 = templates.iter().map(template_weight).sum();
    let mut roll = rng.gen_range(0..total);
    for template in templates {
        let weight = template_weight(template);
        if roll < weight {
            return template;
        }
        roll -= weight;
    }
    // Unreachable while total == sum of weights; keep the last as a guard.
    templates.last().expect("catalog validated non-empty")
}

fn template_weight(template: &MonsterTemplate) -> u32 {
    if template.name.to_lowercase().contains("slime") {
        1
    } else {
        3
    }
}

/// Stamps a roaming encounter from a template, scaled by depth tier.
pub fn spawn_encounter(template: &MonsterTemplate, depth: u32) -> Monster {
    let tier = difficulty_tier(depth) as f64;
    Monster {
        name: template.name.clone(),
        hp: scaled(template.hp, ENCOUNTER_HP_SCALE * (1.0 + ENCOUNTER_HP_TIER_STEP * tier)),
        strength: scaled(template.strength, 1.0 + ENCOUNTER_STR_TIER_STEP * tier),
        defense: template.defense,
        speed: template.speed,
        xp_reward: template.xp_reward,
        gold_reward: template.gold_reward,
    }
}

/// Stamps the depth boss: the toughest template (by hp + 3 * strength),
/// inflated across every stat, with doubled rewards.
pub fn spawn_boss(templates: &[MonsterTemplate], depth: u32) -> Monster {
    let template = templates
        .iter()
        .max_by_key(|t| t.hp + t.strength * 3)
        .expect("catalog validated non-empty");
    let tier = difficulty_tier(depth) as f64;
    Monster {
        name: format!("Boss {}", template.name),
        hp: scaled(template.hp, BOSS_HP_SCALE * (1.0 + BOSS_HP_TIER_STEP * tier)),
        strength: scaled(template.strength, 1.0 + BOSS_STR_TIER_STEP * tier),
        defense: scaled(template.defense, 1.0 + BOSS_DEF_TIER_STEP * tier),
        speed: scaled(template.speed, 1.0 + BOSS_SPD_TIER_STEP * tier),
        xp_reward: ((template.xp_reward as f64 * BOSS_REWARD_SCALE).round() as u32).max(1),
        gold_reward: ((template.gold_reward as f64 * BOSS_REWARD_SCALE).round() as u32).max(1),
    }
}
