//! Static catalog loading.
//!
//! Monster, skill, and potion templates plus opening flavor text are
//! read-only records loaded once per process from JSON files. Missing files,
//! malformed JSON, and out-of-range fields are configuration errors raised
//! at load time - the core never substitutes silent defaults.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CatalogError;
use crate::player::ClassKind;

/// Read-only monster template. Instances are stamped and scaled from these
/// by the encounter code.
#[derive(Debug, Clone, Deserialize)]
pub struct MonsterTemplate {
    pub name: String,
    pub hp: i32,
    pub strength: i32,
    pub defense: i32,
    pub speed: i32,
    pub xp_reward: u32,
    pub gold_reward: u32,
}

/// A class skill used by the combat Skill action.
#[derive(Debug, Clone, Deserialize)]
pub struct Skill {
    pub name: String,
    /// Hit chance in [0, 1].
    pub accuracy: f64,
    pub bonus_damage: i32,
    /// MP price; only gated for Mages.
    #[serde(default)]
    pub mp_cost: i32,
}

/// A market item granting potions.
#[derive(Debug, Clone, Deserialize)]
pub struct Potion {
    pub name: String,
    pub price: u32,
    pub stock_amount: u32,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct MonstersFile {
    monsters: Vec<MonsterTemplate>,
}

#[derive(Debug, Deserialize)]
struct PotionsFile {
    potions: Vec<Potion>,
}

#[derive(Debug, Deserialize)]
struct OpeningFile {
    opening_lines: Vec<String>,
}

/// All static data, loaded once and shared read-only for the whole session.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub monsters: Vec<MonsterTemplate>,
    skills: HashMap<String, Vec<Skill>>,
    pub potions: Vec<Potion>,
    pub opening_lines: Vec<String>,
}

impl Catalogs {
    /// Assembles catalogs from in-memory parts without validation. Meant
    /// for tests and custom wiring; `load` is the production path.
    pub fn from_parts(
        monsters: Vec<MonsterTemplate>,
        skills: HashMap<String, Vec<Skill>>,
        potions: Vec<Potion>,
        opening_lines: Vec<String>,
    ) -> Self {
        Self {
            monsters,
            skills,
            potions,
            opening_lines,
        }
    }

    /// Loads and validates every catalog from `dir`.
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        let monsters: MonstersFile = read_json(&dir.join("monsters.json"))?;
        let skills: HashMap<String, Vec<Skill>> = read_json(&dir.join("skills.json"))?;
        let potions: PotionsFile = read_json(&dir.join("potions.json"))?;
        let opening: OpeningFile = read_json(&dir.join("opening_text.json"))?;

        let catalogs = Self {
            monsters: monsters.monsters,
            skills,
            potions: potions.potions,
            opening_lines: opening.opening_lines,
        };
        catalogs.validate()?;
        Ok(catalogs)
    }

    /// Skills for a class. Presence of every class is validated at load,
    /// so this never comes back empty.
    pub fn skills_for(&self, class: ClassKind) -> &[Skill] {
        self.skills
            .get(class.name())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.monsters.is_empty() {
            return Err(CatalogError::Empty { name: "monsters" });
        }
        if self.potions.is_empty() {
            return Err(CatalogError::Empty { name: "potions" });
        }
        if self.opening_lines.is_empty() {
            return Err(CatalogError::Empty {
                name: "opening_text",
            });
        }

        for monster in &self.monsters {
            if monster.name.trim().is_empty() {
                return Err(invalid("monsters", &monster.name, "empty name"));
            }
            if monster.hp <= 0 {
                return Err(invalid("monsters", &monster.name, "hp must be positive"));
            }
            if monster.strength <= 0 || monster.speed <= 0 {
                return Err(invalid(
                    "monsters",
                    &monster.name,
                    "strength and speed must be positive",
                ));
            }
            if monster.defense < 0 {
                return Err(invalid("monsters", &monster.name, "negative defense"));
            }
        }

        for class in ClassKind::ALL {
            let skills = self
                .skills
                .get(class.name())
                .ok_or_else(|| CatalogError::MissingClass {
                    class: class.name().to_string(),
                })?;
            if skills.is_empty() {
                return Err(CatalogError::MissingClass {
                    class: class.name().to_string(),
                });
            }
            for skill in skills {
                if skill.name.trim().is_empty() {
                    return Err(invalid("skills", &skill.name, "empty name"));
                }
                if !(0.0..=1.0).contains(&skill.accuracy) {
                    return Err(invalid(
                        "skills",
                        &skill.name,
                        "accuracy outside [0, 1]",
                    ));
                }
                if skill.bonus_damage < 0 || skill.mp_cost < 0 {
                    return Err(invalid(
                        "skills",
                        &skill.name,
                        "negative bonus_damage or mp_cost",
                    ));
                }
            }
        }

        for potion in &self.potions {
            if potion.name.trim().is_empty() {
                return Err(invalid("potions", &potion.name, "empty name"));
            }
            if potion.stock_amount == 0 {
                return Err(invalid("potions", &potion.name, "zero stock_amount"));
            }
        }

        Ok(())
    }
}

fn invalid(catalog: &'static str, entry: &str, reason: &str) -> CatalogError {
    CatalogError::InvalidEntry {
        catalog,
        entry: entry.to_string(),
        reason: reason.to_string(),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: PathBuf::from(path),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
        path: PathBuf::from(path),
        source,
    })
}
