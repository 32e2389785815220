//! Combat data structures and the event stream rendered as the battle log.

use std::fmt;

use crate::monster::Monster;

/// The four player actions on the combat menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatAction {
    Attack,
    Skill,
    Item,
    Run,
}

impl CombatAction {
    pub const ALL: [CombatAction; 4] = [
        CombatAction::Attack,
        CombatAction::Skill,
        CombatAction::Item,
        CombatAction::Run,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CombatAction::Attack => "Attack",
            CombatAction::Skill => "Skill",
            CombatAction::Item => "Item",
            CombatAction::Run => "Run",
        }
    }
}

/// Flavor tag on a monster hit, derived from its variance roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackNote {
    Plain,
    HeavyBlow,
    GlancingHit,
}

/// Everything that can happen during a round, in resolution order. The
/// frontend renders these as log lines; tests assert on them directly.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    Opening { monster: String },
    PlayerAttack { damage: i32, crit: bool },
    SkillHit { skill: String, damage: i32, crit: bool },
    SkillMissed { skill: String },
    NotEnoughMp { skill: String, cost: i32 },
    PotionUsed { healed: i32 },
    NoPotions,
    Escaped,
    EscapeFailed,
    MonsterAttack { monster: String, damage: i32, note: AttackNote },
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::Opening { monster } => write!(f, "A wild {} appears.", monster),
            CombatEvent::PlayerAttack { damage, crit } => {
                write!(f, "You strike for {} damage.", damage)?;
                if *crit {
                    write!(f, " Critical strike!")?;
                }
                Ok(())
            }
            CombatEvent::SkillHit { skill, damage, crit } => {
                write!(f, "{} hits for {}.", skill, damage)?;
                if *crit {
                    write!(f, " Critical strike!")?;
                }
                Ok(())
            }
            CombatEvent::SkillMissed { skill } => write!(f, "{} missed.", skill),
            CombatEvent::NotEnoughMp { skill, cost } => {
                write!(f, "Not enough MP for {} ({} MP).", skill, cost)
            }
            CombatEvent::PotionUsed { healed } => write!(f, "Potion used. +{} HP.", healed),
            CombatEvent::NoPotions => write!(f, "No potions left."),
            CombatEvent::Escaped => write!(f, "You escaped the battle."),
            CombatEvent::EscapeFailed => write!(f, "Escape failed."),
            CombatEvent::MonsterAttack { monster, damage, note } => {
                write!(f, "{} hits you for {}.", monster, damage)?;
                match note {
                    AttackNote::HeavyBlow => write!(f, " Heavy blow!"),
                    AttackNote::GlancingHit => write!(f, " Glancing hit."),
                    AttackNote::Plain => Ok(()),
                }
            }
        }
    }
}

/// Terminal result of an encounter. Victory rewards are applied exactly
/// once, by the round that kills the monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    Victory { xp: u32, gold: u32, leveled: bool },
    Defeat,
    Fled,
}

/// Where the encounter stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatPhase {
    /// Waiting for the next player action.
    AwaitingAction,
    Finished(CombatOutcome),
}

/// One player-versus-monster encounter. Owns the monster instance; dropped
/// when combat ends.
#[derive(Debug, Clone)]
pub struct Encounter {
    pub monster: Monster,
    pub phase: CombatPhase,
}

impl Encounter {
    pub fn new(monster: Monster) -> Self {
        Self {
            monster,
            phase: CombatPhase::AwaitingAction,
        }
    }

    /// The opening log line.
    pub fn opening(&self) -> CombatEvent {
        CombatEvent::Opening {
            monster: self.monster.name.clone(),
        }
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        match self.phase {
            CombatPhase::Finished(outcome) => Some(outcome),
            CombatPhase::AwaitingAction => None,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, CombatPhase::Finished(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_lines() {
        let line = CombatEvent::PlayerAttack {
            damage: 12,
            crit: true,
        }
        .to_string();
        assert_eq!(line, "You strike for 12 damage. Critical strike!");

        let line = CombatEvent::MonsterAttack {
            monster: "Slime".to_string(),
            damage: 3,
            note: AttackNote::GlancingHit,
        }
        .to_string();
        assert_eq!(line, "Slime hits you for 3. Glancing hit.");
    }

    #[test]
    fn test_action_menu_order() {
        let labels: Vec<_> = CombatAction::ALL.iter().map(|a| a.label()).collect();
        assert_eq!(labels, ["Attack", "Skill", "Item", "Run"]);
    }
}
