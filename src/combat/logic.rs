//! Round resolution and damage formulas.

use rand::Rng;

use crate::catalog::Skill;
use crate::core::constants::*;
use crate::player::{ClassKind, Player};

use super::types::*;

/// Player-side damage: tight variance, a 15% crit rider, and mitigation by
/// half the defender's defense. Never below 1.
pub fn roll_player_damage<R: Rng>(
    rng: &mut R,
    strength: i32,
    defense: i32,
    bonus: i32,
) -> (i32, bool) {
    let crit = rng.gen::<f64>() < PLAYER_CRIT_CHANCE;
    let variance = rng.gen_range(-1..=4);
    let raw = strength + bonus + variance + if crit { PLAYER_CRIT_BONUS } else { 0 };
    ((raw - defense / 2).max(1), crit)
}

/// Monster-side damage: wilder variance, mitigation by a third of defense -
/// monsters hit harder but less precisely. Never below 1. Also returns the
/// raw variance so the log can flag heavy and glancing swings.
pub fn roll_monster_damage<R: Rng>(rng: &mut R, strength: i32, defense: i32) -> (i32, i32) {
    let wild = rng.gen_range(-4..=6);
    ((strength + wild - defense / 3).max(1), wild)
}

fn note_for_wild(wild: i32) -> AttackNote {
    if wild >= 5 {
        AttackNote::HeavyBlow
    } else if wild <= -3 {
        AttackNote::GlancingHit
    } else {
        AttackNote::Plain
    }
}

impl Encounter {
    /// Resolves one full round for the chosen player action. Both
    /// combatants act in speed order, ties going to the player; a combatant
    /// dropped to zero HP ends the round immediately, skipping any pending
    /// action. Returns the round's events in resolution order.
    pub fn resolve_round<R: Rng>(
        &mut self,
        player: &mut Player,
        skills: &[Skill],
        action: CombatAction,
        rng: &mut R,
    ) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        if self.is_over() {
            return events;
        }

        let player_first = player.speed >= self.monster.speed;
        if player_first {
            let fled = self.player_turn(player, skills, action, rng, &mut events);
            if fled {
                self.phase = CombatPhase::Finished(CombatOutcome::Fled);
                return events;
            }
            if !self.monster.is_alive() {
                self.finish_victory(player);
                return events;
            }
            self.monster_turn(player, rng, &mut events);
            if !player.is_alive() {
                self.phase = CombatPhase::Finished(CombatOutcome::Defeat);
            }
        } else {
            self.monster_turn(player, rng, &mut events);
            if !player.is_alive() {
                self.phase = CombatPhase::Finished(CombatOutcome::Defeat);
                return events;
            }
            let fled = self.player_turn(player, skills, action, rng, &mut events);
            if fled {
                self.phase = CombatPhase::Finished(CombatOutcome::Fled);
                return events;
            }
            if !self.monster.is_alive() {
                self.finish_victory(player);
            }
        }
        events
    }

    /// Executes the player action. Returns true if the player escaped.
    fn player_turn<R: Rng>(
        &mut self,
        player: &mut Player,
        skills: &[Skill],
        action: CombatAction,
        rng: &mut R,
        events: &mut Vec<CombatEvent>,
    ) -> bool {
        match action {
            CombatAction::Attack => {
                let (damage, crit) =
                    roll_player_damage(rng, player.strength, self.monster.defense, 0);
                self.monster.hp -= damage;
                events.push(CombatEvent::PlayerAttack { damage, crit });
            }
            CombatAction::Skill => {
                if skills.is_empty() {
                    // Catalog validation makes this unreachable in play;
                    // treat a bare list as a plain attack.
                    let (damage, crit) =
                        roll_player_damage(rng, player.strength, self.monster.defense, 0);
                    self.monster.hp -= damage;
                    events.push(CombatEvent::PlayerAttack { damage, crit });
                    return false;
                }
                let skill = &skills[rng.gen_range(0..skills.len())];
                let gated = player.class == ClassKind::Mage;
                if gated && !player.spend_mp(skill.mp_cost) {
                    events.push(CombatEvent::NotEnoughMp {
                        skill: skill.name.clone(),
                        cost: skill.mp_cost,
                    });
                } else if rng.gen::<f64>() <= skill.accuracy {
                    let (damage, crit) = roll_player_damage(
                        rng,
                        player.strength,
                        self.monster.defense,
                        skill.bonus_damage,
                    );
                    self.monster.hp -= damage;
                    events.push(CombatEvent::SkillHit {
                        skill: skill.name.clone(),
                        damage,
                        crit,
                    });
                } else {
                    events.push(CombatEvent::SkillMissed {
                        skill: skill.name.clone(),
                    });
                }
            }
            CombatAction::Item => {
                if player.potions > 0 {
                    player.potions -= 1;
                    let healed = player.heal(POTION_HEAL_AMOUNT);
                    events.push(CombatEvent::PotionUsed { healed });
                } else {
                    events.push(CombatEvent::NoPotions);
                }
            }
            CombatAction::Run => {
                if rng.gen::<f64>() < RUN_ESCAPE_CHANCE {
                    events.push(CombatEvent::Escaped);
                    return true;
                }
                events.push(CombatEvent::EscapeFailed);
            }
        }
        false
    }

    fn monster_turn<R: Rng>(
        &mut self,
        player: &mut Player,
        rng: &mut R,
        events: &mut Vec<CombatEvent>,
    ) {
        let (damage, wild) = roll_monster_damage(rng, self.monster.strength, player.defense);
        player.hp -= damage;
        events.push(CombatEvent::MonsterAttack {
            monster: self.monster.name.clone(),
            damage,
            note: note_for_wild(wild),
        });
    }

    fn finish_victory(&mut self, player: &mut Player) {
        let xp = self.monster.xp_reward;
        let gold = self.monster.gold_reward;
        let leveled = player.gain_xp(xp);
        player.gold += gold;
        self.phase = CombatPhase::Finished(CombatOutcome::Victory { xp, gold, leveled });
    }
}
