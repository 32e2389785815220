//! Warrior kernel simulation: wave spawning, buffered blocks, parry
//! resolution, and the session result.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::render::{Emphasis, FrameDescription, Gauge};
use crate::training::{EndReason, KernelInput, TrainingKernel};

use super::types::*;

impl WarriorKernel {
    fn spawn_wave<R: Rng>(&mut self, rng: &mut R) {
        let base_speed = 6.0 + (self.elapsed * 0.12).min(8.0);
        let fake_chance = (0.08 + self.elapsed * 0.004).min(0.25);
        let mut wave = 1;
        if self.elapsed > 16.0 && rng.gen::<f64>() < 0.35 {
            wave += 1;
        }
        if self.elapsed > 34.0 && rng.gen::<f64>() < 0.22 {
            wave += 1;
        }

        let mut sources = AttackSource::ALL;
        sources.shuffle(rng);
        for &source in sources.iter().take(wave) {
            let fake = rng.gen::<f64>() < fake_chance;
            self.attacks.push(self.make_attack(source, base_speed, fake));
        }
    }

    fn make_attack(&self, source: AttackSource, speed: f64, fake: bool) -> IncomingAttack {
        let (x, y, vx, vy) = match source {
            AttackSource::North => (self.center_x as f64, 1.0, 0.0, speed),
            AttackSource::South => (
                self.center_x as f64,
                (self.arena_h - 2) as f64,
                0.0,
                -speed,
            ),
            AttackSource::East => (
                (self.arena_w - 2) as f64,
                self.center_y as f64,
                -speed,
                0.0,
            ),
            AttackSource::West => (1.0, self.center_y as f64, speed, 0.0),
        };
        IncomingAttack {
            x,
            y,
            vx,
            vy,
            source,
            fake,
        }
    }

    /// Resolves every attack against the buffered block and the center.
    /// A matching block inside the catch window parries (or eats the feint
    /// penalty) and consumes the buffer; a real attack reaching the center
    /// unblocked lands heavily; feints reaching the center fizzle.
    fn resolve_attacks(&mut self, now: f64) {
        if self.buffered_block.is_some() && now - self.buffered_at > INPUT_BUFFER_SECONDS {
            self.buffered_block = None;
        }

        let center_x = self.center_x as f64;
        let center_y = self.center_y as f64;
        let mut keep = Vec::with_capacity(self.attacks.len());
        for attack in std::mem::take(&mut self.attacks) {
            let dist = (attack.x - center_x).abs() + (attack.y - center_y).abs();
            let in_window = dist <= CATCH_WINDOW;
            let at_center = dist <= CENTER_WINDOW;

            if in_window && self.buffered_block == Some(attack.source) {
                if attack.fake {
                    self.stamina -= FAKE_BLOCK_COST;
                    self.failures += 1;
                    self.flash_until = now + 0.10;
                } else {
                    self.stamina -= PARRY_COST;
                    self.parries += 1;
                    self.parry_flash_until = now + 0.11;
                }
                self.buffered_block = None;
                continue;
            }

            if at_center {
                if !attack.fake {
                    self.stamina -= CENTER_HIT_COST;
                    self.failures += 1;
                    self.flash_until = now + 0.18;
                }
                continue;
            }
            keep.push(attack);
        }
        self.attacks = keep;
    }

}

impl TrainingKernel for WarriorKernel {
    type Outcome = WarriorOutcome;

    fn apply_input(&mut self, input: KernelInput, now: f64) {
        let source = match input {
            KernelInput::Quit => {
                self.quit_requested = true;
                return;
            }
            KernelInput::Up => AttackSource::North,
            KernelInput::Down => AttackSource::South,
            KernelInput::Left => AttackSource::West,
            KernelInput::Right => AttackSource::East,
            KernelInput::Fire => return,
        };
        self.buffered_block = Some(source);
        self.buffered_at = now;
    }

    fn update<R: Rng>(&mut self, dt: f64, now: f64, rng: &mut R) {
        if dt <= 0.0 {
            return;
        }
        self.elapsed += dt;
        self.spawn_timer += dt;

        let interval = (1.0 - (self.elapsed * 0.02).min(0.68)).max(0.32);
        while self.spawn_timer >= interval {
            self.spawn_timer -= interval;
            self.spawn_wave(rng);
        }

        for attack in &mut self.attacks {
            attack.x += attack.vx * dt;
            attack.y += attack.vy * dt;
        }

        self.resolve_attacks(now);
        let (max_x, max_y) = ((self.arena_w + 2) as f64, (self.arena_h + 2) as f64);
        self.attacks
            .retain(|a| a.x >= -2.0 && a.y >= -2.0 && a.x <= max_x && a.y <= max_y);
    }

    fn frame(&self, now: f64) -> FrameDescription {
        let mut frame = FrameDescription::new(
            "WARRIOR REFLEX TRAINING",
            self.arena_w as usize,
            self.arena_h as usize,
        );

        for attack in &self.attacks {
            let emphasis = if attack.fake { Emphasis::Dim } else { Emphasis::Alert };
            frame.put_f(attack.x, attack.y, attack.source.glyph(), emphasis);
        }

        let center_emphasis = if now < self.flash_until {
            Emphasis::Alert
        } else if now < self.parry_flash_until {
            Emphasis::Good
        } else {
            Emphasis::Bold
        };
        frame.put(self.center_x as usize, self.center_y as usize, 'W', center_emphasis);

        frame.gauges.push(Gauge {
            label: "Stamina",
            value: self.stamina.max(0),
            max: STAMINA_START,
        });
        frame.status.push(format!(
            "Time {:05.1}s  Parries {}  Misses {}",
            self.elapsed, self.parries, self.failures
        ));
        frame.footer =
            "Block by source: W(up) S(down) A(left) D(right) | Q/Esc exit".to_string();
        frame
    }

    fn end_reason(&self) -> Option<EndReason> {
        if self.quit_requested {
            Some(EndReason::Quit)
        } else if self.stamina <= 0 {
            Some(EndReason::ResourceEmpty)
        } else {
            None
        }
    }

    fn finish<R: Rng>(self, reason: EndReason, _rng: &mut R) -> WarriorOutcome {
        let completion = if reason == EndReason::Quit { 0.7 } else { 1.0 };
        let base_xp = (20 + (self.elapsed * 2.2) as u32 + self.parries * 2).min(120);
        let xp_gain = ((base_xp as f64 * completion) as u32).max(1);
        let hp_cost = (((2.0 + self.failures as f64 * 0.7) * completion) as i32).max(1);
        let mut strength_gain = 1;
        if self.parries >= 18 {
            strength_gain += 1;
        }
        let defense_gain = if self.parries >= 8 { 1 } else { 0 };
        let summary = format!(
            "Warrior Training {:.1}s | Parries {} Misses {} | +{} XP -{} HP +{} STR{}",
            self.elapsed,
            self.parries,
            self.failures,
            xp_gain,
            hp_cost,
            strength_gain,
            if defense_gain > 0 { " +1 DEF" } else { "" }
        );
        WarriorOutcome {
            survival_time: self.elapsed,
            stamina_remaining: self.stamina.max(0),
            ended_by: reason,
            parries: self.parries,
            failures: self.failures,
            xp_gain,
            hp_cost,
            strength_gain,
            defense_gain,
            summary,
        }
    }
}
