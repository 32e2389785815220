//! Archer kernel simulation: charge/release inference, target motion
//! patterns, collision resolution, and the session result.

use rand::Rng;

use crate::render::{Emphasis, FrameDescription, Gauge};
use crate::training::{EndReason, KernelInput, TrainingKernel};

use super::types::*;

impl ArcherKernel {
    fn update_charge(&mut self, dt: f64, now: f64) {
        if !self.charging {
            return;
        }
        self.charge_power = (self.charge_power + dt * CHARGE_RATE).min(1.0);
        // Release is inferred: no repeat event inside the window means the
        // key came up.
        if now - self.last_fire_event > RELEASE_WINDOW {
            self.fire_arrow();
            self.charging = false;
            self.charge_power = 0.0;
        }
    }

    fn fire_arrow(&mut self) {
        if self.shot_cooldown > 0.0 {
            return;
        }
        let charged = self.charge_power >= CHARGED_THRESHOLD;
        let speed = 16.0 + self.charge_power * 10.0;
        // Charged shots cut the wind drift roughly in half.
        let vy = self.wind * if charged { 0.55 } else { 1.0 };
        self.arrows.push(Arrow {
            x: (ARCHER_COLUMN + 1) as f64,
            y: self.archer_y as f64,
            vx: speed,
            vy,
            charged,
        });
        self.shot_cooldown = 0.12 + self.charge_power * 0.28;
        if charged {
            self.focus = (self.focus - 1).max(0);
        }
    }

    fn update_difficulty<R: Rng>(&mut self, now: f64, rng: &mut R) {
        self.wind = if self.elapsed > 18.0 {
            0.18 * if (now * 1.7) as i64 % 2 == 0 { 1.0 } else { -1.0 }
        } else {
            0.0
        };
        let interval = (0.95 - self.elapsed * 0.012).max(0.34);
        while self.spawn_timer >= interval {
            self.spawn_timer -= interval;
            self.spawn_target(now, rng);
        }
    }

    fn spawn_target<R: Rng>(&mut self, now: f64, rng: &mut R) {
        let mut speed = 4.8 + (self.elapsed * 0.10).min(5.8);
        if self.eagle_eye_active(now) {
            speed *= 0.72;
        }
        let y = rng.gen_range(2.0..self.arena_h as f64 - 3.0);
        let pattern_roll: f64 = rng.gen();
        let (pattern, amplitude) = if pattern_roll < 0.45 {
            (TargetPattern::Straight, 0.0)
        } else if pattern_roll < 0.80 {
            (TargetPattern::Drift, rng.gen_range(0.6..1.4))
        } else {
            (TargetPattern::Zigzag, rng.gen_range(1.0..2.2))
        };
        let fake = self.elapsed > 20.0
            && rng.gen::<f64>() < (0.05 + self.elapsed * 0.003).min(0.22);
        let small = self.elapsed > 26.0 && rng.gen::<f64>() < 0.25;
        self.targets.push(Target {
            x: (self.arena_w - 2) as f64,
            y,
            vx: -speed,
            base_y: y,
            pattern,
            phase: rng.gen_range(0.0..6.28),
            amplitude,
            fake,
            small,
        });
    }

    fn update_targets(&mut self, dt: f64, now: f64) {
        let eagle = self.eagle_eye_active(now);
        let max_y = self.arena_h as f64 - 2.0;
        for target in &mut self.targets {
            target.x += target.vx * dt;
            target.phase += dt * 5.0;
            match target.pattern {
                TargetPattern::Zigzag => {
                    let side = if (target.phase * 2.0) as i64 % 2 == 0 { 1.0 } else { -1.0 };
                    target.y = target.base_y + target.amplitude * side;
                }
                TargetPattern::Drift => {
                    let step = if target.phase as i64 % 2 == 0 { 0.35 } else { -0.35 };
                    target.y += step * dt * 8.0;
                }
                TargetPattern::Straight => {}
            }
            if eagle {
                // Eagle eye pushes live targets back, buying time.
                target.x += target.vx.abs() * dt * 0.28;
            }
            target.y = target.y.clamp(1.0, max_y);
        }
    }

    fn update_arrows(&mut self, dt: f64) {
        for arrow in &mut self.arrows {
            arrow.x += arrow.vx * dt;
            arrow.y += arrow.vy * dt;
        }
    }

    /// First-match-wins collision pass: each arrow and target is consumed
    /// at most once per tick.
    fn resolve_collisions(&mut self, now: f64) {
        let mut arrow_used = vec![false; self.arrows.len()];
        let mut target_used = vec![false; self.targets.len()];

        for ai in 0..self.arrows.len() {
            let arrow = self.arrows[ai];
            for ti in 0..self.targets.len() {
                if target_used[ti] {
                    continue;
                }
                let target = self.targets[ti];
                let tolerance_x = if target.small {
                    HIT_TOLERANCE_X_SMALL
                } else {
                    HIT_TOLERANCE_X
                };
                if (arrow.x - target.x).abs() > tolerance_x
                    || (arrow.y - target.y).abs() > HIT_TOLERANCE_Y
                {
                    continue;
                }
                arrow_used[ai] = true;
                target_used[ti] = true;
                if target.fake {
                    self.focus -= 2;
                    self.combo = 0;
                    self.misses += 1;
                    self.flash_miss_until = now + 0.12;
                } else {
                    self.hits += 1;
                    self.combo += 1;
                    self.best_combo = self.best_combo.max(self.combo);
                    let mut points = 10
                        + if arrow.charged { 4 } else { 0 }
                        + (self.combo * 2).min(20);
                    if target.small {
                        points += 6;
                    }
                    self.score += points;
                    self.flash_hit_until = now + 0.10;
                    if self.combo >= EAGLE_EYE_COMBO {
                        self.eagle_eye_until = self.eagle_eye_until.max(now + EAGLE_EYE_SECONDS);
                    }
                }
                break;
            }
        }

        let mut ti = 0;
        self.targets.retain(|_| {
            let keep = !target_used[ti];
            ti += 1;
            keep
        });
        let mut ai = 0;
        self.arrows.retain(|_| {
            let keep = !arrow_used[ai];
            ai += 1;
            keep
        });
    }

    /// Arrows flying out of the arena are misses and bleed focus; targets
    /// that reached the left edge vanish quietly.
    fn clean_lists(&mut self) {
        let right_edge = (self.arena_w - 1) as f64;
        let bottom_edge = (self.arena_h - 1) as f64;
        let mut kept = Vec::with_capacity(self.arrows.len());
        for arrow in self.arrows.drain(..) {
            if arrow.x > right_edge || arrow.y < 0.0 || arrow.y > bottom_edge {
                self.misses += 1;
                self.focus -= 1;
                self.combo = 0;
            } else {
                kept.push(arrow);
            }
        }
        self.arrows = kept;
        self.targets.retain(|t| t.x >= 1.0);
    }
}

impl TrainingKernel for ArcherKernel {
    type Outcome = ArcherOutcome;

    fn apply_input(&mut self, input: KernelInput, now: f64) {
        match input {
            KernelInput::Quit => self.quit_requested = true,
            KernelInput::Up => self.archer_y = (self.archer_y - 1).max(1),
            KernelInput::Down => self.archer_y = (self.archer_y + 1).min(self.arena_h - 2),
            KernelInput::Fire => {
                self.last_fire_event = now;
                if !self.charging && self.shot_cooldown <= 0.0 {
                    self.charging = true;
                    self.charge_power = 0.0;
                }
            }
            KernelInput::Left | KernelInput::Right => {}
        }
    }

    fn update<R: Rng>(&mut self, dt: f64, now: f64, rng: &mut R) {
        if dt <= 0.0 {
            return;
        }
        self.elapsed += dt;
        self.shot_cooldown = (self.shot_cooldown - dt).max(0.0);
        self.spawn_timer += dt;

        self.update_charge(dt, now);
        self.update_difficulty(now, rng);
        self.update_targets(dt, now);
        self.update_arrows(dt);
        self.resolve_collisions(now);
        self.clean_lists();
    }

    fn frame(&self, now: f64) -> FrameDescription {
        let mut frame =
            FrameDescription::new("ARCHER PRECISION TRAINING", self.arena_w as usize, self.arena_h as usize);

        let archer_emphasis = if now < self.flash_hit_until {
            Emphasis::Good
        } else if now < self.flash_miss_until {
            Emphasis::Alert
        } else {
            Emphasis::Bold
        };
        frame.put(ARCHER_COLUMN as usize, self.archer_y as usize, 'A', archer_emphasis);

        for arrow in &self.arrows {
            let emphasis = if arrow.charged { Emphasis::Accent } else { Emphasis::Normal };
            frame.put_f(arrow.x, arrow.y, '>', emphasis);
        }
        for target in &self.targets {
            let (glyph, emphasis) = if target.fake {
                ('*', Emphasis::Dim)
            } else if target.small {
                ('.', Emphasis::Good)
            } else {
                ('o', Emphasis::Good)
            };
            frame.put_f(target.x, target.y, glyph, emphasis);
        }

        frame.gauges.push(Gauge {
            label: "Focus",
            value: self.focus.max(0),
            max: FOCUS_START,
        });
        let charge_pct = if self.charging { (self.charge_power * 100.0) as i32 } else { 0 };
        frame.gauges.push(Gauge {
            label: "Charge",
            value: charge_pct,
            max: 100,
        });

        let shots = self.hits + self.misses;
        let accuracy = if shots > 0 {
            self.hits as f64 / shots as f64
        } else {
            1.0
        };
        frame.status.push(format!(
            "Score {}  Combo x{}  Hits {}  Misses {}",
            self.score, self.combo, self.hits, self.misses
        ));
        frame.status.push(format!(
            "Accuracy {:05.1}%  Eagle Eye {}  Wind {:+.2}",
            accuracy * 100.0,
            if self.eagle_eye_active(now) { "ON" } else { "OFF" },
            self.wind
        ));
        frame.footer = format!(
            "SPACE shoot/charge-release | Q/Esc end | Time {:04.1}s",
            (SESSION_SECONDS - self.elapsed).max(0.0)
        );
        frame
    }

    fn end_reason(&self) -> Option<EndReason> {
        if self.quit_requested {
            Some(EndReason::Quit)
        } else if self.focus <= 0 {
            Some(EndReason::ResourceEmpty)
        } else if self.elapsed >= SESSION_SECONDS {
            Some(EndReason::TimeUp)
        } else {
            None
        }
    }

    fn finish<R: Rng>(self, reason: EndReason, _rng: &mut R) -> ArcherOutcome {
        let shots = self.hits + self.misses;
        let accuracy = if shots > 0 {
            self.hits as f64 / shots as f64
        } else {
            0.0
        };
        let success = reason == EndReason::TimeUp && self.hits >= 14 && accuracy >= 0.45;
        let completion = if reason == EndReason::Quit { 0.70 } else { 1.0 };
        let base_xp = (20 + self.hits * 5 + self.best_combo * 3 + (self.elapsed * 1.1) as u32)
            .min(140);
        let mut xp_gain = ((base_xp as f64 * completion) as u32).max(1);
        if success {
            xp_gain += 12;
        }
        let hp_cost = (((2.0 + self.misses as f64 * 0.45) * completion) as i32).max(1);
        let speed_gain = if self.best_combo >= 7 { 1 } else { 0 };
        let summary = format!(
            "Archer Training score {} | Hits {} Misses {} Acc {:.1}% | +{} XP -{} HP{}",
            self.score,
            self.hits,
            self.misses,
            accuracy * 100.0,
            xp_gain,
            hp_cost,
            if speed_gain > 0 { " +1 SPD" } else { "" }
        );
        ArcherOutcome {
            score: self.score,
            hits: self.hits,
            misses: self.misses,
            best_combo: self.best_combo,
            accuracy,
            focus_remaining: self.focus.max(0),
            success,
            ended_by: reason,
            xp_gain,
            hp_cost,
            speed_gain,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::run_scripted;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f64 = 1.0 / 60.0;

    fn kernel() -> ArcherKernel {
        ArcherKernel::new(60, 16)
    }

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_vertical_movement_clamped() {
        let mut k = kernel();
        for _ in 0..100 {
            k.apply_input(KernelInput::Up, 0.0);
        }
        assert_eq!(k.archer_y, 1);
        for _ in 0..100 {
            k.apply_input(KernelInput::Down, 0.0);
        }
        assert_eq!(k.archer_y, k.arena_h - 2);
    }

    #[test]
    fn test_release_inferred_after_silence() {
        let mut k = kernel();
        let mut r = rng(1);
        // Hold fire for a few repeats, then stop pressing.
        k.apply_input(KernelInput::Fire, 0.0);
        assert!(k.charging);
        let mut now = 0.0;
        for _ in 0..4 {
            now += DT;
            k.apply_input(KernelInput::Fire, now);
            k.update(DT, now, &mut r);
        }
        assert!(k.charging, "repeats inside the window keep the charge");
        assert!(k.arrows.is_empty());

        // Silence beyond the window releases the shot.
        for _ in 0..10 {
            now += DT;
            k.update(DT, now, &mut r);
        }
        assert!(!k.charging);
        assert_eq!(k.arrows.len(), 1);
    }

    #[test]
    fn test_charged_shot_costs_focus_and_flies_faster() {
        let mut k = kernel();
        let mut r = rng(1);
        let mut now = 0.0;
        k.apply_input(KernelInput::Fire, now);
        // Hold long enough to cross the charged threshold (~0.4s at 1.4/s).
        for _ in 0..30 {
            now += DT;
            k.apply_input(KernelInput::Fire, now);
            k.update(DT, now, &mut r);
        }
        for _ in 0..10 {
            now += DT;
            k.update(DT, now, &mut r);
        }
        assert_eq!(k.arrows.len(), 1);
        assert!(k.arrows[0].charged);
        assert!(k.arrows[0].vx > 16.0);
        assert_eq!(k.focus, FOCUS_START - 1);
    }

    #[test]
    fn test_quick_tap_fires_uncharged() {
        let mut k = kernel();
        let mut r = rng(1);
        k.apply_input(KernelInput::Fire, 0.0);
        let mut now = 0.0;
        for _ in 0..10 {
            now += DT;
            k.update(DT, now, &mut r);
        }
        assert_eq!(k.arrows.len(), 1);
        assert!(!k.arrows[0].charged);
        assert_eq!(k.focus, FOCUS_START);
    }

    #[test]
    fn test_hit_scores_and_builds_combo() {
        let mut k = kernel();
        k.arrows.push(Arrow {
            x: 20.0,
            y: 8.0,
            vx: 16.0,
            vy: 0.0,
            charged: false,
        });
        k.targets.push(Target {
            x: 20.3,
            y: 8.2,
            vx: -5.0,
            base_y: 8.2,
            pattern: TargetPattern::Straight,
            phase: 0.0,
            amplitude: 0.0,
            fake: false,
            small: false,
        });
        k.resolve_collisions(1.0);
        assert_eq!(k.hits, 1);
        assert_eq!(k.combo, 1);
        assert_eq!(k.score, 12); // 10 base + min(20, 2)
        assert!(k.arrows.is_empty());
        assert!(k.targets.is_empty());
    }

    #[test]
    fn test_small_target_uses_tight_tolerance() {
        let mut k = kernel();
        k.arrows.push(Arrow {
            x: 20.0,
            y: 8.0,
            vx: 16.0,
            vy: 0.0,
            charged: false,
        });
        k.targets.push(Target {
            x: 20.5,
            y: 8.0,
            vx: -5.0,
            base_y: 8.0,
            pattern: TargetPattern::Straight,
            phase: 0.0,
            amplitude: 0.0,
            fake: false,
            small: true,
        });
        k.resolve_collisions(1.0);
        // 0.5 > 0.40 small tolerance: no hit.
        assert_eq!(k.hits, 0);
        assert_eq!(k.targets.len(), 1);
    }

    #[test]
    fn test_fake_target_penalizes_and_resets_combo() {
        let mut k = kernel();
        k.combo = 4;
        k.arrows.push(Arrow {
            x: 20.0,
            y: 8.0,
            vx: 16.0,
            vy: 0.0,
            charged: false,
        });
        k.targets.push(Target {
            x: 20.0,
            y: 8.0,
            vx: -5.0,
            base_y: 8.0,
            pattern: TargetPattern::Straight,
            phase: 0.0,
            amplitude: 0.0,
            fake: true,
            small: false,
        });
        k.resolve_collisions(1.0);
        assert_eq!(k.focus, FOCUS_START - 2);
        assert_eq!(k.combo, 0);
        assert_eq!(k.misses, 1);
    }

    #[test]
    fn test_combo_streak_grants_eagle_eye() {
        let mut k = kernel();
        k.combo = 4;
        k.arrows.push(Arrow {
            x: 20.0,
            y: 8.0,
            vx: 16.0,
            vy: 0.0,
            charged: false,
        });
        k.targets.push(Target {
            x: 20.0,
            y: 8.0,
            vx: -5.0,
            base_y: 8.0,
            pattern: TargetPattern::Straight,
            phase: 0.0,
            amplitude: 0.0,
            fake: false,
            small: false,
        });
        k.resolve_collisions(10.0);
        assert_eq!(k.combo, 5);
        assert!(k.eagle_eye_active(10.1));
        assert!(!k.eagle_eye_active(10.0 + EAGLE_EYE_SECONDS + 0.1));
    }

    #[test]
    fn test_stray_arrow_is_a_miss() {
        let mut k = kernel();
        k.arrows.push(Arrow {
            x: k.arena_w as f64,
            y: 8.0,
            vx: 16.0,
            vy: 0.0,
            charged: false,
        });
        k.clean_lists();
        assert_eq!(k.misses, 1);
        assert_eq!(k.focus, FOCUS_START - 1);
        assert!(k.arrows.is_empty());
    }

    #[test]
    fn test_session_ends_on_time() {
        let mut k = kernel();
        let mut r = rng(9);
        let ticks = (SESSION_SECONDS / DT) as u32 + 10;
        let reason = run_scripted(&mut k, &mut r, DT, ticks, Vec::new());
        assert_eq!(reason, Some(EndReason::TimeUp));
    }

    #[test]
    fn test_quit_scales_rewards_down() {
        let mut quit_kernel = kernel();
        quit_kernel.elapsed = 30.0;
        quit_kernel.hits = 10;
        quit_kernel.best_combo = 6;
        let mut full_kernel = quit_kernel.clone();

        let mut r = rng(1);
        let quit_outcome = quit_kernel.finish(EndReason::Quit, &mut r);
        let full_outcome = full_kernel.finish(EndReason::TimeUp, &mut r);
        assert!(quit_outcome.xp_gain < full_outcome.xp_gain);
        assert!(quit_outcome.xp_gain >= 1);
    }

    #[test]
    fn test_success_requires_time_up_and_accuracy() {
        let mut k = kernel();
        k.elapsed = SESSION_SECONDS;
        k.hits = 20;
        k.misses = 2;
        let mut r = rng(1);
        let outcome = k.clone().finish(EndReason::TimeUp, &mut r);
        assert!(outcome.success);

        let outcome = k.clone().finish(EndReason::Quit, &mut r);
        assert!(!outcome.success);

        k.hits = 5;
        k.misses = 20;
        let outcome = k.finish(EndReason::TimeUp, &mut r);
        assert!(!outcome.success);
    }
}
