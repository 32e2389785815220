//! Real-time training minigames: Archer, Warrior, Meditation.
//!
//! All three share one fixed-timestep loop shape: drain pending input,
//! advance the simulation by a clamped wall-clock delta, present a frame,
//! and sleep out the rest of the ~1/60s budget. The shared runner owns
//! that control flow; each kernel only provides update/input/frame hooks
//! and builds its outcome when the loop ends.

pub mod archer;
pub mod meditation;
pub mod warrior;

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::core::constants::{FRAME_SECONDS, MAX_FRAME_DELTA};
use crate::input::{is_cancel, InputSource, Key};
use crate::player::{ClassKind, Player};
use crate::render::{FrameDescription, FrameSink};

pub use archer::{ArcherKernel, ArcherOutcome};
pub use meditation::{MeditationKernel, MeditationOutcome};
pub use warrior::{WarriorKernel, WarriorOutcome};

/// The input alphabet the kernels understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelInput {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Quit,
}

/// Maps a raw key to a kernel input. Unbound keys are dropped.
pub fn kernel_input(key: Key) -> Option<KernelInput> {
    if is_cancel(key) {
        return Some(KernelInput::Quit);
    }
    match crate::input::movement_delta(key) {
        Some((0, -1)) => Some(KernelInput::Up),
        Some((0, 1)) => Some(KernelInput::Down),
        Some((-1, 0)) => Some(KernelInput::Left),
        Some((1, 0)) => Some(KernelInput::Right),
        _ => match key {
            Key::Space => Some(KernelInput::Fire),
            _ => None,
        },
    }
}

/// Why a kernel stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The fixed session duration elapsed (Archer only).
    TimeUp,
    /// Focus or stamina hit zero. Expected, not an error.
    ResourceEmpty,
    /// The player bailed out; rewards are scaled down, not zeroed.
    Quit,
}

/// One kernel's simulation hooks. The runner drives these; the kernel never
/// touches the terminal, the clock, or the player.
pub trait TrainingKernel {
    type Outcome: TrainingOutcome;

    fn apply_input(&mut self, input: KernelInput, now: f64);
    fn update<R: Rng>(&mut self, dt: f64, now: f64, rng: &mut R);
    /// Pure function of state and `now`; `now` feeds flash effects only.
    fn frame(&self, now: f64) -> FrameDescription;
    fn end_reason(&self) -> Option<EndReason>;
    fn finish<R: Rng>(self, reason: EndReason, rng: &mut R) -> Self::Outcome;
}

/// The deltas a finished session hands back to the caller. Kernels never
/// mutate the player themselves.
#[derive(Debug, Clone)]
pub struct TrainingReward {
    pub xp_gain: u32,
    pub hp_cost: i32,
    pub strength_gain: i32,
    pub defense_gain: i32,
    pub speed_gain: i32,
    pub summary: String,
}

pub trait TrainingOutcome {
    fn reward(&self) -> TrainingReward;
}

/// Applies a reward to the player. The HP cost floors at 1 HP - training
/// wears you down but never kills you. Returns the status message and
/// whether the XP crossed a level.
pub fn apply_reward(player: &mut Player, reward: &TrainingReward) -> (String, bool) {
    player.hp = (player.hp - reward.hp_cost).max(1);
    player.strength += reward.strength_gain;
    player.defense += reward.defense_gain;
    player.speed += reward.speed_gain;
    let leveled = player.gain_xp(reward.xp_gain);
    let mut message = reward.summary.clone();
    if leveled {
        message.push_str(" | LEVEL UP");
    }
    (message, leveled)
}

/// The class decides which drill the trainer runs.
pub fn training_hint(class: ClassKind) -> &'static str {
    match class {
        ClassKind::Warrior => "Warrior Training: W(up) S(down) A(left) D(right) to parry incoming strikes.",
        ClassKind::Mage => "Mage Training: move @ with W/A/S/D, avoid x/o, preserve Focus, Q to exit.",
        ClassKind::Archer => "Archer Training: W/S move, hold/release SPACE to shoot right, hit moving o targets.",
    }
}

/// Fixed-timestep loop: poll-drain input, clamped-dt update, render, sleep.
/// Quit flags raised by input are honored at the next end-reason check.
pub fn run_kernel<K, R, I, S>(
    mut kernel: K,
    rng: &mut R,
    input: &mut I,
    sink: &mut S,
) -> io::Result<K::Outcome>
where
    K: TrainingKernel,
    R: Rng,
    I: InputSource,
    S: FrameSink,
{
    let start = Instant::now();
    let mut last = 0.0_f64;
    loop {
        let now = start.elapsed().as_secs_f64();
        let dt = (now - last).min(MAX_FRAME_DELTA);
        last = now;

        while let Some(key) = input.poll()? {
            if let Some(mapped) = kernel_input(key) {
                kernel.apply_input(mapped, now);
            }
        }

        kernel.update(dt, now, rng);
        sink.present(&kernel.frame(now))?;

        if let Some(reason) = kernel.end_reason() {
            return Ok(kernel.finish(reason, rng));
        }

        let spent = start.elapsed().as_secs_f64() - now;
        if spent < FRAME_SECONDS {
            thread::sleep(Duration::from_secs_f64(FRAME_SECONDS - spent));
        }
    }
}

/// Drives a kernel without a terminal or a clock: fixed dt per tick, input
/// script applied at given ticks. Test harness for the kernels' real-time
/// behavior.
#[cfg(test)]
pub(crate) fn run_scripted<K: TrainingKernel, R: Rng>(
    kernel: &mut K,
    rng: &mut R,
    dt: f64,
    ticks: u32,
    mut script: Vec<(u32, KernelInput)>,
) -> Option<EndReason> {
    script.sort_by_key(|(tick, _)| *tick);
    for tick in 0..ticks {
        let now = dt * tick as f64;
        while let Some(&(at, input)) = script.first() {
            if at != tick {
                break;
            }
            kernel.apply_input(input, now);
            script.remove(0);
        }
        kernel.update(dt, now, rng);
        if let Some(reason) = kernel.end_reason() {
            return Some(reason);
        }
    }
    None
}
