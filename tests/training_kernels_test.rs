//! Integration tests: real-time training kernels driven tick by tick with
//! a fixed timestep and a seeded generator.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use realms::player::{ClassKind, Player};
use realms::training::warrior::types::{
    AttackSource, IncomingAttack, CENTER_HIT_COST, FAKE_BLOCK_COST, PARRY_COST, STAMINA_START,
};
use realms::training::{
    apply_reward, ArcherKernel, EndReason, KernelInput, MeditationKernel, TrainingKernel,
    TrainingOutcome, WarriorKernel,
};

const DT: f64 = 1.0 / 60.0;

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Drives a kernel for up to `ticks` fixed steps, feeding scripted inputs.
fn drive<K: TrainingKernel>(
    kernel: &mut K,
    rng: &mut ChaCha8Rng,
    ticks: u32,
    script: &[(u32, KernelInput)],
) -> Option<EndReason> {
    for tick in 0..ticks {
        let now = DT * tick as f64;
        for (at, input) in script {
            if *at == tick {
                kernel.apply_input(*input, now);
            }
        }
        kernel.update(DT, now, rng);
        if let Some(reason) = kernel.end_reason() {
            return Some(reason);
        }
    }
    None
}

#[test]
fn test_warrior_buffered_block_registers_one_parry_at_parry_cost() {
    let mut kernel = WarriorKernel::new(44, 16);
    // One real attack closing from the east, a few cells out, and a block
    // pressed a few frames before it enters the catch window.
    kernel.attacks.push(IncomingAttack {
        x: kernel.center_x as f64 + 3.0,
        y: kernel.center_y as f64,
        vx: -20.0,
        vy: 0.0,
        source: AttackSource::East,
        fake: false,
    });
    kernel.apply_input(KernelInput::Right, 0.0);

    let mut r = rng(1);
    for tick in 0..8 {
        kernel.update(DT, DT * tick as f64, &mut r);
    }

    assert_eq!(kernel.parries, 1, "exactly one parry");
    assert_eq!(kernel.failures, 0);
    assert_eq!(kernel.stamina, STAMINA_START - PARRY_COST, "parry cost, not miss cost");
}

#[test]
fn test_warrior_expired_buffer_lets_the_hit_land() {
    let mut kernel = WarriorKernel::new(44, 16);
    kernel.attacks.push(IncomingAttack {
        x: kernel.center_x as f64 + 8.0,
        y: kernel.center_y as f64,
        vx: -10.0,
        vy: 0.0,
        source: AttackSource::East,
        fake: false,
    });
    // Block pressed immediately; the attack needs ~0.67s to get close, far
    // beyond the 0.18s buffer.
    kernel.apply_input(KernelInput::Right, 0.0);

    let mut r = rng(1);
    let mut tick = 0;
    while kernel.stamina == STAMINA_START && tick < 120 {
        kernel.update(DT, DT * tick as f64, &mut r);
        tick += 1;
    }
    assert_eq!(kernel.parries, 0);
    assert!(kernel.failures >= 1);
    assert!(kernel.stamina <= STAMINA_START - CENTER_HIT_COST);
}

#[test]
fn test_warrior_blocked_feint_costs_the_feint_penalty() {
    let mut kernel = WarriorKernel::new(44, 16);
    kernel.attacks.push(IncomingAttack {
        x: kernel.center_x as f64,
        y: kernel.center_y as f64 - 1.0,
        vx: 0.0,
        vy: 4.0,
        source: AttackSource::North,
        fake: true,
    });
    kernel.apply_input(KernelInput::Up, 0.0);

    let mut r = rng(1);
    kernel.update(DT, 0.0, &mut r);

    assert_eq!(kernel.parries, 0);
    assert_eq!(kernel.failures, 1);
    assert_eq!(kernel.stamina, STAMINA_START - FAKE_BLOCK_COST);
}

#[test]
fn test_warrior_session_ends_when_stamina_runs_dry() {
    let mut kernel = WarriorKernel::new(44, 16);
    let mut r = rng(11);
    // Nobody blocks anything: attacks keep landing until stamina is gone.
    let reason = drive(&mut kernel, &mut r, 60 * 120, &[]);
    assert_eq!(reason, Some(EndReason::ResourceEmpty));
    assert!(kernel.stamina <= 0);
    assert!(kernel.failures > 0);
}

#[test]
fn test_warrior_quit_produces_scaled_partial_rewards() {
    let mut kernel = WarriorKernel::new(44, 16);
    let mut r = rng(13);
    let reason = drive(&mut kernel, &mut r, 240, &[(120, KernelInput::Quit)]);
    assert_eq!(reason, Some(EndReason::Quit));

    let outcome = kernel.clone().finish(EndReason::Quit, &mut r);
    assert!(outcome.xp_gain >= 1, "partial completion still pays something");
    assert_eq!(outcome.strength_gain, 1);

    let mut player = Player::new("Conan".to_string(), ClassKind::Warrior);
    player.hp = 2;
    apply_reward(&mut player, &outcome.reward());
    assert_eq!(player.hp, 1, "training never kills the player");
    assert_eq!(player.strength, ClassKind::Warrior.base_stats().2 + 1);
}

#[test]
fn test_archer_runs_the_full_session_without_input() {
    let mut kernel = ArcherKernel::new(60, 16);
    let mut r = rng(5);
    let ticks = (48.0 / DT) as u32 + 20;
    let reason = drive(&mut kernel, &mut r, ticks, &[]);
    assert_eq!(reason, Some(EndReason::TimeUp));
    // Without a single shot there are no misses, so focus is untouched.
    assert_eq!(kernel.misses, 0);
    assert_eq!(kernel.hits, 0);
}

#[test]
fn test_archer_spray_and_pray_bleeds_focus() {
    let mut kernel = ArcherKernel::new(60, 16);
    let mut r = rng(6);
    // Tap fire every 20 ticks; most arrows sail off the right edge.
    let script: Vec<(u32, KernelInput)> =
        (0..200).map(|i| (i * 20, KernelInput::Fire)).collect();
    drive(&mut kernel, &mut r, 4000, &script);
    assert!(
        kernel.misses > 0,
        "stray arrows must be counted as misses"
    );
}

#[test]
fn test_archer_quit_flag_stops_the_session() {
    let mut kernel = ArcherKernel::new(60, 16);
    let mut r = rng(7);
    let reason = drive(&mut kernel, &mut r, 600, &[(60, KernelInput::Quit)]);
    assert_eq!(reason, Some(EndReason::Quit));
    let outcome = kernel.finish(EndReason::Quit, &mut r);
    assert!(!outcome.success, "quitting can never count as a success");
    assert!(outcome.xp_gain >= 1);
}

#[test]
fn test_meditation_survives_only_until_focus_empties() {
    let mut kernel = MeditationKernel::new(36, 14);
    let mut r = rng(21);
    // Stand still forever; seeking threats will eventually connect.
    let reason = drive(&mut kernel, &mut r, 60 * 300, &[]);
    assert_eq!(reason, Some(EndReason::ResourceEmpty));
    assert!(kernel.focus <= 0);
}

#[test]
fn test_meditation_outcome_scales_with_survival_time() {
    let mut r = rng(1);
    let mut short = MeditationKernel::new(36, 14);
    short.elapsed = 5.0;
    let mut long = MeditationKernel::new(36, 14);
    long.elapsed = 25.0;
    let short_outcome = short.finish(EndReason::ResourceEmpty, &mut r);
    let long_outcome = long.finish(EndReason::ResourceEmpty, &mut r);
    assert!(long_outcome.xp_gain > short_outcome.xp_gain);
    assert!(long_outcome.hp_cost >= short_outcome.hp_cost);
}

#[test]
fn test_class_reward_shapes_match_the_kernel() {
    let mut r = rng(2);

    let mut archer = ArcherKernel::new(60, 16);
    archer.best_combo = 8;
    let reward = archer.finish(EndReason::ResourceEmpty, &mut r).reward();
    assert_eq!(reward.speed_gain, 1);
    assert_eq!(reward.strength_gain, 0);

    let mut warrior = WarriorKernel::new(44, 16);
    warrior.parries = 9;
    let reward = warrior.finish(EndReason::ResourceEmpty, &mut r).reward();
    assert!(reward.strength_gain >= 1);
    assert_eq!(reward.defense_gain, 1);
    assert_eq!(reward.speed_gain, 0);

    let meditation = MeditationKernel::new(36, 14);
    let reward = meditation.finish(EndReason::ResourceEmpty, &mut r).reward();
    assert_eq!(reward.strength_gain, 0);
    assert_eq!(reward.defense_gain, 0);
}
