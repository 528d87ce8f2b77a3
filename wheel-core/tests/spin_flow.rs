use std::f64::consts::{PI, TAU};
use std::num::NonZeroUsize;

use rand::SeedableRng;
use rand::rngs::mock::StepRng;
use rand_chacha::ChaCha8Rng;
use wheel_core::celebration::ParticleSurface;
use wheel_core::{
    CelebrationEffect, ConfettiConfig, ConfettiRain, ManualScheduler, Phase, StateViolation,
    WheelEngine, WheelEvent, compute_winner,
};

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[derive(Default)]
struct Canvas {
    drawn: usize,
}

impl ParticleSurface for Canvas {
    fn clear(&mut self) {
        self.drawn = 0;
    }

    fn fill_rotated_square(&mut self, _x: f64, _y: f64, _size: f64, _deg: f64, _color: &str) {
        self.drawn += 1;
    }
}

#[test]
fn fixed_parameters_land_on_the_computed_segment() {
    // StepRng(0, 0) samples the low end of both ranges: 5 turns, 4000ms.
    let mut wheel = WheelEngine::new(ManualScheduler::starting_at(1_000.0), StepRng::new(0, 0));
    wheel.set_entries(names(&["A", "B", "C", "D"])).unwrap();
    wheel.spin().unwrap();

    let params = wheel.spin_parameters().cloned().unwrap();
    assert_eq!(params.extra_turns, 5.0);
    assert_eq!(params.duration_ms, 4000.0);
    assert_eq!(params.start_rotation, 0.0);
    assert_eq!(params.target_rotation, 10.0 * PI);

    let mut frames = 0;
    let mut winner = None;
    while wheel.scheduler_mut().fire().is_some() {
        let now = wheel.scheduler_mut().advance(16.0);
        for ev in wheel.on_frame(now) {
            match ev {
                WheelEvent::Frame { .. } => frames += 1,
                WheelEvent::Winner { index, label } => winner = Some((index, label)),
            }
        }
    }

    let normalized = params.target_rotation.rem_euclid(TAU);
    let arc = TAU / 4.0;
    let expected = (((1.5 * PI - normalized) / arc).floor() as i64).rem_euclid(4) as usize;
    let (index, label) = winner.expect("spin produced a winner");
    assert_eq!(index, expected);
    assert_eq!(label, ["A", "B", "C", "D"][expected]);
    assert_eq!(frames, 250);
    assert_eq!(wheel.phase(), Phase::Settled);
    assert_eq!(wheel.rotation(), params.target_rotation);
}

#[test]
fn winner_popup_flow_with_confetti() {
    let mut wheel = WheelEngine::new(ManualScheduler::new(), ChaCha8Rng::seed_from_u64(99));
    let mut confetti = ConfettiRain::new(
        ConfettiConfig::default(),
        ManualScheduler::new(),
        ChaCha8Rng::seed_from_u64(100),
        Canvas::default(),
    );
    wheel.set_entries(names(&["A", "B"])).unwrap();
    wheel.spin().unwrap();

    let mut winner = None;
    while wheel.scheduler_mut().fire().is_some() {
        let now = wheel.scheduler_mut().advance(16.0);
        for ev in wheel.on_frame(now) {
            if let WheelEvent::Winner { index, .. } = ev {
                winner = Some(index);
                confetti.start(1280.0, 720.0);
            }
        }
    }
    let winner = winner.unwrap();
    assert_eq!(wheel.last_winner(), Some(winner));
    assert!(confetti.is_active());

    for _ in 0..30 {
        confetti.scheduler_mut().fire();
        let now = confetti.scheduler_mut().advance(16.0);
        assert!(confetti.on_frame(now));
    }
    assert_eq!(confetti.surface().drawn, 150);

    // "Remove" in the popup, then close it.
    wheel.remove_last_winner().unwrap();
    confetti.stop();
    assert!(!confetti.is_active());
    assert_eq!(confetti.surface().drawn, 0);
    assert_eq!(wheel.entries().len(), 1);

    // One entry left: it always wins.
    wheel.spin().unwrap();
    let mut last = None;
    while wheel.scheduler_mut().fire().is_some() {
        let now = wheel.scheduler_mut().advance(16.0);
        for ev in wheel.on_frame(now) {
            if let WheelEvent::Winner { index, .. } = ev {
                last = Some(index);
            }
        }
    }
    assert_eq!(last, Some(0));
}

#[test]
fn removing_the_final_entry_blocks_spinning() {
    let mut wheel = WheelEngine::new(ManualScheduler::new(), ChaCha8Rng::seed_from_u64(1));
    wheel.set_entries(names(&["only"])).unwrap();
    assert!(wheel.can_spin());
    assert_eq!(wheel.remove_entry(0).unwrap(), "only");
    assert!(!wheel.can_spin());
    assert_eq!(
        wheel.spin().unwrap_err().violation(),
        Some(StateViolation::NoEntries)
    );
}

#[test]
fn many_seeds_always_pick_a_valid_winner() {
    for seed in 0..64 {
        let mut wheel =
            WheelEngine::new(ManualScheduler::new(), ChaCha8Rng::seed_from_u64(seed));
        let count = (seed as usize % 9) + 1;
        let entries: Vec<String> = (0..count).map(|i| format!("entry {i}")).collect();
        wheel.set_entries(entries).unwrap();
        wheel.spin().unwrap();
        let target = wheel.spin_parameters().unwrap().target_rotation;
        let mut winner = None;
        while wheel.scheduler_mut().fire().is_some() {
            let now = wheel.scheduler_mut().advance(50.0);
            for ev in wheel.on_frame(now) {
                if let WheelEvent::Winner { index, .. } = ev {
                    winner = Some(index);
                }
            }
        }
        let winner = winner.unwrap();
        assert!(winner < count);
        assert_eq!(
            winner,
            compute_winner(target, NonZeroUsize::new(count).unwrap())
        );
    }
}
