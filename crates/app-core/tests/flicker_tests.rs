// Host-side tests for the flicker machine invariants and the reference
// timing scenario.

use app_core::FlickerState;

#[test]
fn off_counter_bounded_and_reset_outside_window() {
    let mut flicker = FlickerState::new(16, 3);
    let mut t = 0.0f64;
    while t < 40.0 {
        let frame = flicker.advance(t);
        assert!(flicker.off_frames() <= 3, "counter exceeded duration");
        let in_window = (t.floor() as i64).rem_euclid(16) == 0;
        if !in_window {
            assert!(!frame.light_off);
            assert_eq!(flicker.off_frames(), 0, "counter not reset at t={t}");
        }
        t += 0.1;
    }
}

#[test]
fn one_second_steps_hit_each_period_once() {
    // period 16, duration 1: stepping t = 0..=17 in whole seconds gives
    // exactly one off frame at t=0 and one at t=16.
    let mut flicker = FlickerState::new(16, 1);
    let mut off_at = Vec::new();
    for t in 0..=17 {
        if flicker.advance(t as f64).light_off {
            off_at.push(t);
        }
    }
    assert_eq!(off_at, vec![0, 16]);
}

#[test]
fn strobes_within_the_off_window() {
    // With duration 2 and many frames inside the same second the machine
    // alternates: two off frames, one on frame (counter reset), repeat.
    let mut flicker = FlickerState::new(16, 2);
    let pattern: Vec<bool> = (0..6).map(|_| flicker.advance(0.25).light_off).collect();
    assert_eq!(pattern, vec![true, true, false, true, true, false]);
}

#[test]
fn scramble_raised_on_final_off_frame_only() {
    let mut flicker = FlickerState::new(16, 2);
    let first = flicker.advance(0.0);
    assert!(first.light_off && !first.scramble);
    let second = flicker.advance(0.01);
    assert!(second.light_off && second.scramble);
    let third = flicker.advance(0.02);
    assert!(!third.light_off && !third.scramble);
}

#[test]
fn counter_zero_after_any_frame_outside_window() {
    let mut flicker = FlickerState::new(16, 4);
    flicker.advance(0.0);
    flicker.advance(0.0);
    assert_eq!(flicker.off_frames(), 2);
    flicker.advance(1.0);
    assert_eq!(flicker.off_frames(), 0);
}
