//! Coordinate and unit normalization
//!
//! Turns the sparse axis words of a command into an absolute, travel-limited
//! [`Target`]. Pure: reads machine state, never writes it.

use sinter_protocol::Command;

use crate::config::TravelLimits;
use crate::motion::Target;
use crate::state::MachineState;

/// Resolve one linear-axis word against the current position
fn resolve(current: i32, word: Option<i32>, relative: bool) -> i32 {
    match word {
        Some(v) if relative => current.wrapping_add(v),
        Some(v) => v,
        // Unseen words inherit the current position: absent is not zero
        None => current,
    }
}

/// Produce the absolute, clamped target for a command
///
/// Relative mode adds each supplied X/Y/Z word to the current position.
/// E is the exception: it is always a path-relative delta, never resolved
/// against an absolute origin (the extrusion register would overflow a few
/// layers into a long job otherwise). An unseen F inherits the persisted
/// feed rate.
pub fn normalize(state: &MachineState, cmd: &Command, limits: &TravelLimits) -> Target {
    let relative = state.is_relative();

    let x = resolve(state.position.x, cmd.x, relative);
    let y = resolve(state.position.y, cmd.y, relative);
    let z = resolve(state.position.z, cmd.z, relative);

    Target {
        x: limits.x.clamp(x),
        y: limits.y.clamp(y),
        z: limits.z.clamp(z),
        e: cmd.e.unwrap_or(0),
        f: cmd.f.unwrap_or(state.feedrate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AxisBounds;
    use crate::state::CoordinateMode;
    use proptest::prelude::*;

    fn wide_limits() -> TravelLimits {
        TravelLimits {
            x: AxisBounds::unbounded(),
            y: AxisBounds::unbounded(),
            z: AxisBounds::unbounded(),
        }
    }

    fn state_at(x: i32, y: i32, z: i32, feedrate: u32) -> MachineState {
        let mut state = MachineState::new();
        state.position.x = x;
        state.position.y = y;
        state.position.z = z;
        state.feedrate = feedrate;
        state
    }

    #[test]
    fn test_absolute_words_pass_through() {
        let state = state_at(10_000, 20_000, 30_000, 600);
        let cmd = Command {
            x: Some(5_000),
            ..Command::g(1)
        };
        let t = normalize(&state, &cmd, &wide_limits());
        assert_eq!(t.x, 5_000);
        // unseen axes inherit the current position
        assert_eq!(t.y, 20_000);
        assert_eq!(t.z, 30_000);
        assert_eq!(t.f, 600);
    }

    #[test]
    fn test_relative_words_add() {
        let mut state = state_at(10_000, 20_000, 30_000, 600);
        state.coordinates = CoordinateMode::Relative;
        let cmd = Command {
            x: Some(-2_000),
            z: Some(500),
            ..Command::g(1)
        };
        let t = normalize(&state, &cmd, &wide_limits());
        assert_eq!(t.x, 8_000);
        assert_eq!(t.y, 20_000);
        assert_eq!(t.z, 30_500);
    }

    #[test]
    fn test_e_is_always_a_delta() {
        // In both coordinate modes the E word passes through untouched
        for mode in [CoordinateMode::Absolute, CoordinateMode::Relative] {
            let mut state = state_at(0, 0, 0, 600);
            state.position.e = 90_000;
            state.coordinates = mode;
            let cmd = Command {
                e: Some(1_250),
                ..Command::g(1)
            };
            let t = normalize(&state, &cmd, &wide_limits());
            assert_eq!(t.e, 1_250);
        }
    }

    #[test]
    fn test_unseen_e_is_zero_delta() {
        let state = state_at(0, 0, 0, 600);
        let t = normalize(&state, &Command::g(1), &wide_limits());
        assert_eq!(t.e, 0);
    }

    #[test]
    fn test_unseen_f_inherits_feedrate() {
        let state = state_at(0, 0, 0, 450);
        let t = normalize(&state, &Command::g(1), &wide_limits());
        assert_eq!(t.f, 450);

        let cmd = Command {
            f: Some(900),
            ..Command::g(1)
        };
        let t = normalize(&state, &cmd, &wide_limits());
        assert_eq!(t.f, 900);
    }

    #[test]
    fn test_clamp_to_travel_limits() {
        let limits = TravelLimits {
            x: AxisBounds::new(0, 200_000),
            y: AxisBounds::new(0, 200_000),
            z: AxisBounds::new(0, 120_000),
        };
        let state = state_at(0, 0, 0, 600);
        let cmd = Command {
            x: Some(-5_000),
            y: Some(250_000),
            z: Some(60_000),
            ..Command::g(1)
        };
        let t = normalize(&state, &cmd, &limits);
        assert_eq!(t.x, 0);
        assert_eq!(t.y, 200_000);
        assert_eq!(t.z, 60_000);
    }

    proptest! {
        #[test]
        fn clamped_target_is_nearest_bound(value in any::<i32>(), a in any::<i32>(), b in any::<i32>()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let limits = TravelLimits {
                x: AxisBounds::new(lo, hi),
                y: AxisBounds::unbounded(),
                z: AxisBounds::unbounded(),
            };
            let state = state_at(0, 0, 0, 0);
            let cmd = Command { x: Some(value), ..Command::g(1) };
            let t = normalize(&state, &cmd, &limits);

            if value < lo {
                prop_assert_eq!(t.x, lo);
            } else if value > hi {
                prop_assert_eq!(t.x, hi);
            } else {
                prop_assert_eq!(t.x, value);
            }
        }
    }
}
