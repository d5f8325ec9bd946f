//! The machine-state record
//!
//! Replaces the classic firmware globals (`startpoint`, `current_position`,
//! `tool`, `next_tool`) with a single owned struct. Invariant: `position`
//! equals the last target handed to the motion queue; code paths that move
//! the origin without a move (set-home, homing) update it synchronously
//! after draining the queue.

use crate::motion::{Position, Target};

/// Coordinate interpretation for incoming axis words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoordinateMode {
    /// Axis words are absolute machine coordinates
    #[default]
    Absolute,
    /// Axis words are offsets from the current position
    Relative,
}

/// Unit interpretation for incoming words
///
/// The flag is consumed by the parser's scaling; switching it never
/// rescales state already stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnitMode {
    #[default]
    Millimeters,
    Inches,
}

/// Authoritative controller state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineState {
    /// Last position handed to the motion queue, micrometers
    pub position: Position,
    /// Persisted feed rate, mm/min
    pub feedrate: u32,
    /// Absolute or relative axis words
    pub coordinates: CoordinateMode,
    /// mm or inch words
    pub units: UnitMode,
    /// Tool currently active
    pub active_tool: u8,
    /// Tool requested by the last T word, applied on tool change
    pub pending_tool: u8,
    /// Idle step-timeout counter, reset on power-up (serviced by the clock)
    pub step_timeout_ms: u32,
    /// Latched by program end; only the watchdog is serviced afterwards
    pub halted: bool,
}

impl MachineState {
    /// Create a fresh state at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// True if axis words are currently relative offsets
    pub fn is_relative(&self) -> bool {
        self.coordinates == CoordinateMode::Relative
    }

    /// Record a move handed to the queue
    ///
    /// X/Y/Z shadow the target; E accumulates the path-relative delta; the
    /// feed rate persists for commands that omit F.
    pub fn commit_move(&mut self, target: &Target) {
        self.position.x = target.x;
        self.position.y = target.y;
        self.position.z = target.z;
        self.position.e = self.position.e.wrapping_add(target.e);
        self.feedrate = target.f;
    }

    /// Zero X, Y and Z together as one state transition
    ///
    /// E is deliberately excluded: extrusion is path-relative and has no
    /// origin to move.
    pub fn zero_linear_axes(&mut self) {
        self.position.x = 0;
        self.position.y = 0;
        self.position.z = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = MachineState::new();
        assert_eq!(state.coordinates, CoordinateMode::Absolute);
        assert_eq!(state.units, UnitMode::Millimeters);
        assert_eq!(state.position, Position::default());
        assert!(!state.halted);
    }

    #[test]
    fn test_commit_move_shadows_target() {
        let mut state = MachineState::new();
        state.commit_move(&Target {
            x: 1000,
            y: 2000,
            z: 300,
            e: 50,
            f: 600,
        });
        assert_eq!(state.position.x, 1000);
        assert_eq!(state.position.e, 50);
        assert_eq!(state.feedrate, 600);

        // E accumulates across moves, X/Y/Z do not
        state.commit_move(&Target {
            x: 1000,
            y: 2000,
            z: 300,
            e: 25,
            f: 600,
        });
        assert_eq!(state.position.e, 75);
        assert_eq!(state.position.x, 1000);
    }

    #[test]
    fn test_zero_linear_axes_leaves_e() {
        let mut state = MachineState::new();
        state.position = Position {
            x: 10,
            y: 20,
            z: 30,
            e: 40,
        };
        state.zero_linear_axes();
        assert_eq!(state.position.x, 0);
        assert_eq!(state.position.y, 0);
        assert_eq!(state.position.z, 0);
        assert_eq!(state.position.e, 40);
    }
}
