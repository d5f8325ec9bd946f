//! Homing sequencing
//!
//! Two forms: zeroing moves toward each axis's origin at the configured
//! search feed rate, and delegated endstop seeks for the directional
//! variants. Both redefine the coordinate origin, so the queue must be
//! empty before either runs; an in-flight relative move computed against
//! the old origin would land somewhere else entirely.

use sinter_protocol::Command;

use crate::config::SearchFeedrates;
use crate::motion::{Axis, QueueEntry, Target};
use crate::state::MachineState;
use crate::traits::{EndstopSeeker, MotionQueue, SeekDirection};

/// The linear axes a homing command named
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisSelection {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisSelection {
    /// Every linear axis
    pub const ALL: Self = Self {
        x: true,
        y: true,
        z: true,
    };

    /// Selection from a command's axis words
    ///
    /// Only X/Y/Z count; the extrusion axis has no endstops and nothing
    /// to home toward.
    pub fn from_command(cmd: &Command) -> Self {
        Self {
            x: cmd.x.is_some(),
            y: cmd.y.is_some(),
            z: cmd.z.is_some(),
        }
    }

    /// True if any axis is selected
    pub fn any(&self) -> bool {
        self.x || self.y || self.z
    }
}

/// Enqueue one zeroing move for an axis and record it in state
fn zero_axis<Q: MotionQueue>(
    queue: &mut Q,
    state: &mut MachineState,
    axis: Axis,
    feedrate: u32,
) {
    let mut target = Target::at(state.position, feedrate);
    match axis {
        Axis::X => target.x = 0,
        Axis::Y => target.y = 0,
        Axis::Z => target.z = 0,
        Axis::E => return,
    }
    queue.enqueue(QueueEntry::Move(target));
    state.commit_move(&target);
}

/// Home the selected axes; with none selected, home X, Y, Z in that order
pub fn home<Q: MotionQueue>(
    queue: &mut Q,
    state: &mut MachineState,
    rates: &SearchFeedrates,
    axes: AxisSelection,
) {
    queue.drain();

    let axes = if axes.any() { axes } else { AxisSelection::ALL };

    if axes.x {
        zero_axis(queue, state, Axis::X, rates.x);
    }
    if axes.y {
        zero_axis(queue, state, Axis::Y, rates.y);
    }
    if axes.z {
        zero_axis(queue, state, Axis::Z, rates.z);
    }
}

/// Run the hardware endstop seek for each named axis
///
/// Unlike [`home`], an empty selection does nothing; there is no
/// all-axes fallback for the directional form.
pub fn seek_endstops<E: EndstopSeeker>(
    endstops: &mut E,
    axes: AxisSelection,
    direction: SeekDirection,
) {
    if axes.x {
        endstops.seek(Axis::X, direction);
    }
    if axes.y {
        endstops.seek(Axis::Y, direction);
    }
    if axes.z {
        endstops.seek(Axis::Z, direction);
    }
}
