//! Motion queue and endstop-seek collaborators

use crate::motion::{Axis, QueueEntry};
use crate::traits::Console;

/// The asynchronous move queue
///
/// The controller only appends entries or blocks until the queue empties;
/// it never touches in-flight entries except through the read-only report.
pub trait MotionQueue {
    /// Append an entry; the queue executes it asynchronously
    fn enqueue(&mut self, entry: QueueEntry);

    /// Block until every queued entry has executed
    fn drain(&mut self);

    /// Discard all queued entries without executing them
    ///
    /// Implementations also stop the step timer; this is the emergency
    /// path, not a cancellation mechanism.
    fn flush(&mut self);

    /// Write a human-readable dump of queue contents to the console
    ///
    /// Must not mutate queue state.
    fn report(&mut self, console: &mut dyn Console);
}

/// Direction for an endstop-seeking home
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeekDirection {
    /// Toward the most-negative extent
    Negative,
    /// Toward the most-positive extent
    Positive,
}

/// Low-level endstop-seeking routine
///
/// Runs the bump-and-retract search against the physical switch and
/// redefines the axis origin when it completes. Blocking.
pub trait EndstopSeeker {
    fn seek(&mut self, axis: Axis, direction: SeekDirection);
}
