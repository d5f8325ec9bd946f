//! Time source for bounded busy-waits

/// Periodic-work and delay services
///
/// Any bounded busy-wait in the command layer (dwell) must keep the
/// firmware's periodic duties running; `service` runs whatever ticks are
/// due, `delay_ms` blocks for one quantum.
pub trait Clock {
    /// Run any periodic background work that is due
    fn service(&mut self);

    /// Block for the given number of milliseconds
    fn delay_ms(&mut self, ms: u32);
}
