//! Power, driver-enable and watchdog collaborator

use crate::motion::Axis;

/// Global power and per-axis driver control
pub trait PowerControl {
    /// Energize one axis driver
    fn enable_axis(&mut self, axis: Axis);

    /// De-energize one axis driver
    fn disable_axis(&mut self, axis: Axis);

    /// Switch the main power rail on
    fn power_on(&mut self);

    /// Switch the main power rail off
    fn power_off(&mut self);

    /// Reset the hardware watchdog
    fn keep_alive(&mut self);
}
