//! Thermal subsystem collaborator
//!
//! The control computation (PID or bang-bang) runs in its own loop; the
//! command layer only writes targets/tuning and reads achieved state.

/// Which tuning constant a calibration command addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TuningParam {
    Proportional,
    Integral,
    Derivative,
    IntegralLimit,
}

/// A sensor's current PID settings, for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidSettings {
    pub kp: i32,
    pub ki: i32,
    pub kd: i32,
    pub i_limit: i32,
}

/// Temperature control interface
pub trait ThermalControl {
    /// Set the target temperature for a sensor, whole degrees Celsius
    fn set_target(&mut self, sensor: u8, celsius: i16);

    /// True when every sensor with a target has been within tolerance for
    /// the configured residency time
    fn is_achieved(&self) -> bool;

    /// Current reading for a sensor in deci-degrees Celsius
    ///
    /// Takes `&mut self` because reading typically requires an ADC access.
    fn current(&mut self, sensor: u8) -> i16;

    /// Drive a heater output directly (also used for fans), 0–255
    fn set_output(&mut self, heater: u8, pwm: u8);

    /// Arm closed-loop control
    fn enable_control(&mut self);

    /// Disarm closed-loop control; outputs forced off
    fn disable_control(&mut self);

    /// Write one tuning constant for a sensor's loop
    fn tune(&mut self, sensor: u8, param: TuningParam, value: i32);

    /// Persist the current tuning constants
    fn persist_tuning(&mut self);

    /// Current tuning constants for a sensor, if it exists
    fn pid_settings(&self, sensor: u8) -> Option<PidSettings>;
}
