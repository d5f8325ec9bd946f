//! Authoritative machine state
//!
//! One owned record, threaded through the dispatch engine by exclusive
//! reference. Nothing else writes it.

pub mod machine;

pub use machine::{CoordinateMode, MachineState, UnitMode};
