//! Motion vocabulary and coordinate normalization
//!
//! Defines what the dispatch engine hands to the motion queue and how raw
//! command words become absolute, limit-clamped targets.

pub mod normalize;
pub mod target;

pub use normalize::normalize;
pub use target::{Axis, Position, QueueEntry, Target};
