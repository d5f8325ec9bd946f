//! Configuration types
//!
//! [`hardware`] describes what the board physically has: travel limits,
//! feed-rate ceilings, which outputs exist. [`eeconfig`] is the persisted
//! parameter record mutated field-by-field by the M244–M255 block.

pub mod eeconfig;
pub mod hardware;

pub use eeconfig::{AxisValues, EeConfig, Extents, TempTableRow, TEMP_TABLE_ROWS};
pub use hardware::{AxisBounds, ExtruderDrive, HardwareConfig, SearchFeedrates, TravelLimits};
