//! Two-level command dispatch
//!
//! Code numbers decode into tagged variants first ([`codes`]); the engine
//! then routes each variant to its handler. Unknown numbers fall out of the
//! decode as structured errors instead of a default switch arm.

pub mod codes;
pub mod engine;

pub use codes::{GCode, MCode};
pub use engine::{Dispatcher, DEBUG_ECHO, DEBUG_POSITION, SCRATCH_LEN};
