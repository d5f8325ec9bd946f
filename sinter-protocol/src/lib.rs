//! Host-facing vocabulary for the Sinter motion controller
//!
//! This crate defines the two surfaces the controller shares with control
//! software on the host side:
//!
//! - [`Command`]: the fully parsed, numerically normalized command record
//!   handed to the dispatch engine. The tokenizer/parser that produces it
//!   lives with the transport; everything here is already scaled to integer
//!   machine units.
//! - [`report`]: the exact text of every status and error line the
//!   controller emits. Line formats are part of the host protocol and must
//!   not drift.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod report;

pub use command::{Command, MAX_FILENAME_LEN};
