//! Operator console shared between the emulator and capture tooling.
//!
//! The grammar lives in [`grammar`], the command table in [`catalog`], and
//! [`executor`] applies commands to a shared controller.

pub mod catalog;
pub mod executor;
pub mod grammar;

pub use executor::{ConsoleError, ConsoleExecutor, ConsoleOutcome, HelpTopic};
pub use grammar::{ConsoleCommand, ConsoleParseError, MAX_TICK_BATCH, parse};
