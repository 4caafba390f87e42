//! seatctl library.
//!
//! Parses line-oriented allocation scripts and runs them against a
//! [`SeatAllocator`](seatline_allocator::SeatAllocator):
//!
//! ```text
//! Initialize(2)
//! Reserve(101, 1)
//! Cancel(1, 101)
//! Quit()
//! ```
//!
//! Results are written as plain text lines or one JSON object per command.

pub mod command;
pub mod config;
pub mod output;
pub mod runner;
pub mod script;

pub use command::{Command, CommandError};
pub use config::Config;
pub use output::OutputFormat;
pub use runner::{execute, Outcome, RunSummary, ScriptRunner};
pub use script::{run_script, Endpoint};
