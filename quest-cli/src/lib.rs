//! Library half of the `quest` binary: configuration, file I/O and the
//! generation/verification tasks the subcommands run.

pub mod config;
pub mod io;
pub mod tasks;

pub use config::Config;
pub use tasks::{Summary, VerifyReport};
