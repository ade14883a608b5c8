//! Side-effecting collaborators: executable lookup, process spawning, config.

pub mod config;
pub mod locator;
pub mod process;
pub mod version;
