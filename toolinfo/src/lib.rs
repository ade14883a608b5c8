//! Adaptors that let a benchmarking harness drive software verifiers uniformly.
//!
//! Each adaptor locates its verifier, builds the command line for a run and
//! classifies the captured output into a [`core::verdict::Verdict`]. The
//! crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (verdicts, detection rules, path
//!   arithmetic). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting collaborators (search path lookup, spawning a
//!   tool for its version, config files).
//!
//! [`tools`] combines both behind the [`tools::Tool`] trait, one
//! implementation per verifier.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tools;
