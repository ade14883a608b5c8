//! Deterministic, pure logic shared by the adaptors.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod path;
pub mod rules;
pub mod types;
pub mod verdict;
