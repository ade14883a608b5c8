//! Stable exit codes for toolinfo CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid input, unreadable config or output file, or any other failure.
pub const INVALID: i32 = 1;
/// The tool executable (or a helper it needs) is not on the search path.
pub const NOT_FOUND: i32 = 2;
/// An adaptor precondition was violated (e.g. wrong number of source files).
pub const PRECONDITION: i32 = 3;
