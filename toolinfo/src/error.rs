//! Failures an adaptor reports to its caller.

use std::path::PathBuf;

use thiserror::Error;

/// Adaptor-level error.
///
/// Output classification never produces one of these; an unrecognized
/// output is [`Verdict::Unknown`](crate::core::verdict::Verdict::Unknown).
#[derive(Debug, Error)]
pub enum ToolError {
    /// The executable (or a helper it needs) is not on the search path.
    #[error("executable {name:?} not found on search path")]
    ExecutableNotFound { name: String },

    /// The caller broke an adaptor contract, e.g. passed two source files to
    /// a tool that accepts one. No command line is produced.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Running the tool to obtain its version failed.
    #[error("query version of {}", executable.display())]
    Version {
        executable: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl ToolError {
    pub fn not_found(name: &str) -> Self {
        ToolError::ExecutableNotFound {
            name: name.to_string(),
        }
    }
}
