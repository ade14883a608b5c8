//! Adaptor for ESBMC, the Efficient SMT-based Context-Bounded Model Checker.
//!
//! ESBMC runs from its own directory and is classified on its full output.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::core::path::parent_dir;
use crate::core::rules::{Check, Rule, first_match};
use crate::core::types::{CmdlineRequest, Environment, RunResult};
use crate::core::verdict::{ErrorCause, Verdict};
use crate::error::ToolError;
use crate::io::version::VERSION_FLAG;
use crate::tools::{Tool, ToolContext, ToolId};

pub const EXECUTABLE: &str = "esbmc";

const VIOLATED: &str = "Violated property:";
const FAILED: &str = "VERIFICATION FAILED";

/// Rules that decide the verdict from what ESBMC proved.
pub const PRIMARY_RULES: &[Rule] = &[
    Rule::new(
        Check::InOrder(&[
            VIOLATED,
            "dereference failure: dynamic object lower bound",
            FAILED,
        ]),
        Verdict::FalseDeref,
    ),
    Rule::new(
        Check::InOrder(&[
            VIOLATED,
            "Operand of free must have zero pointer offset",
            FAILED,
        ]),
        Verdict::FalseFree,
    ),
    Rule::new(
        Check::InOrder(&[VIOLATED, "error label", FAILED]),
        Verdict::FalseReach,
    ),
    Rule::new(
        Check::InOrder(&[VIOLATED, "assertion", FAILED]),
        Verdict::FalseReach,
    ),
    Rule::new(
        Check::InOrder(&[VIOLATED, "dereference failure: forgotten memory", FAILED]),
        Verdict::FalseMemtrack,
    ),
    Rule::new(Check::Contains("VERIFICATION SUCCESSFUL"), Verdict::True),
];

/// Consulted only when no primary rule matched.
pub const FALLBACK_RULES: &[Rule] = &[
    Rule::new(Check::TimedOut, Verdict::Timeout),
    Rule::new(
        Check::EndsWithAny(&["Z3 Error 9", "Z3 Error 9\n"]),
        Verdict::Error(ErrorCause::Z3Error9),
    ),
    Rule::new(
        Check::EndsWithAny(&["error", "error\n"]),
        Verdict::Error(ErrorCause::Generic),
    ),
    Rule::new(
        Check::Contains("Encountered Z3 conversion error:"),
        Verdict::Error(ErrorCause::Z3Conversion),
    ),
];

pub struct Esbmc {
    ctx: ToolContext,
}

impl Esbmc {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl Tool for Esbmc {
    fn id(&self) -> ToolId {
        ToolId::Esbmc
    }

    fn name(&self) -> &'static str {
        "ESBMC"
    }

    fn executable(&self) -> Result<PathBuf, ToolError> {
        self.ctx.locator.find_executable(EXECUTABLE)
    }

    fn working_directory(&self, executable: &Path) -> PathBuf {
        parent_dir(executable)
    }

    fn environment(&self, _executable: &Path) -> Environment {
        Environment::default().with_additional("PATH", ":.")
    }

    fn version(&self, executable: &Path) -> Result<String, ToolError> {
        self.ctx
            .probe
            .probe(executable, VERSION_FLAG)
            .map_err(|source| ToolError::Version {
                executable: executable.to_path_buf(),
                source,
            })
    }

    #[instrument(skip_all, fields(sourcefiles = request.sourcefiles.len()))]
    fn cmdline(
        &self,
        executable: &Path,
        request: &CmdlineRequest,
    ) -> Result<Vec<String>, ToolError> {
        let [sourcefile] = request.sourcefiles.as_slice() else {
            return Err(ToolError::Precondition(format!(
                "only one sourcefile supported, got {}",
                request.sourcefiles.len()
            )));
        };
        let working_dir = self.working_directory(executable);

        let mut args = vec![self.ctx.relative_arg(executable, &working_dir)?];
        args.extend(request.options.iter().cloned());
        args.push(self.ctx.relative_arg(sourcefile, &working_dir)?);
        debug!(?args, "built esbmc command line");
        Ok(args)
    }

    fn determine_result(&self, run: &RunResult) -> Verdict {
        let output = run.joined_output();
        let verdict = first_match(PRIMARY_RULES, &output, run)
            .or_else(|| first_match(FALLBACK_RULES, &output, run))
            .unwrap_or(Verdict::Unknown);
        debug!(%verdict, lines = run.output.len(), "classified esbmc output");
        verdict
    }
}
