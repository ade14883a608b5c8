//! Adaptor for BLAST, the Berkeley Lazy Abstraction Software verification Tool.
//!
//! BLAST runs from the caller's directory under the `ocamltune` launcher and
//! reports its result on dedicated output lines.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::core::path::{parent_dir, relative_path};
use crate::core::rules::{Check, Rule, scan_lines};
use crate::core::types::{CmdlineRequest, Environment, KILL_SIGNAL, RunResult};
use crate::core::verdict::{ErrorCause, ExceptionKind, Verdict};
use crate::error::ToolError;
use crate::io::version::{VERSION_FLAG, char_slice};
use crate::tools::{Tool, ToolContext, ToolId, path_arg};

pub const EXECUTABLE: &str = "pblast.opt";
/// Launcher that wraps every BLAST invocation.
pub const LAUNCHER: &str = "ocamltune";

/// Line rules, in priority order within a line.
pub const LINE_RULES: &[Rule] = &[
    Rule::new(
        Check::Prefix("Error found! The system is unsafe :-("),
        Verdict::FalseReach,
    ),
    Rule::new(
        Check::Prefix("No error found.  The system is safe :-)"),
        Verdict::True,
    ),
    Rule::new(
        Check::Prefix("Fatal error: exception Out_of_memory"),
        Verdict::OutOfMemory,
    ),
    Rule::new(
        Check::Prefix("Error: label 'ERROR' appears multiple times"),
        Verdict::Error(ErrorCause::Generic),
    ),
    // Shadows the gremlins rule below for killed runs.
    Rule::new(Check::Signal(KILL_SIGNAL), Verdict::Timeout),
    Rule::new(
        Check::Contains("Ack! The gremlins again!"),
        Verdict::Exception(ExceptionKind::Gremlins),
    ),
];

pub struct Blast {
    ctx: ToolContext,
}

impl Blast {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl Tool for Blast {
    fn id(&self) -> ToolId {
        ToolId::Blast
    }

    fn name(&self) -> &'static str {
        "BLAST"
    }

    fn executable(&self) -> Result<PathBuf, ToolError> {
        self.ctx.locator.find_executable(EXECUTABLE)
    }

    fn working_directory(&self, _executable: &Path) -> PathBuf {
        PathBuf::from(".")
    }

    /// Helper binaries live next to `pblast.opt`, so its directory joins `PATH`.
    fn environment(&self, executable: &Path) -> Environment {
        let working_dir = self.working_directory(executable);
        let tool_dir = relative_path(&parent_dir(executable), &working_dir, &self.ctx.cwd);
        let tool_dir = tool_dir.to_string_lossy();
        Environment::default().with_additional("PATH", format!(":{tool_dir}"))
    }

    fn version(&self, executable: &Path) -> Result<String, ToolError> {
        let output = self
            .ctx
            .probe
            .probe(executable, VERSION_FLAG)
            .map_err(|source| ToolError::Version {
                executable: executable.to_path_buf(),
                source,
            })?;
        Ok(char_slice(&output, 6, 11))
    }

    #[instrument(skip_all, fields(sourcefiles = request.sourcefiles.len()))]
    fn cmdline(
        &self,
        executable: &Path,
        request: &CmdlineRequest,
    ) -> Result<Vec<String>, ToolError> {
        let working_dir = self.working_directory(executable);
        let launcher = self.ctx.locator.find_executable(LAUNCHER)?;

        let mut args = vec![
            self.ctx.relative_arg(&launcher, &working_dir)?,
            self.ctx.relative_arg(executable, &working_dir)?,
        ];
        args.extend(request.options.iter().cloned());
        for file in &request.sourcefiles {
            args.push(path_arg(file)?);
        }
        debug!(?args, "built blast command line");
        Ok(args)
    }

    fn determine_result(&self, run: &RunResult) -> Verdict {
        let verdict = scan_lines(LINE_RULES, run);
        debug!(%verdict, lines = run.output.len(), "classified blast output");
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeLocator, FakeProbe, context};

    fn blast() -> Blast {
        let locator = FakeLocator::new()
            .with("pblast.opt", "/opt/blast/bin/pblast.opt")
            .with("ocamltune", "/opt/blast/bin/ocamltune");
        let probe = FakeProbe::new().with("/opt/blast/bin/pblast.opt", "BLAST 2.7.3 (ocaml)");
        Blast::new(context(locator, probe, "/home/bench"))
    }

    fn classify(lines: &[&str]) -> Verdict {
        blast().determine_result(&RunResult::exited(0, lines.iter().copied()))
    }

    #[test]
    fn safe_output_is_true() {
        let verdict = classify(&["Building CFA", "No error found.  The system is safe :-)"]);
        assert_eq!(verdict, Verdict::True);
    }

    #[test]
    fn unsafe_output_is_false_reach() {
        let verdict = classify(&["Error found! The system is unsafe :-("]);
        assert_eq!(verdict, Verdict::FalseReach);
    }

    #[test]
    fn out_of_memory_and_duplicate_label() {
        assert_eq!(
            classify(&["Fatal error: exception Out_of_memory"]),
            Verdict::OutOfMemory
        );
        assert_eq!(
            classify(&["Error: label 'ERROR' appears multiple times"]),
            Verdict::Error(ErrorCause::Generic)
        );
    }

    #[test]
    fn prefix_rules_do_not_match_mid_line() {
        assert_eq!(
            classify(&["note: No error found.  The system is safe :-)"]),
            Verdict::Unknown
        );
    }

    #[test]
    fn gremlins_match_anywhere_in_line() {
        assert_eq!(
            classify(&["panic: Ack! The gremlins again! (bug)"]),
            Verdict::Exception(ExceptionKind::Gremlins)
        );
    }

    #[test]
    fn killed_run_is_timeout() {
        let run = RunResult::exited(0, ["Building CFA", "Model checking"]).with_signal(9);
        assert_eq!(blast().determine_result(&run), Verdict::Timeout);
    }

    #[test]
    fn later_line_overrides_signal_timeout() {
        let run = RunResult::exited(0, ["partial", "Fatal error: exception Out_of_memory"])
            .with_signal(9);
        assert_eq!(blast().determine_result(&run), Verdict::OutOfMemory);
    }

    #[test]
    fn signal_shadows_gremlins() {
        let run = RunResult::exited(0, ["Ack! The gremlins again!"]).with_signal(9);
        assert_eq!(blast().determine_result(&run), Verdict::Timeout);
    }

    #[test]
    fn killed_run_without_output_stays_unknown() {
        let run = RunResult::default().with_signal(9);
        assert_eq!(blast().determine_result(&run), Verdict::Unknown);
    }

    #[test]
    fn timeout_flag_alone_is_ignored() {
        let run = RunResult::exited(0, ["Model checking"]).with_timeout();
        assert_eq!(blast().determine_result(&run), Verdict::Unknown);
    }

    #[test]
    fn last_matching_line_wins() {
        let verdict = classify(&[
            "Error found! The system is unsafe :-(",
            "No error found.  The system is safe :-)",
        ]);
        assert_eq!(verdict, Verdict::True);
    }

    #[test]
    fn cmdline_prepends_launcher() {
        let tool = blast();
        let exe = tool.executable().expect("exe");
        let request = CmdlineRequest {
            options: vec!["-alias".to_string(), "empty".to_string()],
            sourcefiles: vec![PathBuf::from("programs/a.c"), PathBuf::from("programs/b.c")],
            ..CmdlineRequest::default()
        };
        let args = tool.cmdline(&exe, &request).expect("cmdline");
        assert_eq!(
            args,
            vec![
                "../../opt/blast/bin/ocamltune",
                "../../opt/blast/bin/pblast.opt",
                "-alias",
                "empty",
                "programs/a.c",
                "programs/b.c",
            ]
        );
    }

    #[test]
    fn cmdline_fails_without_launcher() {
        let locator = FakeLocator::new().with("pblast.opt", "/opt/blast/bin/pblast.opt");
        let tool = Blast::new(context(locator, FakeProbe::new(), "/home/bench"));
        let err = tool
            .cmdline(Path::new("/opt/blast/bin/pblast.opt"), &CmdlineRequest::default())
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutableNotFound { ref name } if name == "ocamltune"));
    }

    #[cfg(unix)]
    #[test]
    fn cmdline_rejects_non_utf8_sourcefile() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tool = blast();
        let request = CmdlineRequest {
            sourcefiles: vec![PathBuf::from(OsStr::from_bytes(b"programs/\xfe.c"))],
            ..CmdlineRequest::default()
        };
        let err = tool
            .cmdline(Path::new("/opt/blast/bin/pblast.opt"), &request)
            .unwrap_err();
        assert!(matches!(err, ToolError::Precondition(_)));
    }

    #[test]
    fn environment_extends_path_with_tool_dir() {
        let tool = blast();
        let env = tool.environment(Path::new("/opt/blast/bin/pblast.opt"));
        assert_eq!(
            env.additional.get("PATH").map(String::as_str),
            Some(":../../opt/blast/bin")
        );
    }

    #[test]
    fn version_is_sliced_from_output() {
        let tool = blast();
        let version = tool
            .version(Path::new("/opt/blast/bin/pblast.opt"))
            .expect("version");
        assert_eq!(version, "2.7.3");
    }

    #[test]
    fn works_from_caller_directory() {
        let tool = blast();
        let exe = Path::new("/opt/blast/bin/pblast.opt");
        assert_eq!(tool.working_directory(exe), PathBuf::from("."));
        assert_eq!(tool.program_files(exe), vec![PathBuf::from("/opt/blast/bin")]);
    }
}
