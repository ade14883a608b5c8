//! Command-line front end for the verifier adaptors.
//!
//! Resolves tools on the search path, prints the command line a harness
//! should run, and classifies captured output into a verdict.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use toolinfo::core::types::{CmdlineRequest, Environment, RunResult};
use toolinfo::error::ToolError;
use toolinfo::exit_codes;
use toolinfo::io::config::{CONFIG_FILE, load_config};
use toolinfo::logging;
use toolinfo::tools::{ToolContext, ToolId, describe, registry};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "toolinfo",
    version,
    about = "Locate, launch and classify software verifiers"
)]
struct Cli {
    /// Config file (default: `toolinfo.toml` in the current directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the supported tool ids and their display names.
    List,
    /// Resolve a tool and print its descriptor as JSON.
    Info { tool: ToolId },
    /// Print the command line for one run as JSON.
    Cmdline {
        tool: ToolId,
        /// Extra tool option (repeatable, kept in order).
        #[arg(long = "option", allow_hyphen_values = true)]
        options: Vec<String>,
        /// Property specification file.
        #[arg(long)]
        propertyfile: Option<PathBuf>,
        /// Input programs.
        sourcefiles: Vec<PathBuf>,
    },
    /// Classify captured tool output and print the verdict.
    Classify {
        tool: ToolId,
        /// File holding the tool's output, one line per output line.
        #[arg(long)]
        output: PathBuf,
        /// Process exit code.
        #[arg(long, allow_negative_numbers = true)]
        returncode: Option<i32>,
        /// Signal that terminated the process.
        #[arg(long)]
        signal: Option<i32>,
        /// The run hit its time limit.
        #[arg(long)]
        timeout: bool,
    },
}

/// What a harness needs to launch one run.
#[derive(Serialize)]
struct Invocation {
    args: Vec<String>,
    working_directory: PathBuf,
    environment: Environment,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ToolError>() {
        Some(ToolError::ExecutableNotFound { .. }) => exit_codes::NOT_FOUND,
        Some(ToolError::Precondition(_)) => exit_codes::PRECONDITION,
        _ => exit_codes::INVALID,
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("read current directory")?;
    let config_path = cli.config.unwrap_or_else(|| cwd.join(CONFIG_FILE));
    let config = load_config(&config_path)?;
    let ctx = ToolContext::from_config(&config, cwd);

    match cli.command {
        Command::List => cmd_list(&ctx),
        Command::Info { tool } => cmd_info(&ctx, tool),
        Command::Cmdline {
            tool,
            options,
            propertyfile,
            sourcefiles,
        } => {
            let request = CmdlineRequest {
                options,
                sourcefiles,
                propertyfile,
                ..CmdlineRequest::default()
            };
            cmd_cmdline(&ctx, tool, &request)
        }
        Command::Classify {
            tool,
            output,
            returncode,
            signal,
            timeout,
        } => {
            let bytes =
                fs::read(&output).with_context(|| format!("read output {}", output.display()))?;
            let contents = String::from_utf8_lossy(&bytes);
            let run = RunResult {
                returncode,
                signal,
                output: contents.lines().map(str::to_string).collect(),
                timed_out: timeout,
            };
            cmd_classify(&ctx, tool, &run)
        }
    }
}

fn cmd_list(ctx: &ToolContext) -> Result<()> {
    for tool in registry::all(ctx) {
        println!("{}\t{}", tool.id(), tool.name());
    }
    Ok(())
}

fn cmd_info(ctx: &ToolContext, id: ToolId) -> Result<()> {
    let tool = registry::create(id, ctx.clone());
    let descriptor = describe(tool.as_ref())?;
    print_json(&descriptor)
}

fn cmd_cmdline(ctx: &ToolContext, id: ToolId, request: &CmdlineRequest) -> Result<()> {
    let tool = registry::create(id, ctx.clone());
    let executable = tool.executable()?;
    let args = tool.cmdline(&executable, request)?;
    debug!(tool = %id, ?args, "command line built");
    print_json(&Invocation {
        args,
        working_directory: tool.working_directory(&executable),
        environment: tool.environment(&executable),
    })
}

fn cmd_classify(ctx: &ToolContext, id: ToolId, run: &RunResult) -> Result<()> {
    let tool = registry::create(id, ctx.clone());
    let verdict = tool.determine_result(run);
    println!("{}", verdict);
    Ok(())
}

/// Print `value` as pretty JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{}", payload);
    Ok(())
}
