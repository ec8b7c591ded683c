mod env;
mod error;
mod export;
mod mapping;
mod workflow;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::debug;

use crate::env::EnvMap;
use crate::error::Error;
use crate::export::Exporter;
use crate::mapping::{branch_from_ref, BranchMap};

/// Resolve the deployment environment for the current CI branch and fan out
/// prefixed configuration variables to later pipeline steps
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set logging level for stderr diagnostics
    #[arg(long, value_enum, default_value_t = LogLevel::Error)]
    log_level: LogLevel,

    /// Newline-delimited branch=environment mappings
    #[arg(long = "map", env = "INPUT_BRANCH-TO-ENV-MAP", value_name = "MAP")]
    branch_to_env_map: String,

    /// Fully-qualified ref that triggered the run (e.g. refs/heads/main)
    #[arg(long = "ref", env = "GITHUB_REF", value_name = "REF")]
    git_ref: String,

    /// Environment file that receives the exports; the legacy set-env
    /// command is emitted when absent
    #[arg(long, env = "GITHUB_ENV", value_name = "PATH")]
    env_file: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(cli.log_level.to_filter())
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("CLI arguments: {:#?}", cli);

    if let Err(err) = run(&cli) {
        workflow::error(&format!("{err:#}"));
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let map = BranchMap::parse(&cli.branch_to_env_map)?;
    let branch = branch_from_ref(&cli.git_ref);
    debug!("Branch: {}", branch);

    // The resolution check precedes every export; an unmapped branch must
    // not leave partial state behind.
    let Some(environment) = map.resolve(branch) else {
        return Err(Error::UnmappedBranch {
            branch: branch.to_string(),
            mappings: map.to_json(),
        }
        .into());
    };

    let mut exporter = Exporter::new(EnvMap::from_process(), cli.env_file.as_deref())?;
    export::propagate(&mut exporter, branch, environment)?;

    Ok(())
}
