//! Command-line surface: one `run` subcommand over a config file or a
//! glob of configs sharing a use-case prefix.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Logging verbosity passed to the tracing subscriber.
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and solve one or more dispatch scenarios.
    Run(RunArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverArg {
    Highs,
    CoinCbc,
    ClarabelRelaxation,
}

#[derive(Parser, Debug)]
#[command(group(
    ArgGroup::new("scenario_selection")
        .args(["config", "use_case"])
        .required(true)
        .multiple(false)
))]
pub struct RunArgs {
    /// Directory containing scenario config JSON files.
    #[arg(long, default_value = "configs")]
    pub config_dir: PathBuf,

    /// Run the single scenario named by this config file's basename
    /// (without the `.json` extension).
    #[arg(long)]
    pub config: Option<String>,

    /// Run every config in `config_dir` whose basename starts with
    /// `<prefix>_`.
    #[arg(long)]
    pub use_case: Option<String>,

    /// Root directory the per-scenario output tree is written under.
    #[arg(long, default_value = "output")]
    pub output_root: PathBuf,

    #[arg(long, value_enum, default_value = "highs")]
    pub solver: SolverArg,

    #[arg(long)]
    pub time_limit_s: Option<f64>,

    #[arg(long)]
    pub mip_gap: Option<f64>,
}
