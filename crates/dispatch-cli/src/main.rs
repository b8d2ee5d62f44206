mod cli;
mod inputs;
mod scenario;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(cli.log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let Commands::Run(args) = cli.command;
    let config_paths = scenario::resolve_scenario_paths(&args)?;

    let mut failures = 0usize;
    for path in &config_paths {
        match scenario::run_one(path, &args) {
            Ok(()) => {}
            Err(err) => {
                failures += 1;
                tracing::error!(config = %path.display(), error = %err, "scenario failed");
            }
        }
    }

    let total = config_paths.len();
    tracing::info!(total, failures, "run complete");
    if failures > 0 {
        anyhow::bail!("{failures} of {total} scenario(s) failed");
    }
    Ok(())
}
