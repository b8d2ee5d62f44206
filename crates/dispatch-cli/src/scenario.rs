//! Resolves which scenario config files a `run` invocation covers, then
//! drives each through build → solve → write, tallying success/failure so
//! one scenario's failure never aborts the loop.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dispatch_algo::solver::SolverOptions;
use dispatch_algo::{build_model, solve};

use crate::cli::{RunArgs, SolverArg};
use crate::inputs;

pub fn resolve_scenario_paths(args: &RunArgs) -> Result<Vec<PathBuf>> {
    if let Some(name) = &args.config {
        let path = args.config_dir.join(format!("{name}.json"));
        return Ok(vec![path]);
    }

    let prefix = args
        .use_case
        .as_ref()
        .expect("clap ArgGroup guarantees exactly one of config/use_case is set");
    let needle = format!("{prefix}_");
    let mut matches = Vec::new();
    for entry in fs::read_dir(&args.config_dir)
        .with_context(|| format!("reading config directory '{}'", args.config_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if stem.starts_with(&needle) {
            matches.push(path);
        }
    }
    matches.sort();
    if matches.is_empty() {
        anyhow::bail!("no config files under '{}' matched use-case prefix '{prefix}'", args.config_dir.display());
    }
    Ok(matches)
}

fn to_solver_options(args: &RunArgs) -> SolverOptions {
    use dispatch_algo::solver::SolverKind;
    SolverOptions {
        solver: match args.solver {
            SolverArg::Highs => SolverKind::Highs,
            SolverArg::CoinCbc => SolverKind::CoinCbc,
            SolverArg::ClarabelRelaxation => SolverKind::ClarabelRelaxation,
        },
        time_limit_s: args.time_limit_s,
        mip_gap: args.mip_gap,
    }
}

/// Builds, solves, and writes the artifacts for one scenario. Returns an
/// error without touching other scenarios' outputs.
pub fn run_one(config_path: &Path, args: &RunArgs) -> Result<()> {
    let scenario = config_path
        .file_stem()
        .and_then(|s| s.to_str())
        .context("config file has no usable stem")?
        .to_string();
    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let span = tracing::info_span!("scenario", name = %scenario);
    let _guard = span.enter();

    let config = dispatch_io::load_config(config_path)?;
    let model_inputs = inputs::resolve(&config, &config_dir)?;
    let gas_price = model_inputs.gas_price.clone();
    let power_price = model_inputs.power_price.clone();
    let hydrogen_price = model_inputs.hydrogen_price.clone();
    let co2_price = model_inputs.scalars.co2_price;
    let heat_price = model_inputs.scalars.heat_price;
    let h2_price = model_inputs.scalars.h2_price;
    let use_const_h2_price = model_inputs.scalars.use_const_h2_price;
    let model = build_model(model_inputs)?;

    let options = to_solver_options(args);
    let outcome = solve(
        model,
        &options,
        &scenario,
        &gas_price,
        &power_price,
        &hydrogen_price,
        co2_price,
        heat_price,
        h2_price,
        use_const_h2_price,
    )?;

    let dir = dispatch_io::scenario_dir(&args.output_root, &scenario)?;
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    dispatch_io::write_output_csv(&dir, &scenario, &timestamp, &outcome.rows)?;
    dispatch_io::write_cost_json(&dir, &scenario, &timestamp, &outcome.costs)?;
    dispatch_io::write_metadata_json(&dir, &scenario, &timestamp, &outcome.metadata)?;
    dispatch_io::write_solver_log(&dir, &scenario, &timestamp, &format!("solved with {}\n", outcome.metadata.solver))?;

    tracing::info!(scenario = %scenario, objective = outcome.costs.objective, "scenario solved");
    Ok(())
}
