use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::{ConfigOverrides, WorkflowConfig};
use workflow::runner::{Runner, StormSummary};

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline automated Dvorak analysis driver")]
struct Args {
    /// Run the built-in synthetic storm instead of a workflow file
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Seed for the synthetic scenes of the offline storm
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Initial raw T# used when a storm has no history
    #[arg(long)]
    init_raw_t: Option<f64>,
    /// Analyst radius of maximum wind in km
    #[arg(long)]
    manual_rmw: Option<f64>,
    /// Treat land-flagged records as usable
    #[arg(long, default_value_t = false)]
    no_land_check: bool,
    /// Directory for the revised history snapshots
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Worker threads; storms beyond this count queue
    #[arg(long, default_value_t = 4)]
    workers: usize,
    /// Print the summaries as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = match (&args.workflow, args.offline) {
        (Some(path), _) => WorkflowConfig::load(path)?,
        (None, true) => WorkflowConfig::offline(args.seed),
        (None, false) => anyhow::bail!("nothing to run: pass --workflow <file> or --offline"),
    };
    workflow_config.apply_overrides(&ConfigOverrides {
        init_raw_t: args.init_raw_t,
        manual_rmw_km: args.manual_rmw,
        disable_land_check: args.no_land_check,
        output_dir: args.output_dir.clone(),
    })?;

    let runtime = TokioBuilder::new_multi_thread()
        .worker_threads(1)
        .max_blocking_threads(args.workers.max(1))
        .enable_all()
        .build()
        .context("creating runtime for storm workers")?;
    let runner = Runner::new(workflow_config);
    let summaries = runtime.block_on(runner.run_all())?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).context("encoding summaries")?
        );
    } else {
        for summary in &summaries {
            print_summary(summary);
        }
    }
    Ok(())
}

fn print_summary(summary: &StormSummary) {
    println!(
        "{} -> passes {}, adjusted {}, revisions {}, records {}",
        summary.storm_id,
        summary.metrics.passes,
        summary.metrics.adjustments,
        summary.metrics.revisions,
        summary.history_records
    );
    for pass in &summary.passes {
        println!(
            "  {} {:06}  {:<12} {:<16} T# {:.1} (raw {:.1})  {:>5.0} kt {:>7.1} hPa{}",
            pass.date,
            pass.time,
            pass.eye_scene,
            pass.cloud_scene,
            pass.final_intensity,
            pass.raw_intensity,
            pass.wind_kt,
            pass.pressure_hpa,
            if pass.adjusted { "  MW" } else { "" }
        );
    }
    println!(
        "  mean T# {:.1}, trend {:+.1} per day",
        summary.mean_final_intensity, summary.intensification_per_day
    );
    if let Some(path) = &summary.snapshot {
        println!("  history written to {}", path.display());
    }
}
