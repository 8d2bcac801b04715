use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline CSI phase sanitization driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Time samples (packets) per window
    #[arg(long, default_value_t = 5)]
    samples: usize,
    #[arg(long, default_value_t = 30)]
    subcarriers: usize,
    #[arg(long, default_value_t = 3)]
    tx: usize,
    #[arg(long, default_value_t = 3)]
    rx: usize,
    /// Windows to sanitize in one batch call
    #[arg(long, default_value_t = 1)]
    batch: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Write the JSON summary here instead of stdout
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            args.samples,
            args.subcarriers,
            args.tx,
            args.rx,
            args.batch,
            args.seed,
        )
    };

    let result = Runner::new(workflow_config)
        .execute()
        .context("running sanitization workflow")?;

    println!(
        "Sanitized {} window(s) {} -> mean amplitude {:.3}, pairs {}",
        result.windows,
        result.shape,
        result.mean_amplitude,
        result.pairs.len()
    );

    let report = serde_json::to_string_pretty(&result).context("serializing report")?;
    match args.report {
        Some(report_path) => {
            if let Some(parent) = report_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(&report_path, report)
                .with_context(|| format!("writing report {}", report_path.display()))?;
            log::info!("report written to {}", report_path.display());
        }
        None => println!("{}", report),
    }

    Ok(())
}
