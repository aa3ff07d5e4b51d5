//! The `photomap process` command, also run when no subcommand is given.

use clap::Args;
use photomap_core::{Config, PhotoMap, RunSummary};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the `process` command. Each one overrides the config file.
#[derive(Args, Debug, Default)]
pub struct ProcessArgs {
    /// Directory of source photos
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// Directory for thumbnail and large derivatives
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Manifest JSON file
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// URL prefix for derivative paths in the manifest
    #[arg(long)]
    pub url_prefix: Option<String>,

    /// Sort manifest records by id instead of file name order
    #[arg(long)]
    pub sort_by_id: bool,

    /// Write the manifest without indentation
    #[arg(long)]
    pub compact: bool,
}

impl ProcessArgs {
    /// Fold command-line overrides into the loaded config.
    fn apply(self, config: &mut Config) {
        if let Some(dir) = self.input_dir {
            config.paths.input_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.paths.output_dir = dir;
        }
        if let Some(path) = self.manifest {
            config.paths.manifest = path;
        }
        if let Some(prefix) = self.url_prefix {
            config.paths.url_prefix = prefix;
        }
        if self.sort_by_id {
            config.output.sort_by_id = true;
        }
        if self.compact {
            config.output.pretty = false;
        }
    }
}

/// Execute the process command.
pub async fn execute(args: ProcessArgs, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path.as_deref())?;
    args.apply(&mut config);

    tracing::info!(
        "Processing {:?} -> {:?}",
        config.input_dir(),
        config.output_dir()
    );

    let start = Instant::now();
    let summary = PhotoMap::new(config).run().await?;
    print_summary(&summary, start.elapsed());

    Ok(())
}

/// Print a human-readable summary to stderr.
fn print_summary(summary: &RunSummary, elapsed: std::time::Duration) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Processed:    {:>8}", summary.processed);
    if summary.skipped > 0 {
        eprintln!("    Skipped:      {:>8}", summary.skipped);
    }
    if summary.failed > 0 {
        eprintln!("    Failed:       {:>8}", summary.failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", summary.total());
    eprintln!("    Records:      {:>8}", summary.records);
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("  ====================================");
    eprintln!("    Manifest: {}", summary.manifest_path.display());
}
