use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use openfield_common::TrajectoryDataset;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

mod interactions;

use interactions::measure_interactions;

/// Command-line arguments for the interaction report
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Distance threshold (mm) below which two agents count as interacting
    threshold: u32,

    /// Directory to scan for trajectory datasets
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Report file path (defaults to sim_results_<unix seconds>.txt in the data directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

const DATASET_EXTENSIONS: &[&str] = &["json", "bin", "msgpack"];

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    info!(
        "Scanning {} for trajectory datasets (threshold {} mm)...",
        args.data_dir.display(),
        args.threshold
    );

    let dataset_paths = discover_datasets(&args.data_dir)?;
    if dataset_paths.is_empty() {
        warn!("No trajectory datasets found in {}.", args.data_dir.display());
    }

    // Group datasets by agent-count category: the leading digit of the
    // file name, which the engine writes as "<n>agents_...".
    let mut categories: BTreeMap<char, Vec<PathBuf>> = BTreeMap::new();
    for path in dataset_paths {
        match leading_digit(&path) {
            Some(digit) => categories.entry(digit).or_default().push(path),
            None => warn!(
                "Skipping '{}': file name does not lead with an agent count.",
                path.display()
            ),
        }
    }

    let report_path = args
        .output
        .unwrap_or_else(|| args.data_dir.join(default_report_name()));
    let mut report = File::create(&report_path)
        .with_context(|| format!("Failed to create report file '{}'", report_path.display()))?;
    writeln!(report, "Simulation results")?;
    writeln!(report, "distance threshold {} mm", args.threshold)?;

    for (digit, paths) in &categories {
        writeln!(report, "{} agents", digit)?;
        for path in paths {
            info!("Analyzing {}", path.display());
            match analyze_dataset(path, args.threshold as f32) {
                Ok(fractions) => {
                    let line = fractions
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" ");
                    writeln!(report, "{line}")?;
                }
                // malformed or unreadable datasets are reported, not fatal
                Err(e) => error!("Skipping '{}': {}", path.display(), e),
            }
        }
    }

    info!("Report written to {}", report_path.display());
    Ok(())
}

/// All regular files in `dir` with a known dataset extension, sorted for a
/// stable report order.
fn discover_datasets(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read data directory '{}'", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let known_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| DATASET_EXTENSIONS.contains(&ext));
        if path.is_file() && known_extension {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn leading_digit(path: &Path) -> Option<char> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.chars().next())
        .filter(char::is_ascii_digit)
}

fn default_report_name() -> String {
    let unix_seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("sim_results_{unix_seconds}.txt")
}

/// Loads one dataset (format chosen by extension), validates its shapes
/// and measures per-agent interaction fractions.
fn analyze_dataset(path: &Path, threshold: f32) -> Result<Vec<f32>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset '{}'", path.display()))?;
    let reader = BufReader::new(file);

    let dataset: TrajectoryDataset = match path.extension().and_then(|ext| ext.to_str()) {
        Some("bin") => bincode::deserialize_from(reader)
            .with_context(|| format!("Failed to decode bincode dataset '{}'", path.display()))?,
        Some("msgpack") => rmp_serde::from_read(reader)
            .with_context(|| format!("Failed to decode MessagePack dataset '{}'", path.display()))?,
        _ => serde_json::from_reader(reader)
            .with_context(|| format!("Failed to decode JSON dataset '{}'", path.display()))?,
    };
    dataset.validate()?;

    Ok(measure_interactions(&dataset, threshold))
}
