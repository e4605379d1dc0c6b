use anyhow::Result;
use log::{debug, error, info, warn};
use openfield_common::{OutputConfig, SimulationConfig, TrajectoryDataset};
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

// Define modules used by main
mod agent;
mod environment;
mod geometry;
mod simulation;

use simulation::ArenaSimulation;

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting open-field simulation engine...");

    // --- Load Configuration ---
    let config = SimulationConfig::load("config.toml")?;

    // --- Initialize Simulation ---
    let mut sim = ArenaSimulation::new(config)?;
    info!(
        "Arena initialized: {}x{} mm, {} agents.",
        sim.params().arena_width,
        sim.params().arena_height,
        sim.params().n_agents
    );
    debug!("Simulation parameters: {:#?}", sim.params());

    let n_ticks = sim.params().n_ticks;
    let tick_ms = sim.params().tick_ms;
    info!(
        "Running {} ticks of {:.1} ms ({} simulated minutes)...",
        n_ticks,
        tick_ms,
        sim.params().run_minutes
    );

    // --- Simulation Loop ---
    let start_time = Instant::now();
    let mut previous_print_time = start_time;
    let print_interval_secs = 5.0;

    for tick in 0..n_ticks {
        if let Err(e) = sim.tick() {
            error!("Error during simulation tick {}: {}", tick + 1, e);
            anyhow::bail!("Simulation tick failed.");
        }

        let current_time = Instant::now();
        let should_print_status =
            current_time.duration_since(previous_print_time).as_secs_f64() >= print_interval_secs;
        let is_last_tick = tick == n_ticks - 1;

        if should_print_status || is_last_tick {
            info!(
                "Tick [{}/{}] ({:.1} simulated s) | Rejected candidates: {} | Elapsed: {:.2} s",
                tick + 1,
                n_ticks,
                (tick + 1) as f32 * tick_ms / 1000.0,
                sim.rejected_candidates(),
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = current_time;
        }
    }

    let total_duration = start_time.elapsed();
    info!(
        "Simulation finished in {:.3} seconds ({} ticks, {} rejected candidates).",
        total_duration.as_secs_f64(),
        sim.current_tick(),
        sim.rejected_candidates()
    );
    if sim.no_valid_move_events() > 0 {
        warn!(
            "{} tick(s) exhausted the retry budget; affected agents kept their previous position.",
            sim.no_valid_move_events()
        );
    }

    // --- Save Recorded Data ---
    if sim.config().output.save_trajectory {
        let dataset = sim.build_trajectory();
        match save_trajectory(&dataset, &sim.config().output) {
            Ok(path) => info!("Trajectory dataset saved to {}", path.display()),
            Err(e) => error!("Error saving trajectory dataset: {}", e),
        }
    } else {
        info!("Skipping trajectory save as per config.");
    }

    // Save final centers if requested (separate from the full trajectory)
    if sim.config().output.save_final_centers {
        let filename = format!("{}_final_centers.csv", sim.config().output.base_filename);
        let path = PathBuf::from(&sim.config().output.output_dir).join(filename);

        match csv::Writer::from_path(&path) {
            Ok(mut writer) => {
                writer.write_record(&["x_mm", "y_mm"])?;
                for (x, y) in sim.final_centers() {
                    writer.write_record(&[format!("{:.4}", x), format!("{:.4}", y)])?;
                }
                writer.flush()?;
                info!("Final centers saved to {}", path.display());
            }
            Err(e) => error!("Error saving CSV file '{}': {}", path.display(), e),
        }
    }

    info!("Simulation complete.");
    Ok(())
}

/// Writes the dataset in the configured format. The filename leads with the
/// agent count, which is the category key the interaction report groups by.
fn save_trajectory(dataset: &TrajectoryDataset, output: &OutputConfig) -> Result<PathBuf> {
    let requested = output.format.as_deref().unwrap_or("json");
    let format = if matches!(requested, "json" | "bincode" | "messagepack") {
        requested
    } else {
        error!("Unknown output format: {}. Using JSON instead.", requested);
        "json"
    };

    let stem = format!(
        "{}agents_{}min_{}",
        dataset.meta.n_agents, dataset.meta.run_minutes, output.base_filename
    );
    let dir = PathBuf::from(&output.output_dir);

    match format {
        "bincode" => {
            let path = dir.join(format!("{stem}.bin"));
            let file = File::create(&path)?;
            bincode::serialize_into(file, dataset)?;
            Ok(path)
        }
        "messagepack" => {
            let path = dir.join(format!("{stem}.msgpack"));
            let mut file = File::create(&path)?;
            rmp_serde::encode::write(&mut file, dataset)?;
            Ok(path)
        }
        _ => {
            let path = dir.join(format!("{stem}.json"));
            let file = File::create(&path)?;
            serde_json::to_writer(file, dataset)?;
            Ok(path)
        }
    }
}
