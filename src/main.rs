//! Headless Particle Life Simulation
//!
//! Generates a random particle life system and steps it for a fixed number of
//! frames, logging aggregate statistics. Stands in for a renderer: each frame
//! it reads the particle buffer the way an uploader would.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use particle_simulation::ParticleSimulation;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config();
    log::debug!("{:?}", config);

    let mut simulation =
        ParticleSimulation::from_config(&config).context("failed to set up simulation")?;

    let dt = args.frame_dt();
    if dt < args.dt {
        log::warn!("Frame time {} clamped to {}", args.dt, dt);
    }

    let start = Instant::now();
    let mut uploaded_bytes = 0usize;
    for frame in 1..=args.frames {
        simulation
            .step(dt)
            .with_context(|| format!("step failed at frame {}", frame))?;
        uploaded_bytes += simulation.particle_bytes().len();

        if args.report_every > 0 && frame % args.report_every == 0 {
            let stats = simulation.stats();
            log::info!(
                "frame {:>6}: mean speed {:>8.3}, max speed {:>8.3}, kinetic energy {:>12.1}, {} occupied cells (max {} per cell)",
                frame,
                stats.mean_speed,
                stats.max_speed,
                stats.kinetic_energy,
                stats.occupied_cells,
                stats.max_cell_occupancy
            );
        }
    }

    let elapsed = start.elapsed();
    let per_frame_ms = if args.frames > 0 {
        elapsed.as_secs_f64() * 1000.0 / args.frames as f64
    } else {
        0.0
    };
    log::info!(
        "✓ Simulated {} frames of {} particles in {:.2?} ({:.3} ms/frame, {} bytes handed to renderer)",
        args.frames,
        simulation.particle_count(),
        elapsed,
        per_frame_ms,
        uploaded_bytes
    );

    Ok(())
}
