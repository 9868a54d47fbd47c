use clap::{Parser, ValueEnum};
use particle_physics::constants::*;
use particle_simulation::{BoundaryMode, GenerationParams, SimulationConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Boundary {
    Wrap,
    Bounce,
}

impl From<Boundary> for BoundaryMode {
    fn from(boundary: Boundary) -> Self {
        match boundary {
            Boundary::Wrap => BoundaryMode::Wrap,
            Boundary::Bounce => BoundaryMode::Bounce,
        }
    }
}

/// Headless particle life runner
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Number of particles
    #[arg(short = 'n', long, default_value_t = DEFAULT_PARTICLE_COUNT)]
    pub particles: u32,

    /// Number of species
    #[arg(short, long, default_value_t = DEFAULT_SPECIES_COUNT)]
    pub species: u32,

    /// Domain width
    #[arg(long, default_value_t = DEFAULT_DOMAIN_WIDTH)]
    pub width: f32,

    /// Domain height
    #[arg(long, default_value_t = DEFAULT_DOMAIN_HEIGHT)]
    pub height: f32,

    #[arg(long, default_value_t = DEFAULT_FRICTION)]
    pub friction: f32,

    #[arg(long, default_value_t = DEFAULT_CENTRAL_FORCE)]
    pub central_force: f32,

    #[arg(long, value_enum, default_value_t = Boundary::Wrap)]
    pub boundary: Boundary,

    /// Average A→B and B→A interaction parameters
    #[arg(long)]
    pub symmetric: bool,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u32,

    /// Grid cell size; also the largest generated interaction radius
    #[arg(long, default_value_t = DEFAULT_BIN_SIZE)]
    pub bin_size: f32,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    pub frames: u32,

    /// Frame time in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Upper bound applied to each frame time before stepping
    #[arg(long, default_value_t = 1.0 / 20.0)]
    pub max_dt: f32,

    /// Log statistics every N frames (0 disables)
    #[arg(long, default_value_t = 60)]
    pub report_every: u32,
}

impl Args {
    pub fn config(&self) -> SimulationConfig {
        SimulationConfig {
            particle_count: self.particles,
            species_count: self.species,
            width: self.width,
            height: self.height,
            friction: self.friction,
            central_force: self.central_force,
            boundary_mode: self.boundary.into(),
            symmetric_forces: self.symmetric,
            seed: self.seed,
            generation: GenerationParams {
                bin_size: self.bin_size,
                max_force_radius: self.bin_size,
                min_force_radius: DEFAULT_MIN_FORCE_RADIUS.min(self.bin_size),
                ..Default::default()
            },
        }
    }

    /// Frame time after the caller-side clamp
    pub fn frame_dt(&self) -> f32 {
        self.dt.min(self.max_dt)
    }
}
