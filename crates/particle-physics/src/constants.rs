//! Default parameters for the particle life simulation
//!
//! Distances are in simulation units, times in seconds. The defaults describe a
//! 1024×1024 domain centred on the origin, binned into 32-unit cells.

/// Side length of one spatial grid cell
pub const DEFAULT_BIN_SIZE: f32 = 32.0;

/// Default domain width
pub const DEFAULT_DOMAIN_WIDTH: f32 = 1024.0;

/// Default domain height
pub const DEFAULT_DOMAIN_HEIGHT: f32 = 1024.0;

/// Exponential velocity decay rate (`v *= exp(-dt * friction)`)
pub const DEFAULT_FRICTION: f32 = 10.0;

/// Strength of the pull towards the origin (0 disables it)
pub const DEFAULT_CENTRAL_FORCE: f32 = 0.0;

/// Upper bound for the magnitude of a generated attraction/repulsion strength
pub const DEFAULT_MAX_FORCE_STRENGTH: f32 = 100.0;

/// Smallest generated interaction radius
pub const DEFAULT_MIN_FORCE_RADIUS: f32 = 4.0;

/// Largest generated interaction radius. Must not exceed the bin size.
pub const DEFAULT_MAX_FORCE_RADIUS: f32 = DEFAULT_BIN_SIZE;

/// Collision strength is generated as `|strength| * factor`, factor in this range
pub const DEFAULT_MIN_COLLISION_FACTOR: f32 = 5.0;
pub const DEFAULT_MAX_COLLISION_FACTOR: f32 = 20.0;

/// Per-axis bound on generated initial velocities
pub const DEFAULT_INITIAL_SPEED: f32 = 10.0;

/// Range of generated species spawn weights
pub const MIN_SPAWN_WEIGHT: f32 = 0.25;
pub const MAX_SPAWN_WEIGHT: f32 = 1.0;

/// Default number of particles in a generated system
pub const DEFAULT_PARTICLE_COUNT: u32 = 16_384;

/// Default number of species in a generated system
pub const DEFAULT_SPECIES_COUNT: u32 = 6;

/// Default RNG seed
pub const DEFAULT_SEED: u32 = 12_345;
