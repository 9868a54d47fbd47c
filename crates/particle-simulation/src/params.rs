//! Simulation parameters for runtime tuning

use glam::Vec2;
use particle_physics::constants::*;

/// Axis-aligned simulation rectangle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl DomainBounds {
    pub fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// Rectangle of the given size centred on the origin
    pub fn centered(width: f32, height: f32) -> Self {
        Self::new(-0.5 * width, 0.5 * width, -0.5 * height, 0.5 * height)
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.left, self.bottom)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right, self.top)
    }

    /// Width and height
    pub fn extent(&self) -> Vec2 {
        self.max() - self.min()
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.bottom && p.y <= self.top
    }

    pub(crate) fn is_valid(&self) -> bool {
        let extent = self.extent();
        extent.is_finite() && extent.x > 0.0 && extent.y > 0.0
    }
}

impl Default for DomainBounds {
    fn default() -> Self {
        Self::centered(DEFAULT_DOMAIN_WIDTH, DEFAULT_DOMAIN_HEIGHT)
    }
}

/// What happens to particles that cross the domain edge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundaryMode {
    /// Toroidal domain: leave one edge, re-enter at the opposite one
    #[default]
    Wrap,
    /// Clamp to the edge and reflect the velocity component
    Bounce,
}

/// Transient user-applied force, typically from a pointer drag
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActionPoint {
    /// Centre of the influence, in domain coordinates
    pub position: Vec2,
    /// Drag velocity imparted to particles under the pointer
    pub velocity: Vec2,
    /// Magnitude multiplier; 0 means inactive
    pub force: f32,
    /// Gaussian falloff radius
    pub radius: f32,
}

impl ActionPoint {
    pub fn new(position: Vec2, velocity: Vec2, force: f32, radius: f32) -> Self {
        Self {
            position,
            velocity,
            force,
            radius,
        }
    }

    pub fn is_active(&self) -> bool {
        self.force != 0.0 && self.radius > 0.0
    }
}

/// Mutable global simulation parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationOptions {
    pub bounds: DomainBounds,
    pub friction: f32,
    pub central_force: f32,
    pub boundary_mode: BoundaryMode,
    pub action: ActionPoint,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            bounds: DomainBounds::default(),
            friction: DEFAULT_FRICTION,
            central_force: DEFAULT_CENTRAL_FORCE,
            boundary_mode: BoundaryMode::Wrap,
            action: ActionPoint::default(),
        }
    }
}

/// Parameters fixed for the lifetime of a controller: grid resolution and the
/// ranges random systems are drawn from
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationParams {
    /// Grid cell side length; every interaction radius must fit inside it
    pub bin_size: f32,
    pub max_force_strength: f32,
    pub min_force_radius: f32,
    pub max_force_radius: f32,
    pub min_collision_factor: f32,
    pub max_collision_factor: f32,
    pub initial_speed: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            bin_size: DEFAULT_BIN_SIZE,
            max_force_strength: DEFAULT_MAX_FORCE_STRENGTH,
            min_force_radius: DEFAULT_MIN_FORCE_RADIUS,
            max_force_radius: DEFAULT_MAX_FORCE_RADIUS,
            min_collision_factor: DEFAULT_MIN_COLLISION_FACTOR,
            max_collision_factor: DEFAULT_MAX_COLLISION_FACTOR,
            initial_speed: DEFAULT_INITIAL_SPEED,
        }
    }
}

/// Everything a host needs to set up a system in one go
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    pub particle_count: u32,
    pub species_count: u32,
    pub width: f32,
    pub height: f32,
    pub friction: f32,
    pub central_force: f32,
    pub boundary_mode: BoundaryMode,
    pub symmetric_forces: bool,
    pub seed: u32,
    pub generation: GenerationParams,
}

impl SimulationConfig {
    /// Runtime options implied by this configuration (no active action point)
    pub fn options(&self) -> SimulationOptions {
        SimulationOptions {
            bounds: DomainBounds::centered(self.width, self.height),
            friction: self.friction,
            central_force: self.central_force,
            boundary_mode: self.boundary_mode,
            action: ActionPoint::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            species_count: DEFAULT_SPECIES_COUNT,
            width: DEFAULT_DOMAIN_WIDTH,
            height: DEFAULT_DOMAIN_HEIGHT,
            friction: DEFAULT_FRICTION,
            central_force: DEFAULT_CENTRAL_FORCE,
            boundary_mode: BoundaryMode::Wrap,
            symmetric_forces: false,
            seed: DEFAULT_SEED,
            generation: GenerationParams::default(),
        }
    }
}
