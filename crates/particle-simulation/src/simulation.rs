//! Particle life simulation controller
//!
//! Owns every working buffer for one `initialize()` cycle. Calls must be
//! serialized by the host: `step` is not safe to interleave with `generate` or
//! the mutators from another thread, and the type is not shared internally.

use crate::accumulator::accumulate_forces;
use crate::error::{try_alloc, Result, SimulationError};
use crate::force_table::ForceTable;
use crate::generate::{generate_forces, generate_species, spawn_particles};
use crate::grid::SpatialGrid;
use crate::integrator::integrate;
use crate::params::{
    ActionPoint, BoundaryMode, DomainBounds, GenerationParams, SimulationConfig, SimulationOptions,
};
use crate::rng::SplitMix32;
use particle_physics::{Force, Particle, Species};

/// Buffers allocated by `initialize`
struct SimulationState {
    particles: Vec<Particle>,
    species: Vec<Species>,
    forces: ForceTable,
    grid: SpatialGrid,
    rng: SplitMix32,
    seed: u32,
}

/// Snapshot of aggregate quantities for diagnostics
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationStats {
    pub particle_count: usize,
    pub mean_speed: f32,
    pub max_speed: f32,
    /// Sum of `|v|² / 2` (unit mass)
    pub kinetic_energy: f32,
    /// Cells holding at least one particle at the last grid rebuild
    pub occupied_cells: usize,
    /// Largest particle count in a single cell at the last grid rebuild
    pub max_cell_occupancy: usize,
}

/// CPU particle life simulation
pub struct ParticleSimulation {
    options: SimulationOptions,
    generation: GenerationParams,
    state: Option<SimulationState>,
    grid_stale: bool,
}

impl ParticleSimulation {
    /// Empty controller; call [`initialize`](Self::initialize) before stepping
    pub fn new(options: SimulationOptions, generation: GenerationParams) -> Self {
        Self {
            options,
            generation,
            state: None,
            grid_stale: false,
        }
    }

    /// Build, initialize and generate a system from a host configuration
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let mut simulation = Self::new(config.options(), config.generation);
        simulation.initialize(config.particle_count, config.species_count, config.seed)?;
        simulation.generate(config.symmetric_forces)?;
        Ok(simulation)
    }

    /// Allocate all buffers for `particle_count` particles of `species_count`
    /// species and size the grid from the current domain bounds
    ///
    /// On failure the controller is left uninitialized.
    pub fn initialize(&mut self, particle_count: u32, species_count: u32, seed: u32) -> Result<()> {
        self.state = None;
        self.grid_stale = false;

        if species_count == 0 {
            return Err(SimulationError::InvalidConfig(
                "species count must be at least 1".to_string(),
            ));
        }
        self.validate_generation()?;

        let grid = SpatialGrid::new(
            self.options.bounds,
            self.generation.bin_size,
            particle_count as usize,
        )?;
        let particles = try_alloc("particle", particle_count as usize)?;
        let species = try_alloc("species", species_count as usize)?;
        let forces = ForceTable::new(species_count)?;

        log::info!(
            "Initialized {} particles, {} species, {}x{} grid (bin size {})",
            particle_count,
            species_count,
            grid.width(),
            grid.height(),
            grid.bin_size()
        );
        if self.options.boundary_mode == BoundaryMode::Wrap && !grid.tiles_exactly() {
            log::debug!(
                "Domain {:?} leaves partial cells at the wrap seam; neighbour scan reaches past them",
                self.options.bounds.extent()
            );
        }

        self.state = Some(SimulationState {
            particles,
            species,
            forces,
            grid,
            rng: SplitMix32::new(seed),
            seed,
        });
        Ok(())
    }

    fn validate_generation(&self) -> Result<()> {
        let g = &self.generation;
        if g.max_force_radius > g.bin_size {
            return Err(SimulationError::ForceRadiusExceedsBin {
                radius: g.max_force_radius,
                bin_size: g.bin_size,
            });
        }
        if !(g.min_force_radius > 0.0) || g.min_force_radius > g.max_force_radius {
            return Err(SimulationError::InvalidConfig(format!(
                "force radius range {}..{} is empty or non-positive",
                g.min_force_radius, g.max_force_radius
            )));
        }
        if g.min_collision_factor < 0.0 || g.min_collision_factor > g.max_collision_factor {
            return Err(SimulationError::InvalidConfig(format!(
                "collision factor range {}..{} is invalid",
                g.min_collision_factor, g.max_collision_factor
            )));
        }
        Ok(())
    }

    /// Draw new species, forces and particles from the RNG
    ///
    /// The RNG keeps its state between calls, so calling this again produces a
    /// different system without reallocating.
    pub fn generate(&mut self, symmetric: bool) -> Result<()> {
        let state = self.state.as_mut().ok_or(SimulationError::NotInitialized)?;

        generate_species(&mut state.species, &mut state.rng);
        generate_forces(&mut state.forces, &self.generation, symmetric, &mut state.rng);
        spawn_particles(
            &mut state.particles,
            &state.species,
            &self.options.bounds,
            &self.generation,
            &mut state.rng,
        );

        log::info!(
            "Generated system: {} particles, {} species, seed {}, symmetric forces: {}",
            state.particles.len(),
            state.species.len(),
            state.seed,
            symmetric
        );
        Ok(())
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// `dt` is used as given; clamping long frames is up to the caller. Fails
    /// with [`SimulationError::SpeciesOutOfRange`] if a particle written through
    /// [`particles_mut`](Self::particles_mut) names a species that does not
    /// exist; nothing is advanced in that case.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if self.grid_stale {
            return Err(SimulationError::StaleGrid);
        }
        let state = self.state.as_mut().ok_or(SimulationError::NotInitialized)?;

        let species_count = state.forces.species_count();
        if let Some(particle) = state.particles.iter().find(|p| p.species >= species_count) {
            return Err(SimulationError::SpeciesOutOfRange {
                species: particle.species,
                species_count,
            });
        }

        state.grid.rebuild(&state.particles);
        accumulate_forces(
            &mut state.particles,
            &state.grid,
            &state.forces,
            &self.options,
            dt,
        );
        integrate(&mut state.particles, &self.options, dt);
        Ok(())
    }

    /// Change the domain rectangle
    ///
    /// The grid is not resized: until [`initialize`](Self::initialize) is
    /// called again, `step` fails with [`SimulationError::StaleGrid`].
    pub fn set_domain_bounds(&mut self, bounds: DomainBounds) {
        self.options.bounds = bounds;
        self.grid_stale = self
            .state
            .as_ref()
            .is_some_and(|state| *state.grid.bounds() != bounds);
        if self.grid_stale {
            log::debug!("Domain bounds changed to {:?}; grid needs re-initialization", bounds);
        }
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.options.friction = friction;
    }

    pub fn set_central_force(&mut self, central_force: f32) {
        self.options.central_force = central_force;
    }

    pub fn set_boundary_mode(&mut self, mode: BoundaryMode) {
        self.options.boundary_mode = mode;
    }

    pub fn set_action_point(&mut self, action: ActionPoint) {
        self.options.action = action;
    }

    pub fn clear_action_point(&mut self) {
        self.options.action = ActionPoint::default();
    }

    /// Replace one entry of the force matrix
    ///
    /// The radius must fit inside one grid cell and enclose the collision radius.
    pub fn set_force(&mut self, a: u32, b: u32, force: Force) -> Result<()> {
        let bin_size = self.generation.bin_size;
        let state = self.state.as_mut().ok_or(SimulationError::NotInitialized)?;

        if force.radius > bin_size {
            return Err(SimulationError::ForceRadiusExceedsBin {
                radius: force.radius,
                bin_size,
            });
        }
        if !(force.radius > 0.0)
            || force.collision_radius < 0.0
            || force.collision_radius > force.radius
            || force.collision_strength < 0.0
        {
            return Err(SimulationError::InvalidConfig(format!(
                "force {:?} needs 0 < radius, 0 <= collision radius <= radius and collision strength >= 0",
                force
            )));
        }
        state.forces.set(a, b, force)
    }

    /// Restart the RNG sequence; the next `generate` is reproducible from `seed`
    pub fn set_seed(&mut self, seed: u32) -> Result<()> {
        let state = self.state.as_mut().ok_or(SimulationError::NotInitialized)?;
        state.rng.seed(seed);
        state.seed = seed;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    pub fn generation_params(&self) -> &GenerationParams {
        &self.generation
    }

    /// Particle buffer, empty before initialization
    pub fn particles(&self) -> &[Particle] {
        match &self.state {
            Some(state) => &state.particles,
            None => &[],
        }
    }

    /// Mutable particle buffer for hosts that place or edit particles directly
    ///
    /// Species indices must stay below [`species_count`](Self::species_count);
    /// `step` rejects the buffer otherwise.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        match &mut self.state {
            Some(state) => &mut state.particles,
            None => &mut [],
        }
    }

    /// Species buffer, empty before initialization
    pub fn species(&self) -> &[Species] {
        match &self.state {
            Some(state) => &state.species,
            None => &[],
        }
    }

    /// Row-major force matrix, empty before initialization
    pub fn forces(&self) -> &[Force] {
        match &self.state {
            Some(state) => state.forces.as_slice(),
            None => &[],
        }
    }

    pub fn force_table(&self) -> Option<&ForceTable> {
        self.state.as_ref().map(|s| &s.forces)
    }

    pub fn grid(&self) -> Option<&SpatialGrid> {
        self.state.as_ref().map(|s| &s.grid)
    }

    pub fn particle_count(&self) -> usize {
        self.particles().len()
    }

    pub fn species_count(&self) -> u32 {
        self.state.as_ref().map_or(0, |s| s.forces.species_count())
    }

    pub fn seed(&self) -> Option<u32> {
        self.state.as_ref().map(|s| s.seed)
    }

    /// Particle buffer as raw bytes for GPU upload
    pub fn particle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.particles())
    }

    pub fn species_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.species())
    }

    pub fn force_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.forces())
    }

    pub fn stats(&self) -> SimulationStats {
        let Some(state) = self.state.as_ref() else {
            return SimulationStats::default();
        };

        let mut stats = SimulationStats {
            particle_count: state.particles.len(),
            ..Default::default()
        };

        let mut speed_sum = 0.0;
        for particle in &state.particles {
            let v2 = particle.vel().length_squared();
            let speed = v2.sqrt();
            speed_sum += speed;
            stats.max_speed = stats.max_speed.max(speed);
            stats.kinetic_energy += 0.5 * v2;
        }
        if !state.particles.is_empty() {
            stats.mean_speed = speed_sum / state.particles.len() as f32;
        }

        for counts in state.grid.offsets().windows(2) {
            let occupancy = (counts[1] - counts[0]) as usize;
            if occupancy > 0 {
                stats.occupied_cells += 1;
                stats.max_cell_occupancy = stats.max_cell_occupancy.max(occupancy);
            }
        }

        stats
    }
}

impl Default for ParticleSimulation {
    fn default() -> Self {
        Self::new(SimulationOptions::default(), GenerationParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_uninitialized_views_are_empty() {
        let sim = ParticleSimulation::default();
        assert!(!sim.is_initialized());
        assert!(sim.particles().is_empty());
        assert!(sim.species().is_empty());
        assert!(sim.forces().is_empty());
        assert_eq!(sim.species_count(), 0);
        assert_eq!(sim.stats(), SimulationStats::default());
    }

    #[test]
    fn test_rejects_radius_larger_than_bin() {
        let generation = GenerationParams {
            max_force_radius: 40.0,
            ..Default::default()
        };
        let mut sim = ParticleSimulation::new(SimulationOptions::default(), generation);
        let err = sim.initialize(10, 2, 1).unwrap_err();
        assert!(matches!(err, SimulationError::ForceRadiusExceedsBin { .. }));
        assert!(!sim.is_initialized());
    }

    #[test]
    fn test_failed_initialize_clears_previous_state() {
        let mut sim = ParticleSimulation::default();
        sim.initialize(10, 2, 1).unwrap();
        assert!(sim.is_initialized());
        assert!(sim.initialize(10, 0, 1).is_err());
        assert!(!sim.is_initialized());
        assert!(matches!(sim.step(0.01), Err(SimulationError::NotInitialized)));
    }

    #[test]
    fn test_set_force_validation() {
        let mut sim = ParticleSimulation::default();
        assert!(matches!(
            sim.set_force(0, 0, Force::new(1.0, 8.0, 0.0, 0.0)),
            Err(SimulationError::NotInitialized)
        ));

        sim.initialize(4, 2, 1).unwrap();
        sim.set_force(0, 1, Force::new(1.0, 8.0, 3.0, 2.0)).unwrap();
        assert_eq!(sim.force_table().unwrap().get(0, 1).radius, 8.0);

        assert!(matches!(
            sim.set_force(0, 1, Force::new(1.0, 64.0, 0.0, 0.0)),
            Err(SimulationError::ForceRadiusExceedsBin { .. })
        ));
        assert!(matches!(
            sim.set_force(0, 1, Force::new(1.0, 8.0, 1.0, 9.0)),
            Err(SimulationError::InvalidConfig(_))
        ));
        assert!(matches!(
            sim.set_force(2, 0, Force::new(1.0, 8.0, 0.0, 0.0)),
            Err(SimulationError::SpeciesOutOfRange { .. })
        ));
    }

    #[test]
    fn test_step_rejects_unknown_species() {
        let mut sim = ParticleSimulation::default();
        sim.initialize(2, 1, 1).unwrap();
        sim.particles_mut()[1] = Particle::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0), 3);

        assert!(matches!(
            sim.step(0.1),
            Err(SimulationError::SpeciesOutOfRange {
                species: 3,
                species_count: 1
            })
        ));
        // Rejected before anything moved
        assert_eq!(sim.particles()[1].pos(), Vec2::new(1.0, 0.0));

        sim.particles_mut()[1].species = 0;
        sim.step(0.1).unwrap();
    }

    #[test]
    fn test_stats_after_step() {
        let mut sim = ParticleSimulation::default();
        sim.initialize(2, 1, 1).unwrap();
        sim.step(0.0).unwrap();
        let stats = sim.stats();
        assert_eq!(stats.particle_count, 2);
        assert_eq!(stats.occupied_cells, 1);
        assert_eq!(stats.max_cell_occupancy, 2);
        assert_eq!(stats.kinetic_energy, 0.0);
        assert_eq!(sim.particles()[0].pos(), Vec2::ZERO);
    }

    #[test]
    fn test_byte_views() {
        let mut sim = ParticleSimulation::default();
        sim.initialize(3, 2, 1).unwrap();
        sim.generate(false).unwrap();
        assert_eq!(sim.particle_bytes().len(), 3 * std::mem::size_of::<Particle>());
        assert_eq!(sim.species_bytes().len(), 2 * std::mem::size_of::<Species>());
        assert_eq!(sim.force_bytes().len(), 4 * std::mem::size_of::<Force>());
    }
}
