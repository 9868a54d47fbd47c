//! # Particle Life Simulation Engine
//!
//! CPU N-body simulation of species-dependent attraction and repulsion, using
//! a uniform spatial grid for neighbour search.
//!
//! Each [`ParticleSimulation::step`] rebuilds the grid, accumulates forces
//! from the 3×3 cell neighbourhood of every particle, integrates with friction
//! and resolves the domain boundary.

pub mod accumulator;
pub mod error;
pub mod force_table;
pub mod generate;
pub mod grid;
pub mod integrator;
pub mod params;
pub mod rng;
pub mod simulation;

pub use error::{Result, SimulationError};
pub use force_table::ForceTable;
pub use grid::SpatialGrid;
pub use params::*;
pub use rng::SplitMix32;
pub use simulation::*;
