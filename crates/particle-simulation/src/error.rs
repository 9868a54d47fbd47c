//! Error types for the simulation engine.

use std::collections::TryReserveError;
use std::fmt;

/// Errors reported by [`ParticleSimulation`](crate::ParticleSimulation) and the
/// buffers it owns.
#[derive(Debug)]
pub enum SimulationError {
    /// A fixed-size working buffer could not be allocated.
    Allocation {
        buffer: &'static str,
        source: TryReserveError,
    },
    /// `step`, `generate` or a force edit was called before a successful `initialize`.
    NotInitialized,
    /// The domain bounds changed since the grid was built; call `initialize` again.
    StaleGrid,
    /// A configuration value is out of its valid range.
    InvalidConfig(String),
    /// An interaction radius does not fit inside one grid cell.
    ForceRadiusExceedsBin { radius: f32, bin_size: f32 },
    /// A species id outside `0..species_count`.
    SpeciesOutOfRange { species: u32, species_count: u32 },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Allocation { buffer, source } => {
                write!(f, "Failed to allocate {} buffer: {}", buffer, source)
            }
            SimulationError::NotInitialized => {
                write!(f, "Simulation is not initialized. Call initialize() first.")
            }
            SimulationError::StaleGrid => write!(
                f,
                "Domain bounds changed since the spatial grid was built. Call initialize() again."
            ),
            SimulationError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            SimulationError::ForceRadiusExceedsBin { radius, bin_size } => write!(
                f,
                "Interaction radius {} exceeds the grid bin size {}",
                radius, bin_size
            ),
            SimulationError::SpeciesOutOfRange {
                species,
                species_count,
            } => write!(
                f,
                "Species {} out of range (species count is {})",
                species, species_count
            ),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Allocation { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;

/// Allocate a zero-filled buffer of exactly `len` elements, reporting failure
/// instead of aborting.
pub(crate) fn try_alloc<T: Clone + Default>(buffer: &'static str, len: usize) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|source| SimulationError::Allocation { buffer, source })?;
    data.resize(len, T::default());
    Ok(data)
}
