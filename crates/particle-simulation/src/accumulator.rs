//! Force accumulation over the spatial grid
//!
//! For each particle the 3×3 block of cells around it is scanned and every
//! species-pair force is summed together with the central force. The total is
//! applied to the velocity immediately (unit mass). Positions are only read
//! here, so updating velocities in place does not affect other particles.

use crate::force_table::ForceTable;
use crate::grid::SpatialGrid;
use crate::params::{BoundaryMode, SimulationOptions};
use glam::Vec2;
use particle_physics::{central_force, minimum_image, pairwise_force, Particle};

/// Add `dt` times the net force to every particle's velocity
///
/// `grid` must have been rebuilt from the current `particles`. Interaction
/// radii larger than the grid's bin size are not seen past the 3×3 block.
pub fn accumulate_forces(
    particles: &mut [Particle],
    grid: &SpatialGrid,
    table: &ForceTable,
    options: &SimulationOptions,
    dt: f32,
) {
    let wrap = options.boundary_mode == BoundaryMode::Wrap;
    let extent = options.bounds.extent();

    for i in 0..particles.len() {
        let total = net_force(i, particles, grid, table, options.central_force, wrap, extent);
        let particle = &mut particles[i];
        particle.velocity = (particle.vel() + total * dt).to_array();
    }
}

/// Net force on particle `i`
pub fn net_force(
    i: usize,
    particles: &[Particle],
    grid: &SpatialGrid,
    table: &ForceTable,
    central: f32,
    wrap: bool,
    extent: Vec2,
) -> Vec2 {
    let particle = &particles[i];
    let position = particle.pos();
    let mut total = central_force(position, central);

    let (x, y) = grid.cell_coords(position);
    for cell in grid.neighbor_cells(x, y, wrap) {
        for &j in grid.cell_particles(cell) {
            let j = j as usize;
            if j == i {
                continue;
            }

            let other = &particles[j];
            let mut r = other.pos() - position;
            if wrap {
                r = minimum_image(r, extent);
            }
            total += pairwise_force(r, table.get(particle.species, other.species));
        }
    }

    total
}
