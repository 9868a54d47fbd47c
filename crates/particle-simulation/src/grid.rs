//! Uniform spatial grid for neighbour search
//!
//! The grid never moves particle records. Each rebuild produces a permutation
//! of particle indices grouped by cell, plus an offset table so that the
//! particles of cell `c` are `permutation[offsets[c]..offsets[c + 1]]`. A
//! particle's identity is always its index in the original array, which is
//! what self-exclusion during force accumulation compares against.

use crate::error::{try_alloc, Result, SimulationError};
use crate::params::DomainBounds;
use glam::Vec2;
use particle_physics::Particle;

/// Cell-sorted view over a particle array
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    bounds: DomainBounds,
    bin_size: f32,
    width: usize,
    height: usize,
    /// Exclusive prefix sum of per-cell counts, `cell_count + 1` entries
    offsets: Vec<u32>,
    /// Per-cell fill counter for the scatter pass
    cursor: Vec<u32>,
    /// Cell of each particle, cached from the histogram pass
    cell_of: Vec<u32>,
    /// Sorted slot -> original particle index
    permutation: Vec<u32>,
}

impl SpatialGrid {
    /// Allocate a grid covering `bounds` for exactly `particle_count` particles
    pub fn new(bounds: DomainBounds, bin_size: f32, particle_count: usize) -> Result<Self> {
        if !(bin_size > 0.0) || !bin_size.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "bin size must be positive, got {}",
                bin_size
            )));
        }
        if !bounds.is_valid() {
            return Err(SimulationError::InvalidConfig(format!(
                "degenerate domain bounds {:?}",
                bounds
            )));
        }

        let extent = bounds.extent();
        let width = cells_along(extent.x, bin_size)?;
        let height = cells_along(extent.y, bin_size)?;
        let cell_count = width.checked_mul(height).ok_or_else(|| {
            SimulationError::InvalidConfig(format!("grid of {}x{} cells is too large", width, height))
        })?;
        if cell_count >= u32::MAX as usize || particle_count > u32::MAX as usize {
            return Err(SimulationError::InvalidConfig(format!(
                "grid of {} cells for {} particles cannot be indexed with u32",
                cell_count, particle_count
            )));
        }

        Ok(Self {
            bounds,
            bin_size,
            width,
            height,
            offsets: try_alloc("grid offsets", cell_count + 1)?,
            cursor: try_alloc("grid cursor", cell_count)?,
            cell_of: try_alloc("grid cell index", particle_count)?,
            permutation: try_alloc("grid permutation", particle_count)?,
        })
    }

    /// Re-bin all particles. Must run every step since positions change.
    ///
    /// Panics if `particles` does not have the length the grid was built for.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        assert_eq!(
            particles.len(),
            self.permutation.len(),
            "grid was allocated for a different particle count"
        );

        // Histogram into offsets[cell + 1]
        self.offsets.fill(0);
        for (i, particle) in particles.iter().enumerate() {
            let cell = self.cell_index(particle.pos());
            self.cell_of[i] = cell as u32;
            self.offsets[cell + 1] += 1;
        }

        // Running sum turns the shifted histogram into an exclusive prefix sum
        for cell in 1..self.offsets.len() {
            self.offsets[cell] += self.offsets[cell - 1];
        }

        // Scatter indices in original order so each cell stays sorted by index
        self.cursor.fill(0);
        for (i, &cell) in self.cell_of.iter().enumerate() {
            let cell = cell as usize;
            let slot = self.offsets[cell] + self.cursor[cell];
            self.permutation[slot as usize] = i as u32;
            self.cursor[cell] += 1;
        }
    }

    /// Column and row of the cell containing `p`, clamped to the grid
    pub fn cell_coords(&self, p: Vec2) -> (usize, usize) {
        let local = (p - self.bounds.min()) / self.bin_size;
        (
            clamp_cell(local.x, self.width),
            clamp_cell(local.y, self.height),
        )
    }

    pub fn cell_index(&self, p: Vec2) -> usize {
        let (x, y) = self.cell_coords(p);
        y * self.width + x
    }

    /// Original indices of the particles binned into `cell` at the last rebuild
    pub fn cell_particles(&self, cell: usize) -> &[u32] {
        let start = self.offsets[cell] as usize;
        let end = self.offsets[cell + 1] as usize;
        &self.permutation[start..end]
    }

    /// Distinct cells of the 3×3 block around `(x, y)`
    ///
    /// With `wrap` the block continues through the opposite edges; otherwise it
    /// is clipped at the domain edge. Grids narrower than three cells would
    /// otherwise visit a cell twice, so repeats are dropped.
    ///
    /// When an axis does not tile exactly its last cell is narrower than a bin,
    /// so under `wrap` the cells on either side of it (`size - 2` and `0`) are
    /// closer than one bin through the seam. Each of them also visits the
    /// other.
    pub fn neighbor_cells(&self, x: usize, y: usize, wrap: bool) -> NeighborCells {
        let extent = self.bounds.extent();
        let partial_x = wrap && self.width as f32 * self.bin_size != extent.x;
        let partial_y = wrap && self.height as f32 * self.bin_size != extent.y;
        NeighborCells {
            columns: AxisSpan::new(x, self.width, wrap, partial_x),
            rows: AxisSpan::new(y, self.height, wrap, partial_y),
            width: self.width,
            column: 0,
            row: 0,
        }
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    pub fn permutation(&self) -> &[u32] {
        &self.permutation
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn bin_size(&self) -> f32 {
        self.bin_size
    }

    pub fn bounds(&self) -> &DomainBounds {
        &self.bounds
    }

    pub fn particle_count(&self) -> usize {
        self.permutation.len()
    }

    /// Whether every axis of the domain is a whole number of cells
    pub fn tiles_exactly(&self) -> bool {
        let extent = self.bounds.extent();
        self.width as f32 * self.bin_size == extent.x
            && self.height as f32 * self.bin_size == extent.y
    }
}

fn cells_along(extent: f32, bin_size: f32) -> Result<usize> {
    let cells = (extent / bin_size).ceil().max(1.0);
    if cells >= u32::MAX as f32 {
        return Err(SimulationError::InvalidConfig(format!(
            "extent {} with bin size {} needs too many cells",
            extent, bin_size
        )));
    }
    Ok(cells as usize)
}

fn clamp_cell(coord: f32, len: usize) -> usize {
    // `as` saturates: negatives and NaN land on 0
    (coord.floor() as isize).clamp(0, len as isize - 1) as usize
}

/// Up to four distinct indices along one axis
#[derive(Clone, Copy, Debug)]
struct AxisSpan {
    cells: [usize; 4],
    len: usize,
}

impl AxisSpan {
    fn new(center: usize, size: usize, wrap: bool, partial_seam: bool) -> Self {
        let mut span = Self {
            cells: [0; 4],
            len: 0,
        };
        let size = size as isize;
        for delta in -1..=1 {
            let raw = center as isize + delta;
            let cell = if wrap {
                raw.rem_euclid(size)
            } else if (0..size).contains(&raw) {
                raw
            } else {
                continue;
            };
            span.push(cell as usize);
        }

        // Step over the narrow last cell to the cell beyond it
        if partial_seam && size >= 2 {
            let before_seam = (size - 2) as usize;
            if center == before_seam {
                span.push(0);
            } else if center == 0 {
                span.push(before_seam);
            }
        }
        span
    }

    fn push(&mut self, cell: usize) {
        if !self.cells[..self.len].contains(&cell) {
            self.cells[self.len] = cell;
            self.len += 1;
        }
    }
}

/// Iterator over the cell indices of a neighbourhood
#[derive(Clone, Debug)]
pub struct NeighborCells {
    columns: AxisSpan,
    rows: AxisSpan,
    width: usize,
    column: usize,
    row: usize,
}

impl Iterator for NeighborCells {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.row >= self.rows.len {
            return None;
        }
        let cell = self.rows.cells[self.row] * self.width + self.columns.cells[self.column];
        self.column += 1;
        if self.column >= self.columns.len {
            self.column = 0;
            self.row += 1;
        }
        Some(cell)
    }
}
