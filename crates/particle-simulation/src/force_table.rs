//! Dense species×species interaction matrix

use crate::error::{try_alloc, Result, SimulationError};
use particle_physics::Force;

/// Row-major force matrix: entry `(a, b)` is the force a particle of species
/// `a` feels from a particle of species `b`.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceTable {
    species_count: u32,
    forces: Vec<Force>,
}

impl ForceTable {
    /// All-zero table for `species_count` species
    pub fn new(species_count: u32) -> Result<Self> {
        let n = species_count as usize;
        let len = n.checked_mul(n).ok_or_else(|| {
            SimulationError::InvalidConfig(format!("{} species overflow the force table", n))
        })?;
        Ok(Self {
            species_count,
            forces: try_alloc("force table", len)?,
        })
    }

    pub fn species_count(&self) -> u32 {
        self.species_count
    }

    /// Force on species `a` from species `b`
    ///
    /// Panics if either id is out of range.
    #[inline]
    pub fn get(&self, a: u32, b: u32) -> &Force {
        &self.forces[self.index(a, b)]
    }

    pub fn set(&mut self, a: u32, b: u32, force: Force) -> Result<()> {
        self.check_species(a)?;
        self.check_species(b)?;
        let index = self.index(a, b);
        self.forces[index] = force;
        Ok(())
    }

    /// Flat row-major view, `species_count²` entries
    pub fn as_slice(&self) -> &[Force] {
        &self.forces
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Force] {
        &mut self.forces
    }

    /// Average every `(i, j)`/`(j, i)` pair and store the result in both
    pub fn symmetrize(&mut self) {
        let n = self.species_count;
        for i in 0..n {
            for j in (i + 1)..n {
                let ij = self.index(i, j);
                let ji = self.index(j, i);
                let avg = Force::average(&self.forces[ij], &self.forces[ji]);
                self.forces[ij] = avg;
                self.forces[ji] = avg;
            }
        }
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.species_count;
        (0..n).all(|i| ((i + 1)..n).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Largest interaction radius in the table (0 when empty)
    pub fn max_radius(&self) -> f32 {
        self.forces.iter().map(|f| f.radius).fold(0.0, f32::max)
    }

    fn check_species(&self, species: u32) -> Result<()> {
        if species >= self.species_count {
            return Err(SimulationError::SpeciesOutOfRange {
                species,
                species_count: self.species_count,
            });
        }
        Ok(())
    }

    #[inline]
    fn index(&self, a: u32, b: u32) -> usize {
        a as usize * self.species_count as usize + b as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let mut table = ForceTable::new(3).unwrap();
        assert_eq!(table.as_slice().len(), 9);
        table.set(1, 2, Force::new(5.0, 10.0, 0.0, 0.0)).unwrap();
        assert_eq!(table.as_slice()[1 * 3 + 2].strength, 5.0);
        assert_eq!(table.get(2, 1).strength, 0.0);
    }

    #[test]
    fn test_set_out_of_range() {
        let mut table = ForceTable::new(2).unwrap();
        let err = table.set(2, 0, Force::default()).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::SpeciesOutOfRange {
                species: 2,
                species_count: 2
            }
        ));
    }

    #[test]
    fn test_symmetrize_averages_pairs() {
        let mut table = ForceTable::new(2).unwrap();
        table.set(0, 1, Force::new(10.0, 20.0, 40.0, 6.0)).unwrap();
        table.set(1, 0, Force::new(-4.0, 10.0, 20.0, 2.0)).unwrap();
        table.set(0, 0, Force::new(1.0, 8.0, 2.0, 1.0)).unwrap();
        assert!(!table.is_symmetric());

        table.symmetrize();
        assert!(table.is_symmetric());
        assert_eq!(*table.get(0, 1), Force::new(3.0, 15.0, 30.0, 4.0));
        assert_eq!(*table.get(0, 0), Force::new(1.0, 8.0, 2.0, 1.0));
    }

    #[test]
    fn test_max_radius() {
        let mut table = ForceTable::new(2).unwrap();
        assert_eq!(table.max_radius(), 0.0);
        table.set(1, 1, Force::new(1.0, 12.5, 0.0, 0.0)).unwrap();
        assert_eq!(table.max_radius(), 12.5);
    }
}
