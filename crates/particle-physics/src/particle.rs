//! Particle, species and force records shared with the renderer

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Renderer-compatible particle record
///
/// Laid out as `{x, y, vx, vy, species}` so the whole particle array can be
/// handed to a GPU buffer with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    /// Position in the simulation plane
    pub position: [f32; 2],
    /// Velocity vector
    pub velocity: [f32; 2],
    /// Species id, `0..species_count`
    pub species: u32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, species: u32) -> Self {
        Self {
            position: position.to_array(),
            velocity: velocity.to_array(),
            species,
        }
    }

    /// Particle at rest
    pub fn at_rest(position: Vec2, species: u32) -> Self {
        Self::new(position, Vec2::ZERO, species)
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }

    pub fn vel(&self) -> Vec2 {
        Vec2::from_array(self.velocity)
    }
}

/// Per-species descriptor: display colour and spawn probability weight
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Species {
    /// RGBA colour, each channel in [0, 1]
    pub color: [f32; 4],
    /// Relative probability that a generated particle gets this species (>= 0)
    pub spawn_weight: f32,
}

impl Species {
    pub fn new(color: [f32; 4], spawn_weight: f32) -> Self {
        Self {
            color,
            spawn_weight,
        }
    }
}

/// Interaction parameters for one ordered species pair
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Force {
    /// Positive attracts, negative repels
    pub strength: f32,
    /// Maximum interaction distance (> 0)
    pub radius: f32,
    /// Magnitude of the short-range repulsion (>= 0)
    pub collision_strength: f32,
    /// Distance below which the collision repulsion applies (<= radius)
    pub collision_radius: f32,
}

impl Force {
    pub fn new(strength: f32, radius: f32, collision_strength: f32, collision_radius: f32) -> Self {
        Self {
            strength,
            radius,
            collision_strength,
            collision_radius,
        }
    }

    /// Component-wise average of two forces
    pub fn average(a: &Force, b: &Force) -> Force {
        Force {
            strength: 0.5 * (a.strength + b.strength),
            radius: 0.5 * (a.radius + b.radius),
            collision_strength: 0.5 * (a.collision_strength + b.collision_strength),
            collision_radius: 0.5 * (a.collision_radius + b.collision_radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_layout_is_flat() {
        assert_eq!(std::mem::size_of::<Particle>(), 5 * 4);
        assert_eq!(std::mem::size_of::<Species>(), 5 * 4);
        assert_eq!(std::mem::size_of::<Force>(), 4 * 4);

        let particles = [Particle::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), 7)];
        let words: &[u32] = bytemuck::cast_slice(&particles);
        assert_eq!(words[0], 1.0f32.to_bits());
        assert_eq!(words[3], 4.0f32.to_bits());
        assert_eq!(words[4], 7);
    }

    #[test]
    fn test_force_average() {
        let a = Force::new(10.0, 20.0, 30.0, 4.0);
        let b = Force::new(-6.0, 10.0, 10.0, 2.0);
        let avg = Force::average(&a, &b);
        assert_eq!(avg, Force::new(2.0, 15.0, 20.0, 3.0));
        assert_eq!(Force::average(&b, &a), avg);
    }
}
