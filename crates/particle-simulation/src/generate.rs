//! Random system generation: species palette, force matrix, initial particles
//!
//! Everything is drawn from one [`SplitMix32`] in a fixed order (species, then
//! forces, then particles), so a seed fully determines the generated system.

use crate::force_table::ForceTable;
use crate::params::{DomainBounds, GenerationParams};
use crate::rng::SplitMix32;
use glam::{Vec2, Vec3};
use particle_physics::{Force, Particle, Species, MAX_SPAWN_WEIGHT, MIN_SPAWN_WEIGHT};

/// Fill `species` with random saturated colours and spawn weights
pub fn generate_species(species: &mut [Species], rng: &mut SplitMix32) {
    for s in species.iter_mut() {
        let hue = rng.next_f32();
        let saturation = rng.range_f32(0.6, 1.0);
        let value = rng.range_f32(0.8, 1.0);
        let rgb = hsv_to_rgb(hue, saturation, value);

        s.color = [rgb.x, rgb.y, rgb.z, 1.0];
        s.spawn_weight = rng.range_f32(MIN_SPAWN_WEIGHT, MAX_SPAWN_WEIGHT);
    }
}

/// Fill every ordered pair of `table`, optionally averaging `(i, j)` with `(j, i)`
pub fn generate_forces(
    table: &mut ForceTable,
    params: &GenerationParams,
    symmetric: bool,
    rng: &mut SplitMix32,
) {
    for force in table.as_mut_slice() {
        *force = random_force(params, rng);
    }
    if symmetric {
        table.symmetrize();
    }
}

fn random_force(params: &GenerationParams, rng: &mut SplitMix32) -> Force {
    let mut strength = params.max_force_strength * rng.range_f32(0.25, 1.0);
    if rng.next_f32() < 0.5 {
        strength = -strength;
    }

    let radius = rng.range_f32(params.min_force_radius, params.max_force_radius);
    let collision_strength = strength.abs()
        * rng.range_f32(params.min_collision_factor, params.max_collision_factor);
    let collision_radius = 0.5 * radius * rng.next_f32();

    Force::new(strength, radius, collision_strength, collision_radius)
}

/// Scatter particles uniformly over `bounds` with small random velocities and
/// weighted species
pub fn spawn_particles(
    particles: &mut [Particle],
    species: &[Species],
    bounds: &DomainBounds,
    params: &GenerationParams,
    rng: &mut SplitMix32,
) {
    let total_weight: f32 = species.iter().map(|s| s.spawn_weight).sum();
    let speed = params.initial_speed;

    for particle in particles.iter_mut() {
        let position = Vec2::new(
            rng.range_f32(bounds.left, bounds.right),
            rng.range_f32(bounds.bottom, bounds.top),
        );
        let velocity = Vec2::new(rng.range_f32(-speed, speed), rng.range_f32(-speed, speed));
        let kind = pick_species(species, total_weight, rng.next_f32());
        *particle = Particle::new(position, velocity, kind);
    }
}

/// Weighted choice: `u` in [0, 1) is scaled by `total_weight` and walked
/// through the weights in order. Falls back to the last species when rounding
/// leaves a remainder after the final weight.
pub fn pick_species(species: &[Species], total_weight: f32, u: f32) -> u32 {
    let mut remaining = u * total_weight;
    for (i, s) in species.iter().enumerate() {
        if remaining < s.spawn_weight {
            return i as u32;
        }
        remaining -= s.spawn_weight;
    }
    species.len().saturating_sub(1) as u32
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}
