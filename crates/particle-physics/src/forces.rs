//! Force kernels for particle life
//!
//! All kernels are pure functions over displacements. `r` is always the
//! displacement from the particle being updated towards the other particle,
//! so a positive strength pulls along `r` and a repulsion pushes against it.

use crate::particle::Force;
use glam::Vec2;

/// Species-pair force exerted on a particle by a neighbour at displacement `r`
///
/// Linear falloff `strength * (1 - d/radius)` along `r/d`, with a collision
/// repulsion `collision_strength * (1 - d/collision_radius)` layered on top
/// inside `collision_radius`. The collision term is repulsive regardless of the
/// sign of `strength`. Coincident particles (`d == 0`) exert nothing.
pub fn pairwise_force(r: Vec2, force: &Force) -> Vec2 {
    let d = r.length();
    if d <= 0.0 || d >= force.radius {
        return Vec2::ZERO;
    }

    let direction = r / d;
    let mut magnitude = force.strength * (1.0 - d / force.radius).max(0.0);

    if d < force.collision_radius {
        magnitude -= force.collision_strength * (1.0 - d / force.collision_radius).max(0.0);
    }

    direction * magnitude
}

/// Pull towards the origin, proportional to the distance from it
pub fn central_force(position: Vec2, coefficient: f32) -> Vec2 {
    -position * coefficient
}

/// Gaussian falloff `exp(-|d|² / radius²)` of the action point influence
pub fn action_falloff(displacement: Vec2, radius: f32) -> f32 {
    (-displacement.length_squared() / (radius * radius)).exp()
}

/// Minimum-image displacement on a torus of size `extent`
///
/// Each axis is folded independently: when the direct displacement is at
/// least half the extent, the wrapped one through the opposite edge is shorter.
pub fn minimum_image(r: Vec2, extent: Vec2) -> Vec2 {
    Vec2::new(fold_axis(r.x, extent.x), fold_axis(r.y, extent.y))
}

fn fold_axis(delta: f32, extent: f32) -> f32 {
    if delta.abs() >= 0.5 * extent {
        delta - delta.signum() * extent
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_pairwise_force_zero_distance() {
        let force = Force::new(50.0, 10.0, 100.0, 2.0);
        assert_eq!(pairwise_force(Vec2::ZERO, &force), Vec2::ZERO);
    }

    #[test]
    fn test_pairwise_force_outside_radius() {
        let force = Force::new(50.0, 10.0, 0.0, 0.0);
        assert_eq!(pairwise_force(Vec2::new(10.0, 0.0), &force), Vec2::ZERO);
        assert_eq!(pairwise_force(Vec2::new(0.0, -12.0), &force), Vec2::ZERO);
    }

    #[test]
    fn test_pairwise_force_linear_falloff() {
        let force = Force::new(50.0, 10.0, 0.0, 0.0);
        // Halfway to the radius: half the strength, pointing at the neighbour
        let f = pairwise_force(Vec2::new(0.0, 5.0), &force);
        assert!(f.x.abs() < EPS);
        assert!((f.y - 25.0).abs() < EPS);

        // Negative strength repels
        let repel = Force::new(-50.0, 10.0, 0.0, 0.0);
        let f = pairwise_force(Vec2::new(0.0, 5.0), &repel);
        assert!((f.y + 25.0).abs() < EPS);
    }

    #[test]
    fn test_collision_always_repels() {
        // Strong attraction, but the neighbour sits well inside the collision radius
        let force = Force::new(10.0, 20.0, 100.0, 4.0);
        let r = Vec2::new(1.0, 0.0);
        let f = pairwise_force(r, &force);
        let expected = 10.0 * (1.0 - 1.0 / 20.0) - 100.0 * (1.0 - 1.0 / 4.0);
        assert!((f.x - expected).abs() < EPS);
        assert!(f.x < 0.0);

        let repel = Force::new(-10.0, 20.0, 100.0, 4.0);
        assert!(pairwise_force(r, &repel).x < f.x);
    }

    #[test]
    fn test_central_force() {
        let f = central_force(Vec2::new(10.0, -4.0), 0.5);
        assert_eq!(f, Vec2::new(-5.0, 2.0));
        assert_eq!(central_force(Vec2::new(10.0, -4.0), 0.0), Vec2::ZERO);
    }

    #[test]
    fn test_action_falloff() {
        assert!((action_falloff(Vec2::ZERO, 5.0) - 1.0).abs() < EPS);
        let at_radius = action_falloff(Vec2::new(3.0, 4.0), 5.0);
        assert!((at_radius - (-1.0f32).exp()).abs() < EPS);
    }

    #[test]
    fn test_minimum_image() {
        let extent = Vec2::new(100.0, 50.0);
        // Short displacements are untouched
        assert_eq!(minimum_image(Vec2::new(10.0, -10.0), extent), Vec2::new(10.0, -10.0));
        // Long ones wrap through the opposite edge
        let r = minimum_image(Vec2::new(95.0, -45.0), extent);
        assert!((r.x + 5.0).abs() < EPS);
        assert!((r.y - 5.0).abs() < EPS);
        // Exactly half the extent folds too
        assert_eq!(minimum_image(Vec2::new(50.0, 0.0), extent).x, -50.0);
    }
}
