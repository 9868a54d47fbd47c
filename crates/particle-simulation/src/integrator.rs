//! Semi-implicit Euler integration and boundary handling

use crate::params::{ActionPoint, BoundaryMode, DomainBounds, SimulationOptions};
use glam::Vec2;
use particle_physics::{action_falloff, minimum_image, Particle};

/// Apply the action point, friction and boundary rules, then advance positions
///
/// Velocities are expected to already contain this step's pairwise forces.
pub fn integrate(particles: &mut [Particle], options: &SimulationOptions, dt: f32) {
    let damping = (-dt * options.friction).exp();
    let wrap = options.boundary_mode == BoundaryMode::Wrap;
    let extent = options.bounds.extent();
    let action = options.action.is_active().then_some(&options.action);

    for particle in particles.iter_mut() {
        let mut position = particle.pos();
        let mut velocity = particle.vel();

        if let Some(action) = action {
            velocity += action_impulse(position, action, wrap, extent);
        }

        velocity *= damping;
        position += velocity * dt;

        match options.boundary_mode {
            BoundaryMode::Wrap => position = wrap_position(position, &options.bounds),
            BoundaryMode::Bounce => bounce(&mut position, &mut velocity, &options.bounds),
        }

        particle.position = position.to_array();
        particle.velocity = velocity.to_array();
    }
}

/// Velocity change from the action point at `position`
pub fn action_impulse(position: Vec2, action: &ActionPoint, wrap: bool, extent: Vec2) -> Vec2 {
    let mut d = position - action.position;
    if wrap {
        d = minimum_image(d, extent);
    }
    action.velocity * (action.force * action_falloff(d, action.radius))
}

/// Fold a position back into the domain on each axis
pub fn wrap_position(p: Vec2, bounds: &DomainBounds) -> Vec2 {
    let extent = bounds.extent();
    let mut wrapped = Vec2::new(
        bounds.left + (p.x - bounds.left).rem_euclid(extent.x),
        bounds.bottom + (p.y - bounds.bottom).rem_euclid(extent.y),
    );
    // rem_euclid can round up to exactly the extent for tiny negative inputs
    if wrapped.x >= bounds.right {
        wrapped.x = bounds.left;
    }
    if wrapped.y >= bounds.top {
        wrapped.y = bounds.bottom;
    }
    wrapped
}

/// Clamp to the nearest edge and send the velocity back inwards
pub fn bounce(p: &mut Vec2, v: &mut Vec2, bounds: &DomainBounds) {
    if p.x < bounds.left {
        p.x = bounds.left;
        v.x = v.x.abs();
    } else if p.x > bounds.right {
        p.x = bounds.right;
        v.x = -v.x.abs();
    }

    if p.y < bounds.bottom {
        p.y = bounds.bottom;
        v.y = v.y.abs();
    } else if p.y > bounds.top {
        p.y = bounds.top;
        v.y = -v.y.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(mode: BoundaryMode) -> SimulationOptions {
        SimulationOptions {
            bounds: DomainBounds::centered(100.0, 100.0),
            friction: 0.0,
            boundary_mode: mode,
            ..Default::default()
        }
    }

    #[test]
    fn test_free_flight() {
        let mut particles = [Particle::new(Vec2::ZERO, Vec2::new(3.0, -4.0), 0)];
        integrate(&mut particles, &options(BoundaryMode::Wrap), 0.5);
        assert_eq!(particles[0].pos(), Vec2::new(1.5, -2.0));
        assert_eq!(particles[0].vel(), Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_friction_decay() {
        let mut opts = options(BoundaryMode::Wrap);
        opts.friction = 2.0;
        let mut particles = [Particle::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 0)];
        integrate(&mut particles, &opts, 0.25);
        let expected = 10.0 * (-0.5f32).exp();
        assert!((particles[0].velocity[0] - expected).abs() < 1e-5);
        assert!((particles[0].position[0] - expected * 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_bounce_right_wall() {
        let opts = options(BoundaryMode::Bounce);
        let right = opts.bounds.right;
        let mut particles = [Particle::new(Vec2::new(right - 1.0, 0.0), Vec2::new(100.0, 0.0), 0)];
        integrate(&mut particles, &opts, 1.0);
        assert_eq!(particles[0].position[0], right);
        assert_eq!(particles[0].velocity[0], -100.0);
    }

    #[test]
    fn test_bounce_bottom_left_corner() {
        let opts = options(BoundaryMode::Bounce);
        let mut particles = [Particle::new(Vec2::new(-49.0, -49.0), Vec2::new(-10.0, -20.0), 0)];
        integrate(&mut particles, &opts, 1.0);
        assert_eq!(particles[0].pos(), Vec2::new(-50.0, -50.0));
        assert_eq!(particles[0].vel(), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_wrap_position() {
        let bounds = DomainBounds::centered(100.0, 100.0);
        assert_eq!(wrap_position(Vec2::new(50.5, 0.0), &bounds), Vec2::new(-49.5, 0.0));
        assert_eq!(wrap_position(Vec2::new(0.0, -51.0), &bounds), Vec2::new(0.0, 49.0));
        assert_eq!(wrap_position(Vec2::new(50.0, 10.0), &bounds), Vec2::new(-50.0, 10.0));
        let unit = DomainBounds::new(0.0, 1.0, 0.0, 1.0);
        assert_eq!(wrap_position(Vec2::new(-1e-8, 0.0), &unit).x, 0.0);
    }

    #[test]
    fn test_wrap_keeps_velocity() {
        let opts = options(BoundaryMode::Wrap);
        let mut particles = [Particle::new(Vec2::new(49.5, 0.0), Vec2::new(1.0, 0.0), 0)];
        integrate(&mut particles, &opts, 1.0);
        assert_eq!(particles[0].pos(), Vec2::new(-49.5, 0.0));
        assert_eq!(particles[0].vel(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_action_point_gaussian() {
        let mut opts = options(BoundaryMode::Bounce);
        opts.action = ActionPoint::new(Vec2::ZERO, Vec2::new(2.0, 0.0), 3.0, 10.0);

        let mut particles = [
            Particle::at_rest(Vec2::ZERO, 0),
            Particle::at_rest(Vec2::new(0.0, 10.0), 0),
        ];
        integrate(&mut particles, &opts, 0.0);
        assert!((particles[0].velocity[0] - 6.0).abs() < 1e-5);
        assert!((particles[1].velocity[0] - 6.0 * (-1.0f32).exp()).abs() < 1e-5);
    }

    #[test]
    fn test_action_point_wraps() {
        let extent = Vec2::new(100.0, 100.0);
        let action = ActionPoint::new(Vec2::new(49.0, 0.0), Vec2::new(1.0, 0.0), 1.0, 5.0);
        let near_seam = Vec2::new(-49.0, 0.0);
        let wrapped = action_impulse(near_seam, &action, true, extent);
        let direct = action_impulse(near_seam, &action, false, extent);
        assert!(wrapped.x > 0.8);
        assert!(direct.x < 1e-6);
    }

    #[test]
    fn test_inactive_action_ignored() {
        let mut opts = options(BoundaryMode::Wrap);
        opts.action = ActionPoint::new(Vec2::ZERO, Vec2::new(5.0, 5.0), 0.0, 10.0);
        let mut particles = [Particle::at_rest(Vec2::ZERO, 0)];
        integrate(&mut particles, &opts, 0.1);
        assert_eq!(particles[0].vel(), Vec2::ZERO);
    }
}
