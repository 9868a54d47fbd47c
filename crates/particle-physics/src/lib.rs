//! # Particle Life Physics
//!
//! Data model and force kernels for a 2D "particle life" system: particles of
//! several species attracting and repelling each other according to a
//! species×species force matrix.

pub mod constants;
pub mod forces;
pub mod particle;

pub use constants::*;
pub use forces::*;
pub use particle::*;
