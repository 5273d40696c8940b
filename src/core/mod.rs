//! Simulation core: particle state, the tick, and rejection-sampling placement.

pub mod color;
pub mod config;
pub mod particle;
pub mod sim;

pub use color::Color;
pub use config::{Schedule, SimConfig, MAX_PLACEMENT_ATTEMPTS, SPEED_CAP};
pub use particle::{collision_response, Particle};
pub use sim::{ParticleView, Simulation, AIR_MIX, AIR_PARTICLE_RADIUS};
