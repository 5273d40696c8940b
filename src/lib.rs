//! Rigid spheres bouncing around a cubic box, one tick at a time.
//!
//! [`core::Simulation`] owns the particles and runs the tick and placement rules;
//! [`driver::Driver`] is a serialising run/stop/step scheduler around it. With the
//! `python` feature the crate also builds a Python extension module.

pub mod core;
pub mod driver;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::core::{Color, Particle, Schedule, SimConfig, Simulation};
pub use crate::error::{Error, Result};
