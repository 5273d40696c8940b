use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Per-axis cap on the magnitude of a freshly drawn velocity component.
pub const SPEED_CAP: f64 = 0.05;

/// Redraws allowed per particle before a placement batch is abandoned.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

/// Side length of the box used when none is given.
pub const DEFAULT_BOX_SIZE: f64 = 1.0;

/// How a tick orders integration against the collision scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schedule {
    /// Integrate and reflect every particle, then run the collision pass over all of them.
    #[default]
    Phased,
    /// Integrate, reflect and scan each particle before moving on to the next one.
    Interleaved,
}

impl FromStr for Schedule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "phased" => Ok(Schedule::Phased),
            "interleaved" => Ok(Schedule::Interleaved),
            other => Err(Error::InvalidParam(format!(
                "unknown schedule '{other}', expected 'phased' or 'interleaved'"
            ))),
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Phased => f.write_str("phased"),
            Schedule::Interleaved => f.write_str("interleaved"),
        }
    }
}

/// Session-wide settings fixed when a [`Simulation`](super::Simulation) is built.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Side length of the cubic box, centred on the origin.
    pub box_size: f64,
    /// Per-axis magnitude cap for initial velocities.
    pub initial_speed_cap: f64,
    /// Rejection-sampling cap per particle.
    pub max_placement_attempts: usize,
    /// Tick ordering.
    pub schedule: Schedule,
    /// RNG seed; `None` draws one from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BOX_SIZE)
    }
}

impl SimConfig {
    /// Config for a box of side `box_size` with every other setting at its default.
    pub fn new(box_size: f64) -> Self {
        Self {
            box_size,
            initial_speed_cap: SPEED_CAP,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            schedule: Schedule::default(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_initial_speed_cap(mut self, cap: f64) -> Self {
        self.initial_speed_cap = cap;
        self
    }

    pub fn with_max_placement_attempts(mut self, attempts: usize) -> Self {
        self.max_placement_attempts = attempts;
        self
    }

    /// Check the settings.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `box_size` is non-positive or not finite, the speed cap is
    ///   negative or not finite, or the attempt cap is zero.
    pub fn validate(&self) -> Result<()> {
        if !self.box_size.is_finite() || self.box_size <= 0.0 {
            return Err(Error::InvalidParam(
                "box_size must be finite and > 0".into(),
            ));
        }
        if !self.initial_speed_cap.is_finite() || self.initial_speed_cap < 0.0 {
            return Err(Error::InvalidParam(
                "initial_speed_cap must be finite and >= 0".into(),
            ));
        }
        if self.max_placement_attempts == 0 {
            return Err(Error::InvalidParam(
                "max_placement_attempts must be > 0".into(),
            ));
        }
        Ok(())
    }
}
