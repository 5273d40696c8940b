use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core and its drivers.
///
/// Only construction and request validation surface these to callers. Placement
/// exhaustion is folded into a `false` return by [`Simulation::place`], and a
/// degenerate velocity is handled inside the collision response.
///
/// [`Simulation::place`]: crate::core::Simulation::place
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Invalid construction or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Placement request outside the caller-enforced bounds (count, radius, population).
    #[error("invalid placement request: {0}")]
    InvalidPlacementRequest(String),

    /// Rejection sampling hit its attempt cap; the partial batch was rolled back.
    #[error("could not place particle {index} of the batch after {attempts} attempts")]
    PlacementExhausted { index: usize, attempts: usize },

    /// A zero-length velocity cannot be rescaled to a positive length.
    #[error("cannot rescale a zero velocity")]
    DegenerateVelocity,
}
