//! Run/stop/step scheduling around a [`Simulation`].
//!
//! The engine holds no timer. A `Driver` is the caller that serialises ticks and
//! placement requests, the way a window's menu and timer would.

use crate::core::{Color, Simulation};
use crate::error::{Error, Result};
use log::{debug, info};
use std::thread;
use std::time::Duration;

/// One "add particles" request from a user interface.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRequest<T = Color> {
    pub count: usize,
    pub radius: f64,
    pub tag: T,
}

impl<T> PlacementRequest<T> {
    pub fn new(count: usize, radius: f64, tag: T) -> Self {
        Self { count, radius, tag }
    }
}

/// Bounds a user interface enforces before handing a request to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementLimits {
    /// Largest batch accepted in one request.
    pub max_count: usize,
    /// Largest radius accepted.
    pub max_radius: f64,
    /// Largest population after the batch is added.
    pub max_population: usize,
}

impl Default for PlacementLimits {
    fn default() -> Self {
        Self {
            max_count: 100,
            max_radius: 0.5,
            max_population: 1000,
        }
    }
}

impl PlacementLimits {
    /// Check `req` against these limits given `population` existing particles.
    ///
    /// Errors:
    /// - `Error::InvalidPlacementRequest` naming the first violated bound.
    pub fn check<T>(&self, req: &PlacementRequest<T>, population: usize) -> Result<()> {
        if req.count == 0 || req.count > self.max_count {
            return Err(Error::InvalidPlacementRequest(format!(
                "count must be in 1..={}, got {}",
                self.max_count, req.count
            )));
        }
        if !req.radius.is_finite() || req.radius <= 0.0 || req.radius > self.max_radius {
            return Err(Error::InvalidPlacementRequest(format!(
                "radius must be in (0, {}], got {}",
                self.max_radius, req.radius
            )));
        }
        if population + req.count > self.max_population {
            return Err(Error::InvalidPlacementRequest(format!(
                "population would reach {}, limit is {}",
                population + req.count,
                self.max_population
            )));
        }
        Ok(())
    }
}

/// Owns a simulation and decides when it may step.
///
/// While running, only the periodic [`on_timer`](Self::on_timer) callback steps; while
/// stopped, only a manual [`step_once`](Self::step_once) does.
#[derive(Debug)]
pub struct Driver<T = Color> {
    sim: Simulation<T>,
    running: bool,
    limits: PlacementLimits,
}

impl<T> Driver<T> {
    /// Wrap `sim` in a stopped driver with default placement limits.
    pub fn new(sim: Simulation<T>) -> Self {
        Self {
            sim,
            running: false,
            limits: PlacementLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: PlacementLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn sim(&self) -> &Simulation<T> {
        &self.sim
    }

    pub fn into_inner(self) -> Simulation<T> {
        self.sim
    }

    pub fn limits(&self) -> &PlacementLimits {
        &self.limits
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start ticking. No effect if already running.
    pub fn run(&mut self) {
        if !self.running {
            debug!("driver started at tick {}", self.sim.tick());
            self.running = true;
        }
    }

    /// Stop ticking. No effect if already stopped.
    pub fn stop(&mut self) {
        if self.running {
            debug!("driver stopped at tick {}", self.sim.tick());
            self.running = false;
        }
    }

    /// Manual single step; refused while running. Returns whether a step happened.
    pub fn step_once(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.sim.step();
        true
    }

    /// Periodic callback; steps only while running. Returns whether a step happened.
    pub fn on_timer(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.sim.step();
        true
    }

    /// Stop ticking and remove every particle. Ticking stays stopped afterwards.
    pub fn delete_particles(&mut self) {
        self.stop();
        self.sim.clear_all();
    }

    /// Fire the timer `ticks` times, sleeping `period` between firings.
    ///
    /// Returns the number of steps taken, which is zero while stopped.
    pub fn run_fixed_rate(&mut self, period: Duration, ticks: u64) -> u64 {
        let mut stepped = 0u64;
        for _ in 0..ticks {
            if self.on_timer() {
                stepped += 1;
            }
            if !period.is_zero() {
                thread::sleep(period);
            }
        }
        stepped
    }
}

impl<T: Clone> Driver<T> {
    /// Validate and place a batch, pausing the ticker around the placement.
    ///
    /// Returns whether the batch fit; a batch that did not fit leaves the population as it was.
    ///
    /// Errors:
    /// - `Error::InvalidPlacementRequest` if the request breaks the driver's limits. Nothing
    ///   is placed and the running state is unchanged.
    pub fn add_particles(&mut self, req: PlacementRequest<T>) -> Result<bool> {
        self.limits.check(&req, self.sim.len())?;
        let was_running = self.running;
        self.stop();
        let placed = self.sim.place(req.count, req.radius, req.tag);
        if placed {
            info!(
                "added {} particles of radius {}; population {}",
                req.count,
                req.radius,
                self.sim.len()
            );
        }
        if was_running {
            self.run();
        }
        Ok(placed)
    }
}
