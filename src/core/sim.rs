use crate::core::color::Color;
use crate::core::config::{Schedule, SimConfig};
use crate::core::particle::{collision_response, Particle};
use crate::error::{Error, Result};
use glam::DVec3;
use log::{debug, trace, warn};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

/// Radius used for the start-up population.
pub const AIR_PARTICLE_RADIUS: f64 = 0.015;

/// Start-up population: roughly the make-up of air (nitrogen, oxygen, argon).
pub const AIR_MIX: [(usize, Color); 3] = [(78, Color::Cyan), (21, Color::Red), (1, Color::Yellow)];

/// Read-only view of one particle, handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView<'a, T> {
    pub position: DVec3,
    pub radius: f64,
    pub tag: &'a T,
}

/// A cubic box centred on the origin holding an ordered set of particles.
///
/// Insertion order is the scan order of the collision pass, so it decides which partner
/// a particle pairs with when several overlap it.
#[derive(Debug)]
pub struct Simulation<T = Color> {
    config: SimConfig,
    tick: u64,
    particles: Vec<Particle<T>>,
    rng: StdRng,
}

impl<T> Simulation<T> {
    /// Create an empty simulation.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if the config fails [`SimConfig::validate`].
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let rng: StdRng = match config.seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };
        debug!(
            "new simulation: box_size={}, schedule={}, seed={:?}",
            config.box_size, config.schedule, config.seed
        );
        Ok(Self {
            config,
            tick: 0,
            particles: Vec::new(),
            rng,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn box_size(&self) -> f64 {
        self.config.box_size
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particles in scan order.
    pub fn particles(&self) -> &[Particle<T>] {
        &self.particles
    }

    /// Position, radius and tag of each particle, in scan order.
    pub fn views(&self) -> impl Iterator<Item = ParticleView<'_, T>> + '_ {
        self.particles.iter().map(|p| ParticleView {
            position: p.position(),
            radius: p.radius(),
            tag: p.tag(),
        })
    }

    pub fn positions(&self) -> Vec<DVec3> {
        self.particles.iter().map(|p| p.position()).collect()
    }

    pub fn velocities(&self) -> Vec<DVec3> {
        self.particles.iter().map(|p| p.velocity()).collect()
    }

    /// Mean speed over all particles (diagnostic); zero when empty.
    pub fn mean_speed(&self) -> f64 {
        if self.particles.is_empty() {
            return 0.0;
        }
        self.particles.iter().map(|p| p.speed()).sum::<f64>() / self.particles.len() as f64
    }

    /// Append a fully specified particle, skipping the overlap check.
    pub fn push_particle(&mut self, particle: Particle<T>) {
        self.particles.push(particle);
    }

    /// Remove every particle.
    pub fn clear_all(&mut self) {
        debug!("clearing {} particles", self.particles.len());
        self.particles.clear();
    }

    /// Advance one tick.
    ///
    /// Every particle integrates its velocity and bounces off the walls, then each one in
    /// turn pairs with the first other particle it overlaps. A particle already paired this
    /// tick can pair again when a later particle finds it.
    pub fn step(&mut self) {
        let box_size = self.config.box_size;
        let n = self.particles.len();
        let mut contacts = 0usize;
        match self.config.schedule {
            Schedule::Phased => {
                for p in &mut self.particles {
                    p.add_velocity();
                    p.reflect_off_walls(box_size);
                }
                for i in 0..n {
                    if self.resolve_first_contact(i).is_some() {
                        contacts += 1;
                    }
                }
            }
            Schedule::Interleaved => {
                for i in 0..n {
                    let p = &mut self.particles[i];
                    p.add_velocity();
                    p.reflect_off_walls(box_size);
                    if self.resolve_first_contact(i).is_some() {
                        contacts += 1;
                    }
                }
            }
        }
        self.tick += 1;
        trace!("tick {}: {} particles, {} contacts", self.tick, n, contacts);
    }

    /// Index of the first particle, in scan order, that overlaps particle `i`.
    ///
    /// Returns `None` when nothing overlaps or `i` is out of range.
    pub fn first_contact(&self, i: usize) -> Option<usize> {
        let me = self.particles.get(i)?;
        self.particles
            .iter()
            .enumerate()
            .find(|&(j, other)| j != i && me.intersects(other))
            .map(|(j, _)| j)
    }

    /// Pair particle `i` with its first contact. Returns the partner index.
    fn resolve_first_contact(&mut self, i: usize) -> Option<usize> {
        let j = self.first_contact(i)?;
        let (vi, vj) = collision_response(self.particles[i].velocity(), self.particles[j].velocity());
        self.particles[i].overwrite_velocity(vi);
        self.particles[j].overwrite_velocity(vj);
        trace!("contact {i} <-> {j}");
        Some(j)
    }

    fn overlaps_any(&self, candidate: &Particle<T>) -> bool {
        self.particles.iter().any(|p| p.intersects(candidate))
    }
}

impl<T: Clone> Simulation<T> {
    /// Place `count` particles of `radius` at random non-overlapping locations.
    ///
    /// All or nothing: returns `false` and leaves the set untouched if any particle of
    /// the batch cannot be placed.
    pub fn place(&mut self, count: usize, radius: f64, tag: T) -> bool {
        match self.try_place(count, radius, tag) {
            Ok(()) => true,
            Err(e) => {
                warn!("placement of {count} particles (radius {radius}) failed: {e}");
                false
            }
        }
    }

    /// [`place`](Self::place) with the failure reason.
    ///
    /// Errors:
    /// - `Error::InvalidPlacementRequest` if `radius` is non-positive or not finite.
    /// - `Error::PlacementExhausted` if some particle still overlapped after the attempt cap;
    ///   particles accepted earlier in the batch are removed again.
    pub fn try_place(&mut self, count: usize, radius: f64, tag: T) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidPlacementRequest(format!(
                "radius must be finite and > 0, got {radius}"
            )));
        }
        let before = self.particles.len();
        let box_size = self.config.box_size;
        let cap = self.config.max_placement_attempts;

        for index in 0..count {
            let mut candidate = Particle::random(
                radius,
                tag.clone(),
                box_size,
                self.config.initial_speed_cap,
                &mut self.rng,
            )?;
            let mut attempts = 0usize;
            while self.overlaps_any(&candidate) {
                candidate.set_random_location(box_size, &mut self.rng);
                attempts += 1;
                if attempts >= cap {
                    self.particles.truncate(before);
                    return Err(Error::PlacementExhausted { index, attempts });
                }
            }
            self.particles.push(candidate);
        }
        debug!(
            "placed {count} particles of radius {radius}; {} total",
            self.particles.len()
        );
        Ok(())
    }
}

impl Simulation<Color> {
    /// Place the start-up population. Returns whether every batch fit.
    pub fn seed_air_mix(&mut self) -> bool {
        AIR_MIX
            .iter()
            .fold(true, |ok, &(count, color)| self.place(count, AIR_PARTICLE_RADIUS, color) && ok)
    }
}
