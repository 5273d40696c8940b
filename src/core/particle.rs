use crate::core::color::Color;
use crate::error::{Error, Result};
use glam::DVec3;
use log::trace;
use rand::Rng;

/// Axis indices, in the order walls are tested.
pub const AXES: [usize; 3] = [0, 1, 2];

/// A rigid sphere in a box centred on the origin.
///
/// Fields:
/// - `position`: centre of the sphere
/// - `velocity`: displacement applied once per tick
/// - `acceleration`: zero unless set; the tick never applies it
/// - `radius`: fixed at creation (> 0)
/// - `tag`: opaque payload for the renderer (a colour by default)
#[derive(Debug, Clone, PartialEq)]
pub struct Particle<T = Color> {
    position: DVec3,
    velocity: DVec3,
    acceleration: DVec3,
    radius: f64,
    tag: T,
}

impl<T> Particle<T> {
    /// Create a particle with explicit state.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` is non-positive or any component is NaN/inf.
    pub fn new(radius: f64, position: DVec3, velocity: DVec3, tag: T) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !position.is_finite() {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !velocity.is_finite() {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            position,
            velocity,
            acceleration: DVec3::ZERO,
            radius,
            tag,
        })
    }

    /// Create a particle at a random interior location with a random velocity.
    pub fn random<R: Rng + ?Sized>(
        radius: f64,
        tag: T,
        box_size: f64,
        speed_cap: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let mut p = Self::new(radius, DVec3::ZERO, DVec3::ZERO, tag)?;
        p.set_random_location(box_size, rng);
        p.set_random_velocity(speed_cap, rng);
        Ok(p)
    }

    #[inline]
    pub fn position(&self) -> DVec3 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> DVec3 {
        self.velocity
    }

    #[inline]
    pub fn acceleration(&self) -> DVec3 {
        self.acceleration
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    #[inline]
    pub fn tag(&self) -> &T {
        &self.tag
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Replace the velocity (validated as finite).
    pub fn set_velocity(&mut self, v: DVec3) -> Result<()> {
        if !v.is_finite() {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        self.velocity = v;
        Ok(())
    }

    /// Replace the velocity with a value already known to be finite.
    #[inline]
    pub(crate) fn overwrite_velocity(&mut self, v: DVec3) {
        self.velocity = v;
    }

    /// Replace the acceleration (validated as finite).
    pub fn set_acceleration(&mut self, a: DVec3) -> Result<()> {
        if !a.is_finite() {
            return Err(Error::InvalidParam("acceleration must be finite".into()));
        }
        self.acceleration = a;
        Ok(())
    }

    /// Draw each coordinate uniformly so the whole sphere starts inside the box.
    ///
    /// The span shrinks to nothing (or flips sign) when the sphere is as wide as the box;
    /// the draw still succeeds, it just cannot keep the surface inside.
    pub fn set_random_location<R: Rng + ?Sized>(&mut self, box_size: f64, rng: &mut R) {
        let span = box_size - self.diameter();
        let offset = span / 2.0;
        self.position = DVec3::new(
            rng.random::<f64>() * span - offset,
            rng.random::<f64>() * span - offset,
            rng.random::<f64>() * span - offset,
        );
    }

    /// Draw each axis as `u * cap * sign`, `u` uniform in [0, 1) and `sign` a fair coin.
    ///
    /// Per-axis magnitudes are independent, so directions favour the cube diagonals.
    pub fn set_random_velocity<R: Rng + ?Sized>(&mut self, speed_cap: f64, rng: &mut R) {
        self.velocity = DVec3::new(
            velocity_component(speed_cap, rng),
            velocity_component(speed_cap, rng),
            velocity_component(speed_cap, rng),
        );
    }

    /// `position += velocity`.
    #[inline]
    pub fn add_velocity(&mut self) {
        self.position += self.velocity;
    }

    /// `position -= velocity`.
    #[inline]
    pub fn subtract_velocity(&mut self) {
        self.position -= self.velocity;
    }

    /// `velocity += acceleration`.
    #[inline]
    pub fn add_acceleration(&mut self) {
        self.velocity += self.acceleration;
    }

    /// Bounce off the box walls. Returns which axes triggered.
    ///
    /// Each axis is tested against the position at entry. A triggered axis resets the
    /// position to `entry_position - entry_velocity` on all three axes and negates its own
    /// velocity component. Two triggered axes therefore still undo the displacement only
    /// once, while both components flip.
    pub fn reflect_off_walls(&mut self, box_size: f64) -> [bool; 3] {
        let half = box_size / 2.0;
        let (pos, vel) = (self.position, self.velocity);
        let mut hit = [false; 3];
        for axis in AXES {
            if pos[axis].abs() + self.radius >= half {
                self.position = pos - vel;
                self.velocity[axis] = -vel[axis];
                hit[axis] = true;
            }
        }
        if hit.iter().any(|&h| h) {
            trace!("wall reflection on axes {hit:?} at {pos}");
        }
        hit
    }

    /// True iff the centres are strictly closer than the sum of the radii.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.position.distance(other.position) < self.radius + other.radius
    }

    /// The velocity rescaled to `length`, direction kept.
    ///
    /// Errors:
    /// - `Error::DegenerateVelocity` if the velocity is the zero vector.
    pub fn rescaled_velocity(&self, length: f64) -> Result<DVec3> {
        rescale(self.velocity, length)
    }

    /// Average the two speeds and swap directions with `other`.
    pub fn collision_fix(&mut self, other: &mut Self) {
        let (mine, theirs) = collision_response(self.velocity, other.velocity);
        self.velocity = mine;
        other.velocity = theirs;
    }
}

/// Velocities after a collision between `a` and `b`.
///
/// Both come out with length `(|a| + |b|) / 2`; the first takes `b`'s direction and the
/// second takes `a`'s. A zero input has no direction, so its rescaled form stays zero.
pub fn collision_response(a: DVec3, b: DVec3) -> (DVec3, DVec3) {
    let avg = (a.length() + b.length()) / 2.0;
    let a_scaled = rescale(a, avg).unwrap_or_else(|_| {
        trace!("zero velocity in collision, left unscaled");
        DVec3::ZERO
    });
    let b_scaled = rescale(b, avg).unwrap_or_else(|_| {
        trace!("zero velocity in collision, left unscaled");
        DVec3::ZERO
    });
    (b_scaled, a_scaled)
}

fn rescale(v: DVec3, length: f64) -> Result<DVec3> {
    let current = v.length();
    if current == 0.0 {
        return Err(Error::DegenerateVelocity);
    }
    Ok(v * (length / current))
}

fn velocity_component<R: Rng + ?Sized>(speed_cap: f64, rng: &mut R) -> f64 {
    let magnitude = rng.random::<f64>() * speed_cap;
    magnitude * random_sign(rng)
}

#[inline]
fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    if rng.random_bool(0.5) {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ball(pos: [f64; 3], vel: [f64; 3], radius: f64) -> Particle<()> {
        Particle::new(radius, DVec3::from_array(pos), DVec3::from_array(vel), ())
            .expect("valid fixture")
    }

    #[test]
    fn new_particle_ok() -> Result<()> {
        let p = Particle::new(0.5, DVec3::new(0.0, 1.0, 2.0), DVec3::new(2.0, -3.0, 0.5), Color::Red)?;
        assert_eq!(p.position(), DVec3::new(0.0, 1.0, 2.0));
        assert_eq!(p.velocity(), DVec3::new(2.0, -3.0, 0.5));
        assert_eq!(p.acceleration(), DVec3::ZERO);
        assert_eq!(p.radius(), 0.5);
        assert_eq!(p.diameter(), 1.0);
        assert_eq!(*p.tag(), Color::Red);
        Ok(())
    }

    #[test]
    fn invalid_radius_rejected() {
        for r in [0.0, -0.1, f64::NAN] {
            let err = Particle::new(r, DVec3::ZERO, DVec3::ZERO, ()).unwrap_err();
            assert!(err.to_string().contains("radius"));
        }
    }

    #[test]
    fn non_finite_state_rejected() {
        let err = Particle::new(0.1, DVec3::new(f64::NAN, 0.0, 0.0), DVec3::ZERO, ()).unwrap_err();
        assert!(err.to_string().contains("position"));
        let err = Particle::new(0.1, DVec3::ZERO, DVec3::new(0.0, f64::INFINITY, 0.0), ()).unwrap_err();
        assert!(err.to_string().contains("velocity"));
    }

    #[test]
    fn random_location_keeps_sphere_inside() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut p = ball([0.0; 3], [0.0; 3], 0.1);
        let limit = (1.0 - p.diameter()) / 2.0;
        for _ in 0..1000 {
            p.set_random_location(1.0, &mut rng);
            for axis in AXES {
                assert!(p.position()[axis].abs() <= limit);
            }
        }
    }

    #[test]
    fn random_location_survives_oversized_sphere() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut p = ball([0.0; 3], [0.0; 3], 0.75);
        p.set_random_location(1.0, &mut rng);
        assert!(p.position().is_finite());
    }

    #[test]
    fn random_velocity_is_capped_per_axis_with_both_signs() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut p = ball([0.0; 3], [0.0; 3], 0.1);
        let (mut neg, mut pos) = (0, 0);
        for _ in 0..500 {
            p.set_random_velocity(0.05, &mut rng);
            for axis in AXES {
                let v = p.velocity()[axis];
                assert!(v.abs() < 0.05);
                if v < 0.0 {
                    neg += 1;
                } else if v > 0.0 {
                    pos += 1;
                }
            }
        }
        assert!(neg > 500 && pos > 500, "signs unbalanced: {neg} negative, {pos} positive");
    }

    #[test]
    fn integration_primitives() -> Result<()> {
        let mut p = ball([0.1, 0.0, -0.1], [0.01, 0.02, 0.03], 0.05);
        p.add_velocity();
        assert_relative_eq!(p.position().x, 0.11);
        assert_relative_eq!(p.position().y, 0.02);
        assert_relative_eq!(p.position().z, -0.07);
        p.subtract_velocity();
        assert_relative_eq!(p.position().z, -0.1);

        assert_eq!(p.acceleration(), DVec3::ZERO);
        p.add_acceleration();
        assert_eq!(p.velocity(), DVec3::new(0.01, 0.02, 0.03));
        p.set_acceleration(DVec3::new(0.0, -0.01, 0.0))?;
        p.add_acceleration();
        assert_relative_eq!(p.velocity().y, 0.01);
        Ok(())
    }

    #[test]
    fn reflection_on_single_axis() {
        // |0.48| + 0.02 >= 0.5 on x only
        let mut p = ball([0.48, 0.1, -0.1], [0.03, 0.01, -0.02], 0.02);
        let hit = p.reflect_off_walls(1.0);
        assert_eq!(hit, [true, false, false]);
        assert_relative_eq!(p.position().x, 0.45);
        assert_relative_eq!(p.position().y, 0.09);
        assert_relative_eq!(p.position().z, -0.08);
        assert_eq!(p.velocity(), DVec3::new(-0.03, 0.01, -0.02));
    }

    #[test]
    fn reflection_inside_box_is_noop() {
        let mut p = ball([0.1, 0.2, 0.3], [0.01, 0.01, 0.01], 0.05);
        assert_eq!(p.reflect_off_walls(1.0), [false; 3]);
        assert_eq!(p.position(), DVec3::new(0.1, 0.2, 0.3));
        assert_eq!(p.velocity(), DVec3::new(0.01, 0.01, 0.01));
    }

    #[test]
    fn reflection_on_two_axes_undoes_once_and_flips_both() {
        // Known quirk: two triggered axes each reset from the entry state, so the
        // displacement is undone once, yet both velocity components flip.
        let mut p = ball([0.49, -0.49, 0.0], [0.02, -0.04, 0.01], 0.02);
        let hit = p.reflect_off_walls(1.0);
        assert_eq!(hit, [true, true, false]);
        assert_relative_eq!(p.position().x, 0.47);
        assert_relative_eq!(p.position().y, -0.45);
        assert_relative_eq!(p.position().z, -0.01);
        assert_eq!(p.velocity(), DVec3::new(-0.02, 0.04, 0.01));
    }

    #[test]
    fn reflection_boundary_is_inclusive() {
        let mut p = ball([0.25, 0.0, 0.0], [0.01, 0.0, 0.0], 0.25);
        assert_eq!(p.reflect_off_walls(1.0), [true, false, false]);
    }

    #[test]
    fn intersection_is_strict() {
        let a = ball([0.0, 0.0, 0.0], [0.0; 3], 0.1);
        let touching = ball([0.2, 0.0, 0.0], [0.0; 3], 0.1);
        let overlapping = ball([0.0, 0.19, 0.0], [0.0; 3], 0.1);
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
    }

    #[test]
    fn collision_fix_averages_and_swaps() {
        let mut a = ball([0.0; 3], [0.03, 0.0, 0.04], 0.1); // |a| = 0.05
        let mut b = ball([0.1, 0.0, 0.0], [0.0, -0.01, 0.0], 0.1); // |b| = 0.01
        a.collision_fix(&mut b);

        assert_relative_eq!(a.speed(), 0.03, epsilon = 1e-15);
        assert_relative_eq!(b.speed(), 0.03, epsilon = 1e-15);
        // a took b's direction, b took a's
        assert_relative_eq!(a.velocity().y, -0.03, epsilon = 1e-15);
        assert_relative_eq!(b.velocity().x, 0.018, epsilon = 1e-15);
        assert_relative_eq!(b.velocity().z, 0.024, epsilon = 1e-15);
    }

    #[test]
    fn collision_with_zero_velocity_side() {
        let (a, b) = collision_response(DVec3::ZERO, DVec3::new(0.0, 0.04, 0.0));
        // the still particle adopts the mover's direction at half its speed
        assert_relative_eq!(a.y, 0.02, epsilon = 1e-15);
        assert_eq!(b, DVec3::ZERO);

        let (a, b) = collision_response(DVec3::ZERO, DVec3::ZERO);
        assert_eq!(a, DVec3::ZERO);
        assert_eq!(b, DVec3::ZERO);
    }

    #[test]
    fn rescale_zero_is_degenerate() {
        let p = ball([0.0; 3], [0.0; 3], 0.1);
        assert_eq!(p.rescaled_velocity(1.0), Err(Error::DegenerateVelocity));
        let q = ball([0.0; 3], [0.0, 3.0, 4.0], 0.1);
        assert_eq!(q.rescaled_velocity(10.0), Ok(DVec3::new(0.0, 6.0, 8.0)));
    }
}
