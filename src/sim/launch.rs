//! Shot launch velocity
//!
//! Turns club selection, charged power, aim direction and the current lie
//! into an initial ball velocity. The putter is its own path: almost no
//! vertical component and a dedicated speed multiplier.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::Tuning;
use crate::sim::clubs::Club;
use crate::sim::state::Lie;

/// Computes initial shot velocities
pub struct ShotLauncher<'a> {
    tuning: &'a Tuning,
}

impl<'a> ShotLauncher<'a> {
    pub fn new(tuning: &'a Tuning) -> Self {
        Self { tuning }
    }

    /// Initial velocity for a swing
    ///
    /// `power` is the charged power meter fraction in [0, 1]; `aim` is a
    /// direction in the XZ plane. The lie steepens/weakens the launch and a
    /// small horizontal perturbation (shrinking with power) keeps repeated
    /// shots from being identical.
    pub fn launch(
        &self,
        club: Club,
        power: f32,
        aim: Vec3,
        lie: &Lie,
        rng: &mut Pcg32,
    ) -> Vec3 {
        let power_factor = power_curve(power);
        let aim = normalize_aim(aim);

        if club.is_putter() {
            return self.putter_velocity(club, power_factor, aim);
        }

        let spec = club.spec();
        let (launch_angle, speed_factor) =
            adjust_for_lie(spec.launch_angle, spec.speed_factor, lie, rng);

        let speed = self.base_speed(spec.max_distance) * power_factor * speed_factor;
        let mut velocity = Vec3::new(
            aim.x * speed * launch_angle.cos(),
            speed * launch_angle.sin(),
            aim.y * speed * launch_angle.cos(),
        );

        // Imperfect contact: more power means a straighter shot
        let random_factor = (1.0 - power_factor) * 0.1;
        velocity.x += rng.random_range(-1.0..1.0f32) * random_factor * speed;
        velocity.z += rng.random_range(-1.0..1.0f32) * random_factor * speed;

        velocity
    }

    /// Putter velocity: flat roll with a tiny upward nudge so the ball does
    /// not fuse with the ground on the first tick
    pub fn putter_velocity(&self, club: Club, power_factor: f32, aim: Vec2) -> Vec3 {
        let speed =
            club.spec().max_distance * 0.1 * self.tuning.putter_power_multiplier * power_factor;
        Vec3::new(aim.x * speed, 0.05, aim.y * speed)
    }

    /// Deterministic full-swing velocity with no lie adjustment or spread
    /// (shared with the trajectory preview)
    pub fn club_velocity(&self, club: Club, power_factor: f32, aim: Vec2) -> Vec3 {
        let spec = club.spec();
        let speed = self.base_speed(spec.max_distance) * power_factor * spec.speed_factor;
        Vec3::new(
            aim.x * speed * spec.launch_angle.cos(),
            speed * spec.launch_angle.sin(),
            aim.y * speed * spec.launch_angle.cos(),
        )
    }

    /// Launch speed needed to carry a club's yardage, before power and lie
    fn base_speed(&self, max_distance: f32) -> f32 {
        (max_distance * 0.1 * self.tuning.gravity).sqrt() * self.tuning.distance_multiplier * 0.5
    }
}

/// Power meter fraction to speed fraction (a tap still moves the ball)
fn power_curve(power: f32) -> f32 {
    0.2 + power.clamp(0.0, 1.0) * 0.8
}

/// Reduce an aim vector to a horizontal unit direction
fn normalize_aim(aim: Vec3) -> Vec2 {
    let flat = Vec2::new(aim.x, aim.z);
    if flat.length_squared() < 1e-6 {
        // Degenerate aim: straight down-course
        Vec2::new(0.0, -1.0)
    } else {
        flat.normalize()
    }
}

/// Lie adjustment: sand steepens and saps the shot, rough adds spread and a
/// speed penalty, outer rough stacks a further helping of both
fn adjust_for_lie(
    launch_angle: f32,
    speed_factor: f32,
    lie: &Lie,
    rng: &mut Pcg32,
) -> (f32, f32) {
    let mut angle = launch_angle;
    let mut speed = speed_factor;

    if lie.in_sand {
        angle += PI / 15.0;
        speed *= 0.7;
    } else if lie.in_rough || lie.in_outer_rough {
        angle += rng.random_range(-0.5..0.5f32) * PI / 10.0;
        speed *= 0.85;
        if lie.in_outer_rough {
            angle += rng.random_range(-0.5..0.5f32) * PI / 8.0;
            speed *= 0.7;
        }
    }

    (angle, speed)
}
