//! Trajectory preview
//!
//! A non-authoritative forward simulation of a full-power swing, used to draw
//! the aiming arc. It shares the gravity/drag formulas with the flight
//! integrator but terminates on much looser conditions; divergence from the
//! real shot is acceptable because the arc is advisory only.

use glam::{Vec2, Vec3};

use crate::Tuning;
use crate::consts::{TRAJECTORY_DT, TRAJECTORY_POINTS};
use crate::sim::clubs::Club;
use crate::sim::course::Course;
use crate::sim::launch::ShotLauncher;
use crate::sim::state::Lie;

/// Preview bounces simulated before the arc is cut off
const MAX_PREVIEW_BOUNCES: u32 = 3;

/// Builds preview arcs for the aiming UI
pub struct TrajectoryPredictor<'a> {
    course: &'a Course,
    tuning: &'a Tuning,
}

impl<'a> TrajectoryPredictor<'a> {
    pub fn new(course: &'a Course, tuning: &'a Tuning) -> Self {
        Self { course, tuning }
    }

    /// Simulate a full-power shot from `start` and return the arc points
    ///
    /// Pure: no RNG, no mutation of authoritative state. The lie applies its
    /// deterministic distance penalty so a buried ball previews shorter.
    pub fn predict(&self, start: Vec3, club: Club, aim: Vec3, lie: &Lie) -> Vec<Vec3> {
        let launcher = ShotLauncher::new(self.tuning);
        let ball_radius = crate::consts::BALL_RADIUS;
        let is_putter = club.is_putter();

        let flat_aim = {
            let flat = Vec2::new(aim.x, aim.z);
            if flat.length_squared() < 1e-6 {
                Vec2::new(0.0, -1.0)
            } else {
                flat.normalize()
            }
        };

        let mut velocity = if is_putter {
            launcher.putter_velocity(club, 1.0, flat_aim)
        } else {
            launcher.club_velocity(club, 1.0, flat_aim) * lie_speed_penalty(lie)
        };

        let mut position = start;
        let mut points = Vec::with_capacity(TRAJECTORY_POINTS);
        points.push(position);

        let club_distance = club.spec().max_distance;
        let putter_scale = if is_putter {
            self.tuning.putter_gravity_scale
        } else {
            1.0
        };

        let mut sim_time = 0.0;
        let mut bounce_count = 0;

        while points.len() < TRAJECTORY_POINTS {
            velocity.y -= self.tuning.gravity * TRAJECTORY_DT * putter_scale;
            velocity *= 1.0 - self.tuning.air_resistance * TRAJECTORY_DT * putter_scale;
            position += velocity * TRAJECTORY_DT;
            points.push(position);

            let terrain_height = self.course.height_at(position.x, position.z);
            if position.y < terrain_height + ball_radius {
                position.y = terrain_height + ball_radius;

                if is_putter {
                    // Putts never really bounce: roll with slope and a light
                    // friction that is lighter still on the green
                    velocity.y = 0.0;

                    let sample = 0.5;
                    let slope_x = self.course.height_at(position.x + sample, position.z)
                        - self.course.height_at(position.x - sample, position.z);
                    let slope_z = self.course.height_at(position.x, position.z + sample)
                        - self.course.height_at(position.x, position.z - sample);
                    velocity.x -= slope_x * 0.01;
                    velocity.z -= slope_z * 0.01;

                    let friction = if self.course.config.is_on_green(position) {
                        0.99
                    } else {
                        0.95
                    };
                    velocity.x *= friction;
                    velocity.z *= friction;
                } else {
                    // Simplified bounce: fixed energy conservation, no
                    // surface table
                    velocity.y *= -0.6;
                    velocity.x *= 0.8;
                    velocity.z *= 0.8;
                }

                bounce_count += 1;
                if bounce_count >= MAX_PREVIEW_BOUNCES || velocity.length() < 0.1 {
                    break;
                }
            }

            sim_time += TRAJECTORY_DT;
            if sim_time > 20.0 || position.distance(start) > club_distance * 2.0 {
                break;
            }
        }

        points
    }
}

/// Deterministic share of the lie's distance loss (no random spread)
fn lie_speed_penalty(lie: &Lie) -> f32 {
    if lie.in_sand {
        0.7
    } else if lie.in_outer_rough {
        0.85 * 0.7
    } else if lie.in_rough {
        0.85
    } else {
        1.0
    }
}
