//! Ball, lie and shot state types
//!
//! Everything an outside observer (camera, UI, audio) consumes lives here.
//! Vectors are value types; the session hands out snapshot copies, never
//! references into live simulation state.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::BALL_RADIUS;
use crate::sim::clubs::Club;

/// Surface category under the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Fairway,
    Rough,
    OuterRough,
    Sand,
    Water,
    Green,
}

/// Surface classification of the ball's current position
///
/// Exactly one flag is true at any time; fairway is the default. Produced
/// fresh by every [`crate::sim::TerrainZoneIndex::classify`] call - callers
/// replace their stored copy wholesale rather than mutating one in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lie {
    pub on_fairway: bool,
    pub in_rough: bool,
    pub in_outer_rough: bool,
    pub in_sand: bool,
    pub in_water: bool,
    pub on_green: bool,
}

impl Default for Lie {
    fn default() -> Self {
        Lie::from(Surface::Fairway)
    }
}

impl From<Surface> for Lie {
    fn from(surface: Surface) -> Self {
        Self {
            on_fairway: surface == Surface::Fairway,
            in_rough: surface == Surface::Rough,
            in_outer_rough: surface == Surface::OuterRough,
            in_sand: surface == Surface::Sand,
            in_water: surface == Surface::Water,
            on_green: surface == Surface::Green,
        }
    }
}

impl Lie {
    /// The single active surface category
    pub fn surface(&self) -> Surface {
        if self.on_green {
            Surface::Green
        } else if self.in_water {
            Surface::Water
        } else if self.in_sand {
            Surface::Sand
        } else if self.in_outer_rough {
            Surface::OuterRough
        } else if self.in_rough {
            Surface::Rough
        } else {
            Surface::Fairway
        }
    }

    /// True when exactly one flag is set (classification invariant)
    pub fn is_exclusive(&self) -> bool {
        [
            self.on_fairway,
            self.in_rough,
            self.in_outer_rough,
            self.in_sand,
            self.in_water,
            self.on_green,
        ]
        .iter()
        .filter(|&&flag| flag)
        .count()
            == 1
    }
}

/// The ball's physical state
///
/// Exclusively owned by the session while a shot is in flight; observers
/// read snapshot copies after each tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BallState {
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f32,
    pub in_motion: bool,
    pub in_hole: bool,
}

impl BallState {
    /// Ball at rest at a position (position already includes the radius lift)
    pub fn at_rest(pos: Vec3) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            radius: BALL_RADIUS,
            in_motion: false,
            in_hole: false,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Phase of the current stroke, driven by [`crate::sim::ShotSession`]
///
/// The settle delay replaces wall-clock timers: it sequences
/// "shot complete" -> "next shot setup" deterministically, and water-penalty
/// repositioning always happens before the delay starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShotPhase {
    /// Waiting for the next swing
    Aiming,
    /// Integrator is advancing the ball
    InFlight,
    /// Motion has ended; presentation pacing before the next-shot setup
    SettleDelay { remaining: f32, holed: bool },
    /// Hole finished
    Completed,
}

/// Discrete events emitted to external collaborators (camera/UI/audio)
///
/// Fire-and-forget, at-most-once per shot for the terminal variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShotEvent {
    /// Ball pose update, every tick while airborne or rolling
    BallMoving {
        position: Vec3,
        prev_position: Vec3,
        velocity: Vec3,
    },
    /// Ball entered water; already repositioned and charged a penalty stroke
    WaterPenalty { new_position: Vec3 },
    /// Ball dropped in the hole
    HoleCompleted { strokes: u32 },
    /// Ball came to rest (any terminal outcome short of holing out)
    ShotComplete { final_position: Vec3 },
    /// Lie re-classified and a club suggested; aiming may resume
    SetupNextShot {
        position: Vec3,
        suggested_club: Club,
    },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
