//! Fairway - golf ball flight & terrain-interaction simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (shot launch, flight physics, terrain
//!   classification, per-stroke orchestration)
//! - `tuning`: Data-driven physics balance
//!
//! Rendering, camera work and UI are external collaborators: they supply a
//! [`sim::course::HeightField`], a hole path and a hazard list, and consume
//! the ball pose plus discrete [`sim::ShotEvent`]s emitted every tick.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::{Vec2, Vec3};

/// Simulation constants that are structural rather than tuned
pub mod consts {
    /// Maximum physics timestep (caps frame hitches, e.g. tab backgrounding)
    pub const MAX_DT: f32 = 0.05;

    /// Ball collision radius in world units
    pub const BALL_RADIUS: f32 = 0.3;

    /// Contact tolerance for ground tests
    pub const GROUND_EPSILON: f32 = 0.01;

    /// Positions within this radius of the tee origin always read as fairway
    pub const NEAR_TEE_RADIUS: f32 = 3.0;

    /// Positions farther than this from the origin short-circuit to outer
    /// rough without a per-segment scan
    pub const FAR_DISTANCE_GUARD: f32 = 500.0;

    /// Grounded ball on the green within this distance of the hole drops in
    pub const HOLE_CAPTURE_RADIUS: f32 = 1.5;

    /// Rest positions within this distance of the hole are forced onto the
    /// green when re-classifying between shots
    pub const NEAR_HOLE_GREEN_RADIUS: f32 = 5.0;

    /// How far below the lip a holed ball sinks
    pub const BALL_SINK_DEPTH: f32 = 0.3;

    /// Resting-candidate samples kept for jitter detection
    pub const JITTER_SAMPLES: usize = 5;

    /// Preview arc resolution
    pub const TRAJECTORY_POINTS: usize = 150;
    /// Preview arc timestep
    pub const TRAJECTORY_DT: f32 = 0.03;

    /// Hard backstop against a runaway shot (ticks per shot)
    pub const MAX_SHOT_TICKS: u32 = 20_000;
}

/// Project a 3D position/velocity onto the horizontal XZ plane
#[inline]
pub fn horizontal(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Rebuild a 3D vector from a horizontal XZ pair and a height
#[inline]
pub fn from_horizontal(h: Vec2, y: f32) -> Vec3 {
    Vec3::new(h.x, y, h.y)
}

/// Horizontal (XZ) speed of a 3D velocity
#[inline]
pub fn horizontal_speed(v: Vec3) -> f32 {
    horizontal(v).length()
}

/// Horizontal (XZ) distance between two 3D positions
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    horizontal(a).distance(horizontal(b))
}
