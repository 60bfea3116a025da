//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - Capped timestep only
//! - Seeded RNG only
//! - Course data injected at construction, never reached for ambiently
//! - No rendering or platform dependencies

pub mod clubs;
pub mod course;
pub mod flight;
pub mod launch;
pub mod predict;
pub mod session;
pub mod state;
pub mod terrain;

pub use clubs::{CLUB_SPECS, Club, ClubCategory, ClubSpec};
pub use course::{
    Course, CourseConfig, FlatGround, Hazard, HazardRect, HeightField, HeightmapField, HolePath,
    TreeObstacle,
};
pub use flight::{FlightIntegrator, FlightRegime, FlightState, StepOutcome};
pub use launch::ShotLauncher;
pub use predict::TrajectoryPredictor;
pub use session::ShotSession;
pub use state::{BallState, Lie, RngState, ShotEvent, ShotPhase, Surface};
pub use terrain::TerrainZoneIndex;
