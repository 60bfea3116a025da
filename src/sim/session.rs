//! Per-stroke orchestration
//!
//! The session owns the ball, the course data and the per-shot transients
//! for the duration of a stroke: it launches via [`ShotLauncher`], drives
//! [`FlightIntegrator`] once per external tick, and sequences the terminal
//! transitions (penalty drop, settle pacing, lie re-classification, club
//! suggestion) as an explicit state machine rather than wall-clock timers.
//! The water-penalty reposition therefore always completes before the
//! next-shot setup fires.

use glam::Vec3;
use rand_pcg::Pcg32;

use crate::Tuning;
use crate::consts::{MAX_SHOT_TICKS, NEAR_HOLE_GREEN_RADIUS};
use crate::horizontal_distance;
use crate::sim::clubs::{self, Club};
use crate::sim::course::Course;
use crate::sim::flight::{FlightIntegrator, FlightState, StepOutcome};
use crate::sim::launch::ShotLauncher;
use crate::sim::predict::TrajectoryPredictor;
use crate::sim::state::{BallState, Lie, RngState, ShotEvent, ShotPhase, Surface};
use crate::sim::terrain::TerrainZoneIndex;

/// Settle pacing after a putt (longer: respect the short roll)
const SETTLE_DELAY_PUTTER: f32 = 0.8;
/// Settle pacing after any other shot
const SETTLE_DELAY_NORMAL: f32 = 0.2;
/// Sink-animation pacing before the hole-completed notification
const SETTLE_DELAY_HOLED: f32 = 0.8;

/// One hole of play: strokes, ball and shot lifecycle
pub struct ShotSession {
    course: Course,
    zones: TerrainZoneIndex,
    tuning: Tuning,
    rng_state: RngState,
    rng: Pcg32,

    ball: BallState,
    prev_position: Vec3,
    phase: ShotPhase,
    flight: FlightState,
    current_lie: Lie,
    suggested_club: Club,
    strokes: u32,
    shot_ticks: u32,
    events: Vec<ShotEvent>,
}

impl ShotSession {
    /// Build a session for a course, placing the ball on the tee
    pub fn new(course: Course, tuning: Tuning, seed: u64) -> Self {
        let config = &course.config;
        let mut zones = TerrainZoneIndex::build(
            &course.path,
            config.fairway_width,
            config.rough_width,
            config.outer_rough_width,
            config.hole_position(),
            config.green_radius,
        );
        for hazard in course.hazards() {
            zones.register_hazard(*hazard);
        }

        let tee_height = course.height_at(0.0, 0.0);
        let ball = BallState::at_rest(Vec3::new(
            0.0,
            tee_height + crate::consts::BALL_RADIUS,
            0.0,
        ));

        let rng_state = RngState::new(seed);
        let rng = rng_state.to_rng();
        let current_lie = zones.classify(ball.pos);

        log::info!("Session ready, seed {seed}");

        Self {
            course,
            zones,
            tuning,
            rng_state,
            rng,
            ball,
            prev_position: ball.pos,
            phase: ShotPhase::Aiming,
            flight: FlightState::new(false),
            current_lie,
            suggested_club: Club::Driver,
            strokes: 0,
            shot_ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn ball(&self) -> BallState {
        self.ball
    }

    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    pub fn strokes(&self) -> u32 {
        self.strokes
    }

    pub fn current_lie(&self) -> Lie {
        self.current_lie
    }

    pub fn suggested_club(&self) -> Club {
        self.suggested_club
    }

    pub fn hole_completed(&self) -> bool {
        self.phase == ShotPhase::Completed
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn zones(&self) -> &TerrainZoneIndex {
        &self.zones
    }

    /// Events accumulated since the last drain, in emission order
    pub fn drain_events(&mut self) -> Vec<ShotEvent> {
        std::mem::take(&mut self.events)
    }

    /// Preview arc for the current ball position and lie
    pub fn predict(&self, club: Club, aim: Vec3) -> Vec<Vec3> {
        TrajectoryPredictor::new(&self.course, &self.tuning).predict(
            self.ball.pos,
            club,
            aim,
            &self.current_lie,
        )
    }

    /// Drop the ball somewhere specific (tests, practice mode); refused
    /// while a shot is in flight
    pub fn place_ball(&mut self, x: f32, z: f32) {
        if self.phase == ShotPhase::InFlight {
            log::warn!("Ignoring ball placement while in flight");
            return;
        }
        let y = self.course.height_at(x, z) + self.ball.radius;
        self.ball = BallState::at_rest(Vec3::new(x, y, z));
        self.prev_position = self.ball.pos;
        self.current_lie = self.rest_lie(self.ball.pos);
    }

    /// Begin a stroke; returns false (and does nothing) if a shot is already
    /// in flight or the hole is finished
    pub fn start_shot(&mut self, club: Club, power: f32, aim: Vec3) -> bool {
        if self.phase != ShotPhase::Aiming {
            log::warn!("Shot refused in phase {:?}", self.phase);
            return false;
        }

        self.strokes += 1;
        self.prev_position = self.ball.pos;
        self.flight = FlightState::new(club.is_putter());
        self.shot_ticks = 0;

        let launcher = ShotLauncher::new(&self.tuning);
        self.ball.vel = launcher.launch(club, power, aim, &self.current_lie, &mut self.rng);
        self.ball.in_motion = true;
        self.phase = ShotPhase::InFlight;

        log::info!(
            "Stroke {} with {:?}, power {power:.2}",
            self.strokes,
            club
        );

        self.events.push(ShotEvent::BallMoving {
            position: self.ball.pos,
            prev_position: self.prev_position,
            velocity: self.ball.vel,
        });
        true
    }

    /// Advance the session by one frame
    pub fn tick(&mut self, dt: f32) {
        match self.phase {
            ShotPhase::InFlight => self.tick_flight(dt),
            ShotPhase::SettleDelay { remaining, holed } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.phase = ShotPhase::SettleDelay { remaining, holed };
                } else if holed {
                    self.phase = ShotPhase::Completed;
                    self.events.push(ShotEvent::HoleCompleted {
                        strokes: self.strokes,
                    });
                } else {
                    self.setup_next_shot();
                }
            }
            ShotPhase::Aiming | ShotPhase::Completed => {}
        }
    }

    fn tick_flight(&mut self, dt: f32) {
        self.shot_ticks += 1;
        if self.shot_ticks > MAX_SHOT_TICKS {
            // Correctness backstop: a shot that refuses to settle is ended
            // so the game stays playable
            log::error!("Shot exceeded {MAX_SHOT_TICKS} ticks, forcing stop");
            self.ball.vel = Vec3::ZERO;
            self.ball.pos.y =
                self.course.height_at(self.ball.pos.x, self.ball.pos.z) + self.ball.radius;
            self.ball.in_motion = false;
            self.finish_shot(false);
            return;
        }

        let integrator = FlightIntegrator::new(&self.course, &self.zones, &self.tuning);
        let outcome = integrator.step(&mut self.ball, &mut self.flight, &mut self.rng, dt);

        match outcome {
            StepOutcome::InMotion => {
                self.events.push(ShotEvent::BallMoving {
                    position: self.ball.pos,
                    prev_position: self.prev_position,
                    velocity: self.ball.vel,
                });
                self.prev_position = self.ball.pos;
            }
            StepOutcome::AtRest => self.finish_shot(false),
            StepOutcome::Holed => {
                self.phase = ShotPhase::SettleDelay {
                    remaining: SETTLE_DELAY_HOLED,
                    holed: true,
                };
            }
            StepOutcome::WaterPenalty { new_position } => {
                // Penalty stroke on top of the swing already counted
                self.strokes += 1;
                self.current_lie = self.rest_lie(new_position);
                self.events.push(ShotEvent::WaterPenalty { new_position });
                self.finish_shot(true);
            }
        }
    }

    /// Motion has ended short of the hole: emit completion and start the
    /// settle pacing toward the next-shot setup
    fn finish_shot(&mut self, water: bool) {
        self.events.push(ShotEvent::ShotComplete {
            final_position: self.ball.pos,
        });
        let remaining = if self.flight.is_putter && !water {
            SETTLE_DELAY_PUTTER
        } else {
            SETTLE_DELAY_NORMAL
        };
        self.phase = ShotPhase::SettleDelay {
            remaining,
            holed: false,
        };
    }

    /// Re-classify the lie, recompute the distance, suggest a club and hand
    /// control back to aiming
    fn setup_next_shot(&mut self) {
        // Force correct resting height before the next swing
        let correct_height =
            self.course.height_at(self.ball.pos.x, self.ball.pos.z) + self.ball.radius;
        if (self.ball.pos.y - correct_height).abs() > 0.01 {
            self.ball.pos.y = correct_height;
        }

        self.current_lie = self.rest_lie(self.ball.pos);
        let distance_to_hole = horizontal_distance(self.ball.pos, self.course.hole_position());
        self.suggested_club = clubs::suggest(distance_to_hole, &self.current_lie);

        log::info!(
            "Next shot: {:.0} to the hole, suggesting {:?}",
            distance_to_hole,
            self.suggested_club
        );

        self.events.push(ShotEvent::SetupNextShot {
            position: self.ball.pos,
            suggested_club: self.suggested_club,
        });
        self.phase = ShotPhase::Aiming;
    }

    /// Lie classification for a resting ball: positions hugging the hole are
    /// forced onto the green so short chips read correctly
    fn rest_lie(&self, position: Vec3) -> Lie {
        let lie = self.zones.classify(position);
        if !lie.on_green
            && horizontal_distance(position, self.course.hole_position()) < NEAR_HOLE_GREEN_RADIUS
        {
            return Lie::from(Surface::Green);
        }
        lie
    }
}
