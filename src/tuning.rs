//! Data-driven physics balance
//!
//! Every empirically-tuned constant of the flight model lives here so course
//! packs can reshape ball behavior without touching the integrator. Defaults
//! are the shipped balance.

use serde::{Deserialize, Serialize};

use crate::sim::state::Surface;

/// Bounce response of one surface category
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SurfaceBounce {
    /// Scale applied to the base energy retention on this surface
    pub retention_scale: f32,
    /// Per-bounce geometric decay of retained energy
    pub decay_base: f32,
    /// Extra bounce counts charged per impact (stops the ball sooner)
    pub extra_bounce_counts: u32,
    /// Horizontal friction taken out of the ball on impact
    pub impact_friction: f32,
}

/// Tuned physics constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Air drag coefficient (per second, multiplicative)
    pub air_resistance: f32,

    /// Rolling friction per surface
    pub green_friction: f32,
    pub fairway_friction: f32,
    pub standard_rough_friction: f32,
    pub outer_rough_friction: f32,
    pub sand_friction: f32,

    /// Base energy retention on bounce
    pub bounce_energy_retention: f32,
    /// Bounces before forced deceleration kicks in
    pub max_bounces: u32,
    /// Rebound velocity ceiling on fairway / elsewhere
    pub max_bounce_velocity_fairway: f32,
    pub max_bounce_velocity_other: f32,

    /// Bounce response per surface category
    pub sand_bounce: SurfaceBounce,
    pub outer_rough_bounce: SurfaceBounce,
    pub rough_bounce: SurfaceBounce,
    pub fairway_bounce: SurfaceBounce,

    /// Speed below which the ball counts as at rest
    pub rest_threshold: f32,
    /// Grounded slow-rolling on fairway longer than this forces a stop (s)
    pub slow_roll_limit: f32,
    /// Jitter detections tolerated before a hard stop
    pub max_jitter_strikes: u32,

    /// Distance calibration from club yardage to launch speed
    pub distance_multiplier: f32,
    /// Putter speed multiplier
    pub putter_power_multiplier: f32,
    /// Gravity/drag scale for putter shots (keeps putts on the ground)
    pub putter_gravity_scale: f32,
    /// Minimum visible motion for a putter shot (s)
    pub min_putter_shot_time: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            // Slightly reduced to allow more distance
            air_resistance: 0.004,

            green_friction: 0.01,
            fairway_friction: 0.2,
            standard_rough_friction: 0.5,
            outer_rough_friction: 0.9,
            sand_friction: 0.6,

            bounce_energy_retention: 0.65,
            max_bounces: 4,
            max_bounce_velocity_fairway: 6.0,
            max_bounce_velocity_other: 3.0,

            sand_bounce: SurfaceBounce {
                retention_scale: 0.1,
                decay_base: 0.3,
                extra_bounce_counts: 2,
                impact_friction: 0.8,
            },
            outer_rough_bounce: SurfaceBounce {
                retention_scale: 0.2,
                decay_base: 0.3,
                extra_bounce_counts: 2,
                impact_friction: 0.7,
            },
            rough_bounce: SurfaceBounce {
                retention_scale: 0.3,
                decay_base: 0.5,
                extra_bounce_counts: 1,
                impact_friction: 0.5,
            },
            fairway_bounce: SurfaceBounce {
                retention_scale: 1.0,
                decay_base: 0.7,
                extra_bounce_counts: 0,
                impact_friction: 0.3,
            },

            rest_threshold: 0.5,
            slow_roll_limit: 1.5,
            max_jitter_strikes: 3,

            distance_multiplier: 8.4,
            putter_power_multiplier: 48.0,
            putter_gravity_scale: 0.1,
            min_putter_shot_time: 0.6,
        }
    }
}

impl Tuning {
    /// Rolling friction coefficient for a surface
    pub fn rolling_friction(&self, surface: Surface) -> f32 {
        match surface {
            Surface::Green => self.green_friction,
            Surface::Fairway => self.fairway_friction,
            Surface::Rough => self.standard_rough_friction,
            Surface::OuterRough => self.outer_rough_friction,
            Surface::Sand => self.sand_friction,
            // Water terminates the shot before rolling applies
            Surface::Water => self.outer_rough_friction,
        }
    }

    /// Bounce response for a surface (fairway and green share one profile)
    pub fn bounce(&self, surface: Surface) -> SurfaceBounce {
        match surface {
            Surface::Sand => self.sand_bounce,
            Surface::OuterRough => self.outer_rough_bounce,
            Surface::Rough => self.rough_bounce,
            _ => self.fairway_bounce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let tuning = Tuning::default();
        let json = serde_json::to_string(&tuning).unwrap();
        let back: Tuning = serde_json::from_str(&json).unwrap();
        assert_eq!(back.gravity, tuning.gravity);
        assert_eq!(back.sand_bounce.extra_bounce_counts, 2);
    }

    #[test]
    fn test_surface_lookup() {
        let tuning = Tuning::default();
        assert!(tuning.rolling_friction(Surface::Green) < tuning.rolling_friction(Surface::Fairway));
        assert!(
            tuning.rolling_friction(Surface::OuterRough)
                > tuning.rolling_friction(Surface::Rough)
        );
        assert_eq!(tuning.bounce(Surface::Green).retention_scale, 1.0);
        assert!(tuning.bounce(Surface::Sand).retention_scale < tuning.bounce(Surface::Rough).retention_scale);
    }
}
