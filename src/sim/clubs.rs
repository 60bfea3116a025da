//! Club specifications and selection
//!
//! Static table of the fifteen clubs: maximum carry in yards, launch angle
//! and speed factor, plus the distance/lie based recommendation used to
//! pre-select a club between shots.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::sim::state::Lie;

/// Club grouping used by selection UIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClubCategory {
    Wood,
    LongIron,
    ShortIron,
    Wedge,
    Putting,
}

/// Club identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Club {
    Driver,
    Wood3,
    Hybrid,
    Iron2,
    Iron3,
    Iron4,
    Iron5,
    Iron6,
    Iron7,
    Iron8,
    Iron9,
    PitchingWedge,
    SandWedge,
    LobWedge,
    Putter,
}

/// Static characteristics of one club
#[derive(Debug, Clone, Copy)]
pub struct ClubSpec {
    pub club: Club,
    pub name: &'static str,
    /// Maximum carry in yards at full power
    pub max_distance: f32,
    /// Launch angle in radians (flatter for the driver, steeper through the
    /// wedges; unused for the putter)
    pub launch_angle: f32,
    /// Speed multiplier relative to the driver
    pub speed_factor: f32,
}

/// The full bag, driver through putter
pub const CLUB_SPECS: [ClubSpec; 15] = [
    ClubSpec { club: Club::Driver, name: "Driver", max_distance: 280.0, launch_angle: PI / 10.0, speed_factor: 1.0 },
    ClubSpec { club: Club::Wood3, name: "3 Wood", max_distance: 240.0, launch_angle: PI / 9.0, speed_factor: 0.95 },
    ClubSpec { club: Club::Hybrid, name: "Hybrid", max_distance: 215.0, launch_angle: PI / 8.5, speed_factor: 0.92 },
    ClubSpec { club: Club::Iron2, name: "2 Iron", max_distance: 200.0, launch_angle: PI / 8.0, speed_factor: 0.9 },
    ClubSpec { club: Club::Iron3, name: "3 Iron", max_distance: 190.0, launch_angle: PI / 8.0, speed_factor: 0.88 },
    ClubSpec { club: Club::Iron4, name: "4 Iron", max_distance: 180.0, launch_angle: PI / 7.5, speed_factor: 0.87 },
    ClubSpec { club: Club::Iron5, name: "5 Iron", max_distance: 170.0, launch_angle: PI / 7.5, speed_factor: 0.85 },
    ClubSpec { club: Club::Iron6, name: "6 Iron", max_distance: 160.0, launch_angle: PI / 7.0, speed_factor: 0.84 },
    ClubSpec { club: Club::Iron7, name: "7 Iron", max_distance: 150.0, launch_angle: PI / 7.0, speed_factor: 0.83 },
    ClubSpec { club: Club::Iron8, name: "8 Iron", max_distance: 140.0, launch_angle: PI / 6.5, speed_factor: 0.82 },
    ClubSpec { club: Club::Iron9, name: "9 Iron", max_distance: 130.0, launch_angle: PI / 6.0, speed_factor: 0.81 },
    ClubSpec { club: Club::PitchingWedge, name: "P Wedge", max_distance: 115.0, launch_angle: PI / 5.5, speed_factor: 0.8 },
    ClubSpec { club: Club::SandWedge, name: "S Wedge", max_distance: 90.0, launch_angle: PI / 5.0, speed_factor: 0.75 },
    ClubSpec { club: Club::LobWedge, name: "L Wedge", max_distance: 70.0, launch_angle: PI / 4.5, speed_factor: 0.7 },
    ClubSpec { club: Club::Putter, name: "Putter", max_distance: 20.0, launch_angle: 0.0, speed_factor: 1.0 },
];

impl Club {
    pub fn spec(self) -> &'static ClubSpec {
        // The table covers every variant
        CLUB_SPECS
            .iter()
            .find(|spec| spec.club == self)
            .unwrap_or(&CLUB_SPECS[0])
    }

    pub fn is_putter(self) -> bool {
        self == Club::Putter
    }

    pub fn category(self) -> ClubCategory {
        match self {
            Club::Driver | Club::Wood3 | Club::Hybrid => ClubCategory::Wood,
            Club::Iron2 | Club::Iron3 | Club::Iron4 | Club::Iron5 => ClubCategory::LongIron,
            Club::Iron6 | Club::Iron7 | Club::Iron8 | Club::Iron9 => ClubCategory::ShortIron,
            Club::PitchingWedge | Club::SandWedge | Club::LobWedge => ClubCategory::Wedge,
            Club::Putter => ClubCategory::Putting,
        }
    }

    /// Parse a club id; unknown ids substitute the driver rather than fail
    pub fn from_name(name: &str) -> Club {
        match name {
            "driver" => Club::Driver,
            "wood3" => Club::Wood3,
            "hybrid" => Club::Hybrid,
            "iron2" => Club::Iron2,
            "iron3" => Club::Iron3,
            "iron4" => Club::Iron4,
            "iron5" => Club::Iron5,
            "iron6" => Club::Iron6,
            "iron7" => Club::Iron7,
            "iron8" => Club::Iron8,
            "iron9" => Club::Iron9,
            "pitchingWedge" => Club::PitchingWedge,
            "sandWedge" => Club::SandWedge,
            "lobWedge" => Club::LobWedge,
            "putter" => Club::Putter,
            other => {
                log::warn!("Unknown club id '{other}', falling back to driver");
                Club::Driver
            }
        }
    }
}

/// Clubs recommended for a distance (yards) and lie, best first
pub fn recommended(distance: f32, lie: &Lie) -> &'static [Club] {
    use Club::*;

    if lie.on_green {
        return &[Putter];
    }

    if lie.in_sand {
        return if distance < 30.0 {
            &[SandWedge, LobWedge]
        } else {
            &[SandWedge, PitchingWedge]
        };
    }

    if distance > 280.0 {
        &[Driver, Wood3]
    } else if distance > 230.0 {
        &[Wood3, Hybrid, Iron2]
    } else if distance > 210.0 {
        &[Hybrid, Iron2, Iron3]
    } else if distance > 190.0 {
        &[Iron3, Iron4]
    } else if distance > 170.0 {
        &[Iron4, Iron5]
    } else if distance > 150.0 {
        &[Iron5, Iron6]
    } else if distance > 130.0 {
        &[Iron6, Iron7]
    } else if distance > 110.0 {
        &[Iron7, Iron8]
    } else if distance > 90.0 {
        &[Iron8, Iron9]
    } else if distance > 70.0 {
        &[Iron9, PitchingWedge]
    } else if distance > 50.0 {
        &[PitchingWedge, SandWedge]
    } else if distance > 20.0 {
        &[SandWedge, LobWedge]
    } else {
        &[Putter, LobWedge]
    }
}

/// Best single club suggestion for a distance and lie
pub fn suggest(distance: f32, lie: &Lie) -> Club {
    recommended(distance, lie)[0]
}
