//! Terrain zone classification
//!
//! Classifies a position against the piecewise path-relative bands (fairway,
//! standard rough, outer rough), the green disc, and registered hazards,
//! producing a [`Lie`]. Zone lists are built once per hole and rebuilt
//! wholesale when a new course is generated - never mutated incrementally.

use glam::{Vec2, Vec3};

use crate::consts::{FAR_DISTANCE_GUARD, NEAR_TEE_RADIUS};
use crate::horizontal;
use crate::sim::course::{Hazard, HolePath};
use crate::sim::state::{Lie, Surface};

/// Distance from a point to a path segment in the XZ plane
///
/// Standard projection clamped to [0, 1] of segment length; a degenerate
/// segment (start == end) falls back to point distance.
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-4 {
        return a.distance(p);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t).distance(p)
}

/// Band of terrain flanking one path segment between two offsets
#[derive(Debug, Clone, Copy)]
pub struct PathBand {
    start: Vec2,
    end: Vec2,
    inner: f32,
    outer: f32,
}

impl PathBand {
    pub fn new(start: Vec2, end: Vec2, inner: f32, outer: f32) -> Self {
        Self {
            start,
            end,
            inner,
            outer,
        }
    }

    pub fn distance_to_segment(&self, p: Vec2) -> f32 {
        distance_to_segment(p, self.start, self.end)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let d = self.distance_to_segment(p);
        d >= self.inner && d <= self.outer
    }
}

/// Circular green around the hole
#[derive(Debug, Clone, Copy)]
pub struct GreenZone {
    center: Vec2,
    radius: f32,
}

impl GreenZone {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.center.distance_squared(p) <= self.radius * self.radius
    }
}

/// Spatial index answering "what surface is under this position?"
///
/// Built from the hole path and green once per hole; hazards are registered
/// individually as the course places them. [`TerrainZoneIndex::classify`] is
/// the sole query and is pure.
pub struct TerrainZoneIndex {
    fairway: Vec<PathBand>,
    rough: Vec<PathBand>,
    outer_rough: Vec<PathBand>,
    green: GreenZone,
    water: Vec<Hazard>,
    sand: Vec<Hazard>,
    fairway_width: f32,
}

impl TerrainZoneIndex {
    /// Construct the zone lists from the hole centerline and green
    pub fn build(
        path: &HolePath,
        fairway_width: f32,
        rough_width: f32,
        outer_rough_width: f32,
        green_center: Vec3,
        green_radius: f32,
    ) -> Self {
        let mut fairway = Vec::new();
        let mut rough = Vec::new();
        let mut outer_rough = Vec::new();

        for (a, b) in path.segments() {
            let (a, b) = (horizontal(a), horizontal(b));
            fairway.push(PathBand::new(a, b, 0.0, fairway_width / 2.0));
            rough.push(PathBand::new(
                a,
                b,
                fairway_width / 2.0,
                fairway_width / 2.0 + rough_width / 2.0,
            ));
            let outer_inner = fairway_width / 2.0 + rough_width;
            outer_rough.push(PathBand::new(
                a,
                b,
                outer_inner,
                outer_inner + outer_rough_width,
            ));
        }

        log::info!(
            "Terrain zones built: {} fairway, {} rough, {} outer rough segments",
            fairway.len(),
            rough.len(),
            outer_rough.len()
        );

        Self {
            fairway,
            rough,
            outer_rough,
            green: GreenZone::new(horizontal(green_center), green_radius),
            water: Vec::new(),
            sand: Vec::new(),
            fairway_width,
        }
    }

    /// Register a hazard for classification (called once per hazard at build)
    pub fn register_hazard(&mut self, hazard: Hazard) {
        if hazard.is_water() {
            self.water.push(hazard);
        } else {
            self.sand.push(hazard);
        }
    }

    pub fn green(&self) -> &GreenZone {
        &self.green
    }

    /// Classify a ball position into its surface lie
    ///
    /// Priority: near-tee override, far-distance guard, green, water, sand,
    /// fairway, standard rough band, outer rough band, then the
    /// distance-to-fairway fallback. First match wins within each band list.
    pub fn classify(&self, position: Vec3) -> Lie {
        let p = horizontal(position);

        // Tee shots must never read as rough
        if p.length() < NEAR_TEE_RADIUS {
            return Lie::from(Surface::Fairway);
        }

        // Stray balls far off the course skip the per-segment scan entirely
        if p.length() > FAR_DISTANCE_GUARD {
            log::debug!(
                "Position {:.0} units from origin, defaulting to outer rough",
                p.length()
            );
            return Lie::from(Surface::OuterRough);
        }

        if self.green.contains(p) {
            return Lie::from(Surface::Green);
        }

        for hazard in &self.water {
            if hazard.collides_with(position) {
                return Lie::from(Surface::Water);
            }
        }

        for hazard in &self.sand {
            if hazard.collides_with(position) {
                return Lie::from(Surface::Sand);
            }
        }

        // Fairway wins over rough wherever the bands overlap, so it is
        // checked first; track the closest centerline distance for the
        // fallback below.
        let mut min_fairway_dist = f32::MAX;
        for band in &self.fairway {
            let d = band.distance_to_segment(p);
            min_fairway_dist = min_fairway_dist.min(d);
            if d <= self.fairway_width / 2.0 {
                return Lie::from(Surface::Fairway);
            }
        }

        if self.rough.iter().any(|band| band.contains(p)) {
            return Lie::from(Surface::Rough);
        }

        if self.outer_rough.iter().any(|band| band.contains(p)) {
            return Lie::from(Surface::OuterRough);
        }

        // Off every band: near-fairway distance reads as standard rough,
        // anything farther as outer rough.
        if min_fairway_dist <= self.fairway_width * 2.0 {
            log::debug!(
                "Position {min_fairway_dist:.1} units off fairway, fallback to standard rough"
            );
            Lie::from(Surface::Rough)
        } else {
            Lie::from(Surface::OuterRough)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::course::{CourseConfig, HazardRect};
    use proptest::prelude::*;

    fn test_index() -> TerrainZoneIndex {
        let config = CourseConfig::default();
        let path = config.generate_hole_path();
        TerrainZoneIndex::build(
            &path,
            config.fairway_width,
            config.rough_width,
            config.outer_rough_width,
            config.hole_position(),
            config.green_radius,
        )
    }

    #[test]
    fn test_distance_to_segment_basics() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(0.0, -10.0);
        // Beside the midpoint
        assert!((distance_to_segment(Vec2::new(3.0, -5.0), a, b) - 3.0).abs() < 1e-5);
        // Beyond the end clamps to the endpoint
        assert!((distance_to_segment(Vec2::new(0.0, -14.0), a, b) - 4.0).abs() < 1e-5);
        // Degenerate segment degrades to point distance
        assert!((distance_to_segment(Vec2::new(4.0, 3.0), a, a) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_near_tee_is_always_fairway() {
        let index = test_index();
        // 2.9 units out sideways would otherwise be fairway anyway, but even
        // with pathological widths the tee override must hold
        let narrow = TerrainZoneIndex::build(
            &CourseConfig::default().generate_hole_path(),
            0.1,
            0.1,
            0.1,
            CourseConfig::default().hole_position(),
            15.0,
        );
        assert!(narrow.classify(Vec3::new(2.0, 0.3, 1.0)).on_fairway);
        assert!(index.classify(Vec3::new(0.0, 0.3, 0.0)).on_fairway);
    }

    #[test]
    fn test_far_guard_is_outer_rough() {
        let index = test_index();
        let lie = index.classify(Vec3::new(600.0, 0.3, 600.0));
        assert!(lie.in_outer_rough);
    }

    #[test]
    fn test_centerline_is_fairway() {
        let index = test_index();
        assert!(index.classify(Vec3::new(0.0, 0.3, -100.0)).on_fairway);
    }

    #[test]
    fn test_band_progression_off_centerline() {
        let index = test_index();
        // fairway half-width 15, rough band (15, 45], outer band (75, 105]
        assert!(index.classify(Vec3::new(10.0, 0.3, -100.0)).on_fairway);
        assert!(index.classify(Vec3::new(20.0, 0.3, -100.0)).in_rough);
        assert!(index.classify(Vec3::new(90.0, 0.3, -100.0)).in_outer_rough);
    }

    #[test]
    fn test_gap_between_bands_uses_distance_fallback() {
        let index = test_index();
        // 50 units off the centerline sits between the rough band (ends at
        // 45) and the outer band (starts at 75); within 2x fairway width it
        // still reads as standard rough
        assert!(index.classify(Vec3::new(50.0, 0.3, -100.0)).in_rough);
        // 70 units is in the same gap but past the fallback distance
        assert!(index.classify(Vec3::new(70.0, 0.3, -100.0)).in_outer_rough);
    }

    #[test]
    fn test_green_beats_hazards() {
        let mut index = test_index();
        let hole = CourseConfig::default().hole_position();
        index.register_hazard(Hazard::Sand(HazardRect {
            center: Vec3::new(hole.x, -0.3, hole.z),
            width: 10.0,
            depth: 10.0,
        }));
        let lie = index.classify(Vec3::new(hole.x + 2.0, 0.0, hole.z));
        assert!(lie.on_green);
    }

    #[test]
    fn test_water_beats_sand() {
        let mut index = test_index();
        let rect = HazardRect {
            center: Vec3::new(0.0, -0.5, -100.0),
            width: 12.0,
            depth: 12.0,
        };
        index.register_hazard(Hazard::Sand(rect));
        index.register_hazard(Hazard::Water(rect));
        let lie = index.classify(Vec3::new(1.0, -0.2, -100.0));
        assert!(lie.in_water);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let index = test_index();
        let p = Vec3::new(33.0, 0.3, -210.0);
        assert_eq!(index.classify(p), index.classify(p));
    }

    proptest! {
        #[test]
        fn prop_exactly_one_lie_flag(
            x in -700.0f32..700.0,
            z in -700.0f32..700.0,
            y in -1.0f32..30.0,
        ) {
            let index = test_index();
            let lie = index.classify(Vec3::new(x, y, z));
            prop_assert!(lie.is_exclusive());
        }
    }
}
