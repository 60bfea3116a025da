//! Course data consumed by the simulation
//!
//! The course collaborator owns terrain generation and decoration; the
//! simulation only needs three things from it: a height function, the hole
//! centerline path, and the hazard/obstacle lists. Everything here is built
//! once per hole and read-only during play.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::{from_horizontal, horizontal};

/// Terrain elevation lookup. Pure, O(1) expected.
pub trait HeightField {
    fn height_at(&self, x: f32, z: f32) -> f32;
}

/// Perfectly flat ground at a fixed elevation
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGround(pub f32);

impl HeightField for FlatGround {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.0
    }
}

/// Grid heightmap sampled at fixed cell spacing, origin-centered on X
///
/// Out-of-range lookups return zero so a stray ball never reads garbage
/// elevation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightmapField {
    cells: Vec<f32>,
    size: usize,
    cell_size: f32,
}

impl HeightmapField {
    pub fn new(cells: Vec<f32>, size: usize, cell_size: f32) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Self {
            cells,
            size,
            cell_size,
        }
    }

    /// Uniform-height map, mostly useful for tests and previews
    pub fn flat(size: usize, cell_size: f32, height: f32) -> Self {
        Self::new(vec![height; size * size], size, cell_size)
    }
}

impl HeightField for HeightmapField {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        let i = (x / self.cell_size + self.size as f32 / 2.0).floor() as i64;
        let j = ((z + self.cell_size) / self.cell_size).floor() as i64;
        if i >= 0 && (i as usize) < self.size && j >= 0 && (j as usize) < self.size {
            self.cells[i as usize * self.size + j as usize]
        } else {
            0.0
        }
    }
}

/// Course layout parameters for a single hole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConfig {
    /// Fairway band width (full width, centered on the path)
    pub fairway_width: f32,
    /// Tee-to-hole length along the path
    pub fairway_length: f32,
    /// Standard rough band width
    pub rough_width: f32,
    /// Outer rough band width
    pub outer_rough_width: f32,
    /// Green radius around the hole
    pub green_radius: f32,
    /// Distance from the tee at which the path bends
    pub dogleg_position: f32,
    /// Bend angle (radians)
    pub dogleg_angle: f32,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            fairway_width: 30.0,
            fairway_length: 450.0,
            rough_width: 60.0,
            outer_rough_width: 30.0,
            green_radius: 15.0,
            dogleg_position: 250.0,
            dogleg_angle: std::f32::consts::PI / 6.0,
        }
    }
}

impl CourseConfig {
    /// Final hole position implied by the layout
    pub fn hole_position(&self) -> Vec3 {
        let remaining = self.fairway_length - self.dogleg_position;
        let x = self.dogleg_angle.sin() * remaining;
        let z = -self.dogleg_position - self.dogleg_angle.cos() * remaining;
        Vec3::new(x, 0.0, z)
    }

    /// Centerline path from the tee (origin) to the hole, 10-unit steps
    pub fn generate_hole_path(&self) -> HolePath {
        let mut points = Vec::new();

        // Straight leg from tee to the dogleg
        let mut d = 0.0;
        while d <= self.dogleg_position {
            points.push(Vec3::new(0.0, 0.0, -d));
            d += 10.0;
        }

        // Bent leg from the dogleg to the hole
        let remaining = self.fairway_length - self.dogleg_position;
        let mut i = 10.0;
        while i <= remaining {
            let x = self.dogleg_angle.sin() * i;
            let z = -self.dogleg_position - self.dogleg_angle.cos() * i;
            points.push(Vec3::new(x, 0.0, z));
            i += 10.0;
        }

        HolePath::new(points)
    }

    /// Whether a position sits on the green
    pub fn is_on_green(&self, position: Vec3) -> bool {
        horizontal(position).distance(horizontal(self.hole_position())) < self.green_radius
    }
}

/// Ordered centerline of the hole, created once at course-generation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolePath {
    points: Vec<Vec3>,
}

impl HolePath {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Consecutive point pairs forming the path edges
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }
}

/// Axis-aligned hazard footprint with a vertical activation band
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HazardRect {
    /// Center of the footprint; `y` is the hazard surface height
    pub center: Vec3,
    pub width: f32,
    pub depth: f32,
}

impl HazardRect {
    /// Whether a position is inside the XZ footprint
    pub fn contains_xz(&self, position: Vec3) -> bool {
        position.x > self.center.x - self.width / 2.0
            && position.x < self.center.x + self.width / 2.0
            && position.z > self.center.z - self.depth / 2.0
            && position.z < self.center.z + self.depth / 2.0
    }

    /// Nearest safe drop point outside the hazard, along the center-to-ball
    /// direction, with a margin beyond the footprint's half-extent
    pub fn escape_point(&self, ball_position: Vec3) -> Vec3 {
        let mut dir = horizontal(ball_position) - horizontal(self.center);
        if dir.length_squared() < 1e-6 {
            // Ball dead-centered in the hazard; bail out toward the tee
            dir = Vec2::new(0.0, 1.0);
        }
        let dir = dir.normalize();
        let distance = self.width.max(self.depth) / 2.0 + 5.0;
        from_horizontal(horizontal(self.center) + dir * distance, self.center.y)
    }
}

/// A course hazard, registered once at build time
///
/// Tagged variants instead of per-instance collision closures: geometry data
/// plus one dispatching predicate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Hazard {
    Water(HazardRect),
    Sand(HazardRect),
}

impl Hazard {
    pub fn rect(&self) -> &HazardRect {
        match self {
            Hazard::Water(rect) | Hazard::Sand(rect) => rect,
        }
    }

    pub fn is_water(&self) -> bool {
        matches!(self, Hazard::Water(_))
    }

    /// Collision test for a ball position
    ///
    /// Water triggers for anything at or below its surface band; sand only
    /// within a band around its surface so flight overhead doesn't count.
    pub fn collides_with(&self, position: Vec3) -> bool {
        match self {
            Hazard::Water(rect) => {
                rect.contains_xz(position) && position.y <= rect.center.y + 0.8
            }
            Hazard::Sand(rect) => {
                rect.contains_xz(position) && (position.y - rect.center.y).abs() < 0.8
            }
        }
    }
}

/// A tree trunk the ball can carom off
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeObstacle {
    /// Trunk position in the XZ plane
    pub position: Vec2,
    /// Trunk collision radius
    pub radius: f32,
}

impl TreeObstacle {
    pub fn new(x: f32, z: f32) -> Self {
        Self {
            position: Vec2::new(x, z),
            radius: 0.7,
        }
    }
}

/// Everything the simulation needs to know about the current hole
///
/// Assembled by the course collaborator and handed to the session by value;
/// the simulation never reaches into ambient globals for course data.
pub struct Course {
    pub config: CourseConfig,
    pub path: HolePath,
    height: Box<dyn HeightField>,
    hazards: Vec<Hazard>,
    trees: Vec<TreeObstacle>,
}

impl Course {
    pub fn new(config: CourseConfig, height: Box<dyn HeightField>) -> Self {
        let path = config.generate_hole_path();
        Self {
            config,
            path,
            height,
            hazards: Vec::new(),
            trees: Vec::new(),
        }
    }

    /// Replace the generated centerline with an externally supplied one
    pub fn with_path(mut self, path: HolePath) -> Self {
        self.path = path;
        self
    }

    pub fn add_hazard(&mut self, hazard: Hazard) {
        self.hazards.push(hazard);
    }

    pub fn add_tree(&mut self, tree: TreeObstacle) {
        self.trees.push(tree);
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn trees(&self) -> &[TreeObstacle] {
        &self.trees
    }

    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.height.height_at(x, z)
    }

    pub fn hole_position(&self) -> Vec3 {
        self.config.hole_position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hole_path_runs_tee_to_hole() {
        let config = CourseConfig::default();
        let path = config.generate_hole_path();
        let points = path.points();
        assert!(points.len() > 2);
        assert_eq!(points[0], Vec3::ZERO);

        let hole = config.hole_position();
        let last = *points.last().unwrap();
        assert!(last.distance(hole) < 15.0);
    }

    #[test]
    fn test_heightmap_out_of_bounds_is_zero() {
        let field = HeightmapField::flat(4, 10.0, 2.5);
        assert_eq!(field.height_at(0.0, -5.0), 2.5);
        assert_eq!(field.height_at(1e6, 0.0), 0.0);
        assert_eq!(field.height_at(0.0, 1e6), 0.0);
    }

    #[test]
    fn test_water_collision_band() {
        let hazard = Hazard::Water(HazardRect {
            center: Vec3::new(0.0, -0.5, -50.0),
            width: 20.0,
            depth: 10.0,
        });
        // In footprint, at water level
        assert!(hazard.collides_with(Vec3::new(2.0, 0.0, -50.0)));
        // Flying well above the surface
        assert!(!hazard.collides_with(Vec3::new(2.0, 5.0, -50.0)));
        // Outside the footprint
        assert!(!hazard.collides_with(Vec3::new(30.0, 0.0, -50.0)));
    }

    #[test]
    fn test_sand_only_near_surface() {
        let hazard = Hazard::Sand(HazardRect {
            center: Vec3::new(10.0, -0.3, -30.0),
            width: 8.0,
            depth: 8.0,
        });
        assert!(hazard.collides_with(Vec3::new(10.0, 0.0, -30.0)));
        // Ball flying over the bunker is not in it
        assert!(!hazard.collides_with(Vec3::new(10.0, 3.0, -30.0)));
    }

    #[test]
    fn test_escape_point_clears_hazard() {
        let rect = HazardRect {
            center: Vec3::new(0.0, -0.5, -50.0),
            width: 20.0,
            depth: 10.0,
        };
        let drop = rect.escape_point(Vec3::new(3.0, 0.0, -48.0));
        assert!(!rect.contains_xz(drop));
        let dist = horizontal(drop).distance(horizontal(rect.center));
        assert!(dist >= rect.width.max(rect.depth) / 2.0 + 5.0 - 1e-3);
    }

    #[test]
    fn test_escape_point_degenerate_center() {
        let rect = HazardRect {
            center: Vec3::new(0.0, -0.5, -50.0),
            width: 10.0,
            depth: 10.0,
        };
        let drop = rect.escape_point(rect.center);
        assert!(!rect.contains_xz(drop));
    }
}
