//! Collision detection between the ball and static geometry
//!
//! The ball is the only dynamic body; obstacles are the four edges of the
//! rotating square and the maze wall segments. Every query reports the
//! deepest penetration so the resolver can peel overlaps one at a time.

use glam::Vec2;

use super::state::Boundary;
use crate::rotate_vec;
use crate::tuning::Tuning;

/// Which surface produced a collision.
///
/// A boundary normal is reported in the square's local frame and must be
/// rotated into the global frame before use; wall segments are queried in
/// the global frame, so their normals already are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionSource {
    Boundary,
    Wall,
}

/// Result of a collision check
#[derive(Debug, Clone, Copy)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Overlap distance the resolver must eliminate
    pub penetration: f32,
    /// Surface normal pointing toward the ball center
    pub normal: Vec2,
    /// Surface that was hit
    pub source: CollisionSource,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            penetration: 0.0,
            normal: Vec2::ZERO,
            source: CollisionSource::Wall,
        }
    }
}

/// Check a circle against a single line segment.
///
/// Projects the circle center onto the segment, clamps the projection to
/// the endpoints and measures the gap to the closest point. The safety
/// margin inflates the hit distance so resolved positions keep daylight
/// between ball and wall. A center sitting exactly on the segment yields
/// a zero normal; a zero-length segment is never a hit.
pub fn detect_wall_segment(
    pos: Vec2,
    a: Vec2,
    b: Vec2,
    radius: f32,
    tuning: &Tuning,
) -> CollisionResult {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 0.0001 {
        return CollisionResult::miss(); // Degenerate segment
    }

    let t = ((pos - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    let gap = pos - closest;
    let penetration = radius - gap.length() + tuning.margin(radius);

    if penetration > 0.0 {
        CollisionResult {
            hit: true,
            penetration,
            normal: gap.normalize_or_zero(),
            source: CollisionSource::Wall,
        }
    } else {
        CollisionResult::miss()
    }
}

/// Check a circle against the rotating square's four edges.
///
/// Works in the square's local frame: the query point is inverse-rotated,
/// each edge tested as a segment, and only the deepest-penetrating edge is
/// kept. The returned normal is local; the resolver rotates it back.
pub fn detect_boundary(
    pos: Vec2,
    boundary: &Boundary,
    radius: f32,
    tuning: &Tuning,
) -> CollisionResult {
    let local = rotate_vec(pos - boundary.center, -boundary.rotation);
    let half = boundary.size / 2.0;
    let corners = [
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ];

    let mut nearest = CollisionResult::miss();
    for i in 0..4 {
        let edge = detect_wall_segment(local, corners[i], corners[(i + 1) % 4], radius, tuning);
        if edge.hit && edge.penetration > nearest.penetration {
            nearest = CollisionResult {
                source: CollisionSource::Boundary,
                ..edge
            };
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    #[test]
    fn test_segment_hit_reports_penetration_and_normal() {
        // Circle at origin, radius 10 (margin 2), against the vertical
        // segment x = 5: distance 5, penetration 10 - 5 + 2 = 7.
        let result = detect_wall_segment(
            Vec2::ZERO,
            Vec2::new(5.0, -5.0),
            Vec2::new(5.0, 5.0),
            10.0,
            &tuning(),
        );
        assert!(result.hit);
        assert!((result.penetration - 7.0).abs() < 1e-5);
        assert!((result.normal - Vec2::new(-1.0, 0.0)).length() < 1e-5);
        assert_eq!(result.source, CollisionSource::Wall);
    }

    #[test]
    fn test_segment_miss_when_clear() {
        let result = detect_wall_segment(
            Vec2::new(20.0, 0.0),
            Vec2::new(5.0, -5.0),
            Vec2::new(5.0, 5.0),
            10.0,
            &tuning(),
        );
        assert!(!result.hit);
        assert_eq!(result.penetration, 0.0);
    }

    #[test]
    fn test_segment_projection_clamps_to_endpoints() {
        // Circle past the segment's end: closest point is the endpoint, not
        // the infinite line.
        let result = detect_wall_segment(
            Vec2::new(0.0, 17.0),
            Vec2::new(5.0, -5.0),
            Vec2::new(5.0, 5.0),
            10.0,
            &tuning(),
        );
        // Distance to the endpoint (5, 5) is 13, past radius + margin.
        assert!(!result.hit);

        let close = detect_wall_segment(
            Vec2::new(5.0, 12.0),
            Vec2::new(5.0, -5.0),
            Vec2::new(5.0, 5.0),
            10.0,
            &tuning(),
        );
        assert!(close.hit);
        assert!((close.normal - Vec2::new(0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_center_on_segment_degenerates_to_zero_normal() {
        let result = detect_wall_segment(
            Vec2::new(5.0, 0.0),
            Vec2::new(5.0, -5.0),
            Vec2::new(5.0, 5.0),
            10.0,
            &tuning(),
        );
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::ZERO);
    }

    #[test]
    fn test_zero_length_segment_is_not_a_hit() {
        let result = detect_wall_segment(
            Vec2::ZERO,
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 1.0),
            10.0,
            &tuning(),
        );
        assert!(!result.hit);
        assert_eq!(result.normal, Vec2::ZERO);
    }

    #[test]
    fn test_boundary_reports_deepest_edge_in_local_frame() {
        let boundary = Boundary {
            center: Vec2::ZERO,
            size: 100.0,
            rotation: 0.0,
        };
        // Ball near the right edge (x = 50), 5 units away.
        let result = detect_boundary(Vec2::new(45.0, 0.0), &boundary, 10.0, &tuning());
        assert!(result.hit);
        assert_eq!(result.source, CollisionSource::Boundary);
        // Normal points back toward the interior.
        assert!((result.normal - Vec2::new(-1.0, 0.0)).length() < 1e-5);
        assert!((result.penetration - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_boundary_accounts_for_rotation() {
        // Quarter-turn square: the edge that was at x = +50 now sits at
        // y = +50 in the global frame.
        let boundary = Boundary {
            center: Vec2::ZERO,
            size: 100.0,
            rotation: std::f32::consts::FRAC_PI_2,
        };
        let result = detect_boundary(Vec2::new(0.0, 45.0), &boundary, 10.0, &tuning());
        assert!(result.hit);
        // Local-frame normal; rotating it by the boundary angle must point
        // down toward the interior.
        let global = crate::rotate_vec(result.normal, boundary.rotation);
        assert!((global - Vec2::new(0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_boundary_center_is_clear() {
        let boundary = Boundary {
            center: Vec2::new(300.0, 200.0),
            size: 400.0,
            rotation: 0.7,
        };
        let result = detect_boundary(boundary.center, &boundary, 10.0, &tuning());
        assert!(!result.hit);
    }
}
