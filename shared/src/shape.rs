//! Solver-facing shape definitions.
//!
//! The server and any client build rapier colliders from the same
//! [`ShapeDef`] values, so collision geometry and renderer geometry cannot
//! drift apart.
//!
//! Conventions
//! - Units are world units (meters).
//! - A shape's pose lives on its rigid body; colliders are created with an
//!   identity local transform.

// Re-export rapier so downstream crates (server/client) can use rapier
// types without needing to depend on `rapier2d` directly.
pub use rapier2d;

use rapier2d::prelude::*;

/// Supported primitive shapes.
///
/// Keep this intentionally small and deterministic. Extend as needed.
#[derive(Clone, Debug)]
pub enum ShapeDef {
    /// Axis-aligned rectangle of the given full extents (meters).
    Rectangle { width: f32, height: f32 },

    /// Circle/ball (meters).
    Circle { radius: f32 },

    /// Convex polygon given as a point cloud (meters, local space).
    ///
    /// The collider is the convex hull of the supplied points. Degenerate
    /// inputs (fewer than three distinct points, collinear points) have no
    /// derivable hull and are rejected at creation.
    Polygon { points: Vec<Point<f32>> },
}

/// Build a rapier collider from a [`ShapeDef`].
///
/// Returns `None` when a polygon's convex hull cannot be derived; the caller
/// is expected to surface this as an invalid-geometry error and create no
/// partial entity.
pub fn collider_from_def(def: &ShapeDef, density: f32) -> Option<Collider> {
    let builder = match def {
        ShapeDef::Rectangle { width, height } => {
            ColliderBuilder::cuboid(width * 0.5, height * 0.5)
        }

        ShapeDef::Circle { radius } => ColliderBuilder::ball(*radius),

        ShapeDef::Polygon { points } => ColliderBuilder::convex_hull(points)?,
    };

    Some(builder.density(density).build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::point;

    #[test]
    fn rectangle_builds_cuboid_with_half_extents() {
        let collider = collider_from_def(
            &ShapeDef::Rectangle {
                width: 4.0,
                height: 2.0,
            },
            1.0,
        )
        .expect("rectangle is always buildable");

        let cuboid = collider.shape().as_cuboid().expect("expected a cuboid");
        assert!((cuboid.half_extents.x - 2.0).abs() < 1.0e-6);
        assert!((cuboid.half_extents.y - 1.0).abs() < 1.0e-6);
    }

    #[test]
    fn circle_builds_ball() {
        let collider = collider_from_def(&ShapeDef::Circle { radius: 3.0 }, 1.0)
            .expect("circle is always buildable");

        let ball = collider.shape().as_ball().expect("expected a ball");
        assert!((ball.radius - 3.0).abs() < 1.0e-6);
    }

    #[test]
    fn polygon_builds_convex_hull() {
        let points = vec![
            point![0.0, 0.0],
            point![2.0, 0.0],
            point![2.0, 2.0],
            point![0.0, 2.0],
        ];
        let collider = collider_from_def(&ShapeDef::Polygon { points }, 1.0)
            .expect("square point cloud has a hull");

        let hull = collider
            .shape()
            .as_convex_polygon()
            .expect("expected a convex polygon");
        assert_eq!(hull.points().len(), 4);
    }

    #[test]
    fn degenerate_polygon_is_rejected() {
        // Collinear points have no 2D hull.
        let collinear = vec![point![0.0, 0.0], point![1.0, 0.0], point![2.0, 0.0]];
        assert!(collider_from_def(&ShapeDef::Polygon { points: collinear }, 1.0).is_none());

        // So does a single repeated point.
        let repeated = vec![point![1.0, 1.0]; 4];
        assert!(collider_from_def(&ShapeDef::Polygon { points: repeated }, 1.0).is_none());
    }
}
