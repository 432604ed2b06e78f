//! World ↔ render coordinate projection.
//!
//! The solver uses a Y-up right-handed convention with counter-clockwise
//! positive rotation; the renderer draws with the vertical axis inverted and
//! clockwise-positive rotation. All outbound poses and points go through
//! these helpers so the convention lives in exactly one place.

use crate::update::ShapeTransform;

/// Project a solver-space pose into the renderer's convention:
/// vertical axis inverted, rotation negated to match.
#[inline]
pub fn render_pose(x: f32, y: f32, angle: f32) -> ShapeTransform {
    ShapeTransform { x, y: -y, angle: -angle }
}

/// Project a solver-space point into the renderer's convention.
#[inline]
pub fn render_point(x: f32, y: f32) -> [f32; 2] {
    [x, -y]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_pose_inverts_vertical_axis_and_rotation() {
        let pose = render_pose(3.0, -257.0, 0.75);
        assert!((pose.x - 3.0).abs() < 1.0e-6);
        assert!((pose.y - 257.0).abs() < 1.0e-6);
        assert!((pose.angle + 0.75).abs() < 1.0e-6);
    }

    #[test]
    fn render_point_matches_pose_projection() {
        let [x, y] = render_point(5.0, 2.5);
        let pose = render_pose(5.0, 2.5, 0.0);
        assert_eq!(x, pose.x);
        assert_eq!(y, pose.y);
    }

    #[test]
    fn projection_is_an_involution() {
        // Applying the axis flip twice restores the solver-space values.
        let pose = render_pose(1.0, 2.0, 3.0);
        let back = render_pose(pose.x, pose.y, pose.angle);
        assert_eq!((back.x, back.y, back.angle), (1.0, 2.0, 3.0));
    }
}
