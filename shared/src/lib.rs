pub mod constants;
pub mod convert;
pub mod shape;
pub mod update;

pub use constants::{
    DEFAULT_DENSITY, DEFAULT_FILL_COLOR, DEFAULT_GRAVITY_Y, DIST_EPS, ROOT_CONTAINER,
    SPRING_CONTAINER, TICK_HZ,
};
pub use convert::{render_point, render_pose};
pub use shape::{ShapeDef, collider_from_def, rapier2d};
pub use update::{
    Overlays, OverlayShape, OverlayText, ShapeContent, ShapeGeometry, ShapeId, ShapeTransform,
    SpringSegment, WorldDelta, WorldUpdate,
};
