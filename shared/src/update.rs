//! Renderer-facing message schema.
//!
//! One [`WorldUpdate`] is produced per simulation tick and carries everything
//! a remote renderer needs to stay visually consistent:
//!
//! - `delta.shape_content`: visual/material identity for shapes that changed
//!   since the previous tick only (creation, explicit restyle).
//! - `delta.shape_transforms`: the pose of every live shape, recomputed in
//!   full each tick. Poses are never diffed: sleep/wake transitions are common
//!   and a missed wake-up would desynchronize a renderer silently.
//! - `springs`: world-space line segments for spring rendering.
//! - `overlays`: render-only shapes/text added by tools for this tick only.
//!
//! Invariant
//! - Content for an id is emitted in the same or an earlier tick than the
//!   first transform referencing it; a renderer may therefore treat an unknown
//!   transform id as a protocol error.
//!
//! These are data/serialization types only; math and bookkeeping live in the
//! server crate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque hierarchical identifier (`"/3/12"` style): a container path plus a
/// locally-unique numeric suffix.
pub type ShapeId = String;

/// Type-specific geometry of a shape, as the renderer draws it.
///
/// A tagged union: each kind carries only its own fields, so invalid
/// combinations are unrepresentable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeGeometry {
    Rectangle { width: f32, height: f32 },
    Circle { radius: f32 },
    Polygon { points: Vec<[f32; 2]> },
}

/// Rarely-changing visual/material identity of one shape.
///
/// Emitted only when it changes; the renderer caches it by `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeContent {
    pub id: ShapeId,
    #[serde(flatten)]
    pub geometry: ShapeGeometry,
    /// Fill color, as an opaque CSS-style color string.
    pub color: String,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Border color; `None` draws no border.
    pub border: Option<String>,
    pub border_width: f32,
}

/// Per-tick pose of one shape, in the renderer's coordinate convention
/// (vertical axis inverted relative to the solver, rotation negated).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeTransform {
    pub x: f32,
    pub y: f32,
    /// Rotation in radians.
    pub angle: f32,
}

/// The changed-since-last-tick portion of the world state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldDelta {
    /// Content for shapes whose visual identity changed this tick.
    pub shape_content: HashMap<ShapeId, ShapeContent>,
    /// Pose of every live shape. Always complete, never diffed.
    pub shape_transforms: HashMap<ShapeId, ShapeTransform>,
}

/// A spring drawn as a line segment between its endpoint attachment points,
/// in renderer coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringSegment {
    pub point_a: [f32; 2],
    pub point_b: [f32; 2],
}

/// A render-only shape added by a tool for the current tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayShape {
    pub content: ShapeContent,
    pub transform: ShapeTransform,
}

/// A render-only text label added by a tool for the current tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayText {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub color: String,
}

/// Transient, non-physical graphics for the current tick only. Tools that want
/// a persistent overlay must re-add it every tick it is relevant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlays {
    pub shapes: Vec<OverlayShape>,
    pub texts: Vec<OverlayText>,
}

/// The outbound state message for one simulation tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldUpdate {
    pub delta: WorldDelta,
    /// Wall-clock duration of the tick in milliseconds, for diagnostics.
    pub ms: f32,
    pub springs: Vec<SpringSegment>,
    pub overlays: Overlays,
}
