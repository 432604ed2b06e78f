//! Error taxonomy for the synchronization engine.
//!
//! Construction-time errors are raised to the immediate caller; per-tick
//! defensive cases ([`SyncError::UnknownShapeType`] in particular) are
//! absorbed by the tick path (logged, entity skipped) so one bad entity cannot
//! stall the cadence for everyone else.

use rapier2d::parry::shape::ShapeType;
use shared::ShapeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// Operation attempted before the world was initialized. This is a
    /// caller-ordering violation, not a runtime condition to recover from.
    #[error("physics world is not initialized")]
    NotInitialized,

    /// Polygon input with no derivable convex hull. Rejected at creation; no
    /// partial entity is created.
    #[error("degenerate polygon geometry: no convex hull derivable")]
    InvalidGeometry,

    /// A solver shape kind this engine does not render or serialize.
    #[error("collider shape {0:?} has no renderer mapping")]
    UnknownShapeType(ShapeType),

    /// An externally supplied identifier collides with a live entity.
    #[error("identifier {0:?} is already registered")]
    DuplicateId(ShapeId),

    /// The referenced shape id has no live entity.
    #[error("no live shape with identifier {0:?}")]
    UnknownShape(ShapeId),
}
