//! Shape state tracking: content diffs and per-tick transforms.
//!
//! The tracker owns the renderer-facing view of every live shape, split per
//! the sync protocol:
//!
//! - **Content** (visual/material identity) changes rarely and is delivered as
//!   a delta: [`ShapeStateTracker::record_changed`] marks an entry pending,
//!   [`ShapeStateTracker::drain_changed`] hands the pending set to exactly one
//!   tick and clears it.
//! - **Transforms** (pose) are recomputed for every live collider every tick
//!   and never diffed. Sleep/wake transitions are common, and a missed wake-up
//!   would desynchronize a renderer silently; full recomputation is
//!   O(live collider count) and buys that correctness outright.

use shared::{ShapeContent, ShapeId, ShapeTransform, render_pose};
use std::collections::{BTreeSet, HashMap};

use crate::engine::PhysicsWorld;

/// Tracks content records and pending changes for all live shapes.
#[derive(Debug, Default)]
pub struct ShapeStateTracker {
    /// Current content per shape, kept for the lifetime of the shape.
    content: HashMap<ShapeId, ShapeContent>,
    /// Ids whose content changed since the last drain.
    pending: BTreeSet<ShapeId>,
}

impl ShapeStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite a shape's content and mark it for the next delta.
    pub fn record_changed(&mut self, content: ShapeContent) {
        self.pending.insert(content.id.clone());
        self.content.insert(content.id.clone(), content);
    }

    /// Forget a destroyed shape entirely, including any pending change.
    pub fn remove(&mut self, id: &str) {
        self.content.remove(id);
        self.pending.remove(id);
    }

    /// Current content of a live shape, if tracked.
    pub fn content(&self, id: &str) -> Option<&ShapeContent> {
        self.content.get(id)
    }

    /// Return the pending content set and clear it.
    ///
    /// At-most-once delivery: each recorded change is emitted by exactly one
    /// drain. Draining twice in a row yields a full map and then an empty one.
    pub fn drain_changed(&mut self) -> HashMap<ShapeId, ShapeContent> {
        let pending = std::mem::take(&mut self.pending);
        pending
            .into_iter()
            .filter_map(|id| self.content.get(&id).map(|c| (id, c.clone())))
            .collect()
    }

    /// Compute the render-space pose of every live shape.
    ///
    /// Reads body translation/rotation from the adapter and projects into the
    /// renderer's convention (vertical axis inverted, rotation negated).
    pub fn compute_transforms(&self, physics: &PhysicsWorld) -> HashMap<ShapeId, ShapeTransform> {
        physics
            .iter_shapes()
            .filter_map(|(id, handles)| {
                let body = physics.body(handles.body)?;
                let translation = body.translation();
                Some((
                    id.clone(),
                    render_pose(translation.x, translation.y, body.rotation().angle()),
                ))
            })
            .collect()
    }
}
