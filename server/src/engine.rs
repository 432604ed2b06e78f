//! Physics engine adapter.
//!
//! Thin ownership wrapper around the rapier solver: rigid-body/collider sets,
//! the stepping pipeline, and scene queries. Everything the rest of the engine
//! knows about a body goes through this module:
//!
//! - `by_id` maps the hierarchical shape identifier to solver handles.
//! - `meta` is an explicit side-table of per-body attributes (identifier plus
//!   visual style), instead of stashing opaque data on solver objects.
//!
//! Design notes
//! - The solver is consumed as a black box: one fixed [`PhysicsWorld::step`]
//!   per tick, builders for primitive shapes, and point projection for tools.
//! - All mutation goes through the methods here; no raw set access leaves the
//!   simulation thread's ownership.

use nalgebra::{vector, Point2, Vector2};
use rapier2d::prelude::*;
use shared::{ShapeContent, ShapeDef, ShapeGeometry, ShapeId, TICK_HZ, collider_from_def, render_point};
use std::collections::{BTreeMap, HashMap};

use crate::error::SyncError;

/// Visual/material attributes carried per body in the adapter's side-table.
///
/// The first four fields surface to renderers through [`ShapeContent`]; the
/// rest are host-level attributes (draw ordering, audio, labels) that ride the
/// side-table without entering the per-tick delta.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeStyle {
    pub color: String,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    pub border: Option<String>,
    pub border_width: f32,
    /// Renderer draw-ordering hint.
    pub z_depth: i32,
    pub name: Option<String>,
    /// Collision sound asset path, if any.
    pub sound: Option<String>,
    /// Texture asset path, if any.
    pub image: Option<String>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: shared::DEFAULT_FILL_COLOR.to_string(),
            alpha: 1.0,
            border: None,
            border_width: 0.0,
            z_depth: 0,
            name: None,
            sound: None,
            image: None,
        }
    }
}

/// Side-table entry for one body.
#[derive(Clone, Debug)]
pub struct BodyMeta {
    pub id: ShapeId,
    pub style: ShapeStyle,
}

/// Solver handles backing one live shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityHandles {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// Owns the solver world and the identity/metadata bookkeeping around it.
pub struct PhysicsWorld {
    gravity: Vector2<f32>,
    integration: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Per-body metadata side-table (identifier + visual style).
    meta: HashMap<RigidBodyHandle, BodyMeta>,
    /// Identifier → solver handles. BTreeMap keeps iteration order
    /// deterministic for reproducible update payload construction.
    by_id: BTreeMap<ShapeId, EntityHandles>,
}

impl PhysicsWorld {
    pub fn new(gravity: Vector2<f32>) -> Self {
        let mut integration = IntegrationParameters::default();
        integration.dt = 1.0 / TICK_HZ;

        Self {
            gravity,
            integration,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            meta: HashMap::new(),
            by_id: BTreeMap::new(),
        }
    }

    /// Fixed timestep of one solver step (seconds).
    pub fn dt(&self) -> f32 {
        self.integration.dt
    }

    /// Create a body + collider pair for `def` under the given identifier.
    ///
    /// Fails with [`SyncError::InvalidGeometry`] when a polygon has no
    /// derivable convex hull; nothing is inserted in that case.
    pub fn insert_shape(
        &mut self,
        id: ShapeId,
        def: &ShapeDef,
        position: Point2<f32>,
        rotation: f32,
        dynamic: bool,
        density: f32,
        style: ShapeStyle,
    ) -> Result<EntityHandles, SyncError> {
        // Validate geometry before touching any set so a rejected create
        // leaves no partial entity behind.
        let collider = collider_from_def(def, density).ok_or(SyncError::InvalidGeometry)?;

        let builder = if dynamic {
            RigidBodyBuilder::dynamic()
        } else {
            RigidBodyBuilder::fixed()
        };
        let body = builder
            .translation(vector![position.x, position.y])
            .rotation(rotation)
            .build();

        let body_handle = self.bodies.insert(body);
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        let handles = EntityHandles {
            body: body_handle,
            collider: collider_handle,
        };
        self.meta.insert(body_handle, BodyMeta { id: id.clone(), style });
        self.by_id.insert(id, handles);
        Ok(handles)
    }

    /// Remove a shape's body, attached collider, and bookkeeping entries.
    ///
    /// Returns `false` when no live shape has this identifier.
    pub fn remove_shape(&mut self, id: &str) -> bool {
        let Some(handles) = self.by_id.remove(id) else {
            return false;
        };

        self.meta.remove(&handles.body);
        self.bodies.remove(
            handles.body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        true
    }

    /// Advance the solver by exactly one fixed step.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Project a world-space point onto the closest collider.
    ///
    /// Returns the collider handle and whether the point lies inside it.
    pub fn project_point(&self, point: Point2<f32>, solid: bool) -> Option<(ColliderHandle, bool)> {
        let query_pipeline = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            QueryFilter::default(),
        );
        query_pipeline
            .project_point(&point, Real::MAX, solid)
            .map(|(handle, projection)| (handle, projection.is_inside))
    }

    /// Pick the shape under a world-space point, if any.
    pub fn query_point_at(&self, x: f32, y: f32) -> Option<&ShapeId> {
        let (collider, is_inside) = self.project_point(Point2::new(x, y), true)?;
        if !is_inside {
            return None;
        }
        self.id_of_collider(collider)
    }

    /// Identifier of the shape backing `collider`, if it is one of ours.
    pub fn id_of_collider(&self, collider: ColliderHandle) -> Option<&ShapeId> {
        let parent = self.colliders.get(collider)?.parent()?;
        self.meta.get(&parent).map(|meta| &meta.id)
    }

    pub fn handles(&self, id: &str) -> Option<EntityHandles> {
        self.by_id.get(id).copied()
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Apply a world-space impulse at a world-space point, waking the body.
    pub fn apply_impulse_at_point(
        &mut self,
        handle: RigidBodyHandle,
        impulse: Vector2<f32>,
        at: Point2<f32>,
    ) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.apply_impulse_at_point(impulse, at, true);
        }
    }

    /// Iterate live shapes in deterministic (identifier) order.
    pub fn iter_shapes(&self) -> impl Iterator<Item = (&ShapeId, EntityHandles)> {
        self.by_id.iter().map(|(id, handles)| (id, *handles))
    }

    pub fn meta(&self, handle: RigidBodyHandle) -> Option<&BodyMeta> {
        self.meta.get(&handle)
    }

    pub fn meta_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut BodyMeta> {
        self.meta.get_mut(&handle)
    }

    /// Derive renderer-facing content for a live shape from its collider
    /// geometry and side-table style.
    ///
    /// A solver shape kind without a renderer mapping yields
    /// [`SyncError::UnknownShapeType`]; tick paths log and skip it rather than
    /// desynchronizing the rest of the world.
    pub fn content_of(&self, id: &str) -> Result<ShapeContent, SyncError> {
        let handles = self
            .handles(id)
            .ok_or_else(|| SyncError::UnknownShape(id.to_string()))?;
        let meta = self
            .meta
            .get(&handles.body)
            .ok_or_else(|| SyncError::UnknownShape(id.to_string()))?;
        let collider = self
            .colliders
            .get(handles.collider)
            .ok_or_else(|| SyncError::UnknownShape(id.to_string()))?;

        let shape = collider.shape();
        let geometry = if let Some(cuboid) = shape.as_cuboid() {
            ShapeGeometry::Rectangle {
                width: cuboid.half_extents.x * 2.0,
                height: cuboid.half_extents.y * 2.0,
            }
        } else if let Some(ball) = shape.as_ball() {
            ShapeGeometry::Circle { radius: ball.radius }
        } else if let Some(polygon) = shape.as_convex_polygon() {
            ShapeGeometry::Polygon {
                // Local-space hull points, projected into the renderer's
                // vertical convention like every outbound coordinate.
                points: polygon
                    .points()
                    .iter()
                    .map(|p| render_point(p.x, p.y))
                    .collect(),
            }
        } else {
            return Err(SyncError::UnknownShapeType(shape.shape_type()));
        };

        Ok(ShapeContent {
            id: meta.id.clone(),
            geometry,
            color: meta.style.color.clone(),
            alpha: meta.style.alpha,
            border: meta.style.border.clone(),
            border_width: meta.style.border_width,
        })
    }
}
