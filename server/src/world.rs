//! World facade: the single owner of all simulation state.
//!
//! [`SandboxWorld`] ties the solver adapter, identity allocation, shape state
//! tracking, spring registry, and transient overlays together behind the
//! operations the host and tools are allowed to call. Nothing else may mutate
//! those registries directly; that exclusivity is what keeps the simulation
//! single-threaded-safe and leaves room to shard worlds later without exposing
//! raw solver handles.
//!
//! The world starts uninitialized; every operation before [`SandboxWorld::init`]
//! fails with [`SyncError::NotInitialized`]. That is a caller-ordering
//! violation surfaced immediately, not a runtime condition to recover from.

use nalgebra::{Point2, Vector2};
use shared::{
    DEFAULT_DENSITY, Overlays, OverlayShape, OverlayText, ShapeContent, ShapeDef, ShapeId,
    ROOT_CONTAINER, SPRING_CONTAINER, render_pose,
};

use crate::engine::{PhysicsWorld, ShapeStyle};
use crate::error::SyncError;
use crate::registry::IdAllocator;
use crate::spring::{Spring, SpringSet};
use crate::tracker::ShapeStateTracker;

/// Creation options shared by every shape primitive.
#[derive(Debug, Clone)]
pub struct ShapeOptions {
    /// Container path for identifier allocation; defaults to the root.
    pub container: Option<String>,
    /// Externally supplied identifier (entity restore). Validated against the
    /// live set and reserved against the allocator; colliding ids are
    /// rejected with [`SyncError::DuplicateId`].
    pub id: Option<ShapeId>,
    /// Initial rotation in radians.
    pub rotation: f32,
    /// Dynamic body (simulated) or fixed (static scenery).
    pub dynamic: bool,
    pub density: f32,
    pub style: ShapeStyle,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            container: None,
            id: None,
            rotation: 0.0,
            dynamic: true,
            density: DEFAULT_DENSITY,
            style: ShapeStyle::default(),
        }
    }
}

impl ShapeOptions {
    /// Convenience for static scenery (ground, walls).
    pub fn fixed() -> Self {
        Self {
            dynamic: false,
            ..Self::default()
        }
    }
}

/// The simulation world and every registry hanging off it.
///
/// Fields are crate-visible so the tick producer can split-borrow the spring
/// registry against the solver; external callers go through methods only.
#[derive(Default)]
pub struct SandboxWorld {
    pub(crate) physics: Option<PhysicsWorld>,
    pub(crate) ids: IdAllocator,
    pub(crate) tracker: ShapeStateTracker,
    pub(crate) springs: SpringSet,
    pub(crate) overlays: Overlays,
}

impl SandboxWorld {
    /// An uninitialized world; call [`init`](Self::init) before anything else.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the solver world with the given gravity, resetting every
    /// registry. Identifier counters restart with the new world's lifetime.
    pub fn init(&mut self, gravity: Vector2<f32>) {
        log::info!("initializing physics world, gravity = {gravity:?}");
        self.physics = Some(PhysicsWorld::new(gravity));
        self.ids = IdAllocator::new();
        self.tracker = ShapeStateTracker::new();
        self.springs = SpringSet::new();
        self.overlays = Overlays::default();
    }

    pub fn is_initialized(&self) -> bool {
        self.physics.is_some()
    }

    pub(crate) fn physics(&self) -> Result<&PhysicsWorld, SyncError> {
        self.physics.as_ref().ok_or(SyncError::NotInitialized)
    }

    pub(crate) fn physics_mut(&mut self) -> Result<&mut PhysicsWorld, SyncError> {
        self.physics.as_mut().ok_or(SyncError::NotInitialized)
    }

    // ---------------------------------------------------------------------
    // Shapes
    // ---------------------------------------------------------------------

    pub fn create_rectangle(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        options: ShapeOptions,
    ) -> Result<ShapeId, SyncError> {
        self.create_shape(ShapeDef::Rectangle { width, height }, x, y, options)
    }

    pub fn create_circle(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        options: ShapeOptions,
    ) -> Result<ShapeId, SyncError> {
        self.create_shape(ShapeDef::Circle { radius }, x, y, options)
    }

    /// Create a convex polygon from a point cloud. Fails with
    /// [`SyncError::InvalidGeometry`] when no convex hull is derivable.
    pub fn create_polygon(
        &mut self,
        x: f32,
        y: f32,
        points: Vec<Point2<f32>>,
        options: ShapeOptions,
    ) -> Result<ShapeId, SyncError> {
        self.create_shape(ShapeDef::Polygon { points }, x, y, options)
    }

    fn create_shape(
        &mut self,
        def: ShapeDef,
        x: f32,
        y: f32,
        options: ShapeOptions,
    ) -> Result<ShapeId, SyncError> {
        if self.physics.is_none() {
            return Err(SyncError::NotInitialized);
        }

        let id = match options.id {
            Some(id) => {
                let physics = self.physics.as_ref().expect("checked above");
                if physics.handles(&id).is_some() {
                    return Err(SyncError::DuplicateId(id));
                }
                self.ids.reserve(&id);
                id
            }
            None => {
                let container = options.container.as_deref().unwrap_or(ROOT_CONTAINER);
                self.ids.allocate(container)
            }
        };

        let physics = self.physics.as_mut().expect("checked above");
        physics.insert_shape(
            id.clone(),
            &def,
            Point2::new(x, y),
            options.rotation,
            options.dynamic,
            options.density,
            options.style,
        )?;

        // Register renderer content and mark it changed for the next delta.
        match physics.content_of(&id) {
            Ok(content) => self.tracker.record_changed(content),
            Err(err) => log::warn!("shape {id} has no renderable content: {err}"),
        }

        Ok(id)
    }

    /// Destroy a shape's body and collider and forget its renderer state.
    /// Returns `false` when no live shape has this identifier; the identifier
    /// is never reissued either way.
    pub fn remove_shape(&mut self, id: &str) -> Result<bool, SyncError> {
        let physics = self.physics_mut()?;
        let removed = physics.remove_shape(id);
        if removed {
            self.tracker.remove(id);
        }
        Ok(removed)
    }

    /// Replace a shape's visual style and re-publish its content into the
    /// next delta.
    pub fn set_shape_style(&mut self, id: &str, style: ShapeStyle) -> Result<(), SyncError> {
        let physics = self.physics_mut()?;
        let handles = physics
            .handles(id)
            .ok_or_else(|| SyncError::UnknownShape(id.to_string()))?;

        physics
            .meta_mut(handles.body)
            .ok_or_else(|| SyncError::UnknownShape(id.to_string()))?
            .style = style;

        let content = physics.content_of(id)?;
        self.tracker.record_changed(content);
        Ok(())
    }

    /// Current renderer content of a live shape.
    pub fn shape_content(&self, id: &str) -> Option<&ShapeContent> {
        self.tracker.content(id)
    }

    /// Pick the shape under a world-space point, if any.
    pub fn query_point_at(&self, x: f32, y: f32) -> Result<Option<ShapeId>, SyncError> {
        Ok(self.physics()?.query_point_at(x, y).cloned())
    }

    // ---------------------------------------------------------------------
    // Springs
    // ---------------------------------------------------------------------

    /// Build a spring endpoint attached to a live shape's body at a
    /// body-local point.
    pub fn body_anchor(
        &self,
        id: &str,
        local_anchor: Point2<f32>,
    ) -> Result<crate::spring::BodyAnchor, SyncError> {
        let handles = self
            .physics()?
            .handles(id)
            .ok_or_else(|| SyncError::UnknownShape(id.to_string()))?;
        Ok(crate::spring::BodyAnchor {
            body: handles.body,
            local_anchor,
        })
    }

    /// Register a spring and return its identifier (the handle). Reads and
    /// mutations resolve through [`spring_mut`](Self::spring_mut); after
    /// [`remove_spring`](Self::remove_spring) the identifier goes inert.
    pub fn create_spring(&mut self, spring: Spring) -> Result<ShapeId, SyncError> {
        if self.physics.is_none() {
            return Err(SyncError::NotInitialized);
        }
        let id = self.ids.allocate(SPRING_CONTAINER);
        self.springs.insert(id.clone(), spring);
        Ok(id)
    }

    pub fn spring(&self, id: &str) -> Option<&Spring> {
        self.springs.get(id)
    }

    pub fn spring_mut(&mut self, id: &str) -> Option<&mut Spring> {
        self.springs.get_mut(id)
    }

    pub fn remove_spring(&mut self, id: &str) -> bool {
        self.springs.remove(id)
    }

    // ---------------------------------------------------------------------
    // Overlays
    // ---------------------------------------------------------------------

    /// Add a render-only shape for the current tick, posed in world space.
    pub fn add_overlay_shape(&mut self, content: ShapeContent, x: f32, y: f32, angle: f32) {
        self.overlays.shapes.push(OverlayShape {
            content,
            transform: render_pose(x, y, angle),
        });
    }

    /// Add a render-only text label for the current tick, at a world-space
    /// position.
    pub fn add_overlay_text(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        color: impl Into<String>,
    ) {
        let [rx, ry] = shared::render_point(x, y);
        self.overlays.texts.push(OverlayText {
            text: text.into(),
            x: rx,
            y: ry,
            color: color.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn initialized() -> SandboxWorld {
        let mut world = SandboxWorld::new();
        world.init(vector![0.0, 0.0]);
        world
    }

    #[test]
    fn operations_before_init_fail_with_not_initialized() {
        let mut world = SandboxWorld::new();

        let create = world.create_circle(0.0, 0.0, 1.0, ShapeOptions::default());
        assert_eq!(create.unwrap_err(), SyncError::NotInitialized);

        assert_eq!(
            world.remove_shape("/0").unwrap_err(),
            SyncError::NotInitialized
        );
        assert_eq!(
            world.query_point_at(0.0, 0.0).unwrap_err(),
            SyncError::NotInitialized
        );
    }

    #[test]
    fn creation_allocates_sequential_root_identifiers() {
        let mut world = initialized();
        let a = world
            .create_circle(0.0, 0.0, 1.0, ShapeOptions::default())
            .unwrap();
        let b = world
            .create_rectangle(5.0, 0.0, 1.0, 1.0, ShapeOptions::default())
            .unwrap();

        assert_eq!(a, "/0");
        assert_eq!(b, "/1");
        assert!(world.shape_content(&a).is_some());
    }

    #[test]
    fn external_ids_are_validated_and_reserved() {
        let mut world = initialized();
        let restored = world
            .create_circle(
                0.0,
                0.0,
                1.0,
                ShapeOptions {
                    id: Some("/5".to_string()),
                    ..ShapeOptions::default()
                },
            )
            .unwrap();
        assert_eq!(restored, "/5");

        // The same external id cannot be registered twice.
        let duplicate = world.create_circle(
            1.0,
            1.0,
            1.0,
            ShapeOptions {
                id: Some("/5".to_string()),
                ..ShapeOptions::default()
            },
        );
        assert_eq!(
            duplicate.unwrap_err(),
            SyncError::DuplicateId("/5".to_string())
        );

        // The allocator was reserved past the restored suffix.
        let next = world
            .create_circle(2.0, 2.0, 1.0, ShapeOptions::default())
            .unwrap();
        assert_eq!(next, "/6");
    }

    #[test]
    fn restyle_republishes_content() {
        let mut world = initialized();
        let id = world
            .create_circle(0.0, 0.0, 1.0, ShapeOptions::default())
            .unwrap();
        world.tracker.drain_changed();

        let style = ShapeStyle {
            color: "#ff0000".to_string(),
            ..ShapeStyle::default()
        };
        world.set_shape_style(&id, style).unwrap();

        let drained = world.tracker.drain_changed();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[&id].color, "#ff0000");
    }

    #[test]
    fn restyling_a_stale_id_fails() {
        let mut world = initialized();
        let err = world
            .set_shape_style("/404", ShapeStyle::default())
            .unwrap_err();
        assert_eq!(err, SyncError::UnknownShape("/404".to_string()));
    }

    #[test]
    fn removed_spring_ids_go_inert() {
        use crate::spring::PinAnchor;
        use nalgebra::point;

        let mut world = initialized();
        let id = world
            .create_spring(Spring {
                stiffness: 50.0,
                damping: 5.0,
                target_length: 2.0,
                anchor_a: Box::new(PinAnchor {
                    position: point![0.0, 0.0],
                }),
                anchor_b: Box::new(PinAnchor {
                    position: point![4.0, 0.0],
                }),
            })
            .unwrap();
        assert_eq!(id, "/springs/0");
        assert!(world.spring(&id).is_some());

        assert!(world.remove_spring(&id));
        assert!(world.spring(&id).is_none());
        assert!(world.spring_mut(&id).is_none());

        // A later spring gets a fresh identifier, never the removed one.
        let next = world
            .create_spring(Spring {
                stiffness: 1.0,
                damping: 0.0,
                target_length: 1.0,
                anchor_a: Box::new(PinAnchor {
                    position: point![0.0, 0.0],
                }),
                anchor_b: Box::new(PinAnchor {
                    position: point![1.0, 0.0],
                }),
            })
            .unwrap();
        assert_eq!(next, "/springs/1");
    }
}
