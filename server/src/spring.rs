//! Damped spring constraints.
//!
//! The underlying solver has no spring joint, so springs live outside it: a
//! registry of virtual constraints whose impulses are computed explicitly and
//! applied to the endpoint bodies immediately before the solver step, so they
//! integrate within the same tick as every other force.
//!
//! # Model
//! Endpoints are capability objects ([`SpringAnchor`]): "where is the
//! attachment point, how fast is it moving, apply an impulse there". That lets
//! a spring attach to a rigid body ([`BodyAnchor`]), to a kinematic point such
//! as a player's pointer ([`PinAnchor`]), or to any future anchor kind without
//! the registry knowing the difference.
//!
//! # Ownership
//! [`SpringSet`] exclusively owns the live springs, keyed by id. A handle is
//! just the id: every read or mutation resolves through the registry, and once
//! an entry is removed all outstanding handles go inert (lookups return
//! `None`) instead of serving stale data.

use nalgebra::{Point2, Vector2};
use rapier2d::prelude::RigidBodyHandle;
use shared::{DIST_EPS, SpringSegment, render_point};
use std::collections::BTreeMap;

use crate::engine::PhysicsWorld;

/// World-space kinematic state of one attachment point.
#[derive(Clone, Copy, Debug)]
pub struct AnchorState {
    pub position: Point2<f32>,
    pub velocity: Vector2<f32>,
}

/// Capability interface of a spring endpoint.
pub trait SpringAnchor {
    /// Resolve the attachment point's current state, or `None` when the
    /// anchor no longer exists (e.g. its body was destroyed).
    fn state(&self, physics: &PhysicsWorld) -> Option<AnchorState>;

    /// Apply a world-space impulse at a world-space point.
    fn apply_impulse(&self, physics: &mut PhysicsWorld, impulse: Vector2<f32>, at: Point2<f32>);
}

/// Anchor attached to a rigid body at a body-local point.
#[derive(Clone, Copy, Debug)]
pub struct BodyAnchor {
    pub body: RigidBodyHandle,
    /// Attachment point in the body's local frame.
    pub local_anchor: Point2<f32>,
}

impl SpringAnchor for BodyAnchor {
    fn state(&self, physics: &PhysicsWorld) -> Option<AnchorState> {
        let body = physics.body(self.body)?;
        // Rotate the local anchor into the body's current frame and translate
        // by the body position.
        let position = body.position() * self.local_anchor;
        Some(AnchorState {
            position,
            velocity: body.velocity_at_point(&position),
        })
    }

    fn apply_impulse(&self, physics: &mut PhysicsWorld, impulse: Vector2<f32>, at: Point2<f32>) {
        physics.apply_impulse_at_point(self.body, impulse, at);
    }
}

/// Kinematic anchor pinned to a world-space point (a pointer, a fixed hook).
///
/// Reports zero velocity and absorbs impulses without effect; to follow a
/// moving pointer, replace the anchor through the spring's setter each move.
#[derive(Clone, Copy, Debug)]
pub struct PinAnchor {
    pub position: Point2<f32>,
}

impl SpringAnchor for PinAnchor {
    fn state(&self, _physics: &PhysicsWorld) -> Option<AnchorState> {
        Some(AnchorState {
            position: self.position,
            velocity: Vector2::zeros(),
        })
    }

    fn apply_impulse(&self, _physics: &mut PhysicsWorld, _impulse: Vector2<f32>, _at: Point2<f32>) {}
}

/// One live spring: scalar parameters plus two endpoint capabilities.
pub struct Spring {
    pub stiffness: f32,
    pub damping: f32,
    /// Rest length the spring relaxes toward (meters).
    pub target_length: f32,
    pub anchor_a: Box<dyn SpringAnchor>,
    pub anchor_b: Box<dyn SpringAnchor>,
}

impl Spring {
    pub fn set_anchor_a(&mut self, anchor: Box<dyn SpringAnchor>) {
        self.anchor_a = anchor;
    }

    pub fn set_anchor_b(&mut self, anchor: Box<dyn SpringAnchor>) {
        self.anchor_b = anchor;
    }
}

/// The damped-spring impulse split for one tick.
///
/// Each endpoint is damped against its **own** velocity component along the
/// spring axis (not a single symmetric impulse), which damps relative motion
/// without the solver knowing about a joint type:
///
/// ```text
/// d = Pb − Pa;  distance = |d|;  dir = d / distance
/// stretch = distance − target_length
/// Fa =  stiffness·stretch − damping·(dot(d, Va) / distance)
/// Fb = −stiffness·stretch − damping·(dot(d, Vb) / distance)
/// ```
///
/// Returns `(dir·Fa, dir·Fb)`, or `None` when the endpoints coincide: with no
/// defined direction, an arbitrary or NaN impulse would be a correctness bug,
/// so a degenerate spring applies no force for the tick.
pub fn spring_impulses(
    pa: Point2<f32>,
    pb: Point2<f32>,
    va: Vector2<f32>,
    vb: Vector2<f32>,
    stiffness: f32,
    damping: f32,
    target_length: f32,
) -> Option<(Vector2<f32>, Vector2<f32>)> {
    let d = pb - pa;
    let distance = d.norm();
    if distance <= DIST_EPS {
        return None;
    }

    let dir = d / distance;
    let stretch = distance - target_length;
    let fa = stiffness * stretch - damping * (d.dot(&va) / distance);
    let fb = -stiffness * stretch - damping * (d.dot(&vb) / distance);

    Some((dir * fa, dir * fb))
}

/// Registry of live springs, keyed by id.
///
/// Iteration order is the key order, so force application is deterministic
/// across runs; order does not affect the result for non-interacting springs.
#[derive(Default)]
pub struct SpringSet {
    springs: BTreeMap<String, Spring>,
}

impl SpringSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: String, spring: Spring) {
        self.springs.insert(id, spring);
    }

    pub fn get(&self, id: &str) -> Option<&Spring> {
        self.springs.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Spring> {
        self.springs.get_mut(id)
    }

    /// Delete the registry entry. Outstanding handles for this id go inert.
    pub fn remove(&mut self, id: &str) -> bool {
        self.springs.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.springs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.springs.is_empty()
    }

    /// Compute and apply every live spring's impulses.
    ///
    /// Call strictly before [`PhysicsWorld::step`]. Springs whose anchors no
    /// longer resolve (a body destroyed out from under them) are skipped for
    /// the tick; that is a valid steady state, not an error.
    pub fn apply_impulses(&self, physics: &mut PhysicsWorld) {
        for (id, spring) in &self.springs {
            let (Some(a), Some(b)) = (
                spring.anchor_a.state(physics),
                spring.anchor_b.state(physics),
            ) else {
                log::debug!("spring {id} anchor unresolved; skipping this tick");
                continue;
            };

            let Some((impulse_a, impulse_b)) = spring_impulses(
                a.position,
                b.position,
                a.velocity,
                b.velocity,
                spring.stiffness,
                spring.damping,
                spring.target_length,
            ) else {
                continue;
            };

            spring.anchor_a.apply_impulse(physics, impulse_a, a.position);
            spring.anchor_b.apply_impulse(physics, impulse_b, b.position);
        }
    }

    /// Post-step render segments for every resolvable spring, in renderer
    /// coordinates.
    pub fn segments(&self, physics: &PhysicsWorld) -> Vec<SpringSegment> {
        self.springs
            .values()
            .filter_map(|spring| {
                let a = spring.anchor_a.state(physics)?;
                let b = spring.anchor_b.state(physics)?;
                Some(SpringSegment {
                    point_a: render_point(a.position.x, a.position.y),
                    point_b: render_point(b.position.x, b.position.y),
                })
            })
            .collect()
    }
}
