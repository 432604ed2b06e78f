//! Server-side physics world synchronization engine.
//!
//! Owns the authoritative physics world for a multiplayer 2D sandbox: shape
//! and identity bookkeeping, damped spring constraints the solver lacks, and
//! delta-encoded per-tick [`shared::WorldUpdate`] messages for remote
//! renderers. The host drives it with [`producer::run_tick`] and routes
//! player input through [`tool::ToolRouter`]; transport and rendering stay
//! outside.

pub mod engine;
pub mod error;
pub mod events;
pub mod producer;
pub mod registry;
pub mod spring;
pub mod tool;
pub mod tracker;
pub mod world;

pub use engine::{BodyMeta, EntityHandles, PhysicsWorld, ShapeStyle};
pub use error::SyncError;
pub use events::EventSink;
pub use producer::{publish_tick, run_tick};
pub use registry::IdAllocator;
pub use spring::{AnchorState, BodyAnchor, PinAnchor, Spring, SpringAnchor, SpringSet};
pub use tool::{Player, PlayerId, Tool, ToolDescriptor, ToolIdent, ToolRouter};
pub use tracker::ShapeStateTracker;
pub use world::{SandboxWorld, ShapeOptions};
