//! World update production: the per-tick state machine.
//!
//! One call to [`run_tick`] is one full traversal of
//! `Idle → Stepping → Diffing → Overlaying → Emitted`; the `&mut` exclusivity
//! of the world and router makes reentrancy unrepresentable, so the phases
//! are expressed as a straight sequence. A tick always runs to completion;
//! there is no cancellation path.
//!
//! Ordering guarantees
//! - Spring impulses are applied strictly before the solver step, so they
//!   integrate within the same tick as all other forces.
//! - Content is drained before transforms are computed from the same world
//!   state, so a shape's content is always emitted in the same or an earlier
//!   tick than its first transform.
//! - Tool mutations run after the diff: world changes a tool makes surface in
//!   the next tick's delta (content and transform together), while the
//!   overlays it adds ship with the current tick.

use std::time::Instant;

use shared::{Overlays, WorldDelta, WorldUpdate};

use crate::error::SyncError;
use crate::tool::{Player, ToolRouter};
use crate::world::SandboxWorld;

/// Advance the world by one tick and assemble the outbound update.
///
/// Fails with [`SyncError::NotInitialized`] when called before
/// [`SandboxWorld::init`]; that is a caller-ordering violation, not a
/// condition to recover from.
pub fn run_tick(
    world: &mut SandboxWorld,
    tools: &mut ToolRouter,
    players: &[Player],
) -> Result<WorldUpdate, SyncError> {
    let started = Instant::now();
    if world.physics.is_none() {
        return Err(SyncError::NotInitialized);
    }

    // ---------------------------------------------------------------------
    // Stepping: spring impulses first, then exactly one fixed solver step.
    // ---------------------------------------------------------------------
    {
        let physics = world.physics.as_mut().expect("checked above");
        world.springs.apply_impulses(physics);
        physics.step();
    }

    // ---------------------------------------------------------------------
    // Diffing: changed content at most once, full transforms every tick.
    // ---------------------------------------------------------------------
    let shape_content = world.tracker.drain_changed();
    let shape_transforms = world
        .tracker
        .compute_transforms(world.physics.as_ref().expect("checked above"));

    // ---------------------------------------------------------------------
    // Overlaying: drop the previous tick's transient graphics, then let every
    // player's active tool mutate the world and contribute this tick's
    // overlays. Overlays never persist; a tool re-adds what it still wants.
    // ---------------------------------------------------------------------
    world.overlays = Overlays::default();
    tools.update_all(world, players);

    let springs = world
        .springs
        .segments(world.physics.as_ref().expect("checked above"));

    // ---------------------------------------------------------------------
    // Emit.
    // ---------------------------------------------------------------------
    Ok(WorldUpdate {
        delta: WorldDelta {
            shape_content,
            shape_transforms,
        },
        ms: started.elapsed().as_secs_f32() * 1000.0,
        springs,
        overlays: world.overlays.clone(),
    })
}

/// [`run_tick`], then forward the update through the host's event sink as the
/// `world_update` named event.
pub fn publish_tick(
    world: &mut SandboxWorld,
    tools: &mut ToolRouter,
    players: &[Player],
    sink: &mut dyn crate::events::EventSink,
) -> Result<(), SyncError> {
    let update = run_tick(world, tools, players)?;
    sink.world_update(&update);
    Ok(())
}
