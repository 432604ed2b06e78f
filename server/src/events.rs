//! Typed outbound event boundary.
//!
//! The surrounding controller routes named events over an already-reliable,
//! ordered channel; this core only defines the typed seam. Hosts implement
//! [`EventSink`] and register it for the lifetime of the component that owns
//! it. There is no process-global emitter, so teardown is just dropping the
//! sink with its owner.
//!
//! Outbound events: `world_update` (one per tick), `tools` (the registered
//! tool set), `player_tool_success` (selection acknowledgements). Inbound
//! events (`player_down` / `player_move` / `player_up` / `player_tool`)
//! arrive as method calls on [`crate::tool::ToolRouter`] and
//! [`crate::world::SandboxWorld`].

use shared::WorldUpdate;

use crate::tool::{PlayerId, ToolDescriptor};

/// Host-implemented receiver for the core's outbound named events.
///
/// All methods default to no-ops so a host subscribes only to what it
/// forwards.
pub trait EventSink {
    /// One per tick: the delta-encoded world state.
    fn world_update(&mut self, update: &WorldUpdate) {
        let _ = update;
    }

    /// The registered tool set, announced on registration changes and to
    /// newly connected players.
    fn tools(&mut self, tools: &[ToolDescriptor]) {
        let _ = tools;
    }

    /// A player's tool selection was accepted.
    fn tool_selected(&mut self, player: PlayerId, tool: &str) {
        let _ = (player, tool);
    }
}

/// Discard-everything sink for hosts and tests that don't forward events.
impl EventSink for () {}
