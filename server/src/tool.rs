//! Tool interaction protocol.
//!
//! A tool is a per-player input state machine plugged in from outside the
//! core: it receives pointer transitions (`player_down` / `player_move` /
//! `player_up`) and one `update` per tick while active, and in response
//! mutates the shared world (bodies, springs, overlays).
//!
//! Calling contract
//! - The core invokes exactly one pointer callback per input event and
//!   `update` once per tick for the active tool, input or not.
//! - The core does **not** track held state on a tool's behalf: a tool must
//!   treat `player_move` as a no-op unless it recorded a `player_down` itself.
//! - `player_up` may arrive at any time without a matching `player_down`
//!   (synthetic delivery on tool switch or disconnect); tools must treat that
//!   as a release of whatever they hold, or as a no-op.

use nalgebra::Point2;

use crate::events::EventSink;
use crate::world::SandboxWorld;
use std::collections::BTreeMap;

pub type PlayerId = u64;
pub type ToolIdent = String;

/// Connected player, owned by the surrounding controller layer and passed by
/// reference into tool callbacks.
#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    /// Last known pointer position in world space.
    pub pointer: Point2<f32>,
    /// Currently selected tool id (mirror of the router's active entry).
    pub tool: ToolIdent,
}

/// Renderer-facing description of one registered tool.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolDescriptor {
    pub id: ToolIdent,
    pub label: String,
}

/// Capability set every tool implements. All methods default to no-ops so a
/// tool only writes the transitions it cares about.
pub trait Tool {
    fn player_down(&mut self, world: &mut SandboxWorld, player: &Player, point: Point2<f32>) {
        let _ = (world, player, point);
    }

    fn player_move(&mut self, world: &mut SandboxWorld, player: &Player, point: Point2<f32>) {
        let _ = (world, player, point);
    }

    fn player_up(&mut self, world: &mut SandboxWorld, player: &Player, point: Point2<f32>) {
        let _ = (world, player, point);
    }

    /// Called once per tick for the active tool, regardless of input.
    fn update(&mut self, world: &mut SandboxWorld, player: &Player) {
        let _ = (world, player);
    }
}

type ToolFactory = Box<dyn Fn() -> Box<dyn Tool>>;

struct ActiveTool {
    tool: ToolIdent,
    instance: Box<dyn Tool>,
}

/// Routes player input to per-player tool instances.
///
/// Tools register as factories; selecting a tool instantiates it for that
/// player, so held state never leaks between players or selections. Switching
/// tools (or disconnecting) delivers a synthetic `player_up` to the outgoing
/// instance before anything else happens, so an in-progress interaction (e.g.
/// a held drag spring) is always released.
#[derive(Default)]
pub struct ToolRouter {
    factories: BTreeMap<ToolIdent, (String, ToolFactory)>,
    active: BTreeMap<PlayerId, ActiveTool>,
}

impl ToolRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under `id` with a renderer-facing label.
    pub fn register(
        &mut self,
        id: impl Into<ToolIdent>,
        label: impl Into<String>,
        factory: impl Fn() -> Box<dyn Tool> + 'static,
    ) {
        self.factories
            .insert(id.into(), (label.into(), Box::new(factory)));
    }

    /// Registered tools, in stable id order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.factories
            .iter()
            .map(|(id, (label, _))| ToolDescriptor {
                id: id.clone(),
                label: label.clone(),
            })
            .collect()
    }

    /// Announce the registered tool set through the event sink.
    pub fn announce(&self, sink: &mut dyn EventSink) {
        sink.tools(&self.descriptors());
    }

    /// Switch a player's active tool.
    ///
    /// The outgoing instance receives a synthetic `player_up` at the player's
    /// last pointer position before the new tool is instantiated; the new
    /// tool therefore never observes input the previous tool still held.
    /// Returns `false` (and changes nothing) for an unregistered tool id.
    pub fn select_tool(
        &mut self,
        world: &mut SandboxWorld,
        player: &mut Player,
        tool: &str,
        sink: &mut dyn EventSink,
    ) -> bool {
        let Some((_, factory)) = self.factories.get(tool) else {
            log::warn!("player {} selected unregistered tool {tool:?}", player.id);
            return false;
        };
        let instance = factory();

        if let Some(mut previous) = self.active.remove(&player.id) {
            previous
                .instance
                .player_up(world, player, player.pointer);
        }

        self.active.insert(
            player.id,
            ActiveTool {
                tool: tool.to_string(),
                instance,
            },
        );
        player.tool = tool.to_string();
        sink.tool_selected(player.id, tool);
        true
    }

    /// Drop a disconnecting player's tool, releasing any held interaction via
    /// a synthetic `player_up`.
    pub fn remove_player(&mut self, world: &mut SandboxWorld, player: &Player) {
        if let Some(mut active) = self.active.remove(&player.id) {
            active.instance.player_up(world, player, player.pointer);
        }
    }

    pub fn active_tool(&self, player: PlayerId) -> Option<&str> {
        self.active.get(&player).map(|a| a.tool.as_str())
    }

    pub fn player_down(&mut self, world: &mut SandboxWorld, player: &Player, point: Point2<f32>) {
        if let Some(active) = self.active.get_mut(&player.id) {
            active.instance.player_down(world, player, point);
        }
    }

    pub fn player_move(&mut self, world: &mut SandboxWorld, player: &Player, point: Point2<f32>) {
        if let Some(active) = self.active.get_mut(&player.id) {
            active.instance.player_move(world, player, point);
        }
    }

    pub fn player_up(&mut self, world: &mut SandboxWorld, player: &Player, point: Point2<f32>) {
        if let Some(active) = self.active.get_mut(&player.id) {
            active.instance.player_up(world, player, point);
        }
    }

    /// Run the per-tick `update` for every player's active tool.
    pub fn update_all(&mut self, world: &mut SandboxWorld, players: &[Player]) {
        for (player_id, active) in self.active.iter_mut() {
            if let Some(player) = players.iter().find(|p| p.id == *player_id) {
                active.instance.update(world, player);
            }
        }
    }
}
