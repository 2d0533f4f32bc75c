/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Engine events and the host callback table.
//!
//! The engine reports interaction and lifecycle events as [`NetworkEvent`]
//! values. Hosts register one callback per [`EventKind`]; the visualiser
//! handles the kinds it needs internally (stabilization, drag end, post-draw)
//! after the host callback for the same kind has run.

use std::collections::HashMap;

use crate::engine::ScreenPoint;
use crate::graph::{EdgeId, NodeId};

pub mod pin;

/// Subscription key for engine events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Click,
    DoubleClick,
    Context,
    Hold,
    Release,
    Select,
    SelectNode,
    DeselectNode,
    DragStart,
    Dragging,
    DragEnd,
    HoverNode,
    BlurNode,
    Zoom,
    Stabilized,
    AfterDrawing,
}

impl EventKind {
    /// Event name on the engine side.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::DoubleClick => "doubleClick",
            EventKind::Context => "oncontext",
            EventKind::Hold => "hold",
            EventKind::Release => "release",
            EventKind::Select => "select",
            EventKind::SelectNode => "selectNode",
            EventKind::DeselectNode => "deselectNode",
            EventKind::DragStart => "dragStart",
            EventKind::Dragging => "dragging",
            EventKind::DragEnd => "dragEnd",
            EventKind::HoverNode => "hoverNode",
            EventKind::BlurNode => "blurNode",
            EventKind::Zoom => "zoom",
            EventKind::Stabilized => "stabilized",
            EventKind::AfterDrawing => "afterDrawing",
        }
    }

    /// Kinds the visualiser always subscribes to for its own handlers.
    pub const INTERNAL: [EventKind; 4] = [
        EventKind::Stabilized,
        EventKind::DragStart,
        EventKind::DragEnd,
        EventKind::AfterDrawing,
    ];
}

/// Nodes and edges under the pointer when an interaction event fired.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointerPayload {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
    pub pointer: ScreenPoint,
}

impl PointerPayload {
    pub fn on_nodes(nodes: Vec<NodeId>, pointer: ScreenPoint) -> Self {
        Self {
            nodes,
            edges: Vec::new(),
            pointer,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    Click(PointerPayload),
    DoubleClick(PointerPayload),
    Context(PointerPayload),
    Hold(PointerPayload),
    Release(PointerPayload),
    Select(PointerPayload),
    SelectNode(PointerPayload),
    DeselectNode {
        current: PointerPayload,
        previous_nodes: Vec<NodeId>,
    },
    DragStart(PointerPayload),
    Dragging(PointerPayload),
    /// `nodes` holds the nodes that were moved.
    DragEnd(PointerPayload),
    HoverNode {
        node: NodeId,
    },
    BlurNode {
        node: NodeId,
    },
    Zoom {
        scale: f64,
        pointer: ScreenPoint,
    },
    /// The layout settled into a low-motion state.
    Stabilized {
        iterations: u32,
    },
    /// Post-render hook; overlays paint here.
    AfterDrawing,
}

impl NetworkEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            NetworkEvent::Click(_) => EventKind::Click,
            NetworkEvent::DoubleClick(_) => EventKind::DoubleClick,
            NetworkEvent::Context(_) => EventKind::Context,
            NetworkEvent::Hold(_) => EventKind::Hold,
            NetworkEvent::Release(_) => EventKind::Release,
            NetworkEvent::Select(_) => EventKind::Select,
            NetworkEvent::SelectNode(_) => EventKind::SelectNode,
            NetworkEvent::DeselectNode { .. } => EventKind::DeselectNode,
            NetworkEvent::DragStart(_) => EventKind::DragStart,
            NetworkEvent::Dragging(_) => EventKind::Dragging,
            NetworkEvent::DragEnd(_) => EventKind::DragEnd,
            NetworkEvent::HoverNode { .. } => EventKind::HoverNode,
            NetworkEvent::BlurNode { .. } => EventKind::BlurNode,
            NetworkEvent::Zoom { .. } => EventKind::Zoom,
            NetworkEvent::Stabilized { .. } => EventKind::Stabilized,
            NetworkEvent::AfterDrawing => EventKind::AfterDrawing,
        }
    }
}

pub type EventCallback = Box<dyn FnMut(&NetworkEvent)>;

/// Host callbacks keyed by event kind; registering a kind again replaces
/// the previous callback.
#[derive(Default)]
pub struct HostCallbacks {
    callbacks: HashMap<EventKind, EventCallback>,
}

impl HostCallbacks {
    pub fn set(&mut self, kind: EventKind, callback: EventCallback) {
        self.callbacks.insert(kind, callback);
    }

    /// Registered kinds in a stable order.
    pub fn kinds(&self) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = self.callbacks.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Run the callback for the event's kind, if any. Returns whether one ran.
    pub fn dispatch(&mut self, event: &NetworkEvent) -> bool {
        match self.callbacks.get_mut(&event.kind()) {
            Some(callback) => {
                callback(event);
                true
            }
            None => false,
        }
    }
}
