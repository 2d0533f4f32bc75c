/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Node pinning on top of the engine's physics simulation.
//!
//! Once the layout stabilizes every node is pinned in place; nodes the user
//! drags are pinned where they are dropped. Each pin write triggers a dataset
//! update, which triggers a redraw and possibly another stabilization, so
//! pin batches are rate limited by a minimum interval.

use std::time::{Duration, Instant};

use log::debug;

use crate::graph::{GraphStore, NodeId};

/// Minimum time between two executed pin batches.
pub const DEFAULT_PIN_INTERVAL: Duration = Duration::from_millis(100);

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-advanced clock; clones share the same time.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: std::rc::Rc<std::cell::Cell<Duration>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Default::default(),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// Outcome of a pin request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    /// The batch ran and pinned this many existing nodes.
    Pinned(usize),
    /// Too soon after the previous batch; nothing was written.
    Debounced,
    /// A node drag is in progress; stabilization pinning waits for drag end.
    Dragging,
}

pub struct NodePinController {
    clock: Box<dyn Clock>,
    min_interval: Duration,
    last_pin: Option<Instant>,
    dragging_node: bool,
}

impl NodePinController {
    pub fn new(clock: Box<dyn Clock>, min_interval: Duration) -> Self {
        Self {
            clock,
            min_interval,
            last_pin: None,
            dragging_node: false,
        }
    }

    pub fn is_dragging_node(&self) -> bool {
        self.dragging_node
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Layout settled: pin everything unless the user is dragging.
    pub fn on_stabilized(&mut self, store: &mut GraphStore) -> PinOutcome {
        if self.dragging_node {
            debug!("Stabilized during node drag; pinning deferred");
            return PinOutcome::Dragging;
        }
        self.fix_nodes(store, None)
    }

    pub fn on_drag_start(&mut self, nodes: &[NodeId]) {
        if !nodes.is_empty() {
            self.dragging_node = true;
        }
    }

    /// Pin the nodes that were just dropped.
    pub fn on_drag_end(&mut self, store: &mut GraphStore, nodes: &[NodeId]) -> PinOutcome {
        self.dragging_node = false;
        self.fix_nodes(store, Some(nodes))
    }

    /// Pin `ids`, or every node when `None`, if the minimum interval since
    /// the previous executed batch has passed.
    pub fn fix_nodes(&mut self, store: &mut GraphStore, ids: Option<&[NodeId]>) -> PinOutcome {
        let now = self.clock.now();
        if let Some(last) = self.last_pin
            && now.saturating_duration_since(last) < self.min_interval
        {
            debug!("Pin batch debounced");
            return PinOutcome::Debounced;
        }
        self.last_pin = Some(now);

        let pinned = match ids {
            Some(ids) => ids.iter().filter(|id| store.set_pinned(id, true)).count(),
            None => store
                .node_ids()
                .iter()
                .filter(|id| store.set_pinned(id, true))
                .count(),
        };
        PinOutcome::Pinned(pinned)
    }

    /// Unpin `ids` unconditionally. Returns how many existing nodes changed.
    pub fn release_nodes(&mut self, store: &mut GraphStore, ids: &[NodeId]) -> usize {
        ids.iter().filter(|id| store.set_pinned(id, false)).count()
    }
}

impl Default for NodePinController {
    fn default() -> Self {
        Self::new(Box::new(SystemClock), DEFAULT_PIN_INTERVAL)
    }
}
