/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Visualiser: the host-facing surface.
//!
//! Owns the graph store, the marquee selection, and the pin controller, and
//! mirrors every store mutation into the engine once it is mounted.
//! Host callbacks must be registered before [`Visualiser::render`]; nodes and
//! edges can be added at any time.

use log::{debug, info};

use crate::config::{ConfigError, VisualiserConfig};
use crate::engine::{CanvasPoint, NetworkEngine, ScreenPoint};
use crate::graph::{EdgeId, GraphStore, Node, NodeId, NodeSpec};
use crate::input::pin::{Clock, NodePinController, PinOutcome, SystemClock};
use crate::input::{EventKind, HostCallbacks, NetworkEvent};
use crate::registries::atomic::theme::{StyleProvider, ThemeRegistry};
use crate::render::SelectionRectangle;

pub struct Visualiser<E: NetworkEngine> {
    engine: E,
    store: GraphStore,
    selection: SelectionRectangle,
    pins: NodePinController,
    callbacks: HostCallbacks,
    config: VisualiserConfig,
    rendered: bool,
    already_fitted: bool,
}

impl<E: NetworkEngine> Visualiser<E> {
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, VisualiserConfig::default())
    }

    pub fn with_config(engine: E, config: VisualiserConfig) -> Self {
        Self::with_parts(
            engine,
            config,
            Box::new(ThemeRegistry::default()),
            Box::new(SystemClock),
        )
    }

    /// Full constructor: custom presentation source and pin clock.
    pub fn with_parts(
        engine: E,
        config: VisualiserConfig,
        style: Box<dyn StyleProvider>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let mut store = GraphStore::with_style(style);
        store.set_label_value_limit(config.labels.value_limit);
        let pins = NodePinController::new(clock, config.pinning.interval());
        Self {
            engine,
            store,
            selection: SelectionRectangle::new(),
            pins,
            callbacks: HostCallbacks::default(),
            config,
            rendered: false,
            already_fitted: false,
        }
    }

    /// Register the host callback for `kind`, replacing any previous one.
    pub fn set_callback_on_event(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&NetworkEvent) + 'static,
    ) {
        self.callbacks.set(kind, Box::new(callback));
        if self.rendered {
            self.engine.subscribe(kind);
        }
    }

    /// Mount the engine on `container` with the current graph and subscribe
    /// to every host and internal event kind.
    pub fn render(&mut self, container: E::Container) -> Result<(), VisualiserError> {
        if self.rendered {
            return Err(VisualiserError::AlreadyRendered);
        }
        self.config.validate()?;
        let options = self.config.engine_options()?;

        // The mount snapshot already reflects everything recorded so far.
        self.store.drain_changes();
        self.engine.mount(container, self.store.snapshot(), options);

        let mut kinds = self.callbacks.kinds();
        kinds.extend(EventKind::INTERNAL);
        kinds.sort();
        kinds.dedup();
        for kind in kinds {
            self.engine.subscribe(kind);
        }

        self.rendered = true;
        info!(
            "Rendered graph with {} nodes and {} edges",
            self.store.node_count(),
            self.store.edge_count()
        );
        Ok(())
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Deliver one engine event: the host callback first, then internal
    /// handling.
    pub fn handle_event(&mut self, event: NetworkEvent) {
        self.callbacks.dispatch(&event);

        match &event {
            NetworkEvent::Stabilized { .. } => {
                self.pins.on_stabilized(&mut self.store);
                self.flush();
            }
            NetworkEvent::DragStart(payload) => self.pins.on_drag_start(&payload.nodes),
            NetworkEvent::DragEnd(payload) => {
                self.pins.on_drag_end(&mut self.store, &payload.nodes);
                self.flush();
            }
            NetworkEvent::AfterDrawing => {
                self.selection.draw(self.engine.overlay(), &self.config.selection);
            }
            _ => {}
        }
    }

    // Mutators

    pub fn add_node(&mut self, spec: NodeSpec) -> bool {
        let added = self.store.add_node(spec);
        self.flush();
        added
    }

    pub fn add_edge(&mut self, from: &NodeId, to: &NodeId, label: &str) -> Option<EdgeId> {
        let id = self.store.add_edge(from, to, label);
        self.flush();
        id
    }

    pub fn delete_node(&mut self, id: &NodeId) -> bool {
        let deleted = self.store.delete_node(id);
        self.flush();
        deleted
    }

    /// Remove every node and edge and hand the engine the empty dataset.
    pub fn clear_graph(&mut self) {
        self.store.clear();
        self.flush();
        if self.rendered {
            self.engine.set_data(self.store.snapshot());
        }
        info!("Graph cleared");
    }

    pub fn disable_physics(&mut self, id: &NodeId) -> bool {
        let disabled = self.store.disable_physics(id);
        self.flush();
        disabled
    }

    pub fn set_display_properties(&mut self, node_type: &str, keys: Vec<String>) {
        self.store.set_display_properties(node_type, keys);
        self.flush();
    }

    /// Pin `ids`, or every node, subject to the pin debounce.
    pub fn fix_nodes(&mut self, ids: Option<&[NodeId]>) -> PinOutcome {
        let outcome = self.pins.fix_nodes(&mut self.store, ids);
        self.flush();
        outcome
    }

    pub fn release_nodes(&mut self, ids: &[NodeId]) -> usize {
        let released = self.pins.release_nodes(&mut self.store, ids);
        self.flush();
        released
    }

    // Queries

    pub fn node_exists(&self, id: &NodeId) -> bool {
        self.store.node_exists(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.store.node(id)
    }

    pub fn node_type(&self, id: &NodeId) -> Option<&str> {
        self.store.node_type(id)
    }

    pub fn node_label(&self, id: &NodeId) -> Option<&str> {
        self.store.node_label(id)
    }

    pub fn all_property_names(&self, id: &NodeId) -> Vec<String> {
        self.store.all_property_names(id)
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn config(&self) -> &VisualiserConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionRectangle {
        &self.selection
    }

    // Marquee selection, wired by the host to pointer down/move/up.

    /// Anchor a marquee at a canvas-space point.
    pub fn start_rectangle(&mut self, x: f64, y: f64) {
        self.selection.start(CanvasPoint::new(x, y));
    }

    /// Stretch the marquee to a screen-space pointer position.
    pub fn update_rectangle(&mut self, x: f64, y: f64) {
        self.selection.update(ScreenPoint::new(x, y), &mut self.engine);
    }

    /// Select the nodes under the marquee and clear it.
    pub fn reset_rectangle(&mut self) -> Vec<NodeId> {
        let selected = self.selection.commit(&self.store, &mut self.engine);
        debug!("Marquee selected {} nodes", selected.len());
        selected
    }

    /// Fit the view to the graph the first time only; later zoom belongs to
    /// the user.
    pub fn fit_to_window_once(&mut self) -> bool {
        if self.already_fitted {
            return false;
        }
        self.engine.fit();
        self.already_fitted = true;
        true
    }

    fn flush(&mut self) {
        let changes = self.store.drain_changes();
        if !self.rendered {
            return;
        }
        for change in changes {
            self.engine.apply(change);
        }
    }
}

/// Errors from the visualiser lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualiserError {
    AlreadyRendered,
    Config(ConfigError),
}

impl std::fmt::Display for VisualiserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisualiserError::AlreadyRendered => write!(f, "Visualiser already rendered"),
            VisualiserError::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for VisualiserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VisualiserError::AlreadyRendered => None,
            VisualiserError::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for VisualiserError {
    fn from(e: ConfigError) -> Self {
        VisualiserError::Config(e)
    }
}
