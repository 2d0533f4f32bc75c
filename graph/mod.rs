/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Authoritative node and edge store.
//!
//! Core structures:
//! - `GraphStore`: container backed by petgraph::StableGraph, indexed by `NodeId`
//! - `Node`: domain node with typed properties, label, and presentation bundle
//! - `Edge`: labelled connection; at most one per unordered endpoint pair
//!
//! Every mutation is recorded as a [`DatasetChange`] so the owner can mirror
//! it into the external engine. Invalid references and duplicate insertions
//! are silent no-ops.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::debug;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use crate::engine::{DatasetChange, EdgeRecord, Fixed, NetworkData, NodeRecord, NodeUpdate};
use crate::registries::atomic::theme::{
    EdgePresentation, NodePresentation, StyleProvider, ThemeRegistry,
};

pub mod edge_dedup;
pub mod label;

pub use label::{DisplayConfig, synthesize};

/// Stable node handle (petgraph NodeIndex, survives other deletions)
pub type NodeKey = NodeIndex;

/// Stable edge handle (petgraph EdgeIndex)
pub type EdgeKey = EdgeIndex;

/// Host-assigned node identity, textual or numeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Number(i64),
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Number(n) => write!(f, "{n}"),
            NodeId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId::Number(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::Text(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId::Text(value)
    }
}

/// Engine-facing edge identity, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

/// Data type of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    String,
    Long,
    Double,
    Boolean,
    Date,
}

/// Display form of one property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PropertyKind>,
}

impl PropertyValue {
    pub fn text(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: None,
        }
    }

    pub fn typed(label: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            label: label.into(),
            kind: Some(kind),
        }
    }
}

/// Everything the host supplies to create a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: NodeId,
    pub node_type: String,
    pub base_type: String,
    pub label: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
    #[serde(default)]
    pub ontology: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

impl NodeSpec {
    pub fn new(
        id: impl Into<NodeId>,
        node_type: impl Into<String>,
        base_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            base_type: base_type.into(),
            label: label.into(),
            href: None,
            properties: BTreeMap::new(),
            ontology: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn ontology(mut self, reference: impl Into<String>) -> Self {
        self.ontology.push(reference.into());
        self
    }

    pub fn link(mut self, reference: impl Into<String>) -> Self {
        self.links.push(reference.into());
        self
    }
}

/// A node owned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub node_type: String,
    pub base_type: String,
    /// Current display string.
    pub label: String,
    /// Label before property-based augmentation.
    pub base_label: String,
    pub href: Option<String>,
    pub properties: BTreeMap<String, PropertyValue>,
    pub ontology: Vec<String>,
    pub links: Vec<String>,
    /// Position locked against the physics simulation.
    pub pinned: bool,
    pub physics_enabled: bool,
    pub presentation: NodePresentation,
}

impl Node {
    fn to_record(&self) -> NodeRecord {
        NodeRecord {
            id: self.id.clone(),
            href: self.href.clone(),
            label: self.label.clone(),
            title: self.node_type.clone(),
            node_type: self.node_type.clone(),
            base_type: self.base_type.clone(),
            color: self.presentation.color.clone(),
            font: self.presentation.font.clone(),
            shape: self.presentation.shape,
            fixed: Fixed::both(self.pinned),
            physics: self.physics_enabled,
        }
    }
}

/// Edge payload stored on the petgraph edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub label: String,
    pub presentation: EdgePresentation,
}

/// Read-only view of an edge with resolved endpoint ids.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub id: EdgeId,
    pub from: &'a NodeId,
    pub to: &'a NodeId,
    pub label: &'a str,
}

/// Owned node/edge collections plus label display configuration.
pub struct GraphStore {
    inner: StableGraph<Node, Edge, Directed>,
    id_to_node: HashMap<NodeId, NodeKey>,
    display: DisplayConfig,
    style: Box<dyn StyleProvider>,
    next_edge_id: u64,
    pending: Vec<DatasetChange>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::with_style(Box::new(ThemeRegistry::default()))
    }

    pub fn with_style(style: Box<dyn StyleProvider>) -> Self {
        Self {
            inner: StableGraph::new(),
            id_to_node: HashMap::new(),
            display: DisplayConfig::new(),
            style,
            next_edge_id: 0,
            pending: Vec::new(),
        }
    }

    /// Characters kept from each property value in synthesized labels.
    pub fn set_label_value_limit(&mut self, limit: usize) {
        self.display.set_value_limit(limit);
    }

    /// Insert a node; returns `false` without touching the store if the id
    /// is already present.
    pub fn add_node(&mut self, spec: NodeSpec) -> bool {
        if self.id_to_node.contains_key(&spec.id) {
            debug!("Ignoring duplicate node {}", spec.id);
            return false;
        }

        let presentation = self
            .style
            .node_presentation(&spec.node_type, &spec.base_type);
        let label = synthesize(&spec.node_type, &spec.properties, &spec.label, &self.display);
        let node = Node {
            id: spec.id.clone(),
            node_type: spec.node_type,
            base_type: spec.base_type,
            label,
            base_label: spec.label,
            href: spec.href,
            properties: spec.properties,
            ontology: spec.ontology,
            links: spec.links,
            pinned: false,
            physics_enabled: true,
            presentation,
        };
        self.pending.push(DatasetChange::AddNode(node.to_record()));
        let key = self.inner.add_node(node);
        self.id_to_node.insert(spec.id, key);
        true
    }

    /// Connect two existing nodes unless any edge already joins them.
    pub fn add_edge(&mut self, from: &NodeId, to: &NodeId, label: &str) -> Option<EdgeId> {
        let (Some(from_key), Some(to_key)) = (self.key(from), self.key(to)) else {
            debug!("Ignoring edge {from} -> {to}: missing endpoint");
            return None;
        };
        if edge_dedup::connected(&self.inner, from_key, to_key) {
            debug!("Ignoring edge {from} -> {to}: pair already connected");
            return None;
        }

        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        let edge = Edge {
            id,
            label: label.to_string(),
            presentation: self.style.edge_presentation(),
        };
        self.pending.push(DatasetChange::AddEdge(EdgeRecord {
            id,
            from: from.clone(),
            to: to.clone(),
            label: edge.label.clone(),
            color: edge.presentation.color.clone(),
            font: edge.presentation.font.clone(),
        }));
        self.inner.add_edge(from_key, to_key, edge);
        Some(id)
    }

    /// True if an edge joins `a` and `b` in either direction. False when
    /// either node is missing.
    pub fn connected(&self, a: &NodeId, b: &NodeId) -> bool {
        match (self.key(a), self.key(b)) {
            (Some(a), Some(b)) => edge_dedup::connected(&self.inner, a, b),
            _ => false,
        }
    }

    /// Remove a node and every edge touching it.
    pub fn delete_node(&mut self, id: &NodeId) -> bool {
        let Some(key) = self.key(id) else {
            return false;
        };

        let mut touching: Vec<EdgeKey> = self
            .inner
            .edges_directed(key, Direction::Outgoing)
            .chain(self.inner.edges_directed(key, Direction::Incoming))
            .map(|edge| edge.id())
            .collect();
        touching.sort();
        touching.dedup();
        for edge_key in touching {
            if let Some(edge) = self.inner.remove_edge(edge_key) {
                self.pending.push(DatasetChange::RemoveEdge(edge.id));
            }
        }

        self.inner.remove_node(key);
        self.id_to_node.remove(id);
        self.pending.push(DatasetChange::RemoveNode(id.clone()));
        true
    }

    /// Remove every node and edge. Display configuration is kept.
    pub fn clear(&mut self) {
        self.inner.clear();
        self.id_to_node.clear();
        self.pending.push(DatasetChange::Clear);
    }

    /// Exempt a node from the physics simulation.
    pub fn disable_physics(&mut self, id: &NodeId) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.physics_enabled = false;
        let update = NodeUpdate::new(id.clone()).physics(false);
        self.pending.push(DatasetChange::UpdateNode(update));
        true
    }

    /// Lock or unlock a node's position on both axes.
    pub fn set_pinned(&mut self, id: &NodeId, pinned: bool) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.pinned = pinned;
        let update = NodeUpdate::new(id.clone()).fixed(Fixed::both(pinned));
        self.pending.push(DatasetChange::UpdateNode(update));
        true
    }

    /// Configure which properties appear in labels of `node_type` and
    /// relabel every existing node of that type. Empty `keys` reverts the
    /// type to base labels.
    pub fn set_display_properties(&mut self, node_type: &str, keys: Vec<String>) {
        self.display.set(node_type, keys);

        let keys: Vec<NodeKey> = self.inner.node_indices().collect();
        for key in keys {
            let Some(node) = self.inner.node_weight_mut(key) else {
                continue;
            };
            if node.node_type != node_type {
                continue;
            }
            node.label = synthesize(
                &node.node_type,
                &node.properties,
                &node.base_label,
                &self.display,
            );
            let update = NodeUpdate::new(node.id.clone()).label(node.label.clone());
            self.pending.push(DatasetChange::UpdateNode(update));
        }
    }

    pub fn display_config(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn node_exists(&self, id: &NodeId) -> bool {
        self.id_to_node.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.inner.node_weight(self.key(id)?)
    }

    pub fn node_type(&self, id: &NodeId) -> Option<&str> {
        self.node(id).map(|node| node.node_type.as_str())
    }

    pub fn node_label(&self, id: &NodeId) -> Option<&str> {
        self.node(id).map(|node| node.label.as_str())
    }

    /// Property keys of a node in lexicographic order; empty for a missing node.
    pub fn all_property_names(&self, id: &NodeId) -> Vec<String> {
        // BTreeMap keys iterate in order already.
        self.node(id)
            .map(|node| node.properties.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Iterate over all nodes in store order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.inner.node_weights()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(|node| node.id.clone()).collect()
    }

    /// Iterate over all edges with resolved endpoints.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.inner.edge_references().map(|edge| EdgeView {
            id: edge.weight().id,
            from: &self.inner[edge.source()].id,
            to: &self.inner[edge.target()].id,
            label: edge.weight().label.as_str(),
        })
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Full dataset in engine form.
    pub fn snapshot(&self) -> NetworkData {
        NetworkData {
            nodes: self.nodes().map(Node::to_record).collect(),
            edges: self
                .inner
                .edge_references()
                .map(|edge| {
                    let payload = edge.weight();
                    EdgeRecord {
                        id: payload.id,
                        from: self.inner[edge.source()].id.clone(),
                        to: self.inner[edge.target()].id.clone(),
                        label: payload.label.clone(),
                        color: payload.presentation.color.clone(),
                        font: payload.presentation.font.clone(),
                    }
                })
                .collect(),
        }
    }

    /// Take the dataset changes recorded since the last drain.
    pub fn drain_changes(&mut self) -> Vec<DatasetChange> {
        std::mem::take(&mut self.pending)
    }

    fn key(&self, id: &NodeId) -> Option<NodeKey> {
        self.id_to_node.get(id).copied()
    }

    fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        let key = self.key(id)?;
        self.inner.node_weight_mut(key)
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
