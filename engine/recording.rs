/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! In-memory engine that records every call.
//!
//! Keeps its own datasets the way a real engine would, places nodes where
//! the test says, and maps screen to canvas with a configurable zoom/pan.

use std::collections::{BTreeMap, HashMap};

use euclid::Vector2D;

use super::{
    CanvasPoint, CanvasRect, DatasetChange, EdgeRecord, NetworkData, NetworkEngine, NodeRecord,
    OverlaySurface, ScreenPoint, ScreenSpace,
};
use crate::graph::{EdgeId, NodeId};
use crate::input::EventKind;

/// One overlay drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    LineDash(Vec<f64>),
    StrokeStyle(String),
    FillStyle(String),
    StrokeRect(CanvasRect),
    FillRect(CanvasRect),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<SurfaceOp>,
}

impl OverlaySurface for RecordingSurface {
    fn set_line_dash(&mut self, segments: &[f64]) {
        self.ops.push(SurfaceOp::LineDash(segments.to_vec()));
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.ops.push(SurfaceOp::StrokeStyle(style.to_string()));
    }

    fn set_fill_style(&mut self, style: &str) {
        self.ops.push(SurfaceOp::FillStyle(style.to_string()));
    }

    fn stroke_rect(&mut self, rect: CanvasRect) {
        self.ops.push(SurfaceOp::StrokeRect(rect));
    }

    fn fill_rect(&mut self, rect: CanvasRect) {
        self.ops.push(SurfaceOp::FillRect(rect));
    }
}

#[derive(Debug)]
pub struct RecordingEngine {
    pub container: Option<String>,
    pub mount_count: usize,
    pub options: Option<serde_json::Value>,
    pub set_data_count: usize,
    pub nodes: BTreeMap<NodeId, NodeRecord>,
    pub edges: BTreeMap<EdgeId, EdgeRecord>,
    pub applied: Vec<DatasetChange>,
    pub subscriptions: Vec<EventKind>,
    pub positions: HashMap<NodeId, CanvasPoint>,
    /// Every `select_nodes` call, oldest first.
    pub selections: Vec<Vec<NodeId>>,
    pub redraws: usize,
    pub fits: usize,
    pub overlay: RecordingSurface,
    zoom: f64,
    pan: Vector2D<f64, ScreenSpace>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self {
            container: None,
            mount_count: 0,
            options: None,
            set_data_count: 0,
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            applied: Vec::new(),
            subscriptions: Vec::new(),
            positions: HashMap::new(),
            selections: Vec::new(),
            redraws: 0,
            fits: 0,
            overlay: RecordingSurface::default(),
            zoom: 1.0,
            pan: Vector2D::zero(),
        }
    }

    /// Canvas = (screen - pan) / zoom.
    pub fn set_view(&mut self, zoom: f64, pan_x: f64, pan_y: f64) {
        self.zoom = zoom;
        self.pan = Vector2D::new(pan_x, pan_y);
    }

    pub fn place(&mut self, id: impl Into<NodeId>, x: f64, y: f64) {
        self.positions.insert(id.into(), CanvasPoint::new(x, y));
    }

    pub fn last_selection(&self) -> Option<&[NodeId]> {
        self.selections.last().map(Vec::as_slice)
    }

    fn load(&mut self, data: NetworkData) {
        self.nodes = data
            .nodes
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect();
        self.edges = data.edges.into_iter().map(|edge| (edge.id, edge)).collect();
    }
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkEngine for RecordingEngine {
    type Container = String;

    fn mount(&mut self, container: String, data: NetworkData, options: serde_json::Value) {
        self.container = Some(container);
        self.mount_count += 1;
        self.options = Some(options);
        self.load(data);
    }

    fn set_data(&mut self, data: NetworkData) {
        self.set_data_count += 1;
        self.load(data);
    }

    fn apply(&mut self, change: DatasetChange) {
        self.applied.push(change.clone());
        match change {
            DatasetChange::AddNode(record) => {
                self.nodes.entry(record.id.clone()).or_insert(record);
            }
            DatasetChange::UpdateNode(update) => {
                if let Some(node) = self.nodes.get_mut(&update.id) {
                    if let Some(label) = update.label {
                        node.label = label;
                    }
                    if let Some(fixed) = update.fixed {
                        node.fixed = fixed;
                    }
                    if let Some(physics) = update.physics {
                        node.physics = physics;
                    }
                }
            }
            DatasetChange::RemoveNode(id) => {
                self.nodes.remove(&id);
            }
            DatasetChange::AddEdge(record) => {
                self.edges.entry(record.id).or_insert(record);
            }
            DatasetChange::RemoveEdge(id) => {
                self.edges.remove(&id);
            }
            DatasetChange::Clear => {
                self.nodes.clear();
                self.edges.clear();
            }
        }
    }

    fn subscribe(&mut self, kind: EventKind) {
        if !self.subscriptions.contains(&kind) {
            self.subscriptions.push(kind);
        }
    }

    fn dom_to_canvas(&self, point: ScreenPoint) -> CanvasPoint {
        let shifted = point - self.pan;
        CanvasPoint::new(shifted.x / self.zoom, shifted.y / self.zoom)
    }

    fn positions(&self, ids: &[NodeId]) -> HashMap<NodeId, CanvasPoint> {
        ids.iter()
            .filter_map(|id| self.positions.get(id).map(|pos| (id.clone(), *pos)))
            .collect()
    }

    fn select_nodes(&mut self, ids: &[NodeId]) {
        self.selections.push(ids.to_vec());
    }

    fn redraw(&mut self) {
        self.redraws += 1;
    }

    fn fit(&mut self) {
        self.fits += 1;
    }

    fn overlay(&mut self) -> &mut dyn OverlaySurface {
        &mut self.overlay
    }
}
