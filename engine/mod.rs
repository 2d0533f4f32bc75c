/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Boundary to the external network rendering/physics engine.
//!
//! The engine keeps its own node and edge datasets, runs the layout, paints
//! the canvas, and reports interaction events. This crate only relies on the
//! capabilities in [`NetworkEngine`]; dataset mutations travel as
//! [`DatasetChange`] values recorded by the [`GraphStore`](crate::graph::GraphStore).

use std::collections::HashMap;

use euclid::{Point2D, Rect};
use serde::{Deserialize, Serialize};

use crate::graph::{EdgeId, NodeId};
use crate::input::EventKind;
use crate::registries::atomic::theme::{EdgeColor, FontStyle, NodeColor, NodeShape};

#[cfg(any(test, feature = "test-utils"))]
pub mod recording;

/// Coordinates as reported by the host's pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSpace {}

/// Coordinates of the engine's drawing surface (after pan and zoom).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasSpace {}

pub type ScreenPoint = Point2D<f64, ScreenSpace>;
pub type CanvasPoint = Point2D<f64, CanvasSpace>;
pub type CanvasRect = Rect<f64, CanvasSpace>;

/// Per-axis position lock understood by the physics simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fixed {
    pub x: bool,
    pub y: bool,
}

impl Fixed {
    pub const PINNED: Fixed = Fixed { x: true, y: true };
    pub const FREE: Fixed = Fixed { x: false, y: false };

    pub fn both(pinned: bool) -> Self {
        if pinned { Self::PINNED } else { Self::FREE }
    }
}

/// Full node entry of the engine dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub label: String,
    pub title: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub base_type: String,
    pub color: NodeColor,
    pub font: FontStyle,
    pub shape: NodeShape,
    pub fixed: Fixed,
    pub physics: bool,
}

/// Partial merge into an existing node entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdate {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<Fixed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physics: Option<bool>,
}

impl NodeUpdate {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            label: None,
            fixed: None,
            physics: None,
        }
    }

    pub fn label(mut self, label: String) -> Self {
        self.label = Some(label);
        self
    }

    pub fn fixed(mut self, fixed: Fixed) -> Self {
        self.fixed = Some(fixed);
        self
    }

    pub fn physics(mut self, physics: bool) -> Self {
        self.physics = Some(physics);
        self
    }
}

/// Full edge entry of the engine dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub label: String,
    pub color: EdgeColor,
    pub font: FontStyle,
}

/// One mutation of the engine datasets.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetChange {
    /// Insert if absent.
    AddNode(NodeRecord),
    UpdateNode(NodeUpdate),
    RemoveNode(NodeId),
    AddEdge(EdgeRecord),
    RemoveEdge(EdgeId),
    /// Remove every node and edge.
    Clear,
}

/// Complete dataset handed to the engine when it is (re)wired.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// Canvas-like 2D surface used for the selection overlay.
pub trait OverlaySurface {
    /// Dash pattern for subsequent strokes; empty means solid.
    fn set_line_dash(&mut self, segments: &[f64]);
    fn set_stroke_style(&mut self, style: &str);
    fn set_fill_style(&mut self, style: &str);
    /// `rect` may carry negative extents; they span left/up from the origin.
    fn stroke_rect(&mut self, rect: CanvasRect);
    fn fill_rect(&mut self, rect: CanvasRect);
}

/// Capabilities required from the external network engine.
///
/// All calls are synchronous and immediately consistent.
pub trait NetworkEngine {
    /// Host handle the engine draws into (a DOM element, a window, ...).
    type Container;

    /// One-time wiring against the initial dataset and serialized options.
    fn mount(&mut self, container: Self::Container, data: NetworkData, options: serde_json::Value);

    /// Replace the engine's dataset reference wholesale.
    fn set_data(&mut self, data: NetworkData);

    fn apply(&mut self, change: DatasetChange);

    /// Ask the engine to deliver events of `kind` to the visualiser.
    fn subscribe(&mut self, kind: EventKind);

    fn dom_to_canvas(&self, point: ScreenPoint) -> CanvasPoint;

    /// Current rendered positions; ids unknown to the engine are omitted.
    fn positions(&self, ids: &[NodeId]) -> HashMap<NodeId, CanvasPoint>;

    fn select_nodes(&mut self, ids: &[NodeId]);

    /// Force a repaint; the engine emits `AfterDrawing` once done.
    fn redraw(&mut self);

    /// Zoom and pan so that every node is visible.
    fn fit(&mut self);

    fn overlay(&mut self) -> &mut dyn OverlaySurface;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registries::atomic::theme::{ColorPair, NodeColor};
    use serde_json::json;

    fn record(href: Option<&str>) -> NodeRecord {
        NodeRecord {
            id: NodeId::from(7),
            href: href.map(str::to_string),
            label: "Ann".to_string(),
            title: "person".to_string(),
            node_type: "person".to_string(),
            base_type: "entity".to_string(),
            color: NodeColor::flat("#5bc2e7", "#85d3ef"),
            font: FontStyle {
                color: "#000000".to_string(),
                size: None,
            },
            shape: NodeShape::Box,
            fixed: Fixed::PINNED,
            physics: false,
        }
    }

    #[test]
    fn node_record_uses_engine_field_names() {
        let value = serde_json::to_value(record(Some("/graph/7"))).unwrap();
        let highlight = ColorPair {
            background: "#85d3ef".to_string(),
            border: "#85d3ef".to_string(),
        };
        assert_eq!(
            value,
            json!({
                "id": 7,
                "href": "/graph/7",
                "label": "Ann",
                "title": "person",
                "type": "person",
                "baseType": "entity",
                "color": {
                    "background": "#5bc2e7",
                    "border": "#5bc2e7",
                    "highlight": serde_json::to_value(&highlight).unwrap(),
                    "hover": serde_json::to_value(&highlight).unwrap(),
                },
                "font": { "color": "#000000" },
                "shape": "box",
                "fixed": { "x": true, "y": true },
                "physics": false,
            })
        );
    }

    #[test]
    fn absent_href_is_omitted() {
        let value = serde_json::to_value(record(None)).unwrap();
        assert!(value.get("href").is_none());
        assert!(value.get("node_type").is_none());
    }
}
