/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Marquee (rubber-band) selection.
//!
//! A drag records a canvas-space anchor and a signed extent; the sign of
//! each extent encodes the drag direction. On commit the rectangle is
//! normalized to an axis-aligned box and every node whose rendered center
//! lies inside it, boundary included, becomes the engine selection.

use std::collections::HashSet;

use euclid::{Box2D, Rect, Size2D};
use log::{debug, warn};

use crate::config::SelectionOverlayStyle;
use crate::engine::{
    CanvasPoint, CanvasRect, CanvasSpace, NetworkEngine, OverlaySurface, ScreenPoint,
};
use crate::graph::{GraphStore, NodeId};

use super::spatial_index::NodeSpatialIndex;

/// Normalized selection bounds with `min <= max` on both axes.
pub type CanvasBox = Box2D<f64, CanvasSpace>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Dragging,
}

/// `[start, start + extent]` when the extent is positive, else
/// `[start + extent, start]`.
pub fn axis_range(start: f64, extent: f64) -> (f64, f64) {
    if extent > 0.0 {
        (start, start + extent)
    } else {
        (start + extent, start)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionRectangle {
    state: SelectionState,
    anchor: CanvasPoint,
    width: f64,
    height: f64,
}

impl SelectionRectangle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == SelectionState::Dragging
    }

    pub fn anchor(&self) -> CanvasPoint {
        self.anchor
    }

    /// Signed `(width, height)` relative to the anchor.
    pub fn extent(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Begin a drag at a canvas-space anchor.
    pub fn start(&mut self, anchor: CanvasPoint) {
        self.anchor = anchor;
        self.width = 0.0;
        self.height = 0.0;
        self.state = SelectionState::Dragging;
    }

    /// Stretch the rectangle to a screen-space pointer position and request
    /// a redraw. Ignored unless dragging.
    pub fn update<E: NetworkEngine>(&mut self, pointer: ScreenPoint, engine: &mut E) -> bool {
        if !self.is_dragging() {
            debug!("Ignoring rectangle update outside of a drag");
            return false;
        }
        let canvas = engine.dom_to_canvas(pointer);
        self.width = canvas.x - self.anchor.x;
        self.height = canvas.y - self.anchor.y;
        engine.redraw();
        true
    }

    /// Signed rectangle as drawn: from the anchor to the current point.
    pub fn drawn_rect(&self) -> CanvasRect {
        Rect::new(self.anchor, Size2D::new(self.width, self.height))
    }

    /// Normalized bounds of the current rectangle.
    pub fn bounds(&self) -> CanvasBox {
        let (min_x, max_x) = axis_range(self.anchor.x, self.width);
        let (min_y, max_y) = axis_range(self.anchor.y, self.height);
        CanvasBox::new(CanvasPoint::new(min_x, min_y), CanvasPoint::new(max_x, max_y))
    }

    /// Paint the overlay: dashed border, then translucent fill. Only while
    /// dragging; returns whether anything was drawn.
    pub fn draw(&self, surface: &mut dyn OverlaySurface, style: &SelectionOverlayStyle) -> bool {
        if !self.is_dragging() {
            return false;
        }
        let rect = self.drawn_rect();
        surface.set_line_dash(&style.dash);
        surface.set_stroke_style(&style.stroke);
        surface.stroke_rect(rect);
        surface.set_line_dash(&[]);
        surface.set_fill_style(&style.fill);
        surface.fill_rect(rect);
        true
    }

    /// Select every node whose rendered position lies in the rectangle,
    /// push the selection to the engine, and return to idle. Without a drag
    /// in progress nothing is selected and the engine selection is kept.
    pub fn commit<E: NetworkEngine>(&mut self, store: &GraphStore, engine: &mut E) -> Vec<NodeId> {
        if !self.is_dragging() {
            debug!("Ignoring rectangle commit outside of a drag");
            return Vec::new();
        }

        let ids = store.node_ids();
        let positions = engine.positions(&ids);
        if positions.len() < ids.len() {
            warn!(
                "Engine reported positions for {} of {} nodes",
                positions.len(),
                ids.len()
            );
        }

        let index = NodeSpatialIndex::build(positions.into_iter());
        let inside: HashSet<&NodeId> = index
            .nodes_with_center_in(&self.bounds())
            .into_iter()
            .collect();
        let selected: Vec<NodeId> = ids
            .iter()
            .filter(|id| inside.contains(id))
            .cloned()
            .collect();

        engine.select_nodes(&selected);
        self.state = SelectionState::Idle;
        self.width = 0.0;
        self.height = 0.0;
        selected
    }
}
