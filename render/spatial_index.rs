/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Spatial index for marquee selection.
//!
//! Node centers are indexed by canvas position so a drag rectangle resolves
//! with an R*-tree containment query instead of a per-node comparison chain.

use rstar::{AABB, RTree, RTreeObject};

use crate::engine::CanvasPoint;
use crate::graph::NodeId;

use super::selection_rect::CanvasBox;

/// A node center stored in the R*-tree.
struct IndexedNode {
    center: [f64; 2],
    id: NodeId,
}

impl RTreeObject for IndexedNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.center)
    }
}

/// Spatial index mapping canvas-space centers to `NodeId`s.
///
/// Callers convert screen coordinates to canvas space before querying.
pub(crate) struct NodeSpatialIndex {
    tree: RTree<IndexedNode>,
}

impl NodeSpatialIndex {
    /// Build the index from `(id, canvas_position)` pairs. Non-finite
    /// positions are skipped.
    pub fn build(nodes: impl Iterator<Item = (NodeId, CanvasPoint)>) -> Self {
        let entries: Vec<_> = nodes
            .filter(|(_, pos)| pos.x.is_finite() && pos.y.is_finite())
            .map(|(id, pos)| IndexedNode {
                center: [pos.x, pos.y],
                id,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Node ids whose center lies inside `bounds`, boundary included.
    pub fn nodes_with_center_in(&self, bounds: &CanvasBox) -> Vec<&NodeId> {
        let aabb = AABB::from_corners([bounds.min.x, bounds.min.y], [bounds.max.x, bounds.max.y]);
        self.tree
            .locate_in_envelope(&aabb)
            .map(|node| &node.id)
            .collect()
    }
}
