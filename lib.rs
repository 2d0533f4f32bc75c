/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph state and interaction layer for an external network renderer.
//!
//! The crate owns nodes and edges, derives their labels and presentation,
//! and layers marquee selection and node pinning over a physics engine that
//! the host supplies through [`engine::NetworkEngine`].
//!
//! Entry point: [`Visualiser`].

pub mod app;
pub mod config;
pub mod engine;
pub mod graph;
pub mod input;
pub mod registries;
pub mod render;

pub use app::{Visualiser, VisualiserError};
pub use config::{ConfigError, VisualiserConfig};
pub use engine::{DatasetChange, NetworkEngine, OverlaySurface};
pub use graph::{GraphStore, Node, NodeId, NodeSpec, PropertyKind, PropertyValue};
pub use input::{EventKind, NetworkEvent};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
