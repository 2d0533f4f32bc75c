/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Canvas-side interaction: marquee selection and its overlay.

pub mod selection_rect;
pub(crate) mod spatial_index;

pub use selection_rect::{CanvasBox, SelectionRectangle, SelectionState};
