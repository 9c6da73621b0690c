// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layer list panel for Scenery Editor.
//!
//! This crate provides the layer box shown next to the scene:
//! - Ordered layer rows with single selection
//! - Rename mode on double click
//! - Lock and visibility toggles
//! - Drag-and-drop reordering
//!
//! ## Architecture
//!
//! The panel never mutates the scene itself. Every user intent is turned into
//! a [`LayerNotification`] and handed to the injected [`LayerNotifier`]; the
//! editor applies it to the scene and rebuilds the box.
//!
//! Rows are stored in an arena owned by [`LayerBox`]. Visual slots refer to
//! rows by [`RowId`], so reordering only rebinds slots.

pub mod drag;
pub mod input_filter;
pub mod layer;
pub mod layer_box;
pub mod notification;
pub mod row;
pub mod ui;

pub use drag::DragState;
pub use layer::{LayerError, LayerItem, Result};
pub use layer_box::LayerBox;
pub use notification::{LayerNotification, LayerNotifier};
pub use row::{LayerRow, NameField, RowId, RowSlot, RowTint};
