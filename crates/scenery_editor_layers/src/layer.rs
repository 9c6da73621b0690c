// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layer data bound to panel rows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Layer panel errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayerError {
    /// Logical layer index outside the list
    #[error("Layer index {index} out of range (count {count})")]
    IndexOutOfRange {
        /// Requested bottom-up index
        index: usize,
        /// Number of rows in the box
        count: usize,
    },

    /// Visual slot outside the list
    #[error("Slot {position} out of range (count {count})")]
    SlotOutOfRange {
        /// Requested top-down position
        position: usize,
        /// Number of rows in the box
        count: usize,
    },
}

/// Result type for layer panel operations
pub type Result<T> = std::result::Result<T, LayerError>;

/// A scene layer as stored in the scene document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerItem {
    /// Layer name, unique within a scene
    pub name: String,
    /// Locked layers can't be renamed or edited in the viewport
    pub locked: bool,
    /// Hidden layers are not drawn
    pub visible: bool,
}

impl LayerItem {
    /// Create an unlocked, visible layer
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locked: false,
            visible: true,
        }
    }

    /// Set the locked flag
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Set the visible flag
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

impl Default for LayerItem {
    fn default() -> Self {
        Self::new("Default")
    }
}
