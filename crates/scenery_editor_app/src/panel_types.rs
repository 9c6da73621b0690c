// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared panel type definitions.

/// Panel types that can be docked in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelType {
    /// Scene layers
    Layers,
    /// Item properties of the selected entity
    Properties,
    /// Console/log output
    Console,
}

impl PanelType {
    /// Get the display name for this panel type
    pub fn name(&self) -> &'static str {
        match self {
            Self::Layers => "Layers",
            Self::Properties => "Properties",
            Self::Console => "Console",
        }
    }

    /// Get the icon for this panel type
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Layers => "\u{1f5c2}",     // dividers
            Self::Properties => "\u{2699}",  // cog
            Self::Console => "\u{1f4bb}",    // terminal
        }
    }
}
