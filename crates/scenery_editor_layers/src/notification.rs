// SPDX-License-Identifier: MIT OR Apache-2.0
//! Notifications emitted by the layer box.

use crate::layer::LayerItem;

/// A user intent raised by the layer box.
///
/// The box only reports; the receiver owns the scene and decides what
/// actually happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerNotification {
    /// A row was clicked; carries the row's bound layer
    RowClicked(LayerItem),
    /// The "new layer" button was pressed
    CreateLayer,
    /// The "delete layer" button was pressed
    DeleteLayer,
    /// A rename was committed from the name field
    RenameLayer {
        /// Name before the edit
        from: String,
        /// Filtered name typed by the user
        to: String,
    },
    /// Lock button switched on
    LockLayer(LayerItem),
    /// Lock button switched off
    UnlockLayer(LayerItem),
    /// Visibility button switched on (layer hidden)
    HideLayer(LayerItem),
    /// Visibility button switched off (layer shown)
    UnhideLayer(LayerItem),
    /// Two rows were swapped by drag and drop
    LayersSwapped {
        /// Name of the dragged layer
        source: String,
        /// Name of the layer it was dropped on
        target: String,
    },
}

impl LayerNotification {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::RowClicked(_) => "layer_row_clicked",
            Self::CreateLayer => "create_new_layer",
            Self::DeleteLayer => "delete_layer",
            Self::RenameLayer { .. } => "change_layer_name",
            Self::LockLayer(_) => "lock_layer",
            Self::UnlockLayer(_) => "unlock_layer",
            Self::HideLayer(_) => "hide_layer",
            Self::UnhideLayer(_) => "unhide_layer",
            Self::LayersSwapped { .. } => "layer_dropped",
        }
    }
}

/// Sink for layer notifications.
///
/// Fire-and-forget: implementations queue or apply the notification and
/// never report back to the box.
pub trait LayerNotifier {
    /// Deliver a notification
    fn notify(&self, notification: LayerNotification);
}

impl<T: LayerNotifier + ?Sized> LayerNotifier for &T {
    fn notify(&self, notification: LayerNotification) {
        (**self).notify(notification);
    }
}
