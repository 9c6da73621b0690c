// SPDX-License-Identifier: MIT OR Apache-2.0
//! Commands raised by property mediators.

use crate::component::EntityId;
use serde::{Deserialize, Serialize};

/// Spine fields a property edit can change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpineData {
    /// Animation to play
    pub current_animation_name: String,
}

/// Payload of [`PropertiesCommand::UpdateSpineAnimationData`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSpineData {
    /// Entity owning the Spine component
    pub entity: EntityId,
    /// New component data
    pub data: SpineData,
}

/// A command for the editor to apply to the scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertiesCommand {
    /// Update the Spine component of an entity
    UpdateSpineAnimationData(UpdateSpineData),
}

/// Sink for property commands
pub trait PropertiesNotifier {
    /// Deliver a command
    fn notify(&self, command: PropertiesCommand);
}

impl<T: PropertiesNotifier + ?Sized> PropertiesNotifier for &T {
    fn notify(&self, command: PropertiesCommand) {
        (**self).notify(command);
    }
}
