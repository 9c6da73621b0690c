// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor commands applied in response to panel notifications.
//!
//! Panels only describe what the user asked for. This module owns the rules:
//! which names are valid, which layer a new one goes above, what a swap does
//! to the scene order.

use crate::dispatcher::Notification;
use crate::state::EditorState;
use scenery_editor_layers::{LayerBox, LayerItem, LayerNotification, LayerNotifier};
use scenery_editor_properties::{EntityId, PropertiesCommand, UpdateSpineData};

/// Error type for command execution
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    /// Layer not found
    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    /// Another layer already uses the name
    #[error("Layer name already in use: {0}")]
    DuplicateLayerName(String),

    /// Name is empty or has characters outside [A-Za-z0-9]
    #[error("Invalid layer name: {0:?}")]
    InvalidLayerName(String),

    /// A scene keeps at least one layer
    #[error("Cannot delete the last layer")]
    LastLayer,

    /// No layer is current
    #[error("No layer selected")]
    NoCurrentLayer,

    /// Entity not found
    #[error("Entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Entity lacks a Spine component
    #[error("Entity {0:?} has no Spine component")]
    MissingSpine(EntityId),

    /// Spine skeleton has no such animation
    #[error("Unknown animation: {0}")]
    UnknownAnimation(String),
}

/// Result type for command execution
pub type Result<T> = std::result::Result<T, CommandError>;

/// Which views must be rebuilt after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Refresh {
    /// Rebuild the layer box from the scene
    pub layers: bool,
    /// Pull the selected entity into the properties panel again
    pub properties: bool,
}

impl Refresh {
    /// Nothing to rebuild
    pub const NONE: Self = Self {
        layers: false,
        properties: false,
    };
    /// Rebuild the layer box
    pub const LAYERS: Self = Self {
        layers: true,
        properties: false,
    };
    /// Rebuild the properties panel
    pub const PROPERTIES: Self = Self {
        layers: false,
        properties: true,
    };

    /// Combine two refresh requests
    pub fn union(self, other: Self) -> Self {
        Self {
            layers: self.layers || other.layers,
            properties: self.properties || other.properties,
        }
    }
}

/// Applies notifications to the editor state
#[derive(Debug, Clone)]
pub struct CommandHandler {
    new_layer_prefix: String,
}

impl CommandHandler {
    /// Create a handler naming new layers `{prefix}{n}`
    pub fn new(new_layer_prefix: impl Into<String>) -> Self {
        Self {
            new_layer_prefix: new_layer_prefix.into(),
        }
    }

    /// Apply one notification
    pub fn handle(&self, state: &mut EditorState, notification: Notification) -> Result<Refresh> {
        match notification {
            Notification::Layer(notification) => self.handle_layer(state, notification),
            Notification::Properties(command) => self.handle_properties(state, command),
        }
    }

    fn handle_layer(&self, state: &mut EditorState, notification: LayerNotification) -> Result<Refresh> {
        match notification {
            LayerNotification::RowClicked(item) => {
                if state.scene.layer(&item.name).is_none() {
                    return Err(CommandError::LayerNotFound(item.name));
                }
                state.current_layer = Some(item.name);
                Ok(Refresh::NONE)
            }
            LayerNotification::CreateLayer => self.create_layer(state).map(|_| Refresh::LAYERS),
            LayerNotification::DeleteLayer => delete_current_layer(state).map(|_| Refresh::LAYERS),
            LayerNotification::RenameLayer { from, to } => {
                rename_layer(state, &from, &to).map(|()| Refresh::LAYERS)
            }
            LayerNotification::LockLayer(item) => set_locked(state, &item, true),
            LayerNotification::UnlockLayer(item) => set_locked(state, &item, false),
            LayerNotification::HideLayer(item) => set_visible(state, &item, false),
            LayerNotification::UnhideLayer(item) => set_visible(state, &item, true),
            LayerNotification::LayersSwapped { source, target } => {
                swap_layers(state, &source, &target).map(|()| Refresh::LAYERS)
            }
        }
    }

    fn handle_properties(&self, state: &mut EditorState, command: PropertiesCommand) -> Result<Refresh> {
        match command {
            PropertiesCommand::UpdateSpineAnimationData(payload) => {
                update_spine_data(state, payload).map(|()| Refresh::PROPERTIES)
            }
        }
    }

    /// Insert a new layer above the current one and make it current
    pub fn create_layer(&self, state: &mut EditorState) -> Result<String> {
        let name = (1u32..)
            .map(|n| format!("{}{}", self.new_layer_prefix, n))
            .find(|name| state.scene.layer(name).is_none())
            .ok_or(CommandError::InvalidLayerName(self.new_layer_prefix.clone()))?;

        let index = state
            .current_layer_index()
            .map_or(state.scene.layers.len(), |index| index + 1);
        state.scene.layers.insert(index, LayerItem::new(name.clone()));
        state.current_layer = Some(name.clone());
        state.mark_dirty();
        tracing::info!("Created layer '{}' at index {}", name, index);
        Ok(name)
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new("layer")
    }
}

/// Remove the current layer and every entity on it
pub fn delete_current_layer(state: &mut EditorState) -> Result<LayerItem> {
    let index = state.current_layer_index().ok_or(CommandError::NoCurrentLayer)?;
    if state.scene.layers.len() == 1 {
        return Err(CommandError::LastLayer);
    }

    let removed = state.scene.layers.remove(index);
    state.scene.entities.retain(|_, entity| entity.layer != removed.name);
    if state
        .selected_entity
        .is_some_and(|id| !state.scene.entities.contains_key(&id))
    {
        state.selected_entity = None;
    }

    let below = index.saturating_sub(1);
    state.current_layer = state.scene.layers.get(below).map(|layer| layer.name.clone());
    state.mark_dirty();
    tracing::info!("Deleted layer '{}'", removed.name);
    Ok(removed)
}

/// Rename layer `from` to `to`, moving its entities along
pub fn rename_layer(state: &mut EditorState, from: &str, to: &str) -> Result<()> {
    if to.is_empty() || !to.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CommandError::InvalidLayerName(to.to_string()));
    }
    if from == to {
        return Ok(());
    }
    if state.scene.layer(to).is_some() {
        return Err(CommandError::DuplicateLayerName(to.to_string()));
    }

    let layer = state
        .scene
        .layer_mut(from)
        .ok_or_else(|| CommandError::LayerNotFound(from.to_string()))?;
    layer.name = to.to_string();

    for entity in state.scene.entities.values_mut() {
        if entity.layer == from {
            entity.layer = to.to_string();
        }
    }
    if state.current_layer.as_deref() == Some(from) {
        state.current_layer = Some(to.to_string());
    }
    state.mark_dirty();
    tracing::info!("Renamed layer '{}' to '{}'", from, to);
    Ok(())
}

/// Exchange the positions of two layers in the scene order
pub fn swap_layers(state: &mut EditorState, source: &str, target: &str) -> Result<()> {
    let source_index = state
        .scene
        .layer_index(source)
        .ok_or_else(|| CommandError::LayerNotFound(source.to_string()))?;
    let target_index = state
        .scene
        .layer_index(target)
        .ok_or_else(|| CommandError::LayerNotFound(target.to_string()))?;

    state.scene.layers.swap(source_index, target_index);
    state.mark_dirty();
    tracing::info!("Swapped layers '{}' and '{}'", source, target);
    Ok(())
}

fn set_locked(state: &mut EditorState, item: &LayerItem, locked: bool) -> Result<Refresh> {
    let layer = state
        .scene
        .layer_mut(&item.name)
        .ok_or_else(|| CommandError::LayerNotFound(item.name.clone()))?;
    layer.locked = locked;
    state.mark_dirty();
    Ok(Refresh::LAYERS)
}

fn set_visible(state: &mut EditorState, item: &LayerItem, visible: bool) -> Result<Refresh> {
    let layer = state
        .scene
        .layer_mut(&item.name)
        .ok_or_else(|| CommandError::LayerNotFound(item.name.clone()))?;
    layer.visible = visible;
    state.mark_dirty();
    Ok(Refresh::LAYERS)
}

fn update_spine_data(state: &mut EditorState, payload: UpdateSpineData) -> Result<()> {
    let entity = state
        .scene
        .get_mut(&payload.entity)
        .ok_or(CommandError::EntityNotFound(payload.entity))?;
    let spine = entity
        .spine
        .as_mut()
        .ok_or(CommandError::MissingSpine(payload.entity))?;

    let name = payload.data.current_animation_name;
    if spine.find_animation(&name).is_none() {
        return Err(CommandError::UnknownAnimation(name));
    }
    spine.current_animation_name = name;
    state.mark_dirty();
    Ok(())
}

/// Rebuild `layer_box` from the scene, top layer first
pub fn rebuild_layer_box<N: LayerNotifier>(layer_box: &mut LayerBox<N>, state: &EditorState) {
    layer_box.clear_all();
    for layer in state.scene.layers.iter().rev() {
        layer_box.add_layer(layer.clone());
    }
    if let Err(e) = layer_box.select(state.current_layer_index()) {
        tracing::warn!("Failed to restore layer selection: {}", e);
    }
}
