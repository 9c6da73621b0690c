// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor state management.
//!
//! This module contains the scene document (layers and entities) and the
//! editor-side state around it: current layer, selected entity, file path.

use indexmap::IndexMap;
use scenery_editor_layers::LayerItem;
use scenery_editor_properties::{ComponentLookup, EntityId, SpineAnimation, SpineComponent};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Scene file errors
#[derive(Debug, Error)]
pub enum SceneError {
    /// IO error
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialize(#[from] ron::error::SpannedError),
}

/// An entity placed in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntity {
    /// Display name
    pub name: String,
    /// Name of the layer the entity lives on
    pub layer: String,
    /// Skeletal animation, if the entity is a Spine actor
    pub spine: Option<SpineComponent>,
}

impl SceneEntity {
    /// Create an entity on `layer`
    pub fn new(name: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layer: layer.into(),
            spine: None,
        }
    }

    /// Attach a Spine component
    pub fn with_spine(mut self, spine: SpineComponent) -> Self {
        self.spine = Some(spine);
        self
    }
}

/// Scene document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneData {
    /// Layers from bottom to top
    pub layers: Vec<LayerItem>,
    /// All entities in the scene
    pub entities: IndexMap<EntityId, SceneEntity>,
}

impl SceneData {
    /// Create a scene with a single default layer
    pub fn new() -> Self {
        Self {
            layers: vec![LayerItem::default()],
            entities: IndexMap::new(),
        }
    }

    /// Bottom-up index of the layer called `name`
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.name == name)
    }

    /// Look up a layer by name
    pub fn layer(&self, name: &str) -> Option<&LayerItem> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    /// Look up a layer by name for editing
    pub fn layer_mut(&mut self, name: &str) -> Option<&mut LayerItem> {
        self.layers.iter_mut().find(|layer| layer.name == name)
    }

    /// Add an entity to the scene
    pub fn add_entity(&mut self, entity: SceneEntity) -> EntityId {
        let id = EntityId::new();
        self.entities.insert(id, entity);
        id
    }

    /// Get an entity by ID
    pub fn get(&self, id: &EntityId) -> Option<&SceneEntity> {
        self.entities.get(id)
    }

    /// Get a mutable reference to an entity by ID
    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut SceneEntity> {
        self.entities.get_mut(id)
    }

    /// Parse a scene from RON text
    pub fn from_ron(text: &str) -> Result<Self, SceneError> {
        Ok(ron::from_str(text)?)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, SceneError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}

impl ComponentLookup for SceneData {
    fn spine_component(&self, entity: EntityId) -> Option<&SpineComponent> {
        self.entities.get(&entity).and_then(|e| e.spine.as_ref())
    }
}

/// Main editor state
pub struct EditorState {
    /// Scene data
    pub scene: SceneData,
    /// Layer new entities go to, and the one the layer box highlights
    pub current_layer: Option<String>,
    /// Entity shown in the properties panel
    pub selected_entity: Option<EntityId>,
    /// Current scene file path
    pub scene_path: Option<PathBuf>,
    /// Whether the scene has unsaved changes
    pub dirty: bool,
}

impl EditorState {
    /// Create an editor state around a sample scene
    pub fn new() -> Self {
        let mut scene = SceneData {
            layers: vec![
                LayerItem::new("Background"),
                LayerItem::new("Default"),
                LayerItem::new("Foreground"),
            ],
            entities: IndexMap::new(),
        };
        scene.add_entity(SceneEntity::new("Sky", "Background"));
        let hero = scene.add_entity(
            SceneEntity::new("Hero", "Default").with_spine(SpineComponent::new(
                "hero",
                vec![
                    SpineAnimation::new("idle", 1.2),
                    SpineAnimation::new("run", 0.8),
                    SpineAnimation::new("jump", 0.6),
                ],
            )),
        );

        let mut state = Self::with_scene(scene);
        state.selected_entity = Some(hero);
        state.current_layer = Some("Default".to_string());
        state
    }

    /// Create an editor state for `scene`, current layer at the top
    pub fn with_scene(scene: SceneData) -> Self {
        let current_layer = scene.layers.last().map(|layer| layer.name.clone());
        Self {
            scene,
            current_layer,
            selected_entity: None,
            scene_path: None,
            dirty: false,
        }
    }

    /// Bottom-up index of the current layer
    pub fn current_layer_index(&self) -> Option<usize> {
        self.current_layer
            .as_deref()
            .and_then(|name| self.scene.layer_index(name))
    }

    /// Save the scene to `path`
    pub fn save_scene_to_path(&mut self, path: &Path) -> Result<(), SceneError> {
        std::fs::write(path, self.scene.to_ron()?)?;
        self.scene_path = Some(path.to_path_buf());
        self.dirty = false;
        tracing::info!("Saved scene to {:?}", path);
        Ok(())
    }

    /// Load a scene from `path`
    pub fn load_scene(&mut self, path: &Path) -> Result<(), SceneError> {
        let content = std::fs::read_to_string(path)?;
        let scene = SceneData::from_ron(&content)?;

        *self = Self::with_scene(scene);
        self.scene_path = Some(path.to_path_buf());
        tracing::info!("Loaded scene from {:?}", path);
        Ok(())
    }

    /// Mark the scene as modified
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}
