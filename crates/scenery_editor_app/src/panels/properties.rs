// SPDX-License-Identifier: MIT OR Apache-2.0
//! Properties panel - Item properties of the selected entity.

use crate::dispatcher::Dispatcher;
use crate::state::EditorState;
use scenery_editor_properties::{EntityId, ItemPropertiesMediator, SpineAnimationPropertiesMediator};

/// The properties panel
pub struct PropertiesPanel {
    spine: SpineAnimationPropertiesMediator<Dispatcher>,
}

impl PropertiesPanel {
    /// Create a panel posting its edits to `dispatcher`
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            spine: SpineAnimationPropertiesMediator::new(dispatcher),
        }
    }

    /// Pull the selected entity's data into the views
    pub fn refresh(&mut self, state: &EditorState) {
        let Some(entity) = state.selected_entity else {
            return;
        };
        if state.scene.get(&entity).is_some_and(|e| e.spine.is_some()) {
            if let Err(e) = self.spine.pull_from_model(entity, &state.scene) {
                tracing::warn!("Failed to show Spine properties: {}", e);
            }
        }
    }

    /// Render the properties panel
    pub fn ui(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        self.entity_picker(ui, state);
        ui.separator();

        let Some(entity_id) = state.selected_entity else {
            ui.centered_and_justified(|ui| {
                ui.label("No entity selected");
            });
            return;
        };
        let Some(entity) = state.scene.get(&entity_id) else {
            return;
        };

        ui.label(format!("Layer: {}", entity.layer));
        match &entity.spine {
            Some(spine) => {
                egui::CollapsingHeader::new("Spine Animation")
                    .default_open(true)
                    .show(ui, |ui| {
                        ui.label(format!("Skeleton: {}", spine.skeleton));
                        if self.spine.view_mut().ui(ui) {
                            if let Err(e) = self.spine.push_to_model() {
                                tracing::warn!("Failed to update Spine animation: {}", e);
                            }
                        }
                    });
            }
            None => {
                ui.weak("No editable components");
            }
        }
    }

    fn entity_picker(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        let selected_name = state
            .selected_entity
            .and_then(|id| state.scene.get(&id))
            .map_or("(none)", |e| e.name.as_str())
            .to_string();

        let mut picked: Option<EntityId> = None;
        egui::ComboBox::from_id_salt("properties_entity")
            .selected_text(selected_name)
            .show_ui(ui, |ui| {
                for (id, entity) in &state.scene.entities {
                    let is_selected = state.selected_entity == Some(*id);
                    if ui.selectable_label(is_selected, &entity.name).clicked() {
                        picked = Some(*id);
                    }
                }
            });

        if let Some(id) = picked {
            if state.selected_entity != Some(id) {
                state.selected_entity = Some(id);
                self.refresh(state);
            }
        }
    }
}
