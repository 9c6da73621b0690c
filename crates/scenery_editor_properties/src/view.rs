// SPDX-License-Identifier: MIT OR Apache-2.0
//! Spine animation properties view.

/// View state for choosing a Spine animation
#[derive(Debug, Clone, Default)]
pub struct SpineAnimationProperties {
    animations: Vec<String>,
    selected: Option<usize>,
}

impl SpineAnimationProperties {
    /// Create an empty view
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the animation list. Keeps the selection if the name survives.
    pub fn set_animations(&mut self, animations: Vec<String>) {
        let previous = self.selected().map(str::to_string);
        self.animations = animations;
        self.selected = previous.and_then(|name| self.position(&name));
    }

    /// Animation names offered to the user
    pub fn animations(&self) -> &[String] {
        &self.animations
    }

    /// Select `name`. Names outside the list clear the selection.
    pub fn set_selected_animation(&mut self, name: &str) {
        self.selected = self.position(name);
    }

    /// Currently selected animation name
    pub fn selected(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.animations.get(index))
            .map(String::as_str)
    }

    /// Render the view. Returns `true` when the user picked another animation.
    pub fn ui(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.label("Animation:");
            if self.animations.is_empty() {
                ui.weak("(none)");
                return;
            }

            let mut selected = self.selected.unwrap_or(0);
            let animations = &self.animations;
            let response = egui::ComboBox::from_id_salt("spine_animation").show_index(
                ui,
                &mut selected,
                animations.len(),
                |i| animations[i].clone(),
            );
            if response.changed() {
                self.selected = Some(selected);
                changed = true;
            }
        });

        changed
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.animations.iter().position(|a| a == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_limited_to_list() {
        let mut view = SpineAnimationProperties::new();
        view.set_animations(vec!["idle".to_string(), "run".to_string()]);
        view.set_selected_animation("run");
        assert_eq!(view.selected(), Some("run"));

        view.set_selected_animation("jump");
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn test_selection_survives_relist() {
        let mut view = SpineAnimationProperties::new();
        view.set_animations(vec!["idle".to_string(), "run".to_string()]);
        view.set_selected_animation("run");

        view.set_animations(vec!["run".to_string(), "walk".to_string()]);
        assert_eq!(view.selected(), Some("run"));

        view.set_animations(vec!["walk".to_string()]);
        assert_eq!(view.selected(), None);
    }
}
