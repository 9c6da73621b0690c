// SPDX-License-Identifier: MIT OR Apache-2.0
//! Mediators binding item components to property views.

use crate::command::{PropertiesCommand, PropertiesNotifier, SpineData, UpdateSpineData};
use crate::component::{ComponentLookup, EntityId};
use crate::view::SpineAnimationProperties;
use thiserror::Error;

/// Property mediator errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropertiesError {
    /// Entity lacks the component the mediator edits
    #[error("Entity {entity:?} has no {component} component")]
    MissingComponent {
        /// Entity that was looked up
        entity: EntityId,
        /// Component type name
        component: &'static str,
    },

    /// View pushed before any entity was pulled
    #[error("No entity is bound to the properties view")]
    NoObservedEntity,

    /// View has nothing selected
    #[error("No animation selected")]
    NothingSelected,
}

/// Result type for mediator operations
pub type Result<T> = std::result::Result<T, PropertiesError>;

/// Two-way binding between an item's data and a properties view
pub trait ItemPropertiesMediator {
    /// View type driven by this mediator
    type View;

    /// The mediated view
    fn view(&self) -> &Self::View;

    /// Mutable access to the mediated view
    fn view_mut(&mut self) -> &mut Self::View;

    /// Entity whose data is shown, once pulled
    fn observed_entity(&self) -> Option<EntityId>;

    /// Copy the entity's component data into the view
    fn translate_observable_data_to_view(
        &mut self,
        entity: EntityId,
        lookup: &dyn ComponentLookup,
    ) -> Result<()>;

    /// Turn the view's state into an update command
    fn translate_view_to_item_data(&mut self) -> Result<()>;
}

/// Mediator for the Spine animation selector
pub struct SpineAnimationPropertiesMediator<N> {
    notifier: N,
    view: SpineAnimationProperties,
    observed: Option<EntityId>,
}

impl<N: PropertiesNotifier> SpineAnimationPropertiesMediator<N> {
    /// Create a mediator with an empty view
    pub fn new(notifier: N) -> Self {
        Self {
            notifier,
            view: SpineAnimationProperties::new(),
            observed: None,
        }
    }

    /// The injected command sink
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Show the Spine animations of `entity`
    pub fn pull_from_model(&mut self, entity: EntityId, lookup: &dyn ComponentLookup) -> Result<()> {
        self.translate_observable_data_to_view(entity, lookup)
    }

    /// Send the view's selected animation to the editor
    pub fn push_to_model(&mut self) -> Result<()> {
        self.translate_view_to_item_data()
    }
}

impl<N: PropertiesNotifier> ItemPropertiesMediator for SpineAnimationPropertiesMediator<N> {
    type View = SpineAnimationProperties;

    fn view(&self) -> &Self::View {
        &self.view
    }

    fn view_mut(&mut self) -> &mut Self::View {
        &mut self.view
    }

    fn observed_entity(&self) -> Option<EntityId> {
        self.observed
    }

    fn translate_observable_data_to_view(
        &mut self,
        entity: EntityId,
        lookup: &dyn ComponentLookup,
    ) -> Result<()> {
        let spine = lookup
            .spine_component(entity)
            .ok_or(PropertiesError::MissingComponent {
                entity,
                component: "Spine",
            })?;

        self.observed = Some(entity);
        self.view.set_animations(spine.animation_names());
        self.view.set_selected_animation(&spine.current_animation_name);
        tracing::trace!(
            "Pulled {} Spine animations for {:?}",
            spine.animations.len(),
            entity
        );
        Ok(())
    }

    fn translate_view_to_item_data(&mut self) -> Result<()> {
        let entity = self.observed.ok_or(PropertiesError::NoObservedEntity)?;
        let current_animation_name = self
            .view
            .selected()
            .ok_or(PropertiesError::NothingSelected)?
            .to_string();

        self.notifier
            .notify(PropertiesCommand::UpdateSpineAnimationData(UpdateSpineData {
                entity,
                data: SpineData {
                    current_animation_name,
                },
            }));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{SpineAnimation, SpineComponent};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: RefCell<Vec<PropertiesCommand>>,
    }

    impl PropertiesNotifier for RecordingNotifier {
        fn notify(&self, command: PropertiesCommand) {
            self.sent.borrow_mut().push(command);
        }
    }

    #[derive(Default)]
    struct Components(HashMap<EntityId, SpineComponent>);

    impl ComponentLookup for Components {
        fn spine_component(&self, entity: EntityId) -> Option<&SpineComponent> {
            self.0.get(&entity)
        }
    }

    fn hero() -> (EntityId, Components) {
        let entity = EntityId::new();
        let mut components = Components::default();
        components.0.insert(
            entity,
            SpineComponent::new(
                "hero",
                vec![SpineAnimation::new("idle", 1.0), SpineAnimation::new("run", 0.5)],
            ),
        );
        (entity, components)
    }

    #[test]
    fn test_pull_fills_view() {
        let (entity, components) = hero();
        let mut mediator = SpineAnimationPropertiesMediator::new(RecordingNotifier::default());
        mediator.pull_from_model(entity, &components).unwrap();

        assert_eq!(mediator.view().animations(), ["idle", "run"]);
        assert_eq!(mediator.view().selected(), Some("idle"));
        assert_eq!(mediator.observed_entity(), Some(entity));
    }

    #[test]
    fn test_push_sends_selected_animation() {
        let (entity, components) = hero();
        let mut mediator = SpineAnimationPropertiesMediator::new(RecordingNotifier::default());
        mediator.pull_from_model(entity, &components).unwrap();
        mediator.view_mut().set_selected_animation("run");
        mediator.push_to_model().unwrap();

        assert_eq!(
            mediator.notifier().sent.take(),
            vec![PropertiesCommand::UpdateSpineAnimationData(UpdateSpineData {
                entity,
                data: SpineData {
                    current_animation_name: "run".to_string(),
                },
            })]
        );
    }

    #[test]
    fn test_missing_component() {
        let (_, components) = hero();
        let stranger = EntityId::new();
        let mut mediator = SpineAnimationPropertiesMediator::new(RecordingNotifier::default());

        assert_eq!(
            mediator.pull_from_model(stranger, &components),
            Err(PropertiesError::MissingComponent {
                entity: stranger,
                component: "Spine",
            })
        );
        assert_eq!(mediator.observed_entity(), None);
    }

    #[test]
    fn test_push_without_selection() {
        let entity = EntityId::new();
        let mut components = Components::default();
        let mut spine = SpineComponent::new("bat", vec![SpineAnimation::new("fly", 0.4)]);
        spine.current_animation_name = "dance".to_string();
        components.0.insert(entity, spine);

        let mut mediator = SpineAnimationPropertiesMediator::new(RecordingNotifier::default());
        mediator.pull_from_model(entity, &components).unwrap();
        assert_eq!(mediator.view().selected(), None);

        assert_eq!(mediator.push_to_model(), Err(PropertiesError::NothingSelected));
        assert!(mediator.notifier().sent.borrow().is_empty());
    }

    #[test]
    fn test_push_before_pull() {
        let mut mediator = SpineAnimationPropertiesMediator::new(RecordingNotifier::default());
        assert_eq!(mediator.push_to_model(), Err(PropertiesError::NoObservedEntity));
        assert!(mediator.notifier().sent.borrow().is_empty());
    }
}
