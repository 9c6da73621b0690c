// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene components read by the property mediators.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for scene entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// A named animation in a Spine skeleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineAnimation {
    /// Animation name
    pub name: String,
    /// Duration in seconds
    pub duration: f32,
}

impl SpineAnimation {
    /// Create an animation
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Skeletal animation component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpineComponent {
    /// Skeleton asset name
    pub skeleton: String,
    /// Animations in skeleton order
    pub animations: Vec<SpineAnimation>,
    /// Animation currently playing
    pub current_animation_name: String,
}

impl SpineComponent {
    /// Create a component playing the first of `animations`
    pub fn new(skeleton: impl Into<String>, animations: Vec<SpineAnimation>) -> Self {
        let current_animation_name = animations
            .first()
            .map(|animation| animation.name.clone())
            .unwrap_or_default();
        Self {
            skeleton: skeleton.into(),
            animations,
            current_animation_name,
        }
    }

    /// Animation names in skeleton order
    pub fn animation_names(&self) -> Vec<String> {
        self.animations.iter().map(|a| a.name.clone()).collect()
    }

    /// Look up an animation by name
    pub fn find_animation(&self, name: &str) -> Option<&SpineAnimation> {
        self.animations.iter().find(|a| a.name == name)
    }
}

/// Component retrieval by entity id
pub trait ComponentLookup {
    /// Spine component of `entity`, if it has one
    fn spine_component(&self, entity: EntityId) -> Option<&SpineComponent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_component_plays_first_animation() {
        let spine = SpineComponent::new(
            "hero",
            vec![SpineAnimation::new("idle", 1.0), SpineAnimation::new("run", 0.6)],
        );
        assert_eq!(spine.current_animation_name, "idle");
        assert_eq!(spine.animation_names(), vec!["idle", "run"]);
        assert_eq!(spine.find_animation("run").map(|a| a.duration), Some(0.6));
        assert!(spine.find_animation("jump").is_none());
    }

    #[test]
    fn test_empty_component() {
        let spine = SpineComponent::new("empty", Vec::new());
        assert!(spine.current_animation_name.is_empty());
    }
}
