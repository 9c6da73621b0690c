// SPDX-License-Identifier: MIT OR Apache-2.0
//! Item property mediators for Scenery Editor.
//!
//! A mediator sits between a properties view and the scene: it pulls a
//! component's state into the view when an item is selected, and turns view
//! edits back into commands for the editor.
//!
//! ## Architecture
//!
//! - [`ComponentLookup`] retrieves components by entity id
//! - [`PropertiesNotifier`] receives the resulting [`PropertiesCommand`]s
//! - [`SpineAnimationPropertiesMediator`] binds a Spine component to
//!   [`SpineAnimationProperties`]

pub mod command;
pub mod component;
pub mod mediator;
pub mod view;

pub use command::{PropertiesCommand, PropertiesNotifier, SpineData, UpdateSpineData};
pub use component::{ComponentLookup, EntityId, SpineAnimation, SpineComponent};
pub use mediator::{ItemPropertiesMediator, PropertiesError, Result, SpineAnimationPropertiesMediator};
pub use view::SpineAnimationProperties;
