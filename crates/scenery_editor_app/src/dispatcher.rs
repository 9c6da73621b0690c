// SPDX-License-Identifier: MIT OR Apache-2.0
//! Notification dispatch between panels and the command handler.
//!
//! Panels get a cloned [`Dispatcher`] at construction time and post to it
//! while the UI runs. The app drains the queue once per frame, after the UI
//! pass, so every handler runs to completion before the next input event.

use parking_lot::Mutex;
use scenery_editor_layers::{LayerNotification, LayerNotifier};
use scenery_editor_properties::{PropertiesCommand, PropertiesNotifier};
use std::collections::VecDeque;
use std::sync::Arc;

/// Anything a panel can post
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Posted by the layer box
    Layer(LayerNotification),
    /// Posted by a property mediator
    Properties(PropertiesCommand),
}

/// Shared notification queue
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    queue: Arc<Mutex<VecDeque<Notification>>>,
}

impl Dispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notification
    pub fn send(&self, notification: Notification) {
        self.queue.lock().push_back(notification);
    }

    /// Take every queued notification in posting order
    pub fn drain(&self) -> Vec<Notification> {
        self.queue.lock().drain(..).collect()
    }

    /// Number of queued notifications
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}

impl LayerNotifier for Dispatcher {
    fn notify(&self, notification: LayerNotification) {
        tracing::debug!("Layer notification: {}", notification.name());
        self.send(Notification::Layer(notification));
    }
}

impl PropertiesNotifier for Dispatcher {
    fn notify(&self, command: PropertiesCommand) {
        tracing::debug!("Properties command: {:?}", command);
        self.send(Notification::Properties(command));
    }
}
