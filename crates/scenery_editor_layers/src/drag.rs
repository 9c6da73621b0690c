// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drag-and-drop reordering of layer rows.
//!
//! Dropping a row on another swaps which rows the two slots display. The
//! slot order never changes; the scene applies the real reorder when it
//! receives [`LayerNotification::LayersSwapped`].

use crate::layer::Result;
use crate::layer_box::LayerBox;
use crate::notification::{LayerNotification, LayerNotifier};
use crate::row::{RowId, RowTint};

/// Drag operation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// Not dragging
    #[default]
    Idle,
    /// Dragging a row
    Dragging {
        /// Row being dragged
        source: RowId,
        /// Slot the row was picked up from
        source_slot: usize,
        /// Accepted slot under the pointer
        target: Option<usize>,
    },
}

impl<N: LayerNotifier> LayerBox<N> {
    /// Current drag state
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Start dragging the row at visual `position`.
    ///
    /// Returns `false` when the row is being renamed and can't be dragged.
    pub fn drag_start(&mut self, position: usize) -> Result<bool> {
        let source = self.slot(position)?.row;
        if self.drag != DragState::Idle {
            self.cancel_drag();
        }
        if !self.rows[source.0].draggable {
            return Ok(false);
        }

        self.slots[position].tint = RowTint::Dragged;
        self.drag = DragState::Dragging {
            source,
            source_slot: position,
            target: None,
        };
        tracing::trace!("Drag started on '{}'", self.rows[source.0].layer_name());
        Ok(true)
    }

    /// Move the pointer over the row at visual `position`.
    ///
    /// Returns whether that row would accept the drop. A row bound to the
    /// same layer name as the dragged one never does.
    pub fn drag_over(&mut self, position: usize) -> Result<bool> {
        let target_row = self.slot(position)?.row;
        let DragState::Dragging { source, target, .. } = self.drag else {
            return Ok(false);
        };
        if target == Some(position) {
            return Ok(true);
        }
        if let Some(previous) = target {
            self.drag_leave(previous);
        }
        if !self.accepts(source, target_row) {
            return Ok(false);
        }

        self.slots[position].tint = RowTint::DropCandidate;
        if let DragState::Dragging { target, .. } = &mut self.drag {
            *target = Some(position);
        }
        Ok(true)
    }

    /// Move the pointer off the row at visual `position`
    pub fn drag_leave(&mut self, position: usize) {
        if let DragState::Dragging { target, .. } = &mut self.drag {
            if *target == Some(position) {
                *target = None;
                if let Some(slot) = self.slots.get_mut(position) {
                    slot.tint = RowTint::Normal;
                }
            }
        }
    }

    /// Release the dragged row over `target`, or over nothing.
    ///
    /// Returns whether a swap happened.
    pub fn drop(&mut self, target: Option<usize>) -> Result<bool> {
        let Some((source, source_slot)) = self.end_drag() else {
            return Ok(false);
        };

        let Some(target_slot) = target else {
            return Ok(false);
        };
        let target_row = self.slot(target_slot)?.row;
        if !self.accepts(source, target_row) {
            return Ok(false);
        }

        let target_selected = self.rows[target_row.0].selected;
        let source_selected = self.rows[source.0].selected;

        self.slots[source_slot].row = target_row;
        self.slots[target_slot].row = source;

        if target_selected {
            self.current_selected_index = Some(self.index_of_position(source_slot));
        } else if source_selected {
            self.current_selected_index = Some(self.index_of_position(target_slot));
        }

        let source_name = self.rows[source.0].item.name.clone();
        let target_name = self.rows[target_row.0].item.name.clone();
        tracing::debug!("Swapped layer rows '{}' and '{}'", source_name, target_name);
        self.notifier.notify(LayerNotification::LayersSwapped {
            source: source_name,
            target: target_name,
        });
        Ok(true)
    }

    /// Abort the drag without dropping
    pub fn cancel_drag(&mut self) {
        self.end_drag();
    }

    /// Leave the dragging state and clear every tint.
    ///
    /// Returns the dragged row and its slot, if a drag was running.
    fn end_drag(&mut self) -> Option<(RowId, usize)> {
        for slot in &mut self.slots {
            slot.tint = RowTint::Normal;
        }
        match std::mem::take(&mut self.drag) {
            DragState::Dragging {
                source,
                source_slot,
                ..
            } => Some((source, source_slot)),
            DragState::Idle => None,
        }
    }

    fn accepts(&self, source: RowId, target: RowId) -> bool {
        self.rows[source.0].item.name != self.rows[target.0].item.name
    }
}

#[cfg(test)]
mod tests {
    use crate::layer::LayerItem;
    use crate::layer_box::tests::layer_box;
    use crate::notification::LayerNotification;
    use crate::row::RowTint;

    fn names<N: crate::LayerNotifier>(layers: &crate::LayerBox<N>) -> Vec<String> {
        (0..layers.row_count())
            .map(|position| layers.row_at_slot(position).unwrap().layer_name().to_string())
            .collect()
    }

    fn tints<N: crate::LayerNotifier>(layers: &crate::LayerBox<N>) -> Vec<RowTint> {
        layers.slots().iter().map(|slot| slot.tint).collect()
    }

    #[test]
    fn test_drag_tints_source_and_candidate() {
        let mut layers = layer_box(&["x", "y", "z"]);
        assert!(layers.drag_start(0).unwrap());
        assert!(layers.drag_over(2).unwrap());
        assert_eq!(
            tints(&layers),
            vec![RowTint::Dragged, RowTint::Normal, RowTint::DropCandidate]
        );

        assert!(layers.drag_over(1).unwrap());
        assert_eq!(
            tints(&layers),
            vec![RowTint::Dragged, RowTint::DropCandidate, RowTint::Normal]
        );
    }

    #[test]
    fn test_swap_rebinds_rows() {
        let mut layers = layer_box(&["x", "y"]);
        let slot_rows: Vec<_> = layers.slots().iter().map(|slot| slot.row).collect();

        layers.drag_start(0).unwrap();
        layers.drag_over(1).unwrap();
        assert!(layers.drop(Some(1)).unwrap());

        assert_eq!(names(&layers), vec!["y", "x"]);
        assert_eq!(layers.slots()[0].row, slot_rows[1]);
        assert_eq!(layers.slots()[1].row, slot_rows[0]);
        // Rows keep their data; only the slots moved
        assert_eq!(layers.row(slot_rows[0]).unwrap().layer_name(), "x");
        assert_eq!(layers.row(slot_rows[1]).unwrap().layer_name(), "y");
        assert_eq!(tints(&layers), vec![RowTint::Normal; 2]);
        assert_eq!(
            layers.notifier().take(),
            vec![LayerNotification::LayersSwapped {
                source: "x".to_string(),
                target: "y".to_string(),
            }]
        );
    }

    #[test]
    fn test_payload_is_source_first() {
        let mut layers = layer_box(&["x", "y"]);
        layers.drag_start(1).unwrap();
        layers.drop(Some(0)).unwrap();
        assert_eq!(
            layers.notifier().take(),
            vec![LayerNotification::LayersSwapped {
                source: "y".to_string(),
                target: "x".to_string(),
            }]
        );
    }

    #[test]
    fn test_selection_follows_target() {
        let mut layers = layer_box(&["a", "b", "c"]);
        // "c" sits in the bottom slot
        layers.select(Some(0)).unwrap();

        layers.drag_start(0).unwrap();
        layers.drop(Some(2)).unwrap();

        assert_eq!(layers.current_selected_index(), Some(2));
        assert_eq!(layers.selected().unwrap().layer_name(), "c");
        assert!(layers.row_at_slot(0).unwrap().is_selected());
    }

    #[test]
    fn test_selection_follows_source() {
        let mut layers = layer_box(&["a", "b", "c"]);
        layers.select(Some(2)).unwrap();

        layers.drag_start(0).unwrap();
        layers.drop(Some(1)).unwrap();

        assert_eq!(layers.current_selected_index(), Some(1));
        assert_eq!(layers.selected().unwrap().layer_name(), "a");
    }

    #[test]
    fn test_selection_kept_when_neither_selected() {
        let mut layers = layer_box(&["a", "b", "c"]);
        layers.select(Some(1)).unwrap();

        layers.drag_start(0).unwrap();
        layers.drop(Some(2)).unwrap();

        assert_eq!(layers.current_selected_index(), Some(1));
        assert_eq!(layers.selected().unwrap().layer_name(), "b");
    }

    #[test]
    fn test_same_name_rejected() {
        let mut layers = layer_box(&["twin", "twin"]);
        let before = tints(&layers);

        layers.drag_start(0).unwrap();
        assert!(!layers.drag_over(1).unwrap());
        assert_eq!(tints(&layers)[1], RowTint::Normal);
        assert!(!layers.drop(Some(1)).unwrap());

        assert_eq!(tints(&layers), before);
        assert!(layers.notifier().take().is_empty());
    }

    #[test]
    fn test_drop_on_self_rejected() {
        let mut layers = layer_box(&["a", "b"]);
        layers.drag_start(1).unwrap();
        assert!(!layers.drag_over(1).unwrap());
        assert!(!layers.drop(Some(1)).unwrap());
        assert_eq!(names(&layers), vec!["a", "b"]);
    }

    #[test]
    fn test_cancel_restores_tints() {
        let mut layers = layer_box(&["a", "b"]);
        layers.drag_start(0).unwrap();
        layers.drag_over(1).unwrap();
        layers.cancel_drag();

        assert_eq!(tints(&layers), vec![RowTint::Normal; 2]);
        assert_eq!(layers.drag_state(), crate::DragState::Idle);
        assert!(layers.notifier().take().is_empty());
    }

    #[test]
    fn test_cancel_when_idle() {
        let mut layers = layer_box(&["a", "b"]);
        layers.cancel_drag();
        assert_eq!(layers.drag_state(), crate::DragState::Idle);
        assert!(!layers.drop(Some(1)).unwrap());
        assert!(layers.notifier().take().is_empty());
    }

    #[test]
    fn test_drop_on_nothing() {
        let mut layers = layer_box(&["a", "b"]);
        layers.drag_start(0).unwrap();
        assert!(!layers.drop(None).unwrap());
        assert_eq!(names(&layers), vec!["a", "b"]);
        assert_eq!(tints(&layers), vec![RowTint::Normal; 2]);
    }

    #[test]
    fn test_renaming_row_cannot_drag() {
        let mut layers = layer_box(&["a", "b"]);
        layers.click_slot(0, 2).unwrap();
        assert!(!layers.drag_start(0).unwrap());
        assert_eq!(layers.slots()[0].tint, RowTint::Normal);

        // Switching rename to "b" frees "a" again
        layers.click_slot(1, 2).unwrap();
        assert!(layers.drag_start(0).unwrap());
        assert!(!layers.drag_start(1).unwrap());
    }

    #[test]
    fn test_toggle_reports_swapped_row_data() {
        let mut layers = layer_box(&["a", "b"]);
        layers.drag_start(0).unwrap();
        layers.drop(Some(1)).unwrap();
        layers.notifier().take();

        layers.click_lock(0).unwrap();
        assert_eq!(
            layers.notifier().take(),
            vec![LayerNotification::LockLayer(LayerItem::new("b"))]
        );
    }
}
