// SPDX-License-Identifier: MIT OR Apache-2.0
//! The layer box: rows, selection and rename mode.
//!
//! Slots are stored top-to-bottom, the way they are drawn. Layer indices
//! count from the bottom, so slot `count - 1` holds layer `0`.

use crate::drag::DragState;
use crate::layer::{LayerError, LayerItem, Result};
use crate::notification::{LayerNotification, LayerNotifier};
use crate::row::{LayerRow, RowId, RowSlot};

/// Layer list panel state
pub struct LayerBox<N> {
    pub(crate) notifier: N,
    pub(crate) rows: Vec<LayerRow>,
    pub(crate) slots: Vec<RowSlot>,
    pub(crate) current_selected_index: Option<usize>,
    /// Row whose name field is being edited
    pub(crate) editing: Option<RowId>,
    pub(crate) drag: DragState,
}

impl<N: LayerNotifier> LayerBox<N> {
    /// Create an empty box that reports to `notifier`
    pub fn new(notifier: N) -> Self {
        Self {
            notifier,
            rows: Vec::new(),
            slots: Vec::new(),
            current_selected_index: Some(0),
            editing: None,
            drag: DragState::Idle,
        }
    }

    /// The injected notification sink
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.slots.len()
    }

    /// Bottom-up index of the selected layer, `None` when cleared
    pub fn current_selected_index(&self) -> Option<usize> {
        self.current_selected_index
    }

    /// Slots in drawing order (top first)
    pub fn slots(&self) -> &[RowSlot] {
        &self.slots
    }

    /// Look up a row by id
    pub fn row(&self, id: RowId) -> Option<&LayerRow> {
        self.rows.get(id.0)
    }

    /// Row shown at visual `position`
    pub fn row_at_slot(&self, position: usize) -> Option<&LayerRow> {
        self.slots.get(position).and_then(|slot| self.rows.get(slot.row.0))
    }

    /// Row whose name is being edited, if any
    pub fn editing_row(&self) -> Option<RowId> {
        self.editing
    }

    /// Append a row bound to `item`.
    ///
    /// New rows go to the bottom of the drawn list, so callers add layers
    /// from the top layer down.
    pub fn add_layer(&mut self, item: LayerItem) -> RowId {
        let id = RowId(self.rows.len());
        tracing::trace!("Adding layer row {:?} for '{}'", id, item.name);
        self.rows.push(LayerRow::new(item));
        self.slots.push(RowSlot::new(id));
        id
    }

    /// Remove every row and reset selection
    pub fn clear_all(&mut self) {
        self.rows.clear();
        self.slots.clear();
        self.editing = None;
        self.drag = DragState::Idle;
        self.current_selected_index = None;
    }

    /// Unselect every row
    pub fn clear_selection(&mut self) {
        for row in &mut self.rows {
            row.selected = false;
        }
        self.current_selected_index = None;
    }

    /// Select the layer at bottom-up `index`. `None` leaves selection untouched.
    pub fn select(&mut self, index: Option<usize>) -> Result<()> {
        let Some(index) = index else {
            return Ok(());
        };
        let position = self.position_of_index(index)?;
        let row = self.slots[position].row;

        self.clear_selection();
        self.current_selected_index = Some(index);
        self.rows[row.0].selected = true;
        Ok(())
    }

    /// Row at the selected index
    pub fn selected(&self) -> Option<&LayerRow> {
        let index = self.current_selected_index?;
        let position = self.position_of_index(index).ok()?;
        self.row_at_slot(position)
    }

    /// Handle a click on the row at visual `position`.
    ///
    /// Selects the row and reports it. A double click (`tap_count == 2`) on an
    /// unlocked row enters rename mode, unless another row is already being
    /// renamed. Clicking a different row first ends the running rename.
    pub fn click_slot(&mut self, position: usize, tap_count: u32) -> Result<()> {
        let row = self.slot(position)?.row;

        if let Some(editing) = self.editing {
            if editing != row {
                self.commit_rename();
            }
        }

        self.clear_selection();
        self.rows[row.0].selected = true;
        self.current_selected_index = Some(self.index_of_position(position));

        self.notifier
            .notify(LayerNotification::RowClicked(self.rows[row.0].item.clone()));

        if tap_count == 2 && !self.rows[row.0].is_locked() && self.editing.is_none() {
            self.start_editing(row);
        }
        Ok(())
    }

    /// Type into the name field of the row being renamed
    pub fn type_in_name_field(&mut self, text: &str) {
        if let Some(row) = self.editing {
            self.rows[row.0].name_field.type_text(text);
        }
    }

    /// Replace the text of the name field being renamed
    pub fn replace_name_text(&mut self, text: &str) {
        if let Some(row) = self.editing {
            self.rows[row.0].name_field.replace_text(text);
        }
    }

    /// Finish the running rename (Enter or focus lost).
    ///
    /// Reports the new name when it is non-empty and differs from the bound
    /// name; otherwise the field reverts.
    pub fn commit_rename(&mut self) {
        let Some(row) = self.editing else {
            return;
        };
        let entry = &mut self.rows[row.0];
        let from = entry.item.name.clone();
        let to = entry.name_field.text().to_string();

        let notification = if !to.is_empty() && to != from {
            Some(LayerNotification::RenameLayer { from, to })
        } else {
            entry.name_field.set_text(from);
            None
        };

        self.stop_editing(row);
        if let Some(notification) = notification {
            tracing::debug!("Layer rename committed: {:?}", notification);
            self.notifier.notify(notification);
        }
    }

    /// Abandon the running rename (Escape)
    pub fn cancel_rename(&mut self) {
        let Some(row) = self.editing else {
            return;
        };
        let name = self.rows[row.0].item.name.clone();
        self.rows[row.0].name_field.set_text(name);
        self.stop_editing(row);
    }

    /// Click the lock button of the row at visual `position`
    pub fn click_lock(&mut self, position: usize) -> Result<()> {
        let row = self.slot(position)?.row;
        let entry = &mut self.rows[row.0];
        entry.lock_checked = !entry.lock_checked;
        let notification = if entry.lock_checked {
            LayerNotification::LockLayer(entry.item.clone())
        } else {
            LayerNotification::UnlockLayer(entry.item.clone())
        };
        self.notifier.notify(notification);
        Ok(())
    }

    /// Click the visibility button of the row at visual `position`
    pub fn click_visibility(&mut self, position: usize) -> Result<()> {
        let row = self.slot(position)?.row;
        let entry = &mut self.rows[row.0];
        entry.hidden_checked = !entry.hidden_checked;
        let notification = if entry.hidden_checked {
            LayerNotification::HideLayer(entry.item.clone())
        } else {
            LayerNotification::UnhideLayer(entry.item.clone())
        };
        self.notifier.notify(notification);
        Ok(())
    }

    /// Press the "new layer" button
    pub fn request_create_layer(&self) {
        self.notifier.notify(LayerNotification::CreateLayer);
    }

    /// Press the "delete layer" button
    pub fn request_delete_layer(&self) {
        self.notifier.notify(LayerNotification::DeleteLayer);
    }

    fn start_editing(&mut self, row: RowId) {
        self.editing = Some(row);
        let entry = &mut self.rows[row.0];
        entry.name_field.set_disabled(false);
        entry.name_field.focus();
        entry.name_field.select_all();
        entry.draggable = false;
    }

    fn stop_editing(&mut self, row: RowId) {
        let entry = &mut self.rows[row.0];
        entry.name_field.clear_selection();
        entry.name_field.set_disabled(true);
        entry.draggable = true;
        self.editing = None;
    }

    pub(crate) fn slot(&self, position: usize) -> Result<&RowSlot> {
        self.slots.get(position).ok_or(LayerError::SlotOutOfRange {
            position,
            count: self.slots.len(),
        })
    }

    pub(crate) fn index_of_position(&self, position: usize) -> usize {
        self.slots.len() - 1 - position
    }

    fn position_of_index(&self, index: usize) -> Result<usize> {
        let count = self.slots.len();
        if index >= count {
            return Err(LayerError::IndexOutOfRange { index, count });
        }
        Ok(count - 1 - index)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Notifier that records everything it receives
    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub(crate) sent: RefCell<Vec<LayerNotification>>,
    }

    impl RecordingNotifier {
        pub(crate) fn take(&self) -> Vec<LayerNotification> {
            self.sent.take()
        }
    }

    impl LayerNotifier for RecordingNotifier {
        fn notify(&self, notification: LayerNotification) {
            self.sent.borrow_mut().push(notification);
        }
    }

    /// Box with layers `names` listed top to bottom
    pub(crate) fn layer_box(names: &[&str]) -> LayerBox<RecordingNotifier> {
        let mut layers = LayerBox::new(RecordingNotifier::default());
        for name in names {
            layers.add_layer(LayerItem::new(*name));
        }
        layers
    }

    fn selected_count<N: LayerNotifier>(layers: &LayerBox<N>) -> usize {
        layers.rows.iter().filter(|row| row.is_selected()).count()
    }

    #[test]
    fn test_select_inverts_index() {
        let mut layers = layer_box(&["top", "middle", "bottom"]);
        for index in 0..3 {
            layers.select(Some(index)).unwrap();
            assert_eq!(selected_count(&layers), 1);
            assert!(layers.row_at_slot(2 - index).unwrap().is_selected());
            assert_eq!(layers.current_selected_index(), Some(index));
        }
        assert_eq!(layers.selected().unwrap().layer_name(), "top");
    }

    #[test]
    fn test_select_none_is_noop() {
        let mut empty = layer_box(&[]);
        empty.select(None).unwrap();
        assert_eq!(empty.current_selected_index(), Some(0));
        assert!(empty.selected().is_none());

        let mut layers = layer_box(&["a", "b"]);
        layers.select(Some(1)).unwrap();
        layers.select(None).unwrap();
        assert_eq!(layers.current_selected_index(), Some(1));
        assert_eq!(layers.selected().unwrap().layer_name(), "a");
    }

    #[test]
    fn test_select_out_of_range() {
        let mut layers = layer_box(&["a", "b"]);
        assert_eq!(
            layers.select(Some(2)),
            Err(LayerError::IndexOutOfRange { index: 2, count: 2 })
        );
        assert_eq!(selected_count(&layers), 0);
    }

    #[test]
    fn test_clear_all_resets_selection() {
        let mut layers = layer_box(&["a", "b"]);
        layers.select(Some(0)).unwrap();
        layers.clear_all();
        assert_eq!(layers.row_count(), 0);
        assert_eq!(layers.current_selected_index(), None);
        assert!(layers.selected().is_none());
    }

    #[test]
    fn test_click_selects_and_reports() {
        let mut layers = layer_box(&["top", "bottom"]);
        layers.click_slot(0, 1).unwrap();

        assert_eq!(layers.current_selected_index(), Some(1));
        assert_eq!(selected_count(&layers), 1);
        assert_eq!(
            layers.notifier().take(),
            vec![LayerNotification::RowClicked(LayerItem::new("top"))]
        );
        assert!(layers.editing_row().is_none());
    }

    #[test]
    fn test_double_click_enters_rename() {
        let mut layers = layer_box(&["top", "bottom"]);
        layers.click_slot(1, 2).unwrap();

        let row = layers.row_at_slot(1).unwrap();
        assert_eq!(layers.editing_row(), Some(layers.slots()[1].row));
        assert!(!row.name_field().is_disabled());
        assert!(row.name_field().is_focused());
        assert!(row.name_field().is_all_selected());
        assert!(!row.is_draggable());
    }

    #[test]
    fn test_locked_row_never_renames() {
        let mut layers = LayerBox::new(RecordingNotifier::default());
        layers.add_layer(LayerItem::new("locked").with_locked(true));
        layers.click_slot(0, 2).unwrap();
        assert!(layers.editing_row().is_none());
        assert!(layers.row_at_slot(0).unwrap().name_field().is_disabled());
    }

    #[test]
    fn test_rename_moves_between_rows() {
        let mut layers = layer_box(&["a", "b"]);
        layers.click_slot(0, 2).unwrap();
        layers.click_slot(1, 2).unwrap();

        let a = layers.row_at_slot(0).unwrap();
        assert!(a.name_field().is_disabled());
        assert_eq!(a.name_field().selection(), None);
        assert!(a.is_draggable());

        let b = layers.row_at_slot(1).unwrap();
        assert_eq!(layers.editing_row(), Some(layers.slots()[1].row));
        assert!(b.name_field().is_focused());
        assert!(b.name_field().is_all_selected());
        assert!(!b.is_draggable());
    }

    #[test]
    fn test_commit_rename_reports_filtered_name() {
        let mut layers = layer_box(&["a"]);
        layers.click_slot(0, 2).unwrap();
        layers.notifier().take();

        layers.type_in_name_field("fore ground");
        layers.commit_rename();

        assert_eq!(
            layers.notifier().take(),
            vec![LayerNotification::RenameLayer {
                from: "a".to_string(),
                to: "foreground".to_string(),
            }]
        );
        assert!(layers.editing_row().is_none());
        assert!(layers.row_at_slot(0).unwrap().is_draggable());
    }

    #[test]
    fn test_empty_or_unchanged_rename_reverts() {
        let mut layers = layer_box(&["a"]);
        layers.click_slot(0, 2).unwrap();
        layers.replace_name_text("!!");
        layers.commit_rename();

        assert_eq!(layers.row_at_slot(0).unwrap().name_field().text(), "a");
        assert!(!layers
            .notifier()
            .take()
            .iter()
            .any(|n| matches!(n, LayerNotification::RenameLayer { .. })));
    }

    #[test]
    fn test_cancel_rename_restores_text() {
        let mut layers = layer_box(&["a"]);
        layers.click_slot(0, 2).unwrap();
        layers.type_in_name_field("zzz");
        layers.cancel_rename();

        let row = layers.row_at_slot(0).unwrap();
        assert_eq!(row.name_field().text(), "a");
        assert!(row.name_field().is_disabled());
        assert!(layers.editing_row().is_none());
    }

    #[test]
    fn test_toggles_alternate() {
        let mut layers = layer_box(&["a"]);
        layers.click_lock(0).unwrap();
        layers.click_lock(0).unwrap();
        layers.click_visibility(0).unwrap();
        layers.click_visibility(0).unwrap();

        let item = LayerItem::new("a");
        assert_eq!(
            layers.notifier().take(),
            vec![
                LayerNotification::LockLayer(item.clone()),
                LayerNotification::UnlockLayer(item.clone()),
                LayerNotification::HideLayer(item.clone()),
                LayerNotification::UnhideLayer(item.clone()),
            ]
        );
        assert_eq!(layers.row_at_slot(0).unwrap().item(), &item);
    }

    #[test]
    fn test_create_and_delete_buttons() {
        let layers = layer_box(&[]);
        layers.request_create_layer();
        layers.request_delete_layer();
        assert_eq!(
            layers.notifier().take(),
            vec![LayerNotification::CreateLayer, LayerNotification::DeleteLayer]
        );
    }

    #[test]
    fn test_unknown_slot() {
        let mut layers = layer_box(&["a"]);
        assert_eq!(
            layers.click_slot(3, 1),
            Err(LayerError::SlotOutOfRange { position: 3, count: 1 })
        );
    }
}
