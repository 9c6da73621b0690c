// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layer rows and the visual slots that display them.

use crate::input_filter;
use crate::layer::LayerItem;
use std::ops::Range;

/// Index of a row in the layer box's row arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(pub usize);

/// Highlight applied to a slot while dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowTint {
    /// No highlight
    #[default]
    Normal,
    /// Slot holding the row being dragged
    Dragged,
    /// Slot under the pointer that would accept the drop
    DropCandidate,
}

/// Inline name editor state for a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameField {
    text: String,
    disabled: bool,
    focused: bool,
    focus_requested: bool,
    selection: Option<Range<usize>>,
}

impl NameField {
    /// Create a disabled field showing `text`
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            disabled: true,
            focused: false,
            focus_requested: false,
            selection: None,
        }
    }

    /// Current text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the field rejects input
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether the field owns keyboard focus
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Selected byte range, if any
    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    /// Whether the whole text is selected
    pub fn is_all_selected(&self) -> bool {
        self.selection == Some(0..self.text.len())
    }

    /// Enable or disable the field. Disabling drops focus.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.focused = false;
            self.focus_requested = false;
        }
    }

    /// Give the field keyboard focus
    pub fn focus(&mut self) {
        self.focused = true;
        self.focus_requested = true;
    }

    /// Take the one-shot focus request raised by [`Self::focus`]
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Select the whole text
    pub fn select_all(&mut self) {
        self.selection = Some(0..self.text.len());
    }

    /// Drop the text selection
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Replace the text without filtering
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.selection = None;
    }

    /// Type `input` into the field.
    ///
    /// Non-alphanumeric characters are dropped. The typed text replaces the
    /// selection, or is appended when nothing is selected. Ignored while
    /// disabled.
    pub fn type_text(&mut self, input: &str) {
        if self.disabled {
            return;
        }
        let filtered = input_filter::apply(input, input_filter::alphanumeric);
        match self.selection.take() {
            Some(range) => self.text.replace_range(range, &filtered),
            None => self.text.push_str(&filtered),
        }
    }

    /// Replace the whole text with the filtered `input`. Ignored while disabled.
    pub fn replace_text(&mut self, input: &str) {
        if self.disabled {
            return;
        }
        self.text = input_filter::apply(input, input_filter::alphanumeric);
        self.selection = None;
    }
}

/// A layer row: bound data plus its widget state.
///
/// Rows travel between slots on drag-and-drop swaps, taking their selection
/// flag, name field and toggle states with them.
#[derive(Debug, Clone)]
pub struct LayerRow {
    pub(crate) item: LayerItem,
    pub(crate) selected: bool,
    pub(crate) name_field: NameField,
    pub(crate) lock_checked: bool,
    pub(crate) hidden_checked: bool,
    pub(crate) draggable: bool,
}

impl LayerRow {
    pub(crate) fn new(item: LayerItem) -> Self {
        Self {
            name_field: NameField::new(item.name.clone()),
            lock_checked: item.locked,
            hidden_checked: !item.visible,
            selected: false,
            draggable: true,
            item,
        }
    }

    /// Bound layer data
    pub fn item(&self) -> &LayerItem {
        &self.item
    }

    /// Bound layer name
    pub fn layer_name(&self) -> &str {
        &self.item.name
    }

    /// Whether the bound layer is locked
    pub fn is_locked(&self) -> bool {
        self.item.locked
    }

    /// Whether the bound layer is visible
    pub fn is_layer_visible(&self) -> bool {
        self.item.visible
    }

    /// Whether this row is the selected one
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Inline name editor
    pub fn name_field(&self) -> &NameField {
        &self.name_field
    }

    /// Lock button state
    pub fn lock_checked(&self) -> bool {
        self.lock_checked
    }

    /// Visibility button state (checked means hidden)
    pub fn hidden_checked(&self) -> bool {
        self.hidden_checked
    }

    /// Whether the row can currently start a drag
    pub fn is_draggable(&self) -> bool {
        self.draggable
    }
}

/// A visual position in the layer list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSlot {
    /// Row displayed in this slot
    pub row: RowId,
    /// Drag highlight
    pub tint: RowTint,
}

impl RowSlot {
    pub(crate) fn new(row: RowId) -> Self {
        Self {
            row,
            tint: RowTint::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_field_starts_disabled() {
        let mut field = NameField::new("Background");
        assert!(field.is_disabled());
        field.type_text("X");
        assert_eq!(field.text(), "Background");
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut field = NameField::new("Background");
        field.set_disabled(false);
        field.focus();
        field.select_all();
        assert!(field.is_all_selected());

        field.type_text("Sky line!");
        assert_eq!(field.text(), "Skyline");
        assert_eq!(field.selection(), None);

        field.type_text("_2");
        assert_eq!(field.text(), "Skyline2");
    }

    #[test]
    fn test_disabling_drops_focus() {
        let mut field = NameField::new("a");
        field.set_disabled(false);
        field.focus();
        assert!(field.take_focus_request());
        assert!(!field.take_focus_request());

        field.set_disabled(true);
        assert!(!field.is_focused());
    }

    #[test]
    fn test_row_buttons_mirror_item() {
        let row = LayerRow::new(LayerItem::new("fx").with_locked(true).with_visible(false));
        assert!(row.lock_checked());
        assert!(row.hidden_checked());
        assert!(row.is_draggable());
        assert!(!row.is_selected());
        assert_eq!(row.name_field().text(), "fx");
    }
}
