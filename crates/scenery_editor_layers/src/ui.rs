// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layer box UI rendering.
//!
//! Widget responses are collected as [`RowAction`]s during the frame and
//! applied afterwards, so the box is only mutated outside of layout.

use crate::layer_box::LayerBox;
use crate::notification::LayerNotifier;
use crate::row::{RowId, RowTint};
use crate::DragState;
use egui::{Align, Align2, Color32, FontId, Layout, Pos2, Rect, Sense, UiBuilder, Vec2};

const ROW_HEIGHT: f32 = 24.0;
const ROW_SPACING: f32 = 1.0;
const NAME_OFFSET: f32 = 58.0;
const LIST_HEIGHT: f32 = 150.0;

const DRAGGED_TINT: Color32 = Color32::from_rgb(40, 70, 150);
const DROP_CANDIDATE_TINT: Color32 = Color32::from_rgb(45, 45, 45);
const PREVIEW_OPACITY: f32 = 0.9;

/// Where the drag preview is drawn: a row-sized rect centred on the pointer
fn preview_rect(pointer: Pos2, width: f32) -> Rect {
    Rect::from_center_size(pointer, Vec2::new(width, ROW_HEIGHT))
}

/// A user interaction with the layer list
#[derive(Debug, Clone, PartialEq)]
enum RowAction {
    Click { position: usize, tap_count: u32 },
    ToggleLock(usize),
    ToggleVisibility(usize),
    DragStart(usize),
    DragOver(usize),
    DragLeave(usize),
    Drop(Option<usize>),
    CancelDrag,
    EditName(String),
    CommitRename,
    CancelRename,
    CreateLayer,
    DeleteLayer,
}

impl<N: LayerNotifier> LayerBox<N> {
    /// Render the layer box
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let mut actions = Vec::new();

        egui::ScrollArea::vertical()
            .max_height(LIST_HEIGHT)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                ui.spacing_mut().item_spacing.y = ROW_SPACING;
                if self.slots.is_empty() {
                    ui.weak("No layers");
                    return;
                }

                let mut row_rects = Vec::with_capacity(self.slots.len());
                let mut released = false;
                for position in 0..self.slots.len() {
                    let (rect, drag_stopped) = self.row_ui(ui, position, &mut actions);
                    row_rects.push(rect);
                    released |= drag_stopped;
                }
                self.track_drag_target(ui, &row_rects, released, &mut actions);
            });

        ui.separator();
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui.button("\u{1f5d1}").on_hover_text("Delete Layer").clicked() {
                actions.push(RowAction::DeleteLayer);
            }
            if ui.button("+").on_hover_text("New Layer").clicked() {
                actions.push(RowAction::CreateLayer);
            }
        });

        for action in actions {
            self.apply(action);
        }
    }

    /// Draw one row. Returns its rect and whether a drag from it ended.
    fn row_ui(
        &mut self,
        ui: &mut egui::Ui,
        position: usize,
        actions: &mut Vec<RowAction>,
    ) -> (Rect, bool) {
        let slot = self.slots[position];
        let editing = self.editing == Some(slot.row);

        let size = Vec2::new(ui.available_width(), ROW_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

        let row = &mut self.rows[slot.row.0];
        let background = match slot.tint {
            RowTint::Dragged => DRAGGED_TINT,
            RowTint::DropCandidate => DROP_CANDIDATE_TINT,
            RowTint::Normal if row.selected => ui.visuals().selection.bg_fill,
            RowTint::Normal => ui.visuals().faint_bg_color,
        };
        ui.painter().rect_filled(rect, 2.0, background);

        ui.allocate_new_ui(
            UiBuilder::new()
                .max_rect(rect.shrink2(Vec2::new(4.0, 2.0)))
                .layout(Layout::left_to_right(Align::Center)),
            |ui| {
                if ui
                    .selectable_label(row.lock_checked, "\u{1f512}")
                    .on_hover_text("Lock Layer")
                    .clicked()
                {
                    actions.push(RowAction::ToggleLock(position));
                }
                if ui
                    .selectable_label(row.hidden_checked, "\u{1f441}")
                    .on_hover_text("Hide Layer")
                    .clicked()
                {
                    actions.push(RowAction::ToggleVisibility(position));
                }

                if editing {
                    let mut buffer = row.name_field.text().to_string();
                    let mut output = egui::TextEdit::singleline(&mut buffer)
                        .desired_width(ui.available_width())
                        .show(ui);

                    if row.name_field.take_focus_request() {
                        output.response.request_focus();
                        if row.name_field.is_all_selected() {
                            let end = egui::text::CCursor::new(buffer.chars().count());
                            output.state.cursor.set_char_range(Some(
                                egui::text::CCursorRange::two(egui::text::CCursor::new(0), end),
                            ));
                            output.state.store(ui.ctx(), output.response.id);
                        }
                    }
                    if output.response.changed() {
                        actions.push(RowAction::EditName(buffer));
                    }
                    if output.response.lost_focus() {
                        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                            actions.push(RowAction::CancelRename);
                        } else {
                            actions.push(RowAction::CommitRename);
                        }
                    }
                }
            },
        );

        if !editing {
            let color = if row.is_layer_visible() {
                ui.visuals().text_color()
            } else {
                ui.visuals().weak_text_color()
            };
            ui.painter().text(
                Pos2::new(rect.left() + NAME_OFFSET, rect.center().y),
                Align2::LEFT_CENTER,
                row.name_field.text(),
                FontId::proportional(14.0),
                color,
            );
        }

        if response.clicked() {
            let tap_count = if response.double_clicked() { 2 } else { 1 };
            actions.push(RowAction::Click { position, tap_count });
        }
        if response.drag_started() {
            actions.push(RowAction::DragStart(position));
        }

        (rect, response.drag_stopped())
    }

    /// Follow the pointer while dragging.
    ///
    /// Runs after every row is laid out, so a release is resolved against
    /// where the pointer is now rather than the target seen last frame.
    fn track_drag_target(
        &self,
        ui: &egui::Ui,
        row_rects: &[Rect],
        released: bool,
        actions: &mut Vec<RowAction>,
    ) {
        let pointer = ui.ctx().pointer_hover_pos();
        let hovered = pointer.and_then(|pos| row_rects.iter().position(|rect| rect.contains(pos)));

        // The drag may have started this frame; its DragStart is queued ahead.
        if released {
            actions.push(RowAction::Drop(hovered));
            return;
        }

        let DragState::Dragging { source, target, .. } = self.drag else {
            return;
        };
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);

        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            actions.push(RowAction::CancelDrag);
            return;
        }

        if let (Some(pointer), Some(rect)) = (pointer, row_rects.first()) {
            self.paint_drag_preview(ui, source, preview_rect(pointer, rect.width()));
        }

        match (hovered, target) {
            (Some(position), _) => actions.push(RowAction::DragOver(position)),
            (None, Some(previous)) => actions.push(RowAction::DragLeave(previous)),
            (None, None) => {}
        }
    }

    /// Translucent copy of the dragged row, drawn above everything else
    fn paint_drag_preview(&self, ui: &egui::Ui, source: RowId, rect: Rect) {
        let Some(row) = self.row(source) else {
            return;
        };
        let painter = ui.ctx().layer_painter(egui::LayerId::new(
            egui::Order::Tooltip,
            egui::Id::new("layer_drag_preview"),
        ));

        let background = if row.is_selected() {
            ui.visuals().selection.bg_fill
        } else {
            ui.visuals().faint_bg_color
        };
        painter.rect_filled(rect, 2.0, background.gamma_multiply(PREVIEW_OPACITY));

        let text_color = ui.visuals().text_color().gamma_multiply(PREVIEW_OPACITY);
        let font = FontId::proportional(14.0);
        let icons = [
            (row.lock_checked, "\u{1f512}", 14.0),
            (row.hidden_checked, "\u{1f441}", 36.0),
        ];
        for (checked, icon, x) in icons {
            let color = if checked {
                text_color
            } else {
                text_color.gamma_multiply(0.5)
            };
            painter.text(
                Pos2::new(rect.left() + x, rect.center().y),
                Align2::CENTER_CENTER,
                icon,
                font.clone(),
                color,
            );
        }
        painter.text(
            Pos2::new(rect.left() + NAME_OFFSET, rect.center().y),
            Align2::LEFT_CENTER,
            row.layer_name(),
            font,
            text_color,
        );
    }

    fn apply(&mut self, action: RowAction) {
        let result = match action {
            RowAction::Click { position, tap_count } => self.click_slot(position, tap_count),
            RowAction::ToggleLock(position) => self.click_lock(position),
            RowAction::ToggleVisibility(position) => self.click_visibility(position),
            RowAction::DragStart(position) => self.drag_start(position).map(|_| ()),
            RowAction::DragOver(position) => self.drag_over(position).map(|_| ()),
            RowAction::DragLeave(position) => {
                self.drag_leave(position);
                Ok(())
            }
            RowAction::Drop(target) => self.drop(target).map(|_| ()),
            RowAction::CancelDrag => {
                self.cancel_drag();
                Ok(())
            }
            RowAction::EditName(text) => {
                self.replace_name_text(&text);
                Ok(())
            }
            RowAction::CommitRename => {
                self.commit_rename();
                Ok(())
            }
            RowAction::CancelRename => {
                self.cancel_rename();
                Ok(())
            }
            RowAction::CreateLayer => {
                self.request_create_layer();
                Ok(())
            }
            RowAction::DeleteLayer => {
                self.request_delete_layer();
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::warn!("Layer box action failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer_box::tests::{layer_box, RecordingNotifier};
    use crate::notification::LayerNotification;

    // Central panel margin is 8, rows are 24 high with 1 between them.
    const TOP_ROW: Pos2 = Pos2::new(200.0, 20.0);
    const BOTTOM_ROW: Pos2 = Pos2::new(200.0, 45.0);
    const OUTSIDE_ROWS: Pos2 = Pos2::new(200.0, 390.0);

    fn frame(ctx: &egui::Context, layers: &mut LayerBox<RecordingNotifier>, events: Vec<egui::Event>) {
        let input = egui::RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::splat(400.0))),
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| layers.ui(ui));
        });
    }

    fn button(pos: Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    /// Press on the top row and drag it until the bottom row is the target
    fn drag_top_over_bottom(ctx: &egui::Context, layers: &mut LayerBox<RecordingNotifier>) {
        frame(ctx, layers, vec![egui::Event::PointerMoved(TOP_ROW)]);
        frame(ctx, layers, vec![egui::Event::PointerMoved(TOP_ROW)]);
        frame(ctx, layers, vec![button(TOP_ROW, true)]);
        frame(ctx, layers, vec![egui::Event::PointerMoved(TOP_ROW + Vec2::new(0.0, 2.0))]);
        frame(ctx, layers, vec![egui::Event::PointerMoved(BOTTOM_ROW)]);
        frame(ctx, layers, vec![egui::Event::PointerMoved(BOTTOM_ROW)]);
        frame(ctx, layers, vec![]);

        assert!(matches!(
            layers.drag_state(),
            DragState::Dragging { target: Some(1), .. }
        ));
        assert_eq!(layers.slots()[1].tint, RowTint::DropCandidate);
    }

    #[test]
    fn test_release_off_rows_in_one_frame_does_not_swap() {
        let ctx = egui::Context::default();
        let mut layers = layer_box(&["top", "bottom"]);
        drag_top_over_bottom(&ctx, &mut layers);
        layers.notifier().take();

        frame(
            &ctx,
            &mut layers,
            vec![egui::Event::PointerMoved(OUTSIDE_ROWS), button(OUTSIDE_ROWS, false)],
        );

        assert_eq!(layers.drag_state(), DragState::Idle);
        assert!(layers.notifier().take().is_empty());
        assert_eq!(layers.row_at_slot(0).unwrap().layer_name(), "top");
        assert!(layers.slots().iter().all(|slot| slot.tint == RowTint::Normal));
    }

    #[test]
    fn test_release_on_row_swaps() {
        let ctx = egui::Context::default();
        let mut layers = layer_box(&["top", "bottom"]);
        drag_top_over_bottom(&ctx, &mut layers);
        layers.notifier().take();

        frame(&ctx, &mut layers, vec![button(BOTTOM_ROW, false)]);

        assert_eq!(
            layers.notifier().take(),
            vec![LayerNotification::LayersSwapped {
                source: "top".to_string(),
                target: "bottom".to_string(),
            }]
        );
        assert_eq!(layers.row_at_slot(0).unwrap().layer_name(), "bottom");
    }

    #[test]
    fn test_preview_follows_pointer() {
        let rect = preview_rect(Pos2::new(120.0, 80.0), 200.0);
        assert_eq!(rect.center(), Pos2::new(120.0, 80.0));
        assert_eq!(rect.width(), 200.0);
        assert_eq!(rect.height(), ROW_HEIGHT);
    }

    #[test]
    fn test_apply_routes_actions() {
        let mut layers = layer_box(&["a", "b"]);
        layers.apply(RowAction::DragStart(0));
        layers.apply(RowAction::DragOver(1));
        layers.apply(RowAction::Drop(Some(1)));
        layers.apply(RowAction::CreateLayer);

        assert_eq!(
            layers.notifier().take(),
            vec![
                LayerNotification::LayersSwapped {
                    source: "a".to_string(),
                    target: "b".to_string(),
                },
                LayerNotification::CreateLayer,
            ]
        );
    }

    #[test]
    fn test_apply_ignores_stale_slot() {
        let mut layers = layer_box(&["a"]);
        layers.apply(RowAction::Click { position: 5, tap_count: 1 });
        assert!(layers.notifier().take().is_empty());
    }
}
