//! Treemap surface and legend rendering for `AtlasApp`.
//!
//! The surface allocates one click+hover response for the whole viewport,
//! paints the engine's layout through the egui painter, hit-tests the
//! pointer against the laid-out cells (never the widgets), and routes
//! clicks to the engine's zoom. The legend panel is derived from the same
//! tree and color function as the cells.

use eframe::egui;
use egui::{Align2, Color32, FontId, Rect, Rounding, Stroke};

use shelfmap::color::{cell_color, hover_color};
use shelfmap::tree::NodeId;
use shelfmap::view::{self, Translator};

use crate::ui::{fit_label, format_count, format_share, format_weight};

use super::AtlasApp;

/// Cells narrower or shorter than this render no label.
const MIN_LABEL_WIDTH: f32 = 36.0;
const MIN_LABEL_HEIGHT: f32 = 18.0;
const LABEL_INSET: f32 = 4.0;
const LABEL_FONT_SIZE: f32 = 13.0;

impl AtlasApp {
    pub(crate) fn draw_treemap(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let avail = ui.available_size();
        // Latest coalesced size only; identical sizes keep the cached layout.
        self.engine.set_viewport(avail.x, avail.y);

        let (surface, response) = ui.allocate_exact_size(
            avail,
            egui::Sense::click().union(egui::Sense::hover()),
        );
        let painter = ui.painter_at(surface);
        let origin = surface.min;

        let cells = self.engine.layout().clone();
        let tree = self.engine.tree();
        let focus = self.engine.focus();
        let group_key = tree.get(focus).key.clone();

        if cells.is_empty() || tree.get(focus).aggregate <= 0.0 {
            self.hovered = None;
            painter.text(
                surface.center(),
                Align2::CENTER_CENTER,
                "No data for this view",
                FontId::proportional(16.0),
                ui.visuals().weak_text_color(),
            );
            return;
        }

        // Hit-test the pointer against cells, topmost last-drawn first.
        // When the pointer is elsewhere the legend may own the hover state.
        let over_surface = response.contains_pointer();
        if over_surface {
            self.hovered = response.hover_pos().and_then(|pos| {
                let (px, py) = (pos.x - origin.x, pos.y - origin.y);
                cells
                    .rects
                    .iter()
                    .rev()
                    .find(|cell| cell.contains(px, py))
                    .map(|cell| cell.node)
            });
        }

        let outline = ui.visuals().window_fill();
        let mut hovered_drillable = false;

        for cell in &cells.rects {
            if cell.w <= 0.0 || cell.h <= 0.0 {
                continue;
            }
            let rect = Rect::from_min_size(
                origin + egui::vec2(cell.x, cell.y),
                egui::vec2(cell.w, cell.h),
            );
            let node = tree.get(cell.node);
            let base = cell_color(&group_key, &node.key);
            let is_hovered = self.hovered == Some(cell.node);
            let fill = if is_hovered { hover_color(base) } else { base };

            painter.rect_filled(rect, Rounding::same(2.0), fill);
            painter.rect_stroke(rect, Rounding::same(2.0), Stroke::new(1.0, outline));

            if is_hovered && !node.is_leaf() && cell.node != focus {
                hovered_drillable = true;
            }

            if cell.w >= MIN_LABEL_WIDTH && cell.h >= MIN_LABEL_HEIGHT {
                let label = self.translator.translate(&node.key);
                let font = FontId::proportional(LABEL_FONT_SIZE);
                if let Some(fitted) =
                    fit_label(ctx, &label, &font, cell.w - 2.0 * LABEL_INSET)
                {
                    painter.text(
                        rect.min + egui::vec2(LABEL_INSET, LABEL_INSET),
                        Align2::LEFT_TOP,
                        fitted,
                        font,
                        text_color_on(fill),
                    );
                }
            }
        }

        if hovered_drillable {
            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        if let (true, Some(node)) = (over_surface, self.hovered) {
            let info = view::hover_info(tree, node);
            let label = self.translator.translate(&info.key);
            let unit = self.weight_mode;
            egui::show_tooltip_at_pointer(
                ctx,
                ui.layer_id(),
                egui::Id::new("cell_tooltip"),
                |ui| {
                    ui.strong(label);
                    ui.label(format!(
                        "{} · {} items",
                        format_weight_for(unit, info.aggregate),
                        format_count(info.item_count)
                    ));
                    ui.label(format!("{} of this level", format_share(info.share_of_parent)));
                    ui.label(format!("{} of everything", format_share(info.share_of_root)));
                },
            );
        }

        // Zoom after drawing so the click acts on the cells it was aimed at.
        let clicked = response.clicked().then_some(self.hovered).flatten();
        if let Some(node) = clicked {
            if self.engine.zoom_in(node) {
                self.hovered = None;
            }
        }
    }

    pub(crate) fn draw_legend(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        ui.heading("Legend");
        ui.separator();

        let tree = self.engine.tree();
        let focus = self.engine.focus();
        let entries = view::legend(tree, focus, &self.translator);
        if entries.is_empty() {
            ui.weak("Nothing to show at this level.");
            return;
        }

        let unit = self.weight_mode;
        let mut hover: Option<NodeId> = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for entry in &entries {
                let row = ui.horizontal(|ui| {
                    let (swatch, _) = ui.allocate_exact_size(
                        egui::vec2(12.0, 12.0),
                        egui::Sense::hover(),
                    );
                    ui.painter()
                        .rect_filled(swatch, Rounding::same(2.0), entry.color);
                    ui.label(&entry.label);
                    ui.with_layout(
                        egui::Layout::right_to_left(egui::Align::Center),
                        |ui| {
                            ui.weak(format!(
                                "{} · {}",
                                format_weight_for(unit, entry.aggregate),
                                format_share(entry.share)
                            ));
                        },
                    );
                });
                if row.response.contains_pointer() {
                    hover = Some(entry.node);
                }
            }
        });
        if let Some(node) = hover {
            self.hovered = Some(node);
        } else if ui.ui_contains_pointer() {
            self.hovered = None;
        }
    }
}

fn format_weight_for(mode: shelfmap::record::WeightMode, aggregate: f64) -> String {
    match mode {
        shelfmap::record::WeightMode::Count => format_count(aggregate.round() as usize),
        shelfmap::record::WeightMode::Words => format!("{} words", format_weight(aggregate)),
    }
}

/// Black or white, whichever reads better on `fill`.
fn text_color_on(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 150.0 {
        Color32::from_rgb(25, 25, 30)
    } else {
        Color32::WHITE
    }
}
