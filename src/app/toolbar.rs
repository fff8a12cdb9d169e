//! Toolbar rendering for `AtlasApp`.
//!
//! Draws the back/reset buttons, the breadcrumb row, the grouping-level
//! selectors, the weight-mode selector and the dark-mode toggle. Grouping
//! or weight changes rebuild the tree, which resets the focus to the root.

use eframe::egui;

use shelfmap::record::{GroupField, WeightMode};
use shelfmap::view;

use super::{AtlasApp, MAX_LEVELS};

impl AtlasApp {
    pub(crate) fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        let mut selection_changed = false;

        ui.horizontal(|ui| {
            ui.add_space(4.0);

            let can_back = !self.engine.at_root();
            if ui
                .add_enabled(
                    can_back,
                    egui::Button::new("\u{25C0}").min_size(egui::vec2(28.0, 24.0)),
                )
                .on_hover_text("Back one level")
                .clicked()
            {
                self.engine.zoom_out(None);
                self.hovered = None;
            }
            if ui
                .add_enabled(
                    can_back,
                    egui::Button::new("\u{2302}").min_size(egui::vec2(28.0, 24.0)),
                )
                .on_hover_text("Back to overview")
                .clicked()
            {
                self.engine.reset_to_root();
                self.hovered = None;
            }

            ui.separator();

            // Breadcrumb: every ancestor is clickable, the focus is plain.
            let crumbs =
                view::breadcrumb(self.engine.tree(), self.engine.focus_stack(), &self.translator);
            let last = crumbs.len() - 1;
            let mut zoom_to: Option<usize> = None;
            for (depth, crumb) in crumbs.iter().enumerate() {
                if depth > 0 {
                    ui.label("\u{203A}");
                }
                if depth == last {
                    ui.strong(crumb);
                } else if ui.link(crumb).clicked() {
                    zoom_to = Some(depth);
                }
            }
            if let Some(depth) = zoom_to {
                self.engine.zoom_out(Some(depth));
                self.hovered = None;
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let icon = if self.dark_mode { "\u{2600}" } else { "\u{263D}" };
                if ui.button(icon).on_hover_text("Toggle dark mode").clicked() {
                    self.dark_mode = !self.dark_mode;
                }
            });
        });

        ui.horizontal(|ui| {
            ui.add_space(4.0);
            ui.label("Group by:");
            for slot in 0..MAX_LEVELS {
                let salt = ("group_level", slot);
                let current = self.levels[slot];
                egui::ComboBox::from_id_salt(salt)
                    .width(110.0)
                    .selected_text(current.map_or("\u{2014}", GroupField::label))
                    .show_ui(ui, |ui| {
                        let mut pick = current;
                        if slot > 0 {
                            ui.selectable_value(&mut pick, None, "\u{2014}");
                        }
                        for field in GroupField::ALL {
                            ui.selectable_value(&mut pick, Some(field), field.label());
                        }
                        if pick != current {
                            self.levels[slot] = pick;
                            selection_changed = true;
                        }
                    });
            }

            ui.separator();
            ui.label("Size by:");
            egui::ComboBox::from_id_salt("weight_mode")
                .width(110.0)
                .selected_text(self.weight_mode.label())
                .show_ui(ui, |ui| {
                    let mut pick = self.weight_mode;
                    for mode in WeightMode::ALL {
                        ui.selectable_value(&mut pick, mode, mode.label());
                    }
                    if pick != self.weight_mode {
                        self.weight_mode = pick;
                        selection_changed = true;
                    }
                });
        });

        if selection_changed {
            self.rebuild();
        }
    }
}
