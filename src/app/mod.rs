//! `AtlasApp` — the top-level egui application state.
//!
//! This module declares the `AtlasApp` struct and the `eframe::App` impl;
//! the drawing methods are split across the sibling sub-modules:
//!
//! - `toolbar` — grouping/weight selectors, back button, breadcrumb
//! - `content` — treemap surface, tooltip, legend panel

pub mod content;
pub mod toolbar;

use eframe::egui;

use shelfmap::diag::LogSink;
use shelfmap::engine::AtlasEngine;
use shelfmap::record::{self, GroupField, Record, WeightMode};
use shelfmap::tree::NodeId;
use shelfmap::view::MapTranslator;

/// Grouping levels the toolbar exposes. Unused levels are `None`.
pub const MAX_LEVELS: usize = 3;

pub struct AtlasApp {
    records: Vec<Record>,
    pub engine: AtlasEngine,
    /// Ordered grouping selection; `None` slots are skipped.
    pub levels: [Option<GroupField>; MAX_LEVELS],
    pub weight_mode: WeightMode,
    /// Shared hover state for cells, tooltip and legend.
    pub hovered: Option<NodeId>,
    pub translator: MapTranslator,
    pub dark_mode: bool,
    build_error: Option<String>,
}

impl AtlasApp {
    pub fn new(records: Vec<Record>) -> Self {
        let levels = [Some(GroupField::Country), Some(GroupField::Collection), None];
        let weight_mode = WeightMode::Count;
        let fields = active_fields(&levels);
        let tree = record::build_tree(&records, &fields, weight_mode)
            .expect("built-in grouping fields cannot fail");
        Self {
            records,
            engine: AtlasEngine::new(tree, Box::new(LogSink)),
            levels,
            weight_mode,
            hovered: None,
            translator: default_translator(),
            dark_mode: false,
            build_error: None,
        }
    }

    /// Rebuild the tree after a grouping or weight change. The engine
    /// resets the focus to the new root; stale node ids never leak into
    /// the new tree.
    pub(crate) fn rebuild(&mut self) {
        self.hovered = None;
        let fields = active_fields(&self.levels);
        match record::build_tree(&self.records, &fields, self.weight_mode) {
            Ok(tree) => {
                self.engine.rebuild(tree);
                self.build_error = None;
            }
            Err(err) => {
                log::error!("tree rebuild failed: {err}");
                self.build_error = Some(err.to_string());
            }
        }
    }

    pub(crate) fn build_error(&self) -> Option<&str> {
        self.build_error.as_deref()
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::SidePanel::right("legend")
            .default_width(240.0)
            .show(ctx, |ui| {
                self.draw_legend(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(err) = self.build_error() {
                ui.colored_label(egui::Color32::RED, err);
                return;
            }
            self.draw_treemap(ui, ctx);
        });
    }
}

fn active_fields(levels: &[Option<GroupField>; MAX_LEVELS]) -> Vec<GroupField> {
    levels.iter().flatten().copied().collect()
}

/// Display names for keys that read better expanded. Everything else falls
/// through unchanged.
fn default_translator() -> MapTranslator {
    MapTranslator::new([
        ("Moore".to_owned(), "Mooré".to_owned()),
        ("Twi".to_owned(), "Twi (Akan)".to_owned()),
    ])
}
