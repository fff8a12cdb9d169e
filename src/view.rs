//! Display data derived from the tree: hover details, legend entries and
//! the breadcrumb path.
//!
//! Everything here reads the tree, never the drawing surface, so the
//! numbers shown in tooltips and the legend always agree with the layout's
//! proportions. Legend entries use the focus's sibling order and the same
//! color function as the cells, which is what keeps swatches and cells in
//! visual lockstep.

use std::collections::HashMap;

use egui::Color32;

use crate::color::cell_color;
use crate::tree::{NodeId, Tree};

/// Maps grouping keys to display names. Fail-open: an unmapped key is shown
/// as-is, never an error.
pub trait Translator {
    fn translate(&self, key: &str) -> String;
}

/// Shows every key unchanged.
pub struct Identity;

impl Translator for Identity {
    fn translate(&self, key: &str) -> String {
        key.to_owned()
    }
}

/// Table-backed translator; misses fall back to the key itself.
#[derive(Default)]
pub struct MapTranslator {
    map: HashMap<String, String>,
}

impl MapTranslator {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self { map: entries.into_iter().collect() }
    }
}

impl Translator for MapTranslator {
    fn translate(&self, key: &str) -> String {
        self.map.get(key).cloned().unwrap_or_else(|| key.to_owned())
    }
}

/// Everything the tooltip shows for one hovered node.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverInfo {
    pub key: String,
    pub aggregate: f64,
    pub item_count: usize,
    /// Fraction of the immediate parent's aggregate (1.0 for the root).
    pub share_of_parent: f64,
    /// Fraction of the root aggregate, from the build-time snapshot.
    pub share_of_root: f64,
}

/// Hover details for `node`, computed from the tree.
pub fn hover_info(tree: &Tree, node: NodeId) -> HoverInfo {
    let n = tree.get(node);
    let share_of_parent = match n.parent {
        Some(p) => {
            let parent_agg = tree.get(p).aggregate;
            if parent_agg > 0.0 { n.aggregate / parent_agg } else { 0.0 }
        }
        None => 1.0,
    };
    HoverInfo {
        key: n.key.clone(),
        aggregate: n.aggregate,
        item_count: n.item_count,
        share_of_parent,
        share_of_root: n.share_of_root,
    }
}

/// One legend row for a child of the current focus.
#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub node: NodeId,
    pub key: String,
    pub label: String,
    pub color: Color32,
    pub aggregate: f64,
    pub item_count: usize,
    /// Fraction of the focus's aggregate.
    pub share: f64,
}

/// Legend for the focus's children, in sibling order, with the cells' own
/// color function.
pub fn legend(tree: &Tree, focus: NodeId, translator: &dyn Translator) -> Vec<LegendEntry> {
    let focus_node = tree.get(focus);
    let total = focus_node.aggregate;
    tree.children(focus)
        .iter()
        .map(|&child| {
            let n = tree.get(child);
            LegendEntry {
                node: child,
                key: n.key.clone(),
                label: translator.translate(&n.key),
                color: cell_color(&focus_node.key, &n.key),
                aggregate: n.aggregate,
                item_count: n.item_count,
                share: if total > 0.0 { n.aggregate / total } else { 0.0 },
            }
        })
        .collect()
}

/// Display names from the root to the focus, for the breadcrumb row.
pub fn breadcrumb(tree: &Tree, stack: &[NodeId], translator: &dyn Translator) -> Vec<String> {
    stack
        .iter()
        .map(|&id| {
            let node = tree.get(id);
            if node.parent.is_none() {
                "All".to_owned()
            } else {
                translator.translate(&node.key)
            }
        })
        .collect()
}
