//! The visualization pipeline: tree → focus → layout.
//!
//! [`AtlasEngine`] owns one tree/focus pair and the cached layout for the
//! current focus and viewport. Layout is lazy and only covers the focus's
//! children (deeper levels are computed when drilled into), and only the
//! latest viewport size is ever processed. Engines are fully independent;
//! host several for several visualizations.

use crate::diag::{DiagEvent, Diagnostics};
use crate::layout::{self, LayoutResult};
use crate::nav::Navigator;
use crate::tree::{NodeId, Tree};

pub struct AtlasEngine {
    tree: Tree,
    nav: Navigator,
    diag: Box<dyn Diagnostics>,
    viewport: Option<(f32, f32)>,
    padding: f32,
    cached: Option<LayoutResult>,
    layout_passes: usize,
}

impl AtlasEngine {
    pub fn new(tree: Tree, diag: Box<dyn Diagnostics>) -> Self {
        let root = tree.root();
        Self {
            tree,
            nav: Navigator::new(root),
            diag,
            viewport: None,
            padding: 1.0,
            cached: None,
            layout_passes: 0,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn focus(&self) -> NodeId {
        self.nav.focus()
    }

    pub fn focus_stack(&self) -> &[NodeId] {
        self.nav.stack()
    }

    pub fn at_root(&self) -> bool {
        self.nav.at_root()
    }

    pub fn set_padding(&mut self, padding: f32) {
        if (padding - self.padding).abs() > f32::EPSILON {
            self.padding = padding;
            self.cached = None;
        }
    }

    /// Number of layout computations performed so far. Identical repeated
    /// viewports and rejected transitions must not increase this.
    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    /// Replace the tree. Focus resets to the new root and any cached layout
    /// is dropped: node ids from the old tree are meaningless now, so a
    /// pending resize-triggered layout for the old tree must never be used.
    pub fn rebuild(&mut self, tree: Tree) {
        self.diag.note(DiagEvent::TreeRebuilt { nodes: tree.len() });
        self.tree = tree;
        self.nav.reset(self.tree.root());
        self.cached = None;
    }

    /// Record the latest viewport size. Superseded sizes are simply
    /// overwritten; identical sizes keep the cached layout.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if self.viewport != Some((width, height)) {
            self.viewport = Some((width, height));
            self.cached = None;
        }
    }

    /// Drill into `node`. Invalid targets are ignored (reported through the
    /// diagnostics sink); a successful move invalidates the layout.
    pub fn zoom_in(&mut self, node: NodeId) -> bool {
        let moved = self.nav.zoom_in(&self.tree, node, self.diag.as_ref());
        if moved {
            self.cached = None;
        }
        moved
    }

    /// Back up one level, or to `to_depth` when given.
    pub fn zoom_out(&mut self, to_depth: Option<usize>) -> bool {
        let moved = self.nav.zoom_out(to_depth, self.diag.as_ref());
        if moved {
            self.cached = None;
        }
        moved
    }

    pub fn reset_to_root(&mut self) -> bool {
        if self.nav.at_root() {
            return false;
        }
        self.nav.reset(self.tree.root());
        self.cached = None;
        true
    }

    /// The node ids the current view shows: the focus's children, or the
    /// focus itself as a single full-area cell when it is a leaf.
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        let focus = self.nav.focus();
        let children = self.tree.children(focus);
        if children.is_empty() {
            vec![focus]
        } else {
            children.to_vec()
        }
    }

    /// Layout for the current focus and latest viewport, computed on demand
    /// and cached until the focus, viewport or padding changes.
    pub fn layout(&mut self) -> &LayoutResult {
        if self.cached.is_none() {
            let (w, h) = self.viewport.unwrap_or((0.0, 0.0));
            if w <= 0.0 || h <= 0.0 {
                self.diag.note(DiagEvent::DegenerateViewport);
            }
            let visible = self.visible_nodes();
            self.cached = Some(layout::layout(&self.tree, &visible, w, h, self.padding));
            self.layout_passes += 1;
        }
        self.cached.as_ref().expect("just computed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::NullSink;
    use crate::record::{self, GroupField, WeightMode};

    fn engine() -> AtlasEngine {
        let records = record::sample_catalog();
        let tree = record::build_tree(
            &records,
            &[GroupField::Country, GroupField::Collection],
            WeightMode::Words,
        )
        .unwrap();
        AtlasEngine::new(tree, Box::new(NullSink))
    }

    #[test]
    fn identical_viewports_reuse_the_cached_layout() {
        let mut e = engine();
        e.set_viewport(640.0, 480.0);
        e.layout();
        e.layout();
        e.set_viewport(640.0, 480.0);
        e.layout();
        assert_eq!(e.layout_passes(), 1);

        e.set_viewport(800.0, 480.0);
        e.layout();
        assert_eq!(e.layout_passes(), 2);
    }

    #[test]
    fn zoom_invalidates_and_restricts_to_focus_children() {
        let mut e = engine();
        e.set_viewport(640.0, 480.0);
        let top_cells = e.layout().rects.len();
        assert_eq!(top_cells, e.tree().children(e.tree().root()).len());

        let first = e.tree().children(e.tree().root())[0];
        assert!(e.zoom_in(first));
        let drilled = e.layout().rects.len();
        assert_eq!(drilled, e.tree().children(first).len());
        assert_eq!(e.layout_passes(), 2);
    }

    #[test]
    fn rejected_zoom_keeps_layout_and_state() {
        let mut e = engine();
        e.set_viewport(640.0, 480.0);
        e.layout();
        let focus = e.focus();
        // The focus itself is not a valid drill target.
        assert!(!e.zoom_in(focus));
        assert_eq!(e.focus(), focus);
        e.layout();
        assert_eq!(e.layout_passes(), 1);
    }

    #[test]
    fn rebuild_resets_focus_and_drops_layout() {
        let mut e = engine();
        e.set_viewport(640.0, 480.0);
        let first = e.tree().children(e.tree().root())[0];
        e.zoom_in(first);
        e.layout();

        let records = record::sample_catalog();
        let tree = record::build_tree(&records, &[GroupField::Language], WeightMode::Count)
            .unwrap();
        e.rebuild(tree);
        assert!(e.at_root());
        // Fresh layout for the new tree's root children.
        let cells = e.layout().rects.len();
        assert_eq!(cells, e.tree().children(e.tree().root()).len());
    }

    #[test]
    fn leaf_focus_shows_single_full_area_cell() {
        // A zero-depth grouping makes the root itself a leaf, the one state
        // where the focus has no children to lay out.
        let records = record::sample_catalog();
        let tree = record::build_tree(&records, &[], WeightMode::Count).unwrap();
        let mut e = AtlasEngine::new(tree, Box::new(NullSink));
        e.set_padding(0.0);
        e.set_viewport(200.0, 100.0);
        let result = e.layout();
        assert_eq!(result.rects.len(), 1);
        let cell = &result.rects[0];
        assert!((cell.w - 200.0).abs() < 0.5 && (cell.h - 100.0).abs() < 0.5);
    }

    #[test]
    fn missing_viewport_degrades_to_empty_layout() {
        let mut e = engine();
        assert!(e.layout().is_empty());
    }
}
