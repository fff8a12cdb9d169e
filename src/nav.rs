//! Drill-down navigation over the grouping tree.
//!
//! A [`Navigator`] is a stack of node ids from the root to the current
//! focus. The root entry is never popped. Invalid transitions (double
//! clicks, clicks from handlers attached to a previous layout) are expected
//! input: they are ignored and reported through the diagnostics sink.

use crate::diag::{DiagEvent, Diagnostics};
use crate::tree::{NodeId, Tree};

#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<NodeId>,
}

impl Navigator {
    pub fn new(root: NodeId) -> Self {
        Self { stack: vec![root] }
    }

    /// Current focus (top of stack).
    pub fn focus(&self) -> NodeId {
        *self.stack.last().expect("stack always holds the root")
    }

    /// Path from root to focus.
    pub fn stack(&self) -> &[NodeId] {
        &self.stack
    }

    /// Drill-down depth: 0 at root.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn at_root(&self) -> bool {
        self.stack.len() == 1
    }

    /// Drill into `node`. Valid only for a direct child of the current
    /// focus that has children of its own. Returns whether the focus moved.
    pub fn zoom_in(&mut self, tree: &Tree, node: NodeId, diag: &dyn Diagnostics) -> bool {
        if node == self.focus() {
            // Duplicate click on the already-focused node.
            return false;
        }
        if !tree.contains(node) {
            diag.note(DiagEvent::ZoomRejected { reason: "unknown node id" });
            return false;
        }
        if !tree.is_child_of(node, self.focus()) {
            diag.note(DiagEvent::ZoomRejected { reason: "not a child of the focus" });
            return false;
        }
        if tree.get(node).is_leaf() {
            diag.note(DiagEvent::ZoomRejected { reason: "leaf has nothing to drill into" });
            return false;
        }
        self.stack.push(node);
        true
    }

    /// Pop back to `to_depth` (default: one level up). No-op at the root.
    /// Returns whether the focus moved.
    pub fn zoom_out(&mut self, to_depth: Option<usize>, diag: &dyn Diagnostics) -> bool {
        if self.at_root() {
            diag.note(DiagEvent::ZoomOutAtRoot);
            return false;
        }
        let target = to_depth.unwrap_or(self.depth() - 1);
        if target >= self.depth() {
            diag.note(DiagEvent::ZoomRejected { reason: "zoom-out target not above focus" });
            return false;
        }
        self.stack.truncate(target + 1);
        true
    }

    /// Back to `[root]`. Called whenever the tree is rebuilt, because old
    /// node ids do not survive a rebuild.
    pub fn reset(&mut self, root: NodeId) {
        self.stack.clear();
        self.stack.push(root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::testing::RecordingSink;
    use crate::tree;

    struct Item {
        a: &'static str,
        b: &'static str,
    }

    type Key = Box<dyn Fn(&Item) -> Result<Option<String>, String>>;

    fn fixture() -> Tree {
        let key_fns: Vec<Key> = vec![
            Box::new(|i: &Item| Ok(Some(i.a.to_owned()))),
            Box::new(|i: &Item| Ok(Some(i.b.to_owned()))),
        ];
        let items = vec![
            Item { a: "x", b: "1" },
            Item { a: "x", b: "2" },
            Item { a: "y", b: "1" },
        ];
        tree::build(&items, &key_fns, None::<tree::NoWeight<Item>>).unwrap()
    }

    fn child(t: &Tree, parent: NodeId, key: &str) -> NodeId {
        *t.children(parent).iter().find(|&&c| t.get(c).key == key).unwrap()
    }

    #[test]
    fn zoom_in_then_out_restores_stack() {
        let t = fixture();
        let sink = RecordingSink::default();
        let mut nav = Navigator::new(t.root());
        let before = nav.stack().to_vec();

        let x = child(&t, t.root(), "x");
        assert!(nav.zoom_in(&t, x, &sink));
        assert_eq!(nav.focus(), x);
        assert_eq!(nav.depth(), 1);

        assert!(nav.zoom_out(None, &sink));
        assert_eq!(nav.stack(), before.as_slice());
        assert!(sink.events.borrow().is_empty());
    }

    #[test]
    fn zoom_in_is_idempotent_for_current_focus() {
        let t = fixture();
        let sink = RecordingSink::default();
        let mut nav = Navigator::new(t.root());
        let x = child(&t, t.root(), "x");
        assert!(nav.zoom_in(&t, x, &sink));
        // Second click on the same node changes nothing and is not an error.
        assert!(!nav.zoom_in(&t, x, &sink));
        assert_eq!(nav.depth(), 1);
        assert!(sink.events.borrow().is_empty());
    }

    #[test]
    fn zoom_in_rejects_non_children_and_leaves() {
        let t = fixture();
        let sink = RecordingSink::default();
        let mut nav = Navigator::new(t.root());
        let x = child(&t, t.root(), "x");
        let leaf = child(&t, x, "1");

        // Grandchild is not a direct child of the root focus.
        assert!(!nav.zoom_in(&t, leaf, &sink));
        assert_eq!(nav.depth(), 0);

        // Leaves cannot be drilled into.
        nav.zoom_in(&t, x, &sink);
        assert!(!nav.zoom_in(&t, leaf, &sink));
        assert_eq!(nav.focus(), x);
        assert_eq!(sink.events.borrow().len(), 2);
    }

    #[test]
    fn zoom_out_at_root_is_ignored() {
        let t = fixture();
        let sink = RecordingSink::default();
        let mut nav = Navigator::new(t.root());
        assert!(!nav.zoom_out(None, &sink));
        assert_eq!(nav.depth(), 0);
        assert_eq!(sink.events.borrow().as_slice(), &[DiagEvent::ZoomOutAtRoot]);
    }

    #[test]
    fn zoom_out_to_depth_pops_multiple_levels() {
        let t = fixture();
        let sink = RecordingSink::default();
        let mut nav = Navigator::new(t.root());
        let x = child(&t, t.root(), "x");
        nav.zoom_in(&t, x, &sink);
        assert!(nav.zoom_out(Some(0), &sink));
        assert!(nav.at_root());
        // Zooming "out" to the current or a deeper depth is rejected.
        assert!(!nav.zoom_out(Some(3), &sink));
    }

    #[test]
    fn reset_returns_to_new_root() {
        let t = fixture();
        let sink = RecordingSink::default();
        let mut nav = Navigator::new(t.root());
        nav.zoom_in(&t, child(&t, t.root(), "x"), &sink);
        nav.reset(t.root());
        assert_eq!(nav.stack(), &[t.root()]);
    }
}
