//! Hierarchy tree and the aggregator that builds it.
//!
//! Flat records are partitioned by an ordered list of key functions into an
//! arena-backed tree. Nodes hold their aggregate weight, item count and an
//! index-based parent link (no owning back-pointers, so no cycles). The tree
//! is immutable once built; changing the dataset, the grouping keys or the
//! weight mode always builds a fresh tree.

use std::collections::HashMap;

use thiserror::Error;

use crate::record::SENTINEL_KEY;

/// Tolerance for the aggregate-sum invariant checks.
pub const AGG_EPSILON: f64 = 1e-6;

/// Index of a node in its [`Tree`]'s arena. Only valid for the tree that
/// produced it; a rebuild invalidates all previously handed-out ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the grouping hierarchy.
#[derive(Debug, Clone)]
pub struct Node {
    /// Grouping key at this level (the sentinel for missing values).
    pub key: String,
    /// Sum of record weights in this subtree.
    pub aggregate: f64,
    /// Number of records in this subtree, including zero-weight ones.
    pub item_count: usize,
    pub parent: Option<NodeId>,
    /// Sorted aggregate-descending, then key-ascending.
    pub children: Vec<NodeId>,
    /// 0 for the root, +1 per grouping level.
    pub depth: usize,
    /// Fraction of the root aggregate, captured once at build time.
    pub share_of_root: f64,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Immutable grouping tree.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Whether `child` is a direct child of `parent`.
    pub fn is_child_of(&self, child: NodeId, parent: NodeId) -> bool {
        self.get(child).parent == Some(parent)
    }
}

/// A key or weight function failed; the whole build is aborted because a
/// partially built tree would violate the aggregate-sum invariant.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("grouping key function failed at level {level}: {message}")]
    KeyFn { level: usize, message: String },
    #[error("weight function failed: {message}")]
    WeightFn { message: String },
}

/// Concrete weight-function type to name when passing `None`.
pub type NoWeight<R> = fn(&R) -> Result<Option<f64>, String>;

/// Build a grouping tree.
///
/// `key_fns` are applied in order; tree depth equals `key_fns.len()`. A key
/// function returning `Ok(None)` buckets the record under [`SENTINEL_KEY`].
/// Without a weight function every record contributes 1 (count mode); with
/// one, records contribute their weight, and a missing or non-finite weight
/// contributes 0 while still counting toward `item_count`.
pub fn build<R, K, W>(
    records: &[R],
    key_fns: &[K],
    weight_fn: Option<W>,
) -> Result<Tree, BuildError>
where
    K: Fn(&R) -> Result<Option<String>, String>,
    W: Fn(&R) -> Result<Option<f64>, String>,
{
    let mut nodes = vec![Node {
        key: String::new(),
        aggregate: 0.0,
        item_count: 0,
        parent: None,
        children: Vec::new(),
        depth: 0,
        share_of_root: 1.0,
    }];
    let root = NodeId(0);

    let all: Vec<usize> = (0..records.len()).collect();
    let (aggregate, item_count) = grow(
        &mut nodes,
        records,
        key_fns,
        weight_fn.as_ref(),
        &all,
        0,
        root,
    )?;
    nodes[root.index()].aggregate = aggregate;
    nodes[root.index()].item_count = item_count;

    // Root share is captured once here, not recomputed per hover.
    let total = aggregate;
    for node in &mut nodes {
        node.share_of_root = if total > 0.0 { node.aggregate / total } else { 0.0 };
    }
    nodes[root.index()].share_of_root = if total > 0.0 { 1.0 } else { 0.0 };

    Ok(Tree { nodes, root })
}

/// Partition `rows` by `key_fns[level]`, create one child per partition and
/// recurse. Returns the (aggregate, item_count) for the caller's subtree.
fn grow<R, K, W>(
    nodes: &mut Vec<Node>,
    records: &[R],
    key_fns: &[K],
    weight_fn: Option<&W>,
    rows: &[usize],
    level: usize,
    parent: NodeId,
) -> Result<(f64, usize), BuildError>
where
    K: Fn(&R) -> Result<Option<String>, String>,
    W: Fn(&R) -> Result<Option<f64>, String>,
{
    if level == key_fns.len() {
        // Leaf partition: sum weights directly.
        let mut aggregate = 0.0;
        for &i in rows {
            let w = match weight_fn {
                None => 1.0,
                Some(f) => f(&records[i])
                    .map_err(|message| BuildError::WeightFn { message })?
                    .filter(|v| v.is_finite())
                    .unwrap_or(0.0),
            };
            aggregate += w;
        }
        return Ok((aggregate, rows.len()));
    }

    // Partition preserving first-seen order; final order comes from sorting.
    let key_fn = &key_fns[level];
    let mut partitions: Vec<(String, Vec<usize>)> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();
    for &i in rows {
        let key = key_fn(&records[i])
            .map_err(|message| BuildError::KeyFn { level, message })?
            .unwrap_or_else(|| SENTINEL_KEY.to_owned());
        match by_key.get(&key) {
            Some(&slot) => partitions[slot].1.push(i),
            None => {
                by_key.insert(key.clone(), partitions.len());
                partitions.push((key, Vec::new()));
                let slot = partitions.len() - 1;
                partitions[slot].1.push(i);
            }
        }
    }

    let mut aggregate = 0.0;
    let mut item_count = 0;
    let mut child_ids = Vec::with_capacity(partitions.len());
    for (key, part) in partitions {
        let child = NodeId(nodes.len() as u32);
        nodes.push(Node {
            key,
            aggregate: 0.0,
            item_count: 0,
            parent: Some(parent),
            children: Vec::new(),
            depth: level + 1,
            share_of_root: 0.0,
        });
        let (agg, count) = grow(nodes, records, key_fns, weight_fn, &part, level + 1, child)?;
        nodes[child.index()].aggregate = agg;
        nodes[child.index()].item_count = count;
        aggregate += agg;
        item_count += count;
        child_ids.push(child);
    }

    // Sibling order: aggregate descending, key ascending. Deterministic, so
    // layout and legend always agree.
    child_ids.sort_by(|&a, &b| {
        let (na, nb) = (&nodes[a.index()], &nodes[b.index()]);
        nb.aggregate
            .partial_cmp(&na.aggregate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| na.key.cmp(&nb.key))
    });
    nodes[parent.index()].children = child_ids;

    Ok((aggregate, item_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        country: &'static str,
        set: &'static str,
        weight: Option<f64>,
    }

    fn items() -> Vec<Item> {
        vec![
            Item { country: "Togo", set: "A", weight: Some(100.0) },
            Item { country: "Togo", set: "B", weight: Some(50.0) },
            Item { country: "Benin", set: "A", weight: Some(30.0) },
        ]
    }

    type Key = Box<dyn Fn(&Item) -> Result<Option<String>, String>>;

    fn key_fns() -> Vec<Key> {
        vec![
            Box::new(|i: &Item| Ok(Some(i.country.to_owned()))),
            Box::new(|i: &Item| Ok(Some(i.set.to_owned()))),
        ]
    }

    fn weighted() -> Option<impl Fn(&Item) -> Result<Option<f64>, String>> {
        Some(|i: &Item| Ok(i.weight))
    }

    fn find(tree: &Tree, parent: NodeId, key: &str) -> NodeId {
        *tree
            .children(parent)
            .iter()
            .find(|&&c| tree.get(c).key == key)
            .unwrap()
    }

    #[test]
    fn weighted_two_level_aggregation() {
        let tree = build(&items(), &key_fns(), weighted()).unwrap();
        let root = tree.get(tree.root());
        assert!((root.aggregate - 180.0).abs() < AGG_EPSILON);
        assert_eq!(root.item_count, 3);

        let togo = find(&tree, tree.root(), "Togo");
        let benin = find(&tree, tree.root(), "Benin");
        assert!((tree.get(togo).aggregate - 150.0).abs() < AGG_EPSILON);
        assert!((tree.get(benin).aggregate - 30.0).abs() < AGG_EPSILON);

        let a = find(&tree, togo, "A");
        let b = find(&tree, togo, "B");
        assert!((tree.get(a).aggregate - 100.0).abs() < AGG_EPSILON);
        assert!((tree.get(b).aggregate - 50.0).abs() < AGG_EPSILON);
        assert!((tree.get(find(&tree, benin, "A")).aggregate - 30.0).abs() < AGG_EPSILON);
    }

    #[test]
    fn non_leaf_aggregate_equals_sum_of_children() {
        let tree = build(&items(), &key_fns(), weighted()).unwrap();
        for idx in 0..tree.len() {
            let id = NodeId(idx as u32);
            let node = tree.get(id);
            if node.is_leaf() {
                continue;
            }
            let child_sum: f64 = node.children.iter().map(|&c| tree.get(c).aggregate).sum();
            let count_sum: usize = node.children.iter().map(|&c| tree.get(c).item_count).sum();
            assert!((node.aggregate - child_sum).abs() < AGG_EPSILON);
            assert_eq!(node.item_count, count_sum);
        }
    }

    #[test]
    fn siblings_sorted_by_aggregate_then_key() {
        let tree = build(&items(), &key_fns(), weighted()).unwrap();
        let top: Vec<&str> = tree
            .children(tree.root())
            .iter()
            .map(|&c| tree.get(c).key.as_str())
            .collect();
        assert_eq!(top, ["Togo", "Benin"]);

        // Equal aggregates fall back to key order.
        let even = vec![
            Item { country: "B", set: "x", weight: Some(10.0) },
            Item { country: "A", set: "x", weight: Some(10.0) },
            Item { country: "C", set: "x", weight: Some(10.0) },
        ];
        let tree = build(&even, &key_fns(), weighted()).unwrap();
        let top: Vec<&str> = tree
            .children(tree.root())
            .iter()
            .map(|&c| tree.get(c).key.as_str())
            .collect();
        assert_eq!(top, ["A", "B", "C"]);
    }

    #[test]
    fn empty_input_yields_bare_root() {
        let tree = build(&Vec::<Item>::new(), &key_fns(), weighted()).unwrap();
        let root = tree.get(tree.root());
        assert_eq!(root.aggregate, 0.0);
        assert_eq!(root.item_count, 0);
        assert!(root.is_leaf());
        assert_eq!(root.share_of_root, 0.0);
    }

    #[test]
    fn missing_key_goes_to_sentinel() {
        let key_fns: Vec<Key> = vec![Box::new(|i: &Item| {
            Ok((!i.country.is_empty()).then(|| i.country.to_owned()))
        })];
        let rows = vec![
            Item { country: "Togo", set: "A", weight: Some(1.0) },
            Item { country: "", set: "A", weight: Some(1.0) },
        ];
        let tree = build(&rows, &key_fns, weighted()).unwrap();
        let keys: Vec<&str> = tree
            .children(tree.root())
            .iter()
            .map(|&c| tree.get(c).key.as_str())
            .collect();
        assert!(keys.contains(&SENTINEL_KEY));
        assert!(keys.contains(&"Togo"));
    }

    #[test]
    fn missing_weight_contributes_zero_but_is_counted() {
        let rows = vec![
            Item { country: "Togo", set: "A", weight: Some(100.0) },
            Item { country: "Togo", set: "A", weight: None },
            Item { country: "Togo", set: "A", weight: Some(f64::NAN) },
        ];
        let tree = build(&rows, &key_fns(), weighted()).unwrap();
        let root = tree.get(tree.root());
        assert!((root.aggregate - 100.0).abs() < AGG_EPSILON);
        assert_eq!(root.item_count, 3);
    }

    #[test]
    fn failing_key_fn_aborts_build() {
        let key_fns: Vec<Key> = vec![
            Box::new(|i: &Item| Ok(Some(i.country.to_owned()))),
            Box::new(|_: &Item| Err("bad field access".to_owned())),
        ];
        let err = build(&items(), &key_fns, weighted()).unwrap_err();
        match err {
            BuildError::KeyFn { level, .. } => assert_eq!(level, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn key_order_changes_shape_but_not_total() {
        let forward = build(&items(), &key_fns(), weighted()).unwrap();
        let reversed: Vec<Key> = vec![
            Box::new(|i: &Item| Ok(Some(i.set.to_owned()))),
            Box::new(|i: &Item| Ok(Some(i.country.to_owned()))),
        ];
        let backward = build(&items(), &reversed, weighted()).unwrap();
        assert!(
            (forward.get(forward.root()).aggregate - backward.get(backward.root()).aggregate)
                .abs()
                < AGG_EPSILON
        );
        // Shapes differ: the first level has 2 countries vs 2 sets, but the
        // set-first tree puts both countries under "A".
        let a = *backward
            .children(backward.root())
            .iter()
            .find(|&&c| backward.get(c).key == "A")
            .unwrap();
        assert_eq!(backward.children(a).len(), 2);
    }

    #[test]
    fn count_mode_ignores_weights() {
        let tree = build(
            &items(),
            &key_fns(),
            None::<NoWeight<Item>>,
        )
        .unwrap();
        let root = tree.get(tree.root());
        assert!((root.aggregate - 3.0).abs() < AGG_EPSILON);
    }

    #[test]
    fn share_of_root_snapshot() {
        let tree = build(&items(), &key_fns(), weighted()).unwrap();
        let togo = find(&tree, tree.root(), "Togo");
        assert!((tree.get(togo).share_of_root - 150.0 / 180.0).abs() < 1e-9);
        let a = find(&tree, togo, "A");
        assert!((tree.get(a).share_of_root - 100.0 / 180.0).abs() < 1e-9);
    }
}
