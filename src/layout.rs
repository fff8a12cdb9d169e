//! Squarified treemap layout.
//!
//! Converts one level of the tree (an already-sorted child list) into
//! proportional rectangles following Bruls et al.: keep adding items to the
//! current row while the worst aspect ratio improves, then flush the row as
//! a strip along the shorter side of the remaining rectangle.
//!
//! Rectangles are ephemeral: they are recomputed on every focus change or
//! resize and carry no identity across passes.

use std::collections::HashMap;

use crate::tree::{NodeId, Tree};

/// A laid-out cell. `w`/`h` may be 0 for zero-aggregate nodes.
#[derive(Debug, Clone, Copy)]
pub struct LayoutRect {
    pub node: NodeId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl LayoutRect {
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

/// Layout output: cells in the order given plus an id index for O(1) lookup.
#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    pub rects: Vec<LayoutRect>,
    by_node: HashMap<NodeId, usize>,
}

impl LayoutResult {
    pub fn get(&self, node: NodeId) -> Option<&LayoutRect> {
        self.by_node.get(&node).map(|&i| &self.rects[i])
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    fn push(&mut self, rect: LayoutRect) {
        self.by_node.insert(rect.node, self.rects.len());
        self.rects.push(rect);
    }
}

/// Lay out `children` (taken in the order given, never re-sorted) inside a
/// `width` x `height` rectangle. `padding` insets each cell symmetrically
/// after area computation, flooring at zero size.
///
/// Degenerate inputs degrade instead of failing: non-positive dimensions
/// return an empty result, and zero-aggregate children become zero-area
/// rectangles with finite coordinates.
pub fn layout(
    tree: &Tree,
    children: &[NodeId],
    width: f32,
    height: f32,
    padding: f32,
) -> LayoutResult {
    let mut result = LayoutResult::default();
    if width <= 0.0 || height <= 0.0 || children.is_empty() {
        return result;
    }

    let weights: Vec<f64> = children
        .iter()
        .map(|&c| {
            let a = tree.get(c).aggregate;
            if a.is_finite() && a > 0.0 { a } else { 0.0 }
        })
        .collect();
    let total: f64 = weights.iter().sum();

    // Scale weights to pixel areas; with no positive weight everything
    // degenerates to zero-area cells in the top-left corner.
    let scale = if total > 0.0 {
        (width as f64 * height as f64) / total
    } else {
        0.0
    };

    let positive: Vec<(usize, f64)> = weights
        .iter()
        .enumerate()
        .filter(|&(_, &w)| w > 0.0)
        .map(|(i, &w)| (i, w * scale))
        .collect();

    let mut placed: Vec<Option<LayoutRect>> = vec![None; children.len()];
    squarify(&positive, children, 0.0, 0.0, width as f64, height as f64, &mut placed);

    // Zero-weight children collapse to a point at the origin of whatever
    // space remains conceptually exhausted; (0,0) keeps coordinates finite.
    for (i, slot) in placed.iter_mut().enumerate() {
        if slot.is_none() {
            *slot = Some(LayoutRect { node: children[i], x: 0.0, y: 0.0, w: 0.0, h: 0.0 });
        }
    }

    for rect in placed.into_iter().flatten() {
        result.push(inset(rect, padding));
    }
    result
}

/// Symmetric inset, preserving the cell center and flooring at zero size.
fn inset(rect: LayoutRect, padding: f32) -> LayoutRect {
    if padding <= 0.0 {
        return rect;
    }
    let w = (rect.w - 2.0 * padding).max(0.0);
    let h = (rect.h - 2.0 * padding).max(0.0);
    LayoutRect {
        node: rect.node,
        x: rect.x + (rect.w - w) * 0.5,
        y: rect.y + (rect.h - h) * 0.5,
        w,
        h,
    }
}

/// Core row-building loop. `items` are (child index, pixel area) pairs in
/// display order; results land in `placed` at the child index.
#[allow(clippy::too_many_arguments)]
fn squarify(
    items: &[(usize, f64)],
    children: &[NodeId],
    mut x: f64,
    mut y: f64,
    mut w: f64,
    mut h: f64,
    placed: &mut [Option<LayoutRect>],
) {
    let mut idx = 0usize;
    let mut row_start = 0usize;
    let mut row_sum = 0.0;
    let mut row_min = f64::INFINITY;
    let mut row_max = 0.0f64;

    while idx < items.len() {
        if w <= f64::EPSILON || h <= f64::EPSILON {
            // Remaining space exhausted by float drift; everything left
            // becomes zero-area at the current corner.
            for &(child, _) in &items[idx..] {
                placed[child] = Some(LayoutRect {
                    node: children[child],
                    x: x as f32,
                    y: y as f32,
                    w: 0.0,
                    h: 0.0,
                });
            }
            return;
        }

        let area = items[idx].1;
        let side = w.min(h);
        let current = if row_sum > 0.0 {
            worst_aspect(row_min, row_max, row_sum, side)
        } else {
            f64::INFINITY
        };
        let next_sum = row_sum + area;
        let next_min = row_min.min(area);
        let next_max = row_max.max(area);
        let next = worst_aspect(next_min, next_max, next_sum, side);

        // Keep accumulating while the worst aspect ratio improves.
        if row_sum <= 0.0 || next <= current {
            row_sum = next_sum;
            row_min = next_min;
            row_max = next_max;
            idx += 1;
            continue;
        }

        flush_row(
            &items[row_start..idx],
            children,
            row_sum,
            &mut x,
            &mut y,
            &mut w,
            &mut h,
            placed,
        );
        row_start = idx;
        row_sum = 0.0;
        row_min = f64::INFINITY;
        row_max = 0.0;
    }

    if row_sum > 0.0 && row_start < idx {
        flush_row(
            &items[row_start..idx],
            children,
            row_sum,
            &mut x,
            &mut y,
            &mut w,
            &mut h,
            placed,
        );
    }
}

/// Flush one row as a strip along the shorter side of the remaining
/// rectangle, then shrink the remaining rectangle by the strip's thickness.
#[allow(clippy::too_many_arguments)]
fn flush_row(
    row: &[(usize, f64)],
    children: &[NodeId],
    row_sum: f64,
    x: &mut f64,
    y: &mut f64,
    w: &mut f64,
    h: &mut f64,
    placed: &mut [Option<LayoutRect>],
) {
    if row.is_empty() || row_sum <= 0.0 || *w <= f64::EPSILON || *h <= f64::EPSILON {
        return;
    }

    // Shortest side picks the strip direction: width shortest means a
    // horizontal strip stacked downward, otherwise a vertical strip.
    let horizontal = *w <= *h;
    let short = if horizontal { *w } else { *h };
    let thickness = row_sum / short;
    if !thickness.is_finite() || thickness <= 0.0 {
        return;
    }

    let mut offset = 0.0;
    for (i, &(child, area)) in row.iter().enumerate() {
        let mut length = area / thickness;
        if !length.is_finite() || length < 0.0 {
            length = 0.0;
        }
        // The final cell absorbs accumulated float error so strip lengths
        // sum exactly to the remaining side.
        if i == row.len() - 1 {
            let remaining = if horizontal { *w - offset } else { *h - offset };
            if remaining.is_finite() && remaining > 0.0 {
                length = remaining;
            }
        }

        let rect = if horizontal {
            LayoutRect {
                node: children[child],
                x: (*x + offset) as f32,
                y: *y as f32,
                w: length as f32,
                h: thickness as f32,
            }
        } else {
            LayoutRect {
                node: children[child],
                x: *x as f32,
                y: (*y + offset) as f32,
                w: thickness as f32,
                h: length as f32,
            }
        };
        placed[child] = Some(rect);
        offset += length;
    }

    if horizontal {
        *y += thickness;
        *h = (*h - thickness).max(0.0);
    } else {
        *x += thickness;
        *w = (*w - thickness).max(0.0);
    }
}

/// Worst width/height ratio any cell in the row would get, from the row's
/// min/max areas (Bruls et al., eq. for `worst`).
fn worst_aspect(min_area: f64, max_area: f64, sum: f64, side: f64) -> f64 {
    if sum <= 0.0 || side <= 0.0 || min_area <= 0.0 || max_area <= 0.0 {
        return f64::MAX;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    ((side_sq * max_area) / sum_sq).max(sum_sq / (side_sq * min_area))
}
