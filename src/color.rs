//! Stable cell colors.
//!
//! A cell's color is a pure function of its sibling group and its own key,
//! so resizes, re-layouts and drill-in/out never recolor a node, and legend
//! swatches match cells by construction.

use egui::Color32;

/// Qualitative palette; ordered for contrast between neighboring hashes.
const PALETTE: [Color32; 12] = [
    Color32::from_rgb(0x4e, 0x79, 0xa7),
    Color32::from_rgb(0xf2, 0x8e, 0x2b),
    Color32::from_rgb(0xe1, 0x57, 0x59),
    Color32::from_rgb(0x76, 0xb7, 0xb2),
    Color32::from_rgb(0x59, 0xa1, 0x4f),
    Color32::from_rgb(0xed, 0xc9, 0x48),
    Color32::from_rgb(0xb0, 0x7a, 0xa1),
    Color32::from_rgb(0xff, 0x9d, 0xa7),
    Color32::from_rgb(0x9c, 0x75, 0x5f),
    Color32::from_rgb(0xba, 0xb0, 0xac),
    Color32::from_rgb(0x86, 0xbc, 0xb6),
    Color32::from_rgb(0xd3, 0x72, 0x95),
];

/// Color for the cell `key` within the sibling group `group` (the focus
/// node's key). Same inputs, same color, always.
pub fn cell_color(group: &str, key: &str) -> Color32 {
    let hash = fnv1a(group.as_bytes(), fnv1a(key.as_bytes(), FNV_OFFSET));
    PALETTE[(hash % PALETTE.len() as u64) as usize]
}

/// Brightened variant used for the hovered cell.
pub fn hover_color(base: Color32) -> Color32 {
    let lift = |c: u8| c.saturating_add(((255 - c as u16) / 3) as u8);
    Color32::from_rgb(lift(base.r()), lift(base.g()), lift(base.b()))
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8], seed: u64) -> u64 {
    let mut hash = seed;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
