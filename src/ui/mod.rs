//! Stateless egui UI helpers shared by the app shell.
//!
//! Label fitting and the small formatting utilities used by cells, the
//! tooltip and the legend.

use eframe::egui;

/// Fit `text` into `max_width`, truncating with an ellipsis. Shrinks one
/// character at a time and re-measures until the candidate fits. Returns
/// `None` when nothing useful fits (the cell then renders without a label).
pub fn fit_label(
    ctx: &egui::Context,
    text: &str,
    font: &egui::FontId,
    max_width: f32,
) -> Option<String> {
    if max_width <= 0.0 || text.is_empty() {
        return None;
    }
    let measure = |s: String| -> f32 {
        ctx.fonts(|f| {
            f.layout_no_wrap(s, font.clone(), egui::Color32::PLACEHOLDER)
                .rect
                .width()
        })
    };
    if measure(text.to_owned()) <= max_width {
        return Some(text.to_owned());
    }

    let chars: Vec<char> = text.chars().collect();
    let mut keep = chars.len().saturating_sub(1);
    while keep > 0 {
        let mut candidate: String = chars[..keep].iter().collect();
        candidate.truncate(candidate.trim_end().len());
        candidate.push('…');
        if measure(candidate.clone()) <= max_width {
            return Some(candidate);
        }
        keep -= 1;
    }
    None
}

/// Thousands-separated integer, for item counts.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Aggregates are sums of counts or word counts; render them as
/// thousands-separated integers.
pub fn format_weight(x: f64) -> String {
    format_count(x.round().max(0.0) as usize)
}

/// A 0..1 share as a one-decimal percentage.
pub fn format_share(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}
