//! Text measurement and truncation.
//!
//! There is no font rasteriser in the scene graph, so widths are estimated from
//! the character count. Good enough to keep labels inside bubbles and legends.

/// Heuristic pixel width of `text` at `font_px`.
pub fn estimate_text_width_px(text: &str, font_px: f64) -> f64 {
    (text.chars().count() as f64 * font_px * 0.60).ceil()
}

/// Truncate to fit `max_px`, ending with a single ellipsis if anything was cut.
pub fn truncate_to_width(text: &str, font_px: f64, max_px: f64) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if estimate_text_width_px(&out, font_px) + font_px * 0.60 > max_px {
            out.pop();
            break;
        }
    }
    if out.is_empty() {
        return String::new();
    }
    out.push('…');
    out
}

/// Font size that fits `text` into `max_px`, never larger than `preferred`
/// and never smaller than `min`.
pub fn fit_font_size(text: &str, preferred: f64, min: f64, max_px: f64) -> f64 {
    let chars = text.chars().count().max(1) as f64;
    (max_px / (chars * 0.60)).clamp(min, preferred.max(min))
}
