// 🎨 Segment colors and label policy
//
// Colors are assigned by rank in the sorted summary, not by category identity.
// Two renders with different data can give the same category different colors.

use serde::{Deserialize, Serialize};

/// Fixed RGBA palette, dark blues through warm greys
pub const PALETTE: [&str; 10] = [
    "#232e3fff", "#24355cff", "#253c78ff", "#777184ff", "#a08c8aff",
    "#b1a5a5ff", "#8f8282ff", "#6d5f5fff", "#574d4dff", "#403a3aff",
];

/// Segments at or below this percentage get no inline label
pub const LABEL_THRESHOLD: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorPolicy {
    /// i-th segment in sorted order gets the i-th color
    #[default]
    Positional,

    /// Color keyed by the category's position in its taxonomy table,
    /// stable across datasets
    ByCategory,
}

/// Palette entry for an index, cycling past the end
pub fn color_at(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Color for a segment at `rank` whose category sits at `definition_index`
pub fn segment_color(policy: ColorPolicy, rank: usize, definition_index: usize) -> &'static str {
    match policy {
        ColorPolicy::Positional => color_at(rank),
        ColorPolicy::ByCategory => color_at(definition_index),
    }
}

pub fn shows_inline_label(percentage: f64) -> bool {
    percentage > LABEL_THRESHOLD
}

/// Parse "#rrggbb" or "#rrggbbaa" into RGB components (alpha dropped)
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 && digits.len() != 8 {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
