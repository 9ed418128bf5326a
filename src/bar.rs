// Proportional bar model
//
// Everything a renderer needs for one taxonomy: segments in summary order with
// width, color, inline-label visibility and tooltip lines, plus the legend.
// Renderers (terminal UI, text report) draw this; they never re-aggregate.

use crate::aggregate::{classified_count, summarize, CategorySummary};
use crate::entity::Token;
use crate::palette::{segment_color, shows_inline_label, ColorPolicy};
use crate::taxonomy::Taxonomy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub label: String,
    pub field: String,
    pub color: String,
    pub count: usize,

    /// Width as a percentage of the full bar
    pub percentage: f64,

    /// Inline label is drawn only on wide enough segments
    pub show_label: bool,

    pub tooltip: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionBar {
    pub key: String,
    pub title: String,
    pub description: String,

    /// Size of the token set the percentages are relative to
    pub total: usize,

    /// Tokens flagged in at least one category
    pub classified: usize,

    pub segments: Vec<Segment>,
    pub legend: Vec<LegendEntry>,
}

/// Aggregate and lay out one taxonomy
pub fn build_bar(tokens: &[Token], taxonomy: &Taxonomy, policy: ColorPolicy) -> DistributionBar {
    let summary = summarize(tokens, taxonomy);
    let classified = classified_count(tokens, taxonomy);
    from_summary(&summary, taxonomy, tokens.len(), classified, policy)
}

/// Lay out an already-sorted summary
pub fn from_summary(
    summary: &[CategorySummary],
    taxonomy: &Taxonomy,
    total: usize,
    classified: usize,
    policy: ColorPolicy,
) -> DistributionBar {
    let mut segments = Vec::with_capacity(summary.len());
    let mut legend = Vec::with_capacity(summary.len());

    for (rank, s) in summary.iter().enumerate() {
        let definition_index = taxonomy
            .categories
            .iter()
            .position(|c| c.field == s.field)
            .unwrap_or(rank);
        let color = segment_color(policy, rank, definition_index).to_string();

        segments.push(Segment {
            label: s.label.clone(),
            field: s.field.clone(),
            color: color.clone(),
            count: s.count,
            percentage: s.percentage,
            show_label: shows_inline_label(s.percentage),
            tooltip: tooltip_lines(s, total),
        });

        legend.push(LegendEntry {
            label: s.label.clone(),
            color,
            count: s.count,
        });
    }

    DistributionBar {
        key: taxonomy.key.clone(),
        title: taxonomy.title.clone(),
        description: taxonomy.description.clone(),
        total,
        classified,
        segments,
        legend,
    }
}

/// Tooltip body for one segment:
///
/// ```text
/// Payment Token
/// Primarily serves as a medium of exchange ...
///
/// 2 of 3 Tokens
/// Tether – Stablecoin pegged to USD (peg history disputed)
/// ```
pub fn tooltip_lines(summary: &CategorySummary, total: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(summary.members.len() + 4);
    lines.push(summary.label.clone());
    lines.push(summary.definition.clone());
    lines.push(String::new());
    lines.push(format!("{} of {} Tokens", summary.count, total));

    for member in &summary.members {
        let mut line = format!("{} – {}", member.name, member.info);
        if let Some(uncertainty) = &member.uncertainty {
            line.push_str(&format!(" ({})", uncertainty));
        }
        lines.push(line);
    }

    lines
}

/// Split `width` cells across segments by cumulative percentage.
///
/// Overlapping categories can push the total past 100%; anything beyond the
/// bar's end is clipped, the same way an overflowing flex row would be.
pub fn cell_widths(segments: &[Segment], width: u16) -> Vec<u16> {
    let full = width as f64;
    let mut cumulative = 0.0;
    let mut start: u16 = 0;

    segments
        .iter()
        .map(|s| {
            cumulative += s.percentage;
            let end = ((cumulative / 100.0) * full).round().min(full) as u16;
            let cells = end.saturating_sub(start);
            start = start.max(end);
            cells
        })
        .collect()
}
