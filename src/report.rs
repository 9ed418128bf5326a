// 📝 Text and JSON reports
//
// Non-interactive render of the same models the terminal UI draws.

use crate::bar::DistributionBar;
use crate::entity::SupplyKind;
use crate::histogram::Bin;
use chrono::{DateTime, Utc};
use serde::Serialize;

const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Serialize)]
pub struct SupplyChart {
    pub kind: SupplyKind,
    pub title: String,
    pub bins: Vec<Bin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub total_tokens: usize,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub taxonomies: Vec<DistributionBar>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supply: Vec<SupplyChart>,
}

impl Report {
    pub fn new(total_tokens: usize) -> Self {
        Report {
            generated_at: Utc::now(),
            total_tokens,
            taxonomies: Vec::new(),
            supply: Vec::new(),
        }
    }

    pub fn with_bars(mut self, bars: Vec<DistributionBar>) -> Self {
        self.taxonomies = bars;
        self
    }

    pub fn with_supply(mut self, kind: SupplyKind, bins: Vec<Bin>) -> Self {
        self.supply.push(SupplyChart {
            kind,
            title: kind.title().to_string(),
            bins,
        });
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self, show_members: bool) -> String {
        let mut out = Vec::new();

        for bar in &self.taxonomies {
            out.extend(render_bar(bar, show_members));
            out.push(String::new());
        }

        for chart in &self.supply {
            out.extend(render_bins(&chart.title, &chart.bins, show_members));
            out.push(String::new());
        }

        out.join("\n")
    }
}

/// One taxonomy as a ranked list with proportional `█` runs
pub fn render_bar(bar: &DistributionBar, show_members: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({} of {} tokens classified)",
        bar.title, bar.classified, bar.total
    )];

    let label_width = bar
        .segments
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0);

    for segment in &bar.segments {
        let cells = ((segment.percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
        lines.push(format!(
            "  {:<width$}  {:>3}  {:>5.1}%  {}",
            segment.label,
            segment.count,
            segment.percentage,
            "█".repeat(cells.min(BAR_WIDTH)),
            width = label_width
        ));

        if show_members {
            // skip the label/definition header, already on the row above
            for line in segment.tooltip.iter().skip(3) {
                lines.push(format!("      {}", line));
            }
        }
    }

    lines
}

/// One supply histogram as labelled count rows
pub fn render_bins(title: &str, bins: &[Bin], show_members: bool) -> Vec<String> {
    let mut lines = vec![title.to_string()];

    let label_width = bins.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);

    for bin in bins {
        let cells = (bin.count as f64 / peak as f64 * BAR_WIDTH as f64).round() as usize;
        lines.push(format!(
            "  {:<width$}  {:>3}  {}",
            bin.label,
            bin.count,
            "█".repeat(cells),
            width = label_width
        ));

        if show_members {
            for line in bin.tooltip.iter().skip(1) {
                lines.push(format!("      {}", line));
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::build_bar;
    use crate::entity::Token;
    use crate::histogram::{bins, build_histogram};
    use crate::palette::ColorPolicy;
    use crate::taxonomy::token_class;

    fn tokens() -> Vec<Token> {
        vec![
            Token::new("A").with("Payment_Token", 1).with("Information_Class", "pays"),
            Token::new("B").with("Payment_Token", 1),
            Token::new("C").with("Utility_Token", 1).with("max_supply", 2_000.0),
        ]
    }

    #[test]
    fn test_render_bar_rows() {
        let bar = build_bar(&tokens(), &token_class(), ColorPolicy::Positional);
        let lines = render_bar(&bar, false);

        assert_eq!(lines[0], "Token Class (3 of 3 tokens classified)");
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("  Payment Token"));
        assert!(lines[1].contains("  2   66.7%  "));
        assert_eq!(lines[1].matches('█').count(), 27);
        assert!(lines[4].contains("0.0%"));
    }

    #[test]
    fn test_render_bar_members() {
        let bar = build_bar(&tokens(), &token_class(), ColorPolicy::Positional);
        let lines = render_bar(&bar, true);

        assert!(lines.contains(&"      2 of 3 Tokens".to_string()));
        assert!(lines.contains(&"      A – pays".to_string()));
    }

    #[test]
    fn test_render_bins_members() {
        let data = build_histogram(&tokens(), SupplyKind::Max, true);
        let lines = render_bins("Maximum Supply", &bins(&data, SupplyKind::Max), true);

        assert_eq!(lines[0], "Maximum Supply");
        assert!(lines[1].starts_with("  No max supply"));
        assert!(lines.contains(&"      • A: No max".to_string()));
        assert!(lines.contains(&"      • C: 2.00 k".to_string()));
    }

    #[test]
    fn test_json_report_shape() {
        let bar = build_bar(&tokens(), &token_class(), ColorPolicy::Positional);
        let report = Report::new(3).with_bars(vec![bar]);
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["total_tokens"], 3);
        assert_eq!(value["taxonomies"][0]["key"], "class");
        assert_eq!(value["taxonomies"][0]["segments"][0]["color"], "#232e3fff");
        assert!(value.get("supply").is_none());
        assert!(value["generated_at"].is_string());
    }
}
