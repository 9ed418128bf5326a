// 📈 Supply Histograms
//
// Two halves:
// - `build_histogram`: raw token supplies -> log-binned chart data
//   (labels, counts, edges, per-token bin index)
// - `bin_tokens` / `bins`: chart data -> per-bin member lists for tooltips,
//   with a `missing` bucket for absent or non-positive values
//
// The grouping side never recomputes bucket boundaries. It trusts `bin_idx`
// and only checks that the value behind it is usable.

use crate::entity::{SupplyKind, Token};
use crate::error::{DatasetError, Result};
use crate::format::{human, locale, log_range_label};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Width of one bin in natural-log units
pub const BIN_WIDTH: f64 = 0.5;

/// Label of the sentinel bar for tokens without a usable value
pub const NO_MAX_LABEL: &str = "No max supply";

// ============================================================================
// CHART DATA
// ============================================================================

/// Precomputed histogram, JSON-compatible with the chart files.
///
/// Every collection tolerates being absent or `null` and reads as empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistogramData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_tokens: usize,

    #[serde(default, deserialize_with = "null_as_default")]
    pub log_base: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub bin_edges: Vec<f64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub bin_counts: Vec<u64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub bin_labels: Vec<String>,

    #[serde(default, deserialize_with = "lenient_tokens")]
    pub tokens: Vec<Token>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_tokens<'de, D>(deserializer: D) -> std::result::Result<Vec<Token>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(Token::from_value)
        .collect())
}

/// Precomputed bin index of a chart token, if it is a non-negative integer
pub fn bin_index(token: &Token) -> Option<usize> {
    let n = token.fields.get("bin_idx")?.as_f64()?;
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 {
        Some(n as usize)
    } else {
        None
    }
}

/// Usable value for binning: finite and strictly positive
pub fn binnable_value(token: &Token, kind: SupplyKind) -> Option<f64> {
    token.supply(kind).filter(|v| *v > 0.0)
}

pub fn load_histogram(path: &Path) -> Result<HistogramData> {
    let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_histogram(path: &Path, data: &HistogramData) -> Result<()> {
    let json = serde_json::to_string_pretty(data).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::write(path, json).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// BUILDER
// ============================================================================

/// Bin token supplies on a natural-log scale.
///
/// Edges run from `floor(min log)` to `ceil(max log)` in steps of `BIN_WIDTH`.
/// Intervals are closed-open except the last, which is closed. Tokens without a
/// positive finite value are "missing": with `include_missing_bar` they get a
/// leading "No max supply" bar (index 0, valid indices shift by one), otherwise
/// they carry `bin_idx = -1` and appear in no bar.
pub fn build_histogram(tokens: &[Token], kind: SupplyKind, include_missing_bar: bool) -> HistogramData {
    let mut valid: Vec<(&str, f64, f64)> = Vec::new();
    let mut missing: Vec<&str> = Vec::new();

    for token in tokens {
        match binnable_value(token, kind) {
            Some(v) => valid.push((token.name.as_str(), v, v.ln())),
            None => missing.push(token.name.as_str()),
        }
    }

    debug!(
        "Building {} histogram: {} valid, {} missing",
        kind,
        valid.len(),
        missing.len()
    );

    if valid.is_empty() {
        let (bin_counts, bin_labels) = if include_missing_bar {
            (vec![missing.len() as u64], vec![NO_MAX_LABEL.to_string()])
        } else {
            (Vec::new(), Vec::new())
        };

        return HistogramData {
            total_tokens: tokens.len(),
            log_base: "e".to_string(),
            bin_edges: Vec::new(),
            bin_counts,
            bin_labels,
            tokens: missing
                .iter()
                .map(|name| chart_token(name, kind, None, -1))
                .collect(),
        };
    }

    let edges = log_edges(valid.iter().map(|(_, _, lg)| *lg));
    let bin_count = edges.len() - 1;

    let mut counts = vec![0u64; bin_count];
    let mut chart_tokens = Vec::with_capacity(tokens.len());

    let shift = if include_missing_bar && !missing.is_empty() { 1 } else { 0 };

    for (name, value, lg) in &valid {
        let idx = locate(&edges, *lg);
        counts[idx] += 1;
        chart_tokens.push(chart_token(name, kind, Some((*value, *lg)), (idx + shift) as i64));
    }

    let missing_idx = if shift == 1 { 0 } else { -1 };
    for name in &missing {
        chart_tokens.push(chart_token(name, kind, None, missing_idx));
    }

    let mut bin_labels: Vec<String> = edges
        .windows(2)
        .map(|w| log_range_label(w[0], w[1]))
        .collect();

    if shift == 1 {
        bin_labels.insert(0, NO_MAX_LABEL.to_string());
        counts.insert(0, missing.len() as u64);
    }

    HistogramData {
        total_tokens: tokens.len(),
        log_base: "e".to_string(),
        bin_edges: edges,
        bin_counts: counts,
        bin_labels,
        tokens: chart_tokens,
    }
}

fn log_edges(logs: impl Iterator<Item = f64>) -> Vec<f64> {
    let (min, max) = logs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(x), hi.max(x))
    });

    let lo = min.floor();
    let hi = max.ceil();
    let n = ((hi + BIN_WIDTH - lo) / BIN_WIDTH).ceil() as usize;

    if n < 2 {
        return vec![lo, lo + BIN_WIDTH];
    }

    (0..n).map(|k| lo + k as f64 * BIN_WIDTH).collect()
}

/// Interval index for `x`; values on the final edge land in the last bin
fn locate(edges: &[f64], x: f64) -> usize {
    let bins = edges.len() - 1;
    edges
        .partition_point(|e| *e <= x)
        .saturating_sub(1)
        .min(bins - 1)
}

fn chart_token(name: &str, kind: SupplyKind, value: Option<(f64, f64)>, bin_idx: i64) -> Token {
    let (value, log) = match value {
        Some((v, lg)) => (Value::from(v), Value::from((lg * 10_000.0).round() / 10_000.0)),
        None => (Value::Null, Value::Null),
    };

    Token::new(name)
        .with(kind.field(), value)
        .with("log_supply", log)
        .with("bin_idx", bin_idx)
}

// ============================================================================
// GROUPING
// ============================================================================

/// Chart tokens grouped by bin, plus everything that could not be placed
#[derive(Debug, Clone, Default)]
pub struct BinnedTokens<'a> {
    buckets: BTreeMap<usize, Vec<&'a Token>>,
    missing: Vec<&'a Token>,
}

impl<'a> BinnedTokens<'a> {
    pub fn bucket(&self, idx: usize) -> &[&'a Token] {
        self.buckets.get(&idx).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn missing(&self) -> &[&'a Token] {
        &self.missing
    }

    /// Members to list for bin `idx` labelled `label`.
    ///
    /// The sentinel bar has no regular members, so it shows `missing` instead:
    /// either its label says "no max", or it is bin 0, empty, and there is
    /// something missing to show.
    pub fn members_for(&self, idx: usize, label: &str) -> &[&'a Token] {
        let list = self.bucket(idx);
        let is_no_max = label.to_lowercase().contains("no max");

        if is_no_max || (list.is_empty() && !self.missing.is_empty() && idx == 0) {
            &self.missing
        } else {
            list
        }
    }
}

/// Group chart tokens by their precomputed bin index
pub fn bin_tokens(data: &HistogramData, kind: SupplyKind) -> BinnedTokens<'_> {
    let mut binned = BinnedTokens::default();

    for token in &data.tokens {
        match (bin_index(token), binnable_value(token, kind)) {
            (Some(idx), Some(_)) => binned.buckets.entry(idx).or_default().push(token),
            _ => binned.missing.push(token),
        }
    }

    binned
}

// ============================================================================
// DISPLAY BINS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub index: usize,
    pub label: String,

    /// Raw-unit bounds, `[lower, upper)`; `None` for the sentinel bar
    pub lower: Option<f64>,
    pub upper: Option<f64>,

    pub count: u64,

    /// Tooltip member list (the sentinel bar lists the missing tokens)
    pub members: Vec<Token>,

    pub tooltip: Vec<String>,
}

/// How a chart renders its tooltip body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipStyle {
    /// "• name: 1.50 k", absent values as "No max"
    MemberList,

    /// "name: 1,500", empty bins as "No Tokens in this bin"
    LocaleList,
}

impl TooltipStyle {
    pub fn for_kind(kind: SupplyKind) -> Self {
        match kind {
            SupplyKind::Max => TooltipStyle::MemberList,
            SupplyKind::Total | SupplyKind::Circulating => TooltipStyle::LocaleList,
        }
    }
}

/// Tooltip lines for one bar
pub fn tooltip_lines(label: &str, members: &[&Token], kind: SupplyKind) -> Vec<String> {
    let mut lines = vec![format!("Bin: {}", label)];

    match TooltipStyle::for_kind(kind) {
        TooltipStyle::MemberList => {
            lines.push("Tokens in this Bin:".to_string());
            for token in members {
                let value = match token.supply(kind) {
                    Some(v) => human(Some(v)),
                    None => "No max".to_string(),
                };
                lines.push(format!("• {}: {}", token.name, value));
            }
        }
        TooltipStyle::LocaleList => {
            if members.is_empty() {
                lines.push("No Tokens in this bin".to_string());
            }
            for token in members {
                lines.push(format!("{}: {}", token.name, locale(token.supply(kind))));
            }
        }
    }

    lines
}

/// Everything the bar chart needs, one entry per label
pub fn bins(data: &HistogramData, kind: SupplyKind) -> Vec<Bin> {
    let binned = bin_tokens(data, kind);
    let edge_bins = data.bin_edges.len().saturating_sub(1);
    // a leading sentinel bar has no edges of its own
    let offset = data.bin_labels.len().saturating_sub(edge_bins);

    data.bin_labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let members = binned.members_for(i, label);
            let (lower, upper) = match i.checked_sub(offset) {
                Some(e) if e < edge_bins => (
                    Some(unlog(&data.log_base, data.bin_edges[e])),
                    Some(unlog(&data.log_base, data.bin_edges[e + 1])),
                ),
                _ => (None, None),
            };

            Bin {
                index: i,
                label: label.clone(),
                lower,
                upper,
                count: data.bin_counts.get(i).copied().unwrap_or(0),
                members: members.iter().map(|t| (*t).clone()).collect(),
                tooltip: tooltip_lines(label, members, kind),
            }
        })
        .collect()
}

fn unlog(base: &str, x: f64) -> f64 {
    match base {
        "10" => 10f64.powf(x),
        "2" => 2f64.powf(x),
        _ => x.exp(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart(value: serde_json::Value) -> HistogramData {
        serde_json::from_value(value).unwrap()
    }

    fn names(tokens: &[&Token]) -> Vec<String> {
        tokens.iter().map(|t| t.name.clone()).collect()
    }

    fn max_chart() -> HistogramData {
        chart(json!({
            "total_tokens": 5,
            "log_base": "e",
            "bin_edges": [14.0, 14.5, 15.0],
            "bin_counts": [2, 2, 1],
            "bin_labels": ["No max supply", "1 M – 2 M", "2 M – 3 M"],
            "tokens": [
                {"name": "Bitcoin-ish", "max_supply": 2100000.0, "bin_idx": 1},
                {"name": "Capped", "max_supply": 1500000.0, "bin_idx": 1},
                {"name": "Bigger", "max_supply": 3000000.0, "bin_idx": 2},
                {"name": "Tether", "max_supply": null, "bin_idx": 0},
                {"name": "Zeroed", "max_supply": 0, "bin_idx": 0}
            ]
        }))
    }

    #[test]
    fn test_sentinel_routing_for_null_and_zero() {
        let data = max_chart();
        let binned = bin_tokens(&data, SupplyKind::Max);

        assert_eq!(names(binned.missing()), vec!["Tether", "Zeroed"]);
        for idx in 0..3 {
            let bucket = names(binned.bucket(idx));
            assert!(!bucket.contains(&"Tether".to_string()));
            assert!(!bucket.contains(&"Zeroed".to_string()));
        }
        assert_eq!(names(binned.bucket(1)), vec!["Bitcoin-ish", "Capped"]);
    }

    #[test]
    fn test_invalid_bin_idx_goes_missing() {
        let data = chart(json!({
            "bin_labels": ["a", "b"],
            "bin_counts": [1, 1],
            "tokens": [
                {"name": "Neg", "max_supply": 10.0, "bin_idx": -1},
                {"name": "Frac", "max_supply": 10.0, "bin_idx": 0.5},
                {"name": "Str", "max_supply": 10.0, "bin_idx": "1"},
                {"name": "NoIdx", "max_supply": 10.0},
                {"name": "Ok", "max_supply": 10.0, "bin_idx": 1.0}
            ]
        }));

        let binned = bin_tokens(&data, SupplyKind::Max);
        assert_eq!(names(binned.missing()), vec!["Neg", "Frac", "Str", "NoIdx"]);
        assert_eq!(names(binned.bucket(1)), vec!["Ok"]);
    }

    #[test]
    fn test_members_for_substitutes_missing() {
        let data = max_chart();
        let binned = bin_tokens(&data, SupplyKind::Max);

        // label match, case-insensitive
        assert_eq!(names(binned.members_for(0, "No max supply")), vec!["Tether", "Zeroed"]);
        assert_eq!(names(binned.members_for(2, "NO MAX")), vec!["Tether", "Zeroed"]);
        // bin 0 empty with missing present
        assert_eq!(names(binned.members_for(0, "1 – 2")), vec!["Tether", "Zeroed"]);
        // ordinary bins untouched
        assert_eq!(names(binned.members_for(2, "2 M – 3 M")), vec!["Bigger"]);
        // empty non-first bin stays empty
        assert!(binned.members_for(7, "whatever").is_empty());
    }

    #[test]
    fn test_absent_inputs_are_empty() {
        let data = chart(json!({}));
        assert!(data.bin_labels.is_empty());
        assert!(data.tokens.is_empty());
        assert!(bins(&data, SupplyKind::Total).is_empty());

        let data = chart(json!({"bin_labels": null, "tokens": null, "bin_counts": null}));
        assert!(bins(&data, SupplyKind::Circulating).is_empty());
    }

    #[test]
    fn test_member_list_tooltip() {
        let data = max_chart();
        let all = bins(&data, SupplyKind::Max);

        assert_eq!(all.len(), 3);
        assert_eq!(
            all[0].tooltip,
            vec!["Bin: No max supply", "Tokens in this Bin:", "• Tether: No max", "• Zeroed: 0"]
        );
        assert_eq!(
            all[1].tooltip,
            vec!["Bin: 1 M – 2 M", "Tokens in this Bin:", "• Bitcoin-ish: 2.10 M", "• Capped: 1.50 M"]
        );
        assert_eq!(all[0].count, 2);
        assert_eq!(all[0].lower, None);
        assert!((all[1].lower.unwrap() - 14f64.exp()).abs() < 1e-3);
        assert!((all[2].upper.unwrap() - 15f64.exp()).abs() < 1e-3);
    }

    #[test]
    fn test_locale_tooltip() {
        let data = chart(json!({
            "bin_edges": [0.0, 0.5, 1.0],
            "bin_counts": [0, 1],
            "bin_labels": ["1 – 2", "2 – 3"],
            "tokens": [{"name": "Small", "circulating_supply": 2.5, "bin_idx": 1}]
        }));
        let all = bins(&data, SupplyKind::Circulating);

        assert_eq!(all[0].tooltip, vec!["Bin: 1 – 2", "No Tokens in this bin"]);
        assert_eq!(all[1].tooltip, vec!["Bin: 2 – 3", "Small: 2.5"]);
    }

    #[test]
    fn test_build_edges_and_labels() {
        let tokens = vec![
            Token::new("A").with("total_supply", 1_500.0),     // ln = 7.31
            Token::new("B").with("total_supply", 20_000.0),    // ln = 9.90
            Token::new("C").with("total_supply", 3_000.0),     // ln = 8.01
        ];

        let data = build_histogram(&tokens, SupplyKind::Total, false);

        assert_eq!(data.total_tokens, 3);
        assert_eq!(data.log_base, "e");
        assert_eq!(data.bin_edges, vec![7.0, 7.5, 8.0, 8.5, 9.0, 9.5, 10.0]);
        assert_eq!(data.bin_counts, vec![1, 0, 1, 0, 0, 1]);
        assert_eq!(data.bin_labels.len(), 6);
        assert_eq!(data.bin_labels[0], "1 k – 2 k");

        let idx: Vec<Option<usize>> = data.tokens.iter().map(bin_index).collect();
        assert_eq!(idx, vec![Some(0), Some(5), Some(2)]);
        assert_eq!(data.tokens[0].number("log_supply"), Some(7.3132));
    }

    #[test]
    fn test_build_with_missing_bar_shifts_indices() {
        let tokens = vec![
            Token::new("Capped").with("max_supply", 21_000_000.0),
            Token::new("Uncapped").with("max_supply", serde_json::Value::Null),
            Token::new("Zero").with("max_supply", 0),
        ];

        let data = build_histogram(&tokens, SupplyKind::Max, true);

        assert_eq!(data.bin_labels[0], NO_MAX_LABEL);
        assert_eq!(data.bin_counts[0], 2);
        assert_eq!(data.bin_labels.len(), data.bin_counts.len());
        assert_eq!(data.bin_labels.len(), data.bin_edges.len());

        assert_eq!(data.tokens[0].name, "Capped");
        assert!(bin_index(&data.tokens[0]).unwrap() >= 1);
        assert_eq!(bin_index(&data.tokens[1]), Some(0));
        assert_eq!(data.tokens[1].supply(SupplyKind::Max), None);

        // round trip through the grouping side
        let all = bins(&data, SupplyKind::Max);
        assert_eq!(all[0].members.len(), 2);
        let capped_bin = bin_index(&data.tokens[0]).unwrap();
        assert_eq!(all[capped_bin].members[0].name, "Capped");
        assert!(all[capped_bin].lower.unwrap() <= 21_000_000.0);
        assert!(all[capped_bin].upper.unwrap() > 21_000_000.0);
    }

    #[test]
    fn test_build_without_valid_values() {
        let tokens = vec![Token::new("A"), Token::new("B").with("max_supply", -5)];

        let data = build_histogram(&tokens, SupplyKind::Max, true);
        assert!(data.bin_edges.is_empty());
        assert_eq!(data.bin_labels, vec![NO_MAX_LABEL]);
        assert_eq!(data.bin_counts, vec![2]);
        assert_eq!(bin_index(&data.tokens[0]), None);

        let all = bins(&data, SupplyKind::Max);
        assert_eq!(all[0].members.len(), 2);

        let data = build_histogram(&tokens, SupplyKind::Total, false);
        assert!(data.bin_labels.is_empty());
        assert_eq!(data.tokens.len(), 2);
    }

    #[test]
    fn test_single_integral_log_gets_one_bin() {
        // ln(1) = 0 exactly: floor == ceil
        let tokens = vec![Token::new("Unit").with("total_supply", 1.0)];
        let data = build_histogram(&tokens, SupplyKind::Total, false);

        assert_eq!(data.bin_edges, vec![0.0, 0.5]);
        assert_eq!(data.bin_counts, vec![1]);
        assert_eq!(bin_index(&data.tokens[0]), Some(0));
    }

    #[test]
    fn test_value_on_last_edge_is_counted() {
        // ln(e^2) sits exactly on the top edge
        let top = 2f64.exp();
        let tokens = vec![
            Token::new("Low").with("total_supply", 1f64.exp()),
            Token::new("Top").with("total_supply", top),
        ];
        let data = build_histogram(&tokens, SupplyKind::Total, false);

        let last = data.bin_counts.len() - 1;
        let top_idx = bin_index(&data.tokens[1]).unwrap();
        assert!(top_idx <= last);
        assert_eq!(data.bin_counts.iter().sum::<u64>(), 2);
    }

    #[test]
    fn test_save_and_load_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SupplyKind::Max.chart_file());

        let tokens = vec![Token::new("Capped").with("max_supply", 1_000_000.0)];
        let data = build_histogram(&tokens, SupplyKind::Max, true);
        save_histogram(&path, &data).unwrap();

        let loaded = load_histogram(&path).unwrap();
        assert_eq!(loaded.bin_labels, data.bin_labels);
        assert_eq!(loaded.bin_counts, data.bin_counts);
        assert_eq!(loaded.tokens.len(), 1);
    }
}
