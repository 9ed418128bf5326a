// 🔢 Number formatting for supply figures
//
// Three flavours:
// - `human`   : tooltip abbreviation ("1.50 k", "25 k", "3.20 B")
// - `locale`  : en-US grouping ("1,234,567.5")
// - `compact` : whole-unit labels used for histogram bin ranges ("3 M")

/// Marker shown instead of a number when the value is absent or not finite
pub const NO_VALUE: &str = "—";

const SCALES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "k")];

/// Abbreviate a magnitude with a T/B/M/k suffix.
///
/// Two decimals, dropped to zero once the value is at least 10x the scale
/// threshold. Below 1,000 the raw number is printed as-is.
pub fn human(value: Option<f64>) -> String {
    let Some(n) = value.filter(|v| v.is_finite()) else {
        return NO_VALUE.to_string();
    };

    let abs = n.abs();
    for (threshold, suffix) in SCALES {
        if abs >= threshold {
            let decimals = if abs >= threshold * 10.0 { 0 } else { 2 };
            return format!("{:.*} {}", decimals, n / threshold, suffix);
        }
    }

    plain(n)
}

/// Shortest plain rendering: integral values print without a fraction
fn plain(n: f64) -> String {
    if n == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{}", n)
}

/// en-US style grouping with at most three fraction digits
pub fn locale(value: Option<f64>) -> String {
    let Some(n) = value.filter(|v| v.is_finite()) else {
        return NO_VALUE.to_string();
    };

    let fixed = format!("{:.3}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = n < 0.0 && (int_part != "0" || !frac.is_empty());
    let sign = if negative { "-" } else { "" };

    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}

/// Whole-unit abbreviation for bin edges: "950", "3 k", "12 M", "T+" past 1e15.
pub fn compact(value: f64) -> String {
    let mut num = value;
    for unit in ["", "k", "M", "B", "T"] {
        if num.abs() < 1000.0 {
            let rendered = format!("{:.0} {}", num, unit);
            return rendered.trim().to_string();
        }
        num /= 1000.0;
    }
    "T+".to_string()
}

/// Label for a natural-log bin `[a, b)` in raw units
pub fn log_range_label(lower_log: f64, upper_log: f64) -> String {
    format!("{} – {}", compact(lower_log.exp()), compact(upper_log.exp()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_thresholds() {
        assert_eq!(human(Some(999.0)), "999");
        assert_eq!(human(Some(1_500.0)), "1.50 k");
        assert_eq!(human(Some(25_000.0)), "25 k");
        assert_eq!(human(Some(3_200_000_000.0)), "3.20 B");
        assert_eq!(human(Some(21_000_000.0)), "21 M");
        assert_eq!(human(Some(1_000_000.0)), "1.00 M");
        assert_eq!(human(Some(2.5e12)), "2.50 T");
        assert_eq!(human(Some(4.2e14)), "420 T");
    }

    #[test]
    fn test_human_small_and_negative() {
        assert_eq!(human(Some(0.0)), "0");
        assert_eq!(human(Some(12.5)), "12.5");
        assert_eq!(human(Some(-1_500.0)), "-1.50 k");
    }

    #[test]
    fn test_human_absent_marker() {
        assert_eq!(human(None), "—");
        assert_eq!(human(Some(f64::NAN)), NO_VALUE);
        assert_eq!(human(Some(f64::INFINITY)), NO_VALUE);
    }

    #[test]
    fn test_locale_grouping() {
        assert_eq!(locale(Some(0.0)), "0");
        assert_eq!(locale(Some(999.0)), "999");
        assert_eq!(locale(Some(1_000.0)), "1,000");
        assert_eq!(locale(Some(1_234_567.5)), "1,234,567.5");
        assert_eq!(locale(Some(100_000_000_000.0)), "100,000,000,000");
        assert_eq!(locale(Some(0.12345)), "0.123");
        assert_eq!(locale(Some(-45_000.25)), "-45,000.25");
        assert_eq!(locale(None), NO_VALUE);
    }

    #[test]
    fn test_compact_units() {
        assert_eq!(compact(950.0), "950");
        assert_eq!(compact(2_980.0), "3 k");
        assert_eq!(compact(12_182_493.0), "12 M");
        assert_eq!(compact(999.6), "1000");
        assert_eq!(compact(5e15), "T+");
    }

    #[test]
    fn test_log_range_label() {
        // e^7 ~ 1097, e^7.5 ~ 1808
        assert_eq!(log_range_label(7.0, 7.5), "1 k – 2 k");
        assert_eq!(log_range_label(0.0, 0.5), "1 – 2");
    }
}
