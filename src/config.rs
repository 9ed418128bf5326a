// Runtime configuration
//
// Resolution order: command-line flag, then environment (clap fills both into
// the same Option), then the defaults below.

use crate::entity::SupplyKind;
use crate::palette::ColorPolicy;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "data/erc20_full_data.json";
pub const DEFAULT_CHARTS_DIR: &str = "data";

pub const ENV_DATA_PATH: &str = "TOKENOMICS_DATA";
pub const ENV_CHARTS_DIR: &str = "TOKENOMICS_CHARTS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Token dataset (.json or .csv)
    pub data_path: PathBuf,

    /// Directory holding the precomputed `*_supply_chart.json` files
    pub charts_dir: PathBuf,

    pub color_policy: ColorPolicy,
}

impl Config {
    pub fn resolve(data_path: Option<PathBuf>, charts_dir: Option<PathBuf>) -> Self {
        Config {
            data_path: data_path.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            charts_dir: charts_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CHARTS_DIR)),
            color_policy: ColorPolicy::default(),
        }
    }

    /// Builder: override color policy
    pub fn with_color_policy(mut self, policy: ColorPolicy) -> Self {
        self.color_policy = policy;
        self
    }

    pub fn chart_path(&self, kind: SupplyKind) -> PathBuf {
        self.charts_dir.join(kind.chart_file())
    }

    pub fn data_exists(&self) -> bool {
        Path::new(&self.data_path).exists()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data_path, PathBuf::from("data/erc20_full_data.json"));
        assert_eq!(config.charts_dir, PathBuf::from("data"));
        assert_eq!(config.color_policy, ColorPolicy::Positional);
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::resolve(Some("/tmp/tokens.csv".into()), Some("/tmp/charts".into()))
            .with_color_policy(ColorPolicy::ByCategory);

        assert_eq!(config.data_path, PathBuf::from("/tmp/tokens.csv"));
        assert_eq!(
            config.chart_path(SupplyKind::Circulating),
            PathBuf::from("/tmp/charts/circulating_supply_chart.json")
        );
        assert_eq!(config.color_policy, ColorPolicy::ByCategory);
    }
}
