// Dashboard - the loaded dataset plus everything derived from it
//
// Inputs never change after load, so every accessor recomputes from scratch.

use crate::bar::{build_bar, DistributionBar};
use crate::config::Config;
use crate::entity::{SupplyKind, TokenStore};
use crate::error::Result;
use crate::histogram::{bins, build_histogram, load_histogram, Bin, HistogramData};
use crate::palette::ColorPolicy;
use crate::taxonomy::{Taxonomy, TaxonomyRegistry};
use log::{info, warn};
use std::collections::HashMap;

pub struct Dashboard {
    store: TokenStore,
    registry: TaxonomyRegistry,
    charts: HashMap<SupplyKind, HistogramData>,
    policy: ColorPolicy,
}

impl Dashboard {
    /// Build from an in-memory store; histograms are computed from the tokens
    pub fn new(store: TokenStore, policy: ColorPolicy) -> Self {
        let charts = SupplyKind::all()
            .into_iter()
            .map(|kind| (kind, build_histogram(store.tokens(), kind, kind.has_missing_bar())))
            .collect();

        Dashboard {
            store,
            registry: TaxonomyRegistry::with_defaults(),
            charts,
            policy,
        }
    }

    /// Load the dataset, preferring precomputed chart files when present
    pub fn load(config: &Config) -> Result<Self> {
        let store = TokenStore::load(&config.data_path)?;
        info!("Loaded {} tokens from {:?}", store.len(), config.data_path);

        let mut dashboard = Dashboard::new(store, config.color_policy);

        for kind in SupplyKind::all() {
            let path = config.chart_path(kind);
            if !path.exists() {
                info!("No {} chart at {:?}, using bins computed from the dataset", kind, path);
                continue;
            }

            match load_histogram(&path) {
                Ok(data) => {
                    dashboard.charts.insert(kind, data);
                }
                Err(e) => warn!("Ignoring unreadable {} chart: {}", kind, e),
            }
        }

        Ok(dashboard)
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn taxonomies(&self) -> &[Taxonomy] {
        self.registry.list_all()
    }

    pub fn taxonomy_keys(&self) -> Vec<&str> {
        self.registry.list_keys()
    }

    pub fn taxonomy(&self, key: &str) -> Option<&Taxonomy> {
        self.registry.get(key)
    }

    pub fn bar(&self, taxonomy: &Taxonomy) -> DistributionBar {
        build_bar(self.store.tokens(), taxonomy, self.policy)
    }

    pub fn bars(&self) -> Vec<DistributionBar> {
        self.taxonomies().iter().map(|t| self.bar(t)).collect()
    }

    pub fn chart(&self, kind: SupplyKind) -> Option<&HistogramData> {
        self.charts.get(&kind)
    }

    pub fn bins(&self, kind: SupplyKind) -> Vec<Bin> {
        self.chart(kind).map(|data| bins(data, kind)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Token;
    use std::io::Write;

    fn store() -> TokenStore {
        TokenStore::new(vec![
            Token::new("Tether")
                .with("Payment_Token", 1)
                .with("total_supply", 1.0e11)
                .with("circulating_supply", 1.0e11),
            Token::new("Chainlink")
                .with("Utility_Token", 1)
                .with("DAO_Governance", 1)
                .with("total_supply", 1.0e9)
                .with("max_supply", 1.0e9)
                .with("circulating_supply", 6.0e8),
        ])
    }

    #[test]
    fn test_new_builds_all_views() {
        let dashboard = Dashboard::new(store(), ColorPolicy::Positional);

        assert_eq!(dashboard.bars().len(), 7);
        assert_eq!(dashboard.taxonomy_keys()[6], "governance");
        let class = dashboard.bar(dashboard.taxonomy("class").unwrap());
        assert_eq!(class.segments[0].count, 1);
        assert_eq!(class.total, 2);

        let max = dashboard.bins(SupplyKind::Max);
        assert_eq!(max[0].label, "No max supply");
        assert_eq!(max[0].members[0].name, "Tether");

        for kind in SupplyKind::all() {
            assert!(dashboard.chart(kind).is_some());
        }
    }

    #[test]
    fn test_load_prefers_chart_files() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("tokens.json");
        let mut file = std::fs::File::create(&data_path).unwrap();
        write!(file, r#"[{{"name": "Solo", "total_supply": 5000}}]"#).unwrap();

        std::fs::write(
            dir.path().join("total_supply_chart.json"),
            r#"{"bin_labels": ["custom"], "bin_counts": [1],
                "tokens": [{"name": "Solo", "total_supply": 5000, "bin_idx": 0}]}"#,
        )
        .unwrap();

        let config = Config::resolve(Some(data_path), Some(dir.path().to_path_buf()));
        let dashboard = Dashboard::load(&config).unwrap();

        let total = dashboard.bins(SupplyKind::Total);
        assert_eq!(total.len(), 1);
        assert_eq!(total[0].label, "custom");
        assert_eq!(total[0].tooltip, vec!["Bin: custom", "Solo: 5,000"]);

        // no file for circulating: computed from the dataset instead
        let circulating = dashboard.bins(SupplyKind::Circulating);
        assert!(circulating.is_empty());
    }
}
