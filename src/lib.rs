// Tokenomics Dashboard - Core Library
// Exposes the aggregation engine for the CLI, the terminal UI, and tests

pub mod entity;     // Token records + dataset loading
pub mod taxonomy;   // Category tables for the seven taxonomies
pub mod aggregate;  // Category counts, percentages, member annotations
pub mod palette;    // Segment colors
pub mod format;     // Number formatting
pub mod bar;        // Proportional bar model
pub mod histogram;  // Supply binning (build + read)
pub mod config;
pub mod dashboard;
pub mod report;
pub mod error;

// Re-export commonly used types
pub use entity::{Token, TokenStore, SupplyKind, load_json, load_csv};
pub use taxonomy::{Category, Taxonomy, TaxonomyRegistry};
pub use aggregate::{CategorySummary, TokenMention, summarize, classified_count};
pub use palette::{ColorPolicy, PALETTE, LABEL_THRESHOLD};
pub use format::{human, locale, compact, log_range_label};
pub use bar::{DistributionBar, Segment, LegendEntry, build_bar};
pub use histogram::{
    HistogramData, Bin, BinnedTokens, TooltipStyle,
    build_histogram, load_histogram, save_histogram, bin_tokens, bins,
};
pub use config::Config;
pub use dashboard::Dashboard;
pub use report::{Report, SupplyChart};
pub use error::{DatasetError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
