// 📊 Categorical Aggregator
//
// (tokens, taxonomy) -> one summary per category, sorted by member count.
//
// Rules:
// - membership is a flag equal to exactly 1
// - percentage = 100 * count / max(total, 1)
// - members keep token-store order
// - ties keep taxonomy definition order (stable sort; colors follow rank)

use crate::entity::Token;
use crate::taxonomy::Taxonomy;
use serde::{Deserialize, Serialize};

// ============================================================================
// OUTPUT TYPES
// ============================================================================

/// One member line in a category tooltip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMention {
    pub name: String,

    /// Taxonomy-level annotation; empty when the token has none
    pub info: String,

    /// Taxonomy-level uncertainty note; `None` when absent or empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub label: String,
    pub field: String,
    pub definition: String,
    pub count: usize,

    /// In [0, 100]. Categories overlap, so these need not sum to 100.
    pub percentage: f64,

    pub members: Vec<TokenMention>,
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Summarize `tokens` against every category of `taxonomy`.
///
/// Never fails: missing flags are non-membership, missing annotations are empty,
/// and an empty token set yields 0% everywhere.
pub fn summarize(tokens: &[Token], taxonomy: &Taxonomy) -> Vec<CategorySummary> {
    let denominator = tokens.len().max(1) as f64;

    let mut summary: Vec<CategorySummary> = taxonomy
        .categories
        .iter()
        .map(|category| {
            let members: Vec<TokenMention> = tokens
                .iter()
                .filter(|t| t.flag(&category.field))
                .map(|t| mention(t, taxonomy))
                .collect();

            let count = members.len();

            CategorySummary {
                label: category.label.clone(),
                field: category.field.clone(),
                definition: category.definition.clone(),
                count,
                percentage: 100.0 * count as f64 / denominator,
                members,
            }
        })
        .collect();

    // sort_by is stable: equal counts stay in definition order
    summary.sort_by(|a, b| b.count.cmp(&a.count));
    summary
}

fn mention(token: &Token, taxonomy: &Taxonomy) -> TokenMention {
    TokenMention {
        name: token.name.clone(),
        info: token.text(&taxonomy.info_field).unwrap_or_default().to_string(),
        uncertainty: token
            .text(&taxonomy.uncertainty_field)
            .filter(|u| !u.is_empty())
            .map(str::to_string),
    }
}

/// Number of tokens flagged in at least one category of the taxonomy
pub fn classified_count(tokens: &[Token], taxonomy: &Taxonomy) -> usize {
    tokens
        .iter()
        .filter(|t| taxonomy.categories.iter().any(|c| t.flag(&c.field)))
        .count()
}
