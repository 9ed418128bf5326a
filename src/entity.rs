// 🪙 Token Store - the immutable entity collection every chart reads from
//
// A token is a name plus a flat map of fields. Taxonomy flags, annotation text
// and supply figures all live in the same map, so a new taxonomy never needs a
// schema change here.

use crate::error::{DatasetError, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// TOKEN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub name: String,

    /// Every other column of the record, keyed by its original field name
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Token {
    pub fn new(name: impl Into<String>) -> Self {
        Token {
            name: name.into(),
            fields: Map::new(),
        }
    }

    /// Builder: set an arbitrary field
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Build a token from one raw JSON record.
    ///
    /// Returns `None` for anything that is not an object. A missing or
    /// non-string `name` becomes the empty string (numbers are stringified).
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };

        let name = match fields.remove("name") {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Some(Token { name, fields })
    }

    /// Membership test: the flag must be exactly the number 1.
    /// `true`, `"1"`, `2` and absent all count as non-membership.
    pub fn flag(&self, field: &str) -> bool {
        match self.fields.get(field) {
            Some(Value::Number(n)) => n.as_f64() == Some(1.0),
            _ => false,
        }
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Finite numeric value of a field. Strings are not coerced.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.fields
            .get(field)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    }

    pub fn supply(&self, kind: SupplyKind) -> Option<f64> {
        self.number(kind.field())
    }
}

// ============================================================================
// SUPPLY KIND
// ============================================================================

/// The three continuous attributes that get a histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplyKind {
    Total,
    Max,
    Circulating,
}

impl SupplyKind {
    pub fn all() -> [SupplyKind; 3] {
        [SupplyKind::Total, SupplyKind::Max, SupplyKind::Circulating]
    }

    /// Field name on the token record and in the histogram JSON
    pub fn field(&self) -> &'static str {
        match self {
            SupplyKind::Total => "total_supply",
            SupplyKind::Max => "max_supply",
            SupplyKind::Circulating => "circulating_supply",
        }
    }

    /// Axis title
    pub fn title(&self) -> &'static str {
        match self {
            SupplyKind::Total => "Total Supply",
            SupplyKind::Max => "Maximum Supply",
            SupplyKind::Circulating => "Circulating Supply",
        }
    }

    pub fn question(&self) -> &'static str {
        match self {
            SupplyKind::Total => "What is the total supply of the top 50 erc-20 tokens?",
            SupplyKind::Max => "What is the maximum supply of the top 50 erc-20 tokens?",
            SupplyKind::Circulating => {
                "How much supply is currently circulating of the top 50 erc-20 tokens?"
            }
        }
    }

    /// File name of the precomputed histogram
    pub fn chart_file(&self) -> &'static str {
        match self {
            SupplyKind::Total => "total_supply_chart.json",
            SupplyKind::Max => "max_supply_chart.json",
            SupplyKind::Circulating => "circulating_supply_chart.json",
        }
    }

    /// Only the max-supply chart gets a dedicated "No max supply" bar
    pub fn has_missing_bar(&self) -> bool {
        matches!(self, SupplyKind::Max)
    }
}

impl fmt::Display for SupplyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SupplyKind::Total => "total",
            SupplyKind::Max => "max",
            SupplyKind::Circulating => "circulating",
        };
        f.write_str(s)
    }
}

impl FromStr for SupplyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "total" | "total_supply" => Ok(SupplyKind::Total),
            "max" | "maximum" | "max_supply" => Ok(SupplyKind::Max),
            "circulating" | "circulating_supply" => Ok(SupplyKind::Circulating),
            other => Err(format!(
                "unknown supply kind '{}' (expected total, max or circulating)",
                other
            )),
        }
    }
}

// ============================================================================
// TOKEN STORE
// ============================================================================

/// Ordered, read-only token collection. Loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    tokens: Vec<Token>,
}

impl TokenStore {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut seen = HashSet::new();
        for token in &tokens {
            if !seen.insert(token.name.as_str()) {
                warn!("Duplicate token name in dataset: '{}'", token.name);
            }
        }

        TokenStore { tokens }
    }

    /// Load by extension: `.json` or `.csv`
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        let tokens = match ext.as_deref() {
            Some("json") => load_json(path)?,
            Some("csv") => load_csv(path)?,
            _ => return Err(DatasetError::UnsupportedFormat(path.to_path_buf())),
        };

        debug!("Loaded {} tokens from {:?}", tokens.len(), path);
        Ok(TokenStore::new(tokens))
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

// ============================================================================
// LOADERS
// ============================================================================

/// Load a JSON array of token records. Non-object entries are skipped.
pub fn load_json(path: &Path) -> Result<Vec<Token>> {
    let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<Value> = serde_json::from_str(&raw).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tokens = Vec::with_capacity(records.len());
    for (i, record) in records.into_iter().enumerate() {
        match Token::from_value(record) {
            Some(token) => tokens.push(token),
            None => warn!("Skipping record {} in {:?}: not an object", i, path),
        }
    }

    Ok(tokens)
}

/// Load a CSV export of the dataset (header row required).
///
/// Cells are typed the way a dataframe export reads back: integers and floats
/// become numbers, empty cells are absent, everything else stays a string.
/// The `name` column and the `Information_*` / `Uncertainty_*` annotation
/// columns are always kept as text.
pub fn load_csv(path: &Path) -> Result<Vec<Token>> {
    let csv_err = |source| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers = rdr.headers().map_err(csv_err)?.clone();

    let mut tokens = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        let mut token = Token::new(String::new());

        for (header, cell) in headers.iter().zip(record.iter()) {
            if header == "name" {
                token.name = cell.to_string();
                continue;
            }
            let value = if is_annotation(header) {
                text_cell(cell)
            } else {
                parse_cell(cell)
            };
            if let Some(value) = value {
                token.fields.insert(header.to_string(), value);
            }
        }

        tokens.push(token);
    }

    Ok(tokens)
}

fn is_annotation(header: &str) -> bool {
    header.starts_with("Information_") || header.starts_with("Uncertainty_")
}

fn text_cell(cell: &str) -> Option<Value> {
    if cell.trim().is_empty() {
        None
    } else {
        Some(Value::String(cell.to_string()))
    }
}

fn parse_cell(cell: &str) -> Option<Value> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Value::from(i));
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        // "NaN" / "inf" parse as floats but mean "no value" in an export
        return serde_json::Number::from_f64(f).map(Value::Number);
    }

    Some(Value::String(cell.to_string()))
}
