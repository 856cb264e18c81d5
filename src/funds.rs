//! Sources and uses of funds derived from balance sheet changes.
//!
//! An asset that shrinks released cash (source) and one that grows absorbed
//! it (use); liabilities and equity work the other way round. Accounts are
//! classified from their own name only, and anything unrecognised is
//! treated as an asset.

use crate::horizontal::{VarianceNode, VarianceTree};
use crate::utils::normalize;
use serde::{Deserialize, Serialize};

const ASSET_KEYWORDS: &[&str] = &[
    "activo",
    "efectivo",
    "inventario",
    "cobrar",
    "propiedad",
    "planta",
    "equipo",
    "inversion",
];

const LIABILITY_KEYWORDS: &[&str] = &[
    "pasivo",
    "pagar",
    "deuda",
    "documento",
    "dividendo",
    "impuesto",
];

const EQUITY_KEYWORDS: &[&str] = &["patrimonio", "capital", "reserva", "superavit"];

/// Earnings lines are already reported through net income.
const EARNINGS_KEYWORDS: &[&str] = &["utilidad", "resultado", "ejercicio"];

pub const NET_INCOME_LABEL: &str = "Net Income";
pub const DEPRECIATION_LABEL: &str = "Depreciation and Amortization";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountClass {
    Asset,
    Liability,
    Equity,
    Unclassified,
}

impl AccountClass {
    /// Whether a change of the given sign in an account of this class
    /// provided funds.
    pub fn change_is_source(&self, change: f64) -> bool {
        match self {
            AccountClass::Asset | AccountClass::Unclassified => change < 0.0,
            AccountClass::Liability | AccountClass::Equity => change > 0.0,
        }
    }
}

pub fn classify_account(name: &str) -> AccountClass {
    let norm = normalize(name);
    let has_any = |keywords: &[&str]| keywords.iter().any(|k| norm.contains(k));

    if has_any(ASSET_KEYWORDS) {
        AccountClass::Asset
    } else if has_any(LIABILITY_KEYWORDS) {
        AccountClass::Liability
    } else if has_any(EQUITY_KEYWORDS) {
        AccountClass::Equity
    } else {
        AccountClass::Unclassified
    }
}

pub fn is_earnings_account(name: &str) -> bool {
    let norm = normalize(name);
    EARNINGS_KEYWORDS.iter().any(|k| norm.contains(k))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundsEntry {
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcesAndUses {
    pub sources: Vec<FundsEntry>,
    pub uses: Vec<FundsEntry>,
}

impl SourcesAndUses {
    pub fn total_sources(&self) -> f64 {
        self.sources.iter().map(|e| e.amount).sum()
    }

    pub fn total_uses(&self) -> f64 {
        self.uses.iter().map(|e| e.amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.uses.is_empty()
    }
}

/// Builds the statement from the balance sheet variance tree. Positive net
/// income and depreciation are always listed first as sources.
pub fn sources_and_uses(
    balance_sheet: &VarianceTree,
    net_income: f64,
    depreciation: f64,
) -> SourcesAndUses {
    let mut result = SourcesAndUses::default();

    if net_income > 0.0 {
        result.sources.push(FundsEntry {
            description: NET_INCOME_LABEL.to_string(),
            amount: net_income,
        });
    }

    if depreciation > 0.0 {
        result.sources.push(FundsEntry {
            description: DEPRECIATION_LABEL.to_string(),
            amount: depreciation,
        });
    }

    classify_changes(balance_sheet, "", &mut result);
    result
}

fn classify_changes(tree: &VarianceTree, path: &str, result: &mut SourcesAndUses) {
    for (key, node) in tree {
        let account_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{} - {}", path, key)
        };

        match node {
            VarianceNode::Group(children) => classify_changes(children, &account_path, result),
            VarianceNode::Line(line) => {
                let change = line.absolute_change;
                if change == 0.0 || !change.is_finite() || is_earnings_account(key) {
                    continue;
                }

                let direction = if change > 0.0 { "Increase" } else { "Decrease" };
                let entry = FundsEntry {
                    description: format!("{} in {}", direction, account_path),
                    amount: change.abs(),
                };

                if classify_account(key).change_is_source(change) {
                    result.sources.push(entry);
                } else {
                    result.uses.push(entry);
                }
            }
        }
    }
}
