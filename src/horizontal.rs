use crate::schema::{AccountNode, DocumentType, PeriodSnapshot};
use crate::utils::{finite_or_zero, safe_div};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Period-over-period change of a single account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineVariance {
    pub value: f64,
    pub absolute_change: f64,
    /// Change relative to the magnitude of the previous value, in percent.
    /// Zero when there is no previous value to compare against.
    pub relative_change_percent: f64,
}

impl LineVariance {
    /// Non-finite inputs are read as zero.
    pub fn between(current: f64, previous: f64) -> Self {
        let current = finite_or_zero(current);
        let previous = finite_or_zero(previous);
        let absolute_change = current - previous;
        Self {
            value: current,
            absolute_change,
            relative_change_percent: safe_div(absolute_change, previous.abs()) * 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarianceNode {
    Line(LineVariance),
    Group(VarianceTree),
}

pub type VarianceTree = IndexMap<String, VarianceNode>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HorizontalAnalysis {
    pub balance_sheet: VarianceTree,
    pub income_statement: VarianceTree,
}

pub fn horizontal_analysis(current: &PeriodSnapshot, previous: &PeriodSnapshot) -> HorizontalAnalysis {
    let compare = |document_type: DocumentType| {
        compare_statements(
            current.statement(document_type),
            Some(previous.statement(document_type)),
        )
    };

    HorizontalAnalysis {
        balance_sheet: compare(DocumentType::BalanceSheet),
        income_statement: compare(DocumentType::IncomeStatement),
    }
}

/// Mirrors the current tree, pairing each node with the previous period's
/// node under the same key at the same depth. Accounts that only exist in
/// the previous period are not reported.
pub fn compare_statements(current: &AccountNode, previous: Option<&AccountNode>) -> VarianceTree {
    let Some(children) = current.children() else {
        return VarianceTree::new();
    };

    children
        .iter()
        .map(|(key, child)| {
            let previous_child = previous.and_then(|p| p.get(key));
            let node = match child {
                AccountNode::Leaf(value) => {
                    let previous_value = previous_child.and_then(AccountNode::as_leaf).unwrap_or(0.0);
                    VarianceNode::Line(LineVariance::between(*value, previous_value))
                }
                AccountNode::Category(_) => {
                    VarianceNode::Group(compare_statements(child, previous_child))
                }
            };
            (key.clone(), node)
        })
        .collect()
}
