use crate::error::FinancialAnalysisError;
use crate::utils::coerce_number;
use indexmap::IndexMap;
use schemars::gen::SchemaGenerator;
use schemars::schema::{Schema, SchemaObject, SubschemaValidation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Flat account name -> value mapping. Enumeration order is the order in
/// which accounts were visited and is significant for matching.
pub type FlatMap = IndexMap<String, f64>;

/// A node of a financial statement: either a monetary leaf or a named
/// grouping of further nodes. Category labels are free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, from = "Value")]
pub enum AccountNode {
    Leaf(f64),
    Category(IndexMap<String, AccountNode>),
}

impl Default for AccountNode {
    fn default() -> Self {
        AccountNode::Category(IndexMap::new())
    }
}

impl From<Value> for AccountNode {
    fn from(value: Value) -> Self {
        AccountNode::from_value(&value)
    }
}

impl AccountNode {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a tree from loosely typed JSON. Objects become categories and
    /// every other value is coerced to a numeric leaf.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => AccountNode::Category(
                map.iter()
                    .map(|(key, child)| (key.clone(), AccountNode::from_value(child)))
                    .collect(),
            ),
            other => AccountNode::Leaf(coerce_number(other)),
        }
    }

    pub fn as_leaf(&self) -> Option<f64> {
        match self {
            AccountNode::Leaf(value) => Some(*value),
            AccountNode::Category(_) => None,
        }
    }

    pub fn children(&self) -> Option<&IndexMap<String, AccountNode>> {
        match self {
            AccountNode::Category(children) => Some(children),
            AccountNode::Leaf(_) => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&AccountNode> {
        self.children().and_then(|children| children.get(key))
    }

    /// True when any direct child is itself a category.
    pub fn has_subcategories(&self) -> bool {
        self.children()
            .map(|children| {
                children
                    .values()
                    .any(|child| matches!(child, AccountNode::Category(_)))
            })
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AccountNode::Category(children) => children.is_empty(),
            AccountNode::Leaf(_) => false,
        }
    }
}

impl JsonSchema for AccountNode {
    fn schema_name() -> String {
        "AccountNode".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        let leaf = gen.subschema_for::<f64>();
        let category = gen.subschema_for::<BTreeMap<String, AccountNode>>();

        SchemaObject {
            subschemas: Some(Box::new(SubschemaValidation {
                any_of: Some(vec![leaf, category]),
                ..Default::default()
            })),
            ..Default::default()
        }
        .into()
    }
}

/// The two statements reported for a single period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PeriodSnapshot {
    #[serde(default)]
    #[schemars(
        description = "Income statement for the period, nested as category -> subcategory -> account. Leaves are monetary amounts."
    )]
    pub income_statement: AccountNode,

    #[serde(default)]
    #[schemars(
        description = "Balance sheet at the end of the period, nested as category -> subcategory -> account. Leaves are monetary amounts."
    )]
    pub balance_sheet: AccountNode,
}

impl PeriodSnapshot {
    pub fn new(income_statement: AccountNode, balance_sheet: AccountNode) -> Self {
        Self {
            income_statement,
            balance_sheet,
        }
    }

    pub fn statement(&self, document_type: DocumentType) -> &AccountNode {
        match document_type {
            DocumentType::BalanceSheet => &self.balance_sheet,
            DocumentType::IncomeStatement => &self.income_statement,
        }
    }

    pub fn statement_mut(&mut self, document_type: DocumentType) -> &mut AccountNode {
        match document_type {
            DocumentType::BalanceSheet => &mut self.balance_sheet,
            DocumentType::IncomeStatement => &mut self.income_statement,
        }
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PeriodSnapshot)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[schemars(description = "Balance sheet (Balance General): assets, liabilities and equity")]
    BalanceSheet,

    #[schemars(description = "Income statement (Estado de Resultados): sales, costs, expenses and profit")]
    IncomeStatement,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::BalanceSheet => "balance_sheet",
            DocumentType::IncomeStatement => "income_statement",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = FinancialAnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "balance_sheet" => Ok(DocumentType::BalanceSheet),
            "income_statement" => Ok(DocumentType::IncomeStatement),
            other => Err(FinancialAnalysisError::UnknownDocumentType(other.to_string())),
        }
    }
}

/// One statement for one period as handed over by an upstream import step.
/// Every field is optional on the wire; incomplete records are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FinancialRecord {
    #[serde(rename = "type", default)]
    #[schemars(description = "Either 'balance_sheet' or 'income_statement'")]
    pub record_type: Option<String>,

    #[serde(default)]
    #[schemars(description = "Reporting period key, typically a year such as '2023'")]
    pub period: Option<String>,

    #[serde(default)]
    #[schemars(
        description = "Statement data: either a flat account -> amount object or an already nested statement tree"
    )]
    pub data: Option<Value>,
}

impl FinancialRecord {
    pub fn new(document_type: DocumentType, period: impl Into<String>, data: Value) -> Self {
        Self {
            record_type: Some(document_type.as_str().to_string()),
            period: Some(period.into()),
            data: Some(data),
        }
    }
}

/// What the static mapper does with input accounts that match no template
/// leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnknownAccountPolicy {
    /// Output has exactly the template's shape.
    #[default]
    Drop,
    /// Unmatched accounts are kept under their original names in an extra
    /// category below the template root.
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisConfig {
    #[schemars(description = "Handling of flat input accounts the statement template does not know")]
    pub unknown_accounts: UnknownAccountPolicy,

    #[schemars(
        description = "Days in the commercial year used for the average collection period (360 by convention)"
    )]
    pub days_in_year: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            unknown_accounts: UnknownAccountPolicy::Drop,
            days_in_year: 360.0,
        }
    }
}
