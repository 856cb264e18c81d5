//! # Financial Ratio Analyzer
//!
//! A library for turning heterogeneously labelled balance sheets and income
//! statements into a standard set of financial indicators.
//!
//! ## Core Concepts
//!
//! - **Statements**: Free-form trees of categories and monetary accounts, as
//!   extracted from spreadsheets or documents upstream
//! - **Schema Mapping**: Flat account lists are placed into a fixed chart of
//!   accounts; nested trees are used as they come
//! - **Concept Resolution**: Canonical figures ("cash", "current liabilities")
//!   are located by synonym substring matching with an edit-distance fallback
//! - **Ratio Engine**: Liquidity, activity, leverage and profitability ratios,
//!   net operating capital, horizontal analysis and sources and uses of funds
//!
//! Every analysis function is total: missing accounts read as zero and any
//! ratio with a zero denominator is reported as zero.
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_ratio_analyzer::*;
//! use serde_json::json;
//!
//! let records = vec![
//!     FinancialRecord::new(
//!         DocumentType::BalanceSheet,
//!         "2023",
//!         json!({
//!             "ActivoCorriente": { "Efectivo": 100, "Clientes": 50 },
//!             "PasivosCortoPlazo": { "Proveedores": 60 }
//!         }),
//!     ),
//!     FinancialRecord::new(
//!         DocumentType::IncomeStatement,
//!         "2023",
//!         json!({ "Ventas": 1000, "CostoDeVenta": 600 }),
//!     ),
//! ];
//!
//! let report = analyze_records(&records).unwrap();
//! assert_eq!(report.analysis.liquidity.current_ratio.value, 2.5);
//! ```

pub mod chart_of_accounts;
pub mod dictionary;
pub mod error;
pub mod funds;
pub mod horizontal;
pub mod ingestion;
pub mod mapper;
pub mod ratios;
pub mod resolver;
pub mod schema;
pub mod utils;

pub use chart_of_accounts::{template_for, TemplateNode, UNCLASSIFIED_CATEGORY};
pub use dictionary::Concept;
pub use error::{FinancialAnalysisError, Result};
pub use funds::{sources_and_uses, AccountClass, FundsEntry, SourcesAndUses};
pub use horizontal::{
    compare_statements, horizontal_analysis, HorizontalAnalysis, LineVariance, VarianceNode,
    VarianceTree,
};
pub use ingestion::{group_records_by_period, select_periods};
pub use mapper::{category_totals, flatten, map_to_schema, map_to_schema_with};
pub use ratios::*;
pub use resolver::{
    find_concept, find_net_income, find_value, resolve_concept, resolve_net_income,
    resolve_value, MatchKind, ResolvedAccount, StatementIndex,
};
pub use schema::*;
pub use utils::{levenshtein_distance, normalize};

use log::info;
use serde::{Deserialize, Serialize};

/// Analysis of the most recent period found in a batch of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub current_period: String,
    pub previous_period: Option<String>,
    pub analysis: AnalysisResult,
    /// Every period that produced a snapshot, oldest first.
    pub periods: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FinancialAnalyzer {
    config: AnalysisConfig,
}

impl FinancialAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(
        &self,
        current: &PeriodSnapshot,
        previous: Option<&PeriodSnapshot>,
    ) -> AnalysisResult {
        RatioEngine::new(self.config.clone()).calculate(current, previous)
    }

    pub fn analyze_records(&self, records: &[FinancialRecord]) -> Result<FinancialReport> {
        let periods = group_records_by_period(records, &self.config);

        let ((current_period, current), previous) =
            select_periods(&periods).ok_or(FinancialAnalysisError::NoPeriods)?;

        info!(
            "Analyzing period {} against {}",
            current_period,
            previous.map_or("nothing", |(period, _)| period.as_str())
        );

        let analysis = self.analyze(current, previous.map(|(_, snapshot)| snapshot));

        Ok(FinancialReport {
            current_period: current_period.clone(),
            previous_period: previous.map(|(period, _)| period.clone()),
            analysis,
            periods: periods.keys().cloned().collect(),
        })
    }

    /// Accepts a JSON array of `{ "type", "period", "data" }` records.
    pub fn analyze_json(&self, json: &str) -> Result<FinancialReport> {
        let records: Vec<FinancialRecord> = serde_json::from_str(json)?;
        self.analyze_records(&records)
    }
}

pub fn analyze_records(records: &[FinancialRecord]) -> Result<FinancialReport> {
    FinancialAnalyzer::default().analyze_records(records)
}

pub fn analyze_json(json: &str) -> Result<FinancialReport> {
    FinancialAnalyzer::default().analyze_json(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_records() -> Vec<FinancialRecord> {
        vec![
            FinancialRecord::new(
                DocumentType::BalanceSheet,
                "2022",
                json!({
                    "ActivoCorriente": { "Efectivo": 80, "Clientes": 40 },
                    "PasivosCortoPlazo": { "Proveedores": 50 }
                }),
            ),
            FinancialRecord::new(
                DocumentType::BalanceSheet,
                "2023",
                json!({
                    "ActivoCorriente": { "Efectivo": 100, "Clientes": 50 },
                    "PasivosCortoPlazo": { "Proveedores": 60 }
                }),
            ),
            FinancialRecord::new(
                DocumentType::IncomeStatement,
                "2023",
                json!({ "Ventas": 1000, "CostoDeVenta": 600 }),
            ),
        ]
    }

    #[test]
    fn test_analyze_records_picks_latest_periods() {
        let report = analyze_records(&sample_records()).unwrap();

        assert_eq!(report.current_period, "2023");
        assert_eq!(report.previous_period.as_deref(), Some("2022"));
        assert_eq!(report.periods, vec!["2022", "2023"]);
        assert!(report.analysis.horizontal_analysis.is_some());
        assert!((report.analysis.liquidity.current_ratio.value - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_no_usable_records() {
        let result = analyze_records(&[FinancialRecord::default()]);
        assert!(matches!(result, Err(FinancialAnalysisError::NoPeriods)));
    }

    #[test]
    fn test_analyze_json_rejects_malformed_input() {
        let result = analyze_json("{ not json");
        assert!(matches!(result, Err(FinancialAnalysisError::SerializationError(_))));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = analyze_records(&sample_records()).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["currentPeriod"], json!("2023"));
        assert_eq!(value["analysis"]["liquidity"]["currentRatio"]["benchmarkRange"], json!("1.5 - 2.0"));
        assert!(value["analysis"]["sourcesAndUses"]["sources"].is_array());
    }
}
