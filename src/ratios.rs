use crate::dictionary::Concept;
use crate::funds::{sources_and_uses, SourcesAndUses};
use crate::horizontal::{horizontal_analysis, HorizontalAnalysis};
use crate::resolver::StatementIndex;
use crate::schema::{AnalysisConfig, PeriodSnapshot};
use crate::utils::{non_zero_or, safe_div};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioValue {
    pub value: f64,
    /// Display hint only; never used in any computation.
    pub benchmark_range: String,
}

impl RatioValue {
    fn new(value: f64, benchmark_range: &str) -> Self {
        Self {
            value,
            benchmark_range: benchmark_range.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityRatios {
    pub net_working_capital: RatioValue,
    pub current_ratio: RatioValue,
    pub quick_ratio: RatioValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRatios {
    pub inventory_turnover: RatioValue,
    pub receivables_turnover: RatioValue,
    /// In days.
    pub average_collection_period: RatioValue,
    pub fixed_asset_turnover: RatioValue,
    pub total_asset_turnover: RatioValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeverageRatios {
    pub debt_ratio: RatioValue,
    pub debt_to_equity: RatioValue,
    pub times_interest_earned: RatioValue,
}

/// All values are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityRatios {
    pub gross_margin: RatioValue,
    pub operating_margin: RatioValue,
    pub net_margin: RatioValue,
    pub return_on_assets: RatioValue,
    pub return_on_equity: RatioValue,
}

/// Current assets as a share of total assets minus current liabilities as a
/// share of total financing, in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetOperatingCapital {
    pub value: f64,
    pub current_assets_percent: f64,
    pub current_liabilities_percent: f64,
}

impl NetOperatingCapital {
    pub fn from_figures(figures: &KeyFigures) -> Self {
        let current_assets_percent = safe_div(figures.current_assets, figures.total_assets) * 100.0;
        let current_liabilities_percent = safe_div(
            figures.current_liabilities,
            figures.total_liabilities + figures.equity,
        ) * 100.0;

        Self {
            value: current_assets_percent - current_liabilities_percent,
            current_assets_percent,
            current_liabilities_percent,
        }
    }
}

/// Figures resolved from the current period, after fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFigures {
    pub cash: f64,
    pub short_term_investments: f64,
    pub inventory: f64,
    pub receivables: f64,
    pub current_assets: f64,
    pub fixed_assets: f64,
    pub total_assets: f64,
    pub current_liabilities: f64,
    pub long_term_liabilities: f64,
    pub total_liabilities: f64,
    pub equity: f64,
    pub sales: f64,
    pub credit_sales: f64,
    pub cost_of_sales: f64,
    pub gross_profit: f64,
    pub operating_expenses: f64,
    pub operating_income: f64,
    pub interest_expense: f64,
    pub net_income: f64,
    pub depreciation: f64,
}

/// Two-period averages used by the turnover ratios. Each equals the current
/// value when the previous period has nothing to average with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageFigures {
    pub inventory: f64,
    pub receivables: f64,
    pub fixed_assets: f64,
    pub total_assets: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub liquidity: LiquidityRatios,
    pub activity: ActivityRatios,
    pub leverage: LeverageRatios,
    pub profitability: ProfitabilityRatios,
    pub net_operating_capital: NetOperatingCapital,
    pub sources_and_uses: SourcesAndUses,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_analysis: Option<HorizontalAnalysis>,
    pub averages: AverageFigures,
    pub raw: KeyFigures,
}

fn average(current: f64, previous: f64) -> f64 {
    if previous != 0.0 {
        (current + previous) / 2.0
    } else {
        current
    }
}

#[derive(Debug, Clone, Default)]
pub struct RatioEngine {
    config: AnalysisConfig,
}

impl RatioEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn calculate(
        &self,
        current: &PeriodSnapshot,
        previous: Option<&PeriodSnapshot>,
    ) -> AnalysisResult {
        let balance = StatementIndex::new(&current.balance_sheet);
        let income = StatementIndex::new(&current.income_statement);
        let figures = resolve_key_figures(&balance, &income);

        let averages = match previous {
            Some(prev) => {
                let prev_balance = StatementIndex::new(&prev.balance_sheet);
                AverageFigures {
                    inventory: average(figures.inventory, prev_balance.resolve(Concept::Inventory)),
                    receivables: average(
                        figures.receivables,
                        prev_balance.resolve(Concept::Receivables),
                    ),
                    fixed_assets: average(
                        figures.fixed_assets,
                        prev_balance.resolve(Concept::FixedAssets),
                    ),
                    total_assets: average(
                        figures.total_assets,
                        prev_balance.resolve(Concept::TotalAssets),
                    ),
                }
            }
            None => AverageFigures {
                inventory: figures.inventory,
                receivables: figures.receivables,
                fixed_assets: figures.fixed_assets,
                total_assets: figures.total_assets,
            },
        };

        let horizontal = previous.map(|prev| horizontal_analysis(current, prev));

        let funds = match &horizontal {
            Some(analysis) => sources_and_uses(
                &analysis.balance_sheet,
                figures.net_income,
                figures.depreciation,
            ),
            None => SourcesAndUses::default(),
        };

        info!(
            "Computed ratios ({} previous period): {} sources totalling {:.2}, {} uses totalling {:.2}",
            if previous.is_some() { "with" } else { "without" },
            funds.sources.len(),
            funds.total_sources(),
            funds.uses.len(),
            funds.total_uses()
        );

        AnalysisResult {
            liquidity: liquidity_ratios(&figures),
            activity: activity_ratios(&figures, &averages, self.config.days_in_year),
            leverage: leverage_ratios(&figures),
            profitability: profitability_ratios(&figures),
            net_operating_capital: NetOperatingCapital::from_figures(&figures),
            sources_and_uses: funds,
            horizontal_analysis: horizontal,
            averages,
            raw: figures,
        }
    }
}

/// Computes the full analysis with the default configuration.
pub fn calculate_ratios(current: &PeriodSnapshot, previous: Option<&PeriodSnapshot>) -> AnalysisResult {
    RatioEngine::default().calculate(current, previous)
}

/// Resolves the canonical figures, deriving the income statement subtotals
/// that were not reported.
pub fn resolve_key_figures(balance: &StatementIndex, income: &StatementIndex) -> KeyFigures {
    let sales = income.resolve(Concept::Sales);
    let cost_of_sales = income.resolve(Concept::CostOfSales);
    let gross_profit = non_zero_or(
        income.resolve(Concept::GrossProfit),
        sales - cost_of_sales.abs(),
    );

    let operating_expenses = non_zero_or(
        income.resolve(Concept::OperatingExpenses),
        income.resolve(Concept::SellingExpenses) + income.resolve(Concept::AdministrativeExpenses),
    );
    let operating_income = non_zero_or(
        income.resolve(Concept::OperatingIncome),
        gross_profit - operating_expenses.abs(),
    );

    let figures = KeyFigures {
        cash: balance.resolve(Concept::Cash),
        short_term_investments: balance.resolve(Concept::ShortTermInvestments),
        inventory: balance.resolve(Concept::Inventory),
        receivables: balance.resolve(Concept::Receivables),
        current_assets: balance.resolve(Concept::CurrentAssets),
        fixed_assets: balance.resolve(Concept::FixedAssets),
        total_assets: balance.resolve(Concept::TotalAssets),
        current_liabilities: balance.resolve(Concept::CurrentLiabilities),
        long_term_liabilities: balance.resolve(Concept::LongTermLiabilities),
        total_liabilities: balance.resolve(Concept::TotalLiabilities),
        equity: balance.resolve(Concept::Equity),
        sales,
        credit_sales: non_zero_or(income.resolve(Concept::CreditSales), sales),
        cost_of_sales,
        gross_profit,
        operating_expenses,
        operating_income,
        interest_expense: income.resolve(Concept::InterestExpense),
        net_income: income.net_income(),
        depreciation: income.resolve(Concept::Depreciation),
    };

    debug!("Resolved key figures: {:?}", figures);
    figures
}

fn liquidity_ratios(f: &KeyFigures) -> LiquidityRatios {
    LiquidityRatios {
        net_working_capital: RatioValue::new(f.current_assets - f.current_liabilities, "> 0"),
        current_ratio: RatioValue::new(safe_div(f.current_assets, f.current_liabilities), "1.5 - 2.0"),
        quick_ratio: RatioValue::new(
            safe_div(f.current_assets - f.inventory, f.current_liabilities),
            "1.0",
        ),
    }
}

fn activity_ratios(f: &KeyFigures, avg: &AverageFigures, days_in_year: f64) -> ActivityRatios {
    let receivables_turnover = safe_div(f.credit_sales, avg.receivables);

    ActivityRatios {
        inventory_turnover: RatioValue::new(safe_div(f.cost_of_sales.abs(), avg.inventory), "5 - 10"),
        receivables_turnover: RatioValue::new(receivables_turnover, "6 - 12"),
        average_collection_period: RatioValue::new(
            safe_div(days_in_year, receivables_turnover),
            "30 - 45 days",
        ),
        fixed_asset_turnover: RatioValue::new(safe_div(f.sales, avg.fixed_assets), "5 - 8"),
        total_asset_turnover: RatioValue::new(safe_div(f.sales, avg.total_assets), "1.0 - 2.5"),
    }
}

fn leverage_ratios(f: &KeyFigures) -> LeverageRatios {
    LeverageRatios {
        debt_ratio: RatioValue::new(safe_div(f.total_liabilities, f.total_assets), "0.3 - 0.5"),
        debt_to_equity: RatioValue::new(safe_div(f.total_liabilities, f.equity), "0.5 - 1.0"),
        times_interest_earned: RatioValue::new(
            safe_div(f.operating_income, f.interest_expense),
            "3 - 5",
        ),
    }
}

fn profitability_ratios(f: &KeyFigures) -> ProfitabilityRatios {
    let percent = |numerator: f64, denominator: f64| safe_div(numerator, denominator) * 100.0;

    ProfitabilityRatios {
        gross_margin: RatioValue::new(percent(f.gross_profit, f.sales), "20% - 40%"),
        operating_margin: RatioValue::new(percent(f.operating_income, f.sales), "10% - 20%"),
        net_margin: RatioValue::new(percent(f.net_income, f.sales), "5% - 10%"),
        return_on_assets: RatioValue::new(percent(f.net_income, f.total_assets), "5% - 10%"),
        return_on_equity: RatioValue::new(percent(f.net_income, f.equity), "10% - 15%"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> PeriodSnapshot {
        serde_json::from_value(value).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_basic_scenario_without_previous_period() {
        let current = snapshot(json!({
            "balance_sheet": {
                "ActivoCorriente": { "Efectivo": 100, "Clientes": 50 },
                "PasivosCortoPlazo": { "Proveedores": 60 }
            },
            "income_statement": { "Ventas": 1000, "CostoDeVenta": 600 }
        }));

        let result = calculate_ratios(&current, None);

        assert!(approx(result.liquidity.current_ratio.value, 2.5));
        assert!(approx(result.profitability.gross_margin.value, 40.0));
        assert!(approx(result.liquidity.net_working_capital.value, 90.0));
        assert!(result.horizontal_analysis.is_none());
        assert!(result.sources_and_uses.is_empty());
        assert_eq!(result.liquidity.current_ratio.benchmark_range, "1.5 - 2.0");
    }

    #[test]
    fn test_zero_denominators_yield_zero() {
        let result = calculate_ratios(&PeriodSnapshot::default(), None);

        let values = [
            result.liquidity.current_ratio.value,
            result.liquidity.quick_ratio.value,
            result.activity.inventory_turnover.value,
            result.activity.receivables_turnover.value,
            result.activity.average_collection_period.value,
            result.activity.fixed_asset_turnover.value,
            result.activity.total_asset_turnover.value,
            result.leverage.debt_ratio.value,
            result.leverage.debt_to_equity.value,
            result.leverage.times_interest_earned.value,
            result.profitability.gross_margin.value,
            result.profitability.operating_margin.value,
            result.profitability.net_margin.value,
            result.profitability.return_on_assets.value,
            result.profitability.return_on_equity.value,
            result.net_operating_capital.value,
        ];
        assert!(values.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_debt_ratio_zero_when_total_assets_missing() {
        let figures = KeyFigures {
            total_liabilities: 400.0,
            equity: 600.0,
            ..KeyFigures::default()
        };
        let leverage = leverage_ratios(&figures);
        assert_eq!(leverage.debt_ratio.value, 0.0);
        assert!(approx(leverage.debt_to_equity.value, 400.0 / 600.0));
        assert_eq!(leverage.times_interest_earned.value, 0.0);
    }

    #[test]
    fn test_income_statement_fallbacks() {
        let current = snapshot(json!({
            "income_statement": {
                "Ventas": 1000,
                "Costo de ventas": -600,
                "Gastos de venta": 100,
                "Gastos de administración": 50,
                "Gastos financieros": 25
            }
        }));
        let f = calculate_ratios(&current, None).raw;

        assert_eq!(f.credit_sales, 1000.0);
        assert_eq!(f.gross_profit, 400.0);
        assert_eq!(f.operating_expenses, 150.0);
        assert_eq!(f.operating_income, 250.0);
        assert_eq!(f.interest_expense, 25.0);
    }

    #[test]
    fn test_averages_use_previous_period_when_present() {
        let current = snapshot(json!({
            "balance_sheet": { "Inventarios": 300, "Clientes": 100, "Activo Total": 1000 }
        }));
        let previous = snapshot(json!({
            "balance_sheet": { "Inventarios": 100, "Activo Total": 600 }
        }));

        let result = calculate_ratios(&current, Some(&previous));

        assert_eq!(result.averages.inventory, 200.0);
        assert_eq!(result.averages.total_assets, 800.0);
        // no previous receivables: the current value stands in
        assert_eq!(result.averages.receivables, 100.0);
    }

    #[test]
    fn test_collection_period_uses_configured_year() {
        let current = snapshot(json!({
            "balance_sheet": { "Clientes": 100 },
            "income_statement": { "Ventas": 1200 }
        }));

        let commercial = calculate_ratios(&current, None);
        assert!(approx(commercial.activity.receivables_turnover.value, 12.0));
        assert!(approx(commercial.activity.average_collection_period.value, 30.0));

        let engine = RatioEngine::new(AnalysisConfig {
            days_in_year: 365.0,
            ..AnalysisConfig::default()
        });
        let calendar = engine.calculate(&current, None);
        assert!(approx(calendar.activity.average_collection_period.value, 365.0 / 12.0));
    }

    #[test]
    fn test_net_operating_capital() {
        let figures = KeyFigures {
            current_assets: 400.0,
            total_assets: 1000.0,
            current_liabilities: 100.0,
            total_liabilities: 300.0,
            equity: 700.0,
            ..KeyFigures::default()
        };
        let noc = NetOperatingCapital::from_figures(&figures);
        assert!(approx(noc.current_assets_percent, 40.0));
        assert!(approx(noc.current_liabilities_percent, 10.0));
        assert!(approx(noc.value, 30.0));
    }
}
