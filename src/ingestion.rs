use crate::mapper::map_to_schema_with;
use crate::schema::{
    AccountNode, AnalysisConfig, DocumentType, FinancialRecord, FlatMap, PeriodSnapshot,
};
use crate::utils::coerce_number;
use log::{debug, warn};
use serde_json::Value;
use std::collections::BTreeMap;

/// Converts one record's payload into a statement tree. Payloads that
/// already contain categories are kept as they are; flat account lists are
/// placed into the statement template.
pub fn statement_from_data(
    document_type: DocumentType,
    data: &Value,
    config: &AnalysisConfig,
) -> Option<AccountNode> {
    let Value::Object(map) = data else {
        return None;
    };

    let node = AccountNode::from_value(data);
    if node.has_subcategories() {
        return Some(node);
    }

    let flat: FlatMap = map
        .iter()
        .map(|(account, value)| (account.clone(), coerce_number(value)))
        .collect();

    Some(map_to_schema_with(document_type, &flat, config.unknown_accounts))
}

/// Groups statements by period. Records missing a field, with an unknown
/// type or with a non-object payload are skipped. A later record for the
/// same period and type replaces the earlier one.
pub fn group_records_by_period(
    records: &[FinancialRecord],
    config: &AnalysisConfig,
) -> BTreeMap<String, PeriodSnapshot> {
    let mut periods: BTreeMap<String, PeriodSnapshot> = BTreeMap::new();

    for (idx, record) in records.iter().enumerate() {
        let (Some(record_type), Some(period), Some(data)) =
            (&record.record_type, &record.period, &record.data)
        else {
            warn!("Skipping record #{}: missing type, period or data", idx);
            continue;
        };

        let document_type = match record_type.parse::<DocumentType>() {
            Ok(document_type) => document_type,
            Err(e) => {
                warn!("Skipping record #{} for period {}: {}", idx, period, e);
                continue;
            }
        };

        let Some(statement) = statement_from_data(document_type, data, config) else {
            warn!(
                "Skipping record #{} ({} {}): data is not an object",
                idx, document_type, period
            );
            continue;
        };

        debug!("Ingested {} for period {}", document_type, period);
        *periods
            .entry(period.clone())
            .or_default()
            .statement_mut(document_type) = statement;
    }

    periods
}

/// Latest period and the one before it, by period key order.
pub fn select_periods(
    periods: &BTreeMap<String, PeriodSnapshot>,
) -> Option<((&String, &PeriodSnapshot), Option<(&String, &PeriodSnapshot)>)> {
    let mut newest_first = periods.iter().rev();
    let current = newest_first.next()?;
    Some((current, newest_first.next()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_of_accounts::UNCLASSIFIED_CATEGORY;
    use crate::schema::UnknownAccountPolicy;
    use serde_json::json;

    fn records(value: Value) -> Vec<FinancialRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_incomplete_and_unknown_records_are_skipped() {
        let input = records(json!([
            { "type": "balance_sheet", "period": "2023" },
            { "type": "cash_flow", "period": "2023", "data": { "Caja": 1 } },
            { "period": "2023", "data": { "Caja": 1 } },
            { "type": "balance_sheet", "period": "2022", "data": 42 }
        ]));

        let grouped = group_records_by_period(&input, &AnalysisConfig::default());
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_nested_data_is_kept_as_is() {
        let input = vec![FinancialRecord::new(
            DocumentType::BalanceSheet,
            "2023",
            json!({ "ActivoCorriente": { "Efectivo": 100, "Clientes": 50 } }),
        )];

        let grouped = group_records_by_period(&input, &AnalysisConfig::default());
        let snapshot = &grouped["2023"];

        let current = snapshot.balance_sheet.get("ActivoCorriente").unwrap();
        assert_eq!(current.get("Clientes").unwrap().as_leaf(), Some(50.0));
        assert!(snapshot.income_statement.is_empty());
    }

    #[test]
    fn test_flat_data_goes_through_the_template() {
        let input = vec![FinancialRecord::new(
            DocumentType::IncomeStatement,
            "2023",
            json!({ "Ventas": "1000", "Regalías": 5 }),
        )];

        let dropped = group_records_by_period(&input, &AnalysisConfig::default());
        let statement = &dropped["2023"].income_statement;
        assert!(statement.get("EstadoDeResultados").is_some());
        assert!(!serde_json::to_string(statement).unwrap().contains("Regalías"));

        let config = AnalysisConfig {
            unknown_accounts: UnknownAccountPolicy::Preserve,
            ..AnalysisConfig::default()
        };
        let preserved = group_records_by_period(&input, &config);
        let unclassified = preserved["2023"]
            .income_statement
            .get("EstadoDeResultados")
            .and_then(|root| root.get(UNCLASSIFIED_CATEGORY))
            .unwrap();
        assert_eq!(unclassified.get("Regalías").unwrap().as_leaf(), Some(5.0));
    }

    #[test]
    fn test_later_record_replaces_earlier_one() {
        let input = vec![
            FinancialRecord::new(DocumentType::BalanceSheet, "2023", json!({ "A": { "Caja": 1 } })),
            FinancialRecord::new(DocumentType::BalanceSheet, "2023", json!({ "A": { "Caja": 2 } })),
        ];
        let grouped = group_records_by_period(&input, &AnalysisConfig::default());
        let caja = grouped["2023"].balance_sheet.get("A").and_then(|a| a.get("Caja"));
        assert_eq!(caja.and_then(AccountNode::as_leaf), Some(2.0));
    }

    #[test]
    fn test_select_periods() {
        let mut periods = BTreeMap::new();
        assert!(select_periods(&periods).is_none());

        periods.insert("2021".to_string(), PeriodSnapshot::default());
        let (current, previous) = select_periods(&periods).unwrap();
        assert_eq!(current.0, "2021");
        assert!(previous.is_none());

        periods.insert("2023".to_string(), PeriodSnapshot::default());
        periods.insert("2022".to_string(), PeriodSnapshot::default());
        let (current, previous) = select_periods(&periods).unwrap();
        assert_eq!(current.0, "2023");
        assert_eq!(previous.unwrap().0, "2022");
    }
}
