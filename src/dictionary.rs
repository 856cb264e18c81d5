use crate::error::FinancialAnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical financial concepts the ratio engine looks up in extracted
/// statements. Serialized with the identifiers used by the import pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Concept {
    #[serde(rename = "efectivo")]
    Cash,
    #[serde(rename = "inversiones")]
    ShortTermInvestments,
    #[serde(rename = "inventario")]
    Inventory,
    #[serde(rename = "cxc")]
    Receivables,
    #[serde(rename = "activoCorriente")]
    CurrentAssets,
    #[serde(rename = "activoFijo")]
    FixedAssets,
    #[serde(rename = "activoTotal")]
    TotalAssets,
    #[serde(rename = "pasivoCorriente")]
    CurrentLiabilities,
    #[serde(rename = "pasivoFijo")]
    LongTermLiabilities,
    #[serde(rename = "pasivoTotal")]
    TotalLiabilities,
    #[serde(rename = "patrimonio")]
    Equity,
    #[serde(rename = "ventas")]
    Sales,
    #[serde(rename = "ventasCredito")]
    CreditSales,
    #[serde(rename = "costoVentas")]
    CostOfSales,
    #[serde(rename = "utilidadBruta")]
    GrossProfit,
    #[serde(rename = "gastosVenta")]
    SellingExpenses,
    #[serde(rename = "gastosAdmin")]
    AdministrativeExpenses,
    #[serde(rename = "gastosOp")]
    OperatingExpenses,
    #[serde(rename = "utilidadOp")]
    OperatingIncome,
    #[serde(rename = "intereses")]
    InterestExpense,
    #[serde(rename = "utilidadNeta")]
    NetIncome,
    #[serde(rename = "depreciacion")]
    Depreciation,
}

impl Concept {
    pub const ALL: [Concept; 22] = [
        Concept::Cash,
        Concept::ShortTermInvestments,
        Concept::Inventory,
        Concept::Receivables,
        Concept::CurrentAssets,
        Concept::FixedAssets,
        Concept::TotalAssets,
        Concept::CurrentLiabilities,
        Concept::LongTermLiabilities,
        Concept::TotalLiabilities,
        Concept::Equity,
        Concept::Sales,
        Concept::CreditSales,
        Concept::CostOfSales,
        Concept::GrossProfit,
        Concept::SellingExpenses,
        Concept::AdministrativeExpenses,
        Concept::OperatingExpenses,
        Concept::OperatingIncome,
        Concept::InterestExpense,
        Concept::NetIncome,
        Concept::Depreciation,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Concept::Cash => "efectivo",
            Concept::ShortTermInvestments => "inversiones",
            Concept::Inventory => "inventario",
            Concept::Receivables => "cxc",
            Concept::CurrentAssets => "activoCorriente",
            Concept::FixedAssets => "activoFijo",
            Concept::TotalAssets => "activoTotal",
            Concept::CurrentLiabilities => "pasivoCorriente",
            Concept::LongTermLiabilities => "pasivoFijo",
            Concept::TotalLiabilities => "pasivoTotal",
            Concept::Equity => "patrimonio",
            Concept::Sales => "ventas",
            Concept::CreditSales => "ventasCredito",
            Concept::CostOfSales => "costoVentas",
            Concept::GrossProfit => "utilidadBruta",
            Concept::SellingExpenses => "gastosVenta",
            Concept::AdministrativeExpenses => "gastosAdmin",
            Concept::OperatingExpenses => "gastosOp",
            Concept::OperatingIncome => "utilidadOp",
            Concept::InterestExpense => "intereses",
            Concept::NetIncome => "utilidadNeta",
            Concept::Depreciation => "depreciacion",
        }
    }

    /// Labels tried, in order, when looking the concept up in a statement.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Concept::Cash => &[
                "efectivo",
                "caja",
                "cash",
                "disponible",
                "bancos",
                "tesoreria",
                "efectivo y equivalentes",
            ],
            Concept::ShortTermInvestments => &[
                "inversiones",
                "inversionestemporales",
                "valores negociables",
                "inversiones a corto plazo",
            ],
            Concept::Inventory => &[
                "inventario",
                "inventory",
                "existencias",
                "almacen",
                "mercancia",
                "mercaderia",
                "inventarios",
            ],
            Concept::Receivables => &[
                "cuentas por cobrar",
                "clientes",
                "receivables",
                "documentos por cobrar",
                "deudores comerciales",
                "deudores diversos",
            ],
            Concept::CurrentAssets => &[
                "activo corriente",
                "activos corrientes",
                "activo circulante",
                "activos circulantes",
                "current assets",
                "total activo circulante",
                "total activo corriente",
            ],
            Concept::FixedAssets => &[
                "activo fijo",
                "fixed assets",
                "propiedad planta",
                "activo no corriente",
                "activos no corrientes",
                "inmovilizado material",
                "total activo fijo",
            ],
            Concept::TotalAssets => &[
                "total activo",
                "total assets",
                "activo total",
                "suma del activo",
                "activos totales",
            ],
            Concept::CurrentLiabilities => &[
                "pasivo corriente",
                "pasivos corrientes",
                "pasivo circulante",
                "pasivos circulantes",
                "pasivo a corto plazo",
                "current liabilities",
                "deudas a corto plazo",
                "total pasivos circulantes",
                "total pasivo circulante",
                "total pasivos corto plazo",
            ],
            Concept::LongTermLiabilities => &[
                "pasivo fijo",
                "pasivos fijos",
                "pasivo a largo plazo",
                "long term liabilities",
                "deuda a largo plazo",
                "total pasivos fijos",
                "total pasivo fijo",
            ],
            Concept::TotalLiabilities => &[
                "total pasivo",
                "total liabilities",
                "pasivo total",
                "suma del pasivo",
                "pasivos totales",
                "total pasivos",
            ],
            Concept::Equity => &[
                "patrimonio",
                "capital",
                "equity",
                "capital contable",
                "total capital",
                "patrimonio neto",
                "total patrimonio",
            ],
            Concept::Sales => &[
                "ventas",
                "ingresos",
                "sales",
                "revenue",
                "ventas netas",
                "ingresos totales",
                "ingresos por ventas",
                "ventas totales",
            ],
            Concept::CreditSales => &["ventas a credito", "ventas credito", "credit sales"],
            Concept::CostOfSales => &[
                "costo de ventas",
                "cost of sales",
                "costos",
                "costo de lo vendido",
                "costo de bienes vendidos",
            ],
            Concept::GrossProfit => &[
                "utilidad bruta",
                "gross profit",
                "ganancia bruta",
                "margen bruto",
            ],
            Concept::SellingExpenses => &["gastos de venta", "gastos de comercializacion"],
            Concept::AdministrativeExpenses => &[
                "gastos de administracion",
                "gastos administrativos",
                "gastos generales",
            ],
            Concept::OperatingExpenses => &[
                "gastos operativos",
                "gastos de operacion",
                "operating expenses",
            ],
            Concept::OperatingIncome => &[
                "utilidad operativa",
                "operating income",
                "utilidad de operacion",
                "resultado operativo",
                "ebit",
            ],
            Concept::InterestExpense => &[
                "gastos financieros",
                "intereses",
                "intereses pagados",
                "interest expense",
            ],
            Concept::NetIncome => &[
                "utilidad neta",
                "net income",
                "resultado del ejercicio",
                "utilidad del ejercicio",
                "ganancia neta",
            ],
            Concept::Depreciation => &["depreciacion", "amortizacion", "depreciation"],
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Concept {
    type Err = FinancialAnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Concept::ALL
            .iter()
            .copied()
            .find(|concept| concept.id() == s)
            .ok_or_else(|| FinancialAnalysisError::UnknownConcept(s.to_string()))
    }
}
