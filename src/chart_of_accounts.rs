//! Fixed statement templates used by the static mapper.
//!
//! The templates follow the Mexican/Latin American presentation of the
//! Balance General and Estado de Resultados. Every leaf starts at zero.

use crate::schema::{AccountNode, DocumentType};
use indexmap::IndexMap;

/// Name of the extra category that receives unmatched accounts when the
/// mapper runs with [`crate::schema::UnknownAccountPolicy::Preserve`].
pub const UNCLASSIFIED_CATEGORY: &str = "SinClasificar";

#[derive(Debug, Clone, Copy)]
pub enum TemplateNode {
    Account(&'static str),
    Group(&'static str, &'static [TemplateNode]),
}

use TemplateNode::{Account, Group};

pub const BALANCE_SHEET_TEMPLATE: TemplateNode = Group(
    "BalanceGeneral",
    &[
        Group(
            "ActivoCorriente",
            &[
                Account("Efectivo"),
                Account("Banco"),
                Account("InversionesTemporales"),
                Account("Clientes"),
                Account("DocumentosPorCobrar"),
                Account("Inventarios"),
                Account("IVAAcreditable"),
                Account("Publicidad"),
                Account("PrimasDeSegurosYFianzas"),
                Account("RentasPagadasPorAnticipado"),
                Account("InteresesPagadosPorAnticipados"),
                Account("PapeleriaYUtiles"),
                Account("AnticipoAProveedores"),
            ],
        ),
        Group(
            "ActivoFijo",
            &[
                Account("Terrenos"),
                Account("Edificios"),
                Account("Maquinaria"),
                Account("MobiliarioYEquipoDeOficina"),
                Account("EquipoDeTransporte"),
                Account("Vehiculos"),
            ],
        ),
        Group(
            "ActivoDiferido",
            &[
                Account("GastosPreoperativos"),
                Account("DerechosDeAutor"),
                Account("Patentes"),
                Account("MarcasRegistradas"),
                Account("GastosDeOrganizacion"),
                Account("GastosDeConstitucion"),
                Account("GastosDeInstalacion"),
                Account("PublicidadALargoPlazo"),
                Account("PapeleriaYUtilesALargoPlazo"),
                Account("RentasPagadasPorAnticipadoALargoPlazo"),
                Account("InteresesPagadosPorAnticipadoALargoPlazo"),
            ],
        ),
        Group(
            "OtrosActivos",
            &[
                Account("InversionesEnProceso"),
                Account("FondoDeAmortizacionDeObligaciones"),
            ],
        ),
        Group(
            "PasivosCortoPlazo",
            &[
                Account("Proveedores"),
                Account("DocumentosPorPagar"),
                Account("AcreedoresDiversos"),
                Account("AnticipoDeClientes"),
                Account("DividendosPorPagar"),
                Account("IVAPorPagar"),
                Account("ImpuestoSobreLaRentaPorPagar"),
                Account("InteresesPorPagar"),
                Account("SueldosPorPagar"),
                Account("IngresosCobradosPorAnticipado"),
            ],
        ),
        Group(
            "PasivoFijo",
            &[
                Account("AcreedoresHipotecarios"),
                Account("AcreedoresBancarios"),
                Account("DocumentosPorPagarALargoPlazo"),
                Account("BonosPorPagar"),
            ],
        ),
        Group(
            "PasivoDiferido",
            &[
                Account("RentasCobradasPorAnticipado"),
                Account("InteresesCobradosPorAnticipado"),
            ],
        ),
        Group(
            "CapitalContribuido",
            &[
                Account("CapitalSocial"),
                Account("Donaciones"),
                Account("PrimaEnVentaDeAcciones"),
            ],
        ),
        Group(
            "CapitalGanado",
            &[Account("UtilidadesRetenidas"), Account("UtilidadNeta")],
        ),
    ],
);

pub const INCOME_STATEMENT_TEMPLATE: TemplateNode = Group(
    "EstadoDeResultados",
    &[
        Group(
            "VentasYVariantes",
            &[
                Account("Ventas"),
                Account("VentasAlCredito"),
                Account("Devoluciones"),
                Account("Rebajas"),
                Account("Descuentos"),
                Account("CostoDeVenta"),
                Account("UtilidadBruta"),
            ],
        ),
        Group(
            "GastosOperativos",
            &[
                Group(
                    "GastosDeVenta",
                    &[
                        Account("RentaDelAlmacen"),
                        Account("PropagandaYPublicidad"),
                        Account("SueldoDeVendedores"),
                        Account("ComisionesDeVendedores"),
                        Account("ConsumoDeLuzVenta"),
                        Account("ImpuestosSobreIngresosMercantiles"),
                        Account("DepreciacionDeEquiposDeVenta"),
                    ],
                ),
                Group(
                    "GastosDeAdministracion",
                    &[
                        Account("RentaDeOficina"),
                        Account("SueldoDeOficina"),
                        Account("Papeleria"),
                        Account("ConsumoDeLuzOficina"),
                        Account("ServiciosDeComunicacion"),
                        Account("DepreciacionDeEdificiosYMobiliarios"),
                    ],
                ),
            ],
        ),
        Group(
            "GastosFinancieros",
            &[
                Account("InteresesPagadosPorSobreDocumentos"),
                Account("ComisionesBancariasPagadas"),
                Account("InteresesPagados"),
                Account("UtilidadOperativa"),
            ],
        ),
        Group(
            "OtrosRubros",
            &[
                Group(
                    "OtrosGastos",
                    &[
                        Account("PerdidaEnVentasDeActivo"),
                        Account("ComisionesPagadas"),
                        Account("RentasPagadas"),
                    ],
                ),
                Group(
                    "OtrosProductos",
                    &[
                        Account("ComisionesCobradas"),
                        Account("RentasCobradas"),
                        Account("UtilidadEnVentaDeAcciones"),
                    ],
                ),
            ],
        ),
        Group(
            "Utilidades",
            &[
                Account("UtilidadNetaAntesDeIR"),
                Account("IR"),
                Account("UtilidadNeta"),
                Account("DividendosRepartidos"),
                Account("UtilidadDelEjercicio"),
            ],
        ),
    ],
);

/// Alternate labels accepted for a template leaf, keyed by the leaf's
/// normalized name.
const MAPPER_SYNONYMS: &[(&str, &[&str])] = &[
    ("efectivo", &["caja", "disponible", "cash"]),
    ("banco", &["bancos", "cuentas bancarias"]),
    ("clientes", &["cuentas por cobrar comerciales", "deudores comerciales"]),
    ("inventarios", &["almacen", "mercaderias", "existencias"]),
    ("proveedores", &["cuentas por pagar", "suppliers"]),
    ("ventas", &["ingresos por ventas", "revenue", "sales"]),
    ("costodeventa", &["costo de ventas", "costos de venta", "cost of sales"]),
    ("utilidadneta", &["resultado del ejercicio", "net income", "ganancia neta"]),
    ("ir", &["impuesto a la renta", "isr", "income tax"]),
];

pub fn template_for(document_type: DocumentType) -> &'static TemplateNode {
    match document_type {
        DocumentType::BalanceSheet => &BALANCE_SHEET_TEMPLATE,
        DocumentType::IncomeStatement => &INCOME_STATEMENT_TEMPLATE,
    }
}

/// Synonyms registered for a template leaf; `normalized_leaf` must already
/// be in normalized form.
pub fn mapper_synonyms(normalized_leaf: &str) -> &'static [&'static str] {
    MAPPER_SYNONYMS
        .iter()
        .find(|(leaf, _)| *leaf == normalized_leaf)
        .map(|(_, synonyms)| *synonyms)
        .unwrap_or(&[])
}

impl TemplateNode {
    pub fn name(&self) -> &'static str {
        match self {
            Account(name) | Group(name, _) => *name,
        }
    }

    /// Materializes a fresh tree with every leaf set to zero. The root group
    /// is kept as the single top-level key.
    pub fn instantiate(&self) -> AccountNode {
        let mut root = IndexMap::new();
        root.insert(self.name().to_string(), self.build());
        AccountNode::Category(root)
    }

    fn build(&self) -> AccountNode {
        match self {
            Account(_) => AccountNode::Leaf(0.0),
            Group(_, children) => AccountNode::Category(
                children
                    .iter()
                    .map(|child| (child.name().to_string(), child.build()))
                    .collect(),
            ),
        }
    }

    pub fn account_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        self.collect_accounts(&mut names);
        names
    }

    fn collect_accounts(&self, names: &mut Vec<&'static str>) {
        match self {
            Account(name) => names.push(*name),
            Group(_, children) => {
                for child in children.iter() {
                    child.collect_accounts(names);
                }
            }
        }
    }
}
