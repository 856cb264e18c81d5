use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinancialAnalysisError {
    #[error("No valid periods could be extracted from the supplied records")]
    NoPeriods,

    #[error("Unknown document type '{0}': expected 'balance_sheet' or 'income_statement'")]
    UnknownDocumentType(String),

    #[error("Unknown financial concept '{0}'")]
    UnknownConcept(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FinancialAnalysisError>;
