//! Domain error types.
//!
//! Every variant is fatal: the conversion either produces a complete table
//! or nothing. Reporting is left to the caller; the core never logs.

/// Top-level error type for flex2tasty.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("must supply an input path or an in-memory document")]
    NoInput,

    #[error("unknown file format: {format}")]
    UnknownFormat { format: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("{format} parse error in {file}: {reason}")]
    DocumentParse {
        format: String,
        file: String,
        reason: String,
    },

    #[error("unexpected document shape: {reason}")]
    DocumentShape { reason: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid {field} value {value:?}: {reason}")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },

    #[error("unknown asset category: {category}")]
    UnknownAssetCategory { category: String },

    #[error("unknown buy/sell side: {side}")]
    UnknownBuySell { side: String },

    #[error(
        "cannot derive value for {symbol} on {trade_date}: \
         zero proceeds outside an assignment, exercise or expiration"
    )]
    UnparseableTrade { symbol: String, trade_date: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ConvertError> for std::process::ExitCode {
    fn from(err: &ConvertError) -> Self {
        let code: u8 = match err {
            ConvertError::Io(_) => 1,
            ConvertError::NoInput
            | ConvertError::UnknownFormat { .. }
            | ConvertError::ConfigParse { .. }
            | ConvertError::ConfigMissing { .. }
            | ConvertError::ConfigInvalid { .. } => 2,
            ConvertError::DocumentParse { .. } => 3,
            ConvertError::DocumentShape { .. } => 4,
            ConvertError::MissingField { .. }
            | ConvertError::InvalidField { .. }
            | ConvertError::UnknownAssetCategory { .. }
            | ConvertError::UnknownBuySell { .. }
            | ConvertError::UnparseableTrade { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
