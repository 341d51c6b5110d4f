//! Conversion driver: projects extracted trades onto the Tastyworks
//! import schema and caches the finished table.

use crate::domain::document::DocNode;
use crate::domain::error::ConvertError;
use crate::domain::extract::extract_trades;
use crate::domain::record::TradeView;
use crate::domain::rules;
use crate::ports::sink_port::SinkPort;
use crate::ports::source_port::SourcePort;
use chrono_tz::Tz;
use std::path::Path;

/// Fixed header of the Tastyworks import file; extra-column labels are
/// appended after these 16 in configured order.
pub const OUTPUT_HEADER: [&str; 16] = [
    "Date",
    "Type",
    "Action",
    "Symbol",
    "Instrument Type",
    "Description",
    "Value",
    "Quantity",
    "Average Price",
    "Commissions",
    "Fees",
    "Multiplier",
    "Underlying Symbol",
    "Expiration Date",
    "Strike Price",
    "Call or Put",
];

/// One output cell. `None` renders as an empty CSV field but keeps the
/// "semantically inapplicable" cells distinguishable from literal empty
/// strings in tests.
pub type OutputRow = Vec<Option<String>>;

/// Header row plus one row per trade, in extraction order. Never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTable {
    pub rows: Vec<OutputRow>,
}

impl OutputTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A passthrough column appended after the fixed sixteen.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraColumn {
    pub field: String,
    pub label: String,
}

impl ExtraColumn {
    /// Header label defaults to the field name.
    pub fn new<S: Into<String>>(field: S) -> Self {
        let field = field.into();
        let label = field.clone();
        Self { field, label }
    }

    pub fn labeled<F: Into<String>, L: Into<String>>(field: F, label: L) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Xml,
    Json,
}

impl FileFormat {
    /// Infer the format from a file extension.
    pub fn from_extension(path: &Path) -> Result<Self, ConvertError> {
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .parse()
    }
}

impl std::str::FromStr for FileFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(FileFormat::Xml),
            "json" => Ok(FileFormat::Json),
            other => Err(ConvertError::UnknownFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Xml => write!(f, "xml"),
            FileFormat::Json => write!(f, "json"),
        }
    }
}

/// Everything one conversion run needs besides the document itself.
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    pub time_zone: Tz,
    pub extra_columns: Vec<ExtraColumn>,
}

/// Orchestrates extract → project → table. The table is computed at most
/// once and cached for the converter's lifetime; re-reads are
/// byte-identical.
pub struct Converter {
    document: DocNode,
    config: ConversionConfig,
    table: Option<OutputTable>,
}

impl Converter {
    pub fn new(document: DocNode, config: ConversionConfig) -> Self {
        Self {
            document,
            config,
            table: None,
        }
    }

    /// Build from exactly one source: an in-memory document or a source
    /// port to load one from. Neither, or both, is a configuration error.
    pub fn from_parts(
        document: Option<DocNode>,
        source: Option<&dyn SourcePort>,
        config: ConversionConfig,
    ) -> Result<Self, ConvertError> {
        let document = match (document, source) {
            (Some(document), None) => document,
            (None, Some(source)) => source.load()?,
            _ => return Err(ConvertError::NoInput),
        };
        Ok(Self::new(document, config))
    }

    pub fn output(&mut self) -> Result<&OutputTable, ConvertError> {
        if self.table.is_none() {
            self.table = Some(build_table(&self.document, &self.config)?);
        }
        Ok(self.table.as_ref().unwrap())
    }

    /// Render the table through the given sink, overwriting `path`.
    pub fn save_as(&mut self, sink: &dyn SinkPort, path: &Path) -> Result<(), ConvertError> {
        self.output()?;
        sink.write(self.table.as_ref().unwrap(), path)
    }
}

fn build_table(document: &DocNode, config: &ConversionConfig) -> Result<OutputTable, ConvertError> {
    let trades = extract_trades(document)?;
    let mut rows = Vec::with_capacity(trades.len() + 1);
    rows.push(header_row(config));
    for trade in trades {
        rows.push(project_row(&TradeView::new(trade), config)?);
    }
    Ok(OutputTable { rows })
}

fn header_row(config: &ConversionConfig) -> OutputRow {
    OUTPUT_HEADER
        .iter()
        .map(|h| Some(h.to_string()))
        .chain(config.extra_columns.iter().map(|c| Some(c.label.clone())))
        .collect()
}

/// The fixed 16 cells in header order, then the configured extra columns
/// as raw indifferent lookups (never derived, absent is fine).
fn project_row(view: &TradeView, config: &ConversionConfig) -> Result<OutputRow, ConvertError> {
    let option = rules::is_option(view);
    let mut row: OutputRow = vec![
        Some(rules::build_date_time(view, config.time_zone)?),
        Some("Trade".to_string()),
        Some(rules::build_action(view)?),
        Some(view.required("symbol")?.to_string()),
        Some(rules::build_instrument_type(view)?),
        Some(rules::build_description(view)?),
        Some(rules::build_value(view)?),
        Some(view.required("quantity")?.to_string()),
        Some(rules::build_effective_price(view)?),
        Some(rules::build_commission(view)),
        Some(String::new()),
        view.get("multiplier").map(str::to_string),
        option
            .then(|| view.get("underlyingSymbol").map(str::to_string))
            .flatten(),
        rules::build_expiration(view)?,
        option.then(|| view.get("strike").map(str::to_string)).flatten(),
        rules::build_put_or_call(view),
    ];
    for column in &config.extra_columns {
        row.push(view.get(&column.field).map(str::to_string));
    }
    Ok(row)
}
