//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_sink_adapter::CsvSinkAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_adapter::JsonSourceAdapter;
use crate::adapters::xml_adapter::XmlSourceAdapter;
use crate::domain::convert::{ConversionConfig, Converter, ExtraColumn, FileFormat};
use crate::domain::document::DocNode;
use crate::domain::error::ConvertError;
use crate::domain::extract::extract_trades;
use crate::domain::record::TradeView;
use crate::ports::config_port::ConfigPort;
use crate::ports::source_port::SourcePort;

#[derive(Parser, Debug)]
#[command(
    name = "flex2tasty",
    about = "Interactive Brokers Flex trade export to Tastyworks CSV converter"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a Flex trades export to a Tastyworks import CSV
    Convert {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// xml or json; inferred from the input extension when omitted
        #[arg(long)]
        format: Option<String>,
        /// IANA zone the trade timestamps are local to
        #[arg(long)]
        time_zone: Option<String>,
        /// Passthrough column to append, FIELD or FIELD=LABEL; repeatable
        #[arg(long = "extra-column", value_name = "FIELD[=LABEL]")]
        extra_columns: Vec<String>,
    },
    /// Summarize the trades in a Flex export without converting
    Info {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        format: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Convert {
            input,
            output,
            config,
            format,
            time_zone,
            extra_columns,
        } => run_convert(
            &input,
            &output,
            config.as_ref(),
            format.as_deref(),
            time_zone.as_deref(),
            &extra_columns,
        ),
        Command::Info { input, format } => run_info(&input, format.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = ConvertError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Format precedence: CLI flag, then config file, then input extension.
pub fn resolve_format(
    input: &Path,
    flag: Option<&str>,
    config: Option<&dyn ConfigPort>,
) -> Result<FileFormat, ConvertError> {
    if let Some(flag) = flag {
        return flag.parse();
    }
    if let Some(value) = config.and_then(|c| c.get_string("convert", "format")) {
        return value.parse();
    }
    FileFormat::from_extension(input)
}

/// Merge CLI flags over config-file values into a [`ConversionConfig`].
/// The time zone has no default; extra columns default to none.
pub fn build_conversion_config(
    config: Option<&dyn ConfigPort>,
    time_zone_flag: Option<&str>,
    extra_column_flags: &[String],
) -> Result<ConversionConfig, ConvertError> {
    let zone = match time_zone_flag {
        Some(z) => z.to_string(),
        None => config
            .and_then(|c| c.get_string("convert", "time_zone"))
            .ok_or_else(|| ConvertError::ConfigMissing {
                section: "convert".to_string(),
                key: "time_zone".to_string(),
            })?,
    };
    let time_zone = zone.parse().map_err(|_| ConvertError::ConfigInvalid {
        section: "convert".to_string(),
        key: "time_zone".to_string(),
        reason: format!("{zone} is not an IANA time zone"),
    })?;

    let extra_columns = if !extra_column_flags.is_empty() {
        parse_extra_columns(extra_column_flags.iter().map(String::as_str))?
    } else {
        match config.and_then(|c| c.get_string("convert", "extra_columns")) {
            Some(spec) => parse_extra_columns(spec.split(','))?,
            None => Vec::new(),
        }
    };

    Ok(ConversionConfig {
        time_zone,
        extra_columns,
    })
}

/// Each token is `field` or `field = Label`; the label defaults to the
/// field name.
pub fn parse_extra_columns<'a>(
    tokens: impl Iterator<Item = &'a str>,
) -> Result<Vec<ExtraColumn>, ConvertError> {
    let invalid = |reason: &str| ConvertError::ConfigInvalid {
        section: "convert".to_string(),
        key: "extra_columns".to_string(),
        reason: reason.to_string(),
    };

    let mut columns = Vec::new();
    for token in tokens {
        let column = match token.split_once('=') {
            Some((field, label)) => {
                let (field, label) = (field.trim(), label.trim());
                if field.is_empty() || label.is_empty() {
                    return Err(invalid(&format!("malformed column spec {token:?}")));
                }
                ExtraColumn::labeled(field, label)
            }
            None => {
                let field = token.trim();
                if field.is_empty() {
                    return Err(invalid("empty column name"));
                }
                ExtraColumn::new(field)
            }
        };
        columns.push(column);
    }
    Ok(columns)
}

fn source_for(input: &Path, format: FileFormat) -> Box<dyn SourcePort> {
    match format {
        FileFormat::Xml => Box::new(XmlSourceAdapter::new(input.to_path_buf())),
        FileFormat::Json => Box::new(JsonSourceAdapter::new(input.to_path_buf())),
    }
}

pub fn load_document(input: &Path, format: FileFormat) -> Result<DocNode, ConvertError> {
    source_for(input, format).load()
}

fn run_convert(
    input: &Path,
    output: &Path,
    config_path: Option<&PathBuf>,
    format_flag: Option<&str>,
    time_zone_flag: Option<&str>,
    extra_column_flags: &[String],
) -> ExitCode {
    // Stage 1: Load config file, if any
    let adapter = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(a) => Some(a),
                Err(code) => return code,
            }
        }
        None => None,
    };
    let config_port = adapter.as_ref().map(|a| a as &dyn ConfigPort);

    // Stage 2: Resolve format and conversion config
    let format = match resolve_format(input, format_flag, config_port) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let config = match build_conversion_config(config_port, time_zone_flag, extra_column_flags) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Parse the export
    eprintln!("Reading {} ({})", input.display(), format);
    let source = source_for(input, format);
    let mut converter = match Converter::from_parts(None, Some(source.as_ref()), config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Convert and write
    let trades = match converter.output() {
        Ok(table) => table.len() - 1,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = converter.save_as(&CsvSinkAdapter, output) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Wrote {} trades to {}", trades, output.display());
    ExitCode::SUCCESS
}

fn run_info(input: &Path, format_flag: Option<&str>) -> ExitCode {
    let format = match resolve_format(input, format_flag, None) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Reading {} ({})", input.display(), format);
    let document = match load_document(input, format) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let trades = match extract_trades(&document) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut symbols = BTreeSet::new();
    let mut dates = BTreeSet::new();
    for trade in &trades {
        let view = TradeView::new(trade);
        if let Some(symbol) = view.get("symbol") {
            symbols.insert(symbol.to_string());
        }
        if let Some(date) = view.get("tradeDate") {
            dates.insert(date.to_string());
        }
    }

    println!("Trades:  {}", trades.len());
    println!(
        "Symbols: {}",
        symbols.into_iter().collect::<Vec<_>>().join(", ")
    );
    match (dates.iter().next(), dates.iter().next_back()) {
        (Some(first), Some(last)) => println!("Dates:   {first} - {last}"),
        _ => println!("Dates:   -"),
    }
    ExitCode::SUCCESS
}
