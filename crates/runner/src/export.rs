//! Result export to CSV or JSON

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::results::{ResultRow, ResultTable};

type ExportResult<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Header plus one line per row, undefined values as empty cells
    #[default]
    Csv,
    /// Array of row objects, undefined values as `null`
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dir: PathBuf,
    /// File stem; derived from the analysis mode when unset
    pub filename: Option<String>,
    pub format: ExportFormat,
    /// Decimal places numeric fields are rounded to
    pub decimals: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("Exports"),
            filename: None,
            format: ExportFormat::Csv,
            decimals: 4,
        }
    }
}

/// Write `table` sorted by key to `<dir>/<stem>.<ext>`, returning the path
pub fn export<R: ResultRow>(
    table: &ResultTable<R>,
    config: &ExportConfig,
    stem: &str,
) -> ExportResult<PathBuf> {
    fs::create_dir_all(&config.dir).map_err(|source| ExportError::Io {
        path: config.dir.clone(),
        source,
    })?;

    let path = config
        .dir
        .join(format!("{}.{}", stem, config.format.extension()));
    let rows = table.export_view(config.decimals);

    match config.format {
        ExportFormat::Csv => write_csv(&path, &rows)?,
        ExportFormat::Json => write_json(&path, &rows)?,
    }

    log::info!("Exported {} rows to {:?}", rows.len(), path);
    Ok(path)
}

fn create(path: &Path) -> ExportResult<File> {
    File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_csv<R: Serialize>(path: &Path, rows: &[R]) -> ExportResult<()> {
    let mut writer = csv::Writer::from_writer(create(path)?);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn write_json<R: Serialize>(path: &Path, rows: &[R]) -> ExportResult<()> {
    let mut writer = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::IntervalRow;
    use chrono::NaiveDate;
    use closing_core::{ClearingPoint, UncrossResult};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn table() -> ResultTable<IntervalRow> {
        let date = NaiveDate::from_ymd_opt(2019, 3, 15).unwrap();
        let reference = UncrossResult {
            clearing: Some(ClearingPoint {
                price: dec!(10.00004),
                volume: dec!(50),
                cum_bids: dec!(50),
                cum_asks: dec!(80),
            }),
            total_bids: Some(dec!(150)),
            total_asks: Some(dec!(140)),
        };
        [600, 0]
            .into_iter()
            .map(|lag| {
                IntervalRow::new(
                    date,
                    "NESN".to_string(),
                    lag,
                    &reference,
                    &UncrossResult::undefined(),
                )
            })
            .collect()
    }

    #[test]
    fn test_csv_export() {
        let dir = tempdir().unwrap();
        let config = ExportConfig {
            dir: dir.path().join("nested"),
            ..ExportConfig::default()
        };

        let path = export(&table(), &config, "Intervals").unwrap();

        assert_eq!(path, dir.path().join("nested").join("Intervals.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines[0],
            "date,symbol,lag,close_price,close_vol,snap_price,snap_vol,snap_bids,snap_asks,snap_cum_bids,snap_cum_asks"
        );
        // Sorted by lag, rounded, undefined cells empty
        assert_eq!(lines[1], "2019-03-15,NESN,0,10,50,,,,,,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_json_export() {
        let dir = tempdir().unwrap();
        let config = ExportConfig {
            dir: dir.path().to_path_buf(),
            format: ExportFormat::Json,
            ..ExportConfig::default()
        };

        let path = export(&table(), &config, "Intervals").unwrap();

        assert_eq!(path.extension().unwrap(), "json");
        let rows: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 2);
        assert_eq!(rows[0]["lag"], 0);
        assert!(rows[0]["snap_price"].is_null());
    }
}
