use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::error::DataError;
use super::model::{Datasets, EnergyRecord, EnergyTable, RecordKind};
use crate::config::DashboardConfig;

/// Columns every table must provide, in file order.
const COLUMNS: [&str; 5] = ["country", "year", "type", "energy_source", "value"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load both tables named by the configuration.
pub fn load_datasets(config: &DashboardConfig) -> Result<Datasets> {
    let countries_path = config.countries_path();
    let continents_path = config.continents_path();

    let countries = load_table(&countries_path)
        .with_context(|| format!("loading {}", countries_path.display()))?;
    let continents = load_table(&continents_path)
        .with_context(|| format!("loading {}", continents_path.display()))?;

    if continents.is_empty() {
        log::warn!(
            "{} has no rows; continent and year filters will be empty",
            continents_path.display()
        );
    }

    log::info!(
        "Loaded {} country rows and {} continent rows ({} continents, {} years)",
        countries.len(),
        continents.len(),
        continents.regions.len(),
        continents.years.len()
    );

    Ok(Datasets {
        countries,
        continents,
    })
}

/// Load one table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `country, year, type, energy_source, value`
/// * `.json`    – `[{ "country": ..., "year": ..., ... }, ...]`
/// * `.parquet` – the same five columns (recommended for large files)
///
/// Extra columns (e.g. a saved pandas index) are ignored.
pub fn load_table(path: &Path) -> Result<EnergyTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            read_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedExtension(other.to_string()).into()),
    };

    Ok(EnergyTable::from_records(records))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read records from CSV text. Column order does not matter; columns are
/// located by header name.
pub fn read_csv<R: Read>(source: R) -> Result<Vec<EnergyRecord>> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let mut idx = [0usize; 5];
    for (slot, name) in idx.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(DataError::MissingColumn(name))?;
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let field = |i: usize| record.get(idx[i]).unwrap_or("").trim();

        let Some(value) = parse_value(field(4), row_no)? else {
            skip_missing_value(row_no);
            continue;
        };
        records.push(EnergyRecord {
            country: field(0).to_string(),
            year: parse_year(field(1), row_no)?,
            kind: RecordKind::parse(field(2)),
            energy_source: field(3).to_string(),
            value,
        });
    }

    Ok(records)
}

fn parse_year(s: &str, row: usize) -> Result<i32, DataError> {
    // Years written by pandas from a float column come out as "2015.0".
    s.parse::<i32>()
        .ok()
        .or_else(|| {
            s.parse::<f64>()
                .ok()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i32)
        })
        .ok_or_else(|| DataError::InvalidValue {
            row,
            column: "year",
            value: s.to_string(),
        })
}

/// An empty cell (pandas writes NaN that way) or a literal NaN is a missing
/// value, not an error.
fn parse_value(s: &str, row: usize) -> Result<Option<f64>, DataError> {
    if s.is_empty() {
        return Ok(None);
    }
    let v = s.parse::<f64>().map_err(|_| DataError::InvalidValue {
        row,
        column: "value",
        value: s.to_string(),
    })?;
    Ok((!v.is_nan()).then_some(v))
}

/// Rows without a value are dropped so they never reach the sums.
fn skip_missing_value(row: usize) {
    log::warn!("Row {row}: missing value, row skipped");
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// One row of `df.to_json(orient='records')`.
#[derive(Debug, Deserialize)]
struct JsonRecord {
    country: String,
    year: f64,
    #[serde(rename = "type")]
    kind: String,
    energy_source: String,
    value: Option<f64>,
}

/// Parse a records-oriented JSON array.
pub fn parse_json(text: &str) -> Result<Vec<EnergyRecord>> {
    let rows: Vec<JsonRecord> = serde_json::from_str(text).context("parsing JSON records")?;

    let mut records = Vec::with_capacity(rows.len());
    for (row, r) in rows.into_iter().enumerate() {
        if r.year.fract() != 0.0 {
            return Err(DataError::InvalidValue {
                row,
                column: "year",
                value: r.year.to_string(),
            }
            .into());
        }
        let Some(value) = r.value.filter(|v| !v.is_nan()) else {
            skip_missing_value(row);
            continue;
        };
        records.push(EnergyRecord {
            country: r.country,
            year: r.year as i32,
            kind: RecordKind::parse(&r.kind),
            energy_source: r.energy_source,
            value,
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the five table columns.
///
/// String columns may be Utf8 or LargeUtf8, `year` any integer type and
/// `value` any numeric type; everything is cast before reading. Works with
/// files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path) -> Result<Vec<EnergyRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    // Row numbers count every row read, skipped ones included.
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &'static str, to: &DataType| -> Result<ArrayRef> {
            let i = schema
                .index_of(name)
                .map_err(|_| DataError::MissingColumn(name))?;
            let col = batch.column(i);
            cast(col, to).map_err(|_| {
                DataError::UnsupportedType {
                    column: name.to_string(),
                    data_type: col.data_type().to_string(),
                }
                .into()
            })
        };

        let country = column("country", &DataType::Utf8)?;
        let year = column("year", &DataType::Int64)?;
        let kind = column("type", &DataType::Utf8)?;
        let source = column("energy_source", &DataType::Utf8)?;
        let value = column("value", &DataType::Float64)?;

        let country = country.as_string::<i32>();
        let year = year.as_primitive::<Int64Type>();
        let kind = kind.as_string::<i32>();
        let source = source.as_string::<i32>();
        let value = value.as_primitive::<Float64Type>();

        for row in 0..batch.num_rows() {
            let row_no = offset + row;
            if value.is_null(row) || value.value(row).is_nan() {
                skip_missing_value(row_no);
                continue;
            }
            let null_in = [
                ("country", country.is_null(row)),
                ("year", year.is_null(row)),
                ("type", kind.is_null(row)),
                ("energy_source", source.is_null(row)),
            ]
            .into_iter()
            .find(|(_, is_null)| *is_null);
            if let Some((column, _)) = null_in {
                return Err(DataError::InvalidValue {
                    row: row_no,
                    column,
                    value: "null".into(),
                }
                .into());
            }

            let y = year.value(row);
            let y = i32::try_from(y).map_err(|_| DataError::InvalidValue {
                row: row_no,
                column: "year",
                value: y.to_string(),
            })?;

            records.push(EnergyRecord {
                country: country.value(row).to_string(),
                year: y,
                kind: RecordKind::parse(kind.value(row)),
                energy_source: source.value(row).to_string(),
                value: value.value(row),
            });
        }
        offset += batch.num_rows();
    }

    Ok(records)
}
