use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const YEARS: std::ops::RangeInclusive<i64> = 2013..=2022;

/// (continent, consumption scale in TWh, per-capita scale in kWh)
const CONTINENTS: [(&str, f64, f64); 6] = [
    ("Africa", 900.0, 4_000.0),
    ("Asia", 9_000.0, 18_000.0),
    ("Europe", 4_500.0, 35_000.0),
    ("North America", 5_000.0, 70_000.0),
    ("Oceania", 350.0, 60_000.0),
    ("South America", 1_100.0, 15_000.0),
];

/// Source names as they appear in the raw continent file (lower case) with a
/// share of each continent's consumption and a yearly growth rate.
const SOURCES: [(&str, f64, f64); 10] = [
    ("coal", 0.27, -0.01),
    ("gas", 0.23, 0.01),
    ("oil", 0.31, -0.005),
    ("nuclear", 0.04, 0.0),
    ("solar", 0.02, 0.25),
    ("wind", 0.03, 0.15),
    ("hydro", 0.06, 0.01),
    ("biofuel", 0.01, 0.03),
    ("low_carbon", 0.02, 0.05),
    ("geothermal", 0.005, 0.02),
];

/// (country, CO2 emissions in Mt, primary consumption in TWh)
const COUNTRIES: [(&str, f64, f64); 10] = [
    ("China", 10_500.0, 40_000.0),
    ("United States", 5_000.0, 26_000.0),
    ("India", 2_500.0, 9_500.0),
    ("Russia", 1_700.0, 8_000.0),
    ("Japan", 1_100.0, 5_000.0),
    ("Germany", 700.0, 3_500.0),
    ("Brazil", 480.0, 3_400.0),
    ("South Africa", 450.0, 1_400.0),
    ("Australia", 400.0, 1_600.0),
    ("France", 300.0, 2_700.0),
];

#[derive(Debug, Serialize)]
struct Row {
    country: String,
    year: i64,
    #[serde(rename = "type")]
    kind: &'static str,
    energy_source: String,
    value: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Multiplicative noise around 1.0.
    fn jitter(&mut self, spread: f64) -> f64 {
        1.0 + (self.next_f64() * 2.0 - 1.0) * spread
    }
}

fn continent_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(continent, twh, kwh) in &CONTINENTS {
        for year in YEARS {
            let t = (year - YEARS.start()) as f64;
            for &(source, share, growth) in &SOURCES {
                let trend = (1.0 + growth).powf(t);
                rows.push(Row {
                    country: continent.to_string(),
                    year,
                    kind: "consumption",
                    energy_source: source.to_string(),
                    value: twh * share * trend * rng.jitter(0.05),
                });
                rows.push(Row {
                    country: continent.to_string(),
                    year,
                    kind: "cons",
                    energy_source: source.to_string(),
                    value: kwh * share * trend * rng.jitter(0.05),
                });
            }
            // Fossil per-capita totals are published as a separate series.
            rows.push(Row {
                country: continent.to_string(),
                year,
                kind: "energy",
                energy_source: "fossil fuel".to_string(),
                value: kwh * 0.8 * rng.jitter(0.03),
            });
        }
    }
    rows
}

fn country_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(country, mt, twh) in &COUNTRIES {
        for year in YEARS {
            rows.push(Row {
                country: country.to_string(),
                year,
                kind: "emissions",
                energy_source: "Fossil Fuel".to_string(),
                value: mt * rng.jitter(0.04),
            });
            for &(source, share, growth) in &SOURCES {
                let t = (year - YEARS.start()) as f64;
                rows.push(Row {
                    country: country.to_string(),
                    year,
                    kind: "consumption",
                    energy_source: capitalize_first(source),
                    value: twh * share * (1.0 + growth).powf(t) * rng.jitter(0.05),
                });
            }
        }
    }
    rows
}

/// Country-file sources are written title-cased ("Low_carbon", "Fossil Fuel")
/// the way the published country table carries them; only the continent file
/// ships lower-case names. The dashboard normalizes both on load.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("country", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("type", DataType::Utf8, false),
        Field::new("energy_source", DataType::Utf8, false),
        Field::new("value", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.country))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.kind))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.energy_source))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.value))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let continents = continent_rows(&mut rng);
    let countries = country_rows(&mut rng);

    for (stem, rows) in [
        ("df_continents_10years", &continents),
        ("df_countries_10years", &countries),
    ] {
        write_csv(&out_dir.join(format!("{stem}.csv")), rows)?;
        write_parquet(&out_dir.join(format!("{stem}.parquet")), rows)?;
        println!(
            "Wrote {} rows to {}/{stem}.{{csv,parquet}}",
            rows.len(),
            out_dir.display()
        );
    }

    Ok(())
}
