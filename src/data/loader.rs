use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::columns::{canonical_name, normalize_headers};
use super::model::{Cell, Column, Dataset};

/// Spellings a data frame reader treats as "not available" by default.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an indicator table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one country per record (the report's format)
/// * `.json`    – `[{ "Country name": "Finland", "Ladder score": 7.8, ... }, ...]`
/// * `.parquet` – one column per indicator
///
/// Column names are canonicalized with [`canonical_name`] whatever the format.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        dataset.len(),
        dataset.column_names(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let headers = normalize_headers(reader.headers().context("reading CSV headers")?.iter());

    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, value) in record.iter().enumerate() {
            cells[col_idx].push(parse_cell(value));
        }
    }

    Ok(Dataset::from_columns(
        headers
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect(),
    ))
}

fn parse_cell(s: &str) -> Cell {
    if NA_VALUES.contains(&s) {
        return Cell::Missing;
    }
    match s.trim().parse::<f64>() {
        Ok(v) => Cell::Number(v),
        Err(_) => Cell::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')` layout.
/// Columns appear in the order their keys are first seen.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    let mut cells: Vec<Vec<Cell>> = Vec::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        // Two keys with the same canonical name fill two columns, as in CSV.
        let mut filled = vec![false; names.len()];
        for (key, val) in obj {
            let name = canonical_name(key);
            let free = names
                .iter()
                .enumerate()
                .position(|(idx, n)| *n == name && !filled[idx]);
            let col_idx = match free {
                Some(idx) => idx,
                None => {
                    names.push(name);
                    cells.push(vec![Cell::Missing; i]);
                    filled.push(false);
                    names.len() - 1
                }
            };
            filled[col_idx] = true;
            cells[col_idx].push(json_to_cell(val));
        }

        // Keys absent from this record.
        for col in &mut cells {
            col.resize(i + 1, Cell::Missing);
        }
    }

    Ok(Dataset::from_columns(
        names
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect(),
    ))
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::Null => Cell::Missing,
        JsonValue::Number(n) => n
            .as_f64()
            .map(Cell::Number)
            .unwrap_or_else(|| Cell::Text(n.to_string())),
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Bool(b) => Cell::Text(b.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
///
/// Numeric Arrow columns become [`Cell::Number`]; every other type is cast to
/// UTF-8 and kept as text.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let names = normalize_headers(builder.schema().fields().iter().map(|f| f.name()));
    let reader = builder.build().context("building parquet reader")?;

    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, col) in batch.columns().iter().enumerate() {
            extend_cells(&mut cells[col_idx], col)
                .with_context(|| format!("column '{}'", names[col_idx]))?;
        }
    }

    Ok(Dataset::from_columns(
        names
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect(),
    ))
}

fn extend_cells(out: &mut Vec<Cell>, col: &Arc<dyn Array>) -> Result<()> {
    if col.data_type().is_numeric() {
        let floats = cast(col, &DataType::Float64).context("casting to Float64")?;
        let floats = floats
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?;
        out.extend(floats.iter().map(|v| v.map(Cell::Number).unwrap_or(Cell::Missing)));
    } else {
        let strings = cast(col, &DataType::Utf8).context("casting to Utf8")?;
        let strings = strings
            .as_any()
            .downcast_ref::<StringArray>()
            .context("expected StringArray")?;
        out.extend(
            strings
                .iter()
                .map(|v| v.map(|s| Cell::Text(s.to_string())).unwrap_or(Cell::Missing)),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::tempdir;

    use super::*;

    const REPORT_CSV: &str = "\
Country name,Ladder score,Logged GDP per capita,Regional indicator
Finland,7.804,10.792,Western Europe
Denmark,7.586,,Western Europe
Afghanistan,1.859,7.324,NA
";

    #[test]
    fn loads_csv_with_canonical_headers() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("WHR2023.csv");
        fs::write(&path, REPORT_CSV).expect("write csv");

        let ds = load_file(&path).expect("load csv");
        assert_eq!(
            ds.column_names(),
            vec!["country", "happiness_score", "gdp_per_capita", "region"]
        );
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.column("gdp_per_capita").unwrap().numbers(),
            vec![Some(10.792), None, Some(7.324)]
        );
        assert_eq!(ds.column("region").unwrap().cells[2], Cell::Missing);
        assert!(!ds.column("country").unwrap().is_numeric());
        assert!(ds.column("happiness_score").unwrap().is_numeric());
    }

    #[test]
    fn parses_cells_like_a_data_frame() {
        assert_eq!(parse_cell("7.5"), Cell::Number(7.5));
        assert_eq!(parse_cell("-3"), Cell::Number(-3.0));
        assert_eq!(parse_cell("N/A"), Cell::Missing);
        assert_eq!(parse_cell(""), Cell::Missing);
        assert_eq!(parse_cell("Chile"), Cell::Text("Chile".into()));
    }

    #[test]
    fn ragged_csv_is_an_error() {
        let reader = csv::Reader::from_reader("a,b\n1,2\n3\n".as_bytes());
        assert!(read_csv(reader).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("absent.csv"));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_file(Path::new("report.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn json_records_keep_first_seen_order() {
        let ds = parse_json(
            r#"[
                {"Country name": "Finland", "Ladder score": 7.8},
                {"Ladder score": 7.5, "Country name": "Denmark", "Generosity": null},
                {"Country name": "Iceland", "Generosity": 0.27}
            ]"#,
        )
        .expect("parse json");
        assert_eq!(ds.column_names(), vec!["country", "happiness_score", "generosity"]);
        assert_eq!(
            ds.column("happiness_score").unwrap().numbers(),
            vec![Some(7.8), Some(7.5), None]
        );
        assert_eq!(ds.column("generosity").unwrap().numbers(), vec![None, None, Some(0.27)]);
        assert_eq!(ds.label("country", 1).as_deref(), Some("Denmark"));
    }

    #[test]
    fn json_keys_sharing_a_canonical_name_keep_both_values() {
        let ds = parse_json(
            r#"[
                {"Country name": "Finland", "Ladder score": 7.8, "happiness_score": 7.7},
                {"Country name": "Denmark", "happiness_score": 7.5}
            ]"#,
        )
        .expect("parse json");
        assert_eq!(
            ds.column_names(),
            vec!["country", "happiness_score", "happiness_score"]
        );
        let scores: Vec<Vec<Option<f64>>> = ds
            .columns()
            .iter()
            .filter(|c| c.name == "happiness_score")
            .map(|c| c.numbers())
            .collect();
        assert_eq!(scores, vec![vec![Some(7.8), Some(7.5)], vec![Some(7.7), None]]);
    }

    #[test]
    fn csv_keeps_duplicate_canonical_headers() {
        let reader = csv::Reader::from_reader("Ladder score,happiness_score\n7.8,7.7\n".as_bytes());
        let ds = read_csv(reader).expect("read csv");
        assert_eq!(ds.column_names(), vec!["happiness_score", "happiness_score"]);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(parse_json(r#"{"a": 1}"#).is_err());
        assert!(parse_json(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn loads_parquet() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("whr.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("Country name", DataType::Utf8, false),
            Field::new("Ladder score", DataType::Float64, true),
            Field::new("Rank", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Finland", "Denmark"])),
                Arc::new(Float64Array::from(vec![Some(7.804), None])),
                Arc::new(Int64Array::from(vec![1, 2])),
            ],
        )
        .expect("record batch");
        let file = fs::File::create(&path).expect("create parquet");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("writer");
        writer.write(&batch).expect("write batch");
        writer.close().expect("close writer");

        let ds = load_file(&path).expect("load parquet");
        assert_eq!(ds.column_names(), vec!["country", "happiness_score", "rank"]);
        assert_eq!(ds.column("happiness_score").unwrap().numbers(), vec![Some(7.804), None]);
        assert_eq!(ds.column("rank").unwrap().numbers(), vec![Some(1.0), Some(2.0)]);
        assert_eq!(ds.label("country", 0).as_deref(), Some("Finland"));
    }
}
