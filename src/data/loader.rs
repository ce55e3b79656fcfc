use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Row, Table, Value};
use super::schema::Schema;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table and check it against `schema`.
pub fn load_dataset(path: &Path, schema: &Schema) -> Result<Table> {
    let table = load_file(path)?;
    let table = schema
        .validate(table)
        .with_context(|| format!("{} dataset {}", schema.name, path.display()))?;
    log::info!(
        "Loaded {} dataset: {} rows, {} columns from {}",
        schema.name,
        table.len(),
        table.column_names.len(),
        path.display()
    );
    Ok(table)
}

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat Parquet file with scalar columns
/// * `.json`    – `[{ "Age": 41, "Department": "Sales", ... }, ...]`
/// * `.csv`     – header row followed by one record per line
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Country": "Denmark", "Region": "Western Europe", "HappinessScore": 7.5 },
///   ...
/// ]
/// ```
///
/// Column order follows first appearance across the records.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut column_names: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut values = BTreeMap::new();
        for (key, val) in obj {
            if !column_names.contains(key) {
                column_names.push(key.clone());
            }
            values.insert(key.clone(), json_to_value(val));
        }
        rows.push(Row::new(values));
    }

    Ok(Table::from_rows(column_names, rows))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one record per line.
/// Cell types are guessed per value; an empty cell is a missing value.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let values = headers
            .iter()
            .zip(record.iter())
            .map(|(col, cell)| (col.clone(), guess_value_type(cell)))
            .collect();

        rows.push(Row::new(values));
    }

    Ok(Table::from_rows(headers, rows))
}

fn guess_value_type(s: &str) -> Value {
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_nan() {
            return Value::Null;
        }
        return Value::Float(f);
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    Value::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat scalar columns (strings, ints, floats,
/// bools).
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let values = column_names
                .iter()
                .zip(batch.columns())
                .map(|(name, col)| (name.clone(), extract_value(col, row)))
                .collect();
            rows.push(Row::new(values));
        }
    }

    Ok(Table::from_rows(column_names, rows))
}

/// Extract a single value from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Value {
    if col.is_null(row) {
        return Value::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Utf8View => Value::String(col.as_string_view().value(row).to_string()),
        DataType::Int8 => Value::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => Value::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => Value::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Value::Integer(col.as_primitive::<UInt8Type>().value(row) as i64),
        DataType::UInt16 => Value::Integer(col.as_primitive::<UInt16Type>().value(row) as i64),
        DataType::UInt32 => Value::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => match i64::try_from(col.as_primitive::<UInt64Type>().value(row)) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Float(col.as_primitive::<UInt64Type>().value(row) as f64),
        },
        DataType::Float32 => float_value(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => float_value(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        other => {
            log::warn!("unsupported parquet column type {other:?}, reading as text");
            Value::String(format!("{other:?}"))
        }
    }
}

fn float_value(v: f64) -> Value {
    if v.is_nan() {
        Value::Null
    } else {
        Value::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::SchemaError;
    use crate::data::model::ColumnType;
    use crate::data::schema::{employee, happiness};
    use std::io::Write;
    use tempfile::TempDir;

    const EMPLOYEE_HEADER: &str = "Age,Attrition,BusinessTravel,Department,DistanceFromHome,\
EducationField,EmployeeCount,EmployeeNumber,Gender,JobRole,MonthlyIncome,StandardHours,WorkLifeBalance";

    fn write_file(dir: &Path, name: &str, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    #[test]
    fn test_load_employee_csv() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "EA.csv",
            &[
                EMPLOYEE_HEADER,
                "41,Yes,Travel_Rarely,Sales,1,Life Sciences,1,1,Female,Sales Executive,5993,80,1",
                "49,No,Travel_Frequently,Research & Development,8,Life Sciences,1,2,Male,Research Scientist,5130,80,3",
            ],
        );

        let table = load_dataset(&path, &Schema::employees()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column_names.len(), 13);
        assert_eq!(table.rows[0].get(employee::AGE), &Value::Integer(41));
        assert_eq!(
            table.rows[1].get(employee::DEPARTMENT),
            &Value::from("Research & Development")
        );
        assert_eq!(table.column_type(employee::MONTHLY_INCOME), Ok(ColumnType::Numeric));
    }

    #[test]
    fn test_csv_missing_column_is_schema_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "happiness.csv",
            &[
                "Country,Region,HappinessScore,GDP_PerCapita,HDI",
                "Denmark,Western Europe,7.526,53579,0.928",
            ],
        );

        let err = load_dataset(&path, &Schema::happiness()).unwrap_err();
        let schema_err = err.downcast_ref::<SchemaError>().unwrap();
        assert_eq!(
            schema_err,
            &SchemaError::missing(happiness::ALCOHOL_CONSUMPTION)
        );
    }

    #[test]
    fn test_csv_empty_cells_are_null() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "happiness.csv",
            &[
                "Country,Region,HappinessScore,GDP_PerCapita,HDI,Alcohol Consumption",
                "Denmark,Western Europe,7.526,53579,,NaN",
            ],
        );

        let table = load_dataset(&path, &Schema::happiness()).unwrap();
        assert!(table.rows[0].get(happiness::HDI).is_null());
        assert!(table.rows[0].get(happiness::ALCOHOL_CONSUMPTION).is_null());
        assert_eq!(table.rows[0].get(happiness::HAPPINESS_SCORE), &Value::Float(7.526));
    }

    #[test]
    fn test_load_json_records() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "happiness.json",
            &[r#"[
                {"Country": "Norway", "Region": "Western Europe", "HappinessScore": 7.498,
                 "GDP_PerCapita": 70890, "HDI": 0.951, "Alcohol Consumption": 6.6},
                {"Country": "Chad", "Region": "Sub-Saharan Africa", "HappinessScore": 3.763,
                 "GDP_PerCapita": 664, "HDI": null, "Alcohol Consumption": 1.2}
            ]"#],
        );

        let table = load_dataset(&path, &Schema::happiness()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get(happiness::GDP_PER_CAPITA), &Value::Integer(70890));
        assert!(table.rows[1].get(happiness::HDI).is_null());
        assert_eq!(table.column_type(happiness::HDI), Ok(ColumnType::Numeric));
    }

    #[test]
    fn test_json_rejects_non_array() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "bad.json", &[r#"{"Country": "Norway"}"#]);
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("top-level JSON array"));
    }

    #[test]
    fn test_load_parquet_round_trip() {
        use arrow::array::{Float64Array, StringArray};
        use arrow::datatypes::{Field, Schema as ArrowSchema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("happiness.parquet");

        let schema = Arc::new(ArrowSchema::new(vec![
            Field::new(happiness::COUNTRY, DataType::Utf8, false),
            Field::new(happiness::REGION, DataType::Utf8, false),
            Field::new(happiness::HAPPINESS_SCORE, DataType::Float64, false),
            Field::new(happiness::GDP_PER_CAPITA, DataType::Float64, false),
            Field::new(happiness::HDI, DataType::Float64, true),
            Field::new(happiness::ALCOHOL_CONSUMPTION, DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Japan", "Chad"])),
                Arc::new(StringArray::from(vec!["East Asia", "Sub-Saharan Africa"])),
                Arc::new(Float64Array::from(vec![5.921, 3.763])),
                Arc::new(Float64Array::from(vec![38_894.0, 664.0])),
                Arc::new(Float64Array::from(vec![Some(0.909), None])),
                Arc::new(Float64Array::from(vec![7.7, 1.2])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_dataset(&path, &Schema::happiness()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get(happiness::COUNTRY), &Value::from("Japan"));
        assert_eq!(table.rows[0].get(happiness::HDI), &Value::Float(0.909));
        assert!(table.rows[1].get(happiness::HDI).is_null());
        assert_eq!(table.column_type(happiness::REGION), Ok(ColumnType::Categorical));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("Happiness Score Data.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn test_guess_value_type() {
        assert_eq!(guess_value_type(""), Value::Null);
        assert_eq!(guess_value_type("42"), Value::Integer(42));
        assert_eq!(guess_value_type("4.5"), Value::Float(4.5));
        assert_eq!(guess_value_type("true"), Value::Bool(true));
        assert_eq!(guess_value_type("Sales"), Value::from("Sales"));
    }
}
