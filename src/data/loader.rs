use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use calamine::{Data, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::CellValue;

// ---------------------------------------------------------------------------
// RawTable – header row plus untyped cells
// ---------------------------------------------------------------------------

/// A sheet as read from disk, before any column is interpreted.
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Build a table, padding short rows with nulls and dropping surplus cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        RawTable { headers, rows }
    }

    /// Index of the column whose whitespace-trimmed header equals `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet, first row is the header
/// * `.csv`     – header row with column names
/// * `.json`    – `[{ "Name": "...", "Package": 12.5, ... }, ...]`
/// * `.parquet` – flat columns of strings, ints, floats or bools
pub fn load_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    if table.is_empty() {
        log::warn!("{} has a header row but no data rows", path.display());
    }

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        table.len(),
        table.headers,
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .context("worksheet is empty")?
        .iter()
        .map(|cell| workbook_cell(cell).as_text().unwrap_or_default())
        .collect();

    let body = rows
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect();

    Ok(RawTable::new(headers, body))
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => float_cell(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            log::debug!("date cell {dt:?} read as its serial number");
            float_cell(dt.as_f64())
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

/// NaN and infinities are missing values, never categories.
fn float_cell(v: f64) -> CellValue {
    if v.is_finite() {
        CellValue::Float(v)
    } else {
        CellValue::Null
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// Tokens that mean "no value" in exported sheets.
const NA_TOKENS: [&str; 10] = ["NA", "N/A", "#N/A", "NaN", "nan", "-nan", "null", "NULL", "None", "<NA>"];

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() || NA_TOKENS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return float_cell(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
/// Columns are the union of keys across all records.
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(RawTable::new(headers, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat columns.
///
/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// and the bundled `generate_sample` binary.
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
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
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| extract_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawTable::new(headers, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => float_cell(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => float_cell(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => {
            log::debug!("Unsupported parquet column type {other:?}; reading as null");
            CellValue::Null
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Per-test scratch directory under the system temp dir.
    pub(crate) fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "placement-overview-{}-{name}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn csv_cells_are_typed() {
        let path = scratch_dir("csv_typed").join("placed.csv");
        std::fs::write(
            &path,
            " Name ,Year,Branch,Company,Package\nAsha,2021,CSE,Infosys,6.5\nRavi,2021,ECE,,\n",
        )
        .unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("Name"), Some(0));
        assert_eq!(table.rows[0][1], CellValue::Integer(2021));
        assert_eq!(table.rows[0][4], CellValue::Float(6.5));
        assert_eq!(table.rows[1][3], CellValue::Null);
    }

    #[test]
    fn missing_value_tokens_are_null() {
        for token in ["NaN", "nan", "NA", "N/A", "#N/A", "None", "null", "inf", "-inf"] {
            assert_eq!(guess_cell_type(token), CellValue::Null, "{token}");
        }
        assert_eq!(guess_cell_type("Nandini"), CellValue::Text("Nandini".into()));
    }

    #[test]
    fn short_csv_rows_are_padded() {
        let path = scratch_dir("csv_short").join("placed.csv");
        std::fs::write(&path, "Name,Year,Branch\nAsha,2021\n").unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.rows[0].len(), 3);
        assert!(table.rows[0][2].is_null());
    }

    #[test]
    fn json_matches_csv() {
        let dir = scratch_dir("json_csv");
        let csv_path = dir.join("report.csv");
        let json_path = dir.join("report.json");
        std::fs::write(&csv_path, "Branch,Eligible_Students\nCSE,120\nECE,\n").unwrap();
        std::fs::write(
            &json_path,
            r#"[{"Branch": "CSE", "Eligible_Students": 120}, {"Branch": "ECE"}]"#,
        )
        .unwrap();

        let from_csv = load_table(&csv_path).unwrap();
        let from_json = load_table(&json_path).unwrap();
        assert_eq!(from_csv, from_json);
    }

    #[test]
    fn parquet_columns_are_typed() {
        use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let path = scratch_dir("parquet_typed").join("placed.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("Name", DataType::Utf8, true),
            Field::new("Year", DataType::Int64, true),
            Field::new("Package", DataType::Float64, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec![Some("Asha"), None, Some("Ravi")])),
            Arc::new(Int64Array::from(vec![Some(2021), Some(2022), None])),
            Arc::new(Float64Array::from(vec![Some(6.5), None, Some(f64::NAN)])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
        let mut writer = ArrowWriter::try_new(std::fs::File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.headers, vec!["Name", "Year", "Package"]);
        assert_eq!(
            table.rows,
            vec![
                vec![CellValue::from("Asha"), CellValue::Integer(2021), CellValue::Float(6.5)],
                vec![CellValue::Null, CellValue::Integer(2022), CellValue::Null],
                vec![CellValue::from("Ravi"), CellValue::Null, CellValue::Null],
            ]
        );
    }

    #[test]
    fn workbook_first_sheet_is_read() {
        use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

        let path = scratch_dir("xlsx_typed").join("placed.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in [" Name", "Year", "Package ", "Joined"].into_iter().enumerate() {
            sheet.write_string(0, col as u16, header).unwrap();
        }
        sheet.write_string(1, 0, "Asha").unwrap();
        sheet.write_number(1, 1, 2020.0).unwrap();
        sheet.write_number(1, 2, 10.0).unwrap();
        let joined = ExcelDateTime::from_ymd(2021, 6, 1).unwrap();
        let date = Format::new().set_num_format("yyyy-mm-dd");
        sheet.write_datetime_with_format(1, 3, &joined, &date).unwrap();
        sheet.write_string(2, 0, "Ravi").unwrap();
        sheet.write_string(2, 2, "Awaited").unwrap();
        workbook.save(&path).unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("Name"), Some(0));
        assert_eq!(table.column("Package"), Some(2));
        assert_eq!(table.rows[0][1], CellValue::Integer(2020));
        assert_eq!(table.rows[0][1].to_string(), "2020");
        assert_eq!(table.rows[0][2].as_f64(), Some(10.0));
        // Dates arrive as their serial day number.
        assert_eq!(table.rows[0][3].as_f64(), Some(44348.0));
        assert_eq!(table.rows[1][1], CellValue::Null);
        assert_eq!(table.rows[1][2], CellValue::from("Awaited"));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        let path = scratch_dir("json_bad").join("bad.json");
        std::fs::write(&path, r#"{"Branch": "CSE"}"#).unwrap();
        let err = load_table(&path).unwrap_err();
        assert!(format!("{err:#}").contains("top-level JSON array"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_table(Path::new("placements.txt")).unwrap_err();
        assert!(err.to_string().contains(".txt"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_table(Path::new("/nonexistent/all_placed_data.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("all_placed_data.csv"));
    }
}
