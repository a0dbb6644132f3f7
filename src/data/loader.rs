use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use arrow::array::{Array, ArrayRef};
use arrow::util::display::array_value_to_string;
use bytes::Bytes;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::{DataError, Result};
use super::model::{columns, Dataset, Record};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// File contents plus the name used to pick a parser.
///
/// Uploads arrive this way directly; the fallback path is read into one by
/// [`resolve_source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping its file name for format dispatch.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::new(file_name(path), bytes))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Pick the upload if there is one, otherwise read the fallback path.
///
/// A fallback file that does not exist is the normal "no data yet" state and
/// yields `Ok(None)`.
pub fn resolve_source(upload: Option<&SourceFile>, fallback: &Path) -> Result<Option<SourceFile>> {
    if let Some(up) = upload {
        return Ok(Some(up.clone()));
    }
    match SourceFile::from_path(fallback) {
        Ok(src) => Ok(Some(src)),
        Err(DataError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No upload and no fallback file at {}", fallback.display());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load from the upload, or the fallback path when there is no upload.
/// Returns `Ok(None)` when neither exists.
pub fn load_source(upload: Option<&SourceFile>, fallback: &Path) -> Result<Option<Dataset>> {
    match resolve_source(upload, fallback)? {
        Some(src) => load_bytes(&src.name, &src.bytes).map(Some),
        None => Ok(None),
    }
}

/// Load a dataset from a file on disk. Dispatch by extension.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let src = SourceFile::from_path(path)?;
    load_bytes(&src.name, &src.bytes)
}

/// Parse in-memory file contents; `name` only selects the format.
///
/// Supported formats:
/// * `.csv`                          – comma-delimited text with a header row
/// * `.tsv` / `.tab`                 – tab-delimited text
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first sheet, first row is the header
/// * `.parquet` / `.pq`              – one column per field
///
/// The returned records have no revenue yet; see [`super::derive`].
pub fn load_bytes(name: &str, bytes: &[u8]) -> Result<Dataset> {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    log::debug!("Parsing '{name}' ({} bytes) as .{ext}", bytes.len());

    let table = match ext.as_str() {
        "csv" => read_delimited(bytes, b',')?,
        "tsv" | "tab" => read_delimited(bytes, b'\t')?,
        "xlsx" | "xlsm" | "xls" | "ods" => read_spreadsheet(bytes)?,
        "parquet" | "pq" => read_parquet(bytes)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string())),
    };

    let dataset = parse_table(table)?;
    log::info!(
        "Loaded {} records from '{name}' with columns {:?}",
        dataset.len(),
        dataset.columns
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw readers: every format is reduced to text cells
// ---------------------------------------------------------------------------

struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn read_delimited(bytes: &[u8], delimiter: u8) -> Result<RawTable> {
    // Short rows are padded with missing cells rather than rejected.
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable { headers, rows })
}

fn read_spreadsheet(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DataError::EmptySheet)??;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or(DataError::EmptySheet)?
        .iter()
        .map(|c| spreadsheet_cell_text(c).trim().to_string())
        .collect();

    let rows = rows
        .map(|r| r.iter().map(spreadsheet_cell_text).collect())
        .collect();
    Ok(RawTable { headers, rows })
}

fn spreadsheet_cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
    }
}

fn read_parquet(bytes: &[u8]) -> Result<RawTable> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::copy_from_slice(bytes))?;
    let headers = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().trim().to_string())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| arrow_cell_text(col, row))
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }
    Ok(RawTable { headers, rows })
}

fn arrow_cell_text(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    Ok(array_value_to_string(col.as_ref(), row)?)
}

// ---------------------------------------------------------------------------
// Typed parsing
// ---------------------------------------------------------------------------

fn parse_table(table: RawTable) -> Result<Dataset> {
    let index: HashMap<&str, usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    if let Some(missing) = columns::REQUIRED.iter().find(|c| !index.contains_key(*c)) {
        return Err(DataError::MissingColumn(missing.to_string()));
    }

    let extra_cols: Vec<(usize, &String)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !columns::KNOWN.contains(&h.as_str()))
        .collect();

    let mut records = Vec::with_capacity(table.rows.len());
    for (i, cells) in table.rows.iter().enumerate() {
        let row = Row {
            number: i + 1,
            cells,
            index: &index,
        };
        // Spreadsheets often trail fully blank rows.
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let mut rec = row.parse()?;
        for (col_idx, name) in &extra_cols {
            let value = cells.get(*col_idx).cloned().unwrap_or_default();
            rec.extras.insert((*name).clone(), value);
        }
        records.push(rec);
    }

    Ok(Dataset::from_records(records, table.headers))
}

/// One source row with header lookup; `number` is 1-based over data rows.
struct Row<'a> {
    number: usize,
    cells: &'a [String],
    index: &'a HashMap<&'a str, usize>,
}

impl Row<'_> {
    fn text(&self, column: &str) -> &str {
        self.index
            .get(column)
            .and_then(|&i| self.cells.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    fn category(&self, column: &str) -> Option<String> {
        let t = self.text(column);
        (!t.is_empty()).then(|| t.to_string())
    }

    fn number(&self, column: &str) -> Result<f64> {
        let t = self.text(column);
        if t.is_empty() || t.eq_ignore_ascii_case("nan") {
            return Ok(f64::NAN);
        }
        t.parse::<f64>().map_err(|_| self.invalid_number(column, t))
    }

    /// Whole number in `range`, or `None` for an empty cell.
    fn integer(&self, column: &str, range: std::ops::RangeInclusive<i64>) -> Result<Option<i64>> {
        let v = self.number(column)?;
        if v.is_nan() {
            return Ok(None);
        }
        if v.fract() != 0.0 || !range.contains(&(v as i64)) {
            return Err(self.invalid_number(column, self.text(column)));
        }
        Ok(Some(v as i64))
    }

    fn invalid_number(&self, column: &str, value: &str) -> DataError {
        DataError::InvalidNumber {
            row: self.number,
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    fn parse(&self) -> Result<Record> {
        let raw_date = self.text(columns::DATE);
        let date = parse_date(raw_date).ok_or_else(|| DataError::InvalidDate {
            row: self.number,
            value: raw_date.to_string(),
        })?;

        let year = self
            .integer(columns::YEAR, i32::MIN as i64..=i32::MAX as i64)?
            .map(|y| y as i32)
            .unwrap_or_else(|| date.year());
        let month = self
            .integer(columns::MONTH, 1..=12)?
            .map(|m| m as u32)
            .unwrap_or_else(|| date.month());
        let post_hour = self.integer(columns::POST_HOUR, 0..=23)?.map(|h| h as u32);

        Ok(Record {
            platform: self.category(columns::PLATFORM),
            content_type: self.category(columns::CONTENT_TYPE),
            date,
            year,
            month,
            post_hour,
            engagement: self.number(columns::ENGAGEMENT)?,
            engagement_rate: self.number(columns::ENGAGEMENT_RATE)?,
            likes: self.number(columns::LIKES)?,
            comments: self.number(columns::COMMENTS)?,
            shares: self.number(columns::SHARES)?,
            ad_spend: self.number(columns::AD_SPEND)?,
            roi: self.number(columns::ROI)?,
            campaign_name: self.category(columns::CAMPAIGN_NAME),
            revenue: f64::NAN,
            extras: Default::default(),
        })
    }
}

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse the date column. Time-of-day, when present, is dropped.
/// Slash dates are month-first.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "date,platform,content_type,year,month,post_hour,engagement,engagement_rate,likes,comments,shares,ad_spend,roi,campaign_name";

    fn csv_bytes(rows: &[&str]) -> Vec<u8> {
        let mut s = String::from(HEADER);
        for r in rows {
            s.push('\n');
            s.push_str(r);
        }
        s.into_bytes()
    }

    #[test]
    fn parses_csv_rows_into_records() {
        let bytes = csv_bytes(&[
            "2023-03-14,Instagram,reel,2023,3,18,1200,4.5,900,200,100,100,0.5,Spring Launch",
            "2024-01-02,Facebook,image,2024,1,,300,1.2,250,30,20,200,0,",
        ]);
        let ds = load_bytes("posts.csv", &bytes).unwrap();

        assert_eq!(ds.len(), 2);
        let first = &ds.records[0];
        assert_eq!(first.platform.as_deref(), Some("Instagram"));
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2023, 3, 14).unwrap());
        assert_eq!(first.post_hour, Some(18));
        assert_eq!(first.campaign_name.as_deref(), Some("Spring Launch"));
        assert!(first.revenue.is_nan());

        let second = &ds.records[1];
        assert_eq!(second.post_hour, None);
        assert_eq!(second.campaign_name, None);
        assert_eq!(second.roi, 0.0);
        assert_eq!(ds.years.iter().copied().collect::<Vec<_>>(), vec![2023, 2024]);
    }

    #[test]
    fn year_and_month_fall_back_to_the_date() {
        let bytes = b"date,platform,content_type,post_hour,engagement,engagement_rate,likes,comments,shares,ad_spend,roi\n\
2022-11-05 09:30:00,TikTok,video,9,10,1,1,1,1,1,1\n";
        let ds = load_bytes("posts.csv", bytes).unwrap();
        assert_eq!(ds.records[0].year, 2022);
        assert_eq!(ds.records[0].month, 11);
        assert!(!ds.has_column("campaign_name"));
        assert_eq!(ds.records[0].campaign_name, None);
    }

    #[test]
    fn missing_required_column_is_a_format_error() {
        let bytes = b"date,platform,content_type\n2023-01-01,A,x\n";
        let err = load_bytes("posts.csv", bytes).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(ref c) if c == "post_hour"));
        assert!(err.is_format_error());
    }

    #[test]
    fn unparseable_date_names_the_row() {
        let bytes = csv_bytes(&[
            "2023-01-01,A,x,2023,1,1,1,1,1,1,1,1,1,",
            "yesterday,A,x,2023,1,1,1,1,1,1,1,1,1,",
        ]);
        let err = load_bytes("posts.csv", &bytes).unwrap_err();
        assert!(
            matches!(err, DataError::InvalidDate { row: 2, ref value } if value == "yesterday"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn non_numeric_metric_is_rejected_but_blank_is_nan() {
        let bytes = csv_bytes(&["2023-01-01,A,x,2023,1,1,lots,1,1,1,1,1,1,"]);
        let err = load_bytes("posts.csv", &bytes).unwrap_err();
        assert!(matches!(err, DataError::InvalidNumber { ref column, .. } if column == "engagement"));

        let bytes = csv_bytes(&["2023-01-01,A,x,2023,1,1,,1,1,1,1,,NaN,"]);
        let ds = load_bytes("posts.csv", &bytes).unwrap();
        assert!(ds.records[0].engagement.is_nan());
        assert!(ds.records[0].ad_spend.is_nan());
        assert!(ds.records[0].roi.is_nan());
    }

    #[test]
    fn short_rows_fill_trailing_cells_with_nan() {
        let bytes = csv_bytes(&[
            "2023-01-01,A,x,2023,1,1,1,1,1,1,1",
            "2023-01-02,B,y,2023,1,2,5,1,1,1,1,100,0.5,Launch",
        ]);
        let mut ds = load_bytes("posts.csv", &bytes).unwrap();
        crate::data::derive::derive_revenue(&mut ds);

        let short = &ds.records[0];
        assert!(short.ad_spend.is_nan());
        assert!(short.roi.is_nan());
        assert!(short.revenue.is_nan());
        assert_eq!(short.campaign_name, None);
        assert_eq!(ds.records[1].revenue, 150.0);
    }

    #[test]
    fn post_hour_out_of_range_is_rejected() {
        let bytes = csv_bytes(&["2023-01-01,A,x,2023,1,24,1,1,1,1,1,1,1,"]);
        let err = load_bytes("posts.csv", &bytes).unwrap_err();
        assert!(matches!(err, DataError::InvalidNumber { ref column, .. } if column == "post_hour"));
    }

    #[test]
    fn unknown_columns_are_kept_as_extras() {
        let bytes = b"post_id,date,platform,content_type,post_hour,engagement,engagement_rate,likes,comments,shares,ad_spend,roi\n\
p-1,2023-01-01,A,x,1,1,1,1,1,1,1,1\n";
        let ds = load_bytes("posts.csv", bytes).unwrap();
        assert_eq!(ds.columns[0], "post_id");
        assert_eq!(ds.records[0].extras.get("post_id").map(String::as_str), Some("p-1"));
    }

    #[test]
    fn tab_delimited_input_is_supported() {
        let text = String::from_utf8(csv_bytes(&["2023-01-01,A,x,2023,1,1,1,1,1,1,1,1,1,"]))
            .unwrap()
            .replace(',', "\t");
        let ds = load_bytes("posts.tsv", text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = load_bytes("posts.txt", b"").unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(ref e) if e == "txt"));
    }

    #[test]
    fn parse_date_accepts_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2023, 7, 4).unwrap();
        for s in [
            "2023-07-04",
            "2023/07/04",
            "07/04/2023",
            "2023-07-04 13:45:00",
            "2023-07-04T13:45:00.250",
            "2023-07-04T13:45:00Z",
            " 2023-07-04 ",
        ] {
            assert_eq!(parse_date(s), Some(expected), "failed on {s:?}");
        }
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2023-13-01"), None);
    }

    #[test]
    fn missing_fallback_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_source(None, &dir.path().join("absent.csv")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn upload_takes_precedence_over_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("fallback.csv");
        std::fs::write(&fallback, csv_bytes(&["2023-01-01,Fallback,x,2023,1,1,1,1,1,1,1,1,1,"])).unwrap();

        let upload = SourceFile::new(
            "upload.csv",
            csv_bytes(&["2023-01-01,Upload,x,2023,1,1,1,1,1,1,1,1,1,"]),
        );

        let from_upload = load_source(Some(&upload), &fallback).unwrap().unwrap();
        assert!(from_upload.platforms.contains("Upload"));

        let from_fallback = load_source(None, &fallback).unwrap().unwrap();
        assert!(from_fallback.platforms.contains("Fallback"));
    }
}
