use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use social_pulse::data::loader::{load_bytes, load_file};
use social_pulse::DataError;

const HEADERS: [&str; 12] = [
    "date",
    "platform",
    "content_type",
    "post_hour",
    "engagement",
    "engagement_rate",
    "likes",
    "comments",
    "shares",
    "ad_spend",
    "roi",
    "campaign_name",
];

fn workbook_bytes() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, h) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *h).unwrap();
    }

    // Row 1: date typed as text.
    sheet.write_string(1, 0, "2023-03-14").unwrap();
    sheet.write_string(1, 1, "Instagram").unwrap();
    sheet.write_string(1, 2, "reel").unwrap();
    for (col, v) in [18.0, 1200.0, 4.5, 900.0, 200.0, 100.0, 100.0, 0.5].iter().enumerate() {
        sheet.write_number(1, col as u16 + 3, *v).unwrap();
    }
    sheet.write_string(1, 11, "Spring Launch").unwrap();

    // Row 2: native date cell, no campaign.
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let when = ExcelDateTime::from_ymd(2024, 1, 2).unwrap();
    sheet.write_datetime_with_format(2, 0, &when, &date_format).unwrap();
    sheet.write_string(2, 1, "Facebook").unwrap();
    sheet.write_string(2, 2, "image").unwrap();
    for (col, v) in [9.0, 300.0, 1.2, 250.0, 30.0, 20.0, 200.0, 0.0].iter().enumerate() {
        sheet.write_number(2, col as u16 + 3, *v).unwrap();
    }

    workbook.save_to_buffer().unwrap()
}

#[test]
fn xlsx_first_sheet_is_loaded() {
    let ds = load_bytes("posts.xlsx", &workbook_bytes()).unwrap();

    assert_eq!(ds.len(), 2);
    assert_eq!(ds.columns, HEADERS.map(String::from).to_vec());

    let first = &ds.records[0];
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2023, 3, 14).unwrap());
    assert_eq!(first.post_hour, Some(18));
    assert_eq!(first.engagement_rate, 4.5);
    assert_eq!(first.campaign_name.as_deref(), Some("Spring Launch"));

    let second = &ds.records[1];
    assert_eq!(second.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(second.year, 2024);
    assert_eq!(second.campaign_name, None);
}

#[test]
fn xlsx_missing_required_column_is_reported() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "date").unwrap();
    sheet.write_string(1, 0, "2023-01-01").unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let err = load_bytes("posts.xlsx", &bytes).unwrap_err();
    assert!(matches!(err, DataError::MissingColumn(ref c) if c == "platform"));
}

fn parquet_bytes() -> Vec<u8> {
    let mut fields: Vec<Field> = vec![
        Field::new("date", DataType::Utf8, false),
        Field::new("platform", DataType::Utf8, false),
        Field::new("content_type", DataType::Utf8, false),
        Field::new("post_hour", DataType::Int64, true),
    ];
    for name in &HEADERS[4..11] {
        fields.push(Field::new(*name, DataType::Float64, true));
    }
    fields.push(Field::new("campaign_name", DataType::Utf8, true));
    let schema = Arc::new(Schema::new(fields));

    let floats = |a: f64, b: Option<f64>| -> ArrayRef { Arc::new(Float64Array::from(vec![Some(a), b])) };
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["2023-06-01", "2023-07-04 08:00:00"])),
        Arc::new(StringArray::from(vec!["TikTok", "LinkedIn"])),
        Arc::new(StringArray::from(vec!["video", "text"])),
        Arc::new(Int64Array::from(vec![Some(20), None])),
        floats(1500.0, Some(80.0)),
        floats(7.5, Some(0.9)),
        floats(1000.0, Some(60.0)),
        floats(300.0, Some(10.0)),
        floats(200.0, Some(10.0)),
        floats(400.0, None),
        floats(1.25, Some(0.1)),
        Arc::new(StringArray::from(vec![Some("Summer Sale"), None])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    buf
}

#[test]
fn parquet_file_is_loaded_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("posts.parquet");
    std::fs::write(&path, parquet_bytes()).unwrap();

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.len(), 2);

    let first = &ds.records[0];
    assert_eq!(first.platform.as_deref(), Some("TikTok"));
    assert_eq!(first.post_hour, Some(20));
    assert_eq!(first.roi, 1.25);
    assert_eq!(first.campaign_name.as_deref(), Some("Summer Sale"));

    let second = &ds.records[1];
    assert_eq!(second.date, NaiveDate::from_ymd_opt(2023, 7, 4).unwrap());
    assert_eq!(second.post_hour, None);
    assert!(second.ad_spend.is_nan());
    assert_eq!(second.campaign_name, None);
}
