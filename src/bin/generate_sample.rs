use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Days, NaiveDate};
use parquet::arrow::ArrowWriter;
use social_pulse::config::DEFAULT_DATA_PATH;

const PLATFORMS: [(&str, f64); 5] = [
    ("Instagram", 1.3),
    ("TikTok", 1.5),
    ("Facebook", 0.9),
    ("LinkedIn", 0.7),
    ("Twitter", 0.8),
];

const CONTENT_TYPES: [(&str, f64); 5] = [
    ("reel", 1.6),
    ("video", 1.3),
    ("carousel", 1.1),
    ("image", 1.0),
    ("text", 0.6),
];

const CAMPAIGNS: [&str; 4] = ["Spring Launch", "Summer Sale", "Festive Push", "Brand Awareness"];

const POSTS: usize = 800;

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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Evening posts do best, the small hours worst.
fn hour_factor(hour: u32) -> f64 {
    let distance = (hour as f64 - 19.0).abs().min(24.0 - (hour as f64 - 19.0).abs());
    1.4 - distance / 12.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Default)]
struct Columns {
    date: Vec<String>,
    platform: Vec<String>,
    content_type: Vec<String>,
    year: Vec<i64>,
    month: Vec<i64>,
    post_hour: Vec<i64>,
    engagement: Vec<f64>,
    engagement_rate: Vec<f64>,
    likes: Vec<f64>,
    comments: Vec<f64>,
    shares: Vec<f64>,
    ad_spend: Vec<f64>,
    roi: Vec<f64>,
    campaign_name: Vec<Option<String>>,
}

fn generate(rng: &mut SimpleRng) -> Result<Columns> {
    let mut cols = Columns::default();
    for _ in 0..POSTS {
        let year = if rng.next_f64() < 0.5 { 2023 } else { 2024 };
        let start = NaiveDate::from_ymd_opt(year, 1, 1).context("invalid start date")?;
        let date = start
            .checked_add_days(Days::new(rng.next_u64() % 365))
            .context("date out of range")?;
        let hour = (rng.next_u64() % 24) as u32;

        let &(platform, p_factor) = rng.pick(&PLATFORMS);
        let &(content, c_factor) = rng.pick(&CONTENT_TYPES);

        let engagement = (rng.range(200.0, 1200.0) * p_factor * c_factor * hour_factor(hour)).round();
        let impressions = rng.range(5_000.0, 40_000.0);
        let likes = (engagement * rng.range(0.6, 0.8)).round();
        let comments = (engagement * rng.range(0.08, 0.15)).round();
        let shares = engagement - likes - comments;

        let campaign = (rng.next_f64() < 0.6).then(|| rng.pick(&CAMPAIGNS).to_string());
        let (ad_spend, roi) = match campaign {
            Some(_) => (
                round2(rng.range(500.0, 5_000.0)),
                round2(rng.range(-0.2, 2.5) * c_factor / 1.2),
            ),
            None => (0.0, 0.0),
        };

        cols.date.push(date.format("%Y-%m-%d").to_string());
        cols.platform.push(platform.to_string());
        cols.content_type.push(content.to_string());
        cols.year.push(i64::from(date.year()));
        cols.month.push(i64::from(date.month()));
        cols.post_hour.push(i64::from(hour));
        cols.engagement.push(engagement);
        cols.engagement_rate.push(round2(engagement / impressions * 100.0));
        cols.likes.push(likes);
        cols.comments.push(comments);
        cols.shares.push(shares.max(0.0));
        cols.ad_spend.push(ad_spend);
        cols.roi.push(roi);
        cols.campaign_name.push(campaign);
    }
    Ok(cols)
}

fn write_csv(cols: &Columns, path: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    wtr.write_record([
        "date",
        "platform",
        "content_type",
        "year",
        "month",
        "post_hour",
        "engagement",
        "engagement_rate",
        "likes",
        "comments",
        "shares",
        "ad_spend",
        "roi",
        "campaign_name",
    ])?;
    for i in 0..cols.date.len() {
        wtr.write_record([
            cols.date[i].clone(),
            cols.platform[i].clone(),
            cols.content_type[i].clone(),
            cols.year[i].to_string(),
            cols.month[i].to_string(),
            cols.post_hour[i].to_string(),
            cols.engagement[i].to_string(),
            cols.engagement_rate[i].to_string(),
            cols.likes[i].to_string(),
            cols.comments[i].to_string(),
            cols.shares[i].to_string(),
            cols.ad_spend[i].to_string(),
            cols.roi[i].to_string(),
            cols.campaign_name[i].clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_parquet(cols: &Columns, path: &str) -> Result<()> {
    let utf8 = |name: &str, nullable: bool| Field::new(name, DataType::Utf8, nullable);
    let int = |name: &str| Field::new(name, DataType::Int64, false);
    let float = |name: &str| Field::new(name, DataType::Float64, false);

    let schema = Arc::new(Schema::new(vec![
        utf8("date", false),
        utf8("platform", false),
        utf8("content_type", false),
        int("year"),
        int("month"),
        int("post_hour"),
        float("engagement"),
        float("engagement_rate"),
        float("likes"),
        float("comments"),
        float("shares"),
        float("ad_spend"),
        float("roi"),
        utf8("campaign_name", true),
    ]));

    let strings = |v: &[String]| -> ArrayRef {
        Arc::new(StringArray::from(v.iter().map(String::as_str).collect::<Vec<_>>()))
    };
    let ints = |v: &[i64]| -> ArrayRef { Arc::new(Int64Array::from(v.to_vec())) };
    let floats = |v: &[f64]| -> ArrayRef { Arc::new(Float64Array::from(v.to_vec())) };

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            strings(&cols.date),
            strings(&cols.platform),
            strings(&cols.content_type),
            ints(&cols.year),
            ints(&cols.month),
            ints(&cols.post_hour),
            floats(&cols.engagement),
            floats(&cols.engagement_rate),
            floats(&cols.likes),
            floats(&cols.comments),
            floats(&cols.shares),
            floats(&cols.ad_spend),
            floats(&cols.roi),
            Arc::new(StringArray::from(cols.campaign_name.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let cols = generate(&mut rng)?;

    write_csv(&cols, DEFAULT_DATA_PATH)?;
    let parquet_path = "sample_data.parquet";
    write_parquet(&cols, parquet_path)?;

    println!(
        "Wrote {} posts to {DEFAULT_DATA_PATH} and {parquet_path}",
        cols.date.len()
    );
    Ok(())
}
