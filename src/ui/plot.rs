use eframe::egui::{Color32, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};
use social_pulse::data::aggregate::{CampaignSummary, ContentPerformance, GroupMean, TrendPoint};

use crate::color::ColorMap;
use crate::ui::format;

const CHART_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// One bar per platform, coloured like the filter labels.
pub fn platform_engagement_chart(
    ui: &mut Ui,
    series: &[GroupMean<String>],
    colors: Option<&ColorMap>,
) {
    Plot::new("platform_engagement")
        .legend(Legend::default())
        .x_axis_label("Platform")
        .y_axis_label("Avg engagement rate (%)")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, g) in series.iter().enumerate() {
                let color = colors
                    .map(|cm| cm.color_for(&g.key))
                    .unwrap_or(Color32::LIGHT_BLUE);
                // One chart per bar so every platform gets a legend entry.
                let bar = Bar::new(i as f64, nan_as_zero(g.mean))
                    .name(&g.key)
                    .fill(color)
                    .width(0.6);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(&g.key).color(color));
            }
        });
}

/// Mean engagement per content type.
pub fn content_engagement_chart(ui: &mut Ui, rows: &[ContentPerformance]) {
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, nan_as_zero(r.engagement))
                .name(&r.content_type)
                .width(0.6)
        })
        .collect();

    Plot::new("content_engagement")
        .x_axis_label("Content type")
        .y_axis_label("Avg engagement")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Avg engagement"));
        });
}

/// Mean engagement by posting hour (0–23).
pub fn hourly_chart(ui: &mut Ui, series: &[GroupMean<u32>]) {
    let points: PlotPoints = series
        .iter()
        .filter(|g| !g.mean.is_nan())
        .map(|g| [g.key as f64, g.mean])
        .collect();

    Plot::new("hourly_engagement")
        .x_axis_label("Hour of day")
        .y_axis_label("Avg engagement")
        .include_x(0.0)
        .include_x(23.0)
        .height(CHART_HEIGHT)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name("Avg engagement").width(2.0));
        });
}

/// Monthly mean engagement; x is the fractional year so the axis reads as
/// calendar time.
pub fn trend_chart(ui: &mut Ui, series: &[TrendPoint]) {
    let coords: Vec<[f64; 2]> = series
        .iter()
        .filter(|t| !t.engagement.is_nan())
        .map(|t| [t.year as f64 + (t.month as f64 - 1.0) / 12.0, t.engagement])
        .collect();

    Plot::new("monthly_trend")
        .x_axis_label("Year")
        .y_axis_label("Avg engagement")
        .height(CHART_HEIGHT)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .name("Avg engagement")
                    .width(2.0),
            );
            plot_ui.points(Points::new(PlotPoints::from(coords)).radius(3.0));
        });
}

fn nan_as_zero(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

pub fn content_table(ui: &mut Ui, rows: &[ContentPerformance]) {
    TableBuilder::new(ui)
        .id_salt("content_table")
        .striped(true)
        .column(Column::auto().at_least(120.0))
        .columns(Column::auto().at_least(90.0), 4)
        .header(20.0, |mut header| {
            for title in ["Content type", "Likes", "Comments", "Shares", "Engagement"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for r in rows {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&r.content_type);
                    });
                    for v in [r.likes, r.comments, r.shares, r.engagement] {
                        row.col(|ui| {
                            ui.label(format::decimal(v));
                        });
                    }
                });
            }
        });
}

pub fn campaign_table(ui: &mut Ui, rows: &[CampaignSummary], currency: &str) {
    TableBuilder::new(ui)
        .id_salt("campaign_table")
        .striped(true)
        .column(Column::auto().at_least(160.0))
        .columns(Column::auto().at_least(110.0), 3)
        .header(20.0, |mut header| {
            for title in ["Campaign", "Avg ad spend", "Avg revenue", "Avg ROI"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for r in rows {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&r.campaign_name);
                    });
                    row.col(|ui| {
                        ui.label(format!("{currency} {}", format::decimal(r.ad_spend)));
                    });
                    row.col(|ui| {
                        ui.label(format!("{currency} {}", format::decimal(r.revenue)));
                    });
                    row.col(|ui| {
                        ui.label(format::decimal(r.roi));
                    });
                });
            }
        });
}
