use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use social_pulse::pipeline::{selection_summary, DashboardReport};
use social_pulse::DataError;

use crate::state::{AppState, Tab};
use crate::ui::{format, plot};

const BLUE: Color32 = Color32::from_rgb(0x39, 0x6a, 0xfc);
const GREEN: Color32 = Color32::from_rgb(0x11, 0x99, 0x8e);
const ORANGE: Color32 = Color32::from_rgb(0xf7, 0x97, 0x1e);
const RED: Color32 = Color32::from_rgb(0xff, 0x41, 0x6c);
const PURPLE: Color32 = Color32::from_rgb(0x66, 0x7e, 0xea);

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render KPIs, insight and the tabbed charts; or the waiting screen when no
/// dataset is available.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(report) = state.report.clone() else {
        awaiting_data(ui, state);
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading(RichText::new("Social Media Analytics").size(28.0).strong());
                ui.label("Engagement • Content • Campaign ROI • Revenue • Best Posting Time");
            });
            ui.add_space(8.0);

            ui.group(|ui: &mut Ui| {
                ui.label(RichText::new("Current selection").strong());
                ui.label(selection_summary(&state.selection));
            });
            ui.add_space(8.0);

            kpi_row(ui, &report, &state.config.currency);
            ui.add_space(8.0);

            match &report.best_content_type {
                Some(best) => {
                    ui.label(
                        RichText::new(format!("Best performing content type: {best}"))
                            .color(GREEN)
                            .strong(),
                    );
                }
                None => {
                    ui.label(RichText::new("No posts match the current selection.").italics());
                }
            }
            ui.separator();

            ui.horizontal(|ui: &mut Ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut state.tab, tab, tab.title());
                }
            });
            ui.separator();

            match state.tab {
                Tab::Engagement => {
                    plot::platform_engagement_chart(
                        ui,
                        &report.platform_engagement,
                        state.color_map.as_ref(),
                    );
                }
                Tab::Content => {
                    plot::content_table(ui, &report.content_performance);
                    ui.add_space(8.0);
                    plot::content_engagement_chart(ui, &report.content_performance);
                }
                Tab::CampaignRoi => {
                    if report.campaigns.is_empty() {
                        ui.label("No campaign data in the current selection.");
                    } else {
                        plot::campaign_table(ui, &report.campaigns, &state.config.currency);
                    }
                }
                Tab::BestTime => plot::hourly_chart(ui, &report.hourly),
                Tab::Trends => plot::trend_chart(ui, &report.trend),
            }
        });
}

fn awaiting_data(ui: &mut Ui, state: &AppState) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            if let Some(err) = &state.load_error {
                ui.heading("Could not load data");
                ui.label(RichText::new(err).color(RED));
            } else {
                let notice = DataError::MissingDataSource {
                    fallback: state.config.fallback_path.display().to_string(),
                };
                ui.heading("Awaiting data");
                ui.label(notice.to_string());
            }
            ui.label("(File → Open…)");
        });
    });
}

fn kpi_row(ui: &mut Ui, report: &DashboardReport, currency: &str) {
    let s = &report.summary;
    let cards = [
        ("Total Engagement", format::integer(s.total_engagement), BLUE),
        ("Avg Engagement Rate", format::percent(s.avg_engagement_rate), GREEN),
        ("Ad Spend", format::money(currency, s.total_ad_spend), ORANGE),
        ("Revenue Generated", format::money(currency, s.total_revenue), RED),
        ("Avg ROI", format::decimal(s.avg_roi), PURPLE),
    ];

    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (col, (title, value, fill)) in cols.iter_mut().zip(cards) {
            kpi_card(col, title, &value, fill);
        }
    });
}

fn kpi_card(ui: &mut Ui, title: &str, value: &str, fill: Color32) {
    egui::Frame::default()
        .fill(fill)
        .corner_radius(12.0)
        .inner_margin(12.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(title).color(Color32::WHITE));
                ui.label(
                    RichText::new(value)
                        .color(Color32::WHITE)
                        .size(22.0)
                        .strong(),
                );
            });
        });
}
