// Dashboard domain model - the render projection of a view state
use super::chart::{ChartData, SeriesColor, SeriesData};
use super::view_state::ViewState;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt::Display;

pub const HISTORY_PLACEHOLDER: &str = "Loading data...";
pub const PREDICTION_PLACEHOLDER: &str = "Loading prediction data...";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ChartPanel {
    Loading { placeholder: String },
    Ready { chart: ChartData },
}

impl ChartPanel {
    #[cfg(test)]
    pub fn chart(&self) -> Option<&ChartData> {
        match self {
            ChartPanel::Ready { chart } => Some(chart),
            ChartPanel::Loading { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: String,
    pub section_title: String,
    pub historical: ChartPanel,
    pub predicted: ChartPanel,
}

impl Dashboard {
    /// Projects `state` into the two chart panels. Labels are rendered as
    /// time of day in `tz`.
    pub fn project<Tz>(title: &str, section_title: &str, state: &ViewState, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let (historical, predicted) = if state.loading {
            (
                ChartPanel::Loading {
                    placeholder: HISTORY_PLACEHOLDER.to_string(),
                },
                ChartPanel::Loading {
                    placeholder: PREDICTION_PLACEHOLDER.to_string(),
                },
            )
        } else {
            (
                ChartPanel::Ready {
                    chart: historical_chart(state, tz),
                },
                ChartPanel::Ready {
                    chart: predicted_chart(state, tz),
                },
            )
        };

        Self {
            title: title.to_string(),
            section_title: section_title.to_string(),
            historical,
            predicted,
        }
    }
}

pub fn time_of_day<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.with_timezone(tz).format("%-I:%M:%S %p").to_string()
}

fn historical_chart<Tz>(state: &ViewState, tz: &Tz) -> ChartData
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let labels = state.history.iter().map(|r| time_of_day(&r.timestamp, tz)).collect();
    let cpu = state.history.iter().map(|r| Some(r.cpu_temp)).collect();
    let battery = state.history.iter().map(|r| Some(r.battery_temp)).collect();

    ChartData::new(
        "historical",
        None,
        labels,
        vec![
            SeriesData::new("CPU Temperature (°C)", cpu, SeriesColor::CPU),
            SeriesData::new("Battery Temperature (°C)", battery, SeriesColor::BATTERY),
        ],
    )
}

fn predicted_chart<Tz>(state: &ViewState, tz: &Tz) -> ChartData
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let labels = state
        .history
        .iter()
        .map(|r| time_of_day(&r.timestamp, tz))
        .chain(state.predictions.iter().map(|p| time_of_day(&p.timestamp, tz)))
        .collect();

    // History slots stay empty so the forecast starts where history ends
    let gap = state.history.len();
    let padded = |values: Vec<Option<f64>>| -> Vec<Option<f64>> {
        std::iter::repeat_n(None, gap).chain(values).collect()
    };
    let cpu = padded(state.predictions.iter().map(|p| Some(p.predicted_cpu_temp)).collect());
    let battery = padded(state.predictions.iter().map(|p| Some(p.predicted_battery_temp)).collect());

    ChartData::new(
        "predicted",
        Some("Predicted Temperatures"),
        labels,
        vec![
            SeriesData::new("Predicted CPU Temperature (°C)", cpu, SeriesColor::PREDICTED_CPU).dashed(),
            SeriesData::new("Predicted Battery Temperature (°C)", battery, SeriesColor::PREDICTED_BATTERY)
                .dashed(),
        ],
    )
    .with_margin_top(50)
}
