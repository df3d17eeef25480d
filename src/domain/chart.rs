// Chart domain models, shaped after the Chart.js line chart config
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesData {
    pub label: String,
    /// `None` is a gap (rendered as `null`).
    pub data: Vec<Option<f64>>,
    pub border_color: String,
    pub background_color: String,
    pub fill: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<[u32; 2]>,
}

impl SeriesData {
    pub fn new(label: &str, data: Vec<Option<f64>>, color: SeriesColor) -> Self {
        Self {
            label: label.to_string(),
            data,
            border_color: color.border(),
            background_color: color.background(),
            fill: true,
            border_dash: None,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.border_dash = Some([5, 5]);
        self
    }
}

/// RGB triple; borders are opaque, fills are 20% alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesColor(pub u8, pub u8, pub u8);

impl SeriesColor {
    pub const CPU: SeriesColor = SeriesColor(255, 99, 132);
    pub const BATTERY: SeriesColor = SeriesColor(54, 162, 235);
    pub const PREDICTED_CPU: SeriesColor = SeriesColor(255, 159, 64);
    pub const PREDICTED_BATTERY: SeriesColor = SeriesColor(75, 192, 192);

    pub fn border(&self) -> String {
        format!("rgba({}, {}, {}, 1)", self.0, self.1, self.2)
    }

    pub fn background(&self) -> String {
        format!("rgba({}, {}, {}, 0.2)", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendOptions {
    pub display: bool,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginOptions {
    pub legend: LegendOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: PluginOptions,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            plugins: PluginOptions {
                legend: LegendOptions {
                    display: true,
                    position: "top".to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub id: String,
    pub title: Option<String>,
    pub height_px: u32,
    pub margin_top_px: u32,
    pub labels: Vec<String>,
    pub datasets: Vec<SeriesData>,
    pub options: ChartOptions,
}

impl ChartData {
    pub fn new(id: &str, title: Option<&str>, labels: Vec<String>, datasets: Vec<SeriesData>) -> Self {
        Self {
            id: id.to_string(),
            title: title.map(str::to_string),
            height_px: 400,
            margin_top_px: 0,
            labels,
            datasets,
            options: ChartOptions::default(),
        }
    }

    pub fn with_margin_top(mut self, margin_top_px: u32) -> Self {
        self.margin_top_px = margin_top_px;
        self
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.datasets.iter().all(|s| s.data.is_empty())
    }
}
