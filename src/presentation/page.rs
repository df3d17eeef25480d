// Server-side HTML for the dashboard page; Chart.js draws in the browser
use crate::domain::dashboard::{ChartPanel, Dashboard};
use askama::Template;

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage<'a> {
    dashboard: &'a Dashboard,
    cdn: &'a str,
    /// Serialized dashboard, safe to embed in a script element.
    initial: String,
    client: &'a str,
}

pub fn render_page(dashboard: &Dashboard) -> Result<String, askama::Error> {
    let initial = serde_json::to_string(dashboard)
        .map_err(|e| askama::Error::Custom(Box::new(e)))?
        .replace('<', "\\u003c");

    DashboardPage {
        dashboard,
        cdn: CHART_JS_CDN,
        initial,
        client: CLIENT_JS,
    }
    .render()
}

// Mirrors the panel macro in templates/dashboard.html so stream updates
// produce the same DOM as the first paint
const CLIENT_JS: &str = r#"
(function () {
    const charts = {};

    function escapeHtml(text) {
        const div = document.createElement('div');
        div.textContent = text;
        return div.innerHTML;
    }

    function drawPanel(key, panel) {
        const container = document.getElementById('panel-' + key);
        if (panel.state === 'loading') {
            if (charts[key]) { charts[key].destroy(); delete charts[key]; }
            container.innerHTML = '<p>' + escapeHtml(panel.placeholder) + '</p>';
            return;
        }
        const chart = panel.chart;
        let canvas = document.getElementById('chart-' + chart.id);
        if (!canvas) {
            const heading = chart.title ? '<h3>' + escapeHtml(chart.title) + '</h3>' : '';
            container.innerHTML = '<div style="position: relative; height: ' + chart.heightPx +
                'px; margin-top: ' + chart.marginTopPx + 'px">' + heading +
                '<canvas id="chart-' + chart.id + '"></canvas></div>';
            canvas = document.getElementById('chart-' + chart.id);
        }
        if (charts[key]) {
            charts[key].data.labels = chart.labels;
            charts[key].data.datasets = chart.datasets;
            charts[key].update('none');
        } else {
            charts[key] = new Chart(canvas, {
                type: 'line',
                data: { labels: chart.labels, datasets: chart.datasets },
                options: chart.options,
            });
        }
    }

    function draw(dashboard) {
        if (!dashboard) return;
        document.getElementById('title').textContent = dashboard.title;
        document.getElementById('section-title').textContent = dashboard.sectionTitle;
        drawPanel('historical', dashboard.historical);
        drawPanel('predicted', dashboard.predicted);
    }

    draw(JSON.parse(document.getElementById('initial-dashboard').textContent));

    const events = new EventSource('/dashboard/stream');
    events.addEventListener('dashboard', function (e) {
        try {
            draw(JSON.parse(e.data));
        } catch (err) {
            console.error('Error rendering dashboard update:', err);
        }
    });
})();
"#;
