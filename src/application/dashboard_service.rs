// Dashboard service - renders the mounted view into dashboards
use crate::application::polling_view::PollingTelemetryView;
use crate::domain::dashboard::Dashboard;
use crate::domain::view_state::ViewState;
use crate::infrastructure::config::PageSettings;
use chrono::Local;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;

#[derive(Clone)]
pub struct DashboardService {
    view: Arc<PollingTelemetryView>,
    page: PageSettings,
}

impl DashboardService {
    pub fn new(view: Arc<PollingTelemetryView>, page: PageSettings) -> Self {
        Self { view, page }
    }

    pub fn current(&self) -> Dashboard {
        render(&self.page, &self.view.state())
    }

    /// The current dashboard, then a fresh render after every state change.
    /// Ends when the view is unmounted.
    pub fn updates(&self) -> impl Stream<Item = Dashboard> + Send + 'static + use<> {
        let page = self.page.clone();
        WatchStream::new(self.view.subscribe())
            .map(move |state| render(&page, &state))
            .take_until(self.view.unmounted())
    }
}

fn render(page: &PageSettings, state: &ViewState) -> Dashboard {
    Dashboard::project(&page.title, &page.section_title, state, &Local)
}
