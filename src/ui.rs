use crate::models::DashboardResponse;
use askama::Template;

/// Server-rendered shell of the dashboard. The day cards are filled in by the
/// page script from `/api/dashboard`.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    week_key: &'a str,
    progress: u8,
    completed: usize,
    total: usize,
    reminder: Option<&'a str>,
}

pub fn render_index(dashboard: &DashboardResponse) -> askama::Result<String> {
    IndexTemplate {
        week_key: &dashboard.week_key,
        progress: dashboard.week_progress,
        completed: dashboard.completed_count,
        total: dashboard.total_exercises,
        reminder: dashboard
            .reminder
            .as_ref()
            .map(|reminder| reminder.message.as_str()),
    }
    .render()
}
