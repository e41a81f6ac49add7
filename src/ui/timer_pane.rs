use crate::app::AppState;
use crate::domain::format_countdown;
use crate::engine::timers::focus_timers;
use crate::ui::list_pane::pane_block;
use crate::ui::styles::{expired_gauge_style, gauge_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Gauge,
    Frame,
};

/// One gauge row per running timer
pub fn render_timer_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let title = format!(
        " Timers ({}, {} focus) ",
        app.doc.active_timers.len(),
        focus_timers(&app.doc).len()
    );
    let block = pane_block(title, false);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); inner.height as usize])
        .split(inner);

    let now = app.now();
    for (timer, row) in app.doc.active_timers.iter().zip(rows.iter()) {
        let remaining = app
            .timer_state(&timer.id)
            .map(|s| s.remaining_secs)
            .unwrap_or_else(|| timer.remaining_seconds(now));
        let ratio = timer.progress_ratio(now);
        let style = if remaining == 0 { expired_gauge_style() } else { gauge_style() };

        let gauge = Gauge::default()
            .gauge_style(style)
            .ratio(ratio)
            .label(format!("{}  {}", timer.label(), format_countdown(remaining)));
        f.render_widget(gauge, *row);
    }
}
