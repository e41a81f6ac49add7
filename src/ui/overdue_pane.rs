use crate::app::AppState;
use crate::domain::Pane;
use crate::ui::list_pane::{create_task_line, pane_block, task_countdown};
use crate::ui::styles::{date_header_style, default_style, selected_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Unfinished work from earlier days, newest day first.
/// Date headers are not selectable; the cursor counts task rows only.
pub fn render_overdue_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let focused = app.pane == Pane::Overdue;
    let groups = app.overdue_groups();

    let mut items = Vec::new();
    let mut row = 0;
    for group in &groups {
        items.push(ListItem::new(Line::from(Span::styled(
            group.date.format("%a %b %d").to_string(),
            date_header_style(),
        ))));

        for task in &group.tasks {
            let mut line = create_task_line(task, None, task_countdown(app, task));
            line.spans.insert(0, Span::raw("  "));
            let style = if focused && row == app.selected_index {
                selected_style()
            } else {
                default_style()
            };
            items.push(ListItem::new(line).style(style));
            row += 1;
        }
    }

    if items.is_empty() {
        items.push(ListItem::new(Line::raw("  Nothing overdue")));
    }

    let title = format!(" Overdue ({}) ", row);
    f.render_widget(List::new(items).block(pane_block(title, focused)), area);
}
