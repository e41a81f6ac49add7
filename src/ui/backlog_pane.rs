use crate::app::AppState;
use crate::domain::{Pane, Todo};
use crate::ui::list_pane::pane_block;
use crate::ui::styles::{default_style, ghost_style, selected_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

fn create_todo_line(todo: &Todo, goal: Option<&str>) -> Line<'static> {
    let mut spans = vec![Span::raw(format!("• {}", todo.text))];
    if let Some(goal) = goal {
        spans.push(Span::raw(format!("  · {}", goal)));
    }
    if let Some(date) = todo.last_scheduled_date {
        spans.push(Span::styled(format!("  (was {})", date.format("%b %d")), ghost_style()));
    }
    Line::from(spans)
}

/// Backlog items, newest first
pub fn render_backlog_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let focused = app.pane == Pane::Backlog;

    let items: Vec<ListItem> = app
        .backlog()
        .iter()
        .enumerate()
        .map(|(idx, todo)| {
            let goal = todo
                .goal_id
                .as_deref()
                .and_then(|id| app.doc.goal_by_id(id))
                .map(|g| g.item.text.as_str());
            let style = if focused && idx == app.selected_index {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(create_todo_line(todo, goal)).style(style)
        })
        .collect();

    let title = format!(" Backlog ({}) ", app.backlog().len());
    f.render_widget(List::new(items).block(pane_block(title, focused)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_todo_line_mentions_previous_date() {
        let mut todo = Todo::new("Renew passport".to_string(), Utc::now());
        todo.last_scheduled_date = NaiveDate::from_ymd_opt(2024, 3, 10);
        let line = create_todo_line(&todo, None);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();

        assert!(text.contains("Renew passport"));
        assert!(text.contains("was Mar 10"));
    }
}
