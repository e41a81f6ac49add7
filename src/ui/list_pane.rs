use crate::app::AppState;
use crate::domain::{day_progress, format_countdown, Category, DailyTask, Pane, UiMode};
use crate::engine::timers::task_timer;
use crate::ui::styles::{
    border_style, default_style, done_style, dragging_style, focused_border_style, frog_style, ghost_style,
    marker_style, personal_style, selected_style, timer_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Seconds left on the task's timer, if one is running
pub fn task_countdown(app: &AppState, task: &DailyTask) -> Option<u64> {
    let timer = task_timer(&app.doc, &task.id)?;
    Some(
        app.timer_state(&timer.id)
            .map(|state| state.remaining_secs)
            .unwrap_or_else(|| timer.remaining_seconds(app.now())),
    )
}

/// Pane border, highlighted when the pane has the cursor
pub fn pane_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(if focused { focused_border_style() } else { border_style() })
        .title(Span::styled(title, title_style()))
}

/// Build the line for one task
/// Format: [x] 🐸 Write proposal  · personal · Q3 Growth  ⏱ 12:04
pub fn create_task_line(task: &DailyTask, goal: Option<&str>, countdown: Option<u64>) -> Line<'static> {
    let mut spans = Vec::new();

    if let Some(moved_to) = task.moved_to_date {
        spans.push(Span::styled(
            format!("[↪] {}  → {}", task.text, moved_to.format("%a %b %d")),
            ghost_style(),
        ));
        return Line::from(spans);
    }

    let check = if task.completed { "[x] " } else { "[ ] " };
    spans.push(Span::raw(check.to_string()));

    if task.is_frog {
        spans.push(Span::styled("🐸 ".to_string(), frog_style()));
    }

    let text_style = if task.completed { done_style() } else { default_style() };
    spans.push(Span::styled(task.text.clone(), text_style));

    if task.category == Category::Personal {
        spans.push(Span::styled(format!("  · {}", task.category.label()), personal_style()));
    }
    if let Some(goal) = goal {
        spans.push(Span::raw(format!("  · {}", goal)));
    }
    if let Some(minutes) = task.timebox_minutes {
        spans.push(Span::raw(format!("  [{}m]", minutes)));
    }
    if let Some(secs) = countdown {
        spans.push(Span::styled(format!("  ⏱ {}", format_countdown(secs)), timer_style()));
    }

    Line::from(spans)
}

/// Render the tasks of the selected date
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let tasks = app.day_tasks();
    let focused = app.pane == Pane::Tasks;
    let drag = app.task_drag.filter(|_| app.ui_mode == UiMode::DraggingTask);
    let frog_hover = app.frog_hover.filter(|_| app.ui_mode == UiMode::DraggingFrog);

    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let goal = task
                .goal_id
                .as_deref()
                .and_then(|id| app.doc.goal_by_id(id))
                .map(|g| g.item.text.as_str());
            let mut line = create_task_line(task, goal, task_countdown(app, task));

            let marker = match (drag, frog_hover) {
                (Some(d), _) if d.over == idx => Span::styled("▶ ", marker_style()),
                (_, Some(hover)) if hover == idx => Span::styled("🐸 ", marker_style()),
                _ => Span::raw("  "),
            };
            line.spans.insert(0, marker);

            let style = match drag {
                Some(d) if d.from == idx => dragging_style(),
                None if focused && frog_hover.is_none() && idx == app.selected_index => selected_style(),
                _ => default_style(),
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let (done, total) = day_progress(&tasks);
    let relative = if app.selected_date == app.today() {
        " · today"
    } else {
        ""
    };
    let title = format!(
        " 🐸 {}{} ({}/{}) ",
        app.selected_date.format("%a %b %d"),
        relative,
        done,
        total
    );

    let list = List::new(items).block(pane_block(title, focused));
    f.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn task(text: &str) -> DailyTask {
        DailyTask::new(text.to_string(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    #[test]
    fn test_task_line_shows_frog_and_countdown() {
        let mut frog = task("Write proposal");
        frog.is_frog = true;
        let text = line_text(&create_task_line(&frog, Some("Q3 Growth"), Some(125)));

        assert!(text.contains("🐸"));
        assert!(text.contains("Write proposal"));
        assert!(text.contains("Q3 Growth"));
        assert!(text.contains("2:05"));
    }

    #[test]
    fn test_ghost_line_points_to_new_date() {
        let mut ghost = task("Old");
        ghost.moved_to_date = NaiveDate::from_ymd_opt(2024, 3, 2);
        let text = line_text(&create_task_line(&ghost, None, None));

        assert!(text.contains("↪"));
        assert!(text.contains("Mar 02"));
    }
}
