use crate::app::AppState;
use crate::domain::{Pane, UiMode};
use crate::ui::styles::{hint_style, status_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Hints for the current mode and pane
pub fn hints(mode: UiMode, pane: Pane) -> &'static str {
    match mode {
        UiMode::DraggingTask => " ↑/↓ move drop marker   Enter drop   Esc cancel",
        UiMode::DraggingFrog => " ↑/↓ choose task   Enter make frog   x drop on nothing   Esc cancel",
        UiMode::AddingTask | UiMode::EditingTask => {
            " Tab next field   Ctrl+P work/personal   Ctrl+F frog   Enter save   Esc cancel"
        }
        UiMode::AddingTodo | UiMode::EditingTodo => " Tab next field   Enter save   Esc cancel",
        UiMode::ConfirmDelete => " y delete   n cancel",
        UiMode::TimerAlert => " Enter dismiss",
        UiMode::Normal => match pane {
            Pane::Tasks => {
                " ↑/↓ select   Space done   a add   e edit   d delete   m move   f frog   b backlog   t timebox   s stop   T focus   S stop all   ←/→ day   g today   Tab pane   q quit"
            }
            Pane::Overdue => " ↑/↓ select   Space done   c carry to today   e edit   d delete   t timebox   Tab pane   q quit",
            Pane::Backlog => " ↑/↓ select   Enter schedule on shown day   a add   e edit   d delete   Tab pane   q quit",
        },
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::raw(hints(app.ui_mode, app.pane)))).style(hint_style());
    f.render_widget(paragraph, area);
}

/// Render the status line
pub fn render_status(f: &mut Frame, app: &AppState, area: Rect) {
    let text = app.status.clone().unwrap_or_default();
    let paragraph = Paragraph::new(Line::from(Span::styled(format!(" {}", text), status_style())));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_follow_mode() {
        assert!(hints(UiMode::DraggingTask, Pane::Tasks).contains("drop"));
        assert!(hints(UiMode::Normal, Pane::Overdue).contains("carry"));
        assert!(hints(UiMode::Normal, Pane::Backlog).contains("schedule"));
        assert!(!hints(UiMode::AddingTodo, Pane::Backlog).contains("frog"));
    }
}
