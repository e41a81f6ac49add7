pub mod backlog_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod overdue_pane;
pub mod styles;
pub mod timer_pane;

use crate::app::AppState;
use backlog_pane::render_backlog_pane;
use input_form::render_input_form;
use keybindings::{render_keybindings, render_status};
use layout::create_layout;
use list_pane::render_list_pane;
use modal::{render_confirm_delete, render_timer_alert};
use overdue_pane::render_overdue_pane;
use ratatui::Frame;
use timer_pane::render_timer_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size, app.doc.active_timers.len());

    render_keybindings(f, app, layout.keybindings_area);

    render_list_pane(f, app, layout.tasks_area);
    render_overdue_pane(f, app, layout.overdue_area);
    render_backlog_pane(f, app, layout.backlog_area);
    if let Some(timers_area) = layout.timers_area {
        render_timer_pane(f, app, timers_area);
    }
    render_status(f, app, layout.status_area);

    // At most one of these is active at a time
    render_input_form(f, app, size);
    render_confirm_delete(f, app, size);
    render_timer_alert(f, app, size);
}
