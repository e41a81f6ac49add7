use crate::app::AppState;
use crate::domain::{Pane, UiMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    // Status messages last until the next key
    app.status = None;

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::DraggingTask => {
            handle_task_drag_mode(app, key);
            false
        }
        UiMode::DraggingFrog => {
            handle_frog_drag_mode(app, key);
            false
        }
        UiMode::AddingTask | UiMode::EditingTask | UiMode::AddingTodo | UiMode::EditingTodo => {
            handle_input_form_mode(app, key);
            false
        }
        UiMode::ConfirmDelete => {
            handle_confirm_delete_mode(app, key);
            false
        }
        UiMode::TimerAlert => {
            handle_timer_alert_mode(app, key);
            false
        }
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Tab => app.next_pane(),

        // Day navigation
        KeyCode::Left => app.shift_date(-1),
        KeyCode::Right => app.shift_date(1),
        KeyCode::Char('g') => app.go_to_today(),

        KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('a') => app.start_add(),
        KeyCode::Char('e') => app.start_edit(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('b') => app.defer_selected(),
        KeyCode::Char('c') => app.carry_selected(),

        // Enter schedules from the backlog; elsewhere it edits
        KeyCode::Enter => {
            if app.pane == Pane::Backlog {
                app.schedule_selected_todo();
            } else {
                app.start_edit();
            }
        }

        // Gestures
        KeyCode::Char('m') => app.begin_task_drag(),
        KeyCode::Char('f') => app.begin_frog_drag(),

        // Timers
        KeyCode::Char('t') => app.start_task_timer(),
        KeyCode::Char('s') => app.stop_selected_task_timer(),
        KeyCode::Char('T') => app.start_focus_timer(),
        KeyCode::Char('S') => app.stop_all_timers(),

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,

        _ => {}
    }
    false
}

/// Arrows move the drop marker only; nothing is written until Enter
fn handle_task_drag_mode(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.drag_task_by(-1),
        KeyCode::Down | KeyCode::Char('j') => app.drag_task_by(1),
        KeyCode::Enter | KeyCode::Char('m') => app.drop_task(),
        KeyCode::Esc => app.cancel_task_drag(),
        _ => {}
    }
}

fn handle_frog_drag_mode(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.drag_frog_by(-1),
        KeyCode::Down | KeyCode::Char('j') => app.drag_frog_by(1),
        KeyCode::Enter | KeyCode::Char('f') => app.drop_frog(true),
        KeyCode::Char('x') => app.drop_frog(false),
        KeyCode::Esc => app.cancel_frog_drag(),
        _ => {}
    }
}

/// Handle keys in input form mode
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => app.submit_input_form(),
        KeyCode::Esc => app.cancel_input_form(),
        KeyCode::Tab => app.input_form_next_field(),
        KeyCode::Backspace => app.input_form_backspace(),
        KeyCode::Char('p') if ctrl => app.input_form_toggle_category(),
        KeyCode::Char('f') if ctrl => app.input_form_toggle_frog(),
        KeyCode::Char(c) if !ctrl => app.input_form_add_char(c),
        _ => {}
    }
}

fn handle_confirm_delete_mode(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

fn handle_timer_alert_mode(app: &mut AppState, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
        app.dismiss_alert();
    }
}
