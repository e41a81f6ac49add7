use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub tasks_area: Rect,
    pub overdue_area: Rect,
    pub backlog_area: Rect,
    pub timers_area: Option<Rect>,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: Tasks (60%) | Overdue over Backlog (40%)
/// - Timers strip (only while timers run), sized to fit them
/// - Bottom bar: status line (1 row)
pub fn create_layout(area: Rect, timer_count: usize) -> MainLayout {
    let timers_height = if timer_count == 0 {
        0
    } else {
        (timer_count as u16).min(6) + 2
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Keybindings bar
            Constraint::Min(0),                // Panes
            Constraint::Length(timers_height), // Timers
            Constraint::Length(1),             // Status
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    MainLayout {
        keybindings_area: rows[0],
        tasks_area: columns[0],
        overdue_area: side[0],
        backlog_area: side[1],
        timers_area: (timers_height > 0).then_some(rows[2]),
        status_area: rows[3],
    }
}

/// Create centered modal area
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}
