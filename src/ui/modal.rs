use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn render_box(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let modal_area = create_modal_area(area, lines.len() as u16 + 2);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title.to_string(), modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the timer expired alert
pub fn render_timer_alert(f: &mut Frame, app: &AppState, area: Rect) {
    if app.ui_mode != UiMode::TimerAlert {
        return;
    }
    let Some(timer) = app.current_alert() else {
        return;
    };

    let mut lines = vec![
        Line::raw(""),
        Line::raw(format!("  {} is done ({} min).", timer.label(), timer.duration_minutes)),
        Line::raw(""),
    ];
    if app.alerts.len() > 1 {
        lines.push(Line::raw(format!("  {} more waiting", app.alerts.len() - 1)));
        lines.push(Line::raw(""));
    }
    lines.push(Line::from(vec![
        Span::styled("  [Enter]", modal_title_style()),
        Span::raw(" Dismiss"),
    ]));

    render_box(f, area, " ⏰ Time's up ", lines);
}

/// Render the delete confirmation
pub fn render_confirm_delete(f: &mut Frame, app: &AppState, area: Rect) {
    if app.ui_mode != UiMode::ConfirmDelete {
        return;
    }
    let Some(pending) = &app.pending_delete else {
        return;
    };

    let lines = vec![
        Line::raw(""),
        Line::raw(format!("  Delete \"{}\"?", pending.text())),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [y]", modal_title_style()),
            Span::raw(" Delete  "),
            Span::styled("[n]", modal_title_style()),
            Span::raw(" Keep"),
        ]),
    ];

    render_box(f, area, " Delete ", lines);
}
