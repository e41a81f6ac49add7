use crate::app::{AppState, FormState, FormTarget};
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

fn form_title(form: &FormState) -> &'static str {
    match form.target {
        FormTarget::NewTask { .. } => " Add Task ",
        FormTarget::EditTask { .. } => " Edit Task ",
        FormTarget::NewTodo => " Add to Backlog ",
        FormTarget::EditTodo { .. } => " Edit Backlog Item ",
    }
}

fn field_lines<'a>(label: &'a str, value: &'a str, editing: bool) -> [Line<'a>; 3] {
    let label = if editing {
        Line::raw(format!("{}: (editing)", label))
    } else {
        Line::raw(format!("{}:", label))
    };
    let value = Line::from(vec![
        Span::raw("> "),
        Span::styled(value, modal_title_style()),
        if editing {
            Span::styled("█", modal_title_style()) // Cursor
        } else {
            Span::raw("")
        },
    ]);
    [label, value, Line::raw("")]
}

/// Render the task / backlog form
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.input_form else {
        return;
    };

    let mut lines = vec![Line::raw("")];
    lines.extend(field_lines("Text", &form.text, form.editing_field == 0));
    lines.extend(field_lines("Description", &form.description, form.editing_field == 1));
    lines.extend(field_lines("Goal (id or title)", &form.goal, form.editing_field == 2));

    if form.is_task_form() {
        lines.extend(field_lines("Timebox minutes", &form.timebox, form.editing_field == 3));

        lines.push(Line::from(vec![
            Span::raw("Category: "),
            Span::styled(form.category.label(), modal_title_style()),
            Span::raw("   Frog: "),
            Span::styled(if form.is_frog { "yes 🐸" } else { "no" }, modal_title_style()),
        ]));
        lines.push(Line::raw(""));
    }

    lines.push(Line::raw("Tab to switch fields  ·  Enter to save  ·  Esc to cancel"));

    let modal_area = create_modal_area(area, lines.len() as u16 + 2);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(form_title(form), modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
