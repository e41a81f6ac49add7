pub mod backlog;
pub mod frog;
pub mod monitor;
pub mod ordering;
pub mod tasks;
pub mod timers;

pub use backlog::TodoInput;
pub use monitor::{PollSchedule, TimerMonitor};
pub use tasks::{NewTask, TaskEdit};
pub use timers::TimerRequest;

use crate::clock::Clock;
use crate::domain::AppDocument;
use chrono::NaiveDate;

/// Every mutation the engine understands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddTask(NewTask),
    ToggleComplete { task_id: String },
    UpdateTask { task_id: String, edit: TaskEdit },
    DeleteTask { task_id: String },
    CarryForward { task_id: String },
    DeferToBacklog { task_id: String },
    Reorder { date: NaiveDate, from: usize, to: usize },
    AssignFrog { task_id: String, date: NaiveDate },
    ClearFrog { date: NaiveDate },
    AddTodo(TodoInput),
    UpdateTodo { todo_id: String, input: TodoInput },
    DeleteTodo { todo_id: String },
    ScheduleTodo { todo_id: String, date: NaiveDate },
    StartTimer(TimerRequest),
    StopTimer { timer_id: Option<String> },
}

impl Command {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddTask(_) => "add_task",
            Command::ToggleComplete { .. } => "toggle_complete",
            Command::UpdateTask { .. } => "update_task",
            Command::DeleteTask { .. } => "delete_task",
            Command::CarryForward { .. } => "carry_forward",
            Command::DeferToBacklog { .. } => "defer_to_backlog",
            Command::Reorder { .. } => "reorder",
            Command::AssignFrog { .. } => "assign_frog",
            Command::ClearFrog { .. } => "clear_frog",
            Command::AddTodo(_) => "add_todo",
            Command::UpdateTodo { .. } => "update_todo",
            Command::DeleteTodo { .. } => "delete_todo",
            Command::ScheduleTodo { .. } => "schedule_todo",
            Command::StartTimer(_) => "start_timer",
            Command::StopTimer { .. } => "stop_timer",
        }
    }
}

/// Run `command` against a copy of `doc`.
///
/// Returns the new document, or None when the command was rejected or
/// would not change anything. The input is never modified.
pub fn apply(doc: &AppDocument, command: &Command, clock: &dyn Clock) -> Option<AppDocument> {
    let mut next = doc.clone();
    let today = clock.today();
    let now = clock.now();

    let changed = match command {
        Command::AddTask(new) => tasks::add_task(&mut next, new, today),
        Command::ToggleComplete { task_id } => tasks::toggle_complete(&mut next, task_id, now),
        Command::UpdateTask { task_id, edit } => tasks::update_task(&mut next, task_id, edit),
        Command::DeleteTask { task_id } => tasks::delete_task(&mut next, task_id),
        Command::CarryForward { task_id } => tasks::carry_forward(&mut next, task_id, today),
        Command::DeferToBacklog { task_id } => backlog::defer_to_backlog(&mut next, task_id, today, now),
        Command::Reorder { date, from, to } => ordering::reorder(&mut next, *date, *from, *to),
        Command::AssignFrog { task_id, date } => frog::assign_frog(&mut next, task_id, *date),
        Command::ClearFrog { date } => frog::clear_frog(&mut next, *date),
        Command::AddTodo(input) => backlog::add_todo(&mut next, input, now),
        Command::UpdateTodo { todo_id, input } => backlog::update_todo(&mut next, todo_id, input),
        Command::DeleteTodo { todo_id } => backlog::delete_todo(&mut next, todo_id),
        Command::ScheduleTodo { todo_id, date } => backlog::schedule_todo(&mut next, todo_id, *date),
        Command::StartTimer(request) => timers::start_timer(&mut next, request, now),
        Command::StopTimer { timer_id } => timers::stop_timer(&mut next, timer_id.as_deref()),
    };

    if changed && next != *doc {
        Some(next)
    } else {
        tracing::debug!(command = command.name(), "command left document unchanged");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::domain::{tasks_for_date, Category};
    use pretty_assertions::assert_eq;

    fn clock() -> FixedClock {
        FixedClock::at("2024-03-01T09:00:00Z").unwrap()
    }

    fn run(doc: AppDocument, command: Command, clock: &FixedClock) -> AppDocument {
        apply(&doc, &command, clock).unwrap_or(doc)
    }

    fn texts(doc: &AppDocument, date: NaiveDate) -> Vec<String> {
        tasks_for_date(doc, date).iter().map(|t| t.text.clone()).collect()
    }

    fn add_abc(clock: &FixedClock) -> AppDocument {
        let mut doc = AppDocument::default();
        for text in ["A", "B", "C"] {
            doc = run(doc, Command::AddTask(NewTask::new(text)), clock);
        }
        doc
    }

    #[test]
    fn test_apply_does_not_touch_input() {
        let clock = clock();
        let doc = AppDocument::default();
        let next = apply(&doc, &Command::AddTask(NewTask::new("A")), &clock).unwrap();

        assert!(doc.daily_tasks.is_empty());
        assert_eq!(next.daily_tasks.len(), 1);
    }

    #[test]
    fn test_rejected_command_returns_none() {
        let clock = clock();
        let doc = AppDocument::default();
        assert_eq!(apply(&doc, &Command::AddTask(NewTask::new("  ")), &clock), None);
        assert_eq!(
            apply(&doc, &Command::ToggleComplete { task_id: "nope".to_string() }, &clock),
            None
        );
        assert_eq!(apply(&doc, &Command::StopTimer { timer_id: None }, &clock), None);
    }

    #[test]
    fn test_add_then_reorder_scenario() {
        let clock = clock();
        let today = clock.today();
        let doc = add_abc(&clock);
        assert_eq!(texts(&doc, today), vec!["C", "B", "A"]);

        let doc = run(doc, Command::Reorder { date: today, from: 0, to: 2 }, &clock);
        assert_eq!(texts(&doc, today), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_assign_frog_scenario() {
        let clock = clock();
        let today = clock.today();
        let doc = add_abc(&clock);
        let b = doc.daily_tasks.iter().find(|t| t.text == "B").unwrap().id.clone();

        let doc = run(doc, Command::AssignFrog { task_id: b.clone(), date: today }, &clock);
        let order = |text: &str| doc.daily_tasks.iter().find(|t| t.text == text).unwrap().order;
        assert_eq!(order("B"), Some(0));
        assert_eq!(order("C"), Some(1));
        assert_eq!(order("A"), Some(3));
        assert!(doc.task(&b).unwrap().is_frog);
    }

    #[test]
    fn test_at_most_one_frog_per_day_across_commands() {
        let clock = clock();
        let today = clock.today();
        let mut doc = add_abc(&clock);

        let mut frog = NewTask::new("D");
        frog.is_frog = true;
        doc = run(doc, Command::AddTask(frog), &clock);
        let a = doc.daily_tasks.iter().find(|t| t.text == "A").unwrap().id.clone();
        doc = run(doc, Command::AssignFrog { task_id: a.clone(), date: today }, &clock);

        let mut frog = NewTask::new("E");
        frog.is_frog = true;
        doc = run(doc, Command::AddTask(frog), &clock);

        let frogs: Vec<_> = doc.daily_tasks.iter().filter(|t| t.is_frog).map(|t| t.text.as_str()).collect();
        assert_eq!(frogs, vec!["E"]);
        assert_eq!(texts(&doc, today)[0], "E");
    }

    #[test]
    fn test_carry_forward_via_apply() {
        let clock = clock();
        let yesterday = clock.today().pred_opt().unwrap();
        let mut new = NewTask::new("Report").on(yesterday);
        new.category = Category::Personal;
        let doc = run(AppDocument::default(), Command::AddTask(new), &clock);
        let id = doc.daily_tasks[0].id.clone();

        let doc = run(doc, Command::CarryForward { task_id: id.clone() }, &clock);
        assert_eq!(doc.task(&id).unwrap().moved_to_date, Some(clock.today()));
        let copy = &tasks_for_date(&doc, clock.today())[0];
        assert_eq!(copy.text, "Report");
        assert_eq!(copy.category, Category::Personal);

        assert_eq!(apply(&doc, &Command::CarryForward { task_id: id }, &clock), None);
    }

    #[test]
    fn test_timer_commands_use_clock() {
        let clock = clock();
        let doc = run(AppDocument::default(), Command::StartTimer(TimerRequest::focus(25)), &clock);
        assert_eq!(doc.active_timers[0].end_time, clock.now() + chrono::Duration::minutes(25));

        let id = doc.active_timers[0].id.clone();
        let doc = run(doc, Command::StopTimer { timer_id: Some(id) }, &clock);
        assert!(doc.active_timers.is_empty());
    }

    #[test]
    fn test_reorder_noop_returns_none() {
        let clock = clock();
        let doc = add_abc(&clock);
        let today = clock.today();
        assert_eq!(apply(&doc, &Command::Reorder { date: today, from: 1, to: 1 }, &clock), None);
    }
}
