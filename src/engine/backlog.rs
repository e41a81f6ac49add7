use super::tasks::clean_goal;
use crate::domain::{AppDocument, Category, DailyTask, Todo};
use chrono::{DateTime, NaiveDate, Utc};

/// Input for a backlog item, used for both create and edit
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TodoInput {
    pub text: String,
    pub description: String,
    pub goal_id: Option<String>,
}

impl TodoInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            text: todo.text.clone(),
            description: todo.description.clone(),
            goal_id: todo.goal_id.clone(),
        }
    }
}

pub fn add_todo(doc: &mut AppDocument, input: &TodoInput, now: DateTime<Utc>) -> bool {
    let text = input.text.trim();
    if text.is_empty() {
        return false;
    }

    let mut todo = Todo::new(text.to_string(), now);
    todo.description = input.description.trim().to_string();
    todo.goal_id = clean_goal(&input.goal_id);
    doc.todos.insert(0, todo);
    true
}

pub fn update_todo(doc: &mut AppDocument, todo_id: &str, input: &TodoInput) -> bool {
    let text = input.text.trim();
    if text.is_empty() {
        return false;
    }
    let Some(todo) = doc.todos.iter_mut().find(|t| t.id == todo_id) else {
        return false;
    };

    todo.text = text.to_string();
    todo.description = input.description.trim().to_string();
    todo.goal_id = clean_goal(&input.goal_id);
    true
}

pub fn delete_todo(doc: &mut AppDocument, todo_id: &str) -> bool {
    let before = doc.todos.len();
    doc.todos.retain(|t| t.id != todo_id);
    doc.todos.len() != before
}

/// Pull a future task back into the backlog, remembering its old date
pub fn defer_to_backlog(doc: &mut AppDocument, task_id: &str, today: NaiveDate, now: DateTime<Utc>) -> bool {
    let Some(index) = doc.daily_tasks.iter().position(|t| t.id == task_id) else {
        return false;
    };
    let task = &doc.daily_tasks[index];
    if task.is_moved() || task.date <= today {
        return false;
    }

    let task = doc.daily_tasks.remove(index);
    let mut todo = Todo::new(task.text, now);
    todo.description = task.description;
    todo.goal_id = task.goal_id;
    todo.last_scheduled_date = Some(task.date);
    doc.todos.insert(0, todo);
    true
}

/// Turn a backlog item into a task on `date`. The task is appended
/// (no rank) rather than pushed to the top.
pub fn schedule_todo(doc: &mut AppDocument, todo_id: &str, date: NaiveDate) -> bool {
    let Some(index) = doc.todos.iter().position(|t| t.id == todo_id) else {
        return false;
    };

    let todo = doc.todos.remove(index);
    let mut task = DailyTask::new(todo.text, date);
    task.description = todo.description;
    task.goal_id = todo.goal_id;
    task.category = Category::Work;
    doc.daily_tasks.insert(0, task);
    true
}
