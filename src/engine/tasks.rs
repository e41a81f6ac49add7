use super::frog::{assign_frog, clear_frog};
use super::ordering::insert_at_front;
use crate::domain::{AppDocument, Category, DailyTask};
use chrono::{DateTime, NaiveDate, Utc};

/// Input for creating a scheduled task
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewTask {
    pub text: String,
    pub description: String,
    pub goal_id: Option<String>,
    pub category: Category,
    pub is_frog: bool,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub timebox_minutes: Option<u32>,
}

impl NewTask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Replacement values for an existing task
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskEdit {
    pub text: String,
    pub description: String,
    pub goal_id: Option<String>,
    pub category: Category,
    pub is_frog: bool,
    pub timebox_minutes: Option<u32>,
}

impl TaskEdit {
    /// Start from a task's current values
    pub fn from_task(task: &DailyTask) -> Self {
        Self {
            text: task.text.clone(),
            description: task.description.clone(),
            goal_id: task.goal_id.clone(),
            category: task.category,
            is_frog: task.is_frog,
            timebox_minutes: task.timebox_minutes,
        }
    }
}

/// Empty goal ids mean "no goal"
pub(crate) fn clean_goal(goal_id: &Option<String>) -> Option<String> {
    goal_id
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
}

pub fn add_task(doc: &mut AppDocument, new: &NewTask, today: NaiveDate) -> bool {
    let text = new.text.trim();
    if text.is_empty() {
        return false;
    }

    let date = new.date.unwrap_or(today);
    let mut task = DailyTask::new(text.to_string(), date);
    task.description = new.description.trim().to_string();
    task.goal_id = clean_goal(&new.goal_id);
    task.category = new.category;
    task.timebox_minutes = new.timebox_minutes.filter(|m| *m > 0);

    if new.is_frog && doc.frog_enabled {
        clear_frog(doc, date);
        task.is_frog = true;
    }

    insert_at_front(&mut doc.daily_tasks, task);
    true
}

pub fn toggle_complete(doc: &mut AppDocument, task_id: &str, now: DateTime<Utc>) -> bool {
    let Some(task) = doc.daily_tasks.iter_mut().find(|t| t.id == task_id) else {
        return false;
    };
    // Ghost rows are read-only history
    if task.is_moved() {
        return false;
    }

    task.completed = !task.completed;
    task.completed_at = if task.completed { Some(now) } else { None };
    true
}

pub fn update_task(doc: &mut AppDocument, task_id: &str, edit: &TaskEdit) -> bool {
    let text = edit.text.trim();
    if text.is_empty() {
        return false;
    }
    let Some(task) = doc.daily_tasks.iter_mut().find(|t| t.id == task_id) else {
        return false;
    };

    task.text = text.to_string();
    task.description = edit.description.trim().to_string();
    task.goal_id = clean_goal(&edit.goal_id);
    task.category = edit.category;
    task.timebox_minutes = edit.timebox_minutes.filter(|m| *m > 0);

    let was_frog = task.is_frog;
    let date = task.date;
    if !edit.is_frog && was_frog {
        task.is_frog = false;
    }
    if edit.is_frog && !was_frog {
        assign_frog(doc, task_id, date);
    }
    true
}

pub fn delete_task(doc: &mut AppDocument, task_id: &str) -> bool {
    let before = doc.daily_tasks.len();
    doc.daily_tasks.retain(|t| t.id != task_id);
    doc.daily_tasks.len() != before
}

/// Copy an unfinished past task to today and mark the original as moved.
/// The original row stays as history.
pub fn carry_forward(doc: &mut AppDocument, task_id: &str, today: NaiveDate) -> bool {
    let Some(original) = doc.daily_tasks.iter_mut().find(|t| t.id == task_id) else {
        return false;
    };
    if original.completed || original.is_moved() || original.date >= today {
        return false;
    }

    original.moved_to_date = Some(today);

    let mut copy = DailyTask::new(original.text.clone(), today);
    copy.description = original.description.clone();
    copy.goal_id = original.goal_id.clone();
    copy.category = original.category;
    copy.timebox_minutes = original.timebox_minutes;

    insert_at_front(&mut doc.daily_tasks, copy);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tasks_for_date;
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_add_task_trims_and_defaults_to_today() {
        let today = day("2024-03-01");
        let mut doc = AppDocument::default();
        let mut new = NewTask::new("  Plan sprint  ");
        new.description = " notes ".to_string();
        new.goal_id = Some("".to_string());

        assert!(add_task(&mut doc, &new, today));
        let task = &doc.daily_tasks[0];
        assert_eq!(task.text, "Plan sprint");
        assert_eq!(task.description, "notes");
        assert_eq!(task.goal_id, None);
        assert_eq!(task.date, today);
        assert_eq!(task.order, Some(0));
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let mut doc = AppDocument::default();
        assert!(!add_task(&mut doc, &NewTask::new("   "), day("2024-03-01")));
        assert!(doc.daily_tasks.is_empty());
    }

    #[test]
    fn test_add_with_explicit_date() {
        let mut doc = AppDocument::default();
        let new = NewTask::new("Dentist").on(day("2024-03-09"));
        assert!(add_task(&mut doc, &new, day("2024-03-01")));
        assert_eq!(doc.daily_tasks[0].date, day("2024-03-09"));
    }

    #[test]
    fn test_add_frog_steals_flag() {
        let today = day("2024-03-01");
        let mut doc = AppDocument::default();
        let mut first = NewTask::new("first");
        first.is_frog = true;
        add_task(&mut doc, &first, today);
        let mut second = NewTask::new("second");
        second.is_frog = true;
        add_task(&mut doc, &second, today);

        let frogs: Vec<_> = doc.daily_tasks.iter().filter(|t| t.is_frog).collect();
        assert_eq!(frogs.len(), 1);
        assert_eq!(frogs[0].text, "second");
    }

    #[test]
    fn test_add_frog_ignored_when_disabled() {
        let mut doc = AppDocument::default();
        doc.frog_enabled = false;
        let mut new = NewTask::new("x");
        new.is_frog = true;
        add_task(&mut doc, &new, day("2024-03-01"));
        assert!(!doc.daily_tasks[0].is_frog);
    }

    #[test]
    fn test_toggle_complete_sets_and_clears_timestamp() {
        let mut doc = AppDocument::default();
        add_task(&mut doc, &NewTask::new("x"), day("2024-03-01"));
        let id = doc.daily_tasks[0].id.clone();

        assert!(toggle_complete(&mut doc, &id, now()));
        assert!(doc.daily_tasks[0].completed);
        assert_eq!(doc.daily_tasks[0].completed_at, Some(now()));

        assert!(toggle_complete(&mut doc, &id, now()));
        assert!(!doc.daily_tasks[0].completed);
        assert_eq!(doc.daily_tasks[0].completed_at, None);

        assert!(!toggle_complete(&mut doc, "missing", now()));
    }

    #[test]
    fn test_toggle_complete_refuses_ghosts() {
        let mut doc = AppDocument::default();
        let mut ghost = DailyTask::new("old".to_string(), day("2024-02-28"));
        ghost.moved_to_date = Some(day("2024-03-01"));
        let id = ghost.id.clone();
        doc.daily_tasks.push(ghost);

        assert!(!toggle_complete(&mut doc, &id, now()));
    }

    #[test]
    fn test_update_replaces_fields() {
        let mut doc = AppDocument::default();
        let mut new = NewTask::new("draft");
        new.goal_id = Some("g1".to_string());
        add_task(&mut doc, &new, day("2024-03-01"));
        let id = doc.daily_tasks[0].id.clone();

        let edit = TaskEdit {
            text: " final ".to_string(),
            description: "done right".to_string(),
            goal_id: None,
            category: Category::Personal,
            is_frog: false,
            timebox_minutes: Some(30),
        };
        assert!(update_task(&mut doc, &id, &edit));

        let task = doc.task(&id).unwrap();
        assert_eq!(task.text, "final");
        assert_eq!(task.goal_id, None);
        assert_eq!(task.category, Category::Personal);
        assert_eq!(task.timebox_minutes, Some(30));
    }

    #[test]
    fn test_update_rejects_blank_and_missing() {
        let mut doc = AppDocument::default();
        add_task(&mut doc, &NewTask::new("keep"), day("2024-03-01"));
        let id = doc.daily_tasks[0].id.clone();

        let mut edit = TaskEdit::from_task(&doc.daily_tasks[0]);
        edit.text = "  ".to_string();
        assert!(!update_task(&mut doc, &id, &edit));
        assert_eq!(doc.daily_tasks[0].text, "keep");

        edit.text = "new".to_string();
        assert!(!update_task(&mut doc, "stale-id", &edit));
    }

    #[test]
    fn test_update_frog_flag_goes_through_assignment() {
        let today = day("2024-03-01");
        let mut doc = AppDocument::default();
        for text in ["A", "B"] {
            add_task(&mut doc, &NewTask::new(text), today);
        }
        // B0, A1
        let a = doc.daily_tasks.iter().find(|t| t.text == "A").unwrap().clone();

        let mut edit = TaskEdit::from_task(&a);
        edit.is_frog = true;
        assert!(update_task(&mut doc, &a.id, &edit));

        let ordered: Vec<_> = tasks_for_date(&doc, today).iter().map(|t| t.text.clone()).collect();
        assert_eq!(ordered, vec!["A", "B"]);
        assert_eq!(doc.task(&a.id).unwrap().order, Some(0));

        edit.is_frog = false;
        assert!(update_task(&mut doc, &a.id, &edit));
        assert!(!doc.task(&a.id).unwrap().is_frog);
    }

    #[test]
    fn test_delete_task() {
        let mut doc = AppDocument::default();
        add_task(&mut doc, &NewTask::new("gone"), day("2024-03-01"));
        let id = doc.daily_tasks[0].id.clone();

        assert!(delete_task(&mut doc, &id));
        assert!(doc.daily_tasks.is_empty());
        assert!(!delete_task(&mut doc, &id));
    }

    #[test]
    fn test_carry_forward_is_non_destructive() {
        let today = day("2024-03-01");
        let mut doc = AppDocument::default();
        let mut new = NewTask::new("Finish slides").on(day("2024-02-27"));
        new.description = "last 3".to_string();
        new.goal_id = Some("g1".to_string());
        new.category = Category::Personal;
        add_task(&mut doc, &new, today);
        add_task(&mut doc, &NewTask::new("already today"), today);
        let original_id = doc
            .daily_tasks
            .iter()
            .find(|t| t.text == "Finish slides")
            .unwrap()
            .id
            .clone();

        assert!(carry_forward(&mut doc, &original_id, today));

        let original = doc.task(&original_id).unwrap();
        assert_eq!(original.moved_to_date, Some(today));
        assert_eq!(original.date, day("2024-02-27"));

        let copies: Vec<_> = doc
            .daily_tasks
            .iter()
            .filter(|t| t.text == "Finish slides" && t.id != original_id)
            .collect();
        assert_eq!(copies.len(), 1);
        let copy = copies[0];
        assert_eq!(copy.date, today);
        assert_eq!(copy.order, Some(0));
        assert_eq!(copy.description, "last 3");
        assert_eq!(copy.goal_id.as_deref(), Some("g1"));
        assert_eq!(copy.category, Category::Personal);
        assert!(!copy.completed);

        let ordered: Vec<_> = tasks_for_date(&doc, today).iter().map(|t| t.text.clone()).collect();
        assert_eq!(ordered, vec!["Finish slides", "already today"]);
    }

    #[test]
    fn test_carry_forward_guards() {
        let today = day("2024-03-01");
        let mut doc = AppDocument::default();
        add_task(&mut doc, &NewTask::new("today"), today);
        add_task(&mut doc, &NewTask::new("past").on(day("2024-02-20")), today);
        let today_id = doc.daily_tasks.iter().find(|t| t.text == "today").unwrap().id.clone();
        let past_id = doc.daily_tasks.iter().find(|t| t.text == "past").unwrap().id.clone();

        assert!(!carry_forward(&mut doc, &today_id, today));

        assert!(carry_forward(&mut doc, &past_id, today));
        // Second attempt hits the ghost
        assert!(!carry_forward(&mut doc, &past_id, today));

        toggle_complete(&mut doc, &today_id, now());
        assert!(!carry_forward(&mut doc, "missing", today));
    }

    #[test]
    fn test_carry_forward_skips_completed() {
        let today = day("2024-03-01");
        let mut doc = AppDocument::default();
        add_task(&mut doc, &NewTask::new("done").on(day("2024-02-20")), today);
        let id = doc.daily_tasks[0].id.clone();
        toggle_complete(&mut doc, &id, now());

        assert!(!carry_forward(&mut doc, &id, today));
    }
}
