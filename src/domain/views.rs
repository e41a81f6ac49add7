use super::document::AppDocument;
use super::task::DailyTask;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// How many past days of unfinished work are shown at once
pub const OVERDUE_DAY_LIMIT: usize = 7;

/// Tasks that share a date, already in display order
#[derive(Debug, Clone)]
pub struct DateGroup<'a> {
    pub date: NaiveDate,
    pub tasks: Vec<&'a DailyTask>,
}

/// Sort into engine order: frog first, then ascending `order`, unset last.
/// The sort is stable, so ties keep document order.
pub fn sort_for_display(tasks: &mut [&DailyTask]) {
    tasks.sort_by_key(|t| (!t.is_frog, t.order_key()));
}

/// All tasks on a date (ghosts included), in engine order
pub fn tasks_for_date(doc: &AppDocument, date: NaiveDate) -> Vec<&DailyTask> {
    let mut tasks: Vec<&DailyTask> = doc.daily_tasks.iter().filter(|t| t.date == date).collect();
    sort_for_display(&mut tasks);
    tasks
}

/// The frog for a date, if one is set
pub fn frog_for_date(doc: &AppDocument, date: NaiveDate) -> Option<&DailyTask> {
    doc.daily_tasks.iter().find(|t| t.date == date && t.is_frog)
}

/// Unmoved tasks dated after `today`, by date then engine order
pub fn future_tasks(doc: &AppDocument, today: NaiveDate) -> Vec<&DailyTask> {
    let mut tasks: Vec<&DailyTask> = doc
        .daily_tasks
        .iter()
        .filter(|t| t.date > today && !t.is_moved())
        .collect();
    sort_for_display(&mut tasks);
    tasks.sort_by_key(|t| t.date);
    tasks
}

/// Unfinished, unmoved tasks dated strictly before `date`
pub fn incomplete_before(doc: &AppDocument, date: NaiveDate) -> Vec<&DailyTask> {
    doc.daily_tasks
        .iter()
        .filter(|t| t.date < date && !t.completed && !t.is_moved())
        .collect()
}

/// Group tasks by date (ascending), each group in engine order
pub fn group_by_date<'a>(tasks: &[&'a DailyTask]) -> Vec<DateGroup<'a>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&'a DailyTask>> = BTreeMap::new();
    for task in tasks {
        by_date.entry(task.date).or_default().push(*task);
    }

    by_date
        .into_iter()
        .map(|(date, mut tasks)| {
            sort_for_display(&mut tasks);
            DateGroup { date, tasks }
        })
        .collect()
}

/// Future tasks grouped per day
pub fn future_tasks_by_date(doc: &AppDocument, today: NaiveDate) -> Vec<DateGroup<'_>> {
    group_by_date(&future_tasks(doc, today))
}

/// Overdue tasks grouped per day, most recent day first, capped for display
pub fn overdue_by_date(doc: &AppDocument, date: NaiveDate) -> Vec<DateGroup<'_>> {
    let mut groups = group_by_date(&incomplete_before(doc, date));
    groups.reverse();
    groups.truncate(OVERDUE_DAY_LIMIT);
    groups
}

/// Flatten groups into the row order used for selection
pub fn flatten_groups<'a>(groups: &[DateGroup<'a>]) -> Vec<&'a DailyTask> {
    groups.iter().flat_map(|g| g.tasks.iter().copied()).collect()
}

/// (completed, total) over active tasks of a day
pub fn day_progress(tasks: &[&DailyTask]) -> (usize, usize) {
    let active: Vec<_> = tasks.iter().filter(|t| !t.is_moved()).collect();
    let done = active.iter().filter(|t| t.completed).count();
    (done, active.len())
}
