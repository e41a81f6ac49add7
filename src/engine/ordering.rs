use crate::domain::{tasks_for_date, AppDocument, DailyTask};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Shift every ranked task on `date` one place later
pub fn shift_later(tasks: &mut [DailyTask], date: NaiveDate) {
    for task in tasks.iter_mut().filter(|t| t.date == date) {
        if let Some(order) = task.order.as_mut() {
            *order += 1;
        }
    }
}

/// Insert `task` at the top of its day: it takes order 0 and its ranked
/// siblings move down by one. The row is prepended to the collection.
pub fn insert_at_front(tasks: &mut Vec<DailyTask>, mut task: DailyTask) {
    shift_later(tasks, task.date);
    task.order = Some(0);
    tasks.insert(0, task);
}

/// Move the task at `from` to `to` within the day's display order and
/// renumber the whole day 0..n. Returns false when there is nothing to do.
pub fn reorder(doc: &mut AppDocument, date: NaiveDate, from: usize, to: usize) -> bool {
    if from == to {
        return false;
    }

    let mut ids: Vec<String> = tasks_for_date(doc, date)
        .iter()
        .map(|t| t.id.clone())
        .collect();
    if from >= ids.len() || to >= ids.len() {
        return false;
    }

    let moved = ids.remove(from);
    ids.insert(to, moved);

    let positions: HashMap<&str, i32> = ids
        .iter()
        .enumerate()
        .map(|(index, id)| (id.as_str(), index as i32))
        .collect();

    for task in doc.daily_tasks.iter_mut() {
        if let Some(position) = positions.get(task.id.as_str()) {
            task.order = Some(*position);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn texts(doc: &AppDocument, date: NaiveDate) -> Vec<String> {
        tasks_for_date(doc, date).iter().map(|t| t.text.clone()).collect()
    }

    fn orders(doc: &AppDocument, date: NaiveDate) -> Vec<Option<i32>> {
        tasks_for_date(doc, date).iter().map(|t| t.order).collect()
    }

    fn doc_with(texts: &[&str], date: NaiveDate) -> AppDocument {
        let mut doc = AppDocument::default();
        for text in texts {
            insert_at_front(&mut doc.daily_tasks, DailyTask::new(text.to_string(), date));
        }
        doc
    }

    #[test]
    fn test_insert_at_front_prepends_and_shifts() {
        let today = day("2024-03-01");
        let doc = doc_with(&["A", "B", "C"], today);

        assert_eq!(texts(&doc, today), vec!["C", "B", "A"]);
        assert_eq!(orders(&doc, today), vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_insert_leaves_other_days_and_unranked_alone() {
        let today = day("2024-03-01");
        let mut doc = AppDocument::default();
        let mut other = DailyTask::new("tomorrow".to_string(), day("2024-03-02"));
        other.order = Some(0);
        doc.daily_tasks.push(other);
        doc.daily_tasks.push(DailyTask::new("unranked".to_string(), today));

        insert_at_front(&mut doc.daily_tasks, DailyTask::new("new".to_string(), today));

        assert_eq!(doc.daily_tasks[0].text, "new");
        assert_eq!(doc.daily_tasks[1].order, Some(0));
        assert_eq!(doc.daily_tasks[2].order, None);
    }

    #[test]
    fn test_reorder_front_to_back() {
        let today = day("2024-03-01");
        let mut doc = doc_with(&["A", "B", "C"], today);

        assert!(reorder(&mut doc, today, 0, 2));
        assert_eq!(texts(&doc, today), vec!["B", "A", "C"]);
        assert_eq!(orders(&doc, today), vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_reorder_back_to_front_keeps_relative_order() {
        let today = day("2024-03-01");
        let mut doc = doc_with(&["A", "B", "C", "D"], today);

        assert!(reorder(&mut doc, today, 3, 0));
        assert_eq!(texts(&doc, today), vec!["A", "D", "C", "B"]);
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let today = day("2024-03-01");
        let mut doc = doc_with(&["A", "B"], today);
        let before = doc.clone();

        assert!(!reorder(&mut doc, today, 1, 1));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let today = day("2024-03-01");
        let mut doc = doc_with(&["A", "B"], today);

        assert!(!reorder(&mut doc, today, 0, 5));
        assert!(!reorder(&mut doc, today, 9, 0));
    }

    #[test]
    fn test_reorder_densifies_unranked_tasks() {
        let today = day("2024-03-01");
        let mut doc = AppDocument::default();
        for text in ["x", "y", "z"] {
            doc.daily_tasks.push(DailyTask::new(text.to_string(), today));
        }

        assert!(reorder(&mut doc, today, 2, 0));
        assert_eq!(texts(&doc, today), vec!["z", "x", "y"]);
        assert_eq!(orders(&doc, today), vec![Some(0), Some(1), Some(2)]);
    }
}
