use super::Command;
use crate::domain::{frog_for_date, AppDocument};
use chrono::NaiveDate;

/// Make `task_id` the frog of `date`. The target moves to order 0, every
/// other ranked task on the day moves down one, and any previous frog loses
/// the flag in the same pass.
pub fn assign_frog(doc: &mut AppDocument, task_id: &str, date: NaiveDate) -> bool {
    if !doc.frog_enabled {
        return false;
    }
    let Some(target) = doc.task(task_id) else {
        return false;
    };
    if target.date != date || target.is_moved() || target.is_frog {
        return false;
    }

    for task in doc.daily_tasks.iter_mut().filter(|t| t.date == date) {
        if task.id == task_id {
            task.is_frog = true;
            task.order = Some(0);
        } else {
            task.is_frog = false;
            if let Some(order) = task.order.as_mut() {
                *order += 1;
            }
        }
    }
    true
}

/// Remove the frog flag from whichever task holds it on `date`
pub fn clear_frog(doc: &mut AppDocument, date: NaiveDate) -> bool {
    let mut changed = false;
    for task in doc.daily_tasks.iter_mut().filter(|t| t.date == date && t.is_frog) {
        task.is_frog = false;
        changed = true;
    }
    changed
}

/// Translate a released frog drag into a command.
///
/// Dropping on a task other than the frog assigns it. Any other release
/// while a frog exists clears it.
pub fn frog_drop_command(doc: &AppDocument, date: NaiveDate, target: Option<&str>) -> Option<Command> {
    match target {
        Some(task_id) => {
            let task = doc.task(task_id)?;
            if task.is_frog {
                Some(Command::ClearFrog { date })
            } else {
                Some(Command::AssignFrog {
                    task_id: task_id.to_string(),
                    date,
                })
            }
        }
        None => frog_for_date(doc, date).map(|_| Command::ClearFrog { date }),
    }
}
