use crate::clock::Clock;
use crate::config::Config;
use crate::domain::{
    format_countdown, future_tasks_by_date, overdue_by_date, tasks_for_date, ActiveTimer, AppDocument,
    Category, DailyTask, DateGroup, Todo,
};
use crate::engine::{self, Command, NewTask, TimerRequest, TodoInput};
use crate::persistence::DocumentStore;
use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "frog")]
#[command(about = "A terminal daily planner: eat the frog first, timebox the rest", long_about = None)]
pub struct Cli {
    /// Data directory. Defaults to the nearest .frogday, then ~/.frogday
    #[arg(long, global = true, env = "FROGDAY_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a local .frogday directory in the current directory
    Init,
    /// Add a task
    Add(AddArgs),
    /// List the tasks of a day
    List {
        /// Day to list (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// List tasks scheduled after today
    Upcoming,
    /// List unfinished tasks from earlier days
    Overdue,
    /// Toggle a task's completion
    Done { id: String },
    /// Delete a task
    Delete { id: String },
    /// Move an overdue task to today
    Carry { id: String },
    /// Send a future task back to the backlog
    Defer { id: String },
    /// Move the task at position FROM to position TO (as shown by `list`)
    Reorder {
        from: usize,
        to: usize,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Make a task the frog of its day, or clear the day's frog
    Frog {
        #[arg(required_unless_present = "clear")]
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        clear: bool,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Manage the backlog
    #[command(subcommand)]
    Backlog(BacklogCommand),
    /// Manage countdown timers
    #[command(subcommand)]
    Timer(TimerCommand),
}

#[derive(Args)]
pub struct AddArgs {
    pub text: String,
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub goal: Option<String>,
    /// File under personal instead of work
    #[arg(long)]
    pub personal: bool,
    /// Make this the frog of its day
    #[arg(long)]
    pub frog: bool,
    /// Timebox in minutes
    #[arg(long)]
    pub timebox: Option<u32>,
}

#[derive(Subcommand)]
pub enum BacklogCommand {
    /// Add an unscheduled todo
    Add {
        text: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        goal: Option<String>,
    },
    /// List the backlog
    List,
    /// Schedule a todo onto a day
    Schedule {
        id: String,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Delete a todo
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum TimerCommand {
    /// Start a countdown; with --task it is bound to that task
    Start {
        /// Defaults to the task's timebox or the configured default
        minutes: Option<u32>,
        #[arg(long)]
        task: Option<String>,
    },
    /// Stop one timer, or all of them
    Stop { id: Option<String> },
    /// List running timers
    List,
}

/// What a subcommand resolved to
enum Action {
    Apply(Command, String),
    Show(String),
}

/// Run one subcommand against the store and return the line(s) to print.
/// `Init` is handled by the caller since it runs before a store exists.
pub fn run(command: Commands, store: &dyn DocumentStore, clock: &dyn Clock, config: &Config) -> Result<String> {
    let doc = store.load().context("Failed to load data")?;

    match plan(command, &doc, clock, config)? {
        Action::Show(text) => Ok(text),
        Action::Apply(command, message) => match engine::apply(&doc, &command, clock) {
            Some(next) => {
                store.save(&next).context("Failed to save data")?;
                tracing::debug!(command = command.name(), "applied");
                Ok(message)
            }
            None => Ok("nothing changed".to_string()),
        },
    }
}

fn plan(command: Commands, doc: &AppDocument, clock: &dyn Clock, config: &Config) -> Result<Action> {
    let today = clock.today();

    let action = match command {
        Commands::Init => bail!("init does not operate on a document"),
        Commands::Add(args) => {
            let date = args.date.unwrap_or(today);
            let mut new = NewTask::new(args.text.clone()).on(date);
            new.description = args.description;
            new.goal_id = args.goal;
            new.is_frog = args.frog;
            new.timebox_minutes = args.timebox;
            if args.personal {
                new.category = Category::Personal;
            }
            Action::Apply(Command::AddTask(new), format!("Added \"{}\" on {}", args.text.trim(), date))
        }
        Commands::List { date } => {
            let date = date.unwrap_or(today);
            Action::Show(format_day(&tasks_for_date(doc, date), date))
        }
        Commands::Upcoming => Action::Show(format_groups(&future_tasks_by_date(doc, today), "Nothing upcoming")),
        Commands::Overdue => Action::Show(format_groups(&overdue_by_date(doc, today), "Nothing overdue")),
        Commands::Done { id } => {
            let task = find_task(doc, &id)?;
            let verb = if task.completed { "Reopened" } else { "Completed" };
            Action::Apply(
                Command::ToggleComplete { task_id: task.id.clone() },
                format!("{} \"{}\"", verb, task.text),
            )
        }
        Commands::Delete { id } => {
            let task = find_task(doc, &id)?;
            Action::Apply(
                Command::DeleteTask { task_id: task.id.clone() },
                format!("Deleted \"{}\"", task.text),
            )
        }
        Commands::Carry { id } => {
            let task = find_task(doc, &id)?;
            Action::Apply(
                Command::CarryForward { task_id: task.id.clone() },
                format!("Carried \"{}\" to {}", task.text, today),
            )
        }
        Commands::Defer { id } => {
            let task = find_task(doc, &id)?;
            Action::Apply(
                Command::DeferToBacklog { task_id: task.id.clone() },
                format!("Moved \"{}\" to the backlog", task.text),
            )
        }
        Commands::Reorder { from, to, date } => {
            let date = date.unwrap_or(today);
            let from_index = position(from)?;
            let to_index = position(to)?;
            Action::Apply(
                Command::Reorder { date, from: from_index, to: to_index },
                format!("Moved {} to {} on {}", from, to, date),
            )
        }
        Commands::Frog { id, clear, date } => {
            if clear {
                let date = date.unwrap_or(today);
                Action::Apply(Command::ClearFrog { date }, format!("Cleared the frog for {}", date))
            } else {
                let id = id.ok_or_else(|| anyhow!("Give a task id or --clear"))?;
                let task = find_task(doc, &id)?;
                let date = date.unwrap_or(task.date);
                Action::Apply(
                    Command::AssignFrog { task_id: task.id.clone(), date },
                    format!("🐸 \"{}\" is the frog for {}", task.text, date),
                )
            }
        }
        Commands::Backlog(backlog) => plan_backlog(backlog, doc, today)?,
        Commands::Timer(timer) => plan_timer(timer, doc, clock, config)?,
    };
    Ok(action)
}

fn plan_backlog(command: BacklogCommand, doc: &AppDocument, today: NaiveDate) -> Result<Action> {
    let action = match command {
        BacklogCommand::Add { text, description, goal } => {
            let message = format!("Added \"{}\" to the backlog", text.trim());
            let mut input = TodoInput::new(text);
            input.description = description;
            input.goal_id = goal;
            Action::Apply(Command::AddTodo(input), message)
        }
        BacklogCommand::List => {
            if doc.todos.is_empty() {
                Action::Show("Backlog is empty".to_string())
            } else {
                let lines: Vec<String> = doc
                    .todos
                    .iter()
                    .map(|todo| match todo.last_scheduled_date {
                        Some(date) => format!("{}  {}  (was {})", short_id(&todo.id), todo.text, date),
                        None => format!("{}  {}", short_id(&todo.id), todo.text),
                    })
                    .collect();
                Action::Show(lines.join("\n"))
            }
        }
        BacklogCommand::Schedule { id, date } => {
            let todo = find_todo(doc, &id)?;
            let date = date.unwrap_or(today);
            Action::Apply(
                Command::ScheduleTodo {
                    todo_id: todo.id.clone(),
                    date,
                },
                format!("Scheduled \"{}\" on {}", todo.text, date),
            )
        }
        BacklogCommand::Delete { id } => {
            let todo = find_todo(doc, &id)?;
            Action::Apply(
                Command::DeleteTodo {
                    todo_id: todo.id.clone(),
                },
                format!("Deleted \"{}\" from the backlog", todo.text),
            )
        }
    };
    Ok(action)
}

fn plan_timer(command: TimerCommand, doc: &AppDocument, clock: &dyn Clock, config: &Config) -> Result<Action> {
    let action = match command {
        TimerCommand::Start { minutes, task } => {
            let (request, label) = match task {
                Some(id) => {
                    let task = find_task(doc, &id)?;
                    let minutes = minutes
                        .or(task.timebox_minutes)
                        .unwrap_or(config.default_timebox_minutes);
                    (
                        TimerRequest::for_task(minutes, task.id.clone(), task.text.clone()),
                        task.text.clone(),
                    )
                }
                None => (
                    TimerRequest::focus(minutes.unwrap_or(config.default_focus_minutes)),
                    "focus".to_string(),
                ),
            };
            if request.duration_minutes == 0 {
                bail!("Timer duration must be at least one minute");
            }
            let message = format!("Started {} min timer: {}", request.duration_minutes, label);
            Action::Apply(Command::StartTimer(request), message)
        }
        TimerCommand::Stop { id } => {
            let timer = id.map(|id| find_timer(doc, &id)).transpose()?;
            let message = match timer {
                Some(timer) => format!("Stopped timer: {}", timer.label()),
                None => "Stopped all timers".to_string(),
            };
            let timer_id = timer.map(|t| t.id.clone());
            Action::Apply(Command::StopTimer { timer_id }, message)
        }
        TimerCommand::List => {
            if doc.active_timers.is_empty() {
                Action::Show("No timers running".to_string())
            } else {
                let now = clock.now();
                let lines: Vec<String> = doc
                    .active_timers
                    .iter()
                    .map(|timer| {
                        format!(
                            "{}  {:<5}  {}  {}",
                            short_id(&timer.id),
                            timer.kind.to_tag(),
                            format_countdown(timer.remaining_seconds(now)),
                            timer.label()
                        )
                    })
                    .collect();
                Action::Show(lines.join("\n"))
            }
        }
    };
    Ok(action)
}

/// 1-based position as printed by `list`
fn position(value: usize) -> Result<usize> {
    value
        .checked_sub(1)
        .ok_or_else(|| anyhow!("Positions start at 1"))
}

fn find_task<'a>(doc: &'a AppDocument, id: &str) -> Result<&'a DailyTask> {
    let task_id = resolve_id(doc.daily_tasks.iter().map(|t| t.id.as_str()), id, "task")?;
    doc.task(&task_id)
        .ok_or_else(|| anyhow!("No task with id {}", task_id))
}

fn find_todo<'a>(doc: &'a AppDocument, id: &str) -> Result<&'a Todo> {
    let todo_id = resolve_id(doc.todos.iter().map(|t| t.id.as_str()), id, "todo")?;
    doc.todo(&todo_id)
        .ok_or_else(|| anyhow!("No todo with id {}", todo_id))
}

fn find_timer<'a>(doc: &'a AppDocument, id: &str) -> Result<&'a ActiveTimer> {
    let timer_id = resolve_id(doc.active_timers.iter().map(|t| t.id.as_str()), id, "timer")?;
    doc.timer(&timer_id)
        .ok_or_else(|| anyhow!("No timer with id {}", timer_id))
}

/// Exact id, or the single id starting with `prefix`
fn resolve_id<'a>(ids: impl Iterator<Item = &'a str>, prefix: &str, what: &str) -> Result<String> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        bail!("Empty {} id", what);
    }

    let matches: Vec<&str> = ids.filter(|id| id.starts_with(prefix)).collect();
    if let Some(exact) = matches.iter().find(|id| **id == prefix) {
        return Ok(exact.to_string());
    }
    match matches.as_slice() {
        [] => bail!("No {} matches \"{}\"", what, prefix),
        [only] => Ok(only.to_string()),
        _ => bail!("\"{}\" matches {} {}s; use a longer prefix", prefix, matches.len(), what),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn format_task_row(position: usize, task: &DailyTask) -> String {
    if let Some(moved_to) = task.moved_to_date {
        return format!("{:>3}. [↪] {} → {}  {}", position, task.text, moved_to, short_id(&task.id));
    }

    let check = if task.completed { "x" } else { " " };
    let frog = if task.is_frog { "🐸 " } else { "" };
    let mut row = format!("{:>3}. [{}] {}{}", position, check, frog, task.text);
    if task.category == Category::Personal {
        row.push_str("  (personal)");
    }
    if let Some(minutes) = task.timebox_minutes {
        row.push_str(&format!("  {}m", minutes));
    }
    row.push_str(&format!("  {}", short_id(&task.id)));
    row
}

fn format_day(tasks: &[&DailyTask], date: NaiveDate) -> String {
    if tasks.is_empty() {
        return format!("No tasks for {}", date);
    }
    let mut lines = vec![date.format("%A %Y-%m-%d").to_string()];
    lines.extend(
        tasks
            .iter()
            .enumerate()
            .map(|(index, task)| format_task_row(index + 1, task)),
    );
    lines.join("\n")
}

fn format_groups(groups: &[DateGroup<'_>], empty: &str) -> String {
    if groups.is_empty() {
        return empty.to_string();
    }
    groups
        .iter()
        .map(|group| format_day(&group.tasks, group.date))
        .collect::<Vec<_>>()
        .join("\n\n")
}
