//! Operator commands.
//!
//! Parses the REPL grammar and executes each command against the task
//! store. Every operation returns the user-facing reply string; domain
//! rejections ("no such ID", bad date input) are normal replies, while
//! store failures surface as errors.

use crate::error::Result;
use crate::personality::{
    ADD_LINES, COMPLETE_LINES, DELETE_LINES, LIST_LINES, REMINDER_LINES, pick,
};
use crate::store::TaskStore;
use crate::task::{DUE_INPUT_FORMAT, Task};
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;

/// Usage hint for the add command.
const ADD_USAGE: &str = "Use: add task <description> by <YYYY-MM-DD HH:MM> with <priority>";

/// Reply for input that matches no command.
const UNKNOWN_HINT: &str = "Huh? Type 'help' if you're lost.";

/// Help text listing every command.
pub const HELP_TEXT: &str = "\
Commands:
  add task <desc> by <YYYY-MM-DD HH:MM> with <priority>  # e.g., add task Write code by 2025-05-20 20:30 with high
  list tasks
  delete task <id>
  complete task <id>
  check reminders
  exit";

/// Farewell printed when the session ends.
pub const GOODBYE: &str = "Goodbye. Try not to fall apart without me.";

/// A parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a task.
    Add {
        /// Task description, case preserved.
        description: String,
        /// Due time as typed, `YYYY-MM-DD HH:MM`.
        due: String,
        /// Priority label as typed.
        priority: String,
    },
    /// Print all tasks.
    List,
    /// Remove a task by identifier.
    Delete(u64),
    /// Mark a task completed by identifier.
    Complete(u64),
    /// Print currently-due pending tasks without notifying.
    CheckReminders,
    /// Print the command list.
    Help,
    /// End the session.
    Exit,
}

impl Command {
    /// Parse one REPL line. Keywords match case-insensitively; the
    /// description and priority keep the operator's casing. The error is
    /// the reply to print.
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        let lower = line.to_lowercase();

        match lower.as_str() {
            "exit" => return Ok(Self::Exit),
            "help" => return Ok(Self::Help),
            "list tasks" => return Ok(Self::List),
            "check reminders" => return Ok(Self::CheckReminders),
            _ => {}
        }

        if lower.starts_with("add task") {
            return Self::parse_add(&line["add task".len()..]);
        }
        if lower.starts_with("delete task") {
            let id = parse_id(&line["delete task".len()..], "Use: delete task <id>")?;
            return Ok(Self::Delete(id));
        }
        if lower.starts_with("complete task") {
            let id = parse_id(&line["complete task".len()..], "Use: complete task <id>")?;
            return Ok(Self::Complete(id));
        }

        Err(UNKNOWN_HINT.to_owned())
    }

    fn parse_add(rest: &str) -> std::result::Result<Self, String> {
        let (description, tail) = rest.split_once(" by ").ok_or_else(|| ADD_USAGE.to_owned())?;
        let (due, priority) = tail.split_once(" with ").ok_or_else(|| ADD_USAGE.to_owned())?;

        let description = description.trim();
        if description.is_empty() {
            return Err(ADD_USAGE.to_owned());
        }

        Ok(Self::Add {
            description: description.to_owned(),
            due: due.trim().to_owned(),
            priority: priority.trim().to_owned(),
        })
    }
}

fn parse_id(rest: &str, usage: &str) -> std::result::Result<u64, String> {
    rest.trim().parse::<u64>().map_err(|_| usage.to_owned())
}

/// Store-backed command executor.
pub struct Tracker {
    store: Arc<dyn TaskStore>,
}

impl Tracker {
    /// Create a tracker over the given store.
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Execute a parsed command, returning the reply to print.
    pub fn execute(&self, command: &Command) -> Result<String> {
        match command {
            Command::Add {
                description,
                due,
                priority,
            } => self.add(description, due, priority),
            Command::List => self.list(),
            Command::Delete(id) => self.delete(*id),
            Command::Complete(id) => self.complete(*id),
            Command::CheckReminders => self.check_reminders(),
            Command::Help => Ok(HELP_TEXT.to_owned()),
            Command::Exit => Ok(GOODBYE.to_owned()),
        }
    }

    /// Add a task due at `due` (`YYYY-MM-DD HH:MM`).
    pub fn add(&self, description: &str, due: &str, priority: &str) -> Result<String> {
        let Ok(due_at) = NaiveDateTime::parse_from_str(due, DUE_INPUT_FORMAT) else {
            return Ok(
                "Invalid date format. Use YYYY-MM-DD HH:MM (e.g., 2025-05-20 20:30).".to_owned(),
            );
        };

        let mut set = self.store.load()?;
        let id = set.allocate_id();
        set.tasks.push(Task::new(id, description, due_at, priority));
        self.store.save(&set)?;

        Ok(pick(ADD_LINES).to_owned())
    }

    /// List every task with its due time, priority, and status.
    pub fn list(&self) -> Result<String> {
        let set = self.store.load()?;
        if set.tasks.is_empty() {
            return Ok("No tasks. Slacker.".to_owned());
        }

        let mut out = String::from("Your tasks:\n");
        for task in &set.tasks {
            out.push_str(&format!(
                "{}. {} (Due: {}, Priority: {}, {})\n",
                task.id,
                task.description,
                display_due(task),
                task.priority,
                task.status
            ));
        }
        out.push('\n');
        out.push_str(pick(LIST_LINES));
        Ok(out)
    }

    /// Delete a task by identifier.
    pub fn delete(&self, id: u64) -> Result<String> {
        let mut set = self.store.load()?;
        if set.remove(id).is_none() {
            return Ok(format!("No task with ID {id}. Try again."));
        }
        self.store.save(&set)?;
        Ok(pick(DELETE_LINES).to_owned())
    }

    /// Mark a task completed by identifier.
    pub fn complete(&self, id: u64) -> Result<String> {
        let mut set = self.store.load()?;
        let Some(task) = set.find_mut(id) else {
            return Ok(format!("No task with ID {id}. Try again."));
        };
        task.status = crate::task::TaskStatus::Completed;
        self.store.save(&set)?;
        Ok(pick(COMPLETE_LINES).to_owned())
    }

    /// Report currently-due pending tasks. Read-only: does not notify and
    /// does not mutate the store.
    pub fn check_reminders(&self) -> Result<String> {
        let set = self.store.load()?;
        let now = Local::now().naive_local();

        let due: Vec<&Task> = set
            .tasks
            .iter()
            .filter(|t| t.is_pending() && t.due_at().map(|at| at <= now).unwrap_or(false))
            .collect();

        if due.is_empty() {
            return Ok("No tasks due soon. You're on top of things... for now.".to_owned());
        }

        let mut out = String::from("Due tasks:\n");
        for task in due {
            out.push_str(&format!(
                "{}. {} (Due: {}, Priority: {})\n",
                task.id,
                task.description,
                display_due(task),
                task.priority
            ));
        }
        out.push('\n');
        out.push_str(pick(REMINDER_LINES));
        Ok(out)
    }
}

/// Render a due timestamp for display, falling back to the raw string when
/// it does not parse.
fn display_due(task: &Task) -> String {
    task.due_at()
        .map(|at| at.format(DUE_INPUT_FORMAT).to_string())
        .unwrap_or_else(|_| task.due.clone())
}
