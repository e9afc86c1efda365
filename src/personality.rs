//! Canned reply lines for the command interface.
//!
//! DONNA answers every command with a line picked at random from a small
//! per-command pool, in the voice of a capable assistant who would rather
//! be doing something else.

use rand::seq::SliceRandom;

/// Replies after a task is added.
pub const ADD_LINES: &[&str] = &[
    "Task added. What's next, world domination?",
    "Noted. Don't expect me to do it for you.",
];

/// Replies appended to a task listing.
pub const LIST_LINES: &[&str] = &[
    "Here's your chaos, neatly listed. You're welcome.",
    "Your to-do list. Try not to cry.",
];

/// Replies after a task is completed.
pub const COMPLETE_LINES: &[&str] = &[
    "Done? Impressive. I'll alert the press.",
    "Task complete. Took you long enough.",
];

/// Replies appended to a due-task report.
pub const REMINDER_LINES: &[&str] = &[
    "You've got a task due soon. Move it!",
    "Reminder: You're not done yet. Shocker.",
];

/// Replies after a task is deleted.
pub const DELETE_LINES: &[&str] = &[
    "Task deleted. Poof, gone!",
    "Erased it. Hope you didn't need that.",
];

/// Picks one line from a pool.
pub fn pick<'a>(pool: &[&'a str]) -> &'a str {
    pool.choose(&mut rand::thread_rng()).copied().unwrap_or("")
}
