//! Terminal side of the presentation layer
//!
//! Confirmation prompts read a line from the input, notifications and task
//! lines are colored with `colored`.

use crate::models::{Stats, Task};
use crate::notify::{ConfirmationGate, Notification, NotificationSink, Severity};
use colored::Colorize;
use std::io::{self, BufRead, Stderr, StdinLock, Write};
use tracing::debug;

/// Asks `[y/N]` questions on a line-based reader
pub struct PromptGate<R, W> {
    input: R,
    output: W,
    assume_yes: bool,
}

impl PromptGate<StdinLock<'static>, Stderr> {
    pub fn stdio(assume_yes: bool) -> Self {
        Self::new(io::stdin().lock(), io::stderr(), assume_yes)
    }
}

impl<R: BufRead, W: Write> PromptGate<R, W> {
    pub fn new(input: R, output: W, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            assume_yes,
        }
    }

    fn ask(&mut self, prompt: &str) -> io::Result<bool> {
        write!(self.output, "{} [y/N] ", prompt.bold())?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

impl<R: BufRead, W: Write> ConfirmationGate for PromptGate<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            debug!(prompt, "Auto-confirmed");
            return true;
        }

        // An unreadable answer is a no
        self.ask(prompt).unwrap_or(false)
    }
}

/// Prints notifications, one per line
pub struct ConsoleSink<W> {
    output: W,
}

impl ConsoleSink<Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }
}

impl<W: Write> NotificationSink for ConsoleSink<W> {
    fn notify(&mut self, notification: Notification) {
        let line = match notification.severity {
            Severity::Success => format!("✓ {}", notification.message).green(),
            Severity::Error => format!("✗ {}", notification.message).red(),
            Severity::Info => format!("i {}", notification.message).cyan(),
            Severity::Warning => format!("! {}", notification.message).yellow(),
        };
        let _ = writeln!(self.output, "{}", line);
    }
}

/// One list row: checkbox, id, text
pub fn format_task(task: &Task) -> String {
    if task.completed {
        format!("[{}] {:>13}  {}", "x".green(), task.id, task.text.dimmed().strikethrough())
    } else {
        format!("[ ] {:>13}  {}", task.id, task.text)
    }
}

pub fn format_stats(stats: &Stats) -> String {
    format!(
        "{} total, {} completed, {} pending",
        stats.total.to_string().bold(),
        stats.completed.to_string().green(),
        stats.pending.to_string().yellow()
    )
}
