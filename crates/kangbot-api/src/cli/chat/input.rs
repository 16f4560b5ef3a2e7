//! Async readline input for the chat loop.
//!
//! Wraps `rustyline_async::Readline`. The prompt names the logged-in user
//! and is refreshed on login and logout.

use console::style;
use rustyline_async::{Readline, ReadlineError, ReadlineEvent};

/// Events produced by the input handler.
#[derive(Debug)]
pub enum InputEvent {
    /// User submitted a non-empty line, trimmed.
    Message(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

/// Prompt for `user`, or a logged-out prompt.
pub fn prompt_for(user: Option<&str>) -> String {
    match user {
        Some(user) => format!("  {} ", style(format!("{user} >")).green().bold()),
        None => format!("  {} ", style("(logged out) >").dim()),
    }
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    pub fn new(user: Option<&str>) -> Result<Self, ReadlineError> {
        // Output goes through plain stdout; the returned writer is not needed
        // because nothing prints while a line is being read.
        let (rl, _writer) = Readline::new(prompt_for(user))?;
        Ok(Self { rl })
    }

    pub fn set_user(&mut self, user: Option<&str>) {
        let _ = self.rl.update_prompt(&prompt_for(user));
    }

    /// Read the next non-empty line. Read errors are treated as EOF.
    pub async fn read_line(&mut self) -> InputEvent {
        loop {
            match self.rl.readline().await {
                Ok(ReadlineEvent::Line(line)) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        return InputEvent::Message(trimmed.to_string());
                    }
                }
                Ok(ReadlineEvent::Eof) | Err(_) => return InputEvent::Eof,
                Ok(ReadlineEvent::Interrupted) => return InputEvent::Interrupted,
            }
        }
    }

    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }
}
