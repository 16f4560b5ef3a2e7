//! Typewriter rendering of bot replies.
//!
//! `ChatRenderer` receives every frame of a bot message from
//! `ChatService::send` and prints only what changed since the previous
//! frame. A spinner covers the `Typing` phase until the first character
//! arrives.

use std::io::Write;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use kangbot_types::message::{Message, MessageStatus};

/// What to print to move the screen from `shown` to `text`.
#[derive(Debug, PartialEq)]
pub enum FrameDelta<'a> {
    /// `text` extends `shown`; print the tail.
    Append(&'a str),
    /// `text` is unrelated to what was printed (an apology replacing a
    /// partial reply); print it on a fresh line.
    Replace(&'a str),
}

pub fn frame_delta<'a>(shown: &str, text: &'a str) -> FrameDelta<'a> {
    match text.strip_prefix(shown) {
        Some(tail) => FrameDelta::Append(tail),
        None => FrameDelta::Replace(text),
    }
}

/// Indent continuation lines so multi-line replies stay under the label.
fn indent(s: &str) -> String {
    s.replace('\n', "\n  ")
}

/// Prints one bot reply as it plays back.
pub struct ChatRenderer {
    label: String,
    shown: String,
    spinner: Option<ProgressBar>,
    started: bool,
}

impl ChatRenderer {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            shown: String::new(),
            spinner: None,
            started: false,
        }
    }

    /// Handle one frame. Call with every message `ChatService::send` emits.
    pub fn on_frame(&mut self, message: &Message) {
        match message.status {
            MessageStatus::Typing => self.start_spinner(),
            MessageStatus::Streaming | MessageStatus::Complete => {
                self.stop_spinner();
                if !self.started {
                    print!("\n  {} ", style(&self.label).cyan().bold());
                    self.started = true;
                }

                match frame_delta(&self.shown, &message.text) {
                    FrameDelta::Append(tail) => print!("{}", indent(tail)),
                    FrameDelta::Replace(text) => print!("\n  {}", indent(text)),
                }
                self.shown.clear();
                self.shown.push_str(&message.text);

                if message.status == MessageStatus::Complete {
                    println!();
                }
                let _ = std::io::stdout().flush();
            }
        }
    }

    fn start_spinner(&mut self) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("typing...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print the footer after a reply.
    ///
    /// Format: "| {chars} chars . {time}s"
    pub fn print_stats_footer(&self, elapsed: Duration) {
        let footer = format!(
            "  {} {} chars {} {:.1}s",
            style("|").dim(),
            style(self.shown.chars().count()).dim(),
            style("\u{00b7}").dim(),
            style(elapsed.as_secs_f64()).dim(),
        );
        println!("{footer}");
    }
}

impl Drop for ChatRenderer {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

/// Print a bot notice (login required, session failure) outside a reply.
pub fn print_notice(message: &Message) {
    println!("\n  {} {}\n", style("!").yellow().bold(), style(&message.text).yellow());
}
