//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for the session and
//! the login.

use console::style;

/// History entries shown by `/history` without an argument.
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat loop.
    Exit,
    /// Start a new session.
    New,
    /// Show stored messages of this session.
    History(u32),
    /// Show the logged-in user.
    Whoami,
    /// Log in as another user and start a new session.
    Login(String),
    /// Drop the token and the session.
    Logout,
    /// Unknown command or bad arguments.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), Some(arg.trim())),
        None => (trimmed.to_lowercase(), None),
    };
    let arg = arg.filter(|a| !a.is_empty());

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/new" => ChatCommand::New,
        "/history" => match arg.map(str::parse::<u32>) {
            None => ChatCommand::History(DEFAULT_HISTORY_LIMIT),
            Some(Ok(n)) if n > 0 => ChatCommand::History(n),
            Some(_) => ChatCommand::Unknown("/history takes a positive number".to_string()),
        },
        "/whoami" | "/me" => ChatCommand::Whoami,
        "/login" => match arg {
            Some(user) => ChatCommand::Login(user.to_string()),
            None => ChatCommand::Unknown("/login requires a user id".to_string()),
        },
        "/logout" => ChatCommand::Logout,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/new", "Start a new session"),
        ("/history [n]", "Show the last messages of this session"),
        ("/whoami", "Show the logged-in user"),
        ("/login <id>", "Log in as another user"),
        ("/logout", "Log out and end the session"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (cmd, what) in rows {
        println!("  {:<14} {}", style(cmd).cyan(), what);
    }
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
