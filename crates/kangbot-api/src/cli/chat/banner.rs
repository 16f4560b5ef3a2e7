//! Welcome banner display for chat sessions.

use console::style;

use kangbot_types::session::Session;

/// Print the banner shown when a chat session starts.
pub fn print_welcome_banner(base_url: &str, session: &Session) {
    println!();
    println!("  {} {}", style("*").cyan(), style("kangbot").cyan().bold());
    println!("  {}", style(base_url).dim());
    println!();
    println!("  {}     {}", style("User:").bold(), style(&session.user_id).dim());
    println!("  {}  {}", style("Session:").bold(), style(session.short_id()).dim());
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
