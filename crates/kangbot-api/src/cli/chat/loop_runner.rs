//! Main chat loop orchestration.
//!
//! Logs in, starts a session, then alternates between reading a line and
//! either running a slash command or sending the line and playing the reply
//! back. Input is not read again until the reply has finished playing.

use std::time::Instant;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Input;
use tracing::{Instrument, info_span};

use kangbot_observe::attrs;
use kangbot_types::error::ChatError;
use kangbot_types::message::Sender;
use kangbot_types::session::HistoryEntry;

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::{ChatRenderer, print_notice};

/// Label printed in front of bot replies.
pub const BOT_LABEL: &str = "kangbot";

/// Run the interactive chat loop, prompting for a user id when none is given.
pub async fn run_chat_loop(state: &mut AppState, user: Option<String>) -> anyhow::Result<()> {
    let user = match user {
        Some(u) => u,
        None => Input::<String>::new()
            .with_prompt("User ID")
            .interact_text()?,
    };

    login(state, &user).await;

    let mut chat_input =
        ChatInput::new(current_user(state)).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Chat ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };

        let Some(cmd) = commands::parse(&text) else {
            send_turn(state, &text).await;
            continue;
        };

        match cmd {
            ChatCommand::Help => commands::print_help(),
            ChatCommand::Clear => chat_input.clear(),
            ChatCommand::Exit => {
                println!("\n  {}", style("Chat ended.").dim());
                break;
            }
            ChatCommand::New => new_chat(state).await,
            ChatCommand::History(limit) => show_history(state, limit).await,
            ChatCommand::Whoami => match state.chat.whoami().await {
                Ok(profile) => crate::cli::whoami::print_profile(&profile),
                Err(e) => report_error(state, &e),
            },
            ChatCommand::Login(id) => {
                login(state, &id).await;
                chat_input.set_user(current_user(state));
            }
            ChatCommand::Logout => {
                state.chat.logout().await;
                chat_input.set_user(None);
                println!(
                    "\n  {} Logged out. Use {} to continue.\n",
                    style("*").cyan().bold(),
                    style("/login <id>").yellow()
                );
            }
            ChatCommand::Unknown(cmd_name) => {
                println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(cmd_name).dim()
                );
            }
        }
    }

    Ok(())
}

fn current_user(state: &AppState) -> Option<&str> {
    state.chat.session().map(|s| s.user_id.as_str())
}

async fn login(state: &mut AppState, user: &str) {
    match state.chat.login(user).await.cloned() {
        Ok(session) => print_welcome_banner(&state.config.base_url, &session),
        Err(e) => report_error(state, &e),
    }
}

async fn new_chat(state: &mut AppState) {
    match state.chat.new_chat().await.cloned() {
        Ok(session) => {
            println!(
                "\n  {} New session {}\n",
                style("*").cyan().bold(),
                style(session.short_id()).dim()
            );
        }
        Err(e) => report_error(state, &e),
    }
}

/// Send one line and play the reply back.
async fn send_turn(state: &mut AppState, text: &str) {
    let Some(session_id) = state.chat.session().map(|s| s.session_id.clone()) else {
        report_error(state, &ChatError::NoSession);
        return;
    };

    let span = info_span!(attrs::SPAN_CHAT_TURN, { attrs::SESSION_ID } = %session_id);
    let mut renderer = ChatRenderer::new(BOT_LABEL);
    let started = Instant::now();

    let result = state
        .chat
        .send(text, |message| renderer.on_frame(message))
        .instrument(span)
        .await;

    match result {
        Ok(_) => {
            renderer.print_stats_footer(started.elapsed());
            println!();
        }
        Err(e) => {
            drop(renderer);
            report_error(state, &e);
        }
    }
}

async fn show_history(state: &AppState, limit: u32) {
    match state.chat.history(Some(limit)).await {
        Ok(entries) if entries.is_empty() => {
            println!("\n  {} No messages in this session yet.\n", style("i").blue().bold());
        }
        Ok(entries) => {
            println!();
            println!("{}", history_table(&entries));
            println!();
        }
        Err(e) => report_error(state, &e),
    }
}

fn history_table(entries: &[HistoryEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("Who").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for entry in entries {
        let who = match entry.role.parse::<Sender>() {
            Ok(Sender::User) => Cell::new("you").fg(Color::Green),
            Ok(Sender::Bot) => Cell::new(BOT_LABEL).fg(Color::Cyan),
            Err(_) => Cell::new(&entry.role).fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(entry.created_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
            who,
            Cell::new(preview(&entry.content, 80)),
        ]);
    }
    table
}

/// First `max` characters of `text` on one line, with an ellipsis if cut.
fn preview(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}

/// Render a chat failure as a one-line message.
///
/// Failures that already left a bot notice in the conversation print that
/// notice; delivery failures were already shown by the renderer as an
/// apology.
fn report_error(state: &AppState, err: &ChatError) {
    match err {
        ChatError::NotLoggedIn | ChatError::Session(_) => {
            if let Some(notice) = state.chat.conversation().messages().last() {
                print_notice(notice);
            }
            if let ChatError::Session(e) = err {
                println!("  {}\n", style(e).dim());
            }
        }
        ChatError::NoSession => {
            println!(
                "\n  {} No active session. Use {} or {}.\n",
                style("!").yellow().bold(),
                style("/login <id>").yellow(),
                style("/new").yellow()
            );
        }
        ChatError::Delivery(_) => {
            println!("  {}\n", style("Type a message to retry, /exit to quit.").dim());
        }
        ChatError::Auth(_) | ChatError::Conversation(_) => {
            eprintln!("\n  {} {err}\n", style("!").red().bold());
        }
    }
}
