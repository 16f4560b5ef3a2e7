//! `kbot ask`: one-shot message with typewriter output.

use std::time::Instant;

use anyhow::Result;
use tracing::{Instrument, info_span};

use kangbot_observe::attrs;

use crate::cli::chat::loop_runner::BOT_LABEL;
use crate::cli::chat::renderer::ChatRenderer;
use crate::state::AppState;

pub async fn ask(state: &mut AppState, user: &str, message: &str, json: bool, quiet: bool) -> Result<()> {
    let session = state.chat.login(user).await?.clone();
    let span = info_span!(
        attrs::SPAN_CHAT_TURN,
        { attrs::SESSION_ID } = %session.session_id,
        { attrs::USER_ID } = %session.user_id,
    );

    if json || quiet {
        let reply = state.chat.send(message, |_| {}).instrument(span).await?;
        if json {
            let out = serde_json::json!({
                "user_id": session.user_id,
                "session_id": session.session_id,
                "reply": reply.text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            println!("{}", reply.text);
        }
        return Ok(());
    }

    let mut renderer = ChatRenderer::new(BOT_LABEL);
    let started = Instant::now();
    state
        .chat
        .send(message, |frame| renderer.on_frame(frame))
        .instrument(span)
        .await?;
    renderer.print_stats_footer(started.elapsed());
    Ok(())
}
