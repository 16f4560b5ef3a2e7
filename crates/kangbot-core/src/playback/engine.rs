//! Chunk playback engine.
//!
//! A queue plus one drain task per bot reply. Each drain step pops one
//! character, appends it to the accumulated text and publishes that text on
//! a watch channel. While more characters are queued the task sleeps a fixed
//! interval between steps; when the queue runs dry it idles until the next
//! enqueue.
//!
//! Completion is signalled explicitly: [`PlaybackEngine::finish`] closes the
//! queue and awaits a oneshot that the drain task resolves only after the
//! last queued character has been published.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::trace;

use kangbot_types::config::PlaybackConfig;

/// Whether the drain task currently has work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Draining,
}

/// Drains queued characters into a growing frame at a fixed cadence.
///
/// Must be created inside a tokio runtime.
pub struct PlaybackEngine {
    queue: mpsc::UnboundedSender<char>,
    /// Characters enqueued but not yet published.
    pending: Arc<AtomicUsize>,
    frames: watch::Receiver<String>,
    done: oneshot::Receiver<String>,
    task: JoinHandle<()>,
}

impl PlaybackEngine {
    /// Spawn the drain task for one reply.
    pub fn start(config: &PlaybackConfig) -> Self {
        let (queue, rx) = mpsc::unbounded_channel();
        let (frame_tx, frames) = watch::channel(String::new());
        let (done_tx, done) = oneshot::channel();
        let pending = Arc::new(AtomicUsize::new(0));

        let task = tokio::spawn(drain_loop(
            rx,
            frame_tx,
            done_tx,
            Arc::clone(&pending),
            config.char_interval(),
        ));

        Self {
            queue,
            pending,
            frames,
            done,
            task,
        }
    }

    /// Append one character to the tail of the queue.
    pub fn enqueue(&self, chunk: char) {
        self.pending.fetch_add(1, Ordering::AcqRel);
        if self.queue.send(chunk).is_err() {
            // Drain task is gone; nothing will ever publish this character.
            self.pending.fetch_sub(1, Ordering::AcqRel);
        }
    }

    pub fn enqueue_str(&self, chunk: &str) {
        for c in chunk.chars() {
            self.enqueue(c);
        }
    }

    pub fn state(&self) -> PlaybackState {
        if self.pending.load(Ordering::Acquire) > 0 {
            PlaybackState::Draining
        } else {
            PlaybackState::Idle
        }
    }

    /// Receiver for the accumulated text, updated after every drain step.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.frames.clone()
    }

    /// Latest published text.
    pub fn current(&self) -> String {
        self.frames.borrow().clone()
    }

    /// Close the queue and wait until every queued character is drained.
    ///
    /// Returns the final accumulated text.
    pub async fn finish(self) -> String {
        let Self {
            queue,
            frames,
            done,
            ..
        } = self;
        drop(queue);

        match done.await {
            Ok(text) => text,
            // Drain task panicked; return what it managed to publish.
            Err(_) => frames.borrow().clone(),
        }
    }

    /// Abandon playback immediately. Queued characters are discarded.
    pub fn abort(self) {
        self.task.abort();
    }
}

async fn drain_loop(
    mut rx: mpsc::UnboundedReceiver<char>,
    frames: watch::Sender<String>,
    done: oneshot::Sender<String>,
    pending: Arc<AtomicUsize>,
    interval: Duration,
) {
    let mut accumulated = String::new();

    while let Some(c) = rx.recv().await {
        accumulated.push(c);
        frames.send_replace(accumulated.clone());

        // fetch_sub returns the count before this character was retired.
        let remaining = pending.fetch_sub(1, Ordering::AcqRel) - 1;
        if remaining > 0 {
            tokio::time::sleep(interval).await;
        } else {
            trace!(chars = accumulated.chars().count(), "Playback queue idle");
        }
    }

    let _ = done.send(accumulated);
}
