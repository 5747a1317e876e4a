//! # Terminal Console
//!
//! Line-oriented stdin/stdout front end. One reader task owns stdin: a line
//! answers the pending prompt if there is one, otherwise it is queued as a
//! command. The printer task renders every console event as it is pushed.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::application::state::ConsoleEvent;
use crate::domain::traits::Prompter;

type PendingAnswer = Arc<Mutex<Option<oneshot::Sender<Option<String>>>>>;

/// Prompts on stdout and waits for the reader task to hand over the next line.
#[derive(Clone, Default)]
pub struct StdinPrompter {
    pending: PendingAnswer,
}

impl StdinPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Empty line takes the default, `-` or end of input declines.
fn interpret(line: Option<String>, default: &str) -> Option<String> {
    let line = line?;
    match line.trim() {
        "-" => None,
        "" => Some(default.to_string()),
        answer => Some(answer.to_string()),
    }
}

#[async_trait]
impl Prompter for StdinPrompter {
    async fn ask(&self, question: &str, default: &str) -> Option<String> {
        let (tx, rx) = oneshot::channel();
        *self.pending.lock().await = Some(tx);
        println!("{} [{}] (\"-\" to cancel)", question, default);
        interpret(rx.await.ok().flatten(), default)
    }
}

/// Reads stdin until EOF. Dropping `commands` on exit ends the main loop.
pub fn spawn_reader(prompter: StdinPrompter, commands: mpsc::UnboundedSender<String>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(line) => line,
                Err(e) => {
                    tracing::error!("Failed to read stdin: {}", e);
                    None
                }
            };

            if let Some(answer) = prompter.pending.lock().await.take() {
                let eof = line.is_none();
                let _ = answer.send(line);
                if eof {
                    break;
                }
                continue;
            }

            let Some(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if commands.send(line.to_string()).is_err() {
                break;
            }
        }
        tracing::info!("Input closed");
    })
}

pub fn spawn_printer(mut events: mpsc::UnboundedReceiver<ConsoleEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                ConsoleEvent::Message(msg) => println!("{}", msg.render()),
                // ANSI clear screen, cursor home
                ConsoleEvent::Cleared => print!("\x1b[2J\x1b[H"),
            }
        }
    })
}
