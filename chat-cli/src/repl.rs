//! Interactive loop: slash commands and chat turns.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chat_session::{ChatSession, SessionError, TranscriptFormat};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

pub const DEFAULT_TRANSCRIPT_PATH: &str = "chat_history.txt";

const HELP: &str = "\
Commands:
  /clear                 start a new chat (forgets everything)
  /save [path] [--json]  save the transcript (default chat_history.txt)
  /status                show how many items are in memory
  /help                  show this help
  /quit                  leave";

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Clear,
    Save { path: PathBuf, format: TranscriptFormat },
    Status,
    Help,
    Quit,
    Message(String),
    Unknown(String),
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        if !line.starts_with('/') {
            return ReplCommand::Message(line.to_string());
        }
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        match command {
            "/clear" | "/new" => ReplCommand::Clear,
            "/status" => ReplCommand::Status,
            "/help" => ReplCommand::Help,
            "/quit" | "/exit" => ReplCommand::Quit,
            "/save" => {
                let mut path = None;
                let mut json = false;
                for arg in parts {
                    if arg == "--json" {
                        json = true;
                    } else if path.is_none() {
                        path = Some(PathBuf::from(arg));
                    }
                }
                let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_TRANSCRIPT_PATH));
                let format = if json {
                    TranscriptFormat::Json
                } else {
                    TranscriptFormat::from_path(&path)
                };
                ReplCommand::Save { path, format }
            }
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}

/// Sends one message with a busy indicator and prints the reply (or the apology).
pub async fn ask(session: &ChatSession, assistant_name: &str, text: &str) -> Result<()> {
    print!("Thinking...");
    std::io::stdout().flush()?;
    let result = session.send(text).await;
    print!("\r{}\r", " ".repeat("Thinking...".len()));
    match result {
        Ok(reply) => println!("{}: {}\n", assistant_name, reply),
        Err(SessionError::EmptyInput) => {}
        Err(SessionError::Llm(e)) => {
            println!("{}: Sorry, I encountered an error: {:#}\n", assistant_name, e)
        }
        Err(e) => println!("{}: Sorry, I encountered an error: {}\n", assistant_name, e),
    }
    Ok(())
}

/// Runs until `/quit` or end of input.
pub async fn run(session: ChatSession) -> Result<()> {
    let name = session.settings().assistant_name.clone();
    println!("{} is ready. Type /help for commands.\n", name);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match ReplCommand::parse(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Message(text) => ask(&session, &name, &text).await?,
            ReplCommand::Clear => {
                session.clear().await;
                println!("Started a new chat.\n");
            }
            ReplCommand::Status => {
                println!("Items in memory: {}\n", session.memory_len().await);
            }
            ReplCommand::Save { path, format } => {
                if session.transcript().await.is_empty() {
                    println!("No chat history to save.\n");
                    continue;
                }
                match session.save_transcript(&path, format).await {
                    Ok(()) => println!("Saved to {}\n", path.display()),
                    Err(e) => {
                        warn!(error = %e, path = %path.display(), "transcript save failed");
                        println!("Could not save transcript: {}\n", e);
                    }
                }
            }
            ReplCommand::Help => println!("{}\n", HELP),
            ReplCommand::Unknown(command) => {
                println!("Unknown command {}. Type /help.\n", command);
            }
            ReplCommand::Quit => break,
        }
    }
    info!("step: repl finished");
    Ok(())
}
