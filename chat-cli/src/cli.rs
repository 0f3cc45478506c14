//! CLI parser.

use clap::{Parser, Subcommand};

use crate::config::ConfigOverrides;

#[derive(Parser)]
#[command(name = "memchat")]
#[command(about = "Chat assistant that remembers the conversation", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Maximum number of memories kept (overrides MEMORY_MAX_SIZE).
    #[arg(long, global = true)]
    pub max_memory: Option<usize>,

    /// Memories recalled per question (overrides MEMORY_TOP_K).
    #[arg(long, global = true)]
    pub top_k: Option<usize>,

    /// Log file path (overrides LOG_FILE).
    #[arg(long, global = true)]
    pub log_file: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Interactive chat (default).
    Chat,
    /// Ask a single question and print the answer.
    Ask {
        /// The question; words are joined with spaces.
        #[arg(required = true)]
        question: Vec<String>,
    },
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            max_memory: self.max_memory,
            top_k: self.top_k,
            log_file: self.log_file.clone(),
        }
    }
}
