//! # chat-cli
//!
//! `memchat`: argument parsing, config loading, logging and the interactive loop.

pub mod cli;
pub mod config;
pub mod logger;
pub mod repl;

pub use cli::{Cli, Commands};
pub use config::{build_embedder, AppConfig, ConfigOverrides};
