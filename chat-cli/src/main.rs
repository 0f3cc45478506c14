//! memchat: chat with an assistant that remembers the conversation. Config from env
//! (`.env` is loaded first) with a few CLI overrides.

use anyhow::Result;
use chat_cli::{config::AppConfig, logger, repl, Cli, Commands};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.overrides())?;
    logger::init_tracing(&config.log_file)?;

    let session = config.build_session();
    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => repl::run(session).await,
        Commands::Ask { question } => {
            let name = session.settings().assistant_name.clone();
            repl::ask(&session, &name, &question.join(" ")).await
        }
    }
}
