// ABOUTME: Entry point for the dotchat terminal chat
// ABOUTME: Handles CLI args, config loading, and TUI launch

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dotchat_core::mock::{seed_messages, MOCK_RESPONSE};
use dotchat_core::{AgentService, ChatSession, Config, Credentials, MockStreamer, ModelSelection};
use dotchat_tui::app::App;
use dotchat_tui::types::Responder;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "dotchat")]
#[command(about = "Terminal chat interface for the Polkadot agent kit")]
#[command(version)]
struct Args {
    /// Use the canned offline response instead of the agent
    #[arg(long, env = "DOTCHAT_MOCK")]
    mock: bool,

    /// Model id to start with (see `dotchat models`)
    #[arg(short, long, env = "DOTCHAT_MODEL")]
    model: Option<String>,

    /// Config file (defaults to ~/.config/dotchat/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Send a message non-interactively and print the reply
    Send {
        /// The message to send
        message: String,
    },
    /// List the models offered by the selector
    Models {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a starter config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match &args.command {
        Some(Command::Send { message }) => {
            dotchat_log::init();
            let config = load_config(&args)?;
            return dotchat_tui::cli::send::run(&config, message, args.mock).await;
        }
        Some(Command::Models { json }) => {
            let config = load_config(&args)?;
            return dotchat_tui::cli::models::run(&config.llm.model, *json);
        }
        Some(Command::Init { force }) => {
            let path = args.config.clone().unwrap_or_else(Config::config_path);
            return dotchat_tui::cli::init::run(&path, *force);
        }
        None => {}
    }

    dotchat_log::init_file("tui");
    let config = load_config(&args)?;
    let models = ModelSelection::new(Some(&config.llm.model));
    let session = ChatSession::from_profile(&config.profile);
    let mock = || {
        MockStreamer::new(
            MOCK_RESPONSE,
            config.stream.fragment,
            config.stream.tick(),
        )
    };

    let (tx, rx) = mpsc::unbounded_channel();

    let app = if args.mock {
        let history = seed_messages(session.user(), session.assistant());
        App::new(
            session.with_history(history),
            Responder::Mock(mock()),
            models,
            tx,
        )
    } else {
        match Credentials::from_env().and_then(|c| AgentService::from_config(&config, &c)) {
            Ok(agent) => App::new(session, Responder::Live(Arc::new(agent)), models, tx),
            Err(e) => {
                tracing::error!(error = %e, "Agent unavailable");
                App::new(session, Responder::Mock(mock()), models, tx).with_fatal(e.to_string())
            }
        }
    };

    dotchat_tui::run::run(app, rx).await
}
