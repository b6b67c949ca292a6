use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use fileagent::agent::{Agent, DEFAULT_MAX_ROUNDS};
use fileagent::file_tools::FileTools;
use fileagent::logging;
use fileagent::prompt::{CliclackPrompt, Input};
use fileagent::providers::configs::groq::GroqProviderConfig;
use fileagent::providers::groq::GroqProvider;

/// AI Code Assistant - a conversational AI agent with file editing capabilities
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Groq API key (can also be set via GROQ_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Model to use (defaults to GROQ_MODEL, then the built-in model)
    #[arg(short, long)]
    model: Option<String>,

    /// Seconds to wait for each model response
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Tool rounds allowed in a single turn
    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    max_rounds: usize,

    /// File that receives the log
    #[arg(long, default_value = "agent.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    logging::init(&cli.log_file)?;

    let mut config = GroqProviderConfig::load(cli.api_key)?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    let provider = GroqProvider::new(config)?;
    info!(model = provider.model(), "provider ready");

    let tools = FileTools::new().context("failed to resolve the working directory")?;
    let mut agent =
        Agent::new(Box::new(provider), Box::new(tools)).with_max_rounds(cli.max_rounds);

    let mut prompt = CliclackPrompt::new();
    prompt.banner();

    loop {
        match prompt.get_input()? {
            Input::Exit => {
                prompt.goodbye();
                break;
            }
            Input::AskAgain => continue,
            Input::Help => prompt.help(),
            Input::Reset => {
                agent.reset();
                prompt.note("Conversation reset.");
            }
            Input::Message(text) => {
                let start = agent.messages().len();

                prompt.show_busy();
                let result = agent.chat(&text);
                prompt.hide_busy();

                prompt.render_tool_uses(&agent.messages()[start..]);
                match result {
                    Ok(reply) => prompt.render_reply(&reply),
                    Err(e) => prompt.render_error(&e),
                }
            }
        }
    }
    Ok(())
}
