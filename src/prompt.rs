use anyhow::Result;
use bat::WrappingMode;
use cliclack::{input, spinner, ProgressBar};
use console::style;
use std::io;
use tracing::warn;

use crate::errors::AgentError;
use crate::models::message::{Message, Role};

const THEME: &str = "zenburn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Ask the user for input again
    AskAgain,
    Exit,
    Reset,
    Help,
    Message(String),
}

pub fn parse_input(raw: &str) -> Input {
    let text = raw.trim();
    if text.is_empty() {
        Input::AskAgain
    } else if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
        Input::Exit
    } else if text.eq_ignore_ascii_case("/reset") {
        Input::Reset
    } else if text == "/?" || text.eq_ignore_ascii_case("/help") {
        Input::Help
    } else {
        Input::Message(text.to_string())
    }
}

/// Terminal front end: line input, a spinner while the model works, and
/// markdown rendering of replies
pub struct CliclackPrompt {
    spinner: ProgressBar,
}

impl CliclackPrompt {
    pub fn new() -> Self {
        CliclackPrompt { spinner: spinner() }
    }

    pub fn banner(&self) {
        println!("{}", style("AI Code Assistant").bold());
        println!("================");
        println!("A conversational AI agent that can read, list, and edit files.");
        println!(
            "Type 'exit' or 'quit' to end the conversation. {}",
            style("(/? for help)").dim()
        );
        println!();
    }

    pub fn help(&self) {
        println!("Commands:");
        println!("exit, quit - End the session");
        println!("/reset - Forget the conversation so far");
        println!("/? - Display this help message");
    }

    pub fn goodbye(&self) {
        println!("Goodbye!");
    }

    pub fn note(&self, text: &str) {
        println!("{}", style(text).dim());
    }

    pub fn get_input(&mut self) -> Result<Input> {
        match input("You:").placeholder("").interact::<String>() {
            Ok(text) => Ok(parse_input(&text)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(Input::Exit),
            Err(e) => Err(e.into()),
        }
    }

    pub fn show_busy(&mut self) {
        self.spinner = spinner();
        self.spinner.start("awaiting reply");
    }

    pub fn hide_busy(&self) {
        self.spinner.stop("");
    }

    /// Show the tool requests the model made during a turn
    pub fn render_tool_uses(&self, messages: &[Message]) {
        let tool_uses = messages
            .iter()
            .filter(|message| message.role == Role::Assistant)
            .flat_map(|message| message.content.iter())
            .filter_map(|action| action.as_tool_use());

        for (tool_name, tool_input) in tool_uses {
            let pretty = serde_json::to_string_pretty(tool_input)
                .unwrap_or_else(|_| tool_input.to_string());
            let printed = bat::PrettyPrinter::new()
                .input(
                    bat::Input::from_bytes(pretty.as_bytes())
                        .name(format!("Tool Request: {}", tool_name)),
                )
                .theme(THEME)
                .language("JSON")
                .grid(true)
                .header(true)
                .wrapping_mode(WrappingMode::Character)
                .print();
            if let Err(e) = printed {
                warn!(error = %e, "failed to render tool request");
                println!("Tool Request: {}\n{}", tool_name, pretty);
            }
        }
    }

    /// Render the reply as markdown, or as plain text if highlighting fails
    pub fn render_reply(&self, reply: &str) {
        println!("{}", style("Assistant:").cyan().bold());
        let printed = bat::PrettyPrinter::new()
            .input_from_bytes(reply.as_bytes())
            .theme(THEME)
            .language("Markdown")
            .wrapping_mode(WrappingMode::Character)
            .print();
        if let Err(e) = printed {
            warn!(error = %e, "failed to render reply");
            print!("{}", reply);
        }
        println!("\n");
    }

    pub fn render_error(&self, error: &AgentError) {
        eprintln!("{} {}", style("Error:").red().bold(), error);
        eprintln!();
    }
}

impl Default for CliclackPrompt {
    fn default() -> Self {
        Self::new()
    }
}
