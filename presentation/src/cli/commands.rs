//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for customai-studio
#[derive(Parser, Debug)]
#[command(name = "customai-studio")]
#[command(author, version, about = "Chat with hosted LLMs through custom assistants")]
#[command(long_about = r#"
CustomAI Studio is a terminal chat client for the Groq API.

An assistant is a named system prompt. The built-in "Default" assistant is
always available; more are loaded from the preset directory
(prompts/library/*.txt) or created during a session.

Without a PROMPT an interactive session starts. With a PROMPT a single chat
turn runs and the streamed reply is printed.

The API key is read from (first match wins):
1. --api-key <KEY>
2. GROQ_API_KEY environment variable
3. [api] api_key in the configuration file

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./studio.toml       Project-level config
3. ~/.config/customai-studio/config.toml   Global config

Example:
  customai-studio "Explain ownership in Rust"
  customai-studio -a "Code Reviewer" -m mixtral-8x7b-32768 "Review: fn main() {}"
  customai-studio --generate "a patient chess coach"
"#)]
pub struct Cli {
    /// Prompt for a single chat turn (starts the interactive session if omitted)
    pub prompt: Option<String>,

    /// Model id (see --list-models)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Assistant to chat with
    #[arg(short, long, value_name = "NAME")]
    pub assistant: Option<String>,

    /// Maximum response tokens (snapped to steps of 248, up to the model's limit)
    #[arg(short = 't', long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// Groq API key for this run
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Generate an assistant system prompt from a short description and exit
    #[arg(long, value_name = "INPUT")]
    pub generate: Option<String>,

    /// List available models and exit
    #[arg(long)]
    pub list_models: bool,

    /// List available assistants and exit
    #[arg(long)]
    pub list_assistants: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write logs to a daily rotating file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}
