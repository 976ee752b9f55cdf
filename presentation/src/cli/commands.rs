//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the end-of-run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable accuracy lines
    #[default]
    Text,
    /// JSON array of run summaries
    Json,
}

/// CLI arguments for docquorum
#[derive(Parser, Debug)]
#[command(name = "docquorum")]
#[command(author, version, about = "Document council - agents holding disjoint chunks negotiate an answer")]
#[command(long_about = r#"
docquorum splits each question's document among a council of agents. No agent
sees the whole text, so they negotiate over four rounds:

1. Confirm:  each agent answers from its own chunk
2. Exchange: agents read each other's answers and pick peers to follow up on
3. Refine:   agents read their chosen peers' chunks, in every order
4. Decide:   agents vote; ties go to one adjudication call

Configuration files are loaded from (in priority order):
1. DOCQUORUM_* environment variables
2. --config <path>       Explicit config file
3. ./docquorum.toml      Project-level config
4. ~/.config/docquorum/config.toml   Global config

Example:
  docquorum --model deepseek --dataset NovelQA --sample-num 20
  docquorum --model llama --base-url http://127.0.0.1:8000/v1 --agent-num 3
"#)]
pub struct Cli {
    /// Endpoint to use: deepseek (remote) or llama (local)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Dataset to run: DetectiveQA or NovelQA
    #[arg(short, long, value_name = "NAME")]
    pub dataset: Option<String>,

    /// Number of questions to process
    #[arg(long, value_name = "N")]
    pub sample_num: Option<usize>,

    /// Number of agents in the council
    #[arg(long, value_name = "N")]
    pub agent_num: Option<usize>,

    /// Repeat the full run N times
    #[arg(long, value_name = "N")]
    pub repetition_num: Option<usize>,

    /// Agents working at once inside a phase
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// API key for the endpoint
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the endpoint
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Output format for the run summary
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = debug, -vv = trace)
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
}
