//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for ensemble results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the final answer
    Answer,
    /// Every draft with its peer scores, then the final answer
    Full,
    /// JSON output
    Json,
}

/// CLI arguments for llm-ensemble
#[derive(Parser, Debug)]
#[command(name = "llm-ensemble")]
#[command(author, version, about = "Small-model ensemble - draft, peer review, synthesize")]
#[command(long_about = r#"
llm-ensemble asks several small language models the same question and merges
their answers into one.

The process has three stages:
1. Draft Generation: Each configured backend for the task answers in parallel
2. Peer Review: Every backend scores every other backend's draft (0-10)
3. Aggregation: A synthesis backend writes one answer from the scored drafts

Configuration files are loaded from (in priority order):
1. ENSEMBLE_* environment variables
2. --config <path>     Explicit config file
3. ./ensemble.toml     Project-level config
4. ~/.config/llm-ensemble/config.toml   Global config

Example:
  llm-ensemble solve --task math "What is 17 * 23?"
  llm-ensemble solve -t code -o full "Reverse a linked list in Rust"
  llm-ensemble tasks
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the ensemble on one request
    #[command(visible_alias = "ask")]
    Solve {
        /// Task identifier selecting the backends (e.g. math, code, qa)
        #[arg(short, long, default_value = "qa")]
        task: String,

        /// The request to answer
        prompt: String,

        /// Skip the peer review stage
        #[arg(long)]
        no_review: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "answer")]
        output: OutputFormat,
    },

    /// List configured tasks with their labels
    Tasks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_solve() {
        let cli = Cli::parse_from(["llm-ensemble", "-vv", "solve", "-t", "math", "2+2?"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Solve {
                task,
                prompt,
                no_review,
                output,
            }) => {
                assert_eq!(task, "math");
                assert_eq!(prompt, "2+2?");
                assert!(!no_review);
                assert_eq!(output, OutputFormat::Answer);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_ask_alias_with_flags() {
        let cli = Cli::parse_from([
            "llm-ensemble",
            "ask",
            "--no-review",
            "-o",
            "json",
            "Why is the sky blue?",
            "--config",
            "custom.toml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(
            cli.command,
            Some(Command::Solve {
                no_review: true,
                output: OutputFormat::Json,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_show_config_without_command() {
        let cli = Cli::parse_from(["llm-ensemble", "--show-config"]);
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_tasks() {
        let cli = Cli::parse_from(["llm-ensemble", "tasks", "--no-config"]);
        assert!(cli.no_config);
        assert!(matches!(cli.command, Some(Command::Tasks)));
    }
}
