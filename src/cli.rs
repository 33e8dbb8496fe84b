use clap::{Args, Parser, Subcommand};

/// skill-health: review tessl skills and turn the report into structured results
#[derive(Parser, Debug, Clone)]
#[command(name = "skill-health", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Path to config file (default: .skill-health.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// tessl binary to run (default: tessl)
    #[arg(long, global = true)]
    pub tessl_binary: Option<String>,

    /// Review timeout in seconds (default: 120)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Directory holding the review history file
    #[arg(long, global = true)]
    pub history_dir: Option<String>,

    /// Directory with prompt template overrides (improve-skill.md)
    #[arg(long, global = true)]
    pub prompt_dir: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Run `tessl skill review` against a GitHub repository
    Review {
        /// GitHub URL (https://github.com/user/repo) or shorthand (github:user/repo)
        url: String,

        /// Skill to review when the repository contains several
        #[arg(long)]
        skill: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Parse a saved review report (reads stdin when FILE is omitted or "-")
    Parse {
        file: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List recent reviews
    History,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputArgs {
    /// Print the JSON response envelope instead of the rendered report
    #[arg(long)]
    pub json: bool,

    /// Print an improvement prompt for the weakest criteria
    #[arg(long, conflicts_with = "json")]
    pub improve: bool,
}
