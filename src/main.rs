use std::io::Read;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use skill_health::cli::{Cli, CliCommand, OutputArgs};
use skill_health::config::Config;
use skill_health::error::Result;
use skill_health::history::{HistoryStore, unix_now};
use skill_health::improve::{PERFECT_SCORE, improve_prompt_with};
use skill_health::parser::parse_report;
use skill_health::prompts::PromptEngine;
use skill_health::render::ConsoleRenderer;
use skill_health::report::{ReviewError, ReviewResult};
use skill_health::review::{respond, review_repository};
use skill_health::tessl::TesslRunner;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn read_report(file: Option<&str>) -> Result<String> {
    match file {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

/// Print a review outcome in the requested format and return the exit code.
fn emit(
    config: &Config,
    renderer: &ConsoleRenderer,
    outcome: Result<ReviewResult>,
    output: &OutputArgs,
) -> i32 {
    if output.json {
        let response = respond(&outcome);
        return match serde_json::to_string_pretty(&response) {
            Ok(json) => {
                println!("{json}");
                match outcome {
                    Ok(_) => 0,
                    Err(ref e) => ReviewError::from(e).kind.exit_code(),
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                1
            }
        };
    }

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            let review_err = ReviewError::from(&e);
            eprint!("{}", renderer.render_error(&review_err));
            return review_err.kind.exit_code();
        }
    };

    if output.improve {
        if result.average_score >= PERFECT_SCORE {
            eprintln!("Score is already {PERFECT_SCORE}%; nothing to improve.");
            return 0;
        }
        let engine = PromptEngine::new(config.prompt_dir.clone());
        return match improve_prompt_with(&result, &engine) {
            Ok(Some(prompt)) => {
                println!("{prompt}");
                0
            }
            Ok(None) => {
                eprintln!("No weak areas found; nothing to improve.");
                0
            }
            Err(e) => {
                eprintln!("error: {e}");
                1
            }
        };
    }

    print!("{}", renderer.render(&result));
    0
}

async fn run_review(
    config: &Config,
    renderer: &ConsoleRenderer,
    url: &str,
    skill: Option<&str>,
    output: &OutputArgs,
) -> i32 {
    let runner = TesslRunner::new(config.tessl_binary.clone(), config.timeout);
    let outcome = review_repository(&runner, url, skill).await;

    if let Ok(ref done) = outcome {
        let store = HistoryStore::new(&config.history_dir, config.history_limit);
        if let Err(e) = store.record(url.trim(), done.result.average_score) {
            warn!("failed to record review history: {e}");
        }
    }

    emit(config, renderer, outcome.map(|done| done.result), output)
}

fn run_parse(
    config: &Config,
    renderer: &ConsoleRenderer,
    file: Option<&str>,
    output: &OutputArgs,
) -> i32 {
    let outcome = read_report(file).map(|raw| parse_report(&raw));
    emit(config, renderer, outcome, output)
}

fn run_history(config: &Config, renderer: &ConsoleRenderer) -> i32 {
    let store = HistoryStore::new(&config.history_dir, config.history_limit);
    print!(
        "{}",
        renderer.render_history(&store.load().entries, unix_now())
    );
    0
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match Config::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    debug!(?config, "config loaded");

    let renderer = if config.color {
        ConsoleRenderer::new()
    } else {
        ConsoleRenderer::new().without_colors()
    };

    let code = match cli.command {
        CliCommand::Review { url, skill, output } => {
            run_review(&config, &renderer, &url, skill.as_deref(), &output).await
        }
        CliCommand::Parse { file, output } => {
            run_parse(&config, &renderer, file.as_deref(), &output)
        }
        CliCommand::History => run_history(&config, &renderer),
    };

    std::process::exit(code);
}
