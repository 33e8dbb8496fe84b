use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::process::{ProcessConfig, spawn_and_stream};

pub const DEFAULT_BINARY: &str = "tessl";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
pub const MAX_OUTPUT_BYTES: usize = 1024 * 1024;

static AVAILABLE_SKILLS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Available skills?:\s*(.+)").expect("static regex must compile")
});

static SKILL_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("static regex must compile"));

/// Captured output of a successful review run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesslOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs `tessl skill review` as a child process.
#[derive(Debug, Clone)]
pub struct TesslRunner {
    binary: String,
    timeout: Duration,
}

impl Default for TesslRunner {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY.to_string(), DEFAULT_TIMEOUT)
    }
}

impl TesslRunner {
    pub fn new(binary: String, timeout: Duration) -> Self {
        Self { binary, timeout }
    }

    /// Build the command and arguments for reviewing `repo`.
    pub fn build_command(&self, repo: &str, skill: Option<&str>) -> (String, Vec<String>) {
        let mut args = vec!["skill".to_string(), "review".to_string(), repo.to_string()];

        if let Some(skill) = skill {
            args.push("--skill".to_string());
            args.push(skill.to_string());
        }

        (self.binary.clone(), args)
    }

    /// Run a review and return its raw output, classifying any failure.
    pub async fn review(&self, repo: &str, skill: Option<&str>) -> Result<TesslOutput> {
        let (command, args) = self.build_command(repo, skill);
        info!(repo, skill, "running {command} skill review");

        let config = ProcessConfig {
            command,
            args,
            working_dir: None,
            timeout: Some(self.timeout),
            log_prefix: "tessl".to_string(),
            env: vec![
                ("NO_COLOR".to_string(), "1".to_string()),
                ("FORCE_COLOR".to_string(), "0".to_string()),
                ("CI".to_string(), "true".to_string()),
            ],
            max_output_bytes: Some(MAX_OUTPUT_BYTES),
        };

        let output = match spawn_and_stream(config).await {
            Ok(output) => output,
            Err(Error::Timeout(dur)) => return Err(Error::Timeout(dur)),
            Err(e) => return Err(Error::Execution(e.to_string())),
        };

        let stdout = output.stdout();
        let stderr = output.stderr();

        if output.truncated {
            warn!("tessl output exceeded {MAX_OUTPUT_BYTES} bytes");
            return Err(Error::Execution(format!(
                "review output exceeded {MAX_OUTPUT_BYTES} bytes"
            )));
        }

        if !output.success() {
            let message = match output.signal {
                Some(sig) => format!("tessl killed by signal {sig}"),
                None => format!("tessl exited with code {}", output.exit_code),
            };
            warn!("{message}");
            return Err(classify_failure(&format!("{stdout}\n{stderr}"), message));
        }

        Ok(TesslOutput { stdout, stderr })
    }
}

/// Map the combined output of a failed run onto a specific error.
///
/// A list of available skills (or a request to pick one) wins over a
/// not-found message; anything else becomes `Error::Execution(message)`.
pub fn classify_failure(output: &str, message: String) -> Error {
    let skills = AVAILABLE_SKILLS_RE.captures(output);
    if skills.is_some() || output.contains("multiple skills") || output.contains("specify a skill")
    {
        let available = skills
            .map(|cap| {
                SKILL_SEPARATOR_RE
                    .split(&cap[1])
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        return Error::SkillNotSpecified { available };
    }

    if output.contains("not found") || output.contains("does not exist") || output.contains("404")
    {
        return Error::RepoNotFound;
    }

    Error::Execution(message)
}
