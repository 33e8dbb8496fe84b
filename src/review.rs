use tracing::info;

use crate::error::Result;
use crate::parser::parse_report;
use crate::report::{ReviewError, ReviewResponse, ReviewResult};
use crate::tessl::TesslRunner;
use crate::validate::{RepoRef, validate_skill_name, validate_url};

/// A finished review together with what was actually reviewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub repo: RepoRef,
    pub skill: Option<String>,
    pub result: ReviewResult,
}

/// Validate the user's input, run the review tool, and parse its stdout.
pub async fn review_repository(
    runner: &TesslRunner,
    url: &str,
    skill: Option<&str>,
) -> Result<ReviewOutcome> {
    let repo = validate_url(url)?;
    let explicit = validate_skill_name(skill.unwrap_or_default())?;
    let skill = repo.effective_skill(explicit);

    let output = runner.review(&repo.normalized, skill.as_deref()).await?;
    let result = parse_report(&output.stdout);
    info!(
        repo = %repo.normalized,
        average_score = result.average_score,
        "review complete"
    );

    Ok(ReviewOutcome { repo, skill, result })
}

/// Fold a review outcome into the response envelope.
pub fn respond(outcome: &Result<ReviewResult>) -> ReviewResponse {
    match outcome {
        Ok(result) => ReviewResponse::Success(result.clone()),
        Err(e) => ReviewResponse::Failure(ReviewError::from(e)),
    }
}
