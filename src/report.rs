use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// One automated structural check printed by the review tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub id: String,
    pub label: String,
    pub status: CheckStatus,
    pub detail: String,
}

/// One scored rubric item. `score <= max_score` is expected but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeCriterion {
    pub name: String,
    pub score: u32,
    pub max_score: u32,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeCategory {
    pub name: String,
    /// As reported by the tool, never recomputed from the criteria.
    pub percentage: u32,
    pub criteria: Vec<JudgeCriterion>,
    pub assessment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub passed: bool,
    pub errors: u32,
    pub warnings: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    pub validation_checks: Vec<ValidationCheck>,
    pub validation_summary: ValidationSummary,
    pub judge_categories: Vec<JudgeCategory>,
    pub average_score: u32,
    /// Sanitized tool output, kept for auditing. Never re-parsed.
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewErrorKind {
    Validation,
    NotFound,
    Timeout,
    SkillNotSpecified,
    Execution,
    Server,
}

impl ReviewErrorKind {
    /// Process exit code used by the CLI for this failure kind.
    pub fn exit_code(self) -> i32 {
        match self {
            ReviewErrorKind::Validation => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewError {
    #[serde(rename = "type")]
    pub kind: ReviewErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_skills: Option<Vec<String>>,
}

impl ReviewError {
    pub fn new(kind: ReviewErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            available_skills: None,
        }
    }
}

impl From<&Error> for ReviewError {
    fn from(err: &Error) -> Self {
        match err {
            Error::Validation(e) => ReviewError::new(ReviewErrorKind::Validation, e.to_string()),
            Error::Timeout(dur) => ReviewError::new(
                ReviewErrorKind::Timeout,
                format!("Review timed out after {} seconds", dur.as_secs()),
            ),
            Error::RepoNotFound => {
                ReviewError::new(ReviewErrorKind::NotFound, "Repository or skill not found")
            }
            Error::SkillNotSpecified { available } => ReviewError {
                kind: ReviewErrorKind::SkillNotSpecified,
                message: "This repository contains multiple skills. Please specify which skill to review."
                    .to_string(),
                available_skills: Some(available.clone()),
            },
            Error::Execution(msg) => ReviewError::new(ReviewErrorKind::Execution, msg.clone()),
            other => ReviewError::new(ReviewErrorKind::Server, other.to_string()),
        }
    }
}

/// Outcome of one review request, either a parsed report or a classified failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewResponse {
    Success(ReviewResult),
    Failure(ReviewError),
}

impl Serialize for ReviewResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ReviewResponse", 2)?;
        match self {
            ReviewResponse::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            ReviewResponse::Failure(error) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}
