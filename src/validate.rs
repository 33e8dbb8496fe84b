use std::sync::LazyLock;

use regex::Regex;

const MAX_URL_LEN: usize = 500;
const MAX_SKILL_NAME_LEN: usize = 100;

static SKILL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("static regex must compile"));

// github:user/repo
static GITHUB_SHORTHAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^github:([a-zA-Z0-9_.-]+/[a-zA-Z0-9_.-]+)$").expect("static regex must compile")
});

// https://github.com/user/repo with an optional deeper path
static GITHUB_HTTPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://github\.com/([a-zA-Z0-9_.-]+/[a-zA-Z0-9_.-]+)(?:/.*)?$")
        .expect("static regex must compile")
});

// /blob/<ref>/skills/<name>/SKILL.md or /tree/<ref>/skills/<name>
static SKILL_FROM_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:blob|tree)/[^/]+/skills/([a-zA-Z0-9_-]+)").expect("static regex must compile")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("URL is required")]
    UrlRequired,

    #[error("URL is too long")]
    UrlTooLong,

    #[error(
        "Must be a GitHub URL (https://github.com/user/repo) or shorthand (github:user/repo)"
    )]
    UnsupportedUrl,

    #[error("Skill name is too long")]
    SkillNameTooLong,

    #[error("Skill name may only contain letters, numbers, hyphens, and underscores")]
    InvalidSkillName,
}

/// A repository reference accepted by the review tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Always in `github:owner/repo` form.
    pub normalized: String,
    /// Skill name taken from a `/blob/.../skills/<name>` style deep link.
    pub extracted_skill: Option<String>,
}

impl RepoRef {
    /// The skill to review: an explicit name wins over one found in the URL.
    pub fn effective_skill(&self, explicit: Option<String>) -> Option<String> {
        explicit.or_else(|| self.extracted_skill.clone())
    }
}

pub fn validate_url(input: &str) -> Result<RepoRef, ValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::UrlRequired);
    }
    if trimmed.chars().count() > MAX_URL_LEN {
        return Err(ValidationError::UrlTooLong);
    }

    if GITHUB_SHORTHAND_RE.is_match(trimmed) {
        return Ok(RepoRef {
            normalized: trimmed.to_string(),
            extracted_skill: None,
        });
    }

    if let Some(cap) = GITHUB_HTTPS_RE.captures(trimmed) {
        let extracted_skill = SKILL_FROM_PATH_RE
            .captures(trimmed)
            .map(|skill| skill[1].to_string());
        return Ok(RepoRef {
            normalized: format!("github:{}", &cap[1]),
            extracted_skill,
        });
    }

    Err(ValidationError::UnsupportedUrl)
}

/// Validate an optional skill name. Blank input means "no skill given".
pub fn validate_skill_name(input: &str) -> Result<Option<String>, ValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_SKILL_NAME_LEN {
        return Err(ValidationError::SkillNameTooLong);
    }
    if !SKILL_NAME_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidSkillName);
    }

    Ok(Some(trimmed.to_string()))
}
