use crate::report::{JudgeCategory, JudgeCriterion, ReviewResult, ValidationSummary};

/// Create a `JudgeCriterion` with a generated explanation for tests.
pub fn make_criterion(name: &str, score: u32, max_score: u32) -> JudgeCriterion {
    JudgeCriterion {
        name: name.to_string(),
        score,
        max_score,
        explanation: format!("{name} explanation"),
    }
}

pub fn make_category(name: &str, percentage: u32, criteria: Vec<JudgeCriterion>) -> JudgeCategory {
    JudgeCategory {
        name: name.to_string(),
        percentage,
        criteria,
        assessment: String::new(),
    }
}

/// Wrap categories in an otherwise empty `ReviewResult`.
pub fn make_result(judge_categories: Vec<JudgeCategory>) -> ReviewResult {
    ReviewResult {
        validation_checks: vec![],
        validation_summary: ValidationSummary {
            passed: true,
            errors: 0,
            warnings: 0,
        },
        judge_categories,
        average_score: 0,
        raw: String::new(),
    }
}
