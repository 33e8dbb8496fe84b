use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::prompts::{ImproveContext, PromptEngine};
use crate::report::ReviewResult;

/// A criterion that scored below its maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakArea {
    pub category: String,
    pub criterion: String,
    pub score: u32,
    pub max_score: u32,
    pub explanation: String,
}

struct FixRule {
    keywords: &'static [&'static str],
    instruction: &'static str,
}

// Evaluated top to bottom against the lowercased criterion name.
const FIX_RULES: &[FixRule] = &[
    FixRule {
        keywords: &["specificity"],
        instruction: "Add more concrete, specific details about what the skill does. List specific actions, tools, or outputs instead of vague descriptions.",
    },
    FixRule {
        keywords: &["trigger"],
        instruction: "Add more natural language trigger phrases that users would actually say. Include variations like questions, commands, and descriptions of the task.",
    },
    FixRule {
        keywords: &["completeness"],
        instruction: "Ensure the description clearly answers WHAT the skill does AND WHEN to use it. Add a 'Use when...' clause with specific trigger scenarios.",
    },
    FixRule {
        keywords: &["distinctiveness", "conflict"],
        instruction: "Make the skill's niche clearer. Use specific terminology, tool names, or domain language that distinguishes it from other skills.",
    },
    FixRule {
        keywords: &["conciseness"],
        instruction: "Remove padding and unnecessary explanations. Use tables for reference, and avoid explaining concepts that Claude already knows.",
    },
    FixRule {
        keywords: &["actionability"],
        instruction: "Add fully executable commands and copy-paste ready examples. Replace pseudocode with real, runnable commands.",
    },
    FixRule {
        keywords: &["workflow"],
        instruction: "Add a clear step-by-step workflow section. Number the steps and show the progression from start to finish.",
    },
    FixRule {
        keywords: &["progressive", "disclosure"],
        instruction: "Reorganize content to progress from essential to advanced. Put common use cases first, edge cases and configuration later.",
    },
];

/// An average at or above this needs no improvement prompt.
pub const PERFECT_SCORE: u32 = 100;

/// Whether a report still has something worth improving: the average is below
/// [`PERFECT_SCORE`] and at least one criterion is below its maximum.
pub fn has_room_to_improve(result: &ReviewResult) -> bool {
    result.average_score < PERFECT_SCORE
        && result
            .judge_categories
            .iter()
            .flat_map(|category| &category.criteria)
            .any(|criterion| criterion.score < criterion.max_score)
}

/// Every criterion below its maximum, lowest `score / max_score` first.
///
/// Ratios are compared exactly by cross-multiplication. The sort is stable, so
/// equal ratios keep their report order.
pub fn find_weak_areas(result: &ReviewResult) -> Vec<WeakArea> {
    let mut weak_areas: Vec<WeakArea> = result
        .judge_categories
        .iter()
        .flat_map(|category| {
            category
                .criteria
                .iter()
                .filter(|criterion| criterion.score < criterion.max_score)
                .map(|criterion| WeakArea {
                    category: category.name.clone(),
                    criterion: criterion.name.clone(),
                    score: criterion.score,
                    max_score: criterion.max_score,
                    explanation: criterion.explanation.clone(),
                })
        })
        .collect();

    weak_areas.sort_by(|a, b| {
        let lhs = u64::from(a.score) * u64::from(b.max_score);
        let rhs = u64::from(b.score) * u64::from(a.max_score);
        lhs.cmp(&rhs)
    });
    weak_areas
}

/// Remediation instruction for one weak area: the first keyword rule that
/// matches the criterion name, else a generic instruction quoting the feedback.
pub fn fix_instruction(area: &WeakArea) -> String {
    let criterion = area.criterion.to_lowercase();

    FIX_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| criterion.contains(kw)))
        .map(|rule| rule.instruction.to_string())
        .unwrap_or_else(|| {
            format!(
                "Improve the \"{}\" criterion. Current feedback: {}",
                area.criterion, area.explanation
            )
        })
}

/// Numbered remediation blocks, separated by blank lines.
pub fn format_fixes(areas: &[WeakArea]) -> String {
    areas
        .iter()
        .enumerate()
        .map(|(i, area)| {
            format!(
                "{}. **{} > {}** ({}/{}):\n   {}",
                i + 1,
                area.category,
                area.criterion,
                area.score,
                area.max_score,
                fix_instruction(area)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render the improvement prompt through `engine`. `Ok(None)` when nothing is weak.
pub fn improve_prompt_with(
    result: &ReviewResult,
    engine: &PromptEngine,
) -> Result<Option<String>> {
    let weak_areas = find_weak_areas(result);
    if weak_areas.is_empty() {
        return Ok(None);
    }

    let fixes = format_fixes(&weak_areas);
    let prompt = engine.render_improve(&ImproveContext {
        fixes: &fixes,
        weak_area_count: weak_areas.len(),
        average_score: result.average_score,
    })?;
    Ok(Some(prompt))
}

/// Improvement prompt from the built-in template, or `None` when every
/// criterion is at its maximum.
pub fn generate_improve_prompt(result: &ReviewResult) -> Option<String> {
    improve_prompt_with(result, &PromptEngine::new(None)).unwrap_or_else(|e| {
        warn!("built-in improve template failed: {e}");
        None
    })
}
