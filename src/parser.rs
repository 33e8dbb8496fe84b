use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::report::{
    CheckStatus, JudgeCategory, JudgeCriterion, ReviewResult, ValidationCheck, ValidationSummary,
};

static CSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[a-zA-Z]").expect("static regex must compile"));

static OSC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\].*?\x07").expect("static regex must compile"));

// `  ✔ skill_md_line_count - SKILL.md line count is 152 (<= 500)`
static CHECK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*([✔✓⚠✘✗×])\x{FE0F}?[ \t]+(\S+)[ \t]+-[ \t]+(.+)$")
        .expect("static regex must compile")
});

// `  Description: 100%`
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^ {2}([A-Za-z0-9_][A-Za-z0-9_ ]*?):[ \t]*([0-9]+)%")
        .expect("static regex must compile")
});

// `    specificity: 3/3 - Lists multiple specific actions`
static CRITERION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^ {4}([A-Za-z0-9_]+):[ \t]*([0-9]+)/([0-9]+)[ \t]*-[ \t]*(.+)$")
        .expect("static regex must compile")
});

static ASSESSMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Assessment:\s*(.+?)(?:\n\n|\n\s{2}[A-Za-z0-9_]|\z)")
        .expect("static regex must compile")
});

static AVERAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Average Score:\s*([0-9]+)%").expect("static regex must compile")
});

static OVERALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Overall:\s*(PASSED|FAILED)").expect("static regex must compile")
});

/// Checks found in a report plus the derived failure/warning counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckExtraction {
    pub checks: Vec<ValidationCheck>,
    pub errors: u32,
    pub warnings: u32,
}

/// Start of a judge category section, as found by the first pass.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SectionAnchor {
    name: String,
    percentage: u32,
    start: usize,
}

/// Strip ANSI CSI (`ESC [ ... letter`) and OSC (`ESC ] ... BEL`) sequences.
///
/// Removal repeats until nothing changes, so a sequence spliced together by an
/// earlier removal is stripped too and the result is always a fixpoint.
pub fn sanitize(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let without_csi = CSI_RE.replace_all(&current, "");
        let cleaned = OSC_RE.replace_all(&without_csi, "").into_owned();
        if cleaned.len() == current.len() {
            return cleaned;
        }
        current = cleaned;
    }
}

fn glyph_status(glyph: &str) -> CheckStatus {
    match glyph {
        "✔" | "✓" => CheckStatus::Pass,
        "⚠" => CheckStatus::Warn,
        _ => CheckStatus::Fail,
    }
}

/// Collect validation check lines in order of appearance.
pub fn extract_checks(text: &str) -> CheckExtraction {
    let mut extraction = CheckExtraction::default();

    for cap in CHECK_RE.captures_iter(text) {
        let status = glyph_status(&cap[1]);
        match status {
            CheckStatus::Pass => {}
            CheckStatus::Warn => extraction.warnings += 1,
            CheckStatus::Fail => extraction.errors += 1,
        }

        let id = cap[2].to_string();
        extraction.checks.push(ValidationCheck {
            label: id.replace('_', " "),
            id,
            status,
            detail: cap[3].trim().to_string(),
        });
    }

    extraction
}

fn find_category_anchors(text: &str) -> Vec<SectionAnchor> {
    HEADER_RE
        .captures_iter(text)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            // HEADER_RE cannot match `/` today. Criterion lines (`N/N`) stay
            // excluded here even if the header pattern is loosened.
            if whole.as_str().contains('/') {
                return None;
            }
            Some(SectionAnchor {
                name: cap[1].trim().to_string(),
                percentage: cap[2].parse().ok()?,
                start: whole.start(),
            })
        })
        .collect()
}

fn extract_criteria(section: &str) -> Vec<JudgeCriterion> {
    CRITERION_RE
        .captures_iter(section)
        .filter_map(|cap| {
            Some(JudgeCriterion {
                name: cap[1].replace('_', " "),
                score: cap[2].parse().ok()?,
                max_score: cap[3].parse().ok()?,
                explanation: cap[4].trim().to_string(),
            })
        })
        .collect()
}

fn extract_assessment(section: &str) -> String {
    ASSESSMENT_RE
        .captures(section)
        .map(|cap| cap[1].trim().to_string())
        .unwrap_or_default()
}

/// Collect judge categories and the criteria nested under each.
///
/// Headers are located first; each category then owns the text up to the next
/// header (or the end of the input), and its criteria and assessment are
/// searched only within that slice.
pub fn extract_categories(text: &str) -> Vec<JudgeCategory> {
    let anchors = find_category_anchors(text);

    anchors
        .iter()
        .enumerate()
        .map(|(i, anchor)| {
            let end = anchors.get(i + 1).map_or(text.len(), |next| next.start);
            let section = &text[anchor.start..end];
            JudgeCategory {
                name: anchor.name.clone(),
                percentage: anchor.percentage,
                criteria: extract_criteria(section),
                assessment: extract_assessment(section),
            }
        })
        .collect()
}

/// The `Average Score: N%` value, or 0 when the line is missing.
pub fn extract_average_score(text: &str) -> u32 {
    AVERAGE_RE
        .captures(text)
        .and_then(|cap| cap[1].parse().ok())
        .unwrap_or(0)
}

/// The tool's own `Overall: PASSED|FAILED` verdict, if printed.
pub fn extract_overall_verdict(text: &str) -> Option<bool> {
    OVERALL_RE
        .captures(text)
        .map(|cap| cap[1].eq_ignore_ascii_case("PASSED"))
}

/// Parse a raw review report into a `ReviewResult`.
///
/// Never fails: text without any recognizable lines produces an empty result
/// with a score of 0.
pub fn parse_report(raw: &str) -> ReviewResult {
    let clean = sanitize(raw);

    let CheckExtraction {
        checks,
        errors,
        warnings,
    } = extract_checks(&clean);
    let passed = extract_overall_verdict(&clean).unwrap_or(errors == 0);
    let judge_categories = extract_categories(&clean);
    let average_score = extract_average_score(&clean);

    debug!(
        checks = checks.len(),
        errors,
        warnings,
        categories = judge_categories.len(),
        average_score,
        "parsed review report"
    );

    ReviewResult {
        validation_checks: checks,
        validation_summary: ValidationSummary {
            passed,
            errors,
            warnings,
        },
        judge_categories,
        average_score,
        raw: clean,
    }
}
