use std::fmt::Write;

use colored::{ColoredString, Colorize};

use crate::history::{HistoryEntry, time_ago};
use crate::improve::{WeakArea, find_weak_areas, has_room_to_improve};
use crate::report::{CheckStatus, JudgeCategory, ReviewError, ReviewResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_percentage(score: u32) -> Self {
        if score >= 80 {
            ScoreBand::Good
        } else if score >= 50 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }
}

const IMPROVE_STEPS: &[&str] = &[
    "Install tessl: npm install -g tessl",
    "Log in: tessl login",
    "Generate a prompt: skill-health review <URL> --improve",
    "Clone the skill repo and paste the prompt into your coding agent there",
    "Verify with: tessl skill review",
    "Publish: tessl skill publish",
];

/// Plain-text terminal rendering of review results.
pub struct ConsoleRenderer {
    use_colors: bool,
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_score(&self, text: &str, score: u32) -> String {
        match ScoreBand::from_percentage(score) {
            ScoreBand::Good => self.paint(text, |s| s.green()),
            ScoreBand::Fair => self.paint(text, |s| s.yellow()),
            ScoreBand::Poor => self.paint(text, |s| s.red()),
        }
    }

    fn glyph(&self, status: CheckStatus) -> String {
        match status {
            CheckStatus::Pass => self.paint("✔", |s| s.green()),
            CheckStatus::Warn => self.paint("⚠", |s| s.yellow()),
            CheckStatus::Fail => self.paint("✘", |s| s.red()),
        }
    }

    pub fn render(&self, result: &ReviewResult) -> String {
        let mut out = String::new();

        let score = format!("{}%", result.average_score);
        let _ = writeln!(
            out,
            "{} {}",
            self.paint("Average Score:", |s| s.bold()),
            self.paint_score(&score, result.average_score)
        );
        out.push('\n');

        self.render_checks(&mut out, result);

        if !result.judge_categories.is_empty() {
            let _ = writeln!(out, "{}", self.paint("Judge Evaluation", |s| s.bold()));
            for category in &result.judge_categories {
                self.render_category(&mut out, category);
            }
        }

        if has_room_to_improve(result) {
            self.render_weak_areas(&mut out, &find_weak_areas(result));
        }

        out
    }

    fn render_weak_areas(&self, out: &mut String, areas: &[WeakArea]) {
        let plural = if areas.len() == 1 { "" } else { "s" };
        let _ = writeln!(
            out,
            "{} ({} area{plural})",
            self.paint("To improve", |s| s.bold()),
            areas.len()
        );
        for area in areas {
            let _ = writeln!(
                out,
                "  {} {} > {} {}",
                self.paint("●", |s| s.yellow()),
                area.category,
                area.criterion,
                self.paint(&format!("({}/{})", area.score, area.max_score), |s| s.dimmed())
            );
        }
        out.push('\n');

        let _ = writeln!(out, "{}", self.paint("How to improve:", |s| s.bold()));
        for (i, step) in IMPROVE_STEPS.iter().enumerate() {
            let _ = writeln!(out, "  {}. {step}", i + 1);
        }
    }

    fn render_checks(&self, out: &mut String, result: &ReviewResult) {
        let summary = &result.validation_summary;
        let verdict = if summary.passed {
            self.paint("PASSED", |s| s.green())
        } else {
            self.paint("FAILED", |s| s.red())
        };
        let _ = writeln!(
            out,
            "{} {verdict} ({} errors, {} warnings)",
            self.paint("Validation:", |s| s.bold()),
            summary.errors,
            summary.warnings
        );
        for check in &result.validation_checks {
            let _ = writeln!(
                out,
                "  {} {}  {}",
                self.glyph(check.status),
                check.label,
                self.paint(&check.detail, |s| s.dimmed())
            );
        }
        out.push('\n');
    }

    fn render_category(&self, out: &mut String, category: &JudgeCategory) {
        let percentage = format!("{}%", category.percentage);
        let _ = writeln!(
            out,
            "  {} {}",
            self.paint(&category.name, |s| s.bold()),
            self.paint_score(&percentage, category.percentage)
        );
        for criterion in &category.criteria {
            let fraction = format!("{}/{}", criterion.score, criterion.max_score);
            let fraction = if criterion.score >= criterion.max_score {
                self.paint(&fraction, |s| s.green())
            } else {
                self.paint(&fraction, |s| s.yellow())
            };
            let _ = writeln!(
                out,
                "    {} {fraction}  {}",
                criterion.name,
                self.paint(&criterion.explanation, |s| s.dimmed())
            );
        }
        if !category.assessment.is_empty() {
            let _ = writeln!(out, "    Assessment: {}", category.assessment);
        }
        out.push('\n');
    }

    pub fn render_error(&self, error: &ReviewError) -> String {
        let mut out = format!("{} {}\n", self.paint("error:", |s| s.red().bold()), error.message);
        if let Some(ref skills) = error.available_skills
            && !skills.is_empty()
        {
            let _ = writeln!(out, "Available skills: {}", skills.join(", "));
            out.push_str("Re-run with --skill <name> to pick one.\n");
        }
        out
    }

    pub fn render_history(&self, entries: &[HistoryEntry], now: u64) -> String {
        if entries.is_empty() {
            return "No recent reviews.\n".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.paint("Recent reviews", |s| s.bold()));
        for entry in entries {
            let score = format!("{}%", entry.score);
            let _ = writeln!(
                out,
                "  {}  {}  {}",
                entry.url,
                self.paint_score(&score, entry.score),
                self.paint(&time_ago(now, entry.timestamp), |s| s.dimmed())
            );
        }
        out
    }
}
