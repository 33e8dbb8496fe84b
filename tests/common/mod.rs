#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// A complete `tessl skill review` report with one warning and two judge categories.
pub const SAMPLE_REPORT: &str = "\
Validation Checks

  ✔ skill_md_line_count - SKILL.md line count is 152 (<= 500)
  ✔ frontmatter_valid - YAML frontmatter is valid
  ⚠ allowed_tools_field - 'allowed-tools' contains unusual tool name(s)

Overall: PASSED (0 errors, 1 warnings)

Judge Evaluation

  Description: 100%
    specificity: 3/3 - Lists multiple specific concrete actions
    trigger_term_quality: 3/3 - Includes natural trigger terms

    Assessment: Strong description with clear triggers.

  Content: 67%
    conciseness: 2/3 - Some padding in the overview section
    actionability: 1/3 - Mostly pseudocode rather than runnable commands

    Assessment: Content is useful but verbose.

Average Score: 84%
";

/// A report where every criterion is already at its maximum.
pub const PERFECT_REPORT: &str = "\
  ✔ frontmatter_valid - YAML frontmatter is valid

Overall: PASSED (0 errors, 0 warnings)

  Description: 100%
    specificity: 3/3 - Concrete

Average Score: 100%
";

/// Write an executable bash script standing in for the `tessl` binary.
///
/// The script receives the real arguments; `$ARGS_FILE` in `body` expands to a
/// file next to the script where callers can record them.
pub fn write_fake_tessl(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("tessl");
    let args_file = dir.join("args.txt");
    let script = format!(
        "#!/usr/bin/env bash\nARGS_FILE='{}'\n{body}\n",
        args_file.display()
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Fake `tessl` that records its arguments and prints `report` on stdout.
pub fn write_reporting_tessl(dir: &Path, report: &str) -> PathBuf {
    let report_path = dir.join("report.txt");
    std::fs::write(&report_path, report).unwrap();
    write_fake_tessl(
        dir,
        &format!(
            "echo \"$@\" > \"$ARGS_FILE\"\ncat '{}'",
            report_path.display()
        ),
    )
}

pub fn recorded_args(dir: &Path) -> String {
    std::fs::read_to_string(dir.join("args.txt"))
        .unwrap_or_default()
        .trim()
        .to_string()
}
