use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

const DEFAULT_IMPROVE: &str = include_str!("default_prompts/improve-skill.md");
const IMPROVE_FILENAME: &str = "improve-skill.md";

/// Variables available to the improve-skill template.
#[derive(Debug, Serialize)]
pub struct ImproveContext<'a> {
    pub fixes: &'a str,
    pub weak_area_count: usize,
    pub average_score: u32,
}

/// Prompt template engine with an embedded default and an optional override directory.
pub struct PromptEngine {
    override_dir: Option<PathBuf>,
}

impl PromptEngine {
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        Self { override_dir }
    }

    /// Load the improve-skill template.
    /// An `improve-skill.md` in `override_dir` takes precedence over the default.
    pub fn load_template(&self) -> Result<String> {
        if let Some(ref dir) = self.override_dir {
            let path = Path::new(dir).join(IMPROVE_FILENAME);
            if path.exists() {
                return std::fs::read_to_string(&path).map_err(|e| {
                    Error::Prompt(format!(
                        "failed to read override template {}: {e}",
                        path.display()
                    ))
                });
            }
        }

        Ok(DEFAULT_IMPROVE.to_string())
    }

    pub fn render_improve(&self, ctx: &ImproveContext<'_>) -> Result<String> {
        let template = self.load_template()?;
        let rendered = render_template(&template, ctx)?;
        Ok(rendered.trim_end().to_string())
    }
}

/// Render a template with `upon`. Unknown variables are errors.
pub fn render_template<S: Serialize>(template: &str, ctx: S) -> Result<String> {
    let mut engine = upon::Engine::new();
    engine
        .add_template("prompt", template)
        .map_err(|e| Error::Prompt(format!("invalid template: {e}")))?;
    engine
        .template("prompt")
        .render(ctx)
        .to_string()
        .map_err(|e| Error::Prompt(format!("failed to render template: {e}")))
}
