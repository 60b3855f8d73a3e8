//! Prompt rendering.

use crate::builtin::{NO_EVIDENCE_SENTENCE, QA_SYSTEM, SUMMARY_FILE};
use crate::loader::load_prompt;
use crate::types::PromptDefinition;
use docqa_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;
use std::path::Path;

/// Render a prompt definition with the given variables.
///
/// `no_evidence` is always available to templates. Rendering is strict: a
/// variable the template references but the caller did not supply is an error.
pub fn render_prompt(
    definition: &PromptDefinition,
    mut variables: HashMap<String, String>,
) -> AppResult<String> {
    tracing::debug!("Rendering prompt: {}", definition.id);

    variables
        .entry("no_evidence".to_string())
        .or_insert_with(|| NO_EVIDENCE_SENTENCE.to_string());

    render_template(&definition.template, &variables)
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

/// System instructions for a question.
///
/// An explicit override is used verbatim; otherwise the `qa.system` prompt
/// (workspace file or built-in) is rendered.
pub fn system_instructions(workspace_path: &Path, override_text: Option<&str>) -> AppResult<String> {
    if let Some(text) = override_text.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(text.to_string());
    }
    let definition = load_prompt(workspace_path, QA_SYSTEM)?;
    render_prompt(&definition, HashMap::new())
}

/// Renders the per-file summary question for one filename.
pub struct SummaryQuestion {
    definition: PromptDefinition,
}

impl SummaryQuestion {
    /// Load the `summary.file` prompt for the workspace.
    pub fn load(workspace_path: &Path) -> AppResult<Self> {
        Ok(Self::from_definition(load_prompt(workspace_path, SUMMARY_FILE)?))
    }

    pub fn from_definition(definition: PromptDefinition) -> Self {
        Self { definition }
    }

    pub fn render(&self, filename: &str) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("filename".to_string(), filename.to_string());
        render_prompt(&self.definition, variables)
    }
}
