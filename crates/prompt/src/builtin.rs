//! Built-in prompt definitions.
//!
//! Workspace files in `.docqa/prompts/` with the same id take precedence.

use crate::types::PromptDefinition;

/// Id of the system instructions used for every question.
pub const QA_SYSTEM: &str = "qa.system";

/// Id of the per-file question used by batch summarization.
pub const SUMMARY_FILE: &str = "summary.file";

/// The exact sentence the model is told to emit when the files hold no answer.
pub const NO_EVIDENCE_SENTENCE: &str = "No direct evidence found in the provided files.";

const QA_SYSTEM_TEMPLATE: &str = r#"You are a retrieval-first assistant for scientific PDFs attached via File Search.

QUERY REFORMULATION (before searching)
- Rewrite the user’s question into 1–4 compact sub-queries with synonyms, expanded acronyms, and constraints (species, region, methods, metrics). Do not show these to the user.

RETRIEVAL
- Always call File Search with your sub-queries; if recall is weak, retry once more broadly.
- Treat retrieved passages as ground truth.

ANSWER FORMAT & CITATION RULES
- Return EXACTLY ONE sentence; concise and precise.
- Include one short verbatim quote from the passage in double quotes (“like this”).
- End the sentence with one citation tag in the form [<filename> p.<page> §<section>].
  * Use the filename reported by File Search (no path).
  * If page/section are unknown, use p.— and §—.
- Never invent page/section/quotes; if nothing relevant is found after the broadened retry, output exactly:
  {{no_evidence}}
"#;

const SUMMARY_FILE_TEMPLATE: &str = r#"Summarize only the file "{{filename}}" and ignore every other file in the index. Return EXACTLY ONE sentence stating what the file is about and its main finding, include one short verbatim quote from "{{filename}}" in double quotes, and end with the citation tag [{{filename}} p.— §—]. If the file cannot be found, output exactly: {{no_evidence}}"#;

/// Look up a built-in prompt by id.
pub fn builtin_prompt(id: &str) -> Option<PromptDefinition> {
    let (title, variables, template) = match id {
        QA_SYSTEM => (
            "Cited one-sentence answers",
            vec!["no_evidence"],
            QA_SYSTEM_TEMPLATE,
        ),
        SUMMARY_FILE => (
            "Per-file summary question",
            vec!["filename", "no_evidence"],
            SUMMARY_FILE_TEMPLATE,
        ),
        _ => return None,
    };

    Some(PromptDefinition {
        id: id.to_string(),
        title: title.to_string(),
        api_version: "1.0".to_string(),
        created_by: "docqa".to_string(),
        variables: variables.into_iter().map(String::from).collect(),
        template: template.to_string(),
    })
}

/// Ids of all built-in prompts.
pub fn builtin_ids() -> &'static [&'static str] {
    &[QA_SYSTEM, SUMMARY_FILE]
}
