//! Prompt loader for YAML prompt definitions.

use crate::builtin::{builtin_ids, builtin_prompt};
use crate::types::{PromptDefinition, PromptEntry, PromptSource};
use docqa_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".docqa/prompts")
}

/// Load a prompt definition by ID.
///
/// A workspace file `.docqa/prompts/<id>.yml` overrides the built-in
/// definition with the same id.
///
/// # Example
/// ```no_run
/// use docqa_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "summary.file")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    if !prompt_file.exists() {
        tracing::debug!("No workspace prompt at {:?}, using built-in", prompt_file);
        return builtin_prompt(prompt_id)
            .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", prompt_id)));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition, prompt_id)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// List built-in prompts and workspace prompt files, sorted by id.
///
/// A workspace file shadowing a built-in is listed once, as `Workspace`.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<PromptEntry>> {
    let mut entries: Vec<PromptEntry> = builtin_ids()
        .iter()
        .map(|id| PromptEntry {
            id: id.to_string(),
            source: PromptSource::Builtin,
        })
        .collect();

    let dir = prompts_dir(workspace_path);
    if dir.exists() {
        for entry in walkdir::WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("yml") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                entries.retain(|e| e.id != stem);
                entries.push(PromptEntry {
                    id: stem.to_string(),
                    source: PromptSource::Workspace,
                });
            }
        }
    }

    entries.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(entries)
}

/// Validate a prompt definition loaded for `expected_id`.
fn validate_prompt(def: &PromptDefinition, expected_id: &str) -> AppResult<()> {
    if def.id != expected_id {
        return Err(AppError::Prompt(format!(
            "Prompt file for '{}' declares id '{}'",
            expected_id, def.id
        )));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{QA_SYSTEM, SUMMARY_FILE};
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, file_id: &str, content: &str) {
        let prompts_dir = dir.join(".docqa/prompts");
        fs::create_dir_all(&prompts_dir).unwrap();
        fs::write(prompts_dir.join(format!("{}.yml", file_id)), content).unwrap();
    }

    fn valid_yaml(id: &str) -> String {
        format!(
            "id: {}\ntitle: \"Custom\"\napiVersion: \"1.0\"\ntemplate: \"Describe {{{{filename}}}}\"\n",
            id
        )
    }

    #[test]
    fn test_builtin_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = load_prompt(temp_dir.path(), SUMMARY_FILE).unwrap();
        assert_eq!(prompt.id, SUMMARY_FILE);
        assert_eq!(prompt.created_by, "docqa");
    }

    #[test]
    fn test_workspace_override() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), SUMMARY_FILE, &valid_yaml(SUMMARY_FILE));

        let prompt = load_prompt(temp_dir.path(), SUMMARY_FILE).unwrap();
        assert_eq!(prompt.title, "Custom");
        assert_eq!(prompt.template, "Describe {{filename}}");
    }

    #[test]
    fn test_unknown_prompt() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            load_prompt(temp_dir.path(), "nonexistent"),
            Err(AppError::Prompt(_))
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), QA_SYSTEM, "invalid: yaml: content:");
        assert!(load_prompt(temp_dir.path(), QA_SYSTEM).is_err());
    }

    #[test]
    fn test_mismatched_id() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), QA_SYSTEM, &valid_yaml("other.id"));
        assert!(load_prompt(temp_dir.path(), QA_SYSTEM).is_err());
    }

    #[test]
    fn test_list_prompts() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), QA_SYSTEM, &valid_yaml(QA_SYSTEM));
        write_prompt(temp_dir.path(), "extra.one", &valid_yaml("extra.one"));

        let prompts = list_prompts(temp_dir.path()).unwrap();
        let ids: Vec<&str> = prompts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["extra.one", QA_SYSTEM, SUMMARY_FILE]);
        assert_eq!(prompts[1].source, PromptSource::Workspace);
        assert_eq!(prompts[2].source, PromptSource::Builtin);
    }
}
