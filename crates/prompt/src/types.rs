//! Prompt types for DocQA.

use serde::{Deserialize, Serialize};

/// A prompt definition, either built in or loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Variables the template expects
    #[serde(default)]
    pub variables: Vec<String>,

    /// Template string with Handlebars syntax
    pub template: String,
}

/// Where a prompt definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptSource {
    Builtin,
    Workspace,
}

/// Entry of a prompt listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptEntry {
    pub id: String,
    pub source: PromptSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: summary.file
title: Per-file summary
apiVersion: "1.0"
variables: [filename]
template: "Summarize {{filename}}"
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "summary.file");
        assert_eq!(def.variables, vec!["filename".to_string()]);
        assert_eq!(def.created_by, "");
    }
}
