//! File id to display name resolution.

use docqa_llm::FilesApi;

/// Resolves file ids to display filenames. Lookup failures are never fatal.
pub struct FileRegistry<'a> {
    files: &'a dyn FilesApi,
}

impl<'a> FileRegistry<'a> {
    pub fn new(files: &'a dyn FilesApi) -> Self {
        Self { files }
    }

    /// Display name for a file id, or the id itself if the lookup fails or
    /// the file has no name.
    pub async fn resolve(&self, file_id: &str) -> String {
        match self.files.retrieve_file(file_id).await {
            Ok(file) => match file.filename.filter(|name| !name.trim().is_empty()) {
                Some(name) => name,
                None => {
                    tracing::debug!("File {} has no filename, using its id", file_id);
                    file_id.to_string()
                }
            },
            Err(e) => {
                tracing::warn!("Lookup of file {} failed, using its id: {}", file_id, e);
                file_id.to_string()
            }
        }
    }

    /// Resolve several ids, preserving order.
    pub async fn resolve_all(&self, file_ids: &[String]) -> Vec<String> {
        let mut names = Vec::with_capacity(file_ids.len());
        for file_id in file_ids {
            names.push(self.resolve(file_id).await);
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::stubs::StubFiles;

    #[tokio::test]
    async fn test_resolve_known_file() {
        let files = StubFiles::new().with_file("f_1", Some("paperA.pdf"));
        let registry = FileRegistry::new(&files);
        assert_eq!(registry.resolve("f_1").await, "paperA.pdf");
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_id() {
        let files = StubFiles::new()
            .with_file("f_unnamed", None)
            .with_file("f_blank", Some("  "));
        let registry = FileRegistry::new(&files);

        assert_eq!(registry.resolve("f_missing").await, "f_missing");
        assert_eq!(registry.resolve("f_unnamed").await, "f_unnamed");
        assert_eq!(registry.resolve("f_blank").await, "f_blank");
    }

    #[tokio::test]
    async fn test_resolve_all_keeps_order() {
        let files = StubFiles::new()
            .with_file("f_1", Some("a.pdf"))
            .with_file("f_3", Some("c.pdf"));
        let registry = FileRegistry::new(&files);

        let ids = vec!["f_3".to_string(), "f_2".to_string(), "f_1".to_string()];
        assert_eq!(registry.resolve_all(&ids).await, vec!["c.pdf", "f_2", "a.pdf"]);
    }
}
