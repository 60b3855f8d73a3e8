//! Enumeration of every file attached to an index.

use crate::registry::FileRegistry;
use crate::types::IndexedFile;
use docqa_core::{AppError, AppResult};
use docqa_llm::FilesApi;
use std::collections::HashSet;

/// Files requested per listing page.
pub const PAGE_SIZE: u32 = 100;

/// Walks the paginated file listing of an index and resolves display names.
pub struct IndexLister<'a> {
    files: &'a dyn FilesApi,
    page_size: u32,
}

impl<'a> IndexLister<'a> {
    pub fn new(files: &'a dyn FilesApi) -> Self {
        Self {
            files,
            page_size: PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Every file attached to `index_id`, in listing order.
    ///
    /// A failed page fetch fails the whole listing. A failed name lookup
    /// does not; the file id stands in for the name.
    pub async fn list_files(&self, index_id: &str) -> AppResult<Vec<IndexedFile>> {
        if index_id.trim().is_empty() {
            return Err(AppError::ConfigurationMissing(
                "Vector store ID is empty".to_string(),
            ));
        }

        let file_ids = self.list_file_ids(index_id).await?;
        tracing::info!("Index {} has {} files", index_id, file_ids.len());

        let registry = FileRegistry::new(self.files);
        let mut files = Vec::with_capacity(file_ids.len());
        for file_id in file_ids {
            let filename = registry.resolve(&file_id).await;
            files.push(IndexedFile { file_id, filename });
        }

        Ok(files)
    }

    async fn list_file_ids(&self, index_id: &str) -> AppResult<Vec<String>> {
        let mut ids = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut page_number = 0usize;

        loop {
            page_number += 1;
            let page = self
                .files
                .list_index_files(index_id, self.page_size, cursor.as_deref())
                .await?;

            tracing::debug!(
                page = page_number,
                entries = page.data.len(),
                has_more = page.has_more,
                "Fetched index file page"
            );

            if page.data.is_empty() {
                break;
            }

            let next_cursor = page
                .last_id
                .clone()
                .filter(|id| !id.is_empty())
                .or_else(|| page.data.last().map(|entry| entry.id.clone()));

            for entry in page.data {
                if seen.insert(entry.id.clone()) {
                    ids.push(entry.id);
                }
            }

            if !page.has_more {
                break;
            }

            // A cursor that does not move would loop forever
            match next_cursor {
                Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
                _ => {
                    tracing::warn!(
                        "Listing of index {} reported more pages without a new cursor",
                        index_id
                    );
                    break;
                }
            }
        }

        Ok(ids)
    }
}
