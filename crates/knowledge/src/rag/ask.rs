//! Single-question answering: dispatch, then resolve cited files.

use crate::dispatch::QueryDispatcher;
use crate::rag::types::{AskResponse, SourceRef};
use crate::registry::FileRegistry;
use crate::types::Query;
use docqa_core::AppResult;

/// Answer `query` and resolve display names for up to `max_sources` citations.
pub async fn ask(
    dispatcher: &QueryDispatcher<'_>,
    registry: &FileRegistry<'_>,
    query: &Query,
    max_sources: usize,
) -> AppResult<AskResponse> {
    tracing::info!("Answering question against index {}", query.index_id());

    let result = dispatcher.dispatch(query).await?;

    let mut sources = Vec::new();
    for file_id in result.cited_file_ids().iter().take(max_sources) {
        sources.push(SourceRef {
            file_id: file_id.clone(),
            filename: registry.resolve(file_id).await,
        });
    }

    tracing::info!(
        protocol = result.protocol().as_str(),
        citations = result.cited_file_ids().len(),
        no_evidence = result.is_no_evidence(),
        "Answer ready"
    );

    Ok(AskResponse {
        answer: result.answer_text().to_string(),
        sources,
        file_ids: result.cited_file_ids().to_vec(),
        protocol: result.protocol(),
        no_evidence: result.is_no_evidence(),
        raw: result.raw_payload().clone(),
    })
}
