//! Citation extraction for both response shapes.
//!
//! Both extractors skip anything incomplete (missing annotations, missing
//! citation object, missing id, other annotation kinds) and never fail.
//! Output keeps the first occurrence of each file id, in encounter order.

use docqa_llm::{Annotation, PrimaryResult, ThreadMessage};
use std::collections::HashSet;

const MESSAGE_BLOCK: &str = "message";
const OUTPUT_TEXT: &str = "output_text";

/// File ids cited by a direct-protocol result.
pub fn extract_primary_citations(result: &PrimaryResult) -> Vec<String> {
    let ids = result
        .output
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .filter(|block| block.kind.as_deref() == Some(MESSAGE_BLOCK))
        .flat_map(|block| block.content_items())
        .filter(|item| item.kind.as_deref() == Some(OUTPUT_TEXT))
        .flat_map(|item| item.annotations.as_deref().unwrap_or(&[]))
        .filter_map(Annotation::cited_file_id);

    dedupe_ordered(ids)
}

/// File ids cited by the assistant messages of a thread.
pub fn extract_thread_citations(messages: &[ThreadMessage]) -> Vec<String> {
    let ids = messages
        .iter()
        .filter(|message| message.is_assistant())
        .flat_map(|message| message.text_items())
        .flat_map(|text| text.annotations.as_deref().unwrap_or(&[]))
        .filter_map(Annotation::cited_file_id);

    dedupe_ordered(ids)
}

/// Aggregate answer text of a direct-protocol result.
///
/// Uses the top-level `output_text` when present, otherwise joins the text of
/// every `output_text` item in message blocks.
pub fn aggregate_output_text(result: &PrimaryResult) -> String {
    if let Some(text) = result.output_text.as_deref().filter(|t| !t.trim().is_empty()) {
        return text.to_string();
    }

    result
        .output
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .filter(|block| block.kind.as_deref() == Some(MESSAGE_BLOCK))
        .flat_map(|block| block.content_items())
        .filter(|item| item.kind.as_deref() == Some(OUTPUT_TEXT))
        .filter_map(|item| item.text.as_deref())
        .collect::<Vec<_>>()
        .join("")
}

fn dedupe_ordered<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}
