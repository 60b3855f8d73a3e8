//! Request shapes for the direct protocol.
//!
//! The service has accepted the index binding in three places over time.
//! Each shape builds the full request body with the binding in one place.

use crate::types::Query;
use docqa_llm::{ResponseRequest, ToolResources, VectorStoreBinding};
use serde_json::Value;

/// One way of attaching the index binding to a direct-protocol request.
pub trait RequestShape: Send + Sync {
    fn name(&self) -> &'static str;

    fn build(&self, query: &Query) -> ResponseRequest;
}

fn base_request(query: &Query) -> ResponseRequest {
    ResponseRequest::new(
        query.model(),
        query.system_instructions(),
        query.user_question(),
    )
}

/// `file_search: {vector_store_ids}` as a top-level request field.
pub struct TopLevelBinding;

impl RequestShape for TopLevelBinding {
    fn name(&self) -> &'static str {
        "top_level_binding"
    }

    fn build(&self, query: &Query) -> ResponseRequest {
        let mut request = base_request(query);
        request.file_search = Some(VectorStoreBinding::single(query.index_id()));
        request
    }
}

/// `tool_resources: {file_search: {vector_store_ids}}`.
pub struct ToolResourcesBinding;

impl RequestShape for ToolResourcesBinding {
    fn name(&self) -> &'static str {
        "tool_resources_binding"
    }

    fn build(&self, query: &Query) -> ResponseRequest {
        let mut request = base_request(query);
        request.tool_resources = Some(ToolResources {
            file_search: VectorStoreBinding::single(query.index_id()),
        });
        request
    }
}

/// `vector_store_ids` merged into the `file_search` tool definition.
pub struct ExtensionBodyBinding;

impl RequestShape for ExtensionBodyBinding {
    fn name(&self) -> &'static str {
        "extension_body_binding"
    }

    fn build(&self, query: &Query) -> ResponseRequest {
        let mut request = base_request(query);
        if let Some(tool) = request.file_search_tool_mut() {
            tool.extension.insert(
                "vector_store_ids".to_string(),
                Value::Array(vec![Value::String(query.index_id().to_string())]),
            );
        }
        request
    }
}

/// Shapes in the order they are attempted.
pub fn default_shapes() -> Vec<Box<dyn RequestShape>> {
    vec![
        Box::new(TopLevelBinding),
        Box::new(ToolResourcesBinding),
        Box::new(ExtensionBodyBinding),
    ]
}
