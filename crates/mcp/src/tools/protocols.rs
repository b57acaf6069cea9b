// Treatment-protocol tools: the three-step confirmation workflow.
//
// Protocol content is only searchable once the client has confirmed a
// supported condition tag and then a publisher listed under that tag.
// Out-of-order calls come back with the valid options for the missing step
// so the client can self-correct.

use crate::protocol::{CallToolResult, ToolContent, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use eka_core::types::{ProtocolQuery, Publisher, SessionId, Tag};
use eka_core::workflow::{PublisherOutcome, SessionStore, TagOutcome, WorkflowError};
use eka_sdk::EkaClient;
use serde::Deserialize;
use std::sync::Arc;

/// Shared state for the protocol tools: the API client, the tag list
/// fetched at startup, and per-session confirmation state.
pub struct ProtocolWorkflow {
    client: EkaClient,
    supported_tags: Vec<Tag>,
    sessions: SessionStore,
}

impl ProtocolWorkflow {
    pub fn new(client: EkaClient, supported_tags: Vec<Tag>) -> Self {
        Self {
            client,
            supported_tags,
            sessions: SessionStore::new(),
        }
    }

    pub fn supported_tags(&self) -> &[Tag] {
        &self.supported_tags
    }

    fn tag_names(&self) -> String {
        self.supported_tags
            .iter()
            .map(|tag| tag.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn publisher_names(publishers: &[Publisher]) -> String {
        publishers
            .iter()
            .map(|publisher| publisher.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Tool to confirm a condition tag, the first step of the workflow
pub struct ProtocolTagsTool {
    workflow: Arc<ProtocolWorkflow>,
    session: SessionId,
}

impl ProtocolTagsTool {
    pub fn new(workflow: Arc<ProtocolWorkflow>, session: SessionId) -> Self {
        Self { workflow, session }
    }
}

#[derive(Debug, Deserialize)]
struct ProtocolTagsArgs {
    tag: String,
}

#[async_trait::async_trait]
impl Tool for ProtocolTagsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "protocol_tags".to_string(),
            description: format!(
                "Confirm the clinical condition tag to query treatment protocols for. \
                 Must be called before protocol_publishers and search_protocols. \
                 Supported tags: {}",
                self.workflow.tag_names()
            ),
            input_schema: json_schema_object(
                serde_json::json!({
                    "tag": json_schema_string("The condition tag to confirm, like 'diabetes'")
                }),
                vec!["tag"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: ProtocolTagsArgs =
            serde_json::from_value(arguments).context("Invalid arguments for protocol_tags")?;

        let outcome = self.workflow.sessions.confirm_tag(
            &self.session,
            &args.tag,
            self.workflow.supported_tags(),
        );

        match outcome {
            TagOutcome::Confirmed(tag) => {
                let json = serde_json::to_string_pretty(&tag)?;
                Ok(CallToolResult::text(format!(
                    "Confirmed tag '{}'. Choose a publisher with protocol_publishers next.\n\n{}",
                    tag.name, json
                )))
            }
            TagOutcome::Unknown { supported } => Ok(CallToolResult::error(format!(
                "'{}' is not a supported tag. Supported tags: {}",
                args.tag,
                supported
                    .iter()
                    .map(|tag| tag.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

/// Tool to confirm a publisher for the confirmed tag, the second step
pub struct ProtocolPublishersTool {
    workflow: Arc<ProtocolWorkflow>,
    session: SessionId,
}

impl ProtocolPublishersTool {
    pub fn new(workflow: Arc<ProtocolWorkflow>, session: SessionId) -> Self {
        Self { workflow, session }
    }
}

#[derive(Debug, Deserialize)]
struct ProtocolPublishersArgs {
    publisher: String,
}

#[async_trait::async_trait]
impl Tool for ProtocolPublishersTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "protocol_publishers".to_string(),
            description: "Confirm the publisher whose protocols should be searched. \
                          Requires a tag confirmed via protocol_tags; the publisher must \
                          be one listed for that tag."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "publisher": json_schema_string("The publisher to confirm, like 'ICMR' or 'RSSDI'")
                }),
                vec!["publisher"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: ProtocolPublishersArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for protocol_publishers")?;

        let Some(tag) = self.workflow.sessions.confirmed_tag(&self.session) else {
            return Ok(CallToolResult::error(format!(
                "no tag confirmed yet; call protocol_tags first. Supported tags: {}",
                self.workflow.tag_names()
            )));
        };

        let available = self
            .workflow
            .client
            .protocols()
            .publishers_by_tag(&tag.name)
            .await?;

        let outcome = self
            .workflow
            .sessions
            .confirm_publisher(&self.session, &args.publisher, &available)
            .map_err(|err| anyhow::anyhow!(err))?;

        match outcome {
            PublisherOutcome::Confirmed(publisher) => {
                let json = serde_json::to_string_pretty(&publisher)?;
                Ok(CallToolResult::text(format!(
                    "Confirmed publisher '{}' for tag '{}'. Search content with search_protocols next.\n\n{}",
                    publisher.name, tag.name, json
                )))
            }
            PublisherOutcome::Unknown { available } => Ok(CallToolResult::error(format!(
                "'{}' does not publish protocols for tag '{}'. Valid publishers: {}",
                args.publisher,
                tag.name,
                ProtocolWorkflow::publisher_names(&available)
            ))),
        }
    }
}

/// Tool to search protocol content, the final step
pub struct SearchProtocolsTool {
    workflow: Arc<ProtocolWorkflow>,
    session: SessionId,
}

impl SearchProtocolsTool {
    pub fn new(workflow: Arc<ProtocolWorkflow>, session: SessionId) -> Self {
        Self { workflow, session }
    }

    /// Render search hits, inlining each guideline page as a JPEG. A page
    /// that fails to download is surfaced as text rather than dropped.
    async fn render_documents(
        &self,
        documents: Vec<eka_core::types::ProtocolDocument>,
    ) -> Vec<ToolContent> {
        let mut content = Vec::with_capacity(documents.len());
        for document in documents {
            match self
                .workflow
                .client
                .protocols()
                .fetch_document(&document.url)
                .await
            {
                Ok(bytes) => {
                    content.push(ToolContent::image(BASE64.encode(&bytes), "image/jpeg"));
                }
                Err(err) => {
                    tracing::error!(url = %document.url, error = %err, "failed to fetch protocol page");
                    content.push(ToolContent::text(format!(
                        "Could not fetch protocol page '{}' ({})",
                        document.title, document.url
                    )));
                }
            }
        }
        content
    }
}

#[derive(Debug, Deserialize)]
struct SearchProtocolsArgs {
    query: String,
}

#[async_trait::async_trait]
impl Tool for SearchProtocolsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search_protocols".to_string(),
            description: format!(
                "Search treatment-protocol content for the confirmed tag and publisher. \
                 Requires protocol_tags and protocol_publishers to have been confirmed \
                 first. Supported tags: {}",
                self.workflow.tag_names()
            ),
            input_schema: json_schema_object(
                serde_json::json!({
                    "query": json_schema_string("Concise and exact sentence to search. Do not use when, where, how, etc.")
                }),
                vec!["query"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: SearchProtocolsArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for search_protocols")?;

        let (tag, publisher) = match self.workflow.sessions.query_context(&self.session) {
            Ok(context) => context,
            Err(WorkflowError::TagNotConfirmed) => {
                return Ok(CallToolResult::error(format!(
                    "no tag confirmed yet; call protocol_tags first. Supported tags: {}",
                    self.workflow.tag_names()
                )));
            }
            Err(WorkflowError::PublisherNotConfirmed { tag }) => {
                let available = self
                    .workflow
                    .client
                    .protocols()
                    .publishers_by_tag(&tag)
                    .await?;
                return Ok(CallToolResult::error(format!(
                    "no publisher confirmed for tag '{}'; call protocol_publishers first. \
                     Valid publishers: {}",
                    tag,
                    ProtocolWorkflow::publisher_names(&available)
                )));
            }
        };

        let documents = self
            .workflow
            .client
            .protocols()
            .search(&[ProtocolQuery {
                query: args.query,
                condition: tag.name.clone(),
                publisher_name: publisher.name.clone(),
            }])
            .await?;

        if documents.is_empty() {
            return Ok(CallToolResult::text(format!(
                "No protocols from {} matched under tag '{}'",
                publisher.name, tag.name
            )));
        }

        Ok(CallToolResult {
            content: self.render_documents(documents).await,
            is_error: None,
        })
    }
}
