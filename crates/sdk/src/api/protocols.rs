//! Treatment-protocol endpoints: tags, publishers, and content search.

use crate::client::EkaClient;
use crate::error::EkaResult;
use bytes::Bytes;
use eka_core::types::{ProtocolDocument, ProtocolQuery, Publisher, Tag};
use serde::Serialize;

const TAGS_PATH: &str = "/eka-mcp/protocols/v1/tags";
const PUBLISHERS_BY_TAG_PATH: &str = "/eka-mcp/protocols/v1/publishers/tag";
const SEARCH_PATH: &str = "/eka-mcp/protocols/v1/search";

/// Protocols API for tag discovery, publisher listing, and search.
pub struct ProtocolsApi<'a> {
    client: &'a EkaClient,
}

impl<'a> ProtocolsApi<'a> {
    pub(crate) fn new(client: &'a EkaClient) -> Self {
        Self { client }
    }

    /// Full list of supported condition tags.
    pub async fn tags(&self) -> EkaResult<Vec<Tag>> {
        self.client.http.get(TAGS_PATH).await
    }

    /// Publishers issuing protocols for the given tag.
    pub async fn publishers_by_tag(&self, tag: &str) -> EkaResult<Vec<Publisher>> {
        self.client
            .http
            .get_with_query(PUBLISHERS_BY_TAG_PATH, &[("tag", tag)])
            .await
    }

    /// Search protocol content under confirmed tag/publisher pairs.
    pub async fn search(&self, queries: &[ProtocolQuery]) -> EkaResult<Vec<ProtocolDocument>> {
        let request = ProtocolSearchRequest {
            queries: queries.to_vec(),
        };
        self.client.http.post(SEARCH_PATH, &request).await
    }

    /// Fetch the rendered guideline page a search hit points at.
    pub async fn fetch_document(&self, url: &str) -> EkaResult<Bytes> {
        self.client.http.download(url).await
    }
}

/// Request body for protocol search.
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolSearchRequest {
    pub queries: Vec<ProtocolQuery>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn test_client(server: &MockServer) -> EkaClient {
        EkaClient::builder()
            .api_host(server.uri())
            .client_id("test-client")
            .client_secret("sk-test")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn tags_parses_supported_conditions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eka-mcp/protocols/v1/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "diabetes", "description": "Type 2 diabetes mellitus"},
                {"name": "hypertension", "description": "Essential hypertension"}
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let tags = client.protocols().tags().await.unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "diabetes");
    }

    #[tokio::test]
    async fn publishers_by_tag_sends_tag_as_query_param() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eka-mcp/protocols/v1/publishers/tag"))
            .and(query_param("tag", "diabetes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "pub-icmr", "name": "ICMR", "tag": "diabetes"},
                {"id": "pub-rssdi", "name": "RSSDI", "tag": "diabetes"}
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let publishers = client
            .protocols()
            .publishers_by_tag("diabetes")
            .await
            .unwrap();

        assert_eq!(publishers.len(), 2);
        assert_eq!(publishers[1].name, "RSSDI");
    }

    #[tokio::test]
    async fn search_posts_query_list() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/eka-mcp/protocols/v1/search"))
            .and(body_json(serde_json::json!({
                "queries": [{
                    "query": "first-line therapy",
                    "condition": "diabetes",
                    "publisher_name": "RSSDI"
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "title": "Management of Type 2 Diabetes",
                    "url": "https://cdn.eka.care/protocols/rssdi-t2dm-1.jpeg",
                    "publisher": "RSSDI"
                }
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let documents = client
            .protocols()
            .search(&[ProtocolQuery {
                query: "first-line therapy".to_string(),
                condition: "diabetes".to_string(),
                publisher_name: "RSSDI".to_string(),
            }])
            .await
            .unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].publisher, "RSSDI");
    }
}
