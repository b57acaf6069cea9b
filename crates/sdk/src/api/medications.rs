//! Medication endpoints: corpus search and interaction checks.

use crate::client::EkaClient;
use crate::error::EkaResult;
use eka_core::types::{Drug, Interaction};
use serde::Serialize;

const SEARCH_PATH: &str = "/eka-mcp/medications/v1/search";
const INTERACTION_PATH: &str = "/eka-mcp/medications/v1/interaction";

/// Medications API for drug lookup and interaction checks.
pub struct MedicationsApi<'a> {
    client: &'a EkaClient,
}

impl<'a> MedicationsApi<'a> {
    pub(crate) fn new(client: &'a EkaClient) -> Self {
        Self { client }
    }

    /// Search the medication corpus by branded name or generic composition.
    pub async fn search(&self, query: &DrugQuery) -> EkaResult<Vec<Drug>> {
        self.client.http.get_with_query(SEARCH_PATH, query).await
    }

    /// Check two generic compositions for a known interaction.
    pub async fn interactions(
        &self,
        composition_a: &str,
        composition_b: &str,
    ) -> EkaResult<Vec<Interaction>> {
        let request = InteractionRequest {
            compositions: vec![composition_a.to_string(), composition_b.to_string()],
        };
        self.client.http.post(INTERACTION_PATH, &request).await
    }
}

/// Query parameters for medication search.
///
/// At least one of `name` / `generic_composition` should be set; the tool
/// layer enforces that before calling.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DrugQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_composition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
}

impl DrugQuery {
    /// Query by branded drug name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Query by generic composition.
    pub fn by_composition(composition: impl Into<String>) -> Self {
        Self {
            generic_composition: Some(composition.into()),
            ..Default::default()
        }
    }

    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    pub fn with_volume(mut self, volume: impl Into<String>) -> Self {
        self.volume = Some(volume.into());
        self
    }
}

/// Request body for the interaction endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionRequest {
    pub compositions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use eka_core::types::Severity;
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
    async fn search_sends_name_and_optional_filters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eka-mcp/medications/v1/search"))
            .and(query_param("name", "Paracetamol"))
            .and(query_param("form", "Tablet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "name": "Dolo 650",
                    "generic_composition": "Paracetamol",
                    "manufacturer": "Micro Labs",
                    "form": "Tablet",
                    "volume": "650"
                }
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let drugs = client
            .medications()
            .search(&DrugQuery::by_name("Paracetamol").with_form("Tablet"))
            .await
            .unwrap();

        assert_eq!(drugs.len(), 1);
        assert_eq!(drugs[0].generic_composition, "Paracetamol");
        assert!(!drugs[0].generic_composition.is_empty());
    }

    #[tokio::test]
    async fn interactions_posts_both_compositions() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/eka-mcp/medications/v1/interaction"))
            .and(body_json(serde_json::json!({
                "compositions": ["Warfarin", "Aspirin"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"drug_a": "Warfarin", "drug_b": "Aspirin", "severity": "X"}
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let interactions = client
            .medications()
            .interactions("Warfarin", "Aspirin")
            .await
            .unwrap();

        assert_eq!(interactions.len(), 1);
        assert_eq!(interactions[0].severity, Severity::X);
    }
}
