// Medication tools: corpus lookup and pairwise interaction checks

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use eka_core::types::Drug;
use eka_sdk::api::DrugQuery;
use eka_sdk::EkaClient;
use serde::Deserialize;

/// Tool to resolve branded names or generic compositions against the
/// medication corpus
pub struct MedicationUnderstandingTool {
    client: EkaClient,
}

impl MedicationUnderstandingTool {
    pub fn new(client: EkaClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct MedicationUnderstandingArgs {
    #[serde(default)]
    drug_name: Option<String>,
    #[serde(default)]
    generic_composition: Option<String>,
    #[serde(default)]
    form: Option<String>,
    #[serde(default)]
    volume: Option<String>,
}

#[async_trait::async_trait]
impl Tool for MedicationUnderstandingTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "medication_understanding".to_string(),
            description: "Search the medication corpus by branded drug name or generic \
                          composition. Returns matching drugs with their generic \
                          composition, manufacturer, form, and volume."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "drug_name": json_schema_string("Branded name of the medicine, like 'Glim 1mg'"),
                    "generic_composition": json_schema_string("Generic composition, like 'Glimepiride'; compound generics comma separated"),
                    "form": json_schema_string("Form of the medicine, like 'Tablet' or 'Syrup'"),
                    "volume": json_schema_string("Volume or strength, like '650'")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: MedicationUnderstandingArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for medication_understanding")?;

        let mut query = match (args.drug_name, args.generic_composition) {
            (Some(name), _) => DrugQuery::by_name(name),
            (None, Some(composition)) => DrugQuery::by_composition(composition),
            (None, None) => {
                return Ok(CallToolResult::error(
                    "invalid arguments: provide drug_name or generic_composition",
                ))
            }
        };
        if let Some(form) = args.form {
            query = query.with_form(form);
        }
        if let Some(volume) = args.volume {
            query = query.with_volume(volume);
        }

        let drugs = self.client.medications().search(&query).await?;
        if drugs.is_empty() {
            return Ok(CallToolResult::text(
                "No drugs matched the given name or composition",
            ));
        }

        let json = serde_json::to_string_pretty(&drugs)?;
        Ok(CallToolResult::text(format!(
            "Found {} drug(s):\n\n{}",
            drugs.len(),
            json
        )))
    }
}

/// Tool to check two drugs for a known interaction
pub struct MedicationInteractionTool {
    client: EkaClient,
}

impl MedicationInteractionTool {
    pub fn new(client: EkaClient) -> Self {
        Self { client }
    }

    /// Resolve a branded name to its corpus entry; `None` when the corpus
    /// has no match.
    async fn resolve(&self, name: &str) -> Result<Option<Drug>> {
        let drugs = self
            .client
            .medications()
            .search(&DrugQuery::by_name(name))
            .await?;
        Ok(drugs.into_iter().next())
    }
}

#[derive(Debug, Deserialize)]
struct MedicationInteractionArgs {
    drug_name_a: String,
    drug_name_b: String,
}

#[async_trait::async_trait]
impl Tool for MedicationInteractionTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "medication_interaction".to_string(),
            description: "Check two drugs for a known interaction. Each drug name is \
                          resolved to its generic composition first; the result carries \
                          a severity code (X, A, B, C, D)."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "drug_name_a": json_schema_string("First drug name, like 'Bencid tablet'"),
                    "drug_name_b": json_schema_string("Second drug name, like 'Fluvir 75Mg capsule'")
                }),
                vec!["drug_name_a", "drug_name_b"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: MedicationInteractionArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for medication_interaction")?;

        // Never guess a composition; an unresolvable drug is a hard stop.
        let Some(drug_a) = self.resolve(&args.drug_name_a).await? else {
            return Ok(CallToolResult::error(format!(
                "drug not found: '{}'",
                args.drug_name_a
            )));
        };
        let Some(drug_b) = self.resolve(&args.drug_name_b).await? else {
            return Ok(CallToolResult::error(format!(
                "drug not found: '{}'",
                args.drug_name_b
            )));
        };

        let interactions = self
            .client
            .medications()
            .interactions(&drug_a.generic_composition, &drug_b.generic_composition)
            .await?;

        if interactions.is_empty() {
            return Ok(CallToolResult::text(format!(
                "No known interaction between {} and {}",
                drug_a.generic_composition, drug_b.generic_composition
            )));
        }

        let json = serde_json::to_string_pretty(&interactions)?;
        Ok(CallToolResult::text(format!(
            "Found {} interaction(s):\n\n{}",
            interactions.len(),
            json
        )))
    }
}
