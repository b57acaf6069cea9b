//! Basic SDK usage example.
//!
//! This example demonstrates how to connect to the Eka API, look up a
//! medication, and walk the tag → publisher → search protocol workflow.
//!
//! Run with: cargo run --example basic_usage

use eka_sdk::api::DrugQuery;
use eka_sdk::{EkaClient, EkaResult, ProtocolQuery};
use std::time::Duration;

#[tokio::main]
async fn main() -> EkaResult<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    // Build the client with configuration
    let client = EkaClient::builder()
        .api_host("https://api.eka.care")
        .client_id("your-client-id")
        .client_secret("your-client-secret")
        .timeout(Duration::from_secs(30))
        .build()?;

    // Look up a medication by branded name
    println!("Searching the medication corpus...");
    let drugs = client
        .medications()
        .search(&DrugQuery::by_name("Paracetamol"))
        .await?;
    for drug in &drugs {
        println!("  {} ({})", drug.name, drug.generic_composition);
    }

    // Which conditions have treatment protocols?
    let tags = client.protocols().tags().await?;
    println!("\n{} supported conditions:", tags.len());
    for tag in tags.iter().take(5) {
        println!("  {} - {}", tag.name, tag.description);
    }

    // Who publishes protocols for diabetes?
    let publishers = client.protocols().publishers_by_tag("diabetes").await?;
    println!("\nDiabetes protocol publishers:");
    for publisher in &publishers {
        println!("  {}", publisher.name);
    }

    // Search a confirmed tag/publisher pair
    if let Some(publisher) = publishers.first() {
        let documents = client
            .protocols()
            .search(&[ProtocolQuery {
                query: "first-line therapy".to_string(),
                condition: "diabetes".to_string(),
                publisher_name: publisher.name.clone(),
            }])
            .await?;
        println!("\n{} protocol pages found", documents.len());
    }

    Ok(())
}
