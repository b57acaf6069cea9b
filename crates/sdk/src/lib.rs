//! # Eka SDK
//!
//! Typed Rust client for the Eka healthcare API: medication lookup,
//! drug-interaction checks, and treatment-protocol retrieval.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eka_sdk::{EkaClient, EkaResult};
//!
//! #[tokio::main]
//! async fn main() -> EkaResult<()> {
//!     // Build client
//!     let client = EkaClient::builder()
//!         .api_host("https://api.eka.care")
//!         .client_id("my-client-id")
//!         .client_secret("my-client-secret")
//!         .build()?;
//!
//!     // Which conditions have treatment protocols?
//!     let tags = client.protocols().tags().await?;
//!     println!("{} supported conditions", tags.len());
//!
//!     // Look up a medication
//!     let drugs = client
//!         .medications()
//!         .search(&eka_sdk::api::DrugQuery::by_name("Paracetamol"))
//!         .await?;
//!     println!("{} matches", drugs.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

// Re-export main client
pub use client::{EkaClient, EkaClientBuilder};
pub use config::{ClientConfig, RetryConfig};
pub use error::{EkaError, EkaResult};

// Re-export core types for convenience
pub use eka_core::types::{
    Drug, Interaction, ProtocolDocument, ProtocolQuery, Publisher, Severity, Tag,
};
