// Core types and workflow logic for the Eka MCP server

pub mod types;
pub mod workflow;

pub use types::*;
pub use workflow::{
    PublisherOutcome, SessionStore, TagOutcome, WorkflowError, WorkflowState,
};
