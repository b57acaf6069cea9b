pub mod medications;
pub mod protocols;
mod registry;

pub use medications::{MedicationInteractionTool, MedicationUnderstandingTool};
pub use protocols::{
    ProtocolPublishersTool, ProtocolTagsTool, ProtocolWorkflow, SearchProtocolsTool,
};
pub use registry::{json_schema_object, json_schema_string, Tool, ToolRegistry};
