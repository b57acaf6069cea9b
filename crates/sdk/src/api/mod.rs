//! Typed endpoint groups for the Eka API.

mod medications;
mod protocols;

pub use medications::{DrugQuery, InteractionRequest, MedicationsApi};
pub use protocols::{ProtocolSearchRequest, ProtocolsApi};
