pub mod ingest;
pub mod payload;
pub mod retrieval;
pub mod runtime;
pub mod sign;

pub use ingest::{IngestionClient, IngestionRecord};
pub use payload::ModelFamily;
pub use retrieval::{BedrockAgentClient, RetrievePassages, RetrievedPassage};
pub use runtime::{BedrockRuntimeClient, InferModel};
