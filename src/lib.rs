// Export modules for use in the binary and the integration tests
pub mod dataset;
pub mod embeddings;
pub mod error;
pub mod index;
pub mod llm;
pub mod retrieval;
pub mod server;

// Re-export commonly used types for convenience
pub use dataset::Document;
pub use error::{Result, ServerError};
pub use index::FlatIndex;
pub use llm::ChatClient;
pub use retrieval::Retriever;
pub use server::{AppState, app};
