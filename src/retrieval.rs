use crate::{
    dataset::Document,
    embeddings::embed_query,
    error::ServerError,
    index::FlatIndex,
};
use async_openai::{Client as OpenAIClient, config::OpenAIConfig};

/// Immutable retrieval context: the document corpus, its vector index and the
/// embedding client used for queries. Built once at startup and shared across
/// requests behind an `Arc`; nothing here mutates after construction.
pub struct Retriever {
    documents: Vec<Document>,
    index: FlatIndex,
    client: OpenAIClient<OpenAIConfig>,
    embedding_model: String,
}

impl Retriever {
    pub fn new(
        documents: Vec<Document>,
        index: FlatIndex,
        client: OpenAIClient<OpenAIConfig>,
        embedding_model: String,
    ) -> Result<Self, ServerError> {
        // Position i in the index must correspond to document i.
        if documents.len() != index.len() {
            return Err(ServerError::Config(format!(
                "Document/index size mismatch: {} documents, {} vectors",
                documents.len(),
                index.len()
            )));
        }
        Ok(Self {
            documents,
            index,
            client,
            embedding_model,
        })
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Embeds `query` with the build-time model and returns the text of the
    /// `top_k` nearest documents, nearest first. An empty query is embedded
    /// and searched like any other; `top_k` beyond the corpus size returns
    /// the whole corpus.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<String>, ServerError> {
        let query_vector = embed_query(&self.client, &self.embedding_model, query).await?;

        let hits = self.index.search(&query_vector, top_k);
        Ok(hits
            .into_iter()
            .map(|(position, _distance)| self.documents[position].text.clone())
            .collect())
    }
}
