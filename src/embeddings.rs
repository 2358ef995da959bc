use crate::{dataset::Document, error::ServerError};
use async_openai::{
    Client as OpenAIClient, config::OpenAIConfig, types::CreateEmbeddingRequestArgs,
};
use futures::stream::{self, StreamExt};
use ndarray::{Array1, ArrayView1};

// Number of concurrent embedding requests during the startup build.
const CONCURRENCY_LIMIT: usize = 8;

/// Squared Euclidean distance between two vectors, the metric used by the
/// flat index. Lower is closer; no square root is taken.
pub fn squared_l2_distance(v1: ArrayView1<f32>, v2: ArrayView1<f32>) -> f32 {
    let diff = &v1 - &v2;
    diff.dot(&diff)
}

/// Generates one embedding per document, in document order.
///
/// Requests are sent one document at a time with bounded concurrency; the
/// first failure aborts the whole build, since a partially embedded corpus
/// must not serve requests.
pub async fn embed_documents(
    client: &OpenAIClient<OpenAIConfig>,
    model: &str,
    documents: &[Document],
) -> Result<Vec<Array1<f32>>, ServerError> {
    let results = stream::iter(documents.iter().enumerate())
        .map(|(index, doc)| {
            let client = client.clone();
            let model = model.to_string();
            let text = doc.text.clone();

            async move {
                let vector = embed_text(&client, &model, &text).await?;
                Ok::<(usize, Array1<f32>), ServerError>((index, vector))
            }
        })
        .buffer_unordered(CONCURRENCY_LIMIT)
        .collect::<Vec<Result<(usize, Array1<f32>), ServerError>>>()
        .await;

    // buffer_unordered completes out of order; restore document order so that
    // index position i always corresponds to document i.
    let mut indexed = Vec::with_capacity(documents.len());
    for result in results {
        match result {
            Ok(pair) => indexed.push(pair),
            Err(e) => {
                tracing::error!("Error during concurrent embedding generation: {}", e);
                return Err(e);
            }
        }
    }
    indexed.sort_by_key(|(index, _)| *index);

    tracing::info!(
        "Finished generating embeddings for {} documents.",
        indexed.len()
    );
    Ok(indexed.into_iter().map(|(_, vector)| vector).collect())
}

/// Embeds a single query string with the same model used at build time.
pub async fn embed_query(
    client: &OpenAIClient<OpenAIConfig>,
    model: &str,
    query: &str,
) -> Result<Array1<f32>, ServerError> {
    embed_text(client, model, query).await
}

async fn embed_text(
    client: &OpenAIClient<OpenAIConfig>,
    model: &str,
    text: &str,
) -> Result<Array1<f32>, ServerError> {
    let request = CreateEmbeddingRequestArgs::default()
        .model(model)
        .input(text.to_string())
        .build()?;

    let response = client.embeddings().create(request).await?;

    let embedding = response.data.into_iter().next().ok_or_else(|| {
        ServerError::Config("Embedding API returned no data for input".to_string())
    })?;

    Ok(Array1::from(embedding.embedding))
}
