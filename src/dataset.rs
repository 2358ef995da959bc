use std::path::Path;

use thiserror::Error;

/// Name of the column identifying the disease; every other column is treated
/// as a binary symptom indicator.
pub const DISEASE_COLUMN: &str = "diseases";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Dataset is missing the required '{DISEASE_COLUMN}' column")]
    MissingDiseaseColumn,
}

// One generated sentence per dataset row. The row index is implicit: document
// order is the canonical order used by the index and the retriever.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub text: String,
}

/// Reads the symptom dataset and converts each row into a natural-language
/// sentence describing the disease's flagged symptoms.
///
/// Row order is preserved; the vector index built downstream relies on
/// position i corresponding to row i.
pub fn load_documents(path: &Path) -> Result<Vec<Document>, DatasetError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let disease_idx = headers
        .iter()
        .position(|h| h == DISEASE_COLUMN)
        .ok_or(DatasetError::MissingDiseaseColumn)?;

    let mut documents = Vec::new();
    for record in reader.records() {
        let record = record?;
        let disease = record.get(disease_idx).unwrap_or_default().trim();

        // Symptom columns are every column except the disease one; a cell
        // counts as set only when it holds exactly "1".
        let symptoms: Vec<&str> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != disease_idx)
            .filter(|(idx, _)| record.get(*idx).map(str::trim) == Some("1"))
            .map(|(_, name)| name)
            .collect();

        let text = if symptoms.is_empty() {
            format!("{disease} has no listed symptoms in this dataset.")
        } else {
            format!(
                "{disease} is associated with symptoms such as {}.",
                symptoms.join(", ")
            )
        };

        documents.push(Document { text });
    }

    Ok(documents)
}
