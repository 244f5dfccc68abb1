use std::collections::HashMap;

/// Pre-authored advisory markup, keyed by class label. Loaded once at
/// startup and read-only afterwards.
#[derive(Debug)]
pub struct AdviceStore {
    pest: HashMap<String, String>,
    disease: HashMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AdviceError {
    #[error("failed to read advice table: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed advice table: {0}")]
    Parse(#[from] serde_json::Error),
}

impl AdviceStore {
    pub fn load(pest_path: &str, disease_path: &str) -> Result<Self, AdviceError> {
        let pest = std::fs::read_to_string(pest_path)?;
        let disease = std::fs::read_to_string(disease_path)?;
        let store = Self::from_json(&pest, &disease)?;
        log::info!(
            "Loaded advice tables ({} pest entries, {} disease entries)",
            store.pest.len(),
            store.disease.len()
        );
        Ok(store)
    }

    pub fn from_json(pest: &str, disease: &str) -> Result<Self, AdviceError> {
        Ok(Self {
            pest: serde_json::from_str(pest)?,
            disease: serde_json::from_str(disease)?,
        })
    }

    pub fn pest(&self, label: &str) -> Option<&str> {
        self.pest.get(label).map(String::as_str)
    }

    pub fn disease(&self, label: &str) -> Option<&str> {
        self.disease.get(label).map(String::as_str)
    }
}
