use serde::{Deserialize, Serialize};

/// Body returned by `POST /api/predict`. The page-rendering endpoint carries
/// the same two fields through its template context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub status: u16,
    pub result: String,
}
