pub mod classifier;
pub mod detector;
pub mod preprocess;

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("model error: {0}")]
    Model(#[from] tch::TchError),
    #[error("malformed model output: {0}")]
    Output(String),
    #[error("class list error: {0}")]
    Io(#[from] std::io::Error),
}

/// One bounding-box prediction from the detector. Coordinates are pixel
/// values in the 640x640 model input space.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub class_id: i64,
    pub confidence: f32,
    pub bbox: [f32; 4],
}

/// Top class picked by the fallback classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

/// Object-detection backend. Implemented by the TorchScript pest detector;
/// tests plug in static stubs.
pub trait DetectionBackend: Send + Sync {
    fn detect(&self, image: &[u8]) -> Result<Vec<Detection>, VisionError>;

    /// Resolves a class id to the human-readable class name.
    fn class_name(&self, class_id: i64) -> Option<&str>;
}

/// Whole-image classification backend used when the detection path fails.
pub trait ClassificationBackend: Send + Sync {
    fn classify(&self, image: &[u8]) -> Result<Classification, VisionError>;
}

/// Loads a sidecar class list: one name per line, line index = class id.
pub fn load_class_names(path: &str) -> Result<Vec<String>, VisionError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
