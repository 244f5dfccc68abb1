use std::sync::Arc;

use log::{error, info};

use crate::advice::AdviceStore;
use crate::selection::select_best;
use crate::vision::{ClassificationBackend, DetectionBackend, VisionError};

#[derive(Debug, thiserror::Error)]
pub enum PrimaryFailure {
    #[error("no objects detected")]
    NoDetections,
    #[error("detector returned unknown class id {0}")]
    UnknownClass(i64),
    #[error("no advice entry for pest {0:?}")]
    NoAdvice(String),
    #[error(transparent)]
    Vision(#[from] VisionError),
}

#[derive(Debug, thiserror::Error)]
pub enum FallbackFailure {
    #[error("no advice entry for disease {0:?}")]
    NoAdvice(String),
    #[error(transparent)]
    Vision(#[from] VisionError),
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("primary path failed ({primary}); fallback failed ({fallback})")]
    Exhausted {
        primary: PrimaryFailure,
        fallback: FallbackFailure,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionSource {
    Detector,
    FallbackClassifier,
}

#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
    pub advice: String,
    pub source: PredictionSource,
}

/// Two-tier prediction: pest detection first, disease classification as the
/// recovery path. Any primary-tier failure is an expected branch, not an
/// exception.
pub struct PredictService {
    detector: Arc<dyn DetectionBackend>,
    classifier: Arc<dyn ClassificationBackend>,
    advice: AdviceStore,
}

impl PredictService {
    pub fn new(
        detector: Arc<dyn DetectionBackend>,
        classifier: Arc<dyn ClassificationBackend>,
        advice: AdviceStore,
    ) -> Self {
        Self {
            detector,
            classifier,
            advice,
        }
    }

    pub fn predict(&self, image: &[u8]) -> Result<Prediction, PredictError> {
        let primary = match self.detect_pest(image) {
            Ok(prediction) => return Ok(prediction),
            Err(failure) => failure,
        };
        error!("Pest detection failed: {primary}; trying disease classifier");

        match self.classify_disease(image) {
            Ok(prediction) => Ok(prediction),
            Err(fallback) => {
                error!("Disease fallback failed: {fallback}");
                Err(PredictError::Exhausted { primary, fallback })
            }
        }
    }

    fn detect_pest(&self, image: &[u8]) -> Result<Prediction, PrimaryFailure> {
        let detections = self.detector.detect(image)?;
        let best = select_best(&detections).ok_or(PrimaryFailure::NoDetections)?;
        let label = self
            .detector
            .class_name(best.class_id)
            .ok_or(PrimaryFailure::UnknownClass(best.class_id))?;
        let advice = self
            .advice
            .pest(label)
            .ok_or_else(|| PrimaryFailure::NoAdvice(label.to_string()))?;

        info!(
            "Detected pest {:?} with confidence {:.2}",
            label, best.confidence
        );
        Ok(Prediction {
            label: label.to_string(),
            confidence: best.confidence,
            advice: advice.to_string(),
            source: PredictionSource::Detector,
        })
    }

    fn classify_disease(&self, image: &[u8]) -> Result<Prediction, FallbackFailure> {
        let class = self.classifier.classify(image)?;
        let advice = self
            .advice
            .disease(&class.label)
            .ok_or_else(|| FallbackFailure::NoAdvice(class.label.clone()))?;

        info!(
            "Classified disease {:?} with confidence {:.2}",
            class.label, class.confidence
        );
        Ok(Prediction {
            label: class.label,
            confidence: class.confidence,
            advice: advice.to_string(),
            source: PredictionSource::FallbackClassifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::stubs::{StaticClassifier, StaticDetector};
    use crate::vision::{Classification, Detection};

    const PEST_TABLE: &str =
        r#"{"aphids": "<p>aphid advice</p>", "armyworm": "<p>armyworm advice</p>"}"#;
    const DISEASE_TABLE: &str = r#"{"Tomato___Late_blight": "<p>blight advice</p>"}"#;

    fn detection(class_id: i64, confidence: f32) -> Detection {
        Detection {
            class_id,
            confidence,
            bbox: [0.0, 0.0, 5.0, 5.0],
        }
    }

    fn service(detector: StaticDetector, classifier: StaticClassifier) -> PredictService {
        let advice = AdviceStore::from_json(PEST_TABLE, DISEASE_TABLE).unwrap();
        PredictService::new(Arc::new(detector), Arc::new(classifier), advice)
    }

    fn blight() -> StaticClassifier {
        StaticClassifier {
            result: Some(Classification {
                label: "Tomato___Late_blight".into(),
                confidence: 0.77,
            }),
        }
    }

    fn no_classifier() -> StaticClassifier {
        StaticClassifier { result: None }
    }

    #[test]
    fn primary_path_serves_pest_advice() {
        let detector = StaticDetector::with(
            vec![detection(0, 0.4), detection(1, 0.9)],
            &["aphids", "armyworm"],
        );
        let prediction = service(detector, no_classifier()).predict(b"img").unwrap();
        assert_eq!(prediction.label, "armyworm");
        assert_eq!(prediction.advice, "<p>armyworm advice</p>");
        assert_eq!(prediction.source, PredictionSource::Detector);
    }

    #[test]
    fn empty_detections_fall_back_to_classifier() {
        let detector = StaticDetector::with(Vec::new(), &["aphids"]);
        let prediction = service(detector, blight()).predict(b"img").unwrap();
        assert_eq!(prediction.label, "Tomato___Late_blight");
        assert_eq!(prediction.source, PredictionSource::FallbackClassifier);
    }

    #[test]
    fn unknown_class_id_falls_back() {
        let detector = StaticDetector::with(vec![detection(9, 0.8)], &["aphids"]);
        let prediction = service(detector, blight()).predict(b"img").unwrap();
        assert_eq!(prediction.source, PredictionSource::FallbackClassifier);
    }

    #[test]
    fn missing_pest_advice_falls_back() {
        let detector = StaticDetector::with(vec![detection(0, 0.8)], &["locust"]);
        let prediction = service(detector, blight()).predict(b"img").unwrap();
        assert_eq!(prediction.source, PredictionSource::FallbackClassifier);
    }

    #[test]
    fn detector_error_falls_back() {
        let prediction = service(StaticDetector::failing(), blight())
            .predict(b"img")
            .unwrap();
        assert_eq!(prediction.source, PredictionSource::FallbackClassifier);
    }

    #[test]
    fn both_tiers_failing_is_exhausted() {
        let err = service(StaticDetector::failing(), no_classifier())
            .predict(b"img")
            .unwrap_err();
        assert!(matches!(err, PredictError::Exhausted { .. }));
    }

    #[test]
    fn unknown_disease_label_is_exhausted() {
        let detector = StaticDetector::with(Vec::new(), &[]);
        let classifier = StaticClassifier {
            result: Some(Classification {
                label: "Apple___Black_rot".into(),
                confidence: 0.5,
            }),
        };
        let err = service(detector, classifier).predict(b"img").unwrap_err();
        let PredictError::Exhausted { fallback, .. } = err;
        assert!(matches!(fallback, FallbackFailure::NoAdvice(_)));
    }
}
