use crate::vision::Detection;

/// Picks the detection with the strictly highest confidence.
///
/// The running maximum is seeded at 0.0 and only replaced on strict
/// improvement, so equal confidences keep the earliest detection and a
/// detection with confidence exactly 0.0 is never selected. An empty set
/// yields `None`, which callers treat as "nothing detected".
pub fn select_best(detections: &[Detection]) -> Option<&Detection> {
    let mut best: Option<&Detection> = None;
    let mut highest = 0.0f32;
    for detection in detections {
        if detection.confidence > highest {
            highest = detection.confidence;
            best = Some(detection);
        }
    }
    best
}
