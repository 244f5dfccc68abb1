use std::sync::Mutex;

use tch::{CModule, Device, Kind};

use super::preprocess;
use super::{Classification, ClassificationBackend, VisionError, load_class_names};

/// TorchScript plant-disease classifier, the second-chance path when pest
/// detection comes up empty.
pub struct DiseaseClassifier {
    module: Mutex<CModule>,
    device: Device,
    names: Vec<String>,
}

impl DiseaseClassifier {
    pub fn load(model_path: &str, classes_path: &str) -> Result<Self, VisionError> {
        let device = Device::cuda_if_available();
        let module = CModule::load_on_device(model_path, device)?;
        let names = load_class_names(classes_path)?;
        log::info!(
            "Loaded disease classifier from {} ({} classes, {:?})",
            model_path,
            names.len(),
            device
        );
        Ok(Self {
            module: Mutex::new(module),
            device,
            names,
        })
    }
}

impl ClassificationBackend for DiseaseClassifier {
    fn classify(&self, image: &[u8]) -> Result<Classification, VisionError> {
        let input = preprocess::classifier_tensor(image)?.to_device(self.device);
        let output = self.module.lock().unwrap().forward_ts(&[input])?;
        let probs = output
            .softmax(-1, Kind::Float)
            .to_device(Device::Cpu)
            .view([-1]);

        let numel = probs.size()[0] as usize;
        if numel == 0 || numel != self.names.len() {
            return Err(VisionError::Output(format!(
                "classifier returned {} scores for {} known classes",
                numel,
                self.names.len()
            )));
        }

        let mut buf = vec![0f32; numel];
        probs.copy_data(&mut buf, numel);

        let mut best = 0usize;
        for (idx, prob) in buf.iter().enumerate() {
            if *prob > buf[best] {
                best = idx;
            }
        }

        Ok(Classification {
            label: self.names[best].clone(),
            confidence: buf[best],
        })
    }
}
