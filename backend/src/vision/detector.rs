use std::sync::Mutex;

use tch::{CModule, Device, Kind};

use super::preprocess;
use super::{Detection, DetectionBackend, VisionError, load_class_names};

/// TorchScript pest detector. The exported module runs NMS internally and
/// returns one `[n, 6]` tensor of `x1, y1, x2, y2, confidence, class_id`
/// rows.
pub struct PestDetector {
    module: Mutex<CModule>,
    device: Device,
    names: Vec<String>,
}

impl PestDetector {
    pub fn load(model_path: &str, classes_path: &str) -> Result<Self, VisionError> {
        let device = Device::cuda_if_available();
        let module = CModule::load_on_device(model_path, device)?;
        let names = load_class_names(classes_path)?;
        log::info!(
            "Loaded pest detector from {} ({} classes, {:?})",
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

impl DetectionBackend for PestDetector {
    fn detect(&self, image: &[u8]) -> Result<Vec<Detection>, VisionError> {
        let input = preprocess::detector_tensor(image)?.to_device(self.device);
        let output = self.module.lock().unwrap().forward_ts(&[input])?;
        let output = output.to_device(Device::Cpu).to_kind(Kind::Float);

        let size = output.size();
        let (rows, cols) = match size.as_slice() {
            [rows, cols] => (*rows, *cols),
            [1, rows, cols] => (*rows, *cols),
            _ => {
                return Err(VisionError::Output(format!(
                    "unexpected detector output shape {size:?}"
                )));
            }
        };
        if cols != 6 {
            return Err(VisionError::Output(format!(
                "expected 6 values per detection, got {cols}"
            )));
        }

        let numel = (rows * cols) as usize;
        let mut buf = vec![0f32; numel];
        output.reshape([-1]).copy_data(&mut buf, numel);

        Ok(buf
            .chunks_exact(6)
            .map(|row| Detection {
                bbox: [row[0], row[1], row[2], row[3]],
                confidence: row[4],
                class_id: row[5] as i64,
            })
            .collect())
    }

    fn class_name(&self, class_id: i64) -> Option<&str> {
        usize::try_from(class_id)
            .ok()
            .and_then(|id| self.names.get(id))
            .map(String::as_str)
    }
}
