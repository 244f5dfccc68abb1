use image::imageops::FilterType;
use tch::Tensor;

use super::VisionError;

pub const DETECTOR_SIDE: u32 = 640;
pub const CLASSIFIER_SIDE: u32 = 224;

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decodes uploaded bytes into the detector's 640x640 RGB input tensor,
/// scaled to [0, 1].
pub fn detector_tensor(bytes: &[u8]) -> Result<Tensor, VisionError> {
    to_chw_tensor(bytes, DETECTOR_SIDE, None)
}

/// Decodes uploaded bytes into the classifier's 224x224 input tensor with
/// ImageNet normalization.
pub fn classifier_tensor(bytes: &[u8]) -> Result<Tensor, VisionError> {
    to_chw_tensor(bytes, CLASSIFIER_SIDE, Some((IMAGENET_MEAN, IMAGENET_STD)))
}

fn to_chw_tensor(
    bytes: &[u8],
    side: u32,
    normalize: Option<([f32; 3], [f32; 3])>,
) -> Result<Tensor, VisionError> {
    let img = image::load_from_memory(bytes)?;
    let rgb = img.resize_exact(side, side, FilterType::Triangle).to_rgb8();

    let plane = (side * side) as usize;
    let mut data = vec![0f32; 3 * plane];
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let idx = y as usize * side as usize + x as usize;
        for channel in 0..3 {
            let mut value = pixel[channel] as f32 / 255.0;
            if let Some((mean, std)) = normalize {
                value = (value - mean[channel]) / std[channel];
            }
            data[channel * plane + idx] = value;
        }
    }

    let side = i64::from(side);
    Ok(Tensor::from_slice(&data).view([1, 3, side, side]))
}
