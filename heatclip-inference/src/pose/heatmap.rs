use crate::engine::inference_engine::{ExecutionProvider, OnnxSession};
use crate::utils::linear_interpolate;
use anyhow::{bail, Result};
use heatclip_media::RawImage;
use log::{debug, info};
use ndarray::prelude::*;
use ort::value::TensorRef;
use parking_lot::Mutex;
use std::path::Path;

/// Per-frame saliency estimation. The plane's values are in [0, 1];
/// the last model output channel is the background/alpha plane.
///
/// Implementations must be safe for independent concurrent
/// invocations: one clip's frames must never observe another's state.
pub trait PoseHeatmapInference {
    fn estimate(&self, image: &RawImage) -> Result<Array2<f32>>;
}

pub struct PoseHeatmapSession {
    session: Mutex<OnnxSession>,
}

impl PoseHeatmapSession {
    pub fn new(model_path: impl AsRef<Path>, executor: ExecutionProvider) -> Result<Self> {
        let session = OnnxSession::new(model_path.as_ref(), executor)?;
        info!(
            "pose heatmap session ready from {}",
            model_path.as_ref().display()
        );

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl PoseHeatmapInference for PoseHeatmapSession {
    fn estimate(&self, image: &RawImage) -> Result<Array2<f32>> {
        let (width, height) = image.get_size();
        let tensor = {
            let mut tensor = Array4::<f32>::zeros((1, 3, height as usize, width as usize));
            for (x, y, pixel) in image.as_rgb().enumerate_pixels() {
                for channel in 0..3 {
                    tensor[[0, channel, y as usize, x as usize]] = pixel[channel] as f32 / 255.0;
                }
            }
            tensor
        };

        let plane = {
            let mut session = self.session.lock();
            let input_name = session.input_name().to_owned();
            let output_name = session.output_name().to_owned();
            let outputs = session.run(ort::inputs![
                input_name.as_str() => TensorRef::from_array_view(tensor.view())?
            ])?;

            let heatmap = outputs[output_name.as_str()].try_extract_array::<f32>()?;
            let shape = heatmap.shape().to_vec();
            if shape.len() != 4 {
                bail!("expected a [1, C, H, W] heatmap, got {shape:?}");
            }

            heatmap
                .slice(s![0, shape[1] - 1, .., ..])
                .to_owned()
                .into_dimensionality::<Ix2>()?
        };
        debug!(
            "heatmap plane {:?} for {}x{} frame",
            plane.dim(),
            width,
            height
        );

        let plane = if plane.dim() != (height as usize, width as usize) {
            linear_interpolate(plane, (height as usize, width as usize))
        } else {
            plane
        };

        Ok(plane.mapv(|value| value.clamp(0.0, 1.0)))
    }
}
