use crate::augment::{AugmentPolicy, ReplayToken};
use crate::error::PipelineError;
use heatclip_inference::pose::heatmap::PoseHeatmapInference;
use heatclip_media::RawImage;
use log::debug;
use ndarray::prelude::*;
use rand::rngs::StdRng;
use std::sync::Arc;

/// Per-clip augmentation state. The first frame processed draws a
/// fresh token; every later frame of the clip replays it.
enum ClipState {
    First,
    Replaying(ReplayToken),
}

/// Applies one randomly-drawn augmentation consistently across a
/// clip's frames and turns each augmented frame into an inverted
/// 3-channel saliency tensor.
///
/// The estimator is injected and shared: it is loaded once per
/// process, never re-instantiated per clip.
pub struct ReplayAugmentor<E: ?Sized> {
    policy: AugmentPolicy,
    estimator: Arc<E>,
}

impl<E: PoseHeatmapInference + ?Sized> ReplayAugmentor<E> {
    pub fn new(policy: AugmentPolicy, estimator: Arc<E>) -> Self {
        Self { policy, estimator }
    }

    pub fn policy(&self) -> &AugmentPolicy {
        &self.policy
    }

    /// Produces the clip tensor `[N, 3, D, D]` in temporal order. The
    /// token drawn for the first frame never escapes this call.
    pub fn process(
        &self,
        images: &[RawImage],
        rng: &mut StdRng,
    ) -> Result<Array4<f32>, PipelineError> {
        let dim = self.policy.dim() as usize;
        if images.is_empty() {
            return Ok(Array4::zeros((0, 3, dim, dim)));
        }

        let mut state = ClipState::First;
        let mut frames = Vec::with_capacity(images.len());

        for image in images {
            let augmented = match &state {
                ClipState::First => {
                    let token = self.policy.draw(rng);
                    let augmented = token.apply(image);
                    debug!("captured replay token: {:?}", token.ops());
                    state = ClipState::Replaying(token);
                    augmented
                }
                ClipState::Replaying(token) => token.apply(image),
            };

            let plane = self
                .estimator
                .estimate(&augmented)
                .map_err(PipelineError::Estimation)?;
            let heat = plane.mapv(|value| 1.0 - value);

            let (height, width) = heat.dim();
            let mut frame = Array3::<f32>::zeros((3, height, width));
            for mut channel in frame.axis_iter_mut(Axis(0)) {
                channel.assign(&heat);
            }
            frames.push(frame);
        }

        let expected = frames[0].shape().to_vec();
        let views = frames.iter().map(|frame| frame.view()).collect::<Vec<_>>();
        ndarray::stack(Axis(0), &views).map_err(|_| {
            let got = frames
                .iter()
                .map(|frame| frame.shape().to_vec())
                .find(|shape| *shape != expected)
                .unwrap_or_default();
            PipelineError::ShapeMismatch { got, expected }
        })
    }
}
