use crate::config::LayoutMode;
use crate::error::PipelineError;
use log::warn;
use ndarray::prelude::*;

/// One processed clip ready for batching. Label availability is
/// uniform across a dataset, decided once at construction.
#[derive(Debug, Clone)]
pub struct ClipItem {
    pub id: String,
    /// `[N, 3, D, D]` in temporal order; `N == 0` marks an empty clip.
    pub frames: Array4<f32>,
    pub label: Option<f32>,
}

#[derive(Debug)]
pub struct Batch {
    pub ids: Vec<String>,
    /// `[B, 3, N, D, D]` in `Bcthw` layout, `[B, N, 3, D, D]` otherwise.
    pub clips: Array5<f32>,
    pub labels: Option<Array1<f32>>,
}

/// Stacks per-clip tensors into one batch tensor. Empty clips are
/// removed (ids, tensors and labels stay index-aligned); a batch that
/// retains nothing is an error, never a zero-sized tensor.
pub fn collate(items: Vec<ClipItem>, layout: LayoutMode) -> Result<Batch, PipelineError> {
    let total = items.len();
    let retained = items
        .into_iter()
        .filter(|item| item.frames.shape()[0] > 0)
        .collect::<Vec<_>>();

    if retained.len() < total {
        warn!("dropped {} empty clip(s) from batch", total - retained.len());
    }
    if retained.is_empty() {
        return Err(PipelineError::EmptyBatch);
    }

    let expected = retained[0].frames.shape().to_vec();
    for item in &retained {
        let got = item.frames.shape();
        if got != expected.as_slice() {
            return Err(PipelineError::ShapeMismatch {
                got: got.to_vec(),
                expected,
            });
        }
    }

    let labels_present = retained[0].label.is_some();
    let mut ids = Vec::with_capacity(retained.len());
    let mut labels = Vec::with_capacity(retained.len());
    let mut clips = Vec::with_capacity(retained.len());

    for item in retained {
        // Label availability must match across the batch or the labels
        // tensor falls out of alignment with the ids.
        if item.label.is_some() != labels_present {
            return Err(PipelineError::LabelMismatch { id: item.id });
        }
        ids.push(item.id);
        if let Some(label) = item.label {
            labels.push(label);
        }
        clips.push(match layout {
            LayoutMode::Bcthw => item.frames.permuted_axes([1, 0, 2, 3]),
            LayoutMode::Btchw => item.frames,
        });
    }

    let views = clips.iter().map(|clip| clip.view()).collect::<Vec<_>>();
    let batch = ndarray::stack(Axis(0), &views).expect("retained clips share one shape");

    Ok(Batch {
        ids,
        clips: batch,
        labels: labels_present.then(|| Array1::from_vec(labels)),
    })
}
