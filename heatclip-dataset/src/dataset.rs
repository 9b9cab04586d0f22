use crate::assembler::assemble;
use crate::augment::AugmentPolicy;
use crate::collate::{collate, Batch, ClipItem};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::processor::ReplayAugmentor;
use crate::sampler::sample_indices;
use anyhow::{Context, Result};
use hashbrown::HashMap;
use heatclip_inference::pose::heatmap::PoseHeatmapInference;
use heatclip_media::provider::{DirectoryFrameProvider, FrameProvider};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Scalar label lookup by clip directory name.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    labels: HashMap<String, f32>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, label: f32) {
        self.labels.insert(key.into(), label);
    }

    pub fn get(&self, key: &str) -> Option<f32> {
        self.labels.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f32)> for LabelTable {
    fn from_iter<I: IntoIterator<Item = (K, f32)>>(iter: I) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|(key, label)| (key.into(), label))
                .collect(),
        }
    }
}

struct ClipRecord {
    path: PathBuf,
    label: Option<f32>,
}

/// Ordered collection of clip directories. Whether labels exist is a
/// dataset-level decision made once here, not re-derived per item.
pub struct VideoClipDataset<E: ?Sized> {
    records: Vec<ClipRecord>,
    provider: DirectoryFrameProvider,
    augmentor: ReplayAugmentor<E>,
    config: PipelineConfig,
}

impl<E: PoseHeatmapInference + ?Sized> VideoClipDataset<E> {
    pub fn new(
        clip_dirs: Vec<PathBuf>,
        config: PipelineConfig,
        policy: AugmentPolicy,
        estimator: Arc<E>,
    ) -> Self {
        let records = clip_dirs
            .into_iter()
            .map(|path| ClipRecord { path, label: None })
            .collect::<Vec<_>>();
        info!("dataset of {} unlabelled clip(s)", records.len());

        Self {
            records,
            provider: DirectoryFrameProvider::new(),
            augmentor: ReplayAugmentor::new(policy, estimator),
            config,
        }
    }

    /// Every clip must have a label; a hole in the table is a
    /// construction error, not a silent unlabelled item.
    pub fn with_labels(
        clip_dirs: Vec<PathBuf>,
        labels: &LabelTable,
        config: PipelineConfig,
        policy: AugmentPolicy,
        estimator: Arc<E>,
    ) -> Result<Self> {
        let records = clip_dirs
            .into_iter()
            .map(|path| {
                let key = clip_key(&path)?;
                let label = labels
                    .get(&key)
                    .with_context(|| format!("no label for clip {key}"))?;
                Ok(ClipRecord {
                    path,
                    label: Some(label),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        info!("dataset of {} labelled clip(s)", records.len());

        Ok(Self {
            records,
            provider: DirectoryFrameProvider::new(),
            augmentor: ReplayAugmentor::new(policy, estimator),
            config,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes one clip end to end: enumerate frames, sample the
    /// index window, assemble, augment-and-estimate.
    ///
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize, rng: &mut StdRng) -> Result<ClipItem, PipelineError> {
        let record = &self.records[index];
        let paths = self
            .provider
            .list_frames(&record.path)
            .map_err(|source| PipelineError::ClipRead {
                path: record.path.clone(),
                source,
            })?;

        let indices = sample_indices(paths.len(), self.config.n_frames, self.config.interval);
        let images = assemble(&paths, &indices, self.config.img_dim)?;
        let frames = self.augmentor.process(&images, rng)?;
        debug!(
            "clip {} -> tensor {:?}",
            record.path.display(),
            frames.shape()
        );

        Ok(ClipItem {
            id: record.path.display().to_string(),
            frames,
            label: record.label,
        })
    }
}

fn clip_key(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .with_context(|| format!("clip path {} has no directory name", path.display()))
}

/// Batch loader: one clip is one unit of work, processed on the rayon
/// pool with a clip-local RNG; collation is the single join point and
/// waits for every requested clip. The first clip error aborts the
/// whole batch.
pub struct ClipLoader<E: ?Sized> {
    dataset: Arc<VideoClipDataset<E>>,
    base_seed: u64,
}

impl<E: PoseHeatmapInference + Send + Sync + ?Sized> ClipLoader<E> {
    pub fn new(dataset: Arc<VideoClipDataset<E>>, base_seed: u64) -> Self {
        Self { dataset, base_seed }
    }

    pub fn load_batch(&self, indices: &[usize]) -> Result<Batch, PipelineError> {
        let items = indices
            .par_iter()
            .map(|&index| {
                let mut rng = StdRng::seed_from_u64(self.base_seed.wrapping_add(index as u64));
                self.dataset.get(index, &mut rng)
            })
            .collect::<Result<Vec<_>, PipelineError>>()?;

        collate(items, self.dataset.config.layout)
    }
}
