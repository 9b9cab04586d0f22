#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use heatclip_dataset::augment::AugmentPolicy;
use heatclip_dataset::{ClipLoader, PipelineConfig, VideoClipDataset};
use heatclip_inference::engine::inference_engine::ExecutionProvider;
use heatclip_inference::pose::heatmap::PoseHeatmapSession;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> Result<()> {
    log_init();

    let config = PipelineConfig::from_env()?;
    let clip_root = std::env::args()
        .nth(1)
        .context("usage: heatclip <clip-root>")?;

    let estimator = Arc::new(PoseHeatmapSession::new(
        &config.estimator_path,
        ExecutionProvider::CPU,
    )?);

    let clip_dirs = {
        let mut dirs = std::fs::read_dir(&clip_root)
            .with_context(|| format!("failed to list clip root {clip_root}"))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect::<Vec<PathBuf>>();
        dirs.sort();
        dirs
    };
    info!("{} clip folder(s) under {}", clip_dirs.len(), clip_root);

    let policy = AugmentPolicy::val(config.img_dim);
    let layout = config.layout;
    let dataset = Arc::new(VideoClipDataset::new(clip_dirs, config, policy, estimator));
    let loader = ClipLoader::new(dataset.clone(), 0);

    let indices = (0..dataset.len().min(4)).collect::<Vec<_>>();
    let batch = loader.load_batch(&indices)?;
    info!(
        "batch of {} clip(s): tensor {:?}, layout {:?}",
        batch.ids.len(),
        batch.clips.shape(),
        layout
    );

    Ok(())
}

fn log_init() {
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::INFO)
        .init();
}
