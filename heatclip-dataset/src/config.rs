use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub(crate) const DEFAULT_N_FRAMES: usize = 30;
pub(crate) const DEFAULT_INTERVAL: usize = 5;
pub(crate) const DEFAULT_IMG_DIM: u32 = 224;

/// Axis ordering of the stacked batch tensor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayoutMode {
    /// Channels before time: batches stack to [B, 3, N, D, D].
    Bcthw,
    /// Time before channels (identity): [B, N, 3, D, D].
    Btchw,
}

impl FromStr for LayoutMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "BCTHW" => Ok(Self::Bcthw),
            "BTCHW" => Ok(Self::Btchw),
            other => bail!("unknown layout mode: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Target frame count per clip (N).
    pub n_frames: usize,
    /// Sampling stride between selected frames (S).
    pub interval: usize,
    /// Spatial side length of every frame after augmentation (D).
    pub img_dim: u32,
    pub layout: LayoutMode,
    /// Pose estimator ONNX weights.
    pub estimator_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            n_frames: DEFAULT_N_FRAMES,
            interval: DEFAULT_INTERVAL,
            img_dim: DEFAULT_IMG_DIM,
            layout: LayoutMode::Btchw,
            estimator_path: PathBuf::from("./data/model/pose_heatmap.onnx"),
        }
    }
}

impl PipelineConfig {
    /// Reads the recognized options from the environment, falling back
    /// to defaults: `N_FRAMES`, `INTERVAL`, `IMG_DIM`, `IMG_SHAPE`,
    /// `POSE_STATE_PATH`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = env::var("N_FRAMES") {
            config.n_frames = value.parse().context("invalid N_FRAMES")?;
        }
        if let Ok(value) = env::var("INTERVAL") {
            config.interval = value.parse().context("invalid INTERVAL")?;
        }
        if let Ok(value) = env::var("IMG_DIM") {
            config.img_dim = value.parse().context("invalid IMG_DIM")?;
        }
        if let Ok(value) = env::var("IMG_SHAPE") {
            config.layout = value.parse()?;
        }
        if let Ok(value) = env::var("POSE_STATE_PATH") {
            config.estimator_path = PathBuf::from(value);
        }

        Ok(config)
    }
}
