pub mod assembler;
pub mod augment;
pub mod collate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod processor;
pub mod sampler;

pub use collate::{Batch, ClipItem};
pub use config::{LayoutMode, PipelineConfig};
pub use dataset::{ClipLoader, LabelTable, VideoClipDataset};
pub use error::PipelineError;
pub use processor::ReplayAugmentor;
