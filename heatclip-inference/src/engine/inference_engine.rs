use anyhow::{Context, Result};
use log::info;
use ort::session::Session;
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// One loaded ONNX model. Built once per process and shared; `run`
/// needs exclusive access, so callers keep it behind a mutex.
pub struct OnnxSession {
    pub(crate) session: Session,
    pub(crate) input_name: String,
    pub(crate) output_name: String,
}

#[derive(Copy, Clone, Debug)]
pub enum ExecutionProvider {
    CPU,
    CUDA(i32),
    TensorRT(i32),
}

impl Deref for OnnxSession {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl DerefMut for OnnxSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.session
    }
}

impl OnnxSession {
    pub fn new(url: impl AsRef<Path>, executor: ExecutionProvider) -> Result<Self> {
        let session = Session::builder()?
            .with_intra_threads(4)?
            .with_execution_providers([match executor {
                ExecutionProvider::CUDA(id) => {
                    ort::execution_providers::CUDAExecutionProvider::default()
                        .with_device_id(id)
                        .build()
                        .error_on_failure()
                }
                ExecutionProvider::TensorRT(id) => {
                    ort::execution_providers::TensorRTExecutionProvider::default()
                        .with_device_id(id)
                        .build()
                        .error_on_failure()
                }
                ExecutionProvider::CPU => ort::execution_providers::CPUExecutionProvider::default()
                    .build()
                    .error_on_failure(),
            }])?
            .commit_from_file(url.as_ref())?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .context("model declares no inputs")?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .context("model declares no outputs")?;
        info!(
            "loaded {} ({} -> {}) on {:?}",
            url.as_ref().display(),
            input_name,
            output_name,
            executor
        );

        Ok(OnnxSession {
            session,
            input_name,
            output_name,
        })
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }
}
