use heatclip_media::{ops, RawImage};
use rand::rngs::StdRng;
use rand::Rng;

pub(crate) const GAMMA: f32 = 1.5;
pub(crate) const FLIP_PROBABILITY: f64 = 0.5;
pub(crate) const ROTATE_PROBABILITY: f64 = 0.8;
pub(crate) const ROTATE_LIMIT_DEG: f32 = 120.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PolicyKind {
    Train,
    Val,
}

/// One named augmentation configuration. `train` is stochastic,
/// `val` is geometry-free of randomness (crop/contrast only).
#[derive(Debug, Clone)]
pub struct AugmentPolicy {
    kind: PolicyKind,
    dim: u32,
}

impl AugmentPolicy {
    pub fn train(dim: u32) -> Self {
        Self {
            kind: PolicyKind::Train,
            dim,
        }
    }

    pub fn val(dim: u32) -> Self {
        Self {
            kind: PolicyKind::Val,
            dim,
        }
    }

    pub fn dim(&self) -> u32 {
        self.dim
    }

    /// Realizes every random choice of the pipeline exactly once. The
    /// returned token replays the identical spatial transform on any
    /// later frame of the same clip.
    pub fn draw(&self, rng: &mut StdRng) -> ReplayToken {
        let mut ops = vec![
            RealizedOp::EqualizeContrast,
            RealizedOp::Gamma { gamma: GAMMA },
            RealizedOp::PadToSize {
                width: self.dim,
                height: self.dim,
            },
            RealizedOp::CenterCrop {
                width: self.dim,
                height: self.dim,
            },
        ];

        if self.kind == PolicyKind::Train {
            ops.push(RealizedOp::HorizontalFlip {
                applied: rng.gen_bool(FLIP_PROBABILITY),
            });
            ops.push(RealizedOp::VerticalFlip {
                applied: rng.gen_bool(FLIP_PROBABILITY),
            });
            // Angle is realized even when the op is skipped so the
            // token fully records the pipeline's draw.
            let applied = rng.gen_bool(ROTATE_PROBABILITY);
            let angle_deg = rng.gen_range(-ROTATE_LIMIT_DEG..=ROTATE_LIMIT_DEG);
            ops.push(RealizedOp::Rotate { angle_deg, applied });
        }

        ReplayToken { ops }
    }
}

/// A single realized step of one pipeline draw.
#[derive(Debug, Clone, PartialEq)]
pub enum RealizedOp {
    EqualizeContrast,
    Gamma { gamma: f32 },
    PadToSize { width: u32, height: u32 },
    CenterCrop { width: u32, height: u32 },
    HorizontalFlip { applied: bool },
    VerticalFlip { applied: bool },
    Rotate { angle_deg: f32, applied: bool },
}

/// Captured parameters of one augmentation draw. Created on a clip's
/// first frame, replayed on every later frame of the same clip, then
/// dropped; never shared across clips.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayToken {
    ops: Vec<RealizedOp>,
}

impl ReplayToken {
    pub fn from_ops(ops: Vec<RealizedOp>) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &[RealizedOp] {
        &self.ops
    }

    /// Deterministic replay: no new randomness, byte-identical spatial
    /// parameters on every call.
    pub fn apply(&self, image: &RawImage) -> RawImage {
        let mut current = image.clone();
        for op in &self.ops {
            match op {
                RealizedOp::EqualizeContrast => current = ops::equalize_contrast(&current),
                RealizedOp::Gamma { gamma } => current = ops::adjust_gamma(&current, *gamma),
                RealizedOp::PadToSize { width, height } => {
                    current = ops::pad_to_min(&current, *width, *height)
                }
                RealizedOp::CenterCrop { width, height } => {
                    current = ops::center_crop(&current, *width, *height)
                }
                RealizedOp::HorizontalFlip { applied: true } => {
                    current = ops::flip_horizontal(&current)
                }
                RealizedOp::VerticalFlip { applied: true } => current = ops::flip_vertical(&current),
                RealizedOp::Rotate {
                    angle_deg,
                    applied: true,
                } => current = ops::rotate(&current, *angle_deg),
                RealizedOp::HorizontalFlip { .. }
                | RealizedOp::VerticalFlip { .. }
                | RealizedOp::Rotate { .. } => {}
            }
        }
        current
    }
}
