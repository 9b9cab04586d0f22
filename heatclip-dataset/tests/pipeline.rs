use anyhow::Result;
use heatclip_dataset::augment::AugmentPolicy;
use heatclip_dataset::{ClipLoader, LabelTable, LayoutMode, PipelineConfig, VideoClipDataset};
use heatclip_inference::pose::heatmap::PoseHeatmapInference;
use heatclip_media::RawImage;
use ndarray::Array2;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Stand-in for the ONNX pose model: saliency is the normalized mean
/// brightness, constant per frame.
struct MeanBrightnessEstimator;

impl PoseHeatmapInference for MeanBrightnessEstimator {
    fn estimate(&self, image: &RawImage) -> Result<Array2<f32>> {
        let (width, height) = image.get_size();
        let sum: u64 = image.raw_data().iter().map(|&value| value as u64).sum();
        let mean = sum as f32 / (width * height * 3) as f32 / 255.0;
        Ok(Array2::from_elem(
            (height as usize, width as usize),
            mean,
        ))
    }
}

fn write_clip(root: &Path, name: &str, frame_count: usize) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for index in 0..frame_count {
        let mut frame = image::RgbImage::new(12, 12);
        for pixel in frame.pixels_mut() {
            *pixel = image::Rgb([(index * 20) as u8, 30, 60]);
        }
        frame
            .save(dir.join(format!("{index:04}.jpg")))
            .unwrap();
    }
    dir
}

fn scratch_root(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(name);
    fs::remove_dir_all(&root).ok();
    fs::create_dir_all(&root).unwrap();
    root
}

fn test_config(layout: LayoutMode) -> PipelineConfig {
    PipelineConfig {
        n_frames: 4,
        interval: 2,
        img_dim: 12,
        layout,
        ..PipelineConfig::default()
    }
}

#[test]
fn unlabelled_batch_has_expected_layouts() -> Result<()> {
    let root = scratch_root("heatclip_pipeline_layouts");
    let clips = vec![
        write_clip(&root, "clip_a", 10),
        write_clip(&root, "clip_b", 3),
    ];

    for (layout, shape) in [
        (LayoutMode::Btchw, [2, 4, 3, 12, 12]),
        (LayoutMode::Bcthw, [2, 3, 4, 12, 12]),
    ] {
        let dataset = Arc::new(VideoClipDataset::new(
            clips.clone(),
            test_config(layout),
            AugmentPolicy::val(12),
            Arc::new(MeanBrightnessEstimator),
        ));
        let loader = ClipLoader::new(dataset, 7);

        let batch = loader.load_batch(&[0, 1])?;
        assert_eq!(batch.ids.len(), 2);
        assert_eq!(batch.clips.shape(), shape);
        assert!(batch.labels.is_none());
    }

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn labelled_batch_aligns_labels_with_ids() -> Result<()> {
    let root = scratch_root("heatclip_pipeline_labels");
    let clips = vec![
        write_clip(&root, "walk", 8),
        write_clip(&root, "run", 8),
    ];
    let labels = [("walk", 0.0f32), ("run", 1.0f32)]
        .into_iter()
        .collect::<LabelTable>();

    let dataset = Arc::new(VideoClipDataset::with_labels(
        clips,
        &labels,
        test_config(LayoutMode::Btchw),
        AugmentPolicy::val(12),
        Arc::new(MeanBrightnessEstimator),
    )?);
    let loader = ClipLoader::new(dataset, 0);

    let batch = loader.load_batch(&[0, 1])?;
    let stacked = batch.labels.expect("labels were declared available");
    assert_eq!(stacked.len(), batch.ids.len());
    assert_eq!(stacked[0], 0.0);
    assert_eq!(stacked[1], 1.0);

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn missing_label_fails_dataset_construction() {
    let root = scratch_root("heatclip_pipeline_missing_label");
    let clips = vec![write_clip(&root, "walk", 4)];
    let labels = LabelTable::new();

    let result = VideoClipDataset::with_labels(
        clips,
        &labels,
        test_config(LayoutMode::Btchw),
        AugmentPolicy::val(12),
        Arc::new(MeanBrightnessEstimator),
    );
    assert!(result.is_err());

    fs::remove_dir_all(&root).ok();
}

#[test]
fn short_clips_are_padded_not_dropped() -> Result<()> {
    // Even a clip with no frames at all resolves to N blank frames;
    // only genuinely empty tensors are removed at collation.
    let root = scratch_root("heatclip_pipeline_short");
    let empty_dir = root.join("empty_clip");
    fs::create_dir_all(&empty_dir).unwrap();

    let dataset = Arc::new(VideoClipDataset::new(
        vec![empty_dir],
        test_config(LayoutMode::Btchw),
        AugmentPolicy::val(12),
        Arc::new(MeanBrightnessEstimator),
    ));
    let loader = ClipLoader::new(dataset, 0);

    let batch = loader.load_batch(&[0])?;
    assert_eq!(batch.clips.shape(), [1, 4, 3, 12, 12]);

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn same_seed_reproduces_a_training_batch() -> Result<()> {
    let root = scratch_root("heatclip_pipeline_seeded");
    let clips = vec![write_clip(&root, "clip_a", 9)];

    let dataset = Arc::new(VideoClipDataset::new(
        clips,
        test_config(LayoutMode::Btchw),
        AugmentPolicy::train(12),
        Arc::new(MeanBrightnessEstimator),
    ));

    let first = ClipLoader::new(dataset.clone(), 123).load_batch(&[0])?;
    let second = ClipLoader::new(dataset, 123).load_batch(&[0])?;
    assert_eq!(first.clips, second.clips);

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn unreadable_clip_aborts_the_batch() {
    let root = scratch_root("heatclip_pipeline_unreadable");
    let good = write_clip(&root, "good", 4);
    let bad = root.join("bad");
    fs::create_dir_all(&bad).unwrap();
    fs::write(bad.join("0000.jpg"), b"junk bytes").unwrap();

    let dataset = Arc::new(VideoClipDataset::new(
        vec![good, bad],
        test_config(LayoutMode::Btchw),
        AugmentPolicy::val(12),
        Arc::new(MeanBrightnessEstimator),
    ));
    let loader = ClipLoader::new(dataset, 0);

    assert!(loader.load_batch(&[0, 1]).is_err());

    fs::remove_dir_all(&root).ok();
}
