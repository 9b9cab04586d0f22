use crate::error::PipelineError;
use heatclip_media::RawImage;
use log::debug;
use std::path::PathBuf;

/// Decodes the sampled frames of a clip in order and pads the tail
/// with blank frames until the sequence is exactly `indices.len()`
/// long. This is the only place synthetic frame content is created.
///
/// A decode failure is fatal for the clip: a silently missing frame
/// would change the clip's temporal semantics downstream.
pub fn assemble(
    paths: &[PathBuf],
    indices: &[usize],
    dim: u32,
) -> Result<Vec<RawImage>, PipelineError> {
    let n_frames = indices.len();

    let mut images = Vec::with_capacity(n_frames);
    for &index in indices {
        let Some(path) = paths.get(index) else {
            continue;
        };
        let image = RawImage::open_file(path).map_err(|source| PipelineError::ClipRead {
            path: path.clone(),
            source,
        })?;
        images.push(image);
    }

    if images.len() < n_frames {
        debug!(
            "padding clip from {} to {} frame(s)",
            images.len(),
            n_frames
        );
    }
    while images.len() < n_frames {
        images.push(RawImage::blank(dim, dim));
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::sample_indices;
    use std::fs;
    use std::path::Path;

    fn write_frames(dir: &Path, count: usize) -> Vec<PathBuf> {
        fs::remove_dir_all(dir).ok();
        fs::create_dir_all(dir).unwrap();
        (0..count)
            .map(|index| {
                let path = dir.join(format!("{index:04}.png"));
                let mut frame = image::RgbImage::new(8, 8);
                // Frame number encoded in the red channel.
                frame.put_pixel(0, 0, image::Rgb([index as u8, 0, 0]));
                frame.save(&path).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn short_clip_is_zero_padded_to_length() {
        let dir = std::env::temp_dir().join("heatclip_assemble_short");
        let paths = write_frames(&dir, 3);

        let indices = sample_indices(paths.len(), 6, 2);
        let images = assemble(&paths, &indices, 8).unwrap();

        assert_eq!(images.len(), 6);
        // Indices 0 and 2 are real frames, everything after is padding.
        assert_eq!(images[0].pixel(0, 0), [0, 0, 0]);
        assert_eq!(images[1].pixel(0, 0), [2, 0, 0]);
        for image in &images[2..] {
            assert!(image.raw_data().iter().all(|&value| value == 0));
        }

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn real_frames_keep_temporal_order() {
        let dir = std::env::temp_dir().join("heatclip_assemble_order");
        let paths = write_frames(&dir, 10);

        let images = assemble(&paths, &[1, 4, 7], 8).unwrap();
        let reds = images
            .iter()
            .map(|image| image.pixel(0, 0)[0])
            .collect::<Vec<_>>();
        assert_eq!(reds, [1, 4, 7]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn decode_failure_propagates() {
        let dir = std::env::temp_dir().join("heatclip_assemble_bad");
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("0000.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let result = assemble(&[path.clone()], &[0], 8);
        assert!(matches!(
            result,
            Err(PipelineError::ClipRead { path: ref failed, .. }) if *failed == path
        ));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn empty_path_list_yields_all_padding() {
        let images = assemble(&[], &[0, 5, 10], 4).unwrap();
        assert_eq!(images.len(), 3);
        assert!(images
            .iter()
            .all(|image| image.raw_data().iter().all(|&value| value == 0)));
    }
}
