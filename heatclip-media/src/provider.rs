use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered frame enumeration for one clip directory. Ordering must be
/// stable across calls for the same clip.
pub trait FrameProvider {
    fn list_frames(&self, clip_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Lists frame files of a clip directory sorted by file name.
pub struct DirectoryFrameProvider {
    extensions: Vec<String>,
}

impl DirectoryFrameProvider {
    pub fn new() -> Self {
        Self {
            extensions: vec!["jpg".to_owned()],
        }
    }

    pub fn with_extensions(extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(extension))
            })
            .unwrap_or(false)
    }
}

impl Default for DirectoryFrameProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameProvider for DirectoryFrameProvider {
    fn list_frames(&self, clip_dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(clip_dir)
            .with_context(|| format!("failed to list clip directory {}", clip_dir.display()))?;

        let mut frames = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| self.matches(path))
            .collect::<Vec<_>>();
        frames.sort();

        debug!("{} frame(s) in {}", frames.len(), clip_dir.display());
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn lists_sorted_and_filters_extensions() {
        let dir = scratch_dir("heatclip_provider_sorted");
        for name in ["0003.jpg", "0001.jpg", "0002.JPG", "notes.txt"] {
            fs::File::create(dir.join(name)).unwrap();
        }

        let provider = DirectoryFrameProvider::new();
        let frames = provider.list_frames(&dir).unwrap();
        let names = frames
            .iter()
            .map(|path| path.file_name().unwrap().to_str().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(names, ["0001.jpg", "0002.JPG", "0003.jpg"]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn ordering_is_idempotent() {
        let dir = scratch_dir("heatclip_provider_stable");
        for name in ["b.jpg", "a.jpg", "c.jpg"] {
            fs::File::create(dir.join(name)).unwrap();
        }

        let provider = DirectoryFrameProvider::new();
        let first = provider.list_frames(&dir).unwrap();
        let second = provider.list_frames(&dir).unwrap();
        assert_eq!(first, second);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let provider = DirectoryFrameProvider::new();
        assert!(provider
            .list_frames(Path::new("/nonexistent/heatclip_clip"))
            .is_err());
    }
}
