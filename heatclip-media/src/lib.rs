pub mod image;
pub mod ops;
pub mod provider;

pub use crate::image::raw::RawImage;
