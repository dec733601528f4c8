pub mod image;
pub mod together;

pub use image::*;
pub use together::*;
