// Utility functions
pub mod error;
pub mod image_payload;
pub mod temp_image;

pub use error::*;
pub use image_payload::*;
pub use temp_image::*;
