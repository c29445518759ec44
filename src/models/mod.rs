pub mod gallery_image;
pub mod row_model;

pub use gallery_image::*;
pub use row_model::*;
