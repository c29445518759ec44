//! Justified photo-gallery layout.
//!
//! Images are scaled to a shared row height, packed into rows that reach the
//! container width, and each full row is trimmed so it ends exactly on the
//! container's edge. The engine in [`layout`] is a pure function of the image
//! list, container width, row height and margin; [`gallery`] wraps it with
//! the state a host UI keeps around it.

pub mod bench;
pub mod error;
pub mod gallery;
pub mod layout;
pub mod models;

pub use error::{LayoutError, Result};
pub use gallery::{Gallery, GalleryConfig, ThumbnailAction};
pub use layout::JustifiedLayout;
pub use models::{GalleryImage, GalleryLayout, LaidOutImage, Row, ScaledImage};
