pub mod distribute;
pub mod justified;
pub mod layout_cache;

pub use distribute::distribute;
pub use justified::{build_rows, scale_images, JustifiedLayout};
pub use layout_cache::{CachedLayoutComputer, LayoutCache};
