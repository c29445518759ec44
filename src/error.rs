use thiserror::Error;

/// Errors raised by the layout engine for caller-supplied input it cannot lay out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// An image has a zero intrinsic height, so its aspect ratio is undefined.
    #[error("invalid geometry for image {index}: {width}x{height}")]
    InvalidGeometry { index: usize, width: u32, height: u32 },

    /// The target row height is zero, negative or not finite.
    #[error("invalid row height: {0}")]
    InvalidRowHeight(f64),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
