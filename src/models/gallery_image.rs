/// An image as supplied by the host, with its intrinsic thumbnail size.
///
/// Everything besides `width` and `height` is opaque to the layout engine
/// and is carried through to the laid-out result untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub src: String,
    pub thumbnail: String,
    pub srcset: Vec<String>,
    pub caption: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl GalleryImage {
    /// Create an image with just the fields the layout needs.
    pub fn new(src: impl Into<String>, width: u32, height: u32) -> Self {
        let src = src.into();
        Self {
            thumbnail: src.clone(),
            src,
            srcset: Vec::new(),
            caption: None,
            width,
            height,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = thumbnail.into();
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_srcset(mut self, srcset: Vec<String>) -> Self {
        self.srcset = srcset;
        self
    }

    /// Width over height, or `None` when the height is zero.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0 {
            None
        } else {
            Some(f64::from(self.width) / f64::from(self.height))
        }
    }

    /// Check if the intrinsic size can be scaled to a row height
    pub fn has_valid_geometry(&self) -> bool {
        self.height > 0
    }
}
