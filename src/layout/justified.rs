use tracing::{debug, trace};

use crate::error::{LayoutError, Result};
use crate::layout::distribute::distribute;
use crate::models::{GalleryImage, GalleryLayout, Row, ScaledImage};

/// Configuration for the justified row layout.
///
/// Every image is scaled to `row_height`, rows are filled left-to-right
/// until they reach the container width, and each full row is then shrunk
/// so it ends exactly on the container's right edge.
#[derive(Debug, Clone, PartialEq)]
pub struct JustifiedLayout {
    /// Target row height in pixels (default: 180)
    pub row_height: f64,
    /// Margin on each side of every image in pixels (default: 2)
    pub margin: u32,
}

impl Default for JustifiedLayout {
    fn default() -> Self {
        Self {
            row_height: 180.0,
            margin: 2,
        }
    }
}

impl JustifiedLayout {
    pub fn new(row_height: f64, margin: u32) -> Self {
        Self { row_height, margin }
    }

    /// Scales every image to the configured row height.
    pub fn scale(&self, images: &[GalleryImage]) -> Result<Vec<ScaledImage>> {
        scale_images(images, self.row_height)
    }

    /// Computes the justified layout for a list of images.
    ///
    /// # Algorithm
    /// 1. Scale each image to the shared row height, keeping its aspect ratio.
    /// 2. Fill rows left-to-right until the running width (with margins)
    ///    reaches the container width.
    /// 3. Cut each full row's overshoot out of its images proportionally.
    ///
    /// A zero container width or an empty list yields an empty layout.
    pub fn compute(&self, images: &[GalleryImage], container_width: u32) -> Result<GalleryLayout> {
        if images.is_empty() || container_width == 0 {
            return Ok(GalleryLayout::new(container_width, Vec::new()));
        }

        let scaled = self.scale(images)?;
        let rows = build_rows(&scaled, container_width, self.margin);
        debug!(
            images = images.len(),
            rows = rows.len(),
            container_width,
            row_height = self.row_height,
            "Computed justified layout"
        );

        Ok(GalleryLayout::new(container_width, rows))
    }

    /// Calculates the total height of a layout.
    /// Useful for scroll calculations.
    pub fn total_height(&self, layout: &GalleryLayout) -> f64 {
        layout.row_count() as f64 * (self.row_height + 2.0 * f64::from(self.margin))
    }
}

/// Scales an image's width to `row_height`, preserving aspect ratio.
///
/// Returns `None` when the image has no height.
pub fn scaled_width(image: &GalleryImage, row_height: f64) -> Option<u32> {
    let ratio = image.aspect_ratio()?;
    Some((row_height * ratio).floor() as u32)
}

/// Scales every image to `row_height`, preserving order and length.
///
/// Fails on the first image with a zero height, naming its index.
pub fn scale_images(images: &[GalleryImage], row_height: f64) -> Result<Vec<ScaledImage>> {
    if !row_height.is_finite() || row_height <= 0.0 {
        return Err(LayoutError::InvalidRowHeight(row_height));
    }

    images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let scaled_width =
                scaled_width(image, row_height).ok_or(LayoutError::InvalidGeometry {
                    index,
                    width: image.width,
                    height: image.height,
                })?;
            Ok(ScaledImage {
                index,
                image: image.clone(),
                scaled_width,
            })
        })
        .collect()
}

/// Groups scaled images into rows and justifies each row.
///
/// Images are taken in order until the row's accumulated width, counting
/// `2 * margin` per image, reaches `container_width`. The last row may fall
/// short and is left at its natural width.
pub fn build_rows(images: &[ScaledImage], container_width: u32, margin: u32) -> Vec<Row> {
    if images.is_empty() || container_width == 0 {
        return Vec::new();
    }

    let limit = u64::from(container_width);
    let slot_margin = 2 * u64::from(margin);
    let mut rows = Vec::new();
    let mut cursor = 0usize;

    while cursor < images.len() {
        let start = cursor;
        let mut len = 0u64;
        while cursor < images.len() && len < limit {
            len += u64::from(images[cursor].scaled_width) + slot_margin;
            cursor += 1;
        }

        let row_index = rows.len();
        trace!(row_index, start, end = cursor, len, "Closed row");
        rows.push(Row {
            row_index,
            start_index: start,
            accumulated_width: len,
            container_width,
            margin,
            items: distribute(&images[start..cursor], len, container_width),
        });
    }

    rows
}
