use super::GalleryImage;

/// An image scaled to the target row height.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledImage {
    /// Position in the original image list.
    pub index: usize,
    pub image: GalleryImage,
    pub scaled_width: u32,
}

/// An image with its final width inside a justified row.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutImage {
    pub index: usize,
    pub image: GalleryImage,
    pub scaled_width: u32,
    /// Width after the row's overshoot has been cut away. Negative when the
    /// cut is larger than the image, which only happens with margins far
    /// wider than the images themselves.
    pub render_width: i64,
    /// Signed offset that re-centers the cropped image inside its slot.
    pub margin_adjust: i64,
}

impl LaidOutImage {
    /// Pixels removed from the scaled width.
    pub fn cut(&self) -> i64 {
        i64::from(self.scaled_width) - self.render_width
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub row_index: usize,
    /// Index of the first image of this row in the original list.
    pub start_index: usize,
    /// Scaled widths plus margins, before distribution.
    pub accumulated_width: u64,
    pub container_width: u32,
    pub margin: u32,
    pub items: Vec<LaidOutImage>,
}

impl Row {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Exclusive end index in the original list.
    pub fn end_index(&self) -> usize {
        self.start_index + self.items.len()
    }

    /// Accumulated width minus container width; positive means overshoot.
    pub fn delta(&self) -> i64 {
        self.accumulated_width as i64 - i64::from(self.container_width)
    }

    /// True when the row overshot and was shrunk to the container width.
    pub fn is_justified(&self) -> bool {
        self.delta() > 0
    }

    /// Rendered widths plus the fixed per-image margins.
    pub fn total_width(&self) -> i64 {
        let rendered: i64 = self.items.iter().map(|i| i.render_width).sum();
        rendered + 2 * i64::from(self.margin) * self.items.len() as i64
    }
}

/// The laid-out gallery: rows in original image order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GalleryLayout {
    pub container_width: u32,
    pub rows: Vec<Row>,
}

impl GalleryLayout {
    pub fn new(container_width: u32, rows: Vec<Row>) -> Self {
        Self {
            container_width,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn image_count(&self) -> usize {
        self.rows.iter().map(Row::len).sum()
    }

    /// All laid-out images, concatenated row by row.
    pub fn images(&self) -> impl Iterator<Item = &LaidOutImage> {
        self.rows.iter().flat_map(|row| row.items.iter())
    }

    /// Number of images in a row, 0 when the row does not exist.
    pub fn items_in_row(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Row::len)
    }

    /// Finds the (row, column) holding the image at `index`.
    pub fn locate(&self, index: usize) -> Option<(usize, usize)> {
        let row = self
            .rows
            .partition_point(|row| row.end_index() <= index);
        let found = self.rows.get(row)?;
        (index >= found.start_index).then(|| (row, index - found.start_index))
    }

    /// Maps a (row, column) position back to the original image index.
    pub fn image_index(&self, row: usize, col: usize) -> Option<usize> {
        let found = self.rows.get(row)?;
        (col < found.len()).then(|| found.start_index + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(row_index: usize, start_index: usize, widths: &[u32]) -> Row {
        let items = widths
            .iter()
            .enumerate()
            .map(|(offset, &w)| LaidOutImage {
                index: start_index + offset,
                image: GalleryImage::new(format!("{}.jpg", start_index + offset), w, 100),
                scaled_width: w,
                render_width: i64::from(w),
                margin_adjust: 0,
            })
            .collect();
        Row {
            row_index,
            start_index,
            accumulated_width: widths.iter().map(|&w| u64::from(w)).sum(),
            container_width: 300,
            margin: 0,
            items,
        }
    }

    #[test]
    fn test_locate_and_index_round_trip() {
        let layout = GalleryLayout::new(
            300,
            vec![make_row(0, 0, &[100, 100, 100]), make_row(1, 3, &[150, 150])],
        );

        assert_eq!(layout.image_count(), 5);
        assert_eq!(layout.locate(0), Some((0, 0)));
        assert_eq!(layout.locate(2), Some((0, 2)));
        assert_eq!(layout.locate(3), Some((1, 0)));
        assert_eq!(layout.locate(4), Some((1, 1)));
        assert_eq!(layout.locate(5), None);

        assert_eq!(layout.image_index(1, 1), Some(4));
        assert_eq!(layout.image_index(1, 2), None);
        assert_eq!(layout.image_index(2, 0), None);
    }

    #[test]
    fn test_row_delta_and_total_width() {
        let mut row = make_row(0, 0, &[100, 120]);
        row.margin = 2;
        row.accumulated_width = 228;
        row.container_width = 200;

        assert_eq!(row.delta(), 28);
        assert!(row.is_justified());
        assert_eq!(row.total_width(), 228);
        assert_eq!(row.end_index(), 2);
    }

    #[test]
    fn test_negative_render_width_still_counts() {
        let mut row = make_row(0, 0, &[10]);
        row.margin = 100;
        row.accumulated_width = 210;
        row.container_width = 150;
        row.items[0].render_width = -50;
        row.items[0].margin_adjust = -30;

        assert_eq!(row.items[0].cut(), 60);
        assert_eq!(row.total_width(), 150);
    }

    #[test]
    fn test_items_in_row() {
        let layout = GalleryLayout::new(300, vec![make_row(0, 0, &[100, 100])]);
        assert_eq!(layout.items_in_row(0), 2);
        assert_eq!(layout.items_in_row(7), 0);
        assert!(GalleryLayout::default().is_empty());
    }
}
