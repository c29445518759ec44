use crate::models::GalleryLayout;

/// Navigation direction for grid movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Keyboard focus over the rows of a justified layout.
///
/// Rows hold different numbers of images, so vertical moves clamp the column
/// to the target row and horizontal moves wrap across row ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridCursor {
    /// Current row index
    pub row: usize,
    /// Current column index within the row
    pub col: usize,
    /// (start index, item count) for each row
    rows: Vec<(usize, usize)>,
}

impl GridCursor {
    pub fn new(layout: &GalleryLayout) -> Self {
        let mut cursor = Self::default();
        cursor.sync_layout(layout);
        cursor
    }

    /// Adopts a freshly computed layout, keeping focus on the same image
    /// when it still exists.
    pub fn sync_layout(&mut self, layout: &GalleryLayout) {
        let focused = self.image_index();
        self.rows = layout
            .rows
            .iter()
            .map(|row| (row.start_index, row.len()))
            .collect();

        match focused.and_then(|index| layout.locate(index)) {
            Some((row, col)) => {
                self.row = row;
                self.col = col;
            }
            None => self.clamp(),
        }
    }

    fn items_in_row(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, |&(_, len)| len)
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn clamp(&mut self) {
        if self.rows.is_empty() {
            self.row = 0;
            self.col = 0;
            return;
        }
        self.row = self.row.min(self.row_count() - 1);
        self.col = self.col.min(self.items_in_row(self.row).saturating_sub(1));
    }

    /// Move selection in the given direction
    pub fn move_selection(&mut self, direction: Direction) -> bool {
        if self.rows.is_empty() {
            return false;
        }

        let old_row = self.row;
        let old_col = self.col;

        match direction {
            Direction::Up => {
                if self.row > 0 {
                    self.row -= 1;
                    self.col = self.col.min(self.items_in_row(self.row).saturating_sub(1));
                }
            }
            Direction::Down => {
                if self.row < self.row_count() - 1 {
                    self.row += 1;
                    self.col = self.col.min(self.items_in_row(self.row).saturating_sub(1));
                }
            }
            Direction::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    // Wrap to previous row's last item
                    self.row -= 1;
                    self.col = self.items_in_row(self.row).saturating_sub(1);
                }
            }
            Direction::Right => {
                if self.col < self.items_in_row(self.row).saturating_sub(1) {
                    self.col += 1;
                } else if self.row < self.row_count() - 1 {
                    // Wrap to next row's first item
                    self.row += 1;
                    self.col = 0;
                }
            }
        }

        old_row != self.row || old_col != self.col
    }

    /// Get the current selection as (row, col)
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Original image index under the cursor.
    pub fn image_index(&self) -> Option<usize> {
        let &(start, len) = self.rows.get(self.row)?;
        (self.col < len).then(|| start + self.col)
    }

    /// Moves the cursor onto an image. Returns false if it is not laid out.
    pub fn focus_image(&mut self, index: usize) -> bool {
        let found = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, &(start, len))| index >= start && index < start + len);
        match found {
            Some((row, &(start, _))) => {
                self.row = row;
                self.col = index - start;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::JustifiedLayout;
    use crate::models::GalleryImage;

    /// Lays out square images so each row holds `per_row` of them.
    fn square_layout(count: usize, per_row: u32) -> GalleryLayout {
        let layout = JustifiedLayout::new(100.0, 0);
        let items: Vec<GalleryImage> = (0..count)
            .map(|i| GalleryImage::new(format!("{}.jpg", i), 100, 100))
            .collect();
        layout.compute(&items, per_row * 100).unwrap()
    }

    #[test]
    fn test_grid_selection_movement() {
        let mut cursor = GridCursor::new(&square_layout(20, 4));

        assert_eq!(cursor.position(), (0, 0));

        assert!(cursor.move_selection(Direction::Right));
        assert_eq!(cursor.position(), (0, 1));

        assert!(cursor.move_selection(Direction::Down));
        assert_eq!(cursor.position(), (1, 1));
        assert_eq!(cursor.image_index(), Some(5));

        assert!(cursor.move_selection(Direction::Left));
        assert_eq!(cursor.position(), (1, 0));

        assert!(cursor.move_selection(Direction::Up));
        assert_eq!(cursor.position(), (0, 0));
    }

    #[test]
    fn test_grid_selection_wrapping() {
        let mut cursor = GridCursor::new(&square_layout(9, 3));

        cursor.move_selection(Direction::Right);
        cursor.move_selection(Direction::Right);
        assert_eq!(cursor.position(), (0, 2));

        cursor.move_selection(Direction::Right);
        assert_eq!(cursor.position(), (1, 0));

        cursor.move_selection(Direction::Left);
        assert_eq!(cursor.position(), (0, 2));
    }

    #[test]
    fn test_grid_selection_boundaries() {
        let mut cursor = GridCursor::new(&square_layout(8, 4));

        assert!(!cursor.move_selection(Direction::Up));
        assert_eq!(cursor.position(), (0, 0));

        cursor.row = 1;
        cursor.col = 3;

        assert!(!cursor.move_selection(Direction::Down));
        assert_eq!(cursor.position(), (1, 3));

        assert!(!cursor.move_selection(Direction::Right));
        assert_eq!(cursor.position(), (1, 3));
    }

    #[test]
    fn test_short_last_row_clamps_column() {
        // Rows of 4, 4 and a trailing row of 2
        let mut cursor = GridCursor::new(&square_layout(10, 4));
        cursor.row = 1;
        cursor.col = 3;

        cursor.move_selection(Direction::Down);
        assert_eq!(cursor.position(), (2, 1));
        assert_eq!(cursor.image_index(), Some(9));
    }

    #[test]
    fn test_relayout_keeps_focused_image() {
        let mut cursor = GridCursor::new(&square_layout(12, 4));
        assert!(cursor.focus_image(6));
        assert_eq!(cursor.position(), (1, 2));

        cursor.sync_layout(&square_layout(12, 3));
        assert_eq!(cursor.position(), (2, 0));
        assert_eq!(cursor.image_index(), Some(6));
    }

    #[test]
    fn test_empty_layout() {
        let mut cursor = GridCursor::new(&GalleryLayout::default());
        assert!(!cursor.move_selection(Direction::Right));
        assert_eq!(cursor.image_index(), None);
        assert!(!cursor.focus_image(0));
    }
}
