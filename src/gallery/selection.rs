/// Indices of selected images, in the order they were selected.
///
/// Selection is independent of layout: it speaks in original image indices,
/// so it survives relayouts and container resizes unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedImages {
    indices: Vec<usize>,
}

impl SelectedImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        let mut selection = Self::new();
        selection.set(indices);
        selection
    }

    /// Returns the selection with `index` toggled, leaving `self` untouched.
    ///
    /// Hosts that own the selection can adopt the returned list (or not).
    pub fn toggled(&self, index: usize) -> Vec<usize> {
        let mut indices = self.indices.clone();
        match indices.iter().position(|&i| i == index) {
            Some(pos) => {
                indices.remove(pos);
            }
            None => indices.push(index),
        }
        indices
    }

    /// Toggles `index` in place. Returns true if it is now selected.
    pub fn toggle(&mut self, index: usize) -> bool {
        self.indices = self.toggled(index);
        self.is_selected(index)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Replaces the selection, e.g. when the host pushes new state. Duplicates
    /// keep their first position.
    pub fn set(&mut self, indices: Vec<usize>) {
        self.indices.clear();
        for index in indices {
            if !self.indices.contains(&index) {
                self.indices.push(index);
            }
        }
    }

    /// Drops indices that no longer refer to an image. Returns true if any
    /// were removed.
    pub fn retain_below(&mut self, count: usize) -> bool {
        let before = self.indices.len();
        self.indices.retain(|&i| i < count);
        before != self.indices.len()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
