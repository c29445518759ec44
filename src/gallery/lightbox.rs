//! Full-screen viewer state.
//!
//! The viewer works on the original image list and a current index; it never
//! looks at rows. Rendering it is left to the host.

use tracing::debug;

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    Viewer,
}

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxKey {
    Left,
    Right,
    Escape,
}

/// Configuration for the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxConfig {
    /// Whether clicking the backdrop closes the viewer (default: false)
    pub backdrop_closes_modal: bool,
    /// Whether the next image should be prefetched (default: true)
    pub preload_next_image: bool,
    /// Whether arrow keys and Escape are handled (default: true)
    pub enable_keyboard_input: bool,
    /// Separator in the "1 of 10" counter (default: " of ")
    pub image_count_separator: String,
    /// Whether the viewer shows a close button (default: true)
    pub show_close_button: bool,
    pub show_image_count: bool,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            backdrop_closes_modal: false,
            preload_next_image: true,
            enable_keyboard_input: true,
            image_count_separator: " of ".to_string(),
            show_close_button: true,
            show_image_count: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lightbox {
    config: LightboxConfig,
    is_open: bool,
    current: usize,
    image_count: usize,
}

impl Lightbox {
    pub fn new(config: LightboxConfig, image_count: usize) -> Self {
        Self {
            config,
            is_open: false,
            current: 0,
            image_count,
        }
    }

    pub fn config(&self) -> &LightboxConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn view_mode(&self) -> ViewMode {
        if self.is_open {
            ViewMode::Viewer
        } else {
            ViewMode::Grid
        }
    }

    /// Opens the viewer on `index`. Returns false if there is no such image.
    pub fn open(&mut self, index: usize) -> bool {
        if index >= self.image_count {
            return false;
        }
        debug!(index, "Opening viewer");
        self.current = index;
        self.is_open = true;
        true
    }

    /// Closes the viewer and rewinds to the first image.
    pub fn close(&mut self) {
        debug!("Closing viewer");
        self.current = 0;
        self.is_open = false;
    }

    /// Moves to the next image. Returns true if the position changed.
    pub fn goto_next(&mut self) -> bool {
        if self.current + 1 >= self.image_count {
            return false;
        }
        self.current += 1;
        true
    }

    /// Moves to the previous image. Returns true if the position changed.
    pub fn goto_previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Clicking the displayed image advances, except on the last image.
    pub fn click_image(&mut self) -> bool {
        self.goto_next()
    }

    /// Returns true if the click closed the viewer.
    pub fn backdrop_click(&mut self) -> bool {
        if !self.is_open || !self.config.backdrop_closes_modal {
            return false;
        }
        self.close();
        true
    }

    /// Handles a key press. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: LightboxKey) -> bool {
        if !self.is_open || !self.config.enable_keyboard_input {
            return false;
        }
        match key {
            LightboxKey::Left => self.goto_previous(),
            LightboxKey::Right => self.goto_next(),
            LightboxKey::Escape => {
                self.close();
                true
            }
        }
    }

    /// Counter text such as "3 of 12", or None when hidden or empty.
    pub fn image_count_label(&self) -> Option<String> {
        if !self.config.show_image_count || self.image_count == 0 {
            return None;
        }
        Some(format!(
            "{}{}{}",
            self.current + 1,
            self.config.image_count_separator,
            self.image_count
        ))
    }

    /// Whether the host should draw a close button right now.
    pub fn shows_close_button(&self) -> bool {
        self.is_open && self.config.show_close_button
    }

    /// Index of the image to prefetch while the viewer is open.
    pub fn preload_index(&self) -> Option<usize> {
        if !self.is_open || !self.config.preload_next_image {
            return None;
        }
        let next = self.current + 1;
        (next < self.image_count).then_some(next)
    }

    /// Updates the image count after the list changed, closing the viewer if
    /// its image disappeared.
    pub fn set_image_count(&mut self, count: usize) {
        self.image_count = count;
        if self.current >= count {
            if self.is_open {
                self.close();
            } else {
                self.current = 0;
            }
        }
    }
}
