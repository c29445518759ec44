//! Host-side gallery state.
//!
//! `Gallery` owns the authoritative image list and the last measured
//! container width and re-runs the layout whenever either changes. Selection,
//! the viewer and keyboard focus are kept as separate state machines that
//! talk to each other only through image indices.

pub mod lightbox;
pub mod navigation;
pub mod selection;

use tracing::debug;

use crate::error::Result;
use crate::layout::{CachedLayoutComputer, JustifiedLayout};
use crate::models::{GalleryImage, GalleryLayout, LaidOutImage};

pub use lightbox::{Lightbox, LightboxConfig, LightboxKey, ViewMode};
pub use navigation::{Direction, GridCursor};
pub use selection::SelectedImages;

/// Configuration for the gallery controller.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryConfig {
    pub layout: JustifiedLayout,
    /// Whether thumbnails can be toggled selected (default: true)
    pub enable_image_selection: bool,
    /// Whether clicking a thumbnail opens the viewer (default: true)
    pub enable_lightbox: bool,
    /// The host handles thumbnail clicks itself; takes precedence over the viewer.
    pub custom_thumbnail_click: bool,
    pub lightbox: LightboxConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            layout: JustifiedLayout::default(),
            enable_image_selection: true,
            enable_lightbox: true,
            custom_thumbnail_click: false,
            lightbox: LightboxConfig::default(),
        }
    }
}

/// What a thumbnail click should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailAction {
    /// Forward the click to the host's own handler.
    Custom(usize),
    /// The viewer was opened on this image.
    OpenLightbox(usize),
    Ignore,
}

pub struct Gallery {
    config: GalleryConfig,
    images: Vec<GalleryImage>,
    container_width: u32,
    layout: GalleryLayout,
    computer: CachedLayoutComputer,
    selection: SelectedImages,
    lightbox: Lightbox,
    cursor: GridCursor,
}

impl Gallery {
    /// Creates a gallery. Nothing is laid out until the first `resize`.
    pub fn new(config: GalleryConfig, images: Vec<GalleryImage>) -> Self {
        let computer = CachedLayoutComputer::with_layout(config.layout.clone());
        let lightbox = Lightbox::new(config.lightbox.clone(), images.len());
        Self {
            config,
            images,
            container_width: 0,
            layout: GalleryLayout::default(),
            computer,
            selection: SelectedImages::new(),
            lightbox,
            cursor: GridCursor::default(),
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn container_width(&self) -> u32 {
        self.container_width
    }

    pub fn layout(&self) -> &GalleryLayout {
        &self.layout
    }

    /// Laid-out thumbnails in original order.
    pub fn thumbnails(&self) -> impl Iterator<Item = &LaidOutImage> {
        self.layout.images()
    }

    /// Reports a newly measured container width.
    ///
    /// The width is floored to whole pixels; negative or NaN widths count as
    /// zero ("not ready yet"). Returns true if the layout was recomputed.
    pub fn resize(&mut self, measured_width: f64) -> Result<bool> {
        let width = floor_width(measured_width);
        if width == self.container_width {
            return Ok(false);
        }

        let layout = self.computer.compute(&self.images, width)?;
        debug!(
            from = self.container_width,
            to = width,
            rows = layout.row_count(),
            "Container resized"
        );
        self.container_width = width;
        self.commit_layout(layout);
        Ok(true)
    }

    /// Replaces the image list and lays it out at the current width.
    ///
    /// On error nothing changes, including the image list.
    pub fn set_images(&mut self, images: Vec<GalleryImage>) -> Result<()> {
        let layout = self.computer.compute(&images, self.container_width)?;
        debug!(images = images.len(), "Image list replaced");
        self.images = images;
        self.selection.retain_below(self.images.len());
        self.lightbox.set_image_count(self.images.len());
        self.commit_layout(layout);
        Ok(())
    }

    fn commit_layout(&mut self, layout: GalleryLayout) {
        self.layout = layout;
        self.cursor.sync_layout(&self.layout);
    }

    /// Resolves a thumbnail click, opening the viewer when that is the action.
    pub fn click_thumbnail(&mut self, index: usize) -> ThumbnailAction {
        if index >= self.images.len() {
            return ThumbnailAction::Ignore;
        }
        if self.config.custom_thumbnail_click {
            return ThumbnailAction::Custom(index);
        }
        if self.config.enable_lightbox && self.lightbox.open(index) {
            self.cursor.focus_image(index);
            return ThumbnailAction::OpenLightbox(index);
        }
        ThumbnailAction::Ignore
    }

    /// Clicks the thumbnail under the keyboard cursor.
    pub fn activate_focused(&mut self) -> ThumbnailAction {
        match self.cursor.image_index() {
            Some(index) => self.click_thumbnail(index),
            None => ThumbnailAction::Ignore,
        }
    }

    /// Toggles selection of an image and returns the new selection, or None
    /// when selection is disabled or the index is out of range.
    pub fn toggle_selected(&mut self, index: usize) -> Option<Vec<usize>> {
        if !self.config.enable_image_selection || index >= self.images.len() {
            return None;
        }
        self.selection.toggle(index);
        Some(self.selection.indices().to_vec())
    }

    /// Adopts a selection pushed by the host.
    pub fn set_selected(&mut self, indices: Vec<usize>) {
        self.selection.set(indices);
        self.selection.retain_below(self.images.len());
    }

    pub fn selection(&self) -> &SelectedImages {
        &self.selection
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn lightbox_mut(&mut self) -> &mut Lightbox {
        &mut self.lightbox
    }

    pub fn cursor(&self) -> &GridCursor {
        &self.cursor
    }

    pub fn move_cursor(&mut self, direction: Direction) -> bool {
        self.cursor.move_selection(direction)
    }
}

fn floor_width(measured_width: f64) -> u32 {
    if measured_width.is_nan() || measured_width <= 0.0 {
        0
    } else {
        // `as` saturates at u32::MAX
        measured_width.floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_images(count: usize) -> Vec<GalleryImage> {
        (0..count)
            .map(|i| GalleryImage::new(format!("{}.jpg", i), 200, 100))
            .collect()
    }

    fn make_gallery(count: usize) -> Gallery {
        let config = GalleryConfig {
            layout: JustifiedLayout::new(100.0, 2),
            ..GalleryConfig::default()
        };
        Gallery::new(config, make_images(count))
    }

    #[test]
    fn test_not_laid_out_before_resize() {
        let gallery = make_gallery(5);
        assert!(gallery.layout().is_empty());
        assert_eq!(gallery.thumbnails().count(), 0);
    }

    #[test]
    fn test_resize_floors_and_relayouts() {
        let mut gallery = make_gallery(5);

        assert!(gallery.resize(600.7).unwrap());
        assert_eq!(gallery.container_width(), 600);
        assert_eq!(gallery.layout().row_count(), 2);
        assert_eq!(gallery.thumbnails().count(), 5);

        // Same floored width: no relayout
        assert!(!gallery.resize(600.2).unwrap());

        assert!(gallery.resize(1000.0).unwrap());
        assert_eq!(gallery.layout().container_width, 1000);
    }

    #[test]
    fn test_negative_and_nan_widths_are_not_ready() {
        let mut gallery = make_gallery(5);
        gallery.resize(600.0).unwrap();

        assert!(gallery.resize(f64::NAN).unwrap());
        assert!(gallery.layout().is_empty());
        assert!(!gallery.resize(-20.0).unwrap());
        assert_eq!(gallery.container_width(), 0);
    }

    #[test]
    fn test_set_images_relayouts() {
        let mut gallery = make_gallery(5);
        gallery.resize(600.0).unwrap();

        gallery.set_images(make_images(9)).unwrap();
        assert_eq!(gallery.thumbnails().count(), 9);
        assert_eq!(gallery.layout().row_count(), 3);
    }

    #[test]
    fn test_set_images_error_leaves_state() {
        let mut gallery = make_gallery(5);
        gallery.resize(600.0).unwrap();
        let before = gallery.layout().clone();

        let mut broken = make_images(3);
        broken[2].height = 0;
        assert!(gallery.set_images(broken).is_err());

        assert_eq!(gallery.images().len(), 5);
        assert_eq!(gallery.layout(), &before);
    }

    #[test]
    fn test_click_opens_lightbox() {
        let mut gallery = make_gallery(5);
        gallery.resize(600.0).unwrap();

        assert_eq!(gallery.click_thumbnail(4), ThumbnailAction::OpenLightbox(4));
        assert!(gallery.lightbox().is_open());
        assert_eq!(gallery.lightbox().current(), 4);
        assert_eq!(gallery.cursor().image_index(), Some(4));

        assert_eq!(gallery.click_thumbnail(9), ThumbnailAction::Ignore);
    }

    #[test]
    fn test_custom_click_takes_precedence() {
        let config = GalleryConfig {
            custom_thumbnail_click: true,
            ..GalleryConfig::default()
        };
        let mut gallery = Gallery::new(config, make_images(3));
        assert_eq!(gallery.click_thumbnail(1), ThumbnailAction::Custom(1));
        assert!(!gallery.lightbox().is_open());
    }

    #[test]
    fn test_click_ignored_without_lightbox() {
        let config = GalleryConfig {
            enable_lightbox: false,
            ..GalleryConfig::default()
        };
        let mut gallery = Gallery::new(config, make_images(3));
        assert_eq!(gallery.click_thumbnail(1), ThumbnailAction::Ignore);
    }

    #[test]
    fn test_toggle_selected() {
        let mut gallery = make_gallery(5);

        assert_eq!(gallery.toggle_selected(2), Some(vec![2]));
        assert_eq!(gallery.toggle_selected(0), Some(vec![2, 0]));
        assert_eq!(gallery.toggle_selected(2), Some(vec![0]));
        assert_eq!(gallery.toggle_selected(5), None);

        let config = GalleryConfig {
            enable_image_selection: false,
            ..GalleryConfig::default()
        };
        let mut gallery = Gallery::new(config, make_images(3));
        assert_eq!(gallery.toggle_selected(0), None);
    }

    #[test]
    fn test_shrinking_images_prunes_selection() {
        let mut gallery = make_gallery(6);
        gallery.set_selected(vec![1, 5]);

        gallery.set_images(make_images(3)).unwrap();
        assert_eq!(gallery.selection().indices(), &[1]);
    }

    #[test]
    fn test_keyboard_focus_then_activate() {
        let mut gallery = make_gallery(5);
        gallery.resize(600.0).unwrap();

        assert!(gallery.move_cursor(Direction::Down));
        assert_eq!(gallery.activate_focused(), ThumbnailAction::OpenLightbox(3));
    }

    #[test]
    fn test_resize_back_hits_cache() {
        let mut gallery = make_gallery(8);
        gallery.resize(600.0).unwrap();
        let first = gallery.layout().clone();

        gallery.resize(800.0).unwrap();
        gallery.resize(600.0).unwrap();
        assert_eq!(gallery.layout(), &first);
    }
}
